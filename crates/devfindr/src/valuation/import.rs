use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

use crate::contracts::{OverlayType, ParcelSummary};

#[derive(Debug)]
pub enum CompImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for CompImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompImportError::Io(err) => write!(f, "failed to read comparables file: {}", err),
            CompImportError::Csv(err) => write!(f, "invalid comparables CSV data: {}", err),
        }
    }
}

impl std::error::Error for CompImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompImportError::Io(err) => Some(err),
            CompImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CompImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CompImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads comparable sales exported as CSV.
///
/// Only the `id` column is required. Blank cells are treated as absent, and
/// `overlays` holds `;`-separated overlay tags.
pub fn comps_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ParcelSummary>, CompImportError> {
    let file = std::fs::File::open(path)?;
    comps_from_reader(file)
}

pub fn comps_from_reader<R: Read>(reader: R) -> Result<Vec<ParcelSummary>, CompImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut comps = Vec::new();

    for record in csv_reader.deserialize::<CompRow>() {
        comps.push(record?.into_summary());
    }

    Ok(comps)
}

#[derive(Debug, Deserialize)]
struct CompRow {
    id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cad_id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    address: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    state: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    zoning_code: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    overlays: Option<String>,
    #[serde(default)]
    last_sale_price: Option<f64>,
    #[serde(default)]
    area_sqm: Option<f64>,
    #[serde(default)]
    frontage_m: Option<f64>,
    #[serde(default)]
    slope_pct: Option<f64>,
}

impl CompRow {
    fn into_summary(self) -> ParcelSummary {
        let overlays = self
            .overlays
            .as_deref()
            .map(|raw| {
                raw.split(';')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(OverlayType::from)
                    .collect()
            })
            .unwrap_or_default();

        ParcelSummary {
            id: self.id,
            cad_id: self.cad_id,
            address: self.address,
            state: self.state,
            zoning_code: self.zoning_code,
            overlays,
            last_sale_price: self.last_sale_price,
            area_sqm: self.area_sqm,
            frontage_m: self.frontage_m,
            slope_pct: self.slope_pct,
            provenance_ids: Vec::new(),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
