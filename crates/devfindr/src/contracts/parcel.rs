use serde::{Deserialize, Serialize};
use std::fmt;

/// Regulatory or environmental designation attached to a parcel.
///
/// The platform publishes a closed set of overlay kinds, but values the client
/// does not know yet are carried through verbatim so they can still be shown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OverlayType {
    Flood,
    Bushfire,
    Heritage,
    Zoning,
    Other,
    Unrecognized(String),
}

impl OverlayType {
    pub fn known() -> [Self; 5] {
        [
            Self::Flood,
            Self::Bushfire,
            Self::Heritage,
            Self::Zoning,
            Self::Other,
        ]
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Flood => "flood",
            Self::Bushfire => "bushfire",
            Self::Heritage => "heritage",
            Self::Zoning => "zoning",
            Self::Other => "other",
            Self::Unrecognized(raw) => raw.as_str(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}

impl From<String> for OverlayType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "flood" => Self::Flood,
            "bushfire" => Self::Bushfire,
            "heritage" => Self::Heritage,
            "zoning" => Self::Zoning,
            "other" => Self::Other,
            _ => Self::Unrecognized(value),
        }
    }
}

impl From<&str> for OverlayType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<OverlayType> for String {
    fn from(value: OverlayType) -> Self {
        match value {
            OverlayType::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OverlayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search/detail projection of a parcel as returned by the platform API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParcelSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cad_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoning_code: Option<String>,
    #[serde(default)]
    pub overlays: Vec<OverlayType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sale_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_sqm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontage_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slope_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provenance_ids: Vec<String>,
}

impl ParcelSummary {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// Filters accepted by `GET /parcels/search`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParcelSearchQuery {
    pub q: String,
    pub bbox: Option<String>,
    pub zoning: Vec<String>,
    pub min_area: Option<f64>,
    pub max_slope: Option<f64>,
    pub overlay: Option<OverlayType>,
}

impl ParcelSearchQuery {
    pub fn text(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            ..Self::default()
        }
    }

    /// Query-string pairs; `q` is always present, even when empty.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("q", self.q.clone())];
        if let Some(bbox) = &self.bbox {
            pairs.push(("bbox", bbox.clone()));
        }
        for zone in &self.zoning {
            pairs.push(("zoning", zone.clone()));
        }
        if let Some(min_area) = self.min_area {
            pairs.push(("min_area", min_area.to_string()));
        }
        if let Some(max_slope) = self.max_slope {
            pairs.push(("max_slope", max_slope.to_string()));
        }
        if let Some(overlay) = &self.overlay {
            pairs.push(("overlay", overlay.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParcelSearchResponse {
    #[serde(default)]
    pub items: Vec<ParcelSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}
