use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::provenance::ProvenanceEntry;

/// Assumptions posted to `POST /feaso/run`.
///
/// Optional fields left as `None` are omitted from the request body so the
/// feasibility engine falls back to its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeasoInputs {
    pub parcel_id: String,
    pub build_cost_m2: f64,
    pub siteworks_pct: f64,
    pub finance_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contingency_pct: Option<f64>,
    pub gst_pct: f64,
    pub sales_price_m2: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units_n: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_floor_area_sqm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holding_months: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_sales_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equity_contribution_pct: Option<f64>,
}

impl FeasoInputs {
    pub fn get(&self, field: FeasoField) -> Option<f64> {
        match field {
            FeasoField::BuildCostM2 => Some(self.build_cost_m2),
            FeasoField::SiteworksPct => Some(self.siteworks_pct),
            FeasoField::FinancePct => Some(self.finance_pct),
            FeasoField::ContingencyPct => self.contingency_pct,
            FeasoField::GstPct => Some(self.gst_pct),
            FeasoField::SalesPriceM2 => Some(self.sales_price_m2),
            FeasoField::UnitsN => self.units_n,
            FeasoField::GrossFloorAreaSqm => self.gross_floor_area_sqm,
            FeasoField::HoldingMonths => self.holding_months,
            FeasoField::InterestRatePct => self.interest_rate_pct,
            FeasoField::PreSalesPct => self.pre_sales_pct,
            FeasoField::EquityContributionPct => self.equity_contribution_pct,
        }
    }

    pub fn set(&mut self, field: FeasoField, value: f64) {
        match field {
            FeasoField::BuildCostM2 => self.build_cost_m2 = value,
            FeasoField::SiteworksPct => self.siteworks_pct = value,
            FeasoField::FinancePct => self.finance_pct = value,
            FeasoField::ContingencyPct => self.contingency_pct = Some(value),
            FeasoField::GstPct => self.gst_pct = value,
            FeasoField::SalesPriceM2 => self.sales_price_m2 = value,
            FeasoField::UnitsN => self.units_n = Some(value),
            FeasoField::GrossFloorAreaSqm => self.gross_floor_area_sqm = Some(value),
            FeasoField::HoldingMonths => self.holding_months = Some(value),
            FeasoField::InterestRatePct => self.interest_rate_pct = Some(value),
            FeasoField::PreSalesPct => self.pre_sales_pct = Some(value),
            FeasoField::EquityContributionPct => self.equity_contribution_pct = Some(value),
        }
    }
}

/// The user-editable numeric assumptions of [`FeasoInputs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeasoField {
    BuildCostM2,
    SiteworksPct,
    FinancePct,
    ContingencyPct,
    GstPct,
    SalesPriceM2,
    UnitsN,
    GrossFloorAreaSqm,
    HoldingMonths,
    InterestRatePct,
    PreSalesPct,
    EquityContributionPct,
}

impl FeasoField {
    pub const fn ordered() -> [Self; 12] {
        [
            Self::BuildCostM2,
            Self::SiteworksPct,
            Self::FinancePct,
            Self::ContingencyPct,
            Self::GstPct,
            Self::SalesPriceM2,
            Self::UnitsN,
            Self::GrossFloorAreaSqm,
            Self::HoldingMonths,
            Self::InterestRatePct,
            Self::PreSalesPct,
            Self::EquityContributionPct,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::BuildCostM2 => "build_cost_m2",
            Self::SiteworksPct => "siteworks_pct",
            Self::FinancePct => "finance_pct",
            Self::ContingencyPct => "contingency_pct",
            Self::GstPct => "gst_pct",
            Self::SalesPriceM2 => "sales_price_m2",
            Self::UnitsN => "units_n",
            Self::GrossFloorAreaSqm => "gross_floor_area_sqm",
            Self::HoldingMonths => "holding_months",
            Self::InterestRatePct => "interest_rate_pct",
            Self::PreSalesPct => "pre_sales_pct",
            Self::EquityContributionPct => "equity_contribution_pct",
        }
    }

    /// Form label: the wire key with underscores spaced out.
    pub fn label(self) -> String {
        self.key().replace('_', " ")
    }
}

impl fmt::Display for FeasoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feasibility input '{0}'")]
pub struct UnknownFeasoField(pub String);

impl FromStr for FeasoField {
    type Err = UnknownFeasoField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ordered()
            .into_iter()
            .find(|field| field.key() == normalized)
            .ok_or_else(|| UnknownFeasoField(value.to_string()))
    }
}

/// IRR under a shifted revenue assumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    pub delta_pct: f64,
    pub irr_pct: f64,
}

/// Body of `POST /feaso/run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasoOutputs {
    pub feaso_run_id: String,
    pub irr_pct: f64,
    pub residual: f64,
    pub profit_margin_pct: f64,
    #[serde(default)]
    pub sensitivity: Vec<SensitivityRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provenance: Vec<ProvenanceEntry>,
}
