use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

use super::format::currency;
use super::state::RequestState;
use crate::client::PlatformApi;
use crate::contracts::{FeasoField, FeasoInputs, FeasoOutputs, UnknownFeasoField};

pub const RUN_FAILED: &str = "Failed to run feasibility";

/// Parses user-entered text as a finite number; anything else becomes `0`.
pub fn coerce_numeric(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Starting assumptions shown when the calculator opens.
pub fn default_inputs(parcel_id: impl Into<String>) -> FeasoInputs {
    FeasoInputs {
        parcel_id: parcel_id.into(),
        build_cost_m2: 2100.0,
        siteworks_pct: 8.0,
        finance_pct: 6.0,
        contingency_pct: Some(10.0),
        gst_pct: 10.0,
        sales_price_m2: 4200.0,
        units_n: Some(12.0),
        gross_floor_area_sqm: Some(1080.0),
        holding_months: Some(18.0),
        interest_rate_pct: None,
        pre_sales_pct: None,
        equity_contribution_pct: None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityLine {
    pub revenue_shift: String,
    pub irr: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeasoResultView {
    pub feaso_run_id: String,
    pub irr: String,
    pub residual: String,
    pub margin: String,
    pub sensitivity: Vec<SensitivityLine>,
}

impl From<&FeasoOutputs> for FeasoResultView {
    fn from(outputs: &FeasoOutputs) -> Self {
        Self {
            feaso_run_id: outputs.feaso_run_id.clone(),
            irr: format!("{}%", outputs.irr_pct),
            residual: currency(outputs.residual),
            margin: format!("{:.2}%", outputs.profit_margin_pct),
            sensitivity: outputs
                .sensitivity
                .iter()
                .map(|row| SensitivityLine {
                    revenue_shift: format!("{}% revenue shift", row.delta_pct),
                    irr: format!("{}% IRR", row.irr_pct),
                })
                .collect(),
        }
    }
}

/// "Feaso-in-a-Click" calculator for a single parcel.
pub struct FeasoPanel<A> {
    api: Arc<A>,
    open: bool,
    inputs: FeasoInputs,
    run: RequestState<FeasoOutputs>,
}

impl<A: PlatformApi> FeasoPanel<A> {
    pub fn new(api: Arc<A>, parcel_id: impl Into<String>) -> Self {
        Self {
            api,
            open: false,
            inputs: default_inputs(parcel_id),
            run: RequestState::Idle,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn parcel_id(&self) -> &str {
        &self.inputs.parcel_id
    }

    /// Moves the calculator to another parcel, keeping edited assumptions but
    /// dropping any result computed for the previous one.
    pub fn set_parcel_id(&mut self, parcel_id: impl Into<String>) {
        let parcel_id = parcel_id.into();
        if parcel_id != self.inputs.parcel_id {
            self.inputs.parcel_id = parcel_id;
            self.run = RequestState::Idle;
        }
    }

    pub fn inputs(&self) -> &FeasoInputs {
        &self.inputs
    }

    /// Stores the coerced value of `raw` and returns it.
    pub fn set_field(&mut self, field: FeasoField, raw: &str) -> f64 {
        let value = coerce_numeric(raw);
        self.inputs.set(field, value);
        value
    }

    pub fn set_named(&mut self, name: &str, raw: &str) -> Result<f64, UnknownFeasoField> {
        let field = name.parse::<FeasoField>()?;
        Ok(self.set_field(field, raw))
    }

    /// Fields currently carried by the form, in display order.
    pub fn editable_fields(&self) -> Vec<(FeasoField, f64)> {
        FeasoField::ordered()
            .into_iter()
            .filter_map(|field| self.inputs.get(field).map(|value| (field, value)))
            .collect()
    }

    pub fn state(&self) -> &RequestState<FeasoOutputs> {
        &self.run
    }

    pub fn run_label(&self) -> &'static str {
        if self.run.is_loading() {
            "Running…"
        } else {
            "Run Feaso"
        }
    }

    pub async fn run(&mut self) -> &RequestState<FeasoOutputs> {
        self.run = RequestState::Loading;
        self.run = match self.api.run_feaso(&self.inputs).await {
            Ok(outputs) => {
                info!(
                    parcel_id = %self.inputs.parcel_id,
                    feaso_run_id = %outputs.feaso_run_id,
                    irr_pct = outputs.irr_pct,
                    "feasibility run complete"
                );
                RequestState::Ready(outputs)
            }
            Err(err) => {
                error!(parcel_id = %self.inputs.parcel_id, error = %err, "feasibility run failed");
                RequestState::Failed(RUN_FAILED.to_string())
            }
        };
        &self.run
    }

    pub fn result_view(&self) -> Option<FeasoResultView> {
        self.run.ready().map(FeasoResultView::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_numeric_input_coerces_to_zero() {
        assert_eq!(coerce_numeric("abc"), 0.0);
        assert_eq!(coerce_numeric(""), 0.0);
        assert_eq!(coerce_numeric("   "), 0.0);
        assert_eq!(coerce_numeric("NaN"), 0.0);
        assert_eq!(coerce_numeric("inf"), 0.0);
        assert_eq!(coerce_numeric(" 2450.5 "), 2450.5);
        assert_eq!(coerce_numeric("-3"), -3.0);
    }

    #[test]
    fn default_form_exposes_seeded_fields_only() {
        let inputs = default_inputs("parcel-1");
        let seeded: Vec<FeasoField> = FeasoField::ordered()
            .into_iter()
            .filter(|field| inputs.get(*field).is_some())
            .collect();
        assert_eq!(seeded.len(), 9);
        assert!(!seeded.contains(&FeasoField::InterestRatePct));
    }

    #[test]
    fn result_view_formats_figures() {
        let outputs = FeasoOutputs {
            feaso_run_id: "run-7".to_string(),
            irr_pct: 14.2,
            residual: 1_234_567.5,
            profit_margin_pct: 18.0,
            sensitivity: vec![crate::contracts::SensitivityRow {
                metric: Some("revenue".to_string()),
                delta_pct: -10.0,
                irr_pct: 9.75,
            }],
            provenance: Vec::new(),
        };
        let view = FeasoResultView::from(&outputs);
        assert_eq!(view.irr, "14.2%");
        assert_eq!(view.residual, "$1,234,567.5");
        assert_eq!(view.margin, "18.00%");
        assert_eq!(view.sensitivity[0].revenue_shift, "-10% revenue shift");
        assert_eq!(view.sensitivity[0].irr, "9.75% IRR");
    }
}
