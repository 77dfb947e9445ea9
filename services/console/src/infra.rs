use devfindr::client::HttpApiClient;
use devfindr::config::AppConfig;
use devfindr::contracts::FeasoField;
use devfindr::error::AppError;
use devfindr::telemetry;
use devfindr::workspace::WorkspaceRole;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads configuration, installs logging and builds the platform client for
/// one-shot CLI commands.
pub(crate) fn connect() -> Result<(AppConfig, Arc<HttpApiClient>), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let client = HttpApiClient::from_config(&config.api)?;
    Ok((config, Arc::new(client)))
}

pub(crate) fn parse_role(raw: &str) -> Result<WorkspaceRole, String> {
    raw.parse::<WorkspaceRole>().map_err(|err| err.to_string())
}

/// Parses `field=value` for the feasibility form. The value is kept raw so the
/// form's own numeric coercion applies.
pub(crate) fn parse_feaso_assignment(raw: &str) -> Result<(FeasoField, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = key
        .parse::<FeasoField>()
        .map_err(|err| format!("{err} (known fields: {})", known_feaso_fields()))?;
    Ok((field, value.to_string()))
}

fn known_feaso_fields() -> String {
    FeasoField::ordered()
        .iter()
        .map(|field| field.key())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feaso_assignment_keeps_raw_value() {
        let (field, value) = parse_feaso_assignment("build-cost-m2=2450").expect("parses");
        assert_eq!(field, FeasoField::BuildCostM2);
        assert_eq!(value, "2450");

        let (field, value) = parse_feaso_assignment("units_n=").expect("parses");
        assert_eq!(field, FeasoField::UnitsN);
        assert_eq!(value, "");
    }

    #[test]
    fn feaso_assignment_rejects_bad_input() {
        assert!(parse_feaso_assignment("units_n").is_err());
        let err = parse_feaso_assignment("land_tax=4").expect_err("unknown field");
        assert!(err.contains("holding_months"));
    }

    #[test]
    fn roles_parse_from_slugs() {
        assert_eq!(parse_role("investor"), Ok(WorkspaceRole::Investor));
        assert!(parse_role("tenant").is_err());
    }
}
