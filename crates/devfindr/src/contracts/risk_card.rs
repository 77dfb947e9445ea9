use serde::{Deserialize, Serialize};

use super::da::DaApplication;
use super::parcel::{OverlayType, ParcelSummary};
use super::provenance::ProvenanceEntry;

/// Physical metrics nested inside a risk-card response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskCardMetrics {
    #[serde(default)]
    pub area_sqm: Option<f64>,
    #[serde(default)]
    pub frontage_m: Option<f64>,
    #[serde(default)]
    pub slope_pct: Option<f64>,
}

impl From<&ParcelSummary> for RiskCardMetrics {
    fn from(parcel: &ParcelSummary) -> Self {
        Self {
            area_sqm: parcel.area_sqm,
            frontage_m: parcel.frontage_m,
            slope_pct: parcel.slope_pct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayDetail {
    pub overlay_type: OverlayType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<String>,
}

/// Body of `GET /parcels/{parcel_id}/risk-card`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskCardResponse {
    pub parcel: ParcelSummary,
    #[serde(default)]
    pub metrics: RiskCardMetrics,
    #[serde(default)]
    pub overlays: Vec<OverlayDetail>,
    #[serde(default)]
    pub da_precedents: Vec<DaApplication>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_masked: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provenance: Vec<ProvenanceEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_backend_risk_card() {
        let card: RiskCardResponse = serde_json::from_value(json!({
            "parcel": { "id": "parcel-1", "address": "10 Sample St", "overlays": ["flood"] },
            "metrics": { "area_sqm": 612.0, "frontage_m": null, "slope_pct": 4.5 },
            "overlays": [
                { "overlay_type": "flood", "authority": "Inner West Council", "severity": "medium" },
                { "overlay_type": "coastal_hazard", "authority": null }
            ],
            "da_precedents": [],
            "owner_masked": "Alex M.",
            "provenance": []
        }))
        .expect("risk card decodes");

        assert_eq!(card.metrics.area_sqm, Some(612.0));
        assert!(card.metrics.frontage_m.is_none());
        assert_eq!(card.overlays.len(), 2);
        assert_eq!(card.overlays[1].overlay_type.as_str(), "coastal_hazard");
        assert!(card.overlays[1].severity.is_none());
    }
}
