use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmaComp {
    pub parcel_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustments: Option<BTreeMap<String, f64>>,
}

impl CmaComp {
    pub fn new(parcel_id: impl Into<String>) -> Self {
        Self {
            parcel_id: parcel_id.into(),
            adjustments: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmaDistribution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_copy_to_owner: Option<bool>,
}

/// Request body for `POST /cma/compose`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmaComposePayload {
    pub subject_parcel_id: String,
    pub comps: Vec<CmaComp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding_options: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<CmaDistribution>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CmaComposeResponse {
    pub report_id: String,
    pub status: String,
}
