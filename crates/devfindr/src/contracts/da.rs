use serde::{Deserialize, Serialize};

/// A development application linked to a parcel or returned from DA search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DaApplication {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lga_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub da_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Filters accepted by `GET /da/search`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DaSearchQuery {
    pub lga: Option<String>,
    pub status: Option<String>,
    pub since: Option<chrono::NaiveDate>,
}

impl DaSearchQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(lga) = &self.lga {
            pairs.push(("lga", lga.clone()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        if let Some(since) = self.since {
            pairs.push(("since", since.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DaSearchResponse {
    #[serde(default)]
    pub(crate) items: Vec<DaApplication>,
}
