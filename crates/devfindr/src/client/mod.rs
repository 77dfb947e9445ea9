//! Access to the remote platform API.
//!
//! Panels talk to the platform through [`PlatformApi`] so they can be driven
//! by [`HttpApiClient`] in production and by in-memory gateways in tests.

mod http;

use async_trait::async_trait;

use crate::contracts::{
    CmaComposePayload, CmaComposeResponse, DaApplication, DaSearchQuery, FeasoInputs,
    FeasoOutputs, HealthStatus, OutreachRequest, OutreachResponse, ParcelSearchQuery,
    ParcelSearchResponse, ProvenanceEntry, RiskCardResponse,
};

pub use http::HttpApiClient;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid API base URL '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[async_trait]
pub trait PlatformApi: Send + Sync {
    async fn health(&self) -> Result<HealthStatus, ApiError>;

    async fn search_parcels(
        &self,
        query: &ParcelSearchQuery,
    ) -> Result<ParcelSearchResponse, ApiError>;

    async fn risk_card(&self, parcel_id: &str) -> Result<RiskCardResponse, ApiError>;

    async fn provenance(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Vec<ProvenanceEntry>, ApiError>;

    async fn compose_cma(
        &self,
        payload: &CmaComposePayload,
    ) -> Result<CmaComposeResponse, ApiError>;

    async fn run_feaso(&self, inputs: &FeasoInputs) -> Result<FeasoOutputs, ApiError>;

    async fn search_da(&self, query: &DaSearchQuery) -> Result<Vec<DaApplication>, ApiError>;

    async fn create_outreach(
        &self,
        request: &OutreachRequest,
    ) -> Result<OutreachResponse, ApiError>;
}
