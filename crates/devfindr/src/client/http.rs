use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::{ApiError, PlatformApi};
use crate::config::ApiConfig;
use crate::contracts::da::DaSearchResponse;
use crate::contracts::provenance::ProvenanceResponse;
use crate::contracts::{
    CmaComposePayload, CmaComposeResponse, DaApplication, DaSearchQuery, FeasoInputs,
    FeasoOutputs, HealthStatus, OutreachRequest, OutreachResponse, ParcelSearchQuery,
    ParcelSearchResponse, ProvenanceEntry, RiskCardResponse,
};
use crate::error::AppError;

/// JSON-over-HTTP client for the platform API.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: Url,
}

impl HttpApiClient {
    /// Builds a client rooted at `base_url`. Any path on the base URL is kept
    /// and endpoint segments are appended to it.
    pub fn new(base_url: &str, timeout: Option<std::time::Duration>) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url.trim()).map_err(|err| ApiError::InvalidBaseUrl {
            value: base_url.to_string(),
            reason: err.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                value: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| ApiError::Transport {
            url: base_url.to_string(),
            source,
        })?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, AppError> {
        let base_url = config.base_url()?;
        Ok(Self::new(base_url, config.timeout)?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl {
                value: self.base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url.clone())
            .query(query)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        decode(&url, response).await
    }

    async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!(%url, "POST");
        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        decode(&url, response).await
    }
}

async fn decode<T: DeserializeOwned>(url: &Url, response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(|source| ApiError::Transport {
        url: url.to_string(),
        source,
    })?;

    if !status.is_success() {
        warn!(%url, status = status.as_u16(), "platform API returned an error status");
        return Err(ApiError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|source| ApiError::Decode {
        url: url.to_string(),
        source,
    })
}

#[async_trait]
impl PlatformApi for HttpApiClient {
    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = self.endpoint(&["health"])?;
        self.get_json(url, &[]).await
    }

    async fn search_parcels(
        &self,
        query: &ParcelSearchQuery,
    ) -> Result<ParcelSearchResponse, ApiError> {
        let url = self.endpoint(&["parcels", "search"])?;
        self.get_json(url, &query.to_pairs()).await
    }

    async fn risk_card(&self, parcel_id: &str) -> Result<RiskCardResponse, ApiError> {
        let url = self.endpoint(&["parcels", parcel_id, "risk-card"])?;
        self.get_json(url, &[]).await
    }

    async fn provenance(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Vec<ProvenanceEntry>, ApiError> {
        let url = self.endpoint(&["provenance", entity_type, entity_id])?;
        let response: ProvenanceResponse = self.get_json(url, &[]).await?;
        Ok(response.items)
    }

    async fn compose_cma(
        &self,
        payload: &CmaComposePayload,
    ) -> Result<CmaComposeResponse, ApiError> {
        let url = self.endpoint(&["cma", "compose"])?;
        self.post_json(url, payload).await
    }

    async fn run_feaso(&self, inputs: &FeasoInputs) -> Result<FeasoOutputs, ApiError> {
        let url = self.endpoint(&["feaso", "run"])?;
        self.post_json(url, inputs).await
    }

    async fn search_da(&self, query: &DaSearchQuery) -> Result<Vec<DaApplication>, ApiError> {
        let url = self.endpoint(&["da", "search"])?;
        let response: DaSearchResponse = self.get_json(url, &query.to_pairs()).await?;
        Ok(response.items)
    }

    async fn create_outreach(
        &self,
        request: &OutreachRequest,
    ) -> Result<OutreachResponse, ApiError> {
        let url = self.endpoint(&["outreach"])?;
        self.post_json(url, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_extend_base_path_and_escape_segments() {
        let client = HttpApiClient::new("https://api.devfindr.test/v1/", None).expect("client");
        let url = client
            .endpoint(&["parcels", "lot 7/DP1234", "risk-card"])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://api.devfindr.test/v1/parcels/lot%207%2FDP1234/risk-card"
        );

        let bare = HttpApiClient::new("http://localhost:8000", None).expect("client");
        assert_eq!(
            bare.endpoint(&["cma", "compose"]).expect("url").as_str(),
            "http://localhost:8000/cma/compose"
        );
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            HttpApiClient::new("not a url", None),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            HttpApiClient::new("mailto:ops@devfindr.test", None),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn from_config_requires_base_url() {
        let err = HttpApiClient::from_config(&ApiConfig::default()).expect_err("missing url");
        assert!(matches!(
            err,
            AppError::Config(crate::config::ConfigError::MissingApiBaseUrl)
        ));
    }
}
