use crate::infra::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use devfindr::client::PlatformApi;
use devfindr::contracts::ParcelSummary;
use devfindr::error::AppError;
use devfindr::valuation::{estimate_band, ValuationBand};
use devfindr::workspace::provenance::ProvenanceLine;
use devfindr::workspace::shell::{ShellView, DEMO_PARCEL_ID};
use devfindr::workspace::{
    landing_cards, sample_holdings, LandingCard, PortfolioHolding, RiskCardView, WorkspaceRole,
    WorkspaceShell,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Serialize)]
pub(crate) struct WorkspaceResponse {
    pub(crate) shell: ShellView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) focus_parcel_id: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) holdings: Vec<PortfolioHolding>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValuationBandRequest {
    #[serde(default)]
    pub(crate) comps: Vec<ParcelSummary>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RiskCardPage {
    pub(crate) card: RiskCardView,
    pub(crate) provenance: Vec<ProvenanceLine>,
}

pub(crate) fn with_api_routes<A>(api: Arc<A>) -> Router
where
    A: PlatformApi + 'static,
{
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/workspaces", get(landing_endpoint))
        .route("/api/v1/workspaces/:role", get(workspace_endpoint))
        .route("/api/v1/cma/valuation-band", post(valuation_band_endpoint))
        .route(
            "/api/v1/parcels/:parcel_id/risk-card",
            get(risk_card_endpoint::<A>),
        )
        .with_state(api)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn landing_endpoint() -> Json<Vec<LandingCard>> {
    Json(landing_cards())
}

pub(crate) async fn workspace_endpoint(
    Path(role): Path<String>,
) -> Result<Json<WorkspaceResponse>, (StatusCode, Json<serde_json::Value>)> {
    let role = role.parse::<WorkspaceRole>().map_err(|err| {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": err.to_string() })),
        )
    })?;

    let (focus_parcel_id, holdings) = match role {
        WorkspaceRole::Developer | WorkspaceRole::Agent => (Some(DEMO_PARCEL_ID), Vec::new()),
        WorkspaceRole::Investor => (None, sample_holdings()),
    };

    Ok(Json(WorkspaceResponse {
        shell: WorkspaceShell::new(role).view(),
        focus_parcel_id,
        holdings,
    }))
}

pub(crate) async fn valuation_band_endpoint(
    Json(payload): Json<ValuationBandRequest>,
) -> Json<Option<ValuationBand>> {
    Json(estimate_band(&payload.comps))
}

pub(crate) async fn risk_card_endpoint<A>(
    State(api): State<Arc<A>>,
    Path(parcel_id): Path<String>,
) -> Result<Json<RiskCardPage>, AppError>
where
    A: PlatformApi + 'static,
{
    let card = api.risk_card(&parcel_id).await?;
    let provenance = match api.provenance("parcel", &parcel_id).await {
        Ok(entries) => entries.iter().map(ProvenanceLine::from).collect(),
        Err(err) => {
            warn!(%parcel_id, error = %err, "provenance unavailable for risk card");
            Vec::new()
        }
    };

    Ok(Json(RiskCardPage {
        card: RiskCardView::from(&card),
        provenance,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use devfindr::client::ApiError;
    use devfindr::contracts::{
        CmaComposePayload, CmaComposeResponse, DaApplication, DaSearchQuery, FeasoInputs,
        FeasoOutputs, HealthStatus, OutreachRequest, OutreachResponse, ParcelSearchQuery,
        ParcelSearchResponse, ProvenanceEntry, RiskCardMetrics, RiskCardResponse,
    };
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    struct FixedApi;

    fn unavailable(path: &str) -> ApiError {
        ApiError::Status {
            url: format!("http://fixed{path}"),
            status: 404,
            body: "not found".to_string(),
        }
    }

    #[async_trait]
    impl PlatformApi for FixedApi {
        async fn health(&self) -> Result<HealthStatus, ApiError> {
            Ok(HealthStatus {
                status: "ok".to_string(),
            })
        }

        async fn search_parcels(
            &self,
            _query: &ParcelSearchQuery,
        ) -> Result<ParcelSearchResponse, ApiError> {
            Ok(ParcelSearchResponse::default())
        }

        async fn risk_card(&self, parcel_id: &str) -> Result<RiskCardResponse, ApiError> {
            if parcel_id != "parcel-1" {
                return Err(unavailable("/parcels/risk-card"));
            }
            Ok(RiskCardResponse {
                parcel: ParcelSummary {
                    address: Some("10 Sample St, Marrickville NSW".to_string()),
                    ..ParcelSummary::new(parcel_id)
                },
                metrics: RiskCardMetrics {
                    area_sqm: Some(612.0),
                    frontage_m: Some(15.2),
                    slope_pct: None,
                },
                overlays: Vec::new(),
                da_precedents: Vec::new(),
                owner_masked: None,
                provenance: Vec::new(),
            })
        }

        async fn provenance(
            &self,
            _entity_type: &str,
            _entity_id: &str,
        ) -> Result<Vec<ProvenanceEntry>, ApiError> {
            Err(unavailable("/provenance"))
        }

        async fn compose_cma(
            &self,
            _payload: &CmaComposePayload,
        ) -> Result<CmaComposeResponse, ApiError> {
            Err(unavailable("/cma/compose"))
        }

        async fn run_feaso(&self, _inputs: &FeasoInputs) -> Result<FeasoOutputs, ApiError> {
            Err(unavailable("/feaso/run"))
        }

        async fn search_da(
            &self,
            _query: &DaSearchQuery,
        ) -> Result<Vec<DaApplication>, ApiError> {
            Ok(Vec::new())
        }

        async fn create_outreach(
            &self,
            _request: &OutreachRequest,
        ) -> Result<OutreachResponse, ApiError> {
            Err(unavailable("/outreach"))
        }
    }

    fn app(ready: bool) -> Router {
        let handle = PrometheusBuilder::new().build_recorder().handle();
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(handle),
        };
        with_api_routes(Arc::new(FixedApi)).layer(Extension(state))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("route responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let (status, body) = send(app(false), get_request("/ready")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, body) = send(app(true), get_request("/ready")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn workspace_route_renders_role_shell() {
        let (status, body) = send(app(true), get_request("/api/v1/workspaces/investor")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["shell"]["title"], "Investor Workspace");
        assert_eq!(body["shell"]["nav"][1]["disabled"], true);
        assert_eq!(body["holdings"][0]["last_update"], "2024-01-10");
        assert!(body.get("focus_parcel_id").is_none());

        let (status, body) = send(app(true), get_request("/api/v1/workspaces/agent")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["focus_parcel_id"], "parcel-1");
        assert!(body.get("holdings").is_none());

        let (status, body) = send(app(true), get_request("/api/v1/workspaces/landlord")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"]
            .as_str()
            .is_some_and(|message| message.contains("landlord")));
    }

    #[tokio::test]
    async fn landing_lists_every_role() {
        let (status, body) = send(app(true), get_request("/api/v1/workspaces")).await;
        assert_eq!(status, StatusCode::OK);
        let slugs: Vec<&str> = body
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|card| card["slug"].as_str())
            .collect();
        assert_eq!(slugs, vec!["developer", "agent", "investor"]);
    }

    #[tokio::test]
    async fn valuation_band_route_skips_unpriced_comps() {
        let request = post_json(
            "/api/v1/cma/valuation-band",
            json!({
                "comps": [
                    { "id": "a", "last_sale_price": 500000 },
                    { "id": "b" },
                    { "id": "c", "last_sale_price": 700000 },
                ]
            }),
        );
        let (status, body) = send(app(true), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "low": 570000, "base": 600000, "high": 630000 }));

        let request = post_json(
            "/api/v1/cma/valuation-band",
            json!({ "comps": [{ "id": "a", "last_sale_price": 0 }] }),
        );
        let (status, body) = send(app(true), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn risk_card_route_renders_view_without_provenance() {
        let (status, body) = send(app(true), get_request("/api/v1/parcels/parcel-1/risk-card")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["card"]["address"], "10 Sample St, Marrickville NSW");
        assert_eq!(body["card"]["frontage"], "15.2 m");
        assert_eq!(body["card"]["slope"], "N/A");
        assert_eq!(body["card"]["da_empty_hint"], "No DA precedents linked.");
        assert_eq!(body["provenance"], json!([]));
    }

    #[tokio::test]
    async fn risk_card_route_maps_missing_parcel_to_not_found() {
        let (status, body) = send(app(true), get_request("/api/v1/parcels/parcel-9/risk-card")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().is_some());
    }
}
