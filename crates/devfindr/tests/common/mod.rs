#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use devfindr::client::{ApiError, PlatformApi};
use devfindr::contracts::{
    CmaComposePayload, CmaComposeResponse, DaApplication, DaSearchQuery, FeasoInputs,
    FeasoOutputs, HealthStatus, OutreachRequest, OutreachResponse, ParcelSearchQuery,
    ParcelSearchResponse, ParcelSummary, ProvenanceEntry, RiskCardMetrics, RiskCardResponse,
    SensitivityRow,
};

/// In-memory platform API that records what the panels send.
#[derive(Default)]
pub struct StubApi {
    pub parcels: Vec<ParcelSummary>,
    pub risk_cards: HashMap<String, RiskCardResponse>,
    pub provenance: HashMap<(String, String), Vec<ProvenanceEntry>>,
    /// Risk-card requests for these parcel ids never complete.
    pub stalled_risk_cards: HashSet<String>,
    pub fail_compose: bool,
    pub fail_feaso: bool,
    pub searches: Mutex<Vec<ParcelSearchQuery>>,
    pub composed: Mutex<Vec<CmaComposePayload>>,
    pub feaso_runs: Mutex<Vec<FeasoInputs>>,
}

impl StubApi {
    pub fn with_parcels(parcels: Vec<ParcelSummary>) -> Self {
        Self {
            parcels,
            ..Self::default()
        }
    }

    pub fn add_risk_card(&mut self, parcel: ParcelSummary) {
        self.risk_cards
            .insert(parcel.id.clone(), risk_card_for(parcel));
    }

    pub fn add_provenance(&mut self, entity_type: &str, entity_id: &str, source_name: &str) {
        self.provenance
            .entry((entity_type.to_string(), entity_id.to_string()))
            .or_default()
            .push(provenance_entry(source_name));
    }

    pub fn composed(&self) -> Vec<CmaComposePayload> {
        self.composed.lock().expect("compose mutex").clone()
    }

    pub fn feaso_runs(&self) -> Vec<FeasoInputs> {
        self.feaso_runs.lock().expect("feaso mutex").clone()
    }
}

fn failure(path: &str, status: u16) -> ApiError {
    ApiError::Status {
        url: format!("http://stub{path}"),
        status,
        body: "stub failure".to_string(),
    }
}

#[async_trait]
impl PlatformApi for StubApi {
    async fn health(&self) -> Result<HealthStatus, ApiError> {
        Ok(HealthStatus {
            status: "ok".to_string(),
        })
    }

    async fn search_parcels(
        &self,
        query: &ParcelSearchQuery,
    ) -> Result<ParcelSearchResponse, ApiError> {
        self.searches
            .lock()
            .expect("search mutex")
            .push(query.clone());
        Ok(ParcelSearchResponse {
            items: self.parcels.clone(),
            next_cursor: None,
        })
    }

    async fn risk_card(&self, parcel_id: &str) -> Result<RiskCardResponse, ApiError> {
        if self.stalled_risk_cards.contains(parcel_id) {
            std::future::pending::<()>().await;
        }
        self.risk_cards
            .get(parcel_id)
            .cloned()
            .ok_or_else(|| failure(&format!("/parcels/{parcel_id}/risk-card"), 404))
    }

    async fn provenance(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Result<Vec<ProvenanceEntry>, ApiError> {
        self.provenance
            .get(&(entity_type.to_string(), entity_id.to_string()))
            .cloned()
            .ok_or_else(|| failure(&format!("/provenance/{entity_type}/{entity_id}"), 404))
    }

    async fn compose_cma(
        &self,
        payload: &CmaComposePayload,
    ) -> Result<CmaComposeResponse, ApiError> {
        self.composed
            .lock()
            .expect("compose mutex")
            .push(payload.clone());
        if self.fail_compose {
            return Err(failure("/cma/compose", 500));
        }
        Ok(CmaComposeResponse {
            report_id: "rep-42".to_string(),
            status: "queued".to_string(),
        })
    }

    async fn run_feaso(&self, inputs: &FeasoInputs) -> Result<FeasoOutputs, ApiError> {
        self.feaso_runs
            .lock()
            .expect("feaso mutex")
            .push(inputs.clone());
        if self.fail_feaso {
            return Err(failure("/feaso/run", 503));
        }
        Ok(FeasoOutputs {
            feaso_run_id: "run-1".to_string(),
            irr_pct: 17.5,
            residual: 850_000.0,
            profit_margin_pct: 21.456,
            sensitivity: vec![SensitivityRow {
                metric: Some("revenue".to_string()),
                delta_pct: 10.0,
                irr_pct: 22.1,
            }],
            provenance: Vec::new(),
        })
    }

    async fn search_da(&self, _query: &DaSearchQuery) -> Result<Vec<DaApplication>, ApiError> {
        Ok(Vec::new())
    }

    async fn create_outreach(
        &self,
        request: &OutreachRequest,
    ) -> Result<OutreachResponse, ApiError> {
        Ok(OutreachResponse {
            outreach_id: format!("out-{}", request.owner_id),
            status: "queued".to_string(),
            sent_at: None,
        })
    }
}

pub fn priced(id: &str, price: Option<f64>) -> ParcelSummary {
    ParcelSummary {
        address: Some(format!("{id} Sample St")),
        last_sale_price: price,
        ..ParcelSummary::new(id)
    }
}

pub fn risk_card_for(parcel: ParcelSummary) -> RiskCardResponse {
    RiskCardResponse {
        metrics: RiskCardMetrics::from(&parcel),
        parcel,
        overlays: Vec::new(),
        da_precedents: Vec::new(),
        owner_masked: None,
        provenance: Vec::new(),
    }
}

pub fn provenance_entry(source_name: &str) -> ProvenanceEntry {
    ProvenanceEntry {
        id: format!("prov-{source_name}"),
        source_name: source_name.to_string(),
        source_url: "https://data.example.gov.au".to_string(),
        fetched_at: "2024-02-01T08:00:00Z".to_string(),
        license: "CC-BY-4.0".to_string(),
        terms: String::new(),
        refresh_cadence: "weekly".to_string(),
        entity_type: None,
        entity_id: None,
    }
}
