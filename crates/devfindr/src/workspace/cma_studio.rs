use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::fetch::FetchScope;
use super::format::{currency_or_placeholder, or_placeholder};
use super::selection::CompSelection;
use crate::client::PlatformApi;
use crate::contracts::{CmaComposePayload, CmaDistribution, ParcelSearchQuery, ParcelSummary};
use crate::valuation::{ValuationBand, ValuationMemo};

pub const IDLE_HINT: &str = "Select comps to enable PDF export.";
pub const GENERATING: &str = "Generating…";
pub const COMPOSE_FAILED: &str = "Failed to queue report";
pub const EMPTY_SELECTION_HINT: &str = "Drag comps into your selection.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompCard {
    pub parcel_id: String,
    pub address: String,
    pub cad_id: String,
    pub last_sale_price: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandView {
    pub base: String,
    pub range: String,
}

impl From<ValuationBand> for BandView {
    fn from(band: ValuationBand) -> Self {
        Self {
            base: currency_or_placeholder(Some(band.base as f64)),
            range: format!(
                "Range {} - {}",
                currency_or_placeholder(Some(band.low as f64)),
                currency_or_placeholder(Some(band.high as f64))
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CmaStudioView {
    pub subject_parcel_id: String,
    pub candidates: Vec<CompCard>,
    pub selection: Vec<CompCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection_hint: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<BandView>,
    pub status: String,
    pub can_compose: bool,
}

/// Agent-workspace comparable-sales composer.
pub struct CmaStudio<A> {
    api: Arc<A>,
    subject_parcel_id: String,
    agent_name: String,
    distribution: Option<CmaDistribution>,
    candidates: Vec<ParcelSummary>,
    selection: CompSelection,
    memo: ValuationMemo,
    status: Option<String>,
    fetch: FetchScope<Vec<ParcelSummary>>,
}

impl<A: PlatformApi + 'static> CmaStudio<A> {
    pub fn new(
        api: Arc<A>,
        subject_parcel_id: impl Into<String>,
        agent_name: impl Into<String>,
    ) -> Self {
        Self {
            api,
            subject_parcel_id: subject_parcel_id.into(),
            agent_name: agent_name.into(),
            distribution: None,
            candidates: Vec::new(),
            selection: CompSelection::new(),
            memo: ValuationMemo::default(),
            status: None,
            fetch: FetchScope::new("cma-candidates"),
        }
    }

    pub fn with_distribution(mut self, distribution: CmaDistribution) -> Self {
        self.distribution = Some(distribution);
        self
    }

    /// Loads candidate comparables with an empty search.
    pub fn mount(&mut self) {
        let api = Arc::clone(&self.api);
        self.fetch.start(async move {
            let response = api.search_parcels(&ParcelSearchQuery::default()).await?;
            Ok(response.items)
        });
    }

    pub async fn settle(&mut self) {
        if let Some(outcome) = self.fetch.settle().await {
            match outcome {
                Ok(items) => self.candidates = items,
                Err(err) => error!(error = %err, "comparable search failed"),
            }
        }
    }

    pub fn subject_parcel_id(&self) -> &str {
        &self.subject_parcel_id
    }

    pub fn candidates(&self) -> &[ParcelSummary] {
        &self.candidates
    }

    /// Replaces the candidate list, e.g. with comparables imported from CSV.
    pub fn set_candidates(&mut self, candidates: Vec<ParcelSummary>) {
        self.fetch.cancel();
        self.candidates = candidates;
    }

    pub fn selection(&self) -> &CompSelection {
        &self.selection
    }

    pub fn add_comp(&mut self, parcel: ParcelSummary) -> bool {
        self.selection.add(parcel)
    }

    /// Adds the candidate with `parcel_id`. Unknown ids are ignored.
    pub fn add_candidate(&mut self, parcel_id: &str) -> bool {
        let Some(parcel) = self
            .candidates
            .iter()
            .find(|candidate| candidate.id == parcel_id)
            .cloned()
        else {
            warn!(parcel_id, "comparable not among loaded candidates");
            return false;
        };
        self.selection.add(parcel)
    }

    pub fn remove_comp(&mut self, parcel_id: &str) -> bool {
        self.selection.remove(parcel_id)
    }

    pub fn valuation_band(&mut self) -> Option<ValuationBand> {
        self.memo
            .get(self.selection.revision(), self.selection.items())
    }

    pub fn can_compose(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn compose_payload(&self) -> CmaComposePayload {
        let mut branding = BTreeMap::new();
        branding.insert("agent_name".to_string(), self.agent_name.clone());

        CmaComposePayload {
            subject_parcel_id: self.subject_parcel_id.clone(),
            comps: self.selection.to_comps(),
            branding_options: Some(branding),
            distribution: self.distribution.clone(),
        }
    }

    /// Queues the CMA report and returns the resulting status line. Does
    /// nothing while the selection is empty.
    pub async fn compose(&mut self) -> &str {
        if !self.can_compose() {
            return self.status_line();
        }

        self.status = Some(GENERATING.to_string());
        let payload = self.compose_payload();
        let status = match self.api.compose_cma(&payload).await {
            Ok(report) => {
                info!(
                    report_id = %report.report_id,
                    status = %report.status,
                    comps = payload.comps.len(),
                    "CMA report queued"
                );
                format!("Report {} {}", report.report_id, report.status)
            }
            Err(err) => {
                error!(error = %err, "CMA compose failed");
                COMPOSE_FAILED.to_string()
            }
        };
        self.status = Some(status);
        self.status_line()
    }

    pub fn status_line(&self) -> &str {
        match self.status.as_deref() {
            Some(status) if !status.is_empty() => status,
            _ => IDLE_HINT,
        }
    }

    pub fn view(&mut self) -> CmaStudioView {
        let band = self.valuation_band().map(BandView::from);
        let candidates = self
            .candidates
            .iter()
            .map(|parcel| comp_card(parcel, self.selection.contains(&parcel.id)))
            .collect();
        let selection = self
            .selection
            .items()
            .iter()
            .map(|parcel| comp_card(parcel, true))
            .collect();

        CmaStudioView {
            subject_parcel_id: self.subject_parcel_id.clone(),
            candidates,
            selection,
            selection_hint: self.selection.is_empty().then_some(EMPTY_SELECTION_HINT),
            band,
            status: self.status_line().to_string(),
            can_compose: self.can_compose(),
        }
    }
}

fn comp_card(parcel: &ParcelSummary, selected: bool) -> CompCard {
    CompCard {
        parcel_id: parcel.id.clone(),
        address: or_placeholder(parcel.address.as_deref()),
        cad_id: or_placeholder(parcel.cad_id.as_deref()),
        last_sale_price: currency_or_placeholder(parcel.last_sale_price),
        selected,
    }
}
