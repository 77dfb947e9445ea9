use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use super::feaso::FeasoPanel;
use super::fetch::FetchScope;
use super::format::{measure, or_placeholder};
use super::provenance::ProvenancePanel;
use super::state::RequestState;
use crate::client::PlatformApi;
use crate::contracts::RiskCardResponse;

pub const LOADING_HINT: &str = "Loading risk card…";
pub const LOAD_FAILED: &str = "Failed to load risk card";
pub const NO_PRECEDENTS_HINT: &str = "No DA precedents linked.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaPrecedentLine {
    pub id: String,
    pub proposal: String,
    pub status: String,
}

/// Render-ready risk card with every absent field replaced by a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskCardView {
    pub parcel_id: String,
    pub address: String,
    pub subtitle: String,
    pub overlay_chips: Vec<String>,
    pub area: String,
    pub frontage: String,
    pub slope: String,
    pub da_precedents: Vec<DaPrecedentLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub da_empty_hint: Option<&'static str>,
    pub owner_masked: String,
}

impl From<&RiskCardResponse> for RiskCardView {
    fn from(card: &RiskCardResponse) -> Self {
        let parcel = &card.parcel;
        let overlay_chips = card
            .overlays
            .iter()
            .map(|overlay| {
                format!(
                    "{} · {}",
                    overlay.overlay_type,
                    overlay
                        .severity
                        .as_deref()
                        .filter(|severity| !severity.is_empty())
                        .unwrap_or("n/a")
                )
            })
            .collect();

        let da_precedents: Vec<DaPrecedentLine> = card
            .da_precedents
            .iter()
            .map(|da| DaPrecedentLine {
                id: da.id.clone(),
                proposal: or_placeholder(da.proposal.as_deref()),
                status: or_placeholder(da.status.as_deref()),
            })
            .collect();

        Self {
            parcel_id: parcel.id.clone(),
            address: or_placeholder(parcel.address.as_deref()),
            subtitle: format!(
                "{} · {}",
                or_placeholder(parcel.cad_id.as_deref()),
                or_placeholder(parcel.zoning_code.as_deref())
            ),
            overlay_chips,
            area: measure(card.metrics.area_sqm, " m²"),
            frontage: measure(card.metrics.frontage_m, " m"),
            slope: measure(card.metrics.slope_pct, "%"),
            da_empty_hint: da_precedents.is_empty().then_some(NO_PRECEDENTS_HINT),
            da_precedents,
            owner_masked: or_placeholder(card.owner_masked.as_deref()),
        }
    }
}

/// Developer-workspace parcel card with its feasibility and provenance panels.
pub struct RiskCardPanel<A> {
    api: Arc<A>,
    parcel_id: String,
    card: RequestState<RiskCardResponse>,
    fetch: FetchScope<RiskCardResponse>,
    feaso: FeasoPanel<A>,
    provenance: ProvenancePanel<A>,
}

impl<A: PlatformApi + 'static> RiskCardPanel<A> {
    pub fn new(api: Arc<A>, parcel_id: impl Into<String>) -> Self {
        let parcel_id = parcel_id.into();
        Self {
            feaso: FeasoPanel::new(Arc::clone(&api), parcel_id.clone()),
            provenance: ProvenancePanel::new(Arc::clone(&api), "parcel", parcel_id.clone()),
            api,
            parcel_id,
            card: RequestState::Idle,
            fetch: FetchScope::new("risk-card"),
        }
    }

    pub fn parcel_id(&self) -> &str {
        &self.parcel_id
    }

    /// Starts the risk-card and provenance fetches.
    pub fn mount(&mut self) {
        let api = Arc::clone(&self.api);
        let parcel_id = self.parcel_id.clone();
        self.card = RequestState::Loading;
        self.fetch
            .start(async move { api.risk_card(&parcel_id).await });
        self.provenance.mount();
    }

    /// Re-keys the card and its child panels to another parcel. A response
    /// still in flight for the previous parcel is never applied.
    pub fn set_parcel_id(&mut self, parcel_id: impl Into<String>) {
        let parcel_id = parcel_id.into();
        if parcel_id == self.parcel_id {
            return;
        }
        self.parcel_id = parcel_id.clone();
        self.feaso.set_parcel_id(parcel_id.clone());

        let api = Arc::clone(&self.api);
        self.card = RequestState::Loading;
        let key = parcel_id.clone();
        self.fetch.start(async move { api.risk_card(&key).await });
        self.provenance.rekey("parcel", parcel_id);
    }

    pub async fn settle(&mut self) {
        if let Some(outcome) = self.fetch.settle().await {
            self.card = match outcome {
                Ok(card) => RequestState::Ready(card),
                Err(err) => {
                    error!(parcel_id = %self.parcel_id, error = %err, "risk card fetch failed");
                    RequestState::Failed(LOAD_FAILED.to_string())
                }
            };
        }
        self.provenance.settle().await;
    }

    pub fn state(&self) -> &RequestState<RiskCardResponse> {
        &self.card
    }

    pub fn view(&self) -> Option<RiskCardView> {
        self.card.ready().map(RiskCardView::from)
    }

    pub fn status_line(&self) -> Option<&str> {
        match &self.card {
            RequestState::Idle | RequestState::Loading => Some(LOADING_HINT),
            RequestState::Failed(message) => Some(message.as_str()),
            RequestState::Ready(_) => None,
        }
    }

    pub fn feaso(&self) -> &FeasoPanel<A> {
        &self.feaso
    }

    pub fn feaso_mut(&mut self) -> &mut FeasoPanel<A> {
        &mut self.feaso
    }

    pub fn provenance(&self) -> &ProvenancePanel<A> {
        &self.provenance
    }

    pub fn provenance_mut(&mut self) -> &mut ProvenancePanel<A> {
        &mut self.provenance
    }
}
