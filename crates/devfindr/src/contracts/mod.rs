//! Payload shapes exchanged with the platform API.

pub mod cma;
pub mod da;
pub mod feaso;
pub mod outreach;
pub mod parcel;
pub mod provenance;
pub mod risk_card;

use serde::{Deserialize, Serialize};

pub use cma::{CmaComp, CmaComposePayload, CmaComposeResponse, CmaDistribution};
pub use da::{DaApplication, DaSearchQuery};
pub use feaso::{FeasoField, FeasoInputs, FeasoOutputs, SensitivityRow, UnknownFeasoField};
pub use outreach::{OutreachChannel, OutreachRequest, OutreachResponse};
pub use parcel::{OverlayType, ParcelSearchQuery, ParcelSearchResponse, ParcelSummary};
pub use provenance::ProvenanceEntry;
pub use risk_card::{OverlayDetail, RiskCardMetrics, RiskCardResponse};

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
