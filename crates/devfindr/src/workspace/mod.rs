//! Role workspaces and the panels they compose.

pub mod cma_studio;
pub mod feaso;
mod fetch;
pub mod format;
pub mod provenance;
pub mod risk_card;
mod selection;
pub mod shell;
mod state;

pub use cma_studio::{CmaStudio, CmaStudioView};
pub use feaso::{FeasoPanel, FeasoResultView};
pub use fetch::FetchScope;
pub use provenance::{ProvenancePanel, ProvenanceView};
pub use risk_card::{RiskCardPanel, RiskCardView};
pub use selection::CompSelection;
pub use shell::{
    landing_cards, sample_holdings, LandingCard, NavItem, PortfolioHolding, WorkspaceRole,
    WorkspaceShell,
};
pub use state::RequestState;
