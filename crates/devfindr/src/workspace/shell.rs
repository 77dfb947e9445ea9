use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::format::currency;

pub const PRODUCT_NAME: &str = "DevFindr + PricePro";
pub const PRODUCT_TAGLINE: &str =
    "Dual-app platform delivering explainable parcel intelligence, feasibility, and CMAs with provenance.";
/// Parcel the developer and agent workspaces open on.
pub const DEMO_PARCEL_ID: &str = "parcel-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceRole {
    Developer,
    Agent,
    Investor,
}

impl WorkspaceRole {
    pub fn ordered() -> [Self; 3] {
        [Self::Developer, Self::Agent, Self::Investor]
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Developer => "developer",
            Self::Agent => "agent",
            Self::Investor => "investor",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Developer => "Developer Workspace",
            Self::Agent => "Agent Workspace",
            Self::Investor => "Investor Workspace",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Developer => "Screen parcels, assess risks, and launch feasibility.",
            Self::Agent => "Build CMA packages and share branded reports.",
            Self::Investor => "Monitor equity positions and plan renovation ROI.",
        }
    }

    /// Short blurb used on the landing page card.
    pub fn summary(self) -> &'static str {
        match self {
            Self::Developer => "Site pipeline, risk cards, feasibility.",
            Self::Agent => "CMA Studio and branded reports.",
            Self::Investor => "Portfolio tracking and renovation ROI.",
        }
    }

    pub fn nav_items(self) -> Vec<NavItem> {
        match self {
            Self::Developer => vec![
                NavItem::live("/developer", "Parcel Pipeline"),
                NavItem::live("/developer/feaso", "Feaso-in-a-Click"),
                NavItem::soon("/developer/outreach", "Outreach Lists"),
            ],
            Self::Agent => vec![
                NavItem::live("/agent", "CMA Studio"),
                NavItem::soon("/agent/reports", "Branded Reports"),
            ],
            Self::Investor => vec![
                NavItem::live("/investor", "Portfolio Tracker"),
                NavItem::soon("/investor/roi", "Renovation ROI"),
            ],
        }
    }
}

impl fmt::Display for WorkspaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown workspace role '{}' (expected developer, agent or investor)",
            self.0
        )
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for WorkspaceRole {
    type Err = UnknownRole;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|role| role.slug() == normalized)
            .ok_or_else(|| UnknownRole(raw.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub href: &'static str,
    pub label: &'static str,
    pub disabled: bool,
}

impl NavItem {
    fn live(href: &'static str, label: &'static str) -> Self {
        Self {
            href,
            label,
            disabled: false,
        }
    }

    fn soon(href: &'static str, label: &'static str) -> Self {
        Self {
            href,
            label,
            disabled: true,
        }
    }

    /// Label with the "Soon" badge appended for disabled entries.
    pub fn display_label(&self) -> String {
        if self.disabled {
            format!("{} (Soon)", self.label)
        } else {
            self.label.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShellView {
    pub role: WorkspaceRole,
    pub title: &'static str,
    pub description: &'static str,
    pub nav_open: bool,
    pub nav_toggle_label: &'static str,
    pub nav: Vec<NavItem>,
}

/// Header and navigation frame shared by every role workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceShell {
    role: WorkspaceRole,
    nav_open: bool,
}

impl WorkspaceShell {
    pub fn new(role: WorkspaceRole) -> Self {
        Self {
            role,
            nav_open: true,
        }
    }

    pub fn role(&self) -> WorkspaceRole {
        self.role
    }

    pub fn toggle_nav(&mut self) -> bool {
        self.nav_open = !self.nav_open;
        self.nav_open
    }

    pub fn is_nav_open(&self) -> bool {
        self.nav_open
    }

    pub fn nav_toggle_label(&self) -> &'static str {
        if self.nav_open {
            "Hide navigation"
        } else {
            "Show navigation"
        }
    }

    pub fn view(&self) -> ShellView {
        ShellView {
            role: self.role,
            title: self.role.title(),
            description: self.role.description(),
            nav_open: self.nav_open,
            nav_toggle_label: self.nav_toggle_label(),
            nav: if self.nav_open {
                self.role.nav_items()
            } else {
                Vec::new()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LandingCard {
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub href: String,
}

pub fn landing_cards() -> Vec<LandingCard> {
    WorkspaceRole::ordered()
        .into_iter()
        .map(|role| LandingCard {
            slug: role.slug(),
            title: role.title(),
            description: role.summary(),
            href: format!("/{}", role.slug()),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioHolding {
    pub id: String,
    pub address: String,
    pub equity: f64,
    pub last_update: NaiveDate,
}

impl PortfolioHolding {
    pub fn equity_display(&self) -> String {
        currency(self.equity)
    }
}

/// Placeholder holdings shown until a portfolio source is connected.
pub fn sample_holdings() -> Vec<PortfolioHolding> {
    let holding = |id: &str, address: &str, equity: f64, (y, m, d): (i32, u32, u32)| {
        NaiveDate::from_ymd_opt(y, m, d).map(|last_update| PortfolioHolding {
            id: id.to_string(),
            address: address.to_string(),
            equity,
            last_update,
        })
    };

    [
        holding(
            "parcel-1",
            "10 Sample St, Marrickville NSW",
            820_000.0,
            (2024, 1, 10),
        ),
        holding(
            "parcel-2",
            "25 Oak Ave, Coorparoo QLD",
            540_000.0,
            (2024, 1, 5),
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!("Agent".parse::<WorkspaceRole>(), Ok(WorkspaceRole::Agent));
        assert_eq!(
            " investor ".parse::<WorkspaceRole>(),
            Ok(WorkspaceRole::Investor)
        );
        assert_eq!(
            "landlord".parse::<WorkspaceRole>(),
            Err(UnknownRole("landlord".to_string()))
        );
    }

    #[test]
    fn every_role_has_one_live_entry_point() {
        for role in WorkspaceRole::ordered() {
            let items = role.nav_items();
            assert_eq!(items[0].href, format!("/{}", role.slug()));
            assert!(!items[0].disabled);
            assert!(items.iter().any(|item| item.disabled));
        }
    }

    #[test]
    fn collapsing_navigation_hides_items() {
        let mut shell = WorkspaceShell::new(WorkspaceRole::Developer);
        assert_eq!(shell.view().nav.len(), 3);
        assert_eq!(shell.nav_toggle_label(), "Hide navigation");

        assert!(!shell.toggle_nav());
        let view = shell.view();
        assert!(view.nav.is_empty());
        assert_eq!(view.nav_toggle_label, "Show navigation");
    }

    #[test]
    fn disabled_items_carry_soon_badge() {
        let items = WorkspaceRole::Agent.nav_items();
        assert_eq!(items[1].display_label(), "Branded Reports (Soon)");
        assert_eq!(items[0].display_label(), "CMA Studio");
    }

    #[test]
    fn sample_holdings_render_equity() {
        let holdings = sample_holdings();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings[0].equity_display(), "$820,000");
        assert_eq!(holdings[1].last_update.to_string(), "2024-01-05");
    }
}
