use crate::infra::{connect, parse_feaso_assignment, parse_role};
use clap::Args;
use devfindr::client::PlatformApi;
use devfindr::contracts::{FeasoField, OverlayType, ParcelSearchQuery, ParcelSummary};
use devfindr::error::AppError;
use devfindr::valuation::import::comps_from_path;
use devfindr::valuation::{estimate_band, ValuationBand};
use devfindr::workspace::cma_studio::BandView;
use devfindr::workspace::format::{currency_or_placeholder, measure, or_placeholder};
use devfindr::workspace::provenance::ProvenanceLine;
use devfindr::workspace::shell::{DEMO_PARCEL_ID, PRODUCT_NAME, PRODUCT_TAGLINE};
use devfindr::workspace::{
    landing_cards, sample_holdings, CmaStudio, CompSelection, FeasoPanel, RequestState,
    RiskCardPanel, RiskCardView, WorkspaceRole, WorkspaceShell,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct WorkspaceArgs {
    /// Workspace to open: developer, agent or investor
    #[arg(value_parser = parse_role)]
    pub(crate) role: WorkspaceRole,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    /// Free-text query (address, CAD id, suburb)
    #[arg(long, default_value = "")]
    pub(crate) q: String,
    /// Restrict to a zoning code; repeat for several
    #[arg(long)]
    pub(crate) zoning: Vec<String>,
    /// Minimum site area in square metres
    #[arg(long)]
    pub(crate) min_area: Option<f64>,
    /// Maximum slope percentage
    #[arg(long)]
    pub(crate) max_slope: Option<f64>,
    /// Only parcels carrying this overlay
    #[arg(long)]
    pub(crate) overlay: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct RiskCardArgs {
    /// Parcel identifier
    pub(crate) parcel_id: String,
}

#[derive(Args, Debug)]
pub(crate) struct ProvenanceArgs {
    /// Entity type, e.g. parcel
    pub(crate) entity_type: String,
    /// Entity identifier
    pub(crate) entity_id: String,
}

#[derive(Args, Debug)]
pub(crate) struct CmaArgs {
    /// Subject parcel for the report
    #[arg(long, default_value = DEMO_PARCEL_ID)]
    pub(crate) subject: String,
    /// Comparable parcel id to select; repeat to add more. Selects every candidate when omitted.
    #[arg(long = "comp")]
    pub(crate) comps: Vec<String>,
    /// Comparables CSV to use instead of searching the platform
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Queue the branded CMA report once the selection is built
    #[arg(long)]
    pub(crate) compose: bool,
}

#[derive(Args, Debug)]
pub(crate) struct FeasoArgs {
    /// Parcel to evaluate
    #[arg(long, default_value = DEMO_PARCEL_ID)]
    pub(crate) parcel: String,
    /// Override an assumption, e.g. --set build_cost_m2=2450
    #[arg(long = "set", value_parser = parse_feaso_assignment)]
    pub(crate) overrides: Vec<(FeasoField, String)>,
}

pub(crate) fn run_workspace(args: WorkspaceArgs) -> Result<(), AppError> {
    let shell = WorkspaceShell::new(args.role);
    let view = shell.view();

    println!("{PRODUCT_NAME}");
    println!("{PRODUCT_TAGLINE}");
    println!("\n{}", view.title);
    println!("{}", view.description);

    println!("\nNavigation");
    for item in &view.nav {
        println!("- {} ({})", item.display_label(), item.href);
    }

    match args.role {
        WorkspaceRole::Developer => {
            println!("\nParcel pipeline opens on {DEMO_PARCEL_ID}; see `devfindr risk-card {DEMO_PARCEL_ID}`.");
        }
        WorkspaceRole::Agent => {
            println!("\nCMA studio subject parcel: {DEMO_PARCEL_ID}; see `devfindr cma`.");
        }
        WorkspaceRole::Investor => {
            println!("\nPortfolio overview");
            println!("Connect a portfolio source to display live holdings.");
            for holding in sample_holdings() {
                println!(
                    "- {} | equity {} | updated {}",
                    holding.address,
                    holding.equity_display(),
                    holding.last_update
                );
            }
        }
    }

    println!("\nOther workspaces");
    for card in landing_cards()
        .into_iter()
        .filter(|card| card.slug != args.role.slug())
    {
        println!("- {}: {} ({})", card.title, card.description, card.href);
    }

    Ok(())
}

pub(crate) async fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let (_, api) = connect()?;
    let SearchArgs {
        q,
        zoning,
        min_area,
        max_slope,
        overlay,
    } = args;
    let query = ParcelSearchQuery {
        q,
        zoning,
        min_area,
        max_slope,
        overlay: overlay.map(OverlayType::from),
        ..ParcelSearchQuery::default()
    };

    let response = api.search_parcels(&query).await?;
    if response.items.is_empty() {
        println!("No parcels matched.");
        return Ok(());
    }

    println!("{} parcel(s)", response.items.len());
    for parcel in &response.items {
        render_parcel_line(parcel);
    }
    if let Some(cursor) = response.next_cursor {
        println!("More results available (cursor {cursor})");
    }
    Ok(())
}

pub(crate) async fn run_risk_card(args: RiskCardArgs) -> Result<(), AppError> {
    let (_, api) = connect()?;
    let mut panel = RiskCardPanel::new(api, args.parcel_id);
    panel.mount();
    panel.settle().await;

    match panel.view() {
        Some(view) => render_risk_card(&view),
        None => {
            if let Some(status) = panel.status_line() {
                println!("{status}");
            }
            return Ok(());
        }
    }

    let provenance = panel.provenance().view();
    if provenance.entries.is_empty() {
        println!("\nProvenance: none recorded");
    } else {
        println!("\nProvenance");
        for line in &provenance.entries {
            render_provenance_line(line);
        }
    }
    Ok(())
}

pub(crate) async fn run_provenance(args: ProvenanceArgs) -> Result<(), AppError> {
    let (_, api) = connect()?;
    let entries = api.provenance(&args.entity_type, &args.entity_id).await?;

    if entries.is_empty() {
        println!(
            "No provenance recorded for {} {}",
            args.entity_type, args.entity_id
        );
        return Ok(());
    }

    println!("Provenance for {} {}", args.entity_type, args.entity_id);
    for entry in &entries {
        render_provenance_line(&ProvenanceLine::from(entry));
    }
    Ok(())
}

pub(crate) async fn run_cma(args: CmaArgs) -> Result<(), AppError> {
    let CmaArgs {
        subject,
        comps,
        csv,
        compose,
    } = args;
    let imported = csv.map(comps_from_path).transpose()?;

    if !compose {
        if let Some(candidates) = imported {
            println!("CMA for {subject} (offline, comparables from CSV)");
            let selection = select_offline(candidates, &comps);
            for parcel in selection.items() {
                render_parcel_line(parcel);
            }
            render_band(estimate_band(selection.items()));
            return Ok(());
        }
    }

    let (config, api) = connect()?;
    let mut studio = CmaStudio::new(api, subject, config.branding.agent_name);
    match imported {
        Some(candidates) => studio.set_candidates(candidates),
        None => {
            studio.mount();
            studio.settle().await;
        }
    }

    if comps.is_empty() {
        for parcel in studio.candidates().to_vec() {
            studio.add_comp(parcel);
        }
    } else {
        for id in &comps {
            studio.add_candidate(id);
        }
    }

    let view = studio.view();
    println!("CMA for {}", view.subject_parcel_id);
    println!("{} candidate(s), {} selected", view.candidates.len(), view.selection.len());
    if let Some(hint) = view.selection_hint {
        println!("{hint}");
    }
    for card in &view.selection {
        println!(
            "- {} | {} | {} | last sale {}",
            card.parcel_id, card.address, card.cad_id, card.last_sale_price
        );
    }
    match view.band {
        Some(band) => render_band_view(&band),
        None => println!("Valuation band: not enough priced comparables"),
    }

    if compose {
        println!("{}", studio.compose().await);
    } else {
        println!("{}", view.status);
    }
    Ok(())
}

pub(crate) async fn run_feaso(args: FeasoArgs) -> Result<(), AppError> {
    let (_, api) = connect()?;
    let mut panel = FeasoPanel::new(api, args.parcel);
    for (field, raw) in &args.overrides {
        panel.set_field(*field, raw);
    }

    println!("Feasibility inputs for {}", panel.parcel_id());
    for (field, value) in panel.editable_fields() {
        println!("- {}: {}", field.label(), value);
    }

    match panel.run().await {
        RequestState::Ready(_) => {}
        RequestState::Failed(message) => {
            println!("\n{message}");
            return Ok(());
        }
        RequestState::Idle | RequestState::Loading => return Ok(()),
    }

    if let Some(result) = panel.result_view() {
        println!("\nRun {}", result.feaso_run_id);
        println!(
            "IRR {} | Residual {} | Margin {}",
            result.irr, result.residual, result.margin
        );
        if !result.sensitivity.is_empty() {
            println!("Sensitivity");
            for row in &result.sensitivity {
                println!("- {} -> {}", row.revenue_shift, row.irr);
            }
        }
    }
    Ok(())
}

pub(crate) async fn run_health() -> Result<(), AppError> {
    let (config, api) = connect()?;
    let health = api.health().await?;
    let base_url = config.api.base_url.unwrap_or_default();
    if health.is_ok() {
        println!("Platform API at {base_url} is healthy");
    } else {
        println!("Platform API at {base_url} reported '{}'", health.status);
    }
    Ok(())
}

fn select_offline(candidates: Vec<ParcelSummary>, ids: &[String]) -> CompSelection {
    let mut selection = CompSelection::new();
    if ids.is_empty() {
        for parcel in candidates {
            selection.add(parcel);
        }
        return selection;
    }

    for id in ids {
        match candidates.iter().find(|parcel| &parcel.id == id) {
            Some(parcel) => {
                selection.add(parcel.clone());
            }
            None => println!("Skipping {id}: not in the comparables file"),
        }
    }
    selection
}

fn render_parcel_line(parcel: &ParcelSummary) {
    let overlays = if parcel.overlays.is_empty() {
        "none".to_string()
    } else {
        parcel
            .overlays
            .iter()
            .map(|overlay| overlay.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    println!(
        "- {} | {} | zoning {} | area {} | last sale {} | overlays {}",
        parcel.id,
        or_placeholder(parcel.address.as_deref()),
        or_placeholder(parcel.zoning_code.as_deref()),
        measure(parcel.area_sqm, " m²"),
        currency_or_placeholder(parcel.last_sale_price),
        overlays
    );
}

fn render_risk_card(view: &RiskCardView) {
    println!("{}", view.address);
    println!("{}", view.subtitle);
    if view.overlay_chips.is_empty() {
        println!("Overlays: none");
    } else {
        println!("Overlays: {}", view.overlay_chips.join(" | "));
    }
    println!(
        "Area {} | Frontage {} | Slope {}",
        view.area, view.frontage, view.slope
    );
    println!("Owner: {}", view.owner_masked);

    match view.da_empty_hint {
        Some(hint) => println!("\n{hint}"),
        None => {
            println!("\nDA precedents");
            for da in &view.da_precedents {
                println!("- {}: {} ({})", da.id, da.proposal, da.status);
            }
        }
    }
}

fn render_provenance_line(line: &ProvenanceLine) {
    println!(
        "- {} ({}) | licence {} | fetched {} | refresh {}",
        line.source_name, line.source_url, line.licence, line.last_fetched, line.refresh_cadence
    );
}

fn render_band(band: Option<ValuationBand>) {
    match band {
        Some(band) => render_band_view(&BandView::from(band)),
        None => println!("Valuation band: not enough priced comparables"),
    }
}

fn render_band_view(band: &BandView) {
    println!("Valuation band: {} ({})", band.base, band.range);
}
