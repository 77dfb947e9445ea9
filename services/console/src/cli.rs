use crate::commands::{
    run_cma, run_feaso, run_health, run_provenance, run_risk_card, run_search, run_workspace,
    CmaArgs, FeasoArgs, ProvenanceArgs, RiskCardArgs, SearchArgs, WorkspaceArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use devfindr::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "devfindr",
    about = "Developer, agent and investor workspaces for the DevFindr + PricePro platform",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the workspace HTTP service (default command)
    Serve(ServeArgs),
    /// Print the shell, navigation and landing content for a role workspace
    Workspace(WorkspaceArgs),
    /// Search parcels on the platform API
    Search(SearchArgs),
    /// Show the risk card for a parcel
    RiskCard(RiskCardArgs),
    /// List provenance records for an entity
    Provenance(ProvenanceArgs),
    /// Build a comparable selection, show its valuation band and optionally queue a CMA report
    Cma(CmaArgs),
    /// Run a feasibility study for a parcel
    Feaso(FeasoArgs),
    /// Check that the platform API is reachable
    Health,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Workspace(args) => run_workspace(args),
        Command::Search(args) => run_search(args).await,
        Command::RiskCard(args) => run_risk_card(args).await,
        Command::Provenance(args) => run_provenance(args).await,
        Command::Cma(args) => run_cma(args).await,
        Command::Feaso(args) => run_feaso(args).await,
        Command::Health => run_health().await,
    }
}
