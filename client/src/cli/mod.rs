//! CLI module - argument parsing and command dispatch

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use shared::models::{ActivityLogFilters, DispenseTab, InspectionTab, LibraryKind, RequisitionTab};

use crate::views::Context;
use commands::{
    auth::AuthCommands, dispenses::DispenseCommands, inspections::InspectionCommands,
    libraries::LibraryCommands, requisitions::ReqCommands, stocks::StockCommands,
};

/// Inventory management from the terminal
#[derive(Parser, Debug)]
#[command(name = "ims", version, about)]
pub struct Cli {
    /// API host, overrides the configured one
    #[arg(long, global = true, env = "IMS_API__HOST")]
    pub host: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in, sign out and account settings
    #[command(flatten)]
    Auth(AuthCommands),

    /// Requisitions and their items
    #[command(subcommand, visible_alias = "req")]
    Requisitions(ReqCommands),

    /// Dispense records
    #[command(subcommand, visible_alias = "disp")]
    Dispenses(DispenseCommands),

    /// Warehouse stock batches
    #[command(subcommand)]
    Stocks(StockCommands),

    /// Inspection and acceptance reports
    #[command(subcommand, visible_alias = "iar")]
    Inspections(InspectionCommands),

    /// Summary counts
    Dashboard,

    /// System activity log
    Logs {
        /// Who performed the action
        #[arg(long)]
        causer: Option<String>,

        /// Record type, e.g. Requisition
        #[arg(long)]
        subject: Option<String>,

        #[arg(long)]
        event: Option<String>,

        #[arg(long, short = 'p', default_value_t = 1)]
        page: u32,
    },

    /// Reference-data libraries
    #[command(subcommand, visible_alias = "lib")]
    Libraries(LibraryCommands),

    /// Show where a path lands for the current session
    Route {
        /// Path such as /requisitions/12
        path: String,
    },
}

/// Run a parsed command
pub async fn run(ctx: &Context, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Auth(cmd) => commands::auth::run(ctx, cmd).await,
        Commands::Requisitions(cmd) => commands::requisitions::run(ctx, cmd).await,
        Commands::Dispenses(cmd) => commands::dispenses::run(ctx, cmd).await,
        Commands::Stocks(cmd) => commands::stocks::run(ctx, cmd).await,
        Commands::Inspections(cmd) => commands::inspections::run(ctx, cmd).await,
        Commands::Libraries(cmd) => commands::libraries::run(ctx, cmd).await,
        Commands::Dashboard => commands::reports::dashboard(ctx).await,
        Commands::Logs {
            causer,
            subject,
            event,
            page,
        } => {
            let filters = ActivityLogFilters {
                causer,
                subject,
                event,
                ..Default::default()
            };
            commands::reports::logs(ctx, filters, page).await
        }
        Commands::Route { path } => {
            let resolved = crate::routes::resolve(&path, &ctx.session.snapshot());
            output::print_route(&resolved);
            Ok(())
        }
    }
}

pub(crate) fn parse_requisition_tab(raw: &str) -> Result<RequisitionTab, String> {
    RequisitionTab::from_slug(raw)
        .ok_or_else(|| format!("unknown tab '{raw}' (pending, for-dispensing, dispensed)"))
}

pub(crate) fn parse_dispense_tab(raw: &str) -> Result<DispenseTab, String> {
    DispenseTab::from_slug(raw)
        .ok_or_else(|| format!("unknown tab '{raw}' (for-dispense, dispensed)"))
}

pub(crate) fn parse_inspection_tab(raw: &str) -> Result<InspectionTab, String> {
    InspectionTab::from_slug(raw)
        .ok_or_else(|| format!("unknown tab '{raw}' (all, to-forward, forwarded)"))
}

pub(crate) fn parse_library(raw: &str) -> Result<LibraryKind, String> {
    LibraryKind::from_slug(raw).ok_or_else(|| {
        let known: Vec<&str> = LibraryKind::ALL.iter().map(|k| k.slug()).collect();
        format!("unknown library '{raw}' ({})", known.join(", "))
    })
}
