//! `ims` - terminal front end of the Inventory Management System

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ims_client::cli::{self, output, Cli};
use ims_client::{Config, Context, MemoryNotifier, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ims=info,ims_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let mut config = Config::load()?;
    if let Some(host) = cli.host.clone() {
        config.api.host = host;
    }
    tracing::debug!(environment = %config.environment, host = %config.api.host(), "configuration loaded");

    let session = Arc::new(Session::persisted(config.session.path.clone()));
    session.hydrate()?;

    let notifier = Arc::new(MemoryNotifier::new());
    let ctx = Context::new(&config, session, notifier.clone())?;

    let result = cli::run(&ctx, cli.command).await;
    output::print_notifications(&notifier.drain());
    result
}
