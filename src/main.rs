mod config;
mod error;
mod events;
mod inventory;
mod marketplace;
mod notify;
mod scenario;
mod scheduling;
mod stock;
mod telegram;
mod types;
mod watcher;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::credentials::Credentials;
use crate::marketplace::marketplace_client::MarketplaceClient;
use crate::scenario::notifiers::NotifierKind;
use crate::scenario::scenario::Scenario;
use crate::scheduling::job_scheduler::JobScheduler;
use crate::watcher::stock_watcher::StockWatcher;

#[derive(Debug, Clone, Parser)]
struct Args {
    #[arg(long, value_enum, default_value = "telegram")]
    pub notifier: NotifierKind,

    /// Seconds between favourites checks.
    #[arg(long, default_value_t = 180, value_parser = clap::value_parser!(u64).range(1..))]
    pub check_every_secs: u64,

    /// Seconds between admin heartbeats.
    #[arg(long, default_value_t = 86_400, value_parser = clap::value_parser!(u64).range(1..))]
    pub heartbeat_every_secs: u64,

    /// Used only when the environment does not carry the credentials.
    #[arg(long, default_value = "credentials.yml")]
    pub credentials: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("bagwatch=info".parse().unwrap()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let check_every = Duration::from_secs(args.check_every_secs);
    let heartbeat_every = Duration::from_secs(args.heartbeat_every_secs);

    let credentials = Credentials::load(&args.credentials)?;

    let source = MarketplaceClient::new(credentials.marketplace.clone());
    let notifier = Scenario::notifier(args.notifier, credentials)?;
    let mut watcher = StockWatcher::new(source, notifier);

    watcher
        .announce_startup(check_every, heartbeat_every)
        .await
        .context("startup notice could not be delivered")?;

    info!(
        check_every_secs = args.check_every_secs,
        heartbeat_every_secs = args.heartbeat_every_secs,
        "watching favourites"
    );

    let mut scheduler = JobScheduler::new(check_every, heartbeat_every);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            job = scheduler.next() => {
                tracing::debug!(?job, "running job");
                watcher.run_job(job).await;
            }

            _ = &mut shutdown => {
                info!("shutdown requested");
                break;
            }
        }
    }

    Ok(())
}
