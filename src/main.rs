use tracing::{error, info};

mod config;
mod db;
mod error;
mod live_scores;
mod sync;

use config::{Config, Settings};
use db::PocketBaseClient;
use error::SyncError;
use live_scores::{CricketScoreClient, MatchIdProvider, MatchIdResolver};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the environment may already be set.
    dotenv::dotenv().ok();

    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        if e.is_config() {
            error!("❌ {}. Check your .env file.", e);
        } else {
            error!("❌ {}", e);
        }
        std::process::exit(e.exit_code());
    }

    info!("✅ Sync complete.");
}

async fn run() -> Result<(), SyncError> {
    let settings = Config::load()?.into_settings()?;

    if settings.dry_run {
        info!("🟡 DRY RUN mode – PocketBase will not be written");
    }

    let resolver = build_resolver(&settings)?;
    let provider = CricketScoreClient::new(settings.score_timeout, &settings.user_agent)
        .map_err(SyncError::Fetch)?;
    let mut store = PocketBaseClient::new(&settings.pocketbase_url, settings.pocketbase_timeout)
        .map_err(SyncError::Sync)?;

    sync::run_pipeline(
        &settings,
        resolver.as_ref().map(|r| r as &dyn MatchIdProvider),
        &provider,
        &mut store,
    )
    .await?;

    Ok(())
}

fn build_resolver(settings: &Settings) -> Result<Option<MatchIdResolver>, SyncError> {
    match &settings.match_id {
        Some(source) => {
            info!("Match ID resolution enabled ({})", source.url);
            MatchIdResolver::new(source.timeout, &source.field)
                .map(Some)
                .map_err(SyncError::Resolve)
        }
        None => Ok(None),
    }
}
