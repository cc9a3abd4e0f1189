use tracing::info;

use crate::config::Settings;
use crate::db::models::SyncOutcome;
use crate::db::{sync_record, RecordStore};
use crate::error::SyncError;
use crate::live_scores::{build_score_url, MatchIdProvider, ScoreProvider};

/// Run one sync pass: resolve the match ID (when configured), fetch the
/// score, then write it to the store.
///
/// The first failing stage ends the run; later stages are never attempted.
/// Returns `None` in dry-run mode, where the store is left untouched.
pub async fn run_pipeline(
    settings: &Settings,
    resolver: Option<&dyn MatchIdProvider>,
    provider: &dyn ScoreProvider,
    store: &mut dyn RecordStore,
) -> Result<Option<SyncOutcome>, SyncError> {
    let score_url = match (&settings.match_id, resolver) {
        (Some(source), Some(resolver)) => {
            info!("🔎 Resolving match ID...");
            let match_id = resolver
                .resolve_match_id(&source.url)
                .await
                .map_err(SyncError::Resolve)?;
            info!("Match ID: {}", match_id);
            build_score_url(&settings.score_url, &match_id)
        }
        (Some(_), None) => {
            return Err(SyncError::Resolve(anyhow::anyhow!(
                "match ID source configured without a resolver"
            )));
        }
        (None, _) => settings.score_url.clone(),
    };

    info!("🔄 Syncing live score data from {}...", provider.name());
    let record = provider
        .fetch_live_score(&score_url)
        .await
        .map_err(SyncError::Fetch)?;
    info!("Fetched: {} | {}", record.title, record.update);

    if settings.dry_run {
        info!(
            "🟡 DRY RUN – skipping PocketBase write (livescore={:?}, runrate={:?})",
            record.livescore, record.runrate
        );
        return Ok(None);
    }

    let outcome = sync_record(store, settings, &record)
        .await
        .map_err(SyncError::Sync)?;
    Ok(Some(outcome))
}
