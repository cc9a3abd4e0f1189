use anyhow::Result;
use async_trait::async_trait;

use crate::db::models::ScoreRecord;

/// Trait that every live-score source must implement.
#[async_trait]
pub trait ScoreProvider: Send + Sync {
    /// Fetch and normalize the score published at `url`.
    async fn fetch_live_score(&self, url: &str) -> Result<ScoreRecord>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Resolves the identifier of the match currently being tracked.
#[async_trait]
pub trait MatchIdProvider: Send + Sync {
    async fn resolve_match_id(&self, url: &str) -> Result<String>;
}
