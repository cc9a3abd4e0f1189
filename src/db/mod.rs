use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

pub mod models;
pub mod pocketbase;

pub use pocketbase::PocketBaseClient;

use crate::config::{Settings, SyncTarget};
use models::{ScoreRecord, StoredRecord, SyncAction, SyncOutcome};

/// Remote document store holding the tracked score record.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Password auth against the superuser collection.
    async fn authenticate(&mut self, email: &str, password: &str) -> Result<()>;

    async fn create(&self, collection: &str, record: &ScoreRecord) -> Result<StoredRecord>;

    /// Overwrite every score field of record `id`.
    async fn update(&self, collection: &str, id: &str, record: &ScoreRecord)
        -> Result<StoredRecord>;
}

/// Authenticate once, then create or overwrite the tracked record.
pub async fn sync_record<S>(
    store: &mut S,
    settings: &Settings,
    record: &ScoreRecord,
) -> Result<SyncOutcome>
where
    S: RecordStore + ?Sized,
{
    store.authenticate(&settings.email, &settings.password).await?;

    let outcome = match &settings.target {
        SyncTarget::Update(id) => {
            let stored = store.update(&settings.collection, id, record).await?;
            SyncOutcome {
                action: SyncAction::Updated,
                id: stored.id,
            }
        }
        SyncTarget::Create => {
            let stored = store.create(&settings.collection, record).await?;
            SyncOutcome {
                action: SyncAction::Created,
                id: stored.id,
            }
        }
    };

    info!("✅ Record {}: {}", outcome.action, outcome.id);
    Ok(outcome)
}
