use serde::{Deserialize, Serialize};

/// Normalized live score snapshot written to the tracked record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Match title without the provider suffix
    pub title: String,
    /// Latest update / commentary line
    pub update: String,
    /// Current score, empty when the provider omits it
    pub livescore: String,
    /// Current run rate, empty when the provider omits it
    pub runrate: String,
}

/// A record as returned by PocketBase after a create or update.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredRecord {
    pub id: String,
}

/// Response of `auth-with-password`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    Created,
    Updated,
}

impl std::fmt::Display for SyncAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncAction::Created => write!(f, "created"),
            SyncAction::Updated => write!(f, "updated"),
        }
    }
}

/// What the sync stage did and the id of the record it touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub action: SyncAction,
    pub id: String,
}
