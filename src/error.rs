use thiserror::Error;

/// Terminal failure of a sync run, one variant per pipeline stage.
///
/// Nothing is retried: whichever stage fails first ends the run and the
/// remote record keeps its previous value.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingConfig(Vec<String>),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Match ID error: {0:#}")]
    Resolve(anyhow::Error),

    #[error("Fetch error: {0:#}")]
    Fetch(anyhow::Error),

    #[error("PocketBase sync error: {0:#}")]
    Sync(anyhow::Error),
}

impl SyncError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// True when the run failed before any network call was made.
    pub fn is_config(&self) -> bool {
        matches!(self, SyncError::MissingConfig(_) | SyncError::InvalidConfig(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_lists_every_variable() {
        let err = SyncError::MissingConfig(vec!["POCKETBASE_URL".into(), "SCORE_DB".into()]);
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: POCKETBASE_URL, SCORE_DB"
        );
        assert!(err.is_config());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_stage_errors_render_context_chain() {
        let inner = anyhow::anyhow!("Missing or invalid field: update").context("bad payload");
        let err = SyncError::Fetch(inner);
        assert_eq!(
            err.to_string(),
            "Fetch error: bad payload: Missing or invalid field: update"
        );
        assert!(!err.is_config());
        assert_eq!(err.exit_code(), 1);
    }
}
