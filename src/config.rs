use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::error::SyncError;

/// Browser-like identification sent to the score source; some upstreams
/// reject requests without one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/136.0.0.0 Safari/537.36";

/// Sync a live cricket score snapshot into a PocketBase record
#[derive(Parser, Debug, Clone)]
#[command(name = "livescore-sync", version, about)]
pub struct Config {
    /// PocketBase base URL (required)
    #[arg(long, env = "POCKETBASE_URL")]
    pub pocketbase_url: Option<String>,

    /// PocketBase superuser email (required)
    #[arg(long, env = "POCKETBASE_EMAIL")]
    pub pocketbase_email: Option<String>,

    /// PocketBase superuser password (required)
    #[arg(long, env = "POCKETBASE_PASSWORD", hide_env_values = true)]
    pub pocketbase_password: Option<String>,

    /// Live score URL. When a match ID is resolved it is appended to this URL. (required)
    #[arg(long = "score-url", env = "SCORE_DB")]
    pub score_url: Option<String>,

    /// Existing record to overwrite; a new record is created when unset
    #[arg(long, env = "RECORD_ID")]
    pub record_id: Option<String>,

    /// URL returning the current match ID; resolution is skipped when unset
    #[arg(long, env = "MATCH_ID_URL")]
    pub match_id_url: Option<String>,

    /// Field of the match ID response holding the identifier
    #[arg(long, env = "MATCH_ID_FIELD", default_value = "data_id")]
    pub match_id_field: String,

    /// Target PocketBase collection
    #[arg(long, env = "COLLECTION", default_value = "live_scores")]
    pub collection: String,

    /// Score fetch timeout in seconds
    #[arg(long, env = "SCORE_TIMEOUT_SECS", default_value = "5")]
    pub score_timeout_secs: u64,

    /// Match ID fetch timeout in seconds
    #[arg(long, env = "MATCH_ID_TIMEOUT_SECS", default_value = "3")]
    pub match_id_timeout_secs: u64,

    /// PocketBase auth/write timeout in seconds
    #[arg(long, env = "POCKETBASE_TIMEOUT_SECS", default_value = "10")]
    pub pocketbase_timeout_secs: u64,

    /// User-Agent header sent to the score source
    #[arg(long, env = "SCORE_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Fetch and log the score without writing to PocketBase
    #[arg(
        long,
        env = "DRY_RUN",
        default_value = "false",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub dry_run: bool,
}

/// Whether the run creates a new record or overwrites an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncTarget {
    Create,
    Update(String),
}

/// Where the match ID comes from when the resolution stage is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchIdSource {
    pub url: String,
    pub field: String,
    pub timeout: Duration,
}

/// Validated run configuration, built once at startup.
#[derive(Clone)]
pub struct Settings {
    pub pocketbase_url: Url,
    pub email: String,
    pub password: String,
    pub score_url: String,
    pub target: SyncTarget,
    pub match_id: Option<MatchIdSource>,
    pub collection: String,
    pub score_timeout: Duration,
    pub pocketbase_timeout: Duration,
    pub user_agent: String,
    pub dry_run: bool,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("pocketbase_url", &self.pocketbase_url.as_str())
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("score_url", &self.score_url)
            .field("target", &self.target)
            .field("match_id", &self.match_id)
            .field("collection", &self.collection)
            .field("score_timeout", &self.score_timeout)
            .field("pocketbase_timeout", &self.pocketbase_timeout)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn timeout(name: &str, secs: u64) -> Result<Duration, SyncError> {
    if secs == 0 {
        return Err(SyncError::InvalidConfig(format!("{} must be positive", name)));
    }
    Ok(Duration::from_secs(secs))
}

impl Config {
    /// Parse flags and environment for this process.
    pub fn load() -> Result<Self, SyncError> {
        Self::load_from(std::env::args_os())
    }

    /// Parse `args`, turning malformed values into [`SyncError::InvalidConfig`].
    ///
    /// `--help` and `--version` still print and exit as usual.
    pub fn load_from<I, T>(args: I) -> Result<Self, SyncError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(config) => Ok(config),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => {
                let rendered = e.to_string();
                let first = rendered.lines().next().unwrap_or_default();
                Err(SyncError::InvalidConfig(
                    first.trim_start_matches("error: ").to_string(),
                ))
            }
        }
    }

    /// Check required values and build the run [`Settings`].
    ///
    /// Every missing required variable is reported at once.
    pub fn into_settings(self) -> Result<Settings, SyncError> {
        let pocketbase_url = present(self.pocketbase_url);
        let email = present(self.pocketbase_email);
        // Passwords may legitimately carry surrounding spaces; only reject empty ones.
        let password = self.pocketbase_password.filter(|p| !p.is_empty());
        let score_url = present(self.score_url);

        let mut missing = Vec::new();
        if pocketbase_url.is_none() {
            missing.push("POCKETBASE_URL".to_string());
        }
        if email.is_none() {
            missing.push("POCKETBASE_EMAIL".to_string());
        }
        if password.is_none() {
            missing.push("POCKETBASE_PASSWORD".to_string());
        }
        if score_url.is_none() {
            missing.push("SCORE_DB".to_string());
        }

        let (Some(pocketbase_url), Some(email), Some(password), Some(score_url)) =
            (pocketbase_url, email, password, score_url)
        else {
            return Err(SyncError::MissingConfig(missing));
        };

        let pocketbase_url = Url::parse(&pocketbase_url).map_err(|e| {
            SyncError::InvalidConfig(format!("POCKETBASE_URL '{}': {}", pocketbase_url, e))
        })?;
        if pocketbase_url.cannot_be_a_base() {
            return Err(SyncError::InvalidConfig(format!(
                "POCKETBASE_URL '{}' is not a base URL",
                pocketbase_url
            )));
        }

        let collection = self.collection.trim().to_string();
        if collection.is_empty() {
            return Err(SyncError::InvalidConfig("COLLECTION must not be empty".into()));
        }

        let target = match present(self.record_id) {
            Some(id) => SyncTarget::Update(id),
            None => SyncTarget::Create,
        };

        let match_id = match present(self.match_id_url) {
            Some(url) => Some(MatchIdSource {
                url,
                field: self.match_id_field,
                timeout: timeout("MATCH_ID_TIMEOUT_SECS", self.match_id_timeout_secs)?,
            }),
            None => None,
        };

        Ok(Settings {
            pocketbase_url,
            email,
            password,
            score_url,
            target,
            match_id,
            collection,
            score_timeout: timeout("SCORE_TIMEOUT_SECS", self.score_timeout_secs)?,
            pocketbase_timeout: timeout("POCKETBASE_TIMEOUT_SECS", self.pocketbase_timeout_secs)?,
            user_agent: self.user_agent,
            dry_run: self.dry_run,
        })
    }
}
