use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::provider::ScoreProvider;
use crate::db::models::ScoreRecord;

/// Suffix the provider appends to every match title.
pub const TITLE_SUFFIX: &str = " - Live Cricket Score";

/// Live cricket score source returning a single JSON snapshot per URL.
pub struct CricketScoreClient {
    http: Client,
}

impl CricketScoreClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(CricketScoreClient { http })
    }
}

#[async_trait]
impl ScoreProvider for CricketScoreClient {
    fn name(&self) -> &str {
        "CricketScore"
    }

    async fn fetch_live_score(&self, url: &str) -> Result<ScoreRecord> {
        debug!("Fetching live score from {}", url);

        let resp = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .context("Score request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("Score source returned {}", resp.status());
        }

        let raw: Value = resp
            .json()
            .await
            .context("Failed to parse score response")?;

        parse_score_payload(&raw)
    }
}

/// Validate a raw score payload and normalize it into a [`ScoreRecord`].
///
/// `title` and `update` must be non-blank strings; `livescore` and
/// `runrate` fall back to empty strings.
pub fn parse_score_payload(raw: &Value) -> Result<ScoreRecord> {
    let title = normalize_title(required_text(raw, "title")?);
    if title.is_empty() {
        anyhow::bail!("Missing or invalid field: title");
    }

    let update = required_text(raw, "update")?.trim().to_string();
    if update.is_empty() {
        anyhow::bail!("Missing or invalid field: update");
    }

    Ok(ScoreRecord {
        title,
        update,
        livescore: optional_text(raw, "livescore"),
        runrate: optional_text(raw, "runrate"),
    })
}

/// Strip the provider suffix and surrounding whitespace from a title.
pub fn normalize_title(title: &str) -> String {
    title.replacen(TITLE_SUFFIX, "", 1).trim().to_string()
}

fn required_text<'a>(raw: &'a Value, field: &str) -> Result<&'a str> {
    raw.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow::anyhow!("Missing or invalid field: {}", field))
}

fn optional_text(raw: &Value, field: &str) -> String {
    match raw.get(field) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
