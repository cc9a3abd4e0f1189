use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::provider::MatchIdProvider;

/// Looks up the current match ID from a small JSON document.
pub struct MatchIdResolver {
    http: Client,
    field: String,
}

impl MatchIdResolver {
    pub fn new(timeout: Duration, field: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(MatchIdResolver {
            http,
            field: field.to_string(),
        })
    }
}

#[async_trait]
impl MatchIdProvider for MatchIdResolver {
    async fn resolve_match_id(&self, url: &str) -> Result<String> {
        debug!("Resolving match ID from {}", url);

        let resp = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .context("Match ID request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("Match ID source returned {}", resp.status());
        }

        let raw: Value = resp
            .json()
            .await
            .context("Failed to parse match ID response")?;

        extract_match_id(&raw, &self.field)
    }
}

/// Pull the identifier out of a match ID response, verbatim.
///
/// Strings are returned as-is, other values as their JSON text.
pub fn extract_match_id(raw: &Value, field: &str) -> Result<String> {
    match raw.get(field) {
        None | Some(Value::Null) => anyhow::bail!("{} not found in match ID response", field),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
    }
}

/// Append a resolved match ID to the score source base URL.
pub fn build_score_url(base: &str, match_id: &str) -> String {
    format!("{}{}", base, match_id)
}
