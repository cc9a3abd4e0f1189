use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::models::{AuthResponse, ScoreRecord, StoredRecord};
use super::RecordStore;

/// Collection holding PocketBase superuser accounts.
const SUPERUSERS: &str = "_superusers";

/// Client for the PocketBase REST API, authenticated as a superuser.
pub struct PocketBaseClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl PocketBaseClient {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(PocketBaseClient {
            http,
            base_url: base_url.clone(),
            token: None,
        })
    }

    /// Build `{base}/api/collections/{segments...}`, keeping any base path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| anyhow::anyhow!("PocketBase URL cannot be a base: {}", self.base_url))?;
            path.pop_if_empty()
                .extend(["api", "collections"])
                .extend(segments);
        }
        Ok(url)
    }

    fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .context("Not authenticated with PocketBase")
    }
}

#[async_trait]
impl RecordStore for PocketBaseClient {
    async fn authenticate(&mut self, email: &str, password: &str) -> Result<()> {
        let url = self.endpoint(&[SUPERUSERS, "auth-with-password"])?;
        debug!("Authenticating with PocketBase at {}", url);

        let body = serde_json::json!({
            "identity": email,
            "password": password,
        });

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .context("PocketBase auth request failed")?;

        if !resp.status().is_success() {
            return Err(api_error("Authentication", resp).await);
        }

        let auth: AuthResponse = resp
            .json()
            .await
            .context("Failed to parse PocketBase auth response")?;
        self.token = Some(auth.token);
        info!("Authenticated with PocketBase as {}", email);
        Ok(())
    }

    async fn create(&self, collection: &str, record: &ScoreRecord) -> Result<StoredRecord> {
        let url = self.endpoint(&[collection, "records"])?;
        debug!("Creating record in {}", collection);

        let resp = self
            .http
            .post(url)
            .header(AUTHORIZATION, self.token()?)
            .json(record)
            .send()
            .await
            .context("PocketBase create request failed")?;

        if !resp.status().is_success() {
            return Err(api_error("Create", resp).await);
        }

        resp.json()
            .await
            .context("Failed to parse PocketBase create response")
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        record: &ScoreRecord,
    ) -> Result<StoredRecord> {
        let url = self.endpoint(&[collection, "records", id])?;
        debug!("Updating record {} in {}", id, collection);

        let resp = self
            .http
            .patch(url)
            .header(AUTHORIZATION, self.token()?)
            .json(record)
            .send()
            .await
            .context("PocketBase update request failed")?;

        if !resp.status().is_success() {
            return Err(api_error("Update", resp).await);
        }

        resp.json()
            .await
            .context("Failed to parse PocketBase update response")
    }
}

/// Turn a non-2xx PocketBase response into an error, preferring its `message`.
async fn api_error(action: &str, resp: Response) -> anyhow::Error {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["message"].as_str().map(str::to_string))
        .unwrap_or(body);
    anyhow::anyhow!("{} failed {}: {}", action, status, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn record() -> ScoreRecord {
        ScoreRecord {
            title: "India vs Australia".into(),
            update: "India 250/4 (40 ov)".into(),
            livescore: "250/4".into(),
            runrate: "6.25".into(),
        }
    }

    fn client(server: &mockito::ServerGuard) -> PocketBaseClient {
        let base = Url::parse(&server.url()).unwrap();
        PocketBaseClient::new(&base, Duration::from_secs(10)).unwrap()
    }

    async fn mock_auth(server: &mut mockito::ServerGuard) -> mockito::Mock {
        server
            .mock("POST", "/api/collections/_superusers/auth-with-password")
            .match_body(Matcher::Json(json!({
                "identity": "admin@example.com",
                "password": "secret",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token":"tok-1","record":{"id":"su1"}}"#)
            .create_async()
            .await
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let base = Url::parse("https://pb.example.com/db/").unwrap();
        let client = PocketBaseClient::new(&base, Duration::from_secs(1)).unwrap();
        let url = client.endpoint(&["live_scores", "records", "abc"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://pb.example.com/db/api/collections/live_scores/records/abc"
        );
    }

    #[test]
    fn test_endpoint_on_bare_host() {
        let base = Url::parse("http://127.0.0.1:8090").unwrap();
        let client = PocketBaseClient::new(&base, Duration::from_secs(1)).unwrap();
        let url = client.endpoint(&["live_scores", "records"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8090/api/collections/live_scores/records"
        );
    }

    #[tokio::test]
    async fn test_create_after_auth() {
        let mut server = mockito::Server::new_async().await;
        let auth = mock_auth(&mut server).await;
        let create = server
            .mock("POST", "/api/collections/live_scores/records")
            .match_header("authorization", "tok-1")
            .match_body(Matcher::Json(json!({
                "title": "India vs Australia",
                "update": "India 250/4 (40 ov)",
                "livescore": "250/4",
                "runrate": "6.25",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"rec123","title":"India vs Australia"}"#)
            .create_async()
            .await;

        let mut pb = client(&server);
        pb.authenticate("admin@example.com", "secret").await.unwrap();
        let stored = pb.create("live_scores", &record()).await.unwrap();

        auth.assert_async().await;
        create.assert_async().await;
        assert_eq!(stored.id, "rec123");
    }

    #[tokio::test]
    async fn test_update_targets_record_id() {
        let mut server = mockito::Server::new_async().await;
        let _auth = mock_auth(&mut server).await;
        let update = server
            .mock("PATCH", "/api/collections/scores/records/abc123")
            .match_header("authorization", "tok-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"abc123"}"#)
            .create_async()
            .await;

        let mut pb = client(&server);
        pb.authenticate("admin@example.com", "secret").await.unwrap();
        let stored = pb.update("scores", "abc123", &record()).await.unwrap();

        update.assert_async().await;
        assert_eq!(stored.id, "abc123");
    }

    #[tokio::test]
    async fn test_auth_failure_surfaces_message() {
        let mut server = mockito::Server::new_async().await;
        let _auth = server
            .mock("POST", "/api/collections/_superusers/auth-with-password")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code":400,"message":"Failed to authenticate.","data":{}}"#)
            .create_async()
            .await;

        let mut pb = client(&server);
        let err = pb
            .authenticate("admin@example.com", "wrong")
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Authentication failed 400"));
        assert!(msg.contains("Failed to authenticate."));
    }

    #[tokio::test]
    async fn test_write_requires_auth() {
        let server = mockito::Server::new_async().await;
        let pb = client(&server);
        let err = pb.create("live_scores", &record()).await.unwrap_err();
        assert_eq!(err.to_string(), "Not authenticated with PocketBase");
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _auth = mock_auth(&mut server).await;
        let _update = server
            .mock("PATCH", "/api/collections/live_scores/records/missing")
            .with_status(404)
            .with_body(r#"{"code":404,"message":"The requested resource wasn't found.","data":{}}"#)
            .create_async()
            .await;

        let mut pb = client(&server);
        pb.authenticate("admin@example.com", "secret").await.unwrap();
        let err = pb
            .update("live_scores", "missing", &record())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("wasn't found"));
    }
}
