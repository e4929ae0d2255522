//! Profile source backed by a single HTTP GET
//!
//! The endpoint answers with a JSON array of profile objects. One request is
//! made per batch; any failure aborts that batch and is not retried.

use async_trait::async_trait;
use profilesync_core::ProfileSource;
use profilesync_domain::{Profile, ProfileSyncError, Result as DomainResult, SourceConfig};
use reqwest::Method;
use tracing::{debug, warn};

use crate::errors::InfraError;
use crate::http::HttpClient;

/// Fetches candidate profiles from a configured URL.
pub struct HttpProfileSource {
    client: HttpClient,
    url: String,
}

impl HttpProfileSource {
    pub fn new(client: HttpClient, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }

    /// Build a source with its own client from the `source` config section.
    pub fn from_config(config: &SourceConfig) -> DomainResult<Self> {
        let client = HttpClient::builder().timeout(config.timeout()).build()?;
        Ok(Self::new(client, config.url.clone()))
    }
}

#[async_trait]
impl ProfileSource for HttpProfileSource {
    async fn fetch_batch(&self) -> DomainResult<Vec<Profile>> {
        let response = self.client.send(self.client.request(Method::GET, self.url.as_str())).await?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %self.url, %status, "profile source returned non-success status");
            return Err(ProfileSyncError::Network(format!(
                "profile source responded with HTTP {}",
                status.as_u16()
            )));
        }

        let body = response.bytes().await.map_err(|err| ProfileSyncError::from(InfraError::from(err)))?;
        let profiles: Vec<Profile> =
            serde_json::from_slice(&body).map_err(|err| ProfileSyncError::from(InfraError::from(err)))?;

        debug!(url = %self.url, count = profiles.len(), bytes = body.len(), "decoded profile batch");
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn source_for(server: &MockServer) -> HttpProfileSource {
        let client = HttpClient::builder().timeout(Duration::from_millis(500)).build().unwrap();
        HttpProfileSource::new(client, format!("{}/users/changes", server.uri()))
    }

    #[tokio::test]
    async fn decodes_profile_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/changes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "u1",
                    "name": "Ada",
                    "email": "ada@example.com",
                    "mobile": "555-0100",
                    "status": "active",
                    "last_updated_at": "2024-01-02T00:00:00Z"
                },
                { "id": "u2", "email": "not-an-email" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let profiles = source_for(&server).await.fetch_batch().await.unwrap();

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].name, "Ada");
        assert_eq!(profiles[1].email, "not-an-email");
        assert!(profiles[1].status.is_empty());
    }

    #[tokio::test]
    async fn empty_array_is_an_empty_batch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let profiles = source_for(&server).await.fetch_batch().await.unwrap();
        assert!(profiles.is_empty());
    }

    #[tokio::test]
    async fn server_error_aborts_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = source_for(&server).await.fetch_batch().await.unwrap_err();

        match err {
            ProfileSyncError::Network(msg) => assert!(msg.contains("503")),
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"u1"}"#))
            .mount(&server)
            .await;

        let err = source_for(&server).await.fetch_batch().await.unwrap_err();
        assert!(matches!(err, ProfileSyncError::Decode(_)));
    }

    #[tokio::test]
    async fn slow_source_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("[]").set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = source_for(&server).await.fetch_batch().await.unwrap_err();
        assert!(matches!(err, ProfileSyncError::Network(_)));
    }
}
