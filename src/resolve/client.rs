//! Shared HTTP transport for upstream providers

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::FETCH_TIMEOUT_MS;
use crate::resolve::error::ProviderError;

/// User agent sent to every upstream API
const USER_AGENT: &str = concat!("mcjar/", env!("CARGO_PKG_VERSION"));

/// JSON-over-HTTP client used by every provider step
///
/// Each request is bounded by `timeout`. Failures are reported once and never
/// retried here.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl UpstreamClient {
    /// Creates a client whose requests each expire after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, timeout })
    }

    /// Creates a client with the default per-request timeout
    pub fn with_default_timeout() -> Result<Self, ProviderError> {
        Self::new(Duration::from_millis(FETCH_TIMEOUT_MS))
    }

    /// Fetch `url` and decode the body as `T`
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Self::classify(e, url))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Upstream returned status {}: {}", status, url);
            return Err(ProviderError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| Self::classify(e, url))?;

        serde_json::from_slice(&body).map_err(|e| {
            warn!("Failed to parse response from {}: {}", url, e);
            ProviderError::InvalidResponse(format!("{url}: {e}"))
        })
    }

    fn classify(error: reqwest::Error, url: &str) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout {
                url: url.to_string(),
            }
        } else {
            ProviderError::Network(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Listing {
        versions: Vec<String>,
    }

    #[tokio::test]
    async fn get_json_decodes_successful_response() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/listing")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"versions": ["1.20.1", "1.20.2"], "project_id": "paper"}"#)
            .create_async()
            .await;

        let client = UpstreamClient::with_default_timeout().unwrap();
        let result: Listing = client
            .get_json(&format!("{}/listing", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            result,
            Listing {
                versions: vec!["1.20.1".to_string(), "1.20.2".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn get_json_returns_status_error_for_non_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/listing")
            .with_status(503)
            .create_async()
            .await;

        let client = UpstreamClient::with_default_timeout().unwrap();
        let result = client
            .get_json::<Listing>(&format!("{}/listing", server.url()))
            .await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(ProviderError::Status { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn get_json_returns_invalid_response_for_non_json_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/listing")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = UpstreamClient::with_default_timeout().unwrap();
        let result = client
            .get_json::<Listing>(&format!("{}/listing", server.url()))
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ProviderError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn get_json_returns_invalid_response_for_missing_field() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/listing")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"project_id": "paper"}"#)
            .create_async()
            .await;

        let client = UpstreamClient::with_default_timeout().unwrap();
        let result = client
            .get_json::<Listing>(&format!("{}/listing", server.url()))
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(ProviderError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn get_json_handles_network_error() {
        let client = UpstreamClient::with_default_timeout().unwrap();
        let result = client
            .get_json::<Listing>("http://invalid.localhost.test:99999/listing")
            .await;

        assert!(matches!(result, Err(ProviderError::Network(_))));
    }

    #[tokio::test]
    async fn get_json_returns_timeout_when_upstream_is_slow() {
        // Accepts the connection but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let client = UpstreamClient::new(Duration::from_millis(100)).unwrap();
        let result = client
            .get_json::<Listing>(&format!("http://{}/listing", addr))
            .await;

        assert!(matches!(result, Err(ProviderError::Timeout { .. })));
    }
}
