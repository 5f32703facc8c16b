//! Guest Data Client
//!
//! HTTP client for the read-only attendance endpoint.

use reqwest::{header, Client};
use std::time::Duration;

use super::error::{FetchError, FetchResult};
use super::snapshot::{parse_snapshot, GuestSnapshot, GuestVariant};

/// Sentinel left in the configuration until the endpoint is deployed
pub const PLACEHOLDER_ENDPOINT: &str = "PASTE_YOUR_WEB_APP_URL_HERE";

/// Configuration for the guest data client
#[derive(Debug, Clone)]
pub struct GuestClientConfig {
    /// Endpoint URL (GET, no auth)
    pub endpoint: String,
    /// Expected response shape
    pub variant: GuestVariant,
    /// Request timeout
    pub request_timeout: Duration,
}

impl Default for GuestClientConfig {
    fn default() -> Self {
        Self {
            endpoint: PLACEHOLDER_ENDPOINT.to_string(),
            variant: GuestVariant::Auto,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl GuestClientConfig {
    /// Whether a real endpoint has been set
    pub fn is_configured(&self) -> bool {
        let endpoint = self.endpoint.trim();
        !endpoint.is_empty() && endpoint != PLACEHOLDER_ENDPOINT
    }
}

/// Polls the guest data endpoint
pub struct GuestClient {
    client: Client,
    config: GuestClientConfig,
}

impl GuestClient {
    /// Create a new client with the given configuration
    pub fn new(config: GuestClientConfig) -> FetchResult<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GuestClientConfig {
        &self.config
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Fetch and parse the current attendance data.
    ///
    /// Bypasses HTTP caches; never retries by itself.
    pub async fn poll(&self) -> FetchResult<GuestSnapshot> {
        if !self.is_configured() {
            return Err(FetchError::NotConfigured);
        }

        let response = self
            .client
            .get(self.config.endpoint.trim())
            .header(header::CACHE_CONTROL, "no-cache, no-store")
            .header(header::PRAGMA, "no-cache")
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let snapshot = parse_snapshot(&body, self.config.variant)?;

        tracing::debug!(
            total = snapshot.total(),
            categories = snapshot.categories().len(),
            "Guest data fetched"
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use std::net::SocketAddr;

    /// Serve a fixed status and body on `/guests` from a local port
    pub(crate) async fn serve_fixed(status: StatusCode, body: &'static str) -> SocketAddr {
        let router = Router::new().route(
            "/guests",
            get(move || async move {
                (
                    status,
                    [(axum::http::header::CONTENT_TYPE, "application/json")],
                    body,
                )
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    fn client_for(addr: SocketAddr, variant: GuestVariant) -> GuestClient {
        GuestClient::new(GuestClientConfig {
            endpoint: format!("http://{}/guests", addr),
            variant,
            request_timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_placeholder_is_not_configured() {
        assert!(!GuestClientConfig::default().is_configured());

        let config = GuestClientConfig {
            endpoint: "  ".to_string(),
            ..Default::default()
        };
        assert!(!config.is_configured());

        let config = GuestClientConfig {
            endpoint: "http://localhost:8090/".to_string(),
            ..Default::default()
        };
        assert!(config.is_configured());
    }

    #[tokio::test]
    async fn test_poll_unconfigured_skips_network() {
        let client = GuestClient::new(GuestClientConfig::default()).unwrap();
        let err = client.poll().await.unwrap_err();
        assert!(matches!(err, FetchError::NotConfigured));
    }

    #[tokio::test]
    async fn test_poll_count() {
        let addr = serve_fixed(StatusCode::OK, r#"{"confirmedGuests": 42}"#).await;
        let client = client_for(addr, GuestVariant::Count);

        let snapshot = client.poll().await.unwrap();
        assert_eq!(snapshot, GuestSnapshot::Count { confirmed_count: 42 });
    }

    #[tokio::test]
    async fn test_poll_chart() {
        let addr = serve_fixed(
            StatusCode::OK,
            r#"{"totalConfirmed": 50, "categories": [{"label": "Adult", "value": 40}, {"label": "Kids", "value": 10}]}"#,
        )
        .await;
        let client = client_for(addr, GuestVariant::Chart);

        let snapshot = client.poll().await.unwrap();
        assert_eq!(snapshot.total(), 50);
        assert_eq!(snapshot.categories().len(), 2);
    }

    #[tokio::test]
    async fn test_poll_http_status() {
        let addr = serve_fixed(StatusCode::NOT_FOUND, "{}").await;
        let client = client_for(addr, GuestVariant::Count);

        let err = client.poll().await.unwrap_err();
        assert!(matches!(err, FetchError::HttpStatus { status: 404 }));
    }

    #[tokio::test]
    async fn test_poll_malformed() {
        let addr = serve_fixed(StatusCode::OK, "<html>oops</html>").await;
        let client = client_for(addr, GuestVariant::Count);

        let err = client.poll().await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_poll_connection_refused() {
        // Bind then drop to get a port with nothing listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(addr, GuestVariant::Count);
        let err = client.poll().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
