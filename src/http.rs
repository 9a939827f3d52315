//! HTTP page fetching for the backcard crate
//!
//! This module provides the network capability the extraction pipeline runs
//! on: a single GET returning the response status, the resolved final URL
//! (after redirects), and the body text. The capability is a trait so the
//! pipeline can be driven by scripted fakes in tests.

use crate::error::Error as CrateError;
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Error type for page fetching
#[derive(Debug, Error)]
pub enum HttpError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("unexpected status {status} for {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// URL that produced the response
        url: String,
    },
}

impl From<HttpError> for CrateError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Transport(e) => CrateError::Http(e),
            HttpError::Status { status, url } => CrateError::Status {
                status_code: status,
                url,
            },
        }
    }
}

/// A fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code of the final response
    pub status: u16,

    /// URL the response was actually served from, after redirects. All
    /// relative links in `body` resolve against this, not the request URL.
    pub final_url: Url,

    /// Response body text
    pub body: String,
}

/// Capability to GET a page.
#[async_trait]
pub trait FetchPage: Send + Sync {
    /// Fetch `url`, following redirects, and return the successful response.
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, HttpError>;
}

/// HTTP client for fetching pages
#[derive(Clone)]
pub struct HttpClient {
    /// The underlying reqwest client
    client: ReqwestClient,
}

impl HttpClient {
    /// Create a new HTTP client with the default timeout
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new HTTP client with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .user_agent(format!("backcard/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FetchPage for HttpClient {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, HttpError> {
        debug!("Sending GET request to {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            error!("Request to {} answered {}", final_url, status);
            return Err(HttpError::Status {
                status: status.as_u16(),
                url: final_url.to_string(),
            });
        }

        let body = response.text().await?;
        debug!("Fetched {} ({} bytes)", final_url, body.len());

        Ok(FetchedPage {
            status: status.as_u16(),
            final_url,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_fetch_success() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/u/bob/review/42")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><body>review</body></html>")
            .expect(1)
            .create_async()
            .await;

        let client = HttpClient::new();
        let url = Url::parse(&format!("{}/u/bob/review/42", server.url())).unwrap();

        let page = client.fetch(&url).await.unwrap();
        assert_eq!(page.status, 200);
        assert_eq!(page.final_url, url);
        assert!(page.body.contains("review"));

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/u/bob/review/404")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let client = HttpClient::new();
        let url = Url::parse(&format!("{}/u/bob/review/404", server.url())).unwrap();

        let result = client.fetch(&url).await;
        assert!(matches!(result, Err(HttpError::Status { status: 404, .. })));

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let mut server = Server::new_async().await;
        let target = format!("{}/u/bob/review/42", server.url());
        let redirect = server
            .mock("GET", "/r/42")
            .with_status(302)
            .with_header("location", &target)
            .create_async()
            .await;
        let destination = server
            .mock("GET", "/u/bob/review/42")
            .with_status(200)
            .with_body("<html></html>")
            .create_async()
            .await;

        let client = HttpClient::new();
        let url = Url::parse(&format!("{}/r/42", server.url())).unwrap();

        let page = client.fetch(&url).await.unwrap();
        assert_eq!(page.final_url.as_str(), target);

        redirect.assert_async().await;
        destination.assert_async().await;
    }
}
