//! Remote fetching for link metadata
//!
//! A [`Transport`] performs one GET and reports status plus body, or fails
//! on transport errors. [`RemoteFetcher`] turns every failure (transport
//! error or any status other than 200) into `None`; nothing here propagates
//! an error to the conversion workflows.

mod http;

pub use http::HttpTransport;

use crate::error::Result;
use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;

/// Outcome of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub status: u16,
    pub text: String,
}

impl FetchResult {
    pub fn new(status: u16, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Network collaborator: one request per URL, no retries.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET. Errors only for transport-level failures; HTTP error
    /// statuses are returned as a normal result.
    async fn get(&self, url: &str) -> Result<FetchResult>;
}

/// Fetches a URL, normalizing every failure into `None`.
#[derive(Clone)]
pub struct RemoteFetcher {
    transport: Arc<dyn Transport>,
}

impl RemoteFetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetch `url`. Returns `None` on transport failure or non-200 status.
    pub async fn fetch(&self, url: &str) -> Option<FetchResult> {
        let response = match self.transport.get(url).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request for {} failed: {}", url, e);
                return None;
            }
        };

        if !response.is_ok() {
            debug!(
                "bad response. response status code was {}",
                response.status
            );
            return None;
        }

        Some(response)
    }
}

impl std::fmt::Debug for RemoteFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteFetcher").finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct FixedTransport(std::result::Result<FetchResult, String>);

    #[async_trait]
    impl Transport for FixedTransport {
        async fn get(&self, _url: &str) -> Result<FetchResult> {
            self.0.clone().map_err(Error::Http)
        }
    }

    fn fetcher(result: std::result::Result<FetchResult, String>) -> RemoteFetcher {
        RemoteFetcher::new(Arc::new(FixedTransport(result)))
    }

    #[tokio::test]
    async fn test_fetch_ok() {
        let fetcher = fetcher(Ok(FetchResult::new(200, "<html></html>")));
        let result = fetcher.fetch("https://example.com").await.unwrap();
        assert_eq!(result.text, "<html></html>");
    }

    #[tokio::test]
    async fn test_fetch_non_200_is_none() {
        for status in [201, 301, 404, 500] {
            let fetcher = fetcher(Ok(FetchResult::new(status, "body")));
            assert!(fetcher.fetch("https://example.com").await.is_none());
        }
    }

    #[tokio::test]
    async fn test_fetch_transport_error_is_none() {
        let fetcher = fetcher(Err("connection refused".to_string()));
        assert!(fetcher.fetch("https://example.com").await.is_none());
    }
}
