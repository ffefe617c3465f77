//! reqwest-backed transport

use super::{FetchResult, Transport};
use crate::error::Result;
use async_trait::async_trait;
use log::debug;

/// User agent sent when the settings don't name one.
pub const DEFAULT_USER_AGENT: &str = concat!("auto-card-embed/", env!("CARGO_PKG_VERSION"));

/// HTTP transport over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Build a client, optionally with a custom user agent.
    ///
    /// # Errors
    ///
    /// Returns `Error::Http` if the TLS backend cannot be initialised.
    pub fn new(user_agent: Option<&str>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<FetchResult> {
        debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        Ok(FetchResult { status, text })
    }
}
