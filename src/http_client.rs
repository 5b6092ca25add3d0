//! Page fetching.
//!
//! [`PageFetcher`] is the transport seam used by the catalog parser and the
//! link resolver. [`AcceleratedClient`] is the network implementation;
//! [`StaticFetcher`] serves canned pages for offline use.
//!
//! Fetchers return raw HTML. Parsing happens synchronously at the call site
//! because `scraper::Html` cannot be held across an `.await`.

use std::collections::HashMap;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use reqwest::header::REFERER;
use reqwest::{Client, Response};
use tracing::{debug, info, instrument};

use crate::config::SiteConfig;
use crate::fingerprint::{random_profile, BrowserProfile};

/// Source of HTML pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page body. Non-success statuses are errors.
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// HTTP client with compression, cookies and a browser profile
pub struct AcceleratedClient {
    client: Client,
    profile: BrowserProfile,
}

impl AcceleratedClient {
    /// Create a client with default timeouts
    pub fn new() -> Result<Self> {
        Self::with_config(&SiteConfig::default())
    }

    /// Create a client honouring the configured timeouts
    pub fn with_config(config: &SiteConfig) -> Result<Self> {
        Self::with_profile(random_profile(), config)
    }

    /// Create client with specific browser profile
    pub fn with_profile(profile: BrowserProfile, config: &SiteConfig) -> Result<Self> {
        let headers = profile.to_headers();

        let client = Client::builder()
            // Let the server negotiate HTTP/2; several embed hosts are HTTP/1.1 only
            .http2_adaptive_window(true)
            .pool_max_idle_per_host(10)
            .tcp_nodelay(true)
            .use_rustls_tls()
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .default_headers(headers)
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::limited(10))
            .cookie_store(true)
            .build()?;

        Ok(Self { client, profile })
    }

    /// Fetch a URL
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str, referer: Option<&str>) -> Result<Response> {
        debug!("Fetching");
        let mut request = self.client.get(url);
        if let Some(referer) = referer {
            request = request.header(REFERER, referer);
        }
        let response = request.send().await?;

        info!(
            status = %response.status(),
            version = ?response.version(),
            "Response received"
        );

        if !response.status().is_success() {
            bail!("{url} returned {}", response.status());
        }

        Ok(response)
    }

    /// Get current browser profile
    pub fn profile(&self) -> &BrowserProfile {
        &self.profile
    }
}

#[async_trait]
impl PageFetcher for AcceleratedClient {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.fetch(url, None).await?;
        Ok(response.text().await?)
    }
}

/// In-memory fetcher keyed by exact URL.
///
/// Unknown URLs fail like an unreachable host.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
}

impl StaticFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page body for `url`.
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("no route to {url}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_fetcher_serves_registered_pages() {
        let fetcher = StaticFetcher::new().with_page("https://a.test/", "<p>hi</p>");
        assert_eq!(fetcher.fetch_text("https://a.test/").await.unwrap(), "<p>hi</p>");
    }

    #[tokio::test]
    async fn static_fetcher_fails_unknown_urls() {
        let fetcher = StaticFetcher::new();
        let err = fetcher.fetch_text("https://missing.test/").await.unwrap_err();
        assert!(err.to_string().contains("missing.test"));
    }

    #[test]
    fn client_uses_configured_profile() {
        let profile = crate::fingerprint::chrome_profile();
        let user_agent = profile.user_agent.clone();
        let client = AcceleratedClient::with_profile(profile, &SiteConfig::default()).unwrap();
        assert_eq!(client.profile().user_agent, user_agent);
    }
}
