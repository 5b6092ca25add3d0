//! The DramaId catalog provider.
//!
//! Exposes the four operations a host content browser needs: listing,
//! search, detail loading and episode link resolution.
//!
//! # Example
//!
//! ```rust,no_run
//! use dramaid::{CatalogFilter, DramaidProvider};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let provider = DramaidProvider::from_default_config()?;
//!
//! let cards = provider.list_catalog_page(1, &CatalogFilter::ordered("latest")).await?;
//! let entry = provider.load_entry_details(&cards[0].url).await?;
//! let links = provider.resolve_episode_links(&entry.episodes[0].url).await?;
//! println!("{} links, {} subtitles", links.links.len(), links.subtitles.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::catalog::{parse_entry, parse_search_results, CatalogEntry, CatalogFilter, SearchResult};
use crate::config::SiteConfig;
use crate::http_client::{AcceleratedClient, PageFetcher};
use crate::links::{ResolutionDispatcher, ResolutionReport, ResolvedLink, ResolvedSubtitle};
use crate::plugin::{load_plugins, ExtractorRegistry};

/// Links and subtitles for one episode.
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeLinks {
    pub links: Vec<ResolvedLink>,
    pub subtitles: Vec<ResolvedSubtitle>,
    /// `true` once every candidate was attempted, even if all failed.
    pub success: bool,
}

/// Catalog and link provider for the site.
pub struct DramaidProvider {
    config: SiteConfig,
    fetcher: Arc<dyn PageFetcher>,
    dispatcher: ResolutionDispatcher,
}

impl DramaidProvider {
    pub fn new(
        config: SiteConfig,
        fetcher: Arc<dyn PageFetcher>,
        extractors: ExtractorRegistry,
    ) -> Self {
        let dispatcher = ResolutionDispatcher::new(&config, Arc::clone(&fetcher), Arc::new(extractors));
        Self {
            config,
            fetcher,
            dispatcher,
        }
    }

    /// Network-backed provider with plugins from the user config directory.
    pub fn from_config(config: SiteConfig) -> Result<Self> {
        let client = AcceleratedClient::with_config(&config)?;
        let extractors = ExtractorRegistry::from_plugins(load_plugins()?, config.timeout())?;
        Ok(Self::new(config, Arc::new(client), extractors))
    }

    /// Like [`DramaidProvider::from_config`] with `~/.config/dramaid/config.toml`.
    pub fn from_default_config() -> Result<Self> {
        Self::from_config(SiteConfig::load()?)
    }

    fn main_url(&self) -> &str {
        self.config.main_url.trim_end_matches('/')
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching page: {}", url);
        self.fetcher
            .fetch_text(url)
            .await
            .with_context(|| format!("failed to fetch {url}"))
    }

    /// One page of the `/series/` listing.
    pub async fn list_catalog_page(
        &self,
        page: u32,
        filter: &CatalogFilter,
    ) -> Result<Vec<SearchResult>> {
        let url = format!("{}/series/?page={page}{}", self.main_url(), filter.to_query());
        let html = self.fetch(&url).await?;
        Ok(parse_search_results(&html, self.main_url()))
    }

    /// Site search.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let url = format!("{}/?s={}", self.main_url(), urlencoding::encode(query));
        let html = self.fetch(&url).await?;
        Ok(parse_search_results(&html, self.main_url()))
    }

    /// Detail page with its episode list, oldest episode first.
    pub async fn load_entry_details(&self, url: &str) -> Result<CatalogEntry> {
        let html = self.fetch(url).await?;
        Ok(parse_entry(&html, url, self.main_url()))
    }

    /// Per-candidate outcomes for an episode page.
    pub async fn resolve_report(&self, episode_url: &str) -> Result<ResolutionReport> {
        let html = self.fetch(episode_url).await?;
        Ok(self.dispatcher.resolve_page(&html).await)
    }

    /// Resolve an episode page into playable links and subtitles.
    ///
    /// Fails only when the episode page itself cannot be fetched.
    pub async fn resolve_episode_links(&self, episode_url: &str) -> Result<EpisodeLinks> {
        let media = self.resolve_report(episode_url).await?.into_media();
        Ok(EpisodeLinks {
            links: media.links,
            subtitles: media.subtitles,
            success: true,
        })
    }

    /// Sink-style resolution for hosts that stream results into callbacks.
    pub async fn resolve_episode_links_into<L, S>(
        &self,
        episode_url: &str,
        on_link: L,
        on_subtitle: S,
    ) -> Result<bool>
    where
        L: FnMut(ResolvedLink),
        S: FnMut(ResolvedSubtitle),
    {
        let html = self.fetch(episode_url).await?;
        Ok(self.dispatcher.resolve_into(&html, on_link, on_subtitle).await)
    }
}
