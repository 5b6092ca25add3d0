//! `dramaid` - Catalog browser and media-link resolver for DramaId
//!
//! # Features
//!
//! - **Catalog**: listing sections, search and detail pages with episode lists
//! - **Link resolution**: decodes mirror options, repairs the Drive player
//!   config into typed variants and subtitle tracks
//! - **Plugins**: external extractors for every other embed host
//!
//! # Example
//!
//! ```rust,no_run
//! use dramaid::DramaidProvider;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = DramaidProvider::from_default_config()?;
//!     let links = provider
//!         .resolve_episode_links("https://dramaid.nl/some-drama-episode-1-subtitle-indonesia/")
//!         .await?;
//!     for link in &links.links {
//!         println!("{:?} {}", link.quality, link.url);
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod http_client;
pub mod links;
pub mod plugin;
pub mod site;
pub mod urls;

pub use catalog::{home_sections, CatalogEntry, CatalogFilter, Episode, HomeSection, SearchResult};
pub use config::SiteConfig;
pub use error::{CandidateError, RepairError};
pub use http_client::{AcceleratedClient, PageFetcher, StaticFetcher};
pub use links::{Quality, ResolutionReport, ResolvedLink, ResolvedMedia, ResolvedSubtitle};
pub use plugin::{ExternalExtractor, ExtractorRegistry};
pub use site::{DramaidProvider, EpisodeLinks};

/// Version of dramaid
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
