//! Per-candidate orchestration of the resolution pipeline.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::blob::locate_blob;
use super::normalize::LinkNormalizer;
use super::origin::{Origin, OriginClassifier};
use super::reference::{extract_mirrors, CandidateReference};
use super::repair::{extract_tracks, extract_variants};
use super::{ResolvedLink, ResolvedMedia, ResolvedSubtitle};
use crate::config::SiteConfig;
use crate::error::CandidateError;
use crate::http_client::PageFetcher;
use crate::plugin::ExtractorRegistry;

/// Result of resolving one mirror entry.
#[derive(Debug)]
pub struct CandidateOutcome {
    /// The decoded candidate, `None` when the mirror value did not decode.
    pub reference: Option<CandidateReference>,
    pub result: Result<ResolvedMedia, CandidateError>,
}

/// Outcomes for every mirror of an episode page, in discovery order.
#[derive(Debug, Default)]
pub struct ResolutionReport {
    pub outcomes: Vec<CandidateOutcome>,
}

impl ResolutionReport {
    /// All links, candidate order then record order.
    pub fn links(&self) -> impl Iterator<Item = &ResolvedLink> {
        self.media().flat_map(|media| media.links.iter())
    }

    /// All subtitles, candidate order then record order.
    pub fn subtitles(&self) -> impl Iterator<Item = &ResolvedSubtitle> {
        self.media().flat_map(|media| media.subtitles.iter())
    }

    fn media(&self) -> impl Iterator<Item = &ResolvedMedia> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &CandidateError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    /// Flatten into owned link and subtitle lists.
    pub fn into_media(self) -> ResolvedMedia {
        let mut merged = ResolvedMedia::default();
        for media in self.outcomes.into_iter().filter_map(|o| o.result.ok()) {
            merged.links.extend(media.links);
            merged.subtitles.extend(media.subtitles);
        }
        merged
    }
}

/// Drives reference extraction, classification and resolution.
pub struct ResolutionDispatcher {
    fetcher: Arc<dyn PageFetcher>,
    extractors: Arc<ExtractorRegistry>,
    classifier: OriginClassifier,
    normalizer: LinkNormalizer,
    main_url: String,
}

impl ResolutionDispatcher {
    pub fn new(
        config: &SiteConfig,
        fetcher: Arc<dyn PageFetcher>,
        extractors: Arc<ExtractorRegistry>,
    ) -> Self {
        Self {
            fetcher,
            extractors,
            classifier: OriginClassifier::new(config),
            normalizer: LinkNormalizer::new(config),
            main_url: config.main_url.clone(),
        }
    }

    /// Resolve every mirror on an already fetched episode page.
    ///
    /// Candidates run concurrently; outcomes keep discovery order.
    pub async fn resolve_page(&self, episode_html: &str) -> ResolutionReport {
        let mirrors = extract_mirrors(episode_html, &self.main_url);
        debug!("Found {} mirror entries", mirrors.len());

        let outcomes = join_all(mirrors.into_iter().map(|mirror| async move {
            match mirror {
                Ok(reference) => {
                    let result = self.resolve_candidate(&reference).await;
                    CandidateOutcome {
                        reference: Some(reference),
                        result,
                    }
                }
                Err(err) => CandidateOutcome {
                    reference: None,
                    result: Err(err),
                },
            }
        }))
        .await;

        let report = ResolutionReport { outcomes };
        for failure in report.failures() {
            warn!("Mirror skipped: {failure}");
        }
        info!(
            candidates = report.outcomes.len(),
            links = report.links().count(),
            subtitles = report.subtitles().count(),
            "Resolution finished"
        );
        report
    }

    /// Resolve a page and feed the sinks in discovery order.
    ///
    /// Always returns `true` once every candidate has been attempted.
    pub async fn resolve_into<L, S>(&self, episode_html: &str, mut on_link: L, mut on_subtitle: S) -> bool
    where
        L: FnMut(ResolvedLink),
        S: FnMut(ResolvedSubtitle),
    {
        let media = self.resolve_page(episode_html).await.into_media();
        media.links.into_iter().for_each(&mut on_link);
        media.subtitles.into_iter().for_each(&mut on_subtitle);
        true
    }

    /// Resolve a single decoded candidate.
    pub async fn resolve_candidate(
        &self,
        reference: &CandidateReference,
    ) -> Result<ResolvedMedia, CandidateError> {
        match self.classifier.classify(&reference.url) {
            Origin::Drive { url } => self.resolve_drive(&url).await,
            Origin::External { url, referer } => self.resolve_external(&url, &referer).await,
        }
    }

    async fn resolve_drive(&self, url: &str) -> Result<ResolvedMedia, CandidateError> {
        debug!("Resolving Drive player: {}", url);
        let html = self
            .fetcher
            .fetch_text(url)
            .await
            .map_err(|e| CandidateError::Fetch(e.to_string()))?;

        let blob = locate_blob(&html)?;
        Ok(self.decode_blob(&blob))
    }

    /// Decode variants and tracks independently; a failed list is empty.
    pub fn decode_blob(&self, blob: &str) -> ResolvedMedia {
        let variants = extract_variants(blob).unwrap_or_else(|e| {
            debug!("No variants: {e}");
            Vec::new()
        });
        let tracks = extract_tracks(blob).unwrap_or_else(|e| {
            debug!("No tracks: {e}");
            Vec::new()
        });
        self.normalizer.normalize(&variants, &tracks)
    }

    async fn resolve_external(
        &self,
        url: &str,
        referer: &str,
    ) -> Result<ResolvedMedia, CandidateError> {
        let extractor = self
            .extractors
            .find(url)
            .ok_or_else(|| CandidateError::NoExtractor(url.to_string()))?;

        debug!("Resolving {} with extractor {}", url, extractor.name());
        extractor
            .extract(url, referer)
            .await
            .map_err(|e| CandidateError::External {
                name: extractor.name().to_string(),
                message: e.to_string(),
            })
    }
}
