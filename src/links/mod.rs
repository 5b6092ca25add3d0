//! Episode media-link resolution.
//!
//! # Pipeline
//!
//! ```text
//! episode page ─► reference (base64 mirror options → iframe src)
//!              ─► origin    (legacy host rewrite, Drive vs external)
//!              ─► blob      (.picasa + next sibling script)       ┐ Drive only
//!              ─► repair    (sources/tracks literal → JSON)       │
//!              ─► normalize (ResolvedLink / ResolvedSubtitle)     ┘
//! ```
//!
//! [`ResolutionDispatcher`] drives the stages for every candidate
//! concurrently and records a [`CandidateOutcome`] per mirror. A failing
//! mirror never fails the page.

pub mod blob;
pub mod dispatch;
pub mod normalize;
pub mod origin;
pub mod reference;
pub mod repair;

use serde::Serialize;

pub use dispatch::{CandidateOutcome, ResolutionDispatcher, ResolutionReport};
pub use normalize::{LinkNormalizer, Quality};
pub use origin::{Origin, OriginClassifier};
pub use reference::CandidateReference;
pub use repair::{TrackRecord, VariantRecord};

/// A directly playable media URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLink {
    /// Display name (the site provider name).
    pub name: String,
    /// Hosting label, e.g. `"Drive"`.
    pub source: String,
    pub url: String,
    /// Referer the player must send.
    pub referer: String,
    pub quality: Quality,
    /// `true` for HLS manifests, `false` for progressive files.
    pub is_m3u8: bool,
}

/// A subtitle track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSubtitle {
    pub label: String,
    pub url: String,
}

/// Links and subtitles produced by one candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedMedia {
    pub links: Vec<ResolvedLink>,
    pub subtitles: Vec<ResolvedSubtitle>,
}

impl ResolvedMedia {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.subtitles.is_empty()
    }
}
