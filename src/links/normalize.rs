//! Mapping of decoded player records onto [`ResolvedLink`] and
//! [`ResolvedSubtitle`], plus free-text quality inference.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::repair::{TrackRecord, VariantRecord};
use super::{ResolvedLink, ResolvedMedia, ResolvedSubtitle};
use crate::config::SiteConfig;
use crate::urls::fix_url;

/// Coarse vertical-resolution tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Quality {
    #[serde(rename = "unknown")]
    Unknown,
    #[serde(rename = "144p")]
    P144,
    #[serde(rename = "240p")]
    P240,
    #[serde(rename = "360p")]
    P360,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "1440p")]
    P1440,
    #[serde(rename = "2160p")]
    P2160,
}

const TIERS: [(u32, Quality); 8] = [
    (144, Quality::P144),
    (240, Quality::P240),
    (360, Quality::P360),
    (480, Quality::P480),
    (720, Quality::P720),
    (1080, Quality::P1080),
    (1440, Quality::P1440),
    (2160, Quality::P2160),
];

static HEIGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{3,4})p?\b").expect("valid regex"));
static ALIAS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(4k|uhd|2k|qhd|fhd|full\s?hd|hd|sd)\b").expect("valid regex"));

impl Quality {
    /// Pixel height of the tier, `None` for [`Quality::Unknown`].
    pub fn height(self) -> Option<u32> {
        TIERS.iter().find(|(_, q)| *q == self).map(|(h, _)| *h)
    }

    /// Nearest tier to `height`; ties go to the lower tier.
    pub fn from_height(height: u32) -> Self {
        TIERS
            .iter()
            .min_by_key(|(tier, _)| tier.abs_diff(height))
            .map_or(Quality::Unknown, |(_, q)| *q)
    }

    /// Infer a tier from a label such as `"720p"`, `"1080P HD"` or `"FHD"`.
    pub fn from_name(label: &str) -> Self {
        let lower = label.to_lowercase();

        if let Some(height) = HEIGHT
            .captures(&lower)
            .and_then(|caps| caps[1].parse::<u32>().ok())
        {
            return Self::from_height(height);
        }

        match ALIAS.captures(&lower).map(|caps| caps[1].replace(char::is_whitespace, "")) {
            Some(alias) => match alias.as_str() {
                "4k" | "uhd" => Quality::P2160,
                "2k" | "qhd" => Quality::P1440,
                "fhd" | "fullhd" => Quality::P1080,
                "hd" => Quality::P720,
                "sd" => Quality::P480,
                _ => Quality::Unknown,
            },
            None => Quality::Unknown,
        }
    }
}

/// Subtitle display label.
///
/// Labels containing `Indonesia` get an `n` appended (`Indonesia` →
/// `Indonesian`), matching how the site's apps name the track.
pub fn subtitle_label(label: &str) -> String {
    if label.contains("Indonesia") {
        format!("{label}n")
    } else {
        label.to_string()
    }
}

/// Builds output records for Drive candidates.
#[derive(Debug, Clone)]
pub struct LinkNormalizer {
    name: String,
    source: String,
    referer: String,
    main_url: String,
}

impl LinkNormalizer {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            name: config.name.clone(),
            source: config.drive_provider.clone(),
            referer: config.drive_referer.clone(),
            main_url: config.main_url.clone(),
        }
    }

    pub fn link(&self, variant: &VariantRecord) -> ResolvedLink {
        ResolvedLink {
            name: self.name.clone(),
            source: self.source.clone(),
            url: fix_url(&self.main_url, &variant.file),
            referer: self.referer.clone(),
            quality: Quality::from_name(&variant.label),
            is_m3u8: variant.format.eq_ignore_ascii_case("hls"),
        }
    }

    pub fn subtitle(track: &TrackRecord) -> ResolvedSubtitle {
        ResolvedSubtitle {
            label: subtitle_label(&track.label),
            url: track.file.clone(),
        }
    }

    pub fn normalize(&self, variants: &[VariantRecord], tracks: &[TrackRecord]) -> ResolvedMedia {
        ResolvedMedia {
            links: variants.iter().map(|v| self.link(v)).collect(),
            subtitles: tracks.iter().map(Self::subtitle).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(file: &str, label: &str, format: &str) -> VariantRecord {
        VariantRecord {
            file: file.to_string(),
            label: label.to_string(),
            format: format.to_string(),
            default: None,
        }
    }

    #[test]
    fn quality_from_numeric_labels() {
        assert_eq!(Quality::from_name("720p"), Quality::P720);
        assert_eq!(Quality::from_name("1080P"), Quality::P1080);
        assert_eq!(Quality::from_name("Full HD 1080"), Quality::P1080);
        assert_eq!(Quality::from_name("360p (SD)"), Quality::P360);
    }

    #[test]
    fn quality_snaps_to_nearest_tier() {
        assert_eq!(Quality::from_name("540p"), Quality::P480);
        assert_eq!(Quality::from_name("600p"), Quality::P480);
        assert_eq!(Quality::from_name("800p"), Quality::P720);
        assert_eq!(Quality::from_height(4000), Quality::P2160);
    }

    #[test]
    fn quality_from_named_aliases() {
        assert_eq!(Quality::from_name("4K"), Quality::P2160);
        assert_eq!(Quality::from_name("UHD"), Quality::P2160);
        assert_eq!(Quality::from_name("Full HD"), Quality::P1080);
        assert_eq!(Quality::from_name("HD"), Quality::P720);
        assert_eq!(Quality::from_name("SD"), Quality::P480);
    }

    #[test]
    fn unrecognised_quality_is_unknown() {
        assert_eq!(Quality::from_name("Auto"), Quality::Unknown);
        assert_eq!(Quality::from_name("H264 Shadow"), Quality::Unknown);
        assert_eq!(Quality::from_name(""), Quality::Unknown);
        assert_eq!(Quality::Unknown.height(), None);
        assert_eq!(Quality::P720.height(), Some(720));
    }

    #[test]
    fn drive_link_fields() {
        let normalizer = LinkNormalizer::new(&SiteConfig::default());
        let link = normalizer.link(&variant("a.mp4", "720p", "mp4"));
        assert_eq!(link.name, "DramaId");
        assert_eq!(link.source, "Drive");
        assert_eq!(link.url, "https://dramaid.nl/a.mp4");
        assert_eq!(link.referer, "https://motonews.club/");
        assert_eq!(link.quality, Quality::P720);
        assert!(!link.is_m3u8);
    }

    #[test]
    fn hls_flag_is_case_insensitive() {
        let normalizer = LinkNormalizer::new(&SiteConfig::default());
        assert!(normalizer.link(&variant("https://x.test/m.m3u8", "Auto", "HLS")).is_m3u8);
        assert!(normalizer.link(&variant("https://x.test/m.m3u8", "Auto", "hls")).is_m3u8);
        assert!(!normalizer.link(&variant("https://x.test/m.mpd", "Auto", "dash")).is_m3u8);
    }

    #[test]
    fn indonesia_label_gets_trailing_n() {
        assert_eq!(subtitle_label("Indonesia"), "Indonesian");
        assert_eq!(subtitle_label("Bahasa Indonesia"), "Bahasa Indonesian");
        assert_eq!(subtitle_label("English"), "English");
        // Only the exact-case substring triggers the rule.
        assert_eq!(subtitle_label("indonesia"), "indonesia");
    }

    #[test]
    fn subtitle_url_passes_through() {
        let track = TrackRecord {
            file: "https://motonews.club/s/id.vtt".to_string(),
            label: "Indonesia".to_string(),
            kind: "captions".to_string(),
            default: Some(true),
        };
        let subtitle = LinkNormalizer::subtitle(&track);
        assert_eq!(subtitle.url, "https://motonews.club/s/id.vtt");
        assert_eq!(subtitle.label, "Indonesian");
    }
}
