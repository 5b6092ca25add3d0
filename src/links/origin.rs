//! Candidate host rewriting and classification.

use url::Url;

use crate::config::SiteConfig;

/// Where a candidate is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// The Drive player host, resolved by the built-in payload repair.
    Drive { url: String },
    /// Any other host, handed to an external extractor.
    External { url: String, referer: String },
}

impl Origin {
    pub fn url(&self) -> &str {
        match self {
            Origin::Drive { url } | Origin::External { url, .. } => url,
        }
    }
}

/// Applies the legacy-host rewrite and picks the resolution path.
#[derive(Debug, Clone)]
pub struct OriginClassifier {
    legacy_host: String,
    current_host: String,
    signature: String,
    referer_hint: String,
}

impl OriginClassifier {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            legacy_host: config.legacy_host.clone(),
            current_host: config.current_host.clone(),
            signature: config.special_signature.clone(),
            referer_hint: config.referer_hint(),
        }
    }

    /// Replace the legacy embed host with its current equivalent.
    pub fn rewrite(&self, url: &str) -> String {
        if self.legacy_host.is_empty() {
            return url.to_string();
        }
        url.replace(&self.legacy_host, &self.current_host)
    }

    /// Rewrite, then classify by the host of the rewritten URL.
    pub fn classify(&self, url: &str) -> Origin {
        let url = self.rewrite(url);

        let is_drive = Url::parse(&url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_ascii_lowercase))
            .is_some_and(|host| host.contains(&self.signature));

        if is_drive {
            Origin::Drive { url }
        } else {
            Origin::External {
                url,
                referer: self.referer_hint.clone(),
            }
        }
    }
}
