//! Browser header profiles.
//!
//! The site and its embed hosts serve a bot wall to clients without a
//! plausible browser `User-Agent`, so every request carries one of these.

use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

/// Browser profile presented on every fetch.
#[derive(Debug, Clone)]
pub struct BrowserProfile {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
}

const CHROME_VERSIONS: &[&str] = &["131.0.0.0", "130.0.0.0", "129.0.0.0", "128.0.0.0"];

const FIREFOX_VERSIONS: &[&str] = &["133.0", "132.0", "131.0"];

const PLATFORMS: &[&str] = &[
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "X11; Linux x86_64",
];

// The catalog is Indonesian; English fallback keeps error pages readable.
const ACCEPT_LANGUAGES: &[&str] = &["id-ID,id;q=0.9,en;q=0.8", "en-US,en;q=0.9,id;q=0.8"];

fn pick<'a>(items: &[&'a str]) -> &'a str {
    items.choose(&mut rand::thread_rng()).copied().unwrap_or_default()
}

/// Generate a Chrome profile
#[must_use]
pub fn chrome_profile() -> BrowserProfile {
    BrowserProfile {
        user_agent: format!(
            "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
            pick(PLATFORMS),
            pick(CHROME_VERSIONS)
        ),
        accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"
            .to_string(),
        accept_language: pick(ACCEPT_LANGUAGES).to_string(),
    }
}

/// Generate a Firefox profile
#[must_use]
pub fn firefox_profile() -> BrowserProfile {
    let version = pick(FIREFOX_VERSIONS);
    BrowserProfile {
        user_agent: format!(
            "Mozilla/5.0 ({}; rv:{version}) Gecko/20100101 Firefox/{version}",
            pick(PLATFORMS)
        ),
        accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
        accept_language: pick(ACCEPT_LANGUAGES).to_string(),
    }
}

/// Generate a random profile, weighted towards Chrome.
#[must_use]
pub fn random_profile() -> BrowserProfile {
    if rand::thread_rng().gen_bool(0.75) {
        chrome_profile()
    } else {
        firefox_profile()
    }
}

impl BrowserProfile {
    /// Convert profile to reqwest `HeaderMap`.
    ///
    /// Values that are not valid header text are skipped.
    pub fn to_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        for (name, value) in [
            (USER_AGENT, &self.user_agent),
            (ACCEPT, &self.accept),
            (ACCEPT_LANGUAGE, &self.accept_language),
        ] {
            if let Ok(value) = HeaderValue::from_str(value) {
                headers.insert(name, value);
            }
        }

        headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chrome_profile_identifies_as_chrome() {
        let profile = chrome_profile();
        assert!(profile.user_agent.contains("Chrome/"));
        assert!(profile.user_agent.starts_with("Mozilla/5.0 ("));
    }

    #[test]
    fn firefox_profile_repeats_version() {
        let profile = firefox_profile();
        assert!(profile.user_agent.contains("Firefox/"));
        assert!(profile.user_agent.contains("rv:"));
    }

    #[test]
    fn headers_include_user_agent_and_language() {
        let headers = random_profile().to_headers();
        assert!(headers.contains_key(USER_AGENT));
        assert!(headers.contains_key(ACCEPT_LANGUAGE));
        assert!(headers.contains_key("upgrade-insecure-requests"));
    }
}
