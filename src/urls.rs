//! URL completion helpers shared by the catalog parser and the resolver.

use once_cell::sync::Lazy;
use regex::Regex;

/// Complete a possibly relative URL against `main_url`.
///
/// Empty input stays empty so callers can treat it as "absent".
pub fn fix_url(main_url: &str, url: &str) -> String {
    let url = url.trim();
    if url.is_empty() || url.starts_with("http") {
        return url.to_string();
    }

    let base = main_url.trim_end_matches('/');
    if let Some(rest) = url.strip_prefix("//") {
        format!("https://{rest}")
    } else if url.starts_with('/') {
        format!("{base}{url}")
    } else {
        format!("{base}/{url}")
    }
}

/// Like [`fix_url`] but maps empty input to `None`.
pub fn fix_url_opt(main_url: &str, url: &str) -> Option<String> {
    let fixed = fix_url(main_url, url);
    (!fixed.is_empty()).then_some(fixed)
}

static EPISODE_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^/]+/(.+)-ep.+").expect("valid regex"));

/// Map an episode page URL to its series page.
///
/// Listing pages sometimes link straight to the newest episode
/// (`/some-drama-episode-12-subtitle-indonesia`); the series page lives at
/// `/series/some-drama`. Other URLs are returned unchanged.
pub fn series_link(main_url: &str, uri: &str) -> String {
    let base = main_url.trim_end_matches('/');
    if !uri.contains("-episode-") || !uri.starts_with(base) {
        return uri.to_string();
    }

    EPISODE_SLUG
        .captures(uri)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| uri.to_string(), |slug| format!("{base}/series/{}", slug.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIN: &str = "https://dramaid.nl";

    #[test]
    fn absolute_urls_pass_through() {
        assert_eq!(fix_url(MAIN, "https://cdn.test/a.jpg"), "https://cdn.test/a.jpg");
        assert_eq!(fix_url(MAIN, "http://cdn.test/a.jpg"), "http://cdn.test/a.jpg");
    }

    #[test]
    fn protocol_relative_gets_https() {
        assert_eq!(fix_url(MAIN, "//cdn.test/a.jpg"), "https://cdn.test/a.jpg");
    }

    #[test]
    fn relative_paths_join_main_url() {
        assert_eq!(fix_url(MAIN, "/series/x/"), "https://dramaid.nl/series/x/");
        assert_eq!(fix_url(MAIN, "video.mp4"), "https://dramaid.nl/video.mp4");
        assert_eq!(fix_url("https://dramaid.nl/", "/a"), "https://dramaid.nl/a");
    }

    #[test]
    fn empty_is_absent() {
        assert_eq!(fix_url(MAIN, ""), "");
        assert_eq!(fix_url_opt(MAIN, "  "), None);
        assert_eq!(fix_url_opt(MAIN, "/a.png").as_deref(), Some("https://dramaid.nl/a.png"));
    }

    #[test]
    fn episode_links_map_to_series() {
        assert_eq!(
            series_link(MAIN, "https://dramaid.nl/love-in-spring-episode-12-subtitle-indonesia/"),
            "https://dramaid.nl/series/love-in-spring"
        );
    }

    #[test]
    fn series_links_unchanged() {
        let url = "https://dramaid.nl/series/love-in-spring/";
        assert_eq!(series_link(MAIN, url), url);
        let foreign = "https://other.test/x-episode-1";
        assert_eq!(series_link(MAIN, foreign), foreign);
    }
}
