//! Catalog data model and page parsing.
//!
//! - [`CatalogEntry`] / [`Episode`] / [`SearchResult`]: what the host browser consumes
//! - [`CatalogFilter`] / [`HomeSection`]: listing page query fragments
//! - [`parse`]: pure HTML → model functions, no I/O
//!
//! The heuristic text extractors (`parse_*`) return `None` instead of guessing.

pub mod parse;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub use parse::{parse_entry, parse_search_results};

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TvType {
    Drama,
    Movie,
    Anime,
}

/// Airing status shown on the detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowStatus {
    Completed,
    Ongoing,
}

/// One card on a listing, search or recommendation strip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub poster: Option<String>,
    pub kind: TvType,
}

/// A playable episode of an entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Episode {
    pub title: String,
    /// Episode page; pass to `resolve_episode_links`.
    pub url: String,
    /// Ordinal parsed from the title, `None` when the title carries no number.
    pub number: Option<u32>,
}

/// Full detail page of a series or movie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub title: String,
    pub url: String,
    pub kind: TvType,
    pub poster: Option<String>,
    pub tags: Vec<String>,
    pub status: ShowStatus,
    pub synopsis: String,
    pub year: Option<i32>,
    /// Oldest first.
    pub episodes: Vec<Episode>,
    pub related: Vec<SearchResult>,
}

/// Query-string filter for the `/series/` listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// `None` omits the parameter, `Some("")` sends it empty.
    pub status: Option<String>,
    pub kind: Option<String>,
    pub order: Option<String>,
}

impl CatalogFilter {
    /// Order-only filter, other parameters omitted.
    pub fn ordered(order: &str) -> Self {
        Self {
            order: Some(order.to_string()),
            ..Self::default()
        }
    }

    /// Render as `&status=..&type=..&order=..`, skipping unset parameters.
    pub fn to_query(&self) -> String {
        [
            ("status", &self.status),
            ("type", &self.kind),
            ("order", &self.order),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_ref()
                .map(|v| format!("&{key}={}", urlencoding::encode(v)))
        })
        .collect()
    }
}

/// A named listing shown on the host's home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeSection {
    pub name: &'static str,
    pub filter: CatalogFilter,
}

/// Home screen sections in display order.
pub fn home_sections() -> Vec<HomeSection> {
    let all_with_order = |order: &str| CatalogFilter {
        status: Some(String::new()),
        kind: Some(String::new()),
        order: Some(order.to_string()),
    };

    vec![
        HomeSection {
            name: "Drama Terbaru",
            filter: all_with_order("update"),
        },
        HomeSection {
            name: "Baru Ditambahkan",
            filter: CatalogFilter::ordered("latest"),
        },
        HomeSection {
            name: "Drama Popular",
            filter: all_with_order("popular"),
        },
    ]
}

/// Map the detail page status text. Unknown text counts as completed.
pub fn parse_status(text: &str) -> ShowStatus {
    match text.trim() {
        "Ongoing" => ShowStatus::Ongoing,
        _ => ShowStatus::Completed,
    }
}

/// Map the `Tipe:` field to a [`TvType`].
pub fn parse_kind(text: Option<&str>) -> TvType {
    let lower = text.unwrap_or_default().to_lowercase();
    if lower.contains("movie") {
        TvType::Movie
    } else if lower.contains("anime") {
        TvType::Anime
    } else {
        TvType::Drama
    }
}

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d, ([0-9]*)").expect("valid regex"));

static EPISODE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Episode|Eps)\s*(\d+)").expect("valid regex"));

/// Year from a release date like `Mar 3, 2021`.
pub fn parse_year(text: &str) -> Option<i32> {
    YEAR.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Episode ordinal from titles like `Episode 12` or `Eps 3`.
pub fn parse_episode_number(text: &str) -> Option<u32> {
    EPISODE_NUMBER.captures(text)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_known_values() {
        assert_eq!(parse_status("Ongoing"), ShowStatus::Ongoing);
        assert_eq!(parse_status("Completed"), ShowStatus::Completed);
        assert_eq!(parse_status("Hiatus"), ShowStatus::Completed);
    }

    #[test]
    fn kind_is_case_insensitive() {
        assert_eq!(parse_kind(Some(" Movie")), TvType::Movie);
        assert_eq!(parse_kind(Some("ANIME")), TvType::Anime);
        assert_eq!(parse_kind(Some("Drama")), TvType::Drama);
        assert_eq!(parse_kind(None), TvType::Drama);
    }

    #[test]
    fn year_from_release_date() {
        assert_eq!(parse_year("Mar 3, 2021"), Some(2021));
        assert_eq!(parse_year("2021"), None);
        assert_eq!(parse_year("Mar 3, "), None);
    }

    #[test]
    fn episode_number_patterns() {
        assert_eq!(parse_episode_number("Episode 12"), Some(12));
        assert_eq!(parse_episode_number("Love in Spring eps3"), Some(3));
        assert_eq!(parse_episode_number("EPISODE  7 END"), Some(7));
        assert_eq!(parse_episode_number("Special"), None);
    }

    #[test]
    fn home_sections_render_site_queries() {
        let queries: Vec<_> = home_sections()
            .into_iter()
            .map(|s| (s.name, s.filter.to_query()))
            .collect();
        assert_eq!(
            queries,
            vec![
                ("Drama Terbaru", "&status=&type=&order=update".to_string()),
                ("Baru Ditambahkan", "&order=latest".to_string()),
                ("Drama Popular", "&status=&type=&order=popular".to_string()),
            ]
        );
    }

    #[test]
    fn filter_encodes_values() {
        let filter = CatalogFilter {
            status: Some("Completed".to_string()),
            kind: Some("Movie & TV".to_string()),
            order: None,
        };
        assert_eq!(filter.to_query(), "&status=Completed&type=Movie%20%26%20TV");
        assert_eq!(CatalogFilter::default().to_query(), "");
    }
}
