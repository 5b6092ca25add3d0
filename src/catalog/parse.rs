//! HTML parsing for listing, search and detail pages.
//!
//! Missing markup is treated as an absent field. Cards without a link or a
//! title are skipped; episodes without an anchor are skipped.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::{
    parse_episode_number, parse_kind, parse_status, parse_year, CatalogEntry, Episode,
    SearchResult, TvType,
};
use crate::urls::{fix_url, fix_url_opt, series_link};

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static ARTICLE: Lazy<Selector> = Lazy::new(|| selector("article[itemscope=itemscope]"));
static CARD_LINK: Lazy<Selector> = Lazy::new(|| selector("a.tip"));
static CARD_TITLE: Lazy<Selector> = Lazy::new(|| selector("h2[itemprop=headline]"));
static CARD_POSTER: Lazy<Selector> = Lazy::new(|| selector("img:last-child"));

static TITLE: Lazy<Selector> = Lazy::new(|| selector("h1.entry-title"));
static POSTER: Lazy<Selector> = Lazy::new(|| selector("div.thumb img:last-child"));
static TAGS: Lazy<Selector> = Lazy::new(|| selector(".genxed > a"));
static INFO_SPANS: Lazy<Selector> = Lazy::new(|| selector(".info-content .spe span"));
static RELEASE_TIME: Lazy<Selector> = Lazy::new(|| selector(".info-content > .spe > span > time"));
static STATUS: Lazy<Selector> = Lazy::new(|| selector(".info-content > .spe > span:nth-child(1)"));
static SYNOPSIS: Lazy<Selector> = Lazy::new(|| selector(".entry-content > p"));
static EPISODE_ITEMS: Lazy<Selector> = Lazy::new(|| selector(".eplister > ul > li"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| selector("a"));
static EPISODE_TITLE: Lazy<Selector> = Lazy::new(|| selector("a > .epl-title"));
static RELATED: Lazy<Selector> = Lazy::new(|| selector(".listupd > article[itemscope=itemscope]"));

/// Element text with whitespace runs collapsed to single spaces.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of the element's direct text children only.
fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|child| child.value().as_text().map(|t| t.to_string()))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Joined text of every match, like a multi-element `.text()`.
fn joined_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .map(text_of)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_attr(root: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    root.select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}

fn to_search_result(card: ElementRef<'_>, main_url: &str) -> Option<SearchResult> {
    let href = first_attr(card, &CARD_LINK, "href")?;
    let title = card.select(&CARD_TITLE).next().map(text_of)?;
    let poster = first_attr(card, &CARD_POSTER, "src").and_then(|src| fix_url_opt(main_url, &src));

    Some(SearchResult {
        title,
        url: series_link(main_url, &href),
        poster,
        kind: TvType::Drama,
    })
}

/// Parse every `article` card of a listing or search page.
pub fn parse_search_results(html: &str, main_url: &str) -> Vec<SearchResult> {
    let document = Html::parse_document(html);
    document
        .select(&ARTICLE)
        .filter_map(|card| to_search_result(card, main_url))
        .collect()
}

fn parse_episodes(document: &Html, main_url: &str) -> Vec<Episode> {
    let mut episodes: Vec<Episode> = document
        .select(&EPISODE_ITEMS)
        .filter_map(|item| {
            let anchor = item.select(&ANCHOR).next()?;
            let url = fix_url(main_url, anchor.value().attr("href").unwrap_or_default());
            let title = item
                .select(&EPISODE_TITLE)
                .next()
                .map_or_else(|| text_of(anchor), text_of);
            let number = parse_episode_number(&title);

            Some(Episode { title, url, number })
        })
        .collect();

    // The site lists newest first.
    episodes.reverse();
    episodes
}

/// Parse a series or movie detail page fetched from `url`.
pub fn parse_entry(html: &str, url: &str, main_url: &str) -> CatalogEntry {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let title = document.select(&TITLE).next().map(text_of).unwrap_or_default();
    let poster = first_attr(root, &POSTER, "src").and_then(|src| fix_url_opt(main_url, &src));
    let tags = document.select(&TAGS).map(text_of).collect();

    let kind_text = document
        .select(&INFO_SPANS)
        .find(|span| text_of(*span).contains("Tipe:"))
        .map(own_text);
    let year = document
        .select(&RELEASE_TIME)
        .next()
        .and_then(|time| parse_year(&text_of(time)));
    let status = parse_status(&joined_text(&document, &STATUS).replace("Status: ", ""));
    let synopsis = joined_text(&document, &SYNOPSIS);

    let episodes = parse_episodes(&document, main_url);
    let related = document
        .select(&RELATED)
        .filter_map(|card| to_search_result(card, main_url))
        .collect();

    CatalogEntry {
        title,
        url: url.to_string(),
        kind: parse_kind(kind_text.as_deref()),
        poster,
        tags,
        status,
        synopsis,
        year,
        episodes,
        related,
    }
}
