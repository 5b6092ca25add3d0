//! Mirror option decoding.
//!
//! Episode pages list their players as `<option>` values inside
//! `.mobius > .mirror`. Each value is a base64-encoded HTML fragment holding
//! an `<iframe>`; its `src` is the candidate player URL.

use base64::{engine::general_purpose::STANDARD, Engine};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::error::CandidateError;
use crate::urls::fix_url;

static MIRROR_OPTIONS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".mobius > .mirror > option").expect("static selector"));
static IFRAME: Lazy<Selector> = Lazy::new(|| Selector::parse("iframe").expect("static selector"));

/// A decoded embedded-player URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateReference {
    /// Player URL, completed against the site URL.
    pub url: String,
    /// The option value as found on the page.
    pub encoded: String,
}

/// Decode one mirror option value into a candidate.
pub fn decode_mirror(value: &str, main_url: &str) -> Result<CandidateReference, CandidateError> {
    let bytes = STANDARD
        .decode(value.trim())
        .map_err(|e| CandidateError::Decode(e.to_string()))?;
    let fragment = String::from_utf8_lossy(&bytes);

    let src = Html::parse_fragment(&fragment)
        .select(&IFRAME)
        .next()
        .and_then(|iframe| iframe.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(str::to_string)
        .ok_or(CandidateError::MissingFrame)?;

    Ok(CandidateReference {
        url: fix_url(main_url, &src),
        encoded: value.to_string(),
    })
}

/// Decode every non-blank mirror option in document order.
///
/// Entries that fail to decode are returned as errors so the caller can
/// report them; they never abort the rest of the list.
pub fn extract_mirrors(
    html: &str,
    main_url: &str,
) -> Vec<Result<CandidateReference, CandidateError>> {
    let document = Html::parse_document(html);
    document
        .select(&MIRROR_OPTIONS)
        .filter_map(|option| option.value().attr("value"))
        .filter(|value| !value.trim().is_empty())
        .map(|value| decode_mirror(value, main_url))
        .collect()
}

/// Candidate URLs only, dropping undecodable entries.
pub fn extract_references(html: &str, main_url: &str) -> Vec<CandidateReference> {
    extract_mirrors(html, main_url)
        .into_iter()
        .filter_map(Result::ok)
        .collect()
}
