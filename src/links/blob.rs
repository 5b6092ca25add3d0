//! Payload script lookup on Drive player pages.
//!
//! The player config sits in the inline `<script>` that directly follows the
//! `.picasa` marker image.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::error::CandidateError;

static MARKER: Lazy<Selector> = Lazy::new(|| Selector::parse(".picasa").expect("static selector"));

/// Raw text of the element following the marker.
pub fn locate_blob(html: &str) -> Result<String, CandidateError> {
    let document = Html::parse_document(html);
    let marker = document.select(&MARKER).next().ok_or(CandidateError::MissingBlob)?;

    marker
        .next_siblings()
        .find_map(ElementRef::wrap)
        .map(|sibling| sibling.text().collect::<String>())
        .ok_or(CandidateError::MissingBlob)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_script_after_marker() {
        let html = r#"<html><body>
            <script>var unrelated = 1;</script>
            <img class="picasa" src="/logo.png">
            <script type="text/javascript">jwplayer("p").setup({sources: [],});</script>
        </body></html>"#;
        assert_eq!(locate_blob(html).unwrap(), r#"jwplayer("p").setup({sources: [],});"#);
    }

    #[test]
    fn missing_marker_is_missing_blob() {
        let html = "<html><body><script>var a = 1;</script></body></html>";
        assert!(matches!(locate_blob(html), Err(CandidateError::MissingBlob)));
    }

    #[test]
    fn marker_without_sibling_is_missing_blob() {
        let html = r#"<html><body><div><img class="picasa"> trailing text</div></body></html>"#;
        assert!(matches!(locate_blob(html), Err(CandidateError::MissingBlob)));
    }
}
