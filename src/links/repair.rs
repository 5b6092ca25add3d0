//! Repair of the JavaScript object literals in the Drive player config.
//!
//! The player script contains something like
//!
//! ```text
//! sources: [{"file":"https://…/720.mp4","label":"720p","type":"mp4"}],
//! tracks:[{file:"https://…/id.vtt",label:"Indonesia", //language
//!          kind:"captions",default:true}],
//! ```
//!
//! Neither array is JSON: keys may be bare identifiers, a stray `//language`
//! comment sits in the track list, and the arrays are only recoverable by
//! cutting between the marker and the next `],`. Each segment is cut, wrapped
//! in `[...]`, passed through [`quote_bare_keys`] and parsed with serde.
//! Anything the repair does not cover fails closed with a [`RepairError`].

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::RepairError;

const SOURCES_MARKER: &str = "sources: [";
const TRACKS_MARKER: &str = "tracks:[";
const SEGMENT_END: &str = "],";
const STRAY_COMMENT: &str = "//language";

/// One playable rendition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VariantRecord {
    pub file: String,
    pub label: String,
    /// Stream format, `"hls"` for manifests.
    #[serde(rename = "type")]
    pub format: String,
    #[serde(default)]
    pub default: Option<bool>,
}

/// One subtitle track.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackRecord {
    pub file: String,
    pub label: String,
    pub kind: String,
    #[serde(default)]
    pub default: Option<bool>,
}

/// Text between `marker` and the next `],` (or the end of the blob).
fn segment<'a>(blob: &'a str, marker: &'static str) -> Result<&'a str, RepairError> {
    let start = blob.find(marker).ok_or(RepairError::MarkerNotFound(marker))? + marker.len();
    let rest = &blob[start..];
    Ok(rest.find(SEGMENT_END).map_or(rest, |end| &rest[..end]))
}

fn parse_array<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, RepairError> {
    let repaired = quote_bare_keys(&format!("[{body}]"));
    Ok(serde_json::from_str(&repaired)?)
}

/// Decode the `sources: [...]` array.
pub fn extract_variants(blob: &str) -> Result<Vec<VariantRecord>, RepairError> {
    parse_array(segment(blob, SOURCES_MARKER)?)
}

/// Decode the `tracks:[...]` array.
pub fn extract_tracks(blob: &str) -> Result<Vec<TrackRecord>, RepairError> {
    let body = segment(blob, TRACKS_MARKER)?.replace(STRAY_COMMENT, "");
    parse_array(&body)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Turn an object literal into JSON text.
///
/// Outside string literals, an identifier that directly follows `{` or `,`
/// and is followed by `:` gets double quotes, and a `,` before `}`, `]` or
/// the end of input is dropped. String contents are never touched, so
/// already-quoted keys and URLs containing `file` or `label` survive as is.
pub fn quote_bare_keys(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut last_significant: Option<char> = None;
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;

    let next_significant = |from: usize| chars[from..].iter().copied().find(|c| !c.is_whitespace());

    while i < chars.len() {
        let c = chars[i];

        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
                last_significant = Some('"');
            }
            i += 1;
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
                i += 1;
            }
            ',' if matches!(next_significant(i + 1), None | Some('}' | ']')) => {
                i += 1;
            }
            c if is_ident_start(c) && matches!(last_significant, Some('{' | ',')) => {
                let start = i;
                while i < chars.len() && is_ident_char(chars[i]) {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();
                if next_significant(i) == Some(':') {
                    out.push('"');
                    out.push_str(&ident);
                    out.push('"');
                } else {
                    out.push_str(&ident);
                }
                last_significant = ident.chars().last();
            }
            c => {
                out.push(c);
                if !c.is_whitespace() {
                    last_significant = Some(c);
                }
                i += 1;
            }
        }
    }

    out
}
