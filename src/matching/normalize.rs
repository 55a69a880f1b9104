//! Track key normalization.
//!
//! Canonicalizes a (title, artist) pair into the key used for exact-name
//! deduplication against a target playlist. The normalization is deliberately
//! aggressive: streaming catalogs disagree on remaster suffixes, feature
//! credits, and bracketed qualifiers far more often than on the base title.

/// Suffix markers that, when found, truncate the text at their first
/// occurrence. Covers the remaster/version/feature noise both catalogs append
/// to otherwise identical titles.
const SUFFIX_MARKERS: &[&str] = &[
    " - remaster",
    " - remastered",
    " remastered",
    " - single",
    " - radio edit",
    " - live",
    " - acoustic",
    " - remix",
    " - original",
    " - version",
    " - edit",
    " - mix",
    " - from",
    " - feat",
    " feat.",
    " ft.",
    " featuring",
];

/// Builds the normalized comparison key `"<clean_title>|<clean_artist>"`.
///
/// Total and pure: empty input components produce empty key components, and
/// the function is idempotent over its own output.
///
/// # Example
///
/// ```
/// use plsyncli::matching::normalize_track_key;
///
/// let a = normalize_track_key("Song (Live)", "Artist");
/// let b = normalize_track_key("song", "ARTIST");
/// assert_eq!(a, b);
/// ```
pub fn normalize_track_key(title: &str, artist: &str) -> String {
    format!("{}|{}", clean(title), clean(artist))
}

fn clean(text: &str) -> String {
    let mut text = text.to_lowercase();

    text = strip_bracketed(&text, '(', ')');
    text = strip_bracketed(&text, '[', ']');

    for marker in SUFFIX_MARKERS {
        if let Some(pos) = text.find(marker) {
            text.truncate(pos);
        }
    }

    collapse_whitespace(&strip_punctuation(&text))
}

/// Removes every `open`..`close` span, including the brackets, shortest span
/// first. An opening bracket that never closes is kept verbatim; the
/// punctuation pass downstream drops the stray bracket character itself, so
/// `"foo (bar"` cleans the same as `"foo bar"`.
pub(crate) fn strip_bracketed(text: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(open) {
        out.push_str(&rest[..start]);
        match rest[start..].find(close) {
            Some(offset) => rest = &rest[start + offset + close.len_utf8()..],
            None => {
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

pub(crate) fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect()
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
