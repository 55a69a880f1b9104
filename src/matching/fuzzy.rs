//! Fuzzy track matching.
//!
//! Scores a candidate (title, artist) against the raw tracks of a target
//! playlist using a normalized edit-distance ratio, with a lighter text
//! cleanup than the key normalizer (brackets and punctuation only, no suffix
//! truncation).

use crate::types::RawTargetTrack;

use super::normalize::{collapse_whitespace, strip_bracketed, strip_punctuation};

/// Similarity thresholds for the fuzzy match decision.
///
/// The defaults (0.70 / 0.60 / 0.85) were chosen empirically: high name
/// similarity alone is a strong signal, while moderate name plus moderate
/// artist similarity reduces false positives from generically named tracks.
/// Treat them as a policy knob, overridable through configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchThresholds {
    pub name: f64,
    pub artist: f64,
    pub strong_name: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        MatchThresholds {
            name: 0.70,
            artist: 0.60,
            strong_name: 0.85,
        }
    }
}

impl MatchThresholds {
    /// The match rule: `(name >= 0.70 AND artist >= 0.60) OR name >= 0.85`
    /// with the configured values in place of the literals.
    pub fn is_match(&self, name_ratio: f64, artist_ratio: f64) -> bool {
        (name_ratio >= self.name && artist_ratio >= self.artist)
            || name_ratio >= self.strong_name
    }
}

/// Similarity ratio in `[0, 1]` between two cleaned strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Cleans text for ratio comparison: lower-case, bracketed spans removed,
/// punctuation stripped, whitespace collapsed.
pub fn clean_for_compare(text: &str) -> String {
    let text = text.to_lowercase();
    let text = strip_bracketed(&text, '(', ')');
    let text = strip_bracketed(&text, '[', ']');
    collapse_whitespace(&strip_punctuation(&text))
}

/// Scans the target playlist's raw tracks for a fuzzy match of the candidate,
/// short-circuiting on the first hit. Never fails; an empty target list simply
/// yields `false`.
pub fn find_fuzzy_match(
    title: &str,
    artist: &str,
    targets: &[RawTargetTrack],
    thresholds: &MatchThresholds,
) -> bool {
    let clean_title = clean_for_compare(title);
    let clean_artist = clean_for_compare(artist);

    targets.iter().any(|t| {
        let name_ratio = similarity(&clean_title, &clean_for_compare(&t.title));
        let artist_ratio = similarity(&clean_artist, &clean_for_compare(&t.artist));
        thresholds.is_match(name_ratio, artist_ratio)
    })
}
