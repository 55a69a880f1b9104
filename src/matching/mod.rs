//! Track matching primitives.
//!
//! Two layers of text comparison drive deduplication during a sync:
//!
//! - [`normalize`] canonicalizes a (title, artist) pair into a comparable key,
//!   aggressively stripping noise like remaster suffixes and parentheticals.
//! - [`fuzzy`] scores pairs of cleaned strings with an edit-distance ratio and
//!   applies dual thresholds to decide match/no-match.

pub mod fuzzy;
pub mod normalize;

pub use fuzzy::{MatchThresholds, find_fuzzy_match, similarity};
pub use normalize::normalize_track_key;
