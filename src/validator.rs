//! # Mapping Validator Module
//!
//! Checks every configured playlist mapping against the target catalog before
//! a sync touches it, partitioning the pairs into valid, missing, auth-error
//! and unknown-error buckets. Classification is conservative: an error only
//! counts as "missing" when it clearly says so, because deleting a mapping
//! over a transient failure loses user state while retrying a dead mapping
//! merely wastes a request.

use crate::{
    types::PlaylistPair,
    ytmusic::{TargetError, YtMusicClient},
};

/// Message fragments that indicate an expired or rejected credential.
const AUTH_TOKENS: &[&str] = &[
    "401",
    "403",
    "unauthorized",
    "authentication",
    "invalid credentials",
    "expired",
    "forbidden",
];

/// Message fragments that indicate the playlist itself is gone.
const MISSING_TOKENS: &[&str] = &["404", "not found", "does not exist", "deleted"];

/// What a probe failure means for the mapping that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingIssue {
    /// The target playlist no longer exists. Safe to prune.
    Missing,
    /// The credential was rejected. The mapping itself is fine.
    Auth,
    /// Anything else. Treated like an auth error: keep the mapping.
    Unknown(String),
}

/// Outcome of validating all mappings.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub valid: Vec<PlaylistPair>,
    pub missing: Vec<PlaylistPair>,
    pub auth_errors: Vec<PlaylistPair>,
    pub unknown_errors: Vec<(PlaylistPair, String)>,
}

impl ValidationReport {
    /// Pairs a sync run should still attempt: confirmed-valid ones plus
    /// auth-failures, since a refreshed credential may make those work and
    /// skipping them would silently drop playlists.
    pub fn syncable(&self) -> Vec<PlaylistPair> {
        let mut pairs = self.valid.clone();
        pairs.extend(self.auth_errors.iter().cloned());
        pairs
    }

    /// A report that treats every pair as syncable without probing. Used when
    /// the auth pre-check already failed and probe results would all be
    /// credential noise.
    pub fn all_valid(pairs: &[PlaylistPair]) -> Self {
        ValidationReport {
            valid: pairs.to_vec(),
            ..Default::default()
        }
    }
}

/// Existence probe for a target playlist. The sync and validate commands use
/// the real client; tests substitute scripted outcomes.
pub trait PlaylistProbe {
    async fn probe(&self, playlist_id: &str) -> Result<(), TargetError>;
}

impl PlaylistProbe for YtMusicClient {
    async fn probe(&self, playlist_id: &str) -> Result<(), TargetError> {
        self.probe_playlist(playlist_id).await
    }
}

/// Classifies a probe failure. Typed variants decide directly; only the
/// untyped [`TargetError::Api`] and transport errors fall back to message
/// substrings, with auth fragments checked before missing fragments.
pub fn classify_target_error(err: &TargetError) -> MappingIssue {
    match err {
        TargetError::Auth(_) => MappingIssue::Auth,
        TargetError::NotFound(_) => MappingIssue::Missing,
        TargetError::Http(e) => classify_message(&e.to_string()),
        TargetError::Api(msg) => classify_message(msg),
    }
}

fn classify_message(message: &str) -> MappingIssue {
    let lower = message.to_lowercase();
    if AUTH_TOKENS.iter().any(|t| lower.contains(t)) {
        return MappingIssue::Auth;
    }
    if MISSING_TOKENS.iter().any(|t| lower.contains(t)) {
        return MappingIssue::Missing;
    }
    MappingIssue::Unknown(message.to_string())
}

/// Probes every mapped target playlist and partitions the pairs. Pairs with
/// no target id yet are valid by definition, the sync will create their
/// playlist on first run.
pub async fn validate_mappings<P: PlaylistProbe>(
    probe: &P,
    pairs: &[PlaylistPair],
) -> ValidationReport {
    let mut report = ValidationReport::default();

    for pair in pairs {
        let Some(target_id) = pair.ytmusic_id.as_deref().filter(|id| !id.is_empty()) else {
            report.valid.push(pair.clone());
            continue;
        };

        match probe.probe(target_id).await {
            Ok(()) => report.valid.push(pair.clone()),
            Err(err) => match classify_target_error(&err) {
                MappingIssue::Missing => report.missing.push(pair.clone()),
                MappingIssue::Auth => report.auth_errors.push(pair.clone()),
                MappingIssue::Unknown(msg) => report.unknown_errors.push((pair.clone(), msg)),
            },
        }
    }

    report
}
