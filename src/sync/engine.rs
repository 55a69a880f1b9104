//! # Reconciliation Engine
//!
//! The core of a sync run. For one (source playlist, target playlist) pair it
//! walks the source tracks through a layered decision cascade, first match
//! wins:
//!
//! 1. track id already in the sync cache for this pair
//! 2. normalized name key already in the target snapshot
//! 3. fuzzy match against the target's raw tracks
//! 4. catalog search, first result:
//!    a. no result: not found
//!    b. result id already in the target: already synced
//!    c. otherwise queued for a single batch add at the end
//!
//! Stages 2, 3 and 4b mark the cache immediately; they recognize a track as
//! already present, so nothing can later fail. Stage 4c marks are deferred
//! until the batch add succeeds, keeping the cache honest when the add fails
//! as a unit.
//!
//! Tracks are resolved strictly sequentially. Both services rate-limit, and
//! the per-call latency costs less than handling partial-batch races would.

use crate::{
    info,
    management::SyncCacheManager,
    matching::{MatchThresholds, find_fuzzy_match, normalize_track_key},
    types::{TargetSnapshot, Track},
    warning,
    ytmusic::{TargetError, YtMusicClient},
};

use super::stats::PairOutcome;

/// The two target-catalog calls the engine issues. Separated out so the
/// cascade can be exercised against scripted outcomes.
pub trait TargetOps {
    async fn search_song(&self, query: &str, limit: usize)
    -> Result<Vec<String>, TargetError>;
    async fn add_items(&self, playlist_id: &str, video_ids: &[String])
    -> Result<(), TargetError>;
}

impl TargetOps for YtMusicClient {
    async fn search_song(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<String>, TargetError> {
        self.search_songs(query, limit).await
    }

    async fn add_items(
        &self,
        playlist_id: &str,
        video_ids: &[String],
    ) -> Result<(), TargetError> {
        YtMusicClient::add_items(self, playlist_id, video_ids).await
    }
}

/// Identifies the pair being reconciled and the knobs that shape decisions.
pub struct PairContext<'a> {
    pub source_playlist_id: &'a str,
    pub target_playlist_id: &'a str,
    pub thresholds: MatchThresholds,
    pub max_search_results: usize,
    pub dry_run: bool,
}

/// Runs the decision cascade for every source track of one pair, issues the
/// batch add unless this is a dry run, and returns the counts.
///
/// The snapshot's id and key sets are updated in memory as tracks are queued
/// so later tracks in the same run cannot queue duplicates. This happens in
/// dry runs too, keeping the preview's counts identical to a real run's.
pub async fn reconcile_pair<T: TargetOps>(
    target: &T,
    ctx: &PairContext<'_>,
    source_tracks: &[Track],
    snapshot: &mut TargetSnapshot,
    cache: &mut SyncCacheManager,
) -> PairOutcome {
    let mut outcome = PairOutcome {
        total_tracks: source_tracks.len() as u64,
        ..Default::default()
    };

    let synced = cache.synced_tracks(ctx.source_playlist_id, ctx.target_playlist_id);
    let mut queued: Vec<String> = Vec::new();
    let mut queued_track_ids: Vec<String> = Vec::new();

    for track in source_tracks {
        // Stage 1: cache hit
        if synced.contains(&track.id) {
            outcome.already_synced += 1;
            continue;
        }

        // Stage 2: exact normalized-key hit
        let key = normalize_track_key(&track.title, &track.artist);
        if snapshot.track_keys.contains(&key) {
            outcome.already_synced += 1;
            cache.mark_synced(ctx.source_playlist_id, ctx.target_playlist_id, &track.id);
            continue;
        }

        // Stage 3: fuzzy hit
        if find_fuzzy_match(
            &track.title,
            &track.artist,
            &snapshot.raw_tracks,
            &ctx.thresholds,
        ) {
            outcome.already_synced += 1;
            cache.mark_synced(ctx.source_playlist_id, ctx.target_playlist_id, &track.id);
            continue;
        }

        // Stage 4: live search. A search failure counts as not found.
        let query = format!("{} {}", track.title, track.artist);
        let results = match target.search_song(&query, ctx.max_search_results).await {
            Ok(results) => results,
            Err(e) => {
                info!("Search failed for '{}': {}", query, e);
                Vec::new()
            }
        };

        let Some(video_id) = results.into_iter().next() else {
            info!("Not found: {} - {}", track.title, track.artist);
            outcome.not_found += 1;
            continue;
        };

        if snapshot.video_ids.contains(&video_id) {
            // Present already, likely from an earlier partial run
            outcome.already_synced += 1;
            cache.mark_synced(ctx.source_playlist_id, ctx.target_playlist_id, &track.id);
            continue;
        }

        snapshot.video_ids.insert(video_id.clone());
        snapshot.track_keys.insert(key);
        queued.push(video_id);
        queued_track_ids.push(track.id.clone());
        outcome.newly_added += 1;
    }

    if queued.is_empty() || ctx.dry_run {
        return outcome;
    }

    match target.add_items(ctx.target_playlist_id, &queued).await {
        Ok(()) => {
            for track_id in &queued_track_ids {
                cache.mark_synced(ctx.source_playlist_id, ctx.target_playlist_id, track_id);
            }
        }
        Err(e) => {
            // The whole batch fails as a unit. Nothing was added, so nothing
            // from this batch may claim a cache mark.
            warning!(
                "Batch add of {} tracks to {} failed: {}",
                queued.len(),
                ctx.target_playlist_id,
                e
            );
            outcome.errors += queued.len() as u64;
            outcome.newly_added -= queued.len() as u64;
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::Mutex,
    };

    use crate::matching::normalize_track_key;

    use super::*;

    /// Scripted target: search results by query, optional add failure, and a
    /// record of every call made.
    struct ScriptedTarget {
        search_results: HashMap<String, Vec<String>>,
        fail_add: bool,
        searches: Mutex<Vec<String>>,
        adds: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedTarget {
        fn new(results: &[(&str, &[&str])]) -> Self {
            ScriptedTarget {
                search_results: results
                    .iter()
                    .map(|(q, ids)| {
                        (q.to_string(), ids.iter().map(|s| s.to_string()).collect())
                    })
                    .collect(),
                fail_add: false,
                searches: Mutex::new(Vec::new()),
                adds: Mutex::new(Vec::new()),
            }
        }

        fn failing_add(mut self) -> Self {
            self.fail_add = true;
            self
        }

        fn add_calls(&self) -> Vec<Vec<String>> {
            self.adds.lock().unwrap().clone()
        }

        fn search_calls(&self) -> Vec<String> {
            self.searches.lock().unwrap().clone()
        }
    }

    impl TargetOps for ScriptedTarget {
        async fn search_song(
            &self,
            query: &str,
            _limit: usize,
        ) -> Result<Vec<String>, TargetError> {
            self.searches.lock().unwrap().push(query.to_string());
            Ok(self.search_results.get(query).cloned().unwrap_or_default())
        }

        async fn add_items(
            &self,
            _playlist_id: &str,
            video_ids: &[String],
        ) -> Result<(), TargetError> {
            self.adds.lock().unwrap().push(video_ids.to_vec());
            if self.fail_add {
                Err(TargetError::Api("backend said no".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn track(id: &str, title: &str, artist: &str) -> Track {
        Track {
            id: id.to_string(),
            title: title.to_string(),
            artist: artist.to_string(),
            album: String::new(),
        }
    }

    fn ctx(dry_run: bool) -> PairContext<'static> {
        PairContext {
            source_playlist_id: "src",
            target_playlist_id: "tgt",
            thresholds: MatchThresholds::default(),
            max_search_results: 5,
            dry_run,
        }
    }

    fn snapshot_with_key(title: &str, artist: &str) -> TargetSnapshot {
        let mut snapshot = TargetSnapshot::default();
        snapshot
            .track_keys
            .insert(normalize_track_key(title, artist));
        snapshot.raw_tracks.push(crate::types::RawTargetTrack {
            title: title.to_lowercase(),
            artist: artist.to_lowercase(),
            video_id: Some("existing".to_string()),
        });
        snapshot
    }

    #[tokio::test]
    async fn search_hit_is_queued_and_key_hit_is_cache_marked() {
        let target = ScriptedTarget::new(&[("Foo Bar", &["v-foo"])]);
        let tracks = vec![
            track("s1", "Foo", "Bar"),
            track("s2", "Baz (Remastered)", "Qux"),
        ];
        let mut snapshot = snapshot_with_key("Baz", "Qux");
        let mut cache = SyncCacheManager::new();

        let outcome =
            reconcile_pair(&target, &ctx(false), &tracks, &mut snapshot, &mut cache).await;

        assert_eq!(outcome.already_synced, 1);
        assert_eq!(outcome.newly_added, 1);
        assert_eq!(outcome.not_found, 0);
        assert_eq!(outcome.errors, 0);
        assert_eq!(target.add_calls(), vec![vec!["v-foo".to_string()]]);
        let synced = cache.synced_tracks("src", "tgt");
        assert!(synced.contains("s1"));
        assert!(synced.contains("s2"));
    }

    #[tokio::test]
    async fn no_search_result_counts_as_not_found() {
        let target = ScriptedTarget::new(&[]);
        let tracks = vec![track("s1", "Obscure", "Nobody")];
        let mut snapshot = TargetSnapshot::default();
        let mut cache = SyncCacheManager::new();

        let outcome =
            reconcile_pair(&target, &ctx(false), &tracks, &mut snapshot, &mut cache).await;

        assert_eq!(outcome.not_found, 1);
        assert_eq!(outcome.newly_added, 0);
        assert!(target.add_calls().is_empty());
        assert!(cache.synced_tracks("src", "tgt").is_empty());
    }

    #[tokio::test]
    async fn batch_failure_converts_additions_to_errors_without_cache_marks() {
        let target =
            ScriptedTarget::new(&[("A X", &["v-a"]), ("B Y", &["v-b"])]).failing_add();
        let tracks = vec![
            track("s1", "A", "X"),
            track("s2", "B", "Y"),
            track("s3", "Baz", "Qux"), // key hit, marked during the cascade
        ];
        let mut snapshot = snapshot_with_key("Baz", "Qux");
        let mut cache = SyncCacheManager::new();

        let outcome =
            reconcile_pair(&target, &ctx(false), &tracks, &mut snapshot, &mut cache).await;

        assert_eq!(outcome.errors, 2);
        assert_eq!(outcome.newly_added, 0);
        assert_eq!(outcome.already_synced, 1);
        // Only the cascade-stage mark survives the failed batch
        let synced = cache.synced_tracks("src", "tgt");
        assert_eq!(synced.len(), 1);
        assert!(synced.contains("s3"));
    }

    #[tokio::test]
    async fn dry_run_classifies_identically_but_never_adds() {
        let tracks = vec![
            track("s1", "Foo", "Bar"),
            track("s2", "Baz", "Qux"),
            track("s3", "Ghost", "Nobody"),
        ];

        let dry_target = ScriptedTarget::new(&[("Foo Bar", &["v-foo"])]);
        let mut dry_snapshot = snapshot_with_key("Baz", "Qux");
        let mut dry_cache = SyncCacheManager::new();
        let dry = reconcile_pair(
            &dry_target,
            &ctx(true),
            &tracks,
            &mut dry_snapshot,
            &mut dry_cache,
        )
        .await;

        let real_target = ScriptedTarget::new(&[("Foo Bar", &["v-foo"])]);
        let mut real_snapshot = snapshot_with_key("Baz", "Qux");
        let mut real_cache = SyncCacheManager::new();
        let real = reconcile_pair(
            &real_target,
            &ctx(false),
            &tracks,
            &mut real_snapshot,
            &mut real_cache,
        )
        .await;

        assert_eq!(dry, real);
        assert!(dry_target.add_calls().is_empty());
        assert_eq!(real_target.add_calls().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_search_results_within_a_run_are_queued_once() {
        // Two source tracks resolve to the same target id; the second must
        // count as already synced, not queue a duplicate.
        let target =
            ScriptedTarget::new(&[("Foo Bar", &["v-same"]), ("Foo2 Bar", &["v-same"])]);
        let tracks = vec![track("s1", "Foo", "Bar"), track("s2", "Foo2", "Bar")];
        let mut snapshot = TargetSnapshot::default();
        let mut cache = SyncCacheManager::new();

        let outcome =
            reconcile_pair(&target, &ctx(false), &tracks, &mut snapshot, &mut cache).await;

        assert_eq!(outcome.newly_added, 1);
        assert_eq!(outcome.already_synced, 1);
        assert_eq!(target.add_calls(), vec![vec!["v-same".to_string()]]);
    }

    #[tokio::test]
    async fn second_run_with_persisted_cache_adds_nothing() {
        let tracks = vec![track("s1", "Foo", "Bar"), track("s2", "Baz", "Qux")];
        let target = ScriptedTarget::new(&[("Foo Bar", &["v-foo"])]);
        let mut snapshot = snapshot_with_key("Baz", "Qux");
        let mut cache = SyncCacheManager::new();

        let first =
            reconcile_pair(&target, &ctx(false), &tracks, &mut snapshot, &mut cache).await;
        assert_eq!(first.newly_added, 1);

        // Same cache, fresh target calls: everything is now a cache hit
        let target2 = ScriptedTarget::new(&[]);
        let second =
            reconcile_pair(&target2, &ctx(false), &tracks, &mut snapshot, &mut cache).await;

        assert_eq!(second.newly_added, 0);
        assert_eq!(second.already_synced, 2);
        assert!(target2.search_calls().is_empty());
        assert!(target2.add_calls().is_empty());
    }
}
