//! # Sync Module
//!
//! One-directional playlist reconciliation, Spotify to YouTube Music.
//! [`run_sync`] is the produced interface the CLI layer consumes: it
//! validates the configured mappings, fetches both sides of every pair,
//! drives the [`engine`] cascade, applies the batch additions, and persists
//! the sync cache once at the end of the run. An interrupted run therefore
//! loses at most the in-memory progress of that run and never corrupts
//! stored state.
//!
//! Failure handling follows the error taxonomy: missing credentials or an
//! empty mapping abort before any network call, an unreachable service
//! aborts the run, and a failure inside one playlist pair is logged and
//! counted while the remaining pairs continue. The end-of-run summary is
//! emitted even after partial failure.

pub mod engine;
pub mod log;
pub mod stats;

pub use engine::{PairContext, TargetOps, reconcile_pair};
pub use stats::{PairOutcome, SyncStats};

use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Res,
    config::Config,
    management::{MappingManager, SyncCacheManager, TokenManager},
    spotify,
    types::{PlaylistPair, TargetPlaylist},
    validator::{self, ValidationReport},
    warning,
    ytmusic::{TargetError, YtMusicClient},
};

use log::RunLog;

/// Runs a full sync pass over every configured playlist mapping.
pub async fn run_sync(config: &Config, dry_run: bool) -> Res<()> {
    let started = Instant::now();
    let run_log = RunLog::new();
    run_log.line(if dry_run {
        "Starting sync (dry run)"
    } else {
        "Starting sync"
    });

    let mut mappings = MappingManager::load()
        .await
        .unwrap_or_else(|_| MappingManager::new(None));
    if mappings.is_empty() {
        return Err("no playlist mappings configured. Run: plsyncli mapping add".into());
    }

    // Both services must be reachable before any pair is touched.
    let mut token_manager = TokenManager::load()
        .await
        .map_err(|_| "not authenticated with Spotify. Run: plsyncli auth")?;
    let token = token_manager.get_valid_token(&config.spotify).await;
    let user = spotify::playlists::get_current_user(&token, &config.spotify)
        .await
        .map_err(|e| format!("cannot reach Spotify: {}", e))?;
    run_log.line(&format!(
        "Connected to Spotify as {}",
        user.display_name.as_deref().unwrap_or("unknown user")
    ));

    let target = YtMusicClient::from_stored()
        .await
        .map_err(|e| e.to_string())?;

    let report = validate_pairs(&target, &mappings.all(), &run_log).await?;
    for pair in &report.missing {
        warning!(
            "Target playlist for {} no longer exists; run 'plsyncli validate --prune' to clean up",
            pair.spotify_id
        );
    }
    for (pair, msg) in &report.unknown_errors {
        warning!("Could not validate mapping for {}: {}", pair.spotify_id, msg);
    }

    let mut cache = SyncCacheManager::load().await.unwrap_or_else(|e| {
        warning!("Sync cache unreadable ({}), starting from empty", e);
        SyncCacheManager::new()
    });

    let mut stats = SyncStats::default();
    for pair in report.syncable() {
        match process_pair(
            config,
            &token,
            &target,
            &pair,
            &mut mappings,
            &mut cache,
            dry_run,
            &run_log,
        )
        .await
        {
            Ok(outcome) => stats.absorb(outcome),
            Err(e) => {
                // One bad playlist never aborts the whole sync
                warning!("Failed to sync playlist {}: {}", pair.spotify_id, e);
                stats.playlists_failed += 1;
                stats.errors += 1;
            }
        }
    }

    if !dry_run {
        if let Err(e) = cache.persist().await {
            warning!("Could not persist sync cache: {}", e);
        }
    }

    for line in stats.summary_lines(started.elapsed(), dry_run) {
        run_log.line(&line);
    }

    Ok(())
}

/// What the target-side session pre-check means for the run.
#[derive(Debug)]
enum Precheck {
    /// The session works, so every mapping gets probed.
    Validate,
    /// The credential was rejected. Probes would classify every pair as an
    /// auth error, so validation is skipped and all pairs stay syncable.
    SkipValidation(String),
    /// The service could not be reached at all. Fatal for the run; syncing
    /// against a dead service would only turn every pair into errors.
    Abort(TargetError),
}

fn classify_precheck(result: Result<(), TargetError>) -> Precheck {
    match result {
        Ok(()) => Precheck::Validate,
        Err(TargetError::Auth(msg)) => Precheck::SkipValidation(msg),
        Err(e) => Precheck::Abort(e),
    }
}

/// Probes the target side of every mapping, after checking the session itself
/// works. A connection-level failure aborts the run.
async fn validate_pairs(
    target: &YtMusicClient,
    pairs: &[PlaylistPair],
    run_log: &RunLog,
) -> Res<ValidationReport> {
    match classify_precheck(target.check_auth().await) {
        Precheck::Validate => Ok(validator::validate_mappings(target, pairs).await),
        Precheck::SkipValidation(msg) => {
            warning!(
                "YouTube Music session check failed ({}); skipping mapping validation",
                msg
            );
            Ok(ValidationReport::all_valid(pairs))
        }
        Precheck::Abort(e) => {
            run_log.line(&format!("YouTube Music unreachable: {}", e));
            Err(format!("cannot reach YouTube Music: {}", e).into())
        }
    }
}

/// Syncs one playlist pair: resolves (or creates) the target playlist,
/// fetches both snapshots, and runs the reconciliation cascade.
#[allow(clippy::too_many_arguments)]
async fn process_pair(
    config: &Config,
    token: &str,
    target: &YtMusicClient,
    pair: &PlaylistPair,
    mappings: &mut MappingManager,
    cache: &mut SyncCacheManager,
    dry_run: bool,
    run_log: &RunLog,
) -> Res<PairOutcome> {
    let source_name =
        spotify::playlists::get_playlist_name(token, &config.spotify, &pair.spotify_id).await?;

    let target_id = match pair.ytmusic_id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => id.to_string(),
        None => {
            match resolve_default_target(config, target, pair, &source_name, mappings, dry_run)
                .await?
            {
                Some(id) => id,
                None => {
                    // Dry run and the target playlist does not exist yet.
                    // Creating it would be a mutating call, so the pair is
                    // announced and skipped.
                    run_log.line(&format!(
                        "Would create target playlist for '{}' and sync into it",
                        source_name
                    ));
                    return Ok(PairOutcome::default());
                }
            }
        }
    };

    run_log.line(&format!("Syncing '{}' -> {}", source_name, target_id));

    let spinner = fetch_spinner(&source_name);
    let source_tracks =
        spotify::playlists::get_playlist_tracks(token, &config.spotify, &pair.spotify_id).await;
    let snapshot = target.get_playlist_snapshot(&target_id).await;
    spinner.finish_and_clear();

    let source_tracks = source_tracks?;
    let mut snapshot = snapshot?;

    let ctx = PairContext {
        source_playlist_id: &pair.spotify_id,
        target_playlist_id: &target_id,
        thresholds: config.thresholds,
        max_search_results: config.max_search_results as usize,
        dry_run,
    };
    let outcome = reconcile_pair(target, &ctx, &source_tracks, &mut snapshot, cache).await;

    run_log.line(&format!(
        "  {} tracks: {} synced, {} {}, {} not found, {} errors",
        outcome.total_tracks,
        outcome.already_synced,
        outcome.newly_added,
        if dry_run { "would add" } else { "added" },
        outcome.not_found,
        outcome.errors
    ));

    Ok(outcome)
}


fn fetch_spinner(playlist_name: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Fetching tracks of '{}'...", playlist_name));
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Target-library operations needed to resolve an unmapped pair.
pub trait TargetDirectory {
    async fn list_playlists(&self) -> Result<Vec<TargetPlaylist>, TargetError>;
    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        private: bool,
    ) -> Result<String, TargetError>;
}

impl TargetDirectory for YtMusicClient {
    async fn list_playlists(&self) -> Result<Vec<TargetPlaylist>, TargetError> {
        YtMusicClient::list_playlists(self).await
    }

    async fn create_playlist(
        &self,
        title: &str,
        description: &str,
        private: bool,
    ) -> Result<String, TargetError> {
        YtMusicClient::create_playlist(self, title, description, private).await
    }
}

/// Resolves the target playlist for an unmapped pair: the configured default
/// playlist name, or the source playlist's own name. An existing target
/// playlist with that title is reused; otherwise one is created. Returns
/// `None` when creation would be needed during a dry run. Outside dry runs the
/// resolved id is written back to the mapping so the next run skips the
/// lookup; a dry run leaves the mapping store untouched.
async fn resolve_default_target<T: TargetDirectory>(
    config: &Config,
    target: &T,
    pair: &PlaylistPair,
    source_name: &str,
    mappings: &mut MappingManager,
    dry_run: bool,
) -> Res<Option<String>> {
    let title = config
        .default_target_playlist
        .clone()
        .unwrap_or_else(|| source_name.to_string());

    let existing = target
        .list_playlists()
        .await?
        .into_iter()
        .find(|p| p.title == title);

    let target_id = match existing {
        Some(playlist) => playlist.id,
        None if dry_run => return Ok(None),
        None => {
            target
                .create_playlist(
                    &title,
                    &format!("Synced from {}", source_name),
                    config.target_playlist_private,
                )
                .await?
        }
    };

    if !dry_run {
        mappings.add(PlaylistPair {
            spotify_id: pair.spotify_id.clone(),
            ytmusic_id: Some(target_id.clone()),
        });
        if let Err(e) = mappings.persist().await {
            warning!("Could not persist updated mapping: {}", e);
        }
    }

    Ok(Some(target_id))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{config::SpotifyConfig, matching::MatchThresholds};

    fn test_config() -> Config {
        Config {
            spotify: SpotifyConfig {
                client_id: String::new(),
                redirect_uri: String::new(),
                scope: String::new(),
                auth_url: String::new(),
                token_url: String::new(),
                api_url: String::new(),
            },
            server_addr: String::new(),
            default_target_playlist: None,
            target_playlist_private: true,
            max_search_results: 5,
            thresholds: MatchThresholds::default(),
        }
    }

    struct ScriptedDirectory {
        playlists: Vec<TargetPlaylist>,
        created: Mutex<Vec<String>>,
    }

    impl ScriptedDirectory {
        fn with_playlists(playlists: Vec<TargetPlaylist>) -> Self {
            Self {
                playlists,
                created: Mutex::new(Vec::new()),
            }
        }
    }

    impl TargetDirectory for ScriptedDirectory {
        async fn list_playlists(&self) -> Result<Vec<TargetPlaylist>, TargetError> {
            Ok(self.playlists.clone())
        }

        async fn create_playlist(
            &self,
            title: &str,
            _description: &str,
            _private: bool,
        ) -> Result<String, TargetError> {
            self.created.lock().unwrap().push(title.to_string());
            Ok("created-id".to_string())
        }
    }

    #[test]
    fn session_check_transport_failure_aborts_the_run() {
        assert!(matches!(
            classify_precheck(Err(TargetError::Api("HTTP 500".to_string()))),
            Precheck::Abort(_)
        ));
        assert!(matches!(
            classify_precheck(Err(TargetError::NotFound("gone".to_string()))),
            Precheck::Abort(_)
        ));
    }

    #[test]
    fn session_check_auth_failure_only_skips_validation() {
        assert!(matches!(
            classify_precheck(Err(TargetError::Auth("HTTP 401".to_string()))),
            Precheck::SkipValidation(_)
        ));
        assert!(matches!(classify_precheck(Ok(())), Precheck::Validate));
    }

    #[tokio::test]
    async fn dry_run_resolution_reuses_existing_target_without_mapping_writes() {
        let config = test_config();
        let directory = ScriptedDirectory::with_playlists(vec![TargetPlaylist {
            id: "yt-9".to_string(),
            title: "Road Trip".to_string(),
        }]);
        let pair = PlaylistPair {
            spotify_id: "sp-1".to_string(),
            ytmusic_id: None,
        };
        let mut mappings = MappingManager::new(None);

        let resolved =
            resolve_default_target(&config, &directory, &pair, "Road Trip", &mut mappings, true)
                .await
                .unwrap();

        assert_eq!(resolved.as_deref(), Some("yt-9"));
        assert!(mappings.is_empty());
        assert!(directory.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dry_run_resolution_never_creates_a_playlist() {
        let config = test_config();
        let directory = ScriptedDirectory::with_playlists(Vec::new());
        let pair = PlaylistPair {
            spotify_id: "sp-1".to_string(),
            ytmusic_id: None,
        };
        let mut mappings = MappingManager::new(None);

        let resolved =
            resolve_default_target(&config, &directory, &pair, "Road Trip", &mut mappings, true)
                .await
                .unwrap();

        assert_eq!(resolved, None);
        assert!(mappings.is_empty());
        assert!(directory.created.lock().unwrap().is_empty());
    }
}
