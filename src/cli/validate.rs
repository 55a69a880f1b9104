//! The `validate` command: probe every mapped target playlist and report the
//! classification. `--prune` removes mappings whose target playlist is gone;
//! auth and unknown failures never cause removal.

use crate::{
    error, info,
    management::MappingManager,
    success, validator, warning,
    ytmusic::YtMusicClient,
};

pub async fn validate(prune: bool) {
    let mut mappings = match MappingManager::load().await {
        Ok(m) => m,
        Err(e) => {
            error!("Could not load playlist mappings: {}", e);
        }
    };
    if mappings.is_empty() {
        info!("No playlist mappings configured.");
        return;
    }

    let client = match YtMusicClient::from_stored().await {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
        }
    };

    // A dead session makes every probe look like an auth failure, so bail
    // out before classifying anything.
    if let Err(e) = client.check_auth().await {
        error!(
            "YouTube Music session check failed: {}. Re-run 'plsyncli setup' first.",
            e
        );
    }

    let report = validator::validate_mappings(&client, &mappings.all()).await;

    for pair in &report.valid {
        success!(
            "{} -> {}",
            pair.spotify_id,
            pair.ytmusic_id.as_deref().unwrap_or("(default target)")
        );
    }
    for pair in &report.missing {
        warning!(
            "{} -> {} : target playlist no longer exists",
            pair.spotify_id,
            pair.ytmusic_id.as_deref().unwrap_or("")
        );
    }
    for pair in &report.auth_errors {
        warning!(
            "{} : could not verify (authentication error, mapping kept)",
            pair.spotify_id
        );
    }
    for (pair, msg) in &report.unknown_errors {
        warning!("{} : could not verify ({})", pair.spotify_id, msg);
    }

    if !prune {
        if !report.missing.is_empty() {
            info!(
                "{} mapping(s) point at deleted playlists. Re-run with --prune to remove them.",
                report.missing.len()
            );
        }
        return;
    }

    if report.missing.is_empty() {
        success!("Nothing to prune.");
        return;
    }

    for pair in &report.missing {
        mappings.remove(&pair.spotify_id);
    }
    match mappings.persist().await {
        Ok(()) => success!("Removed {} dead mapping(s)", report.missing.len()),
        Err(e) => {
            error!("Could not persist pruned mappings: {}", e);
        }
    }
}
