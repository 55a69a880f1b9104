//! Mapping management commands: `mapping add`, `mapping remove`,
//! `mapping list`.

use tabled::Table;

use crate::{
    error, info,
    management::MappingManager,
    success,
    types::{MappingTableRow, PlaylistPair},
};

/// Maps a source playlist to a target playlist. A missing target id means
/// "resolve to the default target on the next sync". Re-adding a mapped
/// source replaces its target.
pub async fn add_mapping(spotify_id: String, ytmusic_id: Option<String>) {
    let mut mappings = MappingManager::load()
        .await
        .unwrap_or_else(|_| MappingManager::new(None));

    mappings.add(PlaylistPair {
        spotify_id: spotify_id.clone(),
        ytmusic_id: ytmusic_id.clone(),
    });

    match mappings.persist().await {
        Ok(()) => success!(
            "Mapped {} -> {}",
            spotify_id,
            ytmusic_id.as_deref().unwrap_or("(default target)")
        ),
        Err(e) => {
            error!("Could not persist mapping: {}", e);
        }
    }
}

pub async fn remove_mapping(spotify_id: String) {
    let mut mappings = match MappingManager::load().await {
        Ok(m) => m,
        Err(e) => {
            error!("Could not load playlist mappings: {}", e);
        }
    };

    if !mappings.remove(&spotify_id) {
        info!("No mapping found for {}", spotify_id);
        return;
    }

    match mappings.persist().await {
        Ok(()) => success!("Removed mapping for {}", spotify_id),
        Err(e) => {
            error!("Could not persist mappings: {}", e);
        }
    }
}

pub async fn list_mappings() {
    let mappings = MappingManager::load()
        .await
        .unwrap_or_else(|_| MappingManager::new(None));

    if mappings.is_empty() {
        info!("No playlist mappings configured. Run: plsyncli mapping add <spotify-id>");
        return;
    }

    let rows: Vec<MappingTableRow> = mappings
        .all()
        .into_iter()
        .map(|pair| MappingTableRow {
            spotify: pair.spotify_id,
            ytmusic: pair
                .ytmusic_id
                .unwrap_or_else(|| "(default target)".to_string()),
        })
        .collect();

    println!("{}", Table::new(rows));
}
