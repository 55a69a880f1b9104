//! The `playlists` command: tabled listings of either catalog, as input for
//! `mapping add`.

use tabled::Table;

use crate::{
    config::Config,
    error,
    management::TokenManager,
    spotify,
    types::PlaylistTableRow,
    utils,
    ytmusic::YtMusicClient,
};

pub async fn playlists(config: &Config, source: bool, target: bool) {
    // No flag means both catalogs
    let both = !source && !target;

    if source || both {
        list_source(config).await;
    }
    if target || both {
        list_target().await;
    }
}

async fn list_source(config: &Config) {
    let mut token_manager = match TokenManager::load().await {
        Ok(tm) => tm,
        Err(_) => {
            error!("Not authenticated with Spotify. Run: plsyncli auth");
        }
    };
    let token = token_manager.get_valid_token(&config.spotify).await;

    let playlists = match spotify::playlists::get_user_playlists(&token, &config.spotify).await {
        Ok(playlists) => playlists,
        Err(e) => {
            error!("Could not fetch Spotify playlists: {}", e);
        }
    };

    let mut rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .map(|p| PlaylistTableRow {
            name: utils::truncate_for_display(&p.name, 48),
            id: p.id,
        })
        .collect();
    rows.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    println!("Spotify playlists:");
    println!("{}", Table::new(rows));
}

async fn list_target() {
    let client = match YtMusicClient::from_stored().await {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
        }
    };

    let playlists = match client.list_playlists().await {
        Ok(playlists) => playlists,
        Err(e) => {
            error!("Could not fetch YouTube Music playlists: {}", e);
        }
    };

    let mut rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .map(|p| PlaylistTableRow {
            name: utils::truncate_for_display(&p.title, 48),
            id: p.id,
        })
        .collect();
    rows.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    println!("YouTube Music playlists:");
    println!("{}", Table::new(rows));
}
