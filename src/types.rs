use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// A source-side track as fetched from a Spotify playlist.
///
/// Constructed fresh on every playlist fetch and never mutated. Only the `id`
/// outlives a sync pass, as a member of the sync cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
}

/// A target-side track record kept for fuzzy comparison. Title and artist are
/// already lower-cased by the snapshot fetcher.
#[derive(Debug, Clone)]
pub struct RawTargetTrack {
    pub title: String,
    pub artist: String,
    pub video_id: Option<String>,
}

/// The current contents of a target playlist, in the three shapes the
/// reconciliation engine needs: exact video ids, normalized name keys, and raw
/// records for fuzzy comparison.
#[derive(Debug, Clone, Default)]
pub struct TargetSnapshot {
    pub video_ids: HashSet<String>,
    pub track_keys: HashSet<String>,
    pub raw_tracks: Vec<RawTargetTrack>,
}

/// One source playlist mapped to at most one target playlist. A `None` target
/// means "unmapped, use the configured default target playlist".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistPair {
    pub spotify_id: String,
    pub ytmusic_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TargetPlaylist {
    pub id: String,
    pub title: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub id: String,
}

#[derive(Tabled)]
pub struct MappingTableRow {
    pub spotify: String,
    pub ytmusic: String,
}

// --- Spotify wire types -----------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUserResponse {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserPlaylistsResponse {
    pub items: Vec<SpotifyPlaylist>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistNameResponse {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTracksResponse {
    pub items: Vec<PlaylistTrackItem>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTrackItem {
    pub track: Option<RawSpotifyTrack>,
}

/// Loosely-shaped track record as Spotify returns it. Tombstoned or local
/// tracks may lack an id or name; the fetcher skips those.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSpotifyTrack {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<RawSpotifyArtist>,
    pub album: Option<RawSpotifyAlbum>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSpotifyArtist {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSpotifyAlbum {
    pub name: Option<String>,
}

impl RawSpotifyTrack {
    /// Converts the wire record into a [`Track`], or `None` when the entry is
    /// unusable (missing id or name). Absent artist information falls back to
    /// the "Unknown" sentinel.
    pub fn into_track(self) -> Option<Track> {
        let id = self.id?;
        let title = self.name.filter(|n| !n.is_empty())?;
        let artist = self
            .artists
            .first()
            .and_then(|a| a.name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        let album = self
            .album
            .and_then(|a| a.name)
            .unwrap_or_else(String::new);

        Some(Track {
            id,
            title,
            artist,
            album,
        })
    }
}
