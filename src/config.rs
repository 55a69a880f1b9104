//! Configuration management for the playlist sync CLI.
//!
//! Configuration is read once at process start into an immutable [`Config`]
//! value that is passed by reference through every component. Values come from
//! environment variables, optionally seeded from a `.env` file in the local
//! data directory (`plsyncli/.env`). Nothing re-reads the environment
//! implicitly; callers that need fresh values after an external edit call
//! [`reload`] and receive a new value.

use std::{env, path::PathBuf};

use crate::matching::MatchThresholds;

/// Spotify API endpoints and OAuth parameters.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

/// Immutable application configuration, constructed once via [`load`].
#[derive(Debug, Clone)]
pub struct Config {
    pub spotify: SpotifyConfig,
    /// Bind address of the local OAuth callback server.
    pub server_addr: String,
    /// Fallback YouTube Music playlist for source playlists without a mapping.
    pub default_target_playlist: Option<String>,
    /// Whether playlists created on the target side are private.
    pub target_playlist_private: bool,
    /// How many search results to request when resolving a track.
    pub max_search_results: u32,
    /// Fuzzy match thresholds. Empirically chosen defaults; a policy knob,
    /// not a tuning target.
    pub thresholds: MatchThresholds,
}

/// Returns the application data directory (`<data_local_dir>/plsyncli`).
///
/// All persistent state lives below this directory: the `.env` file, the sync
/// cache, playlist mappings, tokens, browser auth headers, and the run log.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("plsyncli");
    path
}

/// Loads the configuration from the environment.
///
/// Creates the data directory if needed and loads `plsyncli/.env` from it when
/// present, then builds a [`Config`] from the resulting environment. Only
/// `SPOTIFY_CLIENT_ID` is required; everything else carries a default.
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or a
/// required variable is missing.
///
/// # Environment variables
///
/// | Variable | Default |
/// |----------|---------|
/// | `SPOTIFY_CLIENT_ID` | required |
/// | `SPOTIFY_REDIRECT_URI` | `http://127.0.0.1:8888/callback` |
/// | `SPOTIFY_SCOPE` | `playlist-read-private playlist-read-collaborative` |
/// | `SPOTIFY_AUTH_URL` | `https://accounts.spotify.com/authorize` |
/// | `SPOTIFY_TOKEN_URL` | `https://accounts.spotify.com/api/token` |
/// | `SPOTIFY_API_URL` | `https://api.spotify.com/v1` |
/// | `SERVER_ADDRESS` | `127.0.0.1:8888` |
/// | `YTMUSIC_DEFAULT_PLAYLIST` | unset |
/// | `YTMUSIC_PLAYLIST_PRIVATE` | `true` |
/// | `MAX_SEARCH_RESULTS` | `5` |
/// | `MATCH_NAME_THRESHOLD` | `0.70` |
/// | `MATCH_ARTIST_THRESHOLD` | `0.60` |
/// | `MATCH_STRONG_NAME_THRESHOLD` | `0.85` |
pub async fn load() -> Result<Config, String> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| e.to_string())?;

    let env_path = dir.join(".env");
    if env_path.is_file() {
        dotenv::from_path(&env_path).map_err(|e| e.to_string())?;
    }

    from_env()
}

/// Returns a fresh [`Config`] after an external edit of `.env` or the
/// environment. Identical to [`load`]; the separate name marks intent at call
/// sites.
pub async fn reload() -> Result<Config, String> {
    load().await
}

fn from_env() -> Result<Config, String> {
    let client_id =
        env::var("SPOTIFY_CLIENT_ID").map_err(|_| "SPOTIFY_CLIENT_ID must be set".to_string())?;

    let spotify = SpotifyConfig {
        client_id,
        redirect_uri: var_or("SPOTIFY_REDIRECT_URI", "http://127.0.0.1:8888/callback"),
        scope: var_or(
            "SPOTIFY_SCOPE",
            "playlist-read-private playlist-read-collaborative",
        ),
        auth_url: var_or("SPOTIFY_AUTH_URL", "https://accounts.spotify.com/authorize"),
        token_url: var_or(
            "SPOTIFY_TOKEN_URL",
            "https://accounts.spotify.com/api/token",
        ),
        api_url: var_or("SPOTIFY_API_URL", "https://api.spotify.com/v1"),
    };

    let thresholds = MatchThresholds {
        name: parsed_var("MATCH_NAME_THRESHOLD", 0.70),
        artist: parsed_var("MATCH_ARTIST_THRESHOLD", 0.60),
        strong_name: parsed_var("MATCH_STRONG_NAME_THRESHOLD", 0.85),
    };

    Ok(Config {
        spotify,
        server_addr: var_or("SERVER_ADDRESS", "127.0.0.1:8888"),
        default_target_playlist: env::var("YTMUSIC_DEFAULT_PLAYLIST")
            .ok()
            .filter(|v| !v.is_empty()),
        target_playlist_private: parsed_var("YTMUSIC_PLAYLIST_PRIVATE", true),
        max_search_results: parsed_var("MAX_SEARCH_RESULTS", 5),
        thresholds,
    })
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parsed_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
