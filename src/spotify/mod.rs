//! # Spotify Integration Module
//!
//! Source-catalog side of the sync: authentication and read-only playlist
//! access against the Spotify Web API. All HTTP communication, OAuth flows,
//! and rate-limit handling for Spotify live here.
//!
//! ## Core Modules
//!
//! ### Authentication Module
//!
//! [`auth`] - Implements the OAuth 2.0 PKCE (Proof Key for Code Exchange)
//! flow: code verifier/challenge generation, a temporary local callback
//! server, browser launch for user authorization, token exchange, and token
//! persistence through [`crate::management::TokenManager`]. PKCE needs no
//! client secret, so nothing sensitive is stored beyond the tokens
//! themselves.
//!
//! ### Playlist Module
//!
//! [`playlists`] - Read-only playlist operations:
//! - **Library listing**: the user's playlists, following `next` pagination
//! - **Playlist metadata**: name lookup for progress reporting
//! - **Track snapshots**: full track lists with defensive parsing of
//!   tombstoned or local entries
//!
//! ## Error Handling
//!
//! - 429 Too Many Requests honors the `Retry-After` header before retrying
//! - 502 Bad Gateway retries after a fixed delay
//! - Other HTTP errors propagate as `reqwest::Error` to the caller
//!
//! ## API Coverage
//!
//! - `GET /me` - Connection test and display name
//! - `GET /me/playlists` - User's playlists with pagination
//! - `GET /playlists/{id}` - Playlist name (`fields=name`)
//! - `GET /playlists/{id}/tracks` - Full paginated track listing
//! - `POST /api/token` - Token exchange and refresh

pub mod auth;
pub mod playlists;
