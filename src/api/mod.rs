//! # API Module
//!
//! HTTP endpoints for the temporary local web server used during Spotify
//! authentication.
//!
//! ## Endpoints
//!
//! - [`callback`] - Handles the OAuth callback from Spotify's authorization
//!   server, completing the PKCE flow by exchanging the authorization code for
//!   an access token.
//! - [`health`] - Health check returning application status and version.
//!
//! Built on the [Axum](https://docs.rs/axum) web framework; each endpoint is
//! an async function integrated into the router in [`crate::server`].

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
