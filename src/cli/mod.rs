//! # CLI Module
//!
//! User-facing command implementations. Each function here is the body of one
//! CLI command: it handles interaction and presentation, then delegates to the
//! sync, validator, management and catalog-client modules for the actual work.
//!
//! Commands:
//!
//! - [`auth`] - Spotify OAuth authentication with PKCE
//! - [`setup`] - captures YouTube Music browser headers interactively
//! - [`sync`] - runs a sync pass over all configured mappings
//! - [`validate`] - probes mapped target playlists, optionally pruning dead ones
//! - [`playlists`] - lists playlists on either service
//! - [`add_mapping`], [`remove_mapping`], [`list_mappings`] - mapping management
//!
//! Errors that end a command are reported through the `error!` macro, which
//! exits the process; recoverable issues go through `warning!` and the command
//! continues.

mod auth;
mod mapping;
mod playlists;
mod setup;
mod sync;
mod validate;

pub use auth::auth;
pub use mapping::{add_mapping, list_mappings, remove_mapping};
pub use playlists::playlists;
pub use setup::setup;
pub use sync::sync;
pub use validate::validate;
