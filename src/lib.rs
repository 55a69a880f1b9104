//! Spotify to YouTube Music Playlist Sync Library
//!
//! This library provides functionality for one-directional syncing of Spotify
//! playlists into YouTube Music playlists. It includes modules for both catalog
//! clients, track matching, the incremental sync engine, configuration
//! management, and persistent state handling.
//!
//! # Modules
//!
//! - `api` - HTTP API endpoints for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration value object loaded from environment variables
//! - `management` - Persistent state (sync cache, playlist mappings, tokens)
//! - `matching` - Track key normalization and fuzzy matching
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client (source catalog)
//! - `sync` - Reconciliation engine and sync orchestration
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//! - `validator` - Target playlist mapping validation
//! - `ytmusic` - YouTube Music internal API client (target catalog)
//!
//! # Example
//!
//! ```no_run
//! use plsyncli::{config, sync};
//!
//! #[tokio::main]
//! async fn main() -> plsyncli::Res<()> {
//!     let cfg = config::load().await?;
//!     sync::run_sync(&cfg, true).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod management;
pub mod matching;
pub mod server;
pub mod spotify;
pub mod sync;
pub mod types;
pub mod utils;
pub mod validator;
pub mod ytmusic;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern throughout the application
/// using a boxed dynamic error trait object. This allows for flexible
/// error handling while maintaining Send + Sync bounds for async contexts.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// let count = 3;
/// plsyncli::info!("Connecting to Spotify...");
/// plsyncli::info!("Found {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// let count = 12;
/// plsyncli::success!("Sync complete");
/// plsyncli::success!("Added {} songs", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// This macro will cause the program to exit immediately after printing the
/// error message. It should only be used for fatal errors where recovery is
/// not possible.
///
/// # Example
///
/// ```no_run
/// plsyncli::error!("Missing Spotify credentials");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues or important information that users should
/// notice, e.g. a truncated playlist fetch or a cache that could not be
/// persisted.
///
/// # Example
///
/// ```
/// let e = "disk full";
/// plsyncli::warning!("Could not save sync cache: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
