use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use plsyncli::{cli, config, error, types::PkceToken};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with the Spotify API
    Auth,

    /// Capture YouTube Music browser headers
    Setup,

    /// Sync mapped Spotify playlists to YouTube Music
    Sync(SyncOptions),

    /// Check mapped target playlists still exist
    Validate(ValidateOptions),

    /// List playlists on either service
    Playlists(PlaylistsOptions),

    /// Manage playlist mappings
    Mapping(MappingOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SyncOptions {
    /// Compute and report all decisions without adding tracks
    #[clap(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ValidateOptions {
    /// Remove mappings whose target playlist no longer exists
    #[clap(long)]
    pub prune: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Only list Spotify playlists
    #[clap(long)]
    pub source: bool,

    /// Only list YouTube Music playlists
    #[clap(long)]
    pub target: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct MappingOptions {
    #[command(subcommand)]
    pub command: MappingSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum MappingSubcommand {
    /// Map a Spotify playlist to a YouTube Music playlist
    Add(MappingAddOpts),

    /// Remove the mapping of a Spotify playlist
    Remove(MappingRemoveOpts),

    /// List all configured mappings
    List,
}

#[derive(Parser, Debug, Clone)]
pub struct MappingAddOpts {
    /// Spotify playlist id
    pub spotify_id: String,

    /// YouTube Music playlist id; omit to sync into the default target
    pub ytmusic_id: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct MappingRemoveOpts {
    /// Spotify playlist id
    pub spotify_id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let config = load_config().await;
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result), &config).await;
        }
        Command::Setup => cli::setup().await,
        Command::Sync(opt) => {
            let config = load_config().await;
            cli::sync(&config, opt.dry_run).await;
        }
        Command::Validate(opt) => cli::validate(opt.prune).await,
        Command::Playlists(opt) => {
            let config = load_config().await;
            cli::playlists(&config, opt.source, opt.target).await;
        }
        Command::Mapping(opt) => match opt.command {
            MappingSubcommand::Add(a) => cli::add_mapping(a.spotify_id, a.ytmusic_id).await,
            MappingSubcommand::Remove(r) => cli::remove_mapping(r.spotify_id).await,
            MappingSubcommand::List => cli::list_mappings().await,
        },
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

async fn load_config() -> config::Config {
    match config::load().await {
        Ok(config) => config,
        Err(e) => {
            error!("Cannot load configuration. Err: {}", e);
        }
    }
}
