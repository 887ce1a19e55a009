mod config;
mod error;
mod logging;
mod ports;
mod services;
mod spotify_rs;
mod tidal_rs;

#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{
    Result,
    eyre::{WrapErr, eyre},
};

use crate::{
    config::Config,
    logging::setup_logging,
    services::{
        matching::TrackMatcher,
        spotify::client::SpotifyHttpAdapter,
        sync::{PlaylistSyncService, SyncSummary, resolve_playlist_ids},
        tidal::client::TidalHttpAdapter,
    },
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "PLAYLIST_SYNC_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Console log level (default: info)
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level (default: debug)
    #[arg(long, default_value = "debug", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "PLAYLIST_SYNC_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy the configured Spotify playlists into Tidal (default)
    Sync,
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_logging(args.log_level, args.log_file.clone(), args.log_file_level)?;

    log::debug!("Playlist sync starting");

    match args.command.unwrap_or(Commands::Sync) {
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                log::debug!("Creating default config");
                let path = Config::create_default()?;
                println!("{}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
        Commands::Sync => {
            log::debug!("Loading configuration");
            let config = match &args.config {
                Some(path) => Config::from_file(path),
                None => Config::load(),
            }
            .wrap_err("Failed to load playlist-sync config")?;

            run_sync(config).await?;
        }
    }

    Ok(())
}

async fn run_sync(config: Config) -> Result<()> {
    let source = SpotifyHttpAdapter::connect(&config.spotify)
        .await
        .wrap_err("Failed to connect to Spotify")?;

    let playlist_ids = resolve_playlist_ids(&source, &config)
        .await
        .wrap_err("Failed to resolve playlists to sync")?;
    if playlist_ids.is_empty() {
        log::warn!("No playlists selected, set sync_playlists or sync_all in the config");
        return Ok(());
    }

    let destination = TidalHttpAdapter::connect(&config.tidal, config.matching.search_limit)
        .await
        .wrap_err("Failed to connect to Tidal")?;

    let service = PlaylistSyncService::new(
        source,
        destination,
        TrackMatcher::new(config.matching.clone()),
    );
    let summary = service
        .sync_playlists(&playlist_ids)
        .await
        .wrap_err("Sync aborted")?;

    print_summary(&summary);

    if summary.has_failures() {
        return Err(eyre!(
            "{} of {} playlists failed to sync",
            summary.failed.len(),
            playlist_ids.len()
        ));
    }

    Ok(())
}

fn print_summary(summary: &SyncSummary) {
    for result in &summary.synced {
        println!(
            "{}: {}/{} tracks ({} missing)",
            result.name,
            result.matched,
            result.total,
            result.missing.len()
        );
        for missing in &result.missing {
            println!(
                "  #{} {} - {}",
                missing.position, missing.artist, missing.title
            );
        }
    }
    for failed in &summary.failed {
        println!("{}: failed ({})", failed.playlist_id, failed.error);
    }
}
