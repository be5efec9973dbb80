//! Clipforge - ffmpeg command profiles and video tooling
//!
//! This is the main entry point for the clipforge CLI, a thin layer that
//! assembles shell commands for ffmpeg and yt-dlp from named templates and
//! runs them, plus small helpers for media files on disk.

use anyhow::Result;
use clap::Parser;
use tracing::{Level, info};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use clipforge::cli::{self, Args, Commands};
use clipforge::config::Config;
use clipforge::downloader::Downloader;
use clipforge::media;
use clipforge::profiles::{self, template};
use clipforge::runner;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try to load clipforge.toml from current directory first
            if std::path::Path::new("clipforge.toml").exists() {
                info!("Found clipforge.toml in current directory, loading...");
                Config::from_file("clipforge.toml")?
            } else {
                Config::default()
            }
        }
    };

    // Execute command
    match args.command {
        Commands::Run {
            profile,
            set,
            store,
            dry_run,
        } => {
            let bindings = cli::parse_bindings(&set)?;
            let store_path = store.or_else(|| config.store.path.clone());

            let argv = profiles::build(&profile, &bindings, store_path.as_deref()).await?;
            let outcome = runner::run(&argv, dry_run).await?;
            if !outcome.succeeded() {
                std::process::exit(1);
            }
        }
        Commands::Profiles { store } => {
            let store_path = store.or_else(|| config.store.path.clone());
            let registry = profiles::resolve(store_path.as_deref()).await;

            println!("\nAvailable Command Profiles:");
            println!("{:<24} {:<32} {}", "Name", "Parameters", "Description");
            println!("{}", "-".repeat(100));

            for (name, profile) in &registry {
                let mut parameters: Vec<String> = Vec::new();
                for token in &profile.command {
                    for parameter in template::placeholders(token) {
                        if !parameters.contains(&parameter) {
                            parameters.push(parameter);
                        }
                    }
                }

                println!(
                    "{:<24} {:<32} {}",
                    name,
                    parameters.join(","),
                    profile.description
                );
            }
        }
        Commands::Add {
            name,
            description,
            store,
            command,
        } => {
            let store_path = store.or_else(|| config.store.path.clone());
            profiles::add_profile(&name, &command, &description, store_path.as_deref()).await?;
            println!("Profile '{}' saved", name);
        }
        Commands::Download {
            url,
            output_dir,
            clear,
        } => {
            let downloader = Downloader::new(config.download.clone());
            downloader.download(&url, &output_dir, clear).await?;
        }
        Commands::Clean { file } => {
            let cleaned = media::clean_filename(&file).await?;
            println!("{}", cleaned.display());
        }
        Commands::Purge { folder } => {
            let removed = media::remove_video_files(&folder).await;
            println!("Removed {} video file(s)", removed);
        }
        Commands::Probe { file } => {
            runner::check_tool(&config.media.ffprobe_path, "-version").await?;

            if media::has_video_stream(&config.media.ffprobe_path, &file).await {
                println!("{}: video", file.display());
            } else {
                println!("{}: no video stream", file.display());
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let app_dir = std::env::current_dir()?.join(".clipforge");
    let log_dir = app_dir.join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "clipforge.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer().with_target(false);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_ansi(false); // No ANSI colors in file

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    subscriber
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
