use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::error::{ClipforgeError, Result};
use crate::profiles::template::Bindings;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a command profile and run it
    Run {
        /// Profile name
        profile: String,

        /// Template parameter as KEY=VALUE (repeatable)
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Profile store file overriding the default location
        #[arg(long)]
        store: Option<PathBuf>,

        /// Print the resolved command instead of executing it
        #[arg(long)]
        dry_run: bool,
    },

    /// List available command profiles
    Profiles {
        /// Profile store file overriding the default location
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Save a user-defined command profile (tokens go after --)
    Add {
        /// Profile name
        name: String,

        /// What the command does
        #[arg(short, long)]
        description: String,

        /// Profile store file overriding the default location
        #[arg(long)]
        store: Option<PathBuf>,

        /// Command tokens, placeholders written as {name}
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },

    /// Download a video with the external downloader
    Download {
        /// Video URL
        url: String,

        /// Destination folder
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Delete existing video files in the folder first
        #[arg(long)]
        clear: bool,
    },

    /// Rename a file to a shell-friendly name
    Clean {
        /// File to rename
        file: PathBuf,
    },

    /// Delete all video files in a folder
    Purge {
        /// Folder to sweep
        folder: PathBuf,
    },

    /// Check whether a file has a video stream
    Probe {
        /// File to inspect
        file: PathBuf,
    },
}

/// Parse repeated KEY=VALUE pairs into a binding map. The value may itself
/// contain '='; only the first one splits.
pub fn parse_bindings(pairs: &[String]) -> Result<Bindings> {
    let mut bindings = Bindings::new();

    for pair in pairs {
        match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                bindings.insert(key.to_string(), value.to_string());
            }
            _ => {
                return Err(ClipforgeError::Config(format!(
                    "Invalid parameter '{}', expected KEY=VALUE",
                    pair
                )));
            }
        }
    }

    Ok(bindings)
}
