use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ClipforgeError, Result};

// Default binary names assume the tools are on PATH
fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_downloader_path() -> String {
    "yt-dlp".to_string()
}

fn default_download_format() -> String {
    "bestvideo+bestaudio/best".to_string()
}

fn default_output_template() -> String {
    "%(title)s.%(ext)s".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub download: DownloadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to ffprobe binary used for stream inspection
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Override for the user-defined profile store file.
    /// Defaults to profiles.json under the user configuration directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Path to downloader binary
    #[serde(default = "default_downloader_path")]
    pub binary_path: String,
    /// Format selection passed to the downloader via -f
    #[serde(default = "default_download_format")]
    pub format: String,
    /// Output filename template, joined under the destination folder
    #[serde(default = "default_output_template")]
    pub output_template: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: default_ffprobe_path(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            binary_path: default_downloader_path(),
            format: default_download_format(),
            output_template: default_output_template(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClipforgeError::Config(format!("Failed to read config file: {}", e)))?;

        Ok(toml::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ClipforgeError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ClipforgeError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
