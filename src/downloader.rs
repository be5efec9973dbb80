use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::config::DownloadConfig;
use crate::error::{ClipforgeError, Result};
use crate::media;
use crate::runner::{self, RunOutcome};

/// Video downloader delegating to an external tool (yt-dlp by default).
/// Unlike the transcoder path, download failures are raised, not downgraded
/// to a result flag.
pub struct Downloader {
    config: DownloadConfig,
}

impl Downloader {
    pub fn new(config: DownloadConfig) -> Self {
        Self { config }
    }

    /// Argument list for downloading `url` into `output_folder`:
    /// `<tool> -f <format> -o <folder>/<template> <url>`
    pub fn download_args(&self, url: &str, output_folder: &Path) -> Vec<String> {
        let output_template = output_folder.join(&self.config.output_template);

        vec![
            self.config.binary_path.clone(),
            "-f".to_string(),
            self.config.format.clone(),
            "-o".to_string(),
            output_template.to_string_lossy().into_owned(),
            url.to_string(),
        ]
    }

    /// Download a video into `output_folder`, creating it as needed. With
    /// `clear_folder`, existing video files in the folder are deleted first.
    pub async fn download(&self, url: &str, output_folder: &Path, clear_folder: bool) -> Result<()> {
        fs::create_dir_all(output_folder).await?;

        if clear_folder {
            let removed = media::remove_video_files(output_folder).await;
            info!("Cleared {} video file(s) from {}", removed, output_folder.display());
        }

        let argv = self.download_args(url, output_folder);

        info!("Starting download: {}", url);
        match runner::run(&argv, false).await? {
            RunOutcome::Completed => {
                info!("Download completed successfully");
                Ok(())
            }
            RunOutcome::Failed => Err(ClipforgeError::Download(format!(
                "Download failed for '{}'",
                url
            ))),
            RunOutcome::ToolMissing => Err(ClipforgeError::Download(format!(
                "'{}' not found. Please ensure it is installed and in your PATH",
                self.config.binary_path
            ))),
        }
    }
}
