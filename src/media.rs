use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::error::{ClipforgeError, Result};

/// Rename a file to a shell-friendly name: brackets and parentheses are
/// stripped from the stem, spaces become underscores, and a fully stripped
/// stem falls back to "video". The rename only happens when the name
/// actually changes, so the operation is idempotent. Returns the resulting
/// path either way.
///
/// Example: "My Video (2024).mp4" -> "My_Video_2024.mp4"
pub async fn clean_filename(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(ClipforgeError::FileNotFound(path.display().to_string()));
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut clean_stem: String = stem
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '(' | ')'))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();
    if clean_stem.is_empty() {
        clean_stem = "video".to_string();
    }

    let new_name = match path.extension() {
        Some(ext) => format!("{}.{}", clean_stem, ext.to_string_lossy()),
        None => clean_stem,
    };
    let new_path = path.with_file_name(&new_name);

    if new_path != path {
        if let Err(e) = fs::rename(path, &new_path).await {
            error!("Failed to rename '{}': {}", path.display(), e);
            return Err(e.into());
        }
        info!("Renamed '{}' -> '{}'", path.display(), new_name);
    }

    Ok(new_path)
}

/// Ask ffprobe whether the file has a video stream at index 0. True only
/// when the probe exits zero and reports the codec type "video"; probe
/// failures are logged and answer false.
pub async fn has_video_stream(ffprobe_path: &str, path: &Path) -> bool {
    if !path.exists() {
        return false;
    }

    let output = Command::new(ffprobe_path)
        .arg("-v").arg("error")
        .arg("-select_streams").arg("v:0")
        .arg("-show_entries").arg("stream=codec_type")
        .arg("-of").arg("csv=p=0")
        .arg(path)
        .output()
        .await;

    match output {
        Ok(output) => {
            output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "video"
        }
        Err(e) => {
            error!("Failed to probe '{}': {}", path.display(), e);
            false
        }
    }
}

/// Delete every regular file in the folder (immediate entries only) whose
/// guessed mime type is video/*. Per-file failures are logged and skipped;
/// one bad file does not stop the batch. Returns the number deleted.
pub async fn remove_video_files(folder: &Path) -> usize {
    if !folder.exists() {
        return 0;
    }

    let mut count = 0;
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_video = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.type_() == mime_guess::mime::VIDEO)
            .unwrap_or(false);
        if !is_video {
            continue;
        }

        match fs::remove_file(path).await {
            Ok(()) => {
                count += 1;
                debug!("Deleted: {}", path.display());
            }
            Err(e) => error!("Failed to delete '{}': {}", path.display(), e),
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clean_filename_example() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("My Video (2024).mp4");
        std::fs::write(&path, b"x").unwrap();

        let cleaned = clean_filename(&path).await.unwrap();
        assert_eq!(cleaned, dir.path().join("My_Video_2024.mp4"));
        assert!(cleaned.exists());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_clean_filename_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("My_Video_2024.mp4");
        std::fs::write(&path, b"x").unwrap();

        let cleaned = clean_filename(&path).await.unwrap();
        assert_eq!(cleaned, path);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_clean_filename_empty_stem_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("().mp4");
        std::fs::write(&path, b"x").unwrap();

        let cleaned = clean_filename(&path).await.unwrap();
        assert_eq!(cleaned, dir.path().join("video.mp4"));
        assert!(cleaned.exists());
    }

    #[tokio::test]
    async fn test_clean_filename_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = clean_filename(&dir.path().join("nope.mp4")).await.unwrap_err();
        assert!(matches!(err, ClipforgeError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_video_files_counts_only_video() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("clip.mp4"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let removed = remove_video_files(dir.path()).await;
        assert_eq!(removed, 1);
        assert!(!dir.path().join("clip.mp4").exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_remove_video_files_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("nested");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("deep.mp4"), b"x").unwrap();

        assert_eq!(remove_video_files(dir.path()).await, 0);
        assert!(sub.join("deep.mp4").exists());
    }

    #[tokio::test]
    async fn test_remove_video_files_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(remove_video_files(&dir.path().join("absent")).await, 0);
    }

    #[tokio::test]
    async fn test_has_video_stream_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!has_video_stream("ffprobe", &dir.path().join("nope.mp4")).await);
    }
}
