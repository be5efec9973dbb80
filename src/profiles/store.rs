use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use super::CommandProfile;
use crate::error::{ClipforgeError, Result};

/// On-disk shape: `{name: {command: [...], description: ...}}`.
pub type ProfileMap = BTreeMap<String, CommandProfile>;

/// Default location of the user-defined profile store.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clipforge")
        .join("profiles.json")
}

/// Load the user store. Reads are tolerant: a missing, empty, or unparsable
/// file degrades to an empty map (logged), never an error.
pub async fn load(path: &Path) -> ProfileMap {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No profile store at {}", path.display());
            return ProfileMap::new();
        }
        Err(e) => {
            warn!("Failed to read profile store {}: {}", path.display(), e);
            return ProfileMap::new();
        }
    };

    if content.trim().is_empty() {
        return ProfileMap::new();
    }

    match serde_json::from_str(&content) {
        Ok(profiles) => profiles,
        Err(e) => {
            warn!("Failed to parse profile store {}: {}", path.display(), e);
            ProfileMap::new()
        }
    }
}

/// Write the whole store back, pretty-printed. Unlike reads, writes are
/// strict: losing an explicit add must be visible to the caller.
pub async fn save(path: &Path, profiles: &ProfileMap) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await.map_err(|e| {
            ClipforgeError::Store(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }

    let content = serde_json::to_string_pretty(profiles)?;
    fs::write(path, content).await.map_err(|e| {
        ClipforgeError::Store(format!("Failed to write {}: {}", path.display(), e))
    })?;

    Ok(())
}

/// Add or replace a profile in the user store at `path` (or the default
/// location). Built-ins are never written back; only the user overlay is
/// persisted. Load-modify-save with no file locking: two concurrent adds
/// race and the last writer wins.
pub async fn add_profile(
    name: &str,
    command: &[String],
    description: &str,
    path: Option<&Path>,
) -> Result<()> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_path);

    let mut profiles = load(&path).await;
    profiles.insert(
        name.to_string(),
        CommandProfile {
            command: command.to_vec(),
            description: description.to_string(),
        },
    );

    save(&path, &profiles).await?;
    info!("Profile '{}' added to {}", name, path.display());
    Ok(())
}
