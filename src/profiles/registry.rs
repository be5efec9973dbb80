use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::path::Path;

use super::CommandProfile;
use super::store;

/// Built-in profile table. Constructed once and never mutated; every read
/// path hands out a clone so callers cannot corrupt the defaults.
static BUILTIN_PROFILES: Lazy<BTreeMap<String, CommandProfile>> = Lazy::new(|| {
    let mut profiles = BTreeMap::new();

    // GPU accelerated baselines
    profiles.insert(
        "base_gpu_quality".to_string(),
        CommandProfile::new(
            &[
                "ffmpeg", "-y",
                "-hwaccel", "cuda",
                "-i", "{input}",
                "-c:v", "h264_nvenc",
                "-preset", "p6",
                "-rc", "vbr",
                "-cq", "19",
                "-pix_fmt", "yuv420p",
                "-c:a", "aac", "-b:a", "192k",
                "{output}",
            ],
            "GPU accelerated H.264 encoding (High Quality)",
        ),
    );
    profiles.insert(
        "trim_gpu_reencode".to_string(),
        CommandProfile::new(
            &[
                "ffmpeg", "-y",
                "-hwaccel", "cuda",
                "-ss", "{start}", "-to", "{end}",
                "-i", "{input}",
                "-c:v", "h264_nvenc",
                "-preset", "p4",
                "-cq", "19",
                "-c:a", "aac",
                "{output}",
            ],
            "Fast GPU-based frame-accurate trimming",
        ),
    );
    profiles.insert(
        "compress_gpu_h265".to_string(),
        CommandProfile::new(
            &[
                "ffmpeg", "-y",
                "-hwaccel", "cuda",
                "-i", "{input}",
                "-c:v", "hevc_nvenc",
                "-preset", "p6",
                "-rc", "vbr",
                "-cq", "24",
                "-c:a", "aac",
                "{output}",
            ],
            "Ultra-fast H.265 compression via GPU",
        ),
    );
    profiles.insert(
        "resize_gpu".to_string(),
        CommandProfile::new(
            &[
                "ffmpeg", "-y",
                "-hwaccel", "cuda",
                "-hwaccel_output_format", "cuda",
                "-i", "{input}",
                "-vf", "scale_cuda={width}:{height}",
                "-c:v", "h264_nvenc",
                "-preset", "p4",
                "-c:a", "aac",
                "{output}",
            ],
            "Resize video entirely on GPU (no CPU bottleneck)",
        ),
    );

    // CPU best-quality baselines
    profiles.insert(
        "base_best_quality".to_string(),
        CommandProfile::new(
            &[
                "ffmpeg", "-y",
                "-i", "{input}",
                "-map", "0:v:0",
                "-map", "0:a:0?",
                "-c:v", "libx264",
                "-preset", "slow",
                "-crf", "18",
                "-pix_fmt", "yuv420p",
                "-profile:v", "high",
                "-level", "4.1",
                "-c:a", "aac",
                "-b:a", "192k",
                "-movflags", "+faststart",
                "{output}",
            ],
            "Visually lossless video + high quality AAC audio",
        ),
    );
    profiles.insert(
        "trim_reencode".to_string(),
        CommandProfile::new(
            &[
                "ffmpeg", "-y",
                "-ss", "{start}",
                "-to", "{end}",
                "-i", "{input}",
                "-c:v", "libx264",
                "-preset", "slow",
                "-crf", "18",
                "-c:a", "aac",
                "-b:a", "192k",
                "-movflags", "+faststart",
                "{output}",
            ],
            "Frame-accurate trimming with re-encoding",
        ),
    );
    profiles.insert(
        "trim_copy".to_string(),
        CommandProfile::new(
            &[
                "ffmpeg", "-y",
                "-ss", "{start}",
                "-to", "{end}",
                "-i", "{input}",
                "-c", "copy",
                "{output}",
            ],
            "Fast trim without quality loss (keyframe based)",
        ),
    );
    profiles.insert(
        "split_segments".to_string(),
        CommandProfile::new(
            &[
                "ffmpeg", "-y",
                "-i", "{input}",
                "-map", "0",
                "-c", "copy",
                "-f", "segment",
                "-segment_time", "{duration}",
                "-reset_timestamps", "1",
                "{output_pattern}",
            ],
            "Split video into equal-length segments",
        ),
    );
    profiles.insert(
        "compress_high_quality".to_string(),
        CommandProfile::new(
            &[
                "ffmpeg", "-y",
                "-i", "{input}",
                "-c:v", "libx264",
                "-preset", "slow",
                "-crf", "23",
                "-c:a", "aac",
                "-b:a", "160k",
                "-movflags", "+faststart",
                "{output}",
            ],
            "Balanced compression (YouTube-grade quality)",
        ),
    );
    profiles.insert(
        "compress_ultra".to_string(),
        CommandProfile::new(
            &[
                "ffmpeg", "-y",
                "-i", "{input}",
                "-c:v", "libx265",
                "-preset", "slow",
                "-crf", "28",
                "-c:a", "aac",
                "-b:a", "128k",
                "{output}",
            ],
            "Maximum compression using H.265",
        ),
    );

    // Stream extraction
    profiles.insert(
        "extract_audio_wav".to_string(),
        CommandProfile::new(
            &[
                "ffmpeg", "-y",
                "-i", "{input}",
                "-vn",
                "-c:a", "pcm_s16le",
                "{output}",
            ],
            "Extract lossless WAV audio",
        ),
    );
    profiles.insert(
        "extract_audio_aac".to_string(),
        CommandProfile::new(
            &[
                "ffmpeg", "-y",
                "-i", "{input}",
                "-vn",
                "-c:a", "aac",
                "-b:a", "192k",
                "{output}",
            ],
            "Extract high-quality AAC audio",
        ),
    );
    profiles.insert(
        "extract_video_only".to_string(),
        CommandProfile::new(
            &[
                "ffmpeg", "-y",
                "-i", "{input}",
                "-an",
                "-c:v", "libx264",
                "-preset", "slow",
                "-crf", "18",
                "{output}",
            ],
            "Extract video stream only",
        ),
    );

    // Scaling and remuxing
    profiles.insert(
        "resize_video".to_string(),
        CommandProfile::new(
            &[
                "ffmpeg", "-y",
                "-i", "{input}",
                "-vf", "scale={width}:{height}:flags=lanczos",
                "-c:v", "libx264",
                "-preset", "slow",
                "-crf", "18",
                "-c:a", "aac",
                "-b:a", "192k",
                "{output}",
            ],
            "Resize video using high-quality Lanczos scaling",
        ),
    );
    profiles.insert(
        "remux_copy".to_string(),
        CommandProfile::new(
            &[
                "ffmpeg", "-y",
                "-i", "{input}",
                "-c", "copy",
                "{output}",
            ],
            "Change container format without re-encoding",
        ),
    );

    profiles
});

/// Fresh copy of the built-in profile set.
pub fn builtins() -> BTreeMap<String, CommandProfile> {
    BUILTIN_PROFILES.clone()
}

/// Resolve the authoritative name -> profile mapping: built-ins merged with
/// the user store at `store_path` (or the default location). A user profile
/// with the same name as a built-in fully replaces it. The store is re-read
/// on every call; a missing or unreadable store degrades to built-ins only.
pub async fn resolve(store_path: Option<&Path>) -> BTreeMap<String, CommandProfile> {
    let mut registry = builtins();

    let path = store_path
        .map(Path::to_path_buf)
        .unwrap_or_else(store::default_path);

    for (name, profile) in store::load(&path).await {
        registry.insert(name, profile);
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::template;
    use std::collections::BTreeMap as Map;

    #[test]
    fn test_builtin_profile_set() {
        let profiles = builtins();
        assert_eq!(profiles.len(), 15);
        for name in [
            "base_gpu_quality",
            "trim_gpu_reencode",
            "compress_gpu_h265",
            "resize_gpu",
            "base_best_quality",
            "trim_reencode",
            "trim_copy",
            "split_segments",
            "compress_high_quality",
            "compress_ultra",
            "extract_audio_wav",
            "extract_audio_aac",
            "extract_video_only",
            "resize_video",
            "remux_copy",
        ] {
            assert!(profiles.contains_key(name), "missing built-in: {}", name);
        }
    }

    #[test]
    fn test_builtins_return_fresh_copies() {
        let mut first = builtins();
        first.get_mut("trim_copy").unwrap().command.clear();
        first.remove("remux_copy");

        let second = builtins();
        assert_eq!(second.len(), 15);
        assert!(!second["trim_copy"].command.is_empty());
    }

    #[test]
    fn test_every_builtin_renders_without_leftover_placeholders() {
        for (name, profile) in builtins() {
            let mut bindings = Map::new();
            for token in &profile.command {
                for parameter in template::placeholders(token) {
                    bindings.insert(parameter, "x".to_string());
                }
            }

            let argv = template::render(&name, &profile, &bindings).unwrap();
            for token in argv {
                assert!(
                    !token.contains('{') && !token.contains('}'),
                    "unresolved placeholder in profile '{}': {}",
                    name,
                    token
                );
            }
        }
    }

    #[tokio::test]
    async fn test_resolve_merges_store_over_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("profiles.json");
        std::fs::write(
            &store_path,
            r#"{"base_best_quality": {"command": ["x"], "description": "override"}}"#,
        )
        .unwrap();

        let registry = resolve(Some(&store_path)).await;
        let profile = &registry["base_best_quality"];
        assert_eq!(profile.command, vec!["x".to_string()]);
        assert_eq!(profile.description, "override");
        // Other built-ins are untouched
        assert_eq!(registry["remux_copy"], builtins()["remux_copy"]);
    }

    #[tokio::test]
    async fn test_resolve_tolerates_corrupt_store() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("profiles.json");
        std::fs::write(&store_path, "{not valid json").unwrap();

        let registry = resolve(Some(&store_path)).await;
        assert_eq!(registry, builtins());
    }

    #[tokio::test]
    async fn test_resolve_tolerates_missing_store() {
        let dir = tempfile::tempdir().unwrap();
        let registry = resolve(Some(&dir.path().join("nope.json"))).await;
        assert_eq!(registry, builtins());
    }
}
