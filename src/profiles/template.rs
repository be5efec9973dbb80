use std::collections::BTreeMap;
use std::path::Path;

use super::{CommandProfile, registry};
use crate::error::{ClipforgeError, Result};

/// Runtime name -> value mapping used to fill a template's placeholders.
pub type Bindings = BTreeMap<String, String>;

fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Placeholder names referenced by a token, in order of appearance.
/// Only `{ident}` with a non-empty `[A-Za-z0-9_]+` identifier counts;
/// any other brace text is literal.
pub fn placeholders(token: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = token;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_identifier(&after[..close]) => {
                names.push(after[..close].to_string());
                rest = &after[close + 1..];
            }
            _ => rest = after,
        }
    }
    names
}

/// Substitute every placeholder in a single token. Substitution is strict:
/// the first placeholder absent from the bindings aborts with an error
/// naming both the parameter and the profile.
fn substitute(token: &str, bindings: &Bindings, profile_name: &str) -> Result<String> {
    let mut resolved = String::with_capacity(token.len());
    let mut rest = token;

    while let Some(open) = rest.find('{') {
        resolved.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) if is_identifier(&after[..close]) => {
                let name = &after[..close];
                let value = bindings.get(name).ok_or_else(|| {
                    ClipforgeError::MissingParameter {
                        parameter: name.to_string(),
                        profile: profile_name.to_string(),
                    }
                })?;
                resolved.push_str(value);
                rest = &after[close + 1..];
            }
            _ => {
                resolved.push('{');
                rest = after;
            }
        }
    }

    resolved.push_str(rest);
    Ok(resolved)
}

/// Fill a profile's template from the bindings, token by token, left to
/// right. All-or-nothing: a partial argument list is never returned.
pub fn render(
    profile_name: &str,
    profile: &CommandProfile,
    bindings: &Bindings,
) -> Result<Vec<String>> {
    profile
        .command
        .iter()
        .map(|token| substitute(token, bindings, profile_name))
        .collect()
}

/// Build the runnable argument list for a named profile: resolve the merged
/// registry, look up the profile, substitute the bindings.
pub async fn build(
    profile_name: &str,
    bindings: &Bindings,
    store_path: Option<&Path>,
) -> Result<Vec<String>> {
    let registry = registry::resolve(store_path).await;

    let profile = registry
        .get(profile_name)
        .ok_or_else(|| ClipforgeError::ProfileNotFound(profile_name.to_string()))?;

    render(profile_name, profile, bindings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, &str)]) -> Bindings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_build_trim_copy_exact() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("absent.json");

        let argv = build(
            "trim_copy",
            &bindings(&[
                ("input", "a.mp4"),
                ("start", "00:00:01"),
                ("end", "00:00:05"),
                ("output", "b.mp4"),
            ]),
            Some(&store),
        )
        .await
        .unwrap();

        assert_eq!(
            argv,
            vec![
                "ffmpeg", "-y", "-ss", "00:00:01", "-to", "00:00:05", "-i", "a.mp4", "-c",
                "copy", "b.mp4",
            ]
        );
    }

    #[tokio::test]
    async fn test_build_resize_substitutes_numeric_strings() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("absent.json");

        let argv = build(
            "resize_video",
            &bindings(&[
                ("input", "a.mp4"),
                ("width", "640"),
                ("height", "360"),
                ("output", "b.mp4"),
            ]),
            Some(&store),
        )
        .await
        .unwrap();

        assert!(argv.contains(&"scale=640:360:flags=lanczos".to_string()));
    }

    #[tokio::test]
    async fn test_build_unknown_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("absent.json");

        let err = build("unknown_profile", &Bindings::new(), Some(&store))
            .await
            .unwrap_err();
        match err {
            ClipforgeError::ProfileNotFound(name) => assert_eq!(name, "unknown_profile"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_build_reports_first_missing_parameter() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("absent.json");

        let err = build("trim_copy", &bindings(&[("input", "a.mp4")]), Some(&store))
            .await
            .unwrap_err();
        match err {
            ClipforgeError::MissingParameter { parameter, profile } => {
                // "-ss {start}" precedes "-i {input}" in the template,
                // so start is the first unresolved placeholder
                assert_eq!(parameter, "start");
                assert_eq!(profile, "trim_copy");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_placeholders_order_within_token() {
        assert_eq!(placeholders("scale={width}:{height}"), vec!["width", "height"]);
        assert_eq!(placeholders("-preset"), Vec::<String>::new());
    }

    #[test]
    fn test_substitute_multiple_placeholders_in_one_token() {
        let resolved = substitute(
            "scale={width}:{height}:flags=lanczos",
            &bindings(&[("width", "640"), ("height", "360")]),
            "resize_video",
        )
        .unwrap();
        assert_eq!(resolved, "scale=640:360:flags=lanczos");
    }

    #[test]
    fn test_non_identifier_braces_pass_through() {
        let resolved = substitute("a{}b{not ok}c", &Bindings::new(), "p").unwrap();
        assert_eq!(resolved, "a{}b{not ok}c");

        let resolved = substitute("open{brace", &Bindings::new(), "p").unwrap();
        assert_eq!(resolved, "open{brace");
    }

    #[test]
    fn test_render_is_all_or_nothing() {
        let profile = CommandProfile::new(&["echo", "{a}", "{b}"], "test");
        let err = render("custom", &profile, &bindings(&[("a", "1")])).unwrap_err();
        match err {
            ClipforgeError::MissingParameter { parameter, .. } => assert_eq!(parameter, "b"),
            other => panic!("unexpected error: {}", other),
        }
    }
}
