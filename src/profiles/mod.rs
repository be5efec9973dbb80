// Command profile catalog
//
// This module holds the named command templates and everything needed to
// turn one into a runnable argument list:
// - registry: built-in profile table plus the user-store merge
// - store: the on-disk, user-editable profile overlay
// - template: placeholder substitution over a profile's tokens

pub mod registry;
pub mod store;
pub mod template;

pub use registry::resolve;
pub use store::add_profile;
pub use template::build;

use serde::{Deserialize, Serialize};

/// A named command template: the argument tokens (possibly containing
/// `{placeholder}` markers) and a human-readable description. The profile
/// name lives as the key of the map holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandProfile {
    pub command: Vec<String>,
    pub description: String,
}

impl CommandProfile {
    pub fn new<S: Into<String>>(command: &[&str], description: S) -> Self {
        Self {
            command: command.iter().map(|s| s.to_string()).collect(),
            description: description.into(),
        }
    }
}
