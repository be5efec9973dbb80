use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipforgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("Missing required parameter '{parameter}' for profile '{profile}'")]
    MissingParameter { parameter: String, profile: String },

    #[error("Profile store error: {0}")]
    Store(String),

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, ClipforgeError>;
