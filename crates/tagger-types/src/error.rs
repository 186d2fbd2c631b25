//! Error types for gr-tagger

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The exiftool binary could not be found or launched. Carries a
    /// platform-specific remediation message.
    #[error("{0}")]
    ToolNotFound(String),

    /// exiftool exited with a nonzero code. Carries its stderr text, or a
    /// generic "exited with code N" message when stderr was empty.
    #[error("{0}")]
    ToolExecution(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),
}

pub type Result<T> = std::result::Result<T, Error>;
