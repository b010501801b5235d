use thiserror::Error;

/// Errors raised by the glue around the caption engine.
///
/// Parsing and timeline resolution never fail; these only come from reading
/// listings, configuration and caption files.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid listing: {0}")]
    Listing(#[from] serde_json::Error),

    #[error("No captions available for '{path}': {reason}")]
    CaptionUnavailable { path: String, reason: String },

    #[error("Path escapes the library root: {0}")]
    InvalidPath(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
