// Error types. Configuration and scan errors are fatal and stop the run
// before any upload happens. Upload errors never leave the driver: they are
// folded into `UploadOutcome::Failure` and counted.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that end an invocation before (or instead of) a run.
#[derive(Error, Debug)]
pub enum UploaderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("No photos found in: {}", path.display())]
    NoPhotosFound { path: PathBuf },

    #[error("Failed to install Ctrl+C handler: {0}")]
    Interrupt(String),
}

/// Missing or invalid settings, reported before enumeration starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing API key (use --api-key or PHOTO_UPLOAD_API_KEY)")]
    MissingApiKey,

    #[error("missing event id (use --event-id or PHOTO_UPLOAD_EVENT_ID)")]
    MissingEventId,

    #[error("batch size must be between 1 and {max}")]
    InvalidBatchSize { max: usize },

    #[error("duration of {minutes} minutes is too long")]
    InvalidDuration { minutes: u64 },

    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("interval must be greater than zero when the run is bounded by a duration")]
    ZeroIntervalWithDuration,

    #[error("failed to read config file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Errors from enumerating the photo directory.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-file upload failures. Never fatal for the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("TIMEOUT (> {secs}s)")]
    Timeout { secs: u64 },

    #[error("{0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("cannot read file: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, UploaderError>;
