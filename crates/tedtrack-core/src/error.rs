//! TedTrack error types.

use thiserror::Error;

/// Convenience result alias used across all TedTrack crates.
pub type Result<T> = std::result::Result<T, TedTrackError>;

/// Unified error type for the whole workspace.
#[derive(Error, Debug)]
pub enum TedTrackError {
    /// Spreadsheet could not be read or decoded.
    #[error("Load error: {0}")]
    Load(String),

    /// Table rows could not be normalized into deadline records.
    #[error("Processing error: {0}")]
    Processing(String),

    /// Artifact save/load/delete failure.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// SMTP connect, auth, or send failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A lifecycle action conflicted with the current task state.
    #[error("Task conflict: {0}")]
    TaskConflict(String),

    /// Configuration read/parse failure.
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
