//! Error types for engine operations
//!
//! Per-frame interpretation never fails; errors only come out of the setup,
//! load, and save paths that talk to collaborators.

use thiserror::Error;

/// Errors that can occur outside the per-frame loop
#[derive(Error, Debug)]
pub enum EngineError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode/encode error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// JSON error from serde_json
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid base64 payload in a data URL
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Cached background reference could not be used
    #[error("Malformed background reference: {0}")]
    MalformedBackground(String),

    /// Storage collaborator reported a failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Hand tracker failed to start
    #[error("Tracker failed to initialize: {0}")]
    TrackerInit(String),

    /// Operation requires a ready tracker
    #[error("Engine is not ready")]
    NotReady,

    /// A save is already running
    #[error("A save is already in progress")]
    SaveInProgress,

    /// Export encoding failed
    #[error("Encode error: {0}")]
    Encode(String),

    /// Settings file could not be used
    #[error("Settings error: {0}")]
    Settings(String),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
