//! Error types for the player session

use crate::types::TrackId;
use thiserror::Error;

/// Player errors
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Malformed catalog entry
    #[error("Invalid track descriptor at index {index}: {reason}")]
    Config { index: usize, reason: String },

    /// Configuration could not be loaded or failed validation
    #[error("Settings error: {0}")]
    Settings(String),

    /// Track id is not part of the catalog
    #[error("Unknown track: {0}")]
    UnknownTrack(TrackId),

    /// Operation requires a loaded track or a live player instance
    #[error("Invalid state: {0}")]
    State(String),

    /// Waveform engine failed to construct an instance or load media
    #[error("Waveform engine error: {0}")]
    Adapter(String),

    /// Catalog JSON could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for PlayerError {
    fn from(err: config::ConfigError) -> Self {
        PlayerError::Settings(err.to_string())
    }
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;
