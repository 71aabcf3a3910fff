// packages/engine/src/utils/errors.rs
//! Error types for the replay engine
//!
//! Replay itself never fails: missing images and unknown event types are
//! reported as diagnostics and skipped. Errors only come from the edges
//! (loading logs, loading configuration, rejecting bad parameters).

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// An event log file could not be read or parsed
    #[error("Failed to load event log: {0}")]
    LogLoadFailed(String),

    /// An event payload does not match its declared type
    #[error("Invalid {kind} event at {time}ms: {reason}")]
    InvalidEvent {
        kind: String,
        time: f64,
        reason: String,
    },

    /// Speed multipliers must be finite and positive
    #[error("Invalid playback speed: {0}")]
    InvalidSpeed(f64),

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Tracing could not be initialised
    #[error("Observability setup failed: {0}")]
    ObservabilityFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::InvalidSpeed(-1.0);
        assert_eq!(err.to_string(), "Invalid playback speed: -1");

        let err = EngineError::InvalidEvent {
            kind: "keypress".to_string(),
            time: 12.5,
            reason: "missing key".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid keypress event at 12.5ms: missing key");
    }

    #[test]
    fn test_from_serde_error() {
        let err: EngineError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, EngineError::Serialization(_)));
    }
}
