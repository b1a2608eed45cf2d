//! # Session Error Types
//!
//! Error types for the playback session layer.

use thiserror::Error;

/// Errors produced by the session controller and its helpers.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A seek request was rejected by the seek policy.
    #[error("Seek denied: {0}")]
    SeekDenied(String),

    /// The target surface was not ready to receive video output.
    #[error("Surface not ready: {0}")]
    SurfaceNotReady(String),

    /// A media item could not be resolved to a playable source.
    #[error("Media resolution failed: {0}")]
    MediaResolution(String),

    /// The underlying playback engine reported a failure.
    #[error("Engine error: {0}")]
    Engine(String),

    /// The session actor has shut down and no longer accepts commands.
    #[error("Session closed")]
    SessionClosed,

    /// A configuration value was rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Bridge-level failure from a host adapter.
    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::BridgeError),
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
