use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Playback engine failure: {0}")]
    EngineFailure(String),

    #[error("No playable source: {0}")]
    Unresolvable(String),

    #[error("DRM error: {0}")]
    Drm(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
