use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
