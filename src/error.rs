use thiserror::Error;

#[derive(Error, Debug)]
pub enum PileError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Reward not eligible: {0}")]
    NotEligible(String),

    #[error("Camera permission denied: {0}")]
    PermissionDenied(String),

    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PileError>;
