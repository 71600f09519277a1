use thiserror::Error;

use crate::app::services::rtf::RtfError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Rich text error: {0}")]
    Rtf(#[from] RtfError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;
