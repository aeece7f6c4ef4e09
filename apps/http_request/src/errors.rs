use interactor_core::UsageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid call: {0}")]
    Usage(#[from] UsageError),

    #[error("Request failed: {0}")]
    Request(String),
}
