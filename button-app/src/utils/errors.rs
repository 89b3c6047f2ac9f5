use mentra_sdk::MentraError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ButtonAppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("MentraOS runtime error: {0}")]
    Runtime(#[from] MentraError),
}

pub type Result<T> = std::result::Result<T, ButtonAppError>;
