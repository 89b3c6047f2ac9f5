use thiserror::Error;

/// Errors that can occur when running a MentraOS app server
#[derive(Error, Debug)]
pub enum MentraError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("App server failed to start: {0}")]
    StartupError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },

    #[error("Session handler failed: {0}")]
    HandlerError(String),
}

/// Result type for app server operations
pub type Result<T> = std::result::Result<T, MentraError>;
