use thiserror::Error;
use transport::ApiError;
use transport::session::SessionError;

use crate::forms::ValidationErrors;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("You must be logged in to perform this action")]
    MissingSession,

    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Api(e) if e.is_cancelled())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Api(ApiError::from(value))
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
