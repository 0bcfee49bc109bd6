use thiserror::Error;

use super::failure::Failure;

#[derive(Error, Debug)]
pub enum SimplycallError {
    #[error("Route [{0}] is already registered")]
    DuplicateRoute(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("Multipart error: {0}")]
    Multipart(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Response of route [{0}] has an undecodable argument type")]
    UndecodableResponse(String),

    #[error("No response for route [{0}]")]
    NoResponse(String),

    #[error("Unexpected value type: {0}")]
    ValueType(String),

    #[error("Call failed: {0}")]
    Remote(#[from] Failure),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<multer::Error> for SimplycallError {
    fn from(err: multer::Error) -> Self {
        SimplycallError::Multipart(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimplycallError>;
