use std::collections::BTreeMap;
use thiserror::Error;
use useradmin_core::AdminError;

#[derive(Error, Debug)]
pub enum RestError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, RestError>;

impl From<RestError> for AdminError {
    fn from(err: RestError) -> Self {
        match err {
            RestError::Http(e) => AdminError::Http(e.to_string()),
            RestError::Parse(e) => AdminError::Parse(e.to_string()),
            RestError::Io(e) => AdminError::Io(e.to_string()),
            RestError::NotFound(what) => AdminError::NotFound(what),
            RestError::Unauthorized => AdminError::Unauthorized,
            RestError::Validation { message, fields } => AdminError::Validation { message, fields },
            RestError::Api { status, message } => AdminError::Api { status, message },
        }
    }
}
