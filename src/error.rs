use std::string::FromUtf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Command Error: {0}")]
    Command(#[from] std::io::Error),
    #[error("String Conversion Error: {0}")]
    String(#[from] FromUtf8Error),
    /// Attribute identifier the dispatcher has no accessor for
    #[error("Invalid attribute passed: {0}")]
    InvalidAttribute(String),
    #[error("Parse Error: {0}")]
    Parse(String),
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for AppError {
    fn from(err: String) -> Self {
        AppError::Other(err)
    }
}
