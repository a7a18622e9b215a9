use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const RUNTIME_LOAD_MESSAGE: &str =
    "Failed to load the transform runtime. Check your installation or network connection.";
pub const INITIALIZATION_MESSAGE: &str =
    "Failed to initialize the transform module. Please restart or try again.";
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    RuntimeLoad,
    Initialization,
    Transform,
    Internal,
}

/// Everything a single run can fail with, rendered as the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("{0}")]
    Validation(String),
    #[error("{}", RUNTIME_LOAD_MESSAGE)]
    RuntimeLoad,
    #[error("{}", INITIALIZATION_MESSAGE)]
    Initialization,
    #[error("{0}")]
    Transform(String),
    #[error("{}", .0.as_deref().unwrap_or(GENERIC_FAILURE_MESSAGE))]
    Unexpected(Option<String>),
}

impl RunError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            RunError::Validation(_) => ErrorCode::Validation,
            RunError::RuntimeLoad => ErrorCode::RuntimeLoad,
            RunError::Initialization => ErrorCode::Initialization,
            RunError::Transform(_) => ErrorCode::Transform,
            RunError::Unexpected(_) => ErrorCode::Internal,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorReport {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<&RunError> for ErrorReport {
    fn from(value: &RunError) -> Self {
        Self::new(value.code(), value.to_string())
    }
}
