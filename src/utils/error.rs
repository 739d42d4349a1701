// Error handling utilities
// Author: Gabriel Demetrios Lafis

use thiserror::Error;

use crate::data::DataError;
use crate::processing::ProcessingError;

/// Application error type. Every kind is recoverable and meant to be shown to the user.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Processing(#[from] ProcessingError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// The message for an error dialog
    pub fn user_message(&self) -> String {
        match self {
            AppError::Data(_) => format!("Error loading files: {}", self),
            AppError::Processing(_) | AppError::Config(_) => self.to_string(),
        }
    }
}

/// Result type alias for AppError
pub type AppResult<T> = Result<T, AppError>;
