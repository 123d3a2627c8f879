//! Error handling for the engagement notebook
//!
//! Only a handful of conditions are real errors here. Malformed scan lines,
//! empty filters and empty files are ordinary data and never surface as errors.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for notebook operations
#[derive(Debug, Error)]
pub enum HermitError {
    #[error("File '{}' not found.", .0.display())]
    InputNotFound(PathBuf),

    #[error("{0} cannot be empty.")]
    EmptyInput(&'static str),

    #[error("Invalid choice '{0}'. Please enter 1, 2, 3, 4, or a valid alias.")]
    InvalidChoice(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Signal handler error: {0}")]
    Signal(#[from] ctrlc::Error),
}

impl HermitError {
    /// True for errors caused by what the operator typed rather than by the
    /// environment. The interactive menu reports these and keeps looping.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            HermitError::InputNotFound(_) | HermitError::EmptyInput(_) | HermitError::InvalidChoice(_)
        )
    }
}

/// Result type alias for notebook operations
pub type HermitResult<T> = Result<T, HermitError>;
