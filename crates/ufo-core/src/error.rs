//! Unified error handling for ufo core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for ufo core operations.
///
/// Every failure the engine can raise is one of these; the CLI prints it
/// exactly once at its top-level handler.
#[derive(Debug, Error, Clone)]
pub enum UfoError {
    /// Errors from the domain layer (business logic violations).
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (fetch, install, filesystem).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl UfoError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Check ~/.config/ufo/config.toml and UFO_* environment variables".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in ufo".into(),
                "Re-run with --debug and include the output when reporting it".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Network,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type UfoResult<T> = Result<T, UfoError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> UfoResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> UfoResult<T> {
        self.map_err(|e| UfoError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
