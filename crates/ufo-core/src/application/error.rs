//! Application layer errors.
//!
//! These errors represent failures in orchestration and infrastructure, not
//! business logic. Business logic errors are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while fetching, updating or installing templates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    /// The registry client could not materialise a package in the cache.
    #[error("Failed to fetch {package}: {reason}")]
    FetchFailed { package: String, reason: String },

    /// A newer version was found but could not be installed.
    #[error("Failed to update {package}: {reason}")]
    UpdateFailed { package: String, reason: String },

    /// The registry client binary could not be spawned.
    #[error("Package client '{client}' is unavailable: {reason}")]
    ClientUnavailable { client: String, reason: String },

    /// A custom template has no entry point file.
    #[error("Custom installer entry point not found: {}", path.display())]
    EntryPointMissing { path: PathBuf },

    /// The custom installer process ran but did not succeed.
    #[error("Custom installer failed{}", exit_suffix(*code))]
    CustomInstallFailed { code: Option<i32> },

    /// Copying a normal template into the target failed.
    #[error("Failed to copy {} to {}: {reason}", from.display(), to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        reason: String,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {}: {reason}", path.display())]
    FilesystemError { path: PathBuf, reason: String },

    /// The template catalog could not be read.
    #[error("Template catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },
}

fn exit_suffix(code: Option<i32>) -> String {
    match code {
        Some(code) => format!(" with exit code {code}"),
        None => " (terminated by signal)".to_string(),
    }
}

impl ApplicationError {
    /// Shorthand for [`ApplicationError::FilesystemError`].
    pub fn filesystem(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FetchFailed { package, .. } => vec![
                format!("Could not download {package}"),
                "Check your network connection and registry settings".into(),
                "Set a mirror with UFO_CLIENT__REGISTRY or client.registry".into(),
            ],
            Self::UpdateFailed { package, .. } => vec![
                format!("The cached version of {package} is still usable"),
                "Try again later, or clear ~/.ufo-cli/template to refetch".into(),
            ],
            Self::ClientUnavailable { client, .. } => vec![
                format!("Make sure '{client}' is installed and on your PATH"),
                "Choose another client with client.manager = \"npm\" | \"cnpm\"".into(),
            ],
            Self::EntryPointMissing { path } => vec![
                format!("Expected a script at {}", path.display()),
                "Custom templates must declare `main` in package.json or ship index.js".into(),
            ],
            Self::CustomInstallFailed { .. } => vec![
                "The template's own installer reported an error (see output above)".into(),
                "Check that `node` is installed and on your PATH".into(),
            ],
            Self::CopyFailed { to, .. } => vec![
                format!("Could not write into {}", to.display()),
                "Check that you have write permissions".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::CatalogUnavailable { .. } => vec![
                "Check the file configured under templates.catalog".into(),
                "Remove the setting to fall back to the built-in catalog".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FetchFailed { .. } | Self::UpdateFailed { .. } => ErrorCategory::Network,
            Self::ClientUnavailable { .. } => ErrorCategory::Configuration,
            Self::EntryPointMissing { .. } => ErrorCategory::NotFound,
            Self::CustomInstallFailed { .. }
            | Self::CopyFailed { .. }
            | Self::FilesystemError { .. } => ErrorCategory::Internal,
            Self::CatalogUnavailable { .. } => ErrorCategory::Configuration,
        }
    }
}
