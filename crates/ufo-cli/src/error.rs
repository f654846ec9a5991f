//! Error handling for the ufo CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Proper error chaining
//! - Exit code mapping

use std::error::Error as _;

use owo_colors::OwoColorize;
use thiserror::Error;

use ufo_core::{
    application::ApplicationError,
    domain::DomainError,
    error::{ErrorCategory as CoreCategory, UfoError},
};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Every failure the `ufo` binary can report.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input, including answers missing in non-interactive mode.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file or environment value could not be used.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `ufo-core` or one of its adapters.
    #[error(transparent)]
    Core(#[from] UfoError),

    // ── System errors ──────────────────────────────────────────────────────
    /// An I/O operation outside the engine failed (terminal, current dir).
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The user declined a confirmation.
    #[error("Operation cancelled")]
    Cancelled,

    /// `--template` named a package the catalog does not offer.
    #[error("Template not found: {name}")]
    TemplateNotFound { name: String, available: Vec<String> },
}

impl From<DomainError> for CliError {
    fn from(err: DomainError) -> Self {
        Self::Core(err.into())
    }
}

impl From<ApplicationError> for CliError {
    fn from(err: ApplicationError) -> Self {
        Self::Core(err.into())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            source: None,
        }
    }

    pub fn config(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {message}"),
                "Run interactively, or pass the value as a flag".into(),
                "Use --help for usage information".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {message}"),
                "Check your config file or pass one with --config".into(),
                "Environment overrides use the UFO_ prefix, e.g. UFO_CLIENT__MANAGER=cnpm"
                    .into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check file permissions".into(),
            ],

            Self::Cancelled => vec![
                "Operation was cancelled".into(),
                "No changes were made".into(),
            ],

            Self::TemplateNotFound { name, available } => {
                let mut suggestions = vec![format!("No template package named '{name}'")];
                if !available.is_empty() {
                    suggestions.push("Available templates:".into());
                    suggestions.extend(available.iter().map(|t| format!("  • {t}")));
                }
                suggestions
            }
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Network => ErrorCategory::Network,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category         | Code |
    /// |------------------|------|
    /// | Internal/Network |  1   |
    /// | User error       |  2   |
    /// | Not found        |  3   |
    /// | Configuration    |  4   |
    /// | Cancelled        | 130  |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Internal | ErrorCategory::Network => 1,
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Cancelled => 130,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use --debug for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {}\n", self));

        if verbose {
            let mut src = std::error::Error::source(self);
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse --debug for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Cancelled => tracing::info!("Cancelled by user"),
            ErrorCategory::Network => tracing::error!("Network error: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Resource not found.
    NotFound,
    /// Registry or package-manager failure.
    Network,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
    /// The user answered "no".
    Cancelled,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert `std::io` results into [`CliError`] at
/// call-sites with a descriptive context message.
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}
