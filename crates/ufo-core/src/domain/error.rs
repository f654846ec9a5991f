// ============================================================================
// domain/error.rs - DOMAIN ERROR TAXONOMY
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they cross the lifecycle boundary by value)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid template descriptor: {field} {reason}")]
    InvalidDescriptor { field: &'static str, reason: String },

    #[error("Unknown install type '{0}' (expected 'normal' or 'custom')")]
    UnknownInstallType(String),

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Invalid project info: {0}")]
    InvalidProjectInfo(String),

    #[error("Command argument list cannot be empty")]
    EmptyArgumentList,

    // ========================================================================
    // Not Found Errors (404-level equivalent)
    // ========================================================================
    #[error("Template metadata missing: {0}")]
    MissingTemplateMetadata(String),

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Illegal lifecycle transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

impl DomainError {
    /// Shorthand for [`DomainError::InvalidDescriptor`].
    pub fn invalid_descriptor(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidDescriptor {
            field,
            reason: reason.into(),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidDescriptor { field, reason } => vec![
                format!("The template catalog entry has a bad '{field}': {reason}"),
                "Package names follow npm rules, e.g. 'my-template' or '@scope/my-template'".into(),
                "Versions must be semver ('1.0.0'), a range ('^1.2') or 'latest'".into(),
            ],
            Self::UnknownInstallType(kind) => vec![
                format!("'{kind}' is not a supported install type"),
                "Supported install types:".into(),
                "  • normal  - copy the template files into the target directory".into(),
                "  • custom  - run the template's own installer entry point".into(),
            ],
            Self::InvalidProjectName { name, .. } => vec![
                format!("Project name '{name}' is invalid"),
                "Start with a letter; join segments with '-' or '_'".into(),
                "Each segment after a separator must start with a letter".into(),
                "Examples: my-project, my_app, project123".into(),
            ],
            Self::InvalidProjectInfo(msg) => vec![
                format!("Check the project details: {msg}"),
                "Project versions must be valid semver, e.g. 1.0.0".into(),
            ],
            Self::EmptyArgumentList => vec![
                "A command needs at least one positional argument".into(),
                "Example: ufo init my-project".into(),
            ],
            Self::MissingTemplateMetadata(msg) => vec![
                format!("No usable template: {msg}"),
                "Check the template catalog configured under [templates]".into(),
            ],
            Self::InvalidTransition { .. } => vec![
                "This is a bug in ufo, please report it".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDescriptor { .. }
            | Self::UnknownInstallType(_)
            | Self::InvalidProjectName { .. }
            | Self::InvalidProjectInfo(_)
            | Self::EmptyArgumentList => ErrorCategory::Validation,
            Self::MissingTemplateMetadata(_) => ErrorCategory::NotFound,
            Self::InvalidTransition { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
