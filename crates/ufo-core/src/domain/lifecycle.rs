//! The command lifecycle as an explicit finite-state machine.
//!
//! ```text
//! Created ──normalize_args──▶ ArgsNormalized ──initialize──▶ Initialized ──execute──▶ Executed
//!    │                             │                             │
//!    └─────────────fail────────────┴─────────────fail────────────┴──────▶ Failed
//! ```
//!
//! Each edge is its own transition function; any other move is rejected with
//! [`DomainError::InvalidTransition`]. `Executed` and `Failed` are terminal.
//! Driving the machine (and awaiting each stage) is the application layer's
//! job; this module only knows which moves are legal.

use std::fmt;

use crate::domain::error::DomainError;

/// Where a command is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Created,
    ArgsNormalized,
    Initialized,
    Executed,
    Failed,
}

impl LifecycleState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::ArgsNormalized => "args-normalized",
            Self::Initialized => "initialized",
            Self::Executed => "executed",
            Self::Failed => "failed",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Executed | Self::Failed)
    }

    /// `Created → ArgsNormalized`
    pub fn normalize_args(self) -> Result<Self, DomainError> {
        self.step(Self::Created, Self::ArgsNormalized)
    }

    /// `ArgsNormalized → Initialized`
    pub fn initialize(self) -> Result<Self, DomainError> {
        self.step(Self::ArgsNormalized, Self::Initialized)
    }

    /// `Initialized → Executed`
    pub fn execute(self) -> Result<Self, DomainError> {
        self.step(Self::Initialized, Self::Executed)
    }

    /// Any non-terminal state → `Failed`
    pub fn fail(self) -> Result<Self, DomainError> {
        if self.is_terminal() {
            return Err(self.illegal(Self::Failed));
        }
        Ok(Self::Failed)
    }

    fn step(self, from: Self, to: Self) -> Result<Self, DomainError> {
        if self == from {
            Ok(to)
        } else {
            Err(self.illegal(to))
        }
    }

    fn illegal(self, to: Self) -> DomainError {
        DomainError::InvalidTransition {
            from: self.as_str(),
            to: to.as_str(),
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Positional arguments handed to a command.
///
/// Never empty: construction fails with [`DomainError::EmptyArgumentList`]
/// before any lifecycle stage can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArgs {
    positionals: Vec<String>,
}

impl CommandArgs {
    pub fn new<I, S>(positionals: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let positionals: Vec<String> = positionals.into_iter().map(Into::into).collect();
        if positionals.is_empty() {
            return Err(DomainError::EmptyArgumentList);
        }
        Ok(Self { positionals })
    }

    /// Trim surrounding whitespace from every argument.
    pub fn normalized(self) -> Self {
        Self {
            positionals: self
                .positionals
                .into_iter()
                .map(|a| a.trim().to_string())
                .collect(),
        }
    }

    /// The first positional argument (always present).
    pub fn first(&self) -> &str {
        self.positionals.first().map(String::as_str).unwrap_or_default()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.positionals.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.positionals
    }
}
