//! Application layer for ufo.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (PackageService, InstallService, CatalogService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Lifecycle**: The runner every CLI command goes through
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod lifecycle;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{CatalogService, InstallReport, InstallService, PackageService};

// Re-export port traits (for adapter implementation)
pub use ports::{
    FetchRequest, Filesystem, PackageClient, ProcessStatus, ScriptInvocation, ScriptRunner,
    TemplateCatalog,
};

pub use error::ApplicationError;
pub use lifecycle::{Command, LifecycleRunner};
