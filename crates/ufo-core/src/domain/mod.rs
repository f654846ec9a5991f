// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for ufo.
//!
//! This module contains pure logic: no filesystem, no processes, no logging.
//! Cache access, registry clients and installers are reached through ports
//! (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: Paths are computed here, never touched
//! - **Validated on construction**: holding a value means it is well formed
//! - **Immutable entities**: descriptors and project info never change after build
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod lifecycle;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    install_options::InstallOptions,
    package::{
        CacheLayout, CachedPackage, DEFAULT_ENTRY_POINT, MANIFEST_FILE, PAYLOAD_DIR,
        PackageManifest,
    },
    project::{DEFAULT_PROJECT_VERSION, ProjectInfo, ProjectInfoBuilder, class_name_for},
    template::{InstallStrategy, NormalInstall, TemplateDescriptor, TemplateRecord},
};

pub use error::{DomainError, ErrorCategory};
pub use lifecycle::{CommandArgs, LifecycleState};

pub use value_objects::{InstallType, PackageName, PackageVersion, ProjectType};

pub use validation::DomainValidator;
