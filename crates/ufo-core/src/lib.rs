//! ufo Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the ufo
//! project scaffolding tool: the engine that resolves a template descriptor
//! to a cached package version, keeps the cache populated through an external
//! registry client, and installs the cached template into a target directory.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             ufo-cli (CLI)               │
//! │  (Commands driven by LifecycleRunner)   │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (PackageService, InstallService, ...)   │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, PackageClient, Runner ...) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     ufo-adapters (Infrastructure)       │
//! │  (LocalFilesystem, NpmClient, Node...)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (TemplateDescriptor, CachedPackage, ...)│
//! │         No I/O, no logging              │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ufo_core::prelude::*;
//!
//! let packages = PackageService::new(layout, client, Arc::clone(&filesystem));
//! let installer = InstallService::new(filesystem, runner);
//!
//! let pkg = packages.prepare(&descriptor).await?;
//! installer.install(&descriptor, &pkg, &project, target_dir).await?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, CatalogService, Command, InstallReport, InstallService,
        LifecycleRunner, PackageService,
        ports::{
            FetchRequest, Filesystem, PackageClient, ProcessStatus, ScriptInvocation,
            ScriptRunner, TemplateCatalog,
        },
    };
    pub use crate::domain::{
        CacheLayout, CachedPackage, CommandArgs, DomainError, InstallOptions, InstallStrategy,
        InstallType, LifecycleState, NormalInstall, PackageManifest, PackageName,
        PackageVersion, ProjectInfo, ProjectType, TemplateDescriptor, TemplateRecord,
    };
    pub use crate::error::{UfoError, UfoResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
