//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "make this template available in the cache" or
//! "install it into this directory".

pub mod catalog_service;
pub mod install_service;
pub mod package_service;

pub use catalog_service::CatalogService;
pub use install_service::{InstallReport, InstallService};
pub use package_service::PackageService;
