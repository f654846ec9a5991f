//! Infrastructure adapters for ufo.
//!
//! This crate implements the ports defined in `ufo_core::application::ports`.
//! It contains all external dependencies and I/O operations: the filesystem,
//! the npm/cnpm subprocess, the Node.js custom installer runner and the
//! template catalogs.

pub mod catalog;
pub mod filesystem;
pub mod package_client;
pub mod script_runner;

// Re-export commonly used adapters
pub use catalog::{BuiltinCatalog, FileCatalog};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use package_client::{NpmClient, PackageManager};
pub use script_runner::NodeScriptRunner;
