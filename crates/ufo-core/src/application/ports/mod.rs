//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `ufo-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: cache store and target directory access
//!   - `PackageClient`: the allow-listed registry client (npm / cnpm)
//!   - `ScriptRunner`: out-of-process custom installers
//!   - `TemplateCatalog`: where template descriptors come from
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - `Command`, driven by `LifecycleRunner` (see `application::lifecycle`)

pub mod output;

pub use output::{
    FetchRequest, Filesystem, PackageClient, ProcessStatus, ScriptInvocation, ScriptRunner,
    TemplateCatalog,
};

#[cfg(test)]
pub use output::{MockFilesystem, MockPackageClient, MockScriptRunner, MockTemplateCatalog};
