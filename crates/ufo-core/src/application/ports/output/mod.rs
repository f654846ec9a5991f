//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `ufo-adapters` crate provides implementations.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use semver::{Version, VersionReq};

use crate::domain::{PackageName, TemplateRecord};
use crate::error::UfoResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `ufo_adapters::filesystem::LocalFilesystem` (production)
/// - `ufo_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Errors are reported as `ApplicationError::FilesystemError` wrapped in
/// `UfoError`; callers re-map them where a more specific variant applies.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories. Succeeds if it exists.
    fn create_dir_all(&self, path: &Path) -> UfoResult<()>;

    /// Write content to a file, creating parent directories.
    fn write_file(&self, path: &Path, content: &str) -> UfoResult<()>;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> UfoResult<String>;

    /// Check if path exists (file or directory).
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Immediate children of a directory, in no particular order.
    fn read_dir(&self, path: &Path) -> UfoResult<Vec<PathBuf>>;

    /// Move a file or directory tree. The destination must not exist.
    fn rename(&self, from: &Path, to: &Path) -> UfoResult<()>;

    /// Remove a directory and all contents. Succeeds if it does not exist.
    fn remove_dir_all(&self, path: &Path) -> UfoResult<()>;

    /// Remove everything inside a directory, keeping the directory itself.
    fn empty_dir(&self, path: &Path) -> UfoResult<()>;

    /// Recursively copy `from` into `to`, overwriting files that exist.
    ///
    /// Returns the number of files copied.
    fn copy_tree(&self, from: &Path, to: &Path) -> UfoResult<usize>;
}

/// Exit status of an external process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStatus {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ProcessStatus {
    pub const SUCCESS: Self = Self { code: Some(0) };

    pub const fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("signal"),
        }
    }
}

/// One exact package version to download under a prefix directory.
///
/// After a successful install the package lives at
/// `<prefix>/node_modules/<package_name>`, possibly as a link into another
/// directory under the prefix. Its dependencies are somewhere below the
/// prefix too, which is why the prefix is only ever moved as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub package_name: PackageName,
    pub version: Version,
    pub prefix: PathBuf,
}

impl FetchRequest {
    /// `name@version` as the client expects it.
    pub fn spec(&self) -> String {
        format!("{}@{}", self.package_name, self.version)
    }

    /// Where the client leaves the package.
    pub fn installed_path(&self) -> PathBuf {
        self.prefix
            .join("node_modules")
            .join(self.package_name.as_str())
    }
}

/// Port for the registry client.
///
/// Implemented by `ufo_adapters::package_client::NpmClient`, which only ever
/// spawns an allow-listed binary. Output of the process is never parsed for
/// success; only [`ProcessStatus`] is.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageClient: Send + Sync {
    /// Binary name, for messages.
    fn name(&self) -> &'static str;

    /// Download exactly `request.spec()` under `request.prefix`.
    ///
    /// `Err` means the client could not be run at all; a client that ran and
    /// failed is an `Ok` with a non-success status.
    async fn install(&self, request: &FetchRequest) -> UfoResult<ProcessStatus>;

    /// Highest published version of `name` satisfying `range`, if any.
    async fn latest_version(
        &self,
        name: &PackageName,
        range: &VersionReq,
    ) -> UfoResult<Option<Version>>;
}

/// One run of a custom installer entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptInvocation {
    /// Module to load.
    pub entry_point: PathBuf,
    /// Serialised `InstallOptions`, passed as a single argument.
    pub options_json: String,
    /// Working directory of the child process.
    pub working_dir: PathBuf,
}

/// Port for running custom installers out of process.
///
/// Implemented by `ufo_adapters::script_runner::NodeScriptRunner`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    /// Run to completion with inherited stdio and report the exit status.
    async fn run(&self, invocation: &ScriptInvocation) -> UfoResult<ProcessStatus>;
}

/// Port for the template catalog.
///
/// Implemented by:
/// - `ufo_adapters::catalog::BuiltinCatalog` (the fixed default list)
/// - `ufo_adapters::catalog::FileCatalog` (a TOML file)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateCatalog: Send + Sync {
    /// Every record in the catalog, unvalidated.
    fn list(&self) -> UfoResult<Vec<TemplateRecord>>;
}
