//! Cache layout and the identity of one cached package version.
//!
//! ```text
//! <target_root>/                        e.g. ~/.ufo-cli/template
//! ├── node_modules/                     store_root
//! │   ├── _demo-template@1.0.0@demo-template/     entry_dir (one install prefix)
//! │   │   └── node_modules/
//! │   │       ├── demo-template/        cache_file_path (package root)
//! │   │       │   ├── package.json      manifest (name + version)
//! │   │       │   ├── index.js          custom entry point (manifest `main`)
//! │   │       │   └── template/         custom installer source
//! │   │       └── some-dependency/      resolvable from the package root
//! │   └── _demo-template@1.1.0@demo-template/
//! └── .staging/                         in-flight downloads, never read back
//! ```
//!
//! Every version owns its own directory, so two versions of one template
//! never alias and an update never overwrites the version it replaces. The
//! client's whole install prefix lives in that directory, which keeps the
//! package's dependencies and any relative links between them intact.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use semver::Version;
use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{PackageName, PackageVersion},
};

/// File name of the package manifest inside a cached package.
pub const MANIFEST_FILE: &str = "package.json";

/// Entry point used when the manifest declares no `main`.
pub const DEFAULT_ENTRY_POINT: &str = "index.js";

/// Subdirectory handed to custom installers as their source.
pub const PAYLOAD_DIR: &str = "template";

const STORE_DIR: &str = "node_modules";
const STAGING_DIR: &str = ".staging";

// ── CacheLayout ───────────────────────────────────────────────────────────────

/// Where the cache store lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    target_root: PathBuf,
    store_root: PathBuf,
}

impl CacheLayout {
    /// Standard layout: the store is `node_modules` under `target_root`.
    pub fn new(target_root: impl Into<PathBuf>) -> Self {
        let target_root = target_root.into();
        let store_root = target_root.join(STORE_DIR);
        Self {
            target_root,
            store_root,
        }
    }

    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    pub fn store_root(&self) -> &Path {
        &self.store_root
    }

    /// Parent of every staging prefix.
    pub fn staging_root(&self) -> PathBuf {
        self.target_root.join(STAGING_DIR)
    }

    /// Directory name a cached `name@version` lives under.
    pub fn entry_dir_name(name: &PackageName, version: &Version) -> String {
        let flat = name.flattened();
        format!("_{flat}@{version}@{flat}")
    }

    /// Recover the version from a store entry name, if it belongs to `name`.
    pub fn parse_entry_dir_name(name: &PackageName, dir_name: &str) -> Option<Version> {
        let flat = name.flattened();
        let rest = dir_name.strip_prefix('_')?.strip_prefix(flat.as_str())?;
        let rest = rest.strip_prefix('@')?;
        let version = rest.strip_suffix(flat.as_str())?.strip_suffix('@')?;
        Version::parse(version).ok()
    }
}

// ── CachedPackage ─────────────────────────────────────────────────────────────

/// One concrete version of a package inside the cache store.
///
/// Holding a `CachedPackage` says nothing about whether it is materialised;
/// that is decided by reading its manifest (see `PackageService::exists`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPackage {
    layout: CacheLayout,
    package_name: PackageName,
    version: Version,
    requested: PackageVersion,
}

impl CachedPackage {
    pub fn new(
        layout: CacheLayout,
        package_name: PackageName,
        version: Version,
        requested: PackageVersion,
    ) -> Self {
        Self {
            layout,
            package_name,
            version,
            requested,
        }
    }

    /// The same package at another version, keeping the original request.
    pub fn at_version(&self, version: Version) -> Self {
        Self {
            version,
            ..self.clone()
        }
    }

    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    pub fn target_root(&self) -> &Path {
        self.layout.target_root()
    }

    pub fn store_root(&self) -> &Path {
        self.layout.store_root()
    }

    pub fn package_name(&self) -> &PackageName {
        &self.package_name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// What the descriptor originally asked for.
    pub fn requested(&self) -> &PackageVersion {
        &self.requested
    }

    /// Directory owned by this version inside the store.
    pub fn entry_dir(&self) -> PathBuf {
        self.layout
            .store_root()
            .join(CacheLayout::entry_dir_name(&self.package_name, &self.version))
    }

    /// Deterministic location of the package root for this version.
    pub fn cache_file_path(&self) -> PathBuf {
        self.entry_dir()
            .join(STORE_DIR)
            .join(self.package_name.as_str())
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.cache_file_path().join(MANIFEST_FILE)
    }

    /// Source directory handed to custom installers.
    pub fn payload_path(&self) -> PathBuf {
        self.cache_file_path().join(PAYLOAD_DIR)
    }

    /// Root file of the package according to its manifest.
    ///
    /// `main` must be a relative path that stays inside the package.
    pub fn entry_point(&self, manifest: &PackageManifest) -> Result<PathBuf, DomainError> {
        let main = manifest
            .main
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_ENTRY_POINT);

        let confined = Path::new(main)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !confined {
            return Err(DomainError::MissingTemplateMetadata(format!(
                "{} declares main '{main}', which is outside the package",
                self.manifest_path().display()
            )));
        }
        Ok(self.cache_file_path().join(main))
    }

    /// `name@version` as a registry client expects it.
    pub fn spec(&self) -> String {
        format!("{}@{}", self.package_name, self.version)
    }
}

impl fmt::Display for CachedPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec())
    }
}

// ── PackageManifest ───────────────────────────────────────────────────────────

/// The subset of `package.json` the engine relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
}

impl PackageManifest {
    /// Check this manifest describes exactly `pkg`.
    pub fn validate_for(&self, pkg: &CachedPackage) -> Result<(), DomainError> {
        if self.name.trim().is_empty() || self.version.trim().is_empty() {
            return Err(DomainError::MissingTemplateMetadata(format!(
                "{} has no name/version record",
                pkg.manifest_path().display()
            )));
        }
        if self.name != pkg.package_name().as_str() {
            return Err(DomainError::MissingTemplateMetadata(format!(
                "manifest names '{}' but '{}' was expected",
                self.name,
                pkg.package_name()
            )));
        }
        match Version::parse(self.version.trim()) {
            Ok(v) if &v == pkg.version() => Ok(()),
            _ => Err(DomainError::MissingTemplateMetadata(format!(
                "manifest version '{}' does not match {}",
                self.version,
                pkg.version()
            ))),
        }
    }
}
