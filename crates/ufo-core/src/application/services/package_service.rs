//! Package Service - the cache store, resolver, fetcher and updater.
//!
//! Workflow for one template:
//! 1. `resolve` the descriptor to a concrete cached version
//! 2. `exists` decides between `install` (miss) and `update` (hit)
//! 3. every fetch is staged, promoted with a single rename, then re-verified
//!
//! The rename moves the client's whole install prefix, so a package and the
//! dependencies installed next to it always land in the cache together.
//!
//! The store is only ever written by the staged fetch, so a
//! directory without a valid manifest can only be a leftover from an
//! interrupted run and is treated as absent.

use std::path::Path;
use std::sync::Arc;

use semver::Version;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::{FetchRequest, Filesystem, PackageClient},
    },
    domain::{
        CacheLayout, CachedPackage, DomainError, PackageManifest, PackageName, PackageVersion,
        TemplateDescriptor,
    },
    error::{UfoError, UfoResult},
};

/// Read and validate the manifest of a cached package.
///
/// Shared by the resolver and the installer dispatcher so both agree on what
/// "exists" means.
pub(crate) fn load_manifest(
    filesystem: &dyn Filesystem,
    pkg: &CachedPackage,
) -> UfoResult<PackageManifest> {
    let path = pkg.manifest_path();
    if !filesystem.is_file(&path) {
        return Err(DomainError::MissingTemplateMetadata(format!(
            "{} is not cached ({} missing)",
            pkg,
            path.display()
        ))
        .into());
    }

    let raw = filesystem.read_to_string(&path)?;
    let manifest: PackageManifest = serde_json::from_str(&raw).map_err(|e| {
        DomainError::MissingTemplateMetadata(format!("{} is not valid JSON: {e}", path.display()))
    })?;
    manifest.validate_for(pkg)?;
    Ok(manifest)
}

/// Resolves descriptors against the cache and keeps the cache populated.
pub struct PackageService {
    layout: CacheLayout,
    client: Arc<dyn PackageClient>,
    filesystem: Arc<dyn Filesystem>,
}

impl PackageService {
    pub fn new(
        layout: CacheLayout,
        client: Arc<dyn PackageClient>,
        filesystem: Arc<dyn Filesystem>,
    ) -> Self {
        Self {
            layout,
            client,
            filesystem,
        }
    }

    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    /// Map a descriptor to one concrete version in the cache.
    ///
    /// Exact versions resolve without I/O. Ranges prefer the highest cached
    /// version that satisfies them and only ask the registry otherwise.
    #[instrument(skip_all, fields(package = %descriptor.package_name(), version = %descriptor.version()))]
    pub async fn resolve(&self, descriptor: &TemplateDescriptor) -> UfoResult<CachedPackage> {
        let name = descriptor.package_name();
        let requested = descriptor.version();

        let version = match requested {
            PackageVersion::Exact(version) => version.clone(),
            PackageVersion::Range(range) => {
                let cached = self
                    .cached_versions(name)
                    .into_iter()
                    .filter(|v| range.matches(v))
                    .max();
                match cached {
                    Some(version) => {
                        debug!(%version, "Range satisfied from cache");
                        version
                    }
                    None => self
                        .client
                        .latest_version(name, range)
                        .await?
                        .ok_or_else(|| ApplicationError::FetchFailed {
                            package: format!("{name}@{requested}"),
                            reason: format!("no published version satisfies '{range}'"),
                        })?,
                }
            }
        };

        Ok(CachedPackage::new(
            self.layout.clone(),
            name.clone(),
            version,
            requested.clone(),
        ))
    }

    /// True only when the version directory holds a manifest naming exactly
    /// this package and version.
    pub fn exists(&self, pkg: &CachedPackage) -> bool {
        self.manifest(pkg).is_ok()
    }

    /// The validated manifest of a cached package.
    pub fn manifest(&self, pkg: &CachedPackage) -> UfoResult<PackageManifest> {
        load_manifest(self.filesystem.as_ref(), pkg)
    }

    /// Versions of `name` present in the store, oldest first.
    ///
    /// Only directory names are inspected; callers still check `exists`.
    pub fn cached_versions(&self, name: &PackageName) -> Vec<Version> {
        let store = self.layout.store_root();
        if !self.filesystem.exists(store) {
            return Vec::new();
        }
        let entries = match self.filesystem.read_dir(store) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(store = %store.display(), error = %e, "Could not list cache store");
                return Vec::new();
            }
        };

        let mut versions: Vec<Version> = entries
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .filter_map(|dir| CacheLayout::parse_entry_dir_name(name, dir))
            .collect();
        versions.sort();
        versions
    }

    /// Download `pkg` into the cache. A no-op if it is already there.
    #[instrument(skip_all, fields(package = %pkg))]
    pub async fn install(&self, pkg: &CachedPackage) -> UfoResult<()> {
        if self.exists(pkg) {
            debug!("Already cached");
            return Ok(());
        }
        self.fetch(pkg).await
    }

    /// Move to the newest version within the request's update range.
    ///
    /// Returns the package to use from now on: the newer version when one
    /// was installed, otherwise `pkg` itself. The previous version is never
    /// removed, so a failed update leaves it usable.
    #[instrument(skip_all, fields(package = %pkg))]
    pub async fn update(&self, pkg: &CachedPackage) -> UfoResult<CachedPackage> {
        let range = pkg.requested().update_range();
        let latest = self
            .client
            .latest_version(pkg.package_name(), &range)
            .await
            .map_err(|e| update_failed(pkg, e))?;

        let newer = match latest {
            Some(latest) if latest > *pkg.version() => pkg.at_version(latest),
            _ => {
                debug!("Already at the latest satisfying version");
                return Ok(pkg.clone());
            }
        };

        if !self.exists(&newer) {
            info!(from = %pkg.version(), to = %newer.version(), "Updating template package");
            self.fetch(&newer)
                .await
                .map_err(|e| update_failed(pkg, e))?;
        }
        Ok(newer)
    }

    /// Resolve a descriptor and make sure the result is in the cache:
    /// install on a miss, update on a hit.
    pub async fn prepare(&self, descriptor: &TemplateDescriptor) -> UfoResult<CachedPackage> {
        let pkg = self.resolve(descriptor).await?;
        if self.exists(&pkg) {
            self.update(&pkg).await
        } else {
            self.install(&pkg).await?;
            Ok(pkg)
        }
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Stage, promote, verify.
    async fn fetch(&self, pkg: &CachedPackage) -> UfoResult<()> {
        for dir in [
            self.layout.target_root().to_path_buf(),
            self.layout.store_root().to_path_buf(),
            self.layout.staging_root(),
        ] {
            self.filesystem.create_dir_all(&dir)?;
        }

        let staging = self.layout.staging_root().join(format!(
            "{}@{}-{}",
            pkg.package_name().flattened(),
            pkg.version(),
            Uuid::new_v4()
        ));
        self.filesystem.create_dir_all(&staging)?;

        let request = FetchRequest {
            package_name: pkg.package_name().clone(),
            version: pkg.version().clone(),
            prefix: staging.clone(),
        };
        info!(client = self.client.name(), spec = %request.spec(), "Fetching template package");

        let outcome = match self.client.install(&request).await {
            Ok(status) if status.success() => self.promote(pkg, &request),
            Ok(status) => Err(ApplicationError::FetchFailed {
                package: pkg.spec(),
                reason: format!("{} exited with {status}", self.client.name()),
            }
            .into()),
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            self.discard(&staging, "staging directory");
            return Err(e);
        }

        // The exit code is not trusted on its own.
        if let Err(e) = self.manifest(pkg) {
            self.discard(&pkg.entry_dir(), "unusable cache entry");
            return Err(ApplicationError::FetchFailed {
                package: pkg.spec(),
                reason: format!("installed package is not usable: {e}"),
            }
            .into());
        }

        info!(path = %pkg.cache_file_path().display(), "Template package cached");
        Ok(())
    }

    /// Move the whole staged prefix to the version's cache directory.
    ///
    /// The package's dependencies sit beside it under the prefix, so they
    /// travel with it in the same rename.
    fn promote(&self, pkg: &CachedPackage, request: &FetchRequest) -> UfoResult<()> {
        let installed = request.installed_path();
        if !self.filesystem.exists(&installed) {
            return Err(ApplicationError::FetchFailed {
                package: pkg.spec(),
                reason: format!(
                    "{} reported success but left nothing at {}",
                    self.client.name(),
                    installed.display()
                ),
            }
            .into());
        }

        let entry = pkg.entry_dir();
        // Only an unusable leftover can be here; `install` returned early otherwise.
        if self.filesystem.exists(&entry) {
            self.filesystem.remove_dir_all(&entry)?;
        }
        self.filesystem.rename(&request.prefix, &entry)
    }

    fn discard(&self, path: &Path, what: &str) {
        if let Err(e) = self.filesystem.remove_dir_all(path) {
            warn!(path = %path.display(), error = %e, "Could not remove {}", what);
        }
    }
}

fn update_failed(pkg: &CachedPackage, error: UfoError) -> UfoError {
    ApplicationError::UpdateFailed {
        package: pkg.spec(),
        reason: error.to_string(),
    }
    .into()
}
