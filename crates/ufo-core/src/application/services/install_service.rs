//! Install Service - the installer dispatcher and both installers.
//!
//! Routing is an exhaustive match on [`InstallStrategy`]; an install type the
//! engine does not know never gets this far because descriptors reject it on
//! construction.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, ScriptInvocation, ScriptRunner},
        services::package_service::load_manifest,
    },
    domain::{
        CachedPackage, InstallOptions, InstallStrategy, PackageManifest, ProjectInfo,
        TemplateDescriptor,
    },
    error::{Context, UfoError, UfoResult},
};

/// What an install did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallReport {
    /// Files were copied from the cache.
    Normal { files_copied: usize },
    /// The template's own installer ran and exited successfully.
    Custom,
}

/// Materialises a cached template into a target directory.
pub struct InstallService {
    filesystem: Arc<dyn Filesystem>,
    runner: Arc<dyn ScriptRunner>,
}

impl InstallService {
    pub fn new(filesystem: Arc<dyn Filesystem>, runner: Arc<dyn ScriptRunner>) -> Self {
        Self { filesystem, runner }
    }

    /// Install `pkg` into `target_dir` the way `descriptor` asks for.
    ///
    /// Fails before touching `target_dir` when `pkg` has no valid manifest.
    #[instrument(
        skip_all,
        fields(
            package = %pkg,
            install_type = %descriptor.install_type(),
            target = %target_dir.display()
        )
    )]
    pub async fn install(
        &self,
        descriptor: &TemplateDescriptor,
        pkg: &CachedPackage,
        project: &ProjectInfo,
        target_dir: &Path,
    ) -> UfoResult<InstallReport> {
        let manifest = load_manifest(self.filesystem.as_ref(), pkg)?;

        match descriptor.strategy() {
            InstallStrategy::Normal(_) => {
                let files_copied = self.install_normal(pkg, target_dir)?;
                info!(files_copied, "Template copied");
                Ok(InstallReport::Normal { files_copied })
            }
            InstallStrategy::Custom => {
                self.install_custom(descriptor, pkg, &manifest, project, target_dir)
                    .await?;
                info!("Custom installer finished");
                Ok(InstallReport::Custom)
            }
        }
    }

    /// Recursive copy of the whole cached package, overwriting on conflict.
    fn install_normal(&self, pkg: &CachedPackage, target_dir: &Path) -> UfoResult<usize> {
        let source = pkg.cache_file_path();
        let copy_failed = |e: UfoError| -> UfoError {
            ApplicationError::CopyFailed {
                from: source.clone(),
                to: target_dir.to_path_buf(),
                reason: e.to_string(),
            }
            .into()
        };

        self.filesystem
            .create_dir_all(&source)
            .map_err(copy_failed)?;
        self.filesystem
            .create_dir_all(target_dir)
            .map_err(copy_failed)?;
        self.filesystem
            .copy_tree(&source, target_dir)
            .map_err(copy_failed)
    }

    /// Run the package's entry point out of process with the options document.
    async fn install_custom(
        &self,
        descriptor: &TemplateDescriptor,
        pkg: &CachedPackage,
        manifest: &PackageManifest,
        project: &ProjectInfo,
        target_dir: &Path,
    ) -> UfoResult<()> {
        let entry_point = pkg.entry_point(manifest)?;
        if !self.filesystem.is_file(&entry_point) {
            return Err(ApplicationError::EntryPointMissing { path: entry_point }.into());
        }

        let options = InstallOptions {
            template_info: descriptor.clone(),
            project_info: project.clone(),
            source_path: pkg.payload_path(),
            target_path: target_dir.to_path_buf(),
        };
        let options_json = options
            .to_json()
            .context("could not serialise install options")?;
        // The installer runs inside the target, so it has to exist.
        self.filesystem.create_dir_all(target_dir)?;

        let status = self
            .runner
            .run(&ScriptInvocation {
                entry_point,
                options_json,
                working_dir: target_dir.to_path_buf(),
            })
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(ApplicationError::CustomInstallFailed { code: status.code }.into())
        }
    }
}
