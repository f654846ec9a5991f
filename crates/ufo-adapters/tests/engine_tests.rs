//! End-to-end tests of the acquisition and installation engine against the
//! real filesystem adapters, with the registry client and the custom
//! installer replaced by in-process fakes.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use semver::{Version, VersionReq};
use tempfile::TempDir;
use walkdir::WalkDir;

use ufo_adapters::{BuiltinCatalog, LocalFilesystem, MemoryFilesystem, NodeScriptRunner};
use ufo_core::prelude::*;

// ============================================================================
// Fakes
// ============================================================================

/// Publishes packages by writing them straight into the staging prefix.
struct FakeRegistry {
    filesystem: Arc<dyn Filesystem>,
    published: Mutex<Vec<Version>>,
    main: Option<&'static str>,
    exit_code: i32,
    manifest_version_override: Option<&'static str>,
    installs: AtomicUsize,
}

impl FakeRegistry {
    fn new(filesystem: Arc<dyn Filesystem>, published: &[&str]) -> Self {
        Self {
            filesystem,
            published: Mutex::new(published.iter().map(|v| Version::parse(v).unwrap()).collect()),
            main: None,
            exit_code: 0,
            manifest_version_override: None,
            installs: AtomicUsize::new(0),
        }
    }

    fn publish(&self, version: &str) {
        self.published
            .lock()
            .unwrap()
            .push(Version::parse(version).unwrap());
    }

    fn installs(&self) -> usize {
        self.installs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PackageClient for FakeRegistry {
    fn name(&self) -> &'static str {
        "fake-npm"
    }

    async fn install(&self, request: &FetchRequest) -> UfoResult<ProcessStatus> {
        self.installs.fetch_add(1, Ordering::SeqCst);
        if self.exit_code != 0 {
            return Ok(ProcessStatus::exited(self.exit_code));
        }

        let root = request.installed_path();
        let version = self
            .manifest_version_override
            .map(str::to_string)
            .unwrap_or_else(|| request.version.to_string());
        let main = self
            .main
            .map(|m| format!(r#","main":"{m}""#))
            .unwrap_or_default();
        self.filesystem.write_file(
            &root.join("package.json"),
            &format!(
                r#"{{"name":"{}","version":"{version}"{main}}}"#,
                request.package_name
            ),
        )?;
        self.filesystem
            .write_file(&root.join("src/index.js"), &format!("// {}", request.version))?;
        self.filesystem
            .write_file(&root.join("template/README.md"), "payload")?;
        if let Some(main) = self.main {
            self.filesystem
                .write_file(&root.join(main), "module.exports = () => {}")?;
        }
        Ok(ProcessStatus::SUCCESS)
    }

    async fn latest_version(
        &self,
        _name: &PackageName,
        range: &VersionReq,
    ) -> UfoResult<Option<Version>> {
        Ok(self
            .published
            .lock()
            .unwrap()
            .iter()
            .filter(|v| range.matches(v))
            .max()
            .cloned())
    }
}

#[derive(Default)]
struct RecordingRunner {
    invocations: Mutex<Vec<ScriptInvocation>>,
}

#[async_trait]
impl ScriptRunner for RecordingRunner {
    async fn run(&self, invocation: &ScriptInvocation) -> UfoResult<ProcessStatus> {
        self.invocations.lock().unwrap().push(invocation.clone());
        Ok(ProcessStatus::SUCCESS)
    }
}

// ============================================================================
// Helpers
// ============================================================================

const CACHE: &str = "/home/u/.ufo-cli/template";
const TARGET: &str = "/work/my-app";

fn descriptor(version: &str) -> TemplateDescriptor {
    TemplateDescriptor::new("Demo", "demo-template", version).unwrap()
}

fn project() -> ProjectInfo {
    ProjectInfo::builder("myApp").build().unwrap()
}

fn packages(
    layout: CacheLayout,
    registry: &Arc<FakeRegistry>,
    fs: Arc<dyn Filesystem>,
) -> PackageService {
    PackageService::new(layout, Arc::clone(registry) as Arc<dyn PackageClient>, fs)
}

fn relative_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();
    files.sort();
    files
}

// ============================================================================
// Fetcher / Updater
// ============================================================================

#[tokio::test]
async fn install_then_exists_and_staging_is_cleaned() {
    let fs = MemoryFilesystem::new();
    let registry = Arc::new(FakeRegistry::new(Arc::new(fs.clone()), &["1.0.0"]));
    let svc = packages(CacheLayout::new(CACHE), &registry, Arc::new(fs.clone()));

    let pkg = svc.prepare(&descriptor("1.0.0")).await.unwrap();

    assert!(svc.exists(&pkg));
    assert_eq!(registry.installs(), 1);
    assert!(
        fs.read_dir(&svc.layout().staging_root())
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn failed_fetch_leaves_no_cache_entry() {
    let fs = MemoryFilesystem::new();
    let mut fake = FakeRegistry::new(Arc::new(fs.clone()), &["1.0.0"]);
    fake.exit_code = 1;
    let registry = Arc::new(fake);
    let svc = packages(CacheLayout::new(CACHE), &registry, Arc::new(fs.clone()));

    let pkg = svc.resolve(&descriptor("1.0.0")).await.unwrap();
    let err = svc.install(&pkg).await.unwrap_err();

    assert!(matches!(
        err,
        UfoError::Application(ApplicationError::FetchFailed { .. })
    ));
    assert!(!svc.exists(&pkg));
    assert!(!fs.exists(&pkg.cache_file_path()));
    assert!(fs.read_file(pkg.manifest_path()).is_none());
}

#[tokio::test]
async fn exit_zero_with_wrong_manifest_is_still_a_failure() {
    let fs = MemoryFilesystem::new();
    let mut fake = FakeRegistry::new(Arc::new(fs.clone()), &["1.0.0"]);
    fake.manifest_version_override = Some("0.9.0");
    let registry = Arc::new(fake);
    let svc = packages(CacheLayout::new(CACHE), &registry, Arc::new(fs.clone()));

    let pkg = svc.resolve(&descriptor("1.0.0")).await.unwrap();
    assert!(svc.install(&pkg).await.is_err());
    assert!(!fs.exists(&pkg.cache_file_path()));
}

#[tokio::test]
async fn update_on_latest_keeps_prior_version() {
    let fs = MemoryFilesystem::new();
    let registry = Arc::new(FakeRegistry::new(Arc::new(fs.clone()), &["1.0.0"]));
    let svc = packages(CacheLayout::new(CACHE), &registry, Arc::new(fs.clone()));

    let first = svc.prepare(&descriptor("1.0.0")).await.unwrap();
    let second = svc.prepare(&descriptor("1.0.0")).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(registry.installs(), 1);
    assert_eq!(svc.manifest(&second).unwrap().version, "1.0.0");
}

#[tokio::test]
async fn update_installs_newer_beside_old() {
    let fs = MemoryFilesystem::new();
    let registry = Arc::new(FakeRegistry::new(Arc::new(fs.clone()), &["1.0.0"]));
    let svc = packages(CacheLayout::new(CACHE), &registry, Arc::new(fs.clone()));

    let old = svc.prepare(&descriptor("1.0.0")).await.unwrap();
    registry.publish("1.1.0");
    registry.publish("2.0.0");
    let new = svc.prepare(&descriptor("1.0.0")).await.unwrap();

    assert_eq!(new.version(), &Version::new(1, 1, 0));
    assert!(svc.exists(&old));
    assert!(svc.exists(&new));
    assert_ne!(old.cache_file_path(), new.cache_file_path());
    assert_eq!(
        svc.cached_versions(old.package_name()),
        vec![Version::new(1, 0, 0), Version::new(1, 1, 0)]
    );
}

#[tokio::test]
async fn latest_resolves_through_the_registry_once_then_from_cache() {
    let fs = MemoryFilesystem::new();
    let registry = Arc::new(FakeRegistry::new(Arc::new(fs.clone()), &["1.0.0", "1.2.0"]));
    let svc = packages(CacheLayout::new(CACHE), &registry, Arc::new(fs.clone()));

    let pkg = svc.prepare(&descriptor("latest")).await.unwrap();
    assert_eq!(pkg.version(), &Version::new(1, 2, 0));

    let again = svc.resolve(&descriptor("latest")).await.unwrap();
    assert_eq!(again.version(), &Version::new(1, 2, 0));
    assert_eq!(registry.installs(), 1);
}

// ============================================================================
// Installers (real disk)
// ============================================================================

#[tokio::test]
async fn normal_install_copies_exactly_the_cached_package_and_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let cache = tmp.path().join("cache");
    let target = tmp.path().join("target");
    let fs: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());

    let registry = Arc::new(FakeRegistry::new(Arc::clone(&fs), &["1.0.0", "1.0.1"]));
    let svc = packages(CacheLayout::new(&cache), &registry, Arc::clone(&fs));
    let installer = InstallService::new(Arc::clone(&fs), Arc::new(RecordingRunner::default()));

    // A sibling version in the cache must not leak into the target.
    let sibling = svc.resolve(&descriptor("1.0.1")).await.unwrap();
    svc.install(&sibling).await.unwrap();

    let d = descriptor("1.0.0");
    let pkg = svc.resolve(&d).await.unwrap();
    svc.install(&pkg).await.unwrap();

    let report = installer
        .install(&d, &pkg, &project(), &target)
        .await
        .unwrap();
    assert_eq!(report, InstallReport::Normal { files_copied: 3 });

    let expected = vec![
        PathBuf::from("package.json"),
        PathBuf::from("src/index.js"),
        PathBuf::from("template/README.md"),
    ];
    assert_eq!(relative_files(&target), expected);
    assert_eq!(
        std::fs::read_to_string(target.join("src/index.js")).unwrap(),
        "// 1.0.0"
    );

    installer
        .install(&d, &pkg, &project(), &target)
        .await
        .unwrap();
    assert_eq!(relative_files(&target), expected);
}

#[tokio::test]
async fn custom_install_invokes_entry_point_once() {
    let fs = MemoryFilesystem::new();
    let mut fake = FakeRegistry::new(Arc::new(fs.clone()), &["1.0.0"]);
    fake.main = Some("index.js");
    let registry = Arc::new(fake);
    let svc = packages(CacheLayout::new(CACHE), &registry, Arc::new(fs.clone()));
    let runner = Arc::new(RecordingRunner::default());
    let installer = InstallService::new(
        Arc::new(fs.clone()),
        Arc::clone(&runner) as Arc<dyn ScriptRunner>,
    );

    let d = descriptor("1.0.0").with_strategy(InstallStrategy::Custom);
    let pkg = svc.prepare(&d).await.unwrap();
    let report = installer
        .install(&d, &pkg, &project(), Path::new(TARGET))
        .await
        .unwrap();
    assert_eq!(report, InstallReport::Custom);

    let invocations = runner.invocations.lock().unwrap();
    assert_eq!(invocations.len(), 1);
    let options: serde_json::Value =
        serde_json::from_str(&invocations[0].options_json).unwrap();
    assert_eq!(options["targetPath"], TARGET);
    assert_eq!(
        options["sourcePath"],
        pkg.cache_file_path().join("template").display().to_string()
    );
    assert_eq!(invocations[0].entry_point, pkg.cache_file_path().join("index.js"));
    assert!(fs.files_under(TARGET).is_empty());
}

#[tokio::test]
async fn custom_install_without_entry_point_changes_nothing() {
    let fs = MemoryFilesystem::new();
    let mut fake = FakeRegistry::new(Arc::new(fs.clone()), &["1.0.0"]);
    fake.main = None;
    let registry = Arc::new(fake);
    let svc = packages(CacheLayout::new(CACHE), &registry, Arc::new(fs.clone()));
    let runner = Arc::new(RecordingRunner::default());
    let installer = InstallService::new(
        Arc::new(fs.clone()),
        Arc::clone(&runner) as Arc<dyn ScriptRunner>,
    );

    // No `main` and no index.js in the package.
    let d = descriptor("1.0.0").with_strategy(InstallStrategy::Custom);
    let pkg = svc.prepare(&d).await.unwrap();
    let err = installer
        .install(&d, &pkg, &project(), Path::new(TARGET))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        UfoError::Application(ApplicationError::EntryPointMissing { .. })
    ));
    assert!(runner.invocations.lock().unwrap().is_empty());
    assert!(!fs.exists(Path::new(TARGET)));
}

#[test]
fn unknown_install_type_is_rejected_before_any_io() {
    let fs = MemoryFilesystem::new();
    let catalog = CatalogService::new(Arc::new(BuiltinCatalog::with_records(vec![
        TemplateRecord {
            name: "Zip".into(),
            npm_name: "zip-template".into(),
            version: "1.0.0".into(),
            tag: vec!["project".into()],
            install_type: Some("zip".into()),
            ignore: Vec::new(),
            install_command: None,
            start_command: None,
        },
    ])));

    let err = catalog.templates().unwrap_err();
    assert!(matches!(
        err,
        UfoError::Domain(DomainError::UnknownInstallType(_))
    ));
    assert!(fs.files_under("/").is_empty());
}

// ============================================================================
// Packages with dependencies (real disk)
// ============================================================================

const DEP: &str = "greeting-dep";

const INSTALLER_JS: &str = r#"const greeting = require('greeting-dep');
const fs = require('fs');
const path = require('path');
module.exports = (options) => {
  fs.writeFileSync(path.join(options.targetPath, 'greeting.txt'), greeting);
};
"#;

/// How the fake client arranges the prefix.
#[derive(Clone, Copy)]
enum Layout {
    /// npm: every package is a real directory directly under `node_modules`.
    Flat,
    /// cnpm: `node_modules/<name>` are relative links into versioned siblings.
    #[cfg(unix)]
    Linked,
}

/// Installs `demo-template`, whose entry point requires [`DEP`].
struct DependencyRegistry {
    layout: Layout,
}

fn write(path: &Path, content: &str) -> UfoResult<()> {
    LocalFilesystem::new().write_file(path, content)
}

fn write_package(
    dir: &Path,
    name: &str,
    version: &Version,
    main: &str,
    source: &str,
) -> UfoResult<()> {
    write(
        &dir.join("package.json"),
        &format!(r#"{{"name":"{name}","version":"{version}","main":"{main}"}}"#),
    )?;
    write(&dir.join(main), source)
}

#[async_trait]
impl PackageClient for DependencyRegistry {
    fn name(&self) -> &'static str {
        "fake-npm"
    }

    async fn install(&self, request: &FetchRequest) -> UfoResult<ProcessStatus> {
        let modules = request.prefix.join("node_modules");
        let name = request.package_name.as_str();
        let dep_version = Version::new(1, 0, 0);

        match self.layout {
            Layout::Flat => {
                let root = request.installed_path();
                write_package(&root, name, &request.version, "index.js", INSTALLER_JS)?;
                write(&root.join("template/README.md"), "payload")?;
                write_package(
                    &modules.join(DEP),
                    DEP,
                    &dep_version,
                    "index.js",
                    "module.exports = 'hello';",
                )?;
            }
            #[cfg(unix)]
            Layout::Linked => {
                use std::os::unix::fs::symlink;

                let real = format!("_{name}@{}@{name}", request.version);
                let dep_real = format!("_{DEP}@{dep_version}@{DEP}");
                write_package(
                    &modules.join(&real),
                    name,
                    &request.version,
                    "index.js",
                    INSTALLER_JS,
                )?;
                write(&modules.join(&real).join("template/README.md"), "payload")?;
                write_package(
                    &modules.join(&dep_real),
                    DEP,
                    &dep_version,
                    "index.js",
                    "module.exports = 'hello';",
                )?;

                let nested = modules.join(&real).join("node_modules");
                LocalFilesystem::new().create_dir_all(&nested)?;
                symlink(&real, modules.join(name)).unwrap();
                symlink(&dep_real, modules.join(DEP)).unwrap();
                symlink(format!("../../{dep_real}"), nested.join(DEP)).unwrap();
            }
        }
        Ok(ProcessStatus::SUCCESS)
    }

    async fn latest_version(
        &self,
        _name: &PackageName,
        _range: &VersionReq,
    ) -> UfoResult<Option<Version>> {
        Ok(Some(Version::new(1, 0, 0)))
    }
}

/// Whether Node's lookup from `module` (after resolving links) finds `dep`.
fn resolvable_from(module: &Path, dep: &str) -> bool {
    let Ok(real) = std::fs::canonicalize(module) else {
        return false;
    };
    real.ancestors()
        .skip(1)
        .any(|dir| dir.join("node_modules").join(dep).join("package.json").is_file())
}

fn node_available() -> bool {
    std::process::Command::new("node")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

async fn cache_with_dependency(layout: Layout, cache: &Path) -> (PackageService, CachedPackage) {
    let fs: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
    let svc = PackageService::new(
        CacheLayout::new(cache),
        Arc::new(DependencyRegistry { layout }),
        fs,
    );
    let pkg = svc
        .prepare(&descriptor("1.0.0").with_strategy(InstallStrategy::Custom))
        .await
        .unwrap();
    (svc, pkg)
}

#[tokio::test]
async fn dependencies_installed_beside_the_package_stay_resolvable() {
    let tmp = TempDir::new().unwrap();
    let (svc, pkg) = cache_with_dependency(Layout::Flat, &tmp.path().join("cache")).await;

    assert!(svc.exists(&pkg));
    let manifest = svc.manifest(&pkg).unwrap();
    assert!(resolvable_from(&pkg.entry_point(&manifest).unwrap(), DEP));
    assert!(
        std::fs::read_dir(svc.layout().staging_root())
            .unwrap()
            .next()
            .is_none()
    );
}

#[cfg(unix)]
#[tokio::test]
async fn linked_package_layout_survives_promotion() {
    let tmp = TempDir::new().unwrap();
    let (svc, pkg) = cache_with_dependency(Layout::Linked, &tmp.path().join("cache")).await;

    assert!(svc.exists(&pkg));
    assert!(
        std::fs::symlink_metadata(pkg.cache_file_path())
            .unwrap()
            .file_type()
            .is_symlink()
    );
    let manifest = svc.manifest(&pkg).unwrap();
    let entry_point = pkg.entry_point(&manifest).unwrap();
    assert!(entry_point.is_file());
    assert!(resolvable_from(&entry_point, DEP));
    assert!(pkg.payload_path().join("README.md").is_file());
}

#[tokio::test]
async fn custom_installer_can_require_its_dependencies() {
    if !node_available() {
        eprintln!("node is not installed; skipping");
        return;
    }
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("target");
    std::fs::create_dir_all(&target).unwrap();
    let (_svc, pkg) = cache_with_dependency(Layout::Flat, &tmp.path().join("cache")).await;

    let installer = InstallService::new(
        Arc::new(LocalFilesystem::new()),
        Arc::new(NodeScriptRunner::default()),
    );
    let d = descriptor("1.0.0").with_strategy(InstallStrategy::Custom);
    let report = installer.install(&d, &pkg, &project(), &target).await.unwrap();

    assert_eq!(report, InstallReport::Custom);
    assert_eq!(
        std::fs::read_to_string(target.join("greeting.txt")).unwrap(),
        "hello"
    );
}
