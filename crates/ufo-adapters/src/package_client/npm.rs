//! npm-compatible registry client, spawned as a subprocess.
//!
//! Only the binaries named by [`PackageManager`] can ever be run. Exit codes
//! are the only success signal for installs; `npm view` output is parsed
//! for version queries and nothing else.

use std::ffi::OsString;
use std::fmt;
use std::process::Stdio;
use std::str::FromStr;

use async_trait::async_trait;
use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use ufo_core::{
    application::{
        ApplicationError,
        ports::{FetchRequest, PackageClient, ProcessStatus},
    },
    domain::PackageName,
    error::{UfoError, UfoResult},
};

/// Flags that keep an install confined to its prefix and free of side effects.
const INSTALL_FLAGS: &[&str] = &[
    "--no-save",
    "--no-package-lock",
    "--ignore-scripts",
    "--no-audit",
    "--no-fund",
];

/// The allow-list of registry clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Cnpm,
}

impl PackageManager {
    pub const fn binary(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Cnpm => "cnpm",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "npm" => Ok(Self::Npm),
            "cnpm" => Ok(Self::Cnpm),
            other => Err(format!(
                "unsupported package manager '{other}' (expected npm or cnpm)"
            )),
        }
    }
}

/// [`PackageClient`] backed by `npm` or `cnpm`.
#[derive(Debug, Clone, Default)]
pub struct NpmClient {
    manager: PackageManager,
    registry: Option<String>,
}

impl NpmClient {
    pub fn new(manager: PackageManager) -> Self {
        Self {
            manager,
            registry: None,
        }
    }

    /// Use a registry other than the client's default.
    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        let registry = registry.into();
        self.registry = (!registry.trim().is_empty()).then_some(registry);
        self
    }

    pub fn manager(&self) -> PackageManager {
        self.manager
    }

    /// Arguments for installing exactly one version under a prefix.
    pub fn install_args(&self, request: &FetchRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "install".into(),
            request.spec().into(),
            "--prefix".into(),
            request.prefix.clone().into_os_string(),
        ];
        args.extend(INSTALL_FLAGS.iter().map(OsString::from));
        self.push_registry(&mut args);
        args
    }

    /// Arguments for listing the published versions matching `range`.
    pub fn view_args(&self, name: &PackageName, range: &VersionReq) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "view".into(),
            format!("{name}@{}", npm_range(range)).into(),
            "version".into(),
            "--json".into(),
        ];
        self.push_registry(&mut args);
        args
    }

    fn push_registry(&self, args: &mut Vec<OsString>) {
        if let Some(registry) = &self.registry {
            args.push("--registry".into());
            args.push(registry.into());
        }
    }

    /// npm ships as a `.cmd` shim on Windows; std escapes batch arguments.
    fn command(&self, args: &[OsString]) -> Command {
        let binary = self.manager.binary();
        let mut command = if cfg!(windows) {
            Command::new(format!("{binary}.cmd"))
        } else {
            Command::new(binary)
        };
        command.args(args).stdin(Stdio::null());
        command
    }

    fn spawn_error(&self, e: std::io::Error) -> UfoError {
        ApplicationError::ClientUnavailable {
            client: self.manager.binary().to_string(),
            reason: e.to_string(),
        }
        .into()
    }
}

#[async_trait]
impl PackageClient for NpmClient {
    fn name(&self) -> &'static str {
        self.manager.binary()
    }

    #[instrument(skip_all, fields(client = %self.manager, spec = %request.spec()))]
    async fn install(&self, request: &FetchRequest) -> UfoResult<ProcessStatus> {
        let args = self.install_args(request);
        debug!(?args, "Spawning package client");

        let output = self
            .command(&args)
            .current_dir(&request.prefix)
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        let status = ProcessStatus {
            code: output.status.code(),
        };
        if !status.success() {
            warn!(
                %status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "Package client failed"
            );
        }
        Ok(status)
    }

    #[instrument(skip(self), fields(client = %self.manager))]
    async fn latest_version(
        &self,
        name: &PackageName,
        range: &VersionReq,
    ) -> UfoResult<Option<Version>> {
        let args = self.view_args(name, range);
        let output = self
            .command(&args)
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ApplicationError::FetchFailed {
                package: format!("{name}@{}", npm_range(range)),
                reason: format!(
                    "{} view exited with {}: {}",
                    self.manager,
                    ProcessStatus {
                        code: output.status.code()
                    },
                    stderr.lines().last().unwrap_or_default().trim()
                ),
            }
            .into());
        }

        let latest = parse_view_output(&String::from_utf8_lossy(&output.stdout), range);
        debug!(latest = ?latest, "Registry answered");
        Ok(latest)
    }
}

/// npm writes ranges with spaces where semver's display uses commas.
fn npm_range(range: &VersionReq) -> String {
    range.to_string().replace(", ", " ")
}

/// Highest version in `npm view ... version --json` output matching `range`.
///
/// npm prints a bare JSON string for a single match, an array for several,
/// and nothing at all for none.
pub fn parse_view_output(stdout: &str, range: &VersionReq) -> Option<Version> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ViewOutput {
        One(String),
        Many(Vec<String>),
    }

    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return None;
    }
    let versions = match serde_json::from_str::<ViewOutput>(trimmed).ok()? {
        ViewOutput::One(v) => vec![v],
        ViewOutput::Many(vs) => vs,
    };
    versions
        .iter()
        .filter_map(|v| Version::parse(v.trim()).ok())
        .filter(|v| range.matches(v))
        .max()
}
