//! Domain value objects: PackageName, PackageVersion, InstallType, ProjectType.
//!
//! These are pure value types with equality-by-value and no identity. Each
//! one validates on construction, so holding a value means it is well formed.

use crate::domain::error::DomainError;
use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── PackageName ──────────────────────────────────────────────────────────────

/// Upper bound npm places on package names.
const MAX_PACKAGE_NAME_LEN: usize = 214;

/// A registry package identifier, validated against npm naming rules.
///
/// Accepts `name` and `@scope/name`. Names are lowercase, URL-safe, and may
/// not begin with `.` or `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageName(String);

impl PackageName {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(DomainError::invalid_descriptor("packageName", "cannot be empty"));
        }
        if name.len() > MAX_PACKAGE_NAME_LEN {
            return Err(DomainError::invalid_descriptor(
                "packageName",
                format!("is longer than {MAX_PACKAGE_NAME_LEN} characters"),
            ));
        }

        let bare = match name.strip_prefix('@') {
            Some(scoped) => {
                let (scope, bare) = scoped.split_once('/').ok_or_else(|| {
                    DomainError::invalid_descriptor(
                        "packageName",
                        format!("'{name}' is scoped but has no '/<name>' part"),
                    )
                })?;
                validate_segment(name, scope)?;
                bare
            }
            None => name,
        };
        validate_segment(name, bare)?;

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A filesystem-safe single segment for this name.
    ///
    /// `/` is the only character npm allows that cannot appear in a path
    /// segment; it becomes `+`, which npm forbids, so no two names collide.
    pub fn flattened(&self) -> String {
        self.0.replace('/', "+")
    }
}

fn validate_segment(full: &str, segment: &str) -> Result<(), DomainError> {
    if segment.is_empty() {
        return Err(DomainError::invalid_descriptor(
            "packageName",
            format!("'{full}' has an empty segment"),
        ));
    }
    if segment.starts_with('.') || segment.starts_with('_') {
        return Err(DomainError::invalid_descriptor(
            "packageName",
            format!("'{full}' cannot start with '.' or '_'"),
        ));
    }
    let allowed = |c: char| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_' | '~')
    };
    if let Some(bad) = segment.chars().find(|c| !allowed(*c)) {
        return Err(DomainError::invalid_descriptor(
            "packageName",
            format!("'{full}' contains illegal character '{bad}'"),
        ));
    }
    Ok(())
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PackageName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── PackageVersion ───────────────────────────────────────────────────────────

/// The version a descriptor asks for: one exact release or a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageVersion {
    Exact(Version),
    Range(VersionReq),
}

impl PackageVersion {
    /// Parse `1.0.0`, `v1.0.0`, a semver range, or the `latest` tag.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_descriptor("version", "cannot be empty"));
        }
        if trimmed.eq_ignore_ascii_case("latest") {
            return Ok(Self::Range(VersionReq::STAR));
        }

        let cleaned = trimmed.strip_prefix('v').unwrap_or(trimmed);
        if let Ok(exact) = Version::parse(cleaned) {
            return Ok(Self::Exact(exact));
        }

        VersionReq::parse(trimmed).map(Self::Range).map_err(|e| {
            DomainError::invalid_descriptor("version", format!("'{trimmed}' is not semver: {e}"))
        })
    }

    /// Whether `version` is acceptable for this request.
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Self::Exact(exact) => exact == version,
            Self::Range(req) => req.matches(version),
        }
    }

    /// The range an update may move within.
    ///
    /// An exact pin upgrades within its caret range (`1.0.0` → `^1.0.0`),
    /// a range upgrades within itself.
    pub fn update_range(&self) -> VersionReq {
        match self {
            Self::Exact(exact) => {
                // Caret requirements always parse for a valid Version.
                VersionReq::parse(&format!("^{exact}")).unwrap_or(VersionReq::STAR)
            }
            Self::Range(req) => req.clone(),
        }
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => write!(f, "{v}"),
            Self::Range(req) => write!(f, "{req}"),
        }
    }
}

impl FromStr for PackageVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── InstallType ──────────────────────────────────────────────────────────────

/// How a template is materialised into the target directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallType {
    #[default]
    Normal,
    Custom,
}

impl InstallType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for InstallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstallType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "custom" => Ok(Self::Custom),
            other => Err(DomainError::UnknownInstallType(other.to_string())),
        }
    }
}

// ── ProjectType ──────────────────────────────────────────────────────────────

/// What the user is creating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    #[default]
    Project,
    Component,
}

impl ProjectType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Component => "component",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "project" => Ok(Self::Project),
            "component" => Ok(Self::Component),
            other => Err(DomainError::InvalidProjectInfo(format!(
                "unknown project type: {other}"
            ))),
        }
    }
}
