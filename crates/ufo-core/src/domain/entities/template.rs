//! Template catalog records and validated template descriptors.
//!
//! A [`TemplateRecord`] is the loosely-typed shape a catalog hands us
//! (`{name, npmName, version, tag, type?, ...}`). Converting it into a
//! [`TemplateDescriptor`] validates every field once; after that the
//! descriptor is immutable for the rest of the invocation.
//!
//! The install type becomes the closed [`InstallStrategy`] enum, so routing on
//! it is an exhaustive `match` instead of a string comparison.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{InstallType, PackageName, PackageVersion, ProjectType},
};

// ── Catalog record ────────────────────────────────────────────────────────────

/// One entry of a template catalog, exactly as it is serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    /// Display name.
    pub name: String,
    /// Registry identifier.
    #[serde(alias = "packageName", alias = "npm_name")]
    pub npm_name: String,
    /// Exact semver, range, or `latest`.
    pub version: String,
    /// Which project types this template serves.
    #[serde(default, alias = "tags", deserialize_with = "one_or_many")]
    pub tag: Vec<String>,
    /// `normal` (default) or `custom`.
    #[serde(
        default,
        rename = "type",
        alias = "installType",
        alias = "install_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub install_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
    #[serde(default, alias = "install_command", skip_serializing_if = "Option::is_none")]
    pub install_command: Option<String>,
    #[serde(default, alias = "start_command", skip_serializing_if = "Option::is_none")]
    pub start_command: Option<String>,
}

/// Accept `tag = "project"` as well as `tag = ["project", "component"]`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(tag) => vec![tag],
        OneOrMany::Many(tags) => tags,
    })
}

// ── Install strategy ──────────────────────────────────────────────────────────

/// Fields only a normal (copying) install carries.
///
/// Ignore patterns and the follow-up commands are recorded but not acted on:
/// selective copy and post-install commands are not part of normal install.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalInstall {
    pub ignore_patterns: Vec<String>,
    pub install_command: Option<String>,
    pub start_command: Option<String>,
}

/// How a template reaches the target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStrategy {
    /// Recursive copy of the cached package.
    Normal(NormalInstall),
    /// Delegation to the package's own entry point, out of process.
    Custom,
}

impl InstallStrategy {
    pub const fn install_type(&self) -> InstallType {
        match self {
            Self::Normal(_) => InstallType::Normal,
            Self::Custom => InstallType::Custom,
        }
    }
}

// ── Descriptor ────────────────────────────────────────────────────────────────

/// A validated, immutable reference to one versioned template package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "TemplateRecord")]
pub struct TemplateDescriptor {
    name: String,
    package_name: PackageName,
    version: PackageVersion,
    /// The version string as the catalog spelled it, kept for serialisation.
    requested_version: String,
    tags: Vec<String>,
    strategy: InstallStrategy,
}

impl TemplateDescriptor {
    /// Build a normal-install descriptor from its essential parts.
    pub fn new(
        name: impl Into<String>,
        package_name: &str,
        version: &str,
    ) -> Result<Self, DomainError> {
        Self::try_from(TemplateRecord {
            name: name.into(),
            npm_name: package_name.to_string(),
            version: version.to_string(),
            tag: Vec::new(),
            install_type: None,
            ignore: Vec::new(),
            install_command: None,
            start_command: None,
        })
    }

    /// Replace the install strategy.
    pub fn with_strategy(mut self, strategy: InstallStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Replace the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package_name(&self) -> &PackageName {
        &self.package_name
    }

    pub fn version(&self) -> &PackageVersion {
        &self.version
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn strategy(&self) -> &InstallStrategy {
        &self.strategy
    }

    pub const fn install_type(&self) -> InstallType {
        self.strategy.install_type()
    }

    /// Whether this template is offered for the given project type.
    pub fn serves(&self, project_type: ProjectType) -> bool {
        self.tags.iter().any(|t| t.contains(project_type.as_str()))
    }
}

impl TryFrom<TemplateRecord> for TemplateDescriptor {
    type Error = DomainError;

    fn try_from(record: TemplateRecord) -> Result<Self, Self::Error> {
        let name = record.name.trim();
        if name.is_empty() {
            return Err(DomainError::invalid_descriptor("name", "cannot be empty"));
        }
        let package_name = PackageName::parse(&record.npm_name)?;
        let version = PackageVersion::parse(&record.version)?;

        // An absent type means a normal install.
        let install_type = match record.install_type.as_deref() {
            None => InstallType::Normal,
            Some(raw) if raw.trim().is_empty() => InstallType::Normal,
            Some(raw) => raw.parse()?,
        };

        let strategy = match install_type {
            InstallType::Normal => InstallStrategy::Normal(NormalInstall {
                ignore_patterns: record.ignore,
                install_command: record.install_command,
                start_command: record.start_command,
            }),
            InstallType::Custom => InstallStrategy::Custom,
        };

        Ok(Self {
            name: name.to_string(),
            package_name,
            version,
            requested_version: record.version.trim().to_string(),
            tags: record.tag,
            strategy,
        })
    }
}

impl From<TemplateDescriptor> for TemplateRecord {
    fn from(descriptor: TemplateDescriptor) -> Self {
        let install_type = Some(descriptor.install_type().to_string());
        let (ignore, install_command, start_command) = match descriptor.strategy {
            InstallStrategy::Normal(normal) => (
                normal.ignore_patterns,
                normal.install_command,
                normal.start_command,
            ),
            InstallStrategy::Custom => (Vec::new(), None, None),
        };

        Self {
            name: descriptor.name,
            npm_name: descriptor.package_name.to_string(),
            version: descriptor.requested_version,
            tag: descriptor.tags,
            install_type,
            ignore,
            install_command,
            start_command,
        }
    }
}
