//! Metadata about the project or component being created.

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError, validation::DomainValidator, value_objects::ProjectType,
};

/// Version assigned when the user does not give one.
pub const DEFAULT_PROJECT_VERSION: &str = "1.0.0";

/// Separator used by [`class_name_for`].
const CLASS_NAME_SEPARATOR: char = '-';

/// User-supplied and derived project metadata.
///
/// Immutable once built. Serialised in camelCase because it is handed to
/// custom installers as part of their options document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    #[serde(rename = "type")]
    project_type: ProjectType,
    name: String,
    version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    class_name: String,
}

impl ProjectInfo {
    pub fn builder(name: impl Into<String>) -> ProjectInfoBuilder {
        ProjectInfoBuilder {
            name: name.into(),
            project_type: ProjectType::default(),
            version: None,
            description: None,
        }
    }

    pub const fn project_type(&self) -> ProjectType {
        self.project_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }
}

/// Builder for [`ProjectInfo`]; validation happens in [`Self::build`].
#[derive(Debug, Clone)]
pub struct ProjectInfoBuilder {
    name: String,
    project_type: ProjectType,
    version: Option<String>,
    description: Option<String>,
}

impl ProjectInfoBuilder {
    pub fn project_type(mut self, project_type: ProjectType) -> Self {
        self.project_type = project_type;
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate and build.
    ///
    /// Components must carry a non-empty description; versions must be
    /// semver.
    pub fn build(self) -> Result<ProjectInfo, DomainError> {
        let name = self.name.trim().to_string();
        DomainValidator::validate_project_name(&name)?;

        let version = self
            .version
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_PROJECT_VERSION.to_string());
        DomainValidator::validate_project_version(&version)?;

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if self.project_type == ProjectType::Component && description.is_none() {
            return Err(DomainError::InvalidProjectInfo(
                "a component needs a description".into(),
            ));
        }

        let class_name = class_name_for(&name);

        Ok(ProjectInfo {
            project_type: self.project_type,
            name,
            version,
            description,
            class_name,
        })
    }
}

/// Kebab-case a name: every uppercase letter becomes `-` plus its lowercase
/// form. A leading separator is stripped, so `MyApp` becomes `my-app`.
pub fn class_name_for(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push(CLASS_NAME_SEPARATOR);
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out.trim_start_matches(CLASS_NAME_SEPARATOR).to_string()
}
