use std::path::PathBuf;

use serde::Serialize;

use super::{project::ProjectInfo, template::TemplateDescriptor};

/// Everything a custom installer receives, as one JSON document.
///
/// This is the entire surface crossing the process boundary:
///
/// ```json
/// {
///   "templateInfo": { "name": "...", "npmName": "...", "version": "...", "type": "custom" },
///   "projectInfo":  { "type": "project", "name": "...", "version": "...", "className": "..." },
///   "sourcePath":   "<cache>/template",
///   "targetPath":   "<working directory>"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallOptions {
    pub template_info: TemplateDescriptor,
    pub project_info: ProjectInfo,
    pub source_path: PathBuf,
    pub target_path: PathBuf,
}

impl InstallOptions {
    /// Serialise to the self-contained document passed to the child process.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
