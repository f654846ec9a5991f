//! The catalog shipped with the binary.

use ufo_core::{
    application::ports::TemplateCatalog, domain::TemplateRecord, error::UfoResult,
};

/// Registry name of the default project template.
pub const DEFAULT_TEMPLATE_PACKAGE: &str = "jian-test";

/// Fixed, in-binary template list.
#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
    records: Vec<TemplateRecord>,
}

impl BuiltinCatalog {
    pub fn new() -> Self {
        Self {
            records: vec![TemplateRecord {
                name: "Standard project template".into(),
                npm_name: DEFAULT_TEMPLATE_PACKAGE.into(),
                version: "1.0.0".into(),
                tag: vec!["project".into()],
                install_type: None,
                ignore: Vec::new(),
                install_command: None,
                start_command: None,
            }],
        }
    }

    /// A catalog with exactly these records (for tests and embedding).
    pub fn with_records(records: Vec<TemplateRecord>) -> Self {
        Self { records }
    }
}

impl Default for BuiltinCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateCatalog for BuiltinCatalog {
    fn list(&self) -> UfoResult<Vec<TemplateRecord>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ufo_core::domain::{InstallType, ProjectType, TemplateDescriptor};

    #[test]
    fn default_entry_is_a_valid_normal_project_template() {
        let records = BuiltinCatalog::new().list().unwrap();
        assert_eq!(records.len(), 1);

        let descriptor = TemplateDescriptor::try_from(records[0].clone()).unwrap();
        assert_eq!(descriptor.package_name().as_str(), DEFAULT_TEMPLATE_PACKAGE);
        assert_eq!(descriptor.install_type(), InstallType::Normal);
        assert!(descriptor.serves(ProjectType::Project));
    }
}
