//! Catalog Service - turns catalog records into validated descriptors.

use std::sync::Arc;

use tracing::debug;

use crate::{
    application::ports::TemplateCatalog,
    domain::{DomainError, ProjectType, TemplateDescriptor},
    error::UfoResult,
};

/// Read access to the template catalog.
pub struct CatalogService {
    catalog: Arc<dyn TemplateCatalog>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn TemplateCatalog>) -> Self {
        Self { catalog }
    }

    /// Every template in the catalog.
    ///
    /// A single malformed record fails the whole listing; an empty catalog
    /// is `MissingTemplateMetadata`.
    pub fn templates(&self) -> UfoResult<Vec<TemplateDescriptor>> {
        let records = self.catalog.list()?;
        if records.is_empty() {
            return Err(DomainError::MissingTemplateMetadata(
                "the template catalog is empty".into(),
            )
            .into());
        }

        let descriptors = records
            .into_iter()
            .map(TemplateDescriptor::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = descriptors.len(), "Template catalog loaded");
        Ok(descriptors)
    }

    /// Templates offered for one project type.
    pub fn templates_for(&self, project_type: ProjectType) -> UfoResult<Vec<TemplateDescriptor>> {
        let matching: Vec<_> = self
            .templates()?
            .into_iter()
            .filter(|t| t.serves(project_type))
            .collect();
        if matching.is_empty() {
            return Err(DomainError::MissingTemplateMetadata(format!(
                "no template is tagged for {project_type}"
            ))
            .into());
        }
        Ok(matching)
    }

    /// The template published under `package_name`.
    pub fn find(&self, package_name: &str) -> UfoResult<TemplateDescriptor> {
        let wanted = package_name.trim();
        self.templates()?
            .into_iter()
            .find(|t| t.package_name().as_str() == wanted)
            .ok_or_else(|| {
                DomainError::MissingTemplateMetadata(format!("no template named '{wanted}'"))
                    .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockTemplateCatalog;
    use crate::domain::{InstallType, TemplateRecord};
    use crate::error::UfoError;

    fn record(npm_name: &str, tag: &str, install_type: Option<&str>) -> TemplateRecord {
        TemplateRecord {
            name: npm_name.to_uppercase(),
            npm_name: npm_name.into(),
            version: "1.0.0".into(),
            tag: vec![tag.into()],
            install_type: install_type.map(Into::into),
            ignore: Vec::new(),
            install_command: None,
            start_command: None,
        }
    }

    fn service(records: Vec<TemplateRecord>) -> CatalogService {
        let mut catalog = MockTemplateCatalog::new();
        catalog
            .expect_list()
            .returning(move || Ok(records.clone()));
        CatalogService::new(Arc::new(catalog))
    }

    #[test]
    fn empty_catalog_is_missing_metadata() {
        let err = service(Vec::new()).templates().unwrap_err();
        assert!(matches!(
            err,
            UfoError::Domain(DomainError::MissingTemplateMetadata(_))
        ));
    }

    #[test]
    fn filters_by_project_type() {
        let svc = service(vec![
            record("app-template", "project", None),
            record("widget-template", "component", Some("custom")),
        ]);
        let components = svc.templates_for(ProjectType::Component).unwrap();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].install_type(), InstallType::Custom);
    }

    #[test]
    fn unknown_install_type_fails_listing() {
        let svc = service(vec![record("app-template", "project", Some("zip"))]);
        assert!(matches!(
            svc.templates().unwrap_err(),
            UfoError::Domain(DomainError::UnknownInstallType(_))
        ));
    }

    #[test]
    fn finds_by_package_name() {
        let svc = service(vec![record("app-template", "project", None)]);
        assert!(svc.find("app-template").is_ok());
        assert!(svc.find("nope").is_err());
    }
}
