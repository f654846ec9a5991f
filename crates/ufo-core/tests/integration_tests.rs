//! Integration tests for ufo-core's public API.

use async_trait::async_trait;
use ufo_core::prelude::*;

/// A command that builds a project from its first argument.
#[derive(Default)]
struct CreateProject {
    name: Option<String>,
    info: Option<ProjectInfo>,
    executed: bool,
}

#[async_trait]
impl Command for CreateProject {
    type Error = UfoError;

    async fn init_args(&mut self, args: CommandArgs) -> Result<(), UfoError> {
        self.name = Some(args.first().to_string());
        Ok(())
    }

    async fn init(&mut self) -> Result<(), UfoError> {
        let name = self.name.clone().unwrap_or_default();
        self.info = Some(ProjectInfo::builder(name).build()?);
        Ok(())
    }

    async fn exec(&mut self) -> Result<(), UfoError> {
        self.executed = true;
        Ok(())
    }
}

#[tokio::test]
async fn test_full_lifecycle() {
    let mut runner = LifecycleRunner::new(CreateProject::default(), ["  MyApp  "]).unwrap();
    runner.run().await.unwrap();

    assert_eq!(runner.state(), LifecycleState::Executed);
    let command = runner.into_command();
    assert!(command.executed);
    assert_eq!(command.info.unwrap().class_name(), "my-app");
}

#[tokio::test]
async fn test_invalid_name_fails_in_init() {
    let mut runner = LifecycleRunner::new(CreateProject::default(), ["1-bad"]).unwrap();
    let err = runner.run().await.unwrap_err();

    assert!(matches!(
        err,
        UfoError::Domain(DomainError::InvalidProjectName { .. })
    ));
    assert_eq!(runner.state(), LifecycleState::Failed);
    assert!(!runner.command().executed);
}

#[test]
fn test_empty_arguments_rejected() {
    let result = LifecycleRunner::new(CreateProject::default(), Vec::<String>::new());
    assert!(matches!(result, Err(DomainError::EmptyArgumentList)));
}

#[test]
fn test_descriptor_to_cache_path() {
    let descriptor = TemplateDescriptor::new("Vue", "@ufo/vue-template", "2.3.1").unwrap();
    let PackageVersion::Exact(version) = descriptor.version().clone() else {
        panic!("expected an exact version");
    };
    let pkg = CachedPackage::new(
        CacheLayout::new("/home/u/.ufo-cli/template"),
        descriptor.package_name().clone(),
        version,
        descriptor.version().clone(),
    );
    assert_eq!(
        pkg.cache_file_path(),
        std::path::Path::new(
            "/home/u/.ufo-cli/template/node_modules/_@ufo+vue-template@2.3.1@@ufo+vue-template/node_modules/@ufo/vue-template"
        )
    );
    assert_eq!(pkg.payload_path(), pkg.cache_file_path().join("template"));
}
