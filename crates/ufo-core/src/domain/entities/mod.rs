pub mod install_options;
pub mod package;
pub mod project;
pub mod template;

pub use crate::domain::DomainError;
pub use install_options::InstallOptions;
pub use package::{CacheLayout, CachedPackage, PackageManifest};
pub use project::{ProjectInfo, ProjectInfoBuilder};
pub use template::{InstallStrategy, NormalInstall, TemplateDescriptor, TemplateRecord};
