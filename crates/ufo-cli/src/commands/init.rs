//! `ufo init`: create a project or component from a template package.
//!
//! Runs as a [`Command`] under the lifecycle runner:
//! - `init_args` takes the project name from the first positional,
//! - `init` checks the target directory and gathers the project details,
//! - `exec` downloads or updates the template and installs it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use ufo_adapters::{BuiltinCatalog, FileCatalog, LocalFilesystem, NodeScriptRunner, NpmClient};
use ufo_core::{
    application::{
        CatalogService, Command, Filesystem, InstallReport, InstallService, LifecycleRunner,
        PackageService, TemplateCatalog,
    },
    domain::{
        CachedPackage, CommandArgs, DEFAULT_PROJECT_VERSION, DomainValidator, InstallType,
        ProjectInfo, ProjectType, TemplateDescriptor,
    },
    error::UfoError,
};

use crate::{
    cli::{GlobalArgs, InitArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
    prompt::Prompter,
};

/// Entries that do not make a directory "non-empty".
const IGNORED_ENTRY: &str = "node_modules";

/// Run `ufo init` to completion.
#[instrument(skip_all)]
pub async fn execute(
    args: InitArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let positionals: Vec<String> = args.project_name.iter().cloned().collect();
    let command = InitCommand::from_config(args, &global, &config, output)?;
    let mut runner = LifecycleRunner::new(command, positionals)?;
    runner.run().await
}

/// What `init` decided and `exec` carries out.
#[derive(Debug, Clone)]
struct Plan {
    descriptor: TemplateDescriptor,
    project: ProjectInfo,
}

/// The `init` command with its collaborators.
pub struct InitCommand {
    args: InitArgs,
    target_dir: PathBuf,
    prompter: Prompter,
    output: OutputManager,
    filesystem: Arc<dyn Filesystem>,
    catalog: CatalogService,
    packages: PackageService,
    installer: InstallService,
    project_name: String,
    plan: Option<Plan>,
}

impl InitCommand {
    /// Wire the real adapters from configuration.
    pub fn from_config(
        args: InitArgs,
        global: &GlobalArgs,
        config: &AppConfig,
        output: OutputManager,
    ) -> CliResult<Self> {
        let target_dir = match &global.target_path {
            Some(path) => path.clone(),
            None => std::env::current_dir()
                .with_cli_context(|| "failed to read the current directory")?,
        };

        let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
        let mut client = NpmClient::new(config.client.manager);
        if let Some(registry) = &config.client.registry {
            client = client.with_registry(registry.as_str());
        }
        let catalog: Arc<dyn TemplateCatalog> = match &config.templates.catalog {
            Some(path) => Arc::new(FileCatalog::new(path)),
            None => Arc::new(BuiltinCatalog::new()),
        };
        let runner = Arc::new(NodeScriptRunner::new(&config.custom.node));

        Ok(Self {
            prompter: Prompter::detect(args.yes),
            args,
            target_dir,
            output,
            catalog: CatalogService::new(catalog),
            packages: PackageService::new(
                config.cache_layout()?,
                Arc::new(client),
                Arc::clone(&filesystem),
            ),
            installer: InstallService::new(Arc::clone(&filesystem), runner),
            filesystem,
            project_name: String::new(),
            plan: None,
        })
    }

    /// True when the target only holds dot-files and `node_modules`.
    fn target_is_empty(&self) -> CliResult<bool> {
        if !self.filesystem.exists(&self.target_dir) {
            return Ok(true);
        }
        let entries = self.filesystem.read_dir(&self.target_dir)?;
        Ok(entries.iter().all(|entry| is_ignorable(entry)))
    }

    /// Ask before touching a non-empty directory.
    ///
    /// Without `--force` the user must agree to continue. Clearing always
    /// needs its own confirmation; declining it keeps the existing files.
    fn check_target(&self) -> CliResult<()> {
        if self.target_is_empty()? {
            return Ok(());
        }
        let dir = self.target_dir.display();

        if !self.args.force {
            let proceed = self.prompter.confirm(
                &format!("{dir} is not empty. Continue creating the project?"),
                false,
            )?;
            if !proceed {
                return Err(CliError::Cancelled);
            }
        }

        let clear = self
            .prompter
            .confirm(&format!("Remove everything in {dir}?"), false)?;
        if clear {
            info!(dir = %dir, "Emptying target directory");
            self.filesystem.empty_dir(&self.target_dir)?;
            self.output.info(&format!("Cleared {dir}"))?;
        } else {
            debug!(dir = %dir, "Keeping existing files");
            self.output
                .warning("Keeping existing files; template files may overwrite them")?;
        }
        Ok(())
    }

    fn choose_type(&self) -> CliResult<ProjectType> {
        if let Some(kind) = self.args.project_type {
            return Ok(kind.into());
        }
        let types = [ProjectType::Project, ProjectType::Component];
        let labels: Vec<String> = types.iter().map(|t| t.to_string()).collect();
        let index = self.prompter.select("What do you want to create?", &labels, 0)?;
        Ok(types[index.min(types.len() - 1)])
    }

    fn choose_template(&self, project_type: ProjectType) -> CliResult<TemplateDescriptor> {
        let mut templates = self.catalog.templates_for(project_type)?;

        if let Some(name) = &self.args.template {
            let found = templates
                .iter()
                .position(|t| t.package_name().as_str() == name.as_str());
            return match found {
                Some(index) => Ok(templates.swap_remove(index)),
                None => Err(CliError::TemplateNotFound {
                    name: name.clone(),
                    available: templates
                        .iter()
                        .map(|t| t.package_name().to_string())
                        .collect(),
                }),
            };
        }

        let labels: Vec<String> = templates
            .iter()
            .map(|t| format!("{} ({})", t.name(), t.package_name()))
            .collect();
        let index = self.prompter.select("Choose a template", &labels, 0)?;
        if index >= templates.len() {
            return Err(CliError::invalid_input("no template selected"));
        }
        Ok(templates.swap_remove(index))
    }

    fn project_info(&self, project_type: ProjectType) -> CliResult<ProjectInfo> {
        let name = if DomainValidator::validate_project_name(&self.project_name).is_ok()
            || !self.prompter.is_interactive()
        {
            self.project_name.clone()
        } else {
            self.prompter.input("Project name", None, validate_name)?
        };

        let version = match &self.args.project_version {
            Some(version) => version.clone(),
            None => self.prompter.input(
                "Project version",
                Some(DEFAULT_PROJECT_VERSION.to_string()),
                validate_version,
            )?,
        };

        let mut builder = ProjectInfo::builder(name)
            .project_type(project_type)
            .version(version);

        let description = match (&self.args.description, project_type) {
            (Some(description), _) => Some(description.clone()),
            (None, ProjectType::Component) if self.prompter.is_interactive() => Some(
                self.prompter
                    .input("Component description", None, validate_description)?,
            ),
            (None, _) => None,
        };
        if let Some(description) = description {
            builder = builder.description(description);
        }

        Ok(builder.build()?)
    }

    /// Resolve and fetch or refresh the template package.
    async fn download(&self, descriptor: &TemplateDescriptor) -> CliResult<CachedPackage> {
        let resolved = self.packages.resolve(descriptor).await?;

        let (pkg, done) = if self.packages.exists(&resolved) {
            let spinner = self.output.spinner("Updating template");
            let result = self.packages.update(&resolved).await;
            spinner.finish_and_clear();
            (result?, "Template updated")
        } else {
            let spinner = self.output.spinner("Downloading template");
            let result = self.packages.install(&resolved).await;
            spinner.finish_and_clear();
            result?;
            (resolved, "Template downloaded")
        };

        // Only report success once the cache entry checks out.
        self.packages.manifest(&pkg)?;
        self.output.success(&format!("{done}: {pkg}"))?;
        Ok(pkg)
    }
}

#[async_trait]
impl Command for InitCommand {
    type Error = CliError;

    async fn init_args(&mut self, args: CommandArgs) -> CliResult<()> {
        self.project_name = args.first().to_string();
        Ok(())
    }

    #[instrument(skip_all, fields(project = %self.project_name, force = self.args.force))]
    async fn init(&mut self) -> CliResult<()> {
        self.check_target()?;

        let project_type = self.choose_type()?;
        let descriptor = self.choose_template(project_type)?;
        let project = self.project_info(project_type)?;
        debug!(
            template = %descriptor.package_name(),
            version = %descriptor.version(),
            class_name = project.class_name(),
            "Project details collected"
        );

        self.plan = Some(Plan {
            descriptor,
            project,
        });
        Ok(())
    }

    #[instrument(skip_all, fields(project = %self.project_name))]
    async fn exec(&mut self) -> CliResult<()> {
        let Plan {
            descriptor,
            project,
        } = self.plan.take().ok_or_else(|| UfoError::Internal {
            message: "exec ran before init".into(),
        })?;

        self.output.header(&format!(
            "Creating {} '{}' from {}",
            project.project_type(),
            project.name(),
            descriptor.name()
        ))?;

        let pkg = self.download(&descriptor).await?;

        // Custom installers own the terminal.
        let spinner = (descriptor.install_type() == InstallType::Normal)
            .then(|| self.output.spinner("Installing template"));
        let result = self
            .installer
            .install(&descriptor, &pkg, &project, &self.target_dir)
            .await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        match result? {
            InstallReport::Normal { files_copied } => self.output.success(&format!(
                "Copied {files_copied} files into {}",
                self.target_dir.display()
            ))?,
            InstallReport::Custom => self.output.success("Custom installer finished")?,
        }
        if descriptor.install_type() == InstallType::Normal {
            self.output.print("")?;
            self.output.print("Next steps:")?;
            self.output
                .print(&format!("  cd {}", self.target_dir.display()))?;
            self.output.print("  npm install")?;
        }
        info!(project = project.name(), "Project created");
        Ok(())
    }
}

fn is_ignorable(entry: &Path) -> bool {
    entry
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.') || name == IGNORED_ENTRY)
}

fn validate_name(value: &str) -> Result<(), String> {
    DomainValidator::validate_project_name(value.trim()).map_err(|e| e.to_string())
}

fn validate_version(value: &str) -> Result<(), String> {
    DomainValidator::validate_project_version(value.trim()).map_err(|e| e.to_string())
}

fn validate_description(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err("a component needs a description".into())
    } else {
        Ok(())
    }
}
