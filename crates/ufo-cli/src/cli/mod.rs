//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

use ufo_core::domain::ProjectType;

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "ufo",
    bin_name = "ufo",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f6f8} Template-driven project scaffolding",
    long_about = "ufo creates projects and components from versioned npm \
                  template packages, caching them under ~/.ufo-cli.",
    after_help = "EXAMPLES:\n\
        \x20 ufo init my-app\n\
        \x20 ufo init my-app --yes --type project\n\
        \x20 ufo init MyButton --type component --description \"A button\"",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a project or component from a template.
    #[command(
        visible_alias = "i",
        about = "Initialise a project from a template",
        after_help = "EXAMPLES:\n\
            \x20 ufo init my-app\n\
            \x20 ufo init my-app --force\n\
            \x20 ufo init my-app --template jian-test --project-version 0.1.0 --yes\n\
            \x20 ufo init my-app --target-path ../workspace"
    )]
    Init(InitArgs),
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `ufo init`.
#[derive(Debug, Clone, Default, Args)]
pub struct InitArgs {
    /// Name of the project to create.
    #[arg(value_name = "PROJECT_NAME", help = "Project name")]
    pub project_name: Option<String>,

    /// Initialise even when the target directory is not empty.
    #[arg(
        short = 'f',
        long = "force",
        help = "Initialise into a non-empty directory"
    )]
    pub force: bool,

    /// Answer every prompt from flags and defaults.
    #[arg(short = 'y', long = "yes", help = "Skip prompts and confirm")]
    pub yes: bool,

    /// What to create.
    #[arg(
        short = 't',
        long = "type",
        value_name = "TYPE",
        value_enum,
        help = "Project type"
    )]
    pub project_type: Option<ProjectKind>,

    /// Template package to use, bypassing the template prompt.
    #[arg(
        long = "template",
        value_name = "NPM_NAME",
        help = "Template package name"
    )]
    pub template: Option<String>,

    /// Initial version of the new project.
    #[arg(
        long = "project-version",
        value_name = "SEMVER",
        help = "Project version (default: 1.0.0)"
    )]
    pub project_version: Option<String>,

    /// Description; required for components.
    #[arg(
        short = 'd',
        long = "description",
        value_name = "TEXT",
        help = "Project description"
    )]
    pub description: Option<String>,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Kinds of thing `init` can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ProjectKind {
    Project,
    Component,
}

impl From<ProjectKind> for ProjectType {
    fn from(kind: ProjectKind) -> Self {
        match kind {
            ProjectKind::Project => ProjectType::Project,
            ProjectKind::Component => ProjectType::Component,
        }
    }
}

impl std::fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project => write!(f, "project"),
            Self::Component => write!(f, "component"),
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn project_kind_display() {
        assert_eq!(ProjectKind::Project.to_string(), "project");
        assert_eq!(ProjectKind::Component.to_string(), "component");
    }

    #[test]
    fn project_kind_maps_to_domain() {
        assert_eq!(ProjectType::from(ProjectKind::Component), ProjectType::Component);
    }

    #[test]
    fn parse_init_command() {
        let cli = Cli::parse_from(["ufo", "init", "my-app", "--force", "-t", "component"]);
        let Commands::Init(args) = cli.command;
        assert_eq!(args.project_name.as_deref(), Some("my-app"));
        assert!(args.force);
        assert_eq!(args.project_type, Some(ProjectKind::Component));
    }

    #[test]
    fn project_name_is_optional_at_parse_time() {
        let cli = Cli::parse_from(["ufo", "init"]);
        let Commands::Init(args) = cli.command;
        assert!(args.project_name.is_none());
    }

    #[test]
    fn target_path_is_global() {
        let cli = Cli::parse_from(["ufo", "init", "app", "--target-path", "/tmp/out"]);
        assert_eq!(
            cli.global.target_path.as_deref(),
            Some(std::path::Path::new("/tmp/out"))
        );
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["ufo", "--quiet", "--verbose", "init", "app"]);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_type_rejected() {
        let result = Cli::try_parse_from(["ufo", "init", "app", "--type", "library"]);
        assert!(result.is_err());
    }
}
