//! Global arguments that apply to every subcommand.
//!
//! Declared here and flattened into [`super::Cli`] so that `-v`, `-q`, etc.
//! are available on any invocation without repetition

use clap::Args;
use std::path::PathBuf;

/// Global arguments for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Increase logging verbosity.
    ///
    /// Pass once for INFO (`-v`), twice for DEBUG (`-vv`), three times for
    /// TRACE (`-vvv`).  Conflicts with `--quiet`.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase verbosity (-v, -vv, -vvv)",
        long_help = "Increase logging verbosity:
    (none)  - Only warnings and errors
    -v      - Info level (progress messages)
    -vv     - Debug level (detailed diagnostics)
    -vvv    - Trace level (very verbose)"
    )]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with_all = ["verbose", "debug"],
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Debug mode: debug-level logs and full error chains.
    #[arg(
        long = "debug",
        global = true,
        env = "UFO_DEBUG",
        help = "Enable debug logging and detailed errors"
    )]
    pub debug: bool,

    /// Directory to create the project in, instead of the current one.
    #[arg(
        long = "target-path",
        visible_alias = "targetPath",
        global = true,
        value_name = "DIR",
        env = "UFO_TARGET_PATH",
        help = "Target directory (default: current directory)"
    )]
    pub target_path: Option<PathBuf>,

    /// Disable ANSI colour codes.
    ///
    /// Automatically honoured when `NO_COLOR` is set in the environment
    /// (see <https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// Configuration file path.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Configuration file path"
    )]
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// Whether errors should carry their full source chain.
    pub fn detailed_errors(&self) -> bool {
        self.debug || self.verbose > 0
    }
}
