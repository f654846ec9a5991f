//! # ufo CLI
//!
//! Template-driven project scaffolding.
//!
//! ## Startup sequence
//!
//! 1. Load `.env` files (current directory, then home).
//! 2. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 3. Initialise the tracing subscriber (logging).
//! 4. Load configuration (defaults + file + env).
//! 5. Build the [`OutputManager`].
//! 6. Dispatch to the appropriate command handler.
//! 7. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                          |
//! |------|----------------------------------|
//! |  0   | Success                          |
//! |  1   | Internal / network error         |
//! |  2   | User / input error               |
//! |  3   | Resource not found               |
//! |  4   | Configuration error              |
//! | 130  | Cancelled by the user            |

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod prompt;

#[tokio::main]
async fn main() -> ExitCode {
    config::load_dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version come through here too.
            let _ = e.print();
            return ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(2));
        }
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        debug = cli.global.debug,
        no_color = cli.global.no_color,
        "CLI started"
    );

    let global = cli.global.clone();
    match run(cli).await {
        Ok(()) => {
            info!("ufo completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, &global),
    }
}

/// Load configuration and dispatch to the correct command handler.
#[instrument(skip_all)]
async fn run(cli: Cli) -> CliResult<()> {
    // ── 3. Load configuration ─────────────────────────────────────────────
    let config = AppConfig::load(cli.global.config.as_deref())?;

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global);

    match cli.command {
        Commands::Init(cmd) => commands::init::execute(cmd, cli.global, config, output).await,
    }
}

/// Translate a `CliError` into a user message and an appropriate exit code.
///
/// This is the single place where structured errors become human-readable
/// output and OS exit codes.
fn handle_error(err: CliError, global: &GlobalArgs) -> ExitCode {
    err.log();

    let verbose = global.detailed_errors();
    let msg = if !global.no_color && std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_version_matches_cargo() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_version(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn cli_has_author() {
        let cmd = Cli::command();
        assert!(cmd.get_author().is_some());
    }
}
