//! Tracing subscriber initialisation.
//!
//! Only the CLI crate is allowed to call [`init_logging`]; `ufo-core` and
//! `ufo-adapters` only *emit* spans and events.
//!
//! # Verbosity mapping
//!
//! | Flag(s)   | Filter level |
//! |-----------|--------------|
//! | (none)    | WARN         |
//! | `-v`      | INFO         |
//! | `-vv`     | DEBUG        |
//! | `--debug` | DEBUG        |
//! | `-vvv`    | TRACE        |
//! | `--quiet` | ERROR        |
//!
//! `RUST_LOG` overrides all of the above if set.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::GlobalArgs;

/// Initialise the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros fire.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(derive_level(args))));

    let use_ansi = !args.no_color && std::io::stderr().is_terminal();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(args.debug)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(use_ansi)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(())
}

/// Same level for the binary and both library crates.
fn filter_directives(level: &str) -> String {
    format!("ufo={level},ufo_core={level},ufo_adapters={level}")
}

/// Translate the verbosity counter, debug and quiet flags to a level string.
fn derive_level(args: &GlobalArgs) -> &'static str {
    if args.quiet {
        return "error";
    }
    match (args.verbose, args.debug) {
        (0, false) => "warn",
        (1, false) => "info",
        (0..=2, _) => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with(verbose: u8, quiet: bool, debug: bool) -> GlobalArgs {
        GlobalArgs {
            verbose,
            quiet,
            debug,
            no_color: true,
            ..GlobalArgs::default()
        }
    }

    #[test]
    fn level_quiet() {
        assert_eq!(derive_level(&args_with(0, true, false)), "error");
    }

    #[test]
    fn level_default() {
        assert_eq!(derive_level(&args_with(0, false, false)), "warn");
    }

    #[test]
    fn level_verbose_one() {
        assert_eq!(derive_level(&args_with(1, false, false)), "info");
    }

    #[test]
    fn level_verbose_two() {
        assert_eq!(derive_level(&args_with(2, false, false)), "debug");
    }

    #[test]
    fn level_debug_flag() {
        assert_eq!(derive_level(&args_with(0, false, true)), "debug");
        assert_eq!(derive_level(&args_with(1, false, true)), "debug");
    }

    #[test]
    fn level_verbose_three_plus() {
        assert_eq!(derive_level(&args_with(3, false, false)), "trace");
        assert_eq!(derive_level(&args_with(10, false, true)), "trace");
    }

    #[test]
    fn quiet_overrides_verbose() {
        assert_eq!(derive_level(&args_with(3, true, false)), "error");
    }

    #[test]
    fn directives_cover_all_crates() {
        let d = filter_directives("info");
        assert!(d.contains("ufo_core=info"));
        assert!(d.contains("ufo_adapters=info"));
    }
}
