//! Runs custom template installers in a fresh Node.js process.
//!
//! The child is started as `node -e <BOOTSTRAP> <entry> <options-json>`. The
//! bootstrap script is a constant: the entry point path and the options
//! document only ever travel as argv, so nothing a template or user supplies
//! is evaluated as code by the parent.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};

use ufo_core::{
    application::{
        ApplicationError,
        ports::{ProcessStatus, ScriptInvocation, ScriptRunner},
    },
    error::UfoResult,
};

/// Loads the entry point, calls its exported function once with the parsed
/// options and exits non-zero if it throws or rejects.
pub const BOOTSTRAP: &str = r#"const [entry, options] = process.argv.slice(1);
const mod = require(entry);
const install = typeof mod === 'function' ? mod : mod && mod.default;
if (typeof install !== 'function') {
  console.error(`${entry} does not export an installer function`);
  process.exit(1);
}
Promise.resolve()
  .then(() => install(JSON.parse(options)))
  .catch((err) => {
    console.error(err);
    process.exit(1);
  });"#;

/// [`ScriptRunner`] that spawns a Node.js interpreter.
#[derive(Debug, Clone)]
pub struct NodeScriptRunner {
    node: PathBuf,
}

impl NodeScriptRunner {
    /// Use the given interpreter (a bare name is looked up on `PATH`).
    pub fn new(node: impl Into<PathBuf>) -> Self {
        Self { node: node.into() }
    }

    pub fn interpreter(&self) -> &std::path::Path {
        &self.node
    }

    fn command(&self, invocation: &ScriptInvocation) -> Command {
        let mut command = Command::new(&self.node);
        command
            .arg("-e")
            .arg(BOOTSTRAP)
            .arg(&invocation.entry_point)
            .arg(&invocation.options_json)
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        command
    }
}

impl Default for NodeScriptRunner {
    fn default() -> Self {
        Self::new("node")
    }
}

#[async_trait]
impl ScriptRunner for NodeScriptRunner {
    #[instrument(skip_all, fields(entry = %invocation.entry_point.display()))]
    async fn run(&self, invocation: &ScriptInvocation) -> UfoResult<ProcessStatus> {
        debug!(node = %self.node.display(), cwd = %invocation.working_dir.display(), "Starting custom installer");

        let status = self
            .command(invocation)
            .status()
            .await
            .map_err(|e| ApplicationError::ClientUnavailable {
                client: self.node.display().to_string(),
                reason: e.to_string(),
            })?;

        let status = ProcessStatus {
            code: status.code(),
        };
        debug!(%status, "Custom installer exited");
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_reads_everything_from_argv() {
        assert!(BOOTSTRAP.contains("process.argv.slice(1)"));
        assert!(BOOTSTRAP.contains("JSON.parse(options)"));
        assert!(BOOTSTRAP.contains("process.exit(1)"));
    }

    #[test]
    fn hostile_options_stay_a_single_argument() {
        let invocation = ScriptInvocation {
            entry_point: "/cache/pkg/index.js".into(),
            options_json: r#"{"name":"'); process.exit(0); ('"}"#.into(),
            working_dir: "/work".into(),
        };
        let command = NodeScriptRunner::default().command(&invocation);
        let args: Vec<_> = command.as_std().get_args().collect();
        assert_eq!(args.len(), 4);
        assert_eq!(args[0], "-e");
        assert_eq!(args[1], BOOTSTRAP);
        assert_eq!(args[2], "/cache/pkg/index.js");
        assert_eq!(args[3], invocation.options_json.as_str());
        assert_eq!(
            command.as_std().get_current_dir(),
            Some(std::path::Path::new("/work"))
        );
    }

    #[tokio::test]
    async fn missing_interpreter_is_reported() {
        let runner = NodeScriptRunner::new("/definitely/not/node");
        let tmp = tempfile::TempDir::new().unwrap();
        let err = runner
            .run(&ScriptInvocation {
                entry_point: tmp.path().join("index.js"),
                options_json: "{}".into(),
                working_dir: tmp.path().to_path_buf(),
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/definitely/not/node"));
    }
}
