//! Drives a [`Command`] through `init_args → init → exec`.
//!
//! Legality of each move comes from [`LifecycleState`]; this module only adds
//! the awaiting. A stage that fails moves the runner to `Failed` and returns
//! the error unchanged, so the caller's single handler is the only place it
//! is reported.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::{CommandArgs, DomainError, LifecycleState};

/// A CLI command with three asynchronous stages.
#[async_trait]
pub trait Command: Send {
    type Error: From<DomainError> + Send;

    /// Receive the normalised positional arguments.
    async fn init_args(&mut self, args: CommandArgs) -> Result<(), Self::Error>;

    /// Gather everything `exec` needs.
    async fn init(&mut self) -> Result<(), Self::Error>;

    /// Do the work.
    async fn exec(&mut self) -> Result<(), Self::Error>;
}

/// Owns a command and its arguments; runs each stage exactly once, in order.
pub struct LifecycleRunner<C: Command> {
    command: C,
    args: CommandArgs,
    state: LifecycleState,
}

impl<C: Command> LifecycleRunner<C> {
    /// Fails with `EmptyArgumentList` before any stage can run.
    pub fn new<I, S>(command: C, positionals: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            command,
            args: CommandArgs::new(positionals)?,
            state: LifecycleState::Created,
        })
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn command(&self) -> &C {
        &self.command
    }

    pub fn into_command(self) -> C {
        self.command
    }

    pub async fn run(&mut self) -> Result<(), C::Error> {
        let result = self.drive().await;
        if result.is_err() {
            if let Ok(failed) = self.state.fail() {
                warn!(at = %self.state, "Command failed");
                self.state = failed;
            }
        }
        result
    }

    async fn drive(&mut self) -> Result<(), C::Error> {
        let next = self.state.normalize_args()?;
        self.command.init_args(self.args.clone().normalized()).await?;
        self.enter(next);

        let next = self.state.initialize()?;
        self.command.init().await?;
        self.enter(next);

        let next = self.state.execute()?;
        self.command.exec().await?;
        self.enter(next);

        Ok(())
    }

    fn enter(&mut self, next: LifecycleState) {
        debug!(from = %self.state, to = %next, "Lifecycle stage complete");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        fail_in: Option<&'static str>,
    }

    impl Recorder {
        fn stage(&mut self, name: &'static str) -> Result<(), DomainError> {
            self.calls.push(name.to_string());
            if self.fail_in == Some(name) {
                return Err(DomainError::InvalidProjectInfo(format!("{name} failed")));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Command for Recorder {
        type Error = DomainError;

        async fn init_args(&mut self, args: CommandArgs) -> Result<(), DomainError> {
            self.calls.push(format!("args:{}", args.first()));
            self.stage("init_args")
        }

        async fn init(&mut self) -> Result<(), DomainError> {
            self.stage("init")
        }

        async fn exec(&mut self) -> Result<(), DomainError> {
            self.stage("exec")
        }
    }

    #[test]
    fn empty_arguments_fail_construction() {
        let result = LifecycleRunner::new(Recorder::default(), Vec::<String>::new());
        assert!(matches!(result, Err(DomainError::EmptyArgumentList)));
    }

    #[tokio::test]
    async fn stages_run_in_order() {
        let mut runner = LifecycleRunner::new(Recorder::default(), [" my-app "]).unwrap();
        runner.run().await.unwrap();
        assert_eq!(runner.state(), LifecycleState::Executed);
        assert_eq!(
            runner.command().calls,
            vec!["args:my-app", "init_args", "init", "exec"]
        );
    }

    #[tokio::test]
    async fn init_failure_prevents_exec() {
        let recorder = Recorder {
            fail_in: Some("init"),
            ..Recorder::default()
        };
        let mut runner = LifecycleRunner::new(recorder, ["my-app"]).unwrap();
        let err = runner.run().await.unwrap_err();
        assert_eq!(err, DomainError::InvalidProjectInfo("init failed".into()));
        assert_eq!(runner.state(), LifecycleState::Failed);
        assert!(!runner.command().calls.contains(&"exec".to_string()));
    }

    #[tokio::test]
    async fn a_finished_runner_cannot_run_again() {
        let mut runner = LifecycleRunner::new(Recorder::default(), ["my-app"]).unwrap();
        runner.run().await.unwrap();
        let err = runner.run().await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert_eq!(runner.state(), LifecycleState::Executed);
        assert_eq!(runner.into_command().calls.len(), 4);
    }
}
