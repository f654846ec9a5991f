//! User prompts.
//!
//! With the `interactive` feature and a terminal on both stdin and stderr,
//! questions go through `dialoguer`. Otherwise every answer has to come from
//! a flag or a default: confirmations are accepted only with `--yes`, and a
//! question without a default is an [`CliError::InvalidInput`].

use std::io::IsTerminal as _;

use crate::error::{CliError, CliResult};

/// Validates a free-text answer; the error string is shown to the user.
pub type Validator = fn(&str) -> Result<(), String>;

#[derive(Debug, Clone, Copy)]
pub struct Prompter {
    interactive: bool,
    assume_yes: bool,
}

impl Prompter {
    /// Interactive unless `--yes` was passed or there is no terminal.
    pub fn detect(assume_yes: bool) -> Self {
        let has_terminal = std::io::stdin().is_terminal() && console::Term::stderr().is_term();
        Self {
            interactive: cfg!(feature = "interactive") && !assume_yes && has_terminal,
            assume_yes,
        }
    }

    /// Never prompts.
    pub fn non_interactive(assume_yes: bool) -> Self {
        Self {
            interactive: false,
            assume_yes,
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Yes/no question.
    pub fn confirm(&self, question: &str, default: bool) -> CliResult<bool> {
        if self.interactive {
            return self.ask_confirm(question, default);
        }
        if self.assume_yes {
            return Ok(true);
        }
        Err(CliError::invalid_input(format!(
            "'{question}' needs an answer; pass --yes to confirm"
        )))
    }

    /// Pick one of `items`; non-interactive mode picks `default`.
    pub fn select(&self, question: &str, items: &[String], default: usize) -> CliResult<usize> {
        if self.interactive && items.len() > 1 {
            return self.ask_select(question, items, default);
        }
        Ok(default)
    }

    /// Free-text answer checked by `validate`.
    ///
    /// Non-interactive mode returns `default` unchecked; the caller's own
    /// validation reports a bad value.
    pub fn input(
        &self,
        question: &str,
        default: Option<String>,
        validate: Validator,
    ) -> CliResult<String> {
        if self.interactive {
            return self.ask_input(question, default, validate);
        }
        default.ok_or_else(|| {
            CliError::invalid_input(format!(
                "'{question}' has no default and prompts are disabled"
            ))
        })
    }

    #[cfg(feature = "interactive")]
    fn ask_confirm(&self, question: &str, default: bool) -> CliResult<bool> {
        use dialoguer::{Confirm, theme::ColorfulTheme};

        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(question)
            .default(default)
            .interact()
            .map_err(prompt_failed)
    }

    #[cfg(feature = "interactive")]
    fn ask_select(&self, question: &str, items: &[String], default: usize) -> CliResult<usize> {
        use dialoguer::{Select, theme::ColorfulTheme};

        Select::with_theme(&ColorfulTheme::default())
            .with_prompt(question)
            .items(items)
            .default(default)
            .interact()
            .map_err(prompt_failed)
    }

    #[cfg(feature = "interactive")]
    fn ask_input(
        &self,
        question: &str,
        default: Option<String>,
        validate: Validator,
    ) -> CliResult<String> {
        use dialoguer::{Input, theme::ColorfulTheme};

        let theme = ColorfulTheme::default();
        let mut input = Input::<String>::with_theme(&theme)
            .with_prompt(question)
            .validate_with(move |value: &String| validate(value));
        if let Some(default) = default {
            input = input.default(default);
        }
        input.interact_text().map_err(prompt_failed)
    }

    #[cfg(not(feature = "interactive"))]
    fn ask_confirm(&self, _question: &str, default: bool) -> CliResult<bool> {
        Ok(default)
    }

    #[cfg(not(feature = "interactive"))]
    fn ask_select(&self, _question: &str, _items: &[String], default: usize) -> CliResult<usize> {
        Ok(default)
    }

    #[cfg(not(feature = "interactive"))]
    fn ask_input(
        &self,
        question: &str,
        default: Option<String>,
        _validate: Validator,
    ) -> CliResult<String> {
        default.ok_or_else(|| CliError::invalid_input(format!("'{question}' has no default")))
    }
}

#[cfg(feature = "interactive")]
fn prompt_failed(err: dialoguer::Error) -> CliError {
    CliError::IoError {
        message: "prompt failed".into(),
        source: std::io::Error::other(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accept(_: &str) -> Result<(), String> {
        Ok(())
    }

    #[test]
    fn confirm_without_yes_is_invalid_input() {
        let prompter = Prompter::non_interactive(false);
        let err = prompter.confirm("Continue?", false).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn confirm_with_yes_accepts() {
        assert!(Prompter::non_interactive(true).confirm("Continue?", false).unwrap());
    }

    #[test]
    fn select_uses_default() {
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(
            Prompter::non_interactive(true).select("Pick", &items, 1).unwrap(),
            1
        );
    }

    #[test]
    fn input_falls_back_to_default() {
        let prompter = Prompter::non_interactive(true);
        assert_eq!(
            prompter.input("Version", Some("1.0.0".into()), accept).unwrap(),
            "1.0.0"
        );
        assert!(prompter.input("Description", None, accept).is_err());
    }

    #[test]
    fn yes_disables_prompts() {
        assert!(!Prompter::detect(true).is_interactive());
    }
}
