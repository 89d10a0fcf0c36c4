//! Shared helpers for command handlers.

use dialoguer::{Confirm, Input};
use secrecy::SecretString;

use crate::error::CliError;

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Prompt(e.to_string())
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Use `value` when given, otherwise ask for it.
pub fn text_or_prompt(value: Option<String>, prompt: &str) -> Result<String, CliError> {
    match value {
        Some(v) => Ok(v),
        None => Input::new()
            .with_prompt(prompt)
            .interact_text()
            .map_err(prompt_err),
    }
}

/// Hidden password prompt.
pub fn prompt_secret(prompt: &str) -> Result<SecretString, CliError> {
    rpassword::prompt_password(format!("{prompt}: "))
        .map(SecretString::from)
        .map_err(prompt_err)
}

/// Use `value` when given, otherwise prompt without echo.
pub fn secret_or_prompt(value: Option<String>, prompt: &str) -> Result<SecretString, CliError> {
    match value {
        Some(v) => Ok(SecretString::from(v)),
        None => prompt_secret(prompt),
    }
}
