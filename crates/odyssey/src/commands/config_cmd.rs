//! Config subcommand handlers.

use dialoguer::{Input, Select};

use odyssey_config::{Config, TokenBackend};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

const OUTPUT_CHOICES: &[&str] = &["table", "json", "json-compact", "yaml", "plain"];

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Prompt(e.to_string())
}

/// Interactive wizard seeded from the current (or default) config.
fn run_wizard(base: Config) -> Result<Config, CliError> {
    let api_url: String = Input::new()
        .with_prompt("API URL")
        .default(base.api_url.clone())
        .interact_text()
        .map_err(prompt_err)?;

    let timeout: u64 = Input::new()
        .with_prompt("Request timeout (seconds)")
        .default(base.timeout)
        .interact_text()
        .map_err(prompt_err)?;

    let backends = &["Token file (default)", "System keyring"];
    let backend = Select::new()
        .with_prompt("Where should the session token be kept?")
        .items(backends)
        .default(usize::from(base.token_backend == TokenBackend::Keyring))
        .interact()
        .map_err(prompt_err)?;

    let current_output = OUTPUT_CHOICES
        .iter()
        .position(|o| *o == base.output)
        .unwrap_or(0);
    let output = Select::new()
        .with_prompt("Default output format")
        .items(OUTPUT_CHOICES)
        .default(current_output)
        .interact()
        .map_err(prompt_err)?;

    Ok(Config {
        api_url,
        timeout,
        token_backend: if backend == 1 {
            TokenBackend::Keyring
        } else {
            TokenBackend::File
        },
        output: OUTPUT_CHOICES[output].to_owned(),
        ..base
    })
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let path = config::config_path();
            eprintln!("CodeOdyssey CLI setup");
            eprintln!("   Config path: {}\n", path.display());

            let base = config::load_config().unwrap_or_default();
            let cfg = run_wizard(base)?;
            // Reject a bad URL now rather than on the next command.
            config::to_client_config(&cfg)?;

            let saved = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("\n   ✓ Saved {}", saved.display());
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::resolve(global)?;
            let rendered = toml::to_string_pretty(&cfg).map_err(|e| CliError::Config {
                message: e.to_string(),
                path: config::config_path().display().to_string(),
            })?;
            output::print_output(rendered.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}
