//! CLI configuration: thin wrapper around `odyssey_config`.
//!
//! Loads the shared config and applies `GlobalOpts` flag overrides
//! (--api-url, --timeout, --insecure, --output).

use odyssey_config::Config;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use odyssey_config::{config_path, load_config, save_config, to_client_config, token_store};

/// Load config and layer CLI flags on top. Flags win.
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config()?;
    if let Some(ref url) = global.api_url {
        cfg.api_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    if global.insecure {
        cfg.insecure = true;
    }
    Ok(cfg)
}

/// Output format from the flag, else the config default, else table.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    use clap::ValueEnum;

    global.output.clone().unwrap_or_else(|| {
        OutputFormat::from_str(&cfg.output, true).unwrap_or(OutputFormat::Table)
    })
}
