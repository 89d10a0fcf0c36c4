mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use odyssey_core::Controller;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output::OutputOpts;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // A broken config file is reported by `run`; here it only loses the
    // configured log level.
    let configured_level = config::load_config().ok().and_then(|c| c.log_level);
    init_tracing(cli.global.verbose, configured_level.as_deref());

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, configured: Option<&str>) {
    let filter = match verbosity {
        0 => configured.unwrap_or("warn"),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need the API
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "odyssey", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let cfg = config::resolve(&cli.global)?;
            let opts = OutputOpts::new(&cli.global, config::output_format(&cli.global, &cfg));
            let controller =
                Controller::new(config::to_client_config(&cfg)?, config::token_store(&cfg)?)?;

            tracing::debug!(command = ?cmd, api = %cfg.api_url, "dispatching command");
            commands::dispatch(cmd, &controller, &opts).await
        }
    }
}
