mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sdwan_core::{CancellationToken, Controller, CoreError};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Ctrl-C cancels; no cleanup request is sent to the controller
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received");
            interrupt.cancel();
        }
    });

    // Ctrl-C ends any stage; the poll loop reports its own interruption
    let result = tokio::select! {
        biased;
        result = run(cli, cancel.clone()) => result,
        () = cancel.cancelled() => Err(CliError::Aborted),
    };

    // Handle errors with proper exit codes
    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
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

async fn run(cli: Cli, cancel: CancellationToken) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a controller connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "sdwan", &mut std::io::stdout());
            Ok(())
        }

        // All other commands are checked locally, then log in
        cmd => {
            let (controller_config, profile) = config::build_controller_config(&cli.global)?;
            let Some(prepared) = commands::prepare(cmd, &cli.global)? else {
                eprintln!("Aborted.");
                return Ok(());
            };

            let controller = Controller::connect(controller_config)
                .await
                .map_err(|e| match e {
                    CoreError::InvalidCredentials => CliError::AuthFailed { profile },
                    other => other.into(),
                })?;

            tracing::debug!(command = ?prepared, "dispatching command");
            commands::dispatch(prepared, &controller, &cli.global, &cancel).await
        }
    }
}
