use anyhow::Context;
use clap::Parser;
use portcve::cli::{Cli, Commands};
use portcve::config::AppSettings;
use portcve::{logging, output};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = match &cli.config {
        // `config --init` may be creating this file
        Some(path) if !path.exists() && matches!(cli.command, Commands::Config(_)) => {
            AppSettings::default()
        }
        Some(path) => AppSettings::load_from(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => AppSettings::load().context("loading settings")?,
    };

    match &cli.command {
        Commands::Scan(cmd) => cmd.execute(&settings, cli.verbose, cli.quiet).await?,
        Commands::Cves(cmd) => cmd.execute(&settings).await?,
        Commands::Config(cmd) => cmd.execute(&settings, cli.config.as_deref())?,
    }

    Ok(())
}
