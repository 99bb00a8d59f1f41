//! configurator - HiFiBerry sound card setup
//!
//! Detects the attached sound card and keeps the boot configuration in line
//! with it. Run `configurator --help` for the available commands.

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use configurator_core::Settings;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(&cli)?;
    debug!("Using boot configuration {}", settings.boot_config.display());

    match cli.command {
        Commands::Detect(args) => commands::detect(&settings, args).await,
        Commands::Configtxt(args) => commands::configtxt(&settings, args),
        Commands::Soundcard(args) => commands::soundcard(&settings, args).await,
        Commands::Cards => commands::cards(),
        Commands::Hat { all } => commands::hat(&settings, all).await,
        Commands::Dsp(args) => commands::dsp(&settings, args).await,
    }
}

/// Log to stderr so command output on stdout stays machine readable.
/// `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::discover(cli.settings.as_deref()).with_context(|| {
        match &cli.settings {
            Some(path) => format!("Failed to load settings from {}", path.display()),
            None => "Failed to load settings".to_string(),
        }
    })?;

    if let Some(path) = &cli.config_file {
        settings.boot_config = path.clone();
    }

    Ok(settings)
}
