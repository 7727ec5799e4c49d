//! Roomverb CLI - Synthetic Room Reverb
//!
//! Command-line interface for the roomverb reverb pipeline.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{info, warn};

use roomverb::cli::commands::{self, ProcessSettings};
use roomverb::cli::{Cli, Commands};
use roomverb::ReverbError;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Roomverb v{}", env!("CARGO_PKG_VERSION"));

    handle_command(cli.command).inspect_err(|err| {
        if let Some(reverb_err) = err.downcast_ref::<ReverbError>() {
            warn!("[{}] {}", reverb_err.error_code(), reverb_err.recovery_hint());
        }
    })
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::Process {
            input,
            output,
            params,
            seed,
            max_duration,
            bit_depth,
            method,
        } => {
            let params = params.resolve().context("Invalid reverb parameters")?;
            let settings = ProcessSettings {
                seed,
                max_duration,
                bit_depth,
                method: method.into(),
            };
            commands::process(&input, &output, params, &settings)
                .with_context(|| format!("Failed to process {}", input.display()))?;
        }
        Commands::RenderIr {
            output,
            params,
            sample_rate,
            seed,
            bit_depth,
        } => {
            let params = params.resolve().context("Invalid reverb parameters")?;
            commands::render_ir(&output, &params, sample_rate, seed, bit_depth)
                .with_context(|| format!("Failed to render {}", output.display()))?;
        }
        Commands::Presets => commands::list_presets()?,
    }
    Ok(())
}
