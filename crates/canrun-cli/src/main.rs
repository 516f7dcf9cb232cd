//! canrun CLI - memory and feasibility checks for local LLM inference

mod cli;
mod commands;
mod error;
mod host;
mod output;

use canrun_core::ModelVariant;
use clap::Parser;
use cli::{Cli, Commands, quants_or_all};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON on stdout stays parseable
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let format = cli.output.unwrap_or_default();
    let estimator = commands::load_estimator(cli.config.as_deref())?;

    match cli.command {
        Commands::Estimate {
            id,
            params,
            size,
            quant,
            context,
            context_override,
            host,
        } => {
            let variant = ModelVariant::new(id, params, size, quant, context);
            commands::estimate::run(&estimator, format, variant, context_override, &host)?;
        }

        Commands::Matrix {
            sizes,
            quants,
            context,
            host,
        } => {
            let quants = quants_or_all(quants);
            commands::matrix::run(&estimator, format, &sizes, &quants, context, &host)?;
        }

        Commands::Select { catalog, host } => {
            commands::select::run(&estimator, format, &catalog, &host)?;
        }

        Commands::Recommend {
            params,
            quants,
            context,
            host,
        } => {
            let quants = quants_or_all(quants);
            commands::recommend::run(&estimator, format, params, &quants, context, &host)?;
        }

        Commands::Quants => {
            commands::quants::run(format)?;
        }

        Commands::Host => {
            commands::host::run(&estimator, format)?;
        }
    }

    Ok(())
}
