//! CLI command definitions using clap

use crate::output::OutputFormat;
use canrun_core::{PlatformClass, QuantKey};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// canrun - Will this model run on this machine?
#[derive(Parser)]
#[command(name = "canrun")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json, table)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<OutputFormat>,

    /// Estimator configuration file (yaml, toml, json, json5)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Host RAM and platform shared by every estimating command
#[derive(Debug, Clone, Args)]
pub struct HostArgs {
    /// Total RAM in GB [default: detected host RAM]
    #[arg(long)]
    pub ram: Option<f64>,

    /// Skip host RAM detection; without --ram verdicts are `unknown`
    #[arg(long)]
    pub no_detect: bool,

    /// Platform class (linux, macos, windows, mobile, unknown) [default: this host]
    #[arg(long)]
    pub platform: Option<PlatformClass>,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Estimate memory for one model variant and classify it
    Estimate {
        /// Variant identifier shown in the output
        #[arg(long, default_value = "model")]
        id: String,

        /// Parameter count in billions
        #[arg(long)]
        params: f64,

        /// On-disk weight size in GB (0 derives it from the quantization)
        #[arg(long, default_value_t = 0.0)]
        size: f64,

        /// Quantization (e.g. Q4_K_M, q8, f16)
        #[arg(short, long, default_value = "Q4_K_M")]
        quant: QuantKey,

        /// Native context length in tokens
        #[arg(long, default_value_t = 4096)]
        context: u32,

        /// Evaluate at exactly this context instead of the capped native one
        #[arg(long)]
        context_override: Option<u32>,

        #[command(flatten)]
        host: HostArgs,
    },

    /// Cross parameter sizes with quantizations
    Matrix {
        /// Parameter sizes in billions, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        sizes: Vec<f64>,

        /// Quantizations, comma separated [default: all]
        #[arg(long, value_delimiter = ',')]
        quants: Vec<QuantKey>,

        /// Context length in tokens [default: from configuration]
        #[arg(long)]
        context: Option<u32>,

        #[command(flatten)]
        host: HostArgs,
    },

    /// Pick the most capable variant from a catalog file
    Select {
        /// Variant catalog file (`variants: [...]`)
        #[arg(long)]
        catalog: PathBuf,

        #[command(flatten)]
        host: HostArgs,
    },

    /// Recommend the most precise quantization for a parameter size
    Recommend {
        /// Parameter count in billions
        #[arg(long)]
        params: f64,

        /// Candidate quantizations, comma separated [default: all]
        #[arg(long, value_delimiter = ',')]
        quants: Vec<QuantKey>,

        /// Context length in tokens [default: from configuration]
        #[arg(long)]
        context: Option<u32>,

        #[command(flatten)]
        host: HostArgs,
    },

    /// List the known quantization schemes
    Quants,

    /// Show detected host RAM and platform class
    Host,
}

/// Requested quantizations, falling back to the whole catalog.
pub fn quants_or_all(quants: Vec<QuantKey>) -> Vec<QuantKey> {
    if quants.is_empty() {
        QuantKey::ALL.to_vec()
    } else {
        quants
    }
}
