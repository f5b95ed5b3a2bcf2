//! Limbrig CLI - Command-line interface for the bendy limb rig generator
//!
//! This binary builds IK-spline squash/stretch limbs on skeleton description
//! files, checks their preconditions and inspects the live network.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use limbrig_cli::commands;
use limbrig_cli::commands::inspect::SignalOverrides;
use limbrig_cli::input::LimbArgs;

/// Limbrig - Bendy Limb Rig Generator
#[derive(Parser)]
#[command(name = "limbrig")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log generator progress at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a bendy limb on the selection of a skeleton description
    Build {
        #[command(flatten)]
        limb: LimbArgs,

        /// Path to a build config file (JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Write the generated subtree manifest to this path
        #[arg(short, long)]
        output: Option<String>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Check the build preconditions without building anything
    Validate {
        #[command(flatten)]
        limb: LimbArgs,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Build a limb, override its signals and print the live skin joint values
    Inspect {
        #[command(flatten)]
        limb: LimbArgs,

        /// Path to a build config file (JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Stretch ratio of the FK root
        #[arg(long)]
        stretch: Option<f64>,

        /// Master uniform scale
        #[arg(long)]
        scale: Option<f64>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Build {
            limb,
            config,
            output,
            json,
        } => commands::build::run(&limb, config.as_deref(), output.as_deref(), json),
        Commands::Validate { limb, json } => commands::validate::run(&limb, json),
        Commands::Inspect {
            limb,
            config,
            stretch,
            scale,
            json,
        } => commands::inspect::run(
            &limb,
            config.as_deref(),
            SignalOverrides { stretch, scale },
            json,
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
