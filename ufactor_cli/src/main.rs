//! # UFactor CLI
//!
//! Command-line front end for the material catalog and project files.
//!
//! ```text
//! ufactor materials list --category Insulation
//! ufactor project new house
//! ufactor project add-layer house --material "Mineral Wool" --thickness 100
//! ufactor project show house
//! ```

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ufactor_core::config::AppConfig;

use crate::cli::{Cli, Command};
use crate::commands::Context;

fn main() {
    let cli = Cli::parse();

    // Log to stderr so JSON output on stdout stays clean
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load()?;
    let mut ctx = Context::open(config, cli.catalog)?;

    match cli.command {
        Command::Materials(command) => commands::run_materials(&mut ctx, command),
        Command::Project(command) => commands::run_project(&mut ctx, command),
    }
}
