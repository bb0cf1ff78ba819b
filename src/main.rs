//! LuaLive - push Lua code to running runtimes over TCP.

#![allow(dead_code)]

mod actor;
mod cli;
mod config;
mod core;
mod logger;
mod protocol;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::LiveConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = LiveConfig::load(&cli)?;

    match &cli.command {
        Commands::Serve { .. } => cli::serve::serve(&config),
        Commands::Client { args } => cli::client::run_client(args, &config),
    }
}
