// src/bin/retrofix.rs
use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use retrofix_core::cli::handlers;
use retrofix_core::cli::{Cli, Commands};
use retrofix_core::exit::RetrofixExit;

fn main() -> RetrofixExit {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            RetrofixExit::Error
        }
    }
}

fn run() -> Result<RetrofixExit> {
    let cli = Cli::parse();
    let config = handlers::load_config(&cli)?;

    match &cli.command {
        Commands::Patch { dry_run, only } => handlers::handle_patch(&config, *dry_run, only),
        Commands::Check { only } => handlers::handle_check(&config, only),
        Commands::List { json } => handlers::handle_list(&config, *json),
    }
}
