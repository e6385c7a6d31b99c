// src/cli/handlers.rs
//! Command handlers.

use super::args::Cli;
use crate::check;
use crate::config::Config;
use crate::discovery::{self, PatchEntry};
use crate::driver;
use crate::engine::{RunContext, RunOptions};
use crate::events::EventLogger;
use crate::exit::RetrofixExit;
use crate::targets::Targets;
use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;

/// Builds the effective config: file, then environment, then flags.
///
/// # Errors
/// Returns error if the config file is unreadable or invalid.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    config.apply_env();
    if let Some(base) = &cli.base {
        config.paths.base = Some(base.clone());
    }
    if let Some(dir) = &cli.patch_dir {
        config.paths.patch_dir = dir.clone();
    }
    if cli.quiet {
        config.preferences.quiet = true;
    }
    Ok(config)
}

/// Handles the patch command.
///
/// # Errors
/// Returns error if the patch directory cannot be scanned.
pub fn handle_patch(config: &Config, dry_run: bool, only: &[String]) -> Result<RetrofixExit> {
    let patches = discover(config)?;
    let Some(selected) = select(&patches, only) else {
        return Ok(RetrofixExit::InvalidInput);
    };

    let targets = Targets::from_config(config);
    print_targets(&targets);

    let options = RunOptions {
        dry_run: dry_run || config.preferences.dry_run,
        quiet: config.preferences.quiet,
    };
    let events = config.preferences.event_log.as_ref().map(EventLogger::new);
    let mut ctx = RunContext::new().with_options(options).with_events(events);

    let report = driver::run(&mut ctx, &targets, &selected);
    driver::print_report(&report);

    Ok(if report.has_broken() {
        RetrofixExit::Error
    } else {
        RetrofixExit::Success
    })
}

/// Handles the check command.
///
/// # Errors
/// Returns error if the patch directory cannot be scanned.
pub fn handle_check(config: &Config, only: &[String]) -> Result<RetrofixExit> {
    let patches = discover(config)?;
    let Some(selected) = select(&patches, only) else {
        return Ok(RetrofixExit::InvalidInput);
    };

    let targets = Targets::from_config(config);
    print_targets(&targets);

    let report = check::check(&targets, &selected);
    check::print_report(&report);

    Ok(if report.passed() {
        RetrofixExit::Success
    } else {
        RetrofixExit::CheckFailed
    })
}

/// Handles the list command.
///
/// # Errors
/// Returns error if discovery or JSON serialization fails.
pub fn handle_list(config: &Config, as_json: bool) -> Result<RetrofixExit> {
    let patches = discover(config)?;

    if as_json {
        let doc = json!({
            "patches": patches,
            "stats": discovery::stats(&patches),
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(RetrofixExit::Success);
    }

    for p in &patches {
        let fix = if p.has_fix { "" } else { " (no fix.toml)" };
        println!(
            "{:<8} {:<10} {:<8} {}{}",
            p.order.map(|o| o.to_string()).unwrap_or_default(),
            p.id.cyan(),
            p.severity,
            p.title,
            fix.dimmed()
        );
    }
    let stats = discovery::stats(&patches);
    println!(
        "{}",
        format!("{} patches in {} categories", stats.total, stats.categories).dimmed()
    );
    Ok(RetrofixExit::Success)
}

fn discover(config: &Config) -> Result<Vec<PatchEntry>> {
    let dir = &config.paths.patch_dir;
    let patches = discovery::discover(dir)
        .with_context(|| format!("Failed to scan patch directory {}", dir.display()))?;
    if patches.is_empty() {
        eprintln!(
            "{}",
            format!("[WARN] No patches found in {}", dir.display()).yellow()
        );
    }
    Ok(patches)
}

/// `None` when an explicitly requested ID does not exist.
fn select<'a>(patches: &'a [PatchEntry], only: &[String]) -> Option<Vec<&'a PatchEntry>> {
    let selected = discovery::select(patches, only);
    let unknown: Vec<&String> = only
        .iter()
        .filter(|want| !selected.iter().any(|p| want.eq_ignore_ascii_case(&p.id) || **want == p.dir))
        .collect();

    if unknown.is_empty() {
        return Some(selected);
    }
    for want in unknown {
        eprintln!("{} unknown patch: {want}", "error:".red().bold());
    }
    None
}

fn print_targets(targets: &Targets) {
    match targets.base() {
        Some(base) => println!("Target: {}", base.display().to_string().cyan()),
        None => println!(
            "{}",
            "Target: none (package not found, all patches will skip)".yellow()
        ),
    }
}
