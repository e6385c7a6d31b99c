// src/check.rs
//! Verifies that an installation carries the expected patched text.
//!
//! Sentinel files for the CLI package are relative to its `dist/src`
//! directory; files for other packages are relative to that package's root.

use crate::descriptor::Sentinel;
use crate::discovery::PatchEntry;
use crate::targets::Targets;
use colored::Colorize;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelStatus {
    Pass,
    /// Check did not hold, or the file exists but cannot be read.
    Fail,
    /// The package or file is not installed here.
    Missing,
}

#[derive(Debug, Clone)]
pub struct SentinelResult {
    pub sentinel: Sentinel,
    pub status: SentinelStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchStatus {
    Ok,
    Failed,
    Skipped,
}

#[derive(Debug, Clone)]
pub struct PatchCheck {
    pub id: String,
    pub results: Vec<SentinelResult>,
}

impl PatchCheck {
    #[must_use]
    pub fn status(&self) -> PatchStatus {
        if self.results.iter().any(|r| r.status == SentinelStatus::Fail) {
            PatchStatus::Failed
        } else if self.results.iter().any(|r| r.status == SentinelStatus::Pass) {
            PatchStatus::Ok
        } else {
            PatchStatus::Skipped
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub patches: Vec<PatchCheck>,
}

impl CheckReport {
    #[must_use]
    pub fn failed(&self) -> usize {
        self.patches
            .iter()
            .filter(|p| p.status() == PatchStatus::Failed)
            .count()
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.failed() == 0
    }
}

/// Evaluates every patch's sentinels. Read-only, so patches are checked in
/// parallel; report order follows `patches`.
#[must_use]
pub fn check(targets: &Targets, patches: &[&PatchEntry]) -> CheckReport {
    let patches = patches
        .par_iter()
        .map(|patch| PatchCheck {
            id: patch.id.clone(),
            results: check_patch(targets, patch),
        })
        .collect();
    CheckReport { patches }
}

fn check_patch(targets: &Targets, patch: &PatchEntry) -> Vec<SentinelResult> {
    let root = sentinel_root(targets, patch.package.as_deref());
    patch
        .sentinels
        .iter()
        .map(|sentinel| SentinelResult {
            status: evaluate(root.as_ref(), sentinel),
            sentinel: sentinel.clone(),
        })
        .collect()
}

fn sentinel_root(targets: &Targets, package: Option<&str>) -> Option<PathBuf> {
    let is_cli = package.map_or(true, |p| p.rsplit('/').next() == Some("cli"));
    if is_cli {
        targets.base().map(PathBuf::from)
    } else {
        targets.package_root(package)
    }
}

fn evaluate(root: Option<&PathBuf>, sentinel: &Sentinel) -> SentinelStatus {
    let (pattern, file, want_present) = match sentinel {
        Sentinel::None => return SentinelStatus::Pass,
        Sentinel::Grep { pattern, file } => (pattern, file, true),
        Sentinel::Absent { pattern, file } => (pattern, file, false),
    };

    let Some(root) = root else {
        return SentinelStatus::Missing;
    };
    let content = match fs::read_to_string(root.join(file)) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return SentinelStatus::Missing,
        Err(_) => return SentinelStatus::Fail,
    };

    if content.contains(pattern.as_str()) == want_present {
        SentinelStatus::Pass
    } else {
        SentinelStatus::Fail
    }
}

/// Prints one line per patch, then the tally.
pub fn print_report(report: &CheckReport) {
    for patch in &report.patches {
        match patch.status() {
            PatchStatus::Ok => println!("  {}   {}", "ok".green(), patch.id),
            PatchStatus::Skipped => println!("  {} {}", "skip".dimmed(), patch.id),
            PatchStatus::Failed => {
                println!("  {} {}", "FAIL".red().bold(), patch.id);
                for result in patch.results.iter().filter(|r| r.status == SentinelStatus::Fail) {
                    println!("       {}", describe(&result.sentinel).dimmed());
                }
            }
        }
    }

    let failed = report.failed();
    if failed == 0 {
        println!("{}", "All sentinels passed.".green().bold());
    } else {
        println!("{}", format!("{failed} patch(es) failed verification.").red().bold());
    }
}

fn describe(sentinel: &Sentinel) -> String {
    match sentinel {
        Sentinel::Grep { pattern, file } => format!("grep \"{pattern}\" {file}"),
        Sentinel::Absent { pattern, file } => format!("absent \"{pattern}\" {file}"),
        Sentinel::None => "none".to_string(),
    }
}
