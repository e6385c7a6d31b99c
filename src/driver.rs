// src/driver.rs
//! Runs an ordered patch list through the engine.
//!
//! A patch that cannot be loaded is reported and skipped; it never stops
//! the patches after it.

use crate::descriptor::{FixFile, FixOp};
use crate::discovery::PatchEntry;
use crate::engine::{self, messages, BlockShape, Outcome, RepairResult, RunContext, RunSummary};
use crate::events::EventKind;
use crate::targets::Targets;
use colored::Colorize;

/// What one op did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpResult {
    Patched(Outcome),
    Repaired(RepairResult),
}

/// Aggregate of a whole run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub summary: RunSummary,
    pub drifted: usize,
    pub failed: usize,
    pub unavailable: usize,
    pub repaired: usize,
    /// Patches whose `fix.toml` could not be loaded: (id, error).
    pub broken: Vec<(String, String)>,
}

impl RunReport {
    fn record(&mut self, result: &OpResult) {
        match result {
            OpResult::Patched(Outcome::Drifted) => self.drifted += 1,
            OpResult::Patched(Outcome::IoError(_)) => self.failed += 1,
            OpResult::Patched(Outcome::TargetUnavailable) => self.unavailable += 1,
            OpResult::Repaired(r) if r.changed => self.repaired += 1,
            OpResult::Patched(_) | OpResult::Repaired(_) => {}
        }
    }

    #[must_use]
    pub fn has_broken(&self) -> bool {
        !self.broken.is_empty()
    }
}

/// Applies every patch in order.
pub fn run(ctx: &mut RunContext, targets: &Targets, patches: &[&PatchEntry]) -> RunReport {
    ctx.log_event(EventKind::RunStarted {
        base: targets.base().map(|b| b.display().to_string()),
        dry_run: ctx.is_dry_run(),
    });

    let mut report = RunReport::default();
    for patch in patches.iter().filter(|p| p.has_fix) {
        run_patch(ctx, targets, patch, &mut report);
    }

    report.summary = ctx.summary();
    ctx.log_event(EventKind::RunFinished {
        applied: report.summary.applied,
        skipped: report.summary.skipped,
    });
    report
}

fn run_patch(ctx: &mut RunContext, targets: &Targets, patch: &PatchEntry, report: &mut RunReport) {
    let loaded = FixFile::load(&patch.path).and_then(|fix| {
        fix.validate(targets, &patch.id)?;
        Ok(fix)
    });

    let fix = match loaded {
        Ok(fix) => fix,
        Err(e) => {
            messages::print_error(&messages::error_line(&patch.id, &e.to_string()));
            report.broken.push((patch.id.clone(), e.to_string()));
            return;
        }
    };

    if !ctx.options().quiet {
        print_header(patch);
    }
    for op in &fix.ops {
        let result = run_op(ctx, targets, op);
        report.record(&result);
    }
}

/// Issues one op against the engine.
pub fn run_op(ctx: &mut RunContext, targets: &Targets, op: &FixOp) -> OpResult {
    let target = targets.resolve(op.target());
    match op {
        FixOp::Replace { .. } | FixOp::ReplaceAll { .. } => OpResult::Patched(
            op.to_descriptor(targets)
                .map_or(Outcome::TargetUnavailable, |d| d.apply(ctx)),
        ),
        FixOp::Strip { label, block, .. } => {
            OpResult::Patched(engine::strip(ctx, label, target.as_deref(), block))
        }
        FixOp::Repair {
            label,
            signature,
            statement,
            max_lines,
            ..
        } => match BlockShape::new(signature.as_str(), statement, *max_lines) {
            Ok(shape) => OpResult::Repaired(engine::repair(ctx, label, target.as_deref(), &shape)),
            Err(e) => {
                ctx.record_repair_failure(label, &e.to_string());
                OpResult::Repaired(RepairResult::default())
            }
        },
    }
}

fn print_header(patch: &PatchEntry) {
    if patch.title.is_empty() {
        println!("{}", format!("[{}]", patch.id).cyan().bold());
    } else {
        println!("{} {}", format!("[{}]", patch.id).cyan().bold(), patch.title);
    }
}

/// Prints the end-of-run summary.
pub fn print_report(report: &RunReport) {
    println!("{}", "-".repeat(50).dimmed());
    println!("{}", report.summary.to_string().bold());
    if report.drifted > 0 {
        println!("{}", format!("{} patch(es) drifted", report.drifted).yellow());
    }
    if report.failed > 0 {
        println!("{}", format!("{} I/O error(s)", report.failed).red());
    }
    if report.repaired > 0 {
        println!("{}", format!("{} file(s) repaired", report.repaired).green());
    }
    for (id, err) in &report.broken {
        println!("{} {id}: {err}", "broken patch".red());
    }
}
