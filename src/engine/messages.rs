// src/engine/messages.rs
//! Console lines for per-operation outcomes.
//!
//! The prefixes are a contract with the scripts that drive a run: they grep
//! for `Applied:`, `WARN:` and `ERROR:`.

use colored::Colorize;

#[must_use]
pub fn applied_line(label: &str, dry_run: bool) -> String {
    if dry_run {
        format!("Would apply: {label}")
    } else {
        format!("Applied: {label}")
    }
}

#[must_use]
pub fn drift_line(label: &str) -> String {
    format!("WARN: {label} — pattern not found (code may have changed)")
}

#[must_use]
pub fn error_line(label: &str, detail: &str) -> String {
    format!("ERROR: {label} — {detail}")
}

#[must_use]
pub fn repaired_line(label: &str, before: usize, after: usize, dry_run: bool) -> String {
    let head = applied_line(label, dry_run);
    format!("{head} (collapsed {before} duplicate blocks to {after})")
}

#[must_use]
pub fn repair_failed_line(label: &str, detail: &str) -> String {
    format!("WARN: {label} — repair failed: {detail}")
}

pub fn print_applied(line: &str) {
    println!("  {}", line.green());
}

pub fn print_warning(line: &str) {
    println!("  {}", line.yellow());
}

pub fn print_error(line: &str) {
    println!("  {}", line.red());
}
