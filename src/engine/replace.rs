// src/engine/replace.rs
//! Literal, idempotent replacement of text fragments in target files.
//!
//! Decision order for every call:
//! 1. no target / missing file: silent no-op
//! 2. unreadable target: `ERROR:` line
//! 3. post-condition already holds: counted as skipped
//! 4. old fragment absent: `WARN:` drift line, no write
//! 5. otherwise: replace, write, counted as applied

use super::context::RunContext;
use super::target_io::{read_target, write_target};
use super::types::Outcome;
use std::path::Path;

/// Replaces the first occurrence of `old` with `new`.
///
/// Any file that already contains `new` counts as patched, even if `old`
/// also remains elsewhere.
pub fn apply(ctx: &mut RunContext, label: &str, target: Option<&Path>, old: &str, new: &str) -> Outcome {
    let (path, code) = match read_target(target) {
        Ok(Some(loaded)) => loaded,
        Ok(None) => return Outcome::TargetUnavailable,
        Err(e) => return ctx.record_failure(label, &e.to_string()),
    };

    if code.contains(new) {
        return ctx.record_skipped(label);
    }
    let Some(start) = code.find(old) else {
        return ctx.record_drift(label, path);
    };

    let patched = perform_splice(&code, start, old, new);
    commit(ctx, label, path, &patched)
}

/// Replaces every non-overlapping occurrence of `old` with `new`.
///
/// Only short-circuits when there is nothing left to convert, so a file
/// with some sites already converted is finished rather than skipped.
pub fn apply_all(ctx: &mut RunContext, label: &str, target: Option<&Path>, old: &str, new: &str) -> Outcome {
    let (path, code) = match read_target(target) {
        Ok(Some(loaded)) => loaded,
        Ok(None) => return Outcome::TargetUnavailable,
        Err(e) => return ctx.record_failure(label, &e.to_string()),
    };

    let has_old = code.contains(old);
    if code.contains(new) && !has_old {
        return ctx.record_skipped(label);
    }
    if !has_old {
        return ctx.record_drift(label, path);
    }

    let patched = code.replace(old, new);
    commit(ctx, label, path, &patched)
}

/// Removes every occurrence of a stale literal block left by older runs.
pub fn strip(ctx: &mut RunContext, label: &str, target: Option<&Path>, block: &str) -> Outcome {
    let (path, code) = match read_target(target) {
        Ok(Some(loaded)) => loaded,
        Ok(None) => return Outcome::TargetUnavailable,
        Err(e) => return ctx.record_failure(label, &e.to_string()),
    };

    if !code.contains(block) {
        return ctx.record_skipped(label);
    }

    let cleaned = code.replace(block, "");
    commit(ctx, label, path, &cleaned)
}

fn commit(ctx: &mut RunContext, label: &str, path: &Path, content: &str) -> Outcome {
    match write_target(path, content, ctx.is_dry_run()) {
        Ok(()) => ctx.record_applied(label, path, content),
        Err(e) => ctx.record_failure(label, &e.to_string()),
    }
}

fn perform_splice(content: &str, start: usize, search: &str, replace: &str) -> String {
    let end = start + search.len();
    let new_len = content.len() + replace.len().saturating_sub(search.len());
    let mut result = String::with_capacity(new_len);

    result.push_str(&content[..start]);
    result.push_str(replace);
    result.push_str(&content[end..]);

    result
}
