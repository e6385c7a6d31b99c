// src/engine/context.rs
//! Per-run state threaded through every engine call.
//!
//! The `applied` and `skipped` counters are private: only the engine
//! operations in this module tree can move them.

use super::messages;
use super::types::Outcome;
use crate::events::{content_digest, EventKind, EventLogger};
use std::fmt;
use std::path::Path;

/// Runtime switches for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Compute outcomes without writing anything.
    pub dry_run: bool,
    /// Suppress per-operation console lines.
    pub quiet: bool,
}

/// End-of-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub applied: usize,
    pub skipped: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} applied, {} skipped", self.applied, self.skipped)
    }
}

#[derive(Debug, Default)]
pub struct RunContext {
    applied: usize,
    skipped: usize,
    options: RunOptions,
    events: Option<EventLogger>,
}

impl RunContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_events(mut self, events: Option<EventLogger>) -> Self {
        self.events = events;
        self
    }

    #[must_use]
    pub fn applied(&self) -> usize {
        self.applied
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    #[must_use]
    pub fn options(&self) -> RunOptions {
        self.options
    }

    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            applied: self.applied,
            skipped: self.skipped,
        }
    }

    /// Records a run-level event (start/finish) if an event log is attached.
    pub fn log_event(&self, kind: EventKind) {
        if let Some(events) = &self.events {
            events.log(kind);
        }
    }

    pub(super) fn record_applied(&mut self, label: &str, path: &Path, content: &str) -> Outcome {
        self.applied += 1;
        self.say(&messages::applied_line(label, self.options.dry_run), Severity::Ok);
        self.log_event(EventKind::OpApplied {
            label: label.to_string(),
            path: path.display().to_string(),
            sha256: content_digest(content),
        });
        Outcome::Applied
    }

    pub(super) fn record_skipped(&mut self, label: &str) -> Outcome {
        self.skipped += 1;
        self.log_event(EventKind::OpSkipped {
            label: label.to_string(),
        });
        Outcome::AlreadySatisfied
    }

    pub(super) fn record_drift(&mut self, label: &str, path: &Path) -> Outcome {
        self.say(&messages::drift_line(label), Severity::Warn);
        self.log_event(EventKind::OpDrifted {
            label: label.to_string(),
            path: path.display().to_string(),
        });
        Outcome::Drifted
    }

    pub(super) fn record_failure(&mut self, label: &str, detail: &str) -> Outcome {
        self.say(&messages::error_line(label, detail), Severity::Error);
        self.log_event(EventKind::OpFailed {
            label: label.to_string(),
            error: detail.to_string(),
        });
        Outcome::IoError(detail.to_string())
    }

    pub(super) fn record_repair(&mut self, label: &str, path: &Path, before: usize, after: usize) {
        self.applied += 1;
        let line = messages::repaired_line(label, before, after, self.options.dry_run);
        self.say(&line, Severity::Ok);
        self.log_event(EventKind::RepairPerformed {
            label: label.to_string(),
            path: path.display().to_string(),
            before,
            after,
        });
    }

    pub(crate) fn record_repair_failure(&mut self, label: &str, detail: &str) {
        self.say(&messages::repair_failed_line(label, detail), Severity::Warn);
        self.log_event(EventKind::OpFailed {
            label: label.to_string(),
            error: detail.to_string(),
        });
    }

    fn say(&self, line: &str, severity: Severity) {
        if self.options.quiet {
            return;
        }
        match severity {
            Severity::Ok => messages::print_applied(line),
            Severity::Warn => messages::print_warning(line),
            Severity::Error => messages::print_error(line),
        }
    }
}

#[derive(Clone, Copy)]
enum Severity {
    Ok,
    Warn,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_display() {
        let summary = RunSummary {
            applied: 3,
            skipped: 7,
        };
        assert_eq!(summary.to_string(), "3 applied, 7 skipped");
    }

    #[test]
    fn test_fresh_context_is_zeroed() {
        let ctx = RunContext::new();
        assert_eq!(ctx.summary(), RunSummary::default());
        assert!(!ctx.is_dry_run());
    }
}
