// src/engine/types.rs
use super::context::RunContext;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What a single patch operation did to its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The replacement was written (or would have been, in dry-run mode).
    Applied,
    /// The post-condition already holds; nothing was written.
    AlreadySatisfied,
    /// No path was resolved, or nothing exists at the resolved path.
    TargetUnavailable,
    /// Neither the old nor the new fragment is present.
    Drifted,
    /// Reading or writing failed for a reason other than a missing file.
    IoError(String),
}

impl Outcome {
    #[must_use]
    pub fn wrote(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Replacement scope of a patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    First,
    All,
}

/// One textual fix, fully resolved against the installation.
#[derive(Debug, Clone)]
pub struct PatchDescriptor {
    pub label: String,
    pub target: Option<PathBuf>,
    pub old: String,
    pub new: String,
    pub mode: Mode,
}

impl PatchDescriptor {
    pub fn apply(&self, ctx: &mut RunContext) -> Outcome {
        let target = self.target.as_deref();
        match self.mode {
            Mode::First => super::apply(ctx, &self.label, target, &self.old, &self.new),
            Mode::All => super::apply_all(ctx, &self.label, target, &self.old, &self.new),
        }
    }
}

/// Result of a corruption-repair sweep. Counts are occurrences of the
/// block signature before and after the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepairResult {
    pub changed: bool,
    pub before: usize,
    pub after: usize,
}

impl RepairResult {
    #[must_use]
    pub fn unchanged(count: usize) -> Self {
        Self {
            changed: false,
            before: count,
            after: count,
        }
    }
}
