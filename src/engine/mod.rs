// src/engine/mod.rs
//! The patch application engine.
//!
//! Every operation is void-returning from the driver's point of view: it
//! never raises, it prints at most one line, and it reports what happened
//! through an [`Outcome`] or [`RepairResult`] for callers that care.

pub mod context;
pub mod messages;
pub mod repair;
pub mod replace;
pub mod target_io;
pub mod types;

pub use self::context::{RunContext, RunOptions, RunSummary};
pub use self::repair::{collapse_duplicates, repair, BlockShape, DEFAULT_MAX_LINES};
pub use self::replace::{apply, apply_all, strip};
pub use self::types::{Mode, Outcome, PatchDescriptor, RepairResult};
