// src/events.rs
//! Machine-readable event logging for audit trails.
//!
//! Events are appended as JSON lines to the path configured in
//! `[preferences] event_log`. Digests let a fleet compare converged files.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    RunStarted {
        base: Option<String>,
        dry_run: bool,
    },
    OpApplied {
        label: String,
        path: String,
        sha256: String,
    },
    OpSkipped {
        label: String,
    },
    OpDrifted {
        label: String,
        path: String,
    },
    OpFailed {
        label: String,
        error: String,
    },
    RepairPerformed {
        label: String,
        path: String,
        before: usize,
        after: usize,
    },
    RunFinished {
        applied: usize,
        skipped: usize,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RetrofixEvent {
    pub timestamp: u64,
    pub kind: EventKind,
}

#[derive(Debug, Clone)]
pub struct EventLogger {
    log_path: PathBuf,
}

impl EventLogger {
    #[must_use]
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    pub fn log(&self, kind: EventKind) {
        // Logging is best-effort. We swallow errors to avoid crashing main flow.
        if let Ok(json) = Self::serialize_event(kind) {
            let _ = self.append_to_file(&json);
        }
    }

    fn serialize_event(kind: EventKind) -> Result<String> {
        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let event = RetrofixEvent { timestamp, kind };
        Ok(serde_json::to_string(&event)?)
    }

    fn append_to_file(&self, line: &str) -> Result<()> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

#[must_use]
pub fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}
