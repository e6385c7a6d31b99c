// src/descriptor/mod.rs
//! On-disk patch descriptors.
//!
//! A patch directory holds `fix.toml` (the ordered ops), `README.md`
//! (human metadata) and optionally `sentinel` (post-apply checks).

pub mod readme;
pub mod sentinel;

pub use self::readme::PatchMeta;
pub use self::sentinel::{Sentinel, SentinelFile};

use crate::engine::{BlockShape, Mode, PatchDescriptor, DEFAULT_MAX_LINES};
use crate::error::{Result, RetrofixError};
use crate::targets::Targets;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const FIX_FILE: &str = "fix.toml";

/// One operation in a `fix.toml`, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FixOp {
    Replace {
        label: String,
        target: String,
        old: String,
        new: String,
    },
    ReplaceAll {
        label: String,
        target: String,
        old: String,
        new: String,
    },
    Strip {
        label: String,
        target: String,
        block: String,
    },
    Repair {
        label: String,
        target: String,
        signature: String,
        statement: String,
        #[serde(default = "default_max_lines")]
        max_lines: usize,
    },
}

const fn default_max_lines() -> usize {
    DEFAULT_MAX_LINES
}

impl FixOp {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Replace { label, .. }
            | Self::ReplaceAll { label, .. }
            | Self::Strip { label, .. }
            | Self::Repair { label, .. } => label,
        }
    }

    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Replace { target, .. }
            | Self::ReplaceAll { target, .. }
            | Self::Strip { target, .. }
            | Self::Repair { target, .. } => target,
        }
    }

    /// Builds the engine descriptor for `replace` / `replace_all` ops.
    #[must_use]
    pub fn to_descriptor(&self, targets: &Targets) -> Option<PatchDescriptor> {
        let (label, target, old, new, mode) = match self {
            Self::Replace {
                label,
                target,
                old,
                new,
            } => (label, target, old, new, Mode::First),
            Self::ReplaceAll {
                label,
                target,
                old,
                new,
            } => (label, target, old, new, Mode::All),
            Self::Strip { .. } | Self::Repair { .. } => return None,
        };
        Some(PatchDescriptor {
            label: label.clone(),
            target: targets.resolve(target),
            old: old.clone(),
            new: new.clone(),
            mode,
        })
    }

    fn validate(&self, targets: &Targets, patch: &str) -> Result<()> {
        let invalid = |reason: String| RetrofixError::Descriptor {
            patch: patch.to_string(),
            reason,
        };

        if self.label().is_empty() {
            return Err(invalid("op with empty label".into()));
        }
        if !targets.is_known(self.target()) {
            return Err(RetrofixError::UnknownTarget {
                patch: patch.to_string(),
                key: self.target().to_string(),
            });
        }

        let label = self.label();
        match self {
            Self::Replace { old, new, .. } | Self::ReplaceAll { old, new, .. } => {
                if old.is_empty() || new.is_empty() {
                    return Err(invalid(format!("{label}: old and new must be non-empty")));
                }
                if old == new {
                    return Err(invalid(format!("{label}: old and new are identical")));
                }
            }
            Self::Strip { block, .. } if block.is_empty() => {
                return Err(invalid(format!("{label}: empty block")));
            }
            Self::Repair {
                signature,
                statement,
                max_lines,
                ..
            } => {
                if signature.is_empty() {
                    return Err(invalid(format!("{label}: empty signature")));
                }
                if *max_lines == 0 {
                    return Err(invalid(format!("{label}: max_lines must be positive")));
                }
                BlockShape::new(signature.as_str(), statement, *max_lines)?;
            }
            Self::Strip { .. } => {}
        }
        Ok(())
    }
}

/// Parsed contents of a `fix.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixFile {
    #[serde(default)]
    pub ops: Vec<FixOp>,
}

impl FixFile {
    /// Loads `fix.toml` from a patch directory.
    ///
    /// # Errors
    /// Returns error if the file is unreadable or malformed.
    pub fn load(patch_dir: &Path) -> Result<Self> {
        let path = patch_dir.join(FIX_FILE);
        let content = fs::read_to_string(&path).map_err(|e| RetrofixError::io(e, &path))?;
        toml::from_str(&content).map_err(|source| RetrofixError::Toml { source, path })
    }

    /// Checks every op against the target table before anything runs.
    ///
    /// # Errors
    /// Returns the first invalid op.
    pub fn validate(&self, targets: &Targets, patch: &str) -> Result<()> {
        self.ops.iter().try_for_each(|op| op.validate(targets, patch))
    }
}
