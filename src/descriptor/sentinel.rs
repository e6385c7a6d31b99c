// src/descriptor/sentinel.rs
//! Post-apply verification lines.
//!
//! Each line of a `sentinel` file is one of:
//! - `package: <name>` target package (default: the CLI package)
//! - `grep "<pattern>" <file>` pass if pattern found
//! - `absent "<pattern>" <file>` pass if pattern NOT found
//! - `none` skip verification

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub const SENTINEL_FILE: &str = "sentinel";

static ABSENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^absent\s+"(.+)"\s+(.+)$"#).unwrap_or_else(|_| panic!("Invalid Regex")));
static GREP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^grep\s+"(.+)"\s+(.+)$"#).unwrap_or_else(|_| panic!("Invalid Regex")));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Sentinel {
    Grep { pattern: String, file: String },
    Absent { pattern: String, file: String },
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentinelFile {
    pub package: Option<String>,
    pub sentinels: Vec<Sentinel>,
}

impl SentinelFile {
    /// Unrecognized lines are ignored.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut out = Self::default();

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if let Some(pkg) = line.strip_prefix("package:") {
                out.package = Some(pkg.trim().to_string());
            } else if line == "none" {
                out.sentinels.push(Sentinel::None);
            } else if let Some(c) = ABSENT_RE.captures(line) {
                out.sentinels.push(Sentinel::Absent {
                    pattern: c[1].to_string(),
                    file: c[2].trim().to_string(),
                });
            } else if let Some(c) = GREP_RE.captures(line) {
                out.sentinels.push(Sentinel::Grep {
                    pattern: c[1].to_string(),
                    file: c[2].trim().to_string(),
                });
            }
        }
        out
    }
}
