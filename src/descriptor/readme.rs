// src/descriptor/readme.rs
//! Metadata parsed from a patch's `README.md`.
//!
//! Expected format:
//! ```text
//! # {ID}: {title}
//! **Severity**: {severity}
//! **GitHub**: [{label}]({url})
//! ## Files Patched
//! - {file}
//! ## Ops
//! {N} op(s) in fix.toml
//! ```

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s+(\S+):\s+(.+)").unwrap_or_else(|_| panic!("Invalid Regex")));
static SEVERITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*Severity\*\*:\s*(\S+)").unwrap_or_else(|_| panic!("Invalid Regex")));
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap_or_else(|_| panic!("Invalid Regex")));
static FILES_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^##\s+Files Patched").unwrap_or_else(|_| panic!("Invalid Regex")));
static FILE_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\s+`?([^`\n]+)`?\s*$").unwrap_or_else(|_| panic!("Invalid Regex")));
static OPS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)\s+ops?\b").unwrap_or_else(|_| panic!("Invalid Regex")));
static ORDER_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)-").unwrap_or_else(|_| panic!("Invalid Regex")));

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatchMeta {
    pub id: String,
    pub title: String,
    pub severity: String,
    pub github: String,
    pub github_url: String,
    pub files: Vec<String>,
    pub ops: usize,
}

impl PatchMeta {
    /// Metadata for a patch without a README: derived from the directory name.
    #[must_use]
    pub fn from_dir_name(dir_name: &str) -> Self {
        Self {
            id: fallback_id(dir_name),
            severity: "Unknown".to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn parse(text: &str, dir_name: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();

        let title_caps = lines.first().and_then(|l| TITLE_RE.captures(l));
        let id = title_caps
            .as_ref()
            .map_or_else(|| fallback_id(dir_name), |c| c[1].to_string());
        let title = title_caps
            .as_ref()
            .map(|c| c[2].trim().to_string())
            .unwrap_or_default();

        let severity = lines
            .iter()
            .find(|l| l.starts_with("**Severity**"))
            .and_then(|l| SEVERITY_RE.captures(l))
            .map_or_else(|| "Unknown".to_string(), |c| c[1].to_string());

        let (github, github_url) = lines
            .iter()
            .find(|l| l.starts_with("**GitHub**"))
            .and_then(|l| LINK_RE.captures(l))
            .map(|c| (c[1].to_string(), c[2].to_string()))
            .unwrap_or_default();

        let ops = lines
            .iter()
            .find_map(|l| OPS_RE.captures(l))
            .and_then(|c| c[1].parse().ok())
            .unwrap_or(0);

        Self {
            id,
            title,
            severity,
            github,
            github_url,
            files: files_patched(&lines),
            ops,
        }
    }
}

fn files_patched(lines: &[&str]) -> Vec<String> {
    let Some(header) = lines.iter().position(|l| FILES_HEADER_RE.is_match(l)) else {
        return Vec::new();
    };

    let mut files = Vec::new();
    for line in &lines[header + 1..] {
        if let Some(caps) = FILE_ITEM_RE.captures(line) {
            files.push(caps[1].trim().to_string());
        } else if line.starts_with('#') || (line.trim().is_empty() && !files.is_empty()) {
            break;
        }
    }
    files
}

/// Directory name without its numeric execution-order prefix.
#[must_use]
pub fn strip_order(dir_name: &str) -> &str {
    ORDER_PREFIX_RE
        .find(dir_name)
        .map_or(dir_name, |m| &dir_name[m.end()..])
}

/// Numeric execution-order prefix of a directory name, if any.
#[must_use]
pub fn order_of(dir_name: &str) -> Option<u32> {
    ORDER_PREFIX_RE
        .captures(dir_name)
        .and_then(|c| c[1].parse().ok())
}

fn fallback_id(dir_name: &str) -> String {
    strip_order(dir_name)
        .split('-')
        .take(2)
        .collect::<Vec<_>>()
        .join("-")
}
