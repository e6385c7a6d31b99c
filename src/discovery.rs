// src/discovery.rs
//! Scans a patch directory into an ordered patch list.
//!
//! Directory names sort into execution order, and that order is the only
//! encoding of which patch builds on which.

use crate::descriptor::readme::{order_of, strip_order};
use crate::descriptor::sentinel::SENTINEL_FILE;
use crate::descriptor::{PatchMeta, Sentinel, SentinelFile, FIX_FILE};
use crate::error::{Result, RetrofixError};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

const README_FILE: &str = "README.md";

static ID_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+-\d+-").unwrap_or_else(|_| panic!("Invalid Regex")));

#[derive(Debug, Clone, Serialize)]
pub struct PatchEntry {
    pub id: String,
    pub order: Option<u32>,
    pub slug: String,
    pub dir: String,
    #[serde(skip)]
    pub path: PathBuf,
    pub title: String,
    pub severity: String,
    pub github: String,
    pub github_url: String,
    pub prefix: String,
    pub files: Vec<String>,
    pub ops: usize,
    pub has_fix: bool,
    pub package: Option<String>,
    pub sentinels: Vec<Sentinel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryStats {
    pub total: usize,
    pub categories: usize,
}

/// Runs discovery.
///
/// # Errors
/// Returns error if the directory exists but cannot be walked, or a
/// metadata file cannot be read.
pub fn discover(patch_dir: &Path) -> Result<Vec<PatchEntry>> {
    if !patch_dir.is_dir() {
        return Ok(Vec::new());
    }

    let walker = WalkDir::new(patch_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    let mut patches = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if let Some(patch) = load_entry(entry.path())? {
            patches.push(patch);
        }
    }
    Ok(patches)
}

fn load_entry(dir: &Path) -> Result<Option<PatchEntry>> {
    let readme = dir.join(README_FILE);
    let has_fix = dir.join(FIX_FILE).is_file();
    if !readme.is_file() && !has_fix {
        return Ok(None);
    }

    let dir_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let meta = if readme.is_file() {
        PatchMeta::parse(&read(&readme)?, &dir_name)
    } else {
        PatchMeta::from_dir_name(&dir_name)
    };

    let sentinel_path = dir.join(SENTINEL_FILE);
    let sentinel = if sentinel_path.is_file() {
        SentinelFile::parse(&read(&sentinel_path)?)
    } else {
        SentinelFile::default()
    };

    let prefix = meta.id.split('-').next().unwrap_or_default().to_string();
    let slug = ID_PREFIX_RE.replace(strip_order(&dir_name), "").into_owned();

    Ok(Some(PatchEntry {
        order: order_of(&dir_name),
        slug,
        dir: dir_name,
        path: dir.to_path_buf(),
        prefix,
        id: meta.id,
        title: meta.title,
        severity: meta.severity,
        github: meta.github,
        github_url: meta.github_url,
        files: meta.files,
        ops: meta.ops,
        has_fix,
        package: sentinel.package,
        sentinels: sentinel.sentinels,
    }))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| RetrofixError::io(e, path))
}

#[must_use]
pub fn stats(patches: &[PatchEntry]) -> DiscoveryStats {
    let categories: BTreeSet<&str> = patches.iter().map(|p| p.prefix.as_str()).collect();
    DiscoveryStats {
        total: patches.len(),
        categories: categories.len(),
    }
}

/// Restricts a patch list to the given IDs or directory names, keeping
/// discovery order. An empty selection keeps everything.
#[must_use]
pub fn select<'a>(patches: &'a [PatchEntry], only: &[String]) -> Vec<&'a PatchEntry> {
    patches
        .iter()
        .filter(|p| {
            only.is_empty()
                || only
                    .iter()
                    .any(|want| want.eq_ignore_ascii_case(&p.id) || *want == p.dir)
        })
        .collect()
}
