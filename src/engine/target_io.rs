// src/engine/target_io.rs
//! Whole-file read and overwrite for patch targets.

use std::fs;
use std::io;
use std::path::Path;

/// Reads the full target.
///
/// `Ok(None)` covers both "no path resolved" and "nothing at that path";
/// callers treat the two identically.
///
/// # Errors
/// Returns any read error other than `NotFound`.
pub fn read_target(target: Option<&Path>) -> io::Result<Option<(&Path, String)>> {
    let Some(path) = target.filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(None);
    };
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some((path, content))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Overwrites the target, unless this is a dry run.
///
/// # Errors
/// Returns the underlying write error.
pub fn write_target(path: &Path, content: &str, dry_run: bool) -> io::Result<()> {
    if dry_run {
        return Ok(());
    }
    fs::write(path, content)
}
