// src/engine/repair.rs
//! Collapses runs of identical, adjacent blocks left behind by older,
//! non-idempotent patch runs.
//!
//! A block is a signature line followed by up to `max_lines` statement
//! lines matching a narrow pattern. The file is split into text lines and
//! blocks; a block identical to the segment right before it is dropped.

use super::context::RunContext;
use super::target_io::{read_target, write_target};
use super::types::RepairResult;
use regex::Regex;
use std::io;
use std::path::Path;

pub const DEFAULT_MAX_LINES: usize = 64;

/// Declared shape of a repeatable block.
#[derive(Debug, Clone)]
pub struct BlockShape {
    signature: String,
    statement: Regex,
    max_lines: usize,
}

impl BlockShape {
    /// # Errors
    /// Returns error if `statement` is not a valid regex.
    pub fn new(
        signature: impl Into<String>,
        statement: &str,
        max_lines: usize,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            signature: signature.into(),
            statement: Regex::new(statement)?,
            max_lines,
        })
    }

    /// Occurrences of the signature substring anywhere in `content`.
    #[must_use]
    pub fn count(&self, content: &str) -> usize {
        content.matches(self.signature.as_str()).count()
    }

    fn starts_block(&self, line: &str) -> bool {
        line.trim_start().starts_with(&self.signature)
    }

    fn is_statement(&self, line: &str) -> bool {
        !self.starts_block(line) && self.statement.is_match(line.trim_end_matches(['\r', '\n']))
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Block(&'a str),
}

fn segments<'a>(content: &'a str, shape: &BlockShape) -> Vec<Segment<'a>> {
    let mut offset = 0;
    let lines: Vec<(usize, &str)> = content
        .split_inclusive('\n')
        .map(|line| {
            let start = offset;
            offset += line.len();
            (start, line)
        })
        .collect();

    let mut out = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let (start, line) = lines[i];
        if !shape.starts_block(line) {
            out.push(Segment::Text(line));
            i += 1;
            continue;
        }

        let mut end = start + line.len();
        let mut j = i + 1;
        while j < lines.len() && j - i <= shape.max_lines && shape.is_statement(lines[j].1) {
            end = lines[j].0 + lines[j].1.len();
            j += 1;
        }
        out.push(Segment::Block(&content[start..end]));
        i = j;
    }
    out
}

/// Drops every block that is byte-identical to the block immediately
/// before it. Text between blocks breaks a run.
///
/// The statement scan is greedy, so the last copy of a run can absorb
/// statement-shaped lines that follow it. Such a block still repeats the
/// previous one as a prefix; the prefix is dropped and the absorbed lines
/// are kept as text.
#[must_use]
pub fn collapse_duplicates(content: &str, shape: &BlockShape) -> String {
    let mut out = String::with_capacity(content.len());
    let mut previous: Option<&str> = None;

    for segment in segments(content, shape) {
        match segment {
            Segment::Block(text) if previous == Some(text) => {}
            Segment::Block(text) if previous.is_some_and(|prev| text.starts_with(prev)) => {
                let repeated = previous.map_or(0, str::len);
                out.push_str(&text[repeated..]);
                previous = None;
            }
            Segment::Block(text) => {
                out.push_str(text);
                previous = Some(text);
            }
            Segment::Text(text) => {
                out.push_str(text);
                previous = None;
            }
        }
    }
    out
}

/// Best-effort sweep of one target. Never fails the run: errors are
/// reported as a warning and yield `changed == false`.
pub fn repair(
    ctx: &mut RunContext,
    label: &str,
    target: Option<&Path>,
    shape: &BlockShape,
) -> RepairResult {
    match try_repair(ctx, label, target, shape) {
        Ok(result) => result,
        Err(e) => {
            ctx.record_repair_failure(label, &e.to_string());
            RepairResult::default()
        }
    }
}

fn try_repair(
    ctx: &mut RunContext,
    label: &str,
    target: Option<&Path>,
    shape: &BlockShape,
) -> io::Result<RepairResult> {
    let Some((path, code)) = read_target(target)? else {
        return Ok(RepairResult::default());
    };

    let before = shape.count(&code);
    if before < 2 {
        return Ok(RepairResult::unchanged(before));
    }

    let collapsed = collapse_duplicates(&code, shape);
    if collapsed == code {
        return Ok(RepairResult::unchanged(before));
    }

    let after = shape.count(&collapsed);
    write_target(path, &collapsed, ctx.is_dry_run())?;
    ctx.record_repair(label, path, before, after);

    Ok(RepairResult {
        changed: true,
        before,
        after,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    const BLOCK: &str = "// FIX-7: lazy loader\nlet loaderRef = undefined;\nasync function getLoader() {\n    return loaderRef;\n}\n";

    fn shape() -> BlockShape {
        BlockShape::new(
            "// FIX-7: lazy loader",
            r"^(?:let |async function |    |\}$)",
            DEFAULT_MAX_LINES,
        )
        .unwrap()
    }

    #[test]
    fn test_segments_split_block_from_text() {
        let content = format!("head\n{BLOCK}tail\n");
        let segs = segments(&content, &shape());
        assert_eq!(
            segs,
            vec![
                Segment::Text("head\n"),
                Segment::Block(BLOCK),
                Segment::Text("tail\n"),
            ]
        );
    }

    #[test]
    fn test_collapse_keeps_one_of_a_run() {
        let content = format!("head\n{}tail\n", BLOCK.repeat(3));
        assert_eq!(
            collapse_duplicates(&content, &shape()),
            format!("head\n{BLOCK}tail\n")
        );
    }

    #[test]
    fn test_separated_copies_are_kept() {
        let content = format!("{BLOCK}middle\n{BLOCK}");
        assert_eq!(collapse_duplicates(&content, &shape()), content);
    }

    #[test]
    fn test_distinct_blocks_are_kept_in_order() {
        let other = "// FIX-7: lazy loader\nlet loaderRef = null;\n";
        let content = format!("{BLOCK}{BLOCK}{other}{other}{BLOCK}");
        assert_eq!(
            collapse_duplicates(&content, &shape()),
            format!("{BLOCK}{other}{BLOCK}")
        );
    }

    #[test]
    fn test_trailing_statement_lines_do_not_shield_last_copy() {
        let content = format!("{}let other = 1;\n}}\n", BLOCK.repeat(3));
        assert_eq!(
            collapse_duplicates(&content, &shape()),
            format!("{BLOCK}let other = 1;\n}}\n")
        );
    }

    #[test]
    fn test_statement_run_is_bounded() {
        let shape = BlockShape::new("// SIG", r"^    ", 2).unwrap();
        let content = "// SIG\n    a\n    b\n    c\n";
        let segs = segments(content, &shape);
        assert_eq!(
            segs,
            vec![
                Segment::Block("// SIG\n    a\n    b\n"),
                Segment::Text("    c\n"),
            ]
        );
    }

    #[test]
    fn test_indented_signature_starts_block() {
        let shape = BlockShape::new("// SIG", r"^\s+x", 8).unwrap();
        let content = "  // SIG\n    x\n  // SIG\n    x\n";
        assert_eq!(collapse_duplicates(content, &shape), "  // SIG\n    x\n");
    }

    #[test]
    fn test_invalid_statement_pattern() {
        assert!(BlockShape::new("// SIG", "(unclosed", 4).is_err());
    }
}
