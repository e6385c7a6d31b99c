// tests/integration_driver.rs
use anyhow::Result;
use retrofix_core::check::{self, PatchStatus};
use retrofix_core::discovery;
use retrofix_core::driver::{self, OpResult};
use retrofix_core::engine::{Outcome, RepairResult, RunContext, RunOptions};
use retrofix_core::events::{EventKind, EventLogger, RetrofixEvent};
use retrofix_core::targets::Targets;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DAEMON: &str = "const DEFAULT_WORKERS = [
    { type: 'map', intervalMs: 900000 },
];
setInterval(tick, 1000);
setInterval(flush, 5000);
";

struct Fixture {
    _dir: TempDir,
    base: PathBuf,
    patches: PathBuf,
}

impl Fixture {
    fn daemon(&self) -> PathBuf {
        self.base.join("services/worker-daemon.js")
    }
}

fn write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

fn setup() -> Result<Fixture> {
    let dir = TempDir::new()?;
    let base = dir.path().join("node_modules/@cf/cli/dist/src");
    let patches = dir.path().join("patch");
    write(&base.join("services/worker-daemon.js"), DAEMON)?;

    write(
        &patches.join("010-DM-001-preload-worker/README.md"),
        "# DM-001: Add preload worker\n**Severity**: High\n\n## Files Patched\n- services/worker-daemon.js\n\n## Ops\n2 ops in fix.toml\n",
    )?;
    write(
        &patches.join("010-DM-001-preload-worker/fix.toml"),
        r#"
[[ops]]
kind = "replace"
label = "DM-001a: add preload worker"
target = "worker_daemon"
old = """
    { type: 'map', intervalMs: 900000 },
];"""
new = """
    { type: 'map', intervalMs: 900000 },
    { type: 'preload', intervalMs: 600000 },
];"""

[[ops]]
kind = "replace"
label = "DM-001b: optional package"
target = "neural_reasoning_bank"
old = "a"
new = "b"
"#,
    )?;
    write(
        &patches.join("010-DM-001-preload-worker/sentinel"),
        "grep \"type: 'preload'\" services/worker-daemon.js\n",
    )?;

    // Depends on DM-001's output.
    write(
        &patches.join("020-DM-002-preload-interval/fix.toml"),
        r#"
[[ops]]
kind = "replace"
label = "DM-002: slow down preload"
target = "worker_daemon"
old = "{ type: 'preload', intervalMs: 600000 }"
new = "{ type: 'preload', intervalMs: 1200000 }"

[[ops]]
kind = "replace_all"
label = "DM-002b: guarded timers"
target = "worker_daemon"
old = "setInterval("
new = "guardedInterval("
"#,
    )?;
    write(
        &patches.join("020-DM-002-preload-interval/sentinel"),
        "absent \"setInterval(\" services/worker-daemon.js\n",
    )?;

    Ok(Fixture {
        _dir: dir,
        base,
        patches,
    })
}

fn quiet_ctx() -> RunContext {
    RunContext::new().with_options(RunOptions {
        dry_run: false,
        quiet: true,
    })
}

#[test]
fn test_discovery_orders_by_directory() -> Result<()> {
    let fx = setup()?;
    let patches = discovery::discover(&fx.patches)?;

    let ids: Vec<&str> = patches.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["DM-001", "DM-002"]);
    assert_eq!(patches[0].order, Some(10));
    assert_eq!(patches[0].slug, "preload-worker");
    assert_eq!(patches[0].title, "Add preload worker");
    assert_eq!(patches[1].severity, "Unknown");
    assert_eq!(discovery::stats(&patches).categories, 1);
    Ok(())
}

#[test]
fn test_missing_patch_dir_is_empty() -> Result<()> {
    let dir = TempDir::new()?;
    assert!(discovery::discover(&dir.path().join("nope"))?.is_empty());
    Ok(())
}

#[test]
fn test_run_applies_chain_then_converges() -> Result<()> {
    let fx = setup()?;
    let patches = discovery::discover(&fx.patches)?;
    let selected = discovery::select(&patches, &[]);
    let targets = Targets::new(Some(fx.base.clone()));

    let mut ctx = quiet_ctx();
    let first = driver::run(&mut ctx, &targets, &selected);
    assert_eq!(first.summary.applied, 3);
    assert_eq!(first.summary.skipped, 0);
    assert_eq!(first.unavailable, 1);
    assert_eq!(first.drifted, 0);

    let patched = fs::read_to_string(fx.daemon())?;
    assert!(patched.contains("{ type: 'preload', intervalMs: 1200000 }"));
    assert_eq!(patched.matches("guardedInterval(").count(), 2);

    let mut again = quiet_ctx();
    let second = driver::run(&mut again, &targets, &selected);
    assert_eq!(second.summary.applied, 0);
    assert_eq!(second.summary.to_string(), "0 applied, 2 skipped");
    assert_eq!(second.drifted, 1, "DM-001a's old text no longer exists");
    assert_eq!(fs::read_to_string(fx.daemon())?, patched);
    Ok(())
}

#[test]
fn test_without_base_everything_is_silent() -> Result<()> {
    let fx = setup()?;
    let patches = discovery::discover(&fx.patches)?;
    let selected = discovery::select(&patches, &[]);

    let mut ctx = quiet_ctx();
    let report = driver::run(&mut ctx, &Targets::new(None), &selected);

    assert_eq!(report.summary.applied + report.summary.skipped, 0);
    assert_eq!(report.unavailable, 4);
    assert_eq!(fs::read_to_string(fx.daemon())?, DAEMON);
    Ok(())
}

#[test]
fn test_broken_patch_does_not_stop_run() -> Result<()> {
    let fx = setup()?;
    write(
        &fx.patches.join("015-XX-001-broken/fix.toml"),
        "[[ops]]\nkind = \"replace\"\nlabel = \"x\"\ntarget = \"no_such_target\"\nold = \"a\"\nnew = \"b\"\n",
    )?;
    let patches = discovery::discover(&fx.patches)?;
    let selected = discovery::select(&patches, &[]);
    let targets = Targets::new(Some(fx.base.clone()));

    let mut ctx = quiet_ctx();
    let report = driver::run(&mut ctx, &targets, &selected);

    assert!(report.has_broken());
    assert_eq!(report.broken[0].0, "XX-001");
    assert_eq!(report.summary.applied, 3);
    Ok(())
}

#[test]
fn test_select_restricts_by_id() -> Result<()> {
    let fx = setup()?;
    let patches = discovery::discover(&fx.patches)?;
    let targets = Targets::new(Some(fx.base.clone()));

    let only = discovery::select(&patches, &["dm-002".to_string()]);
    assert_eq!(only.len(), 1);

    let mut ctx = quiet_ctx();
    let report = driver::run(&mut ctx, &targets, &only);

    // Without DM-001 the interval patch has nothing to act on.
    assert_eq!(report.drifted, 1);
    assert_eq!(report.summary.applied, 1);
    Ok(())
}

#[test]
fn test_run_op_reports_outcome() -> Result<()> {
    let fx = setup()?;
    let targets = Targets::new(Some(fx.base.clone()));
    let op: retrofix_core::descriptor::FixOp = toml::from_str(
        "kind = \"replace\"\nlabel = \"x\"\ntarget = \"worker_daemon\"\nold = \"tick\"\nnew = \"tock\"\n",
    )?;

    let mut ctx = quiet_ctx();
    assert_eq!(
        driver::run_op(&mut ctx, &targets, &op),
        OpResult::Patched(Outcome::Applied)
    );
    Ok(())
}

#[test]
fn test_check_before_and_after() -> Result<()> {
    let fx = setup()?;
    let patches = discovery::discover(&fx.patches)?;
    let selected = discovery::select(&patches, &[]);
    let targets = Targets::new(Some(fx.base.clone()));

    let before = check::check(&targets, &selected);
    assert!(!before.passed());
    assert_eq!(before.failed(), 2);

    driver::run(&mut quiet_ctx(), &targets, &selected);

    let after = check::check(&targets, &selected);
    assert!(after.passed());
    assert!(after.patches.iter().all(|p| p.status() == PatchStatus::Ok));

    let unresolved = check::check(&Targets::new(None), &selected);
    assert!(unresolved.passed());
    assert!(unresolved
        .patches
        .iter()
        .all(|p| p.status() == PatchStatus::Skipped));
    Ok(())
}

#[test]
fn test_event_log_records_run() -> Result<()> {
    let fx = setup()?;
    let patches = discovery::discover(&fx.patches)?;
    let selected = discovery::select(&patches, &[]);
    let targets = Targets::new(Some(fx.base.clone()));
    let log = fx.base.join("../../.retrofix/events.jsonl");

    let mut ctx = quiet_ctx().with_events(Some(EventLogger::new(&log)));
    driver::run(&mut ctx, &targets, &selected);

    let text = fs::read_to_string(&log)?;
    let events: Vec<RetrofixEvent> = text
        .lines()
        .map(serde_json::from_str)
        .collect::<std::result::Result<_, _>>()?;
    // start + 3 applied + finish
    assert_eq!(events.len(), 5);
    Ok(())
}

#[test]
fn test_invalid_repair_shape_is_recorded_as_failure() -> Result<()> {
    let fx = setup()?;
    let targets = Targets::new(Some(fx.base.clone()));
    let log = fx.base.join("../../.retrofix/events.jsonl");
    let op: retrofix_core::descriptor::FixOp = toml::from_str(
        "kind = \"repair\"\nlabel = \"collapse\"\ntarget = \"worker_daemon\"\nsignature = \"// s\"\nstatement = \"(\"\n",
    )?;

    let mut ctx = quiet_ctx().with_events(Some(EventLogger::new(&log)));
    let result = driver::run_op(&mut ctx, &targets, &op);

    assert_eq!(result, OpResult::Repaired(RepairResult::default()));
    assert_eq!((ctx.applied(), ctx.skipped()), (0, 0));
    let text = fs::read_to_string(&log)?;
    let event: RetrofixEvent = serde_json::from_str(text.trim_end())?;
    assert!(matches!(event.kind, EventKind::OpFailed { ref label, .. } if label == "collapse"));
    assert_eq!(fs::read_to_string(fx.daemon())?, DAEMON);
    Ok(())
}
