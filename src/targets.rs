// src/targets.rs
//! Resolution of symbolic target keys to files inside an installation.
//!
//! The base is the CLI package's `dist/src` directory. Without a base every
//! key resolves to `None`, and every patch against it is a silent no-op.

use crate::config::Config;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Files inside the CLI package's `dist/src`.
const CLI_FILES: &[(&str, &str)] = &[
    ("headless_worker_executor", "services/headless-worker-executor.js"),
    ("worker_daemon", "services/worker-daemon.js"),
    ("daemon_cmd", "commands/daemon.js"),
    ("doctor_cmd", "commands/doctor.js"),
    ("init_cmd", "commands/init.js"),
    ("hooks_cmd", "commands/hooks.js"),
    ("memory_cmd", "commands/memory.js"),
    ("swarm_cmd", "commands/swarm.js"),
    ("hive_cmd", "commands/hive-mind.js"),
    ("status_cmd", "commands/status.js"),
    ("start_cmd", "commands/start.js"),
    ("task_cmd", "commands/task.js"),
    ("config_cmd", "commands/config.js"),
    ("cli_index", "index.js"),
    ("memory_initializer", "memory/memory-initializer.js"),
    ("intelligence", "memory/intelligence.js"),
    ("mcp_memory", "mcp-tools/memory-tools.js"),
    ("mcp_hooks", "mcp-tools/hooks-tools.js"),
    ("embeddings_tools", "mcp-tools/embeddings-tools.js"),
    ("mcp_server", "mcp-server.js"),
    ("settings_generator", "init/settings-generator.js"),
    ("helpers_generator", "init/helpers-generator.js"),
    ("executor", "init/executor.js"),
    ("init_types", "init/types.js"),
    ("claudemd_generator", "init/claudemd-generator.js"),
    ("mcp_generator", "init/mcp-generator.js"),
    ("statusline_generator", "init/statusline-generator.js"),
];

/// Files at the CLI package root (two levels above the base).
const PACKAGE_FILES: &[(&str, &str)] = &[
    ("readme", "README.md"),
    ("src_auto_memory_hook", ".claude/helpers/auto-memory-hook.mjs"),
    ("src_hook_handler", ".claude/helpers/hook-handler.cjs"),
];

/// Files in sibling packages of the same npm scope: (key, package, file).
const SIBLING_FILES: &[(&str, &str, &str)] = &[
    ("memory_hybrid_backend", "memory", "dist/hybrid-backend.js"),
    ("memory_agentdb_backend", "memory", "dist/agentdb-backend.js"),
    ("memory_package_json", "memory", "package.json"),
    ("neural_reasoning_bank", "neural", "dist/reasoning-bank.js"),
    ("shared_defaults", "shared", "dist/core/config/defaults.js"),
];

pub const RUVECTOR_CLI: &str = "ruvector_cli";
pub const RUV_SWARM_PACKAGE_JSON: &str = "ruv_swarm_package_json";

#[derive(Debug, Clone, Default)]
pub struct Targets {
    base: Option<PathBuf>,
    extra: BTreeMap<String, PathBuf>,
    ruvector_cli: Option<PathBuf>,
    ruv_swarm_root: Option<PathBuf>,
}

impl Targets {
    #[must_use]
    pub fn new(base: Option<PathBuf>) -> Self {
        Self {
            base: normalize(base),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            base: normalize(config.paths.base.clone()),
            extra: config.targets.clone(),
            ruvector_cli: normalize(config.paths.ruvector_cli.clone()),
            ruv_swarm_root: normalize(config.paths.ruv_swarm_root.clone()),
        }
    }

    #[must_use]
    pub fn base(&self) -> Option<&Path> {
        self.base.as_deref()
    }

    /// Whether `key` names a target, regardless of whether it resolves here.
    #[must_use]
    pub fn is_known(&self, key: &str) -> bool {
        key == RUVECTOR_CLI
            || key == RUV_SWARM_PACKAGE_JSON
            || self.extra.contains_key(key)
            || CLI_FILES.iter().any(|(k, _)| *k == key)
            || PACKAGE_FILES.iter().any(|(k, _)| *k == key)
            || SIBLING_FILES.iter().any(|(k, _, _)| *k == key)
    }

    /// Resolves a key to an absolute path, or `None` when the owning
    /// package cannot be located.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<PathBuf> {
        match key {
            RUVECTOR_CLI => return self.ruvector_cli.clone(),
            RUV_SWARM_PACKAGE_JSON => {
                return self.ruv_swarm_root.as_ref().map(|r| r.join("package.json"))
            }
            _ => {}
        }

        let base = self.base.as_deref()?;
        if let Some(rel) = self.extra.get(key) {
            return Some(base.join(rel));
        }
        if let Some((_, rel)) = CLI_FILES.iter().find(|(k, _)| *k == key) {
            return Some(base.join(rel));
        }
        if let Some((_, rel)) = PACKAGE_FILES.iter().find(|(k, _)| *k == key) {
            return self.package_root(None).map(|root| root.join(rel));
        }
        SIBLING_FILES
            .iter()
            .find(|(k, _, _)| *k == key)
            .and_then(|(_, pkg, rel)| self.scope_dir().map(|scope| scope.join(pkg).join(rel)))
    }

    /// Root directory of an npm package in the CLI's scope.
    ///
    /// `None` and any `<scope>/cli` name map to the CLI package itself;
    /// `<scope>/<name>` maps to the sibling directory `<name>`.
    #[must_use]
    pub fn package_root(&self, package: Option<&str>) -> Option<PathBuf> {
        let cli_root = self.base.as_deref()?.parent()?.parent()?;
        let name = package.map_or("cli", |p| p.rsplit('/').next().unwrap_or(p));
        if name == "cli" {
            return Some(cli_root.to_path_buf());
        }
        self.scope_dir().map(|scope| scope.join(name))
    }

    /// All built-in keys, in declaration order.
    pub fn builtin_keys() -> impl Iterator<Item = &'static str> {
        CLI_FILES
            .iter()
            .map(|(k, _)| *k)
            .chain(PACKAGE_FILES.iter().map(|(k, _)| *k))
            .chain(SIBLING_FILES.iter().map(|(k, _, _)| *k))
            .chain([RUVECTOR_CLI, RUV_SWARM_PACKAGE_JSON])
    }

    fn scope_dir(&self) -> Option<PathBuf> {
        self.base
            .as_deref()?
            .parent()?
            .parent()?
            .parent()
            .map(Path::to_path_buf)
    }
}

/// Empty paths and `/dev/null` both mean "not installed".
fn normalize(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty() && p != Path::new("/dev/null"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_base_resolves_nothing() {
        let targets = Targets::new(None);
        assert!(targets.resolve("worker_daemon").is_none());
        assert!(targets.resolve("readme").is_none());
        assert!(targets.resolve("shared_defaults").is_none());
    }

    #[test]
    fn test_dev_null_and_empty_are_absent() {
        assert!(Targets::new(Some(PathBuf::from("/dev/null"))).base().is_none());
        assert!(Targets::new(Some(PathBuf::new())).base().is_none());
    }

    #[test]
    fn test_cli_files_resolve_under_base() {
        let targets = Targets::new(Some(PathBuf::from("/fake/base")));
        assert_eq!(
            targets.resolve("headless_worker_executor"),
            Some(PathBuf::from("/fake/base/services/headless-worker-executor.js"))
        );
        assert_eq!(
            targets.resolve("executor"),
            Some(PathBuf::from("/fake/base/init/executor.js"))
        );
    }

    #[test]
    fn test_package_and_sibling_files() {
        let targets = Targets::new(Some(PathBuf::from("/nm/@cf/cli/dist/src")));
        assert_eq!(
            targets.resolve("readme"),
            Some(PathBuf::from("/nm/@cf/cli/README.md"))
        );
        assert_eq!(
            targets.resolve("memory_hybrid_backend"),
            Some(PathBuf::from("/nm/@cf/memory/dist/hybrid-backend.js"))
        );
        assert_eq!(
            targets.package_root(Some("@cf/neural")),
            Some(PathBuf::from("/nm/@cf/neural"))
        );
        assert_eq!(
            targets.package_root(Some("@cf/cli")),
            Some(PathBuf::from("/nm/@cf/cli"))
        );
    }

    #[test]
    fn test_unknown_key() {
        let targets = Targets::new(Some(PathBuf::from("/b")));
        assert!(!targets.is_known("nope"));
        assert!(targets.resolve("nope").is_none());
        assert!(targets.is_known("mcp_hooks"));
    }

    #[test]
    fn test_builtin_keys_are_known() {
        let targets = Targets::default();
        assert!(Targets::builtin_keys().all(|k| targets.is_known(k)));
    }
}
