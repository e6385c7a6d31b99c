use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// The CLI package's `dist/src` directory.
    #[serde(default)]
    pub base: Option<PathBuf>,
    #[serde(default = "default_patch_dir")]
    pub patch_dir: PathBuf,
    #[serde(default)]
    pub ruvector_cli: Option<PathBuf>,
    #[serde(default)]
    pub ruv_swarm_root: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base: None,
            patch_dir: default_patch_dir(),
            ruvector_cli: None,
            ruv_swarm_root: None,
        }
    }
}

fn default_patch_dir() -> PathBuf {
    PathBuf::from("patch")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub quiet: bool,
    #[serde(default)]
    pub dry_run: bool,
    /// JSONL audit log; disabled when unset.
    #[serde(default)]
    pub event_log: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrofixToml {
    #[serde(default)]
    pub paths: PathsConfig,
    /// Extra target keys, relative to the base.
    #[serde(default)]
    pub targets: BTreeMap<String, PathBuf>,
    #[serde(default)]
    pub preferences: Preferences,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub paths: PathsConfig,
    pub targets: BTreeMap<String, PathBuf>,
    pub preferences: Preferences,
}

impl From<RetrofixToml> for Config {
    fn from(toml: RetrofixToml) -> Self {
        Self {
            paths: toml.paths,
            targets: toml.targets,
            preferences: toml.preferences,
        }
    }
}
