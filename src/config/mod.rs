// src/config/mod.rs
pub mod types;

pub use self::types::{Config, PathsConfig, Preferences, RetrofixToml};
use crate::error::{Result, RetrofixError};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "retrofix.toml";

pub const ENV_BASE: &str = "BASE";
pub const ENV_RUVECTOR_CLI: &str = "RUVECTOR_CLI";
pub const ENV_RUV_SWARM_ROOT: &str = "RUV_SWARM_ROOT";

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from `path`, or from `retrofix.toml` in the
    /// working directory when no path is given. A missing default file
    /// yields the defaults; a missing explicit file is an error.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_file(p),
            None if Path::new(CONFIG_FILE).exists() => Self::load_file(Path::new(CONFIG_FILE)),
            None => Ok(Self::new()),
        }
    }

    /// # Errors
    /// Returns error if the file cannot be read or is not valid TOML.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| RetrofixError::io(e, path))?;
        Self::parse(&content, path)
    }

    /// # Errors
    /// Returns error if `content` is not valid TOML for this schema.
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        let parsed: RetrofixToml = toml::from_str(content).map_err(|source| RetrofixError::Toml {
            source,
            path: origin.to_path_buf(),
        })?;
        Ok(parsed.into())
    }

    /// Overlays the process environment (`BASE`, `RUVECTOR_CLI`,
    /// `RUV_SWARM_ROOT`).
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlays values from an arbitrary lookup. Empty values are ignored,
    /// so an exported-but-empty variable does not clobber the file.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);

        if let Some(base) = read(ENV_BASE) {
            self.paths.base = Some(base);
        }
        if let Some(cli) = read(ENV_RUVECTOR_CLI) {
            self.paths.ruvector_cli = Some(cli);
        }
        if let Some(root) = read(ENV_RUV_SWARM_ROOT) {
            self.paths.ruv_swarm_root = Some(root);
        }
    }
}
