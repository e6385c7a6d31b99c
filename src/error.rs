// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrofixError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Toml {
        source: toml::de::Error,
        path: PathBuf,
    },

    #[error("Unknown target '{key}' in {patch}")]
    UnknownTarget { patch: String, key: String },

    #[error("Invalid statement pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid descriptor in {patch}: {reason}")]
    Descriptor { patch: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RetrofixError>;

impl RetrofixError {
    #[must_use]
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}

// Allow `?` on std::io::Error by converting to RetrofixError::Io with unknown path.
impl From<std::io::Error> for RetrofixError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

// Gracefully convert WalkDir errors
impl From<walkdir::Error> for RetrofixError {
    fn from(e: walkdir::Error) -> Self {
        let path = e.path().map(PathBuf::from).unwrap_or_default();
        match e.into_io_error() {
            Some(source) => Self::Io { source, path },
            None => Self::Io {
                source: std::io::Error::other("filesystem loop"),
                path,
            },
        }
    }
}
