//! Error types for hook-guard
//!
//! None of these ever reach the host: the binary converts every error into a
//! no-opinion response.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn stdin into an [`Event`](crate::input::Event)
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("failed to read hook input: {0}")]
    Io(#[from] io::Error),

    #[error("hook input exceeds {0} bytes")]
    InputTooLarge(usize),

    #[error("hook input is empty")]
    EmptyInput,

    #[error("malformed hook input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot determine hook event kind{}", .0.as_deref().map(|n| format!(" from {:?}", n)).unwrap_or_default())]
    UnknownEvent(Option<String>),
}

/// Failure to load a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failure of a single context-probe check
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0} not found on PATH")]
    NotFound(String),

    #[error("cannot inspect {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
