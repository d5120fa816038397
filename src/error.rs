use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the guard. None of them are retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The active kubectl context could not be determined.
    #[error("failed to resolve current context: {reason}")]
    ContextLookup { reason: String },

    /// `$HOME` is unset, so the default config path is unknown.
    #[error("cannot determine home directory for the default config path")]
    NoHomeDir,

    /// The config file exists but could not be read.
    #[error("failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`Config`](crate::config::Config).
    #[error("failed to parse config '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The in-memory config could not be rendered as TOML.
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// The config file or its directory could not be written.
    #[error("failed to write config '{path}': {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The wrapped executable does not exist.
    #[error("{program} not found in PATH")]
    KubectlNotFound { program: String },

    /// Spawning the wrapped executable failed for another reason.
    #[error("failed to execute {program}: {source}")]
    Exec {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
