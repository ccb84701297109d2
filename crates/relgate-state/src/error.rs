use std::path::PathBuf;

use relgate_core::DeadlineExpired;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create state directory '{path}'")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read state file '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write state file '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse state file '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize state for '{target}'")]
    Serialize {
        target: String,
        #[source]
        source: toml::ser::Error,
    },

    #[error("concurrent write detected for target '{target}'")]
    WriteConflict { target: String },

    #[error("pending release for target '{target}' no longer matches the approved proposal")]
    StaleProposal { target: String },

    #[error("invalid target id '{target}': must not contain path separators")]
    InvalidTarget { target: String },

    #[error(transparent)]
    Timeout(#[from] DeadlineExpired),
}
