use std::path::PathBuf;

use relgate_core::DeadlineExpired;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("git operation failed")]
    Git(#[from] git2::Error),

    #[error("not a git repository: '{path}'")]
    NotARepository { path: PathBuf },

    #[error("failed to resolve reference '{refspec}'")]
    RefNotFound { refspec: String },

    #[error(transparent)]
    Timeout(#[from] DeadlineExpired),
}
