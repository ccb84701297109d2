use relgate_git::GitError;
use relgate_state::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("history unavailable: cannot resolve '{refspec}'")]
    HistoryUnavailable { refspec: String },

    #[error("run timed out during {phase}")]
    Timeout { phase: &'static str },

    #[error("no pending release for target '{target}'")]
    NoPendingRelease { target: String },

    #[error("invalid approval hash '{hash}': pass the full digest or a prefix of at least 12 characters")]
    InvalidApprovalHash { hash: String },

    #[error("stale approval for target '{target}': the proposal has been superseded")]
    StaleApproval { target: String },

    #[error("lost the write race for target '{target}' after {attempts} attempts")]
    WriteConflict { target: String, attempts: u32 },

    #[error("git operation failed")]
    Git(#[source] GitError),

    #[error("state store operation failed")]
    Store(#[source] StoreError),

    #[error("IO error")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

// Leaf errors fold into the engine taxonomy: unresolved refs are
// `HistoryUnavailable`, deadline expiry is `Timeout`, a lost revision race is
// `WriteConflict`. Everything else stays wrapped with its source chain.

impl From<GitError> for EngineError {
    fn from(err: GitError) -> Self {
        match err {
            GitError::RefNotFound { refspec } => Self::HistoryUnavailable { refspec },
            GitError::Timeout(expired) => Self::Timeout {
                phase: expired.phase,
            },
            other => Self::Git(other),
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::WriteConflict { target } => Self::WriteConflict {
                target,
                attempts: 1,
            },
            StoreError::StaleProposal { target } => Self::StaleApproval { target },
            StoreError::Timeout(expired) => Self::Timeout {
                phase: expired.phase,
            },
            other => Self::Store(other),
        }
    }
}
