use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("engine error")]
    Engine(#[from] relgate_engine::EngineError),

    #[error("git error")]
    Git(#[from] relgate_git::GitError),

    #[error("state store error")]
    Store(#[from] relgate_state::StoreError),

    #[error("cannot determine current directory")]
    CurrentDir(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
