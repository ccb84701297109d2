mod approve;
mod propose;
mod status;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Subcommand;

use relgate_engine::RunOptions;
use relgate_git::Repository;
use relgate_state::FileStateStore;

use crate::error::Result;

/// Directory under the repository root holding per-target release state.
const DEFAULT_STATE_DIR: &str = ".relgate";

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Recompute and store the release proposal for a target
    Propose {
        /// Target identifier, e.g. the package name
        target: String,
        /// Refspec to treat as the current head (default: HEAD)
        #[arg(long)]
        head: Option<String>,
        /// Abort the run after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Approve a stored proposal and publish the release
    Approve {
        /// Target identifier, e.g. the package name
        target: String,
        /// Content hash of the approved proposal (full or 12+ char prefix)
        hash: String,
        /// Create an annotated `v<version>` tag at the released commit
        #[arg(long)]
        tag: bool,
        /// Abort the run after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Show the release state for a target
    Status {
        /// Target identifier, e.g. the package name
        target: String,
    },
}

pub(crate) struct CommandContext {
    pub(crate) repo: Repository,
    pub(crate) store: FileStateStore,
}

impl CommandContext {
    pub(crate) fn open(start_path: &Path, state_dir: Option<PathBuf>) -> Result<Self> {
        let repo = Repository::open(start_path)?;
        let state_dir = state_dir.unwrap_or_else(|| repo.root().join(DEFAULT_STATE_DIR));
        let store = FileStateStore::open(&state_dir)?;
        Ok(Self { repo, store })
    }
}

impl Commands {
    pub(crate) fn execute(self, context: &CommandContext) -> Result<()> {
        match self {
            Self::Propose {
                target,
                head,
                timeout_secs,
            } => propose::run(context, &target, &run_options(head, timeout_secs)),
            Self::Approve {
                target,
                hash,
                tag,
                timeout_secs,
            } => approve::run(context, &target, &hash, tag, &run_options(None, timeout_secs)),
            Self::Status { target } => status::run(context, &target),
        }
    }
}

fn run_options(head: Option<String>, timeout_secs: Option<u64>) -> RunOptions {
    RunOptions {
        timeout: timeout_secs.map(Duration::from_secs),
        head,
    }
}
