//! Full pipeline against a real git repository and the file-backed store.

use std::path::Path;

use semver::Version;
use tempfile::TempDir;

use relgate_engine::mocks::{MockPublishSink, MockReviewSurface};
use relgate_engine::{Coordinator, EngineError, ReleaseState, RunOptions, RunOutcome};
use relgate_git::Repository;
use relgate_state::FileStateStore;

const TARGET: &str = "my-package";

fn init_repo() -> anyhow::Result<(TempDir, Repository)> {
    let dir = TempDir::new()?;
    let repo = git2::Repository::init(dir.path())?;

    let mut config = repo.config()?;
    config.set_str("user.name", "Test")?;
    config.set_str("user.email", "test@example.com")?;

    let sig = git2::Signature::now("Test", "test@example.com")?;
    let tree_id = repo.index()?.write_tree()?;
    let tree = repo.find_tree(tree_id)?;
    repo.commit(Some("HEAD"), &sig, &sig, "chore: initial scaffold", &tree, &[])?;

    let repository = Repository::open(dir.path())?;
    Ok((dir, repository))
}

fn commit_file(repo: &Repository, file_name: &str, message: &str) -> anyhow::Result<String> {
    std::fs::write(repo.root().join(file_name), message)?;

    let inner = git2::Repository::open(repo.root())?;
    let mut index = inner.index()?;
    index.add_path(Path::new(file_name))?;
    index.write()?;

    let sig = git2::Signature::now("Test", "test@example.com")?;
    let tree_id = index.write_tree()?;
    let tree = inner.find_tree(tree_id)?;
    let parent = inner.head()?.peel_to_commit()?;

    let oid = inner.commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent])?;
    Ok(oid.to_string())
}

#[test]
fn propose_approve_and_release_again() -> anyhow::Result<()> {
    let (_repo_dir, repo) = init_repo()?;
    commit_file(&repo, "a.txt", "fix: null check")?;
    let feat_sha = commit_file(&repo, "b.txt", "feat: add export")?;

    let state_dir = TempDir::new()?;
    let store = FileStateStore::open(state_dir.path())?;
    let review = MockReviewSurface::new();
    let publish = MockPublishSink::new();
    let coordinator = Coordinator::new(&repo, &store, &review, &publish);

    // First run bootstraps from 0.0.0 and proposes 0.1.0.
    let RunOutcome::Proposed(pending) = coordinator.run(TARGET, &RunOptions::default())? else {
        anyhow::bail!("expected a proposal");
    };
    assert_eq!(pending.decision.previous, Version::new(0, 0, 0));
    assert_eq!(pending.decision.next, Version::new(0, 1, 0));
    assert_eq!(pending.source_range.to, feat_sha);
    assert!(pending.changelog.contains("add export"));
    assert!(pending.changelog.contains("null check"));

    // Re-running changes nothing on disk.
    let second = coordinator.run(TARGET, &RunOptions::default())?;
    assert_eq!(second, RunOutcome::Unchanged(pending.clone()));
    assert_eq!(review.presented_count(), 1);

    // Approval publishes and advances the marker.
    let event = coordinator.approve(TARGET, pending.content_hash.as_str(), &RunOptions::default())?;
    assert_eq!(event.version, Version::new(0, 1, 0));
    assert_eq!(publish.events().len(), 1);

    let status = coordinator.status(TARGET, &RunOptions::default())?;
    assert_eq!(status.state, ReleaseState::Idle);
    assert_eq!(status.marker.map(|m| m.source_ref), Some(feat_sha.clone()));

    // The next cycle only sees commits past the published range.
    let fix_sha = commit_file(&repo, "c.txt", "fix(parser): trailing comma")?;
    let RunOutcome::Proposed(next) = coordinator.run(TARGET, &RunOptions::default())? else {
        anyhow::bail!("expected a follow-up proposal");
    };
    assert_eq!(next.decision.previous, Version::new(0, 1, 0));
    assert_eq!(next.decision.next, Version::new(0, 1, 1));
    assert_eq!(next.source_range.from.as_deref(), Some(feat_sha.as_str()));
    assert_eq!(next.source_range.to, fix_sha);
    assert!(next.changelog.contains("parser: trailing comma"));
    assert!(!next.changelog.contains("add export"));

    Ok(())
}

#[test]
fn state_survives_reopening_the_store() -> anyhow::Result<()> {
    let (_repo_dir, repo) = init_repo()?;
    commit_file(&repo, "a.txt", "feat: add export")?;

    let state_dir = TempDir::new()?;
    let review = MockReviewSurface::new();
    let publish = MockPublishSink::new();

    let pending = {
        let store = FileStateStore::open(state_dir.path())?;
        let coordinator = Coordinator::new(&repo, &store, &review, &publish);
        let RunOutcome::Proposed(pending) = coordinator.run(TARGET, &RunOptions::default())? else {
            anyhow::bail!("expected a proposal");
        };
        pending
    };

    // A fresh store over the same directory sees the proposal and can
    // approve it.
    let store = FileStateStore::open(state_dir.path())?;
    let coordinator = Coordinator::new(&repo, &store, &review, &publish);
    let status = coordinator.status(TARGET, &RunOptions::default())?;
    assert_eq!(status.state, ReleaseState::Proposed);
    assert_eq!(status.pending, Some(pending.clone()));

    let event = coordinator.approve(TARGET, pending.content_hash.as_str(), &RunOptions::default())?;
    assert_eq!(event.version, pending.decision.next);
    Ok(())
}

#[test]
fn commits_behind_a_moved_head_are_excluded() -> anyhow::Result<()> {
    let (_repo_dir, repo) = init_repo()?;
    let fix_sha = commit_file(&repo, "a.txt", "fix: null check")?;
    commit_file(&repo, "b.txt", "feat: add export")?;

    let state_dir = TempDir::new()?;
    let store = FileStateStore::open(state_dir.path())?;
    let review = MockReviewSurface::new();
    let publish = MockPublishSink::new();
    let coordinator = Coordinator::new(&repo, &store, &review, &publish);

    // Pin the walk to the fix commit; the newer feature must not leak in.
    let options = RunOptions {
        timeout: None,
        head: Some(fix_sha.clone()),
    };
    let RunOutcome::Proposed(pending) = coordinator.run(TARGET, &options)? else {
        anyhow::bail!("expected a proposal");
    };
    assert_eq!(pending.source_range.to, fix_sha);
    assert_eq!(pending.decision.next, Version::new(0, 0, 1));
    assert!(!pending.changelog.contains("add export"));
    Ok(())
}

#[test]
fn unknown_ref_reports_history_unavailable() -> anyhow::Result<()> {
    let (_repo_dir, repo) = init_repo()?;

    let state_dir = TempDir::new()?;
    let store = FileStateStore::open(state_dir.path())?;
    let review = MockReviewSurface::new();
    let publish = MockPublishSink::new();
    let coordinator = Coordinator::new(&repo, &store, &review, &publish);

    let options = RunOptions {
        timeout: None,
        head: Some("refs/tags/v9.9.9".to_string()),
    };
    let result = coordinator.run(TARGET, &options);

    assert!(matches!(result, Err(EngineError::HistoryUnavailable { .. })));
    Ok(())
}
