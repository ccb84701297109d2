use chrono::{DateTime, Utc};
use git2::{Oid, Sort};
use relgate_core::Deadline;

use crate::{RawCommit, Result};

use super::Repository;

impl Repository {
    /// Lists commits in `(from_exclusive, to_inclusive]`, newest first.
    ///
    /// `from_exclusive = None` walks from the repository root. Re-walking the
    /// same range yields the same sequence. The walk checks `deadline` per
    /// commit so a caller-supplied timeout bounds it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GitError::RefNotFound`] if either endpoint does not
    /// resolve and [`crate::GitError::Timeout`] if the deadline expires
    /// mid-walk.
    pub fn list_commits(
        &self,
        from_exclusive: Option<&str>,
        to_inclusive: &str,
        deadline: &Deadline,
    ) -> Result<Vec<RawCommit>> {
        let to_sha = self.resolve(to_inclusive)?;

        let mut revwalk = self.inner.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(Oid::from_str(&to_sha)?)?;

        if let Some(from) = from_exclusive {
            let from_sha = self.resolve(from)?;
            revwalk.hide(Oid::from_str(&from_sha)?)?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            deadline.check("walk history")?;

            let oid = oid?;
            let commit = self.inner.find_commit(oid)?;
            commits.push(RawCommit {
                id: oid.to_string(),
                message: commit.message().unwrap_or_default().to_string(),
                timestamp: commit_time(&commit),
            });
        }

        Ok(commits)
    }
}

fn commit_time(commit: &git2::Commit<'_>) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(commit.time().seconds(), 0).unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use relgate_core::Deadline;

    use super::super::tests::{commit_file, setup_test_repo};
    use crate::GitError;

    #[test]
    fn walk_from_root_includes_all_commits() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        commit_file(&repo, "a.txt", "fix: null check")?;
        commit_file(&repo, "b.txt", "feat: add export")?;

        let commits = repo.list_commits(None, "HEAD", &Deadline::none())?;

        assert_eq!(commits.len(), 3);
        Ok(())
    }

    #[test]
    fn walk_is_newest_first() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        commit_file(&repo, "a.txt", "fix: null check")?;
        let newest = commit_file(&repo, "b.txt", "feat: add export")?;

        let commits = repo.list_commits(None, "HEAD", &Deadline::none())?;

        assert_eq!(commits[0].id, newest);
        assert_eq!(commits[0].message, "feat: add export");
        assert_eq!(commits.last().map(|c| c.message.as_str()), Some("Initial commit"));
        Ok(())
    }

    #[test]
    fn from_endpoint_is_exclusive() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let base = commit_file(&repo, "a.txt", "fix: null check")?;
        let tip = commit_file(&repo, "b.txt", "feat: add export")?;

        let commits = repo.list_commits(Some(&base), "HEAD", &Deadline::none())?;

        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].id, tip);
        Ok(())
    }

    #[test]
    fn empty_range_yields_no_commits() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let head = repo.resolve("HEAD")?;

        let commits = repo.list_commits(Some(&head), "HEAD", &Deadline::none())?;

        assert!(commits.is_empty());
        Ok(())
    }

    #[test]
    fn rewalking_the_same_range_is_identical() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let base = commit_file(&repo, "a.txt", "fix: null check")?;
        commit_file(&repo, "b.txt", "feat: add export")?;
        commit_file(&repo, "c.txt", "docs: typo")?;

        let first = repo.list_commits(Some(&base), "HEAD", &Deadline::none())?;
        let second = repo.list_commits(Some(&base), "HEAD", &Deadline::none())?;

        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn unresolvable_endpoint_fails() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;

        let result = repo.list_commits(None, "no-such-branch", &Deadline::none());

        assert!(matches!(result, Err(GitError::RefNotFound { .. })));
        Ok(())
    }

    #[test]
    fn expired_deadline_aborts_the_walk() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        commit_file(&repo, "a.txt", "fix: null check")?;

        let result = repo.list_commits(None, "HEAD", &Deadline::after(Duration::ZERO));

        assert!(matches!(result, Err(GitError::Timeout(_))));
        Ok(())
    }
}
