use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// Resolves any refspec (branch, tag, sha, `HEAD`) to a full commit sha.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if the refspec does not resolve to
    /// a commit.
    pub fn resolve(&self, refspec: &str) -> Result<String> {
        let object = self
            .inner
            .revparse_single(refspec)
            .map_err(|_| GitError::RefNotFound {
                refspec: refspec.to_string(),
            })?;

        let commit = object.peel_to_commit().map_err(|_| GitError::RefNotFound {
            refspec: refspec.to_string(),
        })?;

        Ok(commit.id().to_string())
    }
}
