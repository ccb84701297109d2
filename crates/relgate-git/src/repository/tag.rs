use git2::Oid;

use crate::{Result, TagInfo};

use super::Repository;

impl Repository {
    /// Creates an annotated tag at `target_sha`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag cannot be created or already exists.
    pub fn create_tag(&self, name: &str, message: &str) -> Result<TagInfo> {
        let head = self.inner.head()?.peel_to_commit()?;
        self.create_tag_at(name, &head.id().to_string(), message)
    }

    /// # Errors
    ///
    /// Returns an error if `target_sha` is not a commit or the tag exists.
    pub fn create_tag_at(&self, name: &str, target_sha: &str, message: &str) -> Result<TagInfo> {
        let commit = self.inner.find_commit(Oid::from_str(target_sha)?)?;
        let sig = self.inner.signature()?;

        self.inner
            .tag(name, commit.as_object(), &sig, message, false)?;

        Ok(TagInfo {
            name: name.to_string(),
            target_sha: target_sha.to_string(),
        })
    }
}
