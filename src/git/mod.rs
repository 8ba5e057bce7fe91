//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the version-control
//! primitives one release invocation needs: read access to tags and commit
//! ranges, and the mutating tag/branch/merge/cherry-pick/push operations the
//! release sequencer drives.
//!
//! The primary abstraction is the [Repository] trait. Concrete
//! implementations:
//!
//! - [repository::Git2Repository]: real implementation using the `git2` crate
//! - [mock::MockRepository]: in-memory implementation for testing
//!
//! A handle is created per release invocation and passed explicitly into
//! every consumer; there is no process-wide repository state.
//!
//! ```rust
//! # use mono_release::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> Result<(), Box<dyn std::error::Error>> {
//! let commits = repo.commits_between("web@1.0.0", None)?;
//! for commit in commits {
//!     println!("{}: {}", commit.hash, commit.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;

/// Raw commit information retrieved from the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// The full commit message
    pub message: String,
}

/// Version-control primitives consumed by the release workflow.
///
/// Read operations back the commit source and tag resolution; the mutating
/// operations are only ever invoked by the release sequencer, one at a time
/// and in a fixed order. Implementations must be `Send + Sync`.
///
/// All methods return [crate::error::Result] and map underlying errors (like
/// `git2::Error`) to the appropriate [crate::error::ReleaseError] variants.
pub trait Repository: Send + Sync {
    /// Full hash of the current HEAD commit
    fn head_hash(&self) -> Result<String>;

    /// Resolve a revision (tag name, branch name, hash) to a commit hash.
    ///
    /// # Returns
    /// * `Ok(String)` - full hash of the commit the revision points at
    /// * `Err` - if the revision does not resolve to a known reference
    fn resolve_ref(&self, name: &str) -> Result<String>;

    /// Find a tag by name, returning the hash of the commit it points at,
    /// or `None` when the tag does not exist. Handles both lightweight and
    /// annotated tags.
    fn find_tag_hash(&self, tag_name: &str) -> Result<Option<String>>;

    /// All tag names in the repository, in the underlying storage order
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Commits in the half-open range `(from, to]`, newest first.
    ///
    /// `from` must resolve to a known reference; `to` defaults to the tip
    /// of the current checkout when unset.
    ///
    /// # Arguments
    /// * `from` - revision excluded from the results (typically the
    ///   previous release tag)
    /// * `to` - revision ending the range (inclusive), or `None` for HEAD
    fn commits_between(&self, from: &str, to: Option<&str>) -> Result<Vec<CommitInfo>>;

    /// Set the committer identity used for subsequent mutations
    fn set_identity(&self, name: &str, email: &str) -> Result<()>;

    /// Create an annotated tag at the current HEAD commit.
    ///
    /// Creating a tag that already exists is an error, never a silent
    /// overwrite.
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Create a branch pointing at the commit `from_ref` resolves to.
    ///
    /// Creating a branch that already exists is an error.
    fn create_branch(&self, name: &str, from_ref: &str) -> Result<()>;

    /// Check out a branch, tag or commit, updating the working tree
    fn checkout(&self, reference: &str) -> Result<()>;

    /// Squash-merge `reference` into the current branch: the merged tree is
    /// staged in the index and checked out, but no commit is created.
    fn squash_merge(&self, reference: &str) -> Result<()>;

    /// Commit the index on the current branch, returning the new hash
    fn commit(&self, message: &str) -> Result<String>;

    /// Cherry-pick a commit onto the current branch, committing the result
    /// with the original message and author. Returns the new hash.
    fn cherry_pick(&self, hash: &str) -> Result<String>;

    /// Stage paths matching the given pathspecs
    fn stage(&self, pathspecs: &[&str]) -> Result<()>;

    /// Amend the current HEAD commit, replacing its message and folding in
    /// whatever is staged. Returns the amended hash.
    fn amend_message(&self, message: &str) -> Result<String>;

    /// Push the given refspecs to a remote
    fn push(&self, remote: &str, refspecs: &[&str]) -> Result<()>;
}
