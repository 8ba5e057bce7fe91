//! Commit collection for a release range.

use crate::domain::CommitRecord;
use crate::error::Result;
use crate::git::Repository;

/// Retrieve and parse the commits in the half-open range `(from, to]`,
/// `(from, HEAD]` when `to` is unset.
///
/// Raw log entries run through the conventional-commit grammar; merge
/// commits and entries the grammar cannot parse carry no release semantics
/// and are dropped. The result is fully materialized, newest first, and is
/// the one sequence both bump resolution and note generation must derive
/// from.
pub fn get_commits<R: Repository>(
    repo: &R,
    from: &str,
    to: Option<&str>,
) -> Result<Vec<CommitRecord>> {
    let raw = repo.commits_between(from, to)?;

    Ok(raw
        .into_iter()
        .map(|c| CommitRecord::parse(c.hash, &c.message))
        .filter(|r| r.is_conventional() && !r.is_merge())
        .collect())
}
