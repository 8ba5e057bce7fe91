//! The git release sequence.
//!
//! A release mutates shared repository state through a fixed series of
//! steps, each a committed checkpoint:
//!
//! tag -> branch -> squash -> commit -> cherry-pick -> manifest bump ->
//! amend -> push
//!
//! There is no rollback. A failure at step k aborts the remaining steps and
//! leaves everything before it applied; the resulting [SequenceError] names
//! the failing stage and the last checkpoint reached so an operator can
//! inspect and recover. Each step is safe to retry for the same computed
//! version: re-creating an existing tag or branch is reported as an error
//! rather than silently duplicated.

use std::fmt;

use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::manifest::VersionMutator;

/// Checkpoints of the release sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStage {
    TagCreated,
    BranchCreated,
    Squashed,
    Committed,
    CherryPicked,
    ManifestBumped,
    Amended,
    Pushed,
}

impl fmt::Display for ReleaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReleaseStage::TagCreated => "tag creation",
            ReleaseStage::BranchCreated => "release branch creation",
            ReleaseStage::Squashed => "squash merge",
            ReleaseStage::Committed => "squash commit",
            ReleaseStage::CherryPicked => "cherry-pick",
            ReleaseStage::ManifestBumped => "manifest bump",
            ReleaseStage::Amended => "commit amend",
            ReleaseStage::Pushed => "push",
        };
        write!(f, "{}", label)
    }
}

/// Failure of one sequence step, carrying the repository's last known-good
/// checkpoint.
#[derive(Debug)]
pub struct SequenceError {
    /// The step that failed
    pub stage: ReleaseStage,
    /// The last checkpoint that completed, if any
    pub checkpoint: Option<ReleaseStage>,
    /// The underlying error
    pub source: Box<ReleaseError>,
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.checkpoint {
            Some(checkpoint) => write!(
                f,
                "Release sequence halted at {} (last checkpoint: {}): {}",
                self.stage, checkpoint, self.source
            ),
            None => write!(
                f,
                "Release sequence halted at {} (no checkpoint reached): {}",
                self.stage, self.source
            ),
        }
    }
}

impl std::error::Error for SequenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Everything the sequence needs, computed up front so the steps themselves
/// make no decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    pub app: String,
    /// Previous release tag, the anchor of the release branch
    pub previous_tag: String,
    /// Tag for the version being released
    pub next_tag: String,
    /// Bare version string, used as the squash commit message
    pub next_version: String,
    /// Branch carrying the squashed release commit
    pub release_branch: String,
    /// The app's trunk branch, target of the cherry-pick
    pub trunk_branch: String,
    pub remote: String,
    /// Hash of the most recent commit in the pre-squash range
    pub cherry_hash: String,
    /// Replacement message for the cherry-picked trunk commit: the next tag
    /// followed by the rendered list of squashed commit headers
    pub trunk_message: String,
    /// Pathspecs staged before the amend (the mutated manifests)
    pub manifest_paths: Vec<String>,
}

/// Result of a completed sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceReport {
    pub completed: Vec<ReleaseStage>,
}

fn checkpoint<T>(
    completed: &mut Vec<ReleaseStage>,
    stage: ReleaseStage,
    result: Result<T>,
) -> std::result::Result<T, Box<SequenceError>> {
    match result {
        Ok(value) => {
            completed.push(stage);
            Ok(value)
        }
        Err(source) => Err(Box::new(SequenceError {
            stage,
            checkpoint: completed.last().copied(),
            source: Box::new(source),
        })),
    }
}

/// Execute the release sequence against an injected repository handle.
///
/// Steps run strictly in order on a single thread of control; the working
/// directory is a singleton resource for the duration of the run.
pub fn run<R: Repository, M: VersionMutator>(
    repo: &R,
    mutator: &M,
    plan: &ReleasePlan,
) -> std::result::Result<SequenceReport, Box<SequenceError>> {
    let mut completed = Vec::new();

    checkpoint(
        &mut completed,
        ReleaseStage::TagCreated,
        repo.create_annotated_tag(&plan.next_tag, &plan.next_tag),
    )?;

    checkpoint(
        &mut completed,
        ReleaseStage::BranchCreated,
        repo.create_branch(&plan.release_branch, &plan.previous_tag)
            .and_then(|_| repo.checkout(&plan.release_branch)),
    )?;

    checkpoint(
        &mut completed,
        ReleaseStage::Squashed,
        repo.squash_merge(&plan.next_tag),
    )?;

    checkpoint(
        &mut completed,
        ReleaseStage::Committed,
        repo.commit(&plan.next_version).map(|_| ()),
    )?;

    checkpoint(
        &mut completed,
        ReleaseStage::CherryPicked,
        repo.checkout(&plan.trunk_branch)
            .and_then(|_| repo.cherry_pick(&plan.cherry_hash))
            .map(|_| ()),
    )?;

    checkpoint(
        &mut completed,
        ReleaseStage::ManifestBumped,
        mutator.set_version(&plan.app, &plan.next_version),
    )?;

    let manifest_paths: Vec<&str> = plan.manifest_paths.iter().map(|p| p.as_str()).collect();
    checkpoint(
        &mut completed,
        ReleaseStage::Amended,
        repo.stage(&manifest_paths)
            .and_then(|_| repo.amend_message(&plan.trunk_message))
            .map(|_| ()),
    )?;

    let tag_refspec = format!("refs/tags/{0}:refs/tags/{0}", plan.next_tag);
    let trunk_refspec = format!("refs/heads/{0}:refs/heads/{0}", plan.trunk_branch);
    checkpoint(
        &mut completed,
        ReleaseStage::Pushed,
        repo.push(&plan.remote, &[&tag_refspec, &trunk_refspec]),
    )?;

    Ok(SequenceReport { completed })
}
