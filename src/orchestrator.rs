//! The release workflow.
//!
//! One parameterized orchestrator drives a complete release for one app:
//! resolve the previous tag, infer the bump from the scoped commit window,
//! execute the git sequence, return to the caller's ref and publish notes.
//! Collaborators (repository handle, manifest mutator, release host,
//! identity strategy) are all injected, so the workflow itself holds no
//! process-wide state.

use crate::analyzer::BumpResolver;
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{AppTag, BranchPattern, BumpDecision};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::github::{PublishedRelease, ReleaseHost};
use crate::identity::IdentityResolver;
use crate::manifest::VersionMutator;
use crate::notes::{render_squash_body, NoteComposer};
use crate::sequencer::{self, ReleasePlan, SequenceReport};
use crate::source;

/// Invocation surface of the workflow: the target app, the ref to return to
/// afterwards, and the run mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseArgs {
    /// Name of the application being released
    pub app: String,
    /// Reference checked out again once the git sequence is done
    pub return_ref: String,
    /// Remote override; defaults to the configured remote
    pub remote: Option<String>,
    /// Compute the plan but mutate nothing
    pub dry_run: bool,
}

/// What a release invocation produced.
#[derive(Debug)]
pub enum ReleaseOutcome {
    /// Nothing warranted a release; no repository state was touched
    Skipped(BoundaryWarning),
    /// Dry run: the plan that would have executed
    Planned(ReleasePlan),
    /// The git sequence completed
    Released {
        plan: ReleasePlan,
        report: SequenceReport,
        /// The published release, when a key commit with a resolvable
        /// version existed and the host call succeeded
        release: Option<PublishedRelease>,
        /// Non-fatal conditions hit after the sequence completed
        warnings: Vec<BoundaryWarning>,
    },
}

/// Run a release for one app against injected collaborators.
///
/// Errors before the sequence starts leave the repository untouched; a
/// sequence error carries the failing stage and last checkpoint; host
/// failures after a completed sequence are downgraded to warnings because
/// the pushed tag and branches are already valid.
pub fn run_release<R, M, H>(
    repo: &R,
    mutator: &M,
    host: &H,
    identity: &dyn IdentityResolver,
    config: &Config,
    args: &ReleaseArgs,
) -> Result<ReleaseOutcome>
where
    R: Repository,
    M: VersionMutator,
    H: ReleaseHost,
{
    if args.app.is_empty() {
        return Err(ReleaseError::config("Application name must not be empty"));
    }
    if args.return_ref.is_empty() {
        return Err(ReleaseError::config("Return ref must not be empty"));
    }

    let tags = repo.list_tags()?;
    let latest = AppTag::latest_for(&args.app, &tags).ok_or_else(|| {
        ReleaseError::tag(format!(
            "No prior release tag found for app '{}'",
            args.app
        ))
    })?;
    let latest_tag = latest.to_string();

    let boundary_hash = repo.resolve_ref(&latest_tag)?;
    let commits = source::get_commits(repo, &latest_tag, None)?;

    let resolver = BumpResolver::new(config.conventional_commits.clone());
    let decision = resolver.resolve(&commits, &boundary_hash, &args.app);

    if decision == BumpDecision::None {
        return Ok(ReleaseOutcome::Skipped(
            BoundaryWarning::NoReleasableCommits {
                app: args.app.clone(),
                latest_tag,
            },
        ));
    }

    let next = latest.version_triple()?.apply(decision)?;
    let next_tag = AppTag::new(&args.app, &next);
    let next_version = next.to_string();

    // Most recent commit of the pre-squash range; its hash is what lands on
    // trunk via cherry-pick
    let cherry = commits.first().ok_or_else(|| {
        ReleaseError::branch(format!("Release range since '{}' is empty", latest_tag))
    })?;

    let plan = ReleasePlan {
        app: args.app.clone(),
        previous_tag: latest_tag.clone(),
        next_tag: next_tag.to_string(),
        next_version: next_version.clone(),
        release_branch: BranchPattern::new(&config.release.branch_pattern)
            .format(&args.app, &next_version),
        trunk_branch: BranchPattern::new(&config.release.trunk_pattern)
            .format(&args.app, &next_version),
        remote: args
            .remote
            .clone()
            .unwrap_or_else(|| config.release.remote.clone()),
        cherry_hash: cherry.hash.clone(),
        trunk_message: format!("{}\n\n{}", next_tag, render_squash_body(&commits)),
        manifest_paths: config.release.manifest_paths.clone(),
    };

    if args.dry_run {
        return Ok(ReleaseOutcome::Planned(plan));
    }

    let resolved = identity.resolve()?;
    repo.set_identity(&resolved.name, &resolved.email)?;

    let report = sequencer::run(repo, mutator, &plan)?;

    repo.checkout(&args.return_ref)?;

    let mut warnings = Vec::new();
    let composer = NoteComposer::new(repo, host, &config.github);
    let release = match composer.compose_and_publish(
        &args.app,
        &latest_tag,
        Some(&plan.next_tag),
        &plan.trunk_branch,
    ) {
        Ok(Some(release)) => Some(release),
        Ok(None) => {
            warnings.push(BoundaryWarning::NoVersionCommitInRange {
                from: latest_tag,
                to: plan.next_tag.clone(),
            });
            None
        }
        Err(e) => {
            warnings.push(BoundaryWarning::PublishFailed {
                reason: e.to_string(),
            });
            None
        }
    };

    Ok(ReleaseOutcome::Released {
        plan,
        report,
        release,
        warnings,
    })
}
