use std::fmt;

/// Non-fatal conditions surfaced while computing or publishing a release.
/// These are reported to the user; the run itself continues or ends cleanly.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No commit since the latest tag warrants a release for this app
    NoReleasableCommits { app: String, latest_tag: String },
    /// No commit in the release range carries a resolvable version, so no
    /// release was published
    NoVersionCommitInRange { from: String, to: String },
    /// The git sequence completed but publishing the release notes failed
    PublishFailed { reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoReleasableCommits { app, latest_tag } => {
                write!(
                    f,
                    "No releasable commits for '{}' since tag '{}'",
                    app, latest_tag
                )
            }
            BoundaryWarning::NoVersionCommitInRange { from, to } => {
                write!(
                    f,
                    "No commit between '{}' and '{}' carries a resolvable version; \
                     no release published",
                    from, to
                )
            }
            BoundaryWarning::PublishFailed { reason } => {
                write!(
                    f,
                    "Git sequence completed but release publication failed: {}",
                    reason
                )
            }
        }
    }
}
