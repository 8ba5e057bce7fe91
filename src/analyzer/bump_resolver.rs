use crate::config::ConventionalCommitsConfig;
use crate::domain::{filter_by_scope, BumpDecision, CommitRecord};

/// Classifies the version bump an app's commit window requires.
pub struct BumpResolver {
    config: ConventionalCommitsConfig,
}

impl BumpResolver {
    /// Create a new bump resolver
    pub fn new(config: ConventionalCommitsConfig) -> Self {
        BumpResolver { config }
    }

    /// Resolve the bump for one app from a newest-first commit window.
    ///
    /// The window is truncated to commits strictly newer than
    /// `boundary_hash` (the previous release tag's commit). A boundary hash
    /// absent from the window means the prior release commit simply is not
    /// in it, and the full window is used. The truncated window is then
    /// scope-filtered before classification.
    pub fn resolve(
        &self,
        commits: &[CommitRecord],
        boundary_hash: &str,
        app: &str,
    ) -> BumpDecision {
        let window = match commits.iter().position(|c| c.hash == boundary_hash) {
            Some(index) => &commits[..index],
            None => commits,
        };

        let scoped = filter_by_scope(app, window);
        self.classify(&scoped)
    }

    /// Classify an already-filtered commit sequence.
    ///
    /// Any breaking change wins outright; otherwise a minor-typed commit
    /// beats a patch-typed one, and a window with neither resolves to
    /// `None`. `None` is a real outcome surfaced to the caller - skipping
    /// the release on it is the caller's policy, not this function's.
    pub fn classify(&self, commits: &[CommitRecord]) -> BumpDecision {
        let mut decision = BumpDecision::None;

        for commit in commits {
            if commit.breaking {
                return BumpDecision::Major;
            }

            let commit_type = match &commit.r#type {
                Some(t) => t,
                None => continue,
            };

            if self.config.minor_types.contains(commit_type) {
                decision = BumpDecision::Minor;
            } else if self.config.patch_types.contains(commit_type)
                && decision == BumpDecision::None
            {
                decision = BumpDecision::Patch;
            }
        }

        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> BumpResolver {
        BumpResolver::new(ConventionalCommitsConfig::default())
    }

    fn record(hash: &str, message: &str) -> CommitRecord {
        CommitRecord::parse(hash, message)
    }

    #[test]
    fn test_classify_breaking_wins() {
        let commits = vec![
            record("c3", "feat(web): new feature"),
            record("c2", "fix(web)!: breaking change"),
            record("c1", "fix(web): bug fix"),
        ];
        assert_eq!(resolver().classify(&commits), BumpDecision::Major);
    }

    #[test]
    fn test_classify_feat_beats_fix() {
        let commits = vec![
            record("c2", "fix(web): bug fix"),
            record("c1", "feat(web): new feature"),
        ];
        assert_eq!(resolver().classify(&commits), BumpDecision::Minor);
    }

    #[test]
    fn test_classify_fixes_only() {
        let commits = vec![
            record("c2", "fix(web): bug 1"),
            record("c1", "perf(web): cache"),
        ];
        assert_eq!(resolver().classify(&commits), BumpDecision::Patch);
    }

    #[test]
    fn test_classify_chores_resolve_to_none() {
        let commits = vec![
            record("c2", "docs(web): readme"),
            record("c1", "chore(web): deps"),
        ];
        assert_eq!(resolver().classify(&commits), BumpDecision::None);
    }

    #[test]
    fn test_classify_empty_window_is_none() {
        assert_eq!(resolver().classify(&[]), BumpDecision::None);
    }

    #[test]
    fn test_classify_breaking_change_footer() {
        let commits = vec![record(
            "c1",
            "fix(web): rename field\n\nBREAKING CHANGE: field changed",
        )];
        assert_eq!(resolver().classify(&commits), BumpDecision::Major);
    }

    #[test]
    fn test_resolve_round_trip() {
        // [fix, feat, fix] -> minor; drop the feat -> patch; drop all -> none
        let commits = vec![
            record("c3", "fix(web): one"),
            record("c2", "feat(web): two"),
            record("c1", "fix(web): three"),
        ];
        assert_eq!(
            resolver().resolve(&commits, "absent", "web"),
            BumpDecision::Minor
        );

        let without_feat = vec![commits[0].clone(), commits[2].clone()];
        assert_eq!(
            resolver().resolve(&without_feat, "absent", "web"),
            BumpDecision::Patch
        );

        assert_eq!(resolver().resolve(&[], "absent", "web"), BumpDecision::None);
    }

    #[test]
    fn test_resolve_truncates_at_boundary() {
        // The boundary commit and everything older is excluded
        let commits = vec![
            record("c3", "fix(web): after boundary"),
            record("c2", "feat(web): the boundary commit"),
            record("c1", "feat(web)!: ancient breaking change"),
        ];
        assert_eq!(
            resolver().resolve(&commits, "c2", "web"),
            BumpDecision::Patch
        );
    }

    #[test]
    fn test_resolve_missing_boundary_uses_full_window() {
        let commits = vec![
            record("c2", "fix(web): one"),
            record("c1", "feat(web): two"),
        ];
        assert_eq!(
            resolver().resolve(&commits, "not-in-window", "web"),
            BumpDecision::Minor
        );
    }

    #[test]
    fn test_resolve_applies_scope_filter() {
        let commits = vec![
            record("c2", "feat(api): other app feature"),
            record("c1", "fix(web): our fix"),
        ];
        assert_eq!(
            resolver().resolve(&commits, "absent", "web"),
            BumpDecision::Patch
        );
    }

    #[test]
    fn test_resolve_unscoped_commits_count() {
        let commits = vec![record("c1", "feat: repo-wide feature")];
        assert_eq!(
            resolver().resolve(&commits, "absent", "web"),
            BumpDecision::Minor
        );
    }

    #[test]
    fn test_resolve_monotonic_under_breaking_addition() {
        // Adding a breaking commit can only raise or preserve the decision
        let windows: Vec<Vec<CommitRecord>> = vec![
            vec![],
            vec![record("c1", "chore(web): deps")],
            vec![record("c1", "fix(web): bug")],
            vec![record("c1", "feat(web): thing")],
        ];

        for window in windows {
            let before = resolver().classify(&window);
            let mut extended = vec![record("c9", "feat(web)!: breaking")];
            extended.extend(window);
            let after = resolver().classify(&extended);
            assert_eq!(after, BumpDecision::Major);
            assert!(rank(after) >= rank(before));
        }
    }

    fn rank(decision: BumpDecision) -> u8 {
        match decision {
            BumpDecision::None => 0,
            BumpDecision::Patch => 1,
            BumpDecision::Minor => 2,
            BumpDecision::Major => 3,
        }
    }
}
