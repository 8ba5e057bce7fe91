use super::commit::CommitRecord;

/// The single scope-matching rule used everywhere a commit window is
/// narrowed to one application: an unscoped commit applies repo-wide, and a
/// scoped commit applies when its comma-separated scope list (spaces
/// stripped) contains the app name.
///
/// Bump resolution and note generation must both go through this filter so
/// the two never disagree about which commits belong to a release.
pub fn commit_applies_to(app: &str, commit: &CommitRecord) -> bool {
    match &commit.scope {
        None => true,
        Some(scope) => scope.replace(' ', "").split(',').any(|s| s == app),
    }
}

/// Narrow a commit sequence to the commits relevant to one app.
///
/// Order is preserved; filtering an already-filtered sequence is a no-op.
pub fn filter_by_scope(app: &str, commits: &[CommitRecord]) -> Vec<CommitRecord> {
    commits
        .iter()
        .filter(|c| commit_applies_to(app, c))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(scope: Option<&str>) -> CommitRecord {
        let header = match scope {
            Some(s) => format!("fix({}): something", s),
            None => "fix: something".to_string(),
        };
        CommitRecord::parse("abc123", &header)
    }

    #[test]
    fn test_unscoped_commit_applies() {
        assert!(commit_applies_to("web", &record(None)));
    }

    #[test]
    fn test_exact_scope_applies() {
        assert!(commit_applies_to("web", &record(Some("web"))));
    }

    #[test]
    fn test_other_scope_does_not_apply() {
        assert!(!commit_applies_to("web", &record(Some("api"))));
    }

    #[test]
    fn test_comma_separated_scope_list() {
        assert!(commit_applies_to("web", &record(Some("api, web"))));
        assert!(commit_applies_to("api", &record(Some("api, web"))));
        assert!(!commit_applies_to("cli", &record(Some("api, web"))));
    }

    #[test]
    fn test_scope_is_not_substring_matched() {
        assert!(!commit_applies_to("web", &record(Some("webapp"))));
        assert!(!commit_applies_to("webapp", &record(Some("web"))));
    }

    #[test]
    fn test_filter_preserves_order() {
        let commits = vec![
            record(Some("web")),
            record(None),
            record(Some("api")),
            record(Some("web,api")),
        ];
        let filtered = filter_by_scope("web", &commits);
        assert_eq!(filtered.len(), 3);
        assert_eq!(filtered[0], commits[0]);
        assert_eq!(filtered[1], commits[1]);
        assert_eq!(filtered[2], commits[3]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let commits = vec![record(Some("web")), record(None), record(Some("api"))];
        let once = filter_by_scope("web", &commits);
        let twice = filter_by_scope("web", &once);
        assert_eq!(once, twice);
    }
}
