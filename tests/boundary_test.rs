// tests/boundary_test.rs
//
// Edge-of-range behavior: boundary hashes that are not in the window,
// ranges with nothing publishable, and the warnings reported for them.

use mono_release::analyzer::BumpResolver;
use mono_release::boundary::BoundaryWarning;
use mono_release::config::{ConventionalCommitsConfig, GithubConfig};
use mono_release::domain::{BumpDecision, CommitRecord};
use mono_release::git::{CommitInfo, MockRepository};
use mono_release::github::MockHost;
use mono_release::notes::NoteComposer;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_no_releasable_commits_display() {
    let warning = BoundaryWarning::NoReleasableCommits {
        app: "web".to_string(),
        latest_tag: "web@1.2.3".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("No releasable commits"),
        "Message should mention releasable commits, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("web@1.2.3"),
        "Message should contain the tag, got: {}",
        display_msg
    );
}

#[test]
fn test_no_version_commit_display() {
    let warning = BoundaryWarning::NoVersionCommitInRange {
        from: "web@1.2.3".to_string(),
        to: "web@1.3.0".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("no release published"),
        "Message should state that nothing was published, got: {}",
        display_msg
    );
    assert!(display_msg.contains("web@1.2.3"));
    assert!(display_msg.contains("web@1.3.0"));
}

#[test]
fn test_publish_failed_display() {
    let warning = BoundaryWarning::PublishFailed {
        reason: "connection timed out".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("publication failed"),
        "Message should mention the failed publication, got: {}",
        display_msg
    );
    assert!(display_msg.contains("connection timed out"));
}

// ============================================================================
// Boundary-hash truncation
// ============================================================================

fn record(hash: &str, message: &str) -> CommitRecord {
    CommitRecord::parse(hash, message)
}

#[test]
fn test_resolver_with_absent_boundary_uses_full_window() {
    let resolver = BumpResolver::new(ConventionalCommitsConfig::default());
    let commits = vec![
        record("c2", "fix(web): newer"),
        record("c1", "feat(web): older"),
    ];

    // The prior release tag's commit is not in the window; the resolver
    // must use everything rather than fail
    let decision = resolver.resolve(&commits, "0000000", "web");
    assert_eq!(decision, BumpDecision::Minor);
}

#[test]
fn test_resolver_with_boundary_in_window_truncates() {
    let resolver = BumpResolver::new(ConventionalCommitsConfig::default());
    let commits = vec![
        record("c3", "fix(web): newest"),
        record("c2", "feat(web): boundary commit"),
        record("c1", "feat(web)!: before boundary"),
    ];

    let decision = resolver.resolve(&commits, "c2", "web");
    assert_eq!(decision, BumpDecision::Patch);
}

#[test]
fn test_resolver_with_boundary_at_head_yields_none() {
    let resolver = BumpResolver::new(ConventionalCommitsConfig::default());
    let commits = vec![record("c1", "feat(web): already released")];

    // The newest commit is the prior release commit itself: empty window
    let decision = resolver.resolve(&commits, "c1", "web");
    assert_eq!(decision, BumpDecision::None);
}

// ============================================================================
// Composition no-op on version-less ranges
// ============================================================================

#[test]
fn test_composition_without_key_commit_makes_no_network_call() {
    let repo = MockRepository::new();
    repo.add_tag("web@1.2.3", "aaa");
    repo.add_tag("web@1.3.0", "bbb");
    repo.set_commits(
        Some("web@1.3.0"),
        vec![
            CommitInfo {
                hash: "c2".to_string(),
                message: "feat(web): search".to_string(),
            },
            CommitInfo {
                hash: "c1".to_string(),
                message: "fix(web): crash".to_string(),
            },
        ],
    );

    let host = MockHost::new();
    let config = GithubConfig::default();
    let composer = NoteComposer::new(&repo, &host, &config);

    let outcome = composer
        .compose_and_publish("web", "web@1.2.3", Some("web@1.3.0"), "web")
        .expect("No-op composition must not error");

    assert!(outcome.is_none());
    assert!(host.releases().is_empty());
}

#[test]
fn test_composition_with_unresolvable_range_start_errors() {
    let repo = MockRepository::new();
    let host = MockHost::new();
    let config = GithubConfig::default();
    let composer = NoteComposer::new(&repo, &host, &config);

    let result = composer.compose_and_publish("web", "web@0.9.9", None, "web");
    assert!(result.is_err());
}
