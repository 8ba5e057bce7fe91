// tests/integration_test.rs
//
// End-to-end coverage over real temporary git repositories: the release
// sequence is executed with the git2-backed repository against a local bare
// remote, with the manifest mutator and release host mocked out.

use std::fs;
use std::path::Path;

use git2::Repository;
use tempfile::TempDir;

use mono_release::config::Config;
use mono_release::git::Git2Repository;
use mono_release::github::MockHost;
use mono_release::identity::StaticIdentity;
use mono_release::manifest::RecordingMutator;
use mono_release::orchestrator::{run_release, ReleaseArgs, ReleaseOutcome};

fn commit_file(repo: &Repository, name: &str, content: &str, message: &str) -> git2::Oid {
    let workdir = repo.workdir().expect("Repo should have a workdir");
    fs::write(workdir.join(name), content).expect("Could not write file");

    let mut index = repo.index().expect("Could not get index");
    index
        .add_path(Path::new(name))
        .expect("Could not add file to index");
    index.write().expect("Could not write index");

    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");
    let sig = repo.signature().expect("Could not get signature");

    let parents: Vec<git2::Commit> = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().unwrap()],
        Err(_) => vec![],
    };
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .expect("Could not create commit")
}

/// Repo layout: branch "main" carries the monorepo history, branch "widget"
/// is the app trunk lagging at the previous release, and a local bare repo
/// acts as origin.
fn setup_monorepo(previous_tag: &str) -> (TempDir, TempDir) {
    let work_dir = TempDir::new().expect("Could not create temp dir");
    let remote_dir = TempDir::new().expect("Could not create temp dir");

    Repository::init_bare(remote_dir.path()).expect("Could not init bare repo");

    let repo = Repository::init(work_dir.path()).expect("Could not init git repo");
    {
        let mut config = repo.config().expect("Could not get config");
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
    }

    let initial = commit_file(&repo, "README.md", "initial\n", "chore: init");
    let initial_commit = repo.find_commit(initial).unwrap();

    // Pin the branch names instead of relying on the init default
    repo.branch("main", &initial_commit, true).unwrap();
    repo.branch("widget", &initial_commit, true).unwrap();
    repo.set_head("refs/heads/main").unwrap();

    repo.tag_lightweight(
        previous_tag,
        &repo.find_object(initial, None).unwrap(),
        false,
    )
    .unwrap();

    commit_file(&repo, "fix.txt", "fix\n", "fix(widget): stop crash on load");
    commit_file(&repo, "feat.txt", "feat\n", "feat(widget): add sorting");

    repo.remote("origin", remote_dir.path().to_str().unwrap())
        .unwrap();

    (work_dir, remote_dir)
}

#[test]
fn test_release_sequence_against_real_repository() {
    let (work_dir, remote_dir) = setup_monorepo("widget@1.0.0");

    let repo = Git2Repository::open(work_dir.path()).expect("Could not open repo");
    let mutator = RecordingMutator::new();
    let host = MockHost::new();
    let identity = StaticIdentity::new("Release Bot", "bot@example.com");
    let config = Config::default();

    let args = ReleaseArgs {
        app: "widget".to_string(),
        return_ref: "main".to_string(),
        remote: None,
        dry_run: false,
    };

    let outcome = run_release(&repo, &mutator, &host, &identity, &config, &args)
        .expect("Release should succeed");

    let plan = match outcome {
        ReleaseOutcome::Released { plan, report, .. } => {
            assert_eq!(report.completed.len(), 8);
            plan
        }
        other => panic!("Expected a completed release, got {:?}", other),
    };

    // fix + feat since widget@1.0.0 -> minor bump
    assert_eq!(plan.next_tag, "widget@1.1.0");
    assert_eq!(plan.release_branch, "release-widget-1.1.0");

    assert_eq!(
        mutator.calls(),
        vec![("widget".to_string(), "1.1.0".to_string())]
    );

    let verify = Repository::open(work_dir.path()).unwrap();

    // The release branch carries exactly one squash commit with the bare
    // version as its message
    let release_head = verify
        .find_branch("release-widget-1.1.0", git2::BranchType::Local)
        .expect("Release branch should exist")
        .into_reference()
        .peel_to_commit()
        .unwrap();
    assert_eq!(release_head.message().unwrap().trim(), "1.1.0");
    assert!(release_head.tree().unwrap().get_name("feat.txt").is_some());
    assert!(release_head.tree().unwrap().get_name("fix.txt").is_some());

    // The trunk commit was amended with the tag name and the squashed list
    let trunk_head = verify
        .find_branch("widget", git2::BranchType::Local)
        .expect("Trunk branch should exist")
        .into_reference()
        .peel_to_commit()
        .unwrap();
    let trunk_message = trunk_head.message().unwrap();
    assert!(trunk_message.starts_with("widget@1.1.0"));
    assert!(trunk_message.contains("* feat(widget): add sorting"));
    assert!(trunk_message.contains("* fix(widget): stop crash on load"));

    // Tag and trunk were pushed to origin
    let remote = Repository::open_bare(remote_dir.path()).unwrap();
    assert!(remote.find_reference("refs/tags/widget@1.1.0").is_ok());
    let pushed_trunk = remote
        .find_reference("refs/heads/widget")
        .expect("Trunk should be pushed");
    assert_eq!(pushed_trunk.target(), Some(trunk_head.id()));

    // The run ends back on the caller's ref
    assert_eq!(verify.head().unwrap().shorthand(), Some("main"));

    // Range carries no version-bearing commit, so no release was published
    assert!(host.releases().is_empty());
}

#[test]
fn test_dry_run_computes_next_version_without_mutations() {
    let (work_dir, remote_dir) = setup_monorepo("widget@1.2.3");

    let repo = Git2Repository::open(work_dir.path()).expect("Could not open repo");
    let mutator = RecordingMutator::new();
    let host = MockHost::new();
    let identity = StaticIdentity::new("Release Bot", "bot@example.com");
    let config = Config::default();

    let args = ReleaseArgs {
        app: "widget".to_string(),
        return_ref: "main".to_string(),
        remote: None,
        dry_run: true,
    };

    let outcome = run_release(&repo, &mutator, &host, &identity, &config, &args)
        .expect("Dry run should succeed");

    match outcome {
        ReleaseOutcome::Planned(plan) => {
            assert_eq!(plan.next_tag, "widget@1.3.0");
            assert_eq!(plan.previous_tag, "widget@1.2.3");
        }
        other => panic!("Expected a plan, got {:?}", other),
    }

    let verify = Repository::open(work_dir.path()).unwrap();
    assert!(verify.find_reference("refs/tags/widget@1.3.0").is_err());
    assert!(mutator.calls().is_empty());

    let remote = Repository::open_bare(remote_dir.path()).unwrap();
    assert!(remote.find_reference("refs/heads/widget").is_err());
}

#[test]
fn test_release_for_unreleased_app_is_fatal() {
    let (work_dir, _remote_dir) = setup_monorepo("widget@1.0.0");

    let repo = Git2Repository::open(work_dir.path()).expect("Could not open repo");
    let mutator = RecordingMutator::new();
    let host = MockHost::new();
    let identity = StaticIdentity::new("Release Bot", "bot@example.com");
    let config = Config::default();

    let args = ReleaseArgs {
        app: "gadget".to_string(),
        return_ref: "main".to_string(),
        remote: None,
        dry_run: false,
    };

    let err = run_release(&repo, &mutator, &host, &identity, &config, &args)
        .expect_err("Unreleased app should be an error");
    assert!(err.to_string().contains("No prior release tag"));

    // Nothing was created
    let verify = Repository::open(work_dir.path()).unwrap();
    assert!(verify.find_reference("refs/tags/gadget@1.0.1").is_err());
}

#[test]
fn test_chore_only_window_skips_release() {
    let work_dir = TempDir::new().expect("Could not create temp dir");
    let repo = Repository::init(work_dir.path()).unwrap();
    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test User").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
    }

    let initial = commit_file(&repo, "README.md", "initial\n", "chore: init");
    let initial_commit = repo.find_commit(initial).unwrap();
    repo.branch("main", &initial_commit, true).unwrap();
    repo.branch("widget", &initial_commit, true).unwrap();
    repo.set_head("refs/heads/main").unwrap();
    repo.tag_lightweight("widget@2.0.0", &repo.find_object(initial, None).unwrap(), false)
        .unwrap();

    commit_file(&repo, "docs.txt", "docs\n", "docs(widget): clarify usage");

    let release_repo = Git2Repository::open(work_dir.path()).unwrap();
    let mutator = RecordingMutator::new();
    let host = MockHost::new();
    let identity = StaticIdentity::new("Release Bot", "bot@example.com");
    let config = Config::default();

    let args = ReleaseArgs {
        app: "widget".to_string(),
        return_ref: "main".to_string(),
        remote: None,
        dry_run: false,
    };

    let outcome = run_release(&release_repo, &mutator, &host, &identity, &config, &args)
        .expect("Run should succeed as a no-op");

    assert!(matches!(outcome, ReleaseOutcome::Skipped(_)));
    let verify = Repository::open(work_dir.path()).unwrap();
    assert!(verify.find_reference("refs/tags/widget@2.0.1").is_err());
}
