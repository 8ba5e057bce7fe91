//! Changelog rendering and release publication.

use regex::Regex;

use crate::config::GithubConfig;
use crate::domain::{filter_by_scope, CommitRecord};
use crate::error::Result;
use crate::git::Repository;
use crate::github::{PublishedRelease, ReleaseHost, ReleasePayload};
use crate::source;

/// Render the markdown changelog body for a release range.
///
/// Commits are grouped into the customary sections; a breaking commit is
/// listed under the breaking heading as well as under its own type. Types
/// without a section (docs, chore, ...) do not appear in the body.
pub fn render_changelog(commits: &[CommitRecord]) -> String {
    fn entry(commit: &CommitRecord) -> String {
        format!("* {} ({})", commit.header, commit.hash)
    }

    fn typed<'a>(commits: &'a [CommitRecord], types: &[&str]) -> Vec<String> {
        commits
            .iter()
            .filter(|c| c.r#type.as_deref().map(|t| types.contains(&t)) == Some(true))
            .map(entry)
            .collect()
    }

    let sections = [
        (
            "⚠ BREAKING CHANGES",
            commits.iter().filter(|c| c.breaking).map(entry).collect(),
        ),
        ("Features", typed(commits, &["feat", "feature"])),
        ("Bug Fixes", typed(commits, &["fix"])),
        ("Performance Improvements", typed(commits, &["perf"])),
    ];

    let mut body = String::new();
    for (title, entries) in sections {
        if entries.is_empty() {
            continue;
        }
        if !body.is_empty() {
            body.push('\n');
        }
        body.push_str(&format!("### {}\n\n{}\n", title, entries.join("\n")));
    }

    body
}

/// Render the squashed-commit list appended to the amended trunk commit:
/// one `* header (hash)` line per commit.
pub fn render_squash_body(commits: &[CommitRecord]) -> String {
    commits
        .iter()
        .map(|c| format!("* {} ({})", c.header, c.hash))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Find the key commit of a range: the first commit, in newest-first order,
/// whose message contains a resolvable semantic version. Returns the
/// resolved version alongside the commit.
///
/// More than one commit can match; picking the latest by position is the
/// documented selection rule.
pub fn find_key_version(commits: &[CommitRecord]) -> Option<(&CommitRecord, semver::Version)> {
    let pattern = Regex::new(
        r"\d+\.\d+\.\d+(?:-[0-9A-Za-z][0-9A-Za-z.-]*)?(?:\+[0-9A-Za-z][0-9A-Za-z.-]*)?",
    )
    .ok()?;

    for commit in commits {
        if let Some(matched) = pattern.find(&commit.body) {
            if let Ok(version) = semver::Version::parse(matched.as_str()) {
                return Some((commit, version));
            }
        }
    }

    None
}

/// Composes release notes for a range and publishes them.
pub struct NoteComposer<'a, R: Repository, H: ReleaseHost> {
    repo: &'a R,
    host: &'a H,
    config: &'a GithubConfig,
}

impl<'a, R: Repository, H: ReleaseHost> NoteComposer<'a, R, H> {
    pub fn new(repo: &'a R, host: &'a H, config: &'a GithubConfig) -> Self {
        NoteComposer { repo, host, config }
    }

    /// Re-derive the commit range `(from, to]`, build the release payload
    /// and publish it with a single call to the host.
    ///
    /// The range traversal and scope filtering are the same ones bump
    /// resolution uses, so the published notes always describe the commits
    /// the version was computed from. When no commit in the range carries a
    /// resolvable version this is a no-op, reported as `Ok(None)` with no
    /// network call made. Host failures surface to the caller and are not
    /// retried.
    pub fn compose_and_publish(
        &self,
        app: &str,
        from: &str,
        to: Option<&str>,
        default_target: &str,
    ) -> Result<Option<PublishedRelease>> {
        let commits = source::get_commits(self.repo, from, to)?;
        let scoped = filter_by_scope(app, &commits);

        let (_, version) = match find_key_version(&scoped) {
            Some(found) => found,
            None => return Ok(None),
        };

        let tag_name = format!("{}@{}", app, version);
        let target = self
            .config
            .target_commitish
            .clone()
            .unwrap_or_else(|| default_target.to_string());

        let payload = ReleasePayload {
            tag_name: tag_name.clone(),
            name: tag_name,
            body: render_changelog(&scoped),
            draft: self.config.draft,
            prerelease: !version.pre.is_empty(),
            target_commitish: Some(target),
        };

        self.host.create_release(&payload).map(Some)
    }
}
