use crate::error::{ReleaseError, Result};
use crate::git::CommitInfo;
use git2::{build::CheckoutBuilder, ObjectType, Oid, Repository as Git2Repo};
use std::path::Path;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from an existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn resolve_commit_oid(&self, name: &str) -> Result<Oid> {
        let object = self
            .repo
            .revparse_single(name)
            .map_err(|e| ReleaseError::tag(format!("Cannot resolve '{}': {}", name, e)))?;

        let commit = object
            .peel(ObjectType::Commit)
            .map_err(|e| ReleaseError::tag(format!("'{}' is not a commit: {}", name, e)))?;

        Ok(commit.id())
    }

    fn head_commit(&self) -> Result<git2::Commit<'_>> {
        let commit = self.repo.head()?.peel_to_commit()?;
        Ok(commit)
    }

    fn write_index_tree(&self) -> Result<git2::Tree<'_>> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        Ok(self.repo.find_tree(tree_id)?)
    }

    fn remote_callbacks(&self) -> git2::RemoteCallbacks<'_> {
        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            if allowed_types.contains(git2::CredentialType::SSH_KEY) {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                let key_paths = vec![
                    format!("{}/.ssh/id_ed25519", home),
                    format!("{}/.ssh/id_rsa", home),
                    format!("{}/.ssh/id_ecdsa", home),
                ];

                for key_path in key_paths {
                    let path = std::path::Path::new(&key_path);
                    if path.exists() {
                        if let Ok(cred) = git2::Cred::ssh_key(
                            username_from_url.unwrap_or("git"),
                            None,
                            path,
                            None,
                        ) {
                            return Ok(cred);
                        }
                    }
                }

                if let Ok(cred) = git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
                {
                    return Ok(cred);
                }
            }

            git2::Cred::default()
        });

        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                Err(git2::Error::from_str(&format!(
                    "Push rejected for {}: {}",
                    refname, status
                )))
            } else {
                Ok(())
            }
        });

        callbacks
    }
}

impl super::Repository for Git2Repository {
    fn head_hash(&self) -> Result<String> {
        let head = self.repo.head()?;
        let oid = head
            .target()
            .ok_or_else(|| ReleaseError::branch("HEAD is detached or invalid"))?;
        Ok(oid.to_string())
    }

    fn resolve_ref(&self, name: &str) -> Result<String> {
        Ok(self.resolve_commit_oid(name)?.to_string())
    }

    fn find_tag_hash(&self, tag_name: &str) -> Result<Option<String>> {
        let reference_name = format!("refs/tags/{}", tag_name);

        match self.repo.find_reference(&reference_name) {
            Ok(reference) => {
                let oid = reference
                    .peel(ObjectType::Commit)
                    .map_err(|e| ReleaseError::tag(format!("Cannot peel tag: {}", e)))?
                    .id();

                Ok(Some(oid.to_string()))
            }
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(ReleaseError::tag(format!(
                "Cannot find tag '{}': {}",
                tag_name, e
            ))),
        }
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn commits_between(&self, from: &str, to: Option<&str>) -> Result<Vec<CommitInfo>> {
        let from_oid = self.resolve_commit_oid(from)?;
        let to_oid = match to {
            Some(name) => self.resolve_commit_oid(name)?,
            None => self.head_commit()?.id(),
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(to_oid)?;

        // Newest first, stopping before the range start
        let mut commits = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;

            if oid == from_oid {
                break;
            }

            let commit = self.repo.find_commit(oid)?;
            let message = commit.message().unwrap_or("(empty message)").to_string();

            commits.push(CommitInfo {
                hash: oid.to_string(),
                message,
            });
        }

        Ok(commits)
    }

    fn set_identity(&self, name: &str, email: &str) -> Result<()> {
        let mut config = self.repo.config()?;
        config.set_str("user.name", name)?;
        config.set_str("user.email", email)?;
        Ok(())
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        if self.find_tag_hash(name)?.is_some() {
            return Err(ReleaseError::tag(format!("Tag '{}' already exists", name)));
        }

        let head = self.head_commit()?;
        let signature = self.repo.signature()?;

        self.repo
            .tag(name, head.as_object(), &signature, message, false)
            .map_err(|e| ReleaseError::tag(format!("Cannot create tag '{}': {}", name, e)))?;

        Ok(())
    }

    fn create_branch(&self, name: &str, from_ref: &str) -> Result<()> {
        let oid = self.resolve_commit_oid(from_ref)?;
        let commit = self.repo.find_commit(oid)?;

        self.repo
            .branch(name, &commit, false)
            .map_err(|e| ReleaseError::branch(format!("Cannot create branch '{}': {}", name, e)))?;

        Ok(())
    }

    fn checkout(&self, reference: &str) -> Result<()> {
        let (object, resolved) = self
            .repo
            .revparse_ext(reference)
            .map_err(|e| ReleaseError::branch(format!("Cannot resolve '{}': {}", reference, e)))?;

        let mut builder = CheckoutBuilder::new();
        builder.force();
        self.repo.checkout_tree(&object, Some(&mut builder))?;

        match resolved {
            Some(r) => {
                let name = r.name().ok_or_else(|| {
                    ReleaseError::branch(format!("Reference for '{}' has no name", reference))
                })?;
                self.repo.set_head(name)?;
            }
            None => self.repo.set_head_detached(object.id())?,
        }

        Ok(())
    }

    fn squash_merge(&self, reference: &str) -> Result<()> {
        let theirs_oid = self.resolve_commit_oid(reference)?;
        let theirs = self.repo.find_commit(theirs_oid)?;
        let ours = self.head_commit()?;

        let mut merged = self.repo.merge_commits(&ours, &theirs, None)?;
        if merged.has_conflicts() {
            return Err(ReleaseError::branch(format!(
                "Squash merge of '{}' has conflicts",
                reference
            )));
        }

        // Stage the merged tree and materialize it in the working tree
        // without recording a merge state, so the next commit is a plain
        // single-parent commit.
        let tree_id = merged.write_tree_to(&self.repo)?;
        let tree = self.repo.find_tree(tree_id)?;

        let mut builder = CheckoutBuilder::new();
        builder.force();
        self.repo
            .checkout_tree(tree.as_object(), Some(&mut builder))?;

        let mut index = self.repo.index()?;
        index.read_tree(&tree)?;
        index.write()?;

        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        let tree = self.write_index_tree()?;
        let signature = self.repo.signature()?;
        let parent = self.head_commit()?;

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &[&parent])?;

        Ok(oid.to_string())
    }

    fn cherry_pick(&self, hash: &str) -> Result<String> {
        let oid = Oid::from_str(hash)
            .map_err(|e| ReleaseError::branch(format!("Invalid commit hash '{}': {}", hash, e)))?;
        let picked = self.repo.find_commit(oid)?;

        self.repo.cherrypick(&picked, None)?;

        let index = self.repo.index()?;
        if index.has_conflicts() {
            self.repo.cleanup_state()?;
            return Err(ReleaseError::branch(format!(
                "Cherry-pick of {} has conflicts",
                hash
            )));
        }
        drop(index);

        let tree = self.write_index_tree()?;
        let committer = self.repo.signature()?;
        let parent = self.head_commit()?;
        let message = picked.message().unwrap_or("(empty message)").to_string();

        let new_oid = self.repo.commit(
            Some("HEAD"),
            &picked.author(),
            &committer,
            &message,
            &tree,
            &[&parent],
        )?;

        self.repo.cleanup_state()?;

        Ok(new_oid.to_string())
    }

    fn stage(&self, pathspecs: &[&str]) -> Result<()> {
        let mut index = self.repo.index()?;
        index.add_all(
            pathspecs.iter().copied(),
            git2::IndexAddOption::DEFAULT,
            None,
        )?;
        index.write()?;
        Ok(())
    }

    fn amend_message(&self, message: &str) -> Result<String> {
        let tree = self.write_index_tree()?;
        let head = self.head_commit()?;

        let oid = head.amend(Some("HEAD"), None, None, None, Some(message), Some(&tree))?;

        Ok(oid.to_string())
    }

    fn push(&self, remote: &str, refspecs: &[&str]) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| ReleaseError::remote(format!("Cannot find remote: {}", e)))?;

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(self.remote_callbacks());

        match remote.push(refspecs, Some(&mut push_options)) {
            Ok(_) => Ok(()),
            Err(e) if e.class() == git2::ErrorClass::Net => Err(ReleaseError::remote(format!(
                "Network error during push: {}",
                e
            ))),
            Err(e) => Err(ReleaseError::remote(format!("Push failed: {}", e))),
        }
    }
}

// SAFETY: Git2Repository wraps git2::Repository which is Send. The release
// workflow holds one handle per invocation and never mutates concurrently;
// libgit2 is thread-safe for the read paths shared across threads.
unsafe impl Sync for Git2Repository {}
