use crate::error::{ReleaseError, Result};
use crate::git::{CommitInfo, Repository};
use std::collections::HashMap;
use std::sync::Mutex;

/// Mock repository for testing without actual git operations.
///
/// State lives behind mutexes so the mock satisfies the `Repository`
/// trait's `&self` mutation contract. Every mutating call is appended to an
/// operation journal, and a single operation can be scripted to fail so
/// partial-sequence scenarios are testable.
pub struct MockRepository {
    head: Mutex<String>,
    tags: Mutex<Vec<(String, String)>>,
    branches: Mutex<HashMap<String, String>>,
    windows: Mutex<HashMap<Option<String>, Vec<CommitInfo>>>,
    operations: Mutex<Vec<String>>,
    fail_on: Mutex<Option<String>>,
    commit_counter: Mutex<u32>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            head: Mutex::new("0000000000000000000000000000000000000000".to_string()),
            tags: Mutex::new(Vec::new()),
            branches: Mutex::new(HashMap::new()),
            windows: Mutex::new(HashMap::new()),
            operations: Mutex::new(Vec::new()),
            fail_on: Mutex::new(None),
            commit_counter: Mutex::new(0),
        }
    }

    /// Set the current HEAD hash
    pub fn set_head(&self, hash: impl Into<String>) {
        *self.head.lock().unwrap() = hash.into();
    }

    /// Add a tag pointing to a commit hash
    pub fn add_tag(&self, name: impl Into<String>, hash: impl Into<String>) {
        self.tags.lock().unwrap().push((name.into(), hash.into()));
    }

    /// Add a branch pointing to a commit hash
    pub fn add_branch(&self, name: impl Into<String>, hash: impl Into<String>) {
        self.branches
            .lock()
            .unwrap()
            .insert(name.into(), hash.into());
    }

    /// Script the commit window returned for ranges ending at `to`
    /// (`None` is the HEAD window)
    pub fn set_commits(&self, to: Option<&str>, commits: Vec<CommitInfo>) {
        self.windows
            .lock()
            .unwrap()
            .insert(to.map(|s| s.to_string()), commits);
    }

    /// Make the named operation fail when it is next invoked
    pub fn fail_at(&self, operation: impl Into<String>) {
        *self.fail_on.lock().unwrap() = Some(operation.into());
    }

    /// Journal of mutating operations, in invocation order
    pub fn operations(&self) -> Vec<String> {
        self.operations.lock().unwrap().clone()
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.lock().unwrap().iter().any(|(n, _)| n == name)
    }

    pub fn has_branch(&self, name: &str) -> bool {
        self.branches.lock().unwrap().contains_key(name)
    }

    fn record(&self, operation: String) {
        self.operations.lock().unwrap().push(operation);
    }

    fn maybe_fail(&self, operation: &str) -> Result<()> {
        let fail_on = self.fail_on.lock().unwrap();
        match fail_on.as_deref() {
            Some(op) if op == operation => Err(ReleaseError::branch(format!(
                "Scripted failure in {}",
                operation
            ))),
            _ => Ok(()),
        }
    }

    fn next_hash(&self) -> String {
        let mut counter = self.commit_counter.lock().unwrap();
        *counter += 1;
        format!("{:040x}", *counter)
    }

    fn lookup(&self, name: &str) -> Option<String> {
        if name == "HEAD" {
            return Some(self.head.lock().unwrap().clone());
        }
        if let Some((_, hash)) = self
            .tags
            .lock()
            .unwrap()
            .iter()
            .find(|(n, _)| n == name)
        {
            return Some(hash.clone());
        }
        if let Some(hash) = self.branches.lock().unwrap().get(name) {
            return Some(hash.clone());
        }
        None
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn head_hash(&self) -> Result<String> {
        Ok(self.head.lock().unwrap().clone())
    }

    fn resolve_ref(&self, name: &str) -> Result<String> {
        self.lookup(name)
            .ok_or_else(|| ReleaseError::tag(format!("Cannot resolve '{}'", name)))
    }

    fn find_tag_hash(&self, tag_name: &str) -> Result<Option<String>> {
        Ok(self
            .tags
            .lock()
            .unwrap()
            .iter()
            .find(|(n, _)| n == tag_name)
            .map(|(_, hash)| hash.clone()))
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self
            .tags
            .lock()
            .unwrap()
            .iter()
            .map(|(n, _)| n.clone())
            .collect())
    }

    fn commits_between(&self, from: &str, to: Option<&str>) -> Result<Vec<CommitInfo>> {
        // The range start must resolve, matching the real implementation
        self.resolve_ref(from)?;

        let windows = self.windows.lock().unwrap();
        let window = windows
            .get(&to.map(|s| s.to_string()))
            .or_else(|| windows.get(&None))
            .cloned()
            .unwrap_or_default();
        Ok(window)
    }

    fn set_identity(&self, name: &str, email: &str) -> Result<()> {
        self.maybe_fail("set_identity")?;
        self.record(format!("set_identity {} <{}>", name, email));
        Ok(())
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        self.maybe_fail("create_annotated_tag")?;
        if self.has_tag(name) {
            return Err(ReleaseError::tag(format!("Tag '{}' already exists", name)));
        }
        let head = self.head.lock().unwrap().clone();
        self.tags.lock().unwrap().push((name.to_string(), head));
        self.record(format!("create_annotated_tag {} ({})", name, message));
        Ok(())
    }

    fn create_branch(&self, name: &str, from_ref: &str) -> Result<()> {
        self.maybe_fail("create_branch")?;
        if self.has_branch(name) {
            return Err(ReleaseError::branch(format!(
                "Branch '{}' already exists",
                name
            )));
        }
        let target = self.resolve_ref(from_ref)?;
        self.branches
            .lock()
            .unwrap()
            .insert(name.to_string(), target);
        self.record(format!("create_branch {} from {}", name, from_ref));
        Ok(())
    }

    fn checkout(&self, reference: &str) -> Result<()> {
        self.maybe_fail("checkout")?;
        if let Some(hash) = self.lookup(reference) {
            *self.head.lock().unwrap() = hash;
        }
        self.record(format!("checkout {}", reference));
        Ok(())
    }

    fn squash_merge(&self, reference: &str) -> Result<()> {
        self.maybe_fail("squash_merge")?;
        self.record(format!("squash_merge {}", reference));
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<String> {
        self.maybe_fail("commit")?;
        let hash = self.next_hash();
        *self.head.lock().unwrap() = hash.clone();
        self.record(format!("commit {}", message));
        Ok(hash)
    }

    fn cherry_pick(&self, hash: &str) -> Result<String> {
        self.maybe_fail("cherry_pick")?;
        let new_hash = self.next_hash();
        *self.head.lock().unwrap() = new_hash.clone();
        self.record(format!("cherry_pick {}", hash));
        Ok(new_hash)
    }

    fn stage(&self, pathspecs: &[&str]) -> Result<()> {
        self.maybe_fail("stage")?;
        self.record(format!("stage {}", pathspecs.join(" ")));
        Ok(())
    }

    fn amend_message(&self, message: &str) -> Result<String> {
        self.maybe_fail("amend_message")?;
        let hash = self.next_hash();
        *self.head.lock().unwrap() = hash.clone();
        self.record(format!("amend_message {}", message));
        Ok(hash)
    }

    fn push(&self, remote: &str, refspecs: &[&str]) -> Result<()> {
        self.maybe_fail("push")?;
        self.record(format!("push {} {}", remote, refspecs.join(" ")));
        Ok(())
    }
}
