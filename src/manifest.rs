//! Package manifest version mutation.
//!
//! The manifest is owned by the package tooling, not by this crate; the
//! release sequence only needs "set the persisted version to X" as an opaque
//! external step with a success/failure outcome.

use std::process::Command;
use std::sync::Mutex;

use crate::error::{ReleaseError, Result};

/// External collaborator that rewrites a package's persisted version field.
pub trait VersionMutator: Send + Sync {
    fn set_version(&self, app: &str, version: &str) -> Result<()>;
}

/// Mutator backed by the npm CLI.
///
/// Tag creation by npm is disabled first; the release sequence owns all
/// tagging.
pub struct NpmVersionMutator;

impl NpmVersionMutator {
    fn run(&self, args: &[&str]) -> Result<()> {
        let output = Command::new("npm")
            .args(args)
            .output()
            .map_err(|e| ReleaseError::manifest(format!("Cannot run npm: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReleaseError::manifest(format!(
                "npm {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        Ok(())
    }
}

impl VersionMutator for NpmVersionMutator {
    fn set_version(&self, _app: &str, version: &str) -> Result<()> {
        self.run(&["config", "set", "git-tag-version", "false"])?;
        self.run(&["version", version, "-f"])?;
        Ok(())
    }
}

/// Test mutator that records invocations instead of touching any manifest.
pub struct RecordingMutator {
    calls: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingMutator {
    pub fn new() -> Self {
        RecordingMutator {
            calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// A mutator that fails every invocation
    pub fn failing() -> Self {
        RecordingMutator {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for RecordingMutator {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionMutator for RecordingMutator {
    fn set_version(&self, app: &str, version: &str) -> Result<()> {
        if self.fail {
            return Err(ReleaseError::manifest("Scripted manifest failure"));
        }
        self.calls
            .lock()
            .unwrap()
            .push((app.to_string(), version.to_string()));
        Ok(())
    }
}
