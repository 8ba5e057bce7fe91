use crate::error::{ReleaseError, Result};
use std::fmt;

/// Semantic version triple for a released application
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// Magnitude of the version bump derived from a commit window.
///
/// `None` is a legitimate outcome of analysis and must be handled by the
/// caller; applying it is an error (there is no no-op release).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpDecision {
    Major,
    Minor,
    Patch,
    None,
}

impl fmt::Display for BumpDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BumpDecision::Major => "major",
            BumpDecision::Minor => "minor",
            BumpDecision::Patch => "patch",
            BumpDecision::None => "none",
        };
        write!(f, "{}", label)
    }
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a bare version string (e.g., "1.2.3" -> Version(1,2,3))
    ///
    /// All three components must be present and numeric; anything else is an
    /// error rather than a zero-fill.
    pub fn parse(version: &str) -> Result<Self> {
        let parts: Vec<&str> = version.split('.').collect();
        if parts.len() != 3 {
            return Err(ReleaseError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                version
            )));
        }

        let major = parts[0]
            .parse::<u32>()
            .map_err(|_| ReleaseError::version(format!("Invalid major version: {}", parts[0])))?;
        let minor = parts[1]
            .parse::<u32>()
            .map_err(|_| ReleaseError::version(format!("Invalid minor version: {}", parts[1])))?;
        let patch = parts[2]
            .parse::<u32>()
            .map_err(|_| ReleaseError::version(format!("Invalid patch version: {}", parts[2])))?;

        Ok(Version {
            major,
            minor,
            patch,
        })
    }

    /// Apply a bump decision, producing the next version.
    ///
    /// Component increments are checked; overflow fails closed instead of
    /// wrapping. `BumpDecision::None` is an error - callers wanting to skip
    /// a release must short-circuit before applying.
    pub fn apply(&self, decision: BumpDecision) -> Result<Self> {
        let bumped = |n: u32| -> Result<u32> {
            n.checked_add(1)
                .ok_or_else(|| ReleaseError::version(format!("Version component overflow: {}", n)))
        };

        match decision {
            BumpDecision::Major => Ok(Version {
                major: bumped(self.major)?,
                minor: 0,
                patch: 0,
            }),
            BumpDecision::Minor => Ok(Version {
                major: self.major,
                minor: bumped(self.minor)?,
                patch: 0,
            }),
            BumpDecision::Patch => Ok(Version {
                major: self.major,
                minor: self.minor,
                patch: bumped(self.patch)?,
            }),
            BumpDecision::None => Err(ReleaseError::version(
                "Cannot apply a 'none' bump - there is no no-op release",
            )),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
