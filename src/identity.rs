//! Resolution of the identity used for release commits.
//!
//! The workflow is parameterized over a resolution strategy so one
//! orchestrator serves both CI runs (where the acting user comes from the
//! hosting platform) and local or scripted runs (where it is given
//! directly).

use crate::error::Result;
use crate::github::{GithubClient, UserProfile};

/// Name and email configured on the repository before any commit is made
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

/// Strategy for determining the acting identity
pub trait IdentityResolver {
    fn resolve(&self) -> Result<GitIdentity>;
}

/// Fixed identity, for local runs and tests
pub struct StaticIdentity {
    identity: GitIdentity,
}

impl StaticIdentity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        StaticIdentity {
            identity: GitIdentity {
                name: name.into(),
                email: email.into(),
            },
        }
    }
}

impl IdentityResolver for StaticIdentity {
    fn resolve(&self) -> Result<GitIdentity> {
        Ok(self.identity.clone())
    }
}

/// Identity of the CI actor, looked up through the hosting platform.
///
/// Profiles may hide name or email; those fall back to the login and the
/// noreply address so a commit identity always materializes.
pub struct GithubActorIdentity {
    client: GithubClient,
    username: String,
}

impl GithubActorIdentity {
    pub fn new(client: GithubClient, username: impl Into<String>) -> Self {
        GithubActorIdentity {
            client,
            username: username.into(),
        }
    }
}

pub(crate) fn identity_from_profile(profile: &UserProfile) -> GitIdentity {
    GitIdentity {
        name: profile
            .name
            .clone()
            .unwrap_or_else(|| profile.login.clone()),
        email: profile
            .email
            .clone()
            .unwrap_or_else(|| format!("{}@users.noreply.github.com", profile.login)),
    }
}

impl IdentityResolver for GithubActorIdentity {
    fn resolve(&self) -> Result<GitIdentity> {
        let profile = self.client.get_user(&self.username)?;
        Ok(identity_from_profile(&profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_identity() {
        let resolver = StaticIdentity::new("Release Bot", "bot@example.com");
        let identity = resolver.resolve().unwrap();
        assert_eq!(identity.name, "Release Bot");
        assert_eq!(identity.email, "bot@example.com");
    }

    #[test]
    fn test_profile_with_public_fields() {
        let profile = UserProfile {
            login: "octocat".to_string(),
            name: Some("The Octocat".to_string()),
            email: Some("octocat@github.com".to_string()),
        };
        let identity = identity_from_profile(&profile);
        assert_eq!(identity.name, "The Octocat");
        assert_eq!(identity.email, "octocat@github.com");
    }

    #[test]
    fn test_profile_with_hidden_fields_falls_back() {
        let profile = UserProfile {
            login: "octocat".to_string(),
            name: None,
            email: None,
        };
        let identity = identity_from_profile(&profile);
        assert_eq!(identity.name, "octocat");
        assert_eq!(identity.email, "octocat@users.noreply.github.com");
    }
}
