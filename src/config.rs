use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ReleaseError, Result};

/// Represents the complete configuration for mono-release.
///
/// Contains git naming conventions, GitHub release settings and the
/// conventional-commit type classification used for bump resolution.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub conventional_commits: ConventionalCommitsConfig,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_trunk_pattern() -> String {
    "{app}".to_string()
}

fn default_branch_pattern() -> String {
    "release-{app}-{version}".to_string()
}

/// Returns the default manifest pathspecs staged before amending the
/// cherry-picked trunk commit.
fn default_manifest_paths() -> Vec<String> {
    vec!["package*.json".to_string()]
}

/// Configuration for git naming and push behavior.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReleaseConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Trunk branch for an app; `{app}` expands to the app name
    #[serde(default = "default_trunk_pattern")]
    pub trunk_pattern: String,

    /// Release branch name; `{app}` and `{version}` placeholders
    #[serde(default = "default_branch_pattern")]
    pub branch_pattern: String,

    #[serde(default = "default_manifest_paths")]
    pub manifest_paths: Vec<String>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            remote: default_remote(),
            trunk_pattern: default_trunk_pattern(),
            branch_pattern: default_branch_pattern(),
            manifest_paths: default_manifest_paths(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

/// Configuration for the GitHub release call.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GithubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// "owner/name" slug; falls back to the GITHUB_REPOSITORY environment
    /// variable when unset
    #[serde(default)]
    pub repository: Option<String>,

    #[serde(default)]
    pub draft: bool,

    /// Commitish the release points at; defaults to the app trunk branch
    #[serde(default)]
    pub target_commitish: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            api_url: default_api_url(),
            repository: None,
            draft: false,
            target_commitish: None,
        }
    }
}

/// Returns the default commit types that trigger a minor bump.
fn default_minor_types() -> Vec<String> {
    vec!["feat".to_string(), "feature".to_string()]
}

/// Returns the default commit types that trigger a patch bump.
fn default_patch_types() -> Vec<String> {
    vec!["fix".to_string(), "perf".to_string(), "refactor".to_string()]
}

/// Configuration for conventional commit classification.
///
/// Breaking changes always win regardless of type; these lists decide which
/// non-breaking types count as minor or patch. Types in neither list leave
/// the bump at `none`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConventionalCommitsConfig {
    #[serde(default = "default_minor_types")]
    pub minor_types: Vec<String>,

    #[serde(default = "default_patch_types")]
    pub patch_types: Vec<String>,
}

impl Default for ConventionalCommitsConfig {
    fn default() -> Self {
        ConventionalCommitsConfig {
            minor_types: default_minor_types(),
            patch_types: default_patch_types(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            release: ReleaseConfig::default(),
            github: GithubConfig::default(),
            conventional_commits: ConventionalCommitsConfig::default(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `monorelease.toml` in current directory
/// 3. `.monorelease.toml` in the user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./monorelease.toml").exists() {
        fs::read_to_string("./monorelease.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".monorelease.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| ReleaseError::config(format!("Cannot parse config: {}", e)))?;
    Ok(config)
}
