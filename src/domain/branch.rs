/// Branch naming pattern with `{app}` and `{version}` placeholders
/// (e.g., "release-{app}-{version}").
#[derive(Debug, Clone)]
pub struct BranchPattern {
    pub pattern: String,
}

impl BranchPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        BranchPattern {
            pattern: pattern.into(),
        }
    }

    /// Format a branch name for an app and version.
    /// Example: pattern="release-{app}-{version}", app="web", version="1.3.0"
    /// -> "release-web-1.3.0"
    pub fn format(&self, app: &str, version: &str) -> String {
        self.pattern
            .replace("{app}", app)
            .replace("{version}", version)
    }
}
