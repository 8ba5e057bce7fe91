use crate::error::{ReleaseError, Result};
use std::fmt;

use super::version::Version;

/// A release tag of the form `<app>@<version>`.
///
/// The tag string is the key identifying an immutable point in history; the
/// version-control system owns the tag, this type only parses and formats
/// the naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppTag {
    pub app: String,
    pub version: String,
}

impl AppTag {
    /// Build a tag for an app and version triple
    pub fn new(app: impl Into<String>, version: &Version) -> Self {
        AppTag {
            app: app.into(),
            version: version.to_string(),
        }
    }

    /// Parse a tag name into its app and version parts.
    ///
    /// The version part is everything after the last `@`, which keeps
    /// scoped-package style apps (`@org/pkg@1.2.3`) intact.
    pub fn parse(tag: &str) -> Result<Self> {
        let (app, version) = tag.rsplit_once('@').ok_or_else(|| {
            ReleaseError::tag(format!("Tag '{}' is not of the form <app>@<version>", tag))
        })?;

        if app.is_empty() || version.is_empty() {
            return Err(ReleaseError::tag(format!(
                "Tag '{}' is missing an app or version part",
                tag
            )));
        }

        Ok(AppTag {
            app: app.to_string(),
            version: version.to_string(),
        })
    }

    /// Parse the version part as a triple
    pub fn version_triple(&self) -> Result<Version> {
        Version::parse(&self.version)
    }

    /// Find the latest release tag for an app among all repository tags.
    ///
    /// Tags are matched on the `<app>@` prefix; the last match in the given
    /// order wins. Returns `None` when the app has never been released.
    pub fn latest_for(app: &str, tags: &[String]) -> Option<AppTag> {
        let prefix = format!("{}@", app);
        tags.iter()
            .filter(|t| t.starts_with(&prefix))
            .last()
            .and_then(|t| AppTag::parse(t).ok())
    }
}

impl fmt::Display for AppTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.app, self.version)
    }
}
