use regex::Regex;

/// Structured record of one commit in a release range.
///
/// Produced by the commit source, consumed by the scope filter, the bump
/// resolver and the note composer. Records are immutable once parsed and
/// sequences of them keep the underlying log order (newest first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Full commit hash
    pub hash: String,
    /// First line of the message
    pub header: String,
    /// Conventional commit type, `None` for non-conventional messages
    pub r#type: Option<String>,
    /// Conventional commit scope, `None` when unscoped
    pub scope: Option<String>,
    /// Breaking-change marker (`!` in the header or a BREAKING CHANGE footer)
    pub breaking: bool,
    /// Raw message body
    pub body: String,
}

fn has_breaking_footer(message: &str) -> bool {
    message.contains("BREAKING CHANGE:") || message.contains("BREAKING-CHANGE:")
}

impl CommitRecord {
    /// Parse a raw commit message according to the conventional commits grammar.
    ///
    /// Supported header forms:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    ///
    /// Anything else yields a record with no type, which the commit source
    /// filters out of release ranges.
    pub fn parse(hash: impl Into<String>, message: &str) -> Self {
        let hash = hash.into();
        let header = message.lines().next().unwrap_or("").to_string();

        // Case 1: type(scope)!: description or type(scope): description
        if let Some(captures) = Regex::new(r"^([a-z]+)\(([^)]+)\)(!?):\s*(.*)")
            .ok()
            .and_then(|re| re.captures(&header))
        {
            let r#type = captures.get(1).map(|m| m.as_str().to_string());
            let scope = captures.get(2).map(|m| m.as_str().to_string());
            let has_exclamation = captures.get(3).map(|m| m.as_str()) == Some("!");

            return CommitRecord {
                hash,
                header: header.clone(),
                r#type,
                scope,
                breaking: has_exclamation || has_breaking_footer(message),
                body: message.to_string(),
            };
        }

        // Case 2: type!: description (breaking change without scope)
        if let Some(captures) = Regex::new(r"^([a-z]+)!:\s*(.*)")
            .ok()
            .and_then(|re| re.captures(&header))
        {
            let r#type = captures.get(1).map(|m| m.as_str().to_string());

            return CommitRecord {
                hash,
                header: header.clone(),
                r#type,
                scope: None,
                breaking: true,
                body: message.to_string(),
            };
        }

        // Case 3: type: description (no scope)
        if let Some(captures) = Regex::new(r"^([a-z]+):\s*(.*)")
            .ok()
            .and_then(|re| re.captures(&header))
        {
            let r#type = captures.get(1).map(|m| m.as_str().to_string());

            return CommitRecord {
                hash,
                header: header.clone(),
                r#type,
                scope: None,
                breaking: has_breaking_footer(message),
                body: message.to_string(),
            };
        }

        // Non-conventional commit
        CommitRecord {
            hash,
            header: header.clone(),
            r#type: None,
            scope: None,
            breaking: false,
            body: message.to_string(),
        }
    }

    /// Whether the header parsed as a conventional commit
    pub fn is_conventional(&self) -> bool {
        self.r#type.is_some()
    }

    /// Merge commits never carry release semantics
    pub fn is_merge(&self) -> bool {
        self.header.starts_with("Merge ")
    }
}
