//! Exclusion rules for the staged tree
//!
//! A pattern is either a plain entry name (`__pycache__`, `.DS_Store`) or a
//! suffix wildcard of the form `*.ext` (`*.egg-info`). Every rule is checked
//! against both directory and file names.

/// Build, cache, VCS and virtualenv artifacts never shipped with the backend
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "__pycache__",
    ".git",
    ".venv",
    "venv",
    "env",
    "*.egg-info",
    "build",
    "dist",
    ".DS_Store",
    ".gitignore",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionRule {
    /// Exact entry name
    Name(String),
    /// Entry name ending with the suffix, leading dot included
    Suffix(String),
}

impl ExclusionRule {
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_prefix('*') {
            Some(suffix) if suffix.starts_with('.') && suffix.len() > 1 => {
                Self::Suffix(suffix.to_string())
            }
            _ => Self::Name(pattern.to_string()),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Name(n) => name == n,
            Self::Suffix(s) => name.ends_with(s.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    rules: Vec<ExclusionRule>,
}

impl ExclusionSet {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            rules: patterns
                .into_iter()
                .map(|p| ExclusionRule::parse(p.as_ref()))
                .collect(),
        }
    }

    /// Add more patterns on top of the current rules
    #[must_use]
    pub fn extend<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.rules
            .extend(patterns.into_iter().map(|p| ExclusionRule::parse(p.as_ref())));
        self
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(name))
    }

    pub fn rules(&self) -> &[ExclusionRule] {
        &self.rules
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDES)
    }
}
