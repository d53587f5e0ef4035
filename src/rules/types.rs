use crate::url::matches_path_prefix;
use regex::Regex;
use serde::Deserialize;
use std::fmt;

/// Coarse category of a referer source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Medium {
    /// Search engine; may carry a search term
    Search,
    /// Social network
    Social,
    /// Navigation within the site itself
    Internal,
    /// Recognized source without a better category
    Unknown,
}

impl Medium {
    pub const ALL: [Medium; 4] = [
        Medium::Search,
        Medium::Social,
        Medium::Internal,
        Medium::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Social => "social",
            Self::Internal => "internal",
            Self::Unknown => "unknown",
        }
    }

    /// Parses a medium name as written in rule files (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a path pattern is compared against a referer path
#[derive(Debug, Clone)]
pub enum PathMatcher {
    /// Segment-aware prefix, see [`matches_path_prefix`]
    Prefix(String),
    /// Regular expression searched anywhere in the path
    Regex(Regex),
}

impl PartialEq for PathMatcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Prefix(a), Self::Prefix(b)) => a == b,
            (Self::Regex(a), Self::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

/// One path-specific search term rule
#[derive(Debug, Clone, PartialEq)]
pub struct PathPattern {
    pub matcher: PathMatcher,

    /// Query parameter holding the search term for matching paths
    pub parameter: String,
}

impl PathPattern {
    pub fn prefix(prefix: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            matcher: PathMatcher::Prefix(prefix.into()),
            parameter: parameter.into(),
        }
    }

    pub fn regex(pattern: &str, parameter: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            matcher: PathMatcher::Regex(Regex::new(pattern)?),
            parameter: parameter.into(),
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        match &self.matcher {
            PathMatcher::Prefix(prefix) => matches_path_prefix(prefix, path),
            PathMatcher::Regex(re) => re.is_match(path),
        }
    }

    /// The prefix or regex source, for log and error messages
    pub fn pattern(&self) -> &str {
        match &self.matcher {
            PathMatcher::Prefix(prefix) => prefix,
            PathMatcher::Regex(re) => re.as_str(),
        }
    }
}

/// One entry of the rule database
#[derive(Debug, Clone, PartialEq)]
pub struct RefererRule {
    /// Registrable domain used as the lookup key (lowercase)
    pub domain: String,

    pub medium: Medium,

    /// Display name, e.g. "Google"
    pub provider_name: String,

    /// Checked in order; the first match decides the term parameter
    pub path_patterns: Vec<PathPattern>,

    /// Term parameter used when no path pattern matches
    pub default_parameter: Option<String>,
}

impl RefererRule {
    pub fn new(
        domain: impl Into<String>,
        medium: Medium,
        provider_name: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            medium,
            provider_name: provider_name.into(),
            path_patterns: Vec::new(),
            default_parameter: None,
        }
    }

    pub fn with_path(mut self, pattern: PathPattern) -> Self {
        self.path_patterns.push(pattern);
        self
    }

    pub fn with_default_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.default_parameter = Some(parameter.into());
        self
    }

    /// Resolves the query parameter holding the search term for a path
    ///
    /// Returns `None` for non-search rules, and for search rules where no path
    /// pattern matches and no default parameter is designated.
    pub fn term_parameter(&self, path: &str) -> Option<&str> {
        if self.medium != Medium::Search {
            return None;
        }

        self.path_patterns
            .iter()
            .find(|p| p.matches(path))
            .map(|p| p.parameter.as_str())
            .or(self.default_parameter.as_deref())
    }
}

/// Top-level layout of a rule file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RuleFile {
    #[serde(default, rename = "referer")]
    pub referers: Vec<RawRule>,
}

/// A `[[referer]]` table as written in a rule file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawRule {
    pub domain: String,

    pub medium: String,

    pub name: String,

    #[serde(default)]
    pub parameter: Option<String>,

    #[serde(default)]
    pub paths: Vec<RawPath>,
}

/// A `[[referer.paths]]` table as written in a rule file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawPath {
    #[serde(default)]
    pub prefix: Option<String>,

    #[serde(default)]
    pub regex: Option<String>,

    pub parameter: String,
}
