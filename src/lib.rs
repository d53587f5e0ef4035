//! Referal: referer classification for event pipelines
//!
//! This crate classifies HTTP referer URLs into structured attributes: whether
//! the referer is a known source, its provider name, its medium (search, social,
//! internal or unknown), the search term for search engines, and the referer host.
//!
//! The rule database is loaded once at startup and shared read-only by every
//! classification call. Classification itself is pure and never fails; a
//! malformed referer simply classifies as unknown.
//!
//! ```
//! use referal::{classify, Medium, RuleDatabase};
//!
//! let db = RuleDatabase::bundled().unwrap();
//! let result = classify("https://www.google.com/search?q=logstash+referer", None, &db);
//!
//! assert!(result.known);
//! assert_eq!(result.medium, Some(Medium::Search));
//! assert_eq!(result.search_term.as_deref(), Some("logstash referer"));
//! ```

pub mod classify;
pub mod config;
pub mod filter;
pub mod output;
pub mod rules;
pub mod url;

use thiserror::Error;

/// Main error type for Referal operations
#[derive(Debug, Error)]
pub enum ReferalError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Rule database error: {0}")]
    Rules(#[from] DatabaseLoadError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised while building the rule database
///
/// These are fatal at startup. Every variant names the rule source it came from.
#[derive(Debug, Error)]
pub enum DatabaseLoadError {
    #[error("Failed to read rule file {origin}: {source}")]
    Io {
        origin: String,
        source: std::io::Error,
    },

    #[error("Failed to parse rule file {origin}: {source}")]
    Parse {
        origin: String,
        source: toml::de::Error,
    },

    #[error("Invalid rule '{domain}' in {origin}: {message}")]
    Validation {
        origin: String,
        domain: String,
        message: String,
    },

    #[error("Base rule file {origin} defines no [[referer]] entries")]
    EmptyRuleSet { origin: String },

    #[error("Duplicate domain '{domain}' in {origin}")]
    DuplicateDomain { origin: String, domain: String },

    #[error(
        "Unknown medium '{medium}' for '{domain}' in {origin} (expected search, social, internal or unknown)"
    )]
    UnknownMedium {
        origin: String,
        domain: String,
        medium: String,
    },

    #[error("Invalid path pattern '{pattern}' for '{domain}' in {origin}: {source}")]
    InvalidPattern {
        origin: String,
        domain: String,
        pattern: String,
        source: regex::Error,
    },
}

/// URL-specific errors
///
/// These never leave the normalizer: a referer that fails to parse is
/// classified as unknown.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Empty URL")]
    Empty,

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Per-event faults caught by [`filter::RefererFilter`]
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Field '{field}' is not a string: {value}")]
    SourceNotString {
        field: String,
        value: serde_json::Value,
    },

    #[error("Target field '{field}' is not an object: {value}")]
    TargetNotObject {
        field: String,
        value: serde_json::Value,
    },
}

/// Result type alias for Referal operations
pub type Result<T> = std::result::Result<T, ReferalError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for rule database operations
pub type RulesResult<T> = std::result::Result<T, DatabaseLoadError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use classify::{classify, ClassificationResult};
pub use config::ClassifierConfig;
pub use filter::RefererFilter;
pub use output::{map_result, Placement};
pub use rules::{Medium, PathPattern, RefererRule, RuleDatabase};
pub use crate::url::{normalize, NormalizedUrl};
