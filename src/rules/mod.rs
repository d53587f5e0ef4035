//! Rule database module for Referal
//!
//! This module loads referer rules from TOML rule files and holds them in an
//! immutable, domain-keyed [`RuleDatabase`].
//!
//! # Rule file format
//!
//! ```toml
//! [[referer]]
//! domain = "google.com"
//! medium = "search"
//! name = "Google"
//! parameter = "q"
//!
//! [[referer.paths]]
//! prefix = "/search"
//! parameter = "q"
//!
//! [[referer]]
//! domain = "facebook.com"
//! medium = "social"
//! name = "Facebook"
//! ```
//!
//! A custom file uses the same format. Its rules replace base rules with the
//! same domain as a whole.

mod parser;
mod types;
mod validation;

pub use parser::{load_rule_file, parse_rules};
pub use types::{Medium, PathMatcher, PathPattern, RefererRule};

use crate::config::RulesConfig;
use crate::{DatabaseLoadError, RulesResult};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;

/// Rule set shipped with the crate
const BUNDLED_RULES: &str = include_str!("../../rules/referers.toml");

/// Origin label used for the bundled rule set in logs and errors
pub const BUNDLED_ORIGIN: &str = "<bundled referers.toml>";

/// Domain-keyed table of referer rules
///
/// Built once at startup and never mutated afterwards; share it between
/// workers behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct RuleDatabase {
    rules: HashMap<String, RefererRule>,
    sources: Vec<String>,
    fingerprint: String,
}

impl RuleDatabase {
    /// Builds the database from the rule set embedded in the crate
    pub fn bundled() -> RulesResult<Self> {
        let db = Self::from_toml_str(BUNDLED_ORIGIN, BUNDLED_RULES)?;
        tracing::info!(
            "Loaded {} referer rules from {} (sha256: {})",
            db.len(),
            BUNDLED_ORIGIN,
            db.fingerprint()
        );
        Ok(db)
    }

    /// Loads a base rule file and optionally merges a custom file over it
    ///
    /// # Example
    ///
    /// ```no_run
    /// use referal::RuleDatabase;
    /// use std::path::Path;
    ///
    /// let db = RuleDatabase::load(
    ///     Path::new("/etc/referal/referers.toml"),
    ///     Some(Path::new("/etc/referal/internal.toml")),
    /// )
    /// .unwrap();
    /// println!("{} rules", db.len());
    /// ```
    pub fn load(base: &Path, custom: Option<&Path>) -> RulesResult<Self> {
        let db = Self::from_base_file(base)?;

        match custom {
            Some(path) => Ok(db.merge(Self::from_file(path)?)),
            None => Ok(db),
        }
    }

    /// Builds the database a configuration asks for
    ///
    /// The bundled rule set is the base when no `referers-file` is configured;
    /// a `custom-referers-file` is merged over whichever base is used.
    pub fn from_config(config: &RulesConfig) -> RulesResult<Self> {
        let db = match &config.referers_file {
            Some(path) => Self::from_base_file(path)?,
            None => Self::bundled()?,
        };

        match &config.custom_referers_file {
            Some(path) => Ok(db.merge(Self::from_file(path)?)),
            None => Ok(db),
        }
    }

    /// Loads a single rule file
    pub fn from_file(path: &Path) -> RulesResult<Self> {
        let (rules, content) = load_rule_file(path)?;
        let db = Self::from_validated(path.display().to_string(), rules, &content);
        tracing::info!(
            "Loaded {} referer rules from {} (sha256: {})",
            db.len(),
            path.display(),
            db.fingerprint()
        );
        Ok(db)
    }

    /// Loads a base rule file, which must define at least one rule
    ///
    /// A custom file may be empty; a base file without rules would leave
    /// every referer unknown.
    fn from_base_file(path: &Path) -> RulesResult<Self> {
        let db = Self::from_file(path)?;
        if db.is_empty() {
            return Err(DatabaseLoadError::EmptyRuleSet {
                origin: path.display().to_string(),
            });
        }
        Ok(db)
    }

    /// Parses rules from in-memory TOML content
    pub fn from_toml_str(origin: &str, content: &str) -> RulesResult<Self> {
        let rules = parse_rules(origin, content)?;
        Ok(Self::from_validated(origin.to_string(), rules, content))
    }

    fn from_validated(origin: String, rules: Vec<RefererRule>, content: &str) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| (rule.domain.clone(), rule))
            .collect();

        Self {
            rules,
            sources: vec![origin],
            fingerprint: hex::encode(Sha256::digest(content.as_bytes())),
        }
    }

    /// Merges a custom database over this one
    ///
    /// A custom rule replaces the base rule with the same domain entirely;
    /// nothing is merged field by field.
    pub fn merge(mut self, custom: RuleDatabase) -> Self {
        for (domain, rule) in custom.rules {
            if let Some(previous) = self.rules.insert(domain, rule) {
                tracing::debug!(
                    "Custom rule for {} replaces base rule ({})",
                    previous.domain,
                    previous.provider_name
                );
            }
        }

        let mut hasher = Sha256::new();
        hasher.update(self.fingerprint.as_bytes());
        hasher.update(custom.fingerprint.as_bytes());
        self.fingerprint = hex::encode(hasher.finalize());
        self.sources.extend(custom.sources);
        self
    }

    /// Finds the rule for a registrable domain (exact match only)
    pub fn lookup(&self, domain: &str) -> Option<&RefererRule> {
        self.rules.get(domain)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RefererRule> {
        self.rules.values()
    }

    /// Origins of the loaded rule sets, in merge order
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Hex SHA-256 digest identifying the loaded rule content
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}
