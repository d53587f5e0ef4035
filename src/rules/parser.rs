use crate::rules::types::{RefererRule, RuleFile};
use crate::rules::validation::build_rules;
use crate::{DatabaseLoadError, RulesResult};
use std::path::Path;

/// Reads and parses a rule file from the given path
///
/// # Returns
///
/// * `Ok((Vec<RefererRule>, String))` - Validated rules and the file content
/// * `Err(DatabaseLoadError)` - Failed to read, parse, or validate the file
pub fn load_rule_file(path: &Path) -> RulesResult<(Vec<RefererRule>, String)> {
    let origin = path.display().to_string();

    let content = std::fs::read_to_string(path).map_err(|source| DatabaseLoadError::Io {
        origin: origin.clone(),
        source,
    })?;

    let rules = parse_rules(&origin, &content)?;
    Ok((rules, content))
}

/// Parses rule file content
///
/// `origin` names the source in error messages (a file path, or a label for
/// embedded content).
pub fn parse_rules(origin: &str, content: &str) -> RulesResult<Vec<RefererRule>> {
    let file: RuleFile = toml::from_str(content).map_err(|source| DatabaseLoadError::Parse {
        origin: origin.to_string(),
        source,
    })?;

    build_rules(origin, file.referers)
}
