use crate::rules::types::{Medium, PathPattern, RawPath, RawRule, RefererRule};
use crate::url::registrable_domain;
use crate::{DatabaseLoadError, RulesResult};
use std::collections::HashSet;

/// Validates the raw entries of one rule file and builds the rules
///
/// Domains are lowercased; duplicates are checked case-insensitively within
/// the file.
pub(crate) fn build_rules(
    origin: &str,
    raw: Vec<RawRule>,
) -> RulesResult<Vec<RefererRule>> {
    let mut seen = HashSet::new();
    let mut rules = Vec::with_capacity(raw.len());

    for entry in raw {
        let rule = build_rule(origin, entry)?;

        if !seen.insert(rule.domain.clone()) {
            return Err(DatabaseLoadError::DuplicateDomain {
                origin: origin.to_string(),
                domain: rule.domain,
            });
        }

        rules.push(rule);
    }

    Ok(rules)
}

/// Validates a single `[[referer]]` entry
fn build_rule(origin: &str, raw: RawRule) -> RulesResult<RefererRule> {
    let domain = raw.domain.trim().to_lowercase();
    let invalid = |message: String| DatabaseLoadError::Validation {
        origin: origin.to_string(),
        domain: domain.clone(),
        message,
    };

    validate_domain(&domain).map_err(invalid)?;

    let medium =
        Medium::from_name(&raw.medium).ok_or_else(|| DatabaseLoadError::UnknownMedium {
            origin: origin.to_string(),
            domain: domain.clone(),
            medium: raw.medium.clone(),
        })?;

    let provider_name = raw.name.trim().to_string();
    if provider_name.is_empty() {
        return Err(invalid("name cannot be empty".to_string()));
    }

    if medium != Medium::Search && (!raw.paths.is_empty() || raw.parameter.is_some()) {
        return Err(invalid(format!(
            "search term parameters are only allowed on search rules, medium is '{}'",
            medium
        )));
    }

    if let Some(parameter) = &raw.parameter {
        validate_parameter(parameter).map_err(invalid)?;
    }

    let mut path_patterns = Vec::with_capacity(raw.paths.len());
    for path in raw.paths {
        path_patterns.push(build_path(origin, &domain, path)?);
    }

    if registrable_domain(&domain) != domain {
        tracing::warn!(
            "Rule '{}' in {} is not a registrable domain and will never match (lookups use '{}')",
            domain,
            origin,
            registrable_domain(&domain)
        );
    }

    Ok(RefererRule {
        domain,
        medium,
        provider_name,
        path_patterns,
        default_parameter: raw.parameter,
    })
}

/// Validates a `[[referer.paths]]` entry: exactly one of `prefix` or `regex`
fn build_path(
    origin: &str,
    domain: &str,
    raw: RawPath,
) -> RulesResult<PathPattern> {
    let invalid = |message: String| DatabaseLoadError::Validation {
        origin: origin.to_string(),
        domain: domain.to_string(),
        message,
    };

    validate_parameter(&raw.parameter).map_err(invalid)?;

    match (raw.prefix, raw.regex) {
        (Some(prefix), None) => {
            if !prefix.starts_with('/') {
                return Err(invalid(format!(
                    "path prefix '{}' must start with '/'",
                    prefix
                )));
            }
            Ok(PathPattern::prefix(prefix, raw.parameter))
        }
        (None, Some(pattern)) => {
            PathPattern::regex(&pattern, raw.parameter).map_err(|source| {
                DatabaseLoadError::InvalidPattern {
                    origin: origin.to_string(),
                    domain: domain.to_string(),
                    pattern,
                    source,
                }
            })
        }
        (Some(_), Some(_)) => Err(invalid(
            "path entry must set either 'prefix' or 'regex', not both".to_string(),
        )),
        (None, None) => Err(invalid(
            "path entry must set either 'prefix' or 'regex'".to_string(),
        )),
    }
}

/// Validates a rule domain (lowercase, no wildcard)
///
/// Single-label hosts such as `localhost` are allowed so internal rules can
/// name development hosts.
fn validate_domain(domain: &str) -> Result<(), String> {
    if domain.is_empty() {
        return Err("domain cannot be empty".to_string());
    }

    // Check for invalid characters
    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(format!("domain '{}' contains invalid characters", domain));
    }

    // Check that it doesn't start or end with a dot or hyphen
    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(format!(
            "domain '{}' cannot start or end with '.' or '-'",
            domain
        ));
    }

    // Check for consecutive dots
    if domain.contains("..") {
        return Err(format!("domain '{}' cannot contain consecutive dots", domain));
    }

    Ok(())
}

fn validate_parameter(parameter: &str) -> Result<(), String> {
    if parameter.trim().is_empty() {
        return Err("term parameter cannot be empty".to_string());
    }
    Ok(())
}
