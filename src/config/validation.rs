use crate::config::types::{ClassifierConfig, RulesConfig};
use crate::output::FieldNames;
use crate::{ConfigError, ConfigResult};
use std::path::PathBuf;

/// Validates the entire configuration
pub fn validate(config: &ClassifierConfig) -> ConfigResult<()> {
    validate_fields(config)?;
    validate_prefix(&config.prefix)?;
    validate_rules_config(&config.rules)?;
    Ok(())
}

/// Validates the event field names
fn validate_fields(config: &ClassifierConfig) -> ConfigResult<()> {
    validate_field_name("source", &config.source)?;

    if let Some(page_source) = &config.page_source {
        validate_field_name("page-source", page_source)?;

        if page_source == &config.source {
            return Err(ConfigError::Validation(format!(
                "page-source must differ from source, both are '{}'",
                page_source
            )));
        }
    }

    let is_input =
        |name: &str| name == config.source || config.page_source.as_deref() == Some(name);

    match &config.target {
        Some(target) => {
            validate_field_name("target", target)?;

            // Nesting results under an input field would clobber it
            if is_input(target) {
                return Err(ConfigError::Validation(format!(
                    "target '{}' cannot be one of the input fields",
                    target
                )));
            }
        }
        None => {
            // Flat result fields share the event root with the inputs
            let names = FieldNames::with_prefix(&config.prefix);
            if let Some(name) = names.all().into_iter().find(|name| is_input(name)) {
                return Err(ConfigError::Validation(format!(
                    "result field '{}' would overwrite an input field; set a target or change the prefix",
                    name
                )));
            };
        }
    }

    Ok(())
}

fn validate_field_name(option: &str, name: &str) -> ConfigResult<()> {
    if name.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} cannot be empty",
            option
        )));
    }
    Ok(())
}

/// Validates the field name prefix (empty is allowed)
fn validate_prefix(prefix: &str) -> ConfigResult<()> {
    if prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "prefix cannot contain whitespace, got '{}'",
            prefix
        )));
    }
    Ok(())
}

/// Validates rule file paths
fn validate_rules_config(config: &RulesConfig) -> ConfigResult<()> {
    validate_path("referers-file", config.referers_file.as_ref())?;
    validate_path("custom-referers-file", config.custom_referers_file.as_ref())?;
    Ok(())
}

fn validate_path(option: &str, path: Option<&PathBuf>) -> ConfigResult<()> {
    match path {
        Some(path) if path.as_os_str().is_empty() => Err(ConfigError::Validation(format!(
            "{} cannot be empty",
            option
        ))),
        _ => Ok(()),
    }
}
