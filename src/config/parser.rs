use crate::config::types::ClassifierConfig;
use crate::config::validation::validate;
use crate::ConfigResult;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(ClassifierConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use referal::config::load_config;
///
/// let config = load_config(Path::new("referal.toml")).unwrap();
/// println!("Reading referers from: {}", config.source);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<ClassifierConfig> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    parse_config(&content)
}

/// Parses and validates configuration content
pub fn parse_config(content: &str) -> ConfigResult<ClassifierConfig> {
    // Parse TOML
    let config: ClassifierConfig = toml::from_str(content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}
