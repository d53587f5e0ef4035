//! Configuration module for Referal
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use referal::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("referal.toml")).unwrap();
//! println!("Classifying referers from field: {}", config.source);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ClassifierConfig, RulesConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
