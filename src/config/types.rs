use crate::output::Placement;
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for a referer classifier
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Event field holding the referer. If the field is an array, only the
    /// first value is used.
    pub source: String,

    /// Event field holding the URL of the visited page, for internal
    /// referral detection
    #[serde(default, rename = "page-source")]
    pub page_source: Option<String>,

    /// Field to nest the results under; results go to the event root if unset
    #[serde(default)]
    pub target: Option<String>,

    /// String prepended to every result field name
    #[serde(default)]
    pub prefix: String,

    /// Write `known = false` and the host for unknown referers
    #[serde(default = "default_emit_unknown", rename = "emit-unknown")]
    pub emit_unknown: bool,

    #[serde(default)]
    pub rules: RulesConfig,
}

/// Rule file locations
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesConfig {
    /// Base rule file; the bundled rule set is used if unset
    #[serde(default, rename = "referers-file")]
    pub referers_file: Option<PathBuf>,

    /// Rules merged over the base, typically internal domains
    #[serde(default, rename = "custom-referers-file")]
    pub custom_referers_file: Option<PathBuf>,
}

fn default_emit_unknown() -> bool {
    true
}

impl ClassifierConfig {
    /// Creates a configuration with defaults for everything but the source field
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            page_source: None,
            target: None,
            prefix: String::new(),
            emit_unknown: default_emit_unknown(),
            rules: RulesConfig::default(),
        }
    }

    /// Where result fields are written
    pub fn placement(&self) -> Placement {
        match &self.target {
            Some(target) => Placement::Nested(target.clone()),
            None => Placement::Root,
        }
    }
}
