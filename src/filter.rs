//! Event-level referer filter
//!
//! [`RefererFilter`] applies classification to one event record at a time:
//! it reads the configured source field, classifies it, and writes the
//! result fields back. A broken event never aborts processing; faults are
//! logged and the event is left without derived fields.

use crate::classify::{classify, ClassificationResult};
use crate::config::ClassifierConfig;
use crate::output::map_result;
use crate::rules::RuleDatabase;
use crate::FilterError;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Classifies the referer field of event records
///
/// Cheap to clone; clones share the rule database.
#[derive(Debug, Clone)]
pub struct RefererFilter {
    config: ClassifierConfig,
    db: Arc<RuleDatabase>,
}

impl RefererFilter {
    /// Creates a filter over an already loaded rule database
    pub fn new(config: ClassifierConfig, db: Arc<RuleDatabase>) -> Self {
        Self { config, db }
    }

    /// Loads the rule files named in the configuration and creates a filter
    ///
    /// # Example
    ///
    /// ```
    /// use referal::{ClassifierConfig, RefererFilter};
    /// use serde_json::{json, Map};
    ///
    /// let filter = RefererFilter::from_config(ClassifierConfig::new("referrer")).unwrap();
    ///
    /// let mut event = Map::new();
    /// event.insert("referrer".to_string(), json!("https://www.bing.com/search?q=ferris"));
    ///
    /// assert!(filter.filter(&mut event));
    /// assert_eq!(event["medium"], json!("search"));
    /// assert_eq!(event["search_term"], json!("ferris"));
    /// ```
    pub fn from_config(config: ClassifierConfig) -> crate::Result<Self> {
        let db = RuleDatabase::from_config(&config.rules)?;
        tracing::info!(
            "Referer filter ready: source '{}', {} rules from {}",
            config.source,
            db.len(),
            db.sources().join(", ")
        );
        Ok(Self::new(config, Arc::new(db)))
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn database(&self) -> &Arc<RuleDatabase> {
        &self.db
    }

    /// Classifies an event and writes the result fields into it
    ///
    /// Returns whether any field was written. Faults (a non-string source
    /// value, a target field that is not an object) are logged with the
    /// offending field and value; the event is left untouched.
    pub fn filter(&self, event: &mut Map<String, Value>) -> bool {
        match self.try_filter(event) {
            Ok(written) => written,
            Err(e) => {
                tracing::error!(
                    field = %self.config.source,
                    value = ?event.get(&self.config.source),
                    "Unexpected error while classifying referer: {}",
                    e
                );
                false
            }
        }
    }

    /// Like [`RefererFilter::filter`], but reports faults to the caller
    pub fn try_filter(&self, event: &mut Map<String, Value>) -> Result<bool, FilterError> {
        match self.classify_event(event)? {
            Some(result) => map_result(&result, &self.config, event),
            None => Ok(false),
        }
    }

    /// Classifies an event without modifying it
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - The source field is missing, null, empty or blank
    /// * `Ok(Some(result))` - The classification of the source value
    /// * `Err(FilterError::SourceNotString)` - The source holds a non-string
    pub fn classify_event(
        &self,
        event: &Map<String, Value>,
    ) -> Result<Option<ClassificationResult>, FilterError> {
        let referer = match field_text(event, &self.config.source)? {
            Some(referer) if !referer.trim().is_empty() => referer,
            _ => return Ok(None),
        };

        let page_url = match &self.config.page_source {
            Some(field) => page_url(event, field),
            None => None,
        };

        Ok(Some(classify(referer, page_url, &self.db)))
    }
}

/// Reads a string field; for arrays, only the first element is used
fn field_text<'e>(
    event: &'e Map<String, Value>,
    field: &str,
) -> Result<Option<&'e str>, FilterError> {
    let value = match event.get(field) {
        Some(Value::Array(values)) => values.first(),
        other => other,
    };

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.as_str())),
        Some(other) => Err(FilterError::SourceNotString {
            field: field.to_string(),
            value: other.clone(),
        }),
    }
}

/// Reads the page URL; an unusable page field only disables internal detection
fn page_url<'e>(event: &'e Map<String, Value>, field: &str) -> Option<&'e str> {
    match field_text(event, field) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Ignoring page URL: {}", e);
            None
        }
    }
}
