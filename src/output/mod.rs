//! Result mapping module for Referal
//!
//! This module writes a [`ClassificationResult`] into an event record. Two
//! layouts are supported:
//!
//! - `Placement::Root`: flat fields at the event root, e.g. `ref_known`,
//!   `ref_medium` with prefix `ref_`
//! - `Placement::Nested(target)`: the same fields inside an object under
//!   `target`; `Placement::legacy()` nests under `"referal"`
//!
//! The prefix applies in both layouts. Unset result values are omitted and
//! fields outside the result's namespace are never touched.

mod fields;

pub use fields::FieldNames;

use crate::classify::ClassificationResult;
use crate::config::ClassifierConfig;
use crate::FilterError;
use serde_json::{Map, Value};

/// Where result fields are written in the event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Flat fields at the event root
    Root,
    /// Fields inside an object stored under the given event field
    Nested(String),
}

impl Placement {
    /// Target used by the historical nested layout
    pub const LEGACY_TARGET: &'static str = "referal";

    /// The historical layout: everything nested under "referal"
    pub fn legacy() -> Self {
        Self::Nested(Self::LEGACY_TARGET.to_string())
    }
}

/// Writes a classification result into an event
///
/// # Returns
///
/// * `Ok(true)` - Fields were written
/// * `Ok(false)` - Nothing to write: the referer was unparsable, or unknown
///   while `emit_unknown` is off
/// * `Err(FilterError::TargetNotObject)` - The target field exists but holds
///   something other than an object; the event is left untouched
///
/// # Examples
///
/// ```
/// use referal::{map_result, ClassificationResult, ClassifierConfig};
/// use serde_json::{json, Map};
///
/// let mut config = ClassifierConfig::new("referrer");
/// config.prefix = "ref_".to_string();
///
/// let mut event = Map::new();
/// let result = ClassificationResult::unknown(Some("news.ycombinator.com".to_string()));
///
/// assert!(map_result(&result, &config, &mut event).unwrap());
/// assert_eq!(event["ref_known"], json!(false));
/// assert_eq!(event["ref_host"], json!("news.ycombinator.com"));
/// assert_eq!(event.len(), 2);
/// ```
pub fn map_result(
    result: &ClassificationResult,
    config: &ClassifierConfig,
    event: &mut Map<String, Value>,
) -> Result<bool, FilterError> {
    if !result.known && (result.host.is_none() || !config.emit_unknown) {
        return Ok(false);
    }

    let names = FieldNames::with_prefix(&config.prefix);
    let fields = names.fields_for(result);

    let target = match config.placement() {
        Placement::Root => event,
        Placement::Nested(field) => nested_object(event, &field)?,
    };

    for (key, value) in fields {
        target.insert(key, value);
    }

    Ok(true)
}

/// Returns the object under `field`, creating it if missing or null
fn nested_object<'a>(
    event: &'a mut Map<String, Value>,
    field: &str,
) -> Result<&'a mut Map<String, Value>, FilterError> {
    let entry = event
        .entry(field)
        .or_insert_with(|| Value::Object(Map::new()));

    if entry.is_null() {
        *entry = Value::Object(Map::new());
    }

    match entry {
        Value::Object(map) => Ok(map),
        other => Err(FilterError::TargetNotObject {
            field: field.to_string(),
            value: other.clone(),
        }),
    }
}
