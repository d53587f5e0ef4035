use crate::classify::ClassificationResult;
use serde_json::Value;

/// Event field names for each result attribute, with the prefix applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    pub known: String,
    pub name: String,
    pub medium: String,
    pub search_term: String,
    pub host: String,
}

impl FieldNames {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            known: format!("{}known", prefix),
            name: format!("{}name", prefix),
            medium: format!("{}medium", prefix),
            search_term: format!("{}search_term", prefix),
            host: format!("{}host", prefix),
        }
    }

    /// Every field name a result can write
    pub fn all(&self) -> [&str; 5] {
        [
            &self.known,
            &self.name,
            &self.medium,
            &self.search_term,
            &self.host,
        ]
    }

    /// Field/value pairs for a result; unset attributes are left out
    pub fn fields_for(&self, result: &ClassificationResult) -> Vec<(String, Value)> {
        let mut fields = vec![(self.known.clone(), Value::Bool(result.known))];

        let optional = [
            (&self.name, result.name.as_deref()),
            (&self.medium, result.medium.map(|m| m.as_str())),
            (&self.search_term, result.search_term.as_deref()),
            (&self.host, result.host.as_deref()),
        ];

        for (key, value) in optional {
            if let Some(value) = value {
                fields.push((key.clone(), Value::String(value.to_string())));
            }
        }

        fields
    }
}
