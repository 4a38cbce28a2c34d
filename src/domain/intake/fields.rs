//! Open-ended business profile fields collected during intake.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::DocumentType;

/// Key/value business profile.
///
/// Keys are open-ended; [`DocumentType::required_fields`] documents the
/// expected ones but nothing enforces them. Merging is shallow and
/// last-write-wins per key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredFields(Map<String, Value>);

impl StructuredFields {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wraps a JSON value; anything other than an object yields an empty map.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Shallow key-union; values in `newer` win on collision.
    pub fn merge(&mut self, newer: &StructuredFields) {
        for (key, value) in &newer.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Returns a merged copy without touching `self`.
    pub fn merged_with(&self, newer: &StructuredFields) -> StructuredFields {
        let mut out = self.clone();
        out.merge(newer);
        out
    }

    /// Prompt-friendly rendering of a value; `None` for absent, null or blank.
    pub fn display_value(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(render_value)
    }

    /// Checklist keys for `document_type` that have no usable value yet.
    pub fn missing_required(&self, document_type: DocumentType) -> Vec<&'static str> {
        document_type
            .required_fields()
            .iter()
            .filter(|f| self.display_value(f.key).is_none())
            .map(|f| f.key)
            .collect()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for StructuredFields {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.trim().to_string()),
        Value::Bool(true) => Some("Yes".to_string()),
        Value::Bool(false) => Some("No".to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(render_value).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        Value::Object(_) => Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn fields(value: Value) -> StructuredFields {
        StructuredFields::from_value(value)
    }

    #[test]
    fn merge_unions_keys_and_newer_wins() {
        let mut prior = fields(json!({"a": 1, "b": 2}));
        prior.merge(&fields(json!({"b": 3, "c": 4})));
        assert_eq!(prior, fields(json!({"a": 1, "b": 3, "c": 4})));
    }

    #[test]
    fn merge_with_empty_is_identity() {
        let prior = fields(json!({"businessName": "Acme"}));
        assert_eq!(prior.merged_with(&StructuredFields::new()), prior);
    }

    #[test]
    fn non_object_value_becomes_empty() {
        assert!(StructuredFields::from_value(json!(["a"])).is_empty());
        assert!(StructuredFields::from_value(json!("text")).is_empty());
    }

    #[test]
    fn display_value_renders_common_shapes() {
        let f = fields(json!({
            "name": "  Acme  ",
            "cookies": true,
            "sharing": false,
            "types": ["email", "name"],
            "blank": "",
            "nothing": null,
            "count": 3
        }));
        assert_eq!(f.display_value("name").as_deref(), Some("Acme"));
        assert_eq!(f.display_value("cookies").as_deref(), Some("Yes"));
        assert_eq!(f.display_value("sharing").as_deref(), Some("No"));
        assert_eq!(f.display_value("types").as_deref(), Some("email, name"));
        assert_eq!(f.display_value("count").as_deref(), Some("3"));
        assert!(f.display_value("blank").is_none());
        assert!(f.display_value("nothing").is_none());
        assert!(f.display_value("absent").is_none());
    }

    #[test]
    fn missing_required_reports_unfilled_checklist_keys() {
        let f = fields(json!({"businessName": "Acme", "website": ""}));
        let missing = f.missing_required(DocumentType::CookieConsent);
        assert!(!missing.contains(&"businessName"));
        assert!(missing.contains(&"website"));
        assert!(missing.contains(&"jurisdiction"));
    }

    #[test]
    fn serializes_as_plain_object() {
        let f = fields(json!({"website": "acme.com"}));
        assert_eq!(serde_json::to_string(&f).unwrap(), r#"{"website":"acme.com"}"#);
    }

    proptest! {
        #[test]
        fn merge_is_union_with_override(
            prior in proptest::collection::btree_map("[a-e]", 0i64..100, 0..5),
            newer in proptest::collection::btree_map("[a-e]", 0i64..100, 0..5),
        ) {
            let mut merged = StructuredFields::new();
            for (k, v) in &prior { merged.insert(k.clone(), *v); }
            let mut extracted = StructuredFields::new();
            for (k, v) in &newer { extracted.insert(k.clone(), *v); }

            merged.merge(&extracted);

            for (k, v) in &newer {
                prop_assert_eq!(merged.get(k), Some(&json!(v)));
            }
            for (k, v) in &prior {
                if !newer.contains_key(k) {
                    prop_assert_eq!(merged.get(k), Some(&json!(v)));
                }
            }
            let expected_len = prior.keys().chain(newer.keys()).collect::<std::collections::BTreeSet<_>>().len();
            prop_assert_eq!(merged.len(), expected_len);
        }
    }
}
