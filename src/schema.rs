//! Schema-driven shape validation for JSON dictionaries
//!
//! Every entity in the property catalog is described by a [`Schema`]: an ordered
//! list of known keys, the JSON types each key accepts, and an optional default.
//! Validation runs in two phases (unknown keys, then value types) and produces a
//! list of [`Violation`]s. Only a dictionary with no violations is turned into a
//! [`Record`], so a record is never half-populated.

use crate::error::{GeneratorError, Result};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::fmt;

/// Runtime type of a JSON value, as seen by schema validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonType {
    pub fn of(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => JsonType::Null,
            JsonValue::Bool(_) => JsonType::Bool,
            JsonValue::Number(_) => JsonType::Number,
            JsonValue::String(_) => JsonType::String,
            JsonValue::Array(_) => JsonType::Array,
            JsonValue::Object(_) => JsonType::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::Null => "null",
            JsonType::Bool => "bool",
            JsonType::Number => "number",
            JsonType::String => "string",
            JsonType::Array => "array",
            JsonType::Object => "object",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared key of a schema
#[derive(Debug, Clone)]
pub struct SchemaEntry {
    pub key: &'static str,
    pub allowed_types: Vec<JsonType>,
    pub default_value: Option<JsonValue>,
}

impl SchemaEntry {
    pub fn new(key: &'static str, allowed_types: &[JsonType]) -> Self {
        Self {
            key,
            allowed_types: allowed_types.to_vec(),
            default_value: None,
        }
    }

    pub fn with_default(mut self, default_value: JsonValue) -> Self {
        self.default_value = Some(default_value);
        self
    }

    /// Attribute-safe form of the key (`high-priority` -> `high_priority`)
    pub fn attribute_name(&self) -> String {
        self.key.replace('-', "_")
    }

    fn accepts(&self, value: &JsonValue) -> bool {
        self.allowed_types.contains(&JsonType::of(value))
    }
}

/// A single reason a dictionary does not match its schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    UnknownKeys(Vec<String>),
    WrongType {
        key: String,
        found: JsonType,
        expected: Vec<JsonType>,
    },
}

impl Violation {
    pub fn into_error(self, label: &str) -> GeneratorError {
        match self {
            Violation::UnknownKeys(mut keys) if keys.len() == 1 => GeneratorError::InvalidKey {
                label: label.to_string(),
                key: keys.remove(0),
            },
            Violation::UnknownKeys(keys) => GeneratorError::InvalidKeys {
                label: label.to_string(),
                keys,
            },
            Violation::WrongType { key, found, expected } => GeneratorError::InvalidType {
                label: label.to_string(),
                key,
                found: found.to_string(),
                expected: expected.iter().map(|t| t.to_string()).collect(),
            },
        }
    }
}

/// Ordered set of declared keys for one entity type
#[derive(Debug, Clone)]
pub struct Schema {
    entries: Vec<SchemaEntry>,
}

impl Schema {
    pub fn new(entries: Vec<SchemaEntry>) -> Self {
        Self { entries }
    }

    pub fn entry(&self, key: &str) -> Option<&SchemaEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    /// Collect every violation of this schema, unknown keys first
    pub fn violations(&self, dictionary: &Map<String, JsonValue>) -> Vec<Violation> {
        let mut violations = Vec::new();

        let unknown_keys: Vec<String> = dictionary
            .keys()
            .filter(|key| self.entry(key).is_none())
            .cloned()
            .collect();
        if !unknown_keys.is_empty() {
            violations.push(Violation::UnknownKeys(unknown_keys));
        }

        for (key, value) in dictionary {
            if let Some(entry) = self.entry(key) {
                if !entry.accepts(value) {
                    violations.push(Violation::WrongType {
                        key: key.clone(),
                        found: JsonType::of(value),
                        expected: entry.allowed_types.clone(),
                    });
                }
            }
        }

        violations
    }

    pub fn validate_dictionary(&self, dictionary: &Map<String, JsonValue>, label: &str) -> Result<()> {
        match self.violations(dictionary).into_iter().next() {
            Some(violation) => Err(violation.into_error(label)),
            None => Ok(()),
        }
    }

    /// Validate `dictionary` and build a record with one attribute per declared key
    pub fn apply(&self, dictionary: &Map<String, JsonValue>, label: &str) -> Result<Record> {
        self.validate_dictionary(dictionary, label)?;

        let mut fields = BTreeMap::new();
        for entry in &self.entries {
            let value = dictionary.get(entry.key).or(entry.default_value.as_ref());
            if let Some(value) = value {
                fields.insert(entry.attribute_name(), value.clone());
            }
        }

        Ok(Record {
            label: label.to_string(),
            fields,
        })
    }
}

pub fn expect_object<'a>(value: &'a JsonValue, label: &str) -> Result<&'a Map<String, JsonValue>> {
    value.as_object().ok_or_else(|| GeneratorError::InvalidFormat {
        message: format!("Expected an object for '{}', found {}", label, JsonType::of(value)),
    })
}

/// Validated attributes of one JSON dictionary, keyed by attribute name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    label: String,
    fields: BTreeMap<String, JsonValue>,
}

impl Record {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn has(&self, attribute: &str) -> bool {
        self.fields.contains_key(attribute)
    }

    pub fn get(&self, attribute: &str) -> Option<&JsonValue> {
        self.fields.get(attribute)
    }

    pub fn string(&self, attribute: &str) -> Option<String> {
        self.get(attribute).and_then(JsonValue::as_str).map(str::to_string)
    }

    /// String attribute where `""` counts as absent
    pub fn non_empty_string(&self, attribute: &str) -> Option<String> {
        self.string(attribute).filter(|s| !s.is_empty())
    }

    pub fn opt_bool(&self, attribute: &str) -> Option<bool> {
        self.get(attribute).and_then(JsonValue::as_bool)
    }

    /// Boolean attribute, `false` when absent
    pub fn bool(&self, attribute: &str) -> bool {
        self.opt_bool(attribute).unwrap_or(false)
    }

    pub fn object(&self, attribute: &str) -> Option<&Map<String, JsonValue>> {
        self.get(attribute).and_then(JsonValue::as_object)
    }

    pub fn array(&self, attribute: &str) -> Option<&Vec<JsonValue>> {
        self.get(attribute).and_then(JsonValue::as_array)
    }

    /// List attribute whose elements must all be strings
    pub fn string_list(&self, attribute: &str) -> Result<Option<Vec<String>>> {
        let Some(items) = self.array(attribute) else {
            return Ok(None);
        };

        let mut strings = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(s) => strings.push(s.to_string()),
                None => {
                    return Err(GeneratorError::InvalidType {
                        label: self.label.clone(),
                        key: format!("{}[{}]", attribute.replace('_', "-"), i),
                        found: JsonType::of(item).to_string(),
                        expected: vec![JsonType::String.to_string()],
                    })
                }
            }
        }
        Ok(Some(strings))
    }
}
