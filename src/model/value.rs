use crate::context::ParsingContext;
use crate::error::{GeneratorError, Result};
use crate::schema::{expect_object, JsonType, Schema, SchemaEntry};
use serde_json::Value as JsonValue;
use std::sync::OnceLock;

/// One keyword accepted by a property
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Value {
    pub value: String,
    pub comment: Option<String>,
    pub enable_if: Option<String>,
    pub status: Option<String>,
    pub url: Option<String>,
}

impl Value {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new(vec![
                SchemaEntry::new("comment", &[JsonType::String]),
                SchemaEntry::new("enable-if", &[JsonType::String]),
                SchemaEntry::new("status", &[JsonType::String]),
                SchemaEntry::new("url", &[JsonType::String]),
                SchemaEntry::new("value", &[JsonType::String]),
            ])
        })
    }

    /// Returns `None` when the value's `enable-if` does not hold
    pub fn from_json(context: &ParsingContext, key_path: &str, json: &JsonValue) -> Result<Option<Self>> {
        if let Some(value) = json.as_str() {
            return Ok(Some(Self::new(value)));
        }

        let label = format!("Value ({}.values)", key_path);
        let record = Self::schema().apply(expect_object(json, &label)?, &label)?;

        let enable_if = record.string("enable_if");
        if let Some(conditional) = &enable_if {
            if !context.is_enabled(conditional) {
                return Ok(None);
            }
        }

        let value = record
            .string("value")
            .ok_or_else(|| GeneratorError::missing_key(&label, "value"))?;

        Ok(Some(Self {
            value,
            comment: record.string("comment"),
            enable_if,
            status: record.string("status"),
            url: record.string("url"),
        }))
    }
}
