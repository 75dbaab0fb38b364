use crate::context::ParsingContext;
use crate::error::Result;
use crate::schema::{expect_object, JsonType, Schema, SchemaEntry};
use serde_json::Value as JsonValue;
use std::sync::OnceLock;

/// Standardization status of a property
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub comment: Option<String>,
    pub enabled_by_default: Option<bool>,
    pub status: Option<String>,
}

impl Status {
    pub fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new(vec![
                SchemaEntry::new("comment", &[JsonType::String]),
                SchemaEntry::new("enabled-by-default", &[JsonType::Bool]),
                SchemaEntry::new("status", &[JsonType::String]),
            ])
        })
    }

    /// A bare string is shorthand for `{"status": <string>}`
    pub fn from_json(_context: &ParsingContext, key_path: &str, json: &JsonValue) -> Result<Self> {
        if let Some(status) = json.as_str() {
            return Ok(Self {
                status: Some(status.to_string()),
                ..Self::default()
            });
        }

        let label = format!("Status ({}.status)", key_path);
        let record = Self::schema().apply(expect_object(json, &label)?, &label)?;

        Ok(Self {
            comment: record.string("comment"),
            enabled_by_default: record.opt_bool("enabled_by_default"),
            status: record.string("status"),
        })
    }
}
