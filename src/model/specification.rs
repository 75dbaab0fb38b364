use crate::context::ParsingContext;
use crate::error::Result;
use crate::schema::{expect_object, JsonType, Schema, SchemaEntry};
use serde_json::{json, Value as JsonValue};
use std::sync::OnceLock;

/// Where a property is specified
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Specification {
    pub category: Option<String>,
    pub comment: Option<String>,
    pub description: Option<String>,
    pub documentation_url: Option<String>,
    pub keywords: Vec<String>,
    pub non_canonical_url: Option<String>,
    pub obsolete_category: Option<String>,
    pub obsolete_url: Option<String>,
    pub url: Option<String>,
}

impl Specification {
    pub fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new(vec![
                SchemaEntry::new("category", &[JsonType::String]),
                SchemaEntry::new("comment", &[JsonType::String]),
                SchemaEntry::new("description", &[JsonType::String]),
                SchemaEntry::new("documentation-url", &[JsonType::String]),
                SchemaEntry::new("keywords", &[JsonType::Array]).with_default(json!([])),
                SchemaEntry::new("non-canonical-url", &[JsonType::String]),
                SchemaEntry::new("obsolete-category", &[JsonType::String]),
                SchemaEntry::new("obsolete-url", &[JsonType::String]),
                SchemaEntry::new("url", &[JsonType::String]),
            ])
        })
    }

    pub fn from_json(_context: &ParsingContext, key_path: &str, json: &JsonValue) -> Result<Self> {
        let label = format!("Specification ({}.specification)", key_path);
        let record = Self::schema().apply(expect_object(json, &label)?, &label)?;

        Ok(Self {
            category: record.string("category"),
            comment: record.string("comment"),
            description: record.string("description"),
            documentation_url: record.string("documentation_url"),
            keywords: record.string_list("keywords")?.unwrap_or_default(),
            non_canonical_url: record.string("non_canonical_url"),
            obsolete_category: record.string("obsolete_category"),
            obsolete_url: record.string("obsolete_url"),
            url: record.string("url"),
        })
    }
}
