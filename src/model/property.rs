use super::codegen_attributes::CodeGenAttributes;
use super::specification::Specification;
use super::status::Status;
use super::value::Value;
use crate::context::ParsingContext;
use crate::error::Result;
use crate::schema::{expect_object, JsonType, Schema, SchemaEntry};
use regex::{Captures, Regex};
use serde_json::{json, Value as JsonValue};
use std::sync::OnceLock;

/// `background-color` -> `BackgroundColor`, `-webkit-foo` -> `WebkitFoo`
pub fn convert_name_to_id(name: &str) -> String {
    static NAME_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = NAME_PATTERN.get_or_init(|| Regex::new(r"(^[^-])|-(.)").expect("valid name pattern"));

    pattern
        .replace_all(name, |captures: &Captures| {
            captures
                .get(1)
                .or_else(|| captures.get(2))
                .map(|m| m.as_str().to_uppercase())
                .unwrap_or_default()
        })
        .into_owned()
}

/// One CSS property definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    id: String,
    pub animatable: bool,
    pub inherited: bool,
    pub codegen: CodeGenAttributes,
    pub specification: Option<Specification>,
    pub status: Option<Status>,
    pub values: Option<Vec<Value>>,
}

impl Property {
    pub fn new(name: impl Into<String>, codegen: CodeGenAttributes) -> Self {
        let name = name.into();
        Self {
            id: convert_name_to_id(&name),
            name,
            animatable: false,
            inherited: false,
            codegen,
            specification: None,
            status: None,
            values: None,
        }
    }

    pub fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new(vec![
                SchemaEntry::new("animatable", &[JsonType::Bool]).with_default(json!(false)),
                SchemaEntry::new("codegen-properties", &[JsonType::Object, JsonType::Array]),
                SchemaEntry::new("inherited", &[JsonType::Bool]).with_default(json!(false)),
                SchemaEntry::new("specification", &[JsonType::Object]),
                SchemaEntry::new("status", &[JsonType::Object, JsonType::String]),
                SchemaEntry::new("values", &[JsonType::Array]),
            ])
        })
    }

    /// Parse the definition of property `name`.
    ///
    /// When parsing for code generation, properties whose codegen `enable-if`
    /// fails or which set `skip-codegen` are filtered out and `None` is returned.
    pub fn from_json(
        context: &ParsingContext,
        key_path: &str,
        name: &str,
        json: &JsonValue,
    ) -> Result<Option<Self>> {
        let label = format!("Property ({}.{})", key_path, name);
        let record = Self::schema().apply(expect_object(json, &label)?, &label)?;
        let property_path = format!("{}.{}", key_path, name);

        let codegen = CodeGenAttributes::from_json(
            context,
            &property_path,
            name,
            record.get("codegen_properties"),
        )?;

        let values = match record.array("values") {
            Some(values) => {
                let mut parsed = Vec::with_capacity(values.len());
                for value in values {
                    if let Some(value) = Value::from_json(context, &property_path, value)? {
                        parsed.push(value);
                    }
                }
                Some(parsed)
            }
            None => None,
        };

        let status = record
            .get("status")
            .map(|status| Status::from_json(context, &property_path, status))
            .transpose()?;

        let specification = record
            .get("specification")
            .map(|specification| Specification::from_json(context, &property_path, specification))
            .transpose()?;

        if context.parsing_for_codegen() {
            if let Some(conditional) = &codegen.enable_if {
                if !context.is_enabled(conditional) {
                    if context.verbose() {
                        log::info!(
                            "SKIPPED {} due to failing to satisfy 'enable-if' condition, '{}', with active macro set",
                            name,
                            conditional
                        );
                    }
                    return Ok(None);
                }
            }

            if codegen.skip_codegen {
                if context.verbose() {
                    log::info!("SKIPPED {} due to 'skip-codegen'", name);
                }
                return Ok(None);
            }
        }

        Ok(Some(Self {
            name: name.to_string(),
            id: convert_name_to_id(name),
            animatable: record.bool("animatable"),
            inherited: record.bool("inherited"),
            codegen,
            specification,
            status,
            values,
        }))
    }

    /// Identifier form of the name, e.g. `BackgroundColor`
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn aliases(&self) -> &[String] {
        &self.codegen.aliases
    }

    pub fn has_vendor_prefix(&self) -> bool {
        self.name.starts_with('-')
    }
}
