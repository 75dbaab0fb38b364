//! Code generation hints attached to a property

use super::logical_group::LogicalPropertyGroup;
use super::PropertyRef;
use crate::context::ParsingContext;
use crate::error::{GeneratorError, Result};
use crate::schema::{JsonType, Schema, SchemaEntry};
use serde_json::{json, Map, Value as JsonValue};
use std::sync::OnceLock;

/// The `codegen-properties` block of a property
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeGenAttributes {
    pub aliases: Vec<String>,
    pub auto_functions: bool,
    pub color_property: bool,
    pub comment: Option<String>,
    pub computable: bool,
    pub conditional_converter: Option<String>,
    pub converter: Option<String>,
    pub custom: Option<String>,
    pub descriptor_only: bool,
    pub enable_if: Option<String>,
    pub fast_path_inherited: bool,
    pub fill_layer_property: bool,
    pub font_property: bool,
    pub getter: Option<String>,
    pub high_priority: bool,
    pub initial: Option<String>,
    pub internal_only: bool,
    pub logical_property_group: Option<LogicalPropertyGroup>,
    pub longhands: Option<Vec<PropertyRef>>,
    pub name_for_methods: Option<String>,
    pub related_property: Option<PropertyRef>,
    pub separator: Option<String>,
    pub setter: Option<String>,
    pub settings_flag: Option<String>,
    pub sink_priority: bool,
    pub skip_builder: bool,
    pub skip_codegen: bool,
    pub status: Option<String>,
    pub svg: bool,
    pub synonym: Option<String>,
    pub top_priority: bool,
    pub url: Option<String>,
    pub visited_link_color_support: bool,
}

impl CodeGenAttributes {
    pub fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            let string = &[JsonType::String];
            let flag = |key| SchemaEntry::new(key, &[JsonType::Bool]).with_default(json!(false));

            Schema::new(vec![
                SchemaEntry::new("aliases", &[JsonType::Array]).with_default(json!([])),
                flag("auto-functions"),
                flag("color-property"),
                SchemaEntry::new("comment", string),
                SchemaEntry::new("computable", &[JsonType::Bool]),
                SchemaEntry::new("conditional-converter", string),
                SchemaEntry::new("converter", string),
                SchemaEntry::new("custom", string),
                flag("descriptor-only"),
                SchemaEntry::new("enable-if", string),
                flag("fast-path-inherited"),
                flag("fill-layer-property"),
                flag("font-property"),
                SchemaEntry::new("getter", string),
                flag("high-priority"),
                SchemaEntry::new("initial", string),
                flag("internal-only"),
                SchemaEntry::new("logical-property-group", &[JsonType::Object]),
                SchemaEntry::new("longhands", &[JsonType::Array]),
                SchemaEntry::new("name-for-methods", string),
                SchemaEntry::new("related-property", string),
                SchemaEntry::new("separator", string),
                SchemaEntry::new("setter", string),
                SchemaEntry::new("settings-flag", string),
                flag("sink-priority"),
                flag("skip-builder"),
                flag("skip-codegen"),
                SchemaEntry::new("status", string),
                flag("svg"),
                SchemaEntry::new("synonym", string),
                flag("top-priority"),
                SchemaEntry::new("url", string),
                flag("visited-link-color-support"),
            ])
        })
    }

    /// Parse the `codegen-properties` of property `name`.
    ///
    /// `json` may be absent (all defaults), an object, or a list of variants
    /// each guarded by `enable-if`.
    pub fn from_json(
        context: &ParsingContext,
        key_path: &str,
        name: &str,
        json: Option<&JsonValue>,
    ) -> Result<Self> {
        let label = format!("{}.codegen-properties", key_path);
        let empty = Map::new();

        let dictionary = match json {
            None => &empty,
            Some(JsonValue::Array(variants)) => context.select_enabled_variant(variants, &label)?,
            Some(JsonValue::Object(dictionary)) => dictionary,
            Some(other) => {
                return Err(GeneratorError::InvalidType {
                    label: format!("Property ({})", key_path),
                    key: "codegen-properties".to_string(),
                    found: JsonType::of(other).to_string(),
                    expected: vec![JsonType::Object.to_string(), JsonType::Array.to_string()],
                })
            }
        };

        let record = Self::schema().apply(dictionary, &format!("CodeGenProperties ({})", label))?;

        let is_shorthand = record.has("longhands");
        let top_priority = record.bool("top_priority");
        let high_priority = record.bool("high_priority");
        let sink_priority = record.bool("sink_priority");
        let internal_only = record.bool("internal_only");

        if top_priority {
            if !record.has("comment") {
                return Err(GeneratorError::semantic(key_path, "has top priority, but no comment to justify."));
            }
            if is_shorthand {
                return Err(GeneratorError::semantic(key_path, "is a shorthand, but has top priority."));
            }
            if high_priority {
                return Err(GeneratorError::semantic(key_path, "can't have conflicting top/high priority."));
            }
        }

        if high_priority && is_shorthand {
            return Err(GeneratorError::semantic(key_path, "is a shorthand, but has high priority."));
        }

        if sink_priority && is_shorthand {
            return Err(GeneratorError::semantic(key_path, "is a shorthand, but has sink priority."));
        }

        let logical_property_group = match record.get("logical_property_group") {
            Some(group) => {
                if is_shorthand {
                    return Err(GeneratorError::semantic(
                        key_path,
                        "is a shorthand, but belongs to a logical property group.",
                    ));
                }
                Some(LogicalPropertyGroup::from_json(context, &label, group)?)
            }
            None => None,
        };

        let computable = match record.opt_bool("computable") {
            Some(true) if internal_only => {
                return Err(GeneratorError::semantic(key_path, "can't be both internal-only and computable."));
            }
            Some(computable) => computable,
            None => !internal_only,
        };

        let related_property = record.non_empty_string("related_property");
        if let Some(related) = &related_property {
            if related == name {
                return Err(GeneratorError::semantic(key_path, "can't have itself as a related property."));
            }
            if is_shorthand {
                return Err(GeneratorError::semantic(
                    key_path,
                    "can't have both a related property and be a shorthand.",
                ));
            }
            if high_priority {
                return Err(GeneratorError::semantic(
                    key_path,
                    "can't have both a related property and be high priority.",
                ));
            }
        }

        let longhands = record
            .string_list("longhands")?
            .map(|names| names.into_iter().map(PropertyRef::unresolved).collect());

        Ok(Self {
            aliases: record.string_list("aliases")?.unwrap_or_default(),
            auto_functions: record.bool("auto_functions"),
            color_property: record.bool("color_property"),
            comment: record.string("comment"),
            computable,
            conditional_converter: record.string("conditional_converter"),
            converter: record.string("converter"),
            custom: record.string("custom"),
            descriptor_only: record.bool("descriptor_only"),
            enable_if: record.string("enable_if"),
            fast_path_inherited: record.bool("fast_path_inherited"),
            fill_layer_property: record.bool("fill_layer_property"),
            font_property: record.bool("font_property"),
            getter: record.string("getter"),
            high_priority,
            initial: record.string("initial"),
            internal_only,
            logical_property_group,
            longhands,
            name_for_methods: record.string("name_for_methods"),
            related_property: related_property.map(PropertyRef::unresolved),
            separator: record.non_empty_string("separator"),
            setter: record.string("setter"),
            settings_flag: record.non_empty_string("settings_flag"),
            sink_priority,
            skip_builder: record.bool("skip_builder"),
            skip_codegen: record.bool("skip_codegen"),
            status: record.string("status"),
            svg: record.bool("svg"),
            synonym: record.string("synonym"),
            top_priority,
            url: record.string("url"),
            visited_link_color_support: record.bool("visited_link_color_support"),
        })
    }

    pub fn is_shorthand(&self) -> bool {
        self.longhands.is_some()
    }

    /// Belongs to a logical property group through a logical resolver
    pub fn is_logical(&self) -> bool {
        self.logical_property_group
            .as_ref()
            .map_or(false, LogicalPropertyGroup::is_logical)
    }

    /// Applied after the properties it depends on
    pub fn is_deferred(&self) -> bool {
        self.related_property.is_some() || self.logical_property_group.is_some()
    }
}
