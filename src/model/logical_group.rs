//! Logical/physical property groups and the resolver table

use crate::context::ParsingContext;
use crate::error::{GeneratorError, Result};
use crate::schema::{expect_object, JsonType, Schema, SchemaEntry};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::OnceLock;

/// Whether a resolver is writing-mode relative or absolute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Logic {
    Logical,
    Physical,
}

impl Logic {
    pub const ALL: [Logic; 2] = [Logic::Logical, Logic::Physical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Logic::Logical => "logical",
            Logic::Physical => "physical",
        }
    }

    pub fn opposite(&self) -> Logic {
        match self {
            Logic::Logical => Logic::Physical,
            Logic::Physical => Logic::Logical,
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geometry a group's resolvers describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Axis,
    Side,
    Corner,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Axis, Kind::Side, Kind::Corner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Axis => "axis",
            Kind::Side => "side",
            Kind::Corner => "corner",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolver names for a logic and kind.
///
/// The order of each list matches the engine's enums in `WritingMode.h`:
/// `LogicalBoxAxis`, `LogicalBoxSide`, `LogicalBoxCorner` for logical resolvers
/// and `BoxAxis`, `BoxSide`, `BoxCorner` for physical ones.
pub fn resolvers(logic: Logic, kind: Kind) -> &'static [&'static str] {
    match (logic, kind) {
        (Logic::Logical, Kind::Axis) => LOGICAL_AXIS,
        (Logic::Logical, Kind::Side) => LOGICAL_SIDE,
        (Logic::Logical, Kind::Corner) => LOGICAL_CORNER,
        (Logic::Physical, Kind::Axis) => PHYSICAL_AXIS,
        (Logic::Physical, Kind::Side) => PHYSICAL_SIDE,
        (Logic::Physical, Kind::Corner) => PHYSICAL_CORNER,
    }
}

const LOGICAL_AXIS: &[&str] = &["inline", "block"];
const LOGICAL_SIDE: &[&str] = &["block-start", "inline-end", "block-end", "inline-start"];
const LOGICAL_CORNER: &[&str] = &["start-start", "start-end", "end-start", "end-end"];
const PHYSICAL_AXIS: &[&str] = &["horizontal", "vertical"];
const PHYSICAL_SIDE: &[&str] = &["top", "right", "bottom", "left"];
const PHYSICAL_CORNER: &[&str] = &["top-left", "top-right", "bottom-right", "bottom-left"];

/// Find the logic and kind a resolver name belongs to
pub fn lookup_resolver(resolver: &str) -> Option<(Logic, Kind)> {
    for logic in Logic::ALL {
        for kind in Kind::ALL {
            if resolvers(logic, kind).contains(&resolver) {
                return Some((logic, kind));
            }
        }
    }
    None
}

/// Membership of a property in a logical property group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalPropertyGroup {
    pub name: String,
    pub resolver: String,
    pub kind: Kind,
    pub logic: Logic,
}

impl LogicalPropertyGroup {
    pub fn new(name: impl Into<String>, resolver: impl Into<String>) -> Result<Self> {
        let resolver = resolver.into();
        let (logic, kind) = lookup_resolver(&resolver)
            .ok_or_else(|| GeneratorError::UnrecognizedResolver { resolver: resolver.clone() })?;

        Ok(Self {
            name: name.into(),
            resolver,
            kind,
            logic,
        })
    }

    pub fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new(vec![
                SchemaEntry::new("name", &[JsonType::String]),
                SchemaEntry::new("resolver", &[JsonType::String]),
            ])
        })
    }

    pub fn from_json(_context: &ParsingContext, key_path: &str, json: &JsonValue) -> Result<Self> {
        let label = format!("LogicalPropertyGroup ({}.logical-property-group)", key_path);
        let record = Self::schema().apply(expect_object(json, &label)?, &label)?;

        let name = record
            .string("name")
            .ok_or_else(|| GeneratorError::missing_key(&label, "name"))?;
        let resolver = record
            .string("resolver")
            .ok_or_else(|| GeneratorError::missing_key(&label, "resolver"))?;

        Self::new(name, resolver)
    }

    pub fn is_logical(&self) -> bool {
        self.logic == Logic::Logical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolver_lookup() {
        assert_eq!(lookup_resolver("block-start"), Some((Logic::Logical, Kind::Side)));
        assert_eq!(lookup_resolver("inline"), Some((Logic::Logical, Kind::Axis)));
        assert_eq!(lookup_resolver("bottom-left"), Some((Logic::Physical, Kind::Corner)));
        assert_eq!(lookup_resolver("vertical"), Some((Logic::Physical, Kind::Axis)));
        assert_eq!(lookup_resolver("middle"), None);
    }

    #[test]
    fn test_resolver_names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for logic in Logic::ALL {
            for kind in Kind::ALL {
                for resolver in resolvers(logic, kind) {
                    assert!(seen.insert(*resolver), "duplicate resolver {resolver}");
                }
            }
        }
    }

    #[test]
    fn test_group_from_json() {
        let context = ParsingContext::default();
        let group = LogicalPropertyGroup::from_json(
            &context,
            "$properties.margin-top.codegen-properties",
            &json!({"name": "margin", "resolver": "top"}),
        )
        .unwrap();

        assert_eq!(group.kind, Kind::Side);
        assert_eq!(group.logic, Logic::Physical);
        assert!(!group.is_logical());
    }

    #[test]
    fn test_unrecognized_resolver() {
        let context = ParsingContext::default();
        let err = LogicalPropertyGroup::from_json(
            &context,
            "$properties.margin-top.codegen-properties",
            &json!({"name": "margin", "resolver": "up"}),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Unrecognized resolver \"up\"");
    }
}
