//! Typed entities parsed from `CSSProperties.json`
//!
//! Each entity validates one JSON node against its schema and applies its own
//! semantic rules. Cross references between properties are kept as names here
//! and turned into arena handles by the fixup pass.

pub mod codegen_attributes;
pub mod logical_group;
pub mod property;
pub mod specification;
pub mod status;
pub mod value;

pub use codegen_attributes::CodeGenAttributes;
pub use logical_group::{Kind, Logic, LogicalPropertyGroup};
pub use property::{convert_name_to_id, Property};
pub use specification::Specification;
pub use status::Status;
pub use value::Value;

/// Handle of a property inside the catalog arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyIndex(pub(crate) usize);

impl PropertyIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A by-name reference to another property, linked during fixups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRef {
    name: String,
    target: Option<PropertyIndex>,
}

impl PropertyRef {
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> Option<PropertyIndex> {
        self.target
    }

    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }

    pub(crate) fn resolve(&mut self, target: PropertyIndex) {
        self.target = Some(target);
    }
}
