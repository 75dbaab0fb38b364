//! The property catalog and its derived views
//!
//! A [`Properties`] catalog owns every active property in an arena, in document
//! order. Construction runs the fixup pass and then computes every derived view
//! once; the catalog is immutable afterwards.

use crate::context::ParsingContext;
use crate::error::{GeneratorError, Result};
use crate::fixup;
use crate::model::{Kind, Logic, Property, PropertyIndex};
use crate::schema::{expect_object, JsonType, Schema, SchemaEntry};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;

/// Members of one logical property group, by resolver name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalPropertyGroupEntry {
    pub kind: Kind,
    pub logical: BTreeMap<String, PropertyIndex>,
    pub physical: BTreeMap<String, PropertyIndex>,
}

impl LogicalPropertyGroupEntry {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            logical: BTreeMap::new(),
            physical: BTreeMap::new(),
        }
    }

    pub fn members(&self, logic: Logic) -> &BTreeMap<String, PropertyIndex> {
        match logic {
            Logic::Logical => &self.logical,
            Logic::Physical => &self.physical,
        }
    }

    pub(crate) fn members_mut(&mut self, logic: Logic) -> &mut BTreeMap<String, PropertyIndex> {
        match logic {
            Logic::Logical => &mut self.logical,
            Logic::Physical => &mut self.physical,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct DerivedViews {
    all: Vec<PropertyIndex>,
    all_with_prefixed_properties_last: Vec<PropertyIndex>,
    all_with_settings_flag: Vec<PropertyIndex>,
    internal_only: Vec<PropertyIndex>,
    all_direction_aware_properties: Vec<PropertyIndex>,
    all_in_logical_property_group: Vec<PropertyIndex>,
    direction_aware: BTreeSet<PropertyIndex>,
    in_logical_property_group: BTreeSet<PropertyIndex>,
    settings_flags: Vec<String>,
}

/// The complete set of active properties
#[derive(Debug, Clone)]
pub struct Properties {
    properties: Vec<Property>,
    by_name: HashMap<String, PropertyIndex>,
    pub(crate) logical_property_groups: BTreeMap<String, LogicalPropertyGroupEntry>,
    views: DerivedViews,
}

impl Properties {
    pub fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::new(vec![
                SchemaEntry::new("categories", &[JsonType::Object]),
                SchemaEntry::new("instructions", &[JsonType::Array]),
                SchemaEntry::new("properties", &[JsonType::Object]),
            ])
        })
    }

    /// Parse a whole `CSSProperties.json` document
    pub fn from_json(context: &ParsingContext, document: &JsonValue) -> Result<Self> {
        let label = "top level object";
        let record = Self::schema().apply(expect_object(document, label)?, label)?;
        let definitions = record
            .object("properties")
            .ok_or_else(|| GeneratorError::missing_key(label, "properties"))?;

        let mut properties = Vec::with_capacity(definitions.len());
        for (name, definition) in definitions {
            if let Some(property) = Property::from_json(context, "$properties", name, definition)? {
                properties.push(property);
            }
        }

        if context.verbose() {
            log::info!("{} properties active for code generation", properties.len());
        }

        Self::from_properties(properties)
    }

    /// Build a catalog from already parsed properties, linking and finalizing it
    pub fn from_properties(properties: Vec<Property>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(properties.len());
        for (i, property) in properties.iter().enumerate() {
            if by_name.insert(property.name.clone(), PropertyIndex(i)).is_some() {
                return Err(GeneratorError::link(&property.name, "is defined more than once."));
            }
        }

        let mut catalog = Self {
            properties,
            by_name,
            logical_property_groups: BTreeMap::new(),
            views: DerivedViews::default(),
        };

        fixup::perform_fixups(&mut catalog)?;
        catalog.finalize();

        log::debug!(
            "Catalog finalized: {} properties, {} logical property groups",
            catalog.len(),
            catalog.logical_property_groups.len()
        );

        Ok(catalog)
    }

    fn finalize(&mut self) {
        let mut all = self.indices();
        all.sort_by(|a, b| {
            compare_by_descending_priority_and_name(self.property(*a), self.property(*b))
        });

        let mut all_with_prefixed_properties_last = self.indices();
        all_with_prefixed_properties_last.sort_by(|a, b| {
            compare_with_prefixed_properties_last(self.property(*a), self.property(*b))
        });

        let all_with_settings_flag = self.sorted_by_name(has_settings_flag);
        let internal_only = self.sorted_by_name(|property| property.codegen.internal_only);

        let settings_flags = self
            .properties
            .iter()
            .filter(|property| has_settings_flag(property))
            .filter_map(|property| property.codegen.settings_flag.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut all_direction_aware_properties = Vec::new();
        let mut all_in_logical_property_group = Vec::new();
        for entry in self.logical_property_groups.values() {
            all_direction_aware_properties.extend(self.members_by_name(entry, Logic::Logical));
            for logic in Logic::ALL {
                all_in_logical_property_group.extend(self.members_by_name(entry, logic));
            }
        }

        let direction_aware = all_direction_aware_properties.iter().copied().collect();
        let in_logical_property_group = all_in_logical_property_group.iter().copied().collect();

        self.views = DerivedViews {
            all,
            all_with_prefixed_properties_last,
            all_with_settings_flag,
            internal_only,
            all_direction_aware_properties,
            all_in_logical_property_group,
            direction_aware,
            in_logical_property_group,
            settings_flags,
        };
    }

    fn indices(&self) -> Vec<PropertyIndex> {
        (0..self.properties.len()).map(PropertyIndex).collect()
    }

    fn sorted_by_name(&self, predicate: impl Fn(&Property) -> bool) -> Vec<PropertyIndex> {
        let mut selected: Vec<PropertyIndex> = self
            .indices()
            .into_iter()
            .filter(|index| predicate(self.property(*index)))
            .collect();
        selected.sort_by(|a, b| self.property(*a).name.cmp(&self.property(*b).name));
        selected
    }

    fn members_by_name(&self, entry: &LogicalPropertyGroupEntry, logic: Logic) -> Vec<PropertyIndex> {
        let mut members: Vec<PropertyIndex> = entry.members(logic).values().copied().collect();
        members.sort_by(|a, b| self.property(*a).name.cmp(&self.property(*b).name));
        members
    }

    fn resolve<'a>(&'a self, indices: &'a [PropertyIndex]) -> impl Iterator<Item = &'a Property> + 'a {
        indices.iter().map(move |index| self.property(*index))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn property(&self, index: PropertyIndex) -> &Property {
        &self.properties[index.0]
    }

    pub(crate) fn property_mut(&mut self, index: PropertyIndex) -> &mut Property {
        &mut self.properties[index.0]
    }

    pub fn index_of(&self, name: &str) -> Option<PropertyIndex> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.index_of(name).map(|index| self.property(index))
    }

    /// Properties in document order
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    pub fn logical_property_groups(&self) -> &BTreeMap<String, LogicalPropertyGroupEntry> {
        &self.logical_property_groups
    }

    /// Canonical generation order
    pub fn all(&self) -> impl Iterator<Item = &Property> {
        self.resolve(&self.views.all)
    }

    pub fn all_indices(&self) -> &[PropertyIndex] {
        &self.views.all
    }

    pub fn all_with_prefixed_properties_last(&self) -> impl Iterator<Item = &Property> {
        self.resolve(&self.views.all_with_prefixed_properties_last)
    }

    pub fn all_with_settings_flag(&self) -> impl Iterator<Item = &Property> {
        self.resolve(&self.views.all_with_settings_flag)
    }

    pub fn internal_only(&self) -> impl Iterator<Item = &Property> {
        self.resolve(&self.views.internal_only)
    }

    /// Logical members of every group, grouped by group name
    pub fn all_direction_aware_properties(&self) -> impl Iterator<Item = &Property> {
        self.resolve(&self.views.all_direction_aware_properties)
    }

    /// Logical then physical members of every group, grouped by group name
    pub fn all_in_logical_property_group(&self) -> impl Iterator<Item = &Property> {
        self.resolve(&self.views.all_in_logical_property_group)
    }

    /// Distinct settings flags referenced by any property, sorted
    pub fn settings_flags(&self) -> &[String] {
        &self.views.settings_flags
    }

    pub fn is_direction_aware(&self, index: PropertyIndex) -> bool {
        self.views.direction_aware.contains(&index)
    }

    pub fn is_in_logical_property_group(&self, index: PropertyIndex) -> bool {
        self.views.in_logical_property_group.contains(&index)
    }

    pub fn are_in_same_logical_property_group_with_different_mapping_logic(
        &self,
        first: PropertyIndex,
        second: PropertyIndex,
    ) -> bool {
        let first = &self.property(first).codegen.logical_property_group;
        let second = &self.property(second).codegen.logical_property_group;
        match (first, second) {
            (Some(first), Some(second)) => first.name == second.name && first.logic != second.logic,
            _ => false,
        }
    }

    /// Whether the property is left out of computed style.
    ///
    /// A shorthand is skipped as soon as one of its longhands is.
    pub fn is_skipped_from_computed_style(&self, property: &Property) -> bool {
        let codegen = &property.codegen;

        if codegen.internal_only || !codegen.computable {
            return true;
        }

        if codegen.skip_builder && !codegen.is_logical() {
            return true;
        }

        if let Some(longhands) = &codegen.longhands {
            return longhands
                .iter()
                .filter_map(|longhand| longhand.target())
                .any(|longhand| self.is_skipped_from_computed_style(self.property(longhand)));
        }

        false
    }
}

fn has_settings_flag(property: &Property) -> bool {
    property
        .codegen
        .settings_flag
        .as_deref()
        .is_some_and(|flag| !flag.is_empty())
}

/// Shorthands last, then top and high priority first, deferred and sunk
/// properties last, prefixed names last, then by name.
pub fn compare_by_descending_priority_and_name(a: &Property, b: &Property) -> Ordering {
    let (a_codegen, b_codegen) = (&a.codegen, &b.codegen);

    a_codegen
        .is_shorthand()
        .cmp(&b_codegen.is_shorthand())
        .then_with(|| b_codegen.top_priority.cmp(&a_codegen.top_priority))
        .then_with(|| b_codegen.high_priority.cmp(&a_codegen.high_priority))
        .then_with(|| a_codegen.is_deferred().cmp(&b_codegen.is_deferred()))
        .then_with(|| a_codegen.sink_priority.cmp(&b_codegen.sink_priority))
        .then_with(|| compare_with_prefixed_properties_last(a, b))
}

pub fn compare_with_prefixed_properties_last(a: &Property, b: &Property) -> Ordering {
    a.has_vendor_prefix()
        .cmp(&b.has_vendor_prefix())
        .then_with(|| a.name.cmp(&b.name))
}
