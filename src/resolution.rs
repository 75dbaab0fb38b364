//! Logical <-> physical property resolution
//!
//! For every member of a logical property group on the source logic, a
//! [`DirectionMappingTable`] holds the group's members on the opposite logic,
//! ordered like the engine's box enums. Choosing one candidate for a given
//! writing mode and direction is left to a caller-supplied mapping function.

use crate::catalog::Properties;
use crate::error::{GeneratorError, Result};
use crate::model::logical_group::resolvers;
use crate::model::{Kind, Logic, PropertyIndex};

/// Candidates for one source property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionMapping {
    pub group: String,
    pub kind: Kind,
    pub resolver: String,
    pub property: PropertyIndex,
    pub candidates: Vec<PropertyIndex>,
}

/// All mappings from one logic to the other
#[derive(Debug, Clone)]
pub struct DirectionMappingTable {
    source: Logic,
    mappings: Vec<DirectionMapping>,
}

impl DirectionMappingTable {
    /// Build the table for `source` members, failing on any incomplete group
    pub fn build(catalog: &Properties, source: Logic) -> Result<Self> {
        let destination = source.opposite();
        let mut mappings = Vec::new();

        for (group_name, entry) in catalog.logical_property_groups() {
            let destination_members = entry.members(destination);
            let candidates = resolvers(destination, entry.kind)
                .iter()
                .map(|resolver| {
                    destination_members.get(*resolver).copied().ok_or_else(|| {
                        GeneratorError::IncompleteLogicalGroup {
                            group: group_name.clone(),
                            logic: destination.to_string(),
                            resolver: resolver.to_string(),
                        }
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            for (resolver, property) in entry.members(source) {
                mappings.push(DirectionMapping {
                    group: group_name.clone(),
                    kind: entry.kind,
                    resolver: resolver.clone(),
                    property: *property,
                    candidates: candidates.clone(),
                });
            }
        }

        log::debug!(
            "Built {} -> {} mapping table with {} entries",
            source,
            destination,
            mappings.len()
        );

        Ok(Self { source, mappings })
    }

    pub fn source(&self) -> Logic {
        self.source
    }

    pub fn destination(&self) -> Logic {
        self.source.opposite()
    }

    /// Mappings grouped by group name, then ordered by resolver name
    pub fn mappings(&self) -> &[DirectionMapping] {
        &self.mappings
    }

    pub fn mapping_for(&self, catalog: &Properties, property: PropertyIndex) -> Result<&DirectionMapping> {
        self.mappings
            .iter()
            .find(|mapping| mapping.property == property)
            .ok_or_else(|| GeneratorError::NoDirectionMapping {
                property: catalog.property(property).name.clone(),
                destination: self.destination().to_string(),
            })
    }

    pub fn candidates_for(&self, catalog: &Properties, property: PropertyIndex) -> Result<&[PropertyIndex]> {
        Ok(&self.mapping_for(catalog, property)?.candidates)
    }

    /// Resolve `property` with `map`, which receives the group kind and the
    /// source resolver and returns a position in the destination enum order.
    pub fn resolve<F>(&self, catalog: &Properties, property: PropertyIndex, map: F) -> Result<PropertyIndex>
    where
        F: FnOnce(Kind, &str) -> usize,
    {
        let mapping = self.mapping_for(catalog, property)?;
        let position = map(mapping.kind, &mapping.resolver);

        mapping.candidates.get(position).copied().ok_or_else(|| {
            GeneratorError::logical_group(
                &mapping.group,
                format!(
                    "has no {} candidate at position {} for {}.",
                    self.destination(),
                    position,
                    catalog.property(property).name
                ),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ParsingContext;
    use serde_json::{json, Value as JsonValue};

    fn parse(properties: JsonValue) -> Properties {
        let context = ParsingContext::new(None, true, false);
        Properties::from_json(
            &context,
            &json!({"categories": {}, "instructions": [], "properties": properties}),
        )
        .unwrap()
    }

    fn member(group: &str, resolver: &str) -> JsonValue {
        json!({"codegen-properties": {"logical-property-group": {"name": group, "resolver": resolver}}})
    }

    fn inset_catalog() -> Properties {
        parse(json!({
            "inset-block-start": member("inset", "block-start"),
            "inset-inline-end": member("inset", "inline-end"),
            "inset-block-end": member("inset", "block-end"),
            "inset-inline-start": member("inset", "inline-start"),
            "left": member("inset", "left"),
            "top": member("inset", "top"),
            "bottom": member("inset", "bottom"),
            "right": member("inset", "right")
        }))
    }

    fn names(catalog: &Properties, indices: &[PropertyIndex]) -> Vec<String> {
        indices.iter().map(|index| catalog.property(*index).name.clone()).collect()
    }

    #[test]
    fn test_candidates_follow_enum_order() {
        let catalog = inset_catalog();
        let table = DirectionMappingTable::build(&catalog, Logic::Logical).unwrap();

        let block_start = catalog.index_of("inset-block-start").unwrap();
        let candidates = table.candidates_for(&catalog, block_start).unwrap();
        assert_eq!(names(&catalog, candidates), vec!["top", "right", "bottom", "left"]);

        let reverse = DirectionMappingTable::build(&catalog, Logic::Physical).unwrap();
        let left = catalog.index_of("left").unwrap();
        let candidates = reverse.candidates_for(&catalog, left).unwrap();
        assert_eq!(
            names(&catalog, candidates),
            vec!["inset-block-start", "inset-inline-end", "inset-block-end", "inset-inline-start"]
        );
    }

    #[test]
    fn test_mappings_ordered_by_resolver() {
        let catalog = inset_catalog();
        let table = DirectionMappingTable::build(&catalog, Logic::Logical).unwrap();

        let resolvers: Vec<&str> = table.mappings().iter().map(|m| m.resolver.as_str()).collect();
        assert_eq!(resolvers, vec!["block-end", "block-start", "inline-end", "inline-start"]);
    }

    #[test]
    fn test_incomplete_group() {
        let catalog = parse(json!({"inset-block-start": member("inset", "block-start")}));

        let err = DirectionMappingTable::build(&catalog, Logic::Logical).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Logical property group \"inset\" is missing a physical \"top\" property"
        );
    }

    #[test]
    fn test_partially_specified_destination() {
        let catalog = parse(json!({
            "inline-size": member("dimension", "inline"),
            "block-size": member("dimension", "block"),
            "width": member("dimension", "horizontal")
        }));

        let err = DirectionMappingTable::build(&catalog, Logic::Logical).unwrap_err();
        assert!(matches!(err, GeneratorError::IncompleteLogicalGroup { ref resolver, .. } if resolver == "vertical"));

        // The logical side is complete, so the physical -> logical direction resolves.
        let table = DirectionMappingTable::build(&catalog, Logic::Physical).unwrap();
        let width = catalog.index_of("width").unwrap();
        assert_eq!(
            names(&catalog, table.candidates_for(&catalog, width).unwrap()),
            vec!["inline-size", "block-size"]
        );
    }

    #[test]
    fn test_resolve_with_mapping_function() {
        let catalog = inset_catalog();
        let table = DirectionMappingTable::build(&catalog, Logic::Logical).unwrap();
        let inline_start = catalog.index_of("inset-inline-start").unwrap();

        // horizontal-tb, ltr: inline-start maps to the left side.
        let resolved = table
            .resolve(&catalog, inline_start, |kind, resolver| {
                assert_eq!(kind, Kind::Side);
                assert_eq!(resolver, "inline-start");
                3
            })
            .unwrap();
        assert_eq!(catalog.property(resolved).name, "left");

        assert!(table.resolve(&catalog, inline_start, |_, _| 4).is_err());
    }

    #[test]
    fn test_no_mapping_is_an_error() {
        let catalog = parse(json!({
            "color": {},
            "top": member("inset", "top"),
            "right": member("inset", "right"),
            "bottom": member("inset", "bottom"),
            "left": member("inset", "left")
        }));

        let table = DirectionMappingTable::build(&catalog, Logic::Logical).unwrap();
        assert!(table.mappings().is_empty());

        let color = catalog.index_of("color").unwrap();
        let err = table.candidates_for(&catalog, color).unwrap_err();
        assert_eq!(err.to_string(), "No physical mapping for property color");

        let err = DirectionMappingTable::build(&catalog, Logic::Physical).unwrap_err();
        assert!(matches!(err, GeneratorError::IncompleteLogicalGroup { .. }));

        let catalog = inset_catalog();
        let table = DirectionMappingTable::build(&catalog, Logic::Logical).unwrap();
        let top = catalog.index_of("top").unwrap();
        assert!(matches!(
            table.candidates_for(&catalog, top),
            Err(GeneratorError::NoDirectionMapping { .. })
        ));
    }
}
