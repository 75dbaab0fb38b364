//! Linking pass run once all properties are parsed
//!
//! Name references in `longhands` and `related-property` are resolved to arena
//! handles, and logical property group membership is registered in the catalog
//! index. All cross-reference rules are checked here and nowhere else.

use crate::catalog::{LogicalPropertyGroupEntry, Properties};
use crate::error::{GeneratorError, Result};
use crate::model::PropertyIndex;

/// Link every property, in document order
pub fn perform_fixups(catalog: &mut Properties) -> Result<()> {
    for i in 0..catalog.len() {
        let index = PropertyIndex(i);
        fixup_longhands(catalog, index)?;
        fixup_related_property(catalog, index)?;
        fixup_logical_property_group(catalog, index)?;
    }

    check_longhand_cycles(catalog)
}

fn fixup_longhands(catalog: &mut Properties, index: PropertyIndex) -> Result<()> {
    let property = catalog.property(index);
    let Some(longhands) = &property.codegen.longhands else {
        return Ok(());
    };

    let targets = longhands
        .iter()
        .map(|longhand| {
            catalog.index_of(longhand.name()).ok_or_else(|| {
                GeneratorError::link(
                    &property.name,
                    format!("has an unknown longhand: {}.", longhand.name()),
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if let Some(longhands) = &mut catalog.property_mut(index).codegen.longhands {
        for (longhand, target) in longhands.iter_mut().zip(targets) {
            longhand.resolve(target);
        }
    }

    Ok(())
}

fn fixup_related_property(catalog: &mut Properties, index: PropertyIndex) -> Result<()> {
    let property = catalog.property(index);
    let Some(related) = &property.codegen.related_property else {
        return Ok(());
    };

    let target = catalog.index_of(related.name()).ok_or_else(|| {
        GeneratorError::link(
            &property.name,
            format!("has an unknown related property: {}.", related.name()),
        )
    })?;

    let related_property = catalog.property(target);
    let reciprocal = match &related_property.codegen.related_property {
        Some(back) => match back.target() {
            Some(back_target) => back_target == index,
            None => back.name() == property.name,
        },
        None => false,
    };

    if !reciprocal {
        return Err(GeneratorError::link(
            &property.name,
            format!(
                "has {} as a related property, but it's not reciprocal.",
                related_property.name
            ),
        ));
    }

    if let Some(related) = &mut catalog.property_mut(index).codegen.related_property {
        related.resolve(target);
    }

    Ok(())
}

fn fixup_logical_property_group(catalog: &mut Properties, index: PropertyIndex) -> Result<()> {
    let property = catalog.property(index);
    let Some(group) = property.codegen.logical_property_group.clone() else {
        return Ok(());
    };

    if let Some(entry) = catalog.logical_property_groups.get(&group.name) {
        if entry.kind != group.kind {
            return Err(GeneratorError::logical_group(
                &group.name,
                format!("has resolvers of different kinds: {} and {}.", group.kind, entry.kind),
            ));
        }

        if let Some(existing) = entry.members(group.logic).get(&group.resolver) {
            return Err(GeneratorError::logical_group(
                &group.name,
                format!(
                    "has multiple \"{}\" properties: {} and {}.",
                    group.resolver,
                    property.name,
                    catalog.property(*existing).name
                ),
            ));
        }
    }

    catalog
        .logical_property_groups
        .entry(group.name)
        .or_insert_with(|| LogicalPropertyGroupEntry::new(group.kind))
        .members_mut(group.logic)
        .insert(group.resolver, index);

    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Pending,
    InProgress,
    Done,
}

fn check_longhand_cycles(catalog: &Properties) -> Result<()> {
    let mut visits = vec![Visit::Pending; catalog.len()];
    for i in 0..catalog.len() {
        visit_longhands(catalog, PropertyIndex(i), &mut visits)?;
    }
    Ok(())
}

fn visit_longhands(catalog: &Properties, index: PropertyIndex, visits: &mut [Visit]) -> Result<()> {
    match visits[index.index()] {
        Visit::Done => return Ok(()),
        Visit::InProgress => {
            return Err(GeneratorError::link(
                &catalog.property(index).name,
                "is part of a cyclic longhand chain.",
            ))
        }
        Visit::Pending => {}
    }

    visits[index.index()] = Visit::InProgress;
    if let Some(longhands) = &catalog.property(index).codegen.longhands {
        for target in longhands.iter().filter_map(|longhand| longhand.target()) {
            visit_longhands(catalog, target, visits)?;
        }
    }
    visits[index.index()] = Visit::Done;

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::catalog::Properties;
    use crate::context::ParsingContext;
    use crate::error::{GeneratorError, Result};
    use crate::model::{Kind, Logic};
    use serde_json::{json, Value as JsonValue};

    fn parse(properties: JsonValue) -> Result<Properties> {
        let context = ParsingContext::new(None, true, false);
        Properties::from_json(
            &context,
            &json!({"categories": {}, "instructions": [], "properties": properties}),
        )
    }

    #[test]
    fn test_longhands_are_linked() {
        let catalog = parse(json!({
            "size": {"codegen-properties": {"longhands": ["width", "height"]}},
            "width": {},
            "height": {}
        }))
        .unwrap();

        let size = catalog.get("size").unwrap();
        let longhands = size.codegen.longhands.as_ref().unwrap();
        assert!(longhands.iter().all(|longhand| longhand.is_resolved()));
        assert_eq!(longhands[0].target(), catalog.index_of("width"));
        assert_eq!(longhands[1].target(), catalog.index_of("height"));
    }

    #[test]
    fn test_unknown_longhand() {
        let err = parse(json!({"size": {"codegen-properties": {"longhands": ["width"]}}})).unwrap_err();
        assert_eq!(err.to_string(), "Property size has an unknown longhand: width.");
    }

    #[test]
    fn test_longhand_of_filtered_property() {
        let err = parse(json!({
            "size": {"codegen-properties": {"longhands": ["width"]}},
            "width": {"codegen-properties": {"skip-codegen": true}}
        }))
        .unwrap_err();
        assert!(matches!(err, GeneratorError::Link { .. }));
    }

    #[test]
    fn test_longhand_cycle() {
        let err = parse(json!({
            "a": {"codegen-properties": {"longhands": ["b"]}},
            "b": {"codegen-properties": {"longhands": ["a"]}}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("cyclic longhand chain"));
    }

    #[test]
    fn test_related_property_reciprocity() {
        let catalog = parse(json!({
            "color": {"codegen-properties": {"related-property": "-webkit-text-fill-color"}},
            "-webkit-text-fill-color": {"codegen-properties": {"related-property": "color"}}
        }))
        .unwrap();

        let color = catalog.get("color").unwrap();
        assert_eq!(
            color.codegen.related_property.as_ref().and_then(|r| r.target()),
            catalog.index_of("-webkit-text-fill-color")
        );

        let fill = catalog.get("-webkit-text-fill-color").unwrap();
        assert_eq!(
            fill.codegen.related_property.as_ref().and_then(|r| r.target()),
            catalog.index_of("color")
        );
    }

    #[test]
    fn test_asymmetric_related_property() {
        let err = parse(json!({
            "a": {"codegen-properties": {"related-property": "b"}},
            "b": {"codegen-properties": {"related-property": "c"}},
            "c": {"codegen-properties": {"related-property": "b"}}
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "Property a has b as a related property, but it's not reciprocal.");

        let err = parse(json!({
            "a": {"codegen-properties": {"related-property": "b"}},
            "b": {}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("not reciprocal"));
    }

    #[test]
    fn test_unknown_related_property() {
        let err = parse(json!({"a": {"codegen-properties": {"related-property": "b"}}})).unwrap_err();
        assert_eq!(err.to_string(), "Property a has an unknown related property: b.");
    }

    #[test]
    fn test_logical_group_registration() {
        let catalog = parse(json!({
            "margin-top": {"codegen-properties": {"logical-property-group": {"name": "margin", "resolver": "top"}}},
            "margin-block-start": {"codegen-properties": {"logical-property-group": {"name": "margin", "resolver": "block-start"}}}
        }))
        .unwrap();

        let entry = &catalog.logical_property_groups()["margin"];
        assert_eq!(entry.kind, Kind::Side);
        assert_eq!(entry.members(Logic::Physical).get("top").copied(), catalog.index_of("margin-top"));
        assert_eq!(
            entry.members(Logic::Logical).get("block-start").copied(),
            catalog.index_of("margin-block-start")
        );
    }

    #[test]
    fn test_duplicate_resolver() {
        let err = parse(json!({
            "margin-top": {"codegen-properties": {"logical-property-group": {"name": "margin", "resolver": "top"}}},
            "margin-up": {"codegen-properties": {"logical-property-group": {"name": "margin", "resolver": "top"}}}
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Logical property group \"margin\" has multiple \"top\" properties: margin-up and margin-top."
        );
    }

    #[test]
    fn test_kind_mismatch() {
        let err = parse(json!({
            "width": {"codegen-properties": {"logical-property-group": {"name": "dimension", "resolver": "horizontal"}}},
            "margin-top": {"codegen-properties": {"logical-property-group": {"name": "dimension", "resolver": "top"}}}
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Logical property group \"dimension\" has resolvers of different kinds: side and axis."
        );
    }
}
