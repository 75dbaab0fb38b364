//! Generation of `CSSPropertyNames.gperf` and the gperf invocation
//!
//! Every artifact is a pure function of a finalized [`Properties`] catalog.
//! Anything that can fail (logical group completeness) is resolved before the
//! first byte is written, so a failed run never leaves a partial file behind.

use crate::catalog::Properties;
use crate::error::{GeneratorError, Result};
use crate::model::{convert_name_to_id, Logic, Property};
use crate::resolution::DirectionMappingTable;
use std::fmt::{self, Write};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const GPERF_INPUT_FILE: &str = "CSSPropertyNames.gperf";
pub const GPERF_OUTPUT_FILE: &str = "CSSPropertyNames.cpp";

/// `CSSPropertyInvalid` and `CSSPropertyCustom` precede the generated ids
const NUMBER_OF_PREDEFINED_PROPERTIES: usize = 2;

fn quoted<'a>(items: impl IntoIterator<Item = &'a String>, suffix: &str) -> Vec<String> {
    items
        .into_iter()
        .map(|item| format!("\"{}\"{}", item, suffix))
        .collect()
}

fn property_id(property: &Property) -> String {
    format!("CSSProperty{}", property.id())
}

/// Drives emission of generated sources from a finished catalog
pub struct GenerationContext<'a> {
    properties: &'a Properties,
    verbose: bool,
    gperf_executable: Option<PathBuf>,
}

impl<'a> GenerationContext<'a> {
    pub fn new(properties: &'a Properties, verbose: bool, gperf_executable: Option<PathBuf>) -> Self {
        Self {
            properties,
            verbose,
            gperf_executable,
        }
    }

    /// Tool to run: the explicit executable, then `$GPERF`, then `gperf`
    pub fn gperf_command(&self) -> PathBuf {
        self.gperf_executable
            .clone()
            .or_else(|| std::env::var_os("GPERF").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("gperf"))
    }

    pub fn run_gperf(&self, output_directory: &Path) -> Result<()> {
        let command = self.gperf_command();
        let command_name = command.display().to_string();

        if self.verbose {
            log::info!("Running {} in {}", command_name, output_directory.display());
        }

        let output_file = format!("--output-file={}", GPERF_OUTPUT_FILE);
        let status = Command::new(&command)
            .current_dir(output_directory)
            .args(["--key-positions=*", "-D", "-n", "-s", "2", GPERF_INPUT_FILE, output_file.as_str()])
            .status()
            .map_err(|e| GeneratorError::tool(&command_name, e.to_string()))?;

        if !status.success() {
            return Err(GeneratorError::tool(
                &command_name,
                format!(
                    "generating {} from {} failed with {}",
                    GPERF_OUTPUT_FILE, GPERF_INPUT_FILE, status
                ),
            ));
        }

        Ok(())
    }

    /// Write `CSSPropertyNames.gperf` into `output_directory`
    pub fn write_css_property_names_gperf(&self, output_directory: &Path) -> Result<PathBuf> {
        let contents = self.generate_css_property_names_gperf()?;
        let path = output_directory.join(GPERF_INPUT_FILE);
        fs::write(&path, contents)?;

        if self.verbose {
            log::info!("Wrote {}", path.display());
        }

        Ok(path)
    }

    pub fn generate_css_property_names_gperf(&self) -> Result<String> {
        let resolve_table = DirectionMappingTable::build(self.properties, Logic::Logical)?;
        let unresolve_table = DirectionMappingTable::build(self.properties, Logic::Physical)?;

        let mut out = String::new();
        self.write_gperf(&mut out, &resolve_table, &unresolve_table)
            .map_err(|e| GeneratorError::CodeGen {
                message: format!("failed to format {}: {}", GPERF_INPUT_FILE, e),
            })?;

        log::debug!("Generated {} ({} bytes)", GPERF_INPUT_FILE, out.len());
        Ok(out)
    }

    fn write_gperf(
        &self,
        out: &mut String,
        resolve_table: &DirectionMappingTable,
        unresolve_table: &DirectionMappingTable,
    ) -> fmt::Result {
        let properties = self.properties;

        self.write_gperf_prefix(out)?;
        self.write_gperf_definition(out)?;
        write_lookup_functions(out)?;

        write_bool_switch(out, "bool isInternal(CSSPropertyID id)", properties.internal_only())?;

        let exposed_prologue = "if (id == CSSPropertyInvalid || isInternal(id))\n    return false;\n\nif (!settings)\n    return true;";
        write_switch(
            out,
            "bool isExposed(CSSPropertyID id, const Settings* settings)",
            properties.all_with_settings_flag(),
            |p| format!("return settings->{}();", p.codegen.settings_flag.as_deref().unwrap_or_default()),
            "return true;",
            Some(exposed_prologue),
            None,
        )?;
        write_switch(
            out,
            "bool isExposed(CSSPropertyID id, const CSSPropertySettings* settings)",
            properties.all_with_settings_flag(),
            |p| format!("return settings->{};", p.codegen.settings_flag.as_deref().unwrap_or_default()),
            "return true;",
            Some(exposed_prologue),
            None,
        )?;

        self.write_is_inherited_property(out)?;

        write_switch(
            out,
            "CSSPropertyID relatedProperty(CSSPropertyID id)",
            properties.all().filter(|p| p.codegen.related_property.is_some()),
            |p| {
                let related = p
                    .codegen
                    .related_property
                    .as_ref()
                    .and_then(|related| related.target())
                    .map(|target| property_id(properties.property(target)))
                    .unwrap_or_else(|| "CSSPropertyInvalid".to_string());
                format!("return CSSPropertyID::{};", related)
            },
            "return CSSPropertyID::CSSPropertyInvalid;",
            None,
            None,
        )?;

        write_switch(
            out,
            "Vector<String> CSSProperty::aliasesForProperty(CSSPropertyID id)",
            properties.all().filter(|p| !p.aliases().is_empty()),
            |p| format!("return {{ {} }};", quoted(p.aliases(), "_s").join(", ")),
            "return { };",
            None,
            None,
        )?;

        write_bool_switch(
            out,
            "bool CSSProperty::isColorProperty(CSSPropertyID id)",
            properties.all().filter(|p| p.codegen.color_property),
        )?;

        write_switch(
            out,
            "UChar CSSProperty::listValuedPropertySeparator(CSSPropertyID id)",
            properties
                .all()
                .filter(|p| p.codegen.separator.as_deref().is_some_and(|s| !s.is_empty())),
            |p| {
                let separator: String = p.codegen.separator.iter().flat_map(|s| s.chars().take(1)).collect();
                format!("return '{}';", separator)
            },
            "break;",
            None,
            Some("return '\\0';"),
        )?;

        write_bool_switch(
            out,
            "bool CSSProperty::isDirectionAwareProperty(CSSPropertyID id)",
            properties.all_direction_aware_properties(),
        )?;
        write_bool_switch(
            out,
            "bool CSSProperty::isInLogicalPropertyGroup(CSSPropertyID id)",
            properties.all_in_logical_property_group(),
        )?;

        self.write_are_in_same_logical_property_group_with_different_mapping_logic(out)?;

        self.write_direction_conversion(
            out,
            "CSSPropertyID CSSProperty::resolveDirectionAwareProperty(CSSPropertyID id, TextDirection direction, WritingMode writingMode)",
            resolve_table,
            "LogicalBox",
        )?;
        self.write_direction_conversion(
            out,
            "CSSPropertyID CSSProperty::unresolvePhysicalProperty(CSSPropertyID id, TextDirection direction, WritingMode writingMode)",
            unresolve_table,
            "Box",
        )?;

        write_bool_switch(
            out,
            "bool CSSProperty::isDescriptorOnly(CSSPropertyID id)",
            properties.all().filter(|p| p.codegen.descriptor_only),
        )?;

        self.write_settings_constructor(out)?;
        self.write_settings_operator_equal(out)?;
        self.write_settings_hasher(out)?;

        out.write_str("} // namespace WebCore\n\nIGNORE_WARNINGS_END\n")
    }

    fn write_gperf_prefix(&self, out: &mut String) -> fmt::Result {
        out.write_str(GPERF_PREFIX)?;

        let computed_ids: Vec<String> = self
            .properties
            .all_with_prefixed_properties_last()
            .filter(|p| !self.properties.is_skipped_from_computed_style(p))
            .map(|p| format!("{},", property_id(p)))
            .collect();
        write!(out, "const std::array<CSSPropertyID, {}> computedPropertyIDs {{", computed_ids.len())?;
        write!(out, "\n    {}", computed_ids.join("\n    "))?;
        out.write_str("\n};\n\n")?;

        let names: Vec<String> = self.properties.all().map(|p| format!("\"{}\"_s,", p.name)).collect();
        out.write_str("constexpr ASCIILiteral propertyNameStrings[numCSSProperties] = {")?;
        write!(out, "\n    {}", names.join("\n    "))?;
        out.write_str("\n};\n\n")?;

        out.write_str("%}\n")
    }

    fn write_gperf_definition(&self, out: &mut String) -> fmt::Result {
        out.write_str(GPERF_DEFINITION)?;

        let mut entries: Vec<String> = self
            .properties
            .all()
            .map(|p| format!("{}, {}", p.name, property_id(p)))
            .collect();
        for property in self.properties.all() {
            for alias in property.aliases() {
                entries.push(format!("{}, {}", alias, property_id(property)));
            }
        }
        out.write_str(&entries.join("\n"))?;

        out.write_str("\n%%\n")
    }

    fn write_is_inherited_property(&self, out: &mut String) -> fmt::Result {
        writeln!(
            out,
            "constexpr bool isInheritedPropertyTable[numCSSProperties + {}] = {{",
            NUMBER_OF_PREDEFINED_PROPERTIES
        )?;
        out.write_str("    false, // CSSPropertyInvalid\n")?;
        out.write_str("    true , // CSSPropertyCustom\n")?;
        for property in self.properties.all() {
            let inherited = if property.inherited { "true " } else { "false" };
            writeln!(out, "    {}, // {}", inherited, property_id(property))?;
        }
        out.write_str("};\n\n")?;

        out.write_str("bool CSSProperty::isInheritedProperty(CSSPropertyID id)\n{\n")?;
        out.write_str("    ASSERT(id < numCSSProperties);\n")?;
        out.write_str("    ASSERT(id != CSSPropertyInvalid);\n")?;
        out.write_str("    return isInheritedPropertyTable[id];\n}\n\n")
    }

    fn write_are_in_same_logical_property_group_with_different_mapping_logic(&self, out: &mut String) -> fmt::Result {
        out.write_str("bool CSSProperty::areInSameLogicalPropertyGroupWithDifferentMappingLogic(CSSPropertyID id1, CSSPropertyID id2)\n{\n")?;
        out.write_str("    switch (id1) {\n")?;

        for entry in self.properties.logical_property_groups().values() {
            for logic in Logic::ALL {
                let first = self.members_by_name(entry.members(logic).values().copied());
                let second = self.members_by_name(entry.members(logic.opposite()).values().copied());
                if first.is_empty() || second.is_empty() {
                    continue;
                }

                for property in first {
                    writeln!(out, "    case CSSPropertyID::{}:", property_id(property))?;
                }
                out.write_str("        switch (id2) {\n")?;
                for property in second {
                    writeln!(out, "        case CSSPropertyID::{}:", property_id(property))?;
                }
                out.write_str("            return true;\n")?;
                out.write_str("        default:\n")?;
                out.write_str("            return false;\n")?;
                out.write_str("        }\n")?;
            }
        }

        out.write_str("    default:\n        return false;\n    }\n}\n\n")
    }

    fn members_by_name(&self, members: impl Iterator<Item = crate::model::PropertyIndex>) -> Vec<&'a Property> {
        let mut properties: Vec<&Property> = members.map(|index| self.properties.property(index)).collect();
        properties.sort_by(|a, b| a.name.cmp(&b.name));
        properties
    }

    fn write_direction_conversion(
        &self,
        out: &mut String,
        signature: &str,
        table: &DirectionMappingTable,
        resolver_enum_prefix: &str,
    ) -> fmt::Result {
        let source_as_id = convert_name_to_id(table.source().as_str());
        let destination_as_id = convert_name_to_id(table.destination().as_str());

        writeln!(out, "{}\n{{", signature)?;
        out.write_str("    auto textflow = makeTextFlow(writingMode, direction);\n")?;
        out.write_str("    switch (id) {\n")?;

        for mapping in table.mappings() {
            let kind_as_id = convert_name_to_id(mapping.kind.as_str());
            let resolver_as_id = convert_name_to_id(&mapping.resolver);
            let candidates: Vec<String> = mapping
                .candidates
                .iter()
                .map(|index| property_id(self.properties.property(*index)))
                .collect();

            writeln!(
                out,
                "    case CSSPropertyID::{}: {{",
                property_id(self.properties.property(mapping.property))
            )?;
            writeln!(
                out,
                "        static constexpr CSSPropertyID properties[{}] = {{ {} }};",
                candidates.len(),
                candidates.join(", ")
            )?;
            writeln!(
                out,
                "        return properties[static_cast<size_t>(map{src}{kind}To{dst}{kind}(textflow, {prefix}{kind}::{resolver}))];",
                src = source_as_id,
                dst = destination_as_id,
                kind = kind_as_id,
                prefix = resolver_enum_prefix,
                resolver = resolver_as_id,
            )?;
            out.write_str("    }\n")?;
        }

        out.write_str("    default:\n        return CSSPropertyInvalid;\n    }\n}\n\n")
    }

    fn write_settings_constructor(&self, out: &mut String) -> fmt::Result {
        out.write_str("CSSPropertySettings::CSSPropertySettings(const Settings& settings)\n")?;
        let initializers: Vec<String> = self
            .properties
            .settings_flags()
            .iter()
            .map(|flag| format!("{} {{ settings.{}() }}", flag, flag))
            .collect();
        if !initializers.is_empty() {
            writeln!(out, "    : {}", initializers.join("\n    , "))?;
        }
        out.write_str("{\n}\n\n")
    }

    fn write_settings_operator_equal(&self, out: &mut String) -> fmt::Result {
        out.write_str("bool operator==(const CSSPropertySettings& a, const CSSPropertySettings& b)\n{\n")?;
        let comparisons: Vec<String> = self
            .properties
            .settings_flags()
            .iter()
            .map(|flag| format!("a.{} == b.{}", flag, flag))
            .collect();
        if comparisons.is_empty() {
            out.write_str("    return true;\n")?;
        } else {
            writeln!(out, "    return {};", comparisons.join("\n        && "))?;
        }
        out.write_str("}\n\n")
    }

    fn write_settings_hasher(&self, out: &mut String) -> fmt::Result {
        out.write_str("void add(Hasher& hasher, const CSSPropertySettings& settings)\n{\n")?;
        let bits: Vec<String> = self
            .properties
            .settings_flags()
            .iter()
            .enumerate()
            .map(|(i, flag)| format!("settings.{} << {}", flag, i))
            .collect();
        if bits.is_empty() {
            out.write_str("    unsigned bits = 0;\n")?;
        } else {
            writeln!(out, "    unsigned bits = {};", bits.join("\n        | "))?;
        }
        out.write_str("    add(hasher, bits);\n}\n\n")
    }
}

fn write_switch<'p, F>(
    out: &mut String,
    signature: &str,
    properties: impl Iterator<Item = &'p Property>,
    mapping: F,
    default: &str,
    prologue: Option<&str>,
    epilogue: Option<&str>,
) -> fmt::Result
where
    F: Fn(&Property) -> String,
{
    writeln!(out, "{}\n{{", signature)?;

    if let Some(prologue) = prologue {
        for line in prologue.lines() {
            if line.is_empty() {
                out.push('\n');
            } else {
                writeln!(out, "    {}", line)?;
            }
        }
        out.push('\n');
    }

    out.write_str("    switch (id) {\n")?;
    for property in properties {
        writeln!(out, "    case CSSPropertyID::{}:", property_id(property))?;
        writeln!(out, "        {}", mapping(property))?;
    }
    writeln!(out, "    default:\n        {}", default)?;
    out.write_str("    }\n")?;

    if let Some(epilogue) = epilogue {
        writeln!(out, "    {}", epilogue)?;
    }

    out.write_str("}\n\n")
}

fn write_bool_switch<'p>(
    out: &mut String,
    signature: &str,
    properties: impl Iterator<Item = &'p Property>,
) -> fmt::Result {
    writeln!(out, "{}\n{{", signature)?;
    out.write_str("    switch (id) {\n")?;

    let mut any = false;
    for property in properties {
        writeln!(out, "    case CSSPropertyID::{}:", property_id(property))?;
        any = true;
    }
    if any {
        out.write_str("        return true;\n")?;
    }

    out.write_str("    default:\n        return false;\n    }\n}\n\n")
}

fn write_lookup_functions(out: &mut String) -> fmt::Result {
    out.write_str(LOOKUP_FUNCTIONS)
}

const GPERF_PREFIX: &str = r#"%{
// This file is automatically generated from CSSProperties.json by csspropgen. Do not edit it.

#include "config.h"
#include "CSSPropertyNames.h"

#include "CSSProperty.h"
#include "Settings.h"
#include <wtf/ASCIICType.h>
#include <wtf/Hasher.h>
#include <wtf/text/AtomString.h>
#include <string.h>

IGNORE_WARNINGS_BEGIN("implicit-fallthrough")

// Older versions of gperf like to use the `register` keyword.
#define register

namespace WebCore {

static_assert(numCSSProperties + 1 <= 65535, "CSSPropertyID should fit into uint16_t.");

"#;

const GPERF_DEFINITION: &str = r#"%struct-type
struct CSSPropertyHashTableEntry {
    const char* name;
    uint16_t id;
};
%language=C++
%readonly-tables
%global-table
%7bit
%compare-strncmp
%define class-name CSSPropertyNamesHash
%enum
%%
"#;

const LOOKUP_FUNCTIONS: &str = r#"
CSSPropertyID findCSSProperty(const char* characters, unsigned length)
{
    auto* value = CSSPropertyNamesHash::in_word_set(characters, length);
    return value ? static_cast<CSSPropertyID>(value->id) : CSSPropertyInvalid;
}

ASCIILiteral nameLiteral(CSSPropertyID id)
{
    if (id < firstCSSProperty)
        return { };
    unsigned index = id - firstCSSProperty;
    if (index >= numCSSProperties)
        return { };
    return propertyNameStrings[index];
}

const AtomString& nameString(CSSPropertyID id)
{
    if (id < firstCSSProperty)
        return nullAtom();
    unsigned index = id - firstCSSProperty;
    if (index >= numCSSProperties)
        return nullAtom();

    static NeverDestroyed<std::array<AtomString, numCSSProperties>> atomStrings;
    auto& string = atomStrings.get()[index];
    if (string.isNull())
        string = propertyNameStrings[index];
    return string;
}

String nameForIDL(CSSPropertyID id)
{
    LChar characters[maxCSSPropertyNameLength];
    const char* nameForCSS = nameLiteral(id);
    if (!nameForCSS)
        return emptyString();

    auto* propertyNamePointer = nameForCSS;
    auto* nextCharacter = characters;
    while (char character = *propertyNamePointer++) {
        if (character == '-') {
            char nextCharacter = *propertyNamePointer++;
            if (!nextCharacter)
                break;
            character = (propertyNamePointer - 2 != nameForCSS) ? toASCIIUpper(nextCharacter) : nextCharacter;
        }
        *nextCharacter++ = character;
    }
    unsigned length = nextCharacter - characters;
    return { characters, length };
}

"#;
