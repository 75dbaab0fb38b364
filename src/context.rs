//! Parsing context shared by every `from_json` call

use crate::error::{GeneratorError, Result};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeSet;

/// Active build configuration for one parse run
#[derive(Debug, Clone, Default)]
pub struct ParsingContext {
    conditionals: BTreeSet<String>,
    parsing_for_codegen: bool,
    verbose: bool,
}

impl ParsingContext {
    /// `defines` is a space separated list of active conditional flags
    pub fn new(defines: Option<&str>, parsing_for_codegen: bool, verbose: bool) -> Self {
        let conditionals = defines
            .map(|defines| {
                defines
                    .split(' ')
                    .filter(|flag| !flag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            conditionals,
            parsing_for_codegen,
            verbose,
        }
    }

    pub fn conditionals(&self) -> &BTreeSet<String> {
        &self.conditionals
    }

    pub fn parsing_for_codegen(&self) -> bool {
        self.parsing_for_codegen
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// `FLAG` is enabled when active, `!FLAG` when not
    pub fn is_enabled(&self, conditional: &str) -> bool {
        match conditional.strip_prefix('!') {
            Some(flag) => !self.conditionals.contains(flag),
            None => self.conditionals.contains(conditional),
        }
    }

    /// Pick the first variant whose `enable-if` holds under the active flags
    pub fn select_enabled_variant<'a>(
        &self,
        variants: &'a [JsonValue],
        label: &str,
    ) -> Result<&'a Map<String, JsonValue>> {
        for variant in variants {
            let object = variant.as_object();
            let conditional = object
                .and_then(|object| object.get("enable-if"))
                .and_then(JsonValue::as_str);

            match (object, conditional) {
                (Some(object), Some(conditional)) => {
                    if self.is_enabled(conditional) {
                        return Ok(object);
                    }
                }
                _ => {
                    return Err(GeneratorError::conditional(
                        label,
                        "No 'enable-if' property found.",
                    ))
                }
            }
        }

        Err(GeneratorError::conditional(
            label,
            "No 'enable-if' property matched the active set.",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defines_parsing() {
        let context = ParsingContext::new(Some("ENABLE_A ENABLE_B"), true, false);
        assert_eq!(context.conditionals().len(), 2);
        assert!(context.is_enabled("ENABLE_A"));
        assert!(!context.is_enabled("ENABLE_C"));

        let empty = ParsingContext::new(None, true, false);
        assert!(empty.conditionals().is_empty());

        let blank = ParsingContext::new(Some(""), true, false);
        assert!(blank.conditionals().is_empty());
    }

    #[test]
    fn test_negated_conditional() {
        let context = ParsingContext::new(Some("ENABLE_A"), true, false);
        assert!(!context.is_enabled("!ENABLE_A"));
        assert!(context.is_enabled("!ENABLE_B"));
    }

    #[test]
    fn test_select_first_enabled_variant() {
        let context = ParsingContext::new(Some("ENABLE_B"), true, false);
        let variants = json!([
            {"enable-if": "ENABLE_A", "comment": "a"},
            {"enable-if": "ENABLE_B", "comment": "b"},
            {"enable-if": "!ENABLE_A", "comment": "not a"},
        ]);

        let selected = context
            .select_enabled_variant(variants.as_array().unwrap(), "width.codegen-properties")
            .unwrap();
        assert_eq!(selected["comment"], "b");
    }

    #[test]
    fn test_variant_without_enable_if() {
        let context = ParsingContext::new(None, true, false);
        let variants = json!([{"comment": "a"}]);

        let err = context
            .select_enabled_variant(variants.as_array().unwrap(), "label")
            .unwrap_err();
        assert!(err.to_string().contains("No 'enable-if' property found"));
    }

    #[test]
    fn test_no_variant_matches() {
        let context = ParsingContext::new(None, true, false);
        let variants = json!([{"enable-if": "ENABLE_A"}]);

        let err = context
            .select_enabled_variant(variants.as_array().unwrap(), "label")
            .unwrap_err();
        assert!(err.to_string().contains("matched the active set"));
    }
}
