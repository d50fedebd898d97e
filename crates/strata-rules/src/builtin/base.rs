//! The core (unnamespaced) rule set

use strata_core::{
    CORE_PLUGIN, OptionSlot, OptionsSchema, Plugin, PresetDef, RuleDescriptor, RuleEntry, Severity,
};

/// Build the core plugin manifest
///
/// Most rules default to `off`; the engine's base layer carries only the
/// handful of correctness defaults below. Everything else is opted into via
/// presets or document rules.
pub fn plugin() -> Plugin {
    let mut plugin = Plugin::new(CORE_PLUGIN);
    for rule in correctness_rules() {
        plugin = plugin.with_rule(rule);
    }
    for rule in style_rules() {
        plugin = plugin.with_rule(rule);
    }
    plugin.with_preset(
        PresetDef::new("formatting-off")
            .with_rule("max-len", RuleEntry::severity(Severity::Off))
            .with_rule("object-curly-newline", RuleEntry::severity(Severity::Off))
            .with_rule("operator-linebreak", RuleEntry::severity(Severity::Off))
            .with_rule("function-paren-newline", RuleEntry::severity(Severity::Off))
            .with_rule("implicit-arrow-linebreak", RuleEntry::severity(Severity::Off))
            .with_rule("space-in-parens", RuleEntry::severity(Severity::Off))
            .with_rule("array-bracket-spacing", RuleEntry::severity(Severity::Off)),
    )
}

fn correctness_rules() -> Vec<RuleDescriptor> {
    vec![
        RuleDescriptor::new("no-constant-condition", "Disallow constant conditions")
            .with_default(Severity::Error),
        RuleDescriptor::new("no-useless-escape", "Disallow unnecessary escape characters")
            .with_default(Severity::Warn),
        RuleDescriptor::new("no-console", "Disallow console usage")
            .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])),
        RuleDescriptor::new("no-continue", "Disallow continue statements"),
        RuleDescriptor::new("no-void", "Disallow the void operator")
            .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])),
        RuleDescriptor::new("no-undef-init", "Disallow initializing variables to undefined"),
        RuleDescriptor::new("no-sequences", "Disallow comma operators"),
        RuleDescriptor::new("no-bitwise", "Disallow bitwise operators")
            .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])),
        RuleDescriptor::new("no-underscore-dangle", "Disallow dangling underscores")
            .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])),
        RuleDescriptor::new(
            "no-restricted-syntax",
            "Disallow configured syntax constructs",
        )
        .with_schema(OptionsSchema::optional(vec![
            OptionSlot::Any,
            OptionSlot::Any,
            OptionSlot::Any,
            OptionSlot::Any,
        ])),
        RuleDescriptor::new(
            "class-methods-use-this",
            "Enforce that class methods use this",
        )
        .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])),
    ]
}

fn style_rules() -> Vec<RuleDescriptor> {
    vec![
        RuleDescriptor::new("max-len", "Enforce a maximum line length")
            .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])),
        RuleDescriptor::new("no-multi-spaces", "Disallow multiple consecutive spaces"),
        RuleDescriptor::new(
            "no-multiple-empty-lines",
            "Disallow multiple consecutive empty lines",
        )
        .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])),
        RuleDescriptor::new("sort-imports", "Enforce sorted import declarations")
            .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])),
        RuleDescriptor::new("sort-keys", "Require object keys to be sorted")
            .with_schema(OptionsSchema::optional(vec![OptionSlot::String, OptionSlot::Object])),
        RuleDescriptor::new("quote-props", "Require quotes around object keys")
            .with_schema(OptionsSchema::optional(vec![OptionSlot::String])),
        RuleDescriptor::new("object-curly-newline", "Enforce line breaks inside braces")
            .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])),
        RuleDescriptor::new("operator-linebreak", "Enforce operator placement at breaks")
            .with_schema(OptionsSchema::optional(vec![OptionSlot::String, OptionSlot::Object])),
        RuleDescriptor::new(
            "function-paren-newline",
            "Enforce line breaks inside function parentheses",
        )
        .with_schema(OptionsSchema::optional(vec![OptionSlot::Any])),
        RuleDescriptor::new(
            "implicit-arrow-linebreak",
            "Enforce arrow body placement at breaks",
        )
        .with_schema(OptionsSchema::optional(vec![OptionSlot::String])),
        RuleDescriptor::new("space-in-parens", "Enforce spacing inside parentheses")
            .with_schema(OptionsSchema::optional(vec![OptionSlot::String])),
        RuleDescriptor::new("array-bracket-spacing", "Enforce spacing inside brackets")
            .with_schema(OptionsSchema::optional(vec![OptionSlot::String])),
        RuleDescriptor::new("no-confusing-arrow", "Disallow ambiguous arrow bodies")
            .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn core_plugin_uses_bare_identifiers() {
        let plugin = plugin();
        assert_eq!(plugin.qualified_id("no-console"), "no-console");
    }

    #[test]
    fn base_defaults_are_correctness_only() {
        let plugin = plugin();
        let defaults: Vec<String> = plugin.contributed_defaults().map(|(id, _)| id).collect();
        assert_eq!(defaults, ["no-constant-condition", "no-useless-escape"]);
    }

    #[test]
    fn sort_keys_accepts_order_then_options() {
        let plugin = plugin();
        let rule = plugin.rules.get("sort-keys").unwrap();
        assert!(rule.schema.validate(&[json!("asc")]).is_ok());
        assert!(
            rule.schema
                .validate(&[json!("asc"), json!({"caseSensitive": false})])
                .is_ok()
        );
        assert!(rule.schema.validate(&[json!(1)]).is_err());
    }
}
