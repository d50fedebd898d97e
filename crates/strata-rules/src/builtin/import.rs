//! The `import` plugin: module import hygiene

use serde_json::json;
use strata_core::{
    OptionSlot, OptionsSchema, Plugin, PresetDef, RuleDescriptor, RuleEntry, Severity,
};

pub fn plugin() -> Plugin {
    Plugin::new("import")
        .with_rule(
            RuleDescriptor::new("order", "Enforce a convention in module import order")
                .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])),
        )
        .with_rule(RuleDescriptor::new(
            "first",
            "Require imports before any other statement",
        ))
        .with_rule(RuleDescriptor::new(
            "no-duplicates",
            "Forbid repeated imports of the same module",
        ))
        .with_rule(RuleDescriptor::new(
            "no-mutable-exports",
            "Forbid exporting mutable bindings",
        ))
        .with_rule(
            RuleDescriptor::new("no-unresolved", "Ensure imports resolve to a module")
                .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])),
        )
        .with_rule(RuleDescriptor::new(
            "prefer-default-export",
            "Prefer a default export for single-export modules",
        ))
        .with_rule(
            RuleDescriptor::new(
                "no-extraneous-dependencies",
                "Forbid imports not declared in the package manifest",
            )
            .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])),
        )
        .with_rule(
            RuleDescriptor::new("extensions", "Control file-extension use in import paths")
                .with_schema(OptionsSchema::optional(vec![
                    OptionSlot::String,
                    OptionSlot::Object,
                ])),
        )
        .with_rule(
            RuleDescriptor::new("newline-after-import", "Require a newline after imports")
                .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])),
        )
        .with_preset(
            PresetDef::new("errors")
                .with_rule("import/no-unresolved", RuleEntry::severity(Severity::Error))
                .with_rule("import/no-duplicates", RuleEntry::severity(Severity::Error)),
        )
        .with_preset(
            PresetDef::new("warnings")
                .with_rule("import/no-duplicates", RuleEntry::severity(Severity::Warn))
                .with_rule(
                    "import/no-mutable-exports",
                    RuleEntry::severity(Severity::Warn),
                ),
        )
        .with_preset(
            PresetDef::new("recommended")
                .extending(["plugin:import/errors", "plugin:import/warnings"])
                .with_rule("import/first", RuleEntry::severity(Severity::Warn))
                .with_rule(
                    "import/order",
                    RuleEntry::with_options(
                        Severity::Warn,
                        vec![json!({
                            "alphabetize": {"order": "asc", "caseInsensitive": true},
                            "newlinesBetween": "always"
                        })],
                    ),
                ),
        )
        .with_preset(
            // module resolution is delegated to the typed-dialect resolver,
            // which reports its own failures
            PresetDef::new("typescript")
                .with_rule("import/no-unresolved", RuleEntry::severity(Severity::Off)),
        )
}
