//! The `intl` plugin: internationalization coverage

use strata_core::{
    OptionSlot, OptionsSchema, Plugin, PresetDef, RuleDescriptor, RuleEntry, Severity,
};

pub fn plugin() -> Plugin {
    Plugin::new("intl")
        .with_rule(
            RuleDescriptor::new(
                "no-raw-text",
                "Disallow untranslated text in templates and attributes",
            )
            .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])),
        )
        .with_rule(RuleDescriptor::new(
            "no-duplicate-keys",
            "Disallow duplicate message keys across locale catalogs",
        ))
        .with_preset(
            PresetDef::new("recommended")
                .with_rule("intl/no-raw-text", RuleEntry::severity(Severity::Error))
                .with_rule("intl/no-duplicate-keys", RuleEntry::severity(Severity::Error)),
        )
}
