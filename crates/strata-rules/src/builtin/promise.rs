//! The `promise` plugin: async flow hygiene

use strata_core::{
    OptionSlot, OptionsSchema, Plugin, PresetDef, RuleDescriptor, RuleEntry, Severity,
};

pub fn plugin() -> Plugin {
    Plugin::new("promise")
        .with_rule(RuleDescriptor::new(
            "always-return",
            "Require promise chains to return or throw",
        ))
        .with_rule(
            RuleDescriptor::new("catch-or-return", "Require promises to be handled")
                .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])),
        )
        .with_rule(RuleDescriptor::new(
            "param-names",
            "Enforce standard executor parameter names",
        ))
        .with_rule(RuleDescriptor::new(
            "no-nesting",
            "Disallow nested then/catch chains",
        ))
        .with_preset(
            PresetDef::new("recommended")
                .with_rule("promise/always-return", RuleEntry::severity(Severity::Error))
                .with_rule("promise/catch-or-return", RuleEntry::severity(Severity::Error))
                .with_rule("promise/param-names", RuleEntry::severity(Severity::Error))
                .with_rule("promise/no-nesting", RuleEntry::severity(Severity::Warn)),
        )
}
