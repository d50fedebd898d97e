//! The `sfc` plugin: single-file component dialect
//!
//! Component files mix template markup and script in one file and are parsed
//! by the dedicated `sfc` parser, selected via a document override. The
//! rules here cover component-specific pitfalls.

use serde_json::json;
use strata_core::{
    OptionSlot, OptionsSchema, Plugin, PresetDef, RuleDescriptor, RuleEntry, Severity,
};

pub fn plugin() -> Plugin {
    Plugin::new("sfc")
        .with_rule(RuleDescriptor::new(
            "valid-template-root",
            "Require a well-formed template root element",
        ))
        .with_rule(RuleDescriptor::new(
            "no-reactive-cycles",
            "Disallow reactive statements that feed their own inputs",
        ))
        .with_rule(
            RuleDescriptor::new("no-unused-style", "Disallow style selectors matching nothing")
                .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])),
        )
        .with_rule(
            RuleDescriptor::new(
                "no-unused-vars",
                "Disallow unused component-scope bindings",
            )
            .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])),
        )
        .with_preset(
            PresetDef::new("recommended")
                .with_rule("sfc/valid-template-root", RuleEntry::severity(Severity::Error))
                .with_rule("sfc/no-reactive-cycles", RuleEntry::severity(Severity::Error))
                .with_rule(
                    "sfc/no-unused-vars",
                    RuleEntry::with_options(
                        Severity::Warn,
                        vec![json!({"varsIgnorePattern": "^\\$\\$(Props|Events|Slots)$"})],
                    ),
                ),
        )
        .with_preset(
            // component templates are whitespace-significant; hand the
            // layout rules back to the formatter
            PresetDef::new("formatting-off").extending(["plugin:core/formatting-off"]),
        )
}
