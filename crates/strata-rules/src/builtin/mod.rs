//! Built-in plugin manifests
//!
//! One module per plugin. The `base` module is the unnamespaced core rule
//! set; the others register under their namespace (`import/order`,
//! `intl/no-raw-text`, ...).

use strata_core::{PluginRegistry, PresetDef, PresetRegistry, RuleEntry, Severity};

pub mod base;
pub mod import;
pub mod intl;
pub mod promise;
pub mod sfc;

/// Assemble the registry of every built-in plugin
pub fn builtin_registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry.register(base::plugin());
    registry.register(import::plugin());
    registry.register(promise::plugin());
    registry.register(sfc::plugin());
    registry.register(intl::plugin());
    tracing::debug!("registered built-in plugins");
    registry
}

/// Shared presets addressable by bare name in `extends`
pub fn shared_presets() -> PresetRegistry {
    let mut presets = PresetRegistry::new();

    presets.register(
        PresetDef::new("recommended")
            .with_rule("no-console", RuleEntry::severity(Severity::Warn))
            .with_rule("no-multiple-empty-lines", RuleEntry::severity(Severity::Warn))
            .with_rule(
                "sort-imports",
                RuleEntry::with_options(
                    Severity::Warn,
                    vec![serde_json::json!({"ignoreDeclarationSort": true})],
                ),
            )
            .with_rule(
                "max-len",
                RuleEntry::with_options(Severity::Warn, vec![serde_json::json!({"code": 100})]),
            )
            .with_rule("no-undef-init", RuleEntry::severity(Severity::Warn)),
    );

    presets.register(
        PresetDef::new("strict")
            .extending(["recommended"])
            .with_rule("no-console", RuleEntry::severity(Severity::Error))
            .with_rule("no-bitwise", RuleEntry::severity(Severity::Error))
            .with_rule("no-sequences", RuleEntry::severity(Severity::Error)),
    );

    presets
}
