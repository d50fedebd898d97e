//! Path-scoped override blocks, compiled once at load
//!
//! Every override block's glob patterns, nested preset expansion, and rule
//! settings are resolved while the engine is constructed, so per-file
//! resolution only runs compiled matchers and folds prevalidated settings.

use std::path::Path;

use crate::config::validate::{RuleValidator, Strictness, ValidationWarning};
use crate::config::{OverrideBlock, RuleEntry};
use crate::error::StrataError;
use crate::patterns::PatternSet;
use crate::presets::PresetRegistry;
use crate::result::Result;
use crate::table::LayerTag;

/// An override block with compiled matchers and prevalidated settings
#[derive(Debug)]
pub struct CompiledOverride {
    /// Declaration index in the document
    pub index: usize,
    includes: PatternSet,
    excludes: PatternSet,
    /// Parser the block selects for matched files
    pub parser: Option<String>,
    /// Flattened settings: nested presets first, then the block's own rules
    pub settings: Vec<(String, RuleEntry, LayerTag)>,
}

impl CompiledOverride {
    fn compile(
        index: usize,
        block: &OverrideBlock,
        presets: &PresetRegistry,
        unknown_presets: Strictness,
        validator: &mut RuleValidator<'_>,
    ) -> Result<Self> {
        if block.files.is_empty() {
            return Err(StrataError::config_error(format!(
                "overrides[{index}] must declare at least one file pattern"
            )));
        }

        let includes = PatternSet::compile(&block.files)?;
        let excludes = PatternSet::compile(&block.excluded_files)?;
        let layer = LayerTag::Override(index);

        let mut settings = Vec::new();
        for preset_name in &block.extends {
            let referenced_from = layer.to_string();
            match presets.expand(preset_name, &referenced_from) {
                Ok(flattened) => {
                    for setting in flattened {
                        let tag = LayerTag::Preset(setting.preset);
                        if validator.check(&setting.rule_id, &setting.entry, &tag)? {
                            settings.push((setting.rule_id, setting.entry, tag));
                        }
                    }
                }
                Err(StrataError::UnknownPreset { name, .. })
                    if unknown_presets == Strictness::Lenient =>
                {
                    tracing::warn!("unknown preset '{name}' in {layer}, skipping");
                    validator.push_warning(ValidationWarning::new(
                        None,
                        &layer,
                        format!("unknown preset '{name}', skipped"),
                    ));
                }
                Err(other) => return Err(other),
            }
        }
        for (rule_id, entry) in &block.rules {
            if validator.check(rule_id, entry, &layer)? {
                settings.push((rule_id.clone(), entry.clone(), layer.clone()));
            }
        }

        Ok(Self {
            index,
            includes,
            excludes,
            parser: block.parser.clone(),
            settings,
        })
    }

    /// Whether the block applies to the path: at least one include pattern
    /// matches and no exclude pattern does
    pub fn is_match(&self, path: &Path) -> bool {
        self.includes.is_match(path) && !self.excludes.is_match(path)
    }
}

/// All compiled override blocks, in declaration order
#[derive(Debug, Default)]
pub struct OverrideResolver {
    overrides: Vec<CompiledOverride>,
}

impl OverrideResolver {
    pub(crate) fn compile(
        blocks: &[OverrideBlock],
        presets: &PresetRegistry,
        unknown_presets: Strictness,
        validator: &mut RuleValidator<'_>,
    ) -> Result<Self> {
        let overrides = blocks
            .iter()
            .enumerate()
            .map(|(index, block)| {
                CompiledOverride::compile(index, block, presets, unknown_presets, validator)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { overrides })
    }

    /// Blocks matching the path, preserving declaration order
    pub fn matching<'a>(&'a self, path: &'a Path) -> impl Iterator<Item = &'a CompiledOverride> {
        self.overrides.iter().filter(move |block| block.is_match(path))
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{CORE_PLUGIN, OptionsSchema, OptionSlot, Plugin, PluginRegistry, RuleDescriptor};
    use crate::presets::PresetDef;
    use crate::severity::Severity;

    fn registry() -> PluginRegistry {
        let mut registry = PluginRegistry::new();
        registry.register(
            Plugin::new(CORE_PLUGIN)
                .with_rule(RuleDescriptor::new("no-console", "Disallow console usage")
                    .with_schema(OptionsSchema::optional(vec![OptionSlot::Object])))
                .with_rule(RuleDescriptor::new("no-void", "Disallow void operator"))
                .with_rule(RuleDescriptor::new("max-len", "Enforce maximum line length")
                    .with_schema(OptionsSchema::optional(vec![OptionSlot::Integer]))),
        );
        registry
    }

    fn block(files: &[&str], excluded: &[&str], rules: &[(&str, Severity)]) -> OverrideBlock {
        OverrideBlock {
            files: files.iter().map(|s| s.to_string()).collect(),
            excluded_files: excluded.iter().map(|s| s.to_string()).collect(),
            extends: Vec::new(),
            parser: None,
            rules: rules
                .iter()
                .map(|(id, sev)| (id.to_string(), RuleEntry::severity(*sev)))
                .collect(),
        }
    }

    fn compile(blocks: &[OverrideBlock]) -> OverrideResolver {
        let registry = registry();
        let presets = PresetRegistry::new();
        let mut validator = RuleValidator::new(&registry, Strictness::Lenient);
        OverrideResolver::compile(blocks, &presets, Strictness::Strict, &mut validator).unwrap()
    }

    #[test]
    fn exclusions_dominate_inclusions() {
        let resolver = compile(&[block(
            &["*.sfc"],
            &["src/component-library/**/*.sfc"],
            &[("no-void", Severity::Off)],
        )]);

        assert_eq!(resolver.matching(Path::new("src/pages/Home.sfc")).count(), 1);
        assert_eq!(
            resolver
                .matching(Path::new("src/component-library/Button.sfc"))
                .count(),
            0
        );
    }

    #[test]
    fn matching_preserves_declaration_order() {
        let resolver = compile(&[
            block(&["*.ts"], &[], &[("no-console", Severity::Off)]),
            block(&["src/**/*.ts"], &[], &[("no-console", Severity::Error)]),
        ]);

        let indices: Vec<usize> = resolver
            .matching(Path::new("src/main.ts"))
            .map(|o| o.index)
            .collect();
        assert_eq!(indices, [0, 1]);
    }

    #[test]
    fn empty_files_list_is_rejected() {
        let registry = registry();
        let presets = PresetRegistry::new();
        let mut validator = RuleValidator::new(&registry, Strictness::Lenient);
        let blocks = [block(&[], &[], &[])];
        let err =
            OverrideResolver::compile(&blocks, &presets, Strictness::Strict, &mut validator)
                .unwrap_err();
        assert!(matches!(err, StrataError::ConfigError { .. }));
    }

    #[test]
    fn nested_presets_flatten_before_own_rules() {
        let registry = registry();
        let mut presets = PresetRegistry::new();
        presets.register(
            PresetDef::new("console-off").with_rule("no-console", RuleEntry::severity(Severity::Off)),
        );

        let mut b = block(&["*.config.js"], &[], &[("no-void", Severity::Off)]);
        b.extends = vec!["console-off".to_string()];

        let mut validator = RuleValidator::new(&registry, Strictness::Lenient);
        let resolver =
            OverrideResolver::compile(&[b], &presets, Strictness::Strict, &mut validator).unwrap();

        let compiled = resolver.matching(Path::new("build.config.js")).next().unwrap();
        let ids: Vec<&str> = compiled.settings.iter().map(|(id, _, _)| id.as_str()).collect();
        assert_eq!(ids, ["no-console", "no-void"]);
        assert_eq!(
            compiled.settings[0].2,
            LayerTag::Preset("console-off".into())
        );
        assert_eq!(compiled.settings[1].2, LayerTag::Override(0));
    }

    #[test]
    fn unknown_nested_preset_skipped_when_lenient() {
        let registry = registry();
        let presets = PresetRegistry::new();
        let mut b = block(&["*.ts"], &[], &[("max-len", Severity::Off)]);
        b.extends = vec!["ghost".to_string()];

        let mut validator = RuleValidator::new(&registry, Strictness::Lenient);
        let resolver =
            OverrideResolver::compile(&[b], &presets, Strictness::Lenient, &mut validator).unwrap();
        let compiled = resolver.matching(Path::new("a.ts")).next().unwrap();
        assert_eq!(compiled.settings.len(), 1);

        let warnings = validator.into_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("ghost"));
    }

    #[test]
    fn malformed_pattern_fails_compilation() {
        let registry = registry();
        let presets = PresetRegistry::new();
        let mut validator = RuleValidator::new(&registry, Strictness::Lenient);
        let blocks = [block(&["src/["], &[], &[])];
        let err =
            OverrideResolver::compile(&blocks, &presets, Strictness::Strict, &mut validator)
                .unwrap_err();
        assert!(matches!(err, StrataError::MalformedGlobPattern { .. }));
    }
}
