//! The cascade engine: per-file configuration resolution
//!
//! Resolution for one file walks a fixed sequence of states:
//! `Init -> PresetsExpanded -> BaseMerged -> OverridesApplied -> Finalized`.
//! The first three are path-independent and run once, while the engine is
//! constructed; the last two run per file. Any failure aborts the whole
//! resolution - there is no partial result.
//!
//! Resolution is a pure function of (document, path): the engine holds no
//! mutable state after construction, so concurrent `resolve` calls need no
//! locking and [`CascadeEngine::resolve_many`] fans out over rayon.

use dashmap::DashMap;
use indexmap::IndexMap;
use rayon::prelude::*;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::validate::{RuleValidator, Strictness, ValidationWarning};
use crate::config::{ConfigDocument, GlobalValue, ResolverSettings};
use crate::error::StrataError;
use crate::overrides::OverrideResolver;
use crate::patterns::{PatternSet, normalize_path};
use crate::plugins::PluginRegistry;
use crate::presets::{FlattenedSetting, PresetRegistry};
use crate::result::Result;
use crate::table::{LayerTag, RuleTable};

/// Strictness knobs for conditions the engine can either tolerate or reject
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Unknown rule identifiers: ignored-with-warning or load failure.
    /// Lenient by default, to tolerate plugin rules resolved lazily.
    pub unknown_rules: Strictness,
    /// Unresolvable preset names: skipped-with-warning or load failure
    pub unknown_presets: Strictness,
    /// Two matching overrides selecting different parsers: later-wins or
    /// per-file failure
    pub parser_conflicts: Strictness,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            unknown_rules: Strictness::Lenient,
            unknown_presets: Strictness::Strict,
            parser_conflicts: Strictness::Lenient,
        }
    }
}

/// States of one resolution request, in transition order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResolutionStage {
    Init,
    PresetsExpanded,
    BaseMerged,
    OverridesApplied,
    Finalized,
}

impl fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolutionStage::Init => "init",
            ResolutionStage::PresetsExpanded => "presets-expanded",
            ResolutionStage::BaseMerged => "base-merged",
            ResolutionStage::OverridesApplied => "overrides-applied",
            ResolutionStage::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

/// The finalized configuration for one file
///
/// Consumed by the external parser-selection and rule-execution
/// collaborators. Created fresh per resolution request against one immutable
/// document; resolving the same path twice yields identical values.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFileConfig {
    pub path: PathBuf,
    /// Final rule table after all merges
    pub rules: RuleTable,
    /// Parser the parsing collaborator must use
    pub parser: Option<String>,
    /// Active environment flags
    pub env: IndexMap<String, bool>,
    /// Global identifier allow-list
    pub globals: IndexMap<String, GlobalValue>,
    /// Module/extension resolution settings
    pub resolver: ResolverSettings,
}

/// Orchestrates per-file resolution over one immutable document
pub struct CascadeEngine {
    document: ConfigDocument,
    options: EngineOptions,
    base_table: RuleTable,
    overrides: OverrideResolver,
    ignore: PatternSet,
    warnings: Vec<ValidationWarning>,
    cache: DashMap<String, Arc<ResolvedFileConfig>>,
}

impl CascadeEngine {
    /// Build an engine from a document and the plugin registry
    ///
    /// Runs the path-independent states eagerly: the document is validated
    /// (`Init`), every `extends` chain is flattened (`PresetsExpanded`), and
    /// the base table is folded (`BaseMerged`). Load-time failures abort
    /// here; no partially-initialized engine is ever returned.
    pub fn new(
        document: ConfigDocument,
        registry: &PluginRegistry,
        options: EngineOptions,
    ) -> Result<Self> {
        Self::with_shared_presets(document, registry, PresetRegistry::new(), options)
    }

    /// Like [`CascadeEngine::new`], with additional shared presets
    /// addressable by bare name next to the plugin-contributed ones
    pub fn with_shared_presets(
        document: ConfigDocument,
        registry: &PluginRegistry,
        shared_presets: PresetRegistry,
        options: EngineOptions,
    ) -> Result<Self> {
        // Init: compile ignore globs, set up validation
        tracing::debug!(stage = %ResolutionStage::Init, "loading configuration document");
        let ignore = PatternSet::compile(&document.ignore_patterns)?;

        let mut presets = PresetRegistry::from_plugins(registry);
        for preset in shared_presets.iter() {
            presets.register(preset.clone());
        }

        let mut validator = RuleValidator::new(registry, options.unknown_rules);

        // PresetsExpanded: flatten every root extends chain, in order
        tracing::debug!(stage = %ResolutionStage::PresetsExpanded, count = document.extends.len(), "expanding presets");
        let mut expanded: Vec<FlattenedSetting> = Vec::new();
        for name in &document.extends {
            match presets.expand(name, "root extends") {
                Ok(flattened) => expanded.extend(flattened),
                Err(StrataError::UnknownPreset { name, .. })
                    if options.unknown_presets == Strictness::Lenient =>
                {
                    tracing::warn!("unknown preset '{name}' in root extends, skipping");
                    validator.push_warning(ValidationWarning::new(
                        None,
                        &LayerTag::Preset(name.clone()),
                        "unknown preset, skipped",
                    ));
                }
                Err(other) => return Err(other),
            }
        }

        // BaseMerged: core defaults, presets, activated plugin defaults,
        // then the document's own rules
        tracing::debug!(stage = %ResolutionStage::BaseMerged, "folding base table");
        let mut base_table = RuleTable::new();

        if let Some(core) = registry.core() {
            for (rule_id, entry) in core.contributed_defaults() {
                base_table.apply(&rule_id, &entry, LayerTag::CoreDefault);
            }
        }

        for setting in &expanded {
            let tag = LayerTag::Preset(setting.preset.clone());
            if validator.check(&setting.rule_id, &setting.entry, &tag)? {
                base_table.apply(&setting.rule_id, &setting.entry, tag);
            }
        }

        for name in &document.plugins {
            match registry.plugin(name) {
                Some(plugin) => {
                    for (rule_id, entry) in plugin.contributed_defaults() {
                        base_table.apply(&rule_id, &entry, LayerTag::PluginDefault(name.clone()));
                    }
                }
                None if options.unknown_rules == Strictness::Lenient => {
                    tracing::warn!("plugin '{name}' is not registered, skipping its defaults");
                    validator.push_warning(ValidationWarning::new(
                        None,
                        &LayerTag::PluginDefault(name.clone()),
                        "plugin is not registered, contributed defaults skipped",
                    ));
                }
                None => {
                    return Err(StrataError::config_error(format!(
                        "plugin '{name}' in plugins list is not registered"
                    )));
                }
            }
        }

        for (rule_id, entry) in &document.rules {
            if validator.check(rule_id, entry, &LayerTag::Root)? {
                base_table.apply(rule_id, entry, LayerTag::Root);
            }
        }

        // Override blocks compile now so per-file resolution is pure reads
        let overrides = OverrideResolver::compile(
            &document.overrides,
            &presets,
            options.unknown_presets,
            &mut validator,
        )?;

        let warnings = validator.into_warnings();
        tracing::info!(
            rules = base_table.len(),
            overrides = overrides.len(),
            warnings = warnings.len(),
            "configuration document loaded"
        );

        Ok(Self {
            document,
            options,
            base_table,
            overrides,
            ignore,
            warnings,
            cache: DashMap::new(),
        })
    }

    /// Non-fatal findings collected while loading the document
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    /// The immutable document this engine resolves against
    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// Whether the path matches the document's `ignorePatterns`
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignore.is_match(path)
    }

    /// Resolve the final configuration for one file
    ///
    /// Pure with respect to the engine: results are cached per normalized
    /// path and the cache dies with the engine, so a hot-reload swap can
    /// never serve entries from a previous document.
    pub fn resolve(&self, path: &Path) -> Result<Arc<ResolvedFileConfig>> {
        let key = normalize_path(path);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(Arc::clone(&hit));
        }

        tracing::debug!(stage = %ResolutionStage::OverridesApplied, path = %key, "applying overrides");
        let mut table = self.base_table.clone();
        let mut parser = self.document.parser.clone();
        let mut override_parser: Option<(usize, String)> = None;

        for block in self.overrides.matching(path) {
            for (rule_id, entry, tag) in &block.settings {
                table.apply(rule_id, entry, tag.clone());
            }
            if let Some(selected) = &block.parser {
                if let Some((previous_index, previous)) = &override_parser {
                    if previous != selected {
                        if self.options.parser_conflicts == Strictness::Strict {
                            return Err(StrataError::AmbiguousParserSelection {
                                path: path.to_path_buf(),
                                first: previous.clone(),
                                second: selected.clone(),
                            });
                        }
                        tracing::debug!(
                            path = %key,
                            earlier = previous_index,
                            later = block.index,
                            "overrides disagree on parser, later wins"
                        );
                    }
                }
                override_parser = Some((block.index, selected.clone()));
                parser = Some(selected.clone());
            }
        }

        tracing::debug!(stage = %ResolutionStage::Finalized, path = %key, rules = table.len(), "resolution finished");
        let resolved = Arc::new(ResolvedFileConfig {
            path: path.to_path_buf(),
            rules: table,
            parser,
            env: self.document.env.clone(),
            globals: self.document.globals.clone(),
            resolver: self.document.settings.resolver.clone(),
        });
        self.cache.insert(key, Arc::clone(&resolved));
        Ok(resolved)
    }

    /// Resolve many files in parallel
    ///
    /// Per-file failures are surfaced per file; one file's failure never
    /// blocks the others.
    pub fn resolve_many(
        &self,
        paths: &[PathBuf],
    ) -> Vec<(PathBuf, Result<Arc<ResolvedFileConfig>>)> {
        paths
            .par_iter()
            .map(|path| (path.clone(), self.resolve(path)))
            .collect()
    }
}

impl fmt::Debug for CascadeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CascadeEngine")
            .field("rules", &self.base_table.len())
            .field("overrides", &self.overrides.len())
            .field("warnings", &self.warnings.len())
            .finish_non_exhaustive()
    }
}
