//! Preset registry and `extends` expansion
//!
//! A preset is a named, reusable bundle of rule settings. Presets may extend
//! other presets; expansion is depth-first and preserves declaration order,
//! so a preset's own settings override those of the presets it extends, and
//! later entries in an `extends` list override earlier ones once the caller
//! folds the flattened sequence in order.

use indexmap::IndexMap;

use crate::config::{RuleEntry, RuleMap};
use crate::error::StrataError;
use crate::plugins::PluginRegistry;
use crate::result::Result;

/// A named bundle of rule settings
#[derive(Debug, Clone, Default)]
pub struct PresetDef {
    pub name: String,
    /// Presets expanded before this one's own rules
    pub extends: Vec<String>,
    pub rules: RuleMap,
}

impl PresetDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn extending(mut self, presets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extends.extend(presets.into_iter().map(Into::into));
        self
    }

    pub fn with_rule(mut self, rule_id: impl Into<String>, entry: RuleEntry) -> Self {
        self.rules.insert(rule_id.into(), entry);
        self
    }
}

/// One rule setting produced by expansion, tagged with the preset it came from
#[derive(Debug, Clone)]
pub struct FlattenedSetting {
    pub preset: String,
    pub rule_id: String,
    pub entry: RuleEntry,
}

/// Stores named presets and resolves `extends` references
#[derive(Debug, Clone, Default)]
pub struct PresetRegistry {
    presets: IndexMap<String, PresetDef>,
}

impl PresetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every plugin-contributed preset under `plugin:<name>/<preset>`
    pub fn from_plugins(registry: &PluginRegistry) -> Self {
        let mut presets = Self::new();
        for plugin in registry.iter() {
            for preset in plugin.presets.values() {
                let mut qualified = preset.clone();
                qualified.name = format!("plugin:{}/{}", plugin.name, preset.name);
                presets.register(qualified);
            }
        }
        presets
    }

    /// Register a shared preset addressable by its bare name
    pub fn register(&mut self, preset: PresetDef) {
        if self.presets.contains_key(&preset.name) {
            tracing::warn!("preset '{}' registered twice, replacing", preset.name);
        }
        self.presets.insert(preset.name.clone(), preset);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&PresetDef> {
        self.presets.get(name)
    }

    /// Registered presets in registration order
    pub fn iter(&self) -> impl Iterator<Item = &PresetDef> {
        self.presets.values()
    }

    /// Expand a preset into its flattened, ordered rule settings
    ///
    /// Nested `extends` references are resolved depth-first; a preset's own
    /// rules come after those of its parents. `referenced_from` names the
    /// layer holding the reference, for error reporting.
    pub fn expand(&self, name: &str, referenced_from: &str) -> Result<Vec<FlattenedSetting>> {
        let mut settings = Vec::new();
        let mut stack = Vec::new();
        self.expand_into(name, referenced_from, &mut stack, &mut settings)?;
        Ok(settings)
    }

    fn expand_into(
        &self,
        name: &str,
        referenced_from: &str,
        stack: &mut Vec<String>,
        out: &mut Vec<FlattenedSetting>,
    ) -> Result<()> {
        if let Some(position) = stack.iter().position(|visited| visited == name) {
            let mut chain: Vec<String> = stack[position..].to_vec();
            chain.push(name.to_string());
            return Err(StrataError::cyclic_preset(chain));
        }

        let preset = self
            .presets
            .get(name)
            .ok_or_else(|| StrataError::unknown_preset(name, referenced_from))?;

        stack.push(name.to_string());
        for parent in &preset.extends {
            self.expand_into(parent, name, stack, out)?;
        }
        for (rule_id, entry) in &preset.rules {
            out.push(FlattenedSetting {
                preset: name.to_string(),
                rule_id: rule_id.clone(),
                entry: entry.clone(),
            });
        }
        stack.pop();

        Ok(())
    }
}
