//! Plugin capability registry
//!
//! Plugins are modeled as a registered capability: each plugin exposes a
//! fixed mapping of rule identifier to default setting and options schema,
//! loaded once at engine construction. Validation therefore has a closed
//! universe of known identifiers to check against; the engine never invokes
//! a rule's check function itself.

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::RuleEntry;
use crate::presets::PresetDef;
use crate::severity::Severity;

/// Name under which the unnamespaced rule set is registered
pub const CORE_PLUGIN: &str = "core";

/// Expected shape of one positional option slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSlot {
    Bool,
    Integer,
    Number,
    String,
    Object,
    Array,
    /// Any JSON value
    Any,
}

impl OptionSlot {
    fn matches(&self, value: &Value) -> bool {
        match self {
            OptionSlot::Bool => value.is_boolean(),
            OptionSlot::Integer => value.is_i64() || value.is_u64(),
            OptionSlot::Number => value.is_number(),
            OptionSlot::String => value.is_string(),
            OptionSlot::Object => value.is_object(),
            OptionSlot::Array => value.is_array(),
            OptionSlot::Any => true,
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            OptionSlot::Bool => "a boolean",
            OptionSlot::Integer => "an integer",
            OptionSlot::Number => "a number",
            OptionSlot::String => "a string",
            OptionSlot::Object => "an object",
            OptionSlot::Array => "an array",
            OptionSlot::Any => "any value",
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Declared positional-options schema of a rule
///
/// Slots are positional; the first `required` slots must be present, the
/// rest may be omitted. A rule with no slots accepts no options at all.
#[derive(Debug, Clone, Default)]
pub struct OptionsSchema {
    slots: Vec<OptionSlot>,
    required: usize,
}

impl OptionsSchema {
    /// Schema accepting no options
    pub fn none() -> Self {
        Self::default()
    }

    /// Schema where every slot is optional
    pub fn optional(slots: Vec<OptionSlot>) -> Self {
        Self { slots, required: 0 }
    }

    /// Schema with `required` leading mandatory slots
    pub fn new(slots: Vec<OptionSlot>, required: usize) -> Self {
        debug_assert!(required <= slots.len());
        Self { slots, required }
    }

    /// Check arity and per-slot types; the error message is wrapped with the
    /// rule identifier and layer by the caller
    pub fn validate(&self, options: &[Value]) -> Result<(), String> {
        if options.len() < self.required {
            return Err(format!(
                "expected at least {} option(s), got {}",
                self.required,
                options.len()
            ));
        }
        if options.len() > self.slots.len() {
            return Err(format!(
                "takes at most {} option(s), got {}",
                self.slots.len(),
                options.len()
            ));
        }
        for (index, (slot, value)) in self.slots.iter().zip(options).enumerate() {
            if !slot.matches(value) {
                return Err(format!(
                    "option {} must be {}, got {}",
                    index + 1,
                    slot.expected(),
                    kind_of(value)
                ));
            }
        }
        Ok(())
    }
}

/// Static description of one rule a plugin contributes
#[derive(Debug, Clone)]
pub struct RuleDescriptor {
    /// Rule name without the plugin namespace
    pub name: String,
    /// Human-readable description of what the rule checks
    pub description: String,
    /// Severity applied when the plugin's defaults are folded in
    pub default_severity: Severity,
    /// Options accompanying the default severity
    pub default_options: Vec<Value>,
    /// Declared positional-options schema
    pub schema: OptionsSchema,
}

impl RuleDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            default_severity: Severity::Off,
            default_options: Vec::new(),
            schema: OptionsSchema::none(),
        }
    }

    pub fn with_default(mut self, severity: Severity) -> Self {
        self.default_severity = severity;
        self
    }

    pub fn with_default_options(mut self, options: Vec<Value>) -> Self {
        self.default_options = options;
        self
    }

    pub fn with_schema(mut self, schema: OptionsSchema) -> Self {
        self.schema = schema;
        self
    }
}

/// A plugin: a fixed set of rule descriptors plus named presets
#[derive(Debug, Clone, Default)]
pub struct Plugin {
    pub name: String,
    pub rules: IndexMap<String, RuleDescriptor>,
    pub presets: IndexMap<String, PresetDef>,
}

impl Plugin {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_rule(mut self, rule: RuleDescriptor) -> Self {
        self.rules.insert(rule.name.clone(), rule);
        self
    }

    pub fn with_preset(mut self, preset: PresetDef) -> Self {
        self.presets.insert(preset.name.clone(), preset);
        self
    }

    /// The fully-qualified identifier of one of this plugin's rules
    pub fn qualified_id(&self, rule_name: &str) -> String {
        if self.name == CORE_PLUGIN {
            rule_name.to_string()
        } else {
            format!("{}/{}", self.name, rule_name)
        }
    }

    /// Settings this plugin contributes when activated: every rule whose
    /// default severity is not `off`
    pub fn contributed_defaults(&self) -> impl Iterator<Item = (String, RuleEntry)> + '_ {
        self.rules
            .values()
            .filter(|rule| rule.default_severity.is_enabled())
            .map(|rule| {
                (
                    self.qualified_id(&rule.name),
                    RuleEntry::with_options(rule.default_severity, rule.default_options.clone()),
                )
            })
    }
}

/// Closed universe of known plugins and their rules
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: IndexMap<String, Plugin>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin, replacing any previous one with the same name
    pub fn register(&mut self, plugin: Plugin) {
        if self.plugins.contains_key(&plugin.name) {
            tracing::warn!("plugin '{}' registered twice, replacing", plugin.name);
        }
        self.plugins.insert(plugin.name.clone(), plugin);
    }

    pub fn plugin(&self, name: &str) -> Option<&Plugin> {
        self.plugins.get(name)
    }

    /// The unnamespaced rule set, if registered
    pub fn core(&self) -> Option<&Plugin> {
        self.plugins.get(CORE_PLUGIN)
    }

    /// Registered plugins in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Plugin> {
        self.plugins.values()
    }

    /// Look up a rule descriptor by its full identifier
    ///
    /// `plugin/rule-name` resolves within the named plugin; bare identifiers
    /// resolve within the core rule set.
    pub fn descriptor(&self, rule_id: &str) -> Option<&RuleDescriptor> {
        match rule_id.split_once('/') {
            Some((namespace, name)) => self.plugins.get(namespace)?.rules.get(name),
            None => self.core()?.rules.get(rule_id),
        }
    }

    /// Whether the identifier belongs to any registered plugin
    pub fn is_known(&self, rule_id: &str) -> bool {
        self.descriptor(rule_id).is_some()
    }
}
