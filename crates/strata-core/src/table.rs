//! The rule table: an ordered-merge map of rule id to effective setting
//!
//! Layers fold onto the table in cascade order; for each rule identifier the
//! incoming (severity, options) tuple replaces the existing entry wholesale.
//! Options are never deep-merged across layers, so exactly one layer's option
//! shape is authoritative for any rule. Every entry remembers the layer that
//! last set it.

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

use crate::config::RuleEntry;
use crate::severity::Severity;

/// The configuration layer an entry (or a validation message) came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerTag {
    /// Contributed defaults of the core rule set
    CoreDefault,
    /// Contributed defaults of an activated plugin
    PluginDefault(String),
    /// A preset, reached from the root or an override `extends` list
    Preset(String),
    /// The document's own `rules` block
    Root,
    /// An override block, by declaration index
    Override(usize),
}

impl fmt::Display for LayerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerTag::CoreDefault => write!(f, "core rule defaults"),
            LayerTag::PluginDefault(name) => write!(f, "plugin '{name}' defaults"),
            LayerTag::Preset(name) => write!(f, "preset '{name}'"),
            LayerTag::Root => write!(f, "root rules"),
            LayerTag::Override(index) => write!(f, "overrides[{index}]"),
        }
    }
}

/// Effective state of one rule after the fold so far
#[derive(Debug, Clone, PartialEq)]
pub struct RuleState {
    pub severity: Severity,
    pub options: Vec<Value>,
    /// Layer that last set this entry
    pub origin: LayerTag,
}

/// Ordered-merge table mapping rule identifier to its effective setting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleTable {
    entries: IndexMap<String, RuleState>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one setting onto the table, replacing any previous entry wholesale
    pub fn apply(&mut self, rule_id: &str, entry: &RuleEntry, origin: LayerTag) {
        self.entries.insert(
            rule_id.to_string(),
            RuleState {
                severity: entry.severity,
                options: entry.options.clone(),
                origin,
            },
        );
    }

    pub fn get(&self, rule_id: &str) -> Option<&RuleState> {
        self.entries.get(rule_id)
    }

    pub fn severity_of(&self, rule_id: &str) -> Option<Severity> {
        self.entries.get(rule_id).map(|state| state.severity)
    }

    /// All entries, including disabled ones, in first-set order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleState)> {
        self.entries.iter().map(|(id, state)| (id.as_str(), state))
    }

    /// Entries whose severity is not `off` - the set the rule-execution
    /// collaborator iterates
    pub fn active(&self) -> impl Iterator<Item = (&str, &RuleState)> {
        self.iter().filter(|(_, state)| state.severity.is_enabled())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
