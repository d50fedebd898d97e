//! Load-time validation of rule settings
//!
//! Runs once while the engine is constructed, before any file is resolved.
//! Severity tokens are normalized during deserialization; what remains to
//! check here is that every rule identifier is known to the plugin registry
//! and that its options match the rule's declared schema. Unknown
//! identifiers are tolerated or rejected per the configured strictness.

use std::fmt;

use crate::config::RuleEntry;
use crate::error::StrataError;
use crate::plugins::PluginRegistry;
use crate::result::Result;
use crate::table::LayerTag;

/// How to treat conditions the engine could tolerate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Tolerate with a warning
    Lenient,
    /// Fail the operation
    Strict,
}

/// A non-fatal finding from validation
///
/// Always names the offending identifier (when there is one) and the layer
/// it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub rule_id: Option<String>,
    pub layer: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(rule_id: Option<String>, layer: &LayerTag, message: impl Into<String>) -> Self {
        Self {
            rule_id,
            layer: layer.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rule_id {
            Some(rule_id) => write!(f, "{} in {}: {}", rule_id, self.layer, self.message),
            None => write!(f, "{}: {}", self.layer, self.message),
        }
    }
}

/// Checks rule settings against the registry, accumulating warnings
pub(crate) struct RuleValidator<'a> {
    registry: &'a PluginRegistry,
    unknown_rules: Strictness,
    warnings: Vec<ValidationWarning>,
}

impl<'a> RuleValidator<'a> {
    pub fn new(registry: &'a PluginRegistry, unknown_rules: Strictness) -> Self {
        Self {
            registry,
            unknown_rules,
            warnings: Vec::new(),
        }
    }

    /// Validate one setting
    ///
    /// Returns `Ok(true)` when the setting should be folded into the table,
    /// `Ok(false)` when it is ignored-with-warning (unknown identifier under
    /// lenient mode).
    pub fn check(&mut self, rule_id: &str, entry: &RuleEntry, layer: &LayerTag) -> Result<bool> {
        let Some(descriptor) = self.registry.descriptor(rule_id) else {
            match self.unknown_rules {
                Strictness::Strict => {
                    return Err(StrataError::unknown_rule(rule_id, layer.to_string()));
                }
                Strictness::Lenient => {
                    tracing::warn!("unknown rule '{rule_id}' in {layer}, ignoring");
                    self.warnings.push(ValidationWarning::new(
                        Some(rule_id.to_string()),
                        layer,
                        "unknown rule, setting ignored",
                    ));
                    return Ok(false);
                }
            }
        };

        descriptor
            .schema
            .validate(&entry.options)
            .map_err(|message| {
                StrataError::invalid_rule_options(rule_id, layer.to_string(), message)
            })?;

        Ok(true)
    }

    pub fn push_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    pub fn into_warnings(self) -> Vec<ValidationWarning> {
        self.warnings
    }
}
