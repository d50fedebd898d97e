//! The declarative configuration document

use indexmap::IndexMap;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use crate::severity::Severity;

/// Ordered map of rule identifier to its configured entry
///
/// Declaration order is preserved: later entries for the same identifier win
/// during the cascade fold, and relative order across identifiers is kept for
/// deterministic output.
pub type RuleMap = IndexMap<String, RuleEntry>;

/// A configured rule setting: severity plus positional options
///
/// Wire forms: a bare severity (`"warn"`, `1`) or an array whose first
/// element is the severity and whose remaining elements are rule-specific
/// positional options, opaque to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    pub severity: Severity,
    pub options: Vec<Value>,
}

impl RuleEntry {
    /// Entry with a severity and no options
    pub fn severity(severity: Severity) -> Self {
        Self {
            severity,
            options: Vec::new(),
        }
    }

    /// Entry with a severity and positional options
    pub fn with_options(severity: Severity, options: Vec<Value>) -> Self {
        Self { severity, options }
    }
}

impl Serialize for RuleEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.options.is_empty() {
            self.severity.serialize(serializer)
        } else {
            let mut seq = serializer.serialize_seq(Some(self.options.len() + 1))?;
            seq.serialize_element(&self.severity)?;
            for option in &self.options {
                seq.serialize_element(option)?;
            }
            seq.end()
        }
    }
}

impl<'de> Deserialize<'de> for RuleEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = RuleEntry;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a severity or an array of [severity, option...]")
            }

            fn visit_str<E>(self, value: &str) -> Result<RuleEntry, E>
            where
                E: de::Error,
            {
                let severity = value.parse().map_err(de::Error::custom)?;
                Ok(RuleEntry::severity(severity))
            }

            fn visit_u64<E>(self, value: u64) -> Result<RuleEntry, E>
            where
                E: de::Error,
            {
                let severity = Severity::from_number(value).ok_or_else(|| {
                    de::Error::custom(format!("numeric severity must be 0, 1 or 2, got {value}"))
                })?;
                Ok(RuleEntry::severity(severity))
            }

            fn visit_i64<E>(self, value: i64) -> Result<RuleEntry, E>
            where
                E: de::Error,
            {
                let value = u64::try_from(value)
                    .map_err(|_| de::Error::custom("numeric severity cannot be negative"))?;
                self.visit_u64(value)
            }

            // JSON5 sources surface every number as a float
            fn visit_f64<E>(self, value: f64) -> Result<RuleEntry, E>
            where
                E: de::Error,
            {
                if value.fract() == 0.0 && (0.0..=2.0).contains(&value) {
                    self.visit_u64(value as u64)
                } else {
                    Err(de::Error::custom(format!(
                        "numeric severity must be 0, 1 or 2, got {value}"
                    )))
                }
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<RuleEntry, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let severity: Severity = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::custom("rule entry array cannot be empty"))?;
                let mut options = Vec::new();
                while let Some(option) = seq.next_element::<Value>()? {
                    options.push(option);
                }
                Ok(RuleEntry::with_options(severity, options))
            }
        }

        deserializer.deserialize_any(EntryVisitor)
    }
}

/// Value of a `globals` allow-list entry
///
/// Accepts the tokens `readonly`/`writable`/`off` or the legacy boolean form
/// (`true` = writable, `false` = readonly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalValue {
    Readonly,
    Writable,
    Off,
}

impl GlobalValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            GlobalValue::Readonly => "readonly",
            GlobalValue::Writable => "writable",
            GlobalValue::Off => "off",
        }
    }
}

impl Serialize for GlobalValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GlobalValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct GlobalVisitor;

        impl Visitor<'_> for GlobalVisitor {
            type Value = GlobalValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("readonly/writable/off or a boolean")
            }

            fn visit_bool<E>(self, value: bool) -> Result<GlobalValue, E>
            where
                E: de::Error,
            {
                Ok(if value {
                    GlobalValue::Writable
                } else {
                    GlobalValue::Readonly
                })
            }

            fn visit_str<E>(self, value: &str) -> Result<GlobalValue, E>
            where
                E: de::Error,
            {
                match value {
                    "readonly" => Ok(GlobalValue::Readonly),
                    "writable" => Ok(GlobalValue::Writable),
                    "off" => Ok(GlobalValue::Off),
                    other => Err(de::Error::custom(format!(
                        "unknown global kind '{other}' (expected readonly/writable/off)"
                    ))),
                }
            }
        }

        deserializer.deserialize_any(GlobalVisitor)
    }
}

/// A path-scoped configuration layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideBlock {
    /// Include glob patterns; the block applies to files matching at least one
    #[serde(deserialize_with = "string_or_list")]
    pub files: Vec<String>,

    /// Exclude glob patterns; always take precedence over includes
    #[serde(default, deserialize_with = "string_or_list")]
    pub excluded_files: Vec<String>,

    /// Presets applied to matched files before this block's own rules
    #[serde(default, deserialize_with = "string_or_list")]
    pub extends: Vec<String>,

    /// Parser the external parsing collaborator must use for matched files
    #[serde(default)]
    pub parser: Option<String>,

    /// Rule settings folded onto the running table for matched files
    #[serde(default)]
    pub rules: RuleMap,
}

/// Module/file-extension resolution settings handed to the external resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverSettings {
    /// File extensions considered during module resolution
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Directories searched for bare module specifiers
    #[serde(default)]
    pub module_directories: Vec<String>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            extensions: vec![".js".to_string(), ".ts".to_string()],
            module_directories: vec!["node_modules".to_string()],
        }
    }
}

/// Free-form settings block; only the resolver section is interpreted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub resolver: ResolverSettings,
}

/// The full declarative configuration document
///
/// Constructed once at process start, validated once, immutable thereafter.
/// Per-file resolution is a pure read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    /// JSON Schema reference for IDE support
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Mark this document as the root (stop upward discovery)
    #[serde(default)]
    pub root: bool,

    /// Parser used unless a matching override selects another
    #[serde(default)]
    pub parser: Option<String>,

    /// Paths matching these globs are outside the tool's purview entirely
    #[serde(default, deserialize_with = "string_or_list")]
    pub ignore_patterns: Vec<String>,

    /// Activated plugins, in order; each contributes rule defaults
    #[serde(default, deserialize_with = "string_or_list")]
    pub plugins: Vec<String>,

    /// Presets applied before the document's own rules, in order
    #[serde(default, deserialize_with = "string_or_list")]
    pub extends: Vec<String>,

    /// Root rule settings
    #[serde(default)]
    pub rules: RuleMap,

    /// Path-scoped layers; later blocks override earlier ones on conflicts
    #[serde(default)]
    pub overrides: Vec<OverrideBlock>,

    /// Global environment flags
    #[serde(default)]
    pub env: IndexMap<String, bool>,

    /// Global identifier allow-list
    #[serde(default)]
    pub globals: IndexMap<String, GlobalValue>,

    /// Resolver and other collaborator settings
    #[serde(default)]
    pub settings: Settings,
}

/// Accept either a single string or a list of strings
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrList;

    impl<'de> Visitor<'de> for StringOrList {
        type Value = Vec<String>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Vec<String>, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Vec<String>, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut values = Vec::new();
            while let Some(value) = seq.next_element::<String>()? {
                values.push(value);
            }
            Ok(values)
        }
    }

    deserializer.deserialize_any(StringOrList)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_entry_wire_forms() {
        let bare: RuleEntry = serde_json::from_str(r#""warn""#).unwrap();
        assert_eq!(bare, RuleEntry::severity(Severity::Warn));

        let numeric: RuleEntry = serde_json::from_str("0").unwrap();
        assert_eq!(numeric, RuleEntry::severity(Severity::Off));

        let with_options: RuleEntry =
            serde_json::from_str(r#"["error", {"devDependencies": true}]"#).unwrap();
        assert_eq!(with_options.severity, Severity::Error);
        assert_eq!(with_options.options.len(), 1);
    }

    #[test]
    fn rule_entry_rejects_empty_array() {
        assert!(serde_json::from_str::<RuleEntry>("[]").is_err());
    }

    #[test]
    fn rule_map_preserves_declaration_order() {
        let json = r#"{
            "no-console": "warn",
            "import/order": ["warn", {"newlinesBetween": "always"}],
            "no-continue": "off"
        }"#;
        let rules: RuleMap = serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = rules.keys().map(String::as_str).collect();
        assert_eq!(ids, ["no-console", "import/order", "no-continue"]);
    }

    #[test]
    fn globals_accept_legacy_booleans() {
        let json = r#"{"vi": true, "$$Generic": "readonly", "event": "off"}"#;
        let globals: IndexMap<String, GlobalValue> = serde_json::from_str(json).unwrap();
        assert_eq!(globals["vi"], GlobalValue::Writable);
        assert_eq!(globals["$$Generic"], GlobalValue::Readonly);
        assert_eq!(globals["event"], GlobalValue::Off);
    }

    #[test]
    fn override_files_accepts_single_string() {
        let json = r#"{"files": "*.sfc", "rules": {"no-void": "off"}}"#;
        let block: OverrideBlock = serde_json::from_str(json).unwrap();
        assert_eq!(block.files, ["*.sfc"]);
        assert!(block.excluded_files.is_empty());
    }

    #[test]
    fn document_defaults() {
        let doc: ConfigDocument = serde_json::from_str("{}").unwrap();
        assert!(!doc.root);
        assert!(doc.rules.is_empty());
        assert!(doc.overrides.is_empty());
        assert_eq!(doc.settings.resolver.module_directories, ["node_modules"]);
    }

    #[test]
    fn full_document_round_trips() {
        let json = r#"{
            "root": true,
            "parser": "typescript",
            "ignorePatterns": ["dist", "node_modules"],
            "plugins": ["import"],
            "extends": ["recommended"],
            "rules": {"no-console": ["warn", {"allow": ["error"]}]},
            "overrides": [
                {
                    "files": ["*.sfc"],
                    "excludedFiles": ["src/**/__meta__/**/*.sfc"],
                    "parser": "sfc",
                    "rules": {"no-void": "off"}
                }
            ],
            "env": {"browser": true, "node": true},
            "globals": {"vi": true},
            "settings": {
                "resolver": {"extensions": [".js", ".ts"], "moduleDirectories": ["node_modules", "src/"]}
            }
        }"#;
        let doc: ConfigDocument = serde_json::from_str(json).unwrap();
        assert!(doc.root);
        assert_eq!(doc.parser.as_deref(), Some("typescript"));
        assert_eq!(doc.overrides.len(), 1);
        assert_eq!(doc.overrides[0].parser.as_deref(), Some("sfc"));
        assert_eq!(doc.env["browser"], true);

        let back = serde_json::to_string(&doc).unwrap();
        let again: ConfigDocument = serde_json::from_str(&back).unwrap();
        assert_eq!(again.overrides[0].files, doc.overrides[0].files);
    }
}
