//! Error types and handling for configuration resolution

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for configuration resolution operations
#[derive(Debug, Error)]
pub enum StrataError {
    /// Configuration loading or structural validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// A preset transitively references itself
    #[error("Cyclic preset reference: {chain}")]
    CyclicPreset { chain: String },

    /// An `extends` entry names a preset nobody registered
    #[error("Unknown preset '{name}' referenced from {referenced_from}")]
    UnknownPreset {
        name: String,
        referenced_from: String,
    },

    /// A rule identifier is not known to any registered plugin
    #[error("Unknown rule '{rule_id}' in {layer}")]
    UnknownRule { rule_id: String, layer: String },

    /// Rule options do not match the rule's declared schema
    #[error("Invalid options for rule '{rule_id}' in {layer}: {message}")]
    InvalidRuleOptions {
        rule_id: String,
        layer: String,
        message: String,
    },

    /// Two matching overrides select different parsers under strict mode
    #[error(
        "Ambiguous parser selection for '{path}': overrides select both '{first}' and '{second}'"
    )]
    AmbiguousParserSelection {
        path: PathBuf,
        first: String,
        second: String,
    },

    /// A glob pattern failed to compile
    #[error("Malformed glob pattern '{pattern}': {message}")]
    MalformedGlobPattern { pattern: String, message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Preset,
    Rule,
    Parser,
    Glob,
    Io,
}

impl StrataError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StrataError::ConfigError { .. } => ErrorKind::Config,
            StrataError::CyclicPreset { .. } => ErrorKind::Preset,
            StrataError::UnknownPreset { .. } => ErrorKind::Preset,
            StrataError::UnknownRule { .. } => ErrorKind::Rule,
            StrataError::InvalidRuleOptions { .. } => ErrorKind::Rule,
            StrataError::AmbiguousParserSelection { .. } => ErrorKind::Parser,
            StrataError::MalformedGlobPattern { .. } => ErrorKind::Glob,
            StrataError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Check if this error is recoverable (can continue resolving other files)
    ///
    /// Load-time failures abort startup; only per-file failures are
    /// recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Parser)
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a cyclic preset error from the reference chain
    pub fn cyclic_preset(chain: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let chain: Vec<String> = chain.into_iter().map(Into::into).collect();
        Self::CyclicPreset {
            chain: chain.join(" -> "),
        }
    }

    /// Create an unknown preset error
    pub fn unknown_preset(name: impl Into<String>, referenced_from: impl Into<String>) -> Self {
        Self::UnknownPreset {
            name: name.into(),
            referenced_from: referenced_from.into(),
        }
    }

    /// Create an unknown rule error
    pub fn unknown_rule(rule_id: impl Into<String>, layer: impl Into<String>) -> Self {
        Self::UnknownRule {
            rule_id: rule_id.into(),
            layer: layer.into(),
        }
    }

    /// Create an invalid rule options error
    pub fn invalid_rule_options(
        rule_id: impl Into<String>,
        layer: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidRuleOptions {
            rule_id: rule_id.into(),
            layer: layer.into(),
            message: message.into(),
        }
    }

    /// Create a malformed glob pattern error
    pub fn malformed_glob(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedGlobPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
