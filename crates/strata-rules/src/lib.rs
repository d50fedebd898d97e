//! Strata Rules
//!
//! Built-in plugin manifests and shared presets for the strata engine.
//! Every plugin here is a declarative capability: a fixed set of rule
//! descriptors (default severity plus positional options schema) and named
//! presets. The checks themselves live in the external rule-execution
//! collaborator; the engine only needs the manifests to validate documents
//! and fold defaults.

pub mod builtin;

// Re-export the assembly points
pub use builtin::{builtin_registry, shared_presets};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
