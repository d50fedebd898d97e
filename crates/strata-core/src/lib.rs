//! Strata Core
//!
//! Cascading rule-configuration resolution engine for a multi-dialect
//! static-analysis tool. Given a file path and an immutable configuration
//! document, the engine computes the final merged set of active rules -
//! each with severity and options - by layering a base rule set, named
//! presets, plugin-contributed defaults, and path-scoped overrides.
//!
//! Parsing files and executing rules are external collaborators; this crate
//! only answers "which rules, with what configuration, apply to this file".

pub mod cascade;
pub mod config;
pub mod error;
pub mod overrides;
pub mod patterns;
pub mod plugins;
pub mod presets;
pub mod reload;
pub mod result;
pub mod severity;
pub mod table;

// Re-export commonly used types
pub use cascade::{CascadeEngine, EngineOptions, ResolutionStage, ResolvedFileConfig};
pub use config::{
    ConfigDocument, ConfigLoader, GlobalValue, OverrideBlock, ResolverSettings, RuleEntry, RuleMap,
    Settings, Strictness, ValidationWarning,
};
pub use error::{ErrorKind, StrataError};
pub use overrides::{CompiledOverride, OverrideResolver};
pub use patterns::{PatternSet, matches, normalize_path};
pub use plugins::{
    CORE_PLUGIN, OptionSlot, OptionsSchema, Plugin, PluginRegistry, RuleDescriptor,
};
pub use presets::{FlattenedSetting, PresetDef, PresetRegistry};
pub use reload::{ConfigStore, ConfigWatcher};
pub use result::Result;
pub use severity::Severity;
pub use table::{LayerTag, RuleState, RuleTable};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("strata=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
