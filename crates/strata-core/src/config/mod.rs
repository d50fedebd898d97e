//! Configuration system for strata
//!
//! The configuration document is declarative: root rule settings, preset
//! references (`extends`), activated plugins, path-scoped override blocks,
//! environment flags, a globals allow-list, and resolver settings. It is
//! loaded once at process start, validated once, and treated as read-only
//! for the remainder of the process lifetime; per-file resolution never
//! mutates it.
//!
//! ## Configuration Files
//!
//! Two file formats are supported:
//! - `strata.json` - Standard JSON
//! - `strata.jsonc` - JSON with comments and trailing commas (preferred)
//!
//! ## Configuration Discovery
//!
//! When no explicit config path is provided, discovery starts from the
//! current directory and moves up the directory tree until a config file is
//! found or the filesystem root is reached. A document with `root: true`
//! stops the search.
//!
//! ## Example Configuration
//!
//! ```jsonc
//! {
//!   "root": true,
//!   "parser": "typescript",
//!   "plugins": ["import", "promise"],
//!   "extends": ["recommended", "plugin:import/recommended"],
//!   "rules": {
//!     "no-console": ["warn", { "allow": ["error"] }],
//!     "import/order": ["warn", { "newlinesBetween": "always" }]
//!   },
//!   "overrides": [
//!     {
//!       "files": ["*.sfc"],
//!       "parser": "sfc",
//!       "rules": { "no-void": "off" }
//!     }
//!   ],
//!   "env": { "browser": true, "node": true },
//!   "globals": { "vi": true }
//! }
//! ```

mod document;
mod loader;
pub(crate) mod validate;

// Re-export main types
pub use document::{
    ConfigDocument, GlobalValue, OverrideBlock, ResolverSettings, RuleEntry, RuleMap, Settings,
};
pub use loader::ConfigLoader;
pub use validate::{Strictness, ValidationWarning};
