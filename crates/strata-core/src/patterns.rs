//! Glob matching for path-scoped configuration
//!
//! Patterns are compiled once at load time into [`globset`] matchers; per-file
//! matching never re-parses a pattern. Matching is case-sensitive and
//! separator-normalized: backslash paths match slash patterns on every
//! platform. A pattern containing no `/` matches the file's basename at any
//! depth (`*.config.js` matches `tools/build.config.js`); patterns with a
//! separator match against the full normalized path.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;

use crate::error::StrataError;
use crate::result::Result;

/// A compiled set of glob patterns
#[derive(Debug)]
pub struct PatternSet {
    /// Patterns containing a separator, matched against the full path
    path_set: GlobSet,
    /// Slash-free patterns, matched against the basename
    base_set: GlobSet,
    pattern_count: usize,
}

impl PatternSet {
    /// Compile a list of patterns; fails on the first malformed one
    pub fn compile(patterns: &[String]) -> Result<Self> {
        let mut path_builder = GlobSetBuilder::new();
        let mut base_builder = GlobSetBuilder::new();

        for pattern in patterns {
            let trimmed = pattern.strip_prefix("./").unwrap_or(pattern);
            let glob = GlobBuilder::new(trimmed)
                .literal_separator(trimmed.contains('/'))
                .build()
                .map_err(|e| StrataError::malformed_glob(pattern, e.to_string()))?;
            if trimmed.contains('/') {
                path_builder.add(glob);
            } else {
                base_builder.add(glob);
            }
        }

        let path_set = path_builder
            .build()
            .map_err(|e| StrataError::malformed_glob("<pattern set>", e.to_string()))?;
        let base_set = base_builder
            .build()
            .map_err(|e| StrataError::malformed_glob("<pattern set>", e.to_string()))?;

        Ok(Self {
            path_set,
            base_set,
            pattern_count: patterns.len(),
        })
    }

    /// Whether any pattern in the set matches the path
    pub fn is_match(&self, path: &Path) -> bool {
        if self.pattern_count == 0 {
            return false;
        }
        let normalized = normalize_path(path);
        if self.path_set.is_match(&normalized) {
            return true;
        }
        let basename = normalized.rsplit('/').next().unwrap_or(&normalized);
        self.base_set.is_match(basename)
    }

    /// Number of patterns compiled into this set
    pub fn len(&self) -> usize {
        self.pattern_count
    }

    pub fn is_empty(&self) -> bool {
        self.pattern_count == 0
    }
}

/// Match a single pattern against a path, compiling it on the spot
///
/// Load-time code should prefer [`PatternSet::compile`] and reuse the result.
pub fn matches(pattern: &str, path: &Path) -> Result<bool> {
    let set = PatternSet::compile(std::slice::from_ref(&pattern.to_string()))?;
    Ok(set.is_match(path))
}

/// Normalize a path for matching: forward slashes, no leading `./`
pub fn normalize_path(path: &Path) -> String {
    let mut normalized = path.to_string_lossy().replace('\\', "/");
    while let Some(rest) = normalized.strip_prefix("./") {
        normalized = rest.to_string();
    }
    normalized
}
