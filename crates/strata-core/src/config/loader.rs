//! Configuration file discovery and loading

use std::fs;
use std::path::{Path, PathBuf};

use super::document::ConfigDocument;
use crate::error::StrataError;
use crate::result::Result;

/// Config file names probed during discovery, in preference order
const CONFIG_FILENAMES: &[&str] = &[
    ".stratarc.json",
    ".stratarc.jsonc",
    "strata.jsonc",
    "strata.json",
];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover a config file by traversing upward from `start_path`
    ///
    /// Probes the known config file names in each directory, moving up the
    /// tree until a file is found or the filesystem root is reached. A
    /// document with `root: true` stops the search at its directory.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| StrataError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILENAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());

                    if let Ok(document) = Self::load_from_file(&config_path) {
                        if document.root {
                            tracing::debug!("Config has root: true, stopping search");
                            return Ok(Some(config_path));
                        }
                    }

                    return Ok(Some(config_path));
                }
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Load a configuration document from a specific file
    ///
    /// Supports both JSON and JSONC (comments and trailing commas).
    pub fn load_from_file(path: &Path) -> Result<ConfigDocument> {
        let content = fs::read_to_string(path).map_err(|e| {
            StrataError::config_error(format!(
                "Cannot read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let document: ConfigDocument = json5::from_str(&content).map_err(|e| {
            StrataError::config_error(format!("Invalid JSON in '{}': {}", path.display(), e))
        })?;

        tracing::info!("Loaded config from: {}", path.display());
        Ok(document)
    }

    /// Load a document from an explicit path or auto-discover one
    pub fn load(custom_path: Option<&Path>) -> Result<ConfigDocument> {
        let config_path = if let Some(path) = custom_path {
            if !path.exists() {
                return Err(StrataError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        } else {
            let current_dir = std::env::current_dir().map_err(|e| {
                StrataError::config_error(format!("Failed to get current directory: {e}"))
            })?;

            Self::auto_discover(&current_dir)?.ok_or_else(|| {
                StrataError::config_error("No config file found".to_string())
            })?
        };

        Self::load_from_file(&config_path)
    }

    /// Load a document or fall back to the default when none is found
    pub fn load_or_default(custom_path: Option<&Path>) -> ConfigDocument {
        Self::load(custom_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}. Using defaults.", e);
            ConfigDocument::default()
        })
    }
}
