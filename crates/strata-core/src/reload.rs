//! Atomic configuration hot reload
//!
//! The engine is immutable, so reloading means building a whole new engine
//! and swapping it in. [`ConfigStore`] is the swap point: readers grab an
//! `Arc` to the current engine and keep resolving against it even while a
//! swap happens, so every resolution sees either the fully-old or the
//! fully-new document, never a mix. A failed rebuild keeps the previous
//! engine in place.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::cascade::{CascadeEngine, EngineOptions};
use crate::config::ConfigLoader;
use crate::error::StrataError;
use crate::plugins::PluginRegistry;
use crate::presets::PresetRegistry;
use crate::result::Result;

/// Holds the current engine and swaps it atomically on reload
pub struct ConfigStore {
    engine: RwLock<Arc<CascadeEngine>>,
}

impl ConfigStore {
    pub fn new(engine: CascadeEngine) -> Self {
        Self {
            engine: RwLock::new(Arc::new(engine)),
        }
    }

    /// The current engine; callers resolve against the returned `Arc` and
    /// are unaffected by later swaps
    pub fn engine(&self) -> Arc<CascadeEngine> {
        Arc::clone(&self.engine.read().expect("config store lock poisoned"))
    }

    /// Replace the engine, returning the previous one
    pub fn swap(&self, engine: CascadeEngine) -> Arc<CascadeEngine> {
        let mut guard = self.engine.write().expect("config store lock poisoned");
        std::mem::replace(&mut guard, Arc::new(engine))
    }
}

/// Rebuilds and swaps the engine when the config file changes on disk
pub struct ConfigWatcher {
    // Dropping the watcher stops event delivery
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl ConfigWatcher {
    /// Watch `path` and swap a freshly-built engine into `store` on change
    ///
    /// A change that fails to load or validate is logged and dropped; the
    /// store keeps serving the previous document.
    pub fn spawn(
        path: impl Into<PathBuf>,
        store: Arc<ConfigStore>,
        registry: Arc<PluginRegistry>,
        shared_presets: PresetRegistry,
        options: EngineOptions,
    ) -> Result<Self> {
        let path = path.into();
        let watched = path.clone();

        let mut watcher = notify::recommended_watcher(
            move |event: std::result::Result<Event, notify::Error>| match event {
                Ok(event)
                    if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) =>
                {
                    match rebuild(&watched, &registry, &shared_presets, options) {
                        Ok(engine) => {
                            store.swap(engine);
                            tracing::info!("reloaded configuration from {}", watched.display());
                        }
                        Err(e) => {
                            tracing::error!(
                                "failed to reload {}: {e}; keeping previous configuration",
                                watched.display()
                            );
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!("config watch error: {e}"),
            },
        )
        .map_err(|e| StrataError::config_error(format!("cannot create config watcher: {e}")))?;

        watcher
            .watch(&path, RecursiveMode::NonRecursive)
            .map_err(|e| {
                StrataError::config_error(format!("cannot watch '{}': {e}", path.display()))
            })?;

        Ok(Self {
            _watcher: watcher,
            path,
        })
    }

    /// The file being watched
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn rebuild(
    path: &Path,
    registry: &PluginRegistry,
    shared_presets: &PresetRegistry,
    options: EngineOptions,
) -> Result<CascadeEngine> {
    let document = ConfigLoader::load_from_file(path)?;
    CascadeEngine::with_shared_presets(document, registry, shared_presets.clone(), options)
}
