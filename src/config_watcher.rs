//! Hot reload of the engine config file.
//!
//! The watcher observes the file's directory (editors often replace files
//! instead of writing in place) and swaps a freshly parsed config into the
//! shared handle. A file that fails to parse leaves the old config in place.

use crate::config::{EngineConfig, SharedConfig};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, channel};
use tracing::{debug, info, warn};

pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    path: PathBuf,
    shared: SharedConfig,
}

impl ConfigWatcher {
    pub fn new(path: PathBuf, shared: SharedConfig) -> Result<Self> {
        let (tx, rx) = channel();
        let mut watcher = notify::recommended_watcher(tx).context("creating config watcher")?;

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("watching {}", dir.display()))?;

        debug!(path = %path.display(), "watching engine config");
        Ok(Self {
            _watcher: watcher,
            rx,
            path,
            shared,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drains pending file events and reloads when the config file changed.
    /// Returns true when a new config was swapped in.
    pub fn poll(&mut self) -> bool {
        let mut touched = false;
        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(event) => {
                    if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
                        && event.paths.iter().any(|p| p.file_name() == self.path.file_name())
                    {
                        touched = true;
                    }
                }
                Err(e) => warn!(error = %e, "config watcher error"),
            }
        }
        touched && self.reload()
    }

    /// Re-reads the file unconditionally.
    pub fn reload(&self) -> bool {
        match EngineConfig::load(&self.path) {
            Ok(config) => {
                *self.shared.write() = config;
                info!(path = %self.path.display(), "engine config reloaded");
                true
            }
            Err(e) => {
                warn!(error = %format!("{e:#}"), "keeping previous engine config");
                false
            }
        }
    }
}
