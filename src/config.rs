//! Engine configuration.
//!
//! Class names, marker attributes and timing are read from a JSON file so a
//! host can restyle the engines without recompiling. Every field has a
//! default; a partial file only overrides what it names.
//!
//! Engines hold a [`SharedConfig`] and read it at the start of each pointer
//! handler, so a reload through [`crate::config_watcher::ConfigWatcher`] takes
//! effect on the next event.

use crate::constants::*;
use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Config handle shared between engines and the watcher.
pub type SharedConfig = Arc<RwLock<EngineConfig>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub classes: ClassNames,
    pub markers: Markers,
    /// Duration of the drop tween
    pub drop_animation_ms: u64,
    pub selection: SelectionConfig,
}

/// Classes the engines add and remove as visual cues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    pub placeholder: String,
    pub list_drag: String,
    pub dragging: String,
    pub host_drag: String,
    pub host_receive: String,
    pub empty_list: String,
    pub selection_overlay: String,
}

/// Attributes and tags the engines filter hit-test results by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markers {
    pub list_drag: String,
    pub selectable_item: String,
    pub table_row_tag: String,
    pub table_cell_tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Pixels added to the bottom/right overlay inset of list selections
    pub list_edge_outset: f32,
    /// Pixels added to the bottom/right overlay inset of table selections
    pub table_edge_outset: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            classes: ClassNames::default(),
            markers: Markers::default(),
            drop_animation_ms: DROP_ANIMATION_MS,
            selection: SelectionConfig::default(),
        }
    }
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            placeholder: DRAG_PLACEHOLDER_CLASS.to_string(),
            list_drag: LIST_DRAG_CLASS.to_string(),
            dragging: DRAGGING_CLASS.to_string(),
            host_drag: HOST_DRAG_CLASS.to_string(),
            host_receive: HOST_RECEIVE_CLASS.to_string(),
            empty_list: EMPTY_LIST_CLASS.to_string(),
            selection_overlay: SELECTION_OVERLAY_CLASS.to_string(),
        }
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            list_drag: LIST_DRAG_ATTR.to_string(),
            selectable_item: SELECTABLE_ITEM_ATTR.to_string(),
            table_row_tag: TABLE_ROW_TAG.to_string(),
            table_cell_tag: TABLE_CELL_TAG.to_string(),
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            list_edge_outset: LIST_EDGE_OUTSET,
            table_edge_outset: TABLE_EDGE_OUTSET,
        }
    }
}

impl EngineConfig {
    pub fn drop_animation(&self) -> Duration {
        Duration::from_millis(self.drop_animation_ms)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parsing engine config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading engine config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in {}", path.display()))
    }

    /// Loads `path`, falling back to defaults when the file is missing or
    /// malformed.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            warn!(error = %format!("{e:#}"), "engine config unreadable, using defaults");
            Self::default()
        })
    }

    pub fn into_shared(self) -> SharedConfig {
        Arc::new(RwLock::new(self))
    }
}

/// `<config dir>/dragselect/dragselect.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dragselect").join(CONFIG_FILE_NAME))
}
