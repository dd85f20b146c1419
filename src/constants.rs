//! Default class names, marker attributes and timing values.
//!
//! These are the defaults behind [`crate::config::EngineConfig`]; hosts that
//! style the engines differently override them through the config file.

// ============================================================================
// Drag Classes
// ============================================================================

/// Class on the transient element holding the dragged item's landing slot
pub const DRAG_PLACEHOLDER_CLASS: &str = "drag-placeholder";

/// Class on every sibling while a drag is running in their container
pub const LIST_DRAG_CLASS: &str = "list-drag";

/// Class on the dragged item while it floats
pub const DRAGGING_CLASS: &str = "dragging";

/// Class on the container that currently owns the drag session
pub const HOST_DRAG_CLASS: &str = "host-drag";

/// Class on a connected container that is ready to accept the dragged item
pub const HOST_RECEIVE_CLASS: &str = "host-receive";

/// Class on the "nothing here yet" element an empty list renders; never draggable
pub const EMPTY_LIST_CLASS: &str = "empty-list";

// ============================================================================
// Selection Classes
// ============================================================================

/// Class on the selection overlay element
pub const SELECTION_OVERLAY_CLASS: &str = "selection";

// ============================================================================
// Marker Attributes
// ============================================================================

/// Attribute marking an element as a draggable list item
pub const LIST_DRAG_ATTR: &str = "listDrag";

/// Attribute marking an element as a selectable list item
pub const SELECTABLE_ITEM_ATTR: &str = "selectableItem";

/// Tag of selectable table cells
pub const TABLE_CELL_TAG: &str = "td";

/// Tag of table rows
pub const TABLE_ROW_TAG: &str = "tr";

/// Tag that selects the table variant when a surface is detected by tag name
pub const TABLE_TAG: &str = "table";

// ============================================================================
// Animation & Timing
// ============================================================================

/// Drop animation duration in milliseconds
pub const DROP_ANIMATION_MS: u64 = 200;

/// Budget for a single pointer handler before the profiler warns
pub const POINTER_TICK_BUDGET_MS: f64 = 4.0;

// ============================================================================
// Selection Overlay
// ============================================================================

/// Extra pixels added to the bottom/right edge of a list selection overlay
pub const LIST_EDGE_OUTSET: f32 = 1.0;

/// Extra pixels added to the bottom/right edge of a table selection overlay
pub const TABLE_EDGE_OUTSET: f32 = 0.0;

// ============================================================================
// Logging
// ============================================================================

/// Environment variable consulted before `RUST_LOG`
pub const LOG_ENV_VAR: &str = "DRAGSELECT_LOG";

/// Filter used when neither environment variable is set
pub const DEFAULT_LOG_FILTER: &str = "dragselect=info";

/// File name of the engine config inside the config directory
pub const CONFIG_FILE_NAME: &str = "dragselect.json";
