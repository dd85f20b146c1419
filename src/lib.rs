//! Headless drag-reorder and range-selection engines.
//!
//! The engines own the pointer state machines and the index/geometry
//! bookkeeping; everything visual goes through the collaborator traits in
//! [`host`]. [`host::memory::MemoryDom`] is an in-memory host used by the
//! tests and by embedders that lay out their own widgets.
//!
//! ## Modules
//!
//! - `reorder` - drag-reorder engines, the connected-container bridge and
//!   the group that routes pointer events between them
//! - `selection` - list and table range selection
//! - `host` - DOM, hit-testing and animation collaborator interfaces
//! - `config` - engine configuration and hot reload

pub mod config;
pub mod config_watcher;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod perf;
pub mod reorder;
pub mod selection;
pub mod spatial_index;

pub use config::{EngineConfig, SharedConfig};
pub use error::{EngineError, EngineResult};
pub use geometry::{Edges, Point, Rect, Size};
pub use host::{AnimationId, ElementId, Host, PointerEvent};
pub use reorder::{Direction, DragReorderEngine, EngineId, ReorderGroup};
pub use selection::{Selectable, SelectionChange, SelectionSurface};
