//! Drag state machine - one explicit value per engine instead of loose flags.
//!
//! ## State Transitions
//!
//! ```text
//! Idle      -> Dragging   (pointer down over a draggable item)
//! Idle      -> Receiving  (connected peer picked an item up)
//! Dragging  -> Dropping   (pointer up; drop tween running)
//! Dragging  -> Receiving  (session handed to the peer)
//! Receiving -> Dragging   (peer handed the session over)
//! Dropping  -> Idle       (tween finished; item reinserted)
//! Receiving -> Idle       (drag ended somewhere else)
//! ```
//!
//! Session data only exists inside the variants that need it, so reading the
//! dragged item while idle does not compile.

use crate::geometry::{Point, Size};
use crate::host::{AnimationId, ElementId};
use crate::reorder::indexer::GeometryIndexer;
use serde::Serialize;

/// Travel direction of the pointer relative to the placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// `Up` when the target sits above the placeholder, `Down` otherwise
    /// (including when they coincide).
    pub fn between(placeholder_index: isize, target_index: isize) -> Self {
        if placeholder_index > target_index {
            Self::Up
        } else {
            Self::Down
        }
    }

    /// +1 for `Down`, -1 for `Up`.
    pub fn sign(self) -> i32 {
        match self {
            Self::Up => -1,
            Self::Down => 1,
        }
    }
}

/// Pick-up geometry copied onto a connected peer so a hand-off can resume
/// where the origin left off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionMirror {
    /// Document position of the item when it was picked up
    pub initial: Point,
    /// Pointer position minus item corner (minus scroll) at pick-up
    pub pointer_offset: Point,
    /// Scroll position at pick-up
    pub scroll_baseline: Point,
}

/// An active drag, owned by exactly one engine.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub item: ElementId,
    pub placeholder: ElementId,
    /// Item size at pick-up; the placeholder is created with it
    pub item_size: Size,
    pub initial: Point,
    pub pointer_offset: Point,
    /// Last scroll position seen; reflow jumps are measured against it
    pub scroll_baseline: Point,
    /// Accumulated correction for reflow-induced scroll jumps
    pub scroll_correction: f32,
    pub direction: Option<Direction>,
    pub previous_target: Option<ElementId>,
    pub indexer: GeometryIndexer,
}

impl DragSession {
    pub fn element_size(&self) -> f32 {
        self.indexer.element_size()
    }

    pub fn mirror(&self) -> SessionMirror {
        SessionMirror {
            initial: self.initial,
            pointer_offset: self.pointer_offset,
            scroll_baseline: self.scroll_baseline,
        }
    }
}

/// A drop whose tween is still playing.
#[derive(Debug, Clone)]
pub struct PendingDrop {
    pub animation: AnimationId,
    pub item: ElementId,
    pub placeholder: ElementId,
    /// Slot the item lands in
    pub index: usize,
}

#[derive(Debug, Clone, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Connected peer is dragging; this container accepts hand-offs
    Receiving(SessionMirror),
    Dragging(DragSession),
    Dropping(PendingDrop),
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// True while this engine owns the pointer (the `mouseDown` of a drag).
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    pub fn is_receiving(&self) -> bool {
        matches!(self, Self::Receiving(_))
    }

    pub fn is_dropping(&self) -> bool {
        matches!(self, Self::Dropping(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Dragging(session) => Some(session),
            _ => None,
        }
    }

    pub fn pending_animation(&self) -> Option<AnimationId> {
        match self {
            Self::Dropping(pending) => Some(pending.animation),
            _ => None,
        }
    }

    /// Takes the current state, leaving `Idle` behind.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}
