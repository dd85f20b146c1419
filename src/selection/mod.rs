//! Spreadsheet-style range selection over lists and tables.
//!
//! [`Selectable`] picks the surface once, from the container's tag, and
//! forwards pointer events to it. Both surfaces run the same
//! [`RangeSelectionEngine`]; they differ only in their [`SelectionStrategy`].

pub mod engine;
pub mod strategy;

pub use engine::{RangeSelectionEngine, SelectionChange, SelectionState};
pub use strategy::{GridPos, ListRun, SelectionStrategy, TableRect};

use crate::config::SharedConfig;
use crate::constants::TABLE_TAG;
use crate::host::{Dom, ElementId, Host, PointerEvent};
use std::sync::mpsc::Receiver;
use tracing::debug;

/// Pointer-facing interface shared by every selection surface.
pub trait SelectionSurface {
    fn container(&self) -> ElementId;

    /// Returns true when a new selection was anchored.
    fn on_pointer_down(&mut self, ev: PointerEvent, host: &mut dyn Host) -> bool;

    /// Returns true when the selection changed.
    fn on_pointer_move(&mut self, ev: PointerEvent, host: &mut dyn Host) -> bool;

    fn on_pointer_up(&mut self, ev: PointerEvent, host: &mut dyn Host);

    fn subscribe(&mut self) -> Receiver<SelectionChange>;

    fn selection(&self) -> SelectionChange;

    fn anchor(&self) -> Option<ElementId>;

    fn focus(&self) -> Option<ElementId>;

    fn overlay(&self) -> Option<ElementId>;

    fn dismiss(&mut self, host: &mut dyn Host);
}

impl<S: SelectionStrategy> SelectionSurface for RangeSelectionEngine<S> {
    fn container(&self) -> ElementId {
        RangeSelectionEngine::container(self)
    }

    fn on_pointer_down(&mut self, ev: PointerEvent, host: &mut dyn Host) -> bool {
        self.pointer_down(ev, host)
    }

    fn on_pointer_move(&mut self, ev: PointerEvent, host: &mut dyn Host) -> bool {
        self.pointer_move(ev, host)
    }

    fn on_pointer_up(&mut self, ev: PointerEvent, host: &mut dyn Host) {
        self.pointer_up(ev, host)
    }

    fn subscribe(&mut self) -> Receiver<SelectionChange> {
        RangeSelectionEngine::subscribe(self)
    }

    fn selection(&self) -> SelectionChange {
        self.change()
    }

    fn anchor(&self) -> Option<ElementId> {
        self.state().anchor()
    }

    fn focus(&self) -> Option<ElementId> {
        self.state().focus()
    }

    fn overlay(&self) -> Option<ElementId> {
        RangeSelectionEngine::overlay(self)
    }

    fn dismiss(&mut self, host: &mut dyn Host) {
        RangeSelectionEngine::dismiss(self, host)
    }
}

/// A selectable container with its surface fixed at construction.
pub struct Selectable {
    surface: Box<dyn SelectionSurface>,
}

impl Selectable {
    pub fn for_table(container: ElementId, config: SharedConfig) -> Self {
        Self {
            surface: Box::new(RangeSelectionEngine::new(container, TableRect, config)),
        }
    }

    pub fn for_list(container: ElementId, config: SharedConfig) -> Self {
        Self {
            surface: Box::new(RangeSelectionEngine::new(container, ListRun, config)),
        }
    }

    /// Table selection for a `table` container, list selection otherwise.
    pub fn detect<D: Dom + ?Sized>(dom: &D, container: ElementId, config: SharedConfig) -> Self {
        if strategy::has_tag(dom, container, TABLE_TAG) {
            Self::for_table(container, config)
        } else {
            Self::for_list(container, config)
        }
    }

    pub fn surface(&self) -> &dyn SelectionSurface {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> &mut dyn SelectionSurface {
        self.surface.as_mut()
    }

    pub fn pointer_down(&mut self, ev: PointerEvent, host: &mut dyn Host) -> bool {
        self.surface.on_pointer_down(ev, host)
    }

    pub fn pointer_move(&mut self, ev: PointerEvent, host: &mut dyn Host) -> bool {
        self.surface.on_pointer_move(ev, host)
    }

    /// Pointer up anywhere in the document; the surface decides from the hit
    /// test whether the anchor survives.
    pub fn pointer_up(&mut self, ev: PointerEvent, host: &mut dyn Host) {
        self.surface.on_pointer_up(ev, host)
    }

    /// Document-level pointer down. A press outside the container removes
    /// the overlay; one inside starts a new selection.
    pub fn document_pointer_down(&mut self, ev: PointerEvent, target: Option<ElementId>, host: &mut dyn Host) -> bool {
        let container = self.surface.container();
        match target {
            Some(target) if host.contains(container, target) => self.pointer_down(ev, host),
            _ => {
                if self.surface.overlay().is_some() {
                    debug!(container = ?container, "pointer down outside selection");
                    self.surface.dismiss(host);
                }
                false
            }
        }
    }

    pub fn subscribe(&mut self) -> Receiver<SelectionChange> {
        self.surface.subscribe()
    }

    pub fn selection(&self) -> SelectionChange {
        self.surface.selection()
    }

    pub fn anchor(&self) -> Option<ElementId> {
        self.surface.anchor()
    }

    pub fn focus(&self) -> Option<ElementId> {
        self.surface.focus()
    }

    pub fn overlay(&self) -> Option<ElementId> {
        self.surface.overlay()
    }
}
