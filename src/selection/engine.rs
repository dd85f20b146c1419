//! Range selection state machine, shared by the list and table surfaces.
//!
//! ## State Transitions
//!
//! ```text
//! Empty     -> Anchoring  (pointer down over a unit)
//! Anchoring -> Extending  (pointer moved onto another unit)
//! Extending -> Extending  (pointer moved onto yet another unit)
//! any       -> Empty      (pointer up away from every unit)
//! ```
//!
//! The overlay is one absolutely positioned element inside the container,
//! placed with top/left/bottom/right insets. The insets captured at
//! pointer-down are kept, so extending only redraws the edges on the far side
//! of the anchor.

use crate::config::{EngineConfig, SharedConfig};
use crate::geometry::Edges;
use crate::host::{ElementId, Host, PointerEvent, px};
use crate::selection::strategy::{GridPos, SelectionStrategy};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Empty,
    Anchoring {
        anchor: ElementId,
    },
    Extending {
        anchor: ElementId,
        focus: ElementId,
    },
}

impl SelectionState {
    pub fn anchor(&self) -> Option<ElementId> {
        match *self {
            Self::Empty => None,
            Self::Anchoring { anchor } | Self::Extending { anchor, .. } => Some(anchor),
        }
    }

    pub fn focus(&self) -> Option<ElementId> {
        match *self {
            Self::Extending { focus, .. } => Some(focus),
            _ => None,
        }
    }
}

/// Snapshot sent to subscribers whenever the selected set is rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionChange {
    /// Selected units, row-major
    pub units: Vec<ElementId>,
    /// Grid position of each unit in `units`
    pub cells: Vec<GridPos>,
}

pub struct RangeSelectionEngine<S: SelectionStrategy> {
    container: ElementId,
    strategy: S,
    config: SharedConfig,
    state: SelectionState,
    pressed: bool,
    anchor_edges: Edges,
    selected: BTreeMap<GridPos, ElementId>,
    overlay: Option<ElementId>,
    subscribers: Vec<Sender<SelectionChange>>,
}

impl<S: SelectionStrategy> RangeSelectionEngine<S> {
    pub fn new(container: ElementId, strategy: S, config: SharedConfig) -> Self {
        Self {
            container,
            strategy,
            config,
            state: SelectionState::Empty,
            pressed: false,
            anchor_edges: Edges::default(),
            selected: BTreeMap::new(),
            overlay: None,
            subscribers: Vec::new(),
        }
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn overlay(&self) -> Option<ElementId> {
        self.overlay
    }

    pub fn change(&self) -> SelectionChange {
        SelectionChange {
            units: self.selected.values().copied().collect(),
            cells: self.selected.keys().copied().collect(),
        }
    }

    pub fn subscribe(&mut self) -> Receiver<SelectionChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self) {
        let change = self.change();
        // Dropped receivers unsubscribe.
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }

    fn unit_under<H: Host + ?Sized>(&self, ev: PointerEvent, host: &H, cfg: &EngineConfig) -> Option<ElementId> {
        host.elements_at_point(ev.client)
            .into_iter()
            .find(|&el| self.strategy.is_unit(host, self.container, el, cfg))
    }

    /// Insets of `unit`'s box inside the container.
    fn edges_of<H: Host + ?Sized>(&self, host: &H, unit: ElementId, cfg: &EngineConfig) -> Option<Edges> {
        let inner = host.bounding_rect(unit)?;
        let outer = host.bounding_rect(self.container)?;
        Some(Edges::within(inner, outer, self.strategy.edge_outset(&cfg.selection)))
    }

    fn paint<H: Host + ?Sized>(&self, host: &mut H, edges: Edges) {
        let Some(overlay) = self.overlay else {
            return;
        };
        host.set_style(overlay, "top", &px(edges.top));
        host.set_style(overlay, "left", &px(edges.left));
        host.set_style(overlay, "bottom", &px(edges.bottom));
        host.set_style(overlay, "right", &px(edges.right));
    }

    /// Reuses the overlay while it is still inside the container.
    fn ensure_overlay<H: Host + ?Sized>(&mut self, host: &mut H, cfg: &EngineConfig) -> ElementId {
        if let Some(overlay) = self.overlay {
            if host.parent(overlay) == Some(self.container) {
                return overlay;
            }
        }
        let overlay = host.create_element("div");
        host.add_class(overlay, &cfg.classes.selection_overlay);
        host.set_style(overlay, "position", "absolute");
        host.append_child(self.container, overlay);
        self.overlay = Some(overlay);
        overlay
    }

    pub fn pointer_down<H: Host + ?Sized>(&mut self, ev: PointerEvent, host: &mut H) -> bool {
        crate::profile_scope!("selection.pointer_down");

        let config = Arc::clone(&self.config);
        let cfg = config.read();

        let hit = self.unit_under(ev, &*host, &cfg).and_then(|anchor| {
            let pos = self.strategy.locate(&*host, self.container, anchor, &cfg)?;
            let edges = self.edges_of(&*host, anchor, &cfg)?;
            Some((anchor, pos, edges))
        });
        let Some((anchor, pos, edges)) = hit else {
            // The prior selection is cleared all the same.
            debug!(surface = self.strategy.name(), "pointer down off any unit");
            self.dismiss(host);
            return false;
        };

        self.selected.clear();
        self.pressed = true;
        self.ensure_overlay(host, &cfg);
        host.set_style(self.container, "user-select", "none");
        self.anchor_edges = edges;
        self.paint(host, edges);

        self.state = SelectionState::Anchoring { anchor };
        self.selected.insert(pos, anchor);
        self.emit();
        debug!(surface = self.strategy.name(), row = pos.row, col = pos.col, "selection anchored");
        true
    }

    pub fn pointer_move<H: Host + ?Sized>(&mut self, ev: PointerEvent, host: &mut H) -> bool {
        crate::profile_scope!("selection.pointer_move");

        if !self.pressed {
            return false;
        }
        let Some(anchor) = self.state.anchor() else {
            return false;
        };

        let config = Arc::clone(&self.config);
        let cfg = config.read();

        let Some(focus) = self.unit_under(ev, &*host, &cfg) else {
            return false;
        };
        if self.state.focus() == Some(focus) {
            return false;
        }
        self.state = SelectionState::Extending { anchor, focus };

        let (Some(from), Some(to)) = (
            self.strategy.locate(&*host, self.container, anchor, &cfg),
            self.strategy.locate(&*host, self.container, focus, &cfg),
        ) else {
            debug!(surface = self.strategy.name(), "anchor or focus left the surface");
            return false;
        };

        if let Some(edges) = self.extent(&*host, anchor, focus, from, to, &cfg) {
            self.paint(host, edges);
        }
        self.rebuild(&*host, from, to, &cfg);
        self.emit();
        trace!(surface = self.strategy.name(), ?from, ?to, selected = self.selected.len(), "selection extended");
        true
    }

    /// Overlay insets for the rectangle spanned by anchor and focus. The
    /// edges on the anchor's side come from the insets captured at pointer
    /// down; the far edges come from the focus box.
    fn extent<H: Host + ?Sized>(
        &self,
        host: &H,
        anchor: ElementId,
        focus: ElementId,
        from: GridPos,
        to: GridPos,
        cfg: &EngineConfig,
    ) -> Option<Edges> {
        if anchor == focus {
            return Some(self.anchor_edges);
        }
        let focus_edges = self.edges_of(&*host, focus, cfg)?;
        let mut edges = self.anchor_edges;

        if from.row > to.row {
            edges.top = focus_edges.top;
        } else {
            edges.bottom = focus_edges.bottom;
        }

        if self.strategy.spans_columns() {
            if from.col > to.col {
                edges.left = focus_edges.left;
            } else {
                edges.right = focus_edges.right;
            }
        }
        Some(edges)
    }

    /// Recomputes the selected set as every unit between `from` and `to`,
    /// inclusive on both axes.
    fn rebuild<H: Host + ?Sized>(&mut self, host: &H, from: GridPos, to: GridPos, cfg: &EngineConfig) {
        let rows = from.row.min(to.row)..=from.row.max(to.row);
        let cols = if self.strategy.spans_columns() {
            from.col.min(to.col)..=from.col.max(to.col)
        } else {
            0..=0
        };

        self.selected.clear();
        for row in rows {
            for col in cols.clone() {
                let pos = GridPos::new(row, col);
                if let Some(unit) = self.strategy.unit_at(host, self.container, pos, cfg) {
                    self.selected.insert(pos, unit);
                }
            }
        }
    }

    /// Releases the pointer. Off any unit the anchor and focus are dropped;
    /// the selected set and overlay stay until the next pointer down.
    pub fn pointer_up<H: Host + ?Sized>(&mut self, ev: PointerEvent, host: &mut H) {
        self.pressed = false;

        let config = Arc::clone(&self.config);
        let cfg = config.read();
        if self.unit_under(ev, &*host, &cfg).is_some() {
            return;
        }
        if self.state != SelectionState::Empty {
            trace!(surface = self.strategy.name(), "anchor released");
            self.state = SelectionState::Empty;
        }
    }

    /// Removes the overlay and forgets the selection.
    pub fn dismiss<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(overlay) = self.overlay.take() {
            host.remove(overlay);
        }
        host.remove_style(self.container, "user-select");
        self.state = SelectionState::Empty;
        self.pressed = false;
        if !self.selected.is_empty() {
            self.selected.clear();
            self.emit();
        }
    }
}
