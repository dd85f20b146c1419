//! Drag-to-reorder for vertical lists, with optional hand-off between two
//! connected lists.
//!
//! Each container gets its own [`DragReorderEngine`]. A [`ReorderGroup`]
//! owns the engines of a page and routes pointer events to them: the engine
//! whose container was pressed starts the drag, moves go to whichever engine
//! currently owns it, and hand-offs are brokered through [`bridge`].

pub mod bridge;
pub mod engine;
pub mod indexer;
pub mod state;

pub use bridge::{SessionOffer, TransferOutcome};
pub use engine::{DragReorderEngine, DropOutcome, MoveOutcome, PickupOutcome};
pub use indexer::GeometryIndexer;
pub use state::{Direction, DragState};

use crate::config::SharedConfig;
use crate::host::{AnimationId, ElementId, Host, PointerEvent};
use std::sync::Arc;
use tracing::debug;

/// Handle to an engine inside a [`ReorderGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineId(pub usize);

pub struct ReorderGroup {
    engines: Vec<DragReorderEngine>,
    config: SharedConfig,
}

impl ReorderGroup {
    pub fn new(config: SharedConfig) -> Self {
        Self {
            engines: Vec::new(),
            config,
        }
    }

    /// Enables reordering inside `container`.
    pub fn add(&mut self, container: ElementId) -> EngineId {
        if let Some(id) = self.find(container) {
            return id;
        }
        self.engines
            .push(DragReorderEngine::new(container, Arc::clone(&self.config)));
        EngineId(self.engines.len() - 1)
    }

    /// Lets drags started in `from` continue into `to`. One-way.
    pub fn connect(&mut self, from: EngineId, to: EngineId) {
        let Some(peer) = self.engines.get(to.0).map(|e| e.container()) else {
            return;
        };
        if let Some(engine) = self.engines.get_mut(from.0) {
            engine.set_connected_to(Some(peer));
        }
    }

    /// Connects both ways.
    pub fn link(&mut self, a: EngineId, b: EngineId) {
        self.connect(a, b);
        self.connect(b, a);
    }

    pub fn engine(&self, id: EngineId) -> Option<&DragReorderEngine> {
        self.engines.get(id.0)
    }

    pub fn engines(&self) -> &[DragReorderEngine] {
        &self.engines
    }

    pub fn find(&self, container: ElementId) -> Option<EngineId> {
        self.engines
            .iter()
            .position(|e| e.container() == container)
            .map(EngineId)
    }

    /// Engine that currently owns the drag, if any.
    pub fn active(&self) -> Option<EngineId> {
        self.engines
            .iter()
            .position(|e| e.is_pointer_down())
            .map(EngineId)
    }

    fn peer_of(&self, id: EngineId) -> Option<EngineId> {
        let peer = self.engines.get(id.0)?.connected_to()?;
        self.find(peer)
    }

    fn pair_mut(
        &mut self,
        a: EngineId,
        b: EngineId,
    ) -> Option<(&mut DragReorderEngine, &mut DragReorderEngine)> {
        if a == b || a.0 >= self.engines.len() || b.0 >= self.engines.len() {
            return None;
        }
        if a.0 < b.0 {
            let (left, right) = self.engines.split_at_mut(b.0);
            Some((&mut left[a.0], &mut right[0]))
        } else {
            let (left, right) = self.engines.split_at_mut(a.0);
            Some((&mut right[0], &mut left[b.0]))
        }
    }

    pub fn pointer_down<H: Host + ?Sized>(&mut self, ev: PointerEvent, host: &mut H) -> bool {
        // A new press supersedes anything still running.
        for i in 0..self.engines.len() {
            if let DropOutcome::Completed { .. } = self.engines[i].teardown(host) {
                self.disarm_peers(EngineId(i), host);
            }
        }

        let hits = host.elements_at_point(ev.client);
        let Some(id) = hits.iter().find_map(|&el| {
            self.engines
                .iter()
                .position(|e| host.contains(e.container(), el))
                .map(EngineId)
        }) else {
            return false;
        };

        match self.engines[id.0].pointer_down(ev, host) {
            PickupOutcome::Started(mirror) => {
                if let Some(peer) = self.peer_of(id) {
                    self.engines[peer.0].arm_receive(mirror, host);
                }
                true
            }
            PickupOutcome::Ignored => false,
        }
    }

    pub fn pointer_move<H: Host + ?Sized>(&mut self, ev: PointerEvent, host: &mut H) -> MoveOutcome {
        let Some(id) = self.active() else {
            return MoveOutcome::Ignored;
        };
        let outcome = self.engines[id.0].pointer_move(ev, host);

        if let MoveOutcome::Offer(offer) = outcome {
            let transferred = match self.peer_of(id).and_then(|peer| self.pair_mut(id, peer)) {
                Some((origin, peer)) => bridge::transfer(origin, peer, offer, host) == TransferOutcome::Accepted,
                None => {
                    debug!(engine = id.0, "offer without a registered peer");
                    false
                }
            };
            // The origin still owns the drag.
            if !transferred {
                return MoveOutcome::Moved;
            }
        }
        outcome
    }

    pub fn pointer_up<H: Host + ?Sized>(&mut self, host: &mut H) -> Option<AnimationId> {
        let id = self.active()?;
        let animation = self.engines[id.0].pointer_up(host);
        if animation.is_none() && self.engines[id.0].state().is_idle() {
            self.disarm_peers(id, host);
        }
        animation
    }

    /// Forwards a finished tween to the engine waiting on it.
    pub fn animation_finished<H: Host + ?Sized>(&mut self, animation: AnimationId, host: &mut H) -> DropOutcome {
        let Some(i) = self
            .engines
            .iter()
            .position(|e| e.state().pending_animation() == Some(animation))
        else {
            debug!(animation = ?animation, "no engine waiting on animation");
            return DropOutcome::Ignored;
        };

        let outcome = self.engines[i].finish_drop(animation, host);
        if matches!(outcome, DropOutcome::Completed { .. }) {
            self.disarm_peers(EngineId(i), host);
        }
        outcome
    }

    /// Disarms every engine connected to `id` in either direction.
    fn disarm_peers<H: Host + ?Sized>(&mut self, id: EngineId, host: &mut H) {
        let Some(origin) = self.engines.get(id.0) else {
            return;
        };
        let container = origin.container();
        let connected = origin.connected_to();
        for (i, engine) in self.engines.iter_mut().enumerate() {
            if i == id.0 {
                continue;
            }
            if Some(engine.container()) == connected || engine.connected_to() == Some(container) {
                engine.disarm(host);
            }
        }
    }
}
