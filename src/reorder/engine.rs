//! Drag-reorder engine for a single container.
//!
//! ## Performance Notes
//!
//! `pointer_move` runs for every mouse move of a drag. It repositions the
//! floating item on every call but only reflows siblings when the element
//! under the pointer changes, so most ticks are a style write and one hit
//! test.
//!
//! Enable profiling with `cargo build --features profiling` to see timing.

use crate::config::{EngineConfig, SharedConfig};
use crate::error::{EngineError, EngineResult};
use crate::geometry::{Point, Rect, Size};
use crate::host::{AnimationId, ElementId, Host, PointerEvent, px};
use crate::reorder::bridge::{SessionOffer, TransferOutcome};
use crate::reorder::indexer::GeometryIndexer;
use crate::reorder::state::{Direction, DragSession, DragState, PendingDrop, SessionMirror};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Inline styles the engine puts on a floating item.
const FLOATING_STYLES: [&str; 6] = ["position", "top", "left", "width", "height", "user-select"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickupOutcome {
    Ignored,
    /// Drag started; the mirror is meant for the connected peer
    Started(SessionMirror),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// No drag in progress
    Ignored,
    /// Item followed the pointer; hover target unchanged or not reflowable
    Moved,
    /// Hover target changed and siblings slid to make room
    Reflowed(Direction),
    /// Pointer entered the receiving peer; the session should be handed over.
    /// [`super::ReorderGroup`] passes it on only once the peer accepted.
    Offer(SessionOffer),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropOutcome {
    Ignored,
    /// Item is back in the container's child order at `index`
    Completed { item: ElementId, index: usize },
}

pub struct DragReorderEngine {
    container: ElementId,
    connected_to: Option<ElementId>,
    state: DragState,
    config: SharedConfig,
}

impl DragReorderEngine {
    pub fn new(container: ElementId, config: SharedConfig) -> Self {
        Self {
            container,
            connected_to: None,
            state: DragState::Idle,
            config,
        }
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    /// Container of the peer this engine may hand its drag to.
    pub fn connected_to(&self) -> Option<ElementId> {
        self.connected_to
    }

    pub fn set_connected_to(&mut self, peer: Option<ElementId>) {
        self.connected_to = peer.filter(|&p| p != self.container);
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// True while this engine owns the pointer.
    pub fn is_pointer_down(&self) -> bool {
        self.state.is_dragging()
    }

    pub fn is_receiving(&self) -> bool {
        self.state.is_receiving()
    }

    pub fn dragged_item(&self) -> Option<ElementId> {
        self.state.session().map(|s| s.item)
    }

    pub fn placeholder(&self) -> Option<ElementId> {
        self.state.session().map(|s| s.placeholder)
    }

    /// Logical slot the dragged item would land in if dropped now.
    pub fn placeholder_index<H: Host + ?Sized>(&self, host: &H) -> Option<isize> {
        let session = self.state.session()?;
        session
            .indexer
            .index_of(host, self.container, session.placeholder)
    }

    /// Logical index of any child while a drag is running.
    pub fn index_of<H: Host + ?Sized>(&self, host: &H, el: ElementId) -> Option<isize> {
        self.state.session()?.indexer.index_of(host, self.container, el)
    }

    // ========================================================================
    // Pointer down
    // ========================================================================

    pub fn pointer_down<H: Host + ?Sized>(&mut self, ev: PointerEvent, host: &mut H) -> PickupOutcome {
        crate::profile_scope!("reorder.pointer_down");

        if !self.state.is_idle() {
            debug!(container = ?self.container, "pointer down while busy");
            return PickupOutcome::Ignored;
        }

        let config = Arc::clone(&self.config);
        let cfg = config.read();
        match self.pick_up(ev, host, &cfg) {
            Ok(mirror) => PickupOutcome::Started(mirror),
            Err(e) => {
                debug!(error = %e, container = ?self.container, "pointer down ignored");
                PickupOutcome::Ignored
            }
        }
    }

    fn is_draggable<H: Host + ?Sized>(&self, host: &H, el: ElementId, cfg: &EngineConfig) -> bool {
        host.parent(el) == Some(self.container)
            && host.has_attribute(el, &cfg.markers.list_drag)
            && !host.has_class(el, &cfg.classes.empty_list)
            && !host.has_class(el, &cfg.classes.placeholder)
    }

    fn pick_up<H: Host + ?Sized>(
        &mut self,
        ev: PointerEvent,
        host: &mut H,
        cfg: &EngineConfig,
    ) -> EngineResult<SessionMirror> {
        let classes = &cfg.classes;
        let item = host
            .elements_at_point(ev.client)
            .into_iter()
            .find(|&el| self.is_draggable(&*host, el, cfg))
            .ok_or(EngineError::MissingTarget)?;

        let rect = host.offset_rect(item).ok_or(EngineError::StaleReference(item))?;
        let element_size = host.bounding_rect(item).map_or(rect.height, |r| r.height);
        let initial = rect.origin();
        let pointer_offset = Point::new(
            ev.client.x - initial.x - ev.scroll.x,
            ev.client.y - initial.y - ev.scroll.y,
        );

        let placeholder = create_placeholder(host, rect.size(), cfg);
        host.insert_before(self.container, placeholder, Some(item));
        host.remove(item);

        host.remove_class(item, &classes.list_drag);
        host.add_class(item, &classes.dragging);
        host.add_class(self.container, &classes.host_drag);
        host.set_style(self.container, "user-select", "none");
        host.set_style(item, "user-select", "none");

        host.set_style(item, "position", "absolute");
        host.set_style(item, "top", &px(initial.y));
        host.set_style(item, "left", &px(initial.x));
        host.set_style(item, "width", &px(rect.width));
        host.set_style(item, "height", &px(rect.height));
        let layer = host.floating_layer();
        host.append_child(layer, item);

        for child in host.children(self.container) {
            host.add_class(child, &classes.list_drag);
        }

        let session = DragSession {
            item,
            placeholder,
            item_size: rect.size(),
            initial,
            pointer_offset,
            scroll_baseline: ev.scroll,
            scroll_correction: 0.0,
            direction: None,
            previous_target: None,
            indexer: GeometryIndexer::new(element_size),
        };
        let mirror = session.mirror();
        self.state = DragState::Dragging(session);

        info!(container = ?self.container, item = ?item, element_size, "drag started");
        Ok(mirror)
    }

    // ========================================================================
    // Pointer move
    // ========================================================================

    pub fn pointer_move<H: Host + ?Sized>(&mut self, ev: PointerEvent, host: &mut H) -> MoveOutcome {
        crate::profile_scope!("reorder.pointer_move");

        let config = Arc::clone(&self.config);
        let cfg = config.read();
        let container = self.container;
        let peer = self.connected_to;

        let DragState::Dragging(session) = &mut self.state else {
            return MoveOutcome::Ignored;
        };

        follow_pointer(session, ev, host);

        let hits = host.elements_at_point(ev.client);
        let target = hits.iter().copied().find(|&el| {
            host.has_attribute(el, &cfg.markers.list_drag) && !host.has_class(el, &cfg.classes.dragging)
        });

        if target != session.previous_target {
            session.previous_target = target;

            if let Some(target) = target {
                if peer.is_some() && host.closest_with_class(target, &cfg.classes.host_receive) == peer {
                    return MoveOutcome::Offer(make_offer(container, session, Some(target)));
                }
                if host.parent(target) != Some(container) {
                    debug!(target = ?target, "hover target outside the container");
                    return MoveOutcome::Moved;
                }
                return match reflow(container, session, target, host) {
                    Ok(direction) => MoveOutcome::Reflowed(direction),
                    Err(e) => {
                        debug!(error = %e, "reflow skipped");
                        MoveOutcome::Moved
                    }
                };
            }
        }

        // An empty peer has no items to hover, so the peer itself is the target.
        if target.is_none() {
            if let Some(peer) = peer {
                let over_empty_receiver = hits.contains(&peer)
                    && host.has_class(peer, &cfg.classes.host_receive)
                    && !host
                        .children(peer)
                        .iter()
                        .any(|&c| host.has_attribute(c, &cfg.markers.list_drag));
                if over_empty_receiver {
                    return MoveOutcome::Offer(make_offer(container, session, None));
                }
            }
        }

        MoveOutcome::Moved
    }

    // ========================================================================
    // Pointer up / drop
    // ========================================================================

    /// Starts the drop tween. Returns the animation the host must report back
    /// through [`Self::finish_drop`].
    ///
    /// The pointer is released either way: when the drop slot cannot be
    /// resolved the item lands without a tween and `None` is returned.
    pub fn pointer_up<H: Host + ?Sized>(&mut self, host: &mut H) -> Option<AnimationId> {
        crate::profile_scope!("reorder.pointer_up");

        let DragState::Dragging(session) = &self.state else {
            debug!(container = ?self.container, "pointer up without an active drag");
            return None;
        };

        let resolved = {
            let config = Arc::clone(&self.config);
            let cfg = config.read();
            resolve_drop(self.container, session, host, &cfg)
        };

        match resolved {
            Ok(pending) => {
                let animation = pending.animation;
                debug!(index = pending.index, animation = ?animation, "drop tween started");
                self.state = DragState::Dropping(pending);
                Some(animation)
            }
            Err(e) => {
                debug!(error = %e, "drop slot unresolved, landing in place");
                self.teardown(host);
                None
            }
        }
    }

    /// Completes the drop once its tween has finished. Unknown or repeated
    /// animation ids are ignored.
    pub fn finish_drop<H: Host + ?Sized>(&mut self, animation: AnimationId, host: &mut H) -> DropOutcome {
        if self.state.pending_animation() != Some(animation) {
            debug!(animation = ?animation, "stale drop completion");
            return DropOutcome::Ignored;
        }
        let DragState::Dropping(pending) = self.state.take() else {
            return DropOutcome::Ignored;
        };
        self.complete_drop(pending.item, pending.placeholder, pending.index, host)
    }

    /// Ends whatever this engine is doing so a new pointer-down can start
    /// clean. A running drag lands in its placeholder slot without a tween.
    pub fn teardown<H: Host + ?Sized>(&mut self, host: &mut H) -> DropOutcome {
        match self.state.take() {
            DragState::Idle => DropOutcome::Ignored,
            DragState::Receiving(_) => {
                let config = Arc::clone(&self.config);
                host.remove_class(self.container, &config.read().classes.host_receive);
                DropOutcome::Ignored
            }
            DragState::Dragging(session) => {
                let index = session
                    .indexer
                    .index_of(&*host, self.container, session.placeholder)
                    .map_or(usize::MAX, |i| i.max(0) as usize);
                self.complete_drop(session.item, session.placeholder, index, host)
            }
            DragState::Dropping(pending) => {
                self.complete_drop(pending.item, pending.placeholder, pending.index, host)
            }
        }
    }

    fn complete_drop<H: Host + ?Sized>(
        &mut self,
        item: ElementId,
        placeholder: ElementId,
        index: usize,
        host: &mut H,
    ) -> DropOutcome {
        let config = Arc::clone(&self.config);
        let cfg = config.read();
        self.clear_container(host, placeholder, Some((item, index)), &cfg);
        // An unresolved slot appends, so report where the item really is.
        let index = host
            .children(self.container)
            .iter()
            .position(|&c| c == item)
            .unwrap_or(index);
        self.state = DragState::Idle;
        info!(container = ?self.container, item = ?item, index, "item dropped");
        DropOutcome::Completed { item, index }
    }

    /// Removes every transient cue from the container. With `reinsert`, the
    /// item goes back into the child order before whatever occupies `index`
    /// once the placeholder is gone.
    fn clear_container<H: Host + ?Sized>(
        &self,
        host: &mut H,
        placeholder: ElementId,
        reinsert: Option<(ElementId, usize)>,
        cfg: &EngineConfig,
    ) {
        let classes = &cfg.classes;

        host.remove_attribute(placeholder, "style");
        host.remove_attribute(placeholder, "class");
        host.remove(placeholder);

        if let Some((item, index)) = reinsert {
            let reference = host.children(self.container).get(index).copied();
            clear_floating(host, item, cfg);
            host.insert_before(self.container, item, reference);
        }

        for child in host.children(self.container) {
            host.remove_class(child, &classes.list_drag);
            host.remove_class(child, &classes.dragging);
            host.remove_style(child, "transform");
        }
        host.remove_style(self.container, "user-select");
        host.remove_class(self.container, &classes.host_drag);
    }

    // ========================================================================
    // Connected container hand-off
    // ========================================================================

    /// Marks this container as ready to accept the peer's drag.
    pub fn arm_receive<H: Host + ?Sized>(&mut self, mirror: SessionMirror, host: &mut H) -> bool {
        if !self.state.is_idle() {
            debug!(container = ?self.container, "cannot arm a busy engine");
            return false;
        }
        let config = Arc::clone(&self.config);
        host.add_class(self.container, &config.read().classes.host_receive);
        self.state = DragState::Receiving(mirror);
        true
    }

    /// Clears receive cues, and any session this engine still holds, after
    /// the drag ended elsewhere.
    pub fn disarm<H: Host + ?Sized>(&mut self, host: &mut H) {
        let config = Arc::clone(&self.config);
        let cfg = config.read();
        match self.state.take() {
            DragState::Idle | DragState::Receiving(_) => {}
            DragState::Dragging(session) => {
                self.clear_container(host, session.placeholder, None, &cfg);
                clear_floating(host, session.item, &cfg);
            }
            pending @ DragState::Dropping(_) => {
                self.state = pending;
                return;
            }
        }
        host.remove_class(self.container, &cfg.classes.host_receive);
    }

    /// Peer side of the hand-off: adopts the offered drag if this engine is
    /// receiving.
    pub fn offer_session<H: Host + ?Sized>(&mut self, offer: SessionOffer, host: &mut H) -> TransferOutcome {
        let DragState::Receiving(mirror) = self.state else {
            return TransferOutcome::Declined("not receiving");
        };
        if offer.origin == self.container {
            return TransferOutcome::Declined("offer from self");
        }

        let config = Arc::clone(&self.config);
        let cfg = config.read();
        let classes = &cfg.classes;

        host.set_style(self.container, "user-select", "none");
        host.remove_class(self.container, &classes.host_receive);
        host.add_class(self.container, &classes.host_drag);
        for child in host.children(self.container) {
            host.add_class(child, &classes.list_drag);
        }

        let placeholder = create_placeholder(host, offer.item_size, &cfg);
        let reference = offer
            .target
            .filter(|&t| host.parent(t) == Some(self.container));
        host.insert_before(self.container, placeholder, reference);

        self.state = DragState::Dragging(DragSession {
            item: offer.item,
            placeholder,
            item_size: offer.item_size,
            initial: mirror.initial,
            pointer_offset: mirror.pointer_offset,
            scroll_baseline: offer.scroll_baseline,
            scroll_correction: offer.scroll_correction,
            direction: None,
            previous_target: offer.target,
            indexer: GeometryIndexer::new(offer.element_size),
        });
        TransferOutcome::Accepted
    }

    /// Origin side of an accepted hand-off: tears down local cues without
    /// reinserting the item and becomes a receiver for a drag back.
    pub fn release_session<H: Host + ?Sized>(&mut self, host: &mut H) {
        let session = match self.state.take() {
            DragState::Dragging(session) => session,
            other => {
                self.state = other;
                return;
            }
        };
        let config = Arc::clone(&self.config);
        let cfg = config.read();
        self.clear_container(host, session.placeholder, None, &cfg);
        host.add_class(self.container, &cfg.classes.host_receive);
        self.state = DragState::Receiving(session.mirror());
    }
}

fn create_placeholder<H: Host + ?Sized>(host: &mut H, size: Size, cfg: &EngineConfig) -> ElementId {
    let placeholder = host.create_element("div");
    host.set_style(placeholder, "width", &px(size.width));
    host.set_style(placeholder, "height", &px(size.height));
    host.add_class(placeholder, &cfg.classes.placeholder);
    placeholder
}

fn clear_floating<H: Host + ?Sized>(host: &mut H, item: ElementId, cfg: &EngineConfig) {
    host.remove_class(item, &cfg.classes.dragging);
    host.remove_class(item, &cfg.classes.list_drag);
    for property in FLOATING_STYLES {
        host.remove_style(item, property);
    }
}

/// Moves the floating item under the pointer.
///
/// A scroll jump of exactly one slot between ticks comes from the container
/// growing or shrinking under the pointer, not from the user; it is
/// cancelled with a two-slot correction. Any other scroll change just moves
/// the baseline.
fn follow_pointer<H: Host + ?Sized>(session: &mut DragSession, ev: PointerEvent, host: &mut H) {
    let drift = ev.scroll.y - session.scroll_baseline.y;
    if drift != 0.0 {
        if (drift.abs() - session.element_size()).abs() < f32::EPSILON {
            session.scroll_correction += 2.0 * drift;
            trace!(drift, correction = session.scroll_correction, "reflow scroll jump");
        }
        session.scroll_baseline = ev.scroll;
    }

    let top = ev.client.y - session.pointer_offset.y - ev.scroll.y + session.scroll_correction;
    let left = ev.client.x - session.pointer_offset.x - ev.scroll.x;
    host.set_style(session.item, "top", &px(top));
    host.set_style(session.item, "left", &px(left));
}

fn reflow<H: Host + ?Sized>(
    container: ElementId,
    session: &mut DragSession,
    target: ElementId,
    host: &mut H,
) -> EngineResult<Direction> {
    let placeholder_index = session
        .indexer
        .index_of(&*host, container, session.placeholder)
        .ok_or(EngineError::StaleReference(session.placeholder))?;
    let target_index = session
        .indexer
        .index_of(&*host, container, target)
        .ok_or(EngineError::StaleReference(target))?;

    let direction = Direction::between(placeholder_index, target_index);
    session.direction = Some(direction);
    drag_operation(container, session, host, target_index, placeholder_index, direction);

    trace!(placeholder_index, target_index, ?direction, "reflowed");
    Ok(direction)
}

/// Slides every item between the target and the placeholder one slot toward
/// the vacated slot; the placeholder moves one slot the other way per item.
fn drag_operation<H: Host + ?Sized>(
    container: ElementId,
    session: &mut DragSession,
    host: &mut H,
    target_index: isize,
    placeholder_index: isize,
    direction: Direction,
) {
    let range = match direction {
        Direction::Up => target_index..=placeholder_index,
        Direction::Down => placeholder_index..=target_index,
    };
    let placeholder = session.placeholder;
    let shifted: Vec<ElementId> = host
        .children(container)
        .into_iter()
        .filter(|&c| c != placeholder)
        .filter(|&c| {
            session
                .indexer
                .index_of(&*host, container, c)
                .is_some_and(|i| range.contains(&i))
        })
        .collect();

    for item in shifted {
        session.indexer.step_sibling(host, item, direction);
        session.indexer.step_placeholder(host, placeholder, direction);
    }
}

fn make_offer(container: ElementId, session: &DragSession, target: Option<ElementId>) -> SessionOffer {
    SessionOffer {
        origin: container,
        item: session.item,
        item_size: session.item_size,
        element_size: session.element_size(),
        target,
        scroll_baseline: session.scroll_baseline,
        scroll_correction: session.scroll_correction,
    }
}

fn resolve_drop<H: Host + ?Sized>(
    container: ElementId,
    session: &DragSession,
    host: &mut H,
    cfg: &EngineConfig,
) -> EngineResult<PendingDrop> {
    let index = session
        .indexer
        .index_of(&*host, container, session.placeholder)
        .ok_or(EngineError::StaleReference(session.placeholder))?;
    let index = usize::try_from(index).map_err(|_| EngineError::MissingTarget)?;

    let slot = host
        .children(container)
        .get(index)
        .copied()
        .ok_or(EngineError::MissingTarget)?;
    let rect = host.offset_rect(slot).ok_or(EngineError::StaleReference(slot))?;

    let target = Rect::from_origin_size(rect.origin(), session.item_size);
    let animation = host.tween_to(session.item, target, cfg.drop_animation());
    Ok(PendingDrop {
        animation,
        item: session.item,
        placeholder: session.placeholder,
        index,
    })
}
