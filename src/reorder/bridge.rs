//! Hand-off protocol between two connected reorder engines.
//!
//! An engine never writes into its peer. The origin describes the in-flight
//! drag as a [`SessionOffer`]; the peer accepts it only while it is
//! receiving; only then does the origin release its own session. Both steps
//! happen inside the same pointer-move dispatch, so after the tick exactly
//! one of the two engines owns the drag.

use crate::geometry::{Point, Size};
use crate::host::{ElementId, Host};
use crate::reorder::engine::DragReorderEngine;
use serde::Serialize;
use tracing::{debug, info};

/// What a peer needs to continue someone else's drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionOffer {
    /// Container the drag is leaving
    pub origin: ElementId,
    pub item: ElementId,
    pub item_size: Size,
    /// Slot quantum: the item's height at pick-up
    pub element_size: f32,
    /// Peer item under the pointer; `None` when the peer is empty
    pub target: Option<ElementId>,
    pub scroll_baseline: Point,
    pub scroll_correction: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransferOutcome {
    Accepted,
    Declined(&'static str),
}

/// Offers the origin's session to `peer`; on acceptance the origin releases
/// it and turns into a receiver itself.
pub fn transfer<H: Host + ?Sized>(
    origin: &mut DragReorderEngine,
    peer: &mut DragReorderEngine,
    offer: SessionOffer,
    host: &mut H,
) -> TransferOutcome {
    let outcome = peer.offer_session(offer, host);
    match outcome {
        TransferOutcome::Accepted => {
            origin.release_session(host);
            info!(
                from = ?origin.container(),
                to = ?peer.container(),
                item = ?offer.item,
                "drag handed off"
            );
        }
        TransferOutcome::Declined(reason) => {
            debug!(reason, to = ?peer.container(), "hand-off declined");
        }
    }
    outcome
}
