//! Logical index bookkeeping for elements that are visually displaced.
//!
//! While a drag is running, siblings slide up or down by whole slots to make
//! room, but the container's child order does not change until the drop. The
//! logical index of an element is therefore its position in the child order
//! plus the number of slots it has been shifted.
//!
//! Shifts are kept here as integers and the `translateY` style is written
//! from them, never the other way round. Elements the indexer has not shifted
//! itself are read from their transform, which must be a whole number of
//! slots (see [`slots_from_translation`]).

use crate::error::{EngineError, EngineResult};
use crate::host::{Dom, ElementId, translate_y};
use crate::reorder::state::Direction;
use std::collections::HashMap;
use tracing::warn;

/// Converts a translation into a slot count. Fails unless the translation is
/// a whole multiple of `element_size`.
pub fn slots_from_translation(translation: f32, element_size: f32) -> EngineResult<i32> {
    if translation == 0.0 {
        return Ok(0);
    }
    let slots = translation / element_size;
    if element_size > 0.0 && slots.fract() == 0.0 {
        Ok(slots as i32)
    } else {
        Err(EngineError::GeometryInconsistency {
            translation,
            element_size,
        })
    }
}

/// Like [`slots_from_translation`], but truncates toward zero on a
/// non-multiple instead of failing.
pub fn truncated_slots(translation: f32, element_size: f32) -> i32 {
    slots_from_translation(translation, element_size).unwrap_or_else(|e| {
        warn!(error = %e, "truncating translation to whole slots");
        if element_size > 0.0 {
            (translation / element_size).trunc() as i32
        } else {
            0
        }
    })
}

#[derive(Debug, Clone)]
pub struct GeometryIndexer {
    element_size: f32,
    shifts: HashMap<ElementId, i32>,
}

impl GeometryIndexer {
    pub fn new(element_size: f32) -> Self {
        Self {
            element_size,
            shifts: HashMap::new(),
        }
    }

    pub fn element_size(&self) -> f32 {
        self.element_size
    }

    /// Slots `el` is currently displaced by; positive is downwards.
    pub fn shift_of<D: Dom + ?Sized>(&self, dom: &D, el: ElementId) -> i32 {
        match self.shifts.get(&el) {
            Some(&shift) => shift,
            None => truncated_slots(
                translate_y(dom.style(el, "transform").as_deref()),
                self.element_size,
            ),
        }
    }

    /// Logical index of `el` within `container`, or `None` when `el` is not a
    /// child of it. May be negative or past the end for a corrupted shift.
    pub fn index_of<D: Dom + ?Sized>(&self, dom: &D, container: ElementId, el: ElementId) -> Option<isize> {
        let base = dom.children(container).iter().position(|&c| c == el)?;
        Some(base as isize + self.shift_of(dom, el) as isize)
    }

    /// Records a shift and projects it onto the element's transform.
    pub fn set_shift<D: Dom + ?Sized>(&mut self, dom: &mut D, el: ElementId, shift: i32) {
        self.shifts.insert(el, shift);
        let translation = shift as f32 * self.element_size;
        dom.set_style(el, "transform", &format!("translateY({translation}px)"));
    }

    /// A sibling that has been displaced snaps back to its own slot; one at
    /// rest slides one slot against the travel direction.
    pub fn step_sibling<D: Dom + ?Sized>(&mut self, dom: &mut D, el: ElementId, direction: Direction) {
        let next = match self.shift_of(dom, el) {
            -1 | 1 => 0,
            0 => -direction.sign(),
            other => other,
        };
        self.set_shift(dom, el, next);
    }

    /// The placeholder moves one slot with the travel direction and may
    /// accumulate several slots.
    pub fn step_placeholder<D: Dom + ?Sized>(&mut self, dom: &mut D, placeholder: ElementId, direction: Direction) {
        let next = self.shift_of(dom, placeholder) + direction.sign();
        self.set_shift(dom, placeholder, next);
    }
}
