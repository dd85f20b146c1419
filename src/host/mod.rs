//! Collaborator interfaces between the engines and whatever renders them.
//!
//! The engines never touch a real document. They call into three narrow
//! traits:
//!
//! - [`Dom`] - class/attribute/style mutation, tree edits and layout queries
//! - [`HitTest`] - elements under a viewport point, front to back
//! - [`Animator`] - position tweens with a completion the host reports back
//!
//! All mutations are synchronous and immediately observable: a hit test
//! issued right after `insert_before` sees the new order. Every method must
//! tolerate ids that were never issued or have been detached, by returning
//! `None`/`false`/empty or doing nothing.

pub mod memory;

use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Opaque handle to a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

/// Handle to a running tween, returned by [`Animator::tween_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

/// A pointer event as delivered by the host's event loop.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    /// Pointer position in viewport coordinates
    pub client: Point,
    /// Document scroll offset at dispatch time
    pub scroll: Point,
}

impl PointerEvent {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            client: Point::new(x, y),
            scroll: Point::default(),
        }
    }

    pub fn with_scroll(mut self, x: f32, y: f32) -> Self {
        self.scroll = Point::new(x, y);
        self
    }
}

/// DOM-mutation collaborator.
pub trait Dom {
    fn create_element(&mut self, tag: &str) -> ElementId;

    fn tag_name(&self, el: ElementId) -> Option<String>;

    /// Children in document order.
    fn children(&self, parent: ElementId) -> Vec<ElementId>;

    fn parent(&self, el: ElementId) -> Option<ElementId>;

    /// True when `el` is `ancestor` or lies anywhere beneath it.
    fn contains(&self, ancestor: ElementId, el: ElementId) -> bool {
        let mut current = Some(el);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool;
    fn add_class(&mut self, el: ElementId, class: &str);
    fn remove_class(&mut self, el: ElementId, class: &str);

    fn has_attribute(&self, el: ElementId, name: &str) -> bool;

    /// Removes an attribute. `"class"` and `"style"` clear the class list and
    /// the inline style respectively.
    fn remove_attribute(&mut self, el: ElementId, name: &str);

    fn style(&self, el: ElementId, property: &str) -> Option<String>;
    fn set_style(&mut self, el: ElementId, property: &str, value: &str);
    fn remove_style(&mut self, el: ElementId, property: &str);

    /// Inserts `node` into `parent` before `reference`, or appends when
    /// `reference` is `None` or not a child of `parent`. A node that is
    /// already attached elsewhere is moved.
    fn insert_before(&mut self, parent: ElementId, node: ElementId, reference: Option<ElementId>);

    fn append_child(&mut self, parent: ElementId, node: ElementId) {
        self.insert_before(parent, node, None);
    }

    /// Detaches `node` from its parent. The element stays valid.
    fn remove(&mut self, node: ElementId);

    /// Layout box in document coordinates, ignoring transforms
    /// (the `offsetTop`/`offsetLeft` view).
    fn offset_rect(&self, el: ElementId) -> Option<Rect>;

    /// Painted box in viewport coordinates, including transforms.
    fn bounding_rect(&self, el: ElementId) -> Option<Rect>;

    /// Document-level layer dragged items float in while they move.
    fn floating_layer(&self) -> ElementId;

    /// Nearest ancestor-or-self carrying `class`.
    fn closest_with_class(&self, el: ElementId, class: &str) -> Option<ElementId> {
        let mut current = Some(el);
        while let Some(node) = current {
            if self.has_class(node, class) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }
}

/// Hit-testing collaborator.
pub trait HitTest {
    /// Elements whose painted box contains `point` (viewport coordinates),
    /// topmost first.
    fn elements_at_point(&self, point: Point) -> Vec<ElementId>;
}

/// Animation collaborator.
pub trait Animator {
    /// Starts tweening `el` onto `target` (document coordinates). The host
    /// must later report completion of the returned id exactly once.
    fn tween_to(&mut self, el: ElementId, target: Rect, duration: Duration) -> AnimationId;
}

/// Everything an engine needs from its host.
pub trait Host: Dom + HitTest + Animator {}

impl<T: Dom + HitTest + Animator> Host for T {}

/// Parses a CSS pixel length such as `"12px"` or `"-40"`.
pub fn parse_px(value: &str) -> Option<f32> {
    value.trim().trim_end_matches("px").trim().parse().ok()
}

/// Formats a pixel length for `set_style`.
pub fn px(value: f32) -> String {
    format!("{value}px")
}

/// Reads the Y component of a `translateY(..px)` transform; anything else
/// (including no transform) is zero.
pub fn translate_y(transform: Option<&str>) -> f32 {
    transform
        .and_then(|t| t.trim().strip_prefix("translateY("))
        .and_then(|t| t.strip_suffix(')'))
        .and_then(parse_px)
        .unwrap_or(0.0)
}
