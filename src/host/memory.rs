//! In-memory host: a small element tree with block layout, inline styles,
//! R-tree hit testing and recorded tweens.
//!
//! ## Layout rules
//!
//! - children of an ordinary element stack vertically
//! - children of a `tr` flow horizontally
//! - `position: absolute` elements are out of flow, placed by `top`/`left`
//!   (plus `width`/`height`, or `right`/`bottom` insets) inside their parent
//! - `transform: translateY(..)` moves the painted box of the element and its
//!   descendants but never its layout box
//!
//! The root element doubles as the document body and the floating layer.

use crate::geometry::{Point, Rect, Size};
use crate::host::{AnimationId, Animator, Dom, ElementId, HitTest, parse_px, px, translate_y};
use crate::spatial_index::{SpatialEntry, SpatialIndex};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::trace;

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    children: Vec<ElementId>,
    parent: Option<ElementId>,
    intrinsic: Option<Size>,
}

/// A tween recorded by [`MemoryDom`] until [`MemoryDom::finish_animations`].
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub id: AnimationId,
    pub element: ElementId,
    pub target: Rect,
    pub duration: Duration,
}

/// Serializable view of a subtree, for assertions and snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub tag: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

pub struct MemoryDom {
    nodes: HashMap<ElementId, Node>,
    root: ElementId,
    next_id: u64,
    scroll: Point,
    tweens: Vec<Tween>,
    next_animation: u64,
    hit_cache: RefCell<Option<SpatialIndex>>,
}

impl MemoryDom {
    pub fn new() -> Self {
        let root = ElementId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                tag: "body".to_string(),
                ..Node::default()
            },
        );
        Self {
            nodes,
            root,
            next_id: 1,
            scroll: Point::default(),
            tweens: Vec::new(),
            next_animation: 1,
            hit_cache: RefCell::new(None),
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Creates an element with an intrinsic size and appends it to `parent`.
    pub fn add_sized(&mut self, parent: ElementId, tag: &str, size: Size) -> ElementId {
        let el = self.create_element(tag);
        self.set_size(el, size);
        self.append_child(parent, el);
        el
    }

    /// Creates a size-less element (sized by its children) under `parent`.
    pub fn add(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let el = self.create_element(tag);
        self.append_child(parent, el);
        el
    }

    pub fn set_size(&mut self, el: ElementId, size: Size) {
        if let Some(node) = self.nodes.get_mut(&el) {
            node.intrinsic = Some(size);
            self.invalidate();
        }
    }

    pub fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(&el) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    /// Places `el` out of flow at `top`/`left` inside its parent.
    pub fn place_absolute(&mut self, el: ElementId, left: f32, top: f32) {
        self.set_style(el, "position", "absolute");
        self.set_style(el, "left", &px(left));
        self.set_style(el, "top", &px(top));
    }

    pub fn scroll(&self) -> Point {
        self.scroll
    }

    pub fn set_scroll(&mut self, scroll: Point) {
        self.scroll = scroll;
    }

    pub fn classes(&self, el: ElementId) -> Vec<String> {
        self.nodes
            .get(&el)
            .map(|n| n.classes.clone())
            .unwrap_or_default()
    }

    pub fn is_attached(&self, el: ElementId) -> bool {
        self.contains(self.root, el)
    }

    pub fn pending_animations(&self) -> &[Tween] {
        &self.tweens
    }

    /// Plays every pending tween to its end: the element lands on the
    /// target's top/left. Returns the finished ids in start order.
    pub fn finish_animations(&mut self) -> Vec<AnimationId> {
        let tweens = std::mem::take(&mut self.tweens);
        tweens
            .into_iter()
            .map(|tween| {
                self.set_style(tween.element, "top", &px(tween.target.top()));
                self.set_style(tween.element, "left", &px(tween.target.left()));
                tween.id
            })
            .collect()
    }

    pub fn snapshot(&self, el: ElementId) -> Option<NodeSnapshot> {
        let node = self.nodes.get(&el)?;
        Some(NodeSnapshot {
            tag: node.tag.clone(),
            classes: node.classes.clone(),
            attributes: node.attributes.clone(),
            styles: node.styles.clone(),
            children: node
                .children
                .iter()
                .filter_map(|&c| self.snapshot(c))
                .collect(),
        })
    }

    fn invalidate(&self) {
        self.hit_cache.borrow_mut().take();
    }

    fn style_px(&self, el: ElementId, property: &str) -> Option<f32> {
        self.nodes
            .get(&el)?
            .styles
            .get(property)
            .and_then(|v| parse_px(v))
    }

    fn is_absolute(&self, el: ElementId) -> bool {
        self.nodes
            .get(&el)
            .and_then(|n| n.styles.get("position"))
            .is_some_and(|p| p == "absolute")
    }

    fn flows_horizontally(&self, el: ElementId) -> bool {
        self.nodes.get(&el).is_some_and(|n| n.tag == "tr")
    }

    fn in_flow_children(&self, el: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        self.nodes
            .get(&el)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(|&c| !self.is_absolute(c))
    }

    /// Size from styles, then intrinsic size, then content.
    fn size_of(&self, el: ElementId) -> Size {
        let intrinsic = self.nodes.get(&el).and_then(|n| n.intrinsic);
        let content = || {
            let horizontal = self.flows_horizontally(el);
            self.in_flow_children(el)
                .map(|c| self.size_of(c))
                .fold(Size::default(), |acc, s| {
                    if horizontal {
                        Size::new(acc.width + s.width, acc.height.max(s.height))
                    } else {
                        Size::new(acc.width.max(s.width), acc.height + s.height)
                    }
                })
        };
        let width = self
            .style_px(el, "width")
            .or(intrinsic.map(|s| s.width))
            .unwrap_or_else(|| content().width);
        let height = self
            .style_px(el, "height")
            .or(intrinsic.map(|s| s.height))
            .unwrap_or_else(|| content().height);
        Size::new(width, height)
    }

    /// Layout box in document coordinates; `None` for detached elements.
    fn layout_box(&self, el: ElementId) -> Option<Rect> {
        if el == self.root {
            return Some(Rect::from_origin_size(Point::default(), self.size_of(el)));
        }
        let parent = self.nodes.get(&el)?.parent?;
        let parent_box = self.layout_box(parent)?;

        if self.is_absolute(el) {
            let left = self.style_px(el, "left").unwrap_or(0.0);
            let top = self.style_px(el, "top").unwrap_or(0.0);
            let mut size = self.size_of(el);
            if self.style_px(el, "width").is_none() {
                if let Some(right) = self.style_px(el, "right") {
                    size.width = parent_box.width - left - right;
                }
            }
            if self.style_px(el, "height").is_none() {
                if let Some(bottom) = self.style_px(el, "bottom") {
                    size.height = parent_box.height - top - bottom;
                }
            }
            return Some(Rect::from_origin_size(
                parent_box.origin().offset(left, top),
                size,
            ));
        }

        let horizontal = self.flows_horizontally(parent);
        let mut origin = parent_box.origin();
        for sibling in self.in_flow_children(parent) {
            if sibling == el {
                break;
            }
            let s = self.size_of(sibling);
            if horizontal {
                origin.x += s.width;
            } else {
                origin.y += s.height;
            }
        }
        Some(Rect::from_origin_size(origin, self.size_of(el)))
    }

    /// Layout box moved by every translateY on the ancestor chain.
    fn painted_box(&self, el: ElementId) -> Option<Rect> {
        let layout = self.layout_box(el)?;
        let mut dy = 0.0;
        let mut current = Some(el);
        while let Some(node) = current {
            dy += translate_y(self.style(node, "transform").as_deref());
            current = self.parent(node);
        }
        Some(layout.translate(0.0, dy))
    }

    fn build_hit_index(&self) -> SpatialIndex {
        let mut entries = Vec::new();
        let mut stack: Vec<ElementId> = self
            .children(self.root)
            .into_iter()
            .rev()
            .collect();
        let mut z = 0;
        while let Some(el) = stack.pop() {
            if let Some(rect) = self.painted_box(el) {
                entries.push(SpatialEntry::new(el, z, rect));
                z += 1;
            }
            stack.extend(self.children(el).into_iter().rev());
        }
        let index = SpatialIndex::from_entries(entries);
        trace!(painted = index.len(), "rebuilt hit index");
        index
    }
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for MemoryDom {
    fn create_element(&mut self, tag: &str) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                tag: tag.to_string(),
                ..Node::default()
            },
        );
        id
    }

    fn tag_name(&self, el: ElementId) -> Option<String> {
        self.nodes.get(&el).map(|n| n.tag.clone())
    }

    fn children(&self, parent: ElementId) -> Vec<ElementId> {
        self.nodes
            .get(&parent)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.nodes.get(&el)?.parent
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.nodes
            .get(&el)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(&el) {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(node) = self.nodes.get_mut(&el) {
            node.classes.retain(|c| c != class);
        }
    }

    fn has_attribute(&self, el: ElementId, name: &str) -> bool {
        self.nodes.get(&el).is_some_and(|n| match name {
            "class" => !n.classes.is_empty(),
            "style" => !n.styles.is_empty(),
            _ => n.attributes.contains_key(name),
        })
    }

    fn remove_attribute(&mut self, el: ElementId, name: &str) {
        let Some(node) = self.nodes.get_mut(&el) else {
            return;
        };
        match name {
            "class" => node.classes.clear(),
            "style" => {
                node.styles.clear();
                self.invalidate();
            }
            _ => {
                node.attributes.remove(name);
            }
        }
    }

    fn style(&self, el: ElementId, property: &str) -> Option<String> {
        self.nodes.get(&el)?.styles.get(property).cloned()
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(&el) {
            node.styles.insert(property.to_string(), value.to_string());
            self.invalidate();
        }
    }

    fn remove_style(&mut self, el: ElementId, property: &str) {
        if let Some(node) = self.nodes.get_mut(&el) {
            if node.styles.remove(property).is_some() {
                self.invalidate();
            }
        }
    }

    fn insert_before(&mut self, parent: ElementId, node: ElementId, reference: Option<ElementId>) {
        if !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&node) {
            return;
        }
        // Refuse to create a cycle.
        if self.contains(node, parent) {
            return;
        }
        self.remove(node);

        let Some(parent_node) = self.nodes.get_mut(&parent) else {
            return;
        };
        let position = reference.and_then(|r| parent_node.children.iter().position(|&c| c == r));
        match position {
            Some(i) => parent_node.children.insert(i, node),
            None => parent_node.children.push(node),
        }
        if let Some(n) = self.nodes.get_mut(&node) {
            n.parent = Some(parent);
        }
        self.invalidate();
    }

    fn remove(&mut self, node: ElementId) {
        let Some(parent) = self.nodes.get_mut(&node).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|&c| c != node);
        }
        self.invalidate();
    }

    fn offset_rect(&self, el: ElementId) -> Option<Rect> {
        if !self.is_attached(el) {
            return None;
        }
        self.layout_box(el)
    }

    fn bounding_rect(&self, el: ElementId) -> Option<Rect> {
        if !self.is_attached(el) {
            return None;
        }
        self.painted_box(el)
            .map(|r| r.translate(-self.scroll.x, -self.scroll.y))
    }

    fn floating_layer(&self) -> ElementId {
        self.root
    }
}

impl HitTest for MemoryDom {
    fn elements_at_point(&self, point: Point) -> Vec<ElementId> {
        let page = point.offset(self.scroll.x, self.scroll.y);
        let mut cache = self.hit_cache.borrow_mut();
        cache
            .get_or_insert_with(|| self.build_hit_index())
            .query_point(page)
    }
}

impl Animator for MemoryDom {
    fn tween_to(&mut self, el: ElementId, target: Rect, duration: Duration) -> AnimationId {
        let id = AnimationId(self.next_animation);
        self.next_animation += 1;
        self.tweens.push(Tween {
            id,
            element: el,
            target,
            duration,
        });
        id
    }
}
