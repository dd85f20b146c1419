//! Spatial Index Module
//!
//! R-tree over painted element boxes, used by the in-memory host for
//! `elements_at_point`. Point queries are O(log n); results come back in
//! paint order, topmost first.

use crate::geometry::{Point, Rect};
use crate::host::ElementId;
use rstar::{AABB, RTree, RTreeObject};

/// A painted box with its position in paint order.
#[derive(Debug, Clone, Copy)]
pub struct SpatialEntry {
    pub element: ElementId,
    /// Paint order: higher values are painted later, i.e. on top
    pub z: usize,
    pub rect: Rect,
}

impl SpatialEntry {
    pub fn new(element: ElementId, z: usize, rect: Rect) -> Self {
        Self { element, z, rect }
    }

    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        self.rect.contains(p)
    }
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.rect.left(), self.rect.top()],
            [self.rect.right(), self.rect.bottom()],
        )
    }
}

/// Spatial index of painted boxes.
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
}

impl SpatialIndex {
    /// Build an index in one pass. Empty boxes are skipped; nothing can hit them.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = SpatialEntry>,
    {
        let entries: Vec<SpatialEntry> = entries
            .into_iter()
            .filter(|e| !e.rect.is_empty())
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Elements whose box contains `p`, topmost first.
    pub fn query_point(&self, p: Point) -> Vec<ElementId> {
        let point_envelope = AABB::from_point([p.x, p.y]);

        let mut hits: Vec<&SpatialEntry> = self
            .tree
            .locate_in_envelope_intersecting(&point_envelope)
            .filter(|entry| entry.contains_point(p))
            .collect();
        hits.sort_by(|a, b| b.z.cmp(&a.z));
        hits.into_iter().map(|entry| entry.element).collect()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
