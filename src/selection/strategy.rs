//! How a selection surface maps elements to grid positions.
//!
//! A list is a single column of marked children; a table is the `td` cells of
//! every `tr` below it. The selection engine only ever talks in [`GridPos`],
//! so the rectangle logic is shared between the two.

use crate::config::{EngineConfig, SelectionConfig};
use crate::host::{Dom, ElementId};
use serde::Serialize;

/// Row/column of a selectable unit. Orders row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

pub trait SelectionStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// True when `el` is a selectable unit of `container`.
    fn is_unit<D: Dom + ?Sized>(&self, dom: &D, container: ElementId, el: ElementId, cfg: &EngineConfig) -> bool;

    fn locate<D: Dom + ?Sized>(
        &self,
        dom: &D,
        container: ElementId,
        unit: ElementId,
        cfg: &EngineConfig,
    ) -> Option<GridPos>;

    fn unit_at<D: Dom + ?Sized>(
        &self,
        dom: &D,
        container: ElementId,
        pos: GridPos,
        cfg: &EngineConfig,
    ) -> Option<ElementId>;

    /// Extra pixels on the bottom/right overlay insets.
    fn edge_outset(&self, cfg: &SelectionConfig) -> f32;

    /// Whether the column axis takes part in the rectangle.
    fn spans_columns(&self) -> bool;
}

/// Contiguous run of marked children.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListRun;

impl ListRun {
    fn items<D: Dom + ?Sized>(dom: &D, container: ElementId, cfg: &EngineConfig) -> Vec<ElementId> {
        dom.children(container)
            .into_iter()
            .filter(|&c| dom.has_attribute(c, &cfg.markers.selectable_item))
            .collect()
    }
}

impl SelectionStrategy for ListRun {
    fn name(&self) -> &'static str {
        "list"
    }

    fn is_unit<D: Dom + ?Sized>(&self, dom: &D, container: ElementId, el: ElementId, cfg: &EngineConfig) -> bool {
        dom.parent(el) == Some(container) && dom.has_attribute(el, &cfg.markers.selectable_item)
    }

    fn locate<D: Dom + ?Sized>(
        &self,
        dom: &D,
        container: ElementId,
        unit: ElementId,
        cfg: &EngineConfig,
    ) -> Option<GridPos> {
        let row = Self::items(dom, container, cfg)
            .iter()
            .position(|&c| c == unit)?;
        Some(GridPos::new(row, 0))
    }

    fn unit_at<D: Dom + ?Sized>(
        &self,
        dom: &D,
        container: ElementId,
        pos: GridPos,
        cfg: &EngineConfig,
    ) -> Option<ElementId> {
        if pos.col != 0 {
            return None;
        }
        Self::items(dom, container, cfg).get(pos.row).copied()
    }

    fn edge_outset(&self, cfg: &SelectionConfig) -> f32 {
        cfg.list_edge_outset
    }

    fn spans_columns(&self) -> bool {
        false
    }
}

/// Rectangle of table cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRect;

impl TableRect {
    /// Every `tr` below `container`, in document order.
    fn rows<D: Dom + ?Sized>(dom: &D, container: ElementId, cfg: &EngineConfig) -> Vec<ElementId> {
        let mut rows = Vec::new();
        let mut stack: Vec<ElementId> = dom.children(container).into_iter().rev().collect();
        while let Some(el) = stack.pop() {
            if has_tag(dom, el, &cfg.markers.table_row_tag) {
                rows.push(el);
            }
            stack.extend(dom.children(el).into_iter().rev());
        }
        rows
    }

    fn cells<D: Dom + ?Sized>(dom: &D, row: ElementId, cfg: &EngineConfig) -> Vec<ElementId> {
        dom.children(row)
            .into_iter()
            .filter(|&c| has_tag(dom, c, &cfg.markers.table_cell_tag))
            .collect()
    }
}

impl SelectionStrategy for TableRect {
    fn name(&self) -> &'static str {
        "table"
    }

    fn is_unit<D: Dom + ?Sized>(&self, dom: &D, container: ElementId, el: ElementId, cfg: &EngineConfig) -> bool {
        has_tag(dom, el, &cfg.markers.table_cell_tag) && dom.contains(container, el)
    }

    fn locate<D: Dom + ?Sized>(
        &self,
        dom: &D,
        container: ElementId,
        unit: ElementId,
        cfg: &EngineConfig,
    ) -> Option<GridPos> {
        Self::rows(dom, container, cfg)
            .into_iter()
            .enumerate()
            .find_map(|(row, tr)| {
                Self::cells(dom, tr, cfg)
                    .iter()
                    .position(|&c| c == unit)
                    .map(|col| GridPos::new(row, col))
            })
    }

    fn unit_at<D: Dom + ?Sized>(
        &self,
        dom: &D,
        container: ElementId,
        pos: GridPos,
        cfg: &EngineConfig,
    ) -> Option<ElementId> {
        let tr = *Self::rows(dom, container, cfg).get(pos.row)?;
        Self::cells(dom, tr, cfg).get(pos.col).copied()
    }

    fn edge_outset(&self, cfg: &SelectionConfig) -> f32 {
        cfg.table_edge_outset
    }

    fn spans_columns(&self) -> bool {
        true
    }
}

pub(crate) fn has_tag<D: Dom + ?Sized>(dom: &D, el: ElementId, tag: &str) -> bool {
    dom.tag_name(el).is_some_and(|t| t.eq_ignore_ascii_case(tag))
}
