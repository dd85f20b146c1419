//! Test helpers and builders for reducing boilerplate in tests.
//!
//! Every fixture lays out on a [`MemoryDom`] with no scroll, so element
//! coordinates are easy to compute by hand:
//!
//! - list items are `ITEM_WIDTH` x `ITEM_HEIGHT` and stack from the
//!   container's top edge
//! - table cells are `CELL_WIDTH` x `CELL_HEIGHT`, rows stack vertically
//!   and cells flow left to right

use dragselect::config::{EngineConfig, SharedConfig};
use dragselect::constants::{LIST_DRAG_ATTR, SELECTABLE_ITEM_ATTR};
use dragselect::geometry::Size;
use dragselect::host::memory::MemoryDom;
use dragselect::host::{Dom, ElementId, PointerEvent};

pub const ITEM_WIDTH: f32 = 200.0;
pub const ITEM_HEIGHT: f32 = 40.0;
pub const CELL_WIDTH: f32 = 50.0;
pub const CELL_HEIGHT: f32 = 20.0;

pub fn shared_config() -> SharedConfig {
    EngineConfig::default().into_shared()
}

/// A container and its items, in child order.
pub struct ListFixture {
    pub container: ElementId,
    pub items: Vec<ElementId>,
}

impl ListFixture {
    /// Pointer event over the middle of item `i` as laid out at rest.
    pub fn over(&self, dom: &MemoryDom, i: usize) -> PointerEvent {
        center_of(dom, self.items[i])
    }
}

/// Vertical list of `count` draggable items at the top of the document.
pub fn draggable_list(dom: &mut MemoryDom, count: usize) -> ListFixture {
    let root = dom.root();
    let container = dom.add(root, "div");
    let items = (0..count)
        .map(|_| draggable_item(dom, container))
        .collect();
    ListFixture { container, items }
}

pub fn draggable_item(dom: &mut MemoryDom, container: ElementId) -> ElementId {
    let item = dom.add_sized(container, "div", Size::new(ITEM_WIDTH, ITEM_HEIGHT));
    dom.set_attribute(item, LIST_DRAG_ATTR, "");
    item
}

/// Fixed-size list placed out of flow at `left`, so two lists can sit side
/// by side.
pub fn placed_list(dom: &mut MemoryDom, left: f32, count: usize) -> ListFixture {
    let root = dom.root();
    let container = dom.add_sized(root, "div", Size::new(ITEM_WIDTH, ITEM_HEIGHT * 10.0));
    dom.place_absolute(container, left, 0.0);
    let items = (0..count)
        .map(|_| draggable_item(dom, container))
        .collect();
    ListFixture { container, items }
}

/// Vertical list of `count` selectable items.
pub fn selectable_list(dom: &mut MemoryDom, count: usize) -> ListFixture {
    let root = dom.root();
    let container = dom.add(root, "div");
    let items = (0..count)
        .map(|_| {
            let item = dom.add_sized(container, "div", Size::new(ITEM_WIDTH, ITEM_HEIGHT));
            dom.set_attribute(item, SELECTABLE_ITEM_ATTR, "");
            item
        })
        .collect();
    ListFixture { container, items }
}

pub struct TableFixture {
    pub table: ElementId,
    /// `cells[row][col]`
    pub cells: Vec<Vec<ElementId>>,
}

impl TableFixture {
    pub fn cell(&self, row: usize, col: usize) -> ElementId {
        self.cells[row][col]
    }

    /// Pointer event over the middle of a cell.
    pub fn over(&self, dom: &MemoryDom, row: usize, col: usize) -> PointerEvent {
        center_of(dom, self.cell(row, col))
    }
}

/// `rows` x `cols` table at the top of the document.
pub fn table(dom: &mut MemoryDom, rows: usize, cols: usize) -> TableFixture {
    let root = dom.root();
    let table = dom.add(root, "table");
    let tbody = dom.add(table, "tbody");
    let cells = (0..rows)
        .map(|_| {
            let tr = dom.add(tbody, "tr");
            (0..cols)
                .map(|_| dom.add_sized(tr, "td", Size::new(CELL_WIDTH, CELL_HEIGHT)))
                .collect()
        })
        .collect();
    TableFixture { table, cells }
}

pub fn center_of(dom: &MemoryDom, el: ElementId) -> PointerEvent {
    let rect = dom
        .bounding_rect(el)
        .unwrap_or_else(|| panic!("{el:?} is not laid out"));
    PointerEvent::at(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
}

/// A point no fixture ever covers.
pub fn nowhere() -> PointerEvent {
    PointerEvent::at(5000.0, 5000.0)
}
