//! Range selection over tables and lists.

use crate::helpers::*;
use dragselect::constants::SELECTION_OVERLAY_CLASS;
use dragselect::host::memory::MemoryDom;
use dragselect::host::{Dom, ElementId};
use dragselect::selection::{GridPos, Selectable};

fn cells_between(table: &TableFixture, rows: std::ops::RangeInclusive<usize>, cols: std::ops::RangeInclusive<usize>) -> Vec<ElementId> {
    rows.flat_map(|r| cols.clone().map(move |c| (r, c)))
        .map(|(r, c)| table.cell(r, c))
        .collect()
}

#[test]
fn test_table_rectangle_selection() {
    let mut dom = MemoryDom::new();
    let table = table(&mut dom, 5, 4);
    let mut selectable = Selectable::detect(&dom, table.table, shared_config());
    let anchor = table.over(&dom, 1, 1);
    let focus = table.over(&dom, 3, 2);

    assert!(selectable.pointer_down(anchor, &mut dom));
    assert!(selectable.pointer_move(focus, &mut dom));

    let selection = selectable.selection();
    assert_eq!(selection.units.len(), 6);
    assert_eq!(selection.units, cells_between(&table, 1..=3, 1..=2));
    assert_eq!(selection.cells.first(), Some(&GridPos::new(1, 1)));
    assert_eq!(selection.cells.last(), Some(&GridPos::new(3, 2)));
    assert_eq!(selectable.anchor(), Some(table.cell(1, 1)));
    assert_eq!(selectable.focus(), Some(table.cell(3, 2)));
}

#[test]
fn test_reversed_drag_selects_same_cells() {
    let mut dom = MemoryDom::new();
    let table = table(&mut dom, 5, 4);
    let mut selectable = Selectable::detect(&dom, table.table, shared_config());
    let a = table.over(&dom, 1, 1);
    let b = table.over(&dom, 3, 2);

    selectable.pointer_down(a, &mut dom);
    selectable.pointer_move(b, &mut dom);
    selectable.pointer_up(b, &mut dom);
    let forward = selectable.selection();

    selectable.pointer_down(b, &mut dom);
    selectable.pointer_move(a, &mut dom);
    selectable.pointer_up(a, &mut dom);
    let backward = selectable.selection();

    assert_eq!(forward, backward);
    assert_eq!(backward.units.len(), 6);
}

#[test]
fn test_overlay_edges_follow_anchor_and_focus() {
    let mut dom = MemoryDom::new();
    let table = table(&mut dom, 4, 4);
    let mut selectable = Selectable::detect(&dom, table.table, shared_config());
    let anchor = table.over(&dom, 1, 1);
    let down_right = table.over(&dom, 2, 3);
    let up_left = table.over(&dom, 0, 0);

    selectable.pointer_down(anchor, &mut dom);
    let overlay = selectable.overlay().unwrap();
    assert!(dom.has_class(overlay, SELECTION_OVERLAY_CLASS));
    assert_eq!(dom.parent(overlay), Some(table.table));
    // Table is 200 x 80; cell (1,1) spans x 50..100, y 20..40
    let edges = |dom: &MemoryDom| {
        ["top", "left", "bottom", "right"].map(|side| dom.style(overlay, side).unwrap_or_default())
    };
    assert_eq!(edges(&dom), ["20px", "50px", "40px", "100px"]);
    assert_eq!(dom.bounding_rect(overlay), dom.bounding_rect(table.cell(1, 1)));

    // Growing down-right keeps the anchor's top/left edges
    selectable.pointer_move(down_right, &mut dom);
    assert_eq!(edges(&dom), ["20px", "50px", "20px", "0px"]);

    // Growing up-left keeps the anchor's bottom/right edges
    selectable.pointer_move(up_left, &mut dom);
    assert_eq!(edges(&dom), ["0px", "0px", "40px", "100px"]);
    assert_eq!(selectable.selection().units, cells_between(&table, 0..=1, 0..=1));

    // Back onto the anchor collapses to its own box
    selectable.pointer_move(anchor, &mut dom);
    assert_eq!(edges(&dom), ["20px", "50px", "40px", "100px"]);
    assert_eq!(selectable.selection().units, vec![table.cell(1, 1)]);
}

#[test]
fn test_release_off_cells_keeps_selection() {
    let mut dom = MemoryDom::new();
    let table = table(&mut dom, 3, 3);
    let mut selectable = Selectable::detect(&dom, table.table, shared_config());
    let anchor = table.over(&dom, 0, 0);
    let focus = table.over(&dom, 1, 1);

    selectable.pointer_down(anchor, &mut dom);
    selectable.pointer_move(focus, &mut dom);
    selectable.pointer_up(nowhere(), &mut dom);

    assert_eq!(selectable.anchor(), None);
    assert_eq!(selectable.focus(), None);
    assert_eq!(selectable.selection().units.len(), 4);
    let overlay = selectable.overlay().unwrap();
    assert!(dom.is_attached(overlay));

    // Without a pressed anchor, moves do nothing
    assert!(!selectable.pointer_move(table.over(&dom, 2, 2), &mut dom));
    assert_eq!(selectable.selection().units.len(), 4);
}

#[test]
fn test_release_over_cell_keeps_anchor() {
    let mut dom = MemoryDom::new();
    let table = table(&mut dom, 3, 3);
    let mut selectable = Selectable::detect(&dom, table.table, shared_config());
    let anchor = table.over(&dom, 0, 0);
    let focus = table.over(&dom, 2, 0);

    selectable.pointer_down(anchor, &mut dom);
    selectable.pointer_move(focus, &mut dom);
    selectable.pointer_up(focus, &mut dom);

    assert_eq!(selectable.anchor(), Some(table.cell(0, 0)));
    assert_eq!(selectable.focus(), Some(table.cell(2, 0)));
}

#[test]
fn test_new_press_starts_fresh_selection() {
    let mut dom = MemoryDom::new();
    let table = table(&mut dom, 3, 3);
    let mut selectable = Selectable::detect(&dom, table.table, shared_config());
    let first = table.over(&dom, 0, 0);
    let second = table.over(&dom, 2, 2);

    selectable.pointer_down(first, &mut dom);
    selectable.pointer_move(second, &mut dom);
    let overlay = selectable.overlay();
    selectable.pointer_up(second, &mut dom);

    selectable.pointer_down(second, &mut dom);
    assert_eq!(selectable.selection().units, vec![table.cell(2, 2)]);
    // The overlay element is reused
    assert_eq!(selectable.overlay(), overlay);
}

#[test]
fn test_press_outside_dismisses_overlay() {
    let mut dom = MemoryDom::new();
    let table = table(&mut dom, 2, 2);
    let root = dom.root();
    let elsewhere = dom.add(root, "div");
    let mut selectable = Selectable::detect(&dom, table.table, shared_config());
    let inside = table.over(&dom, 0, 0);

    assert!(selectable.document_pointer_down(inside, Some(table.cell(0, 0)), &mut dom));
    let overlay = selectable.overlay().unwrap();
    selectable.pointer_up(inside, &mut dom);

    assert!(!selectable.document_pointer_down(nowhere(), Some(elsewhere), &mut dom));
    assert!(!dom.is_attached(overlay));
    assert_eq!(selectable.overlay(), None);
    assert!(selectable.selection().units.is_empty());
}

#[test]
fn test_change_notifications() {
    let mut dom = MemoryDom::new();
    let table = table(&mut dom, 3, 3);
    let mut selectable = Selectable::detect(&dom, table.table, shared_config());
    let rx = selectable.subscribe();
    let anchor = table.over(&dom, 0, 0);
    let focus = table.over(&dom, 0, 2);

    selectable.pointer_down(anchor, &mut dom);
    selectable.pointer_move(focus, &mut dom);
    // Same focus again: no notification
    selectable.pointer_move(focus, &mut dom);

    let sizes: Vec<usize> = rx.try_iter().map(|change| change.units.len()).collect();
    assert_eq!(sizes, vec![1, 3]);
}

#[test]
fn test_list_run_selection() {
    let mut dom = MemoryDom::new();
    let list = selectable_list(&mut dom, 5);
    let mut selectable = Selectable::detect(&dom, list.container, shared_config());
    let anchor = list.over(&dom, 3);
    let focus = list.over(&dom, 1);

    selectable.pointer_down(anchor, &mut dom);
    let overlay = selectable.overlay().unwrap();
    // List overlays sit one pixel past the item's bottom and right edges.
    // The list is 200 x 200; item 3 spans y 120..160
    assert_eq!(dom.style(overlay, "bottom").as_deref(), Some("41px"));
    assert_eq!(dom.style(overlay, "right").as_deref(), Some("1px"));

    selectable.pointer_move(focus, &mut dom);
    assert_eq!(selectable.selection().units, list.items[1..=3].to_vec());
    assert!(selectable.selection().cells.iter().all(|pos| pos.col == 0));
    assert_eq!(dom.style(overlay, "top").as_deref(), Some("40px"));
    assert_eq!(dom.style(overlay, "bottom").as_deref(), Some("41px"));
    assert_eq!(dom.style(overlay, "left").as_deref(), Some("0px"));
}

#[test]
fn test_list_ignores_unmarked_children() {
    let mut dom = MemoryDom::new();
    let list = selectable_list(&mut dom, 2);
    let header = dom.add_sized(list.container, "div", dragselect::Size::new(ITEM_WIDTH, ITEM_HEIGHT));
    let mut selectable = Selectable::detect(&dom, list.container, shared_config());
    let over_header = center_of(&dom, header);

    assert!(!selectable.pointer_down(over_header, &mut dom));
    assert_eq!(selectable.overlay(), None);
    assert!(selectable.selection().units.is_empty());
}

#[test]
fn test_press_on_non_unit_clears_previous_selection() {
    let mut dom = MemoryDom::new();
    let list = selectable_list(&mut dom, 2);
    let header = dom.add_sized(list.container, "div", dragselect::Size::new(ITEM_WIDTH, ITEM_HEIGHT));
    let mut selectable = Selectable::detect(&dom, list.container, shared_config());
    let rx = selectable.subscribe();
    let first = list.over(&dom, 0);
    let over_header = center_of(&dom, header);

    assert!(selectable.pointer_down(first, &mut dom));
    selectable.pointer_up(first, &mut dom);
    let overlay = selectable.overlay().unwrap();

    assert!(!selectable.pointer_down(over_header, &mut dom));
    assert!(selectable.selection().units.is_empty());
    assert_eq!(selectable.overlay(), None);
    assert!(!dom.is_attached(overlay));

    // Subscribers see the cleared selection too
    let sizes: Vec<usize> = rx.try_iter().map(|change| change.units.len()).collect();
    assert_eq!(sizes, vec![1, 0]);
}
