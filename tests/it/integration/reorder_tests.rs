//! Drag-reorder inside a single container.

use crate::helpers::*;
use dragselect::constants::{DRAG_PLACEHOLDER_CLASS, DRAGGING_CLASS, HOST_DRAG_CLASS, LIST_DRAG_CLASS};
use dragselect::host::memory::MemoryDom;
use dragselect::host::{Dom, PointerEvent};
use dragselect::reorder::{Direction, DropOutcome, MoveOutcome, ReorderGroup};

fn group_for(container: dragselect::ElementId) -> ReorderGroup {
    let mut group = ReorderGroup::new(shared_config());
    group.add(container);
    group
}

/// Runs the pending drop tween to completion and reports it to the group.
fn settle(group: &mut ReorderGroup, dom: &mut MemoryDom) -> Vec<DropOutcome> {
    dom.finish_animations()
        .into_iter()
        .map(|id| group.animation_finished(id, dom))
        .collect()
}

#[test]
fn test_pick_up_floats_item_and_leaves_placeholder() {
    let mut dom = MemoryDom::new();
    let list = draggable_list(&mut dom, 3);
    let mut group = group_for(list.container);

    assert!(group.pointer_down(list.over(&dom, 1), &mut dom));

    let children = dom.children(list.container);
    assert_eq!(children.len(), 3);
    let placeholder = children[1];
    assert!(dom.has_class(placeholder, DRAG_PLACEHOLDER_CLASS));
    assert_eq!(dom.style(placeholder, "height").as_deref(), Some("40px"));

    let item = list.items[1];
    assert_eq!(dom.parent(item), Some(dom.floating_layer()));
    assert!(dom.has_class(item, DRAGGING_CLASS));
    assert_eq!(dom.style(item, "position").as_deref(), Some("absolute"));
    assert_eq!(dom.style(item, "top").as_deref(), Some("40px"));

    assert!(dom.has_class(list.container, HOST_DRAG_CLASS));
    assert!(dom.has_class(list.items[0], LIST_DRAG_CLASS));
    assert_eq!(dom.style(list.container, "user-select").as_deref(), Some("none"));
}

#[test]
fn test_pointer_down_off_items_is_ignored() {
    let mut dom = MemoryDom::new();
    let list = draggable_list(&mut dom, 2);
    let mut group = group_for(list.container);

    assert!(!group.pointer_down(nowhere(), &mut dom));
    assert!(group.active().is_none());
    assert_eq!(dom.children(list.container), list.items);
}

#[test]
fn test_scenario_pick_first_hover_third_drop() {
    let mut dom = MemoryDom::new();
    let list = draggable_list(&mut dom, 4);
    let [i1, i2, i3, i4] = [list.items[0], list.items[1], list.items[2], list.items[3]];
    let hover_i3 = list.over(&dom, 2);
    let mut group = group_for(list.container);

    assert!(group.pointer_down(list.over(&dom, 0), &mut dom));
    let placeholder = group.engines()[0].placeholder().unwrap();

    assert_eq!(
        group.pointer_move(hover_i3, &mut dom),
        MoveOutcome::Reflowed(Direction::Down)
    );
    assert_eq!(dom.style(i2, "transform").as_deref(), Some("translateY(-40px)"));
    assert_eq!(dom.style(i3, "transform").as_deref(), Some("translateY(-40px)"));
    assert_eq!(dom.style(i4, "transform"), None);
    assert_eq!(
        dom.style(placeholder, "transform").as_deref(),
        Some("translateY(80px)")
    );
    assert_eq!(group.engines()[0].placeholder_index(&dom), Some(2));

    // I3 slid out from under the pointer; only the placeholder is left there
    assert_eq!(group.pointer_move(hover_i3, &mut dom), MoveOutcome::Moved);

    let animation = group.pointer_up(&mut dom).unwrap();
    let tween = dom.pending_animations()[0].clone();
    assert_eq!(tween.id, animation);
    assert_eq!(tween.element, i1);
    assert_eq!(tween.target.y, 2.0 * ITEM_HEIGHT);

    assert_eq!(
        settle(&mut group, &mut dom),
        vec![DropOutcome::Completed { item: i1, index: 2 }]
    );
    assert_eq!(dom.children(list.container), vec![i2, i3, i1, i4]);
    assert!(!dom.is_attached(placeholder));
}

#[test]
fn test_drop_lands_at_placeholder_index() {
    let mut dom = MemoryDom::new();
    let list = draggable_list(&mut dom, 5);
    let hovers: Vec<PointerEvent> = [3, 1].iter().map(|&i| list.over(&dom, i)).collect();
    let mut group = group_for(list.container);

    assert!(group.pointer_down(list.over(&dom, 4), &mut dom));
    for hover in hovers {
        group.pointer_move(hover, &mut dom);
    }
    let expected = group.engines()[0].placeholder_index(&dom).unwrap() as usize;

    group.pointer_up(&mut dom);
    let outcomes = settle(&mut group, &mut dom);
    assert_eq!(
        outcomes,
        vec![DropOutcome::Completed {
            item: list.items[4],
            index: expected
        }]
    );
    assert_eq!(dom.children(list.container)[expected], list.items[4]);
}

#[test]
fn test_moving_up_shifts_siblings_down() {
    let mut dom = MemoryDom::new();
    let list = draggable_list(&mut dom, 4);
    let hover_first = list.over(&dom, 0);
    let mut group = group_for(list.container);

    assert!(group.pointer_down(list.over(&dom, 3), &mut dom));
    assert_eq!(
        group.pointer_move(hover_first, &mut dom),
        MoveOutcome::Reflowed(Direction::Up)
    );
    for &item in &list.items[..3] {
        assert_eq!(dom.style(item, "transform").as_deref(), Some("translateY(40px)"));
    }

    group.pointer_up(&mut dom);
    settle(&mut group, &mut dom);
    let [a, b, c, d] = [list.items[0], list.items[1], list.items[2], list.items[3]];
    assert_eq!(dom.children(list.container), vec![d, a, b, c]);
}

#[test]
fn test_duplicate_completion_is_idempotent() {
    let mut dom = MemoryDom::new();
    let list = draggable_list(&mut dom, 4);
    let hover = list.over(&dom, 2);
    let mut group = group_for(list.container);

    group.pointer_down(list.over(&dom, 0), &mut dom);
    group.pointer_move(hover, &mut dom);
    let animation = group.pointer_up(&mut dom).unwrap();
    dom.finish_animations();

    assert!(matches!(
        group.animation_finished(animation, &mut dom),
        DropOutcome::Completed { .. }
    ));
    let once = dom.snapshot(dom.root());

    assert_eq!(group.animation_finished(animation, &mut dom), DropOutcome::Ignored);
    assert_eq!(dom.snapshot(dom.root()), once);
}

#[test]
fn test_cleanup_leaves_no_transient_state() {
    let mut dom = MemoryDom::new();
    let list = draggable_list(&mut dom, 3);
    let before = dom.snapshot(list.container);
    let hover = list.over(&dom, 2);
    let back = list.over(&dom, 0);
    let mut group = group_for(list.container);

    // Drag down and back again: the item lands where it started.
    group.pointer_down(list.over(&dom, 0), &mut dom);
    group.pointer_move(hover, &mut dom);
    group.pointer_move(back, &mut dom);
    group.pointer_up(&mut dom);
    settle(&mut group, &mut dom);

    assert_eq!(dom.children(list.container), list.items);
    assert_eq!(dom.snapshot(list.container), before);
}

#[test]
fn test_new_press_during_drop_completes_it_first() {
    let mut dom = MemoryDom::new();
    let list = draggable_list(&mut dom, 3);
    let hover = list.over(&dom, 1);
    let press_again = list.over(&dom, 2);
    let mut group = group_for(list.container);

    group.pointer_down(list.over(&dom, 0), &mut dom);
    group.pointer_move(hover, &mut dom);
    let animation = group.pointer_up(&mut dom).unwrap();

    // Tween still running when the next drag starts
    assert!(group.pointer_down(press_again, &mut dom));
    let [a, b, c] = [list.items[0], list.items[1], list.items[2]];
    assert_eq!(group.engines()[0].dragged_item(), Some(c));
    let placeholder = group.engines()[0].placeholder().unwrap();
    assert_eq!(dom.children(list.container), vec![b, a, placeholder]);

    // The late completion of the first drop is ignored
    assert_eq!(group.animation_finished(animation, &mut dom), DropOutcome::Ignored);
}

#[test]
fn test_pointer_up_without_drag_is_ignored() {
    let mut dom = MemoryDom::new();
    let list = draggable_list(&mut dom, 2);
    let mut group = group_for(list.container);

    assert_eq!(group.pointer_up(&mut dom), None);
    assert_eq!(group.pointer_move(list.over(&dom, 0), &mut dom), MoveOutcome::Ignored);
}

#[test]
fn test_item_follows_pointer() {
    let mut dom = MemoryDom::new();
    let list = draggable_list(&mut dom, 3);
    let mut group = group_for(list.container);

    // Grab 5px below the top edge of the second item
    group.pointer_down(PointerEvent::at(10.0, 45.0), &mut dom);
    group.pointer_move(PointerEvent::at(30.0, 200.0), &mut dom);

    let item = list.items[1];
    assert_eq!(dom.style(item, "top").as_deref(), Some("195px"));
    assert_eq!(dom.style(item, "left").as_deref(), Some("20px"));
}

#[test]
fn test_reflow_scroll_jump_is_compensated() {
    let mut dom = MemoryDom::new();
    let list = draggable_list(&mut dom, 3);
    let mut group = group_for(list.container);
    let item = list.items[0];

    group.pointer_down(PointerEvent::at(10.0, 20.0), &mut dom);

    // One slot of scroll drift between ticks: corrected by two slots
    group.pointer_move(PointerEvent::at(10.0, 20.0).with_scroll(0.0, 40.0), &mut dom);
    assert_eq!(dom.style(item, "top").as_deref(), Some("40px"));

    // Steady scroll keeps the correction
    group.pointer_move(PointerEvent::at(10.0, 20.0).with_scroll(0.0, 40.0), &mut dom);
    assert_eq!(dom.style(item, "top").as_deref(), Some("40px"));

    // Ordinary scrolling only moves the baseline
    group.pointer_move(PointerEvent::at(10.0, 20.0).with_scroll(0.0, 55.0), &mut dom);
    assert_eq!(dom.style(item, "top").as_deref(), Some("25px"));
}

#[test]
fn test_release_with_lost_placeholder_ends_the_drag() {
    let mut dom = MemoryDom::new();
    let list = draggable_list(&mut dom, 3);
    let [a, b, c] = [list.items[0], list.items[1], list.items[2]];
    let mut group = group_for(list.container);

    group.pointer_down(list.over(&dom, 1), &mut dom);
    let placeholder = group.engines()[0].placeholder().unwrap();
    dom.remove(placeholder);

    // No slot to tween to: the item lands at the end without animating
    assert_eq!(group.pointer_up(&mut dom), None);
    assert!(dom.pending_animations().is_empty());
    assert!(group.active().is_none());
    assert_eq!(dom.children(list.container), vec![a, c, b]);
    assert_eq!(dom.style(b, "top"), None);

    assert_eq!(
        group.pointer_move(PointerEvent::at(30.0, 300.0), &mut dom),
        MoveOutcome::Ignored
    );
    assert_eq!(dom.style(b, "top"), None);
    assert!(!dom.has_class(list.container, HOST_DRAG_CLASS));
}
