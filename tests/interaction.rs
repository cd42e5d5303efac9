use pointmap::{ClickEffect, Document, InteractionController, PointerModifiers};

const EXTENT: [f64; 2] = [800.0, 600.0];
const TOL: f64 = 15.0;

fn doc_with_points() -> Document {
    let mut doc = Document::new(50);
    doc.prefixes.add("LOC").unwrap();
    doc.add_point(Some("LOC"), "1", 100.0, 100.0).unwrap();
    doc.add_point(Some("LOC"), "2", 200.0, 200.0).unwrap();
    doc.add_point(Some("LOC"), "3", 300.0, 300.0).unwrap();
    doc.selection.clear();
    doc
}

fn ctrl() -> PointerModifiers {
    PointerModifiers {
        command: true,
        shift: false,
    }
}

fn shift() -> PointerModifiers {
    PointerModifiers {
        command: false,
        shift: true,
    }
}

#[test]
fn click_on_empty_space_requests_the_add_flow() {
    let mut doc = doc_with_points();
    let mut ctl = InteractionController::new();
    ctl.pointer_down(&mut doc, [500.0, 400.0], PointerModifiers::NONE, TOL);
    let effect = ctl.pointer_up(&mut doc, [500.0, 400.0], PointerModifiers::NONE);
    assert_eq!(
        effect,
        Some(ClickEffect::OpenAddPoint { x: 500.0, y: 400.0 })
    );
    assert!(doc.selection.is_empty());
    assert!(ctl.is_idle());
}

#[test]
fn click_on_a_point_makes_it_the_sole_selection() {
    let mut doc = doc_with_points();
    let mut ctl = InteractionController::new();
    let target = doc.store.points()[1].id;
    ctl.pointer_down(&mut doc, [205.0, 200.0], PointerModifiers::NONE, TOL);
    let effect = ctl.pointer_up(&mut doc, [205.0, 200.0], PointerModifiers::NONE);
    assert_eq!(effect, None);
    assert_eq!(doc.selection.ids(), &[target]);
}

#[test]
fn ctrl_click_toggles_membership() {
    let mut doc = doc_with_points();
    let mut ctl = InteractionController::new();
    let target = doc.store.points()[0].id;
    ctl.pointer_down(&mut doc, [100.0, 100.0], ctrl(), TOL);
    ctl.pointer_up(&mut doc, [100.0, 100.0], ctrl());
    assert!(doc.selection.contains(target));
    ctl.pointer_down(&mut doc, [100.0, 100.0], ctrl(), TOL);
    ctl.pointer_up(&mut doc, [100.0, 100.0], ctrl());
    assert!(!doc.selection.contains(target));
}

#[test]
fn shift_click_range_selects_from_the_anchor() {
    let mut doc = doc_with_points();
    let mut ctl = InteractionController::new();
    let first = doc.store.points()[0].id;
    doc.selection.set_only(first);
    // Shift-click past the last point spans all three.
    ctl.pointer_down(&mut doc, [320.0, 320.0], shift(), TOL);
    let effect = ctl.pointer_up(&mut doc, [320.0, 320.0], shift());
    assert_eq!(effect, None);
    assert_eq!(doc.selection.len(), 3);
}

#[test]
fn sub_threshold_jitter_still_resolves_as_a_click() {
    let mut doc = doc_with_points();
    let mut ctl = InteractionController::new();
    let target = doc.store.points()[0].id;
    doc.selection.set_only(target);
    ctl.pointer_down(&mut doc, [100.0, 100.0], PointerModifiers::NONE, TOL);
    ctl.pointer_move(&mut doc, [101.0, 101.0], EXTENT);
    ctl.pointer_up(&mut doc, [101.0, 101.0], PointerModifiers::NONE);
    // No movement happened and the point is still the sole selection.
    let p = doc.store.get(target).unwrap();
    assert_eq!((p.x, p.y), (100.0, 100.0));
    assert_eq!(doc.selection.ids(), &[target]);
}

#[test]
fn dragging_a_selected_point_moves_it_and_commits_once() {
    let mut doc = doc_with_points();
    let mut ctl = InteractionController::new();
    let target = doc.store.points()[0].id;
    doc.selection.set_only(target);
    let history_before = doc.history.len();
    ctl.pointer_down(&mut doc, [100.0, 100.0], PointerModifiers::NONE, TOL);
    ctl.pointer_move(&mut doc, [110.0, 110.0], EXTENT);
    ctl.pointer_move(&mut doc, [130.0, 120.0], EXTENT);
    let effect = ctl.pointer_up(&mut doc, [130.0, 120.0], PointerModifiers::NONE);
    assert_eq!(effect, None);
    let p = doc.store.get(target).unwrap();
    assert_eq!((p.x, p.y), (130.0, 120.0));
    assert_eq!(doc.history.len(), history_before + 1);
}

#[test]
fn dragging_moves_every_selected_point() {
    let mut doc = doc_with_points();
    let mut ctl = InteractionController::new();
    doc.select_all_visible();
    ctl.pointer_down(&mut doc, [100.0, 100.0], PointerModifiers::NONE, TOL);
    ctl.pointer_move(&mut doc, [150.0, 100.0], EXTENT);
    ctl.pointer_up(&mut doc, [150.0, 100.0], PointerModifiers::NONE);
    let xs: Vec<f64> = doc.store.points().iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![150.0, 250.0, 350.0]);
}

#[test]
fn clamped_points_do_not_snap_back_mid_drag() {
    let mut doc = Document::new(50);
    doc.add_point(None, "1", 30.0, 100.0).unwrap();
    let id = doc.store.points()[0].id;
    let mut ctl = InteractionController::new();
    ctl.pointer_down(&mut doc, [30.0, 100.0], PointerModifiers::NONE, TOL);
    // Push far past the left edge, then pull back a little.
    ctl.pointer_move(&mut doc, [-200.0, 100.0], EXTENT);
    assert_eq!(doc.store.get(id).unwrap().x, 15.0);
    ctl.pointer_move(&mut doc, [-190.0, 100.0], EXTENT);
    // A 10-unit rightward delta moves it off the edge by 10, not back to
    // where a press-time offset would put it.
    assert_eq!(doc.store.get(id).unwrap().x, 25.0);
    ctl.pointer_up(&mut doc, [-190.0, 100.0], PointerModifiers::NONE);
}

#[test]
fn marquee_replaces_the_selection_while_dragging() {
    let mut doc = doc_with_points();
    let mut ctl = InteractionController::new();
    doc.selection.set_only(doc.store.points()[2].id);
    ctl.pointer_down(&mut doc, [50.0, 50.0], PointerModifiers::NONE, TOL);
    // Pressing empty space without modifiers clears the selection.
    assert!(doc.selection.is_empty());
    ctl.pointer_move(&mut doc, [250.0, 250.0], EXTENT);
    assert_eq!(doc.selection.len(), 2);
    assert!(ctl.selection_box().is_some());
    // Shrinking the rectangle deselects points that fall outside it.
    ctl.pointer_move(&mut doc, [150.0, 150.0], EXTENT);
    assert_eq!(doc.selection.len(), 1);
    let effect = ctl.pointer_up(&mut doc, [150.0, 150.0], PointerModifiers::NONE);
    assert_eq!(effect, None);
    assert!(ctl.selection_box().is_none());
    assert_eq!(doc.selection.len(), 1);
}

#[test]
fn modified_press_on_empty_space_never_starts_a_marquee() {
    let mut doc = doc_with_points();
    let mut ctl = InteractionController::new();
    doc.select_all_visible();
    ctl.pointer_down(&mut doc, [500.0, 400.0], ctrl(), TOL);
    // Selection survives the press.
    assert_eq!(doc.selection.len(), 3);
    ctl.pointer_move(&mut doc, [600.0, 500.0], EXTENT);
    assert!(ctl.selection_box().is_none());
    ctl.pointer_up(&mut doc, [600.0, 500.0], ctrl());
}

#[test]
fn cancel_abandons_the_gesture() {
    let mut doc = doc_with_points();
    let mut ctl = InteractionController::new();
    ctl.pointer_down(&mut doc, [50.0, 50.0], PointerModifiers::NONE, TOL);
    ctl.pointer_move(&mut doc, [250.0, 250.0], EXTENT);
    assert!(ctl.selection_box().is_some());
    ctl.cancel(&mut doc);
    assert!(ctl.selection_box().is_none());
    assert!(ctl.is_idle());
}

#[test]
fn cancelling_mid_drag_still_commits_the_move() {
    let mut doc = doc_with_points();
    let mut ctl = InteractionController::new();
    let target = doc.store.points()[0].id;
    doc.selection.set_only(target);
    let history_before = doc.history.len();
    ctl.pointer_down(&mut doc, [100.0, 100.0], PointerModifiers::NONE, TOL);
    ctl.pointer_move(&mut doc, [200.0, 200.0], EXTENT);
    // Pointer leaves the window; the gesture ends without a release event.
    ctl.cancel(&mut doc);
    assert!(ctl.is_idle());
    assert_eq!(doc.history.len(), history_before + 1);
    // The moved position is the history head, so undo walks back to the
    // pre-drag state instead of losing the move.
    let p = doc.store.get(target).unwrap();
    assert_eq!((p.x, p.y), (200.0, 200.0));
    doc.undo().unwrap();
    let p = doc.store.get(target).unwrap();
    assert_eq!((p.x, p.y), (100.0, 100.0));
}

#[test]
fn cancel_without_a_drag_commits_nothing() {
    let mut doc = doc_with_points();
    let mut ctl = InteractionController::new();
    let history_before = doc.history.len();
    ctl.pointer_down(&mut doc, [100.0, 100.0], PointerModifiers::NONE, TOL);
    ctl.cancel(&mut doc);
    assert_eq!(doc.history.len(), history_before);
}

#[test]
fn context_click_selects_unless_already_selected() {
    let mut doc = doc_with_points();
    let mut ctl = InteractionController::new();
    let a = doc.store.points()[0].id;
    let b = doc.store.points()[1].id;
    doc.selection.set(vec![a, b]);
    // Targeting a selected point keeps the group.
    assert_eq!(ctl.context_click(&mut doc, [100.0, 100.0], TOL), Some(a));
    assert_eq!(doc.selection.len(), 2);
    // Targeting an unselected point narrows to it.
    let c = doc.store.points()[2].id;
    assert_eq!(ctl.context_click(&mut doc, [300.0, 300.0], TOL), Some(c));
    assert_eq!(doc.selection.ids(), &[c]);
    // Empty space is a no-op.
    assert_eq!(ctl.context_click(&mut doc, [500.0, 500.0], TOL), None);
}
