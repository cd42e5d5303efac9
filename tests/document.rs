use pointmap::{Document, Filter};

fn doc_with_points() -> Document {
    let mut doc = Document::new(50);
    doc.prefixes.add("LOC").unwrap();
    doc.add_point(Some("LOC"), "1", 100.0, 100.0).unwrap();
    doc.add_point(Some("LOC"), "2", 200.0, 200.0).unwrap();
    doc.add_point(None, "9", 300.0, 300.0).unwrap();
    doc
}

#[test]
fn add_selects_the_new_point_and_snapshots() {
    let mut doc = Document::new(50);
    let id = doc.add_point(None, "1", 10.0, 20.0).unwrap();
    assert_eq!(doc.selection.ids(), &[id]);
    assert_eq!(doc.history.len(), 1);
}

#[test]
fn failed_add_leaves_no_trace() {
    let mut doc = doc_with_points();
    let history_before = doc.history.len();
    assert!(doc.add_point(Some("LOC"), "1", 0.0, 0.0).is_err());
    assert_eq!(doc.store.len(), 3);
    assert_eq!(doc.history.len(), history_before);
}

#[test]
fn undo_restores_points_and_selection() {
    let mut doc = Document::new(50);
    let a = doc.add_point(None, "1", 10.0, 10.0).unwrap();
    doc.add_point(None, "2", 20.0, 20.0).unwrap();
    let undone = doc.undo().unwrap();
    assert_eq!(undone, "Add point 2");
    assert_eq!(doc.store.len(), 1);
    assert_eq!(doc.selection.ids(), &[a]);
    let redone = doc.redo().unwrap();
    assert_eq!(redone, "Add point 2");
    assert_eq!(doc.store.len(), 2);
}

#[test]
fn delete_selected_removes_and_clears_selection() {
    let mut doc = doc_with_points();
    doc.select_all_visible();
    let n = doc.delete_selected();
    assert_eq!(n, 3);
    assert!(doc.store.is_empty());
    assert!(doc.selection.is_empty());
    // Undo brings back all three.
    doc.undo().unwrap();
    assert_eq!(doc.store.len(), 3);
}

#[test]
fn remove_prefix_cascades_to_its_points() {
    let mut doc = doc_with_points();
    doc.select_all_visible();
    assert_eq!(doc.points_using_prefix("LOC"), 2);
    assert!(doc.remove_prefix("LOC"));
    assert!(!doc.prefixes.contains("LOC"));
    assert_eq!(doc.store.len(), 1);
    assert_eq!(doc.store.points()[0].point_id, "9");
    assert_eq!(doc.selection.len(), 1);
    // Undo restores the prefix and its points.
    doc.undo().unwrap();
    assert!(doc.prefixes.contains("LOC"));
    assert_eq!(doc.store.len(), 3);
}

#[test]
fn removing_an_unused_prefix_adds_no_history() {
    let mut doc = Document::new(50);
    doc.prefixes.add("CAM").unwrap();
    let before = doc.history.len();
    assert!(doc.remove_prefix("CAM"));
    assert_eq!(doc.history.len(), before);
    assert!(!doc.remove_prefix("CAM"));
}

#[test]
fn clear_all_is_a_non_undoable_boundary() {
    let mut doc = doc_with_points();
    doc.clear_all();
    assert!(doc.store.is_empty());
    assert!(!doc.history.can_undo());
    assert!(doc.undo().is_none());
}

#[test]
fn switching_filter_clears_the_selection() {
    let mut doc = doc_with_points();
    doc.select_all_visible();
    doc.set_filter(Filter::Prefix("LOC".to_string()));
    assert!(doc.selection.is_empty());
    assert_eq!(doc.visible_points().len(), 2);
    doc.select_all_visible();
    assert_eq!(doc.selection.len(), 2);
}

#[test]
fn edit_point_renames_in_place() {
    let mut doc = doc_with_points();
    let id = doc.store.points()[0].id;
    doc.edit_point(id, Some("LOC"), "7").unwrap();
    assert_eq!(doc.store.get(id).unwrap().point_id, "LOC-7");
    doc.undo().unwrap();
    assert_eq!(doc.store.get(id).unwrap().point_id, "LOC-1");
}

#[test]
fn duplicate_selects_the_copy() {
    let mut doc = doc_with_points();
    let src = doc.store.points()[0].id;
    let copy = doc.duplicate_point(src).unwrap();
    assert_eq!(doc.selection.ids(), &[copy]);
    assert_eq!(doc.store.get(copy).unwrap().point_id, "LOC-3");
}

#[test]
fn move_commits_one_snapshot_per_drag() {
    let mut doc = doc_with_points();
    let id = doc.store.points()[0].id;
    doc.selection.set_only(id);
    let before = doc.history.len();
    doc.move_selected(5.0, 5.0, [800.0, 600.0]);
    doc.move_selected(5.0, 5.0, [800.0, 600.0]);
    assert_eq!(doc.history.len(), before);
    doc.commit_move();
    assert_eq!(doc.history.len(), before + 1);
    let p = doc.store.get(id).unwrap();
    assert_eq!((p.x, p.y), (110.0, 110.0));
}

#[test]
fn reset_for_image_keeps_prefixes() {
    let mut doc = doc_with_points();
    doc.reset_for_image();
    assert!(doc.store.is_empty());
    assert!(doc.prefixes.contains("LOC"));
    assert!(!doc.history.can_undo());
}
