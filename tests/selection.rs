use pointmap::data::points::PointStore;
use pointmap::{Filter, PointId, Selection};

fn grid_store() -> PointStore {
    let mut store = PointStore::default();
    store.add_point(Some("LOC"), "1", 100.0, 100.0).unwrap();
    store.add_point(Some("LOC"), "2", 200.0, 200.0).unwrap();
    store.add_point(None, "9", 300.0, 300.0).unwrap();
    store
}

#[test]
fn toggle_adds_then_removes() {
    let mut sel = Selection::default();
    sel.toggle(PointId(1));
    assert!(sel.contains(PointId(1)));
    sel.toggle(PointId(1));
    assert!(sel.is_empty());
}

#[test]
fn insert_is_idempotent_and_ordered() {
    let mut sel = Selection::default();
    sel.insert(PointId(2));
    sel.insert(PointId(1));
    sel.insert(PointId(2));
    assert_eq!(sel.ids(), &[PointId(2), PointId(1)]);
    assert_eq!(sel.last(), Some(PointId(1)));
}

#[test]
fn set_only_replaces_everything() {
    let mut sel = Selection::default();
    sel.insert(PointId(1));
    sel.insert(PointId(2));
    sel.set_only(PointId(3));
    assert_eq!(sel.ids(), &[PointId(3)]);
}

#[test]
fn rectangle_selection_handles_inverted_corners() {
    let store = grid_store();
    let mut sel = Selection::default();
    sel.select_in_rectangle(store.points(), [250.0, 250.0], [50.0, 50.0]);
    assert_eq!(sel.len(), 2);
}

#[test]
fn replace_with_rectangle_drops_previous_selection() {
    let store = grid_store();
    let mut sel = Selection::default();
    sel.insert(store.points()[2].id);
    sel.replace_with_rectangle(store.points(), [50.0, 50.0], [150.0, 150.0]);
    assert_eq!(sel.ids(), &[store.points()[0].id]);
}

#[test]
fn retain_present_evicts_stale_ids() {
    let mut sel = Selection::default();
    sel.insert(PointId(1));
    sel.insert(PointId(2));
    sel.retain_present(|id| id == PointId(2));
    assert_eq!(sel.ids(), &[PointId(2)]);
}

#[test]
fn prefix_filter_hides_unprefixed_points() {
    let store = grid_store();
    let filter = Filter::Prefix("LOC".to_string());
    let visible: Vec<&str> = store
        .points()
        .iter()
        .filter(|p| filter.matches(p))
        .map(|p| p.point_id.as_str())
        .collect();
    assert_eq!(visible, vec!["LOC-1", "LOC-2"]);
    assert!(Filter::All.matches(&store.points()[2]));
}
