use chrono::Local;
use pointmap::{History, HistoryEntry};

fn entry(action: &str) -> HistoryEntry {
    HistoryEntry {
        points: Vec::new(),
        selected: Vec::new(),
        prefixes: Vec::new(),
        action: action.to_string(),
        timestamp: Local::now(),
    }
}

#[test]
fn fresh_history_has_nothing_to_undo_or_redo() {
    let h = History::new(10);
    assert!(!h.can_undo());
    assert!(!h.can_redo());
    assert!(h.current().is_none());
}

#[test]
fn undo_and_redo_walk_the_stack() {
    let mut h = History::new(10);
    h.push(entry("a"));
    h.push(entry("b"));
    h.push(entry("c"));
    assert_eq!(h.undo().unwrap().action, "b");
    assert_eq!(h.undo().unwrap().action, "a");
    assert!(h.undo().is_none());
    assert_eq!(h.redo().unwrap().action, "b");
    assert_eq!(h.redo().unwrap().action, "c");
    assert!(h.redo().is_none());
}

#[test]
fn push_after_undo_discards_the_redo_branch() {
    let mut h = History::new(10);
    h.push(entry("a"));
    h.push(entry("b"));
    h.push(entry("c"));
    h.undo();
    h.undo();
    h.push(entry("d"));
    assert_eq!(h.len(), 2);
    assert!(!h.can_redo());
    assert_eq!(h.current().unwrap().action, "d");
    assert_eq!(h.undo().unwrap().action, "a");
}

#[test]
fn capacity_evicts_oldest_entries() {
    let mut h = History::new(3);
    for a in ["a", "b", "c", "d", "e"] {
        h.push(entry(a));
    }
    assert_eq!(h.len(), 3);
    assert_eq!(h.undo().unwrap().action, "d");
    assert_eq!(h.undo().unwrap().action, "c");
    assert!(h.undo().is_none());
}

#[test]
fn capacity_two_keeps_only_the_last_two_states() {
    let mut h = History::new(2);
    h.push(entry("a"));
    h.push(entry("b"));
    h.push(entry("c"));
    assert_eq!(h.len(), 2);
    // "a" was evicted; the deepest reachable state is b.
    assert_eq!(h.undo().unwrap().action, "b");
    assert!(h.undo().is_none());
}

#[test]
fn capacity_change_applies_on_next_push() {
    let mut h = History::new(10);
    for a in ["a", "b", "c", "d"] {
        h.push(entry(a));
    }
    h.set_capacity(2);
    assert_eq!(h.len(), 4);
    h.push(entry("e"));
    assert_eq!(h.len(), 2);
    assert_eq!(h.current().unwrap().action, "e");
}

#[test]
fn reset_empties_the_stack() {
    let mut h = History::new(10);
    h.push(entry("a"));
    h.reset();
    assert!(h.is_empty());
    assert!(!h.can_undo());
}
