//! The document context object: one open image's annotated state.
//!
//! Owns the point store, selection, prefix registry and history, and is the
//! only place that commits history snapshots. Every mutating operation
//! validates first, mutates, then commits exactly one labeled snapshot, so
//! no operation ever leaves the state partially mutated.

use chrono::Local;

use crate::data::history::{History, HistoryEntry};
use crate::data::points::{PointError, PointId, PointStore};
use crate::data::prefixes::PrefixRegistry;
use crate::data::selection::{Filter, Selection};

pub struct Document {
    pub store: PointStore,
    pub selection: Selection,
    pub prefixes: PrefixRegistry,
    pub history: History,
    pub filter: Filter,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(crate::data::history::DEFAULT_CAPACITY)
    }
}

impl Document {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            store: PointStore::default(),
            selection: Selection::default(),
            prefixes: PrefixRegistry::default(),
            history: History::new(history_capacity),
            filter: Filter::All,
        }
    }

    fn entry(&self, action: &str) -> HistoryEntry {
        HistoryEntry {
            points: self.store.points().to_vec(),
            selected: self.selection.ids().to_vec(),
            prefixes: self.prefixes.list_sorted(),
            action: action.to_string(),
            timestamp: Local::now(),
        }
    }

    /// Deep-snapshot the current state under an action label.
    pub fn snapshot(&mut self, action: &str) {
        let entry = self.entry(action);
        self.history.push(entry);
    }

    /// Points visible under the active filter, in insertion order.
    pub fn visible_points(&self) -> Vec<&crate::data::points::Point> {
        self.store
            .points()
            .iter()
            .filter(|p| self.filter.matches(p))
            .collect()
    }

    /// Hit-test against visible points only.
    pub fn hit_test(&self, pos: [f64; 2], tolerance: f64) -> Option<PointId> {
        self.store.hit_test(pos, tolerance, &self.filter)
    }

    /// Switching the filter clears the selection.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.selection.clear();
    }

    pub fn select_all_visible(&mut self) {
        let ids: Vec<PointId> = self.visible_points().iter().map(|p| p.id).collect();
        self.selection.set(ids);
    }

    // ── Mutating operations (one snapshot each, after the mutation) ────────

    pub fn add_point(
        &mut self,
        prefix: Option<&str>,
        raw_id: &str,
        x: f64,
        y: f64,
    ) -> Result<PointId, PointError> {
        let id = self.store.add_point(prefix, raw_id, x, y)?;
        self.selection.set_only(id);
        let label = self.store.get(id).map(|p| p.point_id.clone()).unwrap_or_default();
        self.snapshot(&format!("Add point {}", label));
        Ok(id)
    }

    pub fn edit_point(
        &mut self,
        id: PointId,
        prefix: Option<&str>,
        raw_id: &str,
    ) -> Result<(), PointError> {
        let old = match self.store.get(id) {
            Some(p) => p.point_id.clone(),
            None => return Ok(()),
        };
        self.store.rename_point(id, prefix, raw_id)?;
        let new = self.store.get(id).map(|p| p.point_id.clone()).unwrap_or_default();
        self.snapshot(&format!("Edit point {} to {}", old, new));
        Ok(())
    }

    pub fn duplicate_point(&mut self, id: PointId) -> Option<PointId> {
        let source = self.store.get(id)?.point_id.clone();
        let new_id = self.store.duplicate_point(id)?;
        self.selection.set_only(new_id);
        self.snapshot(&format!("Duplicate point {}", source));
        Some(new_id)
    }

    pub fn delete_point(&mut self, id: PointId) -> bool {
        let label = match self.store.get(id) {
            Some(p) => p.point_id.clone(),
            None => return false,
        };
        self.store.delete_point(id);
        self.selection.remove(id);
        self.snapshot(&format!("Delete point {}", label));
        true
    }

    /// Delete the current selection. Confirmation (when configured) is a
    /// caller precondition. Returns the number of points removed.
    pub fn delete_selected(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        let ids = self.selection.ids().to_vec();
        let n = self.store.delete_many(&ids);
        self.selection.clear();
        self.snapshot(&format!("Delete {} point(s)", n));
        n
    }

    /// Remove all points and restart history at a fresh baseline. A
    /// non-undoable boundary.
    pub fn clear_all(&mut self) {
        self.store.clear();
        self.selection.clear();
        self.history.reset();
        self.snapshot("Clear all points");
    }

    /// How many points use `prefix` as their namespace. The UI asks this
    /// before invoking the destructive cascade.
    pub fn points_using_prefix(&self, prefix: &str) -> usize {
        self.store
            .points()
            .iter()
            .filter(|p| p.prefix() == Some(prefix))
            .count()
    }

    /// Remove a prefix. If points use it, this is a destructive cascade:
    /// those points are deleted (and evicted from the selection) before the
    /// prefix leaves the registry, and one snapshot is committed. With zero
    /// users the prefix is simply dropped, with no history entry.
    pub fn remove_prefix(&mut self, prefix: &str) -> bool {
        if !self.prefixes.contains(prefix) {
            return false;
        }
        let users: Vec<PointId> = self
            .store
            .points()
            .iter()
            .filter(|p| p.prefix() == Some(prefix))
            .map(|p| p.id)
            .collect();
        self.prefixes.remove(prefix);
        if !users.is_empty() {
            self.store.delete_many(&users);
            self.selection.retain_present(|id| !users.contains(&id));
            self.snapshot(&format!("Remove prefix {} and its points", prefix));
        }
        true
    }

    /// Translate the selected points, clamped to the surface. Called per
    /// pointer-move; the drag commits once via [`Document::commit_move`].
    pub fn move_selected(&mut self, dx: f64, dy: f64, extent: [f64; 2]) {
        let ids = self.selection.ids().to_vec();
        self.store.move_points(&ids, dx, dy, extent);
    }

    /// Commit one snapshot for a completed drag.
    pub fn commit_move(&mut self) {
        let n = self.selection.len();
        self.snapshot(&format!("Move {} point(s)", n));
    }

    /// Undo one step, restoring the previous snapshot in full. Returns the
    /// label of the action that was undone.
    pub fn undo(&mut self) -> Option<String> {
        if !self.history.can_undo() {
            return None;
        }
        let undone = self.history.current().map(|e| e.action.clone());
        let entry = self.history.undo()?.clone();
        self.restore(&entry);
        undone
    }

    /// Redo one step. Returns the label of the action that was redone.
    pub fn redo(&mut self) -> Option<String> {
        let entry = self.history.redo()?.clone();
        self.restore(&entry);
        Some(entry.action)
    }

    /// Total state replacement from a snapshot, never a merge.
    fn restore(&mut self, entry: &HistoryEntry) {
        self.store.replace_all(entry.points.clone());
        self.selection.set(entry.selected.iter().copied());
        self.selection
            .retain_present(|id| entry.points.iter().any(|p| p.id == id));
        self.prefixes.replace_all(entry.prefixes.clone());
    }

    /// Reset for a newly loaded image: points, selection and history are
    /// cleared (prefixes survive) and one fresh baseline is committed.
    pub fn reset_for_image(&mut self) {
        self.store.clear();
        self.selection.clear();
        self.history.reset();
        self.snapshot("Load image");
    }
}
