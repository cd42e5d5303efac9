//! Selection state and prefix-based visibility filtering.

use crate::data::points::{Point, PointId};

/// Derives the visible subset of the point store; never mutates it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    /// Only points whose namespace prefix equals this string. Unprefixed
    /// points are only visible under [`Filter::All`].
    Prefix(String),
}

impl Filter {
    pub fn matches(&self, point: &Point) -> bool {
        match self {
            Filter::All => true,
            Filter::Prefix(prefix) => point.prefix() == Some(prefix.as_str()),
        }
    }
}

/// The set of currently selected points, in selection order.
///
/// Holds stable [`PointId`]s rather than references; must be intersected
/// with the store whenever points are removed or a snapshot is restored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<PointId>,
}

impl Selection {
    pub fn ids(&self) -> &[PointId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.ids.contains(&id)
    }

    /// The most recently selected point, used as the range-select anchor.
    pub fn last(&self) -> Option<PointId> {
        self.ids.last().copied()
    }

    pub fn insert(&mut self, id: PointId) {
        if !self.contains(id) {
            self.ids.push(id);
        }
    }

    pub fn toggle(&mut self, id: PointId) {
        if let Some(i) = self.ids.iter().position(|&x| x == id) {
            self.ids.remove(i);
        } else {
            self.ids.push(id);
        }
    }

    /// Replace the selection with exactly one point.
    pub fn set_only(&mut self, id: PointId) {
        self.ids.clear();
        self.ids.push(id);
    }

    pub fn set(&mut self, ids: impl IntoIterator<Item = PointId>) {
        self.ids.clear();
        for id in ids {
            self.insert(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids no longer backed by a point.
    pub fn retain_present(&mut self, present: impl Fn(PointId) -> bool) {
        self.ids.retain(|&id| present(id));
    }

    pub fn remove(&mut self, id: PointId) {
        self.ids.retain(|&x| x != id);
    }

    /// Add every point falling within the rectangle spanned by the two
    /// corners. Corners may be inverted; the rectangle is re-normalized on
    /// every evaluation.
    pub fn select_in_rectangle(&mut self, points: &[Point], a: [f64; 2], b: [f64; 2]) {
        let (min_x, max_x) = (a[0].min(b[0]), a[0].max(b[0]));
        let (min_y, max_y) = (a[1].min(b[1]), a[1].max(b[1]));
        for p in points {
            if p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y {
                self.insert(p.id);
            }
        }
    }

    /// Marquee semantics: replace the selection with the rectangle contents.
    pub fn replace_with_rectangle(&mut self, points: &[Point], a: [f64; 2], b: [f64; 2]) {
        self.ids.clear();
        self.select_in_rectangle(points, a, b);
    }
}
