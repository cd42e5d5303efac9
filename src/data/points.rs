//! Point entities and the point store.
//!
//! The store is the single source of truth for point identity and geometry.
//! Points carry a stable [`PointId`] so selection sets and history snapshots
//! can reference them without aliasing live data.

use thiserror::Error;

use crate::data::selection::Filter;

/// Margin (display units) kept between a point and the surface edge when
/// points are moved. Independent of the configured click tolerance.
pub const MOVE_MARGIN: f64 = 15.0;

/// Geometry offset applied to a duplicated point relative to its source.
pub const DUPLICATE_OFFSET: f64 = 30.0;

/// Stable identity key for a point.
///
/// Allocated monotonically by [`PointStore`] and never reused within a
/// document, so ids referenced by old history snapshots can never collide
/// with points created later.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub u64);

/// A labeled point on the display surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub id: PointId,
    /// Unique label, either `"<PREFIX>-<alnum>"` or a bare alphanumeric id.
    pub point_id: String,
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The namespace prefix of this point's label, if it has one.
    pub fn prefix(&self) -> Option<&str> {
        namespace_of(&self.point_id)
    }
}

/// The namespace prefix of a label: everything before the first `-`.
pub fn namespace_of(point_id: &str) -> Option<&str> {
    point_id.split_once('-').map(|(prefix, _)| prefix)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PointError {
    #[error("point ID must contain at least one alphanumeric character")]
    EmptyId,
    #[error("a point with ID '{0}' already exists")]
    DuplicateId(String),
}

/// Strip everything but ASCII alphanumerics from a raw point id.
pub fn clean_id(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

fn compose_label(prefix: Option<&str>, clean: &str) -> String {
    match prefix {
        Some(p) if !p.is_empty() => format!("{}-{}", p, clean),
        _ => clean.to_string(),
    }
}

/// Numeric value of an id suffix: the leading run of decimal digits, or
/// `None` when the suffix does not start with a digit. Mirrors `parseInt`,
/// so `"5a"` counts as `5` for next-id allocation.
fn leading_int(s: &str) -> Option<u64> {
    let digits: &str = &s[..s.chars().take_while(|c| c.is_ascii_digit()).count()];
    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

/// Ordered collection of points; exclusive owner of point data.
#[derive(Clone, Debug, Default)]
pub struct PointStore {
    points: Vec<Point>,
    next_id: u64,
}

impl PointStore {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, id: PointId) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }

    fn label_taken(&self, label: &str, exclude: Option<PointId>) -> bool {
        self.points
            .iter()
            .any(|p| p.point_id == label && Some(p.id) != exclude)
    }

    fn alloc_id(&mut self) -> PointId {
        let id = PointId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a new point. The raw id is cleaned to ASCII alphanumerics;
    /// coordinates are rounded to integers. Fails without mutation on an
    /// empty cleaned id or a label collision.
    pub fn add_point(
        &mut self,
        prefix: Option<&str>,
        raw_id: &str,
        x: f64,
        y: f64,
    ) -> Result<PointId, PointError> {
        let clean = clean_id(raw_id);
        if clean.is_empty() {
            return Err(PointError::EmptyId);
        }
        let label = compose_label(prefix, &clean);
        if self.label_taken(&label, None) {
            return Err(PointError::DuplicateId(label));
        }
        let id = self.alloc_id();
        self.points.push(Point {
            id,
            point_id: label,
            x: x.round(),
            y: y.round(),
        });
        Ok(id)
    }

    /// Relabel an existing point in place. Same cleaning and validation as
    /// [`PointStore::add_point`], but uniqueness excludes the point itself.
    pub fn rename_point(
        &mut self,
        id: PointId,
        prefix: Option<&str>,
        raw_id: &str,
    ) -> Result<(), PointError> {
        let clean = clean_id(raw_id);
        if clean.is_empty() {
            return Err(PointError::EmptyId);
        }
        let label = compose_label(prefix, &clean);
        if self.label_taken(&label, Some(id)) {
            return Err(PointError::DuplicateId(label));
        }
        if let Some(p) = self.points.iter_mut().find(|p| p.id == id) {
            p.point_id = label;
        }
        Ok(())
    }

    /// Next numeric id within a namespace: `max(numeric suffixes) + 1`, or
    /// `1` when no point in the namespace has a numeric suffix. Saturates
    /// at `u64::MAX` instead of wrapping.
    pub fn next_suffix(&self, prefix: Option<&str>) -> u64 {
        let max = self
            .points
            .iter()
            .filter_map(|p| match prefix {
                Some(pre) if !pre.is_empty() => p
                    .point_id
                    .strip_prefix(pre)
                    .and_then(|rest| rest.strip_prefix('-'))
                    .and_then(leading_int),
                _ => {
                    if p.point_id.contains('-') {
                        None
                    } else {
                        leading_int(&p.point_id)
                    }
                }
            })
            .max();
        max.map(|m| m.saturating_add(1)).unwrap_or(1)
    }

    /// Append a copy of `id` with the next namespace id, offset by
    /// (+30, +30). Returns the new point's id, or `None` when the source
    /// is gone or the derived label is already taken.
    pub fn duplicate_point(&mut self, id: PointId) -> Option<PointId> {
        let source = self.get(id)?.clone();
        let prefix = source.prefix().map(str::to_string);
        let next = self.next_suffix(prefix.as_deref());
        let label = compose_label(prefix.as_deref(), &next.to_string());
        if self.label_taken(&label, None) {
            return None;
        }
        let new_id = self.alloc_id();
        self.points.push(Point {
            id: new_id,
            point_id: label,
            x: source.x + DUPLICATE_OFFSET,
            y: source.y + DUPLICATE_OFFSET,
        });
        Some(new_id)
    }

    pub fn delete_point(&mut self, id: PointId) -> bool {
        let before = self.points.len();
        self.points.retain(|p| p.id != id);
        self.points.len() != before
    }

    pub fn delete_many(&mut self, ids: &[PointId]) -> usize {
        let before = self.points.len();
        self.points.retain(|p| !ids.contains(&p.id));
        before - self.points.len()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Translate the given points by (dx, dy), clamping each axis into
    /// `[MOVE_MARGIN, extent - MOVE_MARGIN]`. Applied per move event, so a
    /// drag that pushes a point against the edge sticks there.
    pub fn move_points(&mut self, ids: &[PointId], dx: f64, dy: f64, extent: [f64; 2]) {
        for p in self.points.iter_mut().filter(|p| ids.contains(&p.id)) {
            p.x = MOVE_MARGIN.max((extent[0] - MOVE_MARGIN).min(p.x + dx));
            p.y = MOVE_MARGIN.max((extent[1] - MOVE_MARGIN).min(p.y + dy));
        }
    }

    /// First point (in insertion order) within Euclidean distance
    /// `tolerance` of `pos`. Only points visible under `filter` are eligible.
    pub fn hit_test(&self, pos: [f64; 2], tolerance: f64, filter: &Filter) -> Option<PointId> {
        self.points
            .iter()
            .filter(|p| filter.matches(p))
            .find(|p| {
                let dx = p.x - pos[0];
                let dy = p.y - pos[1];
                (dx * dx + dy * dy).sqrt() <= tolerance
            })
            .map(|p| p.id)
    }

    /// Total replacement of the point set, used when restoring a history
    /// snapshot. The id counter stays monotonic across restores.
    pub fn replace_all(&mut self, points: Vec<Point>) {
        if let Some(max) = points.iter().map(|p| p.id.0).max() {
            self.next_id = self.next_id.max(max + 1);
        }
        self.points = points;
    }
}
