//! Pointer interaction state machine for the annotation canvas.
//!
//! Consumes pointer events against a [`Document`] and drives click, drag,
//! range-select and box-select. The UI layer translates raw input into
//! these calls and carries out the returned effects.

use crate::data::document::Document;
use crate::data::points::PointId;

/// Cursor travel (display units) before a press is treated as a drag or a
/// marquee rather than a click.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Modifier keys relevant to pointer interaction. `command` covers both
/// Ctrl and the macOS Cmd key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PointerModifiers {
    pub command: bool,
    pub shift: bool,
}

impl PointerModifiers {
    pub const NONE: PointerModifiers = PointerModifiers {
        command: false,
        shift: false,
    };

    fn none(&self) -> bool {
        !self.command && !self.shift
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum DragState {
    Idle,
    /// Button is down but the threshold has not been crossed yet.
    Pressed {
        start: [f64; 2],
        on: Option<PointId>,
        /// Press landed on an already-selected point: crossing the
        /// threshold starts a point drag.
        drag_armed: bool,
        /// Press landed on empty space with no modifier: crossing the
        /// threshold starts a marquee.
        box_armed: bool,
    },
    DraggingPoints {
        last: [f64; 2],
    },
    BoxSelecting {
        anchor: [f64; 2],
        corner: [f64; 2],
    },
}

/// Effect the UI must carry out after a pointer-up.
#[derive(Clone, Debug, PartialEq)]
pub enum ClickEffect {
    /// Plain click on empty space: open the add-point flow at this location.
    OpenAddPoint { x: f64, y: f64 },
}

pub struct InteractionController {
    state: DragState,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    /// Undo/redo must only be invoked while this holds.
    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }

    /// The current marquee rectangle (normalized corners) for rendering.
    pub fn selection_box(&self) -> Option<([f64; 2], [f64; 2])> {
        match self.state {
            DragState::BoxSelecting { anchor, corner } => Some((
                [anchor[0].min(corner[0]), anchor[1].min(corner[1])],
                [anchor[0].max(corner[0]), anchor[1].max(corner[1])],
            )),
            _ => None,
        }
    }

    /// Abandon any in-progress gesture (pointer left the surface, Escape).
    /// A drag that already moved points commits its snapshot first, so the
    /// store never silently diverges from the history head.
    pub fn cancel(&mut self, doc: &mut Document) {
        if let DragState::DraggingPoints { .. } = self.state {
            doc.commit_move();
        }
        self.state = DragState::Idle;
    }

    pub fn pointer_down(
        &mut self,
        doc: &mut Document,
        pos: [f64; 2],
        mods: PointerModifiers,
        tolerance: f64,
    ) {
        match doc.hit_test(pos, tolerance) {
            Some(id) => {
                self.state = DragState::Pressed {
                    start: pos,
                    on: Some(id),
                    drag_armed: doc.selection.contains(id),
                    box_armed: false,
                };
            }
            None => {
                let box_armed = mods.none();
                if box_armed {
                    doc.selection.clear();
                }
                self.state = DragState::Pressed {
                    start: pos,
                    on: None,
                    drag_armed: false,
                    box_armed,
                };
            }
        }
    }

    pub fn pointer_move(&mut self, doc: &mut Document, pos: [f64; 2], extent: [f64; 2]) {
        match self.state {
            DragState::Idle => {}
            DragState::Pressed {
                start,
                drag_armed,
                box_armed,
                ..
            } => {
                if distance(start, pos) < DRAG_THRESHOLD {
                    return;
                }
                if drag_armed && !doc.selection.is_empty() {
                    self.state = DragState::DraggingPoints { last: start };
                    self.apply_drag(doc, pos, extent);
                } else if box_armed {
                    self.state = DragState::BoxSelecting {
                        anchor: start,
                        corner: pos,
                    };
                    doc.selection
                        .replace_with_rectangle(doc.store.points(), start, pos);
                }
            }
            DragState::DraggingPoints { .. } => self.apply_drag(doc, pos, extent),
            DragState::BoxSelecting { anchor, .. } => {
                self.state = DragState::BoxSelecting {
                    anchor,
                    corner: pos,
                };
                doc.selection
                    .replace_with_rectangle(doc.store.points(), anchor, pos);
            }
        }
    }

    /// Movement uses the frame-to-frame cursor delta, not an offset stored
    /// at press time, so clamped points do not snap back mid-drag.
    fn apply_drag(&mut self, doc: &mut Document, pos: [f64; 2], extent: [f64; 2]) {
        if let DragState::DraggingPoints { last } = self.state {
            doc.move_selected(pos[0] - last[0], pos[1] - last[1], extent);
            self.state = DragState::DraggingPoints { last: pos };
        }
    }

    /// Resolve the gesture. A completed point drag commits one history
    /// snapshot; a sub-threshold press resolves as a click.
    pub fn pointer_up(
        &mut self,
        doc: &mut Document,
        pos: [f64; 2],
        mods: PointerModifiers,
    ) -> Option<ClickEffect> {
        let state = self.state;
        self.state = DragState::Idle;
        match state {
            DragState::Idle => None,
            DragState::DraggingPoints { .. } => {
                doc.commit_move();
                None
            }
            DragState::BoxSelecting { .. } => None,
            DragState::Pressed { on, .. } => {
                if mods.command {
                    if let Some(id) = on {
                        doc.selection.toggle(id);
                    }
                    None
                } else if mods.shift && !doc.selection.is_empty() {
                    let anchor = doc
                        .selection
                        .last()
                        .and_then(|id| doc.store.get(id))
                        .map(|p| [p.x, p.y]);
                    if let Some(anchor) = anchor {
                        doc.selection
                            .select_in_rectangle(doc.store.points(), anchor, pos);
                    }
                    None
                } else if let Some(id) = on {
                    doc.selection.set_only(id);
                    None
                } else {
                    doc.selection.clear();
                    Some(ClickEffect::OpenAddPoint {
                        x: pos[0],
                        y: pos[1],
                    })
                }
            }
        }
    }

    /// Right-click targeting: a hit point becomes the sole selection unless
    /// it is already selected. State is not otherwise mutated; the context
    /// menu actions go through [`Document`] when chosen.
    pub fn context_click(
        &mut self,
        doc: &mut Document,
        pos: [f64; 2],
        tolerance: f64,
    ) -> Option<PointId> {
        let hit = doc.hit_test(pos, tolerance)?;
        if !doc.selection.contains(hit) {
            doc.selection.set_only(hit);
        }
        Some(hit)
    }
}

fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}
