//! PointMap crate root: re-exports and module wiring.
//!
//! PointMap is an interactive image point-annotation tool built on
//! egui/eframe: load an image, click to place uniquely-identified labeled
//! points, drag/select/edit them with full undo/redo, and export the point
//! set as CSV.
//!
//! The crate splits into cohesive modules:
//! - `data`: the core model — point store, prefixes, selection, history,
//!   document context and CSV export
//! - `interaction`: the pointer state machine driving click/drag/box-select
//! - `config` / `persistence`: the settings surface and its JSON storage
//! - `hotkeys`: the keyboard surface
//! - `app`: the eframe application shell

pub mod app;
pub mod config;
pub mod data;
pub mod hotkeys;
pub mod interaction;
pub mod persistence;

// Public re-exports for a compact external API
pub use config::{PointMapConfig, ThemePreset};
pub use data::document::Document;
pub use data::export::{export_filename, export_filename_for, write_points_csv, SurfaceGeometry};
pub use data::history::{History, HistoryEntry};
pub use data::points::{Point, PointError, PointId, PointStore};
pub use data::prefixes::{PrefixError, PrefixRegistry};
pub use data::selection::{Filter, Selection};
pub use hotkeys::{command_for, KeyCommand};
pub use interaction::{ClickEffect, InteractionController, PointerModifiers};
