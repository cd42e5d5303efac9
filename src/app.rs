//! The eframe application shell: canvas painting, toolbars, dialogs and
//! notifications around the core [`Document`].
//!
//! All state transitions happen synchronously inside the egui event pass;
//! the core is only touched through `Document` / `InteractionController`.

use std::path::Path;
use std::time::{Duration, Instant};

use eframe::egui;
use egui::{Align2, Color32, CornerRadius, FontId, Pos2, Rect, Stroke, StrokeKind};

use crate::config::{PointMapConfig, ThemePreset};
use crate::data::document::Document;
use crate::data::export::{export_filename, write_points_csv, SurfaceGeometry};
use crate::data::points::PointId;
use crate::data::selection::Filter;
use crate::hotkeys::{command_for, KeyCommand};
use crate::interaction::{ClickEffect, InteractionController, PointerModifiers};
use crate::persistence;

/// Per-prefix marker colors, assigned by sorted prefix index.
const PREFIX_COLORS: [Color32; 8] = [
    Color32::from_rgb(0x22, 0xc5, 0x5e),
    Color32::from_rgb(0x1e, 0x40, 0xaf),
    Color32::from_rgb(0xea, 0xb3, 0x08),
    Color32::from_rgb(0x06, 0x5f, 0x46),
    Color32::from_rgb(0xef, 0x44, 0x44),
    Color32::from_rgb(0x14, 0xb8, 0xa6),
    Color32::from_rgb(0x84, 0xcc, 0x16),
    Color32::from_rgb(0x4a, 0xde, 0x80),
];

/// Marker color for unprefixed points and selection accents.
const DEFAULT_POINT_COLOR: Color32 = Color32::from_rgb(0x1e, 0x40, 0xaf);

#[derive(Copy, Clone, PartialEq, Eq)]
enum ToastKind {
    Success,
    Error,
    Info,
}

struct Toast {
    text: String,
    kind: ToastKind,
    until: Instant,
}

/// Add/edit point dialog state. `editing == None` means adding at `at`.
struct PointDialog {
    editing: Option<PointId>,
    /// Selected prefix; empty string means unprefixed.
    prefix: String,
    raw_id: String,
    at: Option<[f64; 2]>,
}

struct ContextMenu {
    target: PointId,
    pos: Pos2,
}

enum ConfirmAction {
    DeleteSelected,
    ClearAll,
    RemovePrefix(String),
}

pub struct PointMapApp {
    doc: Document,
    controller: InteractionController,
    config: PointMapConfig,

    texture: Option<egui::TextureHandle>,
    geometry: Option<SurfaceGeometry>,
    last_canvas_avail: egui::Vec2,

    point_dialog: Option<PointDialog>,
    context_menu: Option<ContextMenu>,
    pending_confirm: Option<ConfirmAction>,
    settings_open: bool,
    settings_draft: PointMapConfig,
    new_prefix_input: String,
    toasts: Vec<Toast>,
}

impl Default for PointMapApp {
    fn default() -> Self {
        Self::new()
    }
}

impl PointMapApp {
    pub fn new() -> Self {
        let config = persistence::load_or_default();
        let doc = Document::new(config.history_size);
        Self {
            doc,
            controller: InteractionController::new(),
            config: config.clone(),
            texture: None,
            geometry: None,
            last_canvas_avail: egui::vec2(1200.0, 800.0),
            point_dialog: None,
            context_menu: None,
            pending_confirm: None,
            settings_open: false,
            settings_draft: config,
            new_prefix_input: String::new(),
            toasts: Vec::new(),
        }
    }

    // ── Notifications ───────────────────────────────────────────────────

    fn toast(&mut self, text: impl Into<String>, kind: ToastKind, secs: u64) {
        self.toasts.push(Toast {
            text: text.into(),
            kind,
            until: Instant::now() + Duration::from_secs(secs),
        });
    }

    fn toast_success(&mut self, text: impl Into<String>) {
        self.toast(text, ToastKind::Success, 3);
    }

    fn toast_error(&mut self, text: impl Into<String>) {
        self.toast(text, ToastKind::Error, 4);
    }

    fn toast_info(&mut self, text: impl Into<String>) {
        self.toast(text, ToastKind::Info, 2);
    }

    // ── Image loading ───────────────────────────────────────────────────

    fn pick_image(&mut self, ctx: &egui::Context) {
        let picked = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "webp", "bmp"])
            .pick_file();
        if let Some(path) = picked {
            self.load_image_from_path(ctx, &path);
        }
    }

    fn load_image_from_path(&mut self, ctx: &egui::Context, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());
        match std::fs::read(path) {
            Ok(bytes) => self.load_image_bytes(ctx, &bytes, &name),
            Err(e) => self.toast_error(format!("Failed to read {}: {}", name, e)),
        }
    }

    fn load_image_bytes(&mut self, ctx: &egui::Context, bytes: &[u8], name: &str) {
        let decoded = match image::load_from_memory(bytes) {
            Ok(img) => img,
            Err(e) => {
                self.toast_error(format!("Failed to decode image: {}", e));
                return;
            }
        };
        let rgba = decoded.to_rgba8();
        let (w, h) = rgba.dimensions();
        let color_image =
            egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], rgba.as_raw());
        let texture = ctx.load_texture(name.to_string(), color_image, egui::TextureOptions::LINEAR);

        // Scale down to fit the canvas area, never up.
        let max_w = (self.last_canvas_avail.x - 16.0).max(320.0) as f64;
        let max_h = (self.last_canvas_avail.y - 16.0).max(240.0) as f64;
        let scale = (max_w / w as f64).min(max_h / h as f64).min(1.0);

        self.geometry = Some(SurfaceGeometry {
            display_width: (w as f64 * scale).round(),
            display_height: (h as f64 * scale).round(),
            original_width: w as f64,
            original_height: h as f64,
        });
        self.texture = Some(texture);

        self.controller.cancel(&mut self.doc);
        self.point_dialog = None;
        self.context_menu = None;
        self.doc.reset_for_image();
        self.toast_success(format!("Image loaded: {}", name));
    }

    // ── Export ──────────────────────────────────────────────────────────

    fn export_csv(&mut self) {
        if self.doc.store.is_empty() {
            self.toast_error("No points to export");
            return;
        }
        let Some(geometry) = self.geometry else {
            return;
        };
        let picked = rfd::FileDialog::new()
            .set_file_name(export_filename())
            .save_file();
        let Some(path) = picked else {
            return;
        };
        let result = std::fs::File::create(&path).and_then(|mut f| {
            write_points_csv(&mut f, self.doc.store.points(), &self.config, &geometry)
        });
        match result {
            Ok(()) => {
                self.toast_success(format!("Exported {} points to CSV", self.doc.store.len()))
            }
            Err(e) => self.toast_error(format!("Export failed: {}", e)),
        }
    }

    // ── Destructive flows (confirmation is asked here, not in the core) ──

    fn request_delete_selected(&mut self) {
        if self.doc.selection.is_empty() {
            self.toast_error("No points selected");
            return;
        }
        if self.config.confirm_delete {
            self.pending_confirm = Some(ConfirmAction::DeleteSelected);
        } else {
            let n = self.doc.delete_selected();
            self.toast_success(format!("Deleted {} point(s)", n));
        }
    }

    fn request_clear_all(&mut self) {
        if self.doc.store.is_empty() {
            self.toast_error("No points to clear");
            return;
        }
        if self.config.confirm_delete {
            self.pending_confirm = Some(ConfirmAction::ClearAll);
        } else {
            self.doc.clear_all();
            self.toast_success("All points cleared");
        }
    }

    fn request_remove_prefix(&mut self, prefix: String) {
        if self.doc.points_using_prefix(&prefix) > 0 {
            // Cascade always needs explicit confirmation.
            self.pending_confirm = Some(ConfirmAction::RemovePrefix(prefix));
        } else {
            self.doc.remove_prefix(&prefix);
            self.reset_filter_if_gone(&prefix);
            self.toast_success(format!("Removed prefix: {}", prefix));
        }
    }

    fn reset_filter_if_gone(&mut self, prefix: &str) {
        if self.doc.filter == Filter::Prefix(prefix.to_string()) {
            self.doc.set_filter(Filter::All);
        }
    }

    // ── Dialogs ─────────────────────────────────────────────────────────

    fn open_add_dialog(&mut self, x: f64, y: f64) {
        let prefix = self
            .doc
            .prefixes
            .first()
            .map(str::to_string)
            .unwrap_or_default();
        let raw_id = if self.config.auto_suggest_ids {
            self.doc.store.next_suffix(opt_prefix(&prefix)).to_string()
        } else {
            String::new()
        };
        self.point_dialog = Some(PointDialog {
            editing: None,
            prefix,
            raw_id,
            at: Some([x, y]),
        });
    }

    fn open_edit_dialog(&mut self, id: PointId) {
        let Some(point) = self.doc.store.get(id) else {
            return;
        };
        let (prefix, raw_id) = match point.point_id.split_once('-') {
            Some((p, rest)) => (p.to_string(), rest.to_string()),
            None => (String::new(), point.point_id.clone()),
        };
        self.point_dialog = Some(PointDialog {
            editing: Some(id),
            prefix,
            raw_id,
            at: None,
        });
    }

    fn submit_point_dialog(&mut self) {
        let Some(dialog) = self.point_dialog.take() else {
            return;
        };
        let prefix = opt_prefix(&dialog.prefix);
        let result = match dialog.editing {
            Some(id) => self
                .doc
                .edit_point(id, prefix, &dialog.raw_id)
                .map(|_| self.doc.store.get(id).map(|p| p.point_id.clone())),
            None => match dialog.at {
                Some([x, y]) => self
                    .doc
                    .add_point(prefix, &dialog.raw_id, x, y)
                    .map(|id| self.doc.store.get(id).map(|p| p.point_id.clone())),
                None => return,
            },
        };
        match result {
            Ok(label) => {
                let label = label.unwrap_or_default();
                if dialog.editing.is_some() {
                    self.toast_success(format!("Point updated: {}", label));
                } else {
                    self.toast_success(format!("Point added: {}", label));
                }
            }
            Err(e) => {
                self.toast_error(e.to_string());
                // Keep the dialog open so the user can fix the input.
                self.point_dialog = Some(dialog);
            }
        }
    }

    // ── Keyboard ────────────────────────────────────────────────────────

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let commands: Vec<KeyCommand> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } => command_for(*key, *modifiers),
                    _ => None,
                })
                .collect()
        });
        for cmd in commands {
            match cmd {
                KeyCommand::Cancel => {
                    self.point_dialog = None;
                    self.context_menu = None;
                    self.controller.cancel(&mut self.doc);
                    self.doc.selection.clear();
                }
                KeyCommand::DeleteSelection => self.request_delete_selected(),
                KeyCommand::Undo => self.undo(),
                KeyCommand::Redo => self.redo(),
                KeyCommand::SelectAll => self.doc.select_all_visible(),
                KeyCommand::Export => {
                    if !self.doc.store.is_empty() {
                        self.export_csv();
                    }
                }
            }
        }
    }

    fn undo(&mut self) {
        // Undo/redo is gated on the controller being idle.
        if !self.controller.is_idle() {
            return;
        }
        if let Some(action) = self.doc.undo() {
            self.toast_info(format!("Undid: {}", action));
        }
    }

    fn redo(&mut self) {
        if !self.controller.is_idle() {
            return;
        }
        if let Some(action) = self.doc.redo() {
            self.toast_info(format!("Redid: {}", action));
        }
    }

    // ── Panels ──────────────────────────────────────────────────────────

    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("📂 Load Image").clicked() {
                    self.pick_image(ctx);
                }
                ui.separator();
                let undo_enabled = self.doc.history.can_undo() && self.controller.is_idle();
                if ui
                    .add_enabled(undo_enabled, egui::Button::new("↶ Undo"))
                    .clicked()
                {
                    self.undo();
                }
                let redo_enabled = self.doc.history.can_redo() && self.controller.is_idle();
                if ui
                    .add_enabled(redo_enabled, egui::Button::new("↷ Redo"))
                    .clicked()
                {
                    self.redo();
                }
                ui.separator();
                let has_points = !self.doc.store.is_empty();
                if ui
                    .add_enabled(has_points, egui::Button::new("🗑 Clear All"))
                    .clicked()
                {
                    self.request_clear_all();
                }
                if ui
                    .add_enabled(has_points, egui::Button::new("💾 Export CSV"))
                    .clicked()
                {
                    self.export_csv();
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙ Settings").clicked() {
                        self.settings_draft = self.config.clone();
                        self.settings_open = true;
                    }
                    ui.label(format!(
                        "{} points, {} selected",
                        self.doc.store.len(),
                        self.doc.selection.len()
                    ));
                });
            });
        });
    }

    fn side_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("sidebar")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Prefixes");
                let mut remove: Option<String> = None;
                for prefix in self.doc.prefixes.list_sorted() {
                    ui.horizontal(|ui| {
                        ui.label(&prefix);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("✖").on_hover_text("Remove prefix").clicked() {
                                remove = Some(prefix.clone());
                            }
                        });
                    });
                }
                if let Some(prefix) = remove {
                    self.request_remove_prefix(prefix);
                }
                ui.horizontal(|ui| {
                    let edit = egui::TextEdit::singleline(&mut self.new_prefix_input)
                        .hint_text("New prefix")
                        .desired_width(120.0);
                    let response = ui.add(edit);
                    let submitted =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("Add").clicked() || submitted {
                        let raw = self.new_prefix_input.clone();
                        match self.doc.prefixes.add(&raw) {
                            Ok(prefix) => {
                                self.new_prefix_input.clear();
                                self.toast_success(format!("Added prefix: {}", prefix));
                            }
                            Err(e) => self.toast_error(e.to_string()),
                        }
                    }
                });

                ui.separator();
                ui.heading("Filter");
                let mut new_filter: Option<Filter> = None;
                let all_active = self.doc.filter == Filter::All;
                if ui.selectable_label(all_active, "All Points").clicked() && !all_active {
                    new_filter = Some(Filter::All);
                }
                for prefix in self.doc.prefixes.list_sorted() {
                    let filter = Filter::Prefix(prefix.clone());
                    let active = self.doc.filter == filter;
                    if ui
                        .selectable_label(active, format!("{} Points", prefix))
                        .clicked()
                        && !active
                    {
                        new_filter = Some(filter);
                    }
                }
                if let Some(filter) = new_filter {
                    self.doc.set_filter(filter);
                }

                ui.separator();
                ui.heading("Selection");
                if ui.button("Select All").clicked() {
                    self.doc.select_all_visible();
                }
                if ui.button("Deselect All").clicked() {
                    self.doc.selection.clear();
                }
                let any_selected = !self.doc.selection.is_empty();
                if ui
                    .add_enabled(any_selected, egui::Button::new("Delete Selected"))
                    .clicked()
                {
                    self.request_delete_selected();
                }
            });
    }

    // ── Canvas ──────────────────────────────────────────────────────────

    fn canvas(&mut self, ui: &mut egui::Ui) {
        self.last_canvas_avail = ui.available_size();
        let (Some(texture), Some(geometry)) = (&self.texture, self.geometry) else {
            ui.centered_and_justified(|ui| {
                ui.label("Drop an image here or use Load Image to start mapping points");
            });
            return;
        };
        let tex_id = texture.id();
        let size = egui::vec2(geometry.display_width as f32, geometry.display_height as f32);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
        let rect = response.rect;
        painter.image(
            tex_id,
            rect,
            Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0)),
            Color32::WHITE,
        );

        let modal_open = self.point_dialog.is_some() || self.pending_confirm.is_some();
        if !modal_open {
            self.handle_pointer(ui.ctx(), &response, geometry);
        }

        self.paint_selection_box(&painter, rect.min);
        self.paint_points(&painter, rect.min);
    }

    fn handle_pointer(
        &mut self,
        ctx: &egui::Context,
        response: &egui::Response,
        geometry: SurfaceGeometry,
    ) {
        let origin = response.rect.min;
        let (pressed, released, pointer_pos, mods) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
                PointerModifiers {
                    command: i.modifiers.command,
                    shift: i.modifiers.shift,
                },
            )
        });
        let local = pointer_pos.map(|p| [(p.x - origin.x) as f64, (p.y - origin.y) as f64]);
        let extent = [geometry.display_width, geometry.display_height];
        let tolerance = self.config.click_tolerance;

        if response.secondary_clicked() {
            if let (Some(lp), Some(pp)) = (local, response.interact_pointer_pos()) {
                if let Some(id) = self.controller.context_click(&mut self.doc, lp, tolerance) {
                    self.context_menu = Some(ContextMenu { target: id, pos: pp });
                }
            }
        }

        if pressed && response.hovered() {
            if let Some(lp) = local {
                self.controller
                    .pointer_down(&mut self.doc, lp, mods, tolerance);
            }
        }
        if let Some(lp) = local {
            self.controller.pointer_move(&mut self.doc, lp, extent);
        }
        if released {
            match local {
                Some(lp) => {
                    let effect = self.controller.pointer_up(&mut self.doc, lp, mods);
                    if let Some(ClickEffect::OpenAddPoint { x, y }) = effect {
                        let inside = pointer_pos.is_some_and(|p| response.rect.contains(p));
                        if inside {
                            self.open_add_dialog(x, y);
                        }
                    }
                }
                None => self.controller.cancel(&mut self.doc),
            }
        }
    }

    fn paint_selection_box(&self, painter: &egui::Painter, origin: Pos2) {
        let Some((min, max)) = self.controller.selection_box() else {
            return;
        };
        let rect = Rect::from_min_max(
            origin + egui::vec2(min[0] as f32, min[1] as f32),
            origin + egui::vec2(max[0] as f32, max[1] as f32),
        );
        let accent = self.config.primary_color1;
        painter.rect_filled(rect, CornerRadius::ZERO, accent.gamma_multiply(0.15));
        painter.rect_stroke(
            rect,
            CornerRadius::ZERO,
            Stroke::new(2.0, accent),
            StrokeKind::Inside,
        );
    }

    fn prefix_color(&self, prefix: Option<&str>) -> Color32 {
        let Some(prefix) = prefix else {
            return DEFAULT_POINT_COLOR;
        };
        let sorted = self.doc.prefixes.list_sorted();
        match sorted.iter().position(|p| p == prefix) {
            Some(i) => PREFIX_COLORS[i % PREFIX_COLORS.len()],
            None => DEFAULT_POINT_COLOR,
        }
    }

    fn paint_points(&self, painter: &egui::Painter, origin: Pos2) {
        let point_size = self.config.point_size;
        let accent = self.config.primary_color1;
        let font = FontId::proportional(self.config.label_font_size);
        for point in self.doc.visible_points() {
            let center = origin + egui::vec2(point.x as f32, point.y as f32);
            let selected = self.doc.selection.contains(point.id);
            let color = self.prefix_color(point.prefix());

            if selected {
                painter.circle_stroke(center, point_size + 6.0, Stroke::new(3.0, accent));
            }
            painter.circle_filled(center, point_size, color);
            painter.circle_filled(center, point_size * 0.375, Color32::WHITE);
            painter.circle_filled(center, point_size * 0.125, color);

            if self.config.show_labels {
                let galley = painter.layout_no_wrap(
                    point.point_id.clone(),
                    font.clone(),
                    Color32::from_rgb(0x1f, 0x29, 0x37),
                );
                let label_pos = center + egui::vec2(point_size + 7.0, -point_size * 0.5);
                let bg = Rect::from_min_size(label_pos, galley.size()).expand(3.0);
                painter.rect_filled(
                    bg,
                    CornerRadius::same(2),
                    Color32::from_rgba_unmultiplied(255, 255, 255, 230),
                );
                painter.rect_stroke(
                    bg,
                    CornerRadius::same(2),
                    Stroke::new(1.0, if selected { accent } else { color }),
                    StrokeKind::Inside,
                );
                painter.galley(label_pos, galley, Color32::BLACK);
            }
        }
    }

    // ── Floating windows ────────────────────────────────────────────────

    fn context_menu_ui(&mut self, ctx: &egui::Context) {
        let Some(menu) = &self.context_menu else {
            return;
        };
        let target = menu.target;
        let pos = menu.pos;
        let mut action: Option<&'static str> = None;
        let inner = egui::Area::new(egui::Id::new("point_context_menu"))
            .fixed_pos(pos)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    if ui.button("✏ Edit").clicked() {
                        action = Some("edit");
                    }
                    if ui.button("⎘ Duplicate").clicked() {
                        action = Some("duplicate");
                    }
                    if ui.button("🗑 Delete").clicked() {
                        action = Some("delete");
                    }
                });
            });
        if let Some(action) = action {
            self.context_menu = None;
            match action {
                "edit" => self.open_edit_dialog(target),
                "duplicate" => {
                    if let Some(new_id) = self.doc.duplicate_point(target) {
                        let label = self
                            .doc
                            .store
                            .get(new_id)
                            .map(|p| p.point_id.clone())
                            .unwrap_or_default();
                        self.toast_success(format!("Duplicated point: {}", label));
                    }
                }
                "delete" => {
                    let label = self
                        .doc
                        .store
                        .get(target)
                        .map(|p| p.point_id.clone())
                        .unwrap_or_default();
                    if self.doc.delete_point(target) {
                        self.toast_success(format!("Deleted point: {}", label));
                    }
                }
                _ => {}
            }
        } else if inner.response.clicked_elsewhere() {
            self.context_menu = None;
        }
    }

    fn point_dialog_ui(&mut self, ctx: &egui::Context) {
        let Some(dialog) = &mut self.point_dialog else {
            return;
        };
        let is_edit = dialog.editing.is_some();
        let title = if is_edit { "✏ Edit Point" } else { "📍 Add New Point" };
        let mut submit = false;
        let mut cancel = false;
        let prefixes = self.doc.prefixes.list_sorted();
        let prefix_before = dialog.prefix.clone();

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Prefix:");
                    let selected_text = if dialog.prefix.is_empty() {
                        "No Prefix".to_string()
                    } else {
                        dialog.prefix.clone()
                    };
                    egui::ComboBox::from_id_salt("point_prefix")
                        .selected_text(selected_text)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut dialog.prefix, String::new(), "No Prefix");
                            for p in &prefixes {
                                ui.selectable_value(&mut dialog.prefix, p.clone(), p);
                            }
                        });
                });
                ui.horizontal(|ui| {
                    ui.label("Point ID:");
                    let response = ui.text_edit_singleline(&mut dialog.raw_id);
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        submit = true;
                    }
                });
                ui.horizontal(|ui| {
                    if ui.button(if is_edit { "Save" } else { "Add" }).clicked() {
                        submit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        // Re-suggest the next id when the prefix choice changes mid-add.
        if !is_edit && self.config.auto_suggest_ids && dialog.prefix != prefix_before {
            dialog.raw_id = self
                .doc
                .store
                .next_suffix(opt_prefix(&dialog.prefix))
                .to_string();
        }

        if submit {
            self.submit_point_dialog();
        } else if cancel {
            self.point_dialog = None;
        }
    }

    fn confirm_dialog_ui(&mut self, ctx: &egui::Context) {
        let Some(action) = &self.pending_confirm else {
            return;
        };
        let message = match action {
            ConfirmAction::DeleteSelected => {
                let ids: Vec<String> = self
                    .doc
                    .selection
                    .ids()
                    .iter()
                    .filter_map(|&id| self.doc.store.get(id))
                    .map(|p| p.point_id.clone())
                    .collect();
                format!(
                    "Delete {} selected point(s)? ({})",
                    self.doc.selection.len(),
                    ids.join(", ")
                )
            }
            ConfirmAction::ClearAll => format!(
                "Clear all {} points? This cannot be undone.",
                self.doc.store.len()
            ),
            ConfirmAction::RemovePrefix(prefix) => format!(
                "This prefix is used by {} point(s). Remove anyway?",
                self.doc.points_using_prefix(prefix)
            ),
        };
        let mut confirmed = false;
        let mut declined = false;
        egui::Window::new("Confirm")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(message);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        declined = true;
                    }
                    if ui.button("Confirm").clicked() {
                        confirmed = true;
                    }
                });
            });
        if declined {
            // Declined confirmation simply abandons the operation.
            self.pending_confirm = None;
            return;
        }
        if confirmed {
            match self.pending_confirm.take() {
                Some(ConfirmAction::DeleteSelected) => {
                    let n = self.doc.delete_selected();
                    self.toast_success(format!("Deleted {} point(s)", n));
                }
                Some(ConfirmAction::ClearAll) => {
                    self.doc.clear_all();
                    self.toast_success("All points cleared");
                }
                Some(ConfirmAction::RemovePrefix(prefix)) => {
                    self.doc.remove_prefix(&prefix);
                    self.reset_filter_if_gone(&prefix);
                    self.toast_success(format!("Removed prefix: {}", prefix));
                }
                None => {}
            }
        }
    }

    fn settings_ui(&mut self, ctx: &egui::Context) {
        if !self.settings_open {
            return;
        }
        let mut apply = false;
        let mut cancel = false;
        let mut import = false;
        let mut export = false;
        let draft = &mut self.settings_draft;
        egui::Window::new("⚙ Settings")
            .collapsible(false)
            .default_width(360.0)
            .show(ctx, |ui| {
                ui.heading("Appearance");
                ui.add(egui::Slider::new(&mut draft.point_size, 4.0..=20.0).text("Point size"));
                ui.add(
                    egui::Slider::new(&mut draft.label_font_size, 8.0..=24.0).text("Label font"),
                );
                ui.checkbox(&mut draft.show_labels, "Show labels");
                ui.horizontal(|ui| {
                    for theme in ThemePreset::all() {
                        if ui
                            .selectable_label(draft.theme == theme, theme.name())
                            .clicked()
                        {
                            draft.apply_theme(theme);
                        }
                    }
                });
                ui.horizontal(|ui| {
                    ui.color_edit_button_srgba(&mut draft.primary_color1);
                    ui.color_edit_button_srgba(&mut draft.primary_color2);
                    ui.color_edit_button_srgba(&mut draft.secondary_color1);
                    ui.color_edit_button_srgba(&mut draft.secondary_color2);
                    ui.label("Theme colors");
                });

                ui.separator();
                ui.heading("Behavior");
                ui.checkbox(&mut draft.auto_suggest_ids, "Auto-suggest point IDs");
                ui.checkbox(&mut draft.confirm_delete, "Confirm before deleting");
                ui.add(
                    egui::Slider::new(&mut draft.click_tolerance, 5.0..=30.0)
                        .text("Click tolerance"),
                );

                ui.separator();
                ui.heading("Export");
                ui.checkbox(&mut draft.include_point_type, "Include point type");
                ui.checkbox(
                    &mut draft.include_original_coords,
                    "Include original coordinates",
                );
                ui.horizontal(|ui| {
                    ui.label("CSV delimiter:");
                    egui::ComboBox::from_id_salt("csv_delimiter")
                        .selected_text(delimiter_label(draft.csv_delimiter))
                        .show_ui(ui, |ui| {
                            for d in [',', ';', '\t', '|'] {
                                ui.selectable_value(
                                    &mut draft.csv_delimiter,
                                    d,
                                    delimiter_label(d),
                                );
                            }
                        });
                });

                ui.separator();
                ui.heading("Advanced");
                ui.add(egui::Slider::new(&mut draft.history_size, 10..=200).text("History size"));

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Export Settings").clicked() {
                        export = true;
                    }
                    if ui.button("Import Settings").clicked() {
                        import = true;
                    }
                    if ui.button("Reset").clicked() {
                        *draft = PointMapConfig::default();
                    }
                });
                ui.horizontal(|ui| {
                    if ui.button("Apply").clicked() {
                        apply = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if export {
            self.export_settings();
        }
        if import {
            self.import_settings();
        }
        if apply {
            self.apply_settings();
        }
        if cancel {
            self.settings_open = false;
        }
    }

    fn apply_settings(&mut self) {
        self.config = self.settings_draft.clone();
        self.doc.history.set_capacity(self.config.history_size);
        if let Err(e) = persistence::save_to_default_path(&self.config) {
            log::warn!("Failed to save settings: {}", e);
        }
        self.settings_open = false;
        self.toast_success("Settings applied successfully!");
    }

    fn export_settings(&mut self) {
        let name = format!(
            "pointmap-settings-{}.json",
            chrono::Local::now().format("%Y-%m-%d")
        );
        let Some(path) = rfd::FileDialog::new().set_file_name(name).save_file() else {
            return;
        };
        match persistence::save_settings_to_path(&self.settings_draft, &path) {
            Ok(()) => self.toast_success("Settings exported successfully!"),
            Err(e) => self.toast_error(format!("Failed to export settings: {}", e)),
        }
    }

    fn import_settings(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        else {
            return;
        };
        match persistence::load_settings_from_path(&path) {
            Ok(cfg) => {
                self.settings_draft = cfg;
                self.toast_success("Settings imported successfully!");
            }
            Err(e) => {
                log::warn!("Settings import failed: {}", e);
                self.toast_error("Failed to import settings. Invalid file format.");
            }
        }
    }

    fn toasts_ui(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        self.toasts.retain(|t| t.until > now);
        if self.toasts.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in &self.toasts {
                    let (bg, icon) = match toast.kind {
                        ToastKind::Success => (Color32::from_rgb(0x16, 0x65, 0x34), "✔"),
                        ToastKind::Error => (Color32::from_rgb(0x7f, 0x1d, 0x1d), "✖"),
                        ToastKind::Info => (Color32::from_rgb(0x1e, 0x3a, 0x8a), "ℹ"),
                    };
                    egui::Frame::new()
                        .fill(bg)
                        .corner_radius(CornerRadius::same(4))
                        .inner_margin(egui::Margin::same(8))
                        .show(ui, |ui| {
                            ui.colored_label(Color32::WHITE, format!("{} {}", icon, toast.text));
                        });
                }
            });
        // Keep repainting so expired toasts disappear without input.
        ctx.request_repaint_after(Duration::from_millis(250));
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.first() else {
            return;
        };
        if let Some(path) = &file.path {
            self.load_image_from_path(ctx, path);
        } else if let Some(bytes) = &file.bytes {
            let bytes = bytes.clone();
            let name = file.name.clone();
            self.load_image_bytes(ctx, &bytes, &name);
        }
    }
}

impl eframe::App for PointMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.handle_keyboard(ctx);

        self.top_bar(ctx);
        self.side_panel(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                self.canvas(ui);
            });
        });

        self.context_menu_ui(ctx);
        self.point_dialog_ui(ctx);
        self.confirm_dialog_ui(ctx);
        self.settings_ui(ctx);
        self.toasts_ui(ctx);
    }
}

fn opt_prefix(prefix: &str) -> Option<&str> {
    if prefix.is_empty() {
        None
    } else {
        Some(prefix)
    }
}

fn delimiter_label(d: char) -> &'static str {
    match d {
        ';' => "Semicolon (;)",
        '\t' => "Tab",
        '|' => "Pipe (|)",
        _ => "Comma (,)",
    }
}
