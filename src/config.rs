//! Configuration surface shared by the UI, interaction layer and exporter.

use egui::Color32;

/// Predefined two-gradient theme palettes. Presentation only.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ThemePreset {
    Ocean,
    Forest,
    Sunset,
    Cosmic,
}

impl ThemePreset {
    pub fn all() -> [ThemePreset; 4] {
        [
            ThemePreset::Ocean,
            ThemePreset::Forest,
            ThemePreset::Sunset,
            ThemePreset::Cosmic,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThemePreset::Ocean => "ocean",
            ThemePreset::Forest => "forest",
            ThemePreset::Sunset => "sunset",
            ThemePreset::Cosmic => "cosmic",
        }
    }

    pub fn from_name(name: &str) -> Option<ThemePreset> {
        ThemePreset::all().into_iter().find(|t| t.name() == name)
    }

    /// Palette as (primary1, primary2, secondary1, secondary2).
    pub fn palette(&self) -> [Color32; 4] {
        match self {
            ThemePreset::Ocean => [
                Color32::from_rgb(0x1e, 0x3a, 0x8a),
                Color32::from_rgb(0x06, 0x5f, 0x46),
                Color32::from_rgb(0x4a, 0xde, 0x80),
                Color32::from_rgb(0xea, 0xb3, 0x08),
            ],
            ThemePreset::Forest => [
                Color32::from_rgb(0x14, 0x53, 0x2d),
                Color32::from_rgb(0x06, 0x5f, 0x46),
                Color32::from_rgb(0x22, 0xc5, 0x5e),
                Color32::from_rgb(0x84, 0xcc, 0x16),
            ],
            ThemePreset::Sunset => [
                Color32::from_rgb(0xc2, 0x41, 0x0c),
                Color32::from_rgb(0xdc, 0x26, 0x26),
                Color32::from_rgb(0xf5, 0x9e, 0x0b),
                Color32::from_rgb(0xea, 0xb3, 0x08),
            ],
            ThemePreset::Cosmic => [
                Color32::from_rgb(0x58, 0x1c, 0x87),
                Color32::from_rgb(0x31, 0x2e, 0x81),
                Color32::from_rgb(0xa8, 0x55, 0xf7),
                Color32::from_rgb(0x3b, 0x82, 0xf6),
            ],
        }
    }
}

/// All recognized configuration options, with their defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct PointMapConfig {
    // ── Appearance ───────────────────────────────────────────────────────
    /// Marker radius in display units.
    pub point_size: f32,
    pub label_font_size: f32,
    pub show_labels: bool,
    pub theme: ThemePreset,
    pub primary_color1: Color32,
    pub primary_color2: Color32,
    pub secondary_color1: Color32,
    pub secondary_color2: Color32,

    // ── Behavior ─────────────────────────────────────────────────────────
    /// Pre-fill the add dialog with the next free numeric id.
    pub auto_suggest_ids: bool,
    /// Hit-test radius in display units.
    pub click_tolerance: f64,
    /// Gate destructive cascades and bulk deletes behind confirmation.
    pub confirm_delete: bool,

    // ── Export ───────────────────────────────────────────────────────────
    pub include_original_coords: bool,
    pub include_point_type: bool,
    pub csv_delimiter: char,

    // ── Advanced ─────────────────────────────────────────────────────────
    /// History stack capacity.
    pub history_size: usize,
}

impl Default for PointMapConfig {
    fn default() -> Self {
        let theme = ThemePreset::Ocean;
        let [p1, p2, s1, s2] = theme.palette();
        Self {
            point_size: 8.0,
            label_font_size: 12.0,
            show_labels: true,
            theme,
            primary_color1: p1,
            primary_color2: p2,
            secondary_color1: s1,
            secondary_color2: s2,

            auto_suggest_ids: true,
            click_tolerance: 15.0,
            confirm_delete: true,

            include_original_coords: true,
            include_point_type: true,
            csv_delimiter: ',',

            history_size: 50,
        }
    }
}

impl PointMapConfig {
    /// Replace the theme colors with a preset's palette.
    pub fn apply_theme(&mut self, theme: ThemePreset) {
        let [p1, p2, s1, s2] = theme.palette();
        self.theme = theme;
        self.primary_color1 = p1;
        self.primary_color2 = p2;
        self.secondary_color1 = s1;
        self.secondary_color2 = s2;
    }
}
