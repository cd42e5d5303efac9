//! Settings persistence: save and load configuration to/from JSON files.
//!
//! This module provides a serializable mirror type for the configuration,
//! since egui colors cannot directly derive serde traits. Every field
//! carries a default, so importing a settings document performs a shallow
//! merge over the defaults and tolerates unknown or missing keys.

use std::path::{Path, PathBuf};

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::config::{PointMapConfig, ThemePreset};

fn d_point_size() -> f32 {
    8.0
}
fn d_label_font_size() -> f32 {
    12.0
}
fn d_true() -> bool {
    true
}
fn d_theme() -> String {
    ThemePreset::Ocean.name().to_string()
}
fn d_color(c: fn(&PointMapConfig) -> Color32) -> [u8; 3] {
    let col = c(&PointMapConfig::default());
    [col.r(), col.g(), col.b()]
}
fn d_primary1() -> [u8; 3] {
    d_color(|c| c.primary_color1)
}
fn d_primary2() -> [u8; 3] {
    d_color(|c| c.primary_color2)
}
fn d_secondary1() -> [u8; 3] {
    d_color(|c| c.secondary_color1)
}
fn d_secondary2() -> [u8; 3] {
    d_color(|c| c.secondary_color2)
}
fn d_click_tolerance() -> f64 {
    15.0
}
fn d_delimiter() -> char {
    ','
}
fn d_history_size() -> usize {
    50
}

/// Serializable mirror of [`PointMapConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSerde {
    #[serde(default = "d_point_size")]
    pub point_size: f32,
    #[serde(default = "d_label_font_size")]
    pub label_font_size: f32,
    #[serde(default = "d_true")]
    pub show_labels: bool,
    #[serde(default = "d_theme")]
    pub theme: String,
    #[serde(default = "d_primary1")]
    pub primary_color1: [u8; 3],
    #[serde(default = "d_primary2")]
    pub primary_color2: [u8; 3],
    #[serde(default = "d_secondary1")]
    pub secondary_color1: [u8; 3],
    #[serde(default = "d_secondary2")]
    pub secondary_color2: [u8; 3],
    #[serde(default = "d_true")]
    pub auto_suggest_ids: bool,
    #[serde(default = "d_click_tolerance")]
    pub click_tolerance: f64,
    #[serde(default = "d_true")]
    pub confirm_delete: bool,
    #[serde(default = "d_true")]
    pub include_original_coords: bool,
    #[serde(default = "d_true")]
    pub include_point_type: bool,
    #[serde(default = "d_delimiter")]
    pub csv_delimiter: char,
    #[serde(default = "d_history_size")]
    pub history_size: usize,
}

impl From<&PointMapConfig> for SettingsSerde {
    fn from(c: &PointMapConfig) -> Self {
        let rgb = |col: Color32| [col.r(), col.g(), col.b()];
        Self {
            point_size: c.point_size,
            label_font_size: c.label_font_size,
            show_labels: c.show_labels,
            theme: c.theme.name().to_string(),
            primary_color1: rgb(c.primary_color1),
            primary_color2: rgb(c.primary_color2),
            secondary_color1: rgb(c.secondary_color1),
            secondary_color2: rgb(c.secondary_color2),
            auto_suggest_ids: c.auto_suggest_ids,
            click_tolerance: c.click_tolerance,
            confirm_delete: c.confirm_delete,
            include_original_coords: c.include_original_coords,
            include_point_type: c.include_point_type,
            csv_delimiter: c.csv_delimiter,
            history_size: c.history_size,
        }
    }
}

impl SettingsSerde {
    /// Convert back to a full configuration. Unknown theme names keep the
    /// stored colors but fall back to the default preset name.
    pub fn into_config(self) -> PointMapConfig {
        let rgb = |c: [u8; 3]| Color32::from_rgb(c[0], c[1], c[2]);
        PointMapConfig {
            point_size: self.point_size,
            label_font_size: self.label_font_size,
            show_labels: self.show_labels,
            theme: ThemePreset::from_name(&self.theme).unwrap_or(ThemePreset::Ocean),
            primary_color1: rgb(self.primary_color1),
            primary_color2: rgb(self.primary_color2),
            secondary_color1: rgb(self.secondary_color1),
            secondary_color2: rgb(self.secondary_color2),
            auto_suggest_ids: self.auto_suggest_ids,
            click_tolerance: self.click_tolerance,
            confirm_delete: self.confirm_delete,
            include_original_coords: self.include_original_coords,
            include_point_type: self.include_point_type,
            csv_delimiter: self.csv_delimiter,
            history_size: self.history_size.max(1),
        }
    }
}

// ---------- Public API ----------

/// Serialize the configuration as pretty JSON.
pub fn settings_to_json(config: &PointMapConfig) -> Result<String, String> {
    serde_json::to_string_pretty(&SettingsSerde::from(config)).map_err(|e| e.to_string())
}

/// Deserialize configuration from JSON, shallow-merging over defaults.
pub fn settings_from_json(json: &str) -> Result<PointMapConfig, String> {
    let serde: SettingsSerde = serde_json::from_str(json).map_err(|e| e.to_string())?;
    Ok(serde.into_config())
}

/// Save the configuration to a JSON file at the given path.
pub fn save_settings_to_path(config: &PointMapConfig, path: &Path) -> Result<(), String> {
    let txt = settings_to_json(config)?;
    std::fs::write(path, txt).map_err(|e| e.to_string())
}

/// Load configuration from a JSON file at the given path.
pub fn load_settings_from_path(path: &Path) -> Result<PointMapConfig, String> {
    let txt = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    settings_from_json(&txt)
}

fn default_settings_path() -> Result<PathBuf, String> {
    let home = std::env::var("HOME").map_err(|e| format!("HOME env var not set: {}", e))?;
    Ok(PathBuf::from(home).join(".pointmap").join("settings.json"))
}

/// Save to `~/.pointmap/settings.json`, creating the directory if needed.
pub fn save_to_default_path(config: &PointMapConfig) -> Result<(), String> {
    let path = default_settings_path()?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| format!("Failed to create dir {:?}: {}", dir, e))?;
    }
    save_settings_to_path(config, &path)
}

/// Load from `~/.pointmap/settings.json` if present.
pub fn load_from_default_path() -> Result<PointMapConfig, String> {
    let path = default_settings_path()?;
    if !path.exists() {
        return Err(format!("Settings file {:?} does not exist", path));
    }
    load_settings_from_path(&path)
}

/// Load settings, falling back to defaults. Failures are logged, never
/// fatal.
pub fn load_or_default() -> PointMapConfig {
    match load_from_default_path() {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("Failed to load settings, using defaults: {}", e);
            PointMapConfig::default()
        }
    }
}
