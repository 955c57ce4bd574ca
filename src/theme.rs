use crate::document::load_document;
use eframe::egui;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_BACKGROUND: &str = "#333333";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeStyle {
    pub background: String,
}

impl Default for ThemeStyle {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND.into(),
        }
    }
}

impl ThemeStyle {
    pub fn background_color(&self) -> egui::Color32 {
        parse_hex_color(&self.background).unwrap_or_else(|| {
            tracing::warn!(color = %self.background, "invalid background colour");
            egui::Color32::from_rgb(0x33, 0x33, 0x33)
        })
    }
}

/// Parse `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(s: &str) -> Option<egui::Color32> {
    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some(egui::Color32::from_rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(egui::Color32::from_rgba_unmultiplied(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            byte(6)?,
        )),
        _ => None,
    }
}

/// Theme name to style, read from `theme_colors.json`.
#[derive(Debug, Clone, Default)]
pub struct ThemeCatalog {
    themes: HashMap<String, ThemeStyle>,
}

impl ThemeCatalog {
    pub fn load(path: &Path) -> Self {
        let mut themes = HashMap::new();
        for (name, value) in load_document(path) {
            match serde_json::from_value::<ThemeStyle>(value) {
                Ok(style) => {
                    themes.insert(name, style);
                }
                Err(e) => tracing::warn!(theme = %name, "skipping theme: {e}"),
            }
        }
        Self { themes }
    }

    /// Style for `name`, or the default style when the theme is unknown.
    pub fn style(&self, name: &str) -> ThemeStyle {
        self.themes.get(name).cloned().unwrap_or_default()
    }
}

/// Light themes are those whose name mentions "light".
pub fn is_light_theme(name: &str) -> bool {
    name.contains("light")
}
