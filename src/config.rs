use crate::document::{read_document, Document};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const APP_CONFIG_FILE: &str = "app_config.json";
pub const DEFAULT_SETTINGS_FILE: &str = "default_settings.json";
pub const USER_SETTINGS_FILE: &str = "user_settings.json";
pub const ASSETS_CONFIG_FILE: &str = "assets_config.json";
pub const THEME_COLORS_FILE: &str = "theme_colors.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuGrid {
    pub rows: usize,
    pub columns: usize,
}

impl Default for MenuGrid {
    fn default() -> Self {
        Self {
            rows: 3,
            columns: 3,
        }
    }
}

/// Optional overrides for where the other documents live.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPaths {
    pub user_settings: Option<PathBuf>,
    pub default_settings: Option<PathBuf>,
    pub assets_config: Option<PathBuf>,
    pub theme_colors: Option<PathBuf>,
}

impl ConfigPaths {
    /// Read the `config_paths` object entry by entry. An entry that is not a
    /// string is logged and ignored; the others still apply.
    pub fn from_document(doc: &Document) -> Self {
        let Some(section) = doc.get("config_paths") else {
            return Self::default();
        };
        let Some(section) = section.as_object() else {
            tracing::warn!("config_paths is not an object; using default locations");
            return Self::default();
        };
        let entry = |key: &str| match section.get(key)? {
            Value::String(s) => Some(PathBuf::from(s)),
            other => {
                tracing::warn!(key, value = %other, "ignoring non-string config path");
                None
            }
        };
        Self {
            user_settings: entry("user_settings"),
            default_settings: entry("default_settings"),
            assets_config: entry("assets_config"),
            theme_colors: entry("theme_colors"),
        }
    }
}

/// Static application configuration read from `app_config.json`.
///
/// Every field has a default, so a missing or partial file still produces a
/// usable configuration. Keys are read one at a time: a value of the wrong
/// type only resets that key. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub menu_grid: MenuGrid,
    /// Named menu sizes as `[width, height]`.
    pub menu_size_options: HashMap<String, (u32, u32)>,
    pub available_tools: Vec<String>,
    pub debug: bool,
    pub show_debug_borders: bool,
    /// Opacity applied while the pointer hovers the widget.
    pub widget_hover_opacity: f32,
    /// Length of the hover fade in milliseconds.
    pub transition_duration_ms: u64,
    /// Resize handle edge as a fraction of the widget edge.
    pub resize_icon_scale_factor: f32,
    pub min_widget_size: u32,
    pub max_widget_size: u32,
    /// Inset that keeps the widget away from the screen edges while dragging.
    pub drag_margin: i32,
    pub config_paths: ConfigPaths,
}

pub(crate) fn default_menu_size_options() -> HashMap<String, (u32, u32)> {
    HashMap::from([
        ("small".to_string(), (250, 350)),
        ("medium".to_string(), (300, 400)),
        ("large".to_string(), (350, 450)),
    ])
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            menu_grid: MenuGrid::default(),
            menu_size_options: default_menu_size_options(),
            available_tools: Vec::new(),
            debug: false,
            show_debug_borders: false,
            widget_hover_opacity: 0.5,
            transition_duration_ms: 200,
            resize_icon_scale_factor: 0.2,
            min_widget_size: 32,
            max_widget_size: 200,
            drag_margin: 50,
            config_paths: ConfigPaths::default(),
        }
    }
}

impl AppConfig {
    /// Build the typed config from a loaded document.
    pub fn from_document(doc: &Document) -> Self {
        let d = Self::default();
        Self {
            menu_grid: field(doc, "menu_grid", d.menu_grid),
            menu_size_options: field(doc, "menu_size_options", d.menu_size_options),
            available_tools: field(doc, "available_tools", d.available_tools),
            debug: field(doc, "debug", d.debug),
            show_debug_borders: field(doc, "show_debug_borders", d.show_debug_borders),
            widget_hover_opacity: field(doc, "widget_hover_opacity", d.widget_hover_opacity),
            transition_duration_ms: field(doc, "transition_duration_ms", d.transition_duration_ms),
            resize_icon_scale_factor: field(
                doc,
                "resize_icon_scale_factor",
                d.resize_icon_scale_factor,
            ),
            min_widget_size: field(doc, "min_widget_size", d.min_widget_size),
            max_widget_size: field(doc, "max_widget_size", d.max_widget_size),
            drag_margin: field(doc, "drag_margin", d.drag_margin),
            config_paths: ConfigPaths::from_document(doc),
        }
    }

    /// Read only the `debug` flag of `<config_dir>/app_config.json`, without
    /// logging. Used to configure logging before anything else is loaded.
    pub fn peek_debug(config_dir: &Path) -> bool {
        read_document(&config_dir.join(APP_CONFIG_FILE))
            .ok()
            .and_then(|doc| doc.get("debug").and_then(Value::as_bool))
            .unwrap_or(false)
    }

    /// Resolve the document paths relative to `config_dir`.
    pub fn resolve_paths(&self, config_dir: &Path) -> ResolvedPaths {
        let p = &self.config_paths;
        let or_default = |over: &Option<PathBuf>, file: &str| {
            over.clone().unwrap_or_else(|| config_dir.join(file))
        };
        ResolvedPaths {
            app_config: config_dir.join(APP_CONFIG_FILE),
            default_settings: or_default(&p.default_settings, DEFAULT_SETTINGS_FILE),
            user_settings: or_default(&p.user_settings, USER_SETTINGS_FILE),
            assets_config: or_default(&p.assets_config, ASSETS_CONFIG_FILE),
            theme_colors: or_default(&p.theme_colors, THEME_COLORS_FILE),
        }
    }

    /// Menu dimensions for a named size, falling back to 300x400.
    pub fn menu_size(&self, name: &str) -> (u32, u32) {
        self.menu_size_options
            .get(name)
            .copied()
            .unwrap_or((300, 400))
    }
}

/// Typed value of `key`, or `fallback` when it is absent or of the wrong type.
fn field<T: DeserializeOwned>(doc: &Document, key: &str, fallback: T) -> T {
    let Some(value) = doc.get(key) else {
        return fallback;
    };
    match T::deserialize(value) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(key, "invalid app config value: {e}; using default");
            fallback
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub app_config: PathBuf,
    pub default_settings: PathBuf,
    pub user_settings: PathBuf,
    pub assets_config: PathBuf,
    pub theme_colors: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: serde_json::Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let cfg = AppConfig::from_document(&doc(json!({
            "menu_grid": {"rows": 2},
            "available_tools": ["ruler", "color_picker"],
            "unknown_key": 42
        })));
        assert_eq!(cfg.menu_grid, MenuGrid { rows: 2, columns: 3 });
        assert_eq!(cfg.available_tools, vec!["ruler", "color_picker"]);
        assert_eq!(cfg.min_widget_size, 32);
        assert_eq!(cfg.max_widget_size, 200);
        assert_eq!(cfg.drag_margin, 50);
        assert_eq!(cfg.menu_size("large"), (350, 450));
    }

    #[test]
    fn wrong_types_fall_back_to_defaults() {
        let cfg = AppConfig::from_document(&doc(json!({"min_widget_size": "tiny"})));
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn bad_key_only_resets_itself() {
        let cfg = AppConfig::from_document(&doc(json!({
            "min_widget_size": "tiny",
            "max_widget_size": 150,
            "debug": "yes",
            "menu_grid": {"rows": 4, "columns": 2},
            "config_paths": {"user_settings": "/data/mine.json"}
        })));
        assert_eq!(cfg.min_widget_size, 32);
        assert_eq!(cfg.max_widget_size, 150);
        assert!(!cfg.debug);
        assert_eq!(cfg.menu_grid, MenuGrid { rows: 4, columns: 2 });
        assert_eq!(
            cfg.config_paths.user_settings,
            Some(PathBuf::from("/data/mine.json"))
        );
    }

    #[test]
    fn non_string_config_path_is_skipped() {
        let cfg = AppConfig::from_document(&doc(json!({
            "config_paths": {"user_settings": 7, "theme_colors": "themes.json"}
        })));
        assert_eq!(cfg.config_paths.user_settings, None);
        assert_eq!(cfg.config_paths.theme_colors, Some(PathBuf::from("themes.json")));

        let cfg = AppConfig::from_document(&doc(json!({"config_paths": "elsewhere"})));
        assert_eq!(cfg.config_paths, ConfigPaths::default());
    }

    #[test]
    fn debug_flag_is_read_without_loading_everything() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!AppConfig::peek_debug(dir.path()));
        std::fs::write(dir.path().join(APP_CONFIG_FILE), r#"{"debug": true, "min_widget_size": "x"}"#)
            .unwrap();
        assert!(AppConfig::peek_debug(dir.path()));
        std::fs::write(dir.path().join(APP_CONFIG_FILE), "{ broken").unwrap();
        assert!(!AppConfig::peek_debug(dir.path()));
    }

    #[test]
    fn unknown_menu_size_uses_medium_dimensions() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.menu_size("gigantic"), (300, 400));
    }

    #[test]
    fn config_paths_override_defaults() {
        let cfg = AppConfig::from_document(&doc(json!({
            "config_paths": {
                "user_settings": "/tmp/elsewhere/user.json",
                "theme_colors": "themes.json"
            }
        })));
        let paths = cfg.resolve_paths(Path::new("cfg"));
        assert_eq!(paths.user_settings, PathBuf::from("/tmp/elsewhere/user.json"));
        assert_eq!(paths.theme_colors, PathBuf::from("themes.json"));
        assert_eq!(paths.default_settings, Path::new("cfg").join(DEFAULT_SETTINGS_FILE));
        assert_eq!(paths.assets_config, Path::new("cfg").join(ASSETS_CONFIG_FILE));
        assert_eq!(paths.app_config, Path::new("cfg").join(APP_CONFIG_FILE));
    }
}
