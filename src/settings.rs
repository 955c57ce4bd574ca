use crate::config::{AppConfig, ResolvedPaths, APP_CONFIG_FILE};
use crate::document::{load_document, merge, save_document, Document};
use crate::geometry::Point;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;

pub const KEY_THEME: &str = "theme";
pub const KEY_LAST_POSITION: &str = "last_position";
pub const KEY_LAST_WIDGET_SIZE: &str = "last_widget_size";
pub const KEY_MENU_SIZE: &str = "menu_size";
pub const KEY_SELECTED_WIDGET_ICON: &str = "selected_widget_icon";
pub const KEY_SHOW_WIDGET_RESIZE_ICON: &str = "show_widget_resize_icon";

pub const DEFAULT_THEME: &str = "dark-1";
pub const DEFAULT_POSITION: Point = Point::new(100, 100);
pub const DEFAULT_WIDGET_SIZE: u32 = 64;

/// Typed snapshot of the effective settings the widget cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSettings {
    pub theme: String,
    pub last_position: Point,
    pub last_widget_size: u32,
    pub menu_size: String,
    pub selected_widget_icon: String,
    pub show_widget_resize_icon: bool,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.into(),
            last_position: DEFAULT_POSITION,
            last_widget_size: DEFAULT_WIDGET_SIZE,
            menu_size: "medium".into(),
            selected_widget_icon: "main_icon_1".into(),
            show_widget_resize_icon: true,
        }
    }
}

/// Encode a position the way it is stored under `last_position`.
pub fn position_value(p: Point) -> Value {
    serde_json::json!({ "x": p.x, "y": p.y })
}

/// Single source of truth for effective settings.
///
/// Holds the static app config plus the default and user documents. Every
/// [`SettingsStore::set`] writes the whole user document back to disk.
pub struct SettingsStore {
    app_config: AppConfig,
    paths: ResolvedPaths,
    default_settings: Document,
    user_settings: Document,
    settings: Document,
}

impl SettingsStore {
    /// Load `app_config.json` from `config_dir` and the documents it points to.
    pub fn open(config_dir: impl AsRef<Path>) -> Self {
        let config_dir = config_dir.as_ref();
        let app_document = load_document(&config_dir.join(APP_CONFIG_FILE));
        let app_config = AppConfig::from_document(&app_document);
        let paths = app_config.resolve_paths(config_dir);
        Self::with_paths(app_config, paths)
    }

    pub fn with_paths(app_config: AppConfig, paths: ResolvedPaths) -> Self {
        let default_settings = load_document(&paths.default_settings);
        let user_settings = load_document(&paths.user_settings);
        let settings = merge(&default_settings, &user_settings);
        tracing::debug!(
            defaults = default_settings.len(),
            overrides = user_settings.len(),
            user = %paths.user_settings.display(),
            "settings loaded"
        );
        Self {
            app_config,
            paths,
            default_settings,
            user_settings,
            settings,
        }
    }

    pub fn app_config(&self) -> &AppConfig {
        &self.app_config
    }

    pub fn paths(&self) -> &ResolvedPaths {
        &self.paths
    }

    pub fn effective(&self) -> &Document {
        &self.settings
    }

    pub fn default_settings(&self) -> &Document {
        &self.default_settings
    }

    pub fn user_settings(&self) -> &Document {
        &self.user_settings
    }

    /// Effective value for `key`, or `fallback` when neither document has it.
    pub fn get(&self, key: &str, fallback: Value) -> Value {
        self.settings.get(key).cloned().unwrap_or(fallback)
    }

    /// Typed lookup. A value of the wrong shape yields `fallback`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let Some(v) = self.settings.get(key) else {
            return fallback;
        };
        match T::deserialize(v) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(key, "setting has unexpected type: {e}");
                fallback
            }
        }
    }

    /// Update one key and persist the user document.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> anyhow::Result<()> {
        let value = value.into();
        tracing::debug!(key, %value, "updating setting");
        self.settings.insert(key.to_string(), value.clone());
        self.user_settings.insert(key.to_string(), value);
        self.save_user_settings()
    }

    pub fn save_user_settings(&self) -> anyhow::Result<()> {
        let path = &self.paths.user_settings;
        save_document(path, &self.user_settings)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    /// Re-read the default and user documents and recompute the overlay.
    pub fn reload(&mut self) {
        self.default_settings = load_document(&self.paths.default_settings);
        self.user_settings = load_document(&self.paths.user_settings);
        self.settings = merge(&self.default_settings, &self.user_settings);
        tracing::debug!("settings reloaded");
    }

    pub fn widget_settings(&self) -> WidgetSettings {
        let d = WidgetSettings::default();
        let last_widget_size = self
            .get_as::<f64>(KEY_LAST_WIDGET_SIZE, d.last_widget_size as f64)
            .max(0.0)
            .round() as u32;
        WidgetSettings {
            theme: self.get_as(KEY_THEME, d.theme),
            last_position: self.position(KEY_LAST_POSITION, d.last_position),
            last_widget_size,
            menu_size: self.get_as(KEY_MENU_SIZE, d.menu_size),
            selected_widget_icon: self.get_as(KEY_SELECTED_WIDGET_ICON, d.selected_widget_icon),
            show_widget_resize_icon: self
                .get_as(KEY_SHOW_WIDGET_RESIZE_ICON, d.show_widget_resize_icon),
        }
    }

    /// Read an `{x, y}` object; each missing coordinate falls back on its own.
    pub fn position(&self, key: &str, fallback: Point) -> Point {
        let Some(Value::Object(obj)) = self.settings.get(key) else {
            return fallback;
        };
        let coord = |name: &str, d: i32| {
            obj.get(name)
                .and_then(Value::as_f64)
                .map(|v| v.round() as i32)
                .unwrap_or(d)
        };
        Point::new(coord("x", fallback.x), coord("y", fallback.y))
    }
}
