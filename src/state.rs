use crate::config::AppConfig;
use crate::geometry::Point;
use crate::logging;
use crate::settings::{SettingsStore, DEFAULT_POSITION, DEFAULT_THEME, KEY_LAST_POSITION, KEY_THEME};
use std::path::{Path, PathBuf};

/// Runtime state shared by the widget, the menu and the interaction
/// controller. Constructed once in `main` and passed down by reference.
pub struct AppState {
    pub settings: SettingsStore,
    pub current_theme: String,
    pub last_position: Point,
    /// True while the tool menu is shown. Dragging is disabled meanwhile.
    pub menu_open: bool,
}

impl AppState {
    /// Start logging, then load everything from `config_dir`. Problems with
    /// the documents are reported through the freshly installed subscriber.
    pub fn start(config_dir: &Path, log_file: Option<PathBuf>) -> Self {
        logging::init(AppConfig::peek_debug(config_dir), log_file);
        tracing::info!(config_dir = %config_dir.display(), "loading settings");
        Self::open(config_dir)
    }

    pub fn open(config_dir: impl AsRef<Path>) -> Self {
        Self::new(SettingsStore::open(config_dir))
    }

    pub fn new(settings: SettingsStore) -> Self {
        let mut state = Self {
            settings,
            current_theme: DEFAULT_THEME.into(),
            last_position: DEFAULT_POSITION,
            menu_open: false,
        };
        state.refresh_runtime();
        state
    }

    pub fn reload_settings(&mut self) {
        self.settings.reload();
        self.refresh_runtime();
    }

    fn refresh_runtime(&mut self) {
        self.current_theme = self.settings.get_as(KEY_THEME, DEFAULT_THEME.to_string());
        self.last_position = self.settings.position(KEY_LAST_POSITION, DEFAULT_POSITION);
    }
}
