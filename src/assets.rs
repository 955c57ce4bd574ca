use crate::document::load_document;
use crate::theme::is_light_theme;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const RESIZE_ICON_KEY: &str = "resize_icon_1";

/// Logical icon key to image path, read from `assets_config.json`.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    entries: HashMap<String, PathBuf>,
}

impl AssetCatalog {
    pub fn load(path: &Path) -> Self {
        let entries = load_document(path)
            .into_iter()
            .filter_map(|(k, v)| match v {
                Value::String(s) if !s.is_empty() => Some((k, PathBuf::from(s))),
                _ => None,
            })
            .collect();
        Self { entries }
    }

    pub fn path(&self, key: &str) -> Option<&Path> {
        self.entries.get(key).map(PathBuf::as_path)
    }

    pub fn tool_icon(&self, tool: &str, theme: &str) -> Option<&Path> {
        self.path(&tool_icon_key(tool, theme))
    }
}

pub fn tool_icon_key(tool: &str, theme: &str) -> String {
    if is_light_theme(theme) {
        format!("{tool}_icon_light")
    } else {
        format!("{tool}_icon_dark")
    }
}
