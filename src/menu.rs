use crate::assets::AssetCatalog;
use crate::config::AppConfig;
use crate::geometry::{Point, ScreenRect};
use crate::interaction::{InteractionController, WidgetSurface};
use crate::settings::WidgetSettings;
use crate::state::AppState;
use crate::theme::{ThemeCatalog, ThemeStyle};
use std::path::PathBuf;

/// The first cell always opens the settings.
pub const SETTINGS_TOOL: &str = "settings";
const CELL_PADDING: u32 = 20;
/// Gap kept between the menu and the screen edge when it has to be shifted.
const EDGE_GAP: i32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct MenuCell {
    pub row: usize,
    pub column: usize,
    pub tool: String,
    pub label: String,
    pub icon: Option<PathBuf>,
}

/// Resolved contents and dimensions of the tool menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuLayout {
    pub width: u32,
    pub height: u32,
    pub rows: usize,
    pub columns: usize,
    pub cell_size: (u32, u32),
    /// Occupied cells in row-major order. Grid slots past the end stay empty.
    pub cells: Vec<MenuCell>,
    pub style: ThemeStyle,
}

impl MenuLayout {
    pub fn build(
        config: &AppConfig,
        settings: &WidgetSettings,
        assets: &AssetCatalog,
        themes: &ThemeCatalog,
    ) -> Self {
        let (width, height) = config.menu_size(&settings.menu_size);
        let rows = config.menu_grid.rows;
        let columns = config.menu_grid.columns;
        let cell_size = (
            (width / columns.max(1) as u32).saturating_sub(CELL_PADDING),
            (height / rows.max(1) as u32).saturating_sub(CELL_PADDING),
        );
        let tools = std::iter::once(SETTINGS_TOOL.to_string()).chain(config.available_tools.iter().cloned());
        let cells = tools
            .take(rows * columns)
            .enumerate()
            .map(|(i, tool)| MenuCell {
                row: i / columns,
                column: i % columns,
                label: display_label(&tool),
                icon: assets
                    .tool_icon(&tool, &settings.theme)
                    .map(|p| p.to_path_buf()),
                tool,
            })
            .collect();
        Self {
            width,
            height,
            rows,
            columns,
            cell_size,
            cells,
            style: themes.style(&settings.theme),
        }
    }
}

/// `"screen_ruler"` becomes `"Screen Ruler"`.
pub fn display_label(tool: &str) -> String {
    tool.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuPlacement {
    pub menu: Point,
    /// Where the widget has to sit so the menu fits below it.
    pub widget: Point,
}

/// Put the menu directly under the widget, shifting it left and the widget
/// up when the menu would cross the screen edge.
pub fn place_below(widget: Point, edge: u32, menu_size: (u32, u32), screen: ScreenRect) -> MenuPlacement {
    let edge = edge as i32;
    let (w, h) = (menu_size.0 as i32, menu_size.1 as i32);
    let mut widget_pos = widget;
    let mut x = widget.x;
    let mut y = widget.y + edge;
    if x + w > screen.right {
        x = screen.right - w - EDGE_GAP;
    }
    if y + h > screen.bottom {
        widget_pos.y = screen.bottom - h - EDGE_GAP - edge;
        y = widget_pos.y + edge;
    }
    MenuPlacement {
        menu: Point::new(x, y),
        widget: widget_pos,
    }
}

/// Shows and hides the menu, remembering where the widget was beforehand.
#[derive(Debug, Default)]
pub struct MenuToggle {
    restore: Option<Point>,
    placement: Option<MenuPlacement>,
}

impl MenuToggle {
    pub fn placement(&self) -> Option<MenuPlacement> {
        self.placement
    }

    pub fn open(
        &mut self,
        layout: &MenuLayout,
        ctrl: &mut InteractionController,
        state: &mut AppState,
        surface: &mut dyn WidgetSurface,
    ) -> MenuPlacement {
        let current = ctrl.position();
        let screen = surface
            .screen_at(current)
            .unwrap_or_else(|| surface.current_screen());
        let placement = place_below(current, ctrl.size(), (layout.width, layout.height), screen);
        if placement.widget != current {
            ctrl.place(placement.widget, surface);
        }
        self.restore = Some(current);
        self.placement = Some(placement);
        state.menu_open = true;
        tracing::debug!(?placement, "menu opened");
        placement
    }

    pub fn close(
        &mut self,
        ctrl: &mut InteractionController,
        state: &mut AppState,
        surface: &mut dyn WidgetSurface,
    ) {
        if let Some(pos) = self.restore.take() {
            if pos != ctrl.position() {
                ctrl.place(pos, surface);
            }
        }
        self.placement = None;
        state.menu_open = false;
        tracing::debug!("menu closed");
    }

    pub fn toggle(
        &mut self,
        layout: &MenuLayout,
        ctrl: &mut InteractionController,
        state: &mut AppState,
        surface: &mut dyn WidgetSurface,
    ) {
        if state.menu_open {
            self.close(ctrl, state, surface);
        } else {
            self.open(layout, ctrl, state, surface);
        }
    }
}
