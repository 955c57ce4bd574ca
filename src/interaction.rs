//! Drag and corner-resize handling for the floating widget.
//!
//! [`InteractionController`] is a small state machine fed with discrete
//! pointer events in global screen coordinates. It never talks to a window
//! directly: geometry changes go through a [`WidgetSurface`] and final values
//! are written to the settings store when the button is released.

use crate::config::AppConfig;
use crate::geometry::{clamp_size, clamp_to_screen, Point, ScreenRect};
use crate::settings::{position_value, WidgetSettings, KEY_LAST_POSITION, KEY_LAST_WIDGET_SIZE};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Press { button: PointerButton, pos: Point },
    Move { pos: Point },
    Release { button: PointerButton, pos: Point },
    DoubleClick { pos: Point },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    #[default]
    Default,
    ResizeDiagonal,
}

/// What the controller needs from the window that shows the widget.
pub trait WidgetSurface {
    /// Resize the square widget, rescaling its icon from the original image.
    fn resize_to(&mut self, edge: u32);
    fn move_to(&mut self, pos: Point);
    fn set_cursor(&mut self, cursor: CursorShape);
    /// Usable bounds of the screen containing `p`, if any.
    fn screen_at(&self, p: Point) -> Option<ScreenRect>;
    /// Usable bounds of the screen the widget currently sits on.
    fn current_screen(&self) -> ScreenRect;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Idle,
    Dragging { offset: Point, start: Point },
    Resizing { origin: Point, start_size: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    Hover(CursorShape),
    Started,
    Moved(Point),
    Resized(u32),
    /// Gesture finished and its final value was written.
    Committed,
    /// Gesture finished where it started; nothing was written.
    Unchanged,
    ToggleMenu,
}

pub struct InteractionController {
    gesture: Gesture,
    position: Point,
    size: u32,
    min_size: u32,
    max_size: u32,
    margin: i32,
    handle_scale: f32,
    show_handle: bool,
    cursor: CursorShape,
}

impl InteractionController {
    pub fn from_settings(config: &AppConfig, settings: &WidgetSettings) -> Self {
        let min_size = config.min_widget_size;
        let max_size = config.max_widget_size;
        Self {
            gesture: Gesture::Idle,
            position: settings.last_position,
            size: clamp_size(settings.last_widget_size as i64, min_size, max_size),
            min_size,
            max_size,
            margin: config.drag_margin,
            handle_scale: config.resize_icon_scale_factor,
            show_handle: settings.show_widget_resize_icon,
            cursor: CursorShape::Default,
        }
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Edge length of the resize icon for the current widget size.
    pub fn handle_icon_size(&self) -> u32 {
        ((self.size as f32 * self.handle_scale).floor() as u32).max(10)
    }

    /// Resize handle in widget-local coordinates, `None` when hidden.
    pub fn handle_rect(&self) -> Option<ScreenRect> {
        if !self.show_handle {
            return None;
        }
        let side = self.handle_icon_size().min(self.size) as i32;
        let edge = self.size as i32;
        Some(ScreenRect::new(edge - side, edge - side, edge, edge))
    }

    fn in_handle(&self, global: Point) -> bool {
        let local = global - self.position;
        self.handle_rect().is_some_and(|r| r.contains(local))
    }

    /// Reposition the widget outside of a gesture, e.g. to make room for the
    /// menu. Nothing is persisted.
    pub fn place(&mut self, pos: Point, surface: &mut dyn WidgetSurface) {
        self.position = pos;
        surface.move_to(pos);
    }

    /// Drop an unfinished gesture without writing anything. The widget stays
    /// where the gesture left it.
    pub fn abandon(&mut self) {
        if self.gesture != Gesture::Idle {
            tracing::debug!(gesture = ?self.gesture, "gesture abandoned");
            self.gesture = Gesture::Idle;
        }
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        state: &mut AppState,
        surface: &mut dyn WidgetSurface,
    ) -> anyhow::Result<Outcome> {
        match event {
            PointerEvent::Press {
                button: PointerButton::Primary,
                pos,
            } => Ok(self.press(pos, state)),
            PointerEvent::Move { pos } => Ok(self.pointer_moved(pos, state, surface)),
            PointerEvent::Release {
                button: PointerButton::Primary,
                ..
            } => self.release(state),
            PointerEvent::DoubleClick { pos } => {
                if self.gesture == Gesture::Idle && !self.in_handle(pos) {
                    Ok(Outcome::ToggleMenu)
                } else {
                    Ok(Outcome::Ignored)
                }
            }
            _ => Ok(Outcome::Ignored),
        }
    }

    fn press(&mut self, pos: Point, state: &AppState) -> Outcome {
        if self.gesture != Gesture::Idle {
            return Outcome::Ignored;
        }
        if self.in_handle(pos) {
            self.gesture = Gesture::Resizing {
                origin: pos,
                start_size: self.size,
            };
        } else if !state.menu_open {
            self.gesture = Gesture::Dragging {
                offset: pos - self.position,
                start: self.position,
            };
        } else {
            return Outcome::Ignored;
        }
        tracing::trace!(gesture = ?self.gesture, "gesture started");
        Outcome::Started
    }

    fn pointer_moved(&mut self, pos: Point, state: &AppState, surface: &mut dyn WidgetSurface) -> Outcome {
        match self.gesture {
            Gesture::Resizing { origin, start_size } => {
                let wanted = start_size as i64 + (pos.x - origin.x) as i64;
                let size = clamp_size(wanted, self.min_size, self.max_size);
                if size != self.size {
                    self.size = size;
                    surface.resize_to(size);
                }
                Outcome::Resized(size)
            }
            Gesture::Dragging { offset, .. } => {
                if state.menu_open {
                    return Outcome::Ignored;
                }
                let screen = surface
                    .screen_at(pos)
                    .unwrap_or_else(|| surface.current_screen());
                let edge = self.size as i32;
                let next = clamp_to_screen(pos - offset, edge, edge, screen, self.margin);
                if next != self.position {
                    self.position = next;
                    surface.move_to(next);
                }
                Outcome::Moved(next)
            }
            Gesture::Idle => {
                let cursor = if self.in_handle(pos) {
                    CursorShape::ResizeDiagonal
                } else {
                    CursorShape::Default
                };
                if cursor != self.cursor {
                    self.cursor = cursor;
                    surface.set_cursor(cursor);
                }
                Outcome::Hover(cursor)
            }
        }
    }

    fn release(&mut self, state: &mut AppState) -> anyhow::Result<Outcome> {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        match gesture {
            Gesture::Idle => Ok(Outcome::Ignored),
            Gesture::Resizing { start_size, .. } => {
                if self.size == start_size {
                    return Ok(Outcome::Unchanged);
                }
                tracing::info!(size = self.size, "widget resized");
                state.settings.set(KEY_LAST_WIDGET_SIZE, self.size)?;
                Ok(Outcome::Committed)
            }
            Gesture::Dragging { start, .. } => {
                if self.position == start {
                    return Ok(Outcome::Unchanged);
                }
                tracing::info!(x = self.position.x, y = self.position.y, "widget moved");
                state
                    .settings
                    .set(KEY_LAST_POSITION, position_value(self.position))?;
                state.last_position = self.position;
                Ok(Outcome::Committed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::load_document;
    use crate::settings::SettingsStore;
    use serde_json::json;
    use tempfile::{tempdir, TempDir};

    #[derive(Default)]
    struct FakeSurface {
        moves: Vec<Point>,
        sizes: Vec<u32>,
        cursors: Vec<CursorShape>,
    }

    impl WidgetSurface for FakeSurface {
        fn resize_to(&mut self, edge: u32) {
            self.sizes.push(edge);
        }
        fn move_to(&mut self, pos: Point) {
            self.moves.push(pos);
        }
        fn set_cursor(&mut self, cursor: CursorShape) {
            self.cursors.push(cursor);
        }
        fn screen_at(&self, p: Point) -> Option<ScreenRect> {
            let screen = ScreenRect::new(0, 0, 1000, 800);
            screen.contains(p).then_some(screen)
        }
        fn current_screen(&self) -> ScreenRect {
            ScreenRect::new(0, 0, 1000, 800)
        }
    }

    fn setup(user: serde_json::Value) -> (TempDir, AppState, InteractionController) {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("user_settings.json"),
            serde_json::to_string_pretty(&user).unwrap(),
        )
        .unwrap();
        let state = AppState::new(SettingsStore::open(dir.path()));
        let ctrl = InteractionController::from_settings(
            state.settings.app_config(),
            &state.settings.widget_settings(),
        );
        (dir, state, ctrl)
    }

    fn press(pos: Point) -> PointerEvent {
        PointerEvent::Press {
            button: PointerButton::Primary,
            pos,
        }
    }

    fn release(pos: Point) -> PointerEvent {
        PointerEvent::Release {
            button: PointerButton::Primary,
            pos,
        }
    }

    #[test]
    fn resize_clamps_to_limits_and_commits() {
        let (dir, mut state, mut ctrl) = setup(json!({
            "last_position": {"x": 100, "y": 100},
            "last_widget_size": 64
        }));
        let mut surface = FakeSurface::default();
        // bottom-right corner of a 64px widget at (100, 100)
        let corner = Point::new(162, 162);
        assert_eq!(ctrl.handle(press(corner), &mut state, &mut surface).unwrap(), Outcome::Started);
        assert!(matches!(ctrl.gesture(), Gesture::Resizing { .. }));

        let out = ctrl
            .handle(PointerEvent::Move { pos: Point::new(662, 170) }, &mut state, &mut surface)
            .unwrap();
        assert_eq!(out, Outcome::Resized(200));
        let out = ctrl
            .handle(PointerEvent::Move { pos: Point::new(-338, 170) }, &mut state, &mut surface)
            .unwrap();
        assert_eq!(out, Outcome::Resized(32));
        assert_eq!(surface.sizes, vec![200, 32]);

        let out = ctrl.handle(release(Point::new(-338, 170)), &mut state, &mut surface).unwrap();
        assert_eq!(out, Outcome::Committed);
        assert_eq!(ctrl.gesture(), Gesture::Idle);
        let user = load_document(&dir.path().join("user_settings.json"));
        assert_eq!(user["last_widget_size"], json!(32));
    }

    #[test]
    fn drag_clamps_inside_screen_and_commits_position() {
        let (dir, mut state, mut ctrl) = setup(json!({
            "last_position": {"x": 100, "y": 100},
            "last_widget_size": 64
        }));
        let mut surface = FakeSurface::default();
        ctrl.handle(press(Point::new(110, 110)), &mut state, &mut surface).unwrap();
        assert!(matches!(ctrl.gesture(), Gesture::Dragging { .. }));

        let out = ctrl
            .handle(PointerEvent::Move { pos: Point::new(999, 799) }, &mut state, &mut surface)
            .unwrap();
        assert_eq!(out, Outcome::Moved(Point::new(886, 686)));
        ctrl.handle(release(Point::new(999, 799)), &mut state, &mut surface).unwrap();

        assert_eq!(state.last_position, Point::new(886, 686));
        let user = load_document(&dir.path().join("user_settings.json"));
        assert_eq!(user["last_position"], json!({"x": 886, "y": 686}));
        assert_eq!(user["last_widget_size"], json!(64));
    }

    #[test]
    fn pointer_off_screen_uses_current_screen() {
        let (_dir, mut state, mut ctrl) = setup(json!({}));
        let mut surface = FakeSurface::default();
        ctrl.handle(press(Point::new(101, 101)), &mut state, &mut surface).unwrap();
        let out = ctrl
            .handle(PointerEvent::Move { pos: Point::new(5000, -300) }, &mut state, &mut surface)
            .unwrap();
        assert_eq!(out, Outcome::Moved(Point::new(886, 50)));
    }

    #[test]
    fn zero_delta_gesture_does_not_write() {
        let (dir, mut state, mut ctrl) = setup(json!({
            "last_position": {"x": 300, "y": 200},
            "last_widget_size": 64
        }));
        let path = dir.path().join("user_settings.json");
        let before = std::fs::read_to_string(&path).unwrap();
        let mut surface = FakeSurface::default();

        ctrl.handle(press(Point::new(310, 210)), &mut state, &mut surface).unwrap();
        ctrl.handle(PointerEvent::Move { pos: Point::new(310, 210) }, &mut state, &mut surface)
            .unwrap();
        let out = ctrl.handle(release(Point::new(310, 210)), &mut state, &mut surface).unwrap();
        assert_eq!(out, Outcome::Unchanged);

        ctrl.handle(press(Point::new(362, 262)), &mut state, &mut surface).unwrap();
        let out = ctrl.handle(release(Point::new(362, 262)), &mut state, &mut surface).unwrap();
        assert_eq!(out, Outcome::Unchanged);

        assert!(surface.moves.is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn abandoned_drag_stays_in_place_without_writing() {
        let (dir, mut state, mut ctrl) = setup(json!({}));
        let path = dir.path().join("user_settings.json");
        let before = std::fs::read_to_string(&path).unwrap();
        let mut surface = FakeSurface::default();
        ctrl.handle(press(Point::new(110, 110)), &mut state, &mut surface).unwrap();
        ctrl.handle(PointerEvent::Move { pos: Point::new(310, 210) }, &mut state, &mut surface)
            .unwrap();
        ctrl.abandon();
        assert_eq!(ctrl.gesture(), Gesture::Idle);
        assert_eq!(ctrl.position(), Point::new(300, 200));

        let out = ctrl.handle(release(Point::new(310, 210)), &mut state, &mut surface).unwrap();
        assert_eq!(out, Outcome::Ignored);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
        assert_eq!(state.last_position, Point::new(100, 100));
    }

    #[test]
    fn open_menu_blocks_drag_but_not_resize() {
        let (_dir, mut state, mut ctrl) = setup(json!({}));
        state.menu_open = true;
        let mut surface = FakeSurface::default();
        let out = ctrl.handle(press(Point::new(110, 110)), &mut state, &mut surface).unwrap();
        assert_eq!(out, Outcome::Ignored);
        assert_eq!(ctrl.gesture(), Gesture::Idle);

        let out = ctrl.handle(press(Point::new(162, 162)), &mut state, &mut surface).unwrap();
        assert_eq!(out, Outcome::Started);
        assert!(matches!(ctrl.gesture(), Gesture::Resizing { .. }));
    }

    #[test]
    fn hidden_handle_means_corner_drags() {
        let (_dir, mut state, mut ctrl) = setup(json!({"show_widget_resize_icon": false}));
        let mut surface = FakeSurface::default();
        assert_eq!(ctrl.handle_rect(), None);
        ctrl.handle(press(Point::new(162, 162)), &mut state, &mut surface).unwrap();
        assert!(matches!(ctrl.gesture(), Gesture::Dragging { .. }));
    }

    #[test]
    fn hover_only_changes_cursor_on_transitions() {
        let (dir, mut state, mut ctrl) = setup(json!({}));
        let path = dir.path().join("user_settings.json");
        let before = std::fs::read_to_string(&path).unwrap();
        let mut surface = FakeSurface::default();
        for pos in [Point::new(162, 162), Point::new(160, 160), Point::new(110, 110)] {
            ctrl.handle(PointerEvent::Move { pos }, &mut state, &mut surface).unwrap();
        }
        assert_eq!(
            surface.cursors,
            vec![CursorShape::ResizeDiagonal, CursorShape::Default]
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
        assert!(surface.moves.is_empty());
    }

    #[test]
    fn handle_size_scales_with_widget() {
        let (_dir, _state, ctrl) = setup(json!({"last_widget_size": 150}));
        assert_eq!(ctrl.handle_icon_size(), 30);
        assert_eq!(ctrl.handle_rect(), Some(ScreenRect::new(120, 120, 150, 150)));

        let (_dir, _state, ctrl) = setup(json!({"last_widget_size": 20}));
        // stored size below the minimum is clamped up
        assert_eq!(ctrl.size(), 32);
        assert_eq!(ctrl.handle_icon_size(), 10);
    }

    #[test]
    fn double_click_toggles_menu_outside_handle() {
        let (_dir, mut state, mut ctrl) = setup(json!({}));
        let mut surface = FakeSurface::default();
        let out = ctrl
            .handle(PointerEvent::DoubleClick { pos: Point::new(110, 110) }, &mut state, &mut surface)
            .unwrap();
        assert_eq!(out, Outcome::ToggleMenu);
        let out = ctrl
            .handle(PointerEvent::DoubleClick { pos: Point::new(162, 162) }, &mut state, &mut surface)
            .unwrap();
        assert_eq!(out, Outcome::Ignored);
    }

    #[test]
    fn secondary_button_is_ignored() {
        let (_dir, mut state, mut ctrl) = setup(json!({}));
        let mut surface = FakeSurface::default();
        let out = ctrl
            .handle(
                PointerEvent::Press {
                    button: PointerButton::Secondary,
                    pos: Point::new(110, 110),
                },
                &mut state,
                &mut surface,
            )
            .unwrap();
        assert_eq!(out, Outcome::Ignored);
        assert_eq!(ctrl.gesture(), Gesture::Idle);
    }
}
