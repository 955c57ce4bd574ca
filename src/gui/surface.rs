use crate::geometry::{Point, ScreenRect};
use crate::interaction::{CursorShape, PointerButton, PointerEvent, WidgetSurface};
use crate::screens;
use eframe::egui;

/// Stands in for the widget's screen when no display could be detected, so
/// movement is left unclamped.
const UNBOUNDED: ScreenRect = ScreenRect::new(-(1 << 24), -(1 << 24), 1 << 24, 1 << 24);

/// The parts of [`egui::Context`] the widget window needs. Tests substitute a
/// recorder so viewport commands can be inspected.
pub trait ViewportCtx {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand);
    fn request_repaint(&self);
}

impl ViewportCtx for egui::Context {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand) {
        egui::Context::send_viewport_cmd(self, cmd);
    }

    fn request_repaint(&self) {
        egui::Context::request_repaint(self);
    }
}

/// [`WidgetSurface`] backed by viewport commands for one frame.
pub struct ViewportSurface<'a, C: ViewportCtx> {
    ctx: &'a C,
    screens: &'a [ScreenRect],
    /// Widget top-left, kept in step with `move_to`.
    widget: Point,
    cursor: CursorShape,
    resized: Option<u32>,
}

impl<'a, C: ViewportCtx> ViewportSurface<'a, C> {
    pub fn new(ctx: &'a C, screens: &'a [ScreenRect], widget: Point, cursor: CursorShape) -> Self {
        Self {
            ctx,
            screens,
            widget,
            cursor,
            resized: None,
        }
    }

    pub fn cursor(&self) -> CursorShape {
        self.cursor
    }

    /// Last edge length requested this frame, if the widget was resized.
    pub fn resized(&self) -> Option<u32> {
        self.resized
    }
}

impl<C: ViewportCtx> WidgetSurface for ViewportSurface<'_, C> {
    fn resize_to(&mut self, edge: u32) {
        let edge = edge as f32;
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(edge, edge)));
        self.resized = Some(edge as u32);
        self.ctx.request_repaint();
    }

    fn move_to(&mut self, pos: Point) {
        self.widget = pos;
        self.ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
            pos.x as f32,
            pos.y as f32,
        )));
    }

    fn set_cursor(&mut self, cursor: CursorShape) {
        self.cursor = cursor;
        self.ctx.request_repaint();
    }

    fn screen_at(&self, p: Point) -> Option<ScreenRect> {
        screens::containing(self.screens, p)
    }

    fn current_screen(&self) -> ScreenRect {
        screens::nearest(self.screens, self.widget).unwrap_or(UNBOUNDED)
    }
}

pub fn cursor_icon(shape: CursorShape) -> egui::CursorIcon {
    match shape {
        CursorShape::Default => egui::CursorIcon::Default,
        CursorShape::ResizeDiagonal => egui::CursorIcon::ResizeNwSe,
    }
}

pub fn to_global(origin: egui::Pos2, local: egui::Pos2) -> Point {
    Point::new(
        (origin.x + local.x).round() as i32,
        (origin.y + local.y).round() as i32,
    )
}

/// Convert egui's window-local pointer events into global [`PointerEvent`]s.
/// `origin` is the top-left corner of the window's inner area.
pub fn translate_events(events: &[egui::Event], origin: egui::Pos2) -> Vec<PointerEvent> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::PointerMoved(pos) => Some(PointerEvent::Move {
                pos: to_global(origin, *pos),
            }),
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                ..
            } => {
                let button = match button {
                    egui::PointerButton::Primary => PointerButton::Primary,
                    egui::PointerButton::Secondary => PointerButton::Secondary,
                    egui::PointerButton::Middle => PointerButton::Middle,
                    _ => return None,
                };
                let pos = to_global(origin, *pos);
                Some(if *pressed {
                    PointerEvent::Press { button, pos }
                } else {
                    PointerEvent::Release { button, pos }
                })
            }
            _ => None,
        })
        .collect()
}
