use eframe::egui;
use floating_widget::geometry::{Point, ScreenRect};
use floating_widget::gui::surface::ViewportSurface;
use floating_widget::interaction::{
    CursorShape, InteractionController, Outcome, PointerButton, PointerEvent,
};
use floating_widget::state::AppState;
use tempfile::tempdir;

use mock_ctx::MockCtx;

fn open_state(dir: &std::path::Path) -> (AppState, InteractionController) {
    let state = AppState::open(dir);
    let ctrl = InteractionController::from_settings(
        state.settings.app_config(),
        &state.settings.widget_settings(),
    );
    (state, ctrl)
}

#[test]
fn drag_sends_outer_position_commands() {
    let dir = tempdir().unwrap();
    let (mut state, mut ctrl) = open_state(dir.path());
    let ctx = MockCtx::default();
    let screens = [ScreenRect::new(0, 0, 1000, 800)];
    let mut surface = ViewportSurface::new(&ctx, &screens, ctrl.position(), CursorShape::Default);

    let events = [
        PointerEvent::Press {
            button: PointerButton::Primary,
            pos: Point::new(120, 120),
        },
        PointerEvent::Move { pos: Point::new(220, 170) },
        PointerEvent::Move { pos: Point::new(2000, 170) },
        PointerEvent::Release {
            button: PointerButton::Primary,
            pos: Point::new(2000, 170),
        },
    ];
    let outcomes: Vec<Outcome> = events
        .into_iter()
        .map(|e| ctrl.handle(e, &mut state, &mut surface).unwrap())
        .collect();
    assert_eq!(outcomes.last(), Some(&Outcome::Committed));

    let cmds = ctx.commands.lock().unwrap();
    assert_eq!(cmds.len(), 2);
    match cmds[0] {
        egui::ViewportCommand::OuterPosition(p) => assert_eq!(p, egui::pos2(200.0, 150.0)),
        _ => panic!("unexpected command"),
    }
    // pointer off every screen: clamp against the widget's current screen
    match cmds[1] {
        egui::ViewportCommand::OuterPosition(p) => assert_eq!(p, egui::pos2(886.0, 150.0)),
        _ => panic!("unexpected command"),
    }
    assert_eq!(state.last_position, Point::new(886, 150));
}

#[test]
fn resize_sends_inner_size_and_marks_rescale() {
    let dir = tempdir().unwrap();
    let (mut state, mut ctrl) = open_state(dir.path());
    let ctx = MockCtx::default();
    let screens = [ScreenRect::new(0, 0, 1920, 1080)];
    let mut surface = ViewportSurface::new(&ctx, &screens, ctrl.position(), CursorShape::Default);

    ctrl.handle(
        PointerEvent::Move { pos: Point::new(163, 163) },
        &mut state,
        &mut surface,
    )
    .unwrap();
    assert_eq!(surface.cursor(), CursorShape::ResizeDiagonal);

    ctrl.handle(
        PointerEvent::Press {
            button: PointerButton::Primary,
            pos: Point::new(163, 163),
        },
        &mut state,
        &mut surface,
    )
    .unwrap();
    ctrl.handle(
        PointerEvent::Move { pos: Point::new(199, 170) },
        &mut state,
        &mut surface,
    )
    .unwrap();
    assert_eq!(surface.resized(), Some(100));

    let cmds = ctx.commands.lock().unwrap();
    assert_eq!(cmds.len(), 1);
    match cmds[0] {
        egui::ViewportCommand::InnerSize(s) => assert_eq!(s, egui::vec2(100.0, 100.0)),
        _ => panic!("unexpected command"),
    }
    assert!(*ctx.repaints.lock().unwrap() >= 2);
}

#[test]
fn drag_on_secondary_screen_stays_there() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("user_settings.json"),
        r#"{"last_position": {"x": 2500, "y": 300}}"#,
    )
    .unwrap();
    let (mut state, mut ctrl) = open_state(dir.path());
    let ctx = MockCtx::default();
    let screens = [
        ScreenRect::new(0, 0, 1920, 1080),
        ScreenRect::new(1920, 0, 3840, 1080),
    ];
    let mut surface = ViewportSurface::new(&ctx, &screens, ctrl.position(), CursorShape::Default);

    ctrl.handle(
        PointerEvent::Press {
            button: PointerButton::Primary,
            pos: Point::new(2510, 310),
        },
        &mut state,
        &mut surface,
    )
    .unwrap();
    let out = ctrl
        .handle(PointerEvent::Move { pos: Point::new(2520, 310) }, &mut state, &mut surface)
        .unwrap();
    assert_eq!(out, Outcome::Moved(Point::new(2510, 300)));

    // across the seam onto the primary screen, then past its left edge
    let out = ctrl
        .handle(PointerEvent::Move { pos: Point::new(1000, 310) }, &mut state, &mut surface)
        .unwrap();
    assert_eq!(out, Outcome::Moved(Point::new(990, 300)));
    let out = ctrl
        .handle(PointerEvent::Move { pos: Point::new(-400, 310) }, &mut state, &mut surface)
        .unwrap();
    assert_eq!(out, Outcome::Moved(Point::new(50, 300)));
}
