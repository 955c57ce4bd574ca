//! Bounds of the attached displays in global coordinates.

use crate::geometry::{Point, ScreenRect};
use screenshots::Screen;

/// Query the current display layout. Failures are logged and yield an empty
/// list, in which case callers stop clamping to a screen.
pub fn detect() -> Vec<ScreenRect> {
    match Screen::all() {
        Ok(screens) => {
            let rects: Vec<ScreenRect> = screens
                .iter()
                .map(|s| {
                    let info = &s.display_info;
                    ScreenRect::from_origin_size(
                        Point::new(info.x, info.y),
                        info.width as i32,
                        info.height as i32,
                    )
                })
                .collect();
            tracing::debug!(?rects, "displays detected");
            rects
        }
        Err(e) => {
            tracing::warn!("failed to enumerate displays: {e}");
            Vec::new()
        }
    }
}

/// The screen that contains `p`.
pub fn containing(screens: &[ScreenRect], p: Point) -> Option<ScreenRect> {
    screens.iter().copied().find(|s| s.contains(p))
}

/// The screen containing `p`, or the closest one when `p` is between screens.
pub fn nearest(screens: &[ScreenRect], p: Point) -> Option<ScreenRect> {
    screens.iter().copied().min_by_key(|s| s.distance_sq(p))
}
