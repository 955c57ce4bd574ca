//! egui host for the floating widget.
//!
//! The window itself is a borderless, transparent, always-on-top viewport the
//! size of the widget. All geometry decisions are made by
//! [`InteractionController`]; this module only turns egui input into
//! [`PointerEvent`](crate::interaction::PointerEvent)s and paints.

pub mod surface;
pub mod tool_menu;

use crate::assets::{AssetCatalog, RESIZE_ICON_KEY};
use crate::geometry::ScreenRect;
use crate::icon::IconSource;
use crate::interaction::{CursorShape, Gesture, InteractionController, Outcome, PointerEvent};
use crate::menu::{MenuLayout, MenuToggle};
use crate::opacity::OpacityTransition;
use crate::screens;
use crate::state::AppState;
use crate::theme::ThemeCatalog;
use eframe::egui;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use surface::{cursor_icon, translate_events, ViewportSurface};

pub use surface::ViewportCtx;

/// Everything derived from the settings; rebuilt on reload.
struct Scene {
    controller: InteractionController,
    layout: MenuLayout,
    icon: Option<IconSource>,
    handle_icon: Option<IconSource>,
    fade: OpacityTransition,
}

impl Scene {
    fn from_state(state: &AppState) -> Self {
        let config = state.settings.app_config();
        let settings = state.settings.widget_settings();
        let assets = AssetCatalog::load(&state.settings.paths().assets_config);
        let themes = ThemeCatalog::load(&state.settings.paths().theme_colors);
        let handle_icon = if settings.show_widget_resize_icon {
            IconSource::load(assets.path(RESIZE_ICON_KEY))
        } else {
            None
        };
        Self {
            controller: InteractionController::from_settings(config, &settings),
            layout: MenuLayout::build(config, &settings, &assets, &themes),
            icon: IconSource::load(assets.path(&settings.selected_widget_icon)),
            handle_icon,
            fade: OpacityTransition::new(1.0, Duration::from_millis(config.transition_duration_ms)),
        }
    }
}

pub struct FloatingWidgetApp {
    state: AppState,
    scene: Scene,
    menu: MenuToggle,
    icon_texture: Option<egui::TextureHandle>,
    handle_texture: Option<egui::TextureHandle>,
    /// Widget edge the current textures were rendered for.
    texture_edge: Option<u32>,
    tool_textures: HashMap<String, egui::TextureHandle>,
    /// Display bounds, refreshed on reload and whenever a press starts.
    screens: Vec<ScreenRect>,
    cursor: CursorShape,
    hovered: bool,
    menu_had_focus: bool,
}

impl FloatingWidgetApp {
    pub fn new(state: AppState) -> Self {
        let scene = Scene::from_state(&state);
        tracing::info!(
            x = scene.controller.position().x,
            y = scene.controller.position().y,
            size = scene.controller.size(),
            theme = %state.current_theme,
            "floating widget ready"
        );
        Self {
            state,
            scene,
            menu: MenuToggle::default(),
            icon_texture: None,
            handle_texture: None,
            texture_edge: None,
            tool_textures: HashMap::new(),
            screens: screens::detect(),
            cursor: CursorShape::Default,
            hovered: false,
            menu_had_focus: false,
        }
    }

    /// Initial native viewport matching the stored geometry.
    pub fn viewport(&self) -> egui::ViewportBuilder {
        let pos = self.scene.controller.position();
        let edge = self.scene.controller.size() as f32;
        egui::ViewportBuilder::default()
            .with_title("Floating Widget")
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top()
            .with_resizable(false)
            .with_taskbar(false)
            .with_position(egui::pos2(pos.x as f32, pos.y as f32))
            .with_inner_size(egui::vec2(edge, edge))
    }

    /// Re-read settings from disk and rebuild everything derived from them.
    fn reload(&mut self, ctx: &egui::Context) {
        if self.state.menu_open {
            return;
        }
        self.state.reload_settings();
        self.scene = Scene::from_state(&self.state);
        self.texture_edge = None;
        self.tool_textures.clear();
        self.screens = screens::detect();
        let pos = self.scene.controller.position();
        let edge = self.scene.controller.size() as f32;
        ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
            pos.x as f32,
            pos.y as f32,
        )));
        ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(edge, edge)));
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        let (events, origin, double_click, hovered, focused) = ctx.input(|i| {
            let origin = i
                .viewport()
                .inner_rect
                .map(|r| r.min)
                .unwrap_or_else(|| {
                    let p = self.scene.controller.position();
                    egui::pos2(p.x as f32, p.y as f32)
                });
            let double_click = i
                .pointer
                .button_double_clicked(egui::PointerButton::Primary)
                .then(|| i.pointer.interact_pos())
                .flatten();
            (
                i.events.clone(),
                origin,
                double_click,
                i.pointer.has_pointer(),
                i.viewport().focused,
            )
        });

        self.update_hover(hovered);
        if focused == Some(false) {
            self.scene.controller.abandon();
        }

        let mut pointer_events = translate_events(&events, origin);
        if let Some(pos) = double_click {
            pointer_events.push(PointerEvent::DoubleClick {
                pos: surface::to_global(origin, pos),
            });
        }

        if pointer_events
            .iter()
            .any(|e| matches!(e, PointerEvent::Press { .. } | PointerEvent::DoubleClick { .. }))
        {
            self.screens = screens::detect();
        }

        let widget = self.scene.controller.position();
        let mut surface = ViewportSurface::new(ctx, &self.screens, widget, self.cursor);
        for event in pointer_events {
            match self.scene.controller.handle(event, &mut self.state, &mut surface) {
                Ok(Outcome::ToggleMenu) => {
                    self.menu.toggle(&self.scene.layout, &mut self.scene.controller, &mut self.state, &mut surface);
                    self.menu_had_focus = false;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("failed to save settings: {e:#}");
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    return;
                }
            }
        }
        self.cursor = surface.cursor();
    }

    fn update_hover(&mut self, hovered: bool) {
        if hovered == self.hovered {
            return;
        }
        self.hovered = hovered;
        let target = if hovered {
            self.state.settings.app_config().widget_hover_opacity
        } else {
            1.0
        };
        self.scene.fade.start(target, Instant::now());
    }

    fn refresh_textures(&mut self, ctx: &egui::Context) {
        let edge = self.scene.controller.size();
        if self.texture_edge == Some(edge) {
            return;
        }
        let ppp = ctx.pixels_per_point();
        let px = |points: u32| (points as f32 * ppp).round() as u32;
        self.icon_texture = self.scene.icon.as_ref().map(|icon| {
            ctx.load_texture("widget_icon", icon.color_image(px(edge)), egui::TextureOptions::LINEAR)
        });
        let handle_edge = self.scene.controller.handle_icon_size();
        self.handle_texture = self.scene.handle_icon.as_ref().map(|icon| {
            ctx.load_texture(
                "resize_handle",
                icon.color_image(px(handle_edge)),
                egui::TextureOptions::LINEAR,
            )
        });
        self.texture_edge = Some(edge);
    }

    fn paint(&self, ctx: &egui::Context) {
        let opacity = self.scene.fade.value_at(Instant::now());
        let tint = egui::Color32::WHITE.gamma_multiply(opacity);
        let config = self.state.settings.app_config();
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        let ppp = ctx.pixels_per_point();

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let edge = self.scene.controller.size() as f32;
                let rect = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(edge, edge));
                let painter = ui.painter();
                match &self.icon_texture {
                    Some(tex) => {
                        let drawn = egui::Rect::from_center_size(rect.center(), tex.size_vec2() / ppp);
                        painter.image(tex.id(), drawn, uv, tint);
                    }
                    None => {
                        painter.rect_filled(rect, 0.0, egui::Color32::GRAY.gamma_multiply(opacity));
                    }
                }

                let handle = self.scene.controller.handle_rect().map(|h| {
                    egui::Rect::from_min_max(
                        egui::pos2(h.left as f32, h.top as f32),
                        egui::pos2(h.right as f32, h.bottom as f32),
                    )
                });
                if let Some(hr) = handle {
                    match &self.handle_texture {
                        Some(tex) => {
                            painter.image(tex.id(), hr, uv, tint);
                        }
                        None => {
                            painter.add(egui::Shape::convex_polygon(
                                vec![hr.right_top(), hr.right_bottom(), hr.left_bottom()],
                                egui::Color32::from_white_alpha(160).gamma_multiply(opacity),
                                egui::Stroke::NONE,
                            ));
                        }
                    }
                }

                if config.debug && config.show_debug_borders {
                    painter.rect_stroke(rect, 0.0, egui::Stroke::new(2.0, egui::Color32::RED));
                    if let Some(hr) = handle {
                        painter.rect_stroke(hr, 0.0, egui::Stroke::new(2.0, egui::Color32::BLUE));
                    }
                }
            });
    }

    fn show_menu(&mut self, ctx: &egui::Context) {
        let Some(placement) = self.menu.placement() else {
            return;
        };
        if self.tool_textures.is_empty() {
            self.tool_textures = tool_menu::load_tool_textures(ctx, &self.scene.layout);
        }
        let response = tool_menu::show(ctx, &self.scene.layout, placement, &self.tool_textures);
        if let Some(tool) = &response.selected {
            tracing::info!(tool = %tool, "tool selected");
        }
        if response.focused == Some(true) {
            self.menu_had_focus = true;
        }
        let lost_focus = self.menu_had_focus && response.focused == Some(false);
        if lost_focus || response.close_requested || response.selected.is_some() {
            let widget = self.scene.controller.position();
            let mut surface = ViewportSurface::new(ctx, &self.screens, widget, self.cursor);
            self.menu.close(&mut self.scene.controller, &mut self.state, &mut surface);
            self.menu_had_focus = false;
        }
    }
}

impl eframe::App for FloatingWidgetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::F5)) && self.scene.controller.gesture() == Gesture::Idle {
            tracing::info!("reloading settings");
            self.reload(ctx);
        }
        self.handle_input(ctx);
        self.refresh_textures(ctx);
        ctx.output_mut(|o| o.cursor_icon = cursor_icon(self.cursor));
        self.paint(ctx);
        self.show_menu(ctx);
        if self.scene.fade.is_animating(Instant::now()) {
            ctx.request_repaint();
        }
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }
}
