use crate::icon::IconSource;
use crate::menu::{MenuCell, MenuLayout, MenuPlacement};
use eframe::egui;
use eframe::egui::text::{LayoutJob, TextWrapping};
use std::collections::HashMap;

const TOOL_ICON_EDGE: f32 = 48.0;
const LABEL_WIDTH: f32 = 80.0;
const PLACEHOLDER: egui::Color32 = egui::Color32::from_rgb(0x88, 0x88, 0x88);
const HOVER_FILL: egui::Color32 = egui::Color32::from_rgb(0x44, 0x44, 0x44);
const LABEL_COLOR: egui::Color32 = egui::Color32::WHITE;

/// What happened in the menu window during one frame.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MenuResponse {
    pub selected: Option<String>,
    pub focused: Option<bool>,
    pub close_requested: bool,
}

/// Load the icon textures for every cell that has an icon path.
pub fn load_tool_textures(ctx: &egui::Context, layout: &MenuLayout) -> HashMap<String, egui::TextureHandle> {
    let edge = (TOOL_ICON_EDGE * ctx.pixels_per_point()).round() as u32;
    layout
        .cells
        .iter()
        .filter_map(|cell| {
            let icon = IconSource::load(cell.icon.as_deref())?;
            let texture = ctx.load_texture(
                format!("tool_{}", cell.tool),
                icon.color_image(edge),
                egui::TextureOptions::LINEAR,
            );
            Some((cell.tool.clone(), texture))
        })
        .collect()
}

/// Show the grid menu in its own borderless viewport at `placement.menu`.
pub fn show(
    ctx: &egui::Context,
    layout: &MenuLayout,
    placement: MenuPlacement,
    textures: &HashMap<String, egui::TextureHandle>,
) -> MenuResponse {
    let builder = egui::ViewportBuilder::default()
        .with_title("Tools")
        .with_decorations(false)
        .with_always_on_top()
        .with_resizable(false)
        .with_position(egui::pos2(placement.menu.x as f32, placement.menu.y as f32))
        .with_inner_size(egui::vec2(layout.width as f32, layout.height as f32));

    ctx.show_viewport_immediate(
        egui::ViewportId::from_hash_of("tool_menu"),
        builder,
        |ctx, _class| {
            let mut response = MenuResponse::default();
            let frame = egui::Frame::none()
                .fill(layout.style.background_color())
                .inner_margin(10.0);
            egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
                egui::Grid::new("tool_grid")
                    .spacing([10.0, 10.0])
                    .show(ui, |ui| {
                        let mut cells = layout.cells.iter().peekable();
                        for row in 0..layout.rows {
                            for column in 0..layout.columns {
                                let cell = cells.next_if(|c| c.row == row && c.column == column);
                                if let Some(cell) = cell {
                                    if tool_button(ui, cell, textures.get(&cell.tool), layout.cell_size).clicked() {
                                        response.selected = Some(cell.tool.clone());
                                    }
                                } else {
                                    let size = egui::vec2(layout.cell_size.0 as f32, layout.cell_size.1 as f32);
                                    ui.allocate_exact_size(size, egui::Sense::hover());
                                }
                            }
                            ui.end_row();
                        }
                    });
            });
            ctx.input(|i| {
                response.focused = i.viewport().focused;
                response.close_requested = i.viewport().close_requested();
            });
            response
        },
    )
}

fn tool_button(
    ui: &mut egui::Ui,
    cell: &MenuCell,
    texture: Option<&egui::TextureHandle>,
    cell_size: (u32, u32),
) -> egui::Response {
    let size = egui::vec2(cell_size.0 as f32, cell_size.1 as f32);
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
    if !ui.is_rect_visible(rect) {
        return response;
    }
    let painter = ui.painter_at(rect);
    if response.hovered() {
        painter.rect_filled(rect, 4.0, HOVER_FILL);
    }

    let icon_rect = egui::Rect::from_center_size(
        egui::pos2(rect.center().x, rect.top() + 4.0 + TOOL_ICON_EDGE / 2.0),
        egui::vec2(TOOL_ICON_EDGE, TOOL_ICON_EDGE),
    );
    match texture {
        Some(tex) => {
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(tex.id(), icon_rect, uv, egui::Color32::WHITE);
        }
        None => {
            painter.rect_filled(icon_rect, 4.0, PLACEHOLDER);
        }
    }

    let galley = ui.fonts(|f| f.layout_job(label_job(&cell.label, ui.style())));
    let text_pos = egui::pos2(rect.center().x, icon_rect.bottom() + 4.0);
    painter.galley(text_pos, galley, LABEL_COLOR);

    response.on_hover_text(cell.label.as_str())
}

/// Label wrapped to at most two lines of `LABEL_WIDTH`, ending in an ellipsis
/// when it does not fit. Rows are centred on the layout origin.
pub fn label_job(text: &str, style: &egui::Style) -> LayoutJob {
    let font = egui::TextStyle::Button.resolve(style);
    let mut job = LayoutJob::simple(text.to_owned(), font, LABEL_COLOR, LABEL_WIDTH);
    job.wrap = TextWrapping {
        max_width: LABEL_WIDTH,
        max_rows: 2,
        break_anywhere: false,
        overflow_character: Some('…'),
    };
    job.halign = egui::Align::Center;
    job
}
