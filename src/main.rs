use floating_widget::gui::FloatingWidgetApp;
use floating_widget::state::AppState;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let config_dir = std::env::var_os("FLOATING_WIDGET_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config"));
    let log_file = std::env::var_os("FLOATING_WIDGET_LOG_FILE").map(PathBuf::from);
    let state = AppState::start(&config_dir, log_file);

    let app = FloatingWidgetApp::new(state);
    let native_options = eframe::NativeOptions {
        viewport: app.viewport(),
        ..Default::default()
    };

    eframe::run_native(
        "Floating Widget",
        native_options,
        Box::new(move |_cc| Box::new(app)),
    )
    .map_err(|e| anyhow::anyhow!("event loop failed: {e}"))
}
