//! GUI entry point for GR Tagger

mod app;
mod history_panel;

use app::TaggerApp;
use eframe::egui;

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 700.0])
            .with_resizable(false)
            .with_decorations(false),
        ..Default::default()
    };

    eframe::run_native(
        "GR Tagger",
        options,
        Box::new(|cc| Ok(Box::new(TaggerApp::new(cc)))),
    )
}
