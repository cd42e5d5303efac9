use eframe::egui;
use pointmap::app::PointMapApp;

fn main() -> eframe::Result<()> {
    env_logger::init();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_title("PointMap"),
        ..Default::default()
    };
    eframe::run_native(
        "PointMap",
        native_options,
        Box::new(|_cc| Ok(Box::new(PointMapApp::new()))),
    )
}
