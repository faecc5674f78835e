// GUI-subsystem binary on Windows: no console window is ever allocated.
#![windows_subsystem = "windows"]

use eframe::egui;

use easel::app::PaintApp;
use easel::logger;

fn main() -> Result<(), eframe::Error> {
    // Initialize session log (overwrites previous session log)
    logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_title("Easel"),
        ..Default::default()
    };

    eframe::run_native("Easel", options, Box::new(|cc| Box::new(PaintApp::new(cc))))
}
