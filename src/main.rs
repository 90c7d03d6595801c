mod app;

use app::QuizApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([480.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Quiz Cards",
        options,
        Box::new(|cc| Ok(Box::new(QuizApp::new(cc)))),
    )
}
