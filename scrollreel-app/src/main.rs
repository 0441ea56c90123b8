mod app;
mod app_dir;
mod document;
mod input;
mod preferences;
mod ui;

use eframe::egui;
use tracing::info;

use app::ScrollReelApp;
use preferences::AppPreferences;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting ScrollReel");

    let prefs = AppPreferences::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("ScrollReel")
            .with_inner_size([prefs.window_width, prefs.window_height]),
        ..Default::default()
    };

    eframe::run_native(
        "ScrollReel",
        options,
        Box::new(move |_cc| Ok(Box::new(ScrollReelApp::new(prefs)))),
    )
}
