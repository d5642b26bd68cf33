mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::PenguinLensApp;
use config::Settings;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = Settings::load().unwrap_or_else(|e| {
        log::warn!("ignoring settings file: {e:#}");
        Settings::default()
    });

    let mut state = AppState::new(&settings);
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| settings.dataset.clone());
    let loaded = match &path {
        Some(p) => data::loader::load_file(p),
        None => data::loader::load_embedded(),
    };
    match loaded {
        Ok(dataset) => {
            log::info!(
                "Loaded {} penguins from {}",
                dataset.len(),
                path.as_deref()
                    .map_or_else(|| "embedded table".to_string(), |p| p.display().to_string())
            );
            state.set_dataset(dataset);
        }
        Err(e) => {
            log::error!("Failed to load dataset: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Penguin Lens – Palmer Penguins Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(PenguinLensApp::new(state)))),
    )
}
