use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PenguinLensApp {
    pub state: AppState,
}

impl PenguinLensApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for PenguinLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters and bins ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: active view ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a penguins table to begin  (File → Open…)");
                });
                return;
            }
            match self.state.tab {
                Tab::Histograms => plot::histograms(ui, &self.state),
                Tab::Scatter => {
                    plot::scatter_controls(ui, &mut self.state);
                    plot::scatter_plot(ui, &self.state);
                }
                Tab::Grid => table::data_grid(ui, &mut self.state),
                Tab::Table => table::data_table(ui, &self.state),
            }
        });
    }
}
