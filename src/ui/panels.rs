use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::species_color;
use crate::config::{MAX_BINS, MIN_BINS};
use crate::data::filter::EmptySelectionPolicy;
use crate::data::model::{Island, Species};
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter and binning widgets
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    let counts: Vec<(Species, usize)> = Species::ALL
        .into_iter()
        .map(|sp| (sp, dataset.species_count(sp)))
        .collect();

    // Set by widgets bound straight to a state field.
    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Species checkbox group ----
            ui.strong("Species");
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all();
                }
                if ui.small_button("None").clicked() {
                    state.select_none();
                }
            });
            for (sp, n) in &counts {
                let mut checked = state.filter.species.contains(*sp);
                let text = RichText::new(format!("{sp}  ({n})")).color(species_color(*sp));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_species(*sp);
                }
            }

            ui.label("When nothing is ticked:");
            let mut policy = state.filter.species.empty_policy;
            ui.radio_value(&mut policy, EmptySelectionPolicy::ShowAll, "show every species");
            ui.radio_value(&mut policy, EmptySelectionPolicy::ShowNone, "show nothing");
            if policy != state.filter.species.empty_policy {
                state.set_empty_policy(policy);
            }
            ui.separator();

            // ---- Island selectize ----
            ui.strong("Island");
            let mut island = state.filter.island;
            egui::ComboBox::from_id_salt("island")
                .selected_text(island.map_or("All islands", Island::as_str))
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut island, None, "All islands");
                    for isl in Island::ALL {
                        ui.selectable_value(&mut island, Some(isl), isl.as_str());
                    }
                });
            if island != state.filter.island {
                state.set_island(island);
            }
            ui.separator();

            // ---- Binning ----
            ui.strong("Histogram bins");
            changed |= bins_control(ui, "Flipper length", &mut state.flipper_bins);
            changed |= bins_control(ui, "Body mass", &mut state.body_mass_bins);
            changed |= ui.checkbox(&mut state.density, "Density").changed();
            changed |= ui
                .checkbox(&mut state.shared_bin_edges, "Shared bin edges")
                .on_hover_text("Bin every species over the full dataset range")
                .changed();
            ui.separator();

            // ---- Grid page size (numeric input) ----
            ui.strong("Rows per grid page");
            let mut page_size = state.page_size;
            ui.add(egui::DragValue::new(&mut page_size).range(1..=500));
            if page_size != state.page_size {
                state.page_size = page_size;
                changed = true;
            }
        });

    if changed {
        state.recompute();
    }
}

/// Slider plus numeric input bound to the same value.
fn bins_control(ui: &mut Ui, label: &str, bins: &mut i64) -> bool {
    let before = *bins;
    ui.add(egui::Slider::new(&mut *bins, MIN_BINS..=MAX_BINS).text(label));
    ui.horizontal(|ui: &mut Ui| {
        ui.label("exact:");
        ui.add(egui::DragValue::new(&mut *bins).range(MIN_BINS..=MAX_BINS));
    });
    *bins != before
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for (tab, label) in [
            (Tab::Histograms, "Histograms"),
            (Tab::Scatter, "Scatter"),
            (Tab::Grid, "Data Grid"),
            (Tab::Table, "Data Table"),
        ] {
            ui.selectable_value(&mut state.tab, tab, label);
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} penguins loaded, {} visible",
                ds.len(),
                state.views.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open penguins table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!("Loaded {} penguins from {}", dataset.len(), path.display());
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
