use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::table::{format_cell, TableColumn};
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Data grid – sortable, paginated
// ---------------------------------------------------------------------------

pub fn data_grid(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let page = &state.views.grid_page;
    let mut clicked_header = None;
    let mut new_page = None;

    ui.horizontal(|ui: &mut Ui| {
        if ui
            .add_enabled(page.page > 0, egui::Button::new("◀"))
            .clicked()
        {
            new_page = Some(page.page - 1);
        }
        ui.label(format!("Page {} of {}", page.page + 1, page.page_count));
        if ui
            .add_enabled(page.page + 1 < page.page_count, egui::Button::new("▶"))
            .clicked()
        {
            new_page = Some(page.page + 1);
        }
        ui.separator();
        ui.label(format!("{} rows", state.views.visible_indices.len()));
    });

    ui.push_id("data_grid", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(70.0), TableColumn::ALL.len())
            .header(ROW_HEIGHT + 4.0, |mut header| {
                for col in TableColumn::ALL {
                    let marker = match state.grid_sort {
                        Some(key) if key.column == col && key.ascending => " ⏶",
                        Some(key) if key.column == col => " ⏷",
                        _ => "",
                    };
                    header.col(|ui: &mut Ui| {
                        if ui.button(format!("{}{marker}", col.header())).clicked() {
                            clicked_header = Some(col);
                        }
                    });
                }
            })
            .body(|mut body| {
                for &idx in &page.rows {
                    let Some(p) = dataset.get(idx) else {
                        continue;
                    };
                    body.row(ROW_HEIGHT, |mut row| {
                        for col in TableColumn::ALL {
                            row.col(|ui: &mut Ui| {
                                ui.label(format_cell(p, col));
                            });
                        }
                    });
                }
            });
    });

    if let Some(col) = clicked_header {
        state.cycle_sort(col);
    } else if let Some(p) = new_page {
        state.set_page(p);
    }
}

// ---------------------------------------------------------------------------
// Data table – plain, every row of the dataset
// ---------------------------------------------------------------------------

pub fn data_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    ui.push_id("data_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(70.0), TableColumn::ALL.len())
            .header(ROW_HEIGHT + 4.0, |mut header| {
                for col in TableColumn::ALL {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col.header());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, dataset.len(), |mut row| {
                    let Some(p) = dataset.get(row.index()) else {
                        return;
                    };
                    for col in TableColumn::ALL {
                        row.col(|ui: &mut Ui| {
                            ui.label(format_cell(p, col));
                        });
                    }
                });
            });
    });
}
