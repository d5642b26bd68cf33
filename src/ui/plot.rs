use eframe::egui::{self, Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::color::{self, group_color, species_color, translucent};
use crate::data::histogram::{HistogramMode, HistogramResult};
use crate::data::model::NumericColumn;
use crate::data::scatter::GroupBy;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Histograms (central panel, first tab)
// ---------------------------------------------------------------------------

fn bars(histogram: &HistogramResult, fill: Color32) -> Vec<Bar> {
    histogram
        .buckets
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.value)
                .width(b.width())
                .fill(fill)
                .name(format!("{:.1} – {:.1}: {}", b.lower, b.upper, b.count))
        })
        .collect()
}

fn y_label(mode: HistogramMode) -> &'static str {
    match mode {
        HistogramMode::Count => "Count",
        HistogramMode::Density => "Density",
    }
}

/// Flipper length overlay (one chart per species) and merged body mass,
/// side by side.
pub fn histograms(ui: &mut Ui, state: &AppState) {
    let mode = if state.density {
        HistogramMode::Density
    } else {
        HistogramMode::Count
    };

    ui.columns(2, |cols| {
        cols[0].heading("Flipper Length by Species");
        Plot::new("flipper_histogram")
            .legend(Legend::default())
            .x_axis_label(NumericColumn::FlipperLength.label())
            .y_axis_label(y_label(mode))
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true)
            .show(&mut cols[0], |plot_ui| {
                for sh in &state.views.flipper {
                    let c = species_color(sh.species);
                    let chart = BarChart::new(bars(&sh.histogram, translucent(c)))
                        .color(c)
                        .name(sh.species.as_str());
                    plot_ui.bar_chart(chart);
                }
            });

        cols[1].heading("Body Mass");
        match &state.views.body_mass {
            Some(h) if h.is_empty() => cols[1].label("No body mass values in this selection."),
            Some(h) => cols[1].label(format!("n = {}", h.total)),
            None => cols[1].label(""),
        };
        Plot::new("body_mass_histogram")
            .x_axis_label(NumericColumn::BodyMass.label())
            .y_axis_label(y_label(mode))
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true)
            .show(&mut cols[1], |plot_ui| {
                if let Some(h) = &state.views.body_mass {
                    let chart = BarChart::new(bars(h, color::BODY_MASS))
                        .color(color::BODY_MASS)
                        .name("Body mass");
                    plot_ui.bar_chart(chart);
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Scatter (central panel, second tab)
// ---------------------------------------------------------------------------

/// Axis and grouping pickers above the scatter plot.
pub fn scatter_controls(ui: &mut Ui, state: &mut AppState) {
    let (mut x, mut y, mut group_by) = (state.scatter_x, state.scatter_y, state.group_by);
    ui.horizontal(|ui: &mut Ui| {
        axis_combo(ui, "scatter_x", "x", &mut x);
        axis_combo(ui, "scatter_y", "y", &mut y);
        ui.separator();
        ui.label("Color by");
        ui.radio_value(&mut group_by, GroupBy::Species, "species");
        ui.radio_value(&mut group_by, GroupBy::Island, "island");
    });
    if (x, y, group_by) != (state.scatter_x, state.scatter_y, state.group_by) {
        state.scatter_x = x;
        state.scatter_y = y;
        state.group_by = group_by;
        state.recompute();
    }
}

fn axis_combo(ui: &mut Ui, id: &str, label: &str, column: &mut NumericColumn) {
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(column.label())
        .show_ui(ui, |ui: &mut Ui| {
            for c in NumericColumn::ALL {
                ui.selectable_value(column, c, c.label());
            }
        });
}

pub fn scatter_plot(ui: &mut Ui, state: &AppState) {
    let n_groups = state.views.scatter.len();

    Plot::new("scatter_plot")
        .legend(Legend::default())
        .x_axis_label(state.scatter_x.label())
        .y_axis_label(state.scatter_y.label())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (i, series) in state.views.scatter.iter().enumerate() {
                let points: PlotPoints = series.points.iter().copied().collect();
                let dots = Points::new(points)
                    .radius(3.0)
                    .color(group_color(series.key, i, n_groups))
                    .name(series.key.label());
                plot_ui.points(dots);
            }
        });
}
