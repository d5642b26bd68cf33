use crate::config::Settings;
use crate::data::error::ViewError;
use crate::data::filter::{filtered_indices, EmptySelectionPolicy, RowFilter, SpeciesSelection};
use crate::data::histogram::{
    compute, compute_per_species, BinCount, BinDomain, HistogramMode, HistogramOptions,
    HistogramResult, SpeciesHistogram,
};
use crate::data::model::{Island, NumericColumn, PenguinDataset, Species};
use crate::data::scatter::{scatter_series, GroupBy, ScatterSeries};
use crate::data::table::{paginate, sort_indices, Page, SortKey, TableColumn};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Histograms,
    Scatter,
    Grid,
    Table,
}

/// Everything drawn from the current controls. Rebuilt wholesale by
/// [`AppState::recompute`].
#[derive(Debug, Clone, Default)]
pub struct Views {
    /// Flipper length, one histogram per species.
    pub flipper: Vec<SpeciesHistogram>,
    /// Body mass over the merged filtered set.
    pub body_mass: Option<HistogramResult>,
    pub scatter: Vec<ScatterSeries>,
    /// Rows passing the filter, in grid sort order.
    pub visible_indices: Vec<usize>,
    pub grid_page: Page,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a table loads successfully).
    pub dataset: Option<PenguinDataset>,

    pub filter: RowFilter,

    /// Raw slider values; validated on every recompute.
    pub flipper_bins: i64,
    pub body_mass_bins: i64,
    pub density: bool,
    /// Bin every species over the full dataset range.
    pub shared_bin_edges: bool,

    pub scatter_x: NumericColumn,
    pub scatter_y: NumericColumn,
    pub group_by: GroupBy,

    pub grid_sort: Option<SortKey>,
    pub grid_page: usize,
    pub page_size: usize,

    pub tab: Tab,
    pub views: Views,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        let species = settings.species_selection().unwrap_or_else(|e| {
            log::warn!("{e}; starting with every species selected");
            SpeciesSelection::all().with_policy(settings.empty_selection.into())
        });
        let (scatter_x, scatter_y) = settings.scatter_axes().unwrap_or_else(|e| {
            log::warn!("{e}; using default scatter axes");
            (NumericColumn::BillLength, NumericColumn::BillDepth)
        });
        Self {
            dataset: None,
            filter: RowFilter {
                species,
                island: None,
            },
            flipper_bins: settings.flipper_bins,
            body_mass_bins: settings.body_mass_bins,
            density: settings.density,
            shared_bin_edges: settings.shared_bin_edges,
            scatter_x,
            scatter_y,
            group_by: GroupBy::Species,
            grid_sort: None,
            grid_page: 0,
            page_size: settings.page_size,
            tab: Tab::default(),
            views: Views::default(),
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and rebuild every view.
    pub fn set_dataset(&mut self, dataset: PenguinDataset) {
        self.dataset = Some(dataset);
        self.grid_page = 0;
        self.status_message = None;
        self.recompute();
    }

    /// Rebuild every view from the dataset and the current controls.
    pub fn recompute(&mut self) {
        let Some(ds) = &self.dataset else {
            self.views = Views::default();
            return;
        };
        match build_views(ds, self) {
            Ok(views) => {
                log::debug!(
                    "recomputed views: {} of {} rows visible",
                    views.visible_indices.len(),
                    ds.len()
                );
                self.grid_page = views.grid_page.page;
                self.views = views;
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("recompute failed: {e}");
                self.views = Views::default();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn histogram_options(&self, ds: &PenguinDataset, column: NumericColumn) -> HistogramOptions {
        HistogramOptions {
            mode: if self.density {
                HistogramMode::Density
            } else {
                HistogramMode::Count
            },
            domain: if self.shared_bin_edges {
                BinDomain::from_dataset(ds, column)
            } else {
                BinDomain::Auto
            },
        }
    }

    // -- control handlers --

    pub fn toggle_species(&mut self, species: Species) {
        self.filter.species.toggle(species);
        self.recompute();
    }

    pub fn select_all(&mut self) {
        self.filter.species = SpeciesSelection::all().with_policy(self.filter.species.empty_policy);
        self.recompute();
    }

    pub fn select_none(&mut self) {
        self.filter.species = SpeciesSelection::none().with_policy(self.filter.species.empty_policy);
        self.recompute();
    }

    pub fn set_empty_policy(&mut self, policy: EmptySelectionPolicy) {
        self.filter.species.empty_policy = policy;
        self.recompute();
    }

    pub fn set_island(&mut self, island: Option<Island>) {
        self.filter.island = island;
        self.grid_page = 0;
        self.recompute();
    }

    /// Click on a grid header: sort ascending, then descending, then off.
    pub fn cycle_sort(&mut self, column: TableColumn) {
        self.grid_sort = match self.grid_sort {
            Some(key) if key.column == column && key.ascending => Some(SortKey {
                column,
                ascending: false,
            }),
            Some(key) if key.column == column => None,
            _ => Some(SortKey {
                column,
                ascending: true,
            }),
        };
        self.recompute();
    }

    pub fn set_page(&mut self, page: usize) {
        self.grid_page = page;
        self.recompute();
    }
}

fn build_views(ds: &PenguinDataset, state: &AppState) -> Result<Views, ViewError> {
    let selection = &state.filter.species;

    let flipper = compute_per_species(
        ds,
        selection,
        NumericColumn::FlipperLength,
        BinCount::new(state.flipper_bins)?,
        &state.histogram_options(ds, NumericColumn::FlipperLength),
    )?;
    let body_mass = compute(
        ds,
        selection,
        NumericColumn::BodyMass,
        BinCount::new(state.body_mass_bins)?,
        &state.histogram_options(ds, NumericColumn::BodyMass),
    )?;

    let scatter = scatter_series(
        ds,
        &state.filter,
        state.scatter_x,
        state.scatter_y,
        state.group_by,
    );

    let mut visible_indices = filtered_indices(ds, &state.filter);
    if let Some(key) = state.grid_sort {
        sort_indices(ds, &mut visible_indices, key);
    }
    let grid_page = paginate(&visible_indices, state.grid_page, state.page_size);

    Ok(Views {
        flipper,
        body_mass: Some(body_mass),
        scatter,
        visible_indices,
        grid_page,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::penguin;

    fn state() -> AppState {
        let mut rows: Vec<_> = (0..30)
            .map(|i| {
                let species = Species::ALL[i % 3];
                let mut p = penguin(species, Some(180.0 + i as f64));
                p.body_mass_g = Some(3000.0 + 50.0 * i as f64);
                p
            })
            .collect();
        rows[4].island = Island::Torgersen;
        let mut state = AppState::default();
        state.set_dataset(PenguinDataset::from_penguins(rows));
        state
    }

    #[test]
    fn dataset_load_builds_every_view() {
        let s = state();
        assert_eq!(s.views.flipper.len(), 3);
        assert_eq!(s.views.body_mass.as_ref().unwrap().total, 30);
        assert_eq!(s.views.visible_indices.len(), 30);
        assert_eq!(s.views.grid_page.rows.len(), 25);
        assert_eq!(s.views.grid_page.page_count, 2);
    }

    #[test]
    fn toggling_species_rebuilds_overlay() {
        let mut s = state();
        s.toggle_species(Species::Chinstrap);
        let shown: Vec<_> = s.views.flipper.iter().map(|h| h.species).collect();
        assert_eq!(shown, vec![Species::Adelie, Species::Gentoo]);
        assert_eq!(s.views.body_mass.as_ref().unwrap().total, 20);
    }

    #[test]
    fn select_none_respects_policy() {
        let mut s = state();
        s.select_none();
        assert_eq!(s.views.flipper.len(), 3);
        assert_eq!(s.views.visible_indices.len(), 30);

        s.set_empty_policy(EmptySelectionPolicy::ShowNone);
        assert!(s.views.flipper.is_empty());
        assert!(s.views.body_mass.as_ref().unwrap().is_empty());
        assert!(s.views.visible_indices.is_empty());
        assert_eq!(s.views.grid_page.page_count, 1);
    }

    #[test]
    fn invalid_bin_count_reports_and_clears() {
        let mut s = state();
        s.flipper_bins = 0;
        s.recompute();
        assert!(s.views.flipper.is_empty());
        assert!(s.views.body_mass.is_none());
        assert!(s.status_message.as_deref().unwrap().contains("positive"));

        s.flipper_bins = 12;
        s.recompute();
        assert_eq!(s.views.flipper[0].histogram.buckets.len(), 12);
        assert!(s.status_message.is_none());
    }

    #[test]
    fn island_filter_only_touches_rows() {
        let mut s = state();
        s.set_island(Some(Island::Torgersen));
        assert_eq!(s.views.visible_indices, vec![4]);
        // Histograms follow the species selection only.
        assert_eq!(s.views.body_mass.as_ref().unwrap().total, 30);
    }

    #[test]
    fn header_clicks_cycle_sort_order() {
        let mut s = state();
        let mass = TableColumn::Measurement(NumericColumn::BodyMass);
        s.cycle_sort(mass);
        assert_eq!(s.views.visible_indices[0], 0);
        s.cycle_sort(mass);
        assert_eq!(s.views.visible_indices[0], 29);
        s.cycle_sort(mass);
        assert!(s.grid_sort.is_none());
    }

    #[test]
    fn page_index_is_clamped() {
        let mut s = state();
        s.set_page(9);
        assert_eq!(s.grid_page, 1);
        assert_eq!(s.views.grid_page.rows.len(), 5);
    }
}
