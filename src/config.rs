use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::error::ViewError;
use crate::data::filter::{EmptySelectionPolicy, SpeciesSelection};
use crate::data::model::{NumericColumn, Species};

/// Environment variable pointing at an alternative settings file.
pub const CONFIG_ENV: &str = "PENGUIN_LENS_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "penguin-lens.toml";

pub const MIN_BINS: i64 = 1;
pub const MAX_BINS: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySelection {
    ShowAll,
    ShowNone,
}

impl From<EmptySelection> for EmptySelectionPolicy {
    fn from(v: EmptySelection) -> Self {
        match v {
            EmptySelection::ShowAll => EmptySelectionPolicy::ShowAll,
            EmptySelection::ShowNone => EmptySelectionPolicy::ShowNone,
        }
    }
}

/// Startup defaults for the viewer controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_bins")]
    pub flipper_bins: i64,
    #[serde(default = "default_bins")]
    pub body_mass_bins: i64,
    #[serde(default = "default_density")]
    pub density: bool,
    #[serde(default)]
    pub shared_bin_edges: bool,
    #[serde(default = "default_empty_selection")]
    pub empty_selection: EmptySelection,
    /// Species ticked at startup.
    #[serde(default = "default_species")]
    pub species: Vec<String>,
    #[serde(default = "default_scatter_x")]
    pub scatter_x: String,
    #[serde(default = "default_scatter_y")]
    pub scatter_y: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Dataset opened at startup instead of the bundled table.
    #[serde(default)]
    pub dataset: Option<PathBuf>,
}

fn default_bins() -> i64 {
    20
}
fn default_density() -> bool {
    true
}
fn default_empty_selection() -> EmptySelection {
    EmptySelection::ShowAll
}
fn default_species() -> Vec<String> {
    Species::ALL.iter().map(|s| s.to_string()).collect()
}
fn default_scatter_x() -> String {
    NumericColumn::BillLength.name().into()
}
fn default_scatter_y() -> String {
    NumericColumn::BillDepth.name().into()
}
fn default_page_size() -> usize {
    25
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            flipper_bins: default_bins(),
            body_mass_bins: default_bins(),
            density: default_density(),
            shared_bin_edges: false,
            empty_selection: default_empty_selection(),
            species: default_species(),
            scatter_x: default_scatter_x(),
            scatter_y: default_scatter_y(),
            page_size: default_page_size(),
            dataset: None,
        }
    }
}

impl Settings {
    /// Read `$PENGUIN_LENS_CONFIG`, else `./penguin-lens.toml`, else defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if !path.exists() {
            log::debug!("no settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_path(&path)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings = Self::from_toml(&text)
            .with_context(|| format!("parsing settings from {}", path.display()))?;
        log::info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text)?;
        settings.species_selection()?;
        settings.scatter_axes()?;
        Ok(settings.clamped())
    }

    pub fn species_selection(&self) -> Result<SpeciesSelection, ViewError> {
        Ok(SpeciesSelection::parse(&self.species)?.with_policy(self.empty_selection.into()))
    }

    pub fn scatter_axes(&self) -> Result<(NumericColumn, NumericColumn), ViewError> {
        Ok((self.scatter_x.parse()?, self.scatter_y.parse()?))
    }

    /// Pull out-of-range values back into what the controls accept.
    fn clamped(mut self) -> Self {
        for (name, bins) in [
            ("flipper_bins", &mut self.flipper_bins),
            ("body_mass_bins", &mut self.body_mass_bins),
        ] {
            let c = (*bins).clamp(MIN_BINS, MAX_BINS);
            if c != *bins {
                log::warn!("{name} = {bins} out of range, using {c}");
                *bins = c;
            }
        }
        if self.page_size == 0 {
            log::warn!("page_size = 0, using {}", default_page_size());
            self.page_size = default_page_size();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_file_overrides_some_fields() {
        let s = Settings::from_toml(
            r#"
            flipper_bins = 35
            empty_selection = "show_none"
            dataset = "data/penguins.csv"
            "#,
        )
        .unwrap();
        assert_eq!(s.flipper_bins, 35);
        assert_eq!(s.body_mass_bins, 20);
        assert_eq!(
            EmptySelectionPolicy::from(s.empty_selection),
            EmptySelectionPolicy::ShowNone
        );
        assert_eq!(s.dataset, Some(PathBuf::from("data/penguins.csv")));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let s = Settings::from_toml("flipper_bins = 0\nbody_mass_bins = 400\npage_size = 0").unwrap();
        assert_eq!(s.flipper_bins, 1);
        assert_eq!(s.body_mass_bins, 50);
        assert_eq!(s.page_size, 25);
    }

    #[test]
    fn unknown_labels_are_configuration_errors() {
        let err = Settings::from_toml("species = [\"Adelie\", \"Emperor\"]").unwrap_err();
        assert_eq!(
            err.downcast_ref::<ViewError>(),
            Some(&ViewError::UnknownSpecies("Emperor".into()))
        );
        let err = Settings::from_toml("scatter_x = \"wing_span\"").unwrap_err();
        assert_eq!(
            err.downcast_ref::<ViewError>(),
            Some(&ViewError::UnknownColumn("wing_span".into()))
        );
    }

    #[test]
    fn startup_selection_carries_policy() {
        let s = Settings::from_toml("species = [\"gentoo\"]\nempty_selection = \"show_none\"").unwrap();
        let sel = s.species_selection().unwrap();
        assert_eq!(sel.effective_species(), vec![Species::Gentoo]);
        assert_eq!(sel.empty_policy, EmptySelectionPolicy::ShowNone);
        assert_eq!(
            Settings::default().scatter_axes().unwrap(),
            (NumericColumn::BillLength, NumericColumn::BillDepth)
        );
    }

    #[test]
    fn unknown_policy_is_an_error() {
        assert!(Settings::from_toml("empty_selection = \"sometimes\"").is_err());
    }
}
