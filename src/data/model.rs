use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::ViewError;

// ---------------------------------------------------------------------------
// Categorical attributes
// ---------------------------------------------------------------------------

/// Penguin species. The order of the variants is the display order everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Species {
    Adelie,
    Chinstrap,
    Gentoo,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Adelie, Species::Chinstrap, Species::Gentoo];

    pub fn as_str(self) -> &'static str {
        match self {
            Species::Adelie => "Adelie",
            Species::Chinstrap => "Chinstrap",
            Species::Gentoo => "Gentoo",
        }
    }
}

impl FromStr for Species {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::ALL
            .into_iter()
            .find(|sp| sp.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ViewError::UnknownSpecies(s.to_string()))
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Island {
    Biscoe,
    Dream,
    Torgersen,
}

impl Island {
    pub const ALL: [Island; 3] = [Island::Biscoe, Island::Dream, Island::Torgersen];

    pub fn as_str(self) -> &'static str {
        match self {
            Island::Biscoe => "Biscoe",
            Island::Dream => "Dream",
            Island::Torgersen => "Torgersen",
        }
    }
}

impl FromStr for Island {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Island::ALL
            .into_iter()
            .find(|isl| isl.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ViewError::UnknownIsland(s.to_string()))
    }
}

impl fmt::Display for Island {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
        }
    }
}

impl FromStr for Sex {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" | "f" => Ok(Sex::Female),
            "male" | "m" => Ok(Sex::Male),
            _ => Err(ViewError::UnknownSex(s.to_string())),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NumericColumn – the measurements a histogram can be built over
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericColumn {
    BillLength,
    BillDepth,
    FlipperLength,
    BodyMass,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 4] = [
        NumericColumn::BillLength,
        NumericColumn::BillDepth,
        NumericColumn::FlipperLength,
        NumericColumn::BodyMass,
    ];

    /// Canonical column name as it appears in the source table.
    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::BillLength => "bill_length_mm",
            NumericColumn::BillDepth => "bill_depth_mm",
            NumericColumn::FlipperLength => "flipper_length_mm",
            NumericColumn::BodyMass => "body_mass_g",
        }
    }

    /// Axis label with unit.
    pub fn label(self) -> &'static str {
        match self {
            NumericColumn::BillLength => "Bill Length (mm)",
            NumericColumn::BillDepth => "Bill Depth (mm)",
            NumericColumn::FlipperLength => "Flipper Length (mm)",
            NumericColumn::BodyMass => "Body Mass (g)",
        }
    }
}

impl FromStr for NumericColumn {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NumericColumn::ALL
            .into_iter()
            .find(|c| c.name() == s.trim())
            .ok_or_else(|| ViewError::UnknownColumn(s.to_string()))
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Penguin – one row of the table
// ---------------------------------------------------------------------------

/// A single penguin observation. Measurements may be absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Penguin {
    pub species: Species,
    pub island: Island,
    pub bill_length_mm: Option<f64>,
    pub bill_depth_mm: Option<f64>,
    pub flipper_length_mm: Option<f64>,
    pub body_mass_g: Option<f64>,
    pub sex: Option<Sex>,
    pub year: i32,
}

impl Penguin {
    pub fn value(&self, column: NumericColumn) -> Option<f64> {
        match column {
            NumericColumn::BillLength => self.bill_length_mm,
            NumericColumn::BillDepth => self.bill_depth_mm,
            NumericColumn::FlipperLength => self.flipper_length_mm,
            NumericColumn::BodyMass => self.body_mass_g,
        }
    }
}

// ---------------------------------------------------------------------------
// PenguinDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct PenguinDataset {
    penguins: Vec<Penguin>,
    /// Number of rows per species.
    species_counts: BTreeMap<Species, usize>,
}

impl PenguinDataset {
    pub fn from_penguins(penguins: Vec<Penguin>) -> Self {
        let mut species_counts = BTreeMap::new();
        for p in &penguins {
            *species_counts.entry(p.species).or_insert(0) += 1;
        }
        PenguinDataset {
            penguins,
            species_counts,
        }
    }

    pub fn penguins(&self) -> &[Penguin] {
        &self.penguins
    }

    pub fn get(&self, idx: usize) -> Option<&Penguin> {
        self.penguins.get(idx)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.penguins.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.penguins.is_empty()
    }

    pub fn species_count(&self, species: Species) -> usize {
        self.species_counts.get(&species).copied().unwrap_or(0)
    }

    /// `[min, max]` of the present values of `column` over the whole table,
    /// or `None` when every value is absent.
    pub fn column_range(&self, column: NumericColumn) -> Option<(f64, f64)> {
        self.penguins
            .iter()
            .filter_map(|p| p.value(column))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
