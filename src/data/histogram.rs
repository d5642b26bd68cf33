use std::num::NonZeroUsize;

use super::error::ViewError;
use super::filter::SpeciesSelection;
use super::model::{NumericColumn, PenguinDataset, Species};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// A validated, strictly positive number of buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BinCount(NonZeroUsize);

impl BinCount {
    pub fn new(n: i64) -> Result<Self, ViewError> {
        usize::try_from(n)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(BinCount)
            .ok_or(ViewError::InvalidBinCount(n))
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

/// What each bucket reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistogramMode {
    Count,
    /// count / (total × bucket width); the bars' total area is 1.
    #[default]
    Density,
}

/// The range the buckets span.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum BinDomain {
    /// `[min, max]` of the values being binned.
    #[default]
    Auto,
    /// A range known in advance. Values outside it are not binned.
    Fixed { min: f64, max: f64 },
}

impl BinDomain {
    /// Fixed domain covering every present value of `column` in `dataset`,
    /// so that per-species overlays share bucket edges.
    pub fn from_dataset(dataset: &PenguinDataset, column: NumericColumn) -> Self {
        match dataset.column_range(column) {
            Some((min, max)) => BinDomain::Fixed { min, max },
            None => BinDomain::Auto,
        }
    }

    fn validate(self) -> Result<Self, ViewError> {
        if let BinDomain::Fixed { min, max } = self {
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(ViewError::InvalidDomain { min, max });
            }
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HistogramOptions {
    pub mode: HistogramMode,
    pub domain: BinDomain,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub lower: f64,
    pub upper: f64,
    /// Raw number of values in the bucket.
    pub count: usize,
    /// `count` or the density, depending on the mode.
    pub value: f64,
}

impl Bucket {
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramResult {
    pub column: NumericColumn,
    pub mode: HistogramMode,
    pub buckets: Vec<Bucket>,
    /// Number of values that were binned.
    pub total: usize,
}

impl HistogramResult {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Sum of value × width; 1.0 for a non-empty density histogram.
    pub fn area(&self) -> f64 {
        self.buckets.iter().map(|b| b.value * b.width()).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesHistogram {
    pub species: Species,
    pub histogram: HistogramResult,
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Filter `dataset` by `selection`, project onto `column` and bucket the
/// present values into `bins` equal-width buckets.
pub fn compute(
    dataset: &PenguinDataset,
    selection: &SpeciesSelection,
    column: NumericColumn,
    bins: BinCount,
    options: &HistogramOptions,
) -> Result<HistogramResult, ViewError> {
    let values: Vec<f64> = dataset
        .penguins()
        .iter()
        .filter(|p| selection.matches(p.species))
        .filter_map(|p| p.value(column))
        .collect();
    bin_values(&values, column, bins, options)
}

/// One independent histogram per effective species, in species order.
pub fn compute_per_species(
    dataset: &PenguinDataset,
    selection: &SpeciesSelection,
    column: NumericColumn,
    bins: BinCount,
    options: &HistogramOptions,
) -> Result<Vec<SpeciesHistogram>, ViewError> {
    selection
        .effective_species()
        .into_iter()
        .map(|species| {
            let single = SpeciesSelection::from_species([species]);
            let histogram = compute(dataset, &single, column, bins, options)?;
            Ok(SpeciesHistogram { species, histogram })
        })
        .collect()
}

/// Bucket already-extracted values.
pub fn bin_values(
    values: &[f64],
    column: NumericColumn,
    bins: BinCount,
    options: &HistogramOptions,
) -> Result<HistogramResult, ViewError> {
    let n = bins.get();
    let (lo, hi) = match options.domain.validate()? {
        BinDomain::Fixed { min, max } => (min, max),
        BinDomain::Auto => values
            .iter()
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
            .unwrap_or((0.0, 0.0)),
    };
    // A single distinct value still needs a range with non-zero width.
    let (lo, hi) = if lo == hi && (!values.is_empty() || options.domain != BinDomain::Auto) {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    };

    let edges = bucket_edges(lo, hi, n);
    let mut counts = vec![0usize; n];
    for &v in values {
        if let Some(i) = bucket_index(v, &edges) {
            counts[i] += 1;
        }
    }
    let total: usize = counts.iter().sum();

    let buckets = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let (lower, upper) = (edges[i], edges[i + 1]);
            let value = match options.mode {
                HistogramMode::Count => count as f64,
                HistogramMode::Density if total == 0 => 0.0,
                HistogramMode::Density => count as f64 / (total as f64 * (upper - lower)),
            };
            Bucket {
                lower,
                upper,
                count,
                value,
            }
        })
        .collect();

    Ok(HistogramResult {
        column,
        mode: options.mode,
        buckets,
        total,
    })
}

/// `n + 1` edges; the last one is exactly `hi`.
fn bucket_edges(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    let span = hi - lo;
    (0..=n)
        .map(|i| {
            if i == n {
                hi
            } else {
                lo + span * i as f64 / n as f64
            }
        })
        .collect()
}

/// Buckets are `(lower, upper]`, except the first which also holds the
/// range minimum. Values outside the edges (or NaN) have no bucket.
fn bucket_index(v: f64, edges: &[f64]) -> Option<usize> {
    let n = edges.len() - 1;
    let (lo, hi) = (edges[0], edges[n]);
    if !(lo..=hi).contains(&v) {
        return None;
    }
    if hi == lo {
        return Some(0);
    }
    let mut i = (((v - lo) / (hi - lo)) * n as f64).floor() as usize;
    i = i.min(n - 1);
    while i > 0 && v <= edges[i] {
        i -= 1;
    }
    while i + 1 < n && v > edges[i + 1] {
        i += 1;
    }
    Some(i)
}
