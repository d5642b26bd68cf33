use std::collections::BTreeMap;

use super::filter::{filtered_indices, RowFilter};
use super::model::{Island, NumericColumn, Penguin, PenguinDataset, Species};

/// Categorical attribute used to split the scatter into series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupBy {
    #[default]
    Species,
    Island,
}

/// Key of one scatter series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Species(Species),
    Island(Island),
}

impl GroupKey {
    fn of(penguin: &Penguin, group_by: GroupBy) -> Self {
        match group_by {
            GroupBy::Species => GroupKey::Species(penguin.species),
            GroupBy::Island => GroupKey::Island(penguin.island),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GroupKey::Species(s) => s.as_str(),
            GroupKey::Island(i) => i.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub key: GroupKey,
    pub points: Vec<[f64; 2]>,
}

/// Project the filtered rows onto `(x, y)`, one series per group present.
/// Rows missing either coordinate are dropped.
pub fn scatter_series(
    dataset: &PenguinDataset,
    filter: &RowFilter,
    x: NumericColumn,
    y: NumericColumn,
    group_by: GroupBy,
) -> Vec<ScatterSeries> {
    let mut groups: BTreeMap<GroupKey, Vec<[f64; 2]>> = BTreeMap::new();
    for idx in filtered_indices(dataset, filter) {
        let Some(p) = dataset.get(idx) else {
            continue;
        };
        if let (Some(xv), Some(yv)) = (p.value(x), p.value(y)) {
            groups
                .entry(GroupKey::of(p, group_by))
                .or_default()
                .push([xv, yv]);
        }
    }
    groups
        .into_iter()
        .map(|(key, points)| ScatterSeries { key, points })
        .collect()
}
