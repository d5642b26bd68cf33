use std::cmp::Ordering;

use super::model::{NumericColumn, Penguin, PenguinDataset};

// ---------------------------------------------------------------------------
// Columns of the grid / table views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableColumn {
    Species,
    Island,
    Measurement(NumericColumn),
    Sex,
    Year,
}

impl TableColumn {
    /// Column order of the source table.
    pub const ALL: [TableColumn; 8] = [
        TableColumn::Species,
        TableColumn::Island,
        TableColumn::Measurement(NumericColumn::BillLength),
        TableColumn::Measurement(NumericColumn::BillDepth),
        TableColumn::Measurement(NumericColumn::FlipperLength),
        TableColumn::Measurement(NumericColumn::BodyMass),
        TableColumn::Sex,
        TableColumn::Year,
    ];

    pub fn header(self) -> &'static str {
        match self {
            TableColumn::Species => "species",
            TableColumn::Island => "island",
            TableColumn::Measurement(c) => c.name(),
            TableColumn::Sex => "sex",
            TableColumn::Year => "year",
        }
    }
}

/// Render one cell. Absent values show as `NA`.
pub fn format_cell(penguin: &Penguin, column: TableColumn) -> String {
    match column {
        TableColumn::Species => penguin.species.to_string(),
        TableColumn::Island => penguin.island.to_string(),
        TableColumn::Measurement(c) => match (c, penguin.value(c)) {
            (_, None) => "NA".to_string(),
            (NumericColumn::BillLength | NumericColumn::BillDepth, Some(v)) => format!("{v:.1}"),
            (_, Some(v)) => format!("{v:.0}"),
        },
        TableColumn::Sex => penguin
            .sex
            .map(|s| s.to_string())
            .unwrap_or_else(|| "NA".to_string()),
        TableColumn::Year => penguin.year.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: TableColumn,
    pub ascending: bool,
}

/// Compare two present-or-absent keys; absent sorts last in both directions.
fn cmp_optional<T, F>(a: Option<T>, b: Option<T>, ascending: bool, cmp: F) -> Ordering
where
    F: Fn(&T, &T) -> Ordering,
{
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = cmp(&a, &b);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn cmp_rows(a: &Penguin, b: &Penguin, key: SortKey) -> Ordering {
    let asc = key.ascending;
    match key.column {
        TableColumn::Species => cmp_optional(Some(a.species), Some(b.species), asc, Ord::cmp),
        TableColumn::Island => cmp_optional(Some(a.island), Some(b.island), asc, Ord::cmp),
        TableColumn::Measurement(c) => cmp_optional(a.value(c), b.value(c), asc, f64::total_cmp),
        TableColumn::Sex => cmp_optional(a.sex, b.sex, asc, Ord::cmp),
        TableColumn::Year => cmp_optional(Some(a.year), Some(b.year), asc, Ord::cmp),
    }
}

/// Stable sort of row indices by `key`.
pub fn sort_indices(dataset: &PenguinDataset, indices: &mut [usize], key: SortKey) {
    let rows = dataset.penguins();
    indices.sort_by(|&a, &b| cmp_rows(&rows[a], &rows[b], key));
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Row indices on this page.
    pub rows: Vec<usize>,
    /// Zero-based page index after clamping.
    pub page: usize,
    /// Always at least 1.
    pub page_count: usize,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            rows: Vec::new(),
            page: 0,
            page_count: 1,
        }
    }
}

pub fn paginate(indices: &[usize], page: usize, page_size: usize) -> Page {
    let page_size = page_size.max(1);
    let page_count = indices.len().div_ceil(page_size).max(1);
    let page = page.min(page_count - 1);
    let start = (page * page_size).min(indices.len());
    let end = (start + page_size).min(indices.len());
    Page {
        rows: indices[start..end].to_vec(),
        page,
        page_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::penguin;
    use crate::data::model::{Sex, Species};

    fn dataset() -> PenguinDataset {
        let mut rows = vec![
            penguin(Species::Gentoo, Some(220.0)),
            penguin(Species::Adelie, None),
            penguin(Species::Chinstrap, Some(195.0)),
            penguin(Species::Adelie, Some(181.0)),
        ];
        rows[0].sex = Some(Sex::Male);
        rows[2].sex = Some(Sex::Female);
        rows[3].bill_length_mm = Some(39.14);
        PenguinDataset::from_penguins(rows)
    }

    #[test]
    fn absent_values_sort_last_both_ways() {
        let ds = dataset();
        let flipper = TableColumn::Measurement(NumericColumn::FlipperLength);

        let mut idx = vec![0, 1, 2, 3];
        sort_indices(&ds, &mut idx, SortKey { column: flipper, ascending: true });
        assert_eq!(idx, vec![3, 2, 0, 1]);

        sort_indices(&ds, &mut idx, SortKey { column: flipper, ascending: false });
        assert_eq!(idx, vec![0, 2, 3, 1]);
    }

    #[test]
    fn species_sort_is_stable() {
        let ds = dataset();
        let mut idx = vec![0, 1, 2, 3];
        sort_indices(
            &ds,
            &mut idx,
            SortKey {
                column: TableColumn::Species,
                ascending: true,
            },
        );
        assert_eq!(idx, vec![1, 3, 2, 0]);
    }

    #[test]
    fn pagination_clamps_to_last_page() {
        let idx: Vec<usize> = (0..25).collect();
        let page = paginate(&idx, 7, 10);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.rows, (20..25).collect::<Vec<_>>());

        let empty = paginate(&[], 3, 0);
        assert_eq!(empty.page_count, 1);
        assert_eq!(empty.page, 0);
        assert!(empty.rows.is_empty());
    }

    #[test]
    fn cells_render_na_for_absent_values() {
        let ds = dataset();
        let row = ds.get(1).unwrap();
        assert_eq!(format_cell(row, TableColumn::Measurement(NumericColumn::FlipperLength)), "NA");
        assert_eq!(format_cell(row, TableColumn::Sex), "NA");
        let row = ds.get(3).unwrap();
        assert_eq!(format_cell(row, TableColumn::Measurement(NumericColumn::BillLength)), "39.1");
        assert_eq!(format_cell(row, TableColumn::Measurement(NumericColumn::FlipperLength)), "181");
        assert_eq!(format_cell(row, TableColumn::Species), "Adelie");
    }
}
