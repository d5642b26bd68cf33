use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Island, NumericColumn, Penguin, PenguinDataset, Sex, Species};

/// The sample table shipped with the binary.
const EMBEDDED_CSV: &str = include_str!("../../data/penguins.csv");

/// Cell spellings treated as an absent value.
const MISSING: [&str; 3] = ["", "NA", "NaN"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a penguins table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the canonical column names, `NA` for absent
/// * `.json`    – `[{ "species": "Adelie", "bill_length_mm": 39.1, ... }, ...]`
/// * `.parquet` – one column per attribute, nulls for absent values
pub fn load_file(path: &Path) -> Result<PenguinDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            load_csv(file)
        }
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Parse the bundled sample table.
pub fn load_embedded() -> Result<PenguinDataset> {
    load_csv(EMBEDDED_CSV.as_bytes()).context("parsing embedded penguins table")
}

// ---------------------------------------------------------------------------
// Row assembly shared by every format
// ---------------------------------------------------------------------------

/// Raw cell text for one row, keyed by canonical column order.
struct RawRow<'a> {
    species: &'a str,
    island: &'a str,
    measurements: [Option<f64>; 4],
    sex: Option<&'a str>,
    year: i64,
}

fn build_penguin(row: usize, raw: RawRow<'_>) -> Result<Penguin> {
    let species: Species = raw
        .species
        .parse()
        .with_context(|| format!("Row {row}: bad species"))?;
    let island: Island = raw
        .island
        .parse()
        .with_context(|| format!("Row {row}: bad island"))?;
    let sex = raw
        .sex
        .map(str::parse::<Sex>)
        .transpose()
        .with_context(|| format!("Row {row}: bad sex"))?;
    let year = i32::try_from(raw.year).with_context(|| format!("Row {row}: year out of range"))?;
    let [bill_length_mm, bill_depth_mm, flipper_length_mm, body_mass_g] = raw.measurements;

    Ok(Penguin {
        species,
        island,
        bill_length_mm,
        bill_depth_mm,
        flipper_length_mm,
        body_mass_g,
        sex,
        year,
    })
}

fn is_missing(s: &str) -> bool {
    MISSING.contains(&s.trim())
}

/// Non-finite numbers are absent as well.
fn present(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the column names of the source table.
/// Extra columns are ignored; column order does not matter.
fn load_csv<R: Read>(input: R) -> Result<PenguinDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };
    let species_idx = position("species")?;
    let island_idx = position("island")?;
    let sex_idx = position("sex")?;
    let year_idx = position("year")?;
    let measure_idx = NumericColumn::ALL
        .iter()
        .map(|c| position(c.name()))
        .collect::<Result<Vec<_>>>()?;

    let mut penguins = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let mut measurements = [None; 4];
        for (slot, (&idx, column)) in measurements
            .iter_mut()
            .zip(measure_idx.iter().zip(NumericColumn::ALL))
        {
            *slot = parse_optional_f64(cell(idx))
                .with_context(|| format!("Row {row_no}, {column}"))?;
        }

        let year = cell(year_idx)
            .parse::<i64>()
            .with_context(|| format!("Row {row_no}: '{}' is not a year", cell(year_idx)))?;
        let sex = cell(sex_idx);

        penguins.push(build_penguin(
            row_no,
            RawRow {
                species: cell(species_idx),
                island: cell(island_idx),
                measurements,
                sex: (!is_missing(sex)).then_some(sex),
                year,
            },
        )?);
    }

    Ok(PenguinDataset::from_penguins(penguins))
}

fn parse_optional_f64(s: &str) -> Result<Option<f64>> {
    if is_missing(s) {
        return Ok(None);
    }
    let v = s
        .parse::<f64>()
        .with_context(|| format!("'{s}' is not a number"))?;
    Ok(present(v))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "species": "Adelie", "island": "Torgersen",
///     "bill_length_mm": 39.1, "bill_depth_mm": 18.7,
///     "flipper_length_mm": 181, "body_mass_g": 3750,
///     "sex": "male", "year": 2007
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<PenguinDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<PenguinDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut penguins = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut measurements = [None; 4];
        for (slot, column) in measurements.iter_mut().zip(NumericColumn::ALL) {
            *slot = json_to_f64(obj.get(column.name()))
                .with_context(|| format!("Row {i}, {column}"))?;
        }

        let year = obj
            .get("year")
            .and_then(|v| v.as_i64().or_else(|| v.as_str()?.trim().parse().ok()))
            .with_context(|| format!("Row {i}: missing or invalid 'year'"))?;

        penguins.push(build_penguin(
            i,
            RawRow {
                species: text_field(obj, "species", i)?
                    .with_context(|| format!("Row {i}: missing 'species'"))?,
                island: text_field(obj, "island", i)?
                    .with_context(|| format!("Row {i}: missing 'island'"))?,
                measurements,
                sex: text_field(obj, "sex", i)?,
                year,
            },
        )?);
    }

    Ok(PenguinDataset::from_penguins(penguins))
}

fn text_field<'a>(
    obj: &'a serde_json::Map<String, JsonValue>,
    key: &str,
    row: usize,
) -> Result<Option<&'a str>> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) if is_missing(s) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.as_str())),
        Some(other) => bail!("Row {row}: '{key}' should be a string, got {other}"),
    }
}

fn json_to_f64(val: Option<&JsonValue>) -> Result<Option<f64>> {
    match val {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => Ok(n.as_f64().and_then(present)),
        Some(JsonValue::String(s)) => parse_optional_f64(s.trim()),
        Some(other) => bail!("expected a number, got {other}"),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing one penguin per row.
///
/// Expected schema:
/// - `species`, `island`, `sex`: Utf8 or LargeUtf8 (sex nullable)
/// - measurements: Float64, Float32, Int64 or Int32, nullable
/// - `year`: Int64 or Int32
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<PenguinDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut penguins = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = penguins.len();

        let species_col = column(&batch, "species")?;
        let island_col = column(&batch, "island")?;
        let sex_col = column(&batch, "sex")?;
        let year_col = column(&batch, "year")?;
        let measure_cols = NumericColumn::ALL
            .iter()
            .map(|c| column(&batch, c.name()))
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let row_no = offset + row;

            let mut measurements = [None; 4];
            for (slot, col) in measurements.iter_mut().zip(&measure_cols) {
                *slot = extract_f64(col, row).with_context(|| format!("Row {row_no}"))?;
            }
            let year = extract_i64(year_col, row)
                .with_context(|| format!("Row {row_no}"))?
                .with_context(|| format!("Row {row_no}: null year"))?;
            let species = extract_str(species_col, row)?
                .with_context(|| format!("Row {row_no}: null species"))?;
            let island = extract_str(island_col, row)?
                .with_context(|| format!("Row {row_no}: null island"))?;

            penguins.push(build_penguin(
                row_no,
                RawRow {
                    species,
                    island,
                    measurements,
                    sex: extract_str(sex_col, row)?.filter(|s| !is_missing(s)),
                    year,
                },
            )?);
        }
    }

    Ok(PenguinDataset::from_penguins(penguins))
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| anyhow!("Parquet file missing '{name}' column"))
}

fn extract_str(col: &ArrayRef, row: usize) -> Result<Option<&str>> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(Some(arr.value(row)))
        }
        DataType::LargeUtf8 => Ok(Some(col.as_string::<i64>().value(row))),
        other => bail!("Expected a string column, got {other:?}"),
    }
}

fn extract_f64(col: &ArrayRef, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let any = col.as_any();
    let v = if let Some(arr) = any.downcast_ref::<Float64Array>() {
        arr.value(row)
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        arr.value(row) as f64
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        arr.value(row) as f64
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        arr.value(row) as f64
    } else {
        bail!("Measurement column type is {:?}, expected a number", col.data_type())
    };
    Ok(present(v))
}

fn extract_i64(col: &ArrayRef, row: usize) -> Result<Option<i64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<Int64Array>() {
        Ok(Some(arr.value(row)))
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        Ok(Some(arr.value(row) as i64))
    } else {
        bail!("Year column type is {:?}, expected an integer", col.data_type())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int32Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    const CSV: &str = "\
species,island,bill_length_mm,bill_depth_mm,flipper_length_mm,body_mass_g,sex,year
Adelie,Torgersen,39.1,18.7,181,3750,male,2007
Adelie,Torgersen,NA,NA,NA,NA,NA,2007
Gentoo,Biscoe,46.1,13.2,211,4500,female,2008
";

    #[test]
    fn csv_na_cells_are_absent() {
        let ds = load_csv(CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        let first = ds.get(0).unwrap();
        assert_eq!(first.species, Species::Adelie);
        assert_eq!(first.flipper_length_mm, Some(181.0));
        assert_eq!(first.sex, Some(Sex::Male));

        let blank = ds.get(1).unwrap();
        assert_eq!(blank.bill_length_mm, None);
        assert_eq!(blank.body_mass_g, None);
        assert_eq!(blank.sex, None);
        assert_eq!(blank.year, 2007);
    }

    #[test]
    fn csv_unknown_species_names_the_row() {
        let bad = CSV.replace("Gentoo", "Emperor");
        let err = load_csv(bad.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("Row 2"), "{err:#}");
        assert!(format!("{err:#}").contains("Emperor"), "{err:#}");
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let bad = "species,island,year\nAdelie,Dream,2007\n";
        let err = load_csv(bad.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("sex"), "{err:#}");
    }

    #[test]
    fn embedded_table_has_all_species() {
        let ds = load_embedded().unwrap();
        assert_eq!(ds.len(), 344);
        for sp in Species::ALL {
            assert!(ds.species_count(sp) > 0);
        }
        assert!(ds.penguins().iter().any(|p| p.flipper_length_mm.is_none()));
    }

    #[test]
    fn json_accepts_nulls_and_na() {
        let json = r#"[
            {"species": "Chinstrap", "island": "Dream", "bill_length_mm": 46.5,
             "bill_depth_mm": 17.9, "flipper_length_mm": 192, "body_mass_g": 3500,
             "sex": "female", "year": 2007},
            {"species": "Chinstrap", "island": "Dream", "bill_length_mm": null,
             "bill_depth_mm": "NA", "flipper_length_mm": null, "body_mass_g": null,
             "sex": null, "year": "2009"}
        ]"#;
        let ds = parse_json(json).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(0).unwrap().body_mass_g, Some(3500.0));
        assert_eq!(ds.get(1).unwrap().bill_depth_mm, None);
        assert_eq!(ds.get(1).unwrap().year, 2009);
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        tmp.write_all(CSV.as_bytes()).unwrap();
        assert_eq!(load_file(tmp.path()).unwrap().len(), 3);

        let err = load_file(Path::new("penguins.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn parquet_reads_mixed_numeric_types() {
        let tmp = tempfile::Builder::new()
            .suffix(".parquet")
            .tempfile()
            .unwrap();
        let schema = Arc::new(Schema::new(vec![
            Field::new("species", DataType::Utf8, false),
            Field::new("island", DataType::Utf8, false),
            Field::new("bill_length_mm", DataType::Float64, true),
            Field::new("bill_depth_mm", DataType::Float64, true),
            Field::new("flipper_length_mm", DataType::Int32, true),
            Field::new("body_mass_g", DataType::Int32, true),
            Field::new("sex", DataType::Utf8, true),
            Field::new("year", DataType::Int32, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Gentoo", "Adelie"])),
                Arc::new(StringArray::from(vec!["Biscoe", "Dream"])),
                Arc::new(Float64Array::from(vec![Some(47.5), None])),
                Arc::new(Float64Array::from(vec![Some(15.0), None])),
                Arc::new(Int32Array::from(vec![Some(217), None])),
                Arc::new(Int32Array::from(vec![Some(5050), None])),
                Arc::new(StringArray::from(vec![Some("male"), None])),
                Arc::new(Int32Array::from(vec![2008, 2009])),
            ],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(tmp.as_file(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(tmp.path()).unwrap();
        assert_eq!(ds.len(), 2);
        let gentoo = ds.get(0).unwrap();
        assert_eq!(gentoo.flipper_length_mm, Some(217.0));
        assert_eq!(gentoo.sex, Some(Sex::Male));
        let adelie = ds.get(1).unwrap();
        assert_eq!(adelie.island, Island::Dream);
        assert_eq!(adelie.body_mass_g, None);
        assert_eq!(adelie.sex, None);
    }
}
