use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// (mean, std-dev) of one measurement for one species.
type Dist = (f64, f64);

struct SpeciesProfile {
    name: &'static str,
    /// Island and number of birds sampled there.
    islands: &'static [(&'static str, usize)],
    bill_length: Dist,
    bill_depth: Dist,
    flipper_length: Dist,
    body_mass: Dist,
}

const PROFILES: [SpeciesProfile; 3] = [
    SpeciesProfile {
        name: "Adelie",
        islands: &[("Torgersen", 52), ("Biscoe", 44), ("Dream", 56)],
        bill_length: (38.8, 2.7),
        bill_depth: (18.3, 1.2),
        flipper_length: (190.0, 6.5),
        body_mass: (3700.0, 460.0),
    },
    SpeciesProfile {
        name: "Gentoo",
        islands: &[("Biscoe", 124)],
        bill_length: (47.5, 3.1),
        bill_depth: (15.0, 1.0),
        flipper_length: (217.0, 6.5),
        body_mass: (5076.0, 504.0),
    },
    SpeciesProfile {
        name: "Chinstrap",
        islands: &[("Dream", 68)],
        bill_length: (48.8, 3.3),
        bill_depth: (18.4, 1.1),
        flipper_length: (196.0, 7.1),
        body_mass: (3733.0, 384.0),
    },
];

/// Roughly one bird in this many has no measurements at all.
const UNMEASURED_EVERY: u64 = 170;
/// Roughly one bird in this many has no recorded sex.
const UNSEXED_EVERY: u64 = 30;

#[derive(Default)]
struct Columns {
    species: Vec<&'static str>,
    island: Vec<&'static str>,
    bill_length: Vec<Option<f64>>,
    bill_depth: Vec<Option<f64>>,
    flipper_length: Vec<Option<i64>>,
    body_mass: Vec<Option<i64>>,
    sex: Vec<Option<&'static str>>,
    year: Vec<i64>,
}

fn generate(rng: &mut SimpleRng) -> Columns {
    let mut cols = Columns::default();
    for profile in &PROFILES {
        for &(island, n) in profile.islands {
            for i in 0..n {
                let male = rng.next_f64() < 0.5;
                // Males run about half a standard deviation larger.
                let shift = if male { 0.5 } else { -0.5 };
                let draw = |rng: &mut SimpleRng, (mu, sd): Dist| rng.gauss(mu + shift * sd, sd * 0.8);
                let measured = rng.next_u64() % UNMEASURED_EVERY != 0;

                cols.species.push(profile.name);
                cols.island.push(island);
                cols.year.push(2007 + (i * 3 / n) as i64);
                if measured {
                    cols.bill_length.push(Some((draw(&mut *rng, profile.bill_length) * 10.0).round() / 10.0));
                    cols.bill_depth.push(Some((draw(&mut *rng, profile.bill_depth) * 10.0).round() / 10.0));
                    cols.flipper_length.push(Some(draw(&mut *rng, profile.flipper_length).round() as i64));
                    cols.body_mass.push(Some((draw(&mut *rng, profile.body_mass) / 25.0).round() as i64 * 25));
                } else {
                    cols.bill_length.push(None);
                    cols.bill_depth.push(None);
                    cols.flipper_length.push(None);
                    cols.body_mass.push(None);
                }
                let sexed = measured && rng.next_u64() % UNSEXED_EVERY != 0;
                cols.sex.push(sexed.then_some(if male { "male" } else { "female" }));
            }
        }
    }
    cols
}

fn write_csv(cols: &Columns, path: &Path) -> Result<()> {
    fn cell<T: ToString>(v: Option<T>) -> String {
        v.map_or_else(|| "NA".to_string(), |v| v.to_string())
    }

    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record([
        "species",
        "island",
        "bill_length_mm",
        "bill_depth_mm",
        "flipper_length_mm",
        "body_mass_g",
        "sex",
        "year",
    ])?;
    for i in 0..cols.species.len() {
        writer.write_record([
            cols.species[i].to_string(),
            cols.island[i].to_string(),
            cell(cols.bill_length[i]),
            cell(cols.bill_depth[i]),
            cell(cols.flipper_length[i]),
            cell(cols.body_mass[i]),
            cell(cols.sex[i]),
            cols.year[i].to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(cols: &Columns, path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("species", DataType::Utf8, false),
        Field::new("island", DataType::Utf8, false),
        Field::new("bill_length_mm", DataType::Float64, true),
        Field::new("bill_depth_mm", DataType::Float64, true),
        Field::new("flipper_length_mm", DataType::Int64, true),
        Field::new("body_mass_g", DataType::Int64, true),
        Field::new("sex", DataType::Utf8, true),
        Field::new("year", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(cols.species.clone())),
            Arc::new(StringArray::from(cols.island.clone())),
            Arc::new(Float64Array::from(cols.bill_length.clone())),
            Arc::new(Float64Array::from(cols.bill_depth.clone())),
            Arc::new(Int64Array::from(cols.flipper_length.clone())),
            Arc::new(Int64Array::from(cols.body_mass.clone())),
            Arc::new(StringArray::from(cols.sex.clone())),
            Arc::new(Int64Array::from(cols.year.clone())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(2007);
    let cols = generate(&mut rng);

    let csv_path = out_dir.join("penguins.csv");
    let parquet_path = out_dir.join("penguins.parquet");
    write_csv(&cols, &csv_path)?;
    write_parquet(&cols, &parquet_path)?;

    println!(
        "Wrote {} penguins to {} and {}",
        cols.species.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
