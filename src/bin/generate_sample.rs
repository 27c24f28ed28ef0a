use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
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

const FEATURES: [&str; 4] = ["SepalLengthCm", "SepalWidthCm", "PetalLengthCm", "PetalWidthCm"];

/// (species, per-feature (mean, std)) in `FEATURES` order.
const SPECIES: [(&str, [(f64, f64); 4]); 3] = [
    ("Iris-setosa", [(5.01, 0.35), (3.42, 0.38), (1.46, 0.17), (0.24, 0.11)]),
    ("Iris-versicolor", [(5.94, 0.52), (2.77, 0.31), (4.26, 0.47), (1.33, 0.20)]),
    ("Iris-virginica", [(6.59, 0.64), (2.97, 0.32), (5.55, 0.55), (2.03, 0.27)]),
];

const ROWS_PER_SPECIES: usize = 50;

/// Every this many rows one measurement is left blank.
const BLANK_EVERY: usize = 37;

struct Sample {
    ids: Vec<i64>,
    features: [Vec<Option<f64>>; 4],
    species: Vec<Option<String>>,
}

fn generate(rng: &mut SimpleRng) -> Sample {
    let mut sample = Sample {
        ids: Vec::new(),
        features: Default::default(),
        species: Vec::new(),
    };

    let mut row: usize = 0;
    for (name, params) in &SPECIES {
        for _ in 0..ROWS_PER_SPECIES {
            row += 1;
            sample.ids.push(row as i64);
            for (f, &(mean, std)) in params.iter().enumerate() {
                // Measurements are recorded to one decimal place.
                let v = (rng.gauss(mean, std).max(0.1) * 10.0).round() / 10.0;
                sample.features[f].push(Some(v));
            }
            sample.species.push(Some(name.to_string()));

            if row % BLANK_EVERY == 0 {
                let slot = (rng.next_u64() % 5) as usize;
                match slot {
                    4 => sample.species[row - 1] = None,
                    f => sample.features[f][row - 1] = None,
                }
            }
        }
    }
    sample
}

fn write_csv(path: &Path, sample: &Sample) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    let mut header = vec!["Id"];
    header.extend(FEATURES);
    header.push("Species");
    writer.write_record(&header)?;

    for (i, id) in sample.ids.iter().enumerate() {
        let mut record = vec![id.to_string()];
        for feature in &sample.features {
            record.push(feature[i].map(|v| format!("{v:.1}")).unwrap_or_default());
        }
        record.push(sample.species[i].clone().unwrap_or_default());
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, sample: &Sample) -> Result<()> {
    let mut fields = vec![Field::new("Id", DataType::Int64, false)];
    fields.extend(FEATURES.iter().map(|f| Field::new(*f, DataType::Float64, true)));
    fields.push(Field::new("Species", DataType::Utf8, true));
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = vec![Arc::new(Int64Array::from(sample.ids.clone()))];
    for feature in &sample.features {
        columns.push(Arc::new(Float64Array::from(feature.clone())));
    }
    columns.push(Arc::new(StringArray::from(sample.species.clone())));

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let output = std::env::args().nth(1).unwrap_or_else(|| "data.csv".to_string());
    let path = Path::new(&output);

    let mut rng = SimpleRng::new(42);
    let sample = generate(&mut rng);

    match path.extension().and_then(|e| e.to_str()) {
        Some("parquet") | Some("pq") => write_parquet(path, &sample)?,
        _ => write_csv(path, &sample)?,
    }

    println!(
        "Wrote {} rows ({} species, {} measurements each) to {output}",
        sample.ids.len(),
        SPECIES.len(),
        FEATURES.len()
    );
    Ok(())
}
