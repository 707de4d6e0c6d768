use std::sync::Arc;

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const AIRLINES: [(&str, f64); 13] = [
    ("Air India", 4.5),
    ("US Airways", 3.0),
    ("United Airlines", 3.5),
    ("Emirates", 6.5),
    ("Tigerair", 3.0),
    ("Thai Airways", 6.0),
    ("Japan Airlines", 7.5),
    ("Singapore Airlines", 7.8),
    ("Qatar Airways", 8.0),
    ("Oman Air", 6.8),
    ("British Airways", 5.0),
    ("Lufthansa", 5.5),
    ("KLM Royal Dutch Airlines", 5.8),
];

const FIRST_YEAR: i64 = 2015;
const LAST_YEAR: i64 = 2023;

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

struct Row {
    airline: &'static str,
    year: i64,
    /// `None` is written as "n", like the public dataset.
    rating: Option<i64>,
    recommended: &'static str,
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let mut rows = Vec::new();

    for &(airline, base) in &AIRLINES {
        for year in FIRST_YEAR..=LAST_YEAR {
            // Some airline-years have no reviews at all.
            if rng.next_f64() < 0.1 {
                continue;
            }
            let drift = (year - FIRST_YEAR) as f64 * rng.gauss(0.0, 0.15);
            let reviews = 3 + (rng.next_u64() % 8) as usize;
            for _ in 0..reviews {
                let score = rng.gauss(base + drift, 1.5).round().clamp(1.0, 10.0) as i64;
                let rating = (rng.next_f64() >= 0.05).then_some(score);
                let recommended = if score >= 6 { "yes" } else { "no" };
                rows.push(Row {
                    airline,
                    year,
                    rating,
                    recommended,
                });
            }
        }
    }

    // ---- CSV ----
    let csv_path = "Airline_review.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    writer
        .write_record(["Airline Name", "Overall_Rating", "Review_year", "Recommended"])
        .expect("Failed to write CSV header");
    for row in &rows {
        let rating = row.rating.map_or_else(|| "n".to_string(), |r| r.to_string());
        let year = row.year.to_string();
        writer
            .write_record([row.airline, rating.as_str(), year.as_str(), row.recommended])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV");

    // ---- Parquet ----
    let schema = Arc::new(Schema::new(vec![
        Field::new("Airline Name", DataType::Utf8, false),
        Field::new("Overall_Rating", DataType::Int64, true),
        Field::new("Review_year", DataType::Int64, false),
        Field::new("Recommended", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(rows.iter().map(|r| r.airline).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.rating).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.recommended).collect::<Vec<_>>())),
        ],
    )
    .expect("Failed to create RecordBatch");

    let parquet_path = "Airline_review.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} reviews for {} airlines ({FIRST_YEAR}–{LAST_YEAR}) to {csv_path} and {parquet_path}",
        rows.len(),
        AIRLINES.len()
    );
}
