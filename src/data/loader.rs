use std::io::Read;
use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::ReviewRecord;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Source column names for the fields a [`ReviewRecord`] needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ColumnNames {
    pub airline: String,
    pub year: String,
    pub rating: String,
    pub recommended: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            airline: "Airline Name".to_string(),
            year: "Review_year".to_string(),
            rating: "Overall_Rating".to_string(),
            recommended: "Recommended".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load airline reviews from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one review per row
/// * `.json`    – `[{ "Airline Name": "...", "Review_year": 2019, ... }, ...]`
/// * `.parquet` – flat table with the same column names
pub fn load_file(path: &Path, columns: &ColumnNames) -> Result<Vec<ReviewRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let reviews = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            parse_csv(file, columns)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text, columns)?
        }
        "parquet" | "pq" => load_parquet(path, columns)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    log::info!("Loaded {} reviews from {}", reviews.len(), path.display());
    Ok(reviews)
}

// ---------------------------------------------------------------------------
// Cell parsing shared by every format
// ---------------------------------------------------------------------------

/// Review years outside this range are treated as unusable cells.
pub const PLAUSIBLE_YEARS: RangeInclusive<i32> = 1900..=2100;

fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    let year = match s.parse::<i32>() {
        Ok(y) => y,
        // Spreadsheet exports sometimes write years as floats ("2019.0").
        Err(_) => {
            let f = s.parse::<f64>().ok()?;
            let (lo, hi) = (*PLAUSIBLE_YEARS.start() as f64, *PLAUSIBLE_YEARS.end() as f64);
            if f.fract() != 0.0 || !(lo..=hi).contains(&f) {
                return None;
            }
            f as i32
        }
    };
    PLAUSIBLE_YEARS.contains(&year).then_some(year)
}

fn parse_rating(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

fn parse_recommended(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => Some(true),
        "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Build a record from raw cells; `None` when the airline or year is unusable.
fn record_from_cells(
    airline: Option<&str>,
    year: Option<&str>,
    rating: Option<&str>,
    recommended: Option<&str>,
) -> Option<ReviewRecord> {
    let airline = airline.map(str::trim).filter(|a| !a.is_empty())?;
    let year = year.and_then(parse_year)?;
    Some(ReviewRecord {
        airline: airline.to_string(),
        year,
        rating: rating.and_then(parse_rating),
        recommended: recommended.and_then(parse_recommended),
    })
}

fn report_skipped(format: &str, skipped: usize) {
    if skipped > 0 {
        log::warn!("{format}: skipped {skipped} rows without an airline name or a plausible review year");
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one review per row.
/// Columns other than the four in [`ColumnNames`] are ignored.
pub fn parse_csv<R: Read>(input: R, columns: &ColumnNames) -> Result<Vec<ReviewRecord>> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let position = |name: &str| headers.iter().position(|h| h == name);
    let airline_idx = position(&columns.airline)
        .with_context(|| format!("CSV missing '{}' column", columns.airline))?;
    let year_idx = position(&columns.year)
        .with_context(|| format!("CSV missing '{}' column", columns.year))?;
    let rating_idx = position(&columns.rating);
    let recommended_idx = position(&columns.recommended);

    let mut reviews = Vec::new();
    let mut skipped = 0;

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        match record_from_cells(
            record.get(airline_idx),
            record.get(year_idx),
            rating_idx.and_then(|i| record.get(i)),
            recommended_idx.and_then(|i| record.get(i)),
        ) {
            Some(review) => reviews.push(review),
            None => skipped += 1,
        }
    }

    report_skipped("CSV", skipped);
    Ok(reviews)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, as written by `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Airline Name": "Emirates", "Review_year": 2019, "Overall_Rating": 8, "Recommended": "yes" },
///   ...
/// ]
/// ```
pub fn parse_json(text: &str, columns: &ColumnNames) -> Result<Vec<ReviewRecord>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut reviews = Vec::with_capacity(rows.len());
    let mut skipped = 0;

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        let cell = |name: &str| obj.get(name).and_then(json_cell_text);

        match record_from_cells(
            cell(&columns.airline).as_deref(),
            cell(&columns.year).as_deref(),
            cell(&columns.rating).as_deref(),
            cell(&columns.recommended).as_deref(),
        ) {
            Some(review) => reviews.push(review),
            None => skipped += 1,
        }
    }

    report_skipped("JSON", skipped);
    Ok(reviews)
}

fn json_cell_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one review per row.
///
/// The airline and year columns are required; rating and recommended are
/// optional.  Works with files written by both **Pandas** and **Polars**.
fn load_parquet(path: &Path, columns: &ColumnNames) -> Result<Vec<ReviewRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut reviews = Vec::new();
    let mut skipped = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let airline_idx = schema
            .index_of(&columns.airline)
            .map_err(|_| anyhow::anyhow!("Parquet file missing '{}' column", columns.airline))?;
        let year_idx = schema
            .index_of(&columns.year)
            .map_err(|_| anyhow::anyhow!("Parquet file missing '{}' column", columns.year))?;
        let rating_col = schema.index_of(&columns.rating).ok().map(|i| batch.column(i));
        let recommended_col = schema
            .index_of(&columns.recommended)
            .ok()
            .map(|i| batch.column(i));

        let airline_col = batch.column(airline_idx);
        let year_col = batch.column(year_idx);

        for row in 0..batch.num_rows() {
            let rating = rating_col.and_then(|c| cell_text(c, row));
            let recommended = recommended_col.and_then(|c| cell_text(c, row));
            match record_from_cells(
                cell_text(airline_col, row).as_deref(),
                cell_text(year_col, row).as_deref(),
                rating.as_deref(),
                recommended.as_deref(),
            ) {
                Some(review) => reviews.push(review),
                None => skipped += 1,
            }
        }
    }

    report_skipped("Parquet", skipped);
    Ok(reviews)
}

/// Render a single Arrow cell as text so every format shares one parser.
fn cell_text(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => Some(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map(|a| a.value(row).to_string()),
        other => {
            log::debug!("Ignoring parquet cell of unsupported type {other:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Airline Name,Overall_Rating,Review_Title,Review_year,Recommended
Emirates,9,Great,2019,yes
Emirates,n,Meh,2019,no
Qatar Airways,8,Fine,2018.0,yes
,5,Anonymous,2018,no
Lufthansa,4,Late,unknown,no
";

    #[test]
    fn csv_rows_map_to_reviews() {
        let reviews = parse_csv(CSV.as_bytes(), &ColumnNames::default()).unwrap();
        assert_eq!(reviews.len(), 3);
        assert_eq!(
            reviews[0],
            ReviewRecord {
                airline: "Emirates".into(),
                year: 2019,
                rating: Some(9.0),
                recommended: Some(true),
            }
        );
        // "n" marks a missing rating in the source data
        assert_eq!(reviews[1].rating, None);
        assert_eq!(reviews[1].recommended, Some(false));
        assert_eq!(reviews[2].year, 2018);
    }

    #[test]
    fn csv_without_year_column_is_an_error() {
        let err = parse_csv("Airline Name,Overall_Rating\nEmirates,9\n".as_bytes(), &ColumnNames::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("Review_year"));
    }

    #[test]
    fn csv_honours_custom_column_names() {
        let columns = ColumnNames {
            airline: "carrier".into(),
            year: "yr".into(),
            rating: "score".into(),
            recommended: "rec".into(),
        };
        let reviews = parse_csv("carrier,yr,score\nKLM,2016,7.5\n".as_bytes(), &columns).unwrap();
        assert_eq!(reviews[0].airline, "KLM");
        assert_eq!(reviews[0].rating, Some(7.5));
        assert_eq!(reviews[0].recommended, None);
    }

    #[test]
    fn json_records_accept_numbers_and_strings() {
        let text = r#"[
            {"Airline Name": "Emirates", "Review_year": 2017, "Overall_Rating": 6, "Recommended": "no"},
            {"Airline Name": "Oman Air", "Review_year": "2016", "Overall_Rating": "7", "Recommended": true},
            {"Airline Name": null, "Review_year": 2016}
        ]"#;
        let reviews = parse_json(text, &ColumnNames::default()).unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].rating, Some(6.0));
        assert_eq!(reviews[1].year, 2016);
        assert_eq!(reviews[1].recommended, Some(true));
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(parse_json(r#"{"a": 1}"#, &ColumnNames::default()).is_err());
        assert!(parse_json("[1, 2]", &ColumnNames::default()).is_err());
    }

    #[test]
    fn outlier_years_are_skipped() {
        let csv = "\
Airline Name,Review_year,Overall_Rating
Emirates,2019,9
Emirates,2018,7
Emirates,99999,5
Emirates,1e9,5
Emirates,1850,5
";
        let reviews = parse_csv(csv.as_bytes(), &ColumnNames::default()).unwrap();
        let years: Vec<i32> = reviews.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2019, 2018]);
    }

    #[test]
    fn year_cells_must_be_whole_and_in_range() {
        assert_eq!(parse_year(" 2016 "), Some(2016));
        assert_eq!(parse_year("2016.0"), Some(2016));
        assert_eq!(parse_year("2016.5"), None);
        assert_eq!(parse_year("inf"), None);
        assert_eq!(parse_year("-2016"), None);
        assert_eq!(parse_year("2101"), None);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("reviews.xlsx"), &ColumnNames::default()).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}
