use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Column, Table};
use crate::error::AnalysisError;

/// Cell spellings read as "no value" in text sources.
const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row followed by one record per row
/// * `.json`    – `[{ "col": value, ... }, ...]` (records-oriented)
/// * `.parquet` – any flat schema of scalar columns
///
/// Every column's type is decided here, once: numeric when every present
/// cell is a number, categorical otherwise.
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(AnalysisError::UnsupportedFormat {
            extension: other.to_string(),
        }
        .into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    for (name, ty) in table.schema() {
        log::debug!("  {name}: {ty}");
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Short records are allowed through and padded with missing cells.
fn csv_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.flexible(true);
    builder
}

fn load_csv(path: &Path) -> Result<Table> {
    let reader = csv_builder().from_path(path).context("opening CSV")?;
    read_csv(reader)
}

/// Parse CSV text that is already in memory.
pub fn parse_csv_str(text: &str) -> Result<Table> {
    read_csv(csv_builder().from_reader(text.as_bytes()))
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Table> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() > headers.len() {
            bail!(
                "CSV row {row_no}: expected {} fields, found {}",
                headers.len(),
                record.len()
            );
        }
        for (col_idx, slot) in cells.iter_mut().enumerate() {
            slot.push(record.get(col_idx).unwrap_or("").to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| infer_text_column(name, raw))
        .collect();
    Ok(Table::new(columns)?)
}

fn is_missing_marker(s: &str) -> bool {
    MISSING_MARKERS.contains(&s.trim())
}

/// Numeric when every present cell parses as `f64`; categorical otherwise.
/// Categorical cells keep their original spelling.
fn infer_text_column(name: String, raw: Vec<String>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = raw
        .iter()
        .map(|s| {
            if is_missing_marker(s) {
                Some(None)
            } else {
                s.trim().parse::<f64>().ok().map(Some)
            }
        })
        .collect();

    match parsed {
        Some(values) => Column::numeric(name, values),
        None => Column::categorical(
            name,
            raw.into_iter()
                .map(|s| if is_missing_marker(&s) { None } else { Some(s) })
                .collect(),
        ),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "SepalLengthCm": 5.1, "Species": "Iris-setosa" },
///   ...
/// ]
/// ```
///
/// A key absent from a record counts as missing in that row.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json_str(&text)
}

pub fn parse_json_str(text: &str) -> Result<Table> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut order: Vec<String> = Vec::new();
    let mut cells: BTreeMap<String, Vec<JsonValue>> = BTreeMap::new();

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        for (key, val) in obj {
            let slot = cells.entry(key.clone()).or_insert_with(|| {
                order.push(key.clone());
                vec![JsonValue::Null; i]
            });
            slot.push(val.clone());
        }
        // Pad columns this record did not mention.
        for slot in cells.values_mut() {
            if slot.len() < i + 1 {
                slot.push(JsonValue::Null);
            }
        }
    }

    let columns = order
        .into_iter()
        .map(|name| {
            let raw = cells.remove(&name).unwrap_or_default();
            json_column(name, raw)
        })
        .collect();
    Ok(Table::new(columns)?)
}

fn json_column(name: String, raw: Vec<JsonValue>) -> Column {
    let all_numeric = raw
        .iter()
        .all(|v| matches!(v, JsonValue::Null | JsonValue::Number(_)));

    if all_numeric {
        Column::numeric(name, raw.iter().map(JsonValue::as_f64).collect())
    } else {
        Column::categorical(
            name,
            raw.into_iter()
                .map(|v| match v {
                    JsonValue::Null => None,
                    JsonValue::String(s) if is_missing_marker(&s) => None,
                    JsonValue::String(s) => Some(s),
                    other => Some(other.to_string()),
                })
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of scalar columns.
///
/// Arrow numeric types (integers, floats, decimals) become numeric columns,
/// everything else is rendered to text and treated as categorical. Nulls are
/// missing values.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let schema = builder.schema().clone();
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<Column> = schema
        .fields()
        .iter()
        .map(|f| {
            if f.data_type().is_numeric() {
                Column::numeric(f.name().clone(), Vec::new())
            } else {
                Column::categorical(f.name().clone(), Vec::new())
            }
        })
        .collect();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, column) in columns.iter_mut().enumerate() {
            append_arrow_column(column, batch.column(col_idx))
                .with_context(|| format!("column '{}'", column.name))?;
        }
    }

    Ok(Table::new(columns)?)
}

fn append_arrow_column(column: &mut Column, array: &ArrayRef) -> Result<()> {
    use super::model::ColumnData;

    match &mut column.data {
        ColumnData::Numeric(values) => {
            let as_f64 = arrow::compute::cast(array, &DataType::Float64)
                .context("casting to Float64")?;
            let floats = as_f64.as_primitive::<Float64Type>();
            values.extend(floats.iter());
        }
        ColumnData::Categorical(values) => {
            for row in 0..array.len() {
                if array.is_null(row) {
                    values.push(None);
                } else {
                    values.push(Some(array_value_to_string(array.as_ref(), row)?));
                }
            }
        }
    }
    Ok(())
}
