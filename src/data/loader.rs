use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors while loading a dataset. All of these are fatal: no partially
/// loaded dataset is ever returned.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// Failed to read the source file.
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),

    /// File extension not handled by any loader.
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    /// CSV-level parse failure.
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// JSON-level parse failure.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Parquet-level read failure.
    #[error("invalid Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Arrow-level read failure.
    #[error("invalid Arrow data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// A required column is absent from the source.
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),

    /// A cell could not be parsed as the column's type.
    #[error("row {row}: invalid value for '{column}': {message}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        message: String,
    },

    /// The source does not have the expected overall shape.
    #[error("malformed input: {0}")]
    Malformed(String),
}

/// Columns every source must provide, named as in the published dataset.
const REQUIRED_COLUMNS: [&str; 10] = [
    "name",
    "race",
    "sex",
    "age",
    "age_cat",
    "priors_count",
    "decile_score",
    "two_year_recid",
    "c_charge_desc",
    "state",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the required columns (the dataset's
///   published format)
/// * `.json`    – `[{ "name": ..., "race": ..., ... }, ...]`
/// * `.parquet` – flat scalar columns with the same names
pub fn load_file(path: &Path) -> Result<Dataset, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataLoadError::UnsupportedExtension(other.to_string())),
    };

    let dataset = Dataset::from_records(records);
    let unbinned = dataset.unbinned_count();
    if unbinned > 0 {
        log::warn!(
            "{unbinned} of {} records have a prior count outside 0-100 (or missing) \
             and will not appear in the trend bins",
            dataset.len()
        );
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Cell parsing helpers (shared by CSV and JSON)
// ---------------------------------------------------------------------------

/// Parse an optional numeric cell: blank means missing, anything else must
/// parse as `T`.
fn parse_optional<T>(raw: &str, row: usize, column: &'static str) -> Result<Option<T>, DataLoadError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|e| DataLoadError::InvalidValue {
            row,
            column,
            message: format!("'{trimmed}': {e}"),
        })
}

/// The outcome column is mandatory and strictly binary.
fn validate_outcome(value: Option<i64>, row: usize) -> Result<u8, DataLoadError> {
    match value {
        Some(0) => Ok(0),
        Some(1) => Ok(1),
        Some(other) => Err(DataLoadError::InvalidValue {
            row,
            column: "two_year_recid",
            message: format!("expected 0 or 1, got {other}"),
        }),
        None => Err(DataLoadError::InvalidValue {
            row,
            column: "two_year_recid",
            message: "value is missing".into(),
        }),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<Record>, DataLoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut indices = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == column)
            .ok_or(DataLoadError::MissingColumn(column))?;
    }
    let [name_idx, race_idx, sex_idx, age_idx, age_cat_idx, priors_idx, score_idx, recid_idx, charge_idx, state_idx] =
        indices;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result?;
        let cell = |idx: usize| row.get(idx).unwrap_or("").trim().to_string();

        let outcome = validate_outcome(
            parse_optional::<i64>(row.get(recid_idx).unwrap_or(""), row_no, "two_year_recid")?,
            row_no,
        )?;

        records.push(Record::new(
            cell(name_idx),
            cell(race_idx),
            cell(sex_idx),
            parse_optional::<u32>(row.get(age_idx).unwrap_or(""), row_no, "age")?,
            cell(age_cat_idx),
            parse_optional::<i64>(row.get(priors_idx).unwrap_or(""), row_no, "priors_count")?,
            parse_optional::<u8>(row.get(score_idx).unwrap_or(""), row_no, "decile_score")?,
            outcome,
            cell(charge_idx),
            cell(state_idx),
        ));
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "name": "...", "race": "...", "age": 34, "priors_count": 2, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<Record>, DataLoadError> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let rows = root
        .as_array()
        .ok_or_else(|| DataLoadError::Malformed("expected a top-level JSON array".into()))?;

    // Column presence is checked against the first row; later rows may leave
    // optional cells null.
    if let Some(first) = rows.first() {
        let obj = first
            .as_object()
            .ok_or_else(|| DataLoadError::Malformed("row 0 is not a JSON object".into()))?;
        for column in REQUIRED_COLUMNS {
            if !obj.contains_key(column) {
                return Err(DataLoadError::MissingColumn(column));
            }
        }
    }

    let mut records = Vec::with_capacity(rows.len());
    for (row_no, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| DataLoadError::Malformed(format!("row {row_no} is not a JSON object")))?;

        let text_field = |key: &str| {
            obj.get(key)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };
        let int_field = |key: &str| {
            obj.get(key)
                .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        };

        let outcome = validate_outcome(int_field("two_year_recid"), row_no)?;

        records.push(Record::new(
            text_field("name"),
            text_field("race"),
            text_field("sex"),
            narrow::<u32>(int_field("age"), row_no, "age")?,
            text_field("age_cat"),
            int_field("priors_count"),
            narrow::<u8>(int_field("decile_score"), row_no, "decile_score")?,
            outcome,
            text_field("c_charge_desc"),
            text_field("state"),
        ));
    }
    Ok(records)
}

/// Narrow an optional wide integer to the column's storage type.
fn narrow<T: TryFrom<i64>>(
    value: Option<i64>,
    row: usize,
    column: &'static str,
) -> Result<Option<T>, DataLoadError> {
    match value {
        None => Ok(None),
        Some(v) => T::try_from(v)
            .map(Some)
            .map_err(|_| DataLoadError::InvalidValue {
                row,
                column,
                message: format!("{v} is out of range"),
            }),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat scalar columns.
///
/// String columns may be Utf8 or LargeUtf8; numeric columns may be Int32,
/// Int64, Float32 or Float64 (Pandas stores nullable integer columns as
/// floats, with NaN for missing cells).
fn load_parquet(path: &Path) -> Result<Vec<Record>, DataLoadError> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    let mut row_no = 0usize;

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let mut indices = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = schema
                .index_of(column)
                .map_err(|_| DataLoadError::MissingColumn(column))?;
        }
        let [name_idx, race_idx, sex_idx, age_idx, age_cat_idx, priors_idx, score_idx, recid_idx, charge_idx, state_idx] =
            indices;

        for row in 0..batch.num_rows() {
            let string_cell = |idx: usize| string_value(batch.column(idx), row);
            let int_cell = |idx: usize| int_value(batch.column(idx), row);

            let outcome = validate_outcome(int_cell(recid_idx)?, row_no)?;

            records.push(Record::new(
                string_cell(name_idx)?,
                string_cell(race_idx)?,
                string_cell(sex_idx)?,
                narrow::<u32>(int_cell(age_idx)?, row_no, "age")?,
                string_cell(age_cat_idx)?,
                int_cell(priors_idx)?,
                narrow::<u8>(int_cell(score_idx)?, row_no, "decile_score")?,
                outcome,
                string_cell(charge_idx)?,
                string_cell(state_idx)?,
            ));
            row_no += 1;
        }
    }
    Ok(records)
}

// -- Parquet / Arrow helpers --

/// Extract a string cell; null becomes the empty string.
fn string_value(col: &Arc<dyn Array>, row: usize) -> Result<String, DataLoadError> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col.as_any().downcast_ref::<StringArray>().unwrap();
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = col.as_string::<i64>();
            Ok(arr.value(row).to_string())
        }
        other => Err(DataLoadError::Malformed(format!(
            "expected a string column, got {other:?}"
        ))),
    }
}

/// Extract an integer cell; null (or NaN in a float column) becomes `None`.
fn int_value(col: &Arc<dyn Array>, row: usize) -> Result<Option<i64>, DataLoadError> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            Ok(Some(arr.value(row) as i64))
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            Ok(Some(arr.value(row)))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            let v = arr.value(row);
            Ok(if v.is_nan() { None } else { Some(v as i64) })
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            let v = arr.value(row);
            Ok(if v.is_nan() { None } else { Some(v as i64) })
        }
        other => Err(DataLoadError::Malformed(format!(
            "expected a numeric column, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{PriorsBin, RecidivismStatus};

    const CSV_HEADER: &str =
        "name,race,sex,age,age_cat,priors_count,decile_score,two_year_recid,c_charge_desc,state";

    fn write_csv(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("data.csv");
        std::fs::write(&path, format!("{CSV_HEADER}\n{body}")).unwrap();
        path
    }

    #[test]
    fn csv_loads_typed_records_with_derived_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "Ann Doe,Caucasian,Female,24,Less than 25,3,7,1,Battery,FL\n\
             Bob Roe,African-American,Male,40,25 - 45,0,2,0,Theft,FL\n",
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);

        let ann = &ds.records[0];
        assert_eq!(ann.name, "Ann Doe");
        assert_eq!(ann.age, Some(24));
        assert_eq!(ann.priors_bin, Some(PriorsBin::ThreeToFive));
        assert_eq!(ann.recidivism_status, RecidivismStatus::Recidivism);

        let bob = &ds.records[1];
        assert_eq!(bob.priors_bin, Some(PriorsBin::Zero));
        assert_eq!(bob.recidivism_status, RecidivismStatus::NoRecidivism);

        assert_eq!(ds.race_options, ["African-American", "Caucasian"]);
        assert_eq!(ds.age_group_options, ["25 - 45", "Less than 25"]);
    }

    #[test]
    fn csv_blank_cells_become_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "Ann,Other,Female,,Less than 25,,,0,Battery,FL\n");

        let ds = load_file(&path).unwrap();
        let rec = &ds.records[0];
        assert_eq!(rec.age, None);
        assert_eq!(rec.priors_count, None);
        assert_eq!(rec.decile_score, None);
        assert_eq!(rec.priors_bin, None);
        assert_eq!(ds.unbinned_count(), 1);
    }

    #[test]
    fn csv_missing_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "name,race,sex\nAnn,Other,Female\n").unwrap();

        match load_file(&path) {
            Err(DataLoadError::MissingColumn(col)) => assert_eq!(col, "age"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn csv_rejects_non_binary_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "Ann,Other,Female,30,25 - 45,1,5,2,Battery,FL\n");

        match load_file(&path) {
            Err(DataLoadError::InvalidValue { column, .. }) => {
                assert_eq!(column, "two_year_recid")
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        std::fs::write(&path, "not a table").unwrap();

        assert!(matches!(
            load_file(&path),
            Err(DataLoadError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn json_loads_records_and_checks_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"[{"name":"Ann","race":"Hispanic","sex":"Female","age":31,"age_cat":"25 - 45",
                 "priors_count":12,"decile_score":9,"two_year_recid":1,
                 "c_charge_desc":"Robbery","state":"FL"}]"#,
        )
        .unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].priors_bin, Some(PriorsBin::ElevenToTwenty));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"[{"name":"Ann"}]"#).unwrap();
        assert!(matches!(
            load_file(&bad),
            Err(DataLoadError::MissingColumn(_))
        ));
    }

    #[test]
    fn parquet_round_trips_through_arrow_writer() {
        use arrow::array::{Int64Array, StringArray};
        use arrow::datatypes::{DataType, Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("name", DataType::Utf8, false),
            Field::new("race", DataType::Utf8, false),
            Field::new("sex", DataType::Utf8, false),
            Field::new("age", DataType::Int64, true),
            Field::new("age_cat", DataType::Utf8, false),
            Field::new("priors_count", DataType::Int64, true),
            Field::new("decile_score", DataType::Int64, true),
            Field::new("two_year_recid", DataType::Int64, false),
            Field::new("c_charge_desc", DataType::Utf8, false),
            Field::new("state", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Ann", "Bob"])),
                Arc::new(StringArray::from(vec!["Asian", "Other"])),
                Arc::new(StringArray::from(vec!["Female", "Male"])),
                Arc::new(Int64Array::from(vec![Some(25), None])),
                Arc::new(StringArray::from(vec!["25 - 45", "Greater than 45"])),
                Arc::new(Int64Array::from(vec![Some(6), Some(21)])),
                Arc::new(Int64Array::from(vec![Some(4), Some(10)])),
                Arc::new(Int64Array::from(vec![0, 1])),
                Arc::new(StringArray::from(vec!["Theft", "Fraud"])),
                Arc::new(StringArray::from(vec!["FL", "NY"])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].priors_bin, Some(PriorsBin::SixToTen));
        assert_eq!(ds.records[1].age, None);
        assert_eq!(ds.records[1].priors_bin, Some(PriorsBin::TwentyOnePlus));
        assert_eq!(ds.records[1].recidivism_status, RecidivismStatus::Recidivism);
    }
}
