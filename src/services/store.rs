use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use thiserror::Error;

use crate::models::{Destination, DestinationTable};

/// Errors that can occur when reading or extending the destination catalog
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("catalog I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog parse failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("catalog is missing required column: {0}")]
    MissingColumn(String),

    #[error("record is missing required field: {0}")]
    MissingField(String),

    #[error("record field not present in the capture header: {0}")]
    UnknownField(String),
}

/// Identity and location columns every catalog must carry
const IDENTITY_COLUMNS: [&str; 6] = ["nombre", "provincia", "canton", "parroquia", "lat", "lon"];

/// Column holding the pre-computed aggregate quality, when present
const SCORE_COLUMN: &str = "score";

/// Fields a captured record must carry before it is worth keeping
const REQUIRED_RECORD_FIELDS: [&str; 3] = ["nombre", "lat", "lon"];

/// Pipe-delimited CSV store for the destination catalog
///
/// The catalog is the source of truth and is re-read on every request; no
/// copy is cached across requests. New records captured for future
/// retraining go to a separate file through `append_record`, which is the
/// only write path and is serialized by a lock so concurrent appends
/// cannot interleave.
pub struct DestinationStore {
    data_path: PathBuf,
    capture_path: PathBuf,
    append_lock: Mutex<()>,
}

impl DestinationStore {
    pub fn new(data_path: impl Into<PathBuf>, capture_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            capture_path: capture_path.into(),
            append_lock: Mutex::new(()),
        }
    }

    /// Load the full catalog
    ///
    /// Header names are trimmed. Every column that is not an identity or
    /// score column is exposed as a feature column, preserving header
    /// order. Coordinate cells that do not parse become NaN so the
    /// sanitizer can drop those rows; feature cells that do not parse are
    /// simply absent.
    pub fn load_destinations(&self) -> Result<DestinationTable, StoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'|')
            .trim(csv::Trim::All)
            .from_path(&self.data_path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

        let position = |name: &str| -> Result<usize, StoreError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| StoreError::MissingColumn(name.to_string()))
        };

        let idx_name = position("nombre")?;
        let idx_province = position("provincia")?;
        let idx_canton = position("canton")?;
        let idx_parish = position("parroquia")?;
        let idx_lat = position("lat")?;
        let idx_lon = position("lon")?;
        let idx_score = headers.iter().position(|h| h == SCORE_COLUMN);

        let feature_columns: Vec<String> = headers
            .iter()
            .filter(|h| !IDENTITY_COLUMNS.contains(&h.as_str()) && h.as_str() != SCORE_COLUMN)
            .cloned()
            .collect();

        let feature_indexes: Vec<(usize, &String)> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| feature_columns.contains(h))
            .map(|(i, h)| (i, h))
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;

            let coordinate = |idx: usize| -> f64 {
                record
                    .get(idx)
                    .and_then(|cell| cell.parse::<f64>().ok())
                    .unwrap_or(f64::NAN)
            };

            let mut features = HashMap::new();
            for (idx, column) in &feature_indexes {
                if let Some(value) = record.get(*idx).and_then(|cell| cell.parse::<f64>().ok()) {
                    if value.is_finite() {
                        features.insert((*column).clone(), value);
                    }
                }
            }

            rows.push(Destination {
                name: record.get(idx_name).unwrap_or("").to_string(),
                province: record.get(idx_province).unwrap_or("").to_string(),
                canton: record.get(idx_canton).unwrap_or("").to_string(),
                parish: record.get(idx_parish).unwrap_or("").to_string(),
                lat: coordinate(idx_lat),
                lon: coordinate(idx_lon),
                score: idx_score
                    .and_then(|idx| record.get(idx))
                    .and_then(|cell| cell.parse::<f64>().ok())
                    .filter(|v| v.is_finite()),
                features,
            });
        }

        tracing::debug!(
            rows = rows.len(),
            feature_columns = feature_columns.len(),
            "loaded destination catalog"
        );

        Ok(DestinationTable {
            feature_columns,
            has_score: idx_score.is_some(),
            rows,
        })
    }

    /// Append one raw record to the retraining capture file
    ///
    /// The first append writes a header: identity columns first, then the
    /// record's remaining keys in sorted order. Later appends must stay
    /// within the existing header (missing keys become empty cells) so the
    /// capture file stays rectangular without rewriting prior rows. Each
    /// call appends exactly one row under the store's lock.
    pub fn append_record(&self, record: &serde_json::Map<String, Value>) -> Result<(), StoreError> {
        for field in REQUIRED_RECORD_FIELDS {
            if !record.contains_key(field) {
                return Err(StoreError::MissingField(field.to_string()));
            }
        }

        let _guard = self.append_lock.lock().unwrap_or_else(|e| e.into_inner());

        let header = match existing_header(&self.capture_path)? {
            Some(header) => {
                for key in record.keys() {
                    if !header.iter().any(|h| h == key) {
                        return Err(StoreError::UnknownField(key.clone()));
                    }
                }
                header
            }
            None => {
                let mut header: Vec<String> =
                    IDENTITY_COLUMNS.iter().map(|c| c.to_string()).collect();
                let mut extra: Vec<String> = record
                    .keys()
                    .filter(|k| !IDENTITY_COLUMNS.contains(&k.as_str()))
                    .cloned()
                    .collect();
                extra.sort();
                header.extend(extra);

                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.capture_path)?;
                let mut writer = csv::WriterBuilder::new().delimiter(b'|').from_writer(file);
                writer.write_record(&header)?;
                writer.flush()?;
                header
            }
        };

        let row: Vec<String> = header
            .iter()
            .map(|column| record.get(column).map(cell_text).unwrap_or_default())
            .collect();

        let file = OpenOptions::new().append(true).open(&self.capture_path)?;
        let mut writer = csv::WriterBuilder::new().delimiter(b'|').from_writer(file);
        writer.write_record(&row)?;
        writer.flush()?;

        tracing::debug!(fields = record.len(), "captured new record");

        Ok(())
    }

    /// Whether the catalog file is present and readable
    pub fn health_check(&self) -> bool {
        self.data_path.is_file()
    }
}

fn existing_header(path: &Path) -> Result<Option<Vec<String>>, StoreError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > 0 => {}
        _ => return Ok(None),
    }

    let mut reader = csv::ReaderBuilder::new().delimiter(b'|').from_path(path)?;
    let header = reader.headers()?.iter().map(|h| h.to_string()).collect();
    Ok(Some(header))
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
