// 🏠 Raw records and the housing dataset loader
// CSV rows become field-name -> value maps; incomplete rows never reach the encoder

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;
use std::path::Path;

// ============================================================================
// HOUSING SCHEMA
// ============================================================================

pub const TARGET_FIELD: &str = "price";

pub const NUMERIC_FIELDS: [&str; 5] = ["area", "bedrooms", "bathrooms", "stories", "parking"];

/// Categorical columns in the order they are one-hot encoded.
pub const CATEGORICAL_FIELDS: [&str; 7] = [
    "mainroad",
    "guestroom",
    "basement",
    "hotwaterheating",
    "airconditioning",
    "prefarea",
    "furnishingstatus",
];

/// Cells treated as missing when loading a dataset.
const MISSING_MARKERS: [&str; 4] = ["", "NA", "NaN", "nan"];

// ============================================================================
// FIELD VALUES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Category(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            FieldValue::Category(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Category(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Category(s)
    }
}

// ============================================================================
// RAW RECORD
// ============================================================================

/// One row of named field values, before encoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: HashMap<String, FieldValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_number)
    }

    pub fn category(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_category)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ============================================================================
// DATASET
// ============================================================================

/// Which column is the target and which columns are categorical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSchema {
    pub target: String,
    pub categorical: Vec<String>,
}

impl Default for DatasetSchema {
    fn default() -> Self {
        DatasetSchema {
            target: TARGET_FIELD.to_string(),
            categorical: CATEGORICAL_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl DatasetSchema {
    pub fn is_categorical(&self, column: &str) -> bool {
        self.categorical.iter().any(|c| c == column)
    }
}

/// Complete rows of a training file, target split off.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Feature columns in file order (target excluded)
    pub columns: Vec<String>,
    pub records: Vec<RawRecord>,
    pub targets: Vec<f64>,
    /// Rows skipped because a cell was missing
    pub dropped_rows: usize,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Load a headed CSV file into a [`Dataset`].
pub fn load_csv(csv_path: &Path, schema: &DatasetSchema) -> Result<Dataset> {
    if !csv_path.exists() {
        return Err(Error::Dataset(format!(
            "dataset file not found: {}",
            csv_path.display()
        )));
    }

    let file = std::fs::File::open(csv_path)?;
    let dataset = read_csv(file, schema)?;

    log::info!(
        "loaded {} rows from {} ({} dropped for missing values)",
        dataset.len(),
        csv_path.display(),
        dataset.dropped_rows
    );

    Ok(dataset)
}

/// Parse CSV from any reader. Rows with a missing cell are dropped.
pub fn read_csv<R: io::Read>(reader: R, schema: &DatasetSchema) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let target_idx = headers
        .iter()
        .position(|h| h == schema.target)
        .ok_or_else(|| Error::Dataset(format!("target column '{}' not found", schema.target)))?;

    for cat in &schema.categorical {
        if !headers.iter().any(|h| h == cat) {
            return Err(Error::Dataset(format!("categorical column '{}' not found", cat)));
        }
    }

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != target_idx)
        .map(|(_, h)| h.to_string())
        .collect();

    let mut records = Vec::new();
    let mut targets = Vec::new();
    let mut dropped_rows = 0;

    for (row_idx, result) in rdr.records().enumerate() {
        let row = result?;
        let line = row_idx + 2; // header is line 1

        if row.iter().any(|cell| MISSING_MARKERS.contains(&cell)) {
            dropped_rows += 1;
            continue;
        }

        let mut record = RawRecord::new();
        let mut target = None;

        for (i, (header, cell)) in headers.iter().zip(row.iter()).enumerate() {
            if i == target_idx {
                target = Some(parse_number(cell, header, line)?);
            } else if schema.is_categorical(header) {
                record.insert(header, cell);
            } else {
                record.insert(header, parse_number(cell, header, line)?);
            }
        }

        // Short rows are rejected by the csv reader, so the target is always set here
        let target = target.ok_or_else(|| {
            Error::Dataset(format!("line {}: missing '{}'", line, schema.target))
        })?;

        records.push(record);
        targets.push(target);
    }

    if dropped_rows > 0 {
        log::warn!("dropped {} rows with missing values", dropped_rows);
    }

    Ok(Dataset {
        columns,
        records,
        targets,
        dropped_rows,
    })
}

fn parse_number(cell: &str, column: &str, line: usize) -> Result<f64> {
    cell.parse::<f64>().map_err(|_| {
        Error::Dataset(format!(
            "line {}: column '{}' expected a number, got '{}'",
            line, column, cell
        ))
    })
}
