// 🔢 Categorical Encoder
// One-hot encoding with a dropped reference level; the feature-name list it
// produces is the only contract between training and inference

use crate::error::{Error, Result};
use crate::record::{FieldValue, RawRecord};
use std::collections::{BTreeSet, HashSet};

// ============================================================================
// ENCODED TABLE
// ============================================================================

/// Numeric matrix whose columns follow `feature_names`.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedTable {
    pub feature_names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl EncodedTable {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Copy out the given rows, in the given order.
    pub fn select(&self, indices: &[usize]) -> Vec<Vec<f64>> {
        indices.iter().map(|&i| self.rows[i].clone()).collect()
    }
}

/// Name of the indicator column for `field == level`.
pub fn indicator_name(field: &str, level: &str) -> String {
    format!("{}_{}", field, level)
}

#[derive(Debug, Clone, PartialEq)]
enum Column {
    Numeric(String),
    Indicator { field: String, level: String },
}

impl Column {
    fn name(&self) -> String {
        match self {
            Column::Numeric(name) => name.clone(),
            Column::Indicator { field, level } => indicator_name(field, level),
        }
    }

    fn encode(&self, record: &RawRecord, row: usize) -> Result<f64> {
        match self {
            Column::Numeric(name) => match record.get(name) {
                Some(FieldValue::Number(n)) => Ok(*n),
                Some(FieldValue::Category(s)) => Err(Error::Dataset(format!(
                    "row {}: numeric field '{}' holds '{}'",
                    row, name, s
                ))),
                None => Err(Error::Dataset(format!("row {}: missing field '{}'", row, name))),
            },
            Column::Indicator { field, level } => match record.get(field) {
                Some(FieldValue::Category(value)) => Ok(indicator(value == level)),
                Some(FieldValue::Number(n)) => Err(Error::Dataset(format!(
                    "row {}: categorical field '{}' holds number {}",
                    row, field, n
                ))),
                None => Err(Error::Dataset(format!("row {}: missing field '{}'", row, field))),
            },
        }
    }
}

fn indicator(hit: bool) -> f64 {
    if hit {
        1.0
    } else {
        0.0
    }
}

// ============================================================================
// TRAINING SIDE
// ============================================================================

/// One-hot encode `records`.
///
/// `columns` gives the raw field order. Fields listed in `categorical` are
/// replaced by `<field>_<level>` indicators for every observed level except
/// the first in sorted order; the rest pass through unchanged. Numeric
/// columns come first, then indicators grouped by field in `categorical`
/// order.
pub fn fit_encoding(
    columns: &[String],
    records: &[RawRecord],
    categorical: &[String],
) -> Result<(EncodedTable, Vec<String>)> {
    for field in categorical {
        if !columns.contains(field) {
            return Err(Error::Dataset(format!(
                "categorical field '{}' is not a column",
                field
            )));
        }
    }

    let mut layout: Vec<Column> = columns
        .iter()
        .filter(|c| !categorical.contains(*c))
        .map(|c| Column::Numeric(c.clone()))
        .collect();
    let numeric_count = layout.len();

    for field in categorical {
        let mut levels = BTreeSet::new();
        for (row, record) in records.iter().enumerate() {
            match record.get(field) {
                Some(FieldValue::Category(value)) => {
                    levels.insert(value.clone());
                }
                Some(FieldValue::Number(n)) => {
                    return Err(Error::Dataset(format!(
                        "row {}: categorical field '{}' holds number {}",
                        row, field, n
                    )))
                }
                None => {
                    return Err(Error::Dataset(format!("row {}: missing field '{}'", row, field)))
                }
            }
        }

        // First sorted level is the reference and gets no column
        layout.extend(levels.into_iter().skip(1).map(|level| Column::Indicator {
            field: field.clone(),
            level,
        }));
    }

    let feature_names: Vec<String> = layout.iter().map(Column::name).collect();

    let rows = records
        .iter()
        .enumerate()
        .map(|(row, record)| {
            layout
                .iter()
                .map(|column| column.encode(record, row))
                .collect::<Result<Vec<f64>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!(
        "encoded {} rows into {} features ({} numeric, {} indicators)",
        rows.len(),
        feature_names.len(),
        numeric_count,
        feature_names.len() - numeric_count
    );

    let table = EncodedTable {
        feature_names: feature_names.clone(),
        rows,
    };

    Ok((table, feature_names))
}

// ============================================================================
// INFERENCE SIDE
// ============================================================================

/// Build one model row for `record` in exactly the order of `feature_names`.
///
/// A name is either a numeric field of the record, or `<field>_<level>` for a
/// categorical field of the record. Any name that resolves to neither, and any
/// record field no name refers to, fails with [`Error::FeatureMismatch`].
pub fn encode_for_inference(record: &RawRecord, feature_names: &[String]) -> Result<Vec<f64>> {
    let mut vector = Vec::with_capacity(feature_names.len());
    let mut consumed: HashSet<&str> = HashSet::new();
    let mut unresolved = Vec::new();

    for name in feature_names {
        match resolve(record, name) {
            Some((field, value)) => {
                consumed.insert(field);
                vector.push(value);
            }
            None => unresolved.push(name.clone()),
        }
    }

    let mut unexpected: Vec<String> = record
        .field_names()
        .filter(|f| !consumed.contains(f))
        .map(str::to_string)
        .collect();
    unexpected.sort();

    if !unresolved.is_empty() || !unexpected.is_empty() {
        return Err(Error::FeatureMismatch {
            expected: feature_names.to_vec(),
            unresolved,
            unexpected,
        });
    }

    Ok(vector)
}

/// Resolve one feature name to (source field, value).
fn resolve<'r>(record: &'r RawRecord, name: &str) -> Option<(&'r str, f64)> {
    if let Some(field) = record.field_names().find(|f| *f == name) {
        if let Some(n) = record.number(field) {
            return Some((field, n));
        }
    }

    // Longest categorical field that prefixes `<field>_`
    record
        .field_names()
        .filter_map(|field| {
            let level = name.strip_prefix(field)?.strip_prefix('_')?;
            let value = record.category(field)?;
            Some((field, indicator(value == level)))
        })
        .max_by_key(|(field, _)| field.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn house(area: f64, parking: f64, mainroad: &str, furnishing: &str) -> RawRecord {
        RawRecord::new()
            .with("area", area)
            .with("parking", parking)
            .with("mainroad", mainroad)
            .with("furnishingstatus", furnishing)
    }

    fn training_set() -> (Vec<String>, Vec<RawRecord>, Vec<String>) {
        let columns = names(&["area", "mainroad", "parking", "furnishingstatus"]);
        let records = vec![
            house(7420.0, 2.0, "yes", "furnished"),
            house(8960.0, 3.0, "no", "unfurnished"),
            house(9960.0, 2.0, "yes", "semi-furnished"),
            house(7500.0, 0.0, "yes", "furnished"),
        ];
        (columns, records, names(&["mainroad", "furnishingstatus"]))
    }

    #[test]
    fn test_feature_names_order_and_count() {
        let (columns, records, categorical) = training_set();
        let (table, feature_names) = fit_encoding(&columns, &records, &categorical).unwrap();

        // 2 numeric + (2 - 1) + (3 - 1)
        assert_eq!(feature_names.len(), 2 + 1 + 2);
        assert_eq!(
            feature_names,
            names(&[
                "area",
                "parking",
                "mainroad_yes",
                "furnishingstatus_semi-furnished",
                "furnishingstatus_unfurnished",
            ]),
            "Numeric fields first, then indicators grouped by field"
        );
        assert_eq!(table.feature_names, feature_names);
        assert_eq!(table.n_rows(), 4);
    }

    #[test]
    fn test_training_rows_encoded() {
        let (columns, records, categorical) = training_set();
        let (table, _) = fit_encoding(&columns, &records, &categorical).unwrap();

        assert_eq!(table.rows[0], vec![7420.0, 2.0, 1.0, 0.0, 0.0]);
        assert_eq!(table.rows[1], vec![8960.0, 3.0, 0.0, 0.0, 1.0]);
        assert_eq!(table.rows[2], vec![9960.0, 2.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_single_level_field_produces_no_columns() {
        let columns = names(&["area", "basement"]);
        let records = vec![
            RawRecord::new().with("area", 1.0).with("basement", "no"),
            RawRecord::new().with("area", 2.0).with("basement", "no"),
        ];
        let (_, feature_names) = fit_encoding(&columns, &records, &names(&["basement"])).unwrap();
        assert_eq!(feature_names, names(&["area"]));
    }

    #[test]
    fn test_fit_rejects_missing_field() {
        let columns = names(&["area", "mainroad"]);
        let records = vec![RawRecord::new().with("area", 1.0)];
        let err = fit_encoding(&columns, &records, &names(&["mainroad"])).unwrap_err();
        assert!(matches!(err, Error::Dataset(_)));
    }

    #[test]
    fn test_scenario_mainroad_binary() {
        let feature_names = names(&["area", "mainroad_yes"]);

        let no = RawRecord::new().with("area", 100.0).with("mainroad", "no");
        let yes = RawRecord::new().with("area", 100.0).with("mainroad", "yes");

        assert_eq!(encode_for_inference(&no, &feature_names).unwrap(), vec![100.0, 0.0]);
        assert_eq!(encode_for_inference(&yes, &feature_names).unwrap(), vec![100.0, 1.0]);
    }

    #[test]
    fn test_scenario_furnishing_reference_level_all_zero() {
        let (columns, records, categorical) = training_set();
        let (_, feature_names) = fit_encoding(&columns, &records, &categorical).unwrap();

        assert!(feature_names.contains(&"furnishingstatus_semi-furnished".to_string()));
        assert!(feature_names.contains(&"furnishingstatus_unfurnished".to_string()));
        assert!(!feature_names.contains(&"furnishingstatus_furnished".to_string()));

        let vector =
            encode_for_inference(&house(5000.0, 1.0, "no", "furnished"), &feature_names).unwrap();
        assert_eq!(&vector[2..], &[0.0, 0.0, 0.0], "Reference levels encode to zeros");
    }

    #[test]
    fn test_scenario_missing_parking_is_mismatch() {
        let (columns, records, categorical) = training_set();
        let (_, feature_names) = fit_encoding(&columns, &records, &categorical).unwrap();

        let mut record = house(5000.0, 1.0, "yes", "unfurnished");
        record.remove("parking");

        match encode_for_inference(&record, &feature_names) {
            Err(Error::FeatureMismatch { expected, unresolved, unexpected }) => {
                assert_eq!(expected, feature_names, "Full expected list is reported");
                assert!(expected.contains(&"parking".to_string()));
                assert_eq!(unresolved, names(&["parking"]));
                assert!(unexpected.is_empty());
            }
            other => panic!("Expected FeatureMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_record_field_is_mismatch() {
        let feature_names = names(&["area", "mainroad_yes"]);
        let record = RawRecord::new()
            .with("area", 1.0)
            .with("mainroad", "yes")
            .with("pool", "yes");

        match encode_for_inference(&record, &feature_names) {
            Err(Error::FeatureMismatch { unexpected, unresolved, .. }) => {
                assert_eq!(unexpected, names(&["pool"]));
                assert!(unresolved.is_empty());
            }
            other => panic!("Expected FeatureMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_categorical_field_sent_as_number_is_mismatch() {
        let feature_names = names(&["area", "mainroad_yes"]);
        let record = RawRecord::new().with("area", 1.0).with("mainroad", 1.0);
        let err = encode_for_inference(&record, &feature_names).unwrap_err();
        assert!(matches!(err, Error::FeatureMismatch { .. }));
    }

    #[test]
    fn test_longest_field_prefix_wins() {
        let feature_names = names(&["room_type_big"]);
        let record = RawRecord::new().with("room_type", "big");
        assert_eq!(encode_for_inference(&record, &feature_names).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_inference_idempotent() {
        let (columns, records, categorical) = training_set();
        let (_, feature_names) = fit_encoding(&columns, &records, &categorical).unwrap();
        let record = house(6000.0, 2.0, "yes", "semi-furnished");

        let first = encode_for_inference(&record, &feature_names).unwrap();
        let second = encode_for_inference(&record, &feature_names).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), feature_names.len());
    }

    #[test]
    fn test_inference_matches_training_rows() {
        let (columns, records, categorical) = training_set();
        let (table, feature_names) = fit_encoding(&columns, &records, &categorical).unwrap();

        for (record, row) in records.iter().zip(&table.rows) {
            assert_eq!(&encode_for_inference(record, &feature_names).unwrap(), row);
        }
    }
}
