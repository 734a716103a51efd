// 🔮 Predictor
// Per-request inference against an immutable, shared artifact

use crate::artifact::{self, ModelArtifact};
use crate::encoder::encode_for_inference;
use crate::error::Result;
use crate::form::HouseInput;
use crate::record::RawRecord;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Read-only artifact shared by every request.
pub type ArtifactHandle = Arc<ModelArtifact>;

#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    pub price: f64,
    pub formatted: String,
}

#[derive(Debug, Clone)]
pub struct Predictor {
    artifact: ArtifactHandle,
}

impl Predictor {
    pub fn new(artifact: ArtifactHandle) -> Self {
        Predictor { artifact }
    }

    /// Load the artifact once; missing or corrupt files are returned as-is
    /// for the caller to treat as fatal.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Predictor::new(Arc::new(artifact::load(path)?)))
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn feature_names(&self) -> &[String] {
        self.artifact.feature_names()
    }

    pub fn predict(&self, record: &RawRecord) -> Result<f64> {
        let result = encode_for_inference(record, self.artifact.feature_names())
            .and_then(|row| self.artifact.model().predict(&row));

        if let Err(e) = &result {
            log::warn!("prediction rejected: {}", e);
        }
        result
    }

    /// Validate a form submission and price it.
    pub fn estimate(&self, input: &HouseInput) -> Result<Estimate> {
        input.validate()?;
        let price = self.predict(&input.to_record())?;
        Ok(Estimate {
            price,
            formatted: format_price(price),
        })
    }
}

/// Round to whole rupees and group thousands: `₹ 4,500,000`
pub fn format_price(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("₹ -{}", grouped)
    } else {
        format!("₹ {}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::LinearRegression;

    fn predictor() -> Predictor {
        let artifact = ModelArtifact::new(
            LinearRegression {
                intercept: 1000.0,
                coefficients: vec![100.0, 500.0, 2000.0],
            },
            vec![
                "area".to_string(),
                "parking".to_string(),
                "mainroad_yes".to_string(),
            ],
        )
        .unwrap();
        Predictor::new(Arc::new(artifact))
    }

    #[test]
    fn test_predict_record() {
        let record = RawRecord::new()
            .with("area", 10.0)
            .with("parking", 2.0)
            .with("mainroad", "yes");

        let price = predictor().predict(&record).unwrap();
        assert!((price - (1000.0 + 1000.0 + 1000.0 + 2000.0)).abs() < 1e-9);
    }

    #[test]
    fn test_predict_mismatch_reports_expected() {
        let record = RawRecord::new().with("area", 10.0).with("mainroad", "yes");

        let err = predictor().predict(&record).unwrap_err();
        assert!(matches!(err, Error::FeatureMismatch { .. }));
        assert_eq!(err.expected_features().unwrap(), predictor().feature_names());
    }

    #[test]
    fn test_estimate_against_smaller_model_is_mismatch() {
        // Full form has more fields than this artifact knows
        let err = predictor().estimate(&HouseInput::default()).unwrap_err();
        match err {
            Error::FeatureMismatch { unexpected, .. } => {
                assert!(unexpected.contains(&"furnishingstatus".to_string()))
            }
            other => panic!("Expected FeatureMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_handle_is_not_copied() {
        let p = predictor();
        let clone = p.clone();
        assert!(Arc::ptr_eq(&p.artifact, &clone.artifact));
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(4_500_000.4), "₹ 4,500,000");
        assert_eq!(format_price(999.6), "₹ 1,000");
        assert_eq!(format_price(12.0), "₹ 12");
        assert_eq!(format_price(-1234.0), "₹ -1,234");
        assert_eq!(format_price(0.0), "₹ 0");
    }
}
