// House Price Estimator - Core Library
// Shared by the trainer CLI, the TUI form and the API server

pub mod artifact;
pub mod config;
pub mod encoder;
pub mod error;
pub mod form;
pub mod metrics;
pub mod model;
pub mod predictor;
pub mod record;
pub mod trainer;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use artifact::ModelArtifact;
pub use config::Config;
pub use encoder::{encode_for_inference, fit_encoding, EncodedTable};
pub use error::{Error, Result};
pub use form::{FurnishingStatus, HouseInput, YesNo};
pub use metrics::RegressionMetrics;
pub use model::LinearRegression;
pub use predictor::{format_price, ArtifactHandle, Estimate, Predictor};
pub use record::{
    load_csv, read_csv, Dataset, DatasetSchema, FieldValue, RawRecord, CATEGORICAL_FIELDS,
    NUMERIC_FIELDS, TARGET_FIELD,
};
pub use trainer::{fit_dataset, train, train_test_split, TrainingOutcome, TrainingReport};

#[cfg(feature = "server")]
pub use server::router;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
