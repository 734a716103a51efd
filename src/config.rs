// ⚙️ Configuration
// Defaults, overridden by HOUSE_PRICE_* environment variables, overridden by CLI flags

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_DATA_PATH: &str = "HOUSE_PRICE_DATA";
pub const ENV_ARTIFACT_PATH: &str = "HOUSE_PRICE_MODEL";
pub const ENV_TEST_SIZE: &str = "HOUSE_PRICE_TEST_SIZE";
pub const ENV_SEED: &str = "HOUSE_PRICE_SEED";
pub const ENV_SERVER_ADDR: &str = "HOUSE_PRICE_ADDR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Training CSV
    pub data_path: PathBuf,
    /// Serialized (model, feature names) artifact
    pub artifact_path: PathBuf,
    /// Held-out fraction for evaluation
    pub test_size: f64,
    /// Shuffle seed for the train/test split
    pub seed: u64,
    pub server_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from("Housing.csv"),
            artifact_path: PathBuf::from("models/house_price_model.json"),
            test_size: 0.2,
            seed: 42,
            server_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl Config {
    /// Defaults with any `HOUSE_PRICE_*` variables applied.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup(ENV_DATA_PATH) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_ARTIFACT_PATH) {
            config.artifact_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_TEST_SIZE) {
            config.test_size = raw
                .parse()
                .map_err(|_| Error::Config(format!("{} must be a number, got '{}'", ENV_TEST_SIZE, raw)))?;
        }
        if let Some(raw) = lookup(ENV_SEED) {
            config.seed = raw
                .parse()
                .map_err(|_| Error::Config(format!("{} must be an integer, got '{}'", ENV_SEED, raw)))?;
        }
        if let Some(addr) = lookup(ENV_SERVER_ADDR) {
            config.server_addr = addr;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(Error::Config(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        Ok(())
    }

    /// Training report lives next to the artifact.
    pub fn report_path(&self) -> PathBuf {
        report_path_for(&self.artifact_path)
    }
}

pub fn report_path_for(artifact_path: &Path) -> PathBuf {
    artifact_path.with_extension("report.json")
}
