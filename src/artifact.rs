// 💾 Artifact Store
// The (model, feature names) pair as one self-checking JSON blob.
// Save is write-to-temp + rename; load is all-or-nothing.

use crate::error::{Error, Result};
use crate::model::LinearRegression;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

// ============================================================================
// MODEL ARTIFACT
// ============================================================================

/// Fitted model plus the ordered feature names it was trained on.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifact {
    model: LinearRegression,
    feature_names: Vec<String>,
}

impl ModelArtifact {
    pub fn new(model: LinearRegression, feature_names: Vec<String>) -> Result<Self> {
        check_consistency(&model, &feature_names).map_err(Error::Fit)?;
        Ok(ModelArtifact {
            model,
            feature_names,
        })
    }

    pub fn model(&self) -> &LinearRegression {
        &self.model
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}

fn check_consistency(
    model: &LinearRegression,
    feature_names: &[String],
) -> std::result::Result<(), String> {
    if model.n_features() != feature_names.len() {
        return Err(format!(
            "model has {} coefficients but {} feature names",
            model.n_features(),
            feature_names.len()
        ));
    }

    let mut seen = HashSet::new();
    if let Some(dup) = feature_names.iter().find(|name| !seen.insert(name.as_str())) {
        return Err(format!("duplicate feature name '{}'", dup));
    }

    Ok(())
}

// ============================================================================
// ON-DISK FORMAT
// ============================================================================

#[derive(Serialize, Deserialize)]
struct StoredArtifact {
    model: LinearRegression,
    feature_names: Vec<String>,
    checksum: String,
}

/// SHA-256 over the serialized (model, feature_names) pair
fn compute_checksum(model: &LinearRegression, feature_names: &[String]) -> Result<String> {
    let payload = serde_json::to_vec(&(model, feature_names))?;
    let mut hasher = Sha256::new();
    hasher.update(&payload);
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// SAVE / LOAD
// ============================================================================

pub fn save(artifact: &ModelArtifact, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let stored = StoredArtifact {
        model: artifact.model.clone(),
        feature_names: artifact.feature_names.clone(),
        checksum: compute_checksum(&artifact.model, &artifact.feature_names)?,
    };
    let bytes = serde_json::to_vec_pretty(&stored)?;

    let tmp_path = temp_path(path);
    if let Err(e) = write_and_rename(&tmp_path, path, &bytes) {
        fs::remove_file(&tmp_path).ok();
        return Err(e.into());
    }

    log::info!(
        "saved model artifact with {} features to {}",
        artifact.feature_names.len(),
        path.display()
    );

    Ok(())
}

pub fn load(path: &Path) -> Result<ModelArtifact> {
    if !path.exists() {
        return Err(Error::ArtifactNotFound {
            path: path.to_path_buf(),
        });
    }

    let corrupt = |reason: String| Error::ArtifactCorrupt {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = fs::read(path).map_err(|e| corrupt(format!("unreadable: {}", e)))?;
    let stored: StoredArtifact =
        serde_json::from_slice(&bytes).map_err(|e| corrupt(e.to_string()))?;

    let expected = compute_checksum(&stored.model, &stored.feature_names)?;
    if expected != stored.checksum {
        return Err(corrupt("checksum mismatch".to_string()));
    }

    check_consistency(&stored.model, &stored.feature_names).map_err(corrupt)?;

    log::info!(
        "loaded model artifact with {} features from {}",
        stored.feature_names.len(),
        path.display()
    );

    Ok(ModelArtifact {
        model: stored.model,
        feature_names: stored.feature_names,
    })
}

fn write_and_rename(tmp_path: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp_path, path)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
