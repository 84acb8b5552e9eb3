//! Model artifact: a fitted failure classifier plus its feature ordering.
//!
//! The artifact is produced by an external training pipeline and consumed
//! read-only here. It is a versioned JSON document holding the ordered
//! feature-name list the classifier was trained on and the fitted binary
//! logistic classifier (one coefficient per feature, plus intercept).
//! Loaded once at service startup and shared immutably for the process
//! lifetime.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Current artifact format version.
pub const ARTIFACT_VERSION: u32 = 1;

/// Errors raised while loading or validating an artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("artifact parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid artifact: {0}")]
    Invalid(String),
}

/// Fitted binary logistic classifier.
///
/// `coefficients[i]` pairs with `feature_cols[i]` of the enclosing artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    /// Positive-class probability for a dense, correctly ordered vector.
    pub fn predict_proba(&self, x: &[f64]) -> f64 {
        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(x)
                .map(|(w, v)| w * v)
                .sum::<f64>();
        sigmoid(z)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Complete model artifact as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Format version for forward compatibility.
    pub version: u32,
    /// Feature names in the exact order the classifier expects.
    pub feature_cols: Vec<String>,
    /// The fitted classifier.
    pub model: LogisticModel,
}

impl ModelArtifact {
    /// Validate internal consistency (called on every load).
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.version != ARTIFACT_VERSION {
            return Err(ArtifactError::Invalid(format!(
                "unsupported artifact version {} (expected {})",
                self.version, ARTIFACT_VERSION,
            )));
        }
        if self.model.coefficients.len() != self.feature_cols.len() {
            return Err(ArtifactError::Invalid(format!(
                "coefficient count {} does not match feature count {}",
                self.model.coefficients.len(),
                self.feature_cols.len(),
            )));
        }
        Ok(())
    }

    /// Build the dense vector the classifier expects from a sparse
    /// named-feature payload.
    ///
    /// Names absent from the payload default to 0.0 and extra names are
    /// ignored. This silent-fill policy is deliberate demo-mode behaviour
    /// and is not suitable for production feature validation.
    pub fn feature_vector(&self, features: &HashMap<String, f64>) -> Vec<f64> {
        self.feature_cols
            .iter()
            .map(|col| features.get(col).copied().unwrap_or(0.0))
            .collect()
    }

    /// Positive-class probability for a sparse named-feature payload.
    pub fn predict(&self, features: &HashMap<String, f64>) -> f64 {
        self.model.predict_proba(&self.feature_vector(features))
    }
}

/// Load and validate an artifact from disk.
pub fn load_from_disk(path: &Path) -> Result<ModelArtifact, ArtifactError> {
    let data = std::fs::read(path)?;
    let artifact: ModelArtifact = serde_json::from_slice(&data)?;
    artifact.validate()?;
    Ok(artifact)
}

/// Save an artifact to disk atomically (write temp file, then rename).
pub fn save_to_disk(artifact: &ModelArtifact, path: &Path) -> Result<(), ArtifactError> {
    artifact.validate()?;
    let json = serde_json::to_vec_pretty(artifact)?;

    let tmp_path = path.with_extension("json.tmp");
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&tmp_path, &json)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_artifact() -> ModelArtifact {
        ModelArtifact {
            version: ARTIFACT_VERSION,
            feature_cols: vec!["temp_mean".into(), "vib_max".into(), "load_std".into()],
            model: LogisticModel {
                coefficients: vec![0.8, 1.5, -0.4],
                intercept: -2.0,
            },
        }
    }

    #[test]
    fn test_sigmoid_bounds_and_midpoint() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(-50.0) < 1e-12);
        assert!(sigmoid(50.0) > 1.0 - 1e-12);
    }

    #[test]
    fn test_feature_vector_order_and_fill() {
        let artifact = test_artifact();

        let mut features = HashMap::new();
        features.insert("vib_max".to_string(), 2.5);
        features.insert("unknown_key".to_string(), 99.0);

        // Missing names fill with 0.0, extras are dropped, order follows
        // feature_cols not the payload.
        assert_eq!(artifact.feature_vector(&features), vec![0.0, 2.5, 0.0]);
    }

    #[test]
    fn test_empty_payload_builds_zero_vector() {
        let artifact = test_artifact();
        let empty = HashMap::new();
        assert_eq!(artifact.feature_vector(&empty), vec![0.0, 0.0, 0.0]);
        // All-zero input reduces to sigmoid(intercept)
        let proba = artifact.predict(&empty);
        assert!((proba - sigmoid(-2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_predict_is_deterministic() {
        let artifact = test_artifact();
        let mut features = HashMap::new();
        features.insert("temp_mean".to_string(), 1.2);
        features.insert("vib_max".to_string(), 0.7);

        let a = artifact.predict(&features);
        let b = artifact.predict(&features);
        assert_eq!(a, b);
    }

    #[test]
    fn test_validate_rejects_length_mismatch() {
        let mut artifact = test_artifact();
        artifact.model.coefficients.pop();
        let err = artifact.validate().unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid(_)));
    }

    #[test]
    fn test_validate_rejects_unknown_version() {
        let mut artifact = test_artifact();
        artifact.version = 99;
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn test_disk_round_trip() {
        let artifact = test_artifact();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pd_24h_model.json");

        save_to_disk(&artifact, &path).unwrap();
        let loaded = load_from_disk(&path).unwrap();

        assert_eq!(loaded.feature_cols, artifact.feature_cols);
        assert_eq!(loaded.model.coefficients, artifact.model.coefficients);
        assert_eq!(loaded.model.intercept, artifact.model.intercept);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_from_disk(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::Io(_)));
    }
}
