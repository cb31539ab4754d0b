//! Versioned linear regression artifact.
//!
//! The model file carries an explicit `format_version`. Older versions are
//! migrated to the current in-memory shape when they are loaded; fields added
//! after a file was written get their declared defaults instead of being
//! patched in at prediction time.
//!
//! | version | fields                                                          |
//! |---------|-----------------------------------------------------------------|
//! | 1       | `coef`, `intercept`                                             |
//! | 2       | v1 + `positive`, `fit_intercept`, optional `n_features_in`      |

use serde::Deserialize;
use serde_json::Value;

/// Format version written by current tooling
pub const CURRENT_FORMAT_VERSION: u32 = 2;

/// Version assumed when a file carries no `format_version` key
const LEGACY_FORMAT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid model document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported model format_version {0} (supported: 1 and 2)")]
    UnsupportedVersion(u64),
    #[error("format_version must be a non-negative integer")]
    InvalidVersionTag,
    #[error("model declares n_features_in={declared} but has {actual} coefficients")]
    FeatureCountMismatch { declared: usize, actual: usize },
    #[error("model coefficients must be finite")]
    NonFiniteCoefficient,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PredictError {
    #[error("feature vector has {actual} values, model expects {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("prediction is not a finite number")]
    NonFinite,
}

/// Version 1 layout, written before `positive` and `fit_intercept` existed
#[derive(Debug, Deserialize)]
struct LinearModelV1 {
    coef: Vec<f64>,
    intercept: f64,
}

/// Version 2 layout, the current on-disk format
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModelV2 {
    pub format_version: u32,
    pub coef: Vec<f64>,
    pub intercept: f64,
    pub positive: bool,
    pub fit_intercept: bool,
    #[serde(default)]
    pub n_features_in: Option<usize>,
}

impl From<LinearModelV1> for LinearModelV2 {
    fn from(v1: LinearModelV1) -> Self {
        Self {
            format_version: CURRENT_FORMAT_VERSION,
            coef: v1.coef,
            intercept: v1.intercept,
            positive: false,
            fit_intercept: true,
            n_features_in: None,
        }
    }
}

/// Trained linear predictor: `y = coef · x + intercept`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    coefficients: Vec<f64>,
    intercept: f64,
    positive: bool,
    fit_intercept: bool,
    /// Version of the file this model was read from (before migration)
    source_version: u32,
}

impl LinearModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
            positive: false,
            fit_intercept: true,
            source_version: CURRENT_FORMAT_VERSION,
        }
    }

    /// Parse a model document of any supported version
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let document: Value = serde_json::from_slice(bytes)?;
        Self::from_value(document)
    }

    pub fn from_value(document: Value) -> Result<Self, ModelError> {
        let version = match document.get("format_version") {
            None => LEGACY_FORMAT_VERSION as u64,
            Some(tag) => tag.as_u64().ok_or(ModelError::InvalidVersionTag)?,
        };

        let migrated: LinearModelV2 = match version {
            1 => {
                let v1: LinearModelV1 = serde_json::from_value(document)?;
                tracing::debug!(
                    "Migrating model artifact from format v1 to v{}",
                    CURRENT_FORMAT_VERSION
                );
                v1.into()
            }
            2 => serde_json::from_value(document)?,
            other => return Err(ModelError::UnsupportedVersion(other)),
        };

        if let Some(declared) = migrated.n_features_in {
            if declared != migrated.coef.len() {
                return Err(ModelError::FeatureCountMismatch {
                    declared,
                    actual: migrated.coef.len(),
                });
            }
        }

        if migrated.coef.iter().any(|c| !c.is_finite()) || !migrated.intercept.is_finite() {
            return Err(ModelError::NonFiniteCoefficient);
        }

        Ok(Self {
            coefficients: migrated.coef,
            intercept: migrated.intercept,
            positive: migrated.positive,
            fit_intercept: migrated.fit_intercept,
            source_version: version as u32,
        })
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn positive(&self) -> bool {
        self.positive
    }

    pub fn fit_intercept(&self) -> bool {
        self.fit_intercept
    }

    pub fn source_version(&self) -> u32 {
        self.source_version
    }

    /// Predict a single row
    pub fn predict(&self, features: &[f64]) -> Result<f64, PredictError> {
        if features.len() != self.coefficients.len() {
            return Err(PredictError::LengthMismatch {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }

        let value = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;

        if !value.is_finite() {
            return Err(PredictError::NonFinite);
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_v2_document() {
        let doc = json!({
            "format_version": 2,
            "coef": [1.0, 2.0, 3.0],
            "intercept": 0.5,
            "positive": true,
            "fit_intercept": true,
            "n_features_in": 3
        });
        let model = LinearModel::from_value(doc).unwrap();
        assert_eq!(model.n_features(), 3);
        assert!(model.positive());
        assert_eq!(model.source_version(), 2);
    }

    #[test]
    fn test_migrate_v1_document() {
        let doc = json!({
            "format_version": 1,
            "coef": [1.0, 2.0],
            "intercept": -1.0
        });
        let model = LinearModel::from_value(doc).unwrap();
        assert!(!model.positive());
        assert!(model.fit_intercept());
        assert_eq!(model.source_version(), 1);
    }

    #[test]
    fn test_missing_version_is_legacy() {
        let doc = json!({ "coef": [1.0], "intercept": 0.0 });
        let model = LinearModel::from_value(doc).unwrap();
        assert_eq!(model.source_version(), 1);
    }

    #[test]
    fn test_v1_and_v2_predict_identically() {
        let v1 = LinearModel::from_value(json!({
            "format_version": 1,
            "coef": [0.1, 2.0, 3.0],
            "intercept": 4.0
        }))
        .unwrap();
        let v2 = LinearModel::from_value(json!({
            "format_version": 2,
            "coef": [0.1, 2.0, 3.0],
            "intercept": 4.0,
            "positive": false,
            "fit_intercept": true
        }))
        .unwrap();

        let x = [1000.0, 2.0, 3.0];
        assert_eq!(v1.predict(&x).unwrap(), v2.predict(&x).unwrap());
    }

    #[test]
    fn test_unsupported_version() {
        let doc = json!({ "format_version": 7, "coef": [1.0], "intercept": 0.0 });
        let err = LinearModel::from_value(doc).unwrap_err();
        assert!(matches!(err, ModelError::UnsupportedVersion(7)));
    }

    #[test]
    fn test_invalid_version_tag() {
        let doc = json!({ "format_version": "two", "coef": [1.0], "intercept": 0.0 });
        let err = LinearModel::from_value(doc).unwrap_err();
        assert!(matches!(err, ModelError::InvalidVersionTag));
    }

    #[test]
    fn test_v2_requires_new_fields() {
        // A v2 file must carry the fields introduced in v2
        let doc = json!({ "format_version": 2, "coef": [1.0], "intercept": 0.0 });
        let err = LinearModel::from_value(doc).unwrap_err();
        assert!(matches!(err, ModelError::Malformed(_)));
    }

    #[test]
    fn test_declared_feature_count_must_match() {
        let doc = json!({
            "format_version": 2,
            "coef": [1.0, 2.0],
            "intercept": 0.0,
            "positive": false,
            "fit_intercept": true,
            "n_features_in": 3
        });
        let err = LinearModel::from_value(doc).unwrap_err();
        assert!(matches!(
            err,
            ModelError::FeatureCountMismatch { declared: 3, actual: 2 }
        ));
    }

    #[test]
    fn test_predict_dot_product() {
        let model = LinearModel::new(vec![2.0, 3.0, 4.0], 1.0);
        let value = model.predict(&[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(value, 10.0);
    }

    #[test]
    fn test_predict_length_mismatch() {
        let model = LinearModel::new(vec![2.0, 3.0], 0.0);
        let err = model.predict(&[1.0]).unwrap_err();
        assert_eq!(
            err,
            PredictError::LengthMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_predict_non_finite() {
        let model = LinearModel::new(vec![f64::MAX, f64::MAX], 0.0);
        let err = model.predict(&[f64::MAX, f64::MAX]).unwrap_err();
        assert_eq!(err, PredictError::NonFinite);
    }
}
