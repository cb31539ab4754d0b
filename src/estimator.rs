//! Feature encoding and price estimation over a loaded schema + model pair.

use crate::{
    model::{LinearModel, PredictError},
    schema::{FeatureSchema, BATH_INDEX, BHK_INDEX, SQFT_INDEX},
};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EstimationError {
    #[error("feature vector has {actual} values, model expects {expected}")]
    FeatureLengthMismatch { expected: usize, actual: usize },
    #[error("model produced a non-finite estimate")]
    NonFinite,
}

impl From<PredictError> for EstimationError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::LengthMismatch { expected, actual } => {
                Self::FeatureLengthMismatch { expected, actual }
            }
            PredictError::NonFinite => Self::NonFinite,
        }
    }
}

/// The schema and model must agree on the feature count
#[derive(Debug, thiserror::Error, PartialEq)]
#[error("model has {model} coefficients but schema has {schema} columns")]
pub struct ShapeMismatch {
    pub model: usize,
    pub schema: usize,
}

/// Immutable estimator built from one consistent set of artifacts
#[derive(Debug, Clone)]
pub struct Estimator {
    schema: FeatureSchema,
    model: LinearModel,
}

impl Estimator {
    pub fn new(schema: FeatureSchema, model: LinearModel) -> Result<Self, ShapeMismatch> {
        if model.n_features() != schema.len() {
            return Err(ShapeMismatch {
                model: model.n_features(),
                schema: schema.len(),
            });
        }
        Ok(Self { schema, model })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    /// Location names, in schema order
    pub fn locations(&self) -> &[String] {
        self.schema.locations()
    }

    pub fn data_columns(&self) -> &[String] {
        self.schema.columns()
    }

    pub fn location_index(&self, location: &str) -> Option<usize> {
        self.schema.location_index(location)
    }

    /// Build the model input row.
    ///
    /// An unrecognized location leaves every one-hot slot at zero.
    pub fn encode(&self, location: &str, total_sqft: f64, bhk: i64, bath: i64) -> Vec<f64> {
        let mut features = vec![0.0; self.schema.len()];
        features[SQFT_INDEX] = total_sqft;
        features[BATH_INDEX] = bath as f64;
        features[BHK_INDEX] = bhk as f64;

        match self.schema.location_index(location) {
            Some(index) => features[index] = 1.0,
            None => tracing::debug!(location = %location, "Unknown location, no one-hot bit set"),
        }

        features
    }

    /// Estimated price, rounded to two decimal places
    pub fn estimate(
        &self,
        location: &str,
        total_sqft: f64,
        bhk: i64,
        bath: i64,
    ) -> Result<f64, EstimationError> {
        let features = self.encode(location, total_sqft, bhk, bath);
        let raw = self.model.predict(&features)?;
        Ok(round_to_cents(raw))
    }
}

/// Round to two decimal places
///
/// Values too large to scale have no fractional part and are returned as is.
pub fn round_to_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}
