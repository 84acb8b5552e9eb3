//! Request handlers for the prediction service.
//!
//! Three operations: a health check at `/`, the prediction endpoint at
//! `/predict_24h`, and a usage example at `/sample_payload`. All handlers
//! read from the immutable [`ApiState`] built at startup; none mutate it.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::model::ModelArtifact;

use super::error::ApiError;

/// Shared state for all request handlers.
///
/// The artifact is loaded once at startup and held read-only for the process
/// lifetime; cloning the state clones only the `Arc`.
#[derive(Clone)]
pub struct ApiState {
    pub artifact: Arc<ModelArtifact>,
}

impl ApiState {
    pub fn new(artifact: Arc<ModelArtifact>) -> Self {
        Self { artifact }
    }
}

// ============================================================================
// Recommendation Rule
// ============================================================================

/// Probability cut point below which risk is "low".
const LOW_RISK_CUTOFF: f64 = 0.3;
/// Probability cut point below which risk is "moderate"; at or above is "high".
const MODERATE_RISK_CUTOFF: f64 = 0.7;

/// Map a failure probability to the maintenance recommendation.
fn recommendation_for(proba: f64) -> &'static str {
    if proba < LOW_RISK_CUTOFF {
        "Low risk: continue normal operation, routine monitoring."
    } else if proba < MODERATE_RISK_CUTOFF {
        "Moderate risk: schedule inspection in the next maintenance window."
    } else {
        "High risk: schedule maintenance as soon as possible to avoid unplanned downtime."
    }
}

/// Round to three decimal digits for the wire format.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub model_features_count: usize,
}

/// Generic feature payload: a mapping from feature name to numeric value.
///
/// Values arrive as raw JSON so that non-numeric entries can be rejected
/// with a clear per-feature error instead of a generic body rejection.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub features: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub failure_probability_24h: f64,
    pub recommendation: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SamplePayloadResponse {
    pub note: &'static str,
    pub features_example: HashMap<String, f64>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET / — health check with the expected feature count.
pub async fn get_root(State(state): State<ApiState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "Predictive Maintenance API is running.",
        model_features_count: state.artifact.feature_cols.len(),
    })
}

/// POST /predict_24h — failure probability within the next 24 hours.
///
/// Feature names missing from the payload default to 0.0 and unknown names
/// are ignored (demo-mode fill policy; see the model module). Non-numeric
/// values fail the whole request with `INVALID_INPUT` — no partial result.
pub async fn predict_failure_24h(
    State(state): State<ApiState>,
    Json(payload): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let features = coerce_features(&payload.features)?;

    let proba = state.artifact.predict(&features);
    debug!(proba, n_supplied = features.len(), "prediction computed");

    Ok(Json(PredictResponse {
        failure_probability_24h: round3(proba),
        recommendation: recommendation_for(proba),
    }))
}

/// GET /sample_payload — usage example with the first expected feature names.
pub async fn sample_payload(State(state): State<ApiState>) -> Json<SamplePayloadResponse> {
    let features_example = state
        .artifact
        .feature_cols
        .iter()
        .take(10)
        .map(|col| (col.clone(), 0.0))
        .collect();

    Json(SamplePayloadResponse {
        note: "Use these feature keys in the 'features' dict when POSTing to /predict_24h.",
        features_example,
    })
}

/// Coerce raw JSON feature values to f64, rejecting anything non-numeric.
fn coerce_features(
    raw: &HashMap<String, serde_json::Value>,
) -> Result<HashMap<String, f64>, ApiError> {
    let mut features = HashMap::with_capacity(raw.len());
    for (name, value) in raw {
        let number = value.as_f64().ok_or_else(|| {
            ApiError::InvalidInput(format!(
                "feature '{name}' must be numeric, got {value}"
            ))
        })?;
        features.insert(name.clone(), number);
    }
    Ok(features)
}
