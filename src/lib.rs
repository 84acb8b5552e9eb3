//! Fleetsense: Predictive Maintenance Fleet Intelligence
//!
//! Two loosely related pieces sharing one crate:
//!
//! - **Degradation simulator**: generates synthetic per-machine sensor time
//!   series with a monotonically decaying health score and derived failure
//!   events (the `simulation` binary).
//! - **Prediction service**: loads a fitted classifier artifact and serves
//!   failure-probability predictions over HTTP (the `fleetsense` binary).
//!
//! The two flows never interact at runtime; the simulator's output feeds an
//! offline training pipeline that produces the artifact the service loads.

pub mod api;
pub mod config;
pub mod model;
pub mod simulator;
pub mod types;

// Re-export the service configuration
pub use config::ServiceConfig;

// Re-export commonly used types
pub use model::{ArtifactError, LogisticModel, ModelArtifact};
pub use simulator::{SimulatorConfig, HEALTH_THRESHOLD};
pub use types::SensorReading;
