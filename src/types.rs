//! Shared data structures for the fleet degradation simulator.
//!
//! The central type is [`SensorReading`]: one row of the synthetic dataset,
//! keyed by (machine, timestamp). Rows are produced per machine, concatenated
//! into a fleet table sorted by (machine_id, timestamp), and written to CSV.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One sensor sample for one machine at one point on the shared time grid.
///
/// `health_score` starts at exactly 1.0 on a machine's first row and never
/// increases; `failed` is 1 only on the row where the score first drops
/// below the critical threshold (see [`crate::simulator::failure`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Stable machine identifier for the machine's entire simulated lifetime
    pub machine_id: u32,
    /// Sample time on the shared fleet-wide grid (fixed step, no gaps)
    pub timestamp: NaiveDateTime,
    /// Temperature (°C) - baseline + wear drift + noise, unclamped
    pub temp_c: f64,
    /// Vibration (m/s²) - baseline + wear drift + noise, unclamped
    pub vibration_ms2: f64,
    /// Pressure (psi) - baseline + noise, no drift, unclamped
    pub pressure_psi: f64,
    /// Load (%) - baseline + noise, clamped to [10, 110]
    pub load_pct: f64,
    /// Rotational speed - baseline + noise, clamped to [800, 2200]
    pub rpm: f64,
    /// Remaining-useful-life proxy in [0, 1], monotonically non-increasing
    pub health_score: f64,
    /// 1 exactly at the first crossing below the critical health threshold
    pub failed: u8,
}

impl SensorReading {
    /// CSV header matching the field order of the output file.
    pub const CSV_HEADER: &'static str =
        "machine_id,timestamp,temp_c,vibration_ms2,pressure_psi,load_pct,rpm,health_score,failed";
}
