//! Per-machine signal construction and the health-score recurrence.
//!
//! A machine is a bundle of parameters drawn once at creation: sensor
//! baselines, drift magnitudes for the two wear-coupled channels, and a base
//! wear rate. Signals are baseline + drift + Gaussian noise; health is an
//! explicit fold over the series because each step's score depends on the
//! previous one.

use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::types::SensorReading;

// ============================================================================
// Signal Constants
// ============================================================================

/// Temperature noise std dev (°C)
const TEMP_NOISE_STD: f64 = 1.5;
/// Vibration noise std dev (m/s²)
const VIB_NOISE_STD: f64 = 0.2;
/// Pressure noise std dev (psi)
const PRESSURE_NOISE_STD: f64 = 5.0;
/// Load noise std dev (%)
const LOAD_NOISE_STD: f64 = 5.0;
/// RPM noise std dev
const RPM_NOISE_STD: f64 = 40.0;

/// Load operating envelope (%)
const LOAD_MIN: f64 = 10.0;
const LOAD_MAX: f64 = 110.0;
/// RPM operating envelope
const RPM_MIN: f64 = 800.0;
const RPM_MAX: f64 = 2200.0;

// ============================================================================
// Stress Thresholds
// ============================================================================

/// Temperature stress tiers (°C): each threshold exceeded adds its increment.
/// A reading above all three accrues 0.005 + 0.010 + 0.015.
const TEMP_STRESS_TIERS: [(f64, f64); 3] = [(65.0, 0.005), (75.0, 0.010), (85.0, 0.015)];
/// Vibration stress tiers (m/s²)
const VIB_STRESS_TIERS: [(f64, f64); 3] = [(1.8, 0.007), (2.2, 0.012), (2.6, 0.018)];
/// Load stress tiers (%)
const LOAD_STRESS_TIERS: [(f64, f64); 2] = [(80.0, 0.005), (90.0, 0.010)];

/// Additive stress penalty for one step's sensor values.
///
/// Tiers are cumulative: a temperature above 85 °C collects the 65, 75 and
/// 85 increments. Stress is recomputed from zero every step; only health
/// carries state across steps.
pub fn stress_penalty(temp_c: f64, vibration_ms2: f64, load_pct: f64) -> f64 {
    let mut stress = 0.0;
    for (threshold, increment) in TEMP_STRESS_TIERS {
        if temp_c > threshold {
            stress += increment;
        }
    }
    for (threshold, increment) in VIB_STRESS_TIERS {
        if vibration_ms2 > threshold {
            stress += increment;
        }
    }
    for (threshold, increment) in LOAD_STRESS_TIERS {
        if load_pct > threshold {
            stress += increment;
        }
    }
    stress
}

// ============================================================================
// Machine Profile
// ============================================================================

/// Fixed per-machine parameters, drawn once and held for the whole series.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineProfile {
    /// Baseline temperature (°C), U(45, 55)
    pub base_temp: f64,
    /// Baseline vibration (m/s²), U(0.8, 1.2)
    pub base_vibration: f64,
    /// Baseline pressure (psi), U(260, 320)
    pub base_pressure: f64,
    /// Baseline load (%), U(50, 70)
    pub base_load: f64,
    /// Baseline rotational speed, U(1500, 1900)
    pub base_rpm: f64,
    /// Temperature drift at the final step (°C), U(8, 18)
    pub temp_drift_max: f64,
    /// Vibration drift at the final step (m/s²), U(0.3, 0.7)
    pub vib_drift_max: f64,
    /// Wear applied every step even under zero stress, U(0.00015, 0.0003)
    pub base_wear_rate: f64,
}

impl MachineProfile {
    /// Draw a fresh profile from the machine's RNG stream.
    pub fn draw(rng: &mut StdRng) -> Self {
        Self {
            base_temp: rng.gen_range(45.0..55.0),
            base_vibration: rng.gen_range(0.8..1.2),
            base_pressure: rng.gen_range(260.0..320.0),
            base_load: rng.gen_range(50.0..70.0),
            base_rpm: rng.gen_range(1500.0..1900.0),
            temp_drift_max: rng.gen_range(8.0..18.0),
            vib_drift_max: rng.gen_range(0.3..0.7),
            base_wear_rate: rng.gen_range(0.000_15..0.000_3),
        }
    }

    /// Wear for one step: base rate plus threshold stress.
    pub fn wear(&self, temp_c: f64, vibration_ms2: f64, load_pct: f64) -> f64 {
        self.base_wear_rate + stress_penalty(temp_c, vibration_ms2, load_pct)
    }
}

// ============================================================================
// Series Generation
// ============================================================================

/// Noise distributions shared by every step of one machine's series.
struct NoiseBank {
    temp: Normal<f64>,
    vibration: Normal<f64>,
    pressure: Normal<f64>,
    load: Normal<f64>,
    rpm: Normal<f64>,
}

impl NoiseBank {
    // Std devs are compile-time positive constants; Normal::new cannot fail.
    #[allow(clippy::unwrap_used)]
    fn new() -> Self {
        Self {
            temp: Normal::new(0.0, TEMP_NOISE_STD).unwrap(),
            vibration: Normal::new(0.0, VIB_NOISE_STD).unwrap(),
            pressure: Normal::new(0.0, PRESSURE_NOISE_STD).unwrap(),
            load: Normal::new(0.0, LOAD_NOISE_STD).unwrap(),
            rpm: Normal::new(0.0, RPM_NOISE_STD).unwrap(),
        }
    }
}

/// Simulate one machine over the shared grid.
///
/// `failed` is left at 0 here; the fleet-level post-pass in
/// [`super::failure`] marks the threshold crossings once all machines are
/// concatenated.
pub fn simulate_machine(
    machine_id: u32,
    grid: &[NaiveDateTime],
    seed: u64,
) -> Vec<SensorReading> {
    let mut rng = StdRng::seed_from_u64(seed);
    let profile = MachineProfile::draw(&mut rng);
    let noise = NoiseBank::new();

    let n_steps = grid.len();
    // t = 0 has zero drift; the last step carries the full drift magnitude.
    let drift_denom = (n_steps.saturating_sub(1)).max(1) as f64;

    let mut rows = Vec::with_capacity(n_steps);
    let mut health = 1.0;

    for (t, &timestamp) in grid.iter().enumerate() {
        let drift_frac = t as f64 / drift_denom;

        let temp_c = profile.base_temp
            + profile.temp_drift_max * drift_frac
            + noise.temp.sample(&mut rng);
        let vibration_ms2 = profile.base_vibration
            + profile.vib_drift_max * drift_frac
            + noise.vibration.sample(&mut rng);
        let pressure_psi = profile.base_pressure + noise.pressure.sample(&mut rng);
        let load_pct =
            (profile.base_load + noise.load.sample(&mut rng)).clamp(LOAD_MIN, LOAD_MAX);
        let rpm = (profile.base_rpm + noise.rpm.sample(&mut rng)).clamp(RPM_MIN, RPM_MAX);

        // First step is pristine by definition; wear applies from t = 1 on.
        if t > 0 {
            health = (health - profile.wear(temp_c, vibration_ms2, load_pct)).max(0.0);
        }

        rows.push(SensorReading {
            machine_id,
            timestamp,
            temp_c,
            vibration_ms2,
            pressure_psi,
            load_pct,
            rpm,
            health_score: health,
            failed: 0,
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn test_grid(n: usize) -> Vec<NaiveDateTime> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        (0..n).map(|i| start + Duration::minutes(10 * i as i64)).collect()
    }

    #[test]
    fn test_stress_penalty_cumulative_tiers() {
        // Below every threshold
        assert_eq!(stress_penalty(50.0, 1.0, 60.0), 0.0);
        // One temperature tier
        assert!((stress_penalty(70.0, 1.0, 60.0) - 0.005).abs() < 1e-12);
        // All temperature tiers accumulate
        assert!((stress_penalty(90.0, 1.0, 60.0) - 0.030).abs() < 1e-12);
        // All vibration tiers
        assert!((stress_penalty(50.0, 3.0, 60.0) - 0.037).abs() < 1e-12);
        // Both load tiers
        assert!((stress_penalty(50.0, 1.0, 95.0) - 0.015).abs() < 1e-12);
        // Everything at once
        let all = stress_penalty(90.0, 3.0, 95.0);
        assert!((all - (0.030 + 0.037 + 0.015)).abs() < 1e-12);
    }

    #[test]
    fn test_stress_threshold_is_exclusive() {
        // Exactly at a threshold does not trip it
        assert_eq!(stress_penalty(65.0, 1.8, 80.0), 0.0);
    }

    #[test]
    fn test_profile_draws_within_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let p = MachineProfile::draw(&mut rng);
            assert!(p.base_temp >= 45.0 && p.base_temp < 55.0);
            assert!(p.base_vibration >= 0.8 && p.base_vibration < 1.2);
            assert!(p.base_pressure >= 260.0 && p.base_pressure < 320.0);
            assert!(p.base_load >= 50.0 && p.base_load < 70.0);
            assert!(p.base_rpm >= 1500.0 && p.base_rpm < 1900.0);
            assert!(p.temp_drift_max >= 8.0 && p.temp_drift_max < 18.0);
            assert!(p.vib_drift_max >= 0.3 && p.vib_drift_max < 0.7);
            assert!(p.base_wear_rate >= 0.000_15 && p.base_wear_rate < 0.000_3);
        }
    }

    #[test]
    fn test_health_starts_at_one_and_never_increases() {
        let grid = test_grid(500);
        let rows = simulate_machine(0, &grid, 42);

        assert_eq!(rows[0].health_score, 1.0);
        for pair in rows.windows(2) {
            assert!(pair[1].health_score <= pair[0].health_score);
            assert!(pair[1].health_score >= 0.0);
        }
    }

    #[test]
    fn test_health_recurrence_reproducible_from_sensors() {
        let grid = test_grid(300);
        let seed = 9;
        let rows = simulate_machine(3, &grid, seed);

        // Re-derive the profile from the same stream to get the wear rate.
        let mut rng = StdRng::seed_from_u64(seed);
        let profile = MachineProfile::draw(&mut rng);

        let mut expected = 1.0;
        for (t, row) in rows.iter().enumerate() {
            if t > 0 {
                expected = (expected
                    - profile.wear(row.temp_c, row.vibration_ms2, row.load_pct))
                .max(0.0);
            }
            assert!(
                (row.health_score - expected).abs() < 1e-12,
                "health diverged at t={t}: {} vs {}",
                row.health_score,
                expected
            );
        }
    }

    #[test]
    fn test_load_and_rpm_clamped() {
        let grid = test_grid(2000);
        for seed in 0..5 {
            for row in simulate_machine(seed as u32, &grid, seed) {
                assert!(row.load_pct >= LOAD_MIN && row.load_pct <= LOAD_MAX);
                assert!(row.rpm >= RPM_MIN && row.rpm <= RPM_MAX);
            }
        }
    }

    #[test]
    fn test_single_step_grid_has_no_drift() {
        let grid = test_grid(1);
        let rows = simulate_machine(0, &grid, 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].health_score, 1.0);
    }
}
