//! Failure-event derivation from health-score threshold crossings.
//!
//! A failure event is the discrete moment a machine's health score first
//! drops below the critical threshold after having been at or above it. The
//! rule is evaluated generically as "low now, not-low at the previous step",
//! so a score that never recovers produces exactly one event per machine.

use crate::types::SensorReading;

/// Critical health threshold: crossing below this marks a failure event.
pub const HEALTH_THRESHOLD: f64 = 0.3;

/// Mark `failed = 1` on every not-low → low transition.
///
/// Expects the table sorted by (machine_id, timestamp); the previous-step
/// flag resets to "not low" at each machine boundary, so a machine whose
/// first row is already low would be flagged there (which cannot happen
/// under the simulator's health[0] = 1.0 invariant, but the rule stands on
/// its own for externally supplied tables).
pub fn mark_failure_events(rows: &mut [SensorReading]) {
    let mut current_machine: Option<u32> = None;
    let mut prev_low = false;

    for row in rows.iter_mut() {
        if current_machine != Some(row.machine_id) {
            current_machine = Some(row.machine_id);
            prev_low = false;
        }

        let low = row.health_score < HEALTH_THRESHOLD;
        row.failed = u8::from(low && !prev_low);
        prev_low = low;
    }
}
