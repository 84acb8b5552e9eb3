//! CSV output for the fleet table.
//!
//! One bulk write at the end of the run: header row, then one line per
//! (machine, timestamp) in table order. Floats are written with Rust's
//! shortest round-trip formatting, so a fixed seed yields a byte-identical
//! file across runs.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::types::SensorReading;

/// Timestamp format used in the CSV output.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Write the full fleet table to `path`.
pub fn write_csv(rows: &[SensorReading], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_csv_to(rows, &mut out)?;
    out.flush()
}

/// Write the table to any sink (separated out for tests).
pub fn write_csv_to<W: Write>(rows: &[SensorReading], out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", SensorReading::CSV_HEADER)?;
    for row in rows {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            row.machine_id,
            row.timestamp.format(TIMESTAMP_FORMAT),
            row.temp_c,
            row.vibration_ms2,
            row.pressure_psi,
            row.load_pct,
            row.rpm,
            row.health_score,
            row.failed,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_row() -> SensorReading {
        SensorReading {
            machine_id: 7,
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 10, 0))
                .unwrap(),
            temp_c: 48.25,
            vibration_ms2: 1.05,
            pressure_psi: 291.5,
            load_pct: 61.0,
            rpm: 1712.0,
            health_score: 0.9995,
            failed: 0,
        }
    }

    #[test]
    fn test_header_and_row_format() {
        let mut buf = Vec::new();
        write_csv_to(&[sample_row()], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next().unwrap(), SensorReading::CSV_HEADER);
        assert_eq!(
            lines.next().unwrap(),
            "7,2024-01-01 00:10:00,48.25,1.05,291.5,61,1712,0.9995,0"
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_disk_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleet.csv");

        write_csv(&[sample_row()], &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("machine_id,timestamp,"));
        assert_eq!(text.lines().count(), 2);
    }
}
