//! Synthetic hourly load generation.
//!
//! Produces a deterministic (seeded) PJM-like series so the dashboard can be
//! exercised without the real dataset: a double seasonal hump (winter and
//! summer peaks), a daily cycle with an afternoon peak and a night trough, a
//! weekend dip, log-normal noise, and optionally some missing readings.

use std::f64::consts::PI;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde::Serialize;
use tracing::info;

use crate::domain::{Record, RecordSet, TIMESTAMP_FORMAT};
use crate::error::{AppError, EXIT_INPUT, EXIT_RUNTIME};

/// Mean day-of-year of the summer peak (late July).
const SUMMER_PEAK_DOY: f64 = 200.0;

#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub start: NaiveDate,
    pub days: u32,
    pub seed: u64,
    /// Average load level (MW).
    pub base_mw: f64,
    /// Relative amplitude of the seasonal cycle.
    pub seasonal_amp: f64,
    /// Relative amplitude of the daily cycle.
    pub daily_amp: f64,
    /// Log-normal noise sigma.
    pub noise: f64,
    /// Probability that an hour's reading is missing.
    pub missing_prob: f64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(1998, 4, 1).unwrap_or_default(),
            days: 4 * 365,
            seed: 42,
            base_mw: 29_000.0,
            seasonal_amp: 0.12,
            daily_amp: 0.18,
            noise: 0.03,
            missing_prob: 0.0,
        }
    }
}

/// Generate `days * 24` hourly records starting at midnight of `config.start`.
pub fn generate_series(config: &SynthConfig) -> Result<RecordSet, AppError> {
    if config.days == 0 {
        return Err(AppError::new(EXIT_INPUT, "Day count must be > 0."));
    }
    if !(config.base_mw.is_finite() && config.base_mw > 0.0) {
        return Err(AppError::new(EXIT_INPUT, "Base load must be finite and > 0."));
    }
    if !(0.0..1.0).contains(&config.missing_prob) {
        return Err(AppError::new(EXIT_INPUT, "Missing probability must be in [0, 1)."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.noise.max(0.0))
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Noise distribution error: {e}")))?;

    let start = config
        .start
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::new(EXIT_INPUT, "Invalid start date."))?;

    let hours = i64::from(config.days) * 24;
    let mut records = Vec::with_capacity(hours as usize);
    for h in 0..hours {
        let ts = start + Duration::hours(h);
        let missing = config.missing_prob > 0.0 && rng.gen_bool(config.missing_prob);
        let z: f64 = normal.sample(&mut rng);
        let load = (!missing).then(|| expected_load(ts, config) * z.exp());
        records.push(Record::new(ts, load));
    }
    Ok(RecordSet::new(records))
}

/// Deterministic part of the load model (no noise).
pub fn expected_load(ts: NaiveDateTime, config: &SynthConfig) -> f64 {
    let doy = f64::from(ts.ordinal());
    // Two humps per year, peaking mid-January and mid-July, plus a summer bias.
    let seasonal = config.seasonal_amp
        * (0.7 * (4.0 * PI * (doy - 15.0) / 365.25).cos()
            + 0.3 * (2.0 * PI * (doy - SUMMER_PEAK_DOY) / 365.25).cos());
    // Trough around 04:00, peak around 16:00.
    let hour = f64::from(ts.hour());
    let daily = -config.daily_amp * (2.0 * PI * (hour - 4.0) / 24.0).cos();
    let weekend = match ts.weekday() {
        Weekday::Sat | Weekday::Sun => -0.06,
        _ => 0.0,
    };
    config.base_mw * (1.0 + seasonal + daily + weekend)
}

#[derive(Serialize)]
struct SourceRow {
    #[serde(rename = "Datetime")]
    datetime: String,
    #[serde(rename = "PJM_Load_MW")]
    load: Option<f64>,
}

/// Write records in the source-file layout (`Datetime,PJM_Load_MW`).
pub fn write_source_csv(path: &Path, records: &RecordSet) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create '{}': {e}", path.display())))?;
    for r in records {
        writer
            .serialize(SourceRow {
                datetime: r.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                load: r.load.map(|v| v.round()),
            })
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write '{}': {e}", path.display())))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write '{}': {e}", path.display())))?;
    info!(path = %path.display(), rows = records.len(), "wrote synthetic series");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceSpec;

    fn small() -> SynthConfig {
        SynthConfig {
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            days: 14,
            ..SynthConfig::default()
        }
    }

    #[test]
    fn hourly_and_sorted() {
        let set = generate_series(&small()).unwrap();
        assert_eq!(set.len(), 14 * 24);
        assert!(set.is_sorted_by_timestamp());
        assert!(set.loads().all(|v| v > 0.0));
    }

    #[test]
    fn same_seed_same_series() {
        let a = generate_series(&small()).unwrap();
        let b = generate_series(&small()).unwrap();
        assert_eq!(a, b);
        let c = generate_series(&SynthConfig { seed: 7, ..small() }).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn afternoon_beats_night() {
        let cfg = small();
        let d = NaiveDate::from_ymd_opt(2020, 1, 8).unwrap();
        let night = expected_load(d.and_hms_opt(4, 0, 0).unwrap(), &cfg);
        let afternoon = expected_load(d.and_hms_opt(16, 0, 0).unwrap(), &cfg);
        assert!(afternoon > night);
    }

    #[test]
    fn missing_readings() {
        let cfg = SynthConfig { missing_prob: 0.5, ..small() };
        let set = generate_series(&cfg).unwrap();
        let missing = set.iter().filter(|r| r.load.is_none()).count();
        assert!(missing > 0 && missing < set.len());
    }

    #[test]
    fn rejects_bad_config() {
        assert!(generate_series(&SynthConfig { days: 0, ..small() }).is_err());
        assert!(generate_series(&SynthConfig { missing_prob: 1.0, ..small() }).is_err());
    }

    #[test]
    fn written_file_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synthetic.csv");
        let set = generate_series(&SynthConfig { missing_prob: 0.1, ..small() }).unwrap();
        write_source_csv(&path, &set).unwrap();

        let spec = SourceSpec {
            path,
            timestamp_column: "Datetime".to_string(),
            load_column: "PJM_Load_MW".to_string(),
        };
        let (loaded, note) = crate::io::load_record_set(&spec).unwrap();
        let loaded = loaded.unwrap();
        assert!(note.is_none());
        assert_eq!(loaded.len(), set.len());
        assert_eq!(loaded.records()[0].timestamp, set.records()[0].timestamp);
    }
}
