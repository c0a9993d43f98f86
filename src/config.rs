use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_FLIGHT_FACTOR: i64 = 5;
pub const DEFAULT_NO_FLIGHT_FACTOR: i64 = 5;
pub const DEFAULT_DATE_FACTOR: i64 = 1;
pub const DEFAULT_NO_FLIGHT_GROUP: &str = "No O-Flights";

pub const DEFAULT_REPORT_FILE: &str = "Cadet_Orientation_Report.csv";
pub const DEFAULT_POINTS_FILE: &str = "oflight_points.csv";
pub const DEFAULT_CADETS_FILE: &str = "cadet_list.txt";
pub const DEFAULT_SLOTTING_FILE: &str = "slotting.txt";

/// Weights used by the point calculator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points per remaining powered flight.
    pub flight_factor: i64,
    /// Flat bonus for cadets in the no-flights group.
    pub no_flight_factor: i64,
    /// Points per month since the last powered flight.
    pub date_factor: i64,
    pub no_flight_group: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            flight_factor: DEFAULT_FLIGHT_FACTOR,
            no_flight_factor: DEFAULT_NO_FLIGHT_FACTOR,
            date_factor: DEFAULT_DATE_FACTOR,
            no_flight_group: DEFAULT_NO_FLIGHT_GROUP.to_string(),
        }
    }
}

impl ScoringConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct FilePaths {
    pub report: PathBuf,
    pub points: PathBuf,
    pub cadets: PathBuf,
    pub slotting: PathBuf,
}

impl Default for FilePaths {
    fn default() -> Self {
        Self {
            report: PathBuf::from(DEFAULT_REPORT_FILE),
            points: PathBuf::from(DEFAULT_POINTS_FILE),
            cadets: PathBuf::from(DEFAULT_CADETS_FILE),
            slotting: PathBuf::from(DEFAULT_SLOTTING_FILE),
        }
    }
}
