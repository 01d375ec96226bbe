//! Common types used across the application

use serde::{Deserialize, Serialize};

/// One metering point as returned by the metering-data API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterData {
    /// Energy Identification Code of the metering point
    #[serde(default)]
    pub metering_point_eic: Option<String>,
    #[serde(default)]
    pub accounting_intervals: Vec<Interval>,
}

/// A single accounting interval (one day at `one_day` resolution)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    /// ISO timestamp, e.g. "2024-01-15T00:00:00+02:00"
    #[serde(default)]
    pub period_start: String,
    #[serde(default)]
    pub consumption_kwh: Option<f64>,
}

impl Interval {
    /// Date part of the period start ("2024-01-15")
    pub fn date(&self) -> &str {
        self.period_start.split('T').next().unwrap_or_default()
    }
}

/// Per-meter series aligned to [`DashboardData::dates`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Raw EIC label
    pub label: String,
    /// Nickname if configured, otherwise the label
    pub display: String,
    pub color: Option<String>,
    pub values: Vec<f64>,
}

/// Summary figures shown under the plot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_kwh: f64,
    pub avg_per_day_kwh: f64,
    /// Lowest daily total, excluding today's partial day
    pub min_day_kwh: f64,
    pub max_day_kwh: f64,
    /// None when today has no data yet
    pub today_kwh: Option<f64>,
}

/// Dashboard data returned to the frontend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardData {
    pub summary: Summary,
    /// Sorted unique dates (YYYY-MM-DD)
    pub dates: Vec<String>,
    pub series: Vec<Series>,
    /// Sum over all meters for each date
    pub total: Vec<f64>,
    /// When the underlying data was fetched (ISO 8601, UTC)
    #[serde(default)]
    pub fetched_at: Option<String>,
    #[serde(default)]
    pub fetched_at_ts: Option<f64>,
}
