//! Dashboard data preparation
//!
//! Turns raw metering data into the per-date series and summary figures
//! that the plot and the summary boxes display.

use crate::core::{DashboardData, EicNickname, MeterData, Result, Series, Summary};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Build dashboard data from a raw API response fetched at `fetched_at_ts`
/// (unix seconds). A null response is treated as no meters.
pub fn build(
    raw: &Value,
    fetched_at_ts: f64,
    nicknames: &BTreeMap<String, EicNickname>,
    today: &str,
) -> Result<DashboardData> {
    let meters: Vec<MeterData> = if raw.is_null() {
        Vec::new()
    } else {
        serde_json::from_value(raw.clone())?
    };

    let mut data = transform(&meters, nicknames, today);
    data.fetched_at = DateTime::<Utc>::from_timestamp(fetched_at_ts as i64, 0)
        .map(|t| t.format("%Y-%m-%dT%H:%M:%SZ").to_string());
    data.fetched_at_ts = Some(fetched_at_ts);
    Ok(data)
}

/// Build dashboard data from raw meters.
///
/// `today` is a `YYYY-MM-DD` date. When present in the data, its partial
/// total is reported separately and left out of the daily minimum.
pub fn transform(
    meters: &[MeterData],
    nicknames: &BTreeMap<String, EicNickname>,
    today: &str,
) -> DashboardData {
    let mut dates_set = BTreeSet::new();
    let mut totals_by_date: HashMap<String, f64> = HashMap::new();
    let mut per_meter = Vec::with_capacity(meters.len());

    for meter in meters {
        let label = meter
            .metering_point_eic
            .as_deref()
            .filter(|eic| !eic.is_empty())
            .unwrap_or("unknown");

        let mut per_date: HashMap<&str, f64> = HashMap::new();
        for interval in &meter.accounting_intervals {
            let date = interval.date();
            let value = interval.consumption_kwh.unwrap_or(0.0);
            per_date.insert(date, value);
            *totals_by_date.entry(date.to_string()).or_insert(0.0) += value;
            dates_set.insert(date.to_string());
        }

        per_meter.push((label, per_date));
    }

    let dates: Vec<String> = dates_set.into_iter().collect();

    let series = per_meter
        .into_iter()
        .map(|(label, per_date)| {
            let (display, color) = match_eic(label, nicknames);
            Series {
                label: label.to_string(),
                display,
                color,
                values: dates
                    .iter()
                    .map(|d| per_date.get(d.as_str()).copied().unwrap_or(0.0))
                    .collect(),
            }
        })
        .collect();

    let total: Vec<f64> = dates
        .iter()
        .map(|d| totals_by_date.get(d).copied().unwrap_or(0.0))
        .collect();

    let today_idx = dates.iter().position(|d| d == today);
    let summary = summarize(&total, today_idx);

    log::debug!(
        "Transformed {} meters over {} dates (total {} kWh)",
        meters.len(),
        dates.len(),
        summary.total_kwh
    );

    DashboardData {
        summary,
        dates,
        series,
        total,
        fetched_at: None,
        fetched_at_ts: None,
    }
}

fn summarize(total: &[f64], today_idx: Option<usize>) -> Summary {
    let overall: f64 = total.iter().sum();
    let avg = if total.is_empty() {
        0.0
    } else {
        overall / total.len() as f64
    };

    let min = total
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != today_idx)
        .map(|(_, v)| *v)
        .reduce(f64::min)
        .unwrap_or(0.0);
    let max = total.iter().copied().reduce(f64::max).unwrap_or(0.0);

    Summary {
        total_kwh: round3(overall),
        avg_per_day_kwh: round3(avg),
        min_day_kwh: round3(min),
        max_day_kwh: round3(max),
        today_kwh: today_idx.map(|i| round3(total[i])),
    }
}

/// Display name and colour for a metering point label.
///
/// The first nickname whose EIC or nickname occurs in the label wins.
pub fn match_eic(label: &str, nicknames: &BTreeMap<String, EicNickname>) -> (String, Option<String>) {
    for (eic, nickname) in nicknames {
        let nick = nickname.nick();
        if (!eic.is_empty() && label.contains(eic.as_str())) || (!nick.is_empty() && label.contains(nick)) {
            let display = if nick.is_empty() { label } else { nick };
            return (display.to_string(), nickname.color().map(str::to_string));
        }
    }
    (label.to_string(), None)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
