use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{MonthlyTrend, TrainingRecord};
use crate::stats::mean;

pub const MOVING_AVERAGE_WINDOW: usize = 3;

/// Month label such as "Mar 2024".
pub fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|date| date.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{month:02}/{year}"))
}

/// Trailing moving average. The first `window - 1` positions have no value.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|idx| {
            if idx + 1 < window {
                None
            } else {
                let slice = &values[idx + 1 - window..=idx];
                Some(slice.iter().sum::<f64>() / window as f64)
            }
        })
        .collect()
}

/// Per-month completion means and training hours in chronological order,
/// with a three-month trailing average of the completion mean.
pub fn monthly_trends(records: &[TrainingRecord]) -> Vec<MonthlyTrend> {
    let mut buckets: BTreeMap<(i32, u32), (f64, f64, usize)> = BTreeMap::new();
    for record in records {
        let date = record.completion_date;
        let entry = buckets.entry((date.year(), date.month())).or_insert((0.0, 0.0, 0));
        entry.0 += record.completion_rate;
        entry.1 += record.training_hours;
        entry.2 += 1;
    }

    let mut trends: Vec<MonthlyTrend> = buckets
        .into_iter()
        .map(|((year, month), (completion, hours, count))| MonthlyTrend {
            year,
            month,
            label: month_label(year, month),
            avg_completion: mean(completion, count),
            total_hours: hours,
            records: count,
            moving_average: None,
        })
        .collect();

    let series: Vec<f64> = trends.iter().map(|t| t.avg_completion).collect();
    for (trend, average) in trends
        .iter_mut()
        .zip(moving_average(&series, MOVING_AVERAGE_WINDOW))
    {
        trend.moving_average = average;
    }
    trends
}
