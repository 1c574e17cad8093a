//! Aggregates for the dashboard charts.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::{DatasetStats, LoadRecord, MonthlyAverage, WeeklyAverage};
use crate::error::AppError;

/// Mean load per calendar month, ascending.
pub fn monthly_averages(records: &[LoadRecord]) -> Vec<MonthlyAverage> {
    let mut groups: BTreeMap<(i32, u32), (f64, usize)> = BTreeMap::new();
    for r in records {
        let slot = groups.entry((r.day.year(), r.day.month())).or_default();
        slot.0 += r.load;
        slot.1 += 1;
    }
    groups
        .into_iter()
        .map(|((y, m), (sum, n))| MonthlyAverage {
            month: format!("{y:04}-{m:02}"),
            avg_load: sum / n as f64,
        })
        .collect()
}

/// Mean load per week-of-month within `month` (`YYYY-MM`).
///
/// Week `N` covers days `7N-6 ..= 7N`, so day 29..31 land in week 5.
pub fn weekly_averages(records: &[LoadRecord], month: &str) -> Result<Vec<WeeklyAverage>, AppError> {
    let (year, month) = parse_month(month)?;
    let mut groups: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for r in records
        .iter()
        .filter(|r| r.day.year() == year && r.day.month() == month)
    {
        let week = r.day.day().div_ceil(7);
        let slot = groups.entry(week).or_default();
        slot.0 += r.load;
        slot.1 += 1;
    }
    Ok(groups
        .into_iter()
        .map(|(week, (sum, n))| WeeklyAverage {
            week: format!("Week {week}"),
            avg_load: sum / n as f64,
        })
        .collect())
}

fn parse_month(s: &str) -> Result<(i32, u32), AppError> {
    let s = s.trim();
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .map(|d| (d.year(), d.month()))
        .map_err(|_| AppError::invalid_input(format!("Invalid month '{s}'. Expected YYYY-MM.")))
}

/// Count, date span and load range of the table.
pub fn dataset_stats(records: &[LoadRecord]) -> DatasetStats {
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return DatasetStats {
            n_records: 0,
            first_date: None,
            last_date: None,
            min_load: None,
            max_load: None,
            mean_load: None,
        };
    };

    let mut min_load = f64::INFINITY;
    let mut max_load = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for r in records {
        min_load = min_load.min(r.load);
        max_load = max_load.max(r.load);
        sum += r.load;
    }

    DatasetStats {
        n_records: records.len(),
        first_date: Some(first.date.clone()),
        last_date: Some(last.date.clone()),
        min_load: Some(min_load),
        max_load: Some(max_load),
        mean_load: Some(sum / records.len() as f64),
    }
}
