//! Year / month / week filters over the dataset.

use chrono::{Days, NaiveDate};

use crate::domain::LoadRecord;
use crate::error::{AppError, ErrorKind};
use crate::io::parse_date;

/// Raw query parameters as received from the caller.
#[derive(Debug, Clone, Default)]
pub struct LoadQuery {
    pub filter: Option<String>,
    pub month: Option<String>,
    pub start_date: Option<String>,
}

impl LoadQuery {
    /// Build from raw `(key, value)` pairs; when a key repeats, the first
    /// occurrence is used and the rest are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let get = |name: &str| first_param(pairs, name).map(str::to_string);
        LoadQuery {
            filter: get("filter"),
            month: get("month"),
            start_date: get("start_date"),
        }
    }
}

/// Value of the first `name` pair, if any.
pub fn first_param<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
}

/// A resolved filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadFilter {
    /// The whole table.
    Year,
    /// Date strings starting with this prefix (e.g. `2024-02`).
    MonthPrefix(String),
    /// Parsed days in `[start, end]`.
    Week { start: NaiveDate, end: NaiveDate },
}

impl LoadFilter {
    /// Resolve query parameters for a dataset covering `year`.
    ///
    /// `filter` defaults to `year` and is case-insensitive. The month is used
    /// verbatim (no zero padding), and the week start defaults to January 1st.
    pub fn from_query(query: &LoadQuery, year: i32) -> Result<Self, AppError> {
        let mode = query.filter.as_deref().unwrap_or("year").to_lowercase();
        match mode.as_str() {
            "year" => Ok(LoadFilter::Year),
            "month" => {
                let month = query.month.as_deref().unwrap_or("01");
                Ok(LoadFilter::MonthPrefix(format!("{year}-{month}")))
            }
            "week" => {
                let start = match query.start_date.as_deref() {
                    Some(s) => parse_date(s).map_err(AppError::invalid_input)?,
                    None => NaiveDate::from_ymd_opt(year, 1, 1)
                        .ok_or_else(|| AppError::config(format!("Invalid dataset year {year}.")))?,
                };
                let end = start
                    .checked_add_days(Days::new(6))
                    .ok_or_else(|| AppError::invalid_input(format!("Week starting {start} is out of range.")))?;
                Ok(LoadFilter::Week { start, end })
            }
            _ => Err(AppError::new(ErrorKind::UnsupportedFilter, "Invalid filter type")),
        }
    }

    pub fn matches(&self, record: &LoadRecord) -> bool {
        match self {
            LoadFilter::Year => true,
            LoadFilter::MonthPrefix(prefix) => record.date.starts_with(prefix.as_str()),
            LoadFilter::Week { start, end } => record.day >= *start && record.day <= *end,
        }
    }

    /// Matching records in stored order.
    pub fn apply<'a>(&self, records: &'a [LoadRecord]) -> Vec<&'a LoadRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::tests::daily_records;

    fn query(filter: &str) -> LoadQuery {
        LoadQuery {
            filter: Some(filter.to_string()),
            ..LoadQuery::default()
        }
    }

    #[test]
    fn default_is_year_and_returns_everything() {
        let records = daily_records(2024, 1, 1, 60);
        let f = LoadFilter::from_query(&LoadQuery::default(), 2024).unwrap();
        assert_eq!(f, LoadFilter::Year);
        assert_eq!(f.apply(&records).len(), records.len());
    }

    #[test]
    fn mode_is_case_insensitive() {
        assert_eq!(LoadFilter::from_query(&query("YEAR"), 2024).unwrap(), LoadFilter::Year);
    }

    #[test]
    fn month_is_a_string_prefix() {
        let records = daily_records(2024, 1, 1, 90);
        let mut q = query("month");
        q.month = Some("02".to_string());
        let out = LoadFilter::from_query(&q, 2024).unwrap().apply(&records);
        assert_eq!(out.len(), 29);
        assert!(out.iter().all(|r| r.date.starts_with("2024-02")));
    }

    #[test]
    fn unpadded_month_does_not_match() {
        let records = daily_records(2024, 1, 1, 31);
        let mut q = query("month");
        q.month = Some("1".to_string());
        let f = LoadFilter::from_query(&q, 2024).unwrap();
        assert!(f.apply(&records).is_empty());
    }

    #[test]
    fn month_defaults_to_january() {
        let records = daily_records(2024, 1, 1, 60);
        let out = LoadFilter::from_query(&query("month"), 2024).unwrap().apply(&records);
        assert_eq!(out.len(), 31);
    }

    #[test]
    fn week_is_seven_inclusive_days() {
        let records = daily_records(2024, 1, 1, 30);
        let mut q = query("week");
        q.start_date = Some("2024-01-01".to_string());
        let out = LoadFilter::from_query(&q, 2024).unwrap().apply(&records);
        let dates: Vec<&str> = out.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates.len(), 7);
        assert_eq!(dates.first(), Some(&"2024-01-01"));
        assert_eq!(dates.last(), Some(&"2024-01-07"));
    }

    #[test]
    fn week_defaults_to_first_of_year() {
        let f = LoadFilter::from_query(&query("week"), 2023).unwrap();
        assert_eq!(
            f,
            LoadFilter::Week {
                start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2023, 1, 7).unwrap(),
            }
        );
    }

    #[test]
    fn bad_start_date_is_input_error() {
        let mut q = query("week");
        q.start_date = Some("yesterday".to_string());
        let err = LoadFilter::from_query(&q, 2024).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn repeated_keys_keep_the_first_value() {
        let pairs: Vec<(String, String)> = [("filter", "year"), ("month", "03"), ("filter", "month")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let q = LoadQuery::from_pairs(&pairs);
        assert_eq!(q.filter.as_deref(), Some("year"));
        assert_eq!(q.month.as_deref(), Some("03"));
        assert_eq!(q.start_date, None);
        assert_eq!(LoadFilter::from_query(&q, 2024).unwrap(), LoadFilter::Year);
    }

    #[test]
    fn unknown_mode_is_unsupported() {
        let err = LoadFilter::from_query(&query("bogus"), 2024).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFilter);
        assert_eq!(err.public_message(), "Invalid filter type");
    }
}
