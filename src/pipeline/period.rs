use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use super::sheet::round2;
use crate::model::attendance::Attendance;

/// Calendar keys stamped on every daily record. The business week runs
/// Monday through Friday of the ISO week containing the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodKeys {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub week_number: i32,
    pub month_number: i32,
    pub quarter_number: i32,
    pub year: i32,
}

impl PeriodKeys {
    pub fn for_date(date: NaiveDate) -> Self {
        let week_start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
        let iso = date.iso_week();
        let month_number = date.month() as i32;
        Self {
            week_start,
            week_end: week_start + Duration::days(4),
            week_number: iso.week() as i32,
            month_number,
            quarter_number: (month_number - 1) / 3 + 1,
            year: iso.year(),
        }
    }
}

/// Summed totals for one employee across a period window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodAggregate {
    pub total_days_present: f64,
    pub total_hours_worked: f64,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

/// Groups daily records by employee id, summing presence flags and hours
/// and tracking the span of dates seen. Records are expected to be
/// pre-filtered to one window via their stamped keys. The map is ordered
/// so downstream output is deterministic.
pub fn aggregate_by_employee<'a, I>(records: I) -> BTreeMap<String, PeriodAggregate>
where
    I: IntoIterator<Item = &'a Attendance>,
{
    let mut out: BTreeMap<String, PeriodAggregate> = BTreeMap::new();
    for record in records {
        let hours = record.hours_worked.unwrap_or(0.0);
        let days = f64::from(record.is_present);
        out.entry(record.employee_id.clone())
            .and_modify(|agg| {
                agg.total_days_present += days;
                agg.total_hours_worked += hours;
                agg.first_date = agg.first_date.min(record.date);
                agg.last_date = agg.last_date.max(record.date);
            })
            .or_insert(PeriodAggregate {
                total_days_present: days,
                total_hours_worked: hours,
                first_date: record.date,
                last_date: record.date,
            });
    }
    for agg in out.values_mut() {
        agg.total_hours_worked = round2(agg.total_hours_worked);
    }
    out
}

/// First and last calendar day of a month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, next - Duration::days(1)))
}

/// First and last calendar day of a quarter.
pub fn quarter_bounds(year: i32, quarter: u32) -> Option<(NaiveDate, NaiveDate)> {
    if !(1..=4).contains(&quarter) {
        return None;
    }
    let first_month = (quarter - 1) * 3 + 1;
    let (start, _) = month_bounds(year, first_month)?;
    let (_, end) = month_bounds(year, first_month + 2)?;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(employee_id: &str, day: NaiveDate, is_present: i32, hours: Option<f64>) -> Attendance {
        let keys = PeriodKeys::for_date(day);
        Attendance {
            id: 0,
            employee_id: employee_id.to_string(),
            employee_name: employee_id.to_string(),
            swipe_in: None,
            swipe_out: None,
            work_hours: None,
            hours_worked: hours,
            is_present,
            date: day,
            week_start: keys.week_start,
            week_end: keys.week_end,
            week_number: keys.week_number,
            month_number: keys.month_number,
            quarter_number: keys.quarter_number,
            year: keys.year,
            created_at: None,
        }
    }

    #[test]
    fn week_runs_monday_to_friday() {
        let keys = PeriodKeys::for_date(date(2025, 1, 8)); // a Wednesday
        assert_eq!(keys.week_start, date(2025, 1, 6));
        assert_eq!(keys.week_end, date(2025, 1, 10));
        assert_eq!(keys.week_number, 2);
        assert_eq!(keys.year, 2025);
    }

    #[test]
    fn quarter_follows_the_month() {
        assert_eq!(PeriodKeys::for_date(date(2025, 3, 31)).quarter_number, 1);
        assert_eq!(PeriodKeys::for_date(date(2025, 4, 1)).quarter_number, 2);
        assert_eq!(PeriodKeys::for_date(date(2025, 12, 1)).quarter_number, 4);
    }

    #[test]
    fn iso_year_wins_at_the_boundary() {
        // 2024-12-30 is the Monday of ISO week 1 of 2025.
        let keys = PeriodKeys::for_date(date(2024, 12, 30));
        assert_eq!(keys.week_number, 1);
        assert_eq!(keys.year, 2025);
        assert_eq!(keys.month_number, 12);
    }

    #[test]
    fn aggregation_sums_presence_and_hours() {
        let rows = vec![
            record("GCC1001", date(2025, 1, 6), 1, Some(8.0)),
            record("GCC1001", date(2025, 1, 7), 1, Some(7.25)),
            record("GCC1001", date(2025, 1, 8), 0, None),
            record("GCC1002", date(2025, 1, 6), 1, Some(6.0)),
        ];
        let aggregates = aggregate_by_employee(&rows);
        let a = &aggregates["GCC1001"];
        assert_eq!(a.total_days_present, 2.0);
        assert_eq!(a.total_hours_worked, 15.25);
        assert_eq!(a.first_date, date(2025, 1, 6));
        assert_eq!(a.last_date, date(2025, 1, 8));
        assert_eq!(aggregates["GCC1002"].total_days_present, 1.0);
    }

    #[test]
    fn month_and_quarter_bounds() {
        assert_eq!(
            month_bounds(2025, 2),
            Some((date(2025, 2, 1), date(2025, 2, 28)))
        );
        assert_eq!(
            month_bounds(2024, 12),
            Some((date(2024, 12, 1), date(2024, 12, 31)))
        );
        assert_eq!(
            quarter_bounds(2025, 2),
            Some((date(2025, 4, 1), date(2025, 6, 30)))
        );
        assert_eq!(quarter_bounds(2025, 5), None);
    }
}
