use chrono::NaiveTime;

use super::sheet::{round2, RawAttendanceRow};

/// Hours credited for a day with a single swipe and no usable reported
/// hours.
pub const SINGLE_SWIPE_DEFAULT_HOURS: f64 = 6.0;

/// The three signals a day's row can carry. Reported hours are usable
/// only when parseable and greater than zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaySignals {
    pub swipe_in: Option<NaiveTime>,
    pub swipe_out: Option<NaiveTime>,
    pub reported_hours: Option<f64>,
}

impl DaySignals {
    pub fn from_row(row: &RawAttendanceRow) -> Self {
        Self {
            swipe_in: row.swipe_in.as_deref().and_then(parse_swipe),
            swipe_out: row.swipe_out.as_deref().and_then(parse_swipe),
            reported_hours: row.reported_hours,
        }
    }

    fn swipe_count(&self) -> usize {
        self.swipe_in.iter().count() + self.swipe_out.iter().count()
    }

    fn usable_reported(&self) -> Option<f64> {
        self.reported_hours.filter(|h| *h > 0.0)
    }
}

/// Outcome of the rule cascade for one employee-day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub is_present: i32,
    pub hours_worked: f64,
}

struct Rule {
    name: &'static str,
    applies: fn(&DaySignals) -> bool,
    hours: fn(&DaySignals) -> f64,
}

/// Ordered, first-match-wins. Together the predicates partition every
/// combination of swipe availability and usable reported hours.
const RULES: &[Rule] = &[
    Rule {
        name: "both swipes, reported hours",
        applies: |s| s.swipe_count() == 2 && s.usable_reported().is_some(),
        hours: |s| s.usable_reported().unwrap_or(0.0),
    },
    Rule {
        name: "both swipes, elapsed time",
        applies: |s| s.swipe_count() == 2,
        hours: |s| match (s.swipe_in, s.swipe_out) {
            (Some(swipe_in), Some(swipe_out)) => {
                elapsed_hours(swipe_in, swipe_out).unwrap_or(0.0)
            }
            _ => 0.0,
        },
    },
    Rule {
        name: "single swipe, reported hours",
        applies: |s| s.swipe_count() == 1 && s.usable_reported().is_some(),
        hours: |s| s.usable_reported().unwrap_or(0.0),
    },
    Rule {
        name: "single swipe, default hours",
        applies: |s| s.swipe_count() == 1,
        hours: |_| SINGLE_SWIPE_DEFAULT_HOURS,
    },
    Rule {
        name: "reported hours only",
        applies: |s| s.usable_reported().is_some(),
        hours: |s| s.usable_reported().unwrap_or(0.0),
    },
    Rule {
        name: "no signal",
        applies: |_| true,
        hours: |_| 0.0,
    },
];

/// Applies the rule cascade. Presence follows from the resolved hours:
/// a day counts as worked exactly when it yields more than zero hours.
pub fn resolve(signals: &DaySignals) -> Resolution {
    let rule = RULES
        .iter()
        .find(|rule| (rule.applies)(signals))
        .unwrap_or(&RULES[RULES.len() - 1]);
    tracing::trace!(rule = rule.name, "attendance rule matched");
    let hours_worked = round2((rule.hours)(signals)).max(0.0);
    Resolution {
        is_present: i32::from(hours_worked > 0.0),
        hours_worked,
    }
}

/// Elapsed time between two same-day swipes, in decimal hours. A
/// swipe-out earlier than the swipe-in is taken as crossing midnight.
/// A negative result is rejected.
fn elapsed_hours(swipe_in: NaiveTime, swipe_out: NaiveTime) -> Option<f64> {
    use chrono::Timelike;
    let mut secs =
        swipe_out.num_seconds_from_midnight() as i64 - swipe_in.num_seconds_from_midnight() as i64;
    if secs < 0 {
        secs += 24 * 3600;
    }
    if secs < 0 {
        return None;
    }
    Some(round2(secs as f64 / 3600.0))
}

fn parse_swipe(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw.trim(), "%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn signals(swipe_in: Option<&str>, swipe_out: Option<&str>, reported: Option<f64>) -> DaySignals {
        let row = RawAttendanceRow {
            employee_id: "GCC1001".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            swipe_in: swipe_in.map(|s| s.to_string()),
            swipe_out: swipe_out.map(|s| s.to_string()),
            work_hours: None,
            reported_hours: reported,
        };
        DaySignals::from_row(&row)
    }

    #[test]
    fn both_swipes_prefer_reported_hours() {
        let r = resolve(&signals(Some("09:00"), Some("18:00"), Some(7.5)));
        assert_eq!(r.hours_worked, 7.5);
        assert_eq!(r.is_present, 1);
    }

    #[test]
    fn both_swipes_fall_back_to_elapsed_time() {
        let r = resolve(&signals(Some("09:15"), Some("17:45"), None));
        assert_eq!(r.hours_worked, 8.5);
        assert_eq!(r.is_present, 1);
    }

    #[test]
    fn elapsed_time_crosses_midnight() {
        let r = resolve(&signals(Some("09:00"), Some("02:00"), None));
        assert_eq!(r.hours_worked, 17.0);
        assert_eq!(r.is_present, 1);
    }

    #[test]
    fn identical_swipes_resolve_to_absent() {
        let r = resolve(&signals(Some("09:00"), Some("09:00"), None));
        assert_eq!(r.hours_worked, 0.0);
        assert_eq!(r.is_present, 0);
    }

    #[test]
    fn single_swipe_with_reported_hours_uses_them() {
        let r = resolve(&signals(Some("09:00"), None, Some(4.25)));
        assert_eq!(r.hours_worked, 4.25);
        assert_eq!(r.is_present, 1);
    }

    #[test]
    fn single_swipe_without_hours_gets_the_default() {
        let r = resolve(&signals(None, Some("17:00"), None));
        assert_eq!(r.hours_worked, SINGLE_SWIPE_DEFAULT_HOURS);
        assert_eq!(r.is_present, 1);
    }

    #[test]
    fn reported_hours_alone_count_as_present() {
        let r = resolve(&signals(None, None, Some(6.5)));
        assert_eq!(r.hours_worked, 6.5);
        assert_eq!(r.is_present, 1);
    }

    #[test]
    fn zero_reported_hours_are_not_usable() {
        let r = resolve(&signals(None, None, Some(0.0)));
        assert_eq!(r.hours_worked, 0.0);
        assert_eq!(r.is_present, 0);
    }

    #[test]
    fn no_signal_resolves_to_absent() {
        let r = resolve(&signals(None, None, None));
        assert_eq!(r.hours_worked, 0.0);
        assert_eq!(r.is_present, 0);
    }

    #[test]
    fn rules_cover_every_signal_combination() {
        for swipe_in in [None, Some("09:00")] {
            for swipe_out in [None, Some("17:00")] {
                for reported in [None, Some(7.0)] {
                    let s = signals(swipe_in, swipe_out, reported);
                    assert!(RULES.iter().any(|rule| (rule.applies)(&s)));
                }
            }
        }
    }
}
