/// The three verdicts a period snapshot can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Compliant,
    NotCompliant,
    NoData,
}

impl Verdict {
    /// Tri-state flag as persisted: 1, 0, or null.
    pub fn flag(self) -> Option<i32> {
        match self {
            Verdict::Compliant => Some(1),
            Verdict::NotCompliant => Some(0),
            Verdict::NoData => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Compliant => "Compliant",
            Verdict::NotCompliant => "Not Compliant",
            Verdict::NoData => "No Data",
        }
    }
}

/// Assigns the verdict for one employee in one window, in strict
/// precedence order: exemption beats everything, a missing aggregate
/// beats the threshold comparison, and missing thresholds compare as 0
/// so they never block compliance by themselves.
pub fn classify(
    exempt: bool,
    totals: Option<(f64, f64)>,
    required_days: Option<f64>,
    required_hours: Option<f64>,
) -> Verdict {
    if exempt {
        return Verdict::Compliant;
    }
    let Some((days_present, hours_worked)) = totals else {
        return Verdict::NoData;
    };
    if days_present >= required_days.unwrap_or(0.0) && hours_worked >= required_hours.unwrap_or(0.0)
    {
        Verdict::Compliant
    } else {
        Verdict::NotCompliant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exemption_beats_zero_attendance() {
        assert_eq!(classify(true, None, Some(2.0), Some(15.5)), Verdict::Compliant);
        assert_eq!(classify(true, Some((0.0, 0.0)), Some(2.0), Some(15.5)), Verdict::Compliant);
    }

    #[test]
    fn missing_aggregate_is_no_data_not_unmet() {
        let verdict = classify(false, None, Some(2.0), Some(15.5));
        assert_eq!(verdict, Verdict::NoData);
        assert_eq!(verdict.flag(), None);
        assert_eq!(verdict.label(), "No Data");
    }

    #[test]
    fn meeting_both_thresholds_is_compliant() {
        assert_eq!(
            classify(false, Some((3.0, 20.0)), Some(2.0), Some(15.5)),
            Verdict::Compliant
        );
    }

    #[test]
    fn threshold_comparisons_are_non_strict() {
        assert_eq!(
            classify(false, Some((2.0, 15.5)), Some(2.0), Some(15.5)),
            Verdict::Compliant
        );
    }

    #[test]
    fn missing_either_threshold_side_is_not_compliant() {
        assert_eq!(
            classify(false, Some((1.0, 5.0)), Some(2.0), Some(15.5)),
            Verdict::NotCompliant
        );
        assert_eq!(
            classify(false, Some((3.0, 10.0)), Some(2.0), Some(15.5)),
            Verdict::NotCompliant
        );
    }

    #[test]
    fn absent_thresholds_never_block_compliance() {
        assert_eq!(classify(false, Some((0.0, 0.0)), None, None), Verdict::Compliant);
        assert_eq!(classify(false, None, None, None), Verdict::NoData);
    }
}
