use once_cell::sync::Lazy;
use regex::Regex;
use strum_macros::{Display, EnumString};

use super::sheet::round2;

/// Tag names must be `{period}_{N}_day` or one of the two reserved
/// tokens.
static EXCEPTION_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(weekly|monthly|quarterly)_(\d+)_day$").expect("valid pattern"));

/// Reserved tags: `default` behaves like no override, `other` waives
/// compliance checking entirely.
pub const RESERVED_TAGS: [&str; 2] = ["default", "other"];
pub const EXEMPT_TAG: &str = "other";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum PeriodKind {
    Weekly,
    Monthly,
    Quarterly,
}

/// Organization-wide minimums per period. Carried as an explicit value
/// (env-overridable through `Config`), not a module global.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdDefaults {
    pub weekly_days: f64,
    pub weekly_hours: f64,
    pub monthly_days: f64,
    pub monthly_hours: f64,
    pub quarterly_days: f64,
    pub quarterly_hours: f64,
}

impl Default for ThresholdDefaults {
    fn default() -> Self {
        Self {
            weekly_days: 2.0,
            weekly_hours: 15.5,
            monthly_days: 8.0,
            monthly_hours: 62.0,
            quarterly_days: 24.0,
            quarterly_hours: 186.0,
        }
    }
}

impl ThresholdDefaults {
    pub fn days(&self, period: PeriodKind) -> f64 {
        match period {
            PeriodKind::Weekly => self.weekly_days,
            PeriodKind::Monthly => self.monthly_days,
            PeriodKind::Quarterly => self.quarterly_days,
        }
    }
}

/// The (days, hours) requirement pair per period after applying an
/// employee's exception tag. `None` means no threshold: compared as 0 by
/// the classifier, it never blocks compliance on its own.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectiveThresholds {
    pub weekly_days: Option<f64>,
    pub weekly_hours: Option<f64>,
    pub monthly_days: Option<f64>,
    pub monthly_hours: Option<f64>,
    pub quarterly_days: Option<f64>,
    pub quarterly_hours: Option<f64>,
}

impl EffectiveThresholds {
    fn none() -> Self {
        Self::default()
    }

    fn scaled(defaults: &ThresholdDefaults, ratio: f64) -> Self {
        Self {
            weekly_days: Some(round2(defaults.weekly_days * ratio)),
            weekly_hours: Some(round2(defaults.weekly_hours * ratio)),
            monthly_days: Some(round2(defaults.monthly_days * ratio)),
            monthly_hours: Some(round2(defaults.monthly_hours * ratio)),
            quarterly_days: Some(round2(defaults.quarterly_days * ratio)),
            quarterly_hours: Some(round2(defaults.quarterly_hours * ratio)),
        }
    }
}

/// Whether the tag is the universal exemption. The stored tag text is
/// matched case-insensitively after trimming.
pub fn is_exempt(tag: Option<&str>) -> bool {
    tag.map(|t| t.trim().to_lowercase() == EXEMPT_TAG)
        .unwrap_or(false)
}

/// Maps an exception tag to the effective requirement pairs for every
/// period.
///
/// A `{period}_{N}_…` tag derives `ratio = N / default_days(period)` and
/// scales the days and hours of all three periods by it. The exemption
/// tag yields no thresholds at all; so does a three-segment tag with an
/// integer count but an unknown period (threshold-less without being
/// exempt). Anything else, including absent tags and the `default`
/// marker, keeps the organization defaults.
pub fn effective_thresholds(tag: Option<&str>, defaults: &ThresholdDefaults) -> EffectiveThresholds {
    let from_defaults = EffectiveThresholds::scaled(defaults, 1.0);
    let Some(tag) = tag else {
        return from_defaults;
    };
    if tag == EXEMPT_TAG {
        return EffectiveThresholds::none();
    }
    let parts: Vec<&str> = tag.split('_').collect();
    let [period, count, _] = parts.as_slice() else {
        return from_defaults;
    };
    let Ok(count) = count.parse::<i64>() else {
        return from_defaults;
    };
    let Ok(period) = period.parse::<PeriodKind>() else {
        return EffectiveThresholds::none();
    };
    let ratio = count as f64 / defaults.days(period);
    EffectiveThresholds::scaled(defaults, ratio)
}

/// Validates a tag name for the registry: the strict `{period}_{N}_day`
/// pattern, case-sensitive, or a reserved token compared lowercase.
pub fn is_valid_exception_name(name: &str) -> bool {
    if RESERVED_TAGS.contains(&name.to_lowercase().as_str()) {
        return true;
    }
    EXCEPTION_NAME_RE.is_match(name)
}

/// Reserved tokens are stored lowercase; pattern tags keep their exact
/// spelling.
pub fn normalize_exception_name(name: &str) -> String {
    let lower = name.to_lowercase();
    if RESERVED_TAGS.contains(&lower.as_str()) {
        lower
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_tag_keeps_defaults() {
        let eff = effective_thresholds(None, &ThresholdDefaults::default());
        assert_eq!(eff.weekly_days, Some(2.0));
        assert_eq!(eff.weekly_hours, Some(15.5));
        assert_eq!(eff.quarterly_hours, Some(186.0));
    }

    #[test]
    fn default_marker_keeps_defaults() {
        let eff = effective_thresholds(Some("default"), &ThresholdDefaults::default());
        assert_eq!(eff.monthly_days, Some(8.0));
        assert_eq!(eff.monthly_hours, Some(62.0));
    }

    #[test]
    fn weekly_tag_scales_every_period() {
        let eff = effective_thresholds(Some("weekly_4_day"), &ThresholdDefaults::default());
        // ratio = 4 / 2.0 = 2.0
        assert_eq!(eff.weekly_days, Some(4.0));
        assert_eq!(eff.weekly_hours, Some(31.0));
        assert_eq!(eff.monthly_days, Some(16.0));
        assert_eq!(eff.monthly_hours, Some(124.0));
        assert_eq!(eff.quarterly_days, Some(48.0));
        assert_eq!(eff.quarterly_hours, Some(372.0));
    }

    #[test]
    fn monthly_tag_scales_down() {
        let eff = effective_thresholds(Some("monthly_4_day"), &ThresholdDefaults::default());
        // ratio = 4 / 8.0 = 0.5
        assert_eq!(eff.weekly_days, Some(1.0));
        assert_eq!(eff.weekly_hours, Some(7.75));
        assert_eq!(eff.quarterly_days, Some(12.0));
    }

    #[test]
    fn exemption_tag_has_no_thresholds() {
        let eff = effective_thresholds(Some("other"), &ThresholdDefaults::default());
        assert_eq!(eff, EffectiveThresholds::default());
        assert!(is_exempt(Some("other")));
        assert!(is_exempt(Some(" Other ")));
        assert!(!is_exempt(None));
    }

    #[test]
    fn unknown_period_is_threshold_less_but_not_exempt() {
        let eff = effective_thresholds(Some("yearly_3_day"), &ThresholdDefaults::default());
        assert_eq!(eff, EffectiveThresholds::default());
        assert!(!is_exempt(Some("yearly_3_day")));
    }

    #[test]
    fn malformed_tags_fall_back_to_defaults() {
        let defaults = ThresholdDefaults::default();
        for tag in ["weekly_x_day", "weekly-4-day", "weekly_4", "", "Weekly"] {
            let eff = effective_thresholds(Some(tag), &defaults);
            assert_eq!(eff.weekly_days, Some(2.0), "tag {tag:?}");
        }
        // case-sensitive period lookup: an uppercase period is an unknown one
        let eff = effective_thresholds(Some("Weekly_4_day"), &defaults);
        assert_eq!(eff, EffectiveThresholds::default());
    }

    #[test]
    fn validator_accepts_pattern_and_reserved_names() {
        assert!(is_valid_exception_name("weekly_2_day"));
        assert!(is_valid_exception_name("monthly_4_day"));
        assert!(is_valid_exception_name("quarterly_12_day"));
        assert!(is_valid_exception_name("default"));
        assert!(is_valid_exception_name("OTHER"));
        assert!(!is_valid_exception_name("Weekly_2_day"));
        assert!(!is_valid_exception_name("weekly_2_days"));
        assert!(!is_valid_exception_name("yearly_2_day"));
        assert!(!is_valid_exception_name("weekly__day"));
    }

    #[test]
    fn reserved_names_normalize_to_lowercase() {
        assert_eq!(normalize_exception_name("Default"), "default");
        assert_eq!(normalize_exception_name("weekly_2_day"), "weekly_2_day");
    }
}
