use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Weekly compliance snapshot. Profile fields are denormalized at
/// calculation time; the whole window is regenerated on every
/// calculation, never patched.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct WeeklyCompliance {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "GCC1001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub employee_name: String,

    #[schema(nullable = true)]
    pub reporting_manager_id: Option<String>,

    #[schema(nullable = true)]
    pub reporting_manager_name: Option<String>,

    #[schema(nullable = true)]
    pub vertical_head_id: Option<String>,

    #[schema(nullable = true)]
    pub vertical_head_name: Option<String>,

    #[schema(nullable = true)]
    pub vertical: Option<String>,

    #[schema(nullable = true)]
    pub status: Option<String>,

    #[schema(example = "weekly_2_day", nullable = true)]
    pub exception: Option<String>,

    /// Effective thresholds used for this snapshot; null for exempt
    /// or threshold-less tags.
    #[schema(example = 2.0, nullable = true)]
    pub weekly_days: Option<f64>,

    #[schema(example = 15.5, nullable = true)]
    pub weekly_hours: Option<f64>,

    #[schema(example = 2)]
    pub week_number: i32,

    #[schema(example = "2025-01-06", value_type = String, format = "date")]
    pub week_start: NaiveDate,

    #[schema(example = "2025-01-10", value_type = String, format = "date")]
    pub week_end: NaiveDate,

    #[schema(example = 3.0)]
    pub total_days_present: f64,

    #[schema(example = 20.0)]
    pub total_hours_worked: f64,

    /// 1 compliant, 0 not compliant, null no data.
    #[schema(example = 1, nullable = true)]
    pub is_compliant: Option<i32>,

    #[schema(example = "Compliant")]
    pub compliance_status: String,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub created_at: Option<NaiveDateTime>,
}

/// Monthly compliance snapshot. `month_start`/`month_end` span the
/// employee's attendance in the month, falling back to calendar bounds
/// for employees without data.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct MonthlyCompliance {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "GCC1001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub employee_name: String,

    #[schema(nullable = true)]
    pub reporting_manager_id: Option<String>,

    #[schema(nullable = true)]
    pub reporting_manager_name: Option<String>,

    #[schema(nullable = true)]
    pub vertical_head_id: Option<String>,

    #[schema(nullable = true)]
    pub vertical_head_name: Option<String>,

    #[schema(nullable = true)]
    pub vertical: Option<String>,

    #[schema(nullable = true)]
    pub status: Option<String>,

    #[schema(example = "monthly_4_day", nullable = true)]
    pub exception: Option<String>,

    #[schema(example = 8.0, nullable = true)]
    pub monthly_days: Option<f64>,

    #[schema(example = 62.0, nullable = true)]
    pub monthly_hours: Option<f64>,

    #[schema(example = 1)]
    pub month: i32,

    #[schema(example = 2025)]
    pub year: i32,

    #[schema(example = "2025-01-01", value_type = String, format = "date")]
    pub month_start: NaiveDate,

    #[schema(example = "2025-01-31", value_type = String, format = "date")]
    pub month_end: NaiveDate,

    #[schema(example = 9.0)]
    pub total_days_present: f64,

    #[schema(example = 70.5)]
    pub total_hours_worked: f64,

    #[schema(example = 1, nullable = true)]
    pub is_compliant: Option<i32>,

    #[schema(example = "Compliant")]
    pub compliance_status: String,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub created_at: Option<NaiveDateTime>,
}

/// Quarterly compliance snapshot.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct QuarterlyCompliance {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "GCC1001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub employee_name: String,

    #[schema(nullable = true)]
    pub reporting_manager_id: Option<String>,

    #[schema(nullable = true)]
    pub reporting_manager_name: Option<String>,

    #[schema(nullable = true)]
    pub vertical_head_id: Option<String>,

    #[schema(nullable = true)]
    pub vertical_head_name: Option<String>,

    #[schema(nullable = true)]
    pub vertical: Option<String>,

    #[schema(nullable = true)]
    pub status: Option<String>,

    #[schema(example = "quarterly_12_day", nullable = true)]
    pub exception: Option<String>,

    #[schema(example = 24.0, nullable = true)]
    pub quarterly_days: Option<f64>,

    #[schema(example = 186.0, nullable = true)]
    pub quarterly_hours: Option<f64>,

    #[schema(example = 1)]
    pub quarter: i32,

    #[schema(example = 2025)]
    pub year: i32,

    #[schema(example = "2025-01-01", value_type = String, format = "date")]
    pub quarter_start: NaiveDate,

    #[schema(example = "2025-03-31", value_type = String, format = "date")]
    pub quarter_end: NaiveDate,

    #[schema(example = 25.0)]
    pub total_days_present: f64,

    #[schema(example = 190.0)]
    pub total_hours_worked: f64,

    #[schema(example = 1, nullable = true)]
    pub is_compliant: Option<i32>,

    #[schema(example = "Compliant")]
    pub compliance_status: String,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub created_at: Option<NaiveDateTime>,
}
