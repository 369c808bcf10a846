use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One resolved employee-day. Swipe times are stored as bare `HH:MM`
/// strings so no timezone or date-rollover ambiguity can creep in;
/// `work_hours` keeps the source `HH:MM` text while `hours_worked` holds
/// the resolved decimal value. One row per employee per day per upload
/// batch; a week window is only ever loaded once.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "GCC1001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub employee_name: String,

    #[schema(example = "09:00", nullable = true)]
    pub swipe_in: Option<String>,

    #[schema(example = "18:00", nullable = true)]
    pub swipe_out: Option<String>,

    #[schema(example = "08:30", nullable = true)]
    pub work_hours: Option<String>,

    #[schema(example = 8.5, nullable = true)]
    pub hours_worked: Option<f64>,

    /// 1 when the day resolved to more than zero worked hours.
    #[schema(example = 1)]
    pub is_present: i32,

    #[schema(example = "2025-01-06", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "2025-01-06", value_type = String, format = "date")]
    pub week_start: NaiveDate,

    #[schema(example = "2025-01-10", value_type = String, format = "date")]
    pub week_end: NaiveDate,

    #[schema(example = 2)]
    pub week_number: i32,

    #[schema(example = 1)]
    pub month_number: i32,

    #[schema(example = 1)]
    pub quarter_number: i32,

    #[schema(example = 2025)]
    pub year: i32,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub created_at: Option<NaiveDateTime>,
}
