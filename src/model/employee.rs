use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Roster entry. `employee_id` is the stable business key; the roster is
/// replaced wholesale on upload, so exactly one row exists per id.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": "GCC1001",
        "employee_name": "John Doe",
        "reporting_manager_id": "GCC1000",
        "reporting_manager_name": "Jane Roe",
        "vertical_head_id": "GCC0100",
        "vertical_head_name": "Ann Lee",
        "vertical": "Engineering",
        "status": "Active",
        "exception": "weekly_2_day"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "GCC1001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub employee_name: String,

    #[schema(example = "GCC1000", nullable = true)]
    pub reporting_manager_id: Option<String>,

    #[schema(example = "Jane Roe", nullable = true)]
    pub reporting_manager_name: Option<String>,

    #[schema(example = "GCC0100", nullable = true)]
    pub vertical_head_id: Option<String>,

    #[schema(example = "Ann Lee", nullable = true)]
    pub vertical_head_name: Option<String>,

    #[schema(example = "Engineering", nullable = true)]
    pub vertical: Option<String>,

    #[schema(example = "Active", nullable = true)]
    pub status: Option<String>,

    #[schema(example = "weekly_2_day", nullable = true)]
    pub exception: Option<String>,
}
