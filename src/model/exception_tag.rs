use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Registered exception tag. Profiles reference tags by name (a soft
/// reference); a tag cannot be deleted while any profile still uses it.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "weekly_2_day",
        "created_at": "2025-01-06T10:00:00",
        "updated_at": "2025-01-06T10:00:00"
    })
)]
pub struct ExceptionTag {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "weekly_2_day")]
    pub name: String,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub created_at: Option<NaiveDateTime>,

    #[schema(value_type = Option<String>, format = "date-time", nullable = true)]
    pub updated_at: Option<NaiveDateTime>,
}
