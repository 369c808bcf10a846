use crate::api::compliance::{MonthlyCalcRequest, QuarterlyCalcRequest, WeeklyCalcRequest};
use crate::api::employee::CreateEmployee;
use crate::api::exception::{CreateExceptionTag, UpdateExceptionTag};
use crate::model::attendance::Attendance;
use crate::model::compliance::{MonthlyCompliance, QuarterlyCompliance, WeeklyCompliance};
use crate::model::employee::Employee;
use crate::model::exception_tag::ExceptionTag;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "WorkTrack API",
        version = "1.0.0",
        description = r#"
## WorkTrack

Attendance and compliance tracking for a managed employee roster.

### Key Features
- **Attendance Ingestion**
  - Upload weekly swipe-report exports; rows are normalized and resolved
    into per-day presence and worked hours
- **Compliance**
  - Weekly, monthly and quarterly verdicts against configurable
    thresholds, with per-employee exception tags
- **Roster Management**
  - Full-roster replace uploads plus record-level CRUD
- **Exception Tags**
  - Registry of threshold overrides and exemptions

### Response Format
- JSON-based RESTful responses

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::upload_attendance,
        crate::api::attendance::list_attendance,
        crate::api::attendance::last_upload,

        crate::api::compliance::calculate_weekly,
        crate::api::compliance::calculate_monthly,
        crate::api::compliance::calculate_quarterly,
        crate::api::compliance::list_weekly,
        crate::api::compliance::list_monthly,
        crate::api::compliance::list_quarterly,

        crate::api::employee::list_employees,
        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::upload_roster,

        crate::api::exception::list_exceptions,
        crate::api::exception::create_exception,
        crate::api::exception::get_exception,
        crate::api::exception::update_exception,
        crate::api::exception::delete_exception,
        crate::api::exception::populate_exceptions
    ),
    components(
        schemas(
            Attendance,
            Employee,
            ExceptionTag,
            WeeklyCompliance,
            MonthlyCompliance,
            QuarterlyCompliance,
            WeeklyCalcRequest,
            MonthlyCalcRequest,
            QuarterlyCalcRequest,
            CreateEmployee,
            CreateExceptionTag,
            UpdateExceptionTag
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance ingestion APIs"),
        (name = "Compliance", description = "Compliance calculation APIs"),
        (name = "Employee", description = "Roster management APIs"),
        (name = "Exception", description = "Exception tag APIs"),
    )
)]
pub struct ApiDoc;
