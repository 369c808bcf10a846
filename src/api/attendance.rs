use std::collections::HashSet;

use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::MySqlPool;

use crate::config::Config;
use crate::error::AppError;
use crate::model::attendance::Attendance;
use crate::service::attendance::{ComplianceOutcome, ingest_attendance};

/// Upload a weekly swipe-report export
#[utoipa::path(
    post,
    path = "/api/v1/attendance/upload",
    request_body(content = String, content_type = "text/csv", description = "Raw swipe-report export"),
    responses(
        (status = 200, description = "Attendance stored", body = Object, example = json!({
            "message": "Attendance file uploaded successfully and calculated compliance for 42 employees",
            "records_loaded": 180
        })),
        (status = 400, description = "Malformed export or duplicate week window"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn upload_attendance(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let summary = ingest_attendance(pool.get_ref(), config.get_ref(), &body).await?;

    let compliance_message = match &summary.compliance {
        ComplianceOutcome::Calculated { records } => {
            format!(" and calculated compliance for {} employees", records)
        }
        ComplianceOutcome::Failed { reason } => {
            format!(" (Note: compliance calculation failed: {})", reason)
        }
    };

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Attendance file uploaded successfully{}", compliance_message),
        "records_loaded": summary.records_loaded,
        "date_range": {
            "start": summary.date_start,
            "end": summary.date_end
        },
        "week": {
            "week_number": summary.week_number,
            "week_start": summary.week_start,
            "week_end": summary.week_end
        }
    })))
}

/// Attendance rows of the most recent stored week
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    responses(
        (status = 200, description = "Latest week's attendance", body = Object),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(pool: web::Data<MySqlPool>) -> Result<HttpResponse, AppError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance")
        .fetch_one(pool.get_ref())
        .await?;

    let latest: Option<Attendance> =
        sqlx::query_as("SELECT * FROM attendance ORDER BY week_start DESC, date DESC LIMIT 1")
            .fetch_optional(pool.get_ref())
            .await?;

    let attendances: Vec<Attendance> = match &latest {
        Some(row) => {
            sqlx::query_as(
                r#"
                SELECT * FROM attendance
                WHERE week_start = ? AND week_end = ?
                ORDER BY date DESC, employee_id ASC
                "#,
            )
            .bind(row.week_start)
            .bind(row.week_end)
            .fetch_all(pool.get_ref())
            .await?
        }
        None => Vec::new(),
    };

    Ok(HttpResponse::Ok().json(json!({
        "total": total,
        "attendances": attendances
    })))
}

/// Summary of the most recent upload batch
#[utoipa::path(
    get,
    path = "/api/v1/attendance/last-upload",
    responses(
        (status = 200, description = "Last upload info", body = Object),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn last_upload(pool: web::Data<MySqlPool>) -> Result<HttpResponse, AppError> {
    let latest: Option<Attendance> =
        sqlx::query_as("SELECT * FROM attendance ORDER BY created_at DESC, id DESC LIMIT 1")
            .fetch_optional(pool.get_ref())
            .await?;

    let Some(latest) = latest else {
        return Ok(HttpResponse::Ok().json(json!({
            "has_upload": false,
            "message": "No attendance data has been uploaded yet"
        })));
    };

    let week_rows: Vec<Attendance> =
        sqlx::query_as("SELECT * FROM attendance WHERE week_start = ? AND week_end = ?")
            .bind(latest.week_start)
            .bind(latest.week_end)
            .fetch_all(pool.get_ref())
            .await?;

    let min_date = week_rows.iter().map(|r| r.date).min().unwrap_or(latest.date);
    let max_date = week_rows.iter().map(|r| r.date).max().unwrap_or(latest.date);
    let employees: HashSet<&str> = week_rows.iter().map(|r| r.employee_id.as_str()).collect();

    Ok(HttpResponse::Ok().json(json!({
        "has_upload": true,
        "week_start": latest.week_start,
        "week_end": latest.week_end,
        "week_number": latest.week_number,
        "year": latest.year,
        "date_range": {
            "start": min_date,
            "end": max_date
        },
        "records_count": week_rows.len(),
        "employees_count": employees.len(),
        "uploaded_at": latest.created_at
    })))
}
