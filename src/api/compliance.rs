use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::config::Config;
use crate::error::AppError;
use crate::model::compliance::{MonthlyCompliance, QuarterlyCompliance, WeeklyCompliance};
use crate::pipeline::period::month_bounds;
use crate::service::compliance;

#[derive(Deserialize, ToSchema)]
pub struct WeeklyCalcRequest {
    #[schema(example = "2025-01-06", value_type = String, format = "date")]
    pub week_start: NaiveDate,

    #[schema(example = "2025-01-10", value_type = String, format = "date")]
    pub week_end: NaiveDate,

    #[schema(example = 2)]
    pub week_number: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct MonthlyCalcRequest {
    #[schema(example = 2025)]
    pub year: i32,

    #[schema(example = 1)]
    pub month: u32,
}

#[derive(Deserialize, ToSchema)]
pub struct QuarterlyCalcRequest {
    #[schema(example = 2025)]
    pub year: i32,

    #[schema(example = 1)]
    pub quarter: u32,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct WeeklyFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MonthlyFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct QuarterlyFilter {
    pub year: Option<i32>,
    pub quarter: Option<u32>,
}

/// Recompute weekly compliance for a week window
#[utoipa::path(
    post,
    path = "/api/v1/compliance/weekly/calculate",
    request_body = WeeklyCalcRequest,
    responses(
        (status = 200, description = "Weekly compliance recalculated", body = Object, example = json!({
            "message": "Weekly compliance calculated for week 2 (2025-01-06 to 2025-01-10)",
            "records_calculated": 42
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Compliance"
)]
pub async fn calculate_weekly(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<WeeklyCalcRequest>,
) -> Result<HttpResponse, AppError> {
    let records = compliance::calculate_weekly(
        pool.get_ref(),
        &config.thresholds,
        payload.week_start,
        payload.week_end,
        payload.week_number,
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!(
            "Weekly compliance calculated for week {} ({} to {})",
            payload.week_number, payload.week_start, payload.week_end
        ),
        "records_calculated": records.len()
    })))
}

/// Recompute monthly compliance
#[utoipa::path(
    post,
    path = "/api/v1/compliance/monthly/calculate",
    request_body = MonthlyCalcRequest,
    responses(
        (status = 200, description = "Monthly compliance recalculated", body = Object, example = json!({
            "message": "Monthly compliance calculated for 2025-01",
            "records_calculated": 42
        })),
        (status = 400, description = "Invalid month"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Compliance"
)]
pub async fn calculate_monthly(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<MonthlyCalcRequest>,
) -> Result<HttpResponse, AppError> {
    let records = compliance::calculate_monthly(
        pool.get_ref(),
        &config.thresholds,
        payload.year,
        payload.month,
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!(
            "Monthly compliance calculated for {}-{:02}",
            payload.year, payload.month
        ),
        "records_calculated": records.len()
    })))
}

/// Recompute quarterly compliance
#[utoipa::path(
    post,
    path = "/api/v1/compliance/quarterly/calculate",
    request_body = QuarterlyCalcRequest,
    responses(
        (status = 200, description = "Quarterly compliance recalculated", body = Object, example = json!({
            "message": "Quarterly compliance calculated for Q1 2025",
            "records_calculated": 42
        })),
        (status = 400, description = "Invalid quarter"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Compliance"
)]
pub async fn calculate_quarterly(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<QuarterlyCalcRequest>,
) -> Result<HttpResponse, AppError> {
    let records = compliance::calculate_quarterly(
        pool.get_ref(),
        &config.thresholds,
        payload.year,
        payload.quarter,
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!(
            "Quarterly compliance calculated for Q{} {}",
            payload.quarter, payload.year
        ),
        "records_calculated": records.len()
    })))
}

/// Stored weekly compliance records
#[utoipa::path(
    get,
    path = "/api/v1/compliance/weekly",
    params(WeeklyFilter),
    responses(
        (status = 200, description = "Weekly compliance records", body = Object),
        (status = 400, description = "Invalid filter"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Compliance"
)]
pub async fn list_weekly(
    pool: web::Data<MySqlPool>,
    query: web::Query<WeeklyFilter>,
) -> Result<HttpResponse, AppError> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut binds: Vec<NaiveDate> = Vec::new();

    if let Some(year) = query.year {
        let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| AppError::Validation(format!("invalid year {}", year)))?;
        let next_jan_first = NaiveDate::from_ymd_opt(year + 1, 1, 1)
            .ok_or_else(|| AppError::Validation(format!("invalid year {}", year)))?;
        conditions.push("week_start >= ? AND week_start < ?");
        binds.push(jan_first);
        binds.push(next_jan_first);

        // a month filter only applies together with a year
        if let Some(month) = query.month {
            let (month_start, month_end) = month_bounds(year, month)
                .ok_or_else(|| AppError::Validation(format!("invalid month {}", month)))?;
            conditions.push("week_start <= ? AND week_end >= ?");
            binds.push(month_end);
            binds.push(month_start);
        }
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    let sql = format!(
        "SELECT * FROM weekly_compliance {} ORDER BY week_start ASC, employee_id ASC",
        where_clause
    );

    let mut data_query = sqlx::query_as::<_, WeeklyCompliance>(&sql);
    for b in &binds {
        data_query = data_query.bind(*b);
    }
    let records = data_query.fetch_all(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "total": records.len(),
        "records": records
    })))
}

/// Stored monthly compliance records
#[utoipa::path(
    get,
    path = "/api/v1/compliance/monthly",
    params(MonthlyFilter),
    responses(
        (status = 200, description = "Monthly compliance records", body = Object),
        (status = 500, description = "Internal server error")
    ),
    tag = "Compliance"
)]
pub async fn list_monthly(
    pool: web::Data<MySqlPool>,
    query: web::Query<MonthlyFilter>,
) -> Result<HttpResponse, AppError> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut binds: Vec<i32> = Vec::new();

    if let Some(year) = query.year {
        conditions.push("year = ?");
        binds.push(year);
    }
    if let Some(month) = query.month {
        conditions.push("month = ?");
        binds.push(month as i32);
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    let sql = format!(
        "SELECT * FROM monthly_compliance {} ORDER BY year ASC, month ASC, employee_id ASC",
        where_clause
    );

    let mut data_query = sqlx::query_as::<_, MonthlyCompliance>(&sql);
    for b in &binds {
        data_query = data_query.bind(*b);
    }
    let records = data_query.fetch_all(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "total": records.len(),
        "records": records
    })))
}

/// Stored quarterly compliance records
#[utoipa::path(
    get,
    path = "/api/v1/compliance/quarterly",
    params(QuarterlyFilter),
    responses(
        (status = 200, description = "Quarterly compliance records", body = Object),
        (status = 500, description = "Internal server error")
    ),
    tag = "Compliance"
)]
pub async fn list_quarterly(
    pool: web::Data<MySqlPool>,
    query: web::Query<QuarterlyFilter>,
) -> Result<HttpResponse, AppError> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut binds: Vec<i32> = Vec::new();

    if let Some(year) = query.year {
        conditions.push("year = ?");
        binds.push(year);
    }
    if let Some(quarter) = query.quarter {
        conditions.push("quarter = ?");
        binds.push(quarter as i32);
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    let sql = format!(
        "SELECT * FROM quarterly_compliance {} ORDER BY year ASC, quarter ASC, employee_id ASC",
        where_clause
    );

    let mut data_query = sqlx::query_as::<_, QuarterlyCompliance>(&sql);
    for b in &binds {
        data_query = data_query.bind(*b);
    }
    let records = data_query.fetch_all(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "total": records.len(),
        "records": records
    })))
}
