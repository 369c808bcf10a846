use std::collections::BTreeSet;

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::info;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::model::exception_tag::ExceptionTag;
use crate::pipeline::thresholds::{is_valid_exception_name, normalize_exception_name};

const FORMAT_HINT: &str = "Exception name must follow format {period}_{number}_day \
(e.g. weekly_2_day, monthly_4_day, quarterly_6_day) or be 'default' or 'other'";

#[derive(Deserialize, ToSchema)]
pub struct CreateExceptionTag {
    #[schema(example = "weekly_2_day")]
    pub name: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateExceptionTag {
    #[schema(example = "weekly_3_day", nullable = true)]
    pub name: Option<String>,
}

/// List registered exception tags
#[utoipa::path(
    get,
    path = "/api/v1/exceptions",
    responses(
        (status = 200, description = "All exception tags", body = Object),
        (status = 500, description = "Internal server error")
    ),
    tag = "Exception"
)]
pub async fn list_exceptions(pool: web::Data<MySqlPool>) -> Result<HttpResponse, AppError> {
    let exceptions: Vec<ExceptionTag> =
        sqlx::query_as("SELECT * FROM exceptions ORDER BY name ASC")
            .fetch_all(pool.get_ref())
            .await?;

    Ok(HttpResponse::Ok().json(json!({
        "total": exceptions.len(),
        "exceptions": exceptions
    })))
}

/// Register a new exception tag
#[utoipa::path(
    post,
    path = "/api/v1/exceptions",
    request_body = CreateExceptionTag,
    responses(
        (status = 200, description = "Exception tag created", body = ExceptionTag),
        (status = 400, description = "Invalid tag format"),
        (status = 409, description = "Tag already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Exception"
)]
pub async fn create_exception(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateExceptionTag>,
) -> Result<HttpResponse, AppError> {
    let name = normalize_exception_name(payload.name.trim());
    if !is_valid_exception_name(&name) {
        return Err(AppError::Validation(FORMAT_HINT.to_string()));
    }

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exceptions WHERE name = ?")
        .bind(&name)
        .fetch_one(pool.get_ref())
        .await?;
    if existing > 0 {
        return Err(AppError::Conflict(format!(
            "Exception with name '{}' already exists",
            name
        )));
    }

    sqlx::query("INSERT INTO exceptions (name) VALUES (?)")
        .bind(&name)
        .execute(pool.get_ref())
        .await?;

    let created: ExceptionTag = sqlx::query_as("SELECT * FROM exceptions WHERE name = ?")
        .bind(&name)
        .fetch_one(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(created))
}

/// Get one exception tag
#[utoipa::path(
    get,
    path = "/api/v1/exceptions/{exception_id}",
    params(
        ("exception_id", Path, description = "Exception tag ID")
    ),
    responses(
        (status = 200, description = "Exception tag", body = ExceptionTag),
        (status = 404, description = "Exception not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Exception"
)]
pub async fn get_exception(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let exception_id = path.into_inner();
    let tag: Option<ExceptionTag> = sqlx::query_as("SELECT * FROM exceptions WHERE id = ?")
        .bind(exception_id)
        .fetch_optional(pool.get_ref())
        .await?;

    match tag {
        Some(tag) => Ok(HttpResponse::Ok().json(tag)),
        None => Err(AppError::not_found("exception", exception_id.to_string())),
    }
}

/// Rename an exception tag
#[utoipa::path(
    put,
    path = "/api/v1/exceptions/{exception_id}",
    params(
        ("exception_id", Path, description = "Exception tag ID")
    ),
    request_body = UpdateExceptionTag,
    responses(
        (status = 200, description = "Exception tag updated", body = ExceptionTag),
        (status = 400, description = "Invalid tag format"),
        (status = 404, description = "Exception not found"),
        (status = 409, description = "Tag already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Exception"
)]
pub async fn update_exception(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateExceptionTag>,
) -> Result<HttpResponse, AppError> {
    let exception_id = path.into_inner();
    let current: ExceptionTag = sqlx::query_as("SELECT * FROM exceptions WHERE id = ?")
        .bind(exception_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| AppError::not_found("exception", exception_id.to_string()))?;

    let Some(new_name) = payload.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    else {
        return Ok(HttpResponse::Ok().json(current));
    };

    let new_name = normalize_exception_name(new_name);
    if new_name == current.name {
        return Ok(HttpResponse::Ok().json(current));
    }
    if !is_valid_exception_name(&new_name) {
        return Err(AppError::Validation(FORMAT_HINT.to_string()));
    }

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exceptions WHERE name = ?")
        .bind(&new_name)
        .fetch_one(pool.get_ref())
        .await?;
    if existing > 0 {
        return Err(AppError::Conflict(format!(
            "Exception with name '{}' already exists",
            new_name
        )));
    }

    sqlx::query("UPDATE exceptions SET name = ?, updated_at = NOW() WHERE id = ?")
        .bind(&new_name)
        .bind(exception_id)
        .execute(pool.get_ref())
        .await?;

    let updated: ExceptionTag = sqlx::query_as("SELECT * FROM exceptions WHERE id = ?")
        .bind(exception_id)
        .fetch_one(pool.get_ref())
        .await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Delete an exception tag
#[utoipa::path(
    delete,
    path = "/api/v1/exceptions/{exception_id}",
    params(
        ("exception_id", Path, description = "Exception tag ID")
    ),
    responses(
        (status = 200, description = "Exception tag deleted", body = Object, example = json!({
            "message": "Exception deleted successfully"
        })),
        (status = 404, description = "Exception not found"),
        (status = 409, description = "Tag still referenced by employees"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Exception"
)]
pub async fn delete_exception(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let exception_id = path.into_inner();
    let tag: ExceptionTag = sqlx::query_as("SELECT * FROM exceptions WHERE id = ?")
        .bind(exception_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| AppError::not_found("exception", exception_id.to_string()))?;

    let referenced: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE exception = ?")
        .bind(&tag.name)
        .fetch_one(pool.get_ref())
        .await?;
    if referenced > 0 {
        return Err(AppError::Conflict(format!(
            "Cannot delete exception. {} employee(s) are currently using it.",
            referenced
        )));
    }

    sqlx::query("DELETE FROM exceptions WHERE id = ?")
        .bind(exception_id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Exception deleted successfully"
    })))
}

/// Backfill the registry from tags already referenced by profiles
#[utoipa::path(
    post,
    path = "/api/v1/exceptions/populate",
    responses(
        (status = 200, description = "Registry backfilled", body = Object, example = json!({
            "message": "Populated exceptions from employee records",
            "created": 3,
            "skipped": 1,
            "total_found": 4
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Exception"
)]
pub async fn populate_exceptions(pool: web::Data<MySqlPool>) -> Result<HttpResponse, AppError> {
    let in_use: Vec<Option<String>> =
        sqlx::query_scalar("SELECT DISTINCT exception FROM employees WHERE exception IS NOT NULL")
            .fetch_all(pool.get_ref())
            .await?;

    let unique: BTreeSet<String> = in_use
        .into_iter()
        .flatten()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();

    let mut created = 0;
    let mut skipped = 0;
    for name in &unique {
        let normalized = normalize_exception_name(name);

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exceptions WHERE name = ?")
            .bind(&normalized)
            .fetch_one(pool.get_ref())
            .await?;
        if existing > 0 {
            skipped += 1;
            continue;
        }

        if is_valid_exception_name(&normalized) {
            sqlx::query("INSERT INTO exceptions (name) VALUES (?)")
                .bind(&normalized)
                .execute(pool.get_ref())
                .await?;
            created += 1;
        } else {
            skipped += 1;
        }
    }

    info!(created, skipped, "exception registry backfilled");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Populated exceptions from employee records",
        "created": created,
        "skipped": skipped,
        "total_found": unique.len()
    })))
}
