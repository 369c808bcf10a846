use std::collections::HashMap;

use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::model::employee::Employee;
use crate::utils::sql::{SqlValue, build_update_sql, execute_update};
use crate::utils::text::to_snake_case;

/// Roster columns a partial update may touch.
const UPDATABLE_COLUMNS: [&str; 8] = [
    "employee_name",
    "reporting_manager_id",
    "reporting_manager_name",
    "vertical_head_id",
    "vertical_head_name",
    "vertical",
    "status",
    "exception",
];

/// Columns a roster upload must carry.
const ROSTER_COLUMNS: [&str; 9] = [
    "employee_id",
    "employee_name",
    "reporting_manager_id",
    "reporting_manager_name",
    "vertical_head_id",
    "vertical_head_name",
    "vertical",
    "status",
    "exception",
];

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "GCC1001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub employee_name: String,

    #[schema(example = "GCC1000", nullable = true)]
    pub reporting_manager_id: Option<String>,

    #[schema(example = "Jane Roe", nullable = true)]
    pub reporting_manager_name: Option<String>,

    #[schema(nullable = true)]
    pub vertical_head_id: Option<String>,

    #[schema(nullable = true)]
    pub vertical_head_name: Option<String>,

    #[schema(example = "Engineering", nullable = true)]
    pub vertical: Option<String>,

    #[schema(example = "Active", nullable = true)]
    pub status: Option<String>,

    #[schema(example = "weekly_2_day", nullable = true)]
    pub exception: Option<String>,
}

/// List the roster
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses(
        (status = 200, description = "Full roster", body = Object),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn list_employees(pool: web::Data<MySqlPool>) -> Result<HttpResponse, AppError> {
    let employees: Vec<Employee> =
        sqlx::query_as("SELECT * FROM employees ORDER BY employee_id ASC")
            .fetch_all(pool.get_ref())
            .await?;

    Ok(HttpResponse::Ok().json(json!({
        "total": employees.len(),
        "employees": employees
    })))
}

/// Create a roster entry
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployee,
    responses(
        (status = 200, description = "Employee created", body = Object, example = json!({
            "message": "Employee created successfully"
        })),
        (status = 409, description = "Employee already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, AppError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE employee_id = ?")
        .bind(&payload.employee_id)
        .fetch_one(pool.get_ref())
        .await?;
    if existing > 0 {
        return Err(AppError::Conflict(format!(
            "Employee with id '{}' already exists",
            payload.employee_id
        )));
    }

    sqlx::query(
        r#"
        INSERT INTO employees
        (employee_id, employee_name, reporting_manager_id, reporting_manager_name,
         vertical_head_id, vertical_head_name, vertical, status, exception)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.employee_id)
    .bind(&payload.employee_name)
    .bind(&payload.reporting_manager_id)
    .bind(&payload.reporting_manager_name)
    .bind(&payload.vertical_head_id)
    .bind(&payload.vertical_head_name)
    .bind(&payload.vertical)
    .bind(&payload.status)
    .bind(&payload.exception)
    .execute(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee created successfully"
    })))
}

/// Get one roster entry
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Business employee id")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    let employee: Option<Employee> =
        sqlx::query_as("SELECT * FROM employees WHERE employee_id = ?")
            .bind(&employee_id)
            .fetch_optional(pool.get_ref())
            .await?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Err(AppError::not_found("employee", employee_id)),
    }
}

/// Partially update a roster entry
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Business employee id")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Employee updated", body = Object, example = json!({
            "message": "Employee updated successfully"
        })),
        (status = 400, description = "Unknown field in payload"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let update = build_update_sql(
        "employees",
        &UPDATABLE_COLUMNS,
        &body,
        "employee_id",
        SqlValue::String(employee_id.clone()),
    )?;
    debug!(sql = %update.sql, %employee_id, "Updating employee");

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(AppError::from)?;

    if affected == 0 {
        return Err(AppError::not_found("employee", employee_id).into());
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee updated successfully"
    })))
}

/// Delete a roster entry
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Business employee id")
    ),
    responses(
        (status = 200, description = "Employee deleted", body = Object, example = json!({
            "message": "Employee deleted successfully"
        })),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    let result = sqlx::query("DELETE FROM employees WHERE employee_id = ?")
        .bind(&employee_id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("employee", employee_id));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted successfully"
    })))
}

/// Replace the whole roster from a CSV export
#[utoipa::path(
    post,
    path = "/api/v1/employees/upload",
    request_body(content = String, content_type = "text/csv", description = "Roster export"),
    responses(
        (status = 200, description = "Roster replaced", body = Object, example = json!({
            "message": "Roster file uploaded successfully",
            "records_loaded": 42
        })),
        (status = 400, description = "Missing required columns"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn upload_roster(
    pool: web::Data<MySqlPool>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(&body[..]);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::Validation(format!("invalid roster file: {}", e)))?
        .iter()
        .map(to_snake_case)
        .collect();

    let missing: Vec<&str> = ROSTER_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "missing required columns: {}",
            missing.join(", ")
        )));
    }
    let index: HashMap<&str, usize> = ROSTER_COLUMNS
        .iter()
        .filter_map(|col| headers.iter().position(|h| h == col).map(|i| (*col, i)))
        .collect();

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::Validation(format!("invalid roster row: {}", e)))?;
        let cells: Vec<Option<String>> = ROSTER_COLUMNS
            .iter()
            .map(|col| {
                index
                    .get(col)
                    .and_then(|&i| record.get(i))
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .collect();
        // rows without a business id carry nothing to key on
        if cells[0].is_none() {
            continue;
        }
        rows.push(cells);
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM employees").execute(&mut *tx).await?;
    for cells in &rows {
        let employee_id = cells[0].clone().unwrap_or_default();
        let employee_name = cells[1].clone().unwrap_or_else(|| employee_id.clone());
        sqlx::query(
            r#"
            INSERT INTO employees
            (employee_id, employee_name, reporting_manager_id, reporting_manager_name,
             vertical_head_id, vertical_head_name, vertical, status, exception)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(employee_id)
        .bind(employee_name)
        .bind(&cells[2])
        .bind(&cells[3])
        .bind(&cells[4])
        .bind(&cells[5])
        .bind(&cells[6])
        .bind(&cells[7])
        .bind(&cells[8])
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    info!(records = rows.len(), "roster replaced from upload");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Roster file uploaded successfully",
        "records_loaded": rows.len()
    })))
}
