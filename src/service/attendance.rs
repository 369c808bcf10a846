use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::MySqlPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::pipeline::period::PeriodKeys;
use crate::pipeline::resolve::{DaySignals, resolve};
use crate::pipeline::sheet::{self, RawAttendanceRow};
use crate::service::compliance;

/// What happened to the compliance pass that follows an upload. The
/// ingest and the pass are deliberately not atomic: stored attendance
/// survives a failed calculation, and the failure is reported alongside
/// the successful upload.
#[derive(Debug)]
pub enum ComplianceOutcome {
    Calculated { records: usize },
    Failed { reason: String },
}

#[derive(Debug)]
pub struct UploadSummary {
    pub records_loaded: usize,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub week_number: i32,
    pub compliance: ComplianceOutcome,
}

struct StagedRecord {
    employee_id: String,
    employee_name: String,
    swipe_in: Option<String>,
    swipe_out: Option<String>,
    work_hours: Option<String>,
    hours_worked: f64,
    is_present: i32,
    date: NaiveDate,
    keys: PeriodKeys,
}

fn stage(row: &RawAttendanceRow) -> StagedRecord {
    let resolution = resolve(&DaySignals::from_row(row));
    StagedRecord {
        employee_id: row.employee_id.clone(),
        // replaced with the roster name when the id is known
        employee_name: row.employee_id.clone(),
        swipe_in: row.swipe_in.clone(),
        swipe_out: row.swipe_out.clone(),
        work_hours: row.work_hours.clone(),
        hours_worked: resolution.hours_worked,
        is_present: resolution.is_present,
        date: row.date,
        keys: PeriodKeys::for_date(row.date),
    }
}

/// Runs the full ingestion unit of work for one uploaded export: parse,
/// resolve, stamp, reject duplicate week windows, store, then kick off
/// the weekly compliance pass for the stored window.
pub async fn ingest_attendance(
    pool: &MySqlPool,
    config: &Config,
    bytes: &[u8],
) -> Result<UploadSummary, AppError> {
    let batch_id = Uuid::new_v4();
    let rows = sheet::parse_attendance_sheet(bytes, &config.badge_prefix)?;
    if rows.is_empty() {
        return Err(AppError::Validation(
            "no valid attendance records found in the uploaded file".to_string(),
        ));
    }
    let mut staged: Vec<StagedRecord> = rows.iter().map(stage).collect();
    let window = staged[0].keys;

    let existing: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM attendance WHERE week_start = ? AND week_end = ?")
            .bind(window.week_start)
            .bind(window.week_end)
            .fetch_one(pool)
            .await?;
    if existing > 0 {
        return Err(AppError::DuplicateWindow {
            week_start: window.week_start,
            week_end: window.week_end,
        });
    }

    let names = roster_names(pool, &staged).await?;
    for rec in &mut staged {
        if let Some(name) = names.get(&rec.employee_id) {
            rec.employee_name = name.clone();
        }
    }

    let mut tx = pool.begin().await?;
    for rec in &staged {
        sqlx::query(
            r#"
            INSERT INTO attendance
            (employee_id, employee_name, swipe_in, swipe_out, work_hours, hours_worked,
             is_present, date, week_start, week_end, week_number, month_number,
             quarter_number, year)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&rec.employee_id)
        .bind(&rec.employee_name)
        .bind(&rec.swipe_in)
        .bind(&rec.swipe_out)
        .bind(&rec.work_hours)
        .bind(rec.hours_worked)
        .bind(rec.is_present)
        .bind(rec.date)
        .bind(rec.keys.week_start)
        .bind(rec.keys.week_end)
        .bind(rec.keys.week_number)
        .bind(rec.keys.month_number)
        .bind(rec.keys.quarter_number)
        .bind(rec.keys.year)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    let date_start = staged.iter().map(|r| r.date).min().unwrap_or(window.week_start);
    let date_end = staged.iter().map(|r| r.date).max().unwrap_or(window.week_end);
    info!(
        %batch_id,
        records = staged.len(),
        week_start = %window.week_start,
        week_end = %window.week_end,
        "attendance batch stored"
    );

    let compliance = match compliance::calculate_weekly(
        pool,
        &config.thresholds,
        window.week_start,
        window.week_end,
        window.week_number,
    )
    .await
    {
        Ok(records) => ComplianceOutcome::Calculated {
            records: records.len(),
        },
        Err(e) => {
            // surface the real failure to the caller instead of the
            // generic database message, the upload itself stands
            let reason = match e {
                AppError::Database(inner) => AppError::Computation(inner.to_string()).to_string(),
                other => other.to_string(),
            };
            error!(%batch_id, reason = %reason, "weekly compliance calculation failed after upload");
            ComplianceOutcome::Failed { reason }
        }
    };

    Ok(UploadSummary {
        records_loaded: staged.len(),
        date_start,
        date_end,
        week_start: window.week_start,
        week_end: window.week_end,
        week_number: window.week_number,
        compliance,
    })
}

/// Looks up roster names for every distinct badge id in the batch.
/// Unknown ids keep the badge id as their display name.
async fn roster_names(
    pool: &MySqlPool,
    staged: &[StagedRecord],
) -> Result<HashMap<String, String>, AppError> {
    let mut ids: Vec<&str> = staged.iter().map(|r| r.employee_id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT employee_id, employee_name FROM employees WHERE employee_id IN ({})",
        placeholders
    );
    let mut query = sqlx::query_as::<_, (String, String)>(&sql);
    for id in &ids {
        query = query.bind(*id);
    }
    Ok(query.fetch_all(pool).await?.into_iter().collect())
}
