use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::MySqlPool;
use tracing::info;

use crate::error::AppError;
use crate::model::attendance::Attendance;
use crate::model::compliance::{MonthlyCompliance, QuarterlyCompliance, WeeklyCompliance};
use crate::model::employee::Employee;
use crate::pipeline::classify::classify;
use crate::pipeline::period::{aggregate_by_employee, month_bounds, quarter_bounds};
use crate::pipeline::thresholds::{ThresholdDefaults, effective_thresholds, is_exempt};

/// Recomputes the weekly snapshot for one week window. Returns an empty
/// list when the window has no attendance at all; otherwise every roster
/// employee gets exactly one record and the window's previous records
/// are replaced in the same transaction.
pub async fn calculate_weekly(
    pool: &MySqlPool,
    defaults: &ThresholdDefaults,
    week_start: NaiveDate,
    week_end: NaiveDate,
    week_number: i32,
) -> Result<Vec<WeeklyCompliance>, AppError> {
    let attendance: Vec<Attendance> =
        sqlx::query_as("SELECT * FROM attendance WHERE week_start = ? AND week_end = ?")
            .bind(week_start)
            .bind(week_end)
            .fetch_all(pool)
            .await?;
    if attendance.is_empty() {
        return Ok(Vec::new());
    }

    let aggregates = aggregate_by_employee(&attendance);
    let mut stamped_weeks: HashMap<&str, i32> = HashMap::new();
    for record in &attendance {
        stamped_weeks
            .entry(record.employee_id.as_str())
            .or_insert(record.week_number);
    }

    let employees = load_roster(pool).await?;
    let mut records = Vec::with_capacity(employees.len());
    for emp in employees {
        let tag = emp.exception.as_deref();
        let eff = effective_thresholds(tag, defaults);
        let totals = aggregates
            .get(&emp.employee_id)
            .map(|a| (a.total_days_present, a.total_hours_worked));
        let verdict = classify(is_exempt(tag), totals, eff.weekly_days, eff.weekly_hours);
        let (total_days_present, total_hours_worked) = totals.unwrap_or((0.0, 0.0));
        let week_number = stamped_weeks
            .get(emp.employee_id.as_str())
            .copied()
            .unwrap_or(week_number);

        records.push(WeeklyCompliance {
            id: 0,
            employee_id: emp.employee_id,
            employee_name: emp.employee_name,
            reporting_manager_id: emp.reporting_manager_id,
            reporting_manager_name: emp.reporting_manager_name,
            vertical_head_id: emp.vertical_head_id,
            vertical_head_name: emp.vertical_head_name,
            vertical: emp.vertical,
            status: emp.status,
            exception: emp.exception,
            weekly_days: eff.weekly_days,
            weekly_hours: eff.weekly_hours,
            week_number,
            week_start,
            week_end,
            total_days_present,
            total_hours_worked,
            is_compliant: verdict.flag(),
            compliance_status: verdict.label().to_string(),
            created_at: None,
        });
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM weekly_compliance WHERE week_start = ? AND week_end = ?")
        .bind(week_start)
        .bind(week_end)
        .execute(&mut *tx)
        .await?;
    for r in &records {
        sqlx::query(
            r#"
            INSERT INTO weekly_compliance
            (employee_id, employee_name, reporting_manager_id, reporting_manager_name,
             vertical_head_id, vertical_head_name, vertical, status, exception,
             weekly_days, weekly_hours, week_number, week_start, week_end,
             total_days_present, total_hours_worked, is_compliant, compliance_status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&r.employee_id)
        .bind(&r.employee_name)
        .bind(&r.reporting_manager_id)
        .bind(&r.reporting_manager_name)
        .bind(&r.vertical_head_id)
        .bind(&r.vertical_head_name)
        .bind(&r.vertical)
        .bind(&r.status)
        .bind(&r.exception)
        .bind(r.weekly_days)
        .bind(r.weekly_hours)
        .bind(r.week_number)
        .bind(r.week_start)
        .bind(r.week_end)
        .bind(r.total_days_present)
        .bind(r.total_hours_worked)
        .bind(r.is_compliant)
        .bind(&r.compliance_status)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    info!(
        week_start = %week_start,
        week_end = %week_end,
        records = records.len(),
        "weekly compliance recalculated"
    );
    Ok(records)
}

/// Recomputes the monthly snapshot for one calendar month. Window bounds
/// per employee span that employee's attendance; employees without data
/// carry the calendar bounds.
pub async fn calculate_monthly(
    pool: &MySqlPool,
    defaults: &ThresholdDefaults,
    year: i32,
    month: u32,
) -> Result<Vec<MonthlyCompliance>, AppError> {
    let (month_start, month_end) = month_bounds(year, month)
        .ok_or_else(|| AppError::Validation(format!("invalid month {}", month)))?;

    let attendance: Vec<Attendance> =
        sqlx::query_as("SELECT * FROM attendance WHERE month_number = ? AND year = ?")
            .bind(month as i32)
            .bind(year)
            .fetch_all(pool)
            .await?;
    if attendance.is_empty() {
        return Ok(Vec::new());
    }

    let aggregates = aggregate_by_employee(&attendance);
    let employees = load_roster(pool).await?;
    let mut records = Vec::with_capacity(employees.len());
    for emp in employees {
        let tag = emp.exception.as_deref();
        let eff = effective_thresholds(tag, defaults);
        let agg = aggregates.get(&emp.employee_id);
        let totals = agg.map(|a| (a.total_days_present, a.total_hours_worked));
        let verdict = classify(is_exempt(tag), totals, eff.monthly_days, eff.monthly_hours);
        let (total_days_present, total_hours_worked) = totals.unwrap_or((0.0, 0.0));

        records.push(MonthlyCompliance {
            id: 0,
            employee_id: emp.employee_id,
            employee_name: emp.employee_name,
            reporting_manager_id: emp.reporting_manager_id,
            reporting_manager_name: emp.reporting_manager_name,
            vertical_head_id: emp.vertical_head_id,
            vertical_head_name: emp.vertical_head_name,
            vertical: emp.vertical,
            status: emp.status,
            exception: emp.exception,
            monthly_days: eff.monthly_days,
            monthly_hours: eff.monthly_hours,
            month: month as i32,
            year,
            month_start: agg.map(|a| a.first_date).unwrap_or(month_start),
            month_end: agg.map(|a| a.last_date).unwrap_or(month_end),
            total_days_present,
            total_hours_worked,
            is_compliant: verdict.flag(),
            compliance_status: verdict.label().to_string(),
            created_at: None,
        });
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM monthly_compliance WHERE month = ? AND year = ?")
        .bind(month as i32)
        .bind(year)
        .execute(&mut *tx)
        .await?;
    for r in &records {
        sqlx::query(
            r#"
            INSERT INTO monthly_compliance
            (employee_id, employee_name, reporting_manager_id, reporting_manager_name,
             vertical_head_id, vertical_head_name, vertical, status, exception,
             monthly_days, monthly_hours, month, year, month_start, month_end,
             total_days_present, total_hours_worked, is_compliant, compliance_status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&r.employee_id)
        .bind(&r.employee_name)
        .bind(&r.reporting_manager_id)
        .bind(&r.reporting_manager_name)
        .bind(&r.vertical_head_id)
        .bind(&r.vertical_head_name)
        .bind(&r.vertical)
        .bind(&r.status)
        .bind(&r.exception)
        .bind(r.monthly_days)
        .bind(r.monthly_hours)
        .bind(r.month)
        .bind(r.year)
        .bind(r.month_start)
        .bind(r.month_end)
        .bind(r.total_days_present)
        .bind(r.total_hours_worked)
        .bind(r.is_compliant)
        .bind(&r.compliance_status)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    info!(year, month, records = records.len(), "monthly compliance recalculated");
    Ok(records)
}

/// Recomputes the quarterly snapshot for one quarter.
pub async fn calculate_quarterly(
    pool: &MySqlPool,
    defaults: &ThresholdDefaults,
    year: i32,
    quarter: u32,
) -> Result<Vec<QuarterlyCompliance>, AppError> {
    let (quarter_start, quarter_end) = quarter_bounds(year, quarter)
        .ok_or_else(|| AppError::Validation(format!("invalid quarter {}", quarter)))?;

    let attendance: Vec<Attendance> =
        sqlx::query_as("SELECT * FROM attendance WHERE quarter_number = ? AND year = ?")
            .bind(quarter as i32)
            .bind(year)
            .fetch_all(pool)
            .await?;
    if attendance.is_empty() {
        return Ok(Vec::new());
    }

    let aggregates = aggregate_by_employee(&attendance);
    let employees = load_roster(pool).await?;
    let mut records = Vec::with_capacity(employees.len());
    for emp in employees {
        let tag = emp.exception.as_deref();
        let eff = effective_thresholds(tag, defaults);
        let agg = aggregates.get(&emp.employee_id);
        let totals = agg.map(|a| (a.total_days_present, a.total_hours_worked));
        let verdict = classify(is_exempt(tag), totals, eff.quarterly_days, eff.quarterly_hours);
        let (total_days_present, total_hours_worked) = totals.unwrap_or((0.0, 0.0));

        records.push(QuarterlyCompliance {
            id: 0,
            employee_id: emp.employee_id,
            employee_name: emp.employee_name,
            reporting_manager_id: emp.reporting_manager_id,
            reporting_manager_name: emp.reporting_manager_name,
            vertical_head_id: emp.vertical_head_id,
            vertical_head_name: emp.vertical_head_name,
            vertical: emp.vertical,
            status: emp.status,
            exception: emp.exception,
            quarterly_days: eff.quarterly_days,
            quarterly_hours: eff.quarterly_hours,
            quarter: quarter as i32,
            year,
            quarter_start: agg.map(|a| a.first_date).unwrap_or(quarter_start),
            quarter_end: agg.map(|a| a.last_date).unwrap_or(quarter_end),
            total_days_present,
            total_hours_worked,
            is_compliant: verdict.flag(),
            compliance_status: verdict.label().to_string(),
            created_at: None,
        });
    }

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM quarterly_compliance WHERE quarter = ? AND year = ?")
        .bind(quarter as i32)
        .bind(year)
        .execute(&mut *tx)
        .await?;
    for r in &records {
        sqlx::query(
            r#"
            INSERT INTO quarterly_compliance
            (employee_id, employee_name, reporting_manager_id, reporting_manager_name,
             vertical_head_id, vertical_head_name, vertical, status, exception,
             quarterly_days, quarterly_hours, quarter, year, quarter_start, quarter_end,
             total_days_present, total_hours_worked, is_compliant, compliance_status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&r.employee_id)
        .bind(&r.employee_name)
        .bind(&r.reporting_manager_id)
        .bind(&r.reporting_manager_name)
        .bind(&r.vertical_head_id)
        .bind(&r.vertical_head_name)
        .bind(&r.vertical)
        .bind(&r.status)
        .bind(&r.exception)
        .bind(r.quarterly_days)
        .bind(r.quarterly_hours)
        .bind(r.quarter)
        .bind(r.year)
        .bind(r.quarter_start)
        .bind(r.quarter_end)
        .bind(r.total_days_present)
        .bind(r.total_hours_worked)
        .bind(r.is_compliant)
        .bind(&r.compliance_status)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    info!(year, quarter, records = records.len(), "quarterly compliance recalculated");
    Ok(records)
}

async fn load_roster(pool: &MySqlPool) -> Result<Vec<Employee>, AppError> {
    let employees = sqlx::query_as("SELECT * FROM employees ORDER BY employee_id ASC")
        .fetch_all(pool)
        .await?;
    Ok(employees)
}
