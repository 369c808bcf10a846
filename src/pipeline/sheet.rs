use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::utils::text::dedup_names;

/// First cell of the row that separates preamble from the real header.
pub const SENTINEL_PREFIX: &str = "User";

const EMPLOYEE_COL: &str = "userid";
const SWIPE_IN_COL: &str = "in-spfid";
const SWIPE_OUT_COL: &str = "out-spfid";
const WORK_HOURS_COL: &str = "workhrs";

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to read spreadsheet export: {0}")]
    Decode(#[from] csv::Error),
    #[error("spreadsheet is empty after removing blank rows and columns")]
    Empty,
    #[error("no date row found in first column, check file format")]
    NoDateRow,
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
}

/// One employee-day as it appears in the export, after normalization.
/// Swipe cells are bare `HH:MM` strings, reported hours keep their raw
/// `HH:MM` text alongside the decimal conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAttendanceRow {
    pub employee_id: String,
    pub date: NaiveDate,
    pub swipe_in: Option<String>,
    pub swipe_out: Option<String>,
    pub work_hours: Option<String>,
    pub reported_hours: Option<f64>,
}

type Grid = Vec<Vec<String>>;

/// Parses the raw bytes of a swipe-report export into one row per
/// employee-day. The export carries a two-row stacked header below a
/// sentinel row, day-marker rows that hold the date for the employee rows
/// beneath them, and a trailing summary footer.
pub fn parse_attendance_sheet(
    bytes: &[u8],
    badge_prefix: &str,
) -> Result<Vec<RawAttendanceRow>, SheetError> {
    let grid = decode_grid(bytes)?;
    let grid = drop_blank(grid);
    if grid.is_empty() {
        return Err(SheetError::Empty);
    }
    let grid = cut_above_sentinel(grid);
    if grid.len() < 2 {
        return Err(SheetError::NoDateRow);
    }
    let columns = synthesize_headers(&grid[0], &grid[1]);
    let grid = cut_to_data(grid)?;
    let picks = locate_columns(&columns)?;
    let rows = forward_fill_dates(grid, picks);
    Ok(rows
        .into_iter()
        .map(|row| normalize_row(row, badge_prefix))
        .collect())
}

/// Decodes export bytes into a rectangular cell grid. The reader is
/// headerless and tolerates ragged record lengths; short rows are padded
/// afterwards.
fn decode_grid(bytes: &[u8]) -> Result<Grid, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut grid: Grid = Vec::new();
    for record in reader.records() {
        let record = record?;
        grid.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut grid {
        row.resize(width, String::new());
    }
    Ok(grid)
}

/// Removes fully-empty rows and fully-empty columns.
fn drop_blank(grid: Grid) -> Grid {
    let rows: Grid = grid
        .into_iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();
    if rows.is_empty() {
        return rows;
    }

    let width = rows[0].len();
    let keep: Vec<usize> = (0..width)
        .filter(|&col| rows.iter().any(|row| !row[col].trim().is_empty()))
        .collect();
    rows.into_iter()
        .map(|mut row| {
            keep.iter()
                .map(|&col| std::mem::take(&mut row[col]))
                .collect()
        })
        .collect()
}

/// Discards preamble rows above the sentinel. A missing sentinel leaves
/// the grid untouched.
fn cut_above_sentinel(grid: Grid) -> Grid {
    match grid
        .iter()
        .position(|row| row.first().is_some_and(|c| c.trim().starts_with(SENTINEL_PREFIX)))
    {
        Some(idx) => grid.into_iter().skip(idx).collect(),
        None => grid,
    }
}

/// Builds column names by joining the two stacked header rows cell by
/// cell, case-folded, with collisions de-duplicated numerically.
fn synthesize_headers(top: &[String], bottom: &[String]) -> Vec<String> {
    let names: Vec<String> = top
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let b = bottom.get(i).map(|s| s.trim()).unwrap_or("");
            format!("{}{}", a.trim(), b).to_lowercase()
        })
        .collect();
    dedup_names(&names)
}

/// Slices the grid to the data region: everything from the first row whose
/// first cell parses as a date, minus the trailing summary footer. The two
/// header rows never parse as dates, so they fall away here too.
fn cut_to_data(grid: Grid) -> Result<Grid, SheetError> {
    let start = grid
        .iter()
        .position(|row| row.first().map(|c| parse_date_cell(c).is_some()).unwrap_or(false))
        .ok_or(SheetError::NoDateRow)?;
    let end = grid.len() - 1;
    Ok(grid.into_iter().take(end).skip(start).collect())
}

#[derive(Debug, Clone, Copy)]
struct ColumnPicks {
    employee: usize,
    swipe_in: usize,
    swipe_out: usize,
    work_hours: usize,
}

fn locate_columns(columns: &[String]) -> Result<ColumnPicks, SheetError> {
    let find = |name: &'static str| -> Result<usize, SheetError> {
        columns
            .iter()
            .position(|c| c == name)
            .ok_or(SheetError::MissingColumn(name))
    };
    Ok(ColumnPicks {
        employee: find(EMPLOYEE_COL)?,
        swipe_in: find(SWIPE_IN_COL)?,
        swipe_out: find(SWIPE_OUT_COL)?,
        work_hours: find(WORK_HOURS_COL)?,
    })
}

struct PickedRow {
    employee: String,
    date: NaiveDate,
    swipe_in: String,
    swipe_out: String,
    work_hours: String,
}

/// Walks the data rows, carrying the date forward from day-marker rows
/// (whose first cell is a date) onto the employee rows beneath them. The
/// marker rows themselves are dropped, as are rows seen before any marker.
fn forward_fill_dates(grid: Grid, picks: ColumnPicks) -> Vec<PickedRow> {
    let mut current: Option<NaiveDate> = None;
    let mut out = Vec::new();
    for row in grid {
        let first = row.get(picks.employee).map(String::as_str).unwrap_or("");
        if let Some(date) = parse_date_cell(first) {
            current = Some(date);
            continue;
        }
        let Some(date) = current else { continue };
        let cell = |idx: usize| row.get(idx).map(|c| c.trim().to_string()).unwrap_or_default();
        out.push(PickedRow {
            employee: first.trim().to_string(),
            date,
            swipe_in: cell(picks.swipe_in),
            swipe_out: cell(picks.swipe_out),
            work_hours: cell(picks.work_hours),
        });
    }
    out
}

fn normalize_row(row: PickedRow, badge_prefix: &str) -> RawAttendanceRow {
    let work_hours = non_empty(row.work_hours);
    let reported_hours = work_hours.as_deref().and_then(hhmm_to_hours);
    RawAttendanceRow {
        employee_id: normalize_token(&row.employee, badge_prefix),
        date: row.date,
        swipe_in: normalize_time_cell(&row.swipe_in),
        swipe_out: normalize_time_cell(&row.swipe_out),
        work_hours,
        reported_hours,
    }
}

/// Uppercases the badge token and prepends the organizational prefix when
/// the export left it off.
fn normalize_token(raw: &str, badge_prefix: &str) -> String {
    let token = raw.trim().to_uppercase();
    if token.starts_with(badge_prefix) {
        token
    } else {
        format!("{}{}", badge_prefix, token)
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

/// Reduces a swipe cell to a bare `HH:MM` time of day. Source cells hold
/// full timestamps, `HH:MM:SS`, or `HH:MM`; any date component is
/// stripped. Unparseable text yields `None`.
pub fn normalize_time_cell(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%d-%b-%Y %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.time().format("%H:%M").to_string());
        }
    }
    const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];
    for fmt in TIME_FORMATS {
        if let Ok(t) = NaiveTime::parse_from_str(s, fmt) {
            return Some(t.format("%H:%M").to_string());
        }
    }
    None
}

/// Converts reported-hours text in `HH:MM` form to decimal hours rounded
/// to 2 places. Blank or unparseable text yields `None`.
pub fn hhmm_to_hours(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let mut parts = s.split(':');
    let hours: i64 = parts.next()?.trim().parse().ok()?;
    let minutes: i64 = parts.next()?.trim().parse().ok()?;
    Some(round2(hours as f64 + minutes as f64 / 60.0))
}

/// Parses a first-column cell as a calendar date. Day-first shapes are
/// assumed for slash and dash separated numeric dates; a trailing time
/// component is tolerated and discarded.
pub fn parse_date_cell(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%b-%Y", "%d-%b-%y", "%d/%m/%Y", "%d-%m-%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%d-%b-%Y %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
