use chrono::NaiveDate;

use super::sheet::*;

fn export(lines: &[&str]) -> Vec<u8> {
    lines.join("\n").into_bytes()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A trimmed-down but structurally faithful swipe report: preamble,
/// sentinel + stacked header pair, day-marker rows, a blank column, and
/// a trailing summary footer.
fn sample_export() -> Vec<u8> {
    export(&[
        "Swipe Report,,,,,",
        "Generated On,12-Jan-2025,,,,",
        "User,Emp,,In-,Out-,Work",
        "ID,Status,,SPFID,SPFID,Hrs",
        "06-Jan-2025,,,,,",
        "1001,Active,,09:00,18:00,08:30",
        "1002,Active,,2025-01-06 09:15:00,2025-01-06 17:45:00,",
        "GCC2002,Active,,,,07:15",
        "07-Jan-2025,,,,,",
        "1001,Active,,09:05,,",
        "Total,,,,,3",
    ])
}

#[test]
fn parses_a_full_export() {
    let rows = parse_attendance_sheet(&sample_export(), "GCC").unwrap();
    assert_eq!(rows.len(), 4);

    let first = &rows[0];
    assert_eq!(first.employee_id, "GCC1001");
    assert_eq!(first.date, date(2025, 1, 6));
    assert_eq!(first.swipe_in.as_deref(), Some("09:00"));
    assert_eq!(first.swipe_out.as_deref(), Some("18:00"));
    assert_eq!(first.work_hours.as_deref(), Some("08:30"));
    assert_eq!(first.reported_hours, Some(8.5));
}

#[test]
fn strips_dates_from_timestamp_swipes() {
    let rows = parse_attendance_sheet(&sample_export(), "GCC").unwrap();
    let row = &rows[1];
    assert_eq!(row.employee_id, "GCC1002");
    assert_eq!(row.swipe_in.as_deref(), Some("09:15"));
    assert_eq!(row.swipe_out.as_deref(), Some("17:45"));
    assert_eq!(row.work_hours, None);
    assert_eq!(row.reported_hours, None);
}

#[test]
fn keeps_an_existing_badge_prefix() {
    let rows = parse_attendance_sheet(&sample_export(), "GCC").unwrap();
    let row = &rows[2];
    assert_eq!(row.employee_id, "GCC2002");
    assert_eq!(row.swipe_in, None);
    assert_eq!(row.swipe_out, None);
    assert_eq!(row.reported_hours, Some(7.25));
}

#[test]
fn forward_fills_dates_and_drops_marker_rows() {
    let rows = parse_attendance_sheet(&sample_export(), "GCC").unwrap();
    let last = &rows[3];
    assert_eq!(last.employee_id, "GCC1001");
    assert_eq!(last.date, date(2025, 1, 7));
    // no row is the marker or the footer itself
    assert!(rows.iter().all(|r| r.employee_id != "GCC06-JAN-2025"));
    assert!(rows.iter().all(|r| r.employee_id != "GCCTOTAL"));
}

#[test]
fn rejects_an_export_without_a_date_row() {
    let bytes = export(&[
        "User,In-,Out-,Work",
        "ID,SPFID,SPFID,Hrs",
        "1001,09:00,18:00,08:30",
    ]);
    let err = parse_attendance_sheet(&bytes, "GCC").unwrap_err();
    assert!(matches!(err, SheetError::NoDateRow));
}

#[test]
fn rejects_an_export_missing_an_essential_column() {
    let bytes = export(&[
        "User,In-,Out-",
        "ID,SPFID,SPFID",
        "06-Jan-2025,,",
        "1001,09:00,18:00",
        "Total,,",
    ]);
    let err = parse_attendance_sheet(&bytes, "GCC").unwrap_err();
    assert!(matches!(err, SheetError::MissingColumn("workhrs")));
}

#[test]
fn rejects_an_effectively_empty_export() {
    let err = parse_attendance_sheet(b",,\n,,\n", "GCC").unwrap_err();
    assert!(matches!(err, SheetError::Empty));
}

#[test]
fn deduplicates_colliding_header_names() {
    // two identical "remarks" columns must not shadow each other
    let bytes = export(&[
        "User,In-,Out-,Work,Remarks,Remarks",
        "ID,SPFID,SPFID,Hrs,,",
        "06-Jan-2025,,,,,",
        "1001,09:00,18:00,,note a,note b",
        "Total,,,,,",
    ]);
    let rows = parse_attendance_sheet(&bytes, "GCC").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].employee_id, "GCC1001");
}

#[test]
fn hhmm_text_converts_to_decimal_hours() {
    assert_eq!(hhmm_to_hours("08:30"), Some(8.5));
    assert_eq!(hhmm_to_hours("07:20"), Some(7.33));
    assert_eq!(hhmm_to_hours("07:20:15"), Some(7.33));
    assert_eq!(hhmm_to_hours("  09:00 "), Some(9.0));
    assert_eq!(hhmm_to_hours(""), None);
    assert_eq!(hhmm_to_hours("n/a"), None);
    assert_eq!(hhmm_to_hours("8.5"), None);
}

#[test]
fn date_cells_accept_the_common_export_shapes() {
    let expected = date(2025, 1, 6);
    for cell in [
        "2025-01-06",
        "06-Jan-2025",
        "06-Jan-25",
        "06/01/2025",
        "06-01-2025",
        "2025-01-06 00:00:00",
    ] {
        assert_eq!(parse_date_cell(cell), Some(expected), "cell {cell:?}");
    }
    assert_eq!(parse_date_cell("User ID"), None);
    assert_eq!(parse_date_cell("1001"), None);
}

#[test]
fn time_cells_normalize_to_hh_mm() {
    assert_eq!(normalize_time_cell("09:05"), Some("09:05".to_string()));
    assert_eq!(normalize_time_cell("09:05:59"), Some("09:05".to_string()));
    assert_eq!(
        normalize_time_cell("2025-01-06 18:30:00"),
        Some("18:30".to_string())
    );
    assert_eq!(normalize_time_cell("not a time"), None);
    assert_eq!(normalize_time_cell(""), None);
}
