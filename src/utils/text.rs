use std::collections::HashMap;

/// Converts a spreadsheet header label to snake_case.
///
/// "Employee ID" -> "employee_id", "Reporting Manager Name" ->
/// "reporting_manager_name". Punctuation is dropped, runs of spaces,
/// hyphens and underscores collapse to a single underscore.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
        } else if matches!(ch, ' ' | '-' | '_') {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
        }
    }
    out.trim_matches('_').to_string()
}

/// De-duplicates column names by appending a numeric suffix to repeats.
///
/// ["a", "b", "a"] -> ["a", "b", "a_1"]
pub fn dedup_names(names: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        match seen.get_mut(name) {
            Some(count) => {
                *count += 1;
                out.push(format!("{}_{}", name, count));
            }
            None => {
                seen.insert(name.clone(), 0);
                out.push(name.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_cases_roster_headers() {
        assert_eq!(to_snake_case("Employee ID"), "employee_id");
        assert_eq!(to_snake_case("Reporting Manager Name"), "reporting_manager_name");
        assert_eq!(to_snake_case("  Vertical Head - ID "), "vertical_head_id");
        assert_eq!(to_snake_case("Status"), "status");
    }

    #[test]
    fn snake_case_drops_punctuation() {
        assert_eq!(to_snake_case("Is Active?"), "is_active");
        assert_eq!(to_snake_case("Hours (Worked)"), "hours_worked");
    }

    #[test]
    fn dedup_appends_numeric_suffixes() {
        let names: Vec<String> = ["userid", "status", "userid", "userid"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(dedup_names(&names), vec!["userid", "status", "userid_1", "userid_2"]);
    }

    #[test]
    fn dedup_leaves_unique_names_alone() {
        let names: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(dedup_names(&names), vec!["a", "b", "c"]);
    }
}
