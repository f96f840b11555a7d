//! Date normalization to the DD/MM/YYYY presentation format.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

const INPUT_FORMATS: [&str; 4] = ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d", "%m/%d/%Y"];

lazy_static! {
    // Spanish long form: "15 de mayo de 1990"
    static ref SPANISH_LONG: Regex =
        Regex::new(r"(\d{1,2})\s+de\s+(\w+)\s+de\s+(\d{4})").unwrap();
}

/// Normalize a date string to `DD/MM/YYYY`.
///
/// Accepts the common numeric layouts and the Spanish long form. Returns
/// None when nothing parses; callers omit the field in that case.
pub fn normalize_date(raw: &str) -> Option<String> {
    let trimmed = raw.trim();

    for format in INPUT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date.format("%d/%m/%Y").to_string());
        }
    }

    spanish_long_form(trimmed)
}

fn spanish_long_form(raw: &str) -> Option<String> {
    let lower = raw.to_lowercase();
    let caps = SPANISH_LONG.captures(&lower)?;
    let month = spanish_month_number(&caps[2])?;
    Some(format!("{:0>2}/{}/{}", &caps[1], month, &caps[3]))
}

fn spanish_month_number(name: &str) -> Option<&'static str> {
    match name {
        "enero" => Some("01"),
        "febrero" => Some("02"),
        "marzo" => Some("03"),
        "abril" => Some("04"),
        "mayo" => Some("05"),
        "junio" => Some("06"),
        "julio" => Some("07"),
        "agosto" => Some("08"),
        "septiembre" => Some("09"),
        "octubre" => Some("10"),
        "noviembre" => Some("11"),
        "diciembre" => Some("12"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_is_idempotent_on_target_format() {
        assert_eq!(normalize_date("15/05/1990"), Some("15/05/1990".to_string()));
    }

    #[test]
    fn test_normalize_dashed_date() {
        assert_eq!(normalize_date("31-12-2023"), Some("31/12/2023".to_string()));
    }

    #[test]
    fn test_normalize_iso_date() {
        assert_eq!(normalize_date("1990-05-15"), Some("15/05/1990".to_string()));
    }

    #[test]
    fn test_normalize_pads_day_and_month() {
        assert_eq!(normalize_date("5/3/1990"), Some("05/03/1990".to_string()));
    }

    #[test]
    fn test_normalize_spanish_long_form() {
        assert_eq!(
            normalize_date("15 de mayo de 1990"),
            Some("15/05/1990".to_string())
        );
        assert_eq!(
            normalize_date("3 de Septiembre de 2021"),
            Some("03/09/2021".to_string())
        );
    }

    #[test]
    fn test_normalize_rejects_unknown_month() {
        assert_eq!(normalize_date("15 de maio de 1990"), None);
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert_eq!(normalize_date("sin fecha"), None);
        assert_eq!(normalize_date("99/99/2024"), None);
    }
}
