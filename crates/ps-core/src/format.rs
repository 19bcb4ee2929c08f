//! Display formats shared by the e-mail and report boundaries

use chrono::{Datelike, NaiveDate};

/// Shown in place of a missing date
pub const MISSING_DATE: &str = "---";

/// PS number as `"NNN/YY"`: zero-padded to three digits, two-digit year of
/// the entry date, or of `today` when the order has no entry date.
pub fn format_ps_number(sequence_number: u64, entry_date: Option<NaiveDate>, today: NaiveDate) -> String {
    let year = entry_date.unwrap_or(today).year();
    format!("{:03}/{:02}", sequence_number, year.rem_euclid(100))
}

/// `dd/mm/yyyy`, or `"---"` when absent
pub fn format_br_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%d/%m/%Y").to_string(),
        None => MISSING_DATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_ps_number_uses_entry_year() {
        assert_eq!(format_ps_number(5, Some(date(2024, 3, 1)), date(2026, 1, 1)), "005/24");
        assert_eq!(format_ps_number(1234, Some(date(2023, 3, 1)), date(2026, 1, 1)), "1234/23");
    }

    #[test]
    fn test_ps_number_falls_back_to_today() {
        assert_eq!(format_ps_number(42, None, date(2026, 10, 19)), "042/26");
    }

    #[test]
    fn test_br_date() {
        assert_eq!(format_br_date(Some(date(2024, 3, 5))), "05/03/2024");
        assert_eq!(format_br_date(None), "---");
    }
}
