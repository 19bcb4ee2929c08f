//! Record parser for the spreadsheet CSV export
//!
//! The export is maintained by hand, so nothing here fails: every column has a
//! deterministic default. The only rule that removes data is the sequence
//! number filter, which drops rows whose PS number is not a positive integer.
//!
//! Numbers use the Brazilian convention (`1.234,56`) and dates are `DD/MM/YYYY`.

use chrono::NaiveDate;
use tracing::debug;

use ps_core::model::{MISSING_DESCRIPTION, UNKNOWN_ORGANIZATION, UNKNOWN_WORKSHOP};
use ps_core::{status, CalendarMonth, ServiceOrder};

/// Fixed column positions of the spreadsheet template
pub mod columns {
    pub const ORGANIZATION: usize = 0;
    pub const SEQUENCE_NUMBER: usize = 1;
    pub const DESCRIPTION: usize = 2;
    pub const STATUS: usize = 3;
    pub const ENTRY_DATE: usize = 4;
    pub const EXIT_DATE: usize = 5;
    pub const WORKSHOP: usize = 6;
    pub const BUDGET_VALUE: usize = 7;
    pub const MATERIAL_VALUE: usize = 8;
    pub const THIRD_PARTY_SERVICE_VALUE: usize = 9;
    pub const TAX_RATE: usize = 10;
    pub const LABOR_HOURS: usize = 11;
    pub const SERVICE_TYPE: usize = 12;
    pub const AMENDMENT_NOTE: usize = 13;
    pub const ENTRY_MONTH: usize = 14;
    pub const LEAD_TIME_DAYS_TO_WORKSHOP: usize = 15;
    pub const PENDING_INDEFINITE_MONTHS: usize = 16;
}

/// Split one CSV line into trimmed fields.
///
/// Quotes toggle the in-quote state and are dropped from the output; a comma
/// inside quotes belongs to the field. Escaped quotes are not supported.
pub fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// Parse a `DD/MM/YYYY` date. Calendar-invalid dates (31/04) are rejected.
pub fn parse_localized_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parts: Vec<&str> = trimmed.split('/').collect();
    if parts.len() != 3 {
        return None;
    }

    let day: u32 = parts[0].trim().parse().ok()?;
    let month: u32 = parts[1].trim().parse().ok()?;
    let year: i32 = parts[2].trim().parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a localized decimal (`.` thousands, `,` decimal).
///
/// Blank, unparseable, negative and non-finite input all yield `0.0`.
pub fn parse_localized_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let without_thousands: String = trimmed.chars().filter(|c| *c != '.').collect();
    let with_decimal_point = without_thousands.replacen(',', ".", 1);
    let cleaned: String = with_decimal_point
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    match leading_float(&cleaned) {
        Some(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

/// Longest prefix of `text` that reads as a decimal number
fn leading_float(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - int_start;

    let mut frac_digits = 0;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        frac_digits = frac_end - frac_start;
        if int_digits > 0 || frac_digits > 0 {
            end = frac_end;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    text[..end].parse().ok()
}

/// Parse the leading integer of a cell (`"12 dias"` reads as 12). Unparseable input is 0.
pub fn parse_leading_int(text: &str) -> i64 {
    let trimmed = text.trim();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digit_count = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digit_count == 0 {
        return 0;
    }

    match rest[..digit_count].parse::<i64>() {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) => 0,
    }
}

fn field(fields: &[String], index: usize) -> &str {
    fields.get(index).map(String::as_str).unwrap_or("")
}

fn text_or(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

fn non_negative_count(text: &str) -> u32 {
    u32::try_from(parse_leading_int(text).max(0)).unwrap_or(u32::MAX)
}

/// Map one split row onto a [`ServiceOrder`].
///
/// Returns `None` when the PS number is not a positive integer; every other
/// column falls back to its default. Missing trailing columns read as blank.
pub fn parse_row(fields: &[String]) -> Option<ServiceOrder> {
    use columns::*;

    let raw_sequence = parse_leading_int(field(fields, SEQUENCE_NUMBER));
    let sequence_number = match u64::try_from(raw_sequence) {
        Ok(n) if n > 0 => n,
        _ => return None,
    };

    let entry_date = parse_localized_date(field(fields, ENTRY_DATE));

    let month_cell = field(fields, ENTRY_MONTH);
    // Only a blank cell is derived from the date; unknown names stay unbucketed
    let entry_month = if month_cell.is_empty() {
        entry_date.map(CalendarMonth::of_date)
    } else {
        let month = CalendarMonth::from_name(month_cell);
        if month.is_none() {
            debug!(sequence_number, month = month_cell, "Non-canonical month");
        }
        month
    };

    let status_cell = field(fields, STATUS);
    let status = if status_cell.is_empty() {
        status::UNSET.to_string()
    } else {
        status_cell.to_uppercase()
    };

    Some(ServiceOrder {
        organization: text_or(field(fields, ORGANIZATION), UNKNOWN_ORGANIZATION),
        sequence_number,
        description: text_or(field(fields, DESCRIPTION), MISSING_DESCRIPTION),
        status,
        entry_date,
        exit_date: parse_localized_date(field(fields, EXIT_DATE)),
        workshop: text_or(field(fields, WORKSHOP), UNKNOWN_WORKSHOP),
        budget_value: parse_localized_number(field(fields, BUDGET_VALUE)),
        material_value: parse_localized_number(field(fields, MATERIAL_VALUE)),
        third_party_service_value: parse_localized_number(field(fields, THIRD_PARTY_SERVICE_VALUE)),
        tax_rate: parse_localized_number(field(fields, TAX_RATE)),
        labor_hours: parse_localized_number(field(fields, LABOR_HOURS)),
        service_type: field(fields, SERVICE_TYPE).to_string(),
        amendment_note: field(fields, AMENDMENT_NOTE).to_string(),
        entry_month,
        lead_time_days_to_workshop: non_negative_count(field(fields, LEAD_TIME_DAYS_TO_WORKSHOP)),
        pending_indefinite_months: non_negative_count(field(fields, PENDING_INDEFINITE_MONTHS)),
    })
}

/// Parse a full export: first non-blank line is the header, the rest are rows.
///
/// Accepts `\n`, `\r\n` and `\r` line endings. Row order is preserved.
pub fn parse_dataset(text: &str) -> Vec<ServiceOrder> {
    let lines: Vec<&str> = text
        .split(|c| c == '\n' || c == '\r')
        .filter(|line| !line.trim().is_empty())
        .collect();

    let data_lines = lines.len().saturating_sub(1);
    let records: Vec<ServiceOrder> = lines
        .iter()
        .skip(1)
        .filter_map(|line| parse_row(&split_row(line)))
        .collect();

    let dropped = data_lines - records.len();
    if dropped > 0 {
        debug!(dropped, "Dropped rows without a valid PS number");
    }

    records
}
