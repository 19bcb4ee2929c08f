//! Month vocabulary used by the spreadsheet's "mês de entrada" column

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar month, named the way the spreadsheet names it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CalendarMonth {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl CalendarMonth {
    /// All months in calendar order
    pub const ALL: [CalendarMonth; 12] = [
        CalendarMonth::January,
        CalendarMonth::February,
        CalendarMonth::March,
        CalendarMonth::April,
        CalendarMonth::May,
        CalendarMonth::June,
        CalendarMonth::July,
        CalendarMonth::August,
        CalendarMonth::September,
        CalendarMonth::October,
        CalendarMonth::November,
        CalendarMonth::December,
    ];

    /// Canonical lowercase name (`"janeiro"` ... `"dezembro"`)
    pub fn name(self) -> &'static str {
        match self {
            CalendarMonth::January => "janeiro",
            CalendarMonth::February => "fevereiro",
            CalendarMonth::March => "março",
            CalendarMonth::April => "abril",
            CalendarMonth::May => "maio",
            CalendarMonth::June => "junho",
            CalendarMonth::July => "julho",
            CalendarMonth::August => "agosto",
            CalendarMonth::September => "setembro",
            CalendarMonth::October => "outubro",
            CalendarMonth::November => "novembro",
            CalendarMonth::December => "dezembro",
        }
    }

    /// Display label with the first letter capitalized (`"Março"`)
    pub fn label(self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Look up a canonical name; input is matched after trimming and lowercasing
    pub fn from_name(name: &str) -> Option<Self> {
        let needle = name.trim().to_lowercase();
        Self::ALL.iter().copied().find(|m| m.name() == needle)
    }

    /// Month of a calendar date
    pub fn of_date(date: NaiveDate) -> Self {
        // month0() is always 0..=11
        Self::ALL[date.month0() as usize]
    }

    /// Zero-based position in the calendar
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(CalendarMonth::from_name("MARÇO"), Some(CalendarMonth::March));
        assert_eq!(CalendarMonth::from_name(" dezembro "), Some(CalendarMonth::December));
        assert_eq!(CalendarMonth::from_name("marco"), None);
        assert_eq!(CalendarMonth::from_name(""), None);
    }

    #[test]
    fn test_of_date_and_index_agree() {
        let date = NaiveDate::from_ymd_opt(2024, 8, 31).unwrap();
        let month = CalendarMonth::of_date(date);
        assert_eq!(month, CalendarMonth::August);
        assert_eq!(month.index(), 7);
    }

    #[test]
    fn test_label_capitalizes_first_letter() {
        assert_eq!(CalendarMonth::March.label(), "Março");
        assert_eq!(CalendarMonth::January.label(), "Janeiro");
    }
}
