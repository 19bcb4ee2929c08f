//! Dashboard filter criteria

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::ServiceOrder;

/// Selector values the dashboard uses to mean "no restriction"
pub const WILDCARD_TOKENS: &[&str] = &["TODAS", "TODOS"];

/// User-selected narrowing criteria. `None` on any field is the wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Inclusive lower bound on the entry date
    pub start_date: Option<NaiveDate>,

    /// Inclusive upper bound on the entry date
    pub end_date: Option<NaiveDate>,

    /// Exact requesting organization
    pub organization: Option<String>,

    /// Exact status label
    pub status: Option<String>,

    /// Exact workshop
    pub workshop: Option<String>,
}

impl FilterSpec {
    /// Filter that lets everything through
    pub fn all() -> Self {
        Self::default()
    }

    /// Convert a selector value into a criterion; blank and wildcard tokens mean "all"
    pub fn selector(value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() || WILDCARD_TOKENS.contains(&trimmed) {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Parse a date input in ISO form (`YYYY-MM-DD`); blank or invalid input clears the bound
    pub fn date_bound(value: &str) -> Option<NaiveDate> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_workshop(mut self, workshop: impl Into<String>) -> Self {
        self.workshop = Some(workshop.into());
        self
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Whether either date bound is set
    pub fn is_date_bounded(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// Whether a record satisfies every non-wildcard criterion.
    ///
    /// Once a date bound is set, a record without an entry date fails.
    pub fn matches(&self, order: &ServiceOrder) -> bool {
        let field_matches = |criterion: &Option<String>, value: &str| {
            criterion.as_deref().map_or(true, |expected| expected == value)
        };

        if !field_matches(&self.organization, &order.organization)
            || !field_matches(&self.status, &order.status)
            || !field_matches(&self.workshop, &order.workshop)
        {
            return false;
        }

        if !self.is_date_bounded() {
            return true;
        }

        match order.entry_date {
            Some(date) => {
                self.start_date.map_or(true, |start| date >= start)
                    && self.end_date.map_or(true, |end| date <= end)
            }
            None => false,
        }
    }

    /// One-line summary used in report headers
    pub fn describe(&self) -> String {
        format!(
            "OM: {} | Oficina: {} | Status: {}",
            self.organization.as_deref().unwrap_or(WILDCARD_TOKENS[0]),
            self.workshop.as_deref().unwrap_or(WILDCARD_TOKENS[0]),
            self.status.as_deref().unwrap_or(WILDCARD_TOKENS[1]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample_order;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_selector_wildcards() {
        assert_eq!(FilterSpec::selector("TODAS"), None);
        assert_eq!(FilterSpec::selector("TODOS"), None);
        assert_eq!(FilterSpec::selector("  "), None);
        assert_eq!(FilterSpec::selector("CFN"), Some("CFN".to_string()));
    }

    #[test]
    fn test_date_bound_parses_iso_dates() {
        assert_eq!(FilterSpec::date_bound("2024-03-01"), Some(date(2024, 3, 1)));
        assert_eq!(FilterSpec::date_bound(""), None);
        assert_eq!(FilterSpec::date_bound("01/03/2024"), None);
    }

    #[test]
    fn test_undated_record_fails_once_any_bound_is_set() {
        let order = sample_order(1, "OM");
        assert!(FilterSpec::all().matches(&order));
        assert!(!FilterSpec::all()
            .with_date_range(Some(date(2024, 1, 1)), None)
            .matches(&order));
        assert!(!FilterSpec::all()
            .with_date_range(None, Some(date(2024, 12, 31)))
            .matches(&order));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let mut order = sample_order(1, "OM");
        order.entry_date = Some(date(2024, 3, 15));
        let spec = FilterSpec::all().with_date_range(Some(date(2024, 3, 15)), Some(date(2024, 3, 15)));
        assert!(spec.matches(&order));
        let spec = FilterSpec::all().with_date_range(Some(date(2024, 3, 16)), None);
        assert!(!spec.matches(&order));
    }

    #[test]
    fn test_exact_field_criteria() {
        let mut order = sample_order(1, "CFN");
        order.status = "ORÇAR".to_string();
        order.workshop = "MECÂNICA".to_string();
        assert!(FilterSpec::all().with_organization("CFN").with_status("ORÇAR").matches(&order));
        assert!(!FilterSpec::all().with_workshop("ELÉTRICA").matches(&order));
        assert!(!FilterSpec::all().with_organization("cfn").matches(&order));
    }

    #[test]
    fn test_describe_uses_wildcard_tokens() {
        let spec = FilterSpec::all().with_workshop("MECÂNICA");
        assert_eq!(spec.describe(), "OM: TODAS | Oficina: MECÂNICA | Status: TODOS");
    }
}
