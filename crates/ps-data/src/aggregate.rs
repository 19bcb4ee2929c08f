//! Aggregation over parsed service orders
//!
//! Every function here is pure: same input, same output, no hidden state.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use ps_core::{CalendarMonth, FilterSpec, ServiceOrder};

/// Service type marker for in-house ("orgânico") work
pub const IN_HOUSE_MARKER: &str = "org";

/// Service type marker for outsourced ("terceirizado") work
pub const OUTSOURCED_MARKER: &str = "ter";

/// Scalar KPIs over a filtered record set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiStats {
    pub total_count: usize,
    pub total_budget: f64,
    pub completed_count: usize,
    /// `total - completed - cancelled`; negative only when status accounting is inconsistent
    pub pending_count: i64,
    pub amended_count: usize,
    pub total_labor_hours: f64,
    pub in_house_count: usize,
    pub outsourced_count: usize,
    pub avg_lead_time_days: f64,
    pub avg_pending_indefinite_months: f64,
    /// Same value as `avg_lead_time_days`, kept for the summary card
    pub avg_lead_time: f64,
    /// Reported as zero even though records carry material values
    pub material_value: f64,
    /// Reported as zero even though records carry outsourced values
    pub third_party_value: f64,
}

/// One point of the monthly series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub month: CalendarMonth,
    /// Capitalized month name for chart axes
    pub label: String,
    pub count: usize,
    /// Sum of budget values
    pub total_value: f64,
}

/// Distinct selector values of the unfiltered dataset, sorted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub organizations: Vec<String>,
    pub statuses: Vec<String>,
    pub workshops: Vec<String>,
}

/// Everything the rendering layer needs for one filter state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub filtered: Vec<ServiceOrder>,
    pub kpis: KpiStats,
    pub monthly: Vec<MonthBucket>,
    pub status_distribution: IndexMap<String, usize>,
    pub options: FilterOptions,
}

/// Records that satisfy every criterion of `spec`, in source order
pub fn apply_filter(records: &[ServiceOrder], spec: &FilterSpec) -> Vec<ServiceOrder> {
    records
        .iter()
        .filter(|order| spec.matches(order))
        .cloned()
        .collect()
}

fn mean(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Compute KPI statistics. An empty input yields all zeros.
pub fn compute_kpis(records: &[ServiceOrder]) -> KpiStats {
    let total_count = records.len();
    let completed_count = records.iter().filter(|o| o.is_completed()).count();
    let cancelled_count = records.iter().filter(|o| o.is_cancelled()).count();
    let pending_count = total_count as i64 - completed_count as i64 - cancelled_count as i64;

    if pending_count < 0 {
        warn!(
            total_count,
            completed_count, cancelled_count, "Pending count is negative; status data is inconsistent"
        );
    }

    let lead_time_total: f64 = records
        .iter()
        .map(|o| f64::from(o.lead_time_days_to_workshop))
        .sum();
    let pending_months_total: f64 = records
        .iter()
        .map(|o| f64::from(o.pending_indefinite_months))
        .sum();
    let avg_lead_time_days = mean(lead_time_total, total_count);

    KpiStats {
        total_count,
        total_budget: records.iter().map(|o| o.budget_value).sum(),
        completed_count,
        pending_count,
        amended_count: records.iter().filter(|o| o.is_amended()).count(),
        total_labor_hours: records.iter().map(|o| o.labor_hours).sum(),
        in_house_count: records
            .iter()
            .filter(|o| o.service_type_contains(IN_HOUSE_MARKER))
            .count(),
        outsourced_count: records
            .iter()
            .filter(|o| o.service_type_contains(OUTSOURCED_MARKER))
            .count(),
        avg_lead_time_days,
        avg_pending_indefinite_months: mean(pending_months_total, total_count),
        avg_lead_time: avg_lead_time_days,
        material_value: 0.0,
        third_party_value: 0.0,
    }
}

/// Monthly series, always twelve entries in calendar order
pub fn group_by_month(records: &[ServiceOrder]) -> Vec<MonthBucket> {
    let mut buckets: Vec<MonthBucket> = CalendarMonth::ALL
        .iter()
        .map(|&month| MonthBucket {
            month,
            label: month.label(),
            count: 0,
            total_value: 0.0,
        })
        .collect();

    for order in records {
        if let Some(month) = order.entry_month {
            let bucket = &mut buckets[month.index()];
            bucket.count += 1;
            bucket.total_value += order.budget_value;
        }
    }

    buckets
}

/// Count per status, in order of first appearance
pub fn group_by_status(records: &[ServiceOrder]) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for order in records {
        *counts.entry(order.status.clone()).or_insert(0) += 1;
    }
    counts
}

/// Sorted distinct organizations, statuses and workshops
pub fn distinct_selectors(records: &[ServiceOrder]) -> FilterOptions {
    let mut organizations = BTreeSet::new();
    let mut statuses = BTreeSet::new();
    let mut workshops = BTreeSet::new();

    for order in records {
        organizations.insert(order.organization.clone());
        statuses.insert(order.status.clone());
        workshops.insert(order.workshop.clone());
    }

    FilterOptions {
        organizations: organizations.into_iter().collect(),
        statuses: statuses.into_iter().collect(),
        workshops: workshops.into_iter().collect(),
    }
}

/// Orders waiting for a budget, optionally narrowed to one workshop
pub fn budget_queue(records: &[ServiceOrder], workshop: Option<&str>) -> Vec<ServiceOrder> {
    records
        .iter()
        .filter(|o| o.awaits_budget())
        .filter(|o| workshop.map_or(true, |w| o.workshop == w))
        .cloned()
        .collect()
}

/// Number of orders waiting for a budget across the whole dataset
pub fn budget_queue_count(records: &[ServiceOrder]) -> usize {
    records.iter().filter(|o| o.awaits_budget()).count()
}

/// Run every projection for one filter state
pub fn build_view(records: &[ServiceOrder], spec: &FilterSpec) -> DashboardView {
    let filtered = apply_filter(records, spec);
    DashboardView {
        kpis: compute_kpis(&filtered),
        monthly: group_by_month(&filtered),
        status_distribution: group_by_status(&filtered),
        options: distinct_selectors(records),
        filtered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ps_core::status;

    fn order(ps: u64, om: &str, status: &str) -> ServiceOrder {
        ServiceOrder {
            organization: om.to_string(),
            sequence_number: ps,
            description: "Sem descrição".to_string(),
            status: status.to_string(),
            entry_date: None,
            exit_date: None,
            workshop: "MECÂNICA".to_string(),
            budget_value: 0.0,
            material_value: 0.0,
            third_party_service_value: 0.0,
            tax_rate: 0.0,
            labor_hours: 0.0,
            service_type: String::new(),
            amendment_note: String::new(),
            entry_month: None,
            lead_time_days_to_workshop: 0,
            pending_indefinite_months: 0,
        }
    }

    fn dated(mut o: ServiceOrder, y: i32, m: u32, d: u32) -> ServiceOrder {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        o.entry_date = Some(date);
        o.entry_month = Some(CalendarMonth::of_date(date));
        o
    }

    fn sample() -> Vec<ServiceOrder> {
        let mut a = dated(order(1, "CFN", status::COMPLETED), 2024, 1, 10);
        a.budget_value = 100.0;
        a.labor_hours = 4.0;
        a.service_type = "Orgânico".to_string();
        a.lead_time_days_to_workshop = 2;

        let mut b = dated(order(2, "CFN", status::TO_BUDGET), 2024, 3, 5);
        b.budget_value = 250.5;
        b.service_type = "TERCEIRIZADO".to_string();
        b.amendment_note = "aditivo".to_string();
        b.lead_time_days_to_workshop = 4;
        b.pending_indefinite_months = 3;

        let mut c = order(3, "BNRJ", status::CANCELLED);
        c.workshop = "ELÉTRICA".to_string();

        let d = dated(order(1, "BNRJ", "EXECUTANDO"), 2024, 3, 20);

        vec![a, b, c, d]
    }

    #[test]
    fn test_apply_filter_by_fields() {
        let records = sample();
        let spec = FilterSpec::all().with_organization("CFN");
        let filtered = apply_filter(&records, &spec);
        assert_eq!(filtered.len(), 2);

        let spec = FilterSpec::all().with_workshop("ELÉTRICA");
        assert_eq!(apply_filter(&records, &spec)[0].sequence_number, 3);
    }

    #[test]
    fn test_apply_filter_excludes_undated_records_when_bounded() {
        let records = sample();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1);
        let bounded = FilterSpec::all().with_date_range(start, None);
        let filtered = apply_filter(&records, &bounded);
        assert_eq!(filtered.len(), 3);
        assert!(filtered.iter().all(|o| o.entry_date.is_some()));

        assert_eq!(apply_filter(&records, &FilterSpec::all()).len(), 4);
    }

    #[test]
    fn test_apply_filter_does_not_mutate_input() {
        let records = sample();
        let before = records.clone();
        let _ = apply_filter(&records, &FilterSpec::all().with_status("ORÇAR"));
        assert_eq!(records, before);
    }

    #[test]
    fn test_compute_kpis() {
        let kpis = compute_kpis(&sample());
        assert_eq!(kpis.total_count, 4);
        assert_eq!(kpis.total_budget, 350.5);
        assert_eq!(kpis.completed_count, 1);
        assert_eq!(kpis.pending_count, 2);
        assert_eq!(kpis.amended_count, 1);
        assert_eq!(kpis.total_labor_hours, 4.0);
        assert_eq!(kpis.in_house_count, 1);
        assert_eq!(kpis.outsourced_count, 1);
        assert_eq!(kpis.avg_lead_time_days, 1.5);
        assert_eq!(kpis.avg_lead_time, kpis.avg_lead_time_days);
        assert_eq!(kpis.avg_pending_indefinite_months, 0.75);
        assert_eq!(kpis.material_value, 0.0);
        assert_eq!(kpis.third_party_value, 0.0);
    }

    #[test]
    fn test_compute_kpis_empty_is_all_zero() {
        assert_eq!(compute_kpis(&[]), KpiStats::default());
    }

    #[test]
    fn test_compute_kpis_is_idempotent() {
        let records = sample();
        let first = compute_kpis(&records);
        let second = compute_kpis(&records);
        assert_eq!(first.total_budget.to_bits(), second.total_budget.to_bits());
        assert_eq!(first.avg_lead_time_days.to_bits(), second.avg_lead_time_days.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn test_service_type_markers_are_not_exclusive() {
        let mut o = order(9, "OM", "EXECUTANDO");
        o.service_type = "orgânico/terceirizado".to_string();
        let kpis = compute_kpis(&[o]);
        assert_eq!(kpis.in_house_count, 1);
        assert_eq!(kpis.outsourced_count, 1);
    }

    #[test]
    fn test_group_by_month_always_twelve() {
        let empty = group_by_month(&[]);
        assert_eq!(empty.len(), 12);
        assert!(empty.iter().all(|b| b.count == 0 && b.total_value == 0.0));
        assert_eq!(empty[0].label, "Janeiro");
        assert_eq!(empty[11].month, CalendarMonth::December);

        let buckets = group_by_month(&sample());
        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0].count, 1);
        assert_eq!(buckets[0].total_value, 100.0);
        assert_eq!(buckets[2].count, 2);
        assert_eq!(buckets[2].total_value, 250.5);
        let bucketed: usize = buckets.iter().map(|b| b.count).sum();
        assert_eq!(bucketed, 3);
    }

    #[test]
    fn test_group_by_status_keeps_first_seen_order() {
        let mut records = sample();
        records.push(order(7, "CFN", status::COMPLETED));
        let counts = group_by_status(&records);
        let keys: Vec<&str> = counts.keys().map(String::as_str).collect();
        assert_eq!(keys, vec![status::COMPLETED, status::TO_BUDGET, status::CANCELLED, "EXECUTANDO"]);
        assert_eq!(counts[status::COMPLETED], 2);
        assert_eq!(group_by_status(&records), counts);
    }

    #[test]
    fn test_per_status_split_sums_to_total() {
        let records = sample();
        let base = FilterSpec::all().with_organization("CFN");
        let filtered = apply_filter(&records, &base);
        let total: usize = group_by_status(&filtered)
            .keys()
            .map(|s| apply_filter(&filtered, &base.clone().with_status(s.clone())).len())
            .sum();
        assert_eq!(total, filtered.len());
    }

    #[test]
    fn test_distinct_selectors_sorted() {
        let options = distinct_selectors(&sample());
        assert_eq!(options.organizations, vec!["BNRJ", "CFN"]);
        assert_eq!(options.workshops, vec!["ELÉTRICA", "MECÂNICA"]);
        assert_eq!(options.statuses.len(), 4);
    }

    #[test]
    fn test_budget_queue() {
        let mut records = sample();
        let mut extra = order(8, "BNRJ", status::TO_BUDGET);
        extra.workshop = "ELÉTRICA".to_string();
        records.push(extra);

        assert_eq!(budget_queue_count(&records), 2);
        assert_eq!(budget_queue(&records, None).len(), 2);
        let electrical = budget_queue(&records, Some("ELÉTRICA"));
        assert_eq!(electrical.len(), 1);
        assert_eq!(electrical[0].sequence_number, 8);
    }

    #[test]
    fn test_build_view_uses_unfiltered_options() {
        let records = sample();
        let view = build_view(&records, &FilterSpec::all().with_organization("CFN"));
        assert_eq!(view.filtered.len(), 2);
        assert_eq!(view.kpis.total_count, 2);
        assert_eq!(view.monthly.len(), 12);
        assert_eq!(view.options.organizations.len(), 2);
    }
}
