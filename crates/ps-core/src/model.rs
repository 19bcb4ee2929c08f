//! Service order record model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarMonth;
use crate::status;

/// Placeholder organization for rows with a blank OM column
pub const UNKNOWN_ORGANIZATION: &str = "N/D";

/// Placeholder description for rows with a blank description column
pub const MISSING_DESCRIPTION: &str = "Sem descrição";

/// Placeholder workshop for rows with a blank workshop column
pub const UNKNOWN_WORKSHOP: &str = "N/A";

/// One service order ("PS") as read from the spreadsheet export.
///
/// Records are rebuilt in full on every refresh and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrder {
    /// Requesting organization (OM)
    pub organization: String,

    /// Order number, always positive
    pub sequence_number: u64,

    /// Free-text description of the work
    pub description: String,

    /// Uppercased status label; not a closed set
    pub status: String,

    /// Date the order entered the facility
    pub entry_date: Option<NaiveDate>,

    /// Date the order left the workshop
    pub exit_date: Option<NaiveDate>,

    /// Servicing workshop (oficina)
    pub workshop: String,

    /// Budgeted value
    pub budget_value: f64,

    /// Material value
    pub material_value: f64,

    /// Outsourced service value
    pub third_party_service_value: f64,

    /// Tax rate applied by the facility
    pub tax_rate: f64,

    /// Labor hours (HH)
    pub labor_hours: f64,

    /// Service type; classified later by substring
    pub service_type: String,

    /// Amendment note; presence marks the order as amended
    pub amendment_note: String,

    /// Month of entry, from the source column or derived from `entry_date`
    pub entry_month: Option<CalendarMonth>,

    /// Days taken to send the order to the workshop
    pub lead_time_days_to_workshop: u32,

    /// Months spent waiting in the indefinite-pending state
    pub pending_indefinite_months: u32,
}

/// Identity of a record: the same PS number recurs across organizations
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    pub sequence_number: u64,
    pub organization: String,
}

impl RecordKey {
    /// Composite string form used by persisted dispatch state (`"<ps>-<om>"`)
    pub fn as_storage_key(&self) -> String {
        format!("{}-{}", self.sequence_number, self.organization)
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.sequence_number, self.organization)
    }
}

impl ServiceOrder {
    /// Identity key of this record
    pub fn key(&self) -> RecordKey {
        RecordKey {
            sequence_number: self.sequence_number,
            organization: self.organization.clone(),
        }
    }

    /// Whether the amendment note carries any text
    pub fn is_amended(&self) -> bool {
        !self.amendment_note.trim().is_empty()
    }

    pub fn is_completed(&self) -> bool {
        self.status == status::COMPLETED
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == status::CANCELLED
    }

    /// Whether the order waits for a budget (`ORÇAR`)
    pub fn awaits_budget(&self) -> bool {
        self.status == status::TO_BUDGET
    }

    /// Case-insensitive substring test against the service type
    pub fn service_type_contains(&self, marker: &str) -> bool {
        self.service_type
            .to_lowercase()
            .contains(&marker.to_lowercase())
    }
}

#[cfg(test)]
pub(crate) fn sample_order(sequence_number: u64, organization: &str) -> ServiceOrder {
    ServiceOrder {
        organization: organization.to_string(),
        sequence_number,
        description: MISSING_DESCRIPTION.to_string(),
        status: status::UNSET.to_string(),
        entry_date: None,
        exit_date: None,
        workshop: UNKNOWN_WORKSHOP.to_string(),
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
