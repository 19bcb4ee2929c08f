//! Template payload for a budget-request e-mail

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use ps_core::format::{format_br_date, format_ps_number};
use ps_core::ServiceOrder;

use crate::directory::WorkshopDirectory;

/// Fields the e-mail template expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRequest {
    pub ps_number: String,
    pub om_name: String,
    pub workshop_name: String,
    pub description: String,
    pub entry_date: String,
    pub to_email: String,
}

impl BudgetRequest {
    /// Build the payload for `order`; `today` supplies the year when the entry date is missing
    pub fn for_order(order: &ServiceOrder, directory: &WorkshopDirectory, today: NaiveDate) -> Self {
        Self {
            ps_number: format_ps_number(order.sequence_number, order.entry_date, today),
            om_name: order.organization.clone(),
            workshop_name: order.workshop.clone(),
            description: order.description.clone(),
            entry_date: format_br_date(order.entry_date),
            to_email: directory.resolve(&order.workshop),
        }
    }
}
