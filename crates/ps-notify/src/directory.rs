//! Workshop e-mail directory
//!
//! Resolution order: saved override, built-in default, then a derived
//! `oficina.<slug>@marinha.mil.br` address.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::store::PersistentStore;
use crate::StoreError;

/// Domain used for derived workshop addresses
pub const DERIVED_EMAIL_DOMAIN: &str = "marinha.mil.br";

/// Built-in mapping of workshop name to address
pub const DEFAULT_WORKSHOP_EMAILS: &[(&str, &str)] = &[
    ("MECÂNICA", "oficina.mecanica@exemplo.mil.br"),
    ("CARPINTARIA", "oficina.carpintaria@exemplo.mil.br"),
    ("ELÉTRICA", "oficina.eletrica@exemplo.mil.br"),
    ("ESTRUTURA", "oficina.estrutura@exemplo.mil.br"),
    ("ELETRÔNICA", "oficina.eletronica@exemplo.mil.br"),
    ("METALURGIA", "oficina.metalurgia@exemplo.mil.br"),
];

/// Address for a workshop with no mapping
pub fn derived_address(workshop: &str) -> String {
    let slug: String = workshop
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("oficina.{}@{}", slug, DERIVED_EMAIL_DOMAIN)
}

/// Workshop name → destination address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkshopDirectory {
    addresses: BTreeMap<String, String>,
}

impl Default for WorkshopDirectory {
    fn default() -> Self {
        let addresses = DEFAULT_WORKSHOP_EMAILS
            .iter()
            .map(|(name, email)| (name.to_string(), email.to_string()))
            .collect();
        Self { addresses }
    }
}

impl WorkshopDirectory {
    /// Defaults with `overrides` layered on top
    pub fn with_overrides(overrides: BTreeMap<String, String>) -> Self {
        let mut directory = Self::default();
        directory.addresses.extend(overrides);
        directory
    }

    /// Load overrides from `store`. A failing store leaves the defaults in place.
    pub fn load(store: &dyn PersistentStore<BTreeMap<String, String>>) -> Self {
        match store.load() {
            Ok(overrides) => {
                info!(overrides = overrides.len(), "Loaded workshop e-mail overrides");
                Self::with_overrides(overrides)
            }
            Err(e) => {
                warn!("Could not load workshop e-mails, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Persist the full mapping
    pub fn save(&self, store: &dyn PersistentStore<BTreeMap<String, String>>) -> Result<(), StoreError> {
        store.save(&self.addresses)
    }

    /// Destination address for a workshop
    pub fn resolve(&self, workshop: &str) -> String {
        self.addresses
            .get(workshop)
            .filter(|email| !email.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| derived_address(workshop))
    }

    /// Edit one workshop's address
    pub fn set_address(&mut self, workshop: impl Into<String>, email: impl Into<String>) {
        self.addresses.insert(workshop.into(), email.into());
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.addresses.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
