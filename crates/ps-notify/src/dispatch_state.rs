//! Persisted set of orders whose budget request was sent

use std::collections::BTreeSet;

use ps_core::RecordKey;

/// Keys (`"<ps>-<om>"`) of dispatched orders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchState {
    keys: BTreeSet<String>,
}

impl DispatchState {
    pub fn from_keys(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn is_dispatched(&self, key: &RecordKey) -> bool {
        self.keys.contains(&key.as_storage_key())
    }

    /// Returns `false` when the key was already marked
    pub fn mark(&mut self, key: &RecordKey) -> bool {
        self.keys.insert(key.as_storage_key())
    }

    /// Returns `false` when the key was not marked
    pub fn unmark(&mut self, key: &RecordKey) -> bool {
        self.keys.remove(&key.as_storage_key())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in persisted form
    pub fn to_keys(&self) -> Vec<String> {
        self.keys.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(ps: u64, om: &str) -> RecordKey {
        RecordKey {
            sequence_number: ps,
            organization: om.to_string(),
        }
    }

    #[test]
    fn test_mark_and_unmark() {
        let mut state = DispatchState::default();
        assert!(state.mark(&key(1, "CFN")));
        assert!(!state.mark(&key(1, "CFN")));
        assert!(state.is_dispatched(&key(1, "CFN")));
        assert!(!state.is_dispatched(&key(1, "BNRJ")));

        assert!(state.unmark(&key(1, "CFN")));
        assert!(!state.unmark(&key(1, "CFN")));
        assert!(state.is_empty());
    }

    #[test]
    fn test_keys_round_trip() {
        let state = DispatchState::from_keys(vec!["2-BNRJ".to_string(), "1-CFN".to_string()]);
        assert!(state.is_dispatched(&key(2, "BNRJ")));
        assert_eq!(state.to_keys(), vec!["1-CFN", "2-BNRJ"]);
        assert_eq!(state.len(), 2);
    }
}
