//! In-memory hierarchical configuration store.
//!
//! The store is the change source for the lifecycle manager: it holds the
//! configuration entries, delivers the startup enumeration, and drives the
//! add/delete/modify callbacks. Every apply is preceded by the paired
//! acceptability pre-check; a rejected change leaves the store untouched
//! and the apply callback is never invoked.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use super::{ChangeListener, ChangeResult, EntryId, ValidatorConfig};
use crate::validator::gate::join_reasons;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Change to entry '{entry}' rejected: {reasons}")]
    Rejected { entry: EntryId, reasons: String },

    #[error("Entry '{0}' already exists")]
    DuplicateEntry(EntryId),

    #[error("Entry '{0}' not found")]
    UnknownEntry(EntryId),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Configuration store holding validator entries keyed by [`EntryId`].
///
/// A single listener (the lifecycle manager) is installed at startup;
/// mutations are expected to arrive from one dispatcher at a time, while
/// reads may happen concurrently.
#[derive(Default)]
pub struct ConfigStore {
    entries: DashMap<EntryId, ValidatorConfig>,
    listener: OnceLock<Arc<dyn ChangeListener>>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store from a JSON array of entries.
    ///
    /// Seeding bypasses the listener protocol; activation of the seeded
    /// entries happens through the startup enumeration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let configs: Vec<ValidatorConfig> = serde_json::from_str(json)?;
        let store = Self::new();
        for config in configs {
            if store.entries.contains_key(&config.id) {
                return Err(ConfigError::DuplicateEntry(config.id));
            }
            store.entries.insert(config.id.clone(), config);
        }
        Ok(store)
    }

    /// Seeds a store from a JSON file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Installs the change listener. Only the first registration takes
    /// effect; later calls are ignored.
    pub fn register_listener(&self, listener: Arc<dyn ChangeListener>) {
        if self.listener.set(listener).is_err() {
            tracing::debug!("Change listener already registered; ignoring");
        }
    }

    /// Returns all entries, sorted by id.
    pub fn enumerate_existing(&self) -> Vec<ValidatorConfig> {
        let mut configs: Vec<ValidatorConfig> =
            self.entries.iter().map(|e| e.value().clone()).collect();
        configs.sort_by(|a, b| a.id.cmp(&b.id));
        configs
    }

    pub fn get(&self, id: &EntryId) -> Option<ValidatorConfig> {
        self.entries.get(id).map(|e| e.value().clone())
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds a new entry: pre-check, store, then apply.
    pub fn add(&self, config: ValidatorConfig) -> Result<ChangeResult, ConfigError> {
        if self.entries.contains_key(&config.id) {
            return Err(ConfigError::DuplicateEntry(config.id));
        }

        if let Some(listener) = self.listener.get() {
            let mut reasons = Vec::new();
            if !listener.is_add_acceptable(&config, &mut reasons) {
                return Err(ConfigError::Rejected {
                    entry: config.id,
                    reasons: join_reasons(&reasons),
                });
            }
            self.entries.insert(config.id.clone(), config.clone());
            Ok(listener.apply_add(&config))
        } else {
            self.entries.insert(config.id.clone(), config);
            Ok(ChangeResult::success())
        }
    }

    /// Deletes an entry: pre-check, remove, then apply.
    pub fn delete(&self, id: &EntryId) -> Result<ChangeResult, ConfigError> {
        let config = self
            .get(id)
            .ok_or_else(|| ConfigError::UnknownEntry(id.clone()))?;

        if let Some(listener) = self.listener.get() {
            let mut reasons = Vec::new();
            if !listener.is_delete_acceptable(&config, &mut reasons) {
                return Err(ConfigError::Rejected {
                    entry: id.clone(),
                    reasons: join_reasons(&reasons),
                });
            }
            self.entries.remove(id);
            Ok(listener.apply_delete(&config))
        } else {
            self.entries.remove(id);
            Ok(ChangeResult::success())
        }
    }

    /// Replaces an existing entry: pre-check on the proposed configuration,
    /// store, then apply.
    pub fn modify(&self, config: ValidatorConfig) -> Result<ChangeResult, ConfigError> {
        if !self.entries.contains_key(&config.id) {
            return Err(ConfigError::UnknownEntry(config.id));
        }

        if let Some(listener) = self.listener.get() {
            let mut reasons = Vec::new();
            if !listener.is_change_acceptable(&config, &mut reasons) {
                return Err(ConfigError::Rejected {
                    entry: config.id,
                    reasons: join_reasons(&reasons),
                });
            }
            self.entries.insert(config.id.clone(), config.clone());
            Ok(listener.apply_change(&config))
        } else {
            self.entries.insert(config.id.clone(), config);
            Ok(ChangeResult::success())
        }
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("entries", &self.entries.len())
            .field("listener", &self.listener.get().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Listener that rejects everything and counts applies.
    #[derive(Default)]
    struct RejectingListener {
        applies: AtomicUsize,
    }

    impl ChangeListener for RejectingListener {
        fn is_add_acceptable(&self, _: &ValidatorConfig, reasons: &mut Vec<String>) -> bool {
            reasons.push("add rejected".into());
            reasons.push("second reason".into());
            false
        }

        fn apply_add(&self, _: &ValidatorConfig) -> ChangeResult {
            self.applies.fetch_add(1, Ordering::SeqCst);
            ChangeResult::success()
        }

        fn is_delete_acceptable(&self, _: &ValidatorConfig, reasons: &mut Vec<String>) -> bool {
            reasons.push("delete rejected".into());
            false
        }

        fn apply_delete(&self, _: &ValidatorConfig) -> ChangeResult {
            self.applies.fetch_add(1, Ordering::SeqCst);
            ChangeResult::success()
        }

        fn is_change_acceptable(&self, _: &ValidatorConfig, reasons: &mut Vec<String>) -> bool {
            reasons.push("change rejected".into());
            false
        }

        fn apply_change(&self, _: &ValidatorConfig) -> ChangeResult {
            self.applies.fetch_add(1, Ordering::SeqCst);
            ChangeResult::success()
        }
    }

    fn config(id: &str) -> ValidatorConfig {
        ValidatorConfig::new(id, "length-based")
    }

    #[test]
    fn test_add_get_delete_without_listener() {
        let store = ConfigStore::new();
        assert!(store.is_empty());

        store.add(config("cn=A")).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.contains(&"cn=A".into()));

        store.delete(&"cn=A".into()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_duplicate_add() {
        let store = ConfigStore::new();
        store.add(config("cn=A")).unwrap();
        let result = store.add(config("cn=A"));
        assert!(matches!(result, Err(ConfigError::DuplicateEntry(_))));
    }

    #[test]
    fn test_delete_unknown() {
        let store = ConfigStore::new();
        let result = store.delete(&"cn=Missing".into());
        assert!(matches!(result, Err(ConfigError::UnknownEntry(_))));
    }

    #[test]
    fn test_modify_unknown() {
        let store = ConfigStore::new();
        let result = store.modify(config("cn=Missing"));
        assert!(matches!(result, Err(ConfigError::UnknownEntry(_))));
    }

    #[test]
    fn test_rejected_change_never_applied() {
        let store = ConfigStore::new();
        let listener = Arc::new(RejectingListener::default());
        store.register_listener(listener.clone());

        let err = store.add(config("cn=A")).unwrap_err();
        assert!(err.to_string().contains("add rejected"));
        // Reasons joined in production order with the fixed separator.
        assert!(err.to_string().contains("add rejected.  second reason"));

        assert!(store.is_empty());
        assert_eq!(listener.applies.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_enumerate_sorted() {
        let store = ConfigStore::new();
        store.add(config("cn=C")).unwrap();
        store.add(config("cn=A")).unwrap();
        store.add(config("cn=B")).unwrap();

        let ids: Vec<String> = store
            .enumerate_existing()
            .into_iter()
            .map(|c| c.id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["cn=A", "cn=B", "cn=C"]);
    }

    #[test]
    fn test_from_json() {
        let store = ConfigStore::from_json(
            r#"[
                {"id": "cn=A", "enabled": true, "validator-type": "length-based"},
                {"id": "cn=B", "enabled": false, "validator-type": "repeated-characters"}
            ]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 2);
        assert!(!store.get(&"cn=B".into()).unwrap().enabled);
    }

    #[test]
    fn test_from_json_duplicate() {
        let result = ConfigStore::from_json(
            r#"[
                {"id": "cn=A", "enabled": true, "validator-type": "length-based"},
                {"id": "cn=A", "enabled": true, "validator-type": "length-based"}
            ]"#,
        );
        assert!(matches!(result, Err(ConfigError::DuplicateEntry(_))));
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(
            ConfigStore::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
