//! Lifecycle manager: the single writer of the validator registry.
//!
//! Keeps the identity → instance registry synchronized with the
//! configuration store. Mutations arrive serialized from the store's event
//! dispatcher; lookups may run concurrently from any number of threads and
//! never observe a half-inserted or half-removed entry.
//!
//! Activation is `resolve → instantiate → initialize → registry insert →
//! directory register`, in that order, and all-or-nothing: a failure at any
//! step leaves no trace in the registry or the directory. Retirement is
//! `directory deregister → registry remove → finalize`, so external lookups
//! stop returning an instance before it is finalized.

use std::sync::Arc;

use dashmap::DashMap;

use super::{DirectoryRegistrar, LifecycleError, Validator, ValidatorResolver, gate};
use crate::config::{ChangeListener, ChangeResult, ConfigStore, EntryId, ValidatorConfig};

pub struct LifecycleManager {
    registry: DashMap<EntryId, Arc<dyn Validator>>,
    resolver: Arc<ValidatorResolver>,
    directory: Arc<dyn DirectoryRegistrar>,
}

impl LifecycleManager {
    pub fn new(resolver: Arc<ValidatorResolver>, directory: Arc<dyn DirectoryRegistrar>) -> Self {
        Self {
            registry: DashMap::new(),
            resolver,
            directory,
        }
    }

    /// Installs the manager as the store's change listener and activates
    /// every enabled entry from the startup enumeration.
    ///
    /// One broken entry never blocks the others: its failure is logged and
    /// the entry is simply absent from the registry until a later
    /// configuration event retries it.
    pub fn start(self: &Arc<Self>, store: &ConfigStore) {
        store.register_listener(Arc::clone(self) as Arc<dyn ChangeListener>);

        for config in store.enumerate_existing() {
            if !config.enabled {
                continue;
            }
            if let Err(e) = self.activate(&config) {
                tracing::warn!(
                    entry = %config.id,
                    error = %e,
                    "Skipping validator that failed to activate at startup"
                );
            }
        }
    }

    /// Looks up the active instance for an entry, if any.
    pub fn get(&self, id: &EntryId) -> Option<Arc<dyn Validator>> {
        self.registry.get(id).map(|e| Arc::clone(e.value()))
    }

    pub fn is_active(&self, id: &EntryId) -> bool {
        self.registry.contains_key(id)
    }

    /// Ids of all active entries, sorted.
    pub fn active_ids(&self) -> Vec<EntryId> {
        let mut ids: Vec<EntryId> = self.registry.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Advisory check shared by the add and change pre-checks: a disabled
    /// entry is trivially acceptable; an enabled one must resolve,
    /// instantiate as a throwaway, and pass the gate.
    fn check_proposed(&self, config: &ValidatorConfig, reasons: &mut Vec<String>) -> bool {
        if !config.enabled {
            return true;
        }

        let throwaway = match self
            .resolver
            .resolve(&config.validator_type)
            .and_then(|descriptor| self.resolver.instantiate(descriptor))
        {
            Ok(instance) => instance,
            Err(e) => {
                reasons.push(e.to_string());
                return false;
            }
        };

        match gate::check_acceptable(throwaway.as_ref(), config) {
            Ok(()) => true,
            Err(mut rejection) => {
                reasons.append(&mut rejection);
                false
            }
        }
    }

    /// Brings an entry from configured to live. On any failure the
    /// constructed instance (if any) is dropped without being registered or
    /// finalized, since it was never activated.
    fn activate(&self, config: &ValidatorConfig) -> Result<(), LifecycleError> {
        let descriptor = self.resolver.resolve(&config.validator_type)?;
        let mut instance = self.resolver.instantiate(descriptor)?;

        instance
            .initialize(config)
            .map_err(|e| LifecycleError::Initialization {
                entry: config.id.clone(),
                type_id: config.validator_type.clone(),
                reason: e.to_string(),
            })?;

        let instance: Arc<dyn Validator> = Arc::from(instance);
        let previous = self
            .registry
            .insert(config.id.clone(), Arc::clone(&instance));
        debug_assert!(
            previous.is_none(),
            "activated entry '{}' while it was already registered",
            config.id
        );
        self.directory.register(&config.id, instance);

        tracing::debug!(entry = %config.id, type_id = %config.validator_type, "Validator activated");
        Ok(())
    }

    /// Takes an entry out of service: deregister, remove, then finalize the
    /// retired instance exactly once. No-op if the entry is absent.
    fn retire(&self, id: &EntryId) {
        self.directory.deregister(id);
        if let Some((_, validator)) = self.registry.remove(id) {
            validator.finalize();
            tracing::debug!(entry = %id, "Validator retired");
        }
    }
}

impl ChangeListener for LifecycleManager {
    fn is_add_acceptable(&self, config: &ValidatorConfig, reasons: &mut Vec<String>) -> bool {
        self.check_proposed(config, reasons)
    }

    fn apply_add(&self, config: &ValidatorConfig) -> ChangeResult {
        if !config.enabled {
            return ChangeResult::success();
        }

        match self.activate(config) {
            Ok(()) => ChangeResult::success(),
            Err(e) => {
                tracing::warn!(entry = %config.id, error = %e, "Validator add failed");
                ChangeResult::error(e.to_string())
            }
        }
    }

    fn is_delete_acceptable(&self, _config: &ValidatorConfig, _reasons: &mut Vec<String>) -> bool {
        // No in-use check is performed; deletions are unconditionally
        // accepted.
        true
    }

    fn apply_delete(&self, config: &ValidatorConfig) -> ChangeResult {
        self.retire(&config.id);
        ChangeResult::success()
    }

    fn is_change_acceptable(&self, config: &ValidatorConfig, reasons: &mut Vec<String>) -> bool {
        self.check_proposed(config, reasons)
    }

    fn apply_change(&self, config: &ValidatorConfig) -> ChangeResult {
        let existing = self.get(&config.id);

        if !config.enabled {
            if existing.is_some() {
                self.retire(&config.id);
            }
            return ChangeResult::success();
        }

        match existing {
            Some(live) => {
                if live.type_id() == config.validator_type {
                    // Parameter-only change: the live instance keeps running
                    // with its original parameters until an operator re-adds
                    // the entry.
                    ChangeResult::success().with_admin_action()
                } else {
                    self.retire(&config.id);
                    match self.activate(config) {
                        Ok(()) => ChangeResult::success(),
                        Err(e) => {
                            tracing::warn!(
                                entry = %config.id,
                                error = %e,
                                "Validator replacement failed after retiring the previous type"
                            );
                            ChangeResult::error(e.to_string())
                        }
                    }
                }
            }
            None => match self.activate(config) {
                Ok(()) => ChangeResult::success(),
                Err(e) => {
                    tracing::warn!(entry = %config.id, error = %e, "Validator enable failed");
                    ChangeResult::error(e.to_string())
                }
            },
        }
    }
}

impl std::fmt::Debug for LifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleManager")
            .field("active", &self.active_ids())
            .finish()
    }
}
