//! Configuration entries and the change-notification contract.
//!
//! A [`ValidatorConfig`] is an immutable snapshot of one entry in the
//! hierarchical configuration store. The [`ChangeListener`] trait is the
//! seam between the store and the lifecycle manager: every apply callback
//! is paired with an acceptability pre-check that the store must call (and
//! honor) before applying the change.

mod store;

pub use store::{ConfigError, ConfigStore};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of one configuration entry (its path in the hierarchical store).
///
/// Totally ordered, and unique within the store and the registry at all
/// times. One entry maps to at most one live validator instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Immutable snapshot of one validator configuration entry.
///
/// `params` is opaque to the lifecycle manager; each validator type decodes
/// it during initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ValidatorConfig {
    pub id: EntryId,
    pub enabled: bool,
    pub validator_type: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl ValidatorConfig {
    pub fn new(id: impl Into<EntryId>, validator_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            validator_type: validator_type.into(),
            params: serde_json::Value::Null,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }
}

/// Outcome of applying one configuration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Success,
    Error,
}

/// Result record returned to the configuration change source.
///
/// `admin_action_required` signals a change that was accepted but not fully
/// applied to the live instance; an operator must follow up manually.
#[derive(Debug, Clone)]
pub struct ChangeResult {
    pub result_code: ResultCode,
    pub admin_action_required: bool,
    pub messages: Vec<String>,
}

impl ChangeResult {
    pub fn success() -> Self {
        Self {
            result_code: ResultCode::Success,
            admin_action_required: false,
            messages: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            result_code: ResultCode::Error,
            admin_action_required: false,
            messages: vec![message.into()],
        }
    }

    pub fn with_admin_action(mut self) -> Self {
        self.admin_action_required = true;
        self
    }

    pub fn is_success(&self) -> bool {
        self.result_code == ResultCode::Success
    }
}

/// Callbacks invoked by the configuration change source.
///
/// The source must call the paired `is_*_acceptable` pre-check before each
/// `apply_*` and reject the change locally when it returns false. Apply
/// callbacks are serialized by the source; they never run concurrently with
/// each other.
pub trait ChangeListener: Send + Sync {
    /// Pre-check for a new entry. Appends human-readable reasons on
    /// rejection.
    fn is_add_acceptable(&self, config: &ValidatorConfig, reasons: &mut Vec<String>) -> bool;

    fn apply_add(&self, config: &ValidatorConfig) -> ChangeResult;

    /// Pre-check for entry removal. Appends reasons on rejection.
    fn is_delete_acceptable(&self, config: &ValidatorConfig, reasons: &mut Vec<String>) -> bool;

    fn apply_delete(&self, config: &ValidatorConfig) -> ChangeResult;

    /// Pre-check for an entry modification, applied to the proposed
    /// configuration. Appends reasons on rejection.
    fn is_change_acceptable(&self, config: &ValidatorConfig, reasons: &mut Vec<String>) -> bool;

    fn apply_change(&self, config: &ValidatorConfig) -> ChangeResult;
}
