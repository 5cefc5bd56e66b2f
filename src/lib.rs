//! # validator-host
//!
//! Configuration-driven lifecycle manager for pluggable validation
//! extensions.
//!
//! The crate keeps a live, process-wide registry of validator instances
//! synchronized with a hierarchical configuration store that can change at
//! runtime: entries are discovered at startup, and add/delete/modify events
//! activate, retire, or replace instances without ever exposing a
//! half-mutated registry to concurrent readers.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use validator_host::{
//!     ConfigStore, InProcessDirectory, LifecycleManager, ValidatorConfig, ValidatorResolver,
//! };
//!
//! let directory = Arc::new(InProcessDirectory::new());
//! let manager = Arc::new(LifecycleManager::new(
//!     Arc::new(ValidatorResolver::with_builtins()),
//!     directory.clone(),
//! ));
//!
//! let store = ConfigStore::new();
//! manager.start(&store);
//!
//! store
//!     .add(
//!         ValidatorConfig::new("cn=Length,cn=Validators", "length-based")
//!             .params(serde_json::json!({"min-length": 8})),
//!     )
//!     .unwrap();
//!
//! let validator = directory.lookup(&"cn=Length,cn=Validators".into()).unwrap();
//! assert!(validator.validate("short").is_err());
//! assert!(validator.validate("long enough").is_ok());
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod validator;
pub mod validators;

// Re-exports for convenience
pub use config::{
    ChangeListener, ChangeResult, ConfigError, ConfigStore, EntryId, ResultCode, ValidatorConfig,
};
pub use validator::{
    CAPABILITY_VALIDATOR, DirectoryRegistrar, InProcessDirectory, InitializationError,
    LifecycleError, LifecycleManager, Validator, ValidatorDescriptor, ValidatorResolver,
};
pub use validators::{LengthBasedValidator, RepeatedCharactersValidator};
