//! Validator capability interface and lifecycle machinery.
//!
//! Every pluggable validator implements [`Validator`] statically; there is
//! no name-based method dispatch. Instances are initialized through `&mut`
//! on the freshly constructed box, then shared as `Arc<dyn Validator>` once
//! activated, after which only `&self` methods run.

mod error;
pub mod gate;
mod manager;
mod registrar;
mod resolver;

pub use error::{InitializationError, LifecycleError};
pub use manager::LifecycleManager;
pub use registrar::{DirectoryRegistrar, InProcessDirectory};
pub use resolver::{CAPABILITY_VALIDATOR, ValidatorDescriptor, ValidatorResolver};

use crate::config::ValidatorConfig;

/// The capability interface for pluggable validators.
///
/// Lifecycle contract:
/// - `initialize` runs exactly once, with the real configuration, before
///   the instance becomes visible to anyone else.
/// - `check_acceptable` is the advisory dry-run used by the pre-commit
///   gate; it must not mutate the instance or any global state.
/// - `finalize` runs exactly once, strictly after the instance has been
///   removed from the registry. Never called on an instance whose
///   activation failed.
pub trait Validator: Send + Sync {
    /// Symbolic identifier of this implementation type, matching the
    /// resolver's registration table.
    fn type_id(&self) -> &'static str;

    /// Initializes the instance from its configuration entry.
    fn initialize(&mut self, config: &ValidatorConfig) -> Result<(), InitializationError>;

    /// Dry-run acceptability check against a proposed configuration.
    /// Appends human-readable reasons on rejection.
    fn check_acceptable(&self, _config: &ValidatorConfig, _reasons: &mut Vec<String>) -> bool {
        true
    }

    /// Validates one candidate value, returning the rejection reason on
    /// failure.
    fn validate(&self, candidate: &str) -> Result<(), String>;

    /// Releases any resources held by the instance.
    fn finalize(&self) {}
}

impl std::fmt::Debug for dyn Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("type_id", &self.type_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopValidator;

    impl Validator for NoopValidator {
        fn type_id(&self) -> &'static str {
            "noop"
        }

        fn initialize(&mut self, _config: &ValidatorConfig) -> Result<(), InitializationError> {
            Ok(())
        }

        fn validate(&self, _candidate: &str) -> Result<(), String> {
            Ok(())
        }
    }

    #[test]
    fn test_default_check_acceptable() {
        let validator = NoopValidator;
        let config = ValidatorConfig::new("cn=Noop", "noop");
        let mut reasons = Vec::new();
        assert!(validator.check_acceptable(&config, &mut reasons));
        assert!(reasons.is_empty());
    }

    #[test]
    fn test_trait_object_safety() {
        let mut boxed: Box<dyn Validator> = Box::new(NoopValidator);
        let config = ValidatorConfig::new("cn=Noop", "noop");
        boxed.initialize(&config).unwrap();
        let shared: std::sync::Arc<dyn Validator> = std::sync::Arc::from(boxed);
        assert_eq!(shared.type_id(), "noop");
        assert!(shared.validate("anything").is_ok());
    }
}
