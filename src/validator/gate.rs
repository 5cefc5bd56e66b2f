//! Advisory acceptability gate.
//!
//! Runs a validator's dry-run acceptability check against a proposed
//! configuration without registering anything. The gate is only ever used
//! on throwaway instances that are discarded afterward, whatever the
//! outcome.

use super::Validator;
use crate::config::ValidatorConfig;

/// Separator used when joining rejection reasons into one diagnostic.
pub const REASON_SEPARATOR: &str = ".  ";

/// Runs the instance's acceptability check with the proposed configuration.
///
/// Returns the rejection reasons in the order the validator produced them.
/// Never mutates the instance or any global state.
pub fn check_acceptable(
    validator: &dyn Validator,
    config: &ValidatorConfig,
) -> Result<(), Vec<String>> {
    let mut reasons = Vec::new();
    if validator.check_acceptable(config, &mut reasons) {
        Ok(())
    } else {
        if reasons.is_empty() {
            reasons.push("configuration rejected without a stated reason".to_string());
        }
        Err(reasons)
    }
}

/// Joins rejection reasons into a single diagnostic message, preserving
/// production order.
pub fn join_reasons(reasons: &[String]) -> String {
    reasons.join(REASON_SEPARATOR)
}
