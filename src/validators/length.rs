//! Length-based validation.

use serde::Deserialize;

use crate::config::ValidatorConfig;
use crate::validator::{InitializationError, Validator};

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct LengthParams {
    min_length: usize,
    /// 0 means no upper bound.
    max_length: usize,
}

impl Default for LengthParams {
    fn default() -> Self {
        Self {
            min_length: 6,
            max_length: 0,
        }
    }
}

impl LengthParams {
    fn from_config(config: &ValidatorConfig) -> Result<Self, String> {
        if config.params.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(config.params.clone()).map_err(|e| e.to_string())
    }

    fn bounds_conflict(&self) -> bool {
        self.max_length > 0 && self.min_length > self.max_length
    }
}

/// Rejects values shorter than a minimum or longer than a maximum length.
#[derive(Debug, Default)]
pub struct LengthBasedValidator {
    params: LengthParams,
}

impl LengthBasedValidator {
    pub const TYPE_ID: &'static str = "length-based";
}

impl Validator for LengthBasedValidator {
    fn type_id(&self) -> &'static str {
        Self::TYPE_ID
    }

    fn initialize(&mut self, config: &ValidatorConfig) -> Result<(), InitializationError> {
        let params = LengthParams::from_config(config).map_err(InitializationError::new)?;
        if params.bounds_conflict() {
            return Err(InitializationError::new(format!(
                "min-length ({}) exceeds max-length ({})",
                params.min_length, params.max_length
            )));
        }
        self.params = params;
        Ok(())
    }

    fn check_acceptable(&self, config: &ValidatorConfig, reasons: &mut Vec<String>) -> bool {
        match LengthParams::from_config(config) {
            Ok(params) if params.bounds_conflict() => {
                reasons.push(format!(
                    "min-length ({}) exceeds max-length ({})",
                    params.min_length, params.max_length
                ));
                false
            }
            Ok(_) => true,
            Err(e) => {
                reasons.push(format!("invalid length parameters: {e}"));
                false
            }
        }
    }

    fn validate(&self, candidate: &str) -> Result<(), String> {
        let length = candidate.chars().count();
        if length < self.params.min_length {
            return Err(format!(
                "value is shorter than the minimum length of {}",
                self.params.min_length
            ));
        }
        if self.params.max_length > 0 && length > self.params.max_length {
            return Err(format!(
                "value is longer than the maximum length of {}",
                self.params.max_length
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(params: serde_json::Value) -> LengthBasedValidator {
        let config = ValidatorConfig::new("cn=Length", LengthBasedValidator::TYPE_ID).params(params);
        let mut validator = LengthBasedValidator::default();
        validator.initialize(&config).unwrap();
        validator
    }

    #[test]
    fn test_defaults() {
        let validator = configured(serde_json::Value::Null);
        assert!(validator.validate("short").is_err());
        assert!(validator.validate("longer").is_ok());
        // No upper bound by default.
        assert!(validator.validate(&"x".repeat(500)).is_ok());
    }

    #[test]
    fn test_bounds() {
        let validator = configured(serde_json::json!({"min-length": 3, "max-length": 5}));
        assert!(validator.validate("ab").is_err());
        assert!(validator.validate("abc").is_ok());
        assert!(validator.validate("abcde").is_ok());
        assert!(validator.validate("abcdef").is_err());
    }

    #[test]
    fn test_multibyte_counts_chars_not_bytes() {
        let validator = configured(serde_json::json!({"min-length": 3}));
        assert!(validator.validate("äöü").is_ok());
    }

    #[test]
    fn test_min_over_max_rejected() {
        let config = ValidatorConfig::new("cn=Length", LengthBasedValidator::TYPE_ID)
            .params(serde_json::json!({"min-length": 9, "max-length": 4}));

        let mut validator = LengthBasedValidator::default();
        assert!(validator.initialize(&config).is_err());

        let mut reasons = Vec::new();
        assert!(!LengthBasedValidator::default().check_acceptable(&config, &mut reasons));
        assert!(reasons[0].contains("exceeds"));
    }

    #[test]
    fn test_unknown_param_rejected() {
        let config = ValidatorConfig::new("cn=Length", LengthBasedValidator::TYPE_ID)
            .params(serde_json::json!({"min-lenght": 3}));

        let mut validator = LengthBasedValidator::default();
        assert!(validator.initialize(&config).is_err());
    }
}
