//! Repeated-character validation.

use serde::Deserialize;

use crate::config::ValidatorConfig;
use crate::validator::{InitializationError, Validator};

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct RepeatedParams {
    /// Longest allowed run of the same character; 0 disables the check.
    max_consecutive_length: usize,
    case_sensitive_validation: bool,
}

impl Default for RepeatedParams {
    fn default() -> Self {
        Self {
            max_consecutive_length: 2,
            case_sensitive_validation: false,
        }
    }
}

/// Rejects values containing too many consecutive repeats of one character.
#[derive(Debug, Default)]
pub struct RepeatedCharactersValidator {
    params: RepeatedParams,
}

impl RepeatedCharactersValidator {
    pub const TYPE_ID: &'static str = "repeated-characters";

    fn longest_run(&self, candidate: &str) -> usize {
        let mut longest = 0;
        let mut run = 0;
        let mut previous: Option<char> = None;

        for mut c in candidate.chars() {
            if !self.params.case_sensitive_validation {
                c = c.to_ascii_lowercase();
            }
            if previous == Some(c) {
                run += 1;
            } else {
                run = 1;
                previous = Some(c);
            }
            longest = longest.max(run);
        }

        longest
    }
}

impl Validator for RepeatedCharactersValidator {
    fn type_id(&self) -> &'static str {
        Self::TYPE_ID
    }

    fn initialize(&mut self, config: &ValidatorConfig) -> Result<(), InitializationError> {
        if config.params.is_null() {
            self.params = RepeatedParams::default();
            return Ok(());
        }
        self.params = serde_json::from_value(config.params.clone())
            .map_err(|e| InitializationError::new(e.to_string()))?;
        Ok(())
    }

    fn check_acceptable(&self, config: &ValidatorConfig, reasons: &mut Vec<String>) -> bool {
        if config.params.is_null() {
            return true;
        }
        match serde_json::from_value::<RepeatedParams>(config.params.clone()) {
            Ok(_) => true,
            Err(e) => {
                reasons.push(format!("invalid repeated-characters parameters: {e}"));
                false
            }
        }
    }

    fn validate(&self, candidate: &str) -> Result<(), String> {
        if self.params.max_consecutive_length == 0 {
            return Ok(());
        }
        if self.longest_run(candidate) > self.params.max_consecutive_length {
            return Err(format!(
                "value contains more than {} consecutive repeats of the same character",
                self.params.max_consecutive_length
            ));
        }
        Ok(())
    }
}
