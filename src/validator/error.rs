use crate::config::EntryId;

/// Error returned by [`Validator::initialize`](super::Validator::initialize).
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct InitializationError(pub String);

impl InitializationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Failures in the resolve → instantiate → initialize → register pipeline.
///
/// All of these surface either as a pre-check rejection (advisory path) or
/// as an error `ChangeResult` (apply path); none of them aborts the manager
/// or affects other entries.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("No validator type registered under '{type_id}'")]
    TypeNotFound { type_id: String },

    #[error("Type '{type_id}' provides capability '{found}', not the required '{required}'")]
    TypeMismatch {
        type_id: String,
        required: &'static str,
        found: &'static str,
    },

    #[error("Failed to construct validator '{type_id}': {reason}")]
    Instantiation { type_id: String, reason: String },

    #[error("Validator '{type_id}' failed to initialize for entry '{entry}': {reason}")]
    Initialization {
        entry: EntryId,
        type_id: String,
        reason: String,
    },

    #[error("Configuration for entry '{entry}' is not acceptable: {reasons}")]
    Rejected { entry: EntryId, reasons: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LifecycleError::TypeNotFound {
            type_id: "mystery".into(),
        };
        assert!(err.to_string().contains("mystery"));

        let err = LifecycleError::TypeMismatch {
            type_id: "storage-scheme".into(),
            required: "validator",
            found: "storage",
        };
        let msg = err.to_string();
        assert!(msg.contains("storage-scheme"));
        assert!(msg.contains("validator"));

        let err = LifecycleError::Initialization {
            entry: EntryId::from("cn=Broken"),
            type_id: "length-based".into(),
            reason: "min-length must be positive".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("cn=Broken"));
        assert!(msg.contains("min-length must be positive"));
    }

    #[test]
    fn test_initialization_error_display() {
        let err = InitializationError::new("bad params");
        assert_eq!(err.to_string(), "bad params");
    }
}
