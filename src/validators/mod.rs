//! Built-in validator implementations.

mod length;
mod repeated;

pub use length::LengthBasedValidator;
pub use repeated::RepeatedCharactersValidator;

use crate::validator::{Validator, ValidatorDescriptor};

fn length_based_ctor() -> Result<Box<dyn Validator>, String> {
    Ok(Box::new(LengthBasedValidator::default()))
}

fn repeated_characters_ctor() -> Result<Box<dyn Validator>, String> {
    Ok(Box::new(RepeatedCharactersValidator::default()))
}

/// Descriptors for the built-in validator types.
pub fn builtin_descriptors() -> Vec<ValidatorDescriptor> {
    vec![
        ValidatorDescriptor::new(LengthBasedValidator::TYPE_ID, length_based_ctor),
        ValidatorDescriptor::new(RepeatedCharactersValidator::TYPE_ID, repeated_characters_ctor),
    ]
}
