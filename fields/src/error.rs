use thiserror::Error;

use crate::FieldErrors;

pub type Result<T> = std::result::Result<T, FieldsError>;

#[derive(Error, Debug)]
pub enum FieldsError {
    #[error("Field validation failed for: {}", .0.field_names().join(", "))]
    Invalid(FieldErrors),
}

impl FieldsError {
    /// The field-level messages carried by this error.
    pub fn into_field_errors(self) -> FieldErrors {
        match self {
            FieldsError::Invalid(errors) => errors,
        }
    }
}
