use crate::{FieldErrors, FieldsError, Result};
use tracing::debug;

/// Accumulating validator for submitted form values.
///
/// Each rule records its message against the field and keeps going, so a
/// single pass reports every problem with the submission.
#[derive(Debug, Default)]
pub struct FieldValidator {
    errors: FieldErrors,
}

impl FieldValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a value that is present and not blank.
    ///
    /// Returns the untrimmed value when it passes, so later rules see exactly
    /// what was submitted.
    pub fn required<'v>(
        &mut self,
        field: &str,
        value: Option<&'v str>,
        message: &str,
    ) -> Option<&'v str> {
        match value {
            Some(v) if !v.trim().is_empty() => Some(v),
            _ => {
                self.errors.add(field, message);
                None
            }
        }
    }

    /// Require a character count of at least `min`.
    pub fn min_length(&mut self, field: &str, value: &str, min: usize, message: &str) -> bool {
        let ok = value.chars().count() >= min;
        if !ok {
            self.errors.add(field, message);
        }
        ok
    }

    /// Require a character count of at most `max`.
    pub fn max_length(&mut self, field: &str, value: &str, max: usize, message: &str) -> bool {
        let ok = value.chars().count() <= max;
        if !ok {
            self.errors.add(field, message);
        }
        ok
    }

    /// Require a value that parses as an integer id.
    pub fn integer(&mut self, field: &str, value: Option<&str>, message: &str) -> Option<i64> {
        match value.map(str::trim).and_then(|v| v.parse::<i64>().ok()) {
            Some(id) => Some(id),
            None => {
                self.errors.add(field, message);
                None
            }
        }
    }

    /// Finish validation, returning every recorded message on failure.
    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            debug!("Validation failed for fields: {:?}", self.errors.field_names());
            Err(FieldsError::Invalid(self.errors))
        }
    }
}
