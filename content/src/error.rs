//! Error types for lifecycle operations

use database::DatabaseError;
use thiserror::Error;

/// Terminal failures of a lifecycle operation.
///
/// Validation problems and ordinary denials are not errors; they come back
/// as an [`Outcome`](crate::Outcome) with a view or a redirect.
#[derive(Error, Debug)]
pub enum ContentError {
    /// No record of this kind has the requested id
    #[error("{0} {1} not found")]
    NotFound(&'static str, i64),

    /// The caller holds no role that grants access to the board at all
    #[error("Access denied")]
    AccessDenied,

    /// The store failed or rejected a write
    #[error("Store failure: {0}")]
    Store(#[from] DatabaseError),
}

impl ContentError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(..))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ContentError::NotFound("Article", 7).to_string(),
            "Article 7 not found"
        );
        let store: ContentError = DatabaseError::Constraint("FOREIGN KEY constraint failed".into()).into();
        assert!(store.to_string().contains("FOREIGN KEY"));
        assert!(!store.is_not_found());
    }
}
