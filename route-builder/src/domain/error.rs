//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from search and I/O errors.

use super::InvalidId;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Identifier failed validation
    #[error(transparent)]
    InvalidId(#[from] InvalidId),

    /// UTC offset outside the range chrono accepts
    #[error("invalid UTC offset: {0} seconds")]
    InvalidUtcOffset(i32),

    /// Run waypoints or availability are malformed
    #[error("invalid run: {0}")]
    InvalidRun(&'static str),

    /// Path has no segments
    #[error("path must have at least one segment")]
    EmptyPath,

    /// Consecutive path segments do not meet at the same stop
    #[error("path segments {0} and {1} are not connected")]
    DisconnectedPath(usize, usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::InvalidUtcOffset(100_000);
        assert_eq!(err.to_string(), "invalid UTC offset: 100000 seconds");

        let err = DomainError::InvalidRun("arrival after departure");
        assert_eq!(err.to_string(), "invalid run: arrival after departure");

        let err = DomainError::EmptyPath;
        assert_eq!(err.to_string(), "path must have at least one segment");

        let err = DomainError::DisconnectedPath(0, 1);
        assert_eq!(err.to_string(), "path segments 0 and 1 are not connected");

        let err: DomainError = crate::domain::PointId::new("").unwrap_err().into();
        assert_eq!(err.to_string(), "invalid identifier: point id cannot be empty");
    }
}
