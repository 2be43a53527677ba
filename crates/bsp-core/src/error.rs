//! Generation errors

use thiserror::Error;

/// Errors surfaced by [`generate`](crate::generate)
///
/// Generation itself is total over a valid configuration; the only failure is
/// a configuration rejected before any random draw.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DungeonError {
    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

impl DungeonError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        DungeonError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

/// Result alias for generation
pub type DungeonResult<T> = Result<T, DungeonError>;
