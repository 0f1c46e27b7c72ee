//! Progress error type.

use gymgoal_core::{CoreError, GoalId};
use gymgoal_storage::StorageError;

/// Result alias for goal workflows.
pub type Result<T> = std::result::Result<T, ProgressError>;

/// Errors raised by goal workflows.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// Rejected input or unknown template
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage failure, including version conflicts
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// No goal with this ID
    #[error("Goal not found: {0}")]
    GoalNotFound(GoalId),
}
