//! Storage trait abstraction.

use async_trait::async_trait;
use gymgoal_core::{GoalFilter, GoalId, GoalRecord};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Item already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The record changed since it was read
    #[error("Version conflict: expected {expected}, found {found}")]
    VersionConflict {
        /// Version the writer last read
        expected: u64,
        /// Version currently stored
        found: u64,
    },
}

/// Storage abstraction for goal records.
///
/// Writes are versioned: every stored record carries a version that storage
/// bumps on each write, and updates must present the version they read.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Insert a new goal. The stored copy gets version 1.
    async fn insert_goal(&mut self, goal: &GoalRecord) -> Result<GoalRecord>;

    /// Replace a goal whose stored version equals `goal.version`.
    ///
    /// Returns the stored copy with its bumped version.
    async fn update_goal(&mut self, goal: &GoalRecord) -> Result<GoalRecord>;

    /// Load a goal by ID.
    async fn load_goal(&self, id: GoalId) -> Result<Option<GoalRecord>>;

    /// List goals matching the filter, oldest first.
    async fn list_goals(&self, filter: &GoalFilter) -> Result<Vec<GoalRecord>>;

    /// Delete a goal. Returns whether anything was removed.
    async fn delete_goal(&mut self, id: GoalId) -> Result<bool>;
}

/// Check the presented version against the stored one.
pub(crate) fn check_version(stored: &GoalRecord, presented: &GoalRecord) -> Result<()> {
    if stored.version != presented.version {
        tracing::warn!(
            goal = %presented.id,
            expected = presented.version,
            found = stored.version,
            "Rejected stale goal write"
        );
        return Err(StorageError::VersionConflict {
            expected: presented.version,
            found: stored.version,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let conflict = StorageError::VersionConflict { expected: 3, found: 5 };
        assert_eq!(conflict.to_string(), "Version conflict: expected 3, found 5");
        assert_eq!(StorageError::NotFound("g1".to_string()).to_string(), "Not found: g1");
        assert_eq!(
            StorageError::AlreadyExists("g1".to_string()).to_string(),
            "Already exists: g1"
        );
    }
}
