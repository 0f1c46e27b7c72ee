//! In-memory storage, used by tests and short-lived sessions.

use std::collections::HashMap;

use gymgoal_core::{GoalFilter, GoalId, GoalRecord};

use super::trait_::check_version;
use super::{Result, Storage, StorageError};

/// Storage backend that keeps goals in a map.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    goals: HashMap<GoalId, GoalRecord>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored goals.
    pub fn len(&self) -> usize {
        self.goals.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn insert_goal(&mut self, goal: &GoalRecord) -> Result<GoalRecord> {
        if self.goals.contains_key(&goal.id) {
            return Err(StorageError::AlreadyExists(goal.id.to_string()));
        }
        let mut stored = goal.clone();
        stored.version = 1;
        self.goals.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_goal(&mut self, goal: &GoalRecord) -> Result<GoalRecord> {
        let current = self
            .goals
            .get(&goal.id)
            .ok_or_else(|| StorageError::NotFound(goal.id.to_string()))?;
        check_version(current, goal)?;

        let mut stored = goal.clone();
        stored.version = current.version + 1;
        self.goals.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn load_goal(&self, id: GoalId) -> Result<Option<GoalRecord>> {
        Ok(self.goals.get(&id).cloned())
    }

    async fn list_goals(&self, filter: &GoalFilter) -> Result<Vec<GoalRecord>> {
        let mut goals: Vec<GoalRecord> = self
            .goals
            .values()
            .filter(|g| filter.matches(g))
            .cloned()
            .collect();
        goals.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(goals)
    }

    async fn delete_goal(&mut self, id: GoalId) -> Result<bool> {
        Ok(self.goals.remove(&id).is_some())
    }
}
