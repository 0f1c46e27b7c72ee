//! JSON file storage implementation.
//!
//! Stores one pretty-printed JSON file per goal under `<root>/goals/`. Writes
//! go to a temporary file first and are renamed into place so a crash never
//! leaves a half-written record behind.

use std::path::{Path, PathBuf};

use gymgoal_core::{GoalFilter, GoalId, GoalRecord};
use tokio::fs;
use tracing::debug;

use super::trait_::check_version;
use super::{Result, Storage, StorageError};

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the `goals/` directory.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("goals")).await?;
        debug!(root = %root.display(), "Opened JSON goal storage");
        Ok(Self { root })
    }

    /// Storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn goal_path(&self, id: GoalId) -> PathBuf {
        self.root.join("goals").join(format!("{}.json", id))
    }

    async fn write_goal(&self, goal: &GoalRecord) -> Result<()> {
        let path = self.goal_path(goal.id);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(goal)?;
        fs::write(&tmp, json.as_bytes()).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn insert_goal(&mut self, goal: &GoalRecord) -> Result<GoalRecord> {
        if fs::try_exists(self.goal_path(goal.id)).await? {
            return Err(StorageError::AlreadyExists(goal.id.to_string()));
        }

        let mut stored = goal.clone();
        stored.version = 1;
        self.write_goal(&stored).await?;
        debug!(goal = %stored.id, "Inserted goal");
        Ok(stored)
    }

    async fn update_goal(&mut self, goal: &GoalRecord) -> Result<GoalRecord> {
        let current: GoalRecord = read_json(&self.goal_path(goal.id))
            .await?
            .ok_or_else(|| StorageError::NotFound(goal.id.to_string()))?;
        check_version(&current, goal)?;

        let mut stored = goal.clone();
        stored.version = current.version + 1;
        self.write_goal(&stored).await?;
        debug!(goal = %stored.id, version = stored.version, "Updated goal");
        Ok(stored)
    }

    async fn load_goal(&self, id: GoalId) -> Result<Option<GoalRecord>> {
        read_json(&self.goal_path(id)).await
    }

    async fn list_goals(&self, filter: &GoalFilter) -> Result<Vec<GoalRecord>> {
        let all: Vec<GoalRecord> = list_dir(&self.root.join("goals")).await?;
        let mut goals: Vec<GoalRecord> = all.into_iter().filter(|g| filter.matches(g)).collect();
        goals.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(goals)
    }

    async fn delete_goal(&mut self, id: GoalId) -> Result<bool> {
        match fs::remove_file(self.goal_path(id)).await {
            Ok(()) => {
                debug!(goal = %id, "Deleted goal");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&entry.path()).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => tracing::warn!(path = %entry.path().display(), error = %e, "Skipping unreadable goal file"),
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_goal;
    use gymgoal_core::{GoalStatus, MemberId};

    #[tokio::test]
    async fn test_insert_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let goal = sample_goal("alice");
        let stored = storage.insert_goal(&goal).await.unwrap();
        assert_eq!(stored.version, 1);

        let loaded = storage.load_goal(goal.id).await.unwrap().unwrap();
        assert_eq!(loaded.title, goal.title);
        assert_eq!(loaded.milestones, goal.milestones);
        assert_eq!(loaded.version, 1);
    }

    #[tokio::test]
    async fn test_insert_twice_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let goal = sample_goal("alice");
        storage.insert_goal(&goal).await.unwrap();
        assert!(matches!(
            storage.insert_goal(&goal).await,
            Err(StorageError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let mut goal = storage.insert_goal(&sample_goal("alice")).await.unwrap();
        goal.current_value = 85.0;
        let updated = storage.update_goal(&goal).await.unwrap();
        assert_eq!(updated.version, 2);

        let loaded = storage.load_goal(goal.id).await.unwrap().unwrap();
        assert_eq!(loaded.current_value, 85.0);
        assert_eq!(loaded.version, 2);
    }

    #[tokio::test]
    async fn test_stale_update_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let first = storage.insert_goal(&sample_goal("alice")).await.unwrap();
        let second = first.clone();

        let mut a = first;
        a.current_value = 88.0;
        storage.update_goal(&a).await.unwrap();

        let mut b = second;
        b.current_value = 70.0;
        match storage.update_goal(&b).await {
            Err(StorageError::VersionConflict { expected, found }) => {
                assert_eq!(expected, 1);
                assert_eq!(found, 2);
            }
            other => panic!("expected conflict, got {:?}", other.map(|g| g.version)),
        }

        let loaded = storage.load_goal(b.id).await.unwrap().unwrap();
        assert_eq!(loaded.current_value, 88.0);
    }

    #[tokio::test]
    async fn test_update_missing_goal() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        assert!(matches!(
            storage.update_goal(&sample_goal("alice")).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_filters() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        storage.insert_goal(&sample_goal("alice")).await.unwrap();
        let mut done = sample_goal("alice");
        done.status = GoalStatus::Completed;
        storage.insert_goal(&done).await.unwrap();
        storage.insert_goal(&sample_goal("bob")).await.unwrap();

        let all = storage.list_goals(&GoalFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let alice_active = storage
            .list_goals(&GoalFilter {
                member_id: Some(MemberId::new("alice")),
                status: Some(vec![GoalStatus::Active]),
            })
            .await
            .unwrap();
        assert_eq!(alice_active.len(), 1);
        assert_eq!(alice_active[0].member_id.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let goal = storage.insert_goal(&sample_goal("alice")).await.unwrap();
        assert!(storage.delete_goal(goal.id).await.unwrap());
        assert!(!storage.delete_goal(goal.id).await.unwrap());
        assert!(storage.load_goal(goal.id).await.unwrap().is_none());
    }
}
