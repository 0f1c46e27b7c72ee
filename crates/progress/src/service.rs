//! Goal service - creation, progress updates and deletion over storage.

use chrono::Utc;
use gymgoal_core::{
    GoalDraft, GoalFilter, GoalId, GoalRecord, GoalStatus, MemberId, TemplateCatalog, Tier,
};
use gymgoal_storage::Storage;
use tracing::{debug, info};

use crate::engine::{self, UpdateOutcome};
use crate::error::{ProgressError, Result};

/// Result of a stored progress update.
#[derive(Debug, Clone)]
pub struct ProgressReport {
    /// The goal as stored after the update
    pub goal: GoalRecord,

    /// What the update changed
    pub outcome: UpdateOutcome,
}

/// Goal workflows backed by a storage implementation.
pub struct GoalService<S: Storage> {
    storage: S,
    catalog: TemplateCatalog,
}

impl<S: Storage> GoalService<S> {
    /// Create a service with the given storage and template catalog.
    pub fn new(storage: S, catalog: TemplateCatalog) -> Self {
        Self { storage, catalog }
    }

    /// Template catalog in use.
    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Create a goal from a submitted draft.
    pub async fn create_goal(&mut self, member_id: MemberId, draft: GoalDraft) -> Result<GoalRecord> {
        let goal = engine::create_goal(member_id, draft, Utc::now())?;
        let stored = self.storage.insert_goal(&goal).await?;
        info!(goal = %stored.id, member = %stored.member_id, goal_type = %stored.goal_type, "Goal created");
        Ok(stored)
    }

    /// Create a goal from the `index`-th template of `tier`.
    pub async fn create_from_template(
        &mut self,
        member_id: MemberId,
        tier: Tier,
        index: usize,
    ) -> Result<GoalRecord> {
        let template = self.catalog.get(tier, index)?;
        debug!(tier = %tier, index, title = %template.title, "Applying goal template");
        let draft = engine::apply_template(template, Utc::now())?;
        self.create_goal(member_id, draft).await
    }

    /// Record a new value for a goal.
    ///
    /// `expected_version` is the version the caller last read; the write is
    /// rejected with a version conflict if the goal changed since. `None`
    /// uses whatever version is stored now.
    pub async fn record_progress(
        &mut self,
        goal_id: GoalId,
        value: f64,
        expected_version: Option<u64>,
    ) -> Result<ProgressReport> {
        let mut goal = self.require_goal(goal_id).await?;
        if let Some(expected) = expected_version {
            goal.version = expected;
        }

        let outcome = engine::apply_progress_update(&mut goal, value, Utc::now())?;
        let goal = self.storage.update_goal(&goal).await?;
        debug!(goal = %goal.id, progress = outcome.progress, version = goal.version, "Progress recorded");
        Ok(ProgressReport { goal, outcome })
    }

    /// Load a goal.
    pub async fn get_goal(&self, goal_id: GoalId) -> Result<Option<GoalRecord>> {
        Ok(self.storage.load_goal(goal_id).await?)
    }

    /// List goals, optionally narrowed to one member and/or one status.
    pub async fn list_goals(
        &self,
        member_id: Option<MemberId>,
        status: Option<GoalStatus>,
    ) -> Result<Vec<GoalRecord>> {
        let filter = GoalFilter {
            member_id,
            status: status.map(|s| vec![s]),
        };
        Ok(self.storage.list_goals(&filter).await?)
    }

    /// Delete a goal in any state.
    pub async fn delete_goal(&mut self, goal_id: GoalId) -> Result<()> {
        if !self.storage.delete_goal(goal_id).await? {
            return Err(ProgressError::GoalNotFound(goal_id));
        }
        info!(goal = %goal_id, "Goal deleted");
        Ok(())
    }

    async fn require_goal(&self, goal_id: GoalId) -> Result<GoalRecord> {
        self.storage
            .load_goal(goal_id)
            .await?
            .ok_or(ProgressError::GoalNotFound(goal_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use gymgoal_core::GoalType;
    use gymgoal_storage::{JsonStorage, MemoryStorage, StorageError};

    fn service() -> GoalService<MemoryStorage> {
        GoalService::new(MemoryStorage::new(), TemplateCatalog::default())
    }

    fn draft() -> GoalDraft {
        GoalDraft::new("Lose 20 kg", GoalType::WeightLoss, 90.0, 70.0, Utc::now() + Duration::days(100))
    }

    #[tokio::test]
    async fn test_create_and_progress() {
        let mut svc = service();
        let goal = svc.create_goal(MemberId::new("alice"), draft()).await.unwrap();
        assert_eq!(goal.version, 1);

        let report = svc.record_progress(goal.id, 80.0, Some(goal.version)).await.unwrap();
        assert_eq!(report.outcome.progress, 50.0);
        assert_eq!(report.outcome.newly_achieved, vec![25, 50]);
        assert_eq!(report.goal.version, 2);
        assert_eq!(report.goal.status, GoalStatus::Active);

        let report = svc.record_progress(goal.id, 70.0, None).await.unwrap();
        assert!(report.outcome.just_completed);

        let stored = svc.get_goal(goal.id).await.unwrap().unwrap();
        assert_eq!(stored.status, GoalStatus::Completed);
        assert_eq!(stored.achieved_milestones(), 4);
    }

    #[tokio::test]
    async fn test_stale_version_rejected() {
        let mut svc = service();
        let goal = svc.create_goal(MemberId::new("alice"), draft()).await.unwrap();

        svc.record_progress(goal.id, 85.0, Some(goal.version)).await.unwrap();
        let err = svc.record_progress(goal.id, 75.0, Some(goal.version)).await.unwrap_err();
        assert!(matches!(
            err,
            ProgressError::Storage(StorageError::VersionConflict { expected: 1, found: 2 })
        ));

        let stored = svc.get_goal(goal.id).await.unwrap().unwrap();
        assert_eq!(stored.current_value, 85.0);
    }

    #[tokio::test]
    async fn test_progress_on_missing_goal() {
        let mut svc = service();
        let err = svc.record_progress(GoalId::new(), 1.0, None).await.unwrap_err();
        assert!(matches!(err, ProgressError::GoalNotFound(_)));
    }

    #[tokio::test]
    async fn test_nan_progress_rejected() {
        let mut svc = service();
        let goal = svc.create_goal(MemberId::new("alice"), draft()).await.unwrap();
        let err = svc.record_progress(goal.id, f64::NAN, None).await.unwrap_err();
        assert!(matches!(err, ProgressError::Core(_)));
    }

    #[tokio::test]
    async fn test_create_from_template() {
        let mut svc = service();
        let goal = svc
            .create_from_template(MemberId::new("bob"), Tier::Intermediate, 1)
            .await
            .unwrap();
        assert_eq!(goal.title, "Squat 100 kg");
        assert_eq!(goal.start_value, 0.0);
        assert_eq!(goal.target_value, 100.0);
        assert_eq!(goal.milestones[0].value, 25.0);

        let err = svc
            .create_from_template(MemberId::new("bob"), Tier::Advanced, 99)
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressError::Core(_)));
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let mut svc = service();
        let a = svc.create_goal(MemberId::new("alice"), draft()).await.unwrap();
        svc.create_goal(MemberId::new("bob"), draft()).await.unwrap();
        svc.record_progress(a.id, 70.0, None).await.unwrap();

        let alice = svc.list_goals(Some(MemberId::new("alice")), None).await.unwrap();
        assert_eq!(alice.len(), 1);
        let active = svc.list_goals(None, Some(GoalStatus::Active)).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].member_id.as_str(), "bob");

        svc.delete_goal(a.id).await.unwrap();
        assert!(matches!(
            svc.delete_goal(a.id).await,
            Err(ProgressError::GoalNotFound(_))
        ));
        assert_eq!(svc.storage().len(), 1);
    }

    #[tokio::test]
    async fn test_json_backed_service() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        let mut svc = GoalService::new(storage, TemplateCatalog::default());

        let goal = svc.create_goal(MemberId::new("alice"), draft()).await.unwrap();
        svc.record_progress(goal.id, 84.0, Some(1)).await.unwrap();

        let reopened = JsonStorage::new(dir.path()).await.unwrap();
        let svc = GoalService::new(reopened, TemplateCatalog::default());
        let stored = svc.get_goal(goal.id).await.unwrap().unwrap();
        assert_eq!(stored.current_value, 84.0);
        assert!(stored.milestones[0].achieved);
        assert_eq!(stored.version, 2);
    }
}
