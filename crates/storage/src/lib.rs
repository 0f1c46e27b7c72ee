//! Storage abstraction and implementations for goal records.
//!
//! This crate provides a trait-based storage interface with a JSON file
//! implementation and an in-memory one.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;

pub use trait_::{Storage, StorageError, Result};
pub use json_storage::JsonStorage;
pub use memory::MemoryStorage;

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{Duration, Utc};
    use gymgoal_core::{GoalId, GoalRecord, GoalStatus, GoalType, MemberId, Milestone};

    /// A 90 kg -> 70 kg weight loss goal.
    pub fn sample_goal(member: &str) -> GoalRecord {
        let now = Utc::now();
        let milestones = [(25, 85.0), (50, 80.0), (75, 75.0), (100, 70.0)]
            .into_iter()
            .map(|(percentage, value)| Milestone {
                percentage,
                value,
                achieved: false,
                achieved_at: None,
            })
            .collect();

        GoalRecord {
            id: GoalId::new(),
            member_id: MemberId::new(member),
            goal_type: GoalType::WeightLoss,
            title: "Lose 20 kg".to_string(),
            unit: "kg".to_string(),
            start_value: 90.0,
            current_value: 90.0,
            target_value: 70.0,
            deadline: now + Duration::days(120),
            status: GoalStatus::Active,
            progress: 0.0,
            milestones,
            notes: None,
            version: 0,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }
}
