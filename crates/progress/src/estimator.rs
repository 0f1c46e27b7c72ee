//! Deadline pacing for active goals.

use gymgoal_core::{GoalRecord, GoalStatus, Time};
use serde::{Deserialize, Serialize};

/// How a goal stands against its deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadlineAssessment {
    /// Whole days until the deadline (negative once past)
    pub days_remaining: i64,

    /// Deadline passed while the goal is still active
    pub overdue: bool,

    /// Distance left to the target, in the goal's unit
    pub remaining_change: f64,

    /// Change needed per day to finish on time, when there are days left
    pub required_rate_per_day: Option<f64>,
}

/// Deadline estimator.
///
/// Reports overdue goals but never changes their status.
#[derive(Debug, Default)]
pub struct DeadlineEstimator;

impl DeadlineEstimator {
    /// Assess a goal at `now`.
    pub fn assess(&self, goal: &GoalRecord, now: Time) -> DeadlineAssessment {
        let days_remaining = (goal.deadline - now).num_days();
        let remaining_change = if goal.status == GoalStatus::Completed {
            0.0
        } else {
            (goal.target_value - goal.current_value).abs()
        };

        let overdue = goal.status == GoalStatus::Active && goal.deadline < now;
        let required_rate_per_day = if days_remaining > 0 && remaining_change > 0.0 {
            Some(remaining_change / days_remaining as f64)
        } else {
            None
        };

        DeadlineAssessment {
            days_remaining,
            overdue,
            remaining_change,
            required_rate_per_day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{apply_progress_update, create_goal};
    use chrono::{Duration, TimeZone, Utc};
    use gymgoal_core::{GoalDraft, GoalType, MemberId};

    fn goal(now: Time, days: i64) -> GoalRecord {
        let draft = GoalDraft::new("Cut", GoalType::WeightLoss, 90.0, 70.0, now + Duration::days(days));
        create_goal(MemberId::new("m"), draft, now).unwrap()
    }

    #[test]
    fn test_on_track_rate() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let g = goal(now, 40);
        let a = DeadlineEstimator.assess(&g, now);
        assert_eq!(a.days_remaining, 40);
        assert!(!a.overdue);
        assert_eq!(a.remaining_change, 20.0);
        assert_eq!(a.required_rate_per_day, Some(0.5));
    }

    #[test]
    fn test_overdue_active_goal_stays_active() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let g = goal(now, 10);
        let later = now + Duration::days(15);
        let a = DeadlineEstimator.assess(&g, later);
        assert!(a.overdue);
        assert_eq!(a.days_remaining, -5);
        assert!(a.required_rate_per_day.is_none());
        assert_eq!(g.status, GoalStatus::Active);
    }

    #[test]
    fn test_completed_goal_not_overdue() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let mut g = goal(now, 10);
        apply_progress_update(&mut g, 70.0, now).unwrap();
        let a = DeadlineEstimator.assess(&g, now + Duration::days(30));
        assert!(!a.overdue);
        assert_eq!(a.remaining_change, 0.0);
    }
}
