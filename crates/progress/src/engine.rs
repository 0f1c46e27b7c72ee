//! Goal progress engine.
//!
//! Pure functions over goal values: the milestone ladder, percentage
//! progress, direction-aware milestone checks, and the progress-update
//! workflow that applies them to a [`GoalRecord`].

use chrono::Duration;
use gymgoal_core::{
    ensure_finite, CoreError, Direction, GoalDraft, GoalId, GoalRecord, GoalStatus, GoalTemplate,
    GoalType, MemberId, Milestone, Result, Time,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Number of checkpoints on every ladder.
pub const MILESTONE_STEPS: u8 = 4;

/// Percentage at which a goal counts as complete.
pub const COMPLETE: f64 = 100.0;

/// Build the fixed 25/50/75/100% ladder between `start_value` and `target_value`.
pub fn generate_milestones(start_value: f64, target_value: f64) -> Result<Vec<Milestone>> {
    ensure_finite("start_value", start_value)?;
    ensure_finite("target_value", target_value)?;

    let total_change = target_value - start_value;
    Ok((1..=MILESTONE_STEPS)
        .map(|step| Milestone {
            percentage: step * (100 / MILESTONE_STEPS),
            // The last rung is the target itself; interpolating it can land an ulp off.
            value: if step == MILESTONE_STEPS {
                target_value
            } else {
                start_value + total_change * f64::from(step) / f64::from(MILESTONE_STEPS)
            },
            achieved: false,
            achieved_at: None,
        })
        .collect())
}

/// Percentage of the way from `start_value` to `target_value`, clamped to [0, 100].
///
/// Works for both directions since numerator and denominator flip sign
/// together. A goal whose start equals its target is 100% while the current
/// value sits on it and 0% otherwise.
pub fn calculate_progress(start_value: f64, current_value: f64, target_value: f64) -> Result<f64> {
    ensure_finite("start_value", start_value)?;
    ensure_finite("current_value", current_value)?;
    ensure_finite("target_value", target_value)?;

    let total_change = target_value - start_value;
    if total_change == 0.0 {
        return Ok(if current_value == start_value { COMPLETE } else { 0.0 });
    }

    let current_change = current_value - start_value;
    Ok((current_change / total_change * 100.0).clamp(0.0, COMPLETE))
}

/// Whether `current_value` has reached `milestone_value` for a goal of `goal_type`.
///
/// Direction comes from the goal type alone, never from start vs target.
pub fn is_milestone_reached(
    start_value: f64,
    current_value: f64,
    milestone_value: f64,
    goal_type: GoalType,
) -> Result<bool> {
    ensure_finite("start_value", start_value)?;
    ensure_finite("current_value", current_value)?;
    ensure_finite("milestone_value", milestone_value)?;

    Ok(match goal_type.direction() {
        Direction::Decreasing => current_value <= milestone_value,
        Direction::Increasing => current_value >= milestone_value,
    })
}

/// Pre-fill a goal draft from a template.
///
/// Start and current are zero; the member's actual metric is not consulted.
pub fn apply_template(template: &GoalTemplate, now: Time) -> Result<GoalDraft> {
    let deadline = now
        .checked_add_signed(Duration::days(i64::from(template.duration_days)))
        .ok_or_else(|| {
            CoreError::InvalidArgument(format!(
                "duration_days {} puts the deadline out of range",
                template.duration_days
            ))
        })?;

    Ok(GoalDraft {
        title: template.title.clone(),
        goal_type: template.goal_type,
        unit: template.unit.clone(),
        start_value: 0.0,
        current_value: 0.0,
        target_value: template.target_value,
        deadline,
        notes: None,
    })
}

/// Turn a submitted draft into a new active goal record with its ladder.
///
/// Milestones already satisfied by the draft's current value are marked
/// achieved at `now`.
pub fn create_goal(member_id: MemberId, draft: GoalDraft, now: Time) -> Result<GoalRecord> {
    if draft.title.trim().is_empty() {
        return Err(CoreError::InvalidArgument("title must not be empty".to_string()));
    }
    ensure_finite("current_value", draft.current_value)?;
    let milestones = generate_milestones(draft.start_value, draft.target_value)?;

    let mut goal = GoalRecord {
        id: GoalId::new(),
        member_id,
        goal_type: draft.goal_type,
        title: draft.title.trim().to_string(),
        unit: draft.unit,
        start_value: draft.start_value,
        current_value: draft.start_value,
        target_value: draft.target_value,
        deadline: draft.deadline,
        status: GoalStatus::Active,
        progress: 0.0,
        milestones,
        notes: draft.notes.filter(|n| !n.trim().is_empty()),
        version: 0,
        created_at: now,
        updated_at: now,
        completed_at: None,
    };
    apply_progress_update(&mut goal, draft.current_value, now)?;
    debug!(goal = %goal.id, member = %goal.member_id, "Created goal record");
    Ok(goal)
}

/// What a progress update changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    /// Progress after the update
    pub progress: f64,

    /// Percentages of milestones reached for the first time by this update
    pub newly_achieved: Vec<u8>,

    /// Whether this update moved the goal to completed
    pub just_completed: bool,
}

/// Record a new current value on a goal.
///
/// Milestones ratchet: once achieved they stay achieved with their original
/// timestamp, even if the value regresses. An active goal completes when
/// progress reaches 100; a completed goal never reverts.
pub fn apply_progress_update(goal: &mut GoalRecord, current_value: f64, now: Time) -> Result<UpdateOutcome> {
    let progress = calculate_progress(goal.start_value, current_value, goal.target_value)?;

    let mut newly_achieved = Vec::new();
    for milestone in goal.milestones.iter_mut().filter(|m| !m.achieved) {
        if is_milestone_reached(goal.start_value, current_value, milestone.value, goal.goal_type)? {
            milestone.achieved = true;
            milestone.achieved_at = Some(now);
            newly_achieved.push(milestone.percentage);
        }
    }

    goal.current_value = current_value;
    goal.progress = progress;
    goal.updated_at = now;

    let just_completed = goal.status == GoalStatus::Active && progress >= COMPLETE;
    if just_completed {
        // A finished goal has every rung behind it.
        for milestone in goal.milestones.iter_mut().filter(|m| !m.achieved) {
            milestone.achieved = true;
            milestone.achieved_at = Some(now);
            newly_achieved.push(milestone.percentage);
        }
        goal.status = GoalStatus::Completed;
        goal.completed_at = Some(now);
        info!(goal = %goal.id, "Goal completed");
    }
    newly_achieved.sort_unstable();

    for percentage in &newly_achieved {
        info!(goal = %goal.id, percentage, "Milestone achieved");
    }

    Ok(UpdateOutcome {
        progress,
        newly_achieved,
        just_completed,
    })
}
