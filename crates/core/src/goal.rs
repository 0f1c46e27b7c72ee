//! Goal model - a member's tracked numeric objective with milestones.

use serde::{Deserialize, Serialize};
use crate::error::CoreError;
use crate::id::{GoalId, MemberId};
use crate::Time;

/// Whether progress means the tracked number goes up or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Higher values are closer to the target
    Increasing,
    /// Lower values are closer to the target
    Decreasing,
}

/// Kind of goal a member can track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// Reduce body weight
    WeightLoss,
    /// Gain muscle mass
    MuscleGain,
    /// Lift heavier
    Strength,
    /// Train longer
    Endurance,
    /// Reduce body fat percentage
    BodyFat,
    /// Member-defined metric
    Custom,
}

impl GoalType {
    /// All goal types, in catalog order.
    pub const ALL: [GoalType; 6] = [
        GoalType::WeightLoss,
        GoalType::MuscleGain,
        GoalType::Strength,
        GoalType::Endurance,
        GoalType::BodyFat,
        GoalType::Custom,
    ];

    /// Direction in which the metric moves as the member progresses.
    pub const fn direction(self) -> Direction {
        match self {
            GoalType::WeightLoss | GoalType::BodyFat => Direction::Decreasing,
            GoalType::MuscleGain
            | GoalType::Strength
            | GoalType::Endurance
            | GoalType::Custom => Direction::Increasing,
        }
    }

    /// Unit pre-filled on the creation form.
    pub const fn default_unit(self) -> &'static str {
        match self {
            GoalType::WeightLoss | GoalType::MuscleGain | GoalType::Strength => "kg",
            GoalType::Endurance => "min",
            GoalType::BodyFat => "%",
            GoalType::Custom => "",
        }
    }

    /// Snake-case tag used on the wire and on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            GoalType::WeightLoss => "weight_loss",
            GoalType::MuscleGain => "muscle_gain",
            GoalType::Strength => "strength",
            GoalType::Endurance => "endurance",
            GoalType::BodyFat => "body_fat",
            GoalType::Custom => "custom",
        }
    }
}

impl std::fmt::Display for GoalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GoalType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        GoalType::ALL
            .into_iter()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| CoreError::UnknownGoalType(s.to_string()))
    }
}

/// Goal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Goal is being worked on
    Active,
    /// Progress reached 100%
    Completed,
    /// Goal abandoned or missed. Nothing sets this automatically.
    Failed,
}

impl GoalStatus {
    /// Snake-case tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
            GoalStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(GoalStatus::Active),
            "completed" => Ok(GoalStatus::Completed),
            "failed" => Ok(GoalStatus::Failed),
            other => Err(CoreError::InvalidArgument(format!("unknown status: {}", other))),
        }
    }
}

/// One checkpoint on the way from start to target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Share of the total change (25, 50, 75 or 100)
    pub percentage: u8,

    /// Metric value at this checkpoint
    pub value: f64,

    /// Whether the checkpoint has ever been reached
    pub achieved: bool,

    /// When it was first reached
    pub achieved_at: Option<Time>,
}

/// A member's tracked objective.
///
/// `progress`, `milestones` and `status` are derived fields owned by the
/// progress engine; callers change a goal only through progress updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalRecord {
    /// Unique identifier
    pub id: GoalId,

    /// Owning member
    pub member_id: MemberId,

    /// Kind of goal
    pub goal_type: GoalType,

    /// Goal title
    pub title: String,

    /// Unit of start/current/target values
    pub unit: String,

    /// Value when the goal was created
    pub start_value: f64,

    /// Latest reported value
    pub current_value: f64,

    /// Value to reach
    pub target_value: f64,

    /// Target date
    pub deadline: Time,

    /// Goal status
    pub status: GoalStatus,

    /// Percentage complete (0-100)
    pub progress: f64,

    /// Fixed ladder at 25/50/75/100%
    pub milestones: Vec<Milestone>,

    /// Optional motivation or notes
    #[serde(default)]
    pub notes: Option<String>,

    /// Optimistic concurrency token, bumped by storage on every write
    #[serde(default)]
    pub version: u64,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,

    /// When status became completed
    #[serde(default)]
    pub completed_at: Option<Time>,
}

impl GoalRecord {
    /// Direction of this goal's metric.
    pub fn direction(&self) -> Direction {
        self.goal_type.direction()
    }

    /// Number of milestones reached so far.
    pub fn achieved_milestones(&self) -> usize {
        self.milestones.iter().filter(|m| m.achieved).count()
    }

    /// Whether the goal is still open for progress.
    pub fn is_active(&self) -> bool {
        self.status == GoalStatus::Active
    }
}

/// Values submitted on the new-goal form, before milestones are generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalDraft {
    /// Goal title
    pub title: String,

    /// Kind of goal
    pub goal_type: GoalType,

    /// Unit of the values
    pub unit: String,

    /// Starting value
    pub start_value: f64,

    /// Current value at creation
    pub current_value: f64,

    /// Value to reach
    pub target_value: f64,

    /// Target date
    pub deadline: Time,

    /// Optional notes
    pub notes: Option<String>,
}

impl GoalDraft {
    /// Create a draft with the goal type's default unit and current = start.
    pub fn new(
        title: impl Into<String>,
        goal_type: GoalType,
        start_value: f64,
        target_value: f64,
        deadline: Time,
    ) -> Self {
        Self {
            title: title.into(),
            goal_type,
            unit: goal_type.default_unit().to_string(),
            start_value,
            current_value: start_value,
            target_value,
            deadline,
            notes: None,
        }
    }

    /// Override the unit.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Attach notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Filter for listing goals.
#[derive(Debug, Clone, Default)]
pub struct GoalFilter {
    /// Filter by owning member
    pub member_id: Option<MemberId>,

    /// Filter by status
    pub status: Option<Vec<GoalStatus>>,
}

impl GoalFilter {
    /// Whether a goal passes the filter.
    pub fn matches(&self, goal: &GoalRecord) -> bool {
        if let Some(member) = &self.member_id {
            if &goal.member_id != member {
                return false;
            }
        }
        if let Some(statuses) = &self.status {
            if !statuses.contains(&goal.status) {
                return false;
            }
        }
        true
    }
}
