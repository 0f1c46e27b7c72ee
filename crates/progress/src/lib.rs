//! Goal progress tracking.
//!
//! Milestone ladders, percentage progress, milestone detection, and the goal
//! workflows that persist them.

#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod estimator;
pub mod service;

pub use engine::{
    apply_progress_update, apply_template, calculate_progress, create_goal, generate_milestones,
    is_milestone_reached, UpdateOutcome,
};
pub use error::{ProgressError, Result};
pub use estimator::{DeadlineAssessment, DeadlineEstimator};
pub use service::{GoalService, ProgressReport};
