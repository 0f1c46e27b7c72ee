//! Gym goal tracking core data models.
//!
//! This crate defines the goal record, its milestone ladder, goal types with
//! their direction, and the template catalog used to pre-fill new goals.

#![warn(missing_docs)]

mod error;
mod id;
mod goal;
mod template;

pub use error::{ensure_finite, CoreError, Result};
pub use id::{GoalId, MemberId};
pub use goal::{Direction, GoalDraft, GoalFilter, GoalRecord, GoalStatus, GoalType, Milestone};
pub use template::{GoalTemplate, TemplateCatalog, Tier, MAX_TEMPLATE_DAYS};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
