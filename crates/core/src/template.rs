//! Goal templates - presets that pre-fill the new-goal form.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use crate::error::{CoreError, Result};
use crate::goal::GoalType;

/// Experience tier a template is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// New members
    Beginner,
    /// Members with some training history
    Intermediate,
    /// Experienced members
    Advanced,
}

impl Tier {
    /// All tiers, easiest first.
    pub const ALL: [Tier; 3] = [Tier::Beginner, Tier::Intermediate, Tier::Advanced];

    /// Snake-case tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            Tier::Beginner => "beginner",
            Tier::Intermediate => "intermediate",
            Tier::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = CoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        Tier::ALL
            .into_iter()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| CoreError::UnknownTier(s.to_string()))
    }
}

/// A goal preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalTemplate {
    /// Suggested title
    pub title: String,

    /// Kind of goal
    pub goal_type: GoalType,

    /// Value to reach
    pub target_value: f64,

    /// Unit of the target
    pub unit: String,

    /// Days from creation until the deadline
    pub duration_days: u32,
}

impl GoalTemplate {
    /// Create a template.
    pub fn new(
        title: impl Into<String>,
        goal_type: GoalType,
        target_value: f64,
        unit: impl Into<String>,
        duration_days: u32,
    ) -> Self {
        Self {
            title: title.into(),
            goal_type,
            target_value,
            unit: unit.into(),
            duration_days,
        }
    }
}

/// Longest template duration accepted into a catalog (ten years).
pub const MAX_TEMPLATE_DAYS: u32 = 3650;

/// Template presets grouped by tier.
///
/// Passed into the goal service so each deployment can ship its own presets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateCatalog {
    tiers: BTreeMap<Tier, Vec<GoalTemplate>>,
}

impl TemplateCatalog {
    /// Create an empty catalog.
    pub fn empty() -> Self {
        Self { tiers: BTreeMap::new() }
    }

    /// Add a template to a tier, keeping insertion order.
    pub fn add(&mut self, tier: Tier, template: GoalTemplate) -> Result<()> {
        crate::error::ensure_finite("target_value", template.target_value)?;
        if template.title.trim().is_empty() {
            return Err(CoreError::InvalidArgument("template title is empty".to_string()));
        }
        if template.duration_days == 0 || template.duration_days > MAX_TEMPLATE_DAYS {
            return Err(CoreError::InvalidArgument(format!(
                "duration_days must be between 1 and {}, got {}",
                MAX_TEMPLATE_DAYS, template.duration_days
            )));
        }
        self.tiers.entry(tier).or_default().push(template);
        Ok(())
    }

    /// Templates of one tier.
    pub fn tier(&self, tier: Tier) -> &[GoalTemplate] {
        self.tiers.get(&tier).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Look up a template by tier and position.
    pub fn get(&self, tier: Tier, index: usize) -> Result<&GoalTemplate> {
        self.tier(tier).get(index).ok_or(CoreError::TemplateNotFound {
            tier: tier.to_string(),
            index,
        })
    }

    /// Iterate tiers and their templates, easiest tier first.
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &[GoalTemplate])> {
        self.tiers.iter().map(|(tier, list)| (*tier, list.as_slice()))
    }

    /// Total number of templates.
    pub fn len(&self) -> usize {
        self.tiers.values().map(Vec::len).sum()
    }

    /// Whether the catalog has no templates.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse a catalog from JSON of the form `{"tiers": {"beginner": [...]}}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: TemplateCatalog = serde_json::from_str(json)?;
        // Re-add through `add` so every entry is validated.
        let mut catalog = TemplateCatalog::empty();
        for (tier, templates) in raw.tiers {
            for template in templates {
                catalog.add(tier, template)?;
            }
        }
        Ok(catalog)
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl Default for TemplateCatalog {
    /// Built-in presets.
    fn default() -> Self {
        let presets = [
            (Tier::Beginner, GoalTemplate::new("Lose 5 kg", GoalType::WeightLoss, 5.0, "kg", 60)),
            (Tier::Beginner, GoalTemplate::new("Run 20 minutes non-stop", GoalType::Endurance, 20.0, "min", 30)),
            (Tier::Beginner, GoalTemplate::new("Bench press 40 kg", GoalType::Strength, 40.0, "kg", 60)),
            (Tier::Intermediate, GoalTemplate::new("Gain 3 kg of muscle", GoalType::MuscleGain, 3.0, "kg", 90)),
            (Tier::Intermediate, GoalTemplate::new("Squat 100 kg", GoalType::Strength, 100.0, "kg", 90)),
            (Tier::Intermediate, GoalTemplate::new("Drop 5% body fat", GoalType::BodyFat, 5.0, "%", 120)),
            (Tier::Advanced, GoalTemplate::new("Deadlift 200 kg", GoalType::Strength, 200.0, "kg", 180)),
            (Tier::Advanced, GoalTemplate::new("Run 60 minutes non-stop", GoalType::Endurance, 60.0, "min", 90)),
            (Tier::Advanced, GoalTemplate::new("Gain 6 kg of muscle", GoalType::MuscleGain, 6.0, "kg", 180)),
        ];

        let mut tiers: BTreeMap<Tier, Vec<GoalTemplate>> = BTreeMap::new();
        for (tier, template) in presets {
            tiers.entry(tier).or_default().push(template);
        }
        Self { tiers }
    }
}
