//! gymgoal CLI - member goal tracking.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand};
use gymgoal_core::{GoalDraft, GoalId, GoalRecord, GoalStatus, GoalType, MemberId, TemplateCatalog, Tier};
use gymgoal_progress::{DeadlineEstimator, GoalService, ProgressError};
use gymgoal_storage::{JsonStorage, StorageError};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gymgoal")]
#[command(about = "Gym member goal tracking", long_about = None)]
struct Cli {
    /// Directory holding goal records
    #[arg(long, env = "GYMGOAL_DATA_DIR", default_value = ".gymgoal")]
    data_dir: PathBuf,

    /// JSON template catalog (built-in presets when omitted)
    #[arg(long, env = "GYMGOAL_CATALOG")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List goal templates by tier
    Templates,
    /// Create a goal
    Create {
        /// Owning member
        #[arg(long)]
        member: String,
        /// Goal title
        #[arg(long)]
        title: String,
        /// weight_loss, muscle_gain, strength, endurance, body_fat or custom
        #[arg(long = "type")]
        goal_type: GoalType,
        /// Starting value
        #[arg(long, allow_hyphen_values = true)]
        start: f64,
        /// Target value
        #[arg(long, allow_hyphen_values = true)]
        target: f64,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: NaiveDate,
        /// Unit (defaults per goal type)
        #[arg(long)]
        unit: Option<String>,
        /// Current value if different from start
        #[arg(long, allow_hyphen_values = true)]
        current: Option<f64>,
        /// Notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Create a goal from a template
    FromTemplate {
        /// Owning member
        #[arg(long)]
        member: String,
        /// beginner, intermediate or advanced
        #[arg(long)]
        tier: Tier,
        /// Position within the tier, as listed by `templates`
        #[arg(long, default_value = "0")]
        index: usize,
    },
    /// Record a new value for a goal
    Update {
        /// Goal ID
        id: GoalId,
        /// New current value
        #[arg(allow_hyphen_values = true)]
        value: f64,
        /// Version last seen; rejects the update if the goal changed since
        #[arg(long)]
        expect_version: Option<u64>,
    },
    /// Show goal details
    Show {
        /// Goal ID
        id: GoalId,
    },
    /// List goals
    List {
        /// Filter by member
        #[arg(long)]
        member: Option<String>,
        /// Filter by status
        #[arg(long)]
        status: Option<GoalStatus>,
    },
    /// Delete a goal
    Delete {
        /// Goal ID
        id: GoalId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let catalog = match &cli.catalog {
        Some(path) => TemplateCatalog::from_json_file(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => TemplateCatalog::default(),
    };
    debug!(templates = catalog.len(), "Template catalog ready");

    let storage = JsonStorage::new(&cli.data_dir)
        .await
        .with_context(|| format!("opening {}", cli.data_dir.display()))?;
    let mut service = GoalService::new(storage, catalog);

    match cli.command {
        Commands::Templates => {
            for (tier, templates) in service.catalog().iter() {
                println!("{}", tier);
                for (i, t) in templates.iter().enumerate() {
                    println!(
                        "  [{}] {} | {} | {} {} in {} days",
                        i, t.title, t.goal_type, t.target_value, t.unit, t.duration_days
                    );
                }
            }
        }
        Commands::Create { member, title, goal_type, start, target, deadline, unit, current, notes } => {
            let deadline = deadline
                .and_hms_opt(23, 59, 59)
                .map(|dt| Utc.from_utc_datetime(&dt))
                .context("invalid deadline")?;
            let mut draft = GoalDraft::new(title, goal_type, start, target, deadline);
            if let Some(unit) = unit {
                draft = draft.with_unit(unit);
            }
            if let Some(current) = current {
                draft.current_value = current;
            }
            if let Some(notes) = notes {
                draft = draft.with_notes(notes);
            }

            let goal = service.create_goal(MemberId::new(member), draft).await?;
            println!("Created goal: {} - {}", goal.id, goal.title);
            print_milestones(&goal);
        }
        Commands::FromTemplate { member, tier, index } => {
            let goal = service.create_from_template(MemberId::new(member), tier, index).await?;
            println!("Created goal: {} - {}", goal.id, goal.title);
            print_milestones(&goal);
        }
        Commands::Update { id, value, expect_version } => {
            let report = match service.record_progress(id, value, expect_version).await {
                Ok(report) => report,
                Err(ProgressError::Storage(StorageError::VersionConflict { found, .. })) => {
                    println!("Goal changed since you last read it (now at version {}). Reload and try again.", found);
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };

            let goal = &report.goal;
            println!("Progress: {:.1}% ({} {})", report.outcome.progress, goal.current_value, goal.unit);
            for percentage in &report.outcome.newly_achieved {
                println!("  Milestone reached: {}%", percentage);
            }
            if report.outcome.progress >= 100.0 {
                println!("Congratulations! You reached your goal \"{}\".", goal.title);
            }
            info!(goal = %goal.id, version = goal.version, "Update saved");
        }
        Commands::Show { id } => {
            let Some(goal) = service.get_goal(id).await? else {
                println!("Goal not found");
                return Ok(());
            };

            let pacing = DeadlineEstimator.assess(&goal, Utc::now());
            println!("Goal: {}", goal.id);
            println!("  Title: {}", goal.title);
            println!("  Member: {}", goal.member_id);
            println!("  Type: {}", goal.goal_type);
            println!("  Status: {}", format_status(goal.status));
            println!("  Start/Current/Target: {} / {} / {} {}", goal.start_value, goal.current_value, goal.target_value, goal.unit);
            println!("  Progress: {:.1}%", goal.progress);
            println!("  Deadline: {} ({} days left{})", goal.deadline.date_naive(), pacing.days_remaining,
                if pacing.overdue { ", overdue" } else { "" });
            if let Some(rate) = pacing.required_rate_per_day {
                println!("  Needed pace: {:.2} {}/day", rate, goal.unit);
            }
            if let Some(notes) = &goal.notes {
                println!("  Notes: {}", notes);
            }
            println!("  Version: {}", goal.version);
            print_milestones(&goal);
        }
        Commands::List { member, status } => {
            let goals = service.list_goals(member.map(MemberId::new), status).await?;

            println!("Goals ({})", goals.len());
            for goal in goals {
                println!("  {} | {} | {:>5.1}% | {} - {}",
                    goal.id,
                    format_status(goal.status),
                    goal.progress,
                    goal.member_id,
                    goal.title,
                );
            }
        }
        Commands::Delete { id } => {
            match service.delete_goal(id).await {
                Ok(()) => println!("Deleted goal {}", id),
                Err(ProgressError::GoalNotFound(_)) => println!("Goal not found"),
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

fn print_milestones(goal: &GoalRecord) {
    println!("  Milestones:");
    for m in &goal.milestones {
        let mark = if m.achieved { "x" } else { " " };
        match m.achieved_at {
            Some(at) => println!("    [{}] {:>3}% at {} {} (reached {})", mark, m.percentage, m.value, goal.unit, at.date_naive()),
            None => println!("    [{}] {:>3}% at {} {}", mark, m.percentage, m.value, goal.unit),
        }
    }
}

fn format_status(status: GoalStatus) -> &'static str {
    match status {
        GoalStatus::Active => "ACTIVE",
        GoalStatus::Completed => "COMPLETED",
        GoalStatus::Failed => "FAILED",
    }
}
