//! Command-line argument definitions using clap's derive API.
//!
//! Argument structs stay in this crate and convert into the core parameter
//! types with `From`, so the core crate carries no clap derives:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → TrainingPlanner
//! ```

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use drillbook_core::{
    models::{
        AgeBracket, FitnessFocus, LargeFormat, MainFormat, MainProfile, Stage, TacticalGoal,
        TechnicalFocus,
    },
    params::{ComputeWorkload, GeneratePlan, MostUsed, SessionLoad},
};

/// Football training session planner
///
/// Builds four-stage session plans (warm-up, small-sided game, larger
/// tactical game, main match phase) from a drill catalog, avoids repeating
/// recently used drills, and tracks the acute:chronic workload ratio of each
/// team.
#[derive(Parser)]
#[command(version, about, name = "drillbook")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/drillbook/drillbook.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Engine configuration file. Defaults to
    /// $XDG_CONFIG_HOME/drillbook/config.json when present
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Activity catalog (JSON array of drills)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Seed the random tie-breaking for reproducible plans
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate, reroll and finalize session plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Inspect the activity catalog; shows statistics by default
    #[command(alias = "c")]
    Catalog {
        #[command(subcommand)]
        command: Option<CatalogCommands>,
    },
    /// Record training load and compute ACWR
    #[command(alias = "l")]
    Load {
        #[command(subcommand)]
        command: LoadCommands,
    },
    /// Show the most used activities
    #[command(alias = "u")]
    Usage(UsageArgs),
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Generate a new plan without persisting anything
    #[command(alias = "g")]
    Generate(GeneratePlanArgs),
    /// Pick a different activity for one stage of a saved plan
    #[command(alias = "r")]
    Reroll(RerollArgs),
    /// Accept a saved plan: count its activities as used and optionally
    /// record the session load
    #[command(alias = "f")]
    Finalize(FinalizeArgs),
}

/// Preset choices for plan generation
#[derive(ClapArgs)]
pub struct GeneratePlanArgs {
    /// Age bracket (u7-u9, u10-u11, u12-u13, u14-u15, u16-u19,
    /// adult-amateur, adult-pro, any)
    #[arg(short, long, default_value = "any")]
    pub age: AgeBracket,
    /// Tactical goal (build-up, pressing, finishing, possession)
    #[arg(short, long)]
    pub tactical: Option<TacticalGoal>,
    /// Technical focus, repeatable or comma separated
    #[arg(long, value_delimiter = ',')]
    pub technical: Vec<TechnicalFocus>,
    /// Fitness focus (speed, endurance, strength, explosiveness)
    #[arg(short, long)]
    pub fitness: Option<FitnessFocus>,
    /// Format of the larger tactical game (5v5, 6v6, 7v7-plus, none)
    #[arg(long)]
    pub large_format: Option<LargeFormat>,
    /// Profile of the main phase (finishing, build-up, pressing, none)
    #[arg(long)]
    pub main_profile: Option<MainProfile>,
    /// Format of the main phase (6v6-half-field, 7v7-8v8, full-match, none)
    #[arg(long)]
    pub main_format: Option<MainFormat>,
    /// Ask for a genuine match game with age-appropriate team sizes
    #[arg(short, long)]
    pub match_game: bool,
    /// Planned number of players, shown in the plan summary (e.g. 14, 7-9)
    #[arg(short, long)]
    pub players: Option<String>,
    /// Planned session length in minutes, shown in the plan summary
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub minutes: Option<u32>,
    /// Write the plan as JSON so it can be rerolled or finalized later
    #[arg(short, long)]
    pub save: Option<PathBuf>,
    /// Print the plan as JSON instead of markdown
    #[arg(long)]
    pub json: bool,
    /// Accept the plan right away
    #[arg(long)]
    pub finalize: bool,
    /// Coach identifier for the session load recorded with --finalize
    #[arg(long, requires = "team", requires = "finalize")]
    pub coach: Option<String>,
    /// Team identifier
    #[arg(long, requires = "coach")]
    pub team: Option<String>,
    /// Period to add the load to. Defaults to the current ISO week
    #[arg(long, requires = "coach")]
    pub period: Option<String>,
    /// Periodization week, 0 for none
    #[arg(long, default_value_t = 0)]
    pub week: u32,
}

impl GeneratePlanArgs {
    /// Session load derived from the presets, when --coach and --team
    /// were given.
    pub fn to_session(&self) -> Option<SessionLoad> {
        match (&self.coach, &self.team) {
            (Some(coach), Some(team)) => Some(SessionLoad {
                coach_id: coach.clone(),
                team_id: team.clone(),
                period_key: self.period.clone(),
                week: self.week,
                technical: self.technical.clone(),
                fitness: self.fitness.into_iter().collect(),
            }),
            _ => None,
        }
    }
}

impl From<&GeneratePlanArgs> for GeneratePlan {
    fn from(val: &GeneratePlanArgs) -> Self {
        GeneratePlan {
            age: val.age,
            tactical: val.tactical,
            technical: val.technical.clone(),
            fitness: val.fitness,
            large_format: val.large_format,
            main_profile: val.main_profile,
            main_format: val.main_format,
            match_game: val.match_game,
            players: val.players.clone(),
            duration_minutes: val.minutes,
        }
    }
}

#[derive(ClapArgs)]
pub struct RerollArgs {
    /// Plan file written by `plan generate --save`; updated in place
    pub plan: PathBuf,
    /// Stage to pick again (warmup, small, large, main)
    #[arg(short, long)]
    pub stage: Stage,
}

#[derive(ClapArgs)]
pub struct FinalizeArgs {
    /// Plan file written by `plan generate --save`
    pub plan: PathBuf,
    #[command(flatten)]
    pub session: SessionArgs,
}

/// Session load to record together with the plan
#[derive(ClapArgs)]
pub struct SessionArgs {
    /// Coach identifier; recording the session load requires it
    #[arg(long, requires = "team")]
    pub coach: Option<String>,
    /// Team identifier
    #[arg(long, requires = "coach")]
    pub team: Option<String>,
    /// Period to add the load to. Defaults to the current ISO week
    #[arg(long)]
    pub period: Option<String>,
    /// Periodization week, 0 for none
    #[arg(long, default_value_t = 0)]
    pub week: u32,
    /// Technical focus terms trained, repeatable or comma separated
    #[arg(long, value_delimiter = ',')]
    pub technical: Vec<TechnicalFocus>,
    /// Fitness focus terms trained, repeatable or comma separated
    #[arg(long, value_delimiter = ',')]
    pub fitness: Vec<FitnessFocus>,
}

impl SessionArgs {
    /// Session load parameters, when a coach and team were given.
    pub fn to_session(&self) -> Option<SessionLoad> {
        match (&self.coach, &self.team) {
            (Some(coach), Some(team)) => Some(SessionLoad {
                coach_id: coach.clone(),
                team_id: team.clone(),
                period_key: self.period.clone(),
                week: self.week,
                technical: self.technical.clone(),
                fitness: self.fitness.clone(),
            }),
            _ => None,
        }
    }
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Record counts per stage and how many records were dropped
    Stats(CatalogStatsArgs),
    /// List the activities of one stage, or of every stage
    #[command(aliases = ["l", "ls"])]
    List(CatalogListArgs),
}

#[derive(ClapArgs)]
pub struct CatalogStatsArgs {
    /// Also list every dropped record and the reason
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ClapArgs)]
pub struct CatalogListArgs {
    /// Only list this stage
    #[arg(short, long)]
    pub stage: Option<Stage>,
}

#[derive(Subcommand)]
pub enum LoadCommands {
    /// Add a session load to a period
    Record(RecordArgs),
    /// Acute:chronic workload ratio of a period
    Acwr(AcwrArgs),
    /// Compute a session load without recording it
    Compute(ComputeArgs),
    /// Every recorded period of a coach and team
    History(HistoryArgs),
}

#[derive(ClapArgs)]
pub struct RecordArgs {
    #[arg(long)]
    pub coach: String,
    #[arg(long)]
    pub team: String,
    /// Period key. Defaults to the current ISO week
    #[arg(long)]
    pub period: Option<String>,
    /// Load to add
    #[arg(long)]
    pub load: f64,
}

#[derive(ClapArgs)]
pub struct AcwrArgs {
    #[arg(long)]
    pub coach: String,
    #[arg(long)]
    pub team: String,
    /// Period key. Defaults to the current ISO week
    #[arg(long)]
    pub period: Option<String>,
}

#[derive(ClapArgs)]
pub struct ComputeArgs {
    /// Periodization week, 0 for none
    #[arg(long, default_value_t = 0)]
    pub week: u32,
    /// Stages in the session, comma separated. Defaults to all four
    #[arg(long, value_delimiter = ',')]
    pub stages: Vec<Stage>,
    #[arg(long, value_delimiter = ',')]
    pub technical: Vec<TechnicalFocus>,
    #[arg(long, value_delimiter = ',')]
    pub fitness: Vec<FitnessFocus>,
}

impl From<ComputeArgs> for ComputeWorkload {
    fn from(val: ComputeArgs) -> Self {
        let stages = if val.stages.is_empty() {
            Stage::ALL.to_vec()
        } else {
            val.stages
        };
        ComputeWorkload {
            week: val.week,
            stages,
            technical: val.technical,
            fitness: val.fitness,
        }
    }
}

#[derive(ClapArgs)]
pub struct HistoryArgs {
    #[arg(long)]
    pub coach: String,
    #[arg(long)]
    pub team: String,
}

#[derive(ClapArgs)]
pub struct UsageArgs {
    /// Number of activities to show
    #[arg(short = 'n', long, default_value_t = 10)]
    pub limit: usize,
}

impl From<UsageArgs> for MostUsed {
    fn from(val: UsageArgs) -> Self {
        MostUsed { limit: val.limit }
    }
}
