//! Command handlers: run a parsed command against the planner and render
//! the markdown result.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use drillbook_core::{
    models::{Stage, TrainingPlan},
    params::{FinalizePlan, GeneratePlan, GetAcwr, RecordSession},
    workload::PeriodKey,
    TrainingPlanner,
};
use log::info;

use crate::{
    args::{
        AcwrArgs, CatalogCommands, CatalogListArgs, CatalogStatsArgs, FinalizeArgs,
        GeneratePlanArgs, HistoryArgs, LoadCommands, PlanCommands, RecordArgs, RerollArgs,
        UsageArgs,
    },
    renderer::TerminalRenderer,
};

pub struct Cli {
    planner: TrainingPlanner,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(planner: TrainingPlanner, renderer: TerminalRenderer) -> Self {
        Self { planner, renderer }
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Generate(args) => self.generate_plan(&args).await,
            PlanCommands::Reroll(args) => self.reroll_stage(&args).await,
            PlanCommands::Finalize(args) => self.finalize_plan(&args).await,
        }
    }

    pub fn handle_catalog_command(&self, command: Option<CatalogCommands>) -> Result<()> {
        match command {
            Some(CatalogCommands::Stats(args)) => self.catalog_stats(&args),
            Some(CatalogCommands::List(args)) => self.list_catalog(&args),
            None => self.catalog_stats(&CatalogStatsArgs { verbose: false }),
        }
    }

    pub async fn handle_load_command(&self, command: LoadCommands) -> Result<()> {
        match command {
            LoadCommands::Record(args) => self.record_load(args).await,
            LoadCommands::Acwr(args) => self.show_acwr(args).await,
            LoadCommands::Compute(args) => {
                let load = self.planner.compute_workload(&args.into());
                self.renderer.render(&format!("Session load: {load:.1}\n"))
            }
            LoadCommands::History(args) => self.show_history(&args).await,
        }
    }

    pub async fn show_usage(&self, args: UsageArgs) -> Result<()> {
        let entries = self.planner.most_used(&args.into()).await?;
        self.renderer
            .render(&format!("# Most used activities\n\n{entries}"))
    }

    async fn generate_plan(&self, args: &GeneratePlanArgs) -> Result<()> {
        if self.planner.catalog().is_empty() {
            anyhow::bail!("The catalog is empty; pass one with --catalog <FILE>");
        }

        let plan = self.planner.generate_plan(&GeneratePlan::from(args)).await;
        if let Some(path) = &args.save {
            write_plan(path, &plan)?;
            info!("Saved plan to {}", path.display());
        }

        if args.json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            self.renderer.render(&plan.to_string())?;
        }

        if args.finalize {
            let result = self
                .planner
                .finalize_plan(&FinalizePlan {
                    plan,
                    session: args.to_session(),
                })
                .await
                .context("Failed to finalize plan")?;
            self.renderer.render(&format!("\n{result}"))?;
        }
        Ok(())
    }

    async fn reroll_stage(&self, args: &RerollArgs) -> Result<()> {
        let plan = read_plan(&args.plan)?;
        let result = self.planner.reroll_stage(&plan, args.stage).await;
        write_plan(&args.plan, &result.plan)?;
        self.renderer.render(&result.to_string())
    }

    async fn finalize_plan(&self, args: &FinalizeArgs) -> Result<()> {
        let plan = read_plan(&args.plan)?;
        let result = self
            .planner
            .finalize_plan(&FinalizePlan {
                plan,
                session: args.session.to_session(),
            })
            .await
            .context("Failed to finalize plan")?;
        self.renderer.render(&result.to_string())
    }

    fn catalog_stats(&self, args: &CatalogStatsArgs) -> Result<()> {
        let mut output = self.planner.catalog_stats().to_string();
        if args.verbose {
            output.push('\n');
            output.push_str(&self.planner.catalog().report().to_string());
        }
        self.renderer.render(&output)
    }

    fn list_catalog(&self, args: &CatalogListArgs) -> Result<()> {
        let stages = match args.stage {
            Some(stage) => vec![stage],
            None => Stage::ALL.to_vec(),
        };

        let mut output = String::new();
        for stage in stages {
            output.push_str(&format!("## {}\n\n", stage.label()));
            let records = self.planner.catalog().by_stage(stage);
            if records.is_empty() {
                output.push_str("No activities.\n");
            }
            for record in records {
                if record.format.is_empty() {
                    output.push_str(&format!("- {}\n", record.title));
                } else {
                    output.push_str(&format!("- {} ({})\n", record.title, record.format));
                }
            }
            output.push('\n');
        }
        self.renderer.render(&output)
    }

    async fn record_load(&self, args: RecordArgs) -> Result<()> {
        let period_key = period_or_current(args.period)?;
        let total = self
            .planner
            .record_session(&RecordSession {
                coach_id: args.coach,
                team_id: args.team,
                period_key: period_key.to_string(),
                load: args.load,
            })
            .await?;
        self.renderer.render(&format!(
            "Recorded load {:.1} in {period_key} (period total {total:.1})\n",
            args.load
        ))
    }

    async fn show_acwr(&self, args: AcwrArgs) -> Result<()> {
        let period_key = period_or_current(args.period)?;
        let outcome = self
            .planner
            .get_acwr(&GetAcwr {
                coach_id: args.coach,
                team_id: args.team,
                period_key: period_key.to_string(),
            })
            .await?;
        self.renderer.render(&outcome.to_string())
    }

    async fn show_history(&self, args: &HistoryArgs) -> Result<()> {
        let history = self
            .planner
            .workload_history(&args.coach, &args.team)
            .await?;
        self.renderer.render(&format!(
            "# Workload {} / {}\n\n{history}",
            args.coach, args.team
        ))
    }
}

fn period_or_current(period: Option<String>) -> Result<PeriodKey> {
    match period {
        Some(value) => value.parse().map_err(anyhow::Error::msg),
        None => Ok(PeriodKey::current()),
    }
}

fn read_plan(path: &Path) -> Result<TrainingPlan> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid plan file {}", path.display()))
}

fn write_plan(path: &Path, plan: &TrainingPlan) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    fs::write(path, json).with_context(|| format!("Failed to write plan file {}", path.display()))
}
