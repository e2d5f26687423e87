//! Display implementations for domain models.
//!
//! Everything renders as markdown so the CLI can hand it straight to the
//! terminal renderer.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    catalog::{CatalogStats, NormalizeReport},
    models::{
        AcwrOutcome, AcwrReport, ActivityRecord, RelaxationLevel, RiskZone, Selection,
        SessionWorkload, Stage, StagePick, TrainingPlan, UsageEntry, WorkloadRecord,
    },
};

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for RelaxationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for RiskZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ActivityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.title)?;
        writeln!(f)?;
        writeln!(f, "- Stage: {}", self.stage_affinity.label())?;
        if !self.format.is_empty() {
            writeln!(f, "- Format: {}", self.format)?;
        }
        if !self.age_tags.is_empty() {
            writeln!(f, "- Ages: {}", join(&self.age_tags))?;
        }
        if let Some(url) = &self.url {
            writeln!(f, "- Link: {url}")?;
        }
        writeln!(f, "- Identity: {}", self.identity_key)?;

        for (heading, body) in &self.sections {
            writeln!(f, "\n## {heading}")?;
            writeln!(f)?;
            writeln!(f, "{body}")?;
        }
        Ok(())
    }
}

impl Selection {
    fn fmt_selection(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## {}. {}: {}",
            self.stage.position(),
            self.stage.label(),
            self.activity.title
        )?;
        writeln!(f)?;

        if !self.activity.format.is_empty() {
            writeln!(f, "- Format: {}", self.activity.format)?;
        }
        writeln!(f, "- Constraints: {}", self.level)?;
        if self.match_preferred {
            writeln!(f, "- Match game: yes")?;
        }
        if self.fallback {
            writeln!(f, "- Fallback pick: no candidate scored above zero")?;
        }
        if let Some(url) = &self.activity.url {
            writeln!(f, "- Link: {url}")?;
        }
        writeln!(f)?;

        if let Some(organisation) = self.activity.organisation() {
            writeln!(f, "### Organisation")?;
            writeln!(f)?;
            writeln!(f, "{organisation}")?;
            writeln!(f)?;
        }

        let points = self.activity.coaching_points();
        if !points.is_empty() {
            writeln!(f, "### Coaching points")?;
            writeln!(f)?;
            for point in points {
                writeln!(f, "- {point}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_selection(f)
    }
}

impl fmt::Display for StagePick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StagePick::Found(selection) => selection.fmt_selection(f),
            StagePick::NotFound { stage } => {
                writeln!(f, "## {}. {}", stage.position(), stage.label())?;
                writeln!(f)?;
                writeln!(f, "> No suitable activity found for this stage.")?;
                writeln!(f)
            }
        }
    }
}

impl fmt::Display for TrainingPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Training plan")?;
        writeln!(f)?;
        writeln!(f, "- Generated: {}", LocalDateTime(&self.generated_at))?;
        if let Some(players) = &self.summary.players {
            writeln!(f, "- Players: {players}")?;
        }
        if let Some(minutes) = self.summary.duration_minutes {
            writeln!(f, "- Duration: {minutes} min")?;
        }
        if !self.constraints.age_tokens.is_empty() {
            writeln!(f, "- Ages: {}", join(&self.constraints.age_tokens))?;
        }
        for (label, values) in [
            ("Tactical", &self.constraints.tactical),
            ("Technical", &self.constraints.technical),
            ("Fitness", &self.constraints.fitness),
        ] {
            if !values.is_empty() {
                writeln!(f, "- {label}: {}", values.join(", "))?;
            }
        }
        if !self.constraints.match_sizes.is_empty() {
            writeln!(
                f,
                "- Match sizes: {}",
                self.constraints.match_sizes.join(", ")
            )?;
        }
        writeln!(f)?;

        for pick in &self.stages {
            write!(f, "{pick}")?;
        }
        Ok(())
    }
}

impl fmt::Display for AcwrReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "# ACWR {} / {} ({})",
            self.coach_id, self.team_id, self.period_key
        )?;
        writeln!(f)?;
        writeln!(f, "- Acute load: {:.1}", self.acute)?;
        match self.chronic {
            Some(chronic) => writeln!(
                f,
                "- Chronic load: {chronic:.1} (mean of {} period(s))",
                self.chronic_periods.len()
            )?,
            None => writeln!(f, "- Chronic load: n/a (no earlier periods)")?,
        }
        match (self.ratio, self.risk_zone) {
            (Some(ratio), Some(zone)) => {
                writeln!(f, "- Ratio: {ratio:.2}")?;
                writeln!(f, "- Risk zone: {}", zone.with_icon())?;
            }
            _ => writeln!(f, "- Ratio: n/a")?,
        }
        Ok(())
    }
}

impl fmt::Display for AcwrOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcwrOutcome::Available(report) => write!(f, "{report}"),
            AcwrOutcome::Unavailable {
                coach_id,
                team_id,
                period_key,
            } => writeln!(
                f,
                "No load recorded for {coach_id} / {team_id} in {period_key}."
            ),
        }
    }
}

impl fmt::Display for SessionWorkload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Workload ({})", self.period_key)?;
        writeln!(f)?;
        writeln!(f, "- Session load: {:.1}", self.load)?;
        writeln!(f, "- Period total: {:.1}", self.total)?;
        if let Some(report) = self.acwr.report() {
            match (report.ratio, report.risk_zone) {
                (Some(ratio), Some(zone)) => {
                    writeln!(f, "- ACWR: {ratio:.2} ({})", zone.with_icon())?;
                }
                _ => writeln!(f, "- ACWR: n/a")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for WorkloadRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- **{}**: {:.1} (updated {})",
            self.period_key,
            self.load,
            LocalDateTime(&self.updated_at)
        )
    }
}

impl fmt::Display for UsageEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- **{}**: {}", self.identity_key, self.count)?;
        if let Some(at) = &self.last_used_at {
            write!(f, " (last used {})", LocalDateTime(at))?;
        }
        writeln!(f)
    }
}

impl fmt::Display for NormalizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Kept {} of {} records ({} dropped)",
            self.kept,
            self.total,
            self.dropped.len()
        )?;
        if !self.dropped.is_empty() {
            writeln!(f)?;
            for dropped in &self.dropped {
                let title = dropped.title.as_deref().unwrap_or("untitled");
                writeln!(f, "- #{} {title}: {}", dropped.index, dropped.reason)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Catalog")?;
        writeln!(f)?;
        writeln!(f, "- Records: {}", self.total)?;
        writeln!(f, "- Distinct activities: {}", self.distinct_identities)?;
        writeln!(f, "- Dropped while loading: {}", self.dropped)?;
        writeln!(f)?;
        writeln!(f, "## Per stage")?;
        writeln!(f)?;
        for (stage, count) in &self.per_stage {
            writeln!(f, "- {}: {count}", stage.label())?;
        }
        Ok(())
    }
}

fn join<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    values
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
