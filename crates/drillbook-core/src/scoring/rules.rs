//! Fixed stage shape tables.
//!
//! Each stage has its own notion of what a fitting activity looks like. The
//! word lists are matched through the configured [`KeywordMatcher`], the
//! weights come from [`ScoringConfig`].

use super::matcher::KeywordMatcher;
use crate::{
    catalog::text::detect_format,
    config::ScoringConfig,
    models::{ActivityRecord, SelectionConstraints, Stage},
};

/// Low-intensity, coordination-flavoured activities.
pub const WARM_LIKE: &[&str] = &["warm-up", "coordination", "activation", "mobility"];

/// Words that make an activity look like main-phase content.
pub const MAIN_LIKE: &[&str] = &[
    "finishing",
    "goal",
    "6vs6",
    "7vs7",
    "8vs8",
    "half-field",
    "game",
];

/// Words that make an activity look like a genuine match-format game.
pub const GAME_LIKE: &[&str] = &[
    "game",
    "match",
    "small-sided",
    "possession game",
    "finishing game",
    "7vs7",
    "8vs8",
    "9vs9",
    "10vs10",
    "11vs11",
];

/// Structure words that suit the larger tactical game.
pub const ORGANISATION_LIKE: &[&str] = &["build-up", "possession", "organization"];

/// Circuit-style content that does not suit the larger tactical game.
pub const CIRCUIT_LIKE: &[&str] = &["circuit", "course", "pure coordination"];

/// Drill-style content that does not suit the main phase.
pub const DRILL_LIKE: &[&str] = &["drill", "circuit", "course", "pattern only"];

/// Player count per side, taken from the format field or, failing that, from
/// the first format mentioned in the text.
pub fn players_per_side(activity: &ActivityRecord) -> Option<(u32, u32)> {
    let format = if activity.format.is_empty() {
        detect_format(&activity.search_text)?
    } else {
        activity.format.clone()
    };
    let (left, right) = format.split_once("vs")?;
    Some((left.parse().ok()?, right.parse().ok()?))
}

fn larger_side(activity: &ActivityRecord) -> Option<u32> {
    players_per_side(activity).map(|(left, right)| left.max(right))
}

/// Shape bonus or penalty of `activity` for `stage`.
pub fn shape_score<M: KeywordMatcher>(
    matcher: &M,
    config: &ScoringConfig,
    activity: &ActivityRecord,
    stage: Stage,
    constraints: &SelectionConstraints,
) -> f64 {
    match stage {
        Stage::Warmup => warmup_shape(matcher, config, activity),
        Stage::Small => small_shape(config, activity),
        Stage::Large => large_shape(matcher, config, activity, constraints),
        Stage::Main => main_shape(matcher, config, activity, constraints),
    }
}

fn warmup_shape<M: KeywordMatcher>(
    matcher: &M,
    config: &ScoringConfig,
    activity: &ActivityRecord,
) -> f64 {
    let mut score = 0.0;
    if matcher.matches_any(activity, WARM_LIKE) {
        score += config.warmup_bonus;
    }
    if matcher.matches_any(activity, MAIN_LIKE) {
        score -= config.warmup_match_penalty;
    }
    score
}

fn small_shape(config: &ScoringConfig, activity: &ActivityRecord) -> f64 {
    match larger_side(activity) {
        Some(1..=4) => config.small_size_bonus,
        _ => 0.0,
    }
}

fn large_shape<M: KeywordMatcher>(
    matcher: &M,
    config: &ScoringConfig,
    activity: &ActivityRecord,
    constraints: &SelectionConstraints,
) -> f64 {
    let mut score = 0.0;
    if matches!(larger_side(activity), Some(5..=8)) {
        score += config.large_size_bonus;
    }
    score += config.large_format_bonus
        * matcher.count_matches(activity, &constraints.large_format) as f64;
    if matcher.matches_any(activity, ORGANISATION_LIKE) {
        score += config.large_organisation_bonus;
    }
    if matcher.matches_any(activity, CIRCUIT_LIKE) {
        score -= config.large_circuit_penalty;
    }
    if matcher.matches_any(activity, WARM_LIKE) {
        score -= config.large_warmup_penalty;
    }
    score
}

fn main_shape<M: KeywordMatcher>(
    matcher: &M,
    config: &ScoringConfig,
    activity: &ActivityRecord,
    constraints: &SelectionConstraints,
) -> f64 {
    let mut score = if matcher.matches_any(activity, GAME_LIKE) {
        config.main_game_bonus
    } else {
        -config.main_non_game_penalty
    };
    score += config.main_format_bonus
        * matcher.count_matches(activity, &constraints.main_format) as f64;
    score += config.main_profile_bonus
        * matcher.count_matches(activity, &constraints.main_profile) as f64;
    if matcher.matches_any(activity, DRILL_LIKE) {
        score -= config.main_drill_penalty;
    }
    score
}
