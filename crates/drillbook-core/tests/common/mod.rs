#![allow(dead_code)]

use drillbook_core::{
    catalog::ActivityCatalog, config::StageKeywordTable, TrainingPlanner, TrainingPlannerBuilder,
};
use tempfile::TempDir;

/// A small catalog with at least two activities per stage.
pub const CATALOG_JSON: &str = r#"[
    {"title": "Coordination ladder warm-up", "age": "U10, U11", "image": "ladder.png",
     "sections": {"Process": "Quick feet through the ladder. Finish with a pass."}},
    {"title": "Passing star", "stage": "warmup", "technical_tags": ["short passing"]},
    {"title": "Rondo 4 v 2", "stage": "small", "tactical_tags": ["pressing"],
     "sections": {"Organisation": "Grid of 12x12 metres", "Process": "Two touches. Switch defenders after a win."}},
    {"title": "1 v 1 duels to goal", "stage": "small", "tactical_tags": ["finishing"]},
    {"title": "Possession game 6 v 6", "stage": "large", "age": ["U12", "U13"]},
    {"title": "Positional play 7 v 7", "stage": "large"},
    {"title": "Final match 11 v 11", "stage": "main"},
    {"title": "Match game 7 v 7", "stage": "main", "age": "U12"},
    {"title": "Broken record", "stage": "sideways"},
    42
]"#;

pub fn catalog() -> ActivityCatalog {
    ActivityCatalog::from_json_str(CATALOG_JSON, &StageKeywordTable::default())
        .expect("Fixture catalog must parse")
}

/// Helper function to create a test planner with a seeded rng
pub async fn create_test_planner() -> (TempDir, TrainingPlanner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let planner = planner_at(&temp_dir).await;
    (temp_dir, planner)
}

/// Opens another planner on the database inside `temp_dir`.
pub async fn planner_at(temp_dir: &TempDir) -> TrainingPlanner {
    let db_path = temp_dir.path().join("test.db");
    TrainingPlannerBuilder::new()
        .with_database_path(Some(&db_path))
        .with_config(Default::default())
        .with_catalog(catalog())
        .with_seed(Some(7))
        .build()
        .await
        .expect("Failed to create planner")
}
