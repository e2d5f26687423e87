use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CATALOG_JSON: &str = r#"[
    {"title": "Coordination ladder warm-up", "sections": {"Process": "Quick feet. Finish with a pass."}},
    {"title": "Passing star", "stage": "warmup"},
    {"title": "Rondo 4 v 2", "stage": "small"},
    {"title": "1 v 1 duels to goal", "stage": "small"},
    {"title": "Possession game 6 v 6", "stage": "large"},
    {"title": "Positional play 7 v 7", "stage": "large"},
    {"title": "Final match 11 v 11", "stage": "main"},
    {"title": "Match game 7 v 7", "stage": "main"},
    {"title": "Broken record", "stage": "sideways"},
    42
]"#;

/// Temporary directory holding the catalog fixture.
fn create_cli_test_environment() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    std::fs::write(temp_dir.path().join("catalog.json"), CATALOG_JSON)
        .expect("Failed to write catalog");
    temp_dir
}

/// Command with plain output, an isolated database and the fixture catalog.
fn drillbook_cmd(temp_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("drillbook").expect("Failed to find drillbook binary");
    cmd.env("XDG_CONFIG_HOME", temp_dir)
        .env("XDG_DATA_HOME", temp_dir)
        .arg("--no-color")
        .arg("--database-file")
        .arg(temp_dir.join("cli_test.db"))
        .arg("--catalog")
        .arg(temp_dir.join("catalog.json"))
        .args(["--seed", "11"]);
    cmd
}

#[test]
fn test_cli_generate_plan() {
    let temp_dir = create_cli_test_environment();

    drillbook_cmd(temp_dir.path())
        .args(["plan", "generate", "--age", "u12-u13", "--match-game"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Training plan"))
        .stdout(predicate::str::contains("## 1. Warm-up"))
        .stdout(predicate::str::contains("## 4. Main phase - match game"));
}

#[test]
fn test_cli_generate_requires_catalog() {
    let temp_dir = TempDir::new().unwrap();

    Command::cargo_bin("drillbook")
        .unwrap()
        .env("XDG_CONFIG_HOME", temp_dir.path())
        .args(["--no-color", "--database-file"])
        .arg(temp_dir.path().join("cli_test.db"))
        .args(["plan", "generate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("catalog is empty"));
}

#[test]
fn test_cli_rejects_unknown_preset() {
    let temp_dir = create_cli_test_environment();

    drillbook_cmd(temp_dir.path())
        .args(["plan", "generate", "--age", "u99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid AgeBracket"));
}

#[test]
fn test_cli_finalize_saved_plan() {
    let temp_dir = create_cli_test_environment();
    let plan_path = temp_dir.path().join("plan.json");

    drillbook_cmd(temp_dir.path())
        .args(["plan", "generate", "--save"])
        .arg(&plan_path)
        .assert()
        .success();

    // Generating alone leaves usage untouched
    drillbook_cmd(temp_dir.path())
        .arg("usage")
        .assert()
        .success()
        .stdout(predicate::str::contains("No activities have been finalized yet."));

    drillbook_cmd(temp_dir.path())
        .args(["plan", "finalize"])
        .arg(&plan_path)
        .args(["--coach", "c1", "--team", "t1", "--period", "2025-W07"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Finalized plan with 4 activities"))
        .stdout(predicate::str::contains("- Period total: 1000.0"));

    drillbook_cmd(temp_dir.path())
        .args(["usage", "--limit", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(": 1"));
}

#[test]
fn test_cli_reroll_updates_plan_file() {
    let temp_dir = create_cli_test_environment();
    let plan_path = temp_dir.path().join("plan.json");

    drillbook_cmd(temp_dir.path())
        .args(["plan", "generate", "--save"])
        .arg(&plan_path)
        .assert()
        .success();
    let before = std::fs::read_to_string(&plan_path).unwrap();

    drillbook_cmd(temp_dir.path())
        .args(["plan", "reroll"])
        .arg(&plan_path)
        .args(["--stage", "small"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rerolled stage: Small-sided game"));

    let after = std::fs::read_to_string(&plan_path).unwrap();
    assert_ne!(before, after);
}

#[test]
fn test_cli_plan_summary_survives_reroll() {
    let temp_dir = create_cli_test_environment();
    let plan_path = temp_dir.path().join("plan.json");

    drillbook_cmd(temp_dir.path())
        .args(["plan", "generate", "--players", "7-9", "--minutes", "75", "--save"])
        .arg(&plan_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("- Players: 7-9"))
        .stdout(predicate::str::contains("- Duration: 75 min"));

    drillbook_cmd(temp_dir.path())
        .args(["plan", "reroll"])
        .arg(&plan_path)
        .args(["--stage", "large"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Players: 7-9"))
        .stdout(predicate::str::contains("- Duration: 75 min"));
}

#[test]
fn test_cli_rejects_zero_minutes() {
    let temp_dir = create_cli_test_environment();

    drillbook_cmd(temp_dir.path())
        .args(["plan", "generate", "--minutes", "0"])
        .assert()
        .failure();
}

#[test]
fn test_cli_load_record_is_additive() {
    let temp_dir = create_cli_test_environment();

    for (load, expected) in [("100", "period total 100.0"), ("150", "period total 250.0")] {
        drillbook_cmd(temp_dir.path())
            .args([
                "load", "record", "--coach", "c1", "--team", "t1", "--period", "2025-W07",
                "--load", load,
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(expected));
    }
}

#[test]
fn test_cli_acwr() {
    let temp_dir = create_cli_test_environment();

    for (period, load) in [
        ("2025-W01", "150"),
        ("2025-W02", "170"),
        ("2025-W03", "180"),
        ("2025-W04", "205"),
        ("2025-W05", "230"),
    ] {
        drillbook_cmd(temp_dir.path())
            .args([
                "load", "record", "--coach", "c1", "--team", "t1", "--period", period, "--load",
                load,
            ])
            .assert()
            .success();
    }

    drillbook_cmd(temp_dir.path())
        .args(["load", "acwr", "--coach", "c1", "--team", "t1", "--period", "2025-W05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Chronic load: 176"))
        .stdout(predicate::str::contains("- Ratio: 1.30"))
        .stdout(predicate::str::contains("Elevated"));

    drillbook_cmd(temp_dir.path())
        .args(["load", "acwr", "--coach", "c1", "--team", "t1", "--period", "2025-W06"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No load recorded"));
}

#[test]
fn test_cli_load_compute() {
    let temp_dir = create_cli_test_environment();

    drillbook_cmd(temp_dir.path())
        .args([
            "load",
            "compute",
            "--week",
            "2",
            "--stages",
            "warmup,small",
            "--technical",
            "long-passes",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session load: 407.0"));
}

#[test]
fn test_cli_catalog_stats() {
    let temp_dir = create_cli_test_environment();

    drillbook_cmd(temp_dir.path())
        .args(["catalog", "stats", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Records: 10"))
        .stdout(predicate::str::contains("- Dropped while loading: 2"))
        .stdout(predicate::str::contains("invalid stage 'sideways'"));
}

#[test]
fn test_cli_generate_and_finalize_in_one_step() {
    let temp_dir = create_cli_test_environment();

    drillbook_cmd(temp_dir.path())
        .args([
            "plan",
            "generate",
            "--technical",
            "long-passes",
            "--finalize",
            "--coach",
            "c1",
            "--team",
            "t1",
            "--period",
            "2025-W07",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Finalized plan with 4 activities"))
        .stdout(predicate::str::contains("- Session load: 1020.0"));
}

#[test]
fn test_cli_catalog_defaults_to_stats() {
    let temp_dir = create_cli_test_environment();

    drillbook_cmd(temp_dir.path())
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("- Distinct activities: 8"));
}
