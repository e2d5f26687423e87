mod common;

use common::{create_test_planner, planner_at};
use drillbook_core::{
    models::{AgeBracket, RiskZone, Stage, StagePick},
    params::{
        ComputeWorkload, FinalizePlan, GeneratePlan, GetAcwr, MostUsed, RecordSession, SessionLoad,
    },
    AcwrOutcome, EngineError,
};

#[tokio::test]
async fn test_catalog_loaded_with_drops() {
    let (_temp_dir, planner) = create_test_planner().await;
    let stats = planner.catalog_stats();

    assert_eq!(stats.total, 10);
    assert_eq!(stats.dropped, 2);
    assert_eq!(stats.distinct_identities, 8);
    for stage in Stage::ALL {
        assert_eq!(stats.per_stage.get(&stage), Some(&2));
    }
}

#[tokio::test]
async fn test_generate_plan_does_not_touch_usage() {
    let (_temp_dir, planner) = create_test_planner().await;

    let plan = planner.generate_plan(&GeneratePlan::default()).await;
    assert_eq!(plan.included_stages(), Stage::ALL.to_vec());
    assert!(plan.missing_stages().is_empty());

    let top = planner.most_used(&MostUsed::default()).await.unwrap();
    assert!(top.is_empty());
    assert!(planner.usage_snapshot().await.is_empty());
}

#[tokio::test]
async fn test_finalize_increments_usage_once() {
    let (temp_dir, planner) = create_test_planner().await;
    let plan = planner.generate_plan(&GeneratePlan::default()).await;
    let keys = plan.identity_keys();

    let result = planner
        .finalize_plan(&FinalizePlan {
            plan: plan.clone(),
            session: None,
        })
        .await
        .unwrap();
    assert_eq!(result.usage.len(), 4);
    assert!(result.workload.is_none());
    for key in &keys {
        assert_eq!(result.usage.get(key), 1);
        assert_eq!(planner.usage_snapshot().await.get(key), 1);
    }

    // A second planner on the same file sees the persisted counts
    let reopened = planner_at(&temp_dir).await;
    let counts = reopened.usage_snapshot().await;
    for key in &keys {
        assert_eq!(counts.get(key), 1);
    }
}

#[tokio::test]
async fn test_finalize_records_session_workload() {
    let (_temp_dir, planner) = create_test_planner().await;
    let plan = planner.generate_plan(&GeneratePlan::default()).await;
    let session = SessionLoad {
        coach_id: "coach".to_string(),
        team_id: "u12".to_string(),
        period_key: Some("2025-W07".to_string()),
        week: 0,
        technical: Vec::new(),
        fitness: Vec::new(),
    };

    let result = planner
        .finalize_plan(&FinalizePlan {
            plan,
            session: Some(session),
        })
        .await
        .unwrap();

    // 100 + 250 + 300 + 350 at week 0
    let workload = result.workload.expect("Session workload should be recorded");
    assert_eq!(workload.period_key, "2025-W07");
    assert!((workload.load - 1000.0).abs() < 1e-9);
    assert!((workload.total - 1000.0).abs() < 1e-9);
    let report = workload.acwr.report().expect("Period has load");
    assert_eq!(report.chronic, None);
    assert_eq!(report.ratio, None);
}

#[tokio::test]
async fn test_rejected_session_leaves_usage_untouched() {
    let (temp_dir, planner) = create_test_planner().await;
    let plan = planner.generate_plan(&GeneratePlan::default()).await;
    let session = SessionLoad {
        coach_id: "  ".to_string(),
        team_id: "u12".to_string(),
        period_key: Some("2025-W07".to_string()),
        week: 0,
        technical: Vec::new(),
        fitness: Vec::new(),
    };

    let err = planner
        .finalize_plan(&FinalizePlan {
            plan: plan.clone(),
            session: Some(session),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidInput { ref field, .. } if field == "coach_id"
    ));

    assert!(planner.usage_snapshot().await.is_empty());
    assert!(planner.most_used(&MostUsed::default()).await.unwrap().is_empty());
    let reopened = planner_at(&temp_dir).await;
    assert!(reopened.usage_snapshot().await.is_empty());

    // Retrying with a valid session counts each activity exactly once
    let result = planner
        .finalize_plan(&FinalizePlan {
            plan: plan.clone(),
            session: None,
        })
        .await
        .unwrap();
    for key in plan.identity_keys() {
        assert_eq!(result.usage.get(&key), 1);
    }
}

#[tokio::test]
async fn test_finalize_rejects_empty_plan() {
    let (_temp_dir, planner) = create_test_planner().await;
    let mut plan = planner.generate_plan(&GeneratePlan::default()).await;
    plan.stages = Stage::ALL
        .iter()
        .map(|stage| StagePick::NotFound { stage: *stage })
        .collect();

    let err = planner
        .finalize_plan(&FinalizePlan {
            plan,
            session: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_reroll_keeps_other_stages() {
    let (_temp_dir, planner) = create_test_planner().await;
    let plan = planner.generate_plan(&GeneratePlan::default()).await;

    let result = planner.reroll_stage(&plan, Stage::Small).await;
    assert!(result.changed);
    for stage in [Stage::Warmup, Stage::Large, Stage::Main] {
        assert_eq!(result.plan.pick(stage), plan.pick(stage));
    }
    assert_ne!(result.plan.pick(Stage::Small), plan.pick(Stage::Small));
}

#[tokio::test]
async fn test_match_game_request_for_youth() {
    let (_temp_dir, planner) = create_test_planner().await;
    let plan = planner
        .generate_plan(&GeneratePlan {
            age: AgeBracket::U12ToU13,
            match_game: true,
            ..Default::default()
        })
        .await;

    let main = plan
        .pick(Stage::Main)
        .and_then(StagePick::selection)
        .expect("Main stage should be filled");
    assert_eq!(main.activity.format, "7vs7");
    assert!(main.match_preferred);
}

#[tokio::test]
async fn test_acwr_over_recorded_sessions() {
    let (_temp_dir, planner) = create_test_planner().await;
    for (period, load) in [
        ("2025-W01", 150.0),
        ("2025-W02", 170.0),
        ("2025-W03", 180.0),
        ("2025-W04", 205.0),
        ("2025-W05", 130.0),
        ("2025-W05", 100.0),
    ] {
        planner
            .record_session(&RecordSession {
                coach_id: "coach".to_string(),
                team_id: "u12".to_string(),
                period_key: period.to_string(),
                load,
            })
            .await
            .unwrap();
    }

    let outcome = planner
        .get_acwr(&GetAcwr {
            coach_id: "coach".to_string(),
            team_id: "u12".to_string(),
            period_key: "2025-W05".to_string(),
        })
        .await
        .unwrap();

    let report = outcome.report().expect("Acute load exists");
    assert_eq!(report.acute, 230.0);
    assert_eq!(report.chronic, Some(176.25));
    assert!((report.ratio.unwrap() - 1.304_964_539).abs() < 1e-6);
    assert_eq!(report.risk_zone, Some(RiskZone::Elevated));

    let history = planner.workload_history("coach", "u12").await.unwrap();
    assert_eq!(history.len(), 5);
}

#[tokio::test]
async fn test_acwr_without_load_is_unavailable() {
    let (_temp_dir, planner) = create_test_planner().await;
    let outcome = planner
        .get_acwr(&GetAcwr {
            coach_id: "coach".to_string(),
            team_id: "u12".to_string(),
            period_key: "2025-W05".to_string(),
        })
        .await
        .unwrap();
    assert!(matches!(outcome, AcwrOutcome::Unavailable { .. }));
}

#[tokio::test]
async fn test_record_session_rejects_negative_load() {
    let (_temp_dir, planner) = create_test_planner().await;
    let err = planner
        .record_session(&RecordSession {
            coach_id: "coach".to_string(),
            team_id: "u12".to_string(),
            period_key: "2025-W05".to_string(),
            load: -1.0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_compute_workload_uses_config() {
    let (_temp_dir, planner) = create_test_planner().await;
    let load = planner.compute_workload(&ComputeWorkload {
        week: 0,
        stages: vec![Stage::Main],
        technical: Vec::new(),
        fitness: Vec::new(),
    });
    assert_eq!(load, 350.0);
}
