use chrono::NaiveDate;
use roster_status::db::MemoryGateway;
use roster_status::{AvailabilityStatus, PlayerId, RosterSchema, StatusPipeline};
use serde_json::{json, Value};
use std::sync::Arc;

fn game_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, 15).unwrap()
}

/// P1 injured and starting, P2 on a team with a game, P3 on a team without one.
fn league() -> MemoryGateway {
    MemoryGateway::new()
        .with_table(
            "dictionarydata",
            vec![
                json!({"TableName": "YearlyStatsBatting", "FieldNameX": "HR", "Verify": 1, "Order": 2}),
                json!({"TableName": "YearlyStatsBatting", "FieldNameX": "AVG", "Verify": 1, "Order": 1}),
                json!({"TableName": "YearlyStatsBatting", "FieldNameX": "OBP", "Verify": 0, "Order": 3}),
            ],
        )
        .with_table(
            "yearlystatsbatting",
            vec![
                json!({"PlayerRefID": "P1", "AVG": 0.310, "HR": 25, "OBP": 0.402}),
                json!({"PlayerRefID": "P2", "AVG": 0.244, "HR": 8, "OBP": 0.301}),
            ],
        )
        .with_table("injuries", vec![json!({"PlayerRefID": "P1"})])
        .with_table("todaysstarters", vec![json!({"PlayerRefID1": "P1"})])
        .with_table(
            "players",
            vec![
                json!({"PlayerRefID": "P1", "TeamID": "T1"}),
                json!({"PlayerRefID": "P2", "TeamID": "T2"}),
                json!({"PlayerRefID": "P3", "TeamID": "T3"}),
            ],
        )
        .with_table("todaysgames", vec![json!({"TeamID": "T1"}), json!({"TeamID": "T2"})])
}

fn pipeline(gateway: &Arc<MemoryGateway>) -> StatusPipeline {
    StatusPipeline::new(gateway.clone(), Arc::new(RosterSchema::default()))
}

async fn status_json(pipeline: &StatusPipeline, player: &str) -> Value {
    let status = pipeline
        .player_status_on(&PlayerId::new(player).unwrap(), game_day())
        .await
        .unwrap();
    serde_json::to_value(&status).unwrap()
}

#[tokio::test]
async fn injured_player_who_is_also_starting_reports_injured() {
    let gateway = Arc::new(league());
    let body = status_json(&pipeline(&gateway), "P1").await;

    assert_eq!(body["status"], json!("Injured"));
    assert_eq!(body["playerRecords"], json!({"AVG": 0.310, "HR": 25}));
}

#[tokio::test]
async fn team_playing_without_signals_reports_empty_status() {
    let gateway = Arc::new(league());
    let body = status_json(&pipeline(&gateway), "P2").await;
    assert_eq!(body["status"], json!(""));
    assert_eq!(body["playerRecords"]["HR"], json!(8));
}

#[tokio::test]
async fn team_without_game_reports_not_playing_and_absent_record() {
    let gateway = Arc::new(league());
    let body = status_json(&pipeline(&gateway), "P3").await;
    assert_eq!(body["status"], json!("Team is not playing"));
    assert_eq!(body["playerRecords"], Value::Null);
}

#[tokio::test]
async fn starting_player_without_injury() {
    let gateway = Arc::new(league());
    gateway.truncate("injuries");
    let status = pipeline(&gateway)
        .player_status_on(&PlayerId::new("P1").unwrap(), game_day())
        .await
        .unwrap();
    assert_eq!(status.status, AvailabilityStatus::Starting);
}

#[tokio::test]
async fn record_keys_follow_projection_order() {
    let gateway = Arc::new(league());
    let status = pipeline(&gateway)
        .player_status_on(&PlayerId::new("P2").unwrap(), game_day())
        .await
        .unwrap();
    let record = status.record.unwrap();
    assert_eq!(record.columns(), vec!["AVG", "HR"]);
    assert_eq!(
        serde_json::to_string(&record).unwrap(),
        r#"{"AVG":0.244,"HR":8}"#
    );
}

#[tokio::test]
async fn repeated_calls_are_identical() {
    let gateway = Arc::new(league());
    let pipeline = pipeline(&gateway);
    let player = PlayerId::new("P2").unwrap();

    let first = pipeline.player_status_on(&player, game_day()).await.unwrap();
    let second = pipeline.player_status_on(&player, game_day()).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn player_without_team_is_a_data_access_error() {
    let gateway = Arc::new(league());
    let err = pipeline(&gateway)
        .player_status_on(&PlayerId::new("P9").unwrap(), game_day())
        .await
        .unwrap_err();
    assert!(err.is_data_access());
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn fault_at_any_lookup_aborts_the_invocation() {
    for table in [
        "dictionarydata",
        "yearlystatsbatting",
        "injuries",
        "todaysstarters",
        "players",
        "todaysgames",
    ] {
        let gateway = Arc::new(league());
        gateway.fail_on(table);
        // P2 reaches every lookup
        let result = pipeline(&gateway)
            .player_status_on(&PlayerId::new("P2").unwrap(), game_day())
            .await;
        assert!(
            matches!(&result, Err(e) if e.is_data_access()),
            "fault on {} should surface as a data access error",
            table
        );
    }
}

#[tokio::test]
async fn projection_is_resolved_before_the_fetch() {
    let gateway = Arc::new(league());
    pipeline(&gateway)
        .player_status_on(&PlayerId::new("P1").unwrap(), game_day())
        .await
        .unwrap();

    let log = gateway.queried_tables();
    assert_eq!(log.first().map(String::as_str), Some("dictionarydata"));
    let fetch = log.iter().position(|t| t == "yearlystatsbatting").unwrap();
    assert!(fetch > 0);
    // injury matched, so no later classifier relation was read
    assert!(!log.iter().any(|t| t == "todaysstarters" || t == "todaysgames"));
}

#[tokio::test]
async fn empty_projection_still_reports_status() {
    let gateway = Arc::new(league());
    gateway.truncate("dictionarydata");
    let body = status_json(&pipeline(&gateway), "P2").await;
    assert_eq!(body["playerRecords"], json!({}));
    assert_eq!(body["status"], json!(""));
}
