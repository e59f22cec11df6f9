mod common;

use chrono::{Duration, TimeZone, Utc};

use common::{FakeFootballData, MemoryStore, RecordingRegistrar, TEAM_ID, LEAGUE_ID, load, settings};
use match_lineup_bot::orchestrator::{Ineligible, Orchestrator, ScheduleOutcome};

fn fixture_json(
    home_id: i64,
    league_id: i64,
    utc_time: &str,
    not_started: bool,
    cancelled: bool,
) -> String {
    serde_json::json!({
        "fixtures": {
            "allFixtures": {
                "nextMatch": {
                    "id": 4507791,
                    "home": { "id": home_id, "name": "Home" },
                    "away": { "id": 1, "name": "Away" },
                    "notStarted": not_started,
                    "tournament": { "name": "League One", "leagueId": league_id },
                    "status": {
                        "utcTime": utc_time,
                        "started": !not_started,
                        "cancelled": cancelled,
                        "finished": false
                    }
                }
            }
        }
    })
    .to_string()
}

fn morning_of_match() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 2, 7, 0, 0).unwrap()
}

async fn run(
    team_details: String,
    now: chrono::DateTime<Utc>,
) -> (ScheduleOutcome, MemoryStore, RecordingRegistrar) {
    let orchestrator = Orchestrator::new(
        FakeFootballData::with_team_details(team_details),
        MemoryStore::default(),
        RecordingRegistrar::default(),
        settings(),
    );
    let outcome = orchestrator.run(now).await.expect("run failed");
    let (_, store, registrar) = orchestrator.into_parts();
    (outcome, store, registrar)
}

#[tokio::test]
async fn schedules_both_checks_for_home_league_fixture_today() {
    let (outcome, store, registrar) = run(load("team_details.json"), morning_of_match()).await;

    let kick_off = Utc.with_ymd_and_hms(2024, 3, 2, 15, 0, 0).unwrap();
    let announced = Utc.with_ymd_and_hms(2024, 3, 2, 13, 45, 0).unwrap();
    match outcome {
        ScheduleOutcome::Scheduled { match_id, windows } => {
            assert_eq!(match_id, 4507791);
            assert_eq!(windows.announced, announced);
        }
        other => panic!("expected scheduled outcome, got {:?}", other),
    }

    let record = store.record(4507791).expect("fixture record written");
    assert_eq!(record.tournament_id, LEAGUE_ID);
    assert_eq!(record.kick_off, kick_off);
    assert_eq!(record.lineup, None);

    let checks = registrar.checks();
    assert_eq!(checks.len(), 2);

    let ai = &checks[0];
    assert_eq!(ai.name, "ai-check-lineup-2024-03-02");
    assert_eq!(ai.start, announced);
    assert_eq!(ai.end, Utc.with_ymd_and_hms(2024, 3, 2, 13, 50, 0).unwrap());
    assert!(ai.target_arn.ends_with("function:ai-check-lineup"));
    assert_eq!(ai.payload["matchId"], 4507791);
    assert_eq!(ai.payload["lineupAnnouncementAt"], "2024-03-02T13:45:00+00:00");

    let fotmob = &checks[1];
    assert_eq!(fotmob.name, "check-lineup-2024-03-02");
    assert_eq!(fotmob.start, Utc.with_ymd_and_hms(2024, 3, 2, 13, 50, 0).unwrap());
    assert_eq!(fotmob.end, Utc.with_ymd_and_hms(2024, 3, 2, 14, 5, 0).unwrap());
    assert!(fotmob.target_arn.ends_with("function:check-lineup"));
    assert_eq!(fotmob.payload, serde_json::json!({ "matchId": 4507791 }));

    assert_eq!(ai.end, fotmob.start, "windows must be contiguous");
    assert_eq!(kick_off - fotmob.end, Duration::minutes(55));
}

#[tokio::test]
async fn away_fixture_has_no_side_effects() {
    let json = fixture_json(8152, LEAGUE_ID, "2024-03-02T15:00:00Z", true, false);
    let (outcome, store, registrar) = run(json, morning_of_match()).await;

    let expected = ScheduleOutcome::Skipped { match_id: 4507791, reason: Ineligible::AwayFixture };
    assert_eq!(outcome, expected);
    assert_eq!(*store.puts.lock().unwrap(), 0);
    assert!(registrar.checks().is_empty());
}

#[tokio::test]
async fn fixture_on_another_day_has_no_side_effects() {
    let json = fixture_json(TEAM_ID, LEAGUE_ID, "2024-03-03T15:00:00Z", true, false);
    let (outcome, store, registrar) = run(json, morning_of_match()).await;

    let expected = ScheduleOutcome::Skipped { match_id: 4507791, reason: Ineligible::NotToday };
    assert_eq!(outcome, expected);
    assert_eq!(*store.puts.lock().unwrap(), 0);
    assert!(registrar.checks().is_empty());
}

#[tokio::test]
async fn skips_started_cancelled_and_cup_fixtures() {
    let cases = [
        (
            fixture_json(TEAM_ID, LEAGUE_ID, "2024-03-02T15:00:00Z", false, false),
            Ineligible::AlreadyStarted,
        ),
        (
            fixture_json(TEAM_ID, LEAGUE_ID, "2024-03-02T15:00:00Z", true, true),
            Ineligible::Cancelled,
        ),
        (
            fixture_json(TEAM_ID, 132, "2024-03-02T15:00:00Z", true, false),
            Ineligible::OtherCompetition,
        ),
    ];
    for (json, reason) in cases {
        let (outcome, store, registrar) = run(json, morning_of_match()).await;
        assert_eq!(outcome, ScheduleOutcome::Skipped { match_id: 4507791, reason });
        assert_eq!(*store.puts.lock().unwrap(), 0);
        assert!(registrar.checks().is_empty());
    }
}

#[tokio::test]
async fn kick_off_just_after_midnight_utc_is_not_today() {
    // Still the evening of the 2nd in the Americas; eligibility compares UTC dates
    let json = fixture_json(TEAM_ID, LEAGUE_ID, "2024-03-03T00:30:00Z", true, false);
    let (outcome, _, _) = run(json, morning_of_match()).await;
    let expected = ScheduleOutcome::Skipped { match_id: 4507791, reason: Ineligible::NotToday };
    assert_eq!(outcome, expected);
}

#[tokio::test]
async fn no_next_match_is_a_no_op() {
    let json =
        serde_json::json!({ "fixtures": { "allFixtures": { "nextMatch": null } } }).to_string();
    let (outcome, store, registrar) = run(json, morning_of_match()).await;
    assert_eq!(outcome, ScheduleOutcome::NoFixture);
    assert_eq!(*store.puts.lock().unwrap(), 0);
    assert!(registrar.checks().is_empty());
}
