use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::Result;
use crate::fotmob::FootballData;
use crate::model::fixture::FixtureRecord;
use crate::model::fotmob::Fixture;
use crate::scheduler::{ScheduleRegistrar, ScheduledCheck};
use crate::settings::FixtureCronSettings;
use crate::store::FixtureStore;

/// Team sheets are published an hour before kick-off, and posted a little ahead of that.
pub const KICK_OFF_OFFSET: Duration = Duration::hours(1);
pub const ANNOUNCEMENT_LEAD: Duration = Duration::minutes(15);
pub const AI_CHECK_LENGTH: Duration = Duration::minutes(5);
pub const FOTMOB_CHECK_LENGTH: Duration = Duration::minutes(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The two adjacent windows in which the lineup is polled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineupWindows {
    pub announced: DateTime<Utc>,
    pub ai: CheckWindow,
    pub fotmob: CheckWindow,
}

impl LineupWindows {
    pub fn for_kick_off(kick_off: DateTime<Utc>) -> Self {
        let announced = kick_off - KICK_OFF_OFFSET - ANNOUNCEMENT_LEAD;
        let ai = CheckWindow { start: announced, end: announced + AI_CHECK_LENGTH };
        let fotmob = CheckWindow { start: ai.end, end: ai.end + FOTMOB_CHECK_LENGTH };
        Self { announced, ai, fotmob }
    }
}

/// Why a fixture does not get lineup checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ineligible {
    AwayFixture,
    AlreadyStarted,
    Cancelled,
    OtherCompetition,
    NotToday,
}

pub fn check_eligibility(
    fixture: &Fixture,
    team_id: i64,
    league_id: i64,
    today: NaiveDate,
) -> std::result::Result<(), Ineligible> {
    if fixture.home.id != team_id {
        return Err(Ineligible::AwayFixture);
    }
    if !fixture.not_started || fixture.status.started {
        return Err(Ineligible::AlreadyStarted);
    }
    if fixture.status.cancelled {
        return Err(Ineligible::Cancelled);
    }
    if fixture.tournament.league_id != league_id {
        return Err(Ineligible::OtherCompetition);
    }
    if fixture.status.utc_time.date_naive() != today {
        return Err(Ineligible::NotToday);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScheduleOutcome {
    NoFixture,
    Skipped { match_id: i64, reason: Ineligible },
    Scheduled { match_id: i64, windows: LineupWindows },
}

/// Daily job: find today's home fixture and register the lineup checks around it.
pub struct Orchestrator<D, S, R> {
    data: D,
    store: S,
    registrar: R,
    settings: FixtureCronSettings,
}

impl<D, S, R> Orchestrator<D, S, R>
where
    D: FootballData,
    S: FixtureStore,
    R: ScheduleRegistrar,
{
    pub fn new(data: D, store: S, registrar: R, settings: FixtureCronSettings) -> Self {
        Self { data, store, registrar, settings }
    }

    pub fn into_parts(self) -> (D, S, R) {
        (self.data, self.store, self.registrar)
    }

    /// Accepts the current time so the daily run can be replayed in tests.
    #[instrument(level = "info", skip(self), fields(team_id = self.settings.team_id))]
    pub async fn run(&self, now: DateTime<Utc>) -> Result<ScheduleOutcome> {
        let details = self.data.team_details(self.settings.team_id).await?;
        let Some(fixture) = details.fixtures.all_fixtures.next_match else {
            info!("No upcoming fixture");
            return Ok(ScheduleOutcome::NoFixture);
        };

        let today = now.date_naive();
        if let Err(reason) =
            check_eligibility(&fixture, self.settings.team_id, self.settings.league_id, today)
        {
            info!(match_id = fixture.id, ?reason, "Fixture not eligible for lineup checks");
            return Ok(ScheduleOutcome::Skipped { match_id: fixture.id, reason });
        }

        let kick_off = fixture.status.utc_time;
        let record = FixtureRecord {
            match_id: fixture.id,
            tournament_id: fixture.tournament.league_id,
            kick_off,
            lineup: None,
            announced: false,
        };
        self.store.put_fixture(&record).await?;

        let windows = LineupWindows::for_kick_off(kick_off);
        let (ai_check, fotmob_check) = self.checks(&record, &windows);
        tokio::try_join!(
            self.registrar.register(&ai_check),
            self.registrar.register(&fotmob_check)
        )?;

        info!(match_id = fixture.id, announced = %windows.announced, "Scheduled lineup checks");
        Ok(ScheduleOutcome::Scheduled { match_id: fixture.id, windows })
    }

    fn checks(
        &self,
        record: &FixtureRecord,
        windows: &LineupWindows,
    ) -> (ScheduledCheck, ScheduledCheck) {
        let date = record.kick_off.format("%Y-%m-%d");
        let ai = ScheduledCheck {
            name: format!("ai-check-lineup-{}", date),
            start: windows.ai.start,
            end: windows.ai.end,
            target_arn: self.settings.ai_lineup_checker_arn.clone(),
            payload: serde_json::json!({
                "matchId": record.match_id,
                "lineupAnnouncementAt": windows.announced.to_rfc3339(),
            }),
        };
        let fotmob = ScheduledCheck {
            name: format!("check-lineup-{}", date),
            start: windows.fotmob.start,
            end: windows.fotmob.end,
            target_arn: self.settings.lineup_checker_arn.clone(),
            payload: serde_json::json!({ "matchId": record.match_id }),
        };
        (ai, fotmob)
    }
}
