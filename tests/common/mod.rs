#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use match_lineup_bot::Result;
use match_lineup_bot::events::EventPublisher;
use match_lineup_bot::fotmob::FootballData;
use match_lineup_bot::mastodon::StatusFeed;
use match_lineup_bot::mistral::VisionModel;
use match_lineup_bot::model::fixture::{
    FixtureRecord, Lineup, LineupOrigin, LineupSet, StoredLineup,
};
use match_lineup_bot::model::fotmob::{MatchDetails, TeamDetails};
use match_lineup_bot::model::mastodon::Status;
use match_lineup_bot::rotation::{SecretVersionStore, TokenService};
use match_lineup_bot::scheduler::{ScheduleRegistrar, ScheduledCheck};
use match_lineup_bot::settings::FixtureCronSettings;
use match_lineup_bot::store::FixtureStore;
use match_lineup_bot::twilio::SmsSender;

pub const TEAM_ID: i64 = 8559;
pub const LEAGUE_ID: i64 = 108;

pub fn load(name: &str) -> String {
    std::fs::read_to_string(format!("tests/data/{}", name))
        .unwrap_or_else(|_| panic!("failed to read {}", name))
}

pub fn settings() -> FixtureCronSettings {
    FixtureCronSettings {
        table_name: "match-bot-fixtures-table".to_string(),
        schedule_group_name: "lineup-schedule-group".to_string(),
        scheduler_role_arn: "arn:aws:iam::123456789012:role/scheduler".to_string(),
        lineup_checker_arn: "arn:aws:lambda:eu-west-2:123456789012:function:check-lineup"
            .to_string(),
        ai_lineup_checker_arn: "arn:aws:lambda:eu-west-2:123456789012:function:ai-check-lineup"
            .to_string(),
        team_id: TEAM_ID,
        league_id: LEAGUE_ID,
    }
}

pub fn lineup(starters: &[&str], bench: &[&str]) -> Lineup {
    Lineup {
        starters: starters.iter().map(|s| s.to_string()).collect(),
        bench: bench.iter().map(|s| s.to_string()).collect(),
    }
}

/// Serves canned FotMob payloads.
pub struct FakeFootballData {
    pub team_details: String,
    pub match_details: String,
}

impl FakeFootballData {
    pub fn with_team_details(team_details: String) -> Self {
        Self { team_details, match_details: load("match_details_pending.json") }
    }

    pub fn with_match_details(match_details: String) -> Self {
        Self { team_details: load("team_details.json"), match_details }
    }
}

impl FootballData for FakeFootballData {
    async fn team_details(&self, _team_id: i64) -> Result<TeamDetails> {
        Ok(serde_json::from_str(&self.team_details)?)
    }

    async fn match_details(&self, _match_id: i64) -> Result<MatchDetails> {
        Ok(serde_json::from_str(&self.match_details)?)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub records: Mutex<HashMap<i64, FixtureRecord>>,
    pub puts: Mutex<usize>,
    pub lineup_writes: Mutex<usize>,
    pub announcements: Mutex<usize>,
}

impl MemoryStore {
    pub fn with_record(record: FixtureRecord) -> Self {
        let store = Self::default();
        store.records.lock().unwrap().insert(record.match_id, record);
        store
    }

    pub fn record(&self, match_id: i64) -> Option<FixtureRecord> {
        self.records.lock().unwrap().get(&match_id).cloned()
    }
}

impl FixtureStore for MemoryStore {
    async fn put_fixture(&self, record: &FixtureRecord) -> Result<()> {
        *self.puts.lock().unwrap() += 1;
        self.records.lock().unwrap().insert(record.match_id, record.clone());
        Ok(())
    }

    async fn lineup(&self, match_id: i64) -> Result<Option<StoredLineup>> {
        Ok(self.record(match_id).and_then(|r| {
            let announced = r.announced;
            r.lineup.map(|lineup| StoredLineup { lineup, announced })
        }))
    }

    async fn set_lineup_if_absent(&self, match_id: i64, lineup: &Lineup) -> Result<bool> {
        let mut records = self.records.lock().unwrap();
        let record = records.entry(match_id).or_insert_with(|| FixtureRecord {
            match_id,
            tournament_id: LEAGUE_ID,
            kick_off: chrono::Utc::now(),
            lineup: None,
            announced: false,
        });
        if record.lineup.is_some() {
            return Ok(false);
        }
        record.lineup = Some(lineup.clone());
        record.announced = false;
        *self.lineup_writes.lock().unwrap() += 1;
        Ok(true)
    }

    async fn mark_announced(&self, match_id: i64) -> Result<()> {
        if let Some(record) = self.records.lock().unwrap().get_mut(&match_id) {
            record.announced = true;
        }
        *self.announcements.lock().unwrap() += 1;
        Ok(())
    }
}

/// A store where another check wins the race between the read and the write.
pub struct RacingStore {
    pub winner: Lineup,
    pub inner: MemoryStore,
}

impl FixtureStore for RacingStore {
    async fn put_fixture(&self, record: &FixtureRecord) -> Result<()> {
        self.inner.put_fixture(record).await
    }

    async fn lineup(&self, _match_id: i64) -> Result<Option<StoredLineup>> {
        Ok(None)
    }

    async fn set_lineup_if_absent(&self, match_id: i64, _lineup: &Lineup) -> Result<bool> {
        self.inner.set_lineup_if_absent(match_id, &self.winner).await?;
        Ok(false)
    }

    async fn mark_announced(&self, match_id: i64) -> Result<()> {
        self.inner.mark_announced(match_id).await
    }
}

/// Records accepted events. The first `failures` publishes are rejected.
#[derive(Default)]
pub struct RecordingPublisher {
    pub events: Mutex<Vec<(LineupOrigin, LineupSet)>>,
    pub failures: Mutex<usize>,
    pub attempts: Mutex<usize>,
}

impl RecordingPublisher {
    pub fn failing(failures: usize) -> Self {
        Self { failures: Mutex::new(failures), ..Default::default() }
    }

    pub fn events(&self) -> Vec<(LineupOrigin, LineupSet)> {
        self.events.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

impl EventPublisher for RecordingPublisher {
    async fn publish(&self, origin: LineupOrigin, event: &LineupSet) -> Result<()> {
        *self.attempts.lock().unwrap() += 1;
        let mut failures = self.failures.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(match_lineup_bot::Error::Publish("bus unavailable".to_string()));
        }
        self.events.lock().unwrap().push((origin, event.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingRegistrar {
    pub checks: Mutex<Vec<ScheduledCheck>>,
}

impl RecordingRegistrar {
    pub fn checks(&self) -> Vec<ScheduledCheck> {
        let mut checks = self.checks.lock().unwrap().clone();
        checks.sort_by_key(|c| c.start);
        checks
    }
}

impl ScheduleRegistrar for RecordingRegistrar {
    async fn register(&self, check: &ScheduledCheck) -> Result<()> {
        self.checks.lock().unwrap().push(check.clone());
        Ok(())
    }
}

pub struct FakeFeed {
    pub statuses: Vec<Status>,
}

impl FakeFeed {
    pub fn from_file(name: &str) -> Self {
        Self { statuses: serde_json::from_str(&load(name)).expect("statuses json") }
    }
}

impl StatusFeed for FakeFeed {
    async fn recent_media_statuses(&self) -> Result<Vec<Status>> {
        Ok(self.statuses.clone())
    }
}

/// Answers every image with the same canned completion.
pub struct FakeModel {
    pub answer: Option<String>,
    pub images: Mutex<Vec<String>>,
}

impl FakeModel {
    pub fn answering(answer: Option<&str>) -> Self {
        Self { answer: answer.map(str::to_string), images: Mutex::new(Vec::new()) }
    }
}

impl VisionModel for FakeModel {
    async fn complete(&self, image_url: &str, _prompt: &str) -> Result<Option<String>> {
        self.images.lock().unwrap().push(image_url.to_string());
        Ok(self.answer.clone())
    }
}

#[derive(Default)]
pub struct RecordingSms {
    pub sent: Mutex<Vec<(String, String)>>,
    pub failing_number: Option<String>,
}

impl SmsSender for RecordingSms {
    async fn send(&self, to: &str, body: &str) -> Result<()> {
        if self.failing_number.as_deref() == Some(to) {
            return Err(match_lineup_bot::Error::Publish(format!("undeliverable: {}", to)));
        }
        self.sent.lock().unwrap().push((to.to_string(), body.to_string()));
        Ok(())
    }
}

/// Secret versions keyed by version id, with their stage labels.
#[derive(Default)]
pub struct MemorySecrets {
    pub versions: Mutex<HashMap<String, (String, Vec<String>)>>,
}

impl MemorySecrets {
    pub fn with_current(version_id: &str, value: &str) -> Self {
        let secrets = Self::default();
        secrets
            .versions
            .lock()
            .unwrap()
            .insert(version_id.to_string(), (value.to_string(), vec!["AWSCURRENT".to_string()]));
        secrets
    }

    pub fn stages(&self, version_id: &str) -> Vec<String> {
        self.versions
            .lock()
            .unwrap()
            .get(version_id)
            .map(|(_, stages)| stages.clone())
            .unwrap_or_default()
    }

    pub fn value(&self, version_id: &str) -> Option<String> {
        self.versions.lock().unwrap().get(version_id).map(|(value, _)| value.clone())
    }

    fn with_stage(&self, stage: &str) -> Option<(String, String)> {
        self.versions
            .lock()
            .unwrap()
            .iter()
            .find(|(_, (_, stages))| stages.iter().any(|s| s == stage))
            .map(|(id, (value, _))| (id.clone(), value.clone()))
    }
}

impl SecretVersionStore for MemorySecrets {
    async fn put_pending(&self, _secret_id: &str, version_id: &str, value: &str) -> Result<()> {
        let mut versions = self.versions.lock().unwrap();
        for (_, stages) in versions.values_mut() {
            stages.retain(|s| s != "AWSPENDING");
        }
        let pending = (value.to_string(), vec!["AWSPENDING".to_string()]);
        versions.insert(version_id.to_string(), pending);
        Ok(())
    }

    async fn pending_value(&self, _secret_id: &str) -> Result<Option<String>> {
        Ok(self.with_stage("AWSPENDING").map(|(_, value)| value))
    }

    async fn current_version(&self, _secret_id: &str) -> Result<Option<String>> {
        Ok(self.with_stage("AWSCURRENT").map(|(id, _)| id))
    }

    async fn promote(
        &self,
        _secret_id: &str,
        version_id: &str,
        previous: Option<&str>,
    ) -> Result<()> {
        let mut versions = self.versions.lock().unwrap();
        if let Some(previous) = previous {
            if let Some((_, stages)) = versions.get_mut(previous) {
                stages.retain(|s| s != "AWSCURRENT");
            }
        }
        if let Some((_, stages)) = versions.get_mut(version_id) {
            stages.push("AWSCURRENT".to_string());
        }
        Ok(())
    }
}

pub struct FakeTokens {
    pub token: String,
    pub test_configured: bool,
    pub accepted_header: Option<(String, String)>,
    pub validated: Mutex<Vec<HashMap<String, String>>>,
}

impl FakeTokens {
    pub fn issuing(token: &str) -> Self {
        Self {
            token: token.to_string(),
            test_configured: true,
            accepted_header: None,
            validated: Mutex::new(Vec::new()),
        }
    }
}

impl TokenService for FakeTokens {
    async fn issue(&self) -> Result<String> {
        Ok(self.token.clone())
    }

    async fn validate(&self, headers: &HashMap<String, String>) -> Result<bool> {
        if !self.test_configured {
            return Ok(false);
        }
        self.validated.lock().unwrap().push(headers.clone());
        if let Some((name, value)) = &self.accepted_header {
            if headers.get(name) != Some(value) {
                return Err(match_lineup_bot::Error::Rotation("token is not valid".to_string()));
            }
        }
        Ok(true)
    }
}
