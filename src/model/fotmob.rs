use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetails {
    pub fixtures: Fixtures,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixtures {
    pub all_fixtures: AllFixtures,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllFixtures {
    // Absent between seasons
    #[serde(default)]
    pub next_match: Option<Fixture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub id: i64,
    pub home: FixtureTeam,
    pub away: FixtureTeam,
    pub not_started: bool,
    pub tournament: Tournament,
    pub status: FixtureStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureTeam {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub league_id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureStatus {
    pub utc_time: DateTime<Utc>,
    #[serde(default)]
    pub started: bool,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub finished: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchDetails {
    pub content: MatchContent,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchContent {
    // Null until the clubs publish their team sheets
    #[serde(default)]
    pub lineup: Option<MatchLineup>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchLineup {
    pub home_team: TeamLineup,
    #[serde(default)]
    pub away_team: Option<TeamLineup>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamLineup {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub starters: Vec<Player>,
    #[serde(default)]
    pub subs: Vec<Player>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub shirt_number: Option<serde_json::Value>,
}
