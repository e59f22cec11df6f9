use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Detail type shared by every lineup announcement on the event bus.
pub const LINEUP_SET_DETAIL_TYPE: &str = "Lineup Set";

/// One stored record per tracked match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureRecord {
    pub match_id: i64,
    pub tournament_id: i64,
    pub kick_off: DateTime<Utc>,
    pub lineup: Option<Lineup>,
    /// Set once a `Lineup Set` event for the stored lineup has been accepted by the bus.
    pub announced: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineup {
    pub starters: Vec<String>,
    pub bench: Vec<String>,
}

/// A lineup as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLineup {
    pub lineup: Lineup,
    pub announced: bool,
}

/// Event detail emitted once a lineup has been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineupSet {
    pub match_id: i64,
    pub starters: Vec<String>,
    pub bench: Vec<String>,
}

impl LineupSet {
    pub fn new(match_id: i64, lineup: &Lineup) -> Self {
        Self { match_id, starters: lineup.starters.clone(), bench: lineup.bench.clone() }
    }
}

/// Which resolver produced a lineup. Used as the event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineupOrigin {
    #[serde(rename = "lineup-checker")]
    Fotmob,
    #[serde(rename = "ai-lineup-checker")]
    Vision,
}

impl LineupOrigin {
    pub fn source(&self) -> &'static str {
        match self {
            LineupOrigin::Fotmob => "lineup-checker",
            LineupOrigin::Vision => "ai-lineup-checker",
        }
    }
}
