use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum_macros::{Display, EnumString};

/// Which lineup a player or event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum Team {
    A,
    B
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventType {
    Goal,
    Assist
}

/// One continuous block of play with its own score.
///
/// A segment flagged as a butt game is the decisive tie-breaker block and
/// carries amplified weight for both the goal differential and the events
/// scored inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub goals_a: i32,
    pub goals_b: i32,
    pub segment_index: usize,
    #[serde(default)]
    pub is_butt_game: bool
}

/// A single goal or assist, attributed to a player, a team and a segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub player: String,
    pub team: Team,
    pub event_type: EventType,
    pub segment_index: usize
}

/// A finished match as assembled by the host from persisted segments, events
/// and lineups. Immutable for the duration of one update.
///
/// The host guarantees the ingestion contract: disjoint lineups, a non-empty
/// venue, and event segment indices that point into `segments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub venue: String,
    pub team_a: Vec<String>,
    pub team_b: Vec<String>,
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub events: Vec<MatchEvent>,
    /// Ids playing as guests in this match.
    #[serde(default)]
    pub guests: BTreeSet<String>
}

impl Match {
    /// Both lineups, team A first.
    pub fn participants(&self) -> impl Iterator<Item = &String> {
        self.team_a.iter().chain(self.team_b.iter())
    }
}
