use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Neutral value used for every profile field the feed leaves out.
pub const NEUTRAL_STAT: f64 = 100.0;

/// Raw team-stats payload as returned by a stats feed. Schema is not fixed.
pub type RawStatsPayload = serde_json::Value;

/// A game listed by the catalog feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub team1: String,
    pub team2: String,
    pub status: GameStatus,
    pub start_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Scheduled,
    Live,
    Finished,
}

impl GameStatus {
    /// Lenient mapping from the status strings different feeds use.
    /// Anything unrecognised is treated as not yet started.
    pub fn from_feed(s: &str) -> GameStatus {
        match s.trim().to_lowercase().as_str() {
            "live" | "in progress" | "inprogress" | "in_progress" | "halftime" | "half time"
            | "ht" | "q1" | "q2" | "q3" | "q4" | "ot" => GameStatus::Live,
            "finished" | "final" | "ft" | "ended" | "closed" => GameStatus::Finished,
            _ => GameStatus::Scheduled,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "scheduled",
            GameStatus::Live => "live",
            GameStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical per-team statistical profile.
///
/// Ratings and pace are multiplicative factors, so every field must be
/// finite and strictly positive before the score formula may use it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamProfile {
    /// Points produced per 100 possessions
    pub offensive_rating: f64,
    /// Points allowed per 100 possessions
    pub defensive_rating: f64,
    /// Possessions per game
    pub pace: f64,
    pub recent_avg_points_for: f64,
    pub recent_avg_points_against: f64,
}

impl Default for TeamProfile {
    fn default() -> Self {
        TeamProfile {
            offensive_rating: NEUTRAL_STAT,
            defensive_rating: NEUTRAL_STAT,
            pace: NEUTRAL_STAT,
            recent_avg_points_for: NEUTRAL_STAT,
            recent_avg_points_against: NEUTRAL_STAT,
        }
    }
}

impl TeamProfile {
    /// Returns the name of the first field that breaks the positivity
    /// invariant, together with its value.
    pub fn first_invalid_field(&self) -> Option<(&'static str, f64)> {
        [
            ("pace", self.pace),
            ("offensive_rating", self.offensive_rating),
            ("defensive_rating", self.defensive_rating),
            ("recent_avg_points_for", self.recent_avg_points_for),
            ("recent_avg_points_against", self.recent_avg_points_against),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite() || *v <= 0.0)
    }
}

/// Outcome of one matchup prediction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub team1: String,
    pub team2: String,
    pub score1: u32,
    pub score2: u32,
    /// Always equal to `team1` or `team2`
    pub winner: String,
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Predicted score: {} {} x {} {} (winner: {})",
            self.team1, self.score1, self.score2, self.team2, self.winner
        )
    }
}
