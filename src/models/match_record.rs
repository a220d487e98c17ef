use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A finished (or still pending) Battlegrounds match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Hero played
    pub hero_name: String,

    /// Hero art sent by the backend, if any
    pub hero_image: Option<String>,

    /// Final ranking
    pub placement: Placement,

    /// Win / top 4 / loss
    pub game_result: GameResult,

    /// Rating before the match
    pub rating_before: Option<i64>,

    /// Rating after the match
    pub rating_after: Option<i64>,

    /// Rating change caused by this match
    pub rating_delta: i64,

    /// Match length in minutes
    pub duration_min: Option<f64>,

    pub start_time: Option<NaiveDateTime>,

    pub end_time: Option<NaiveDateTime>,

    /// Final board, in board order
    pub minions: Vec<String>,

    /// Image per board slot; index-aligned with `minions` when lengths agree
    pub minion_images: Vec<String>,
}

/// Final ranking of a player, 1-8, or pending while the match is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Rank(u8),
    Pending,
}

impl Placement {
    /// Accepts 1..=8, anything else is pending
    pub fn from_rank(rank: i64) -> Self {
        if (1..=8).contains(&rank) {
            Placement::Rank(rank as u8)
        } else {
            Placement::Pending
        }
    }

    pub fn rank(&self) -> Option<u8> {
        match self {
            Placement::Rank(r) => Some(*r),
            Placement::Pending => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Placement::Rank(r) => r.to_string(),
            Placement::Pending => "pending".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Win,
    Top4,
    Loss,
    Unknown,
}

impl GameResult {
    /// Parse the backend's result string, case-insensitive
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "win" | "victory" | "first" => Some(GameResult::Win),
            "top4" | "top 4" | "top_4" => Some(GameResult::Top4),
            "loss" | "lose" | "defeat" => Some(GameResult::Loss),
            _ => None,
        }
    }

    /// Outcome implied by a placement
    pub fn from_placement(placement: Placement) -> Self {
        match placement {
            Placement::Rank(1) => GameResult::Win,
            Placement::Rank(r) if r <= 4 => GameResult::Top4,
            Placement::Rank(_) => GameResult::Loss,
            Placement::Pending => GameResult::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::Win => "win",
            GameResult::Top4 => "top4",
            GameResult::Loss => "loss",
            GameResult::Unknown => "unknown",
        }
    }

    pub fn is_top4(&self) -> bool {
        matches!(self, GameResult::Win | GameResult::Top4)
    }
}
