use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// Every `*_rate` and `share` below is a fraction in [0, 1].

/// Aggregate numbers across all recorded matches
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GlobalStat {
    pub total_matches: u64,
    pub avg_placement: f64,
    pub top4_rate: f64,
    pub win_rate: f64,
    /// Minutes
    pub avg_duration: Option<f64>,
    pub avg_rating_delta: Option<f64>,
    pub last_update: Option<NaiveDateTime>,
}

/// Per-hero aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroStat {
    pub hero_name: String,
    pub avg_placement: f64,
    pub pick_rate: Option<f64>,
    pub win_rate: f64,
    pub top4_rate: Option<f64>,
    pub matches: Option<u64>,
}

/// One point of a time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Label as sent by the backend
    pub label: String,
    pub timestamp: Option<NaiveDateTime>,
    pub win_rate: Option<f64>,
    pub avg_placement: Option<f64>,
    pub rating: Option<f64>,
}

/// Rating after a match and the change from the previous one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingPoint {
    pub label: String,
    pub timestamp: Option<NaiveDateTime>,
    pub rating: f64,
    pub diff: f64,
}

/// Results grouped by the dominant minion type of the final board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionStat {
    pub composition: String,
    pub games: u64,
    pub top4_rate: f64,
}

/// Number of win streaks of a given length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakBucket {
    pub length: u32,
    pub count: u32,
}

/// Share of matches finishing at a placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementShare {
    pub placement: u8,
    pub share: f64,
}

/// Duration aggregates in minutes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DurationStats {
    pub avg: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl DurationStats {
    pub fn is_empty(&self) -> bool {
        self.avg.is_none() && self.min.is_none() && self.max.is_none()
    }
}
