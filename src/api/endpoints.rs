use serde_json::Value;

use crate::api::client::{ApiError, DashboardApi};
use crate::models::{
    CompositionStat, DurationStats, GlobalStat, HeroStat, ImportLog, ImportTrigger, Match,
    PlacementShare, RatingPoint, StreakBucket, SyncStatus, TrendPoint,
};
use crate::normalize;

pub const IMPORT_START_PATH: &str = "/api/v1/import/start";

/// Every GET endpoint the dashboard reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    RecentMatches { limit: u32 },
    GlobalStats,
    HeroStats,
    RatingTrend,
    Compositions,
    Streaks,
    Distribution,
    MatchDuration,
    EloProgression,
    ImportLogs,
    SyncStatus,
}

/// A normalized payload, one variant per endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    RecentMatches(Vec<Match>),
    GlobalStats(GlobalStat),
    HeroStats(Vec<HeroStat>),
    RatingTrend(Vec<TrendPoint>),
    Compositions(Vec<CompositionStat>),
    Streaks(Vec<StreakBucket>),
    Distribution(Vec<PlacementShare>),
    MatchDuration(DurationStats),
    EloProgression(Vec<RatingPoint>),
    ImportLogs(Vec<ImportLog>),
    SyncStatus(SyncStatus),
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::RecentMatches { limit } => format!("/api/v1/matches/recent?limit={}", limit),
            Endpoint::GlobalStats => "/api/v1/stats/global".to_string(),
            Endpoint::HeroStats => "/api/v1/stats/heroes".to_string(),
            Endpoint::RatingTrend => "/api/v1/stats/rating_trend".to_string(),
            Endpoint::Compositions => "/api/v1/stats/minions".to_string(),
            Endpoint::Streaks => "/api/v1/stats/streaks".to_string(),
            Endpoint::Distribution => "/api/v1/stats/distribution".to_string(),
            Endpoint::MatchDuration => "/api/v1/stats/match_duration".to_string(),
            Endpoint::EloProgression => "/api/v1/stats/elo_progression".to_string(),
            Endpoint::ImportLogs => "/api/v1/import/logs".to_string(),
            Endpoint::SyncStatus => "/api/v1/import/status".to_string(),
        }
    }

    /// Reshape a raw payload into the view model for this endpoint
    pub fn normalize(&self, raw: &Value) -> Fetched {
        match self {
            Endpoint::RecentMatches { .. } => {
                Fetched::RecentMatches(normalize::matches::recent_matches(raw))
            }
            Endpoint::GlobalStats => Fetched::GlobalStats(normalize::stats::global_stats(raw)),
            Endpoint::HeroStats => Fetched::HeroStats(normalize::stats::hero_stats(raw)),
            Endpoint::RatingTrend => Fetched::RatingTrend(normalize::stats::trend_points(raw)),
            Endpoint::Compositions => {
                Fetched::Compositions(normalize::stats::compositions(raw))
            }
            Endpoint::Streaks => Fetched::Streaks(normalize::stats::streaks(raw)),
            Endpoint::Distribution => {
                Fetched::Distribution(normalize::stats::placement_distribution(raw))
            }
            Endpoint::MatchDuration => {
                Fetched::MatchDuration(normalize::stats::durations(raw))
            }
            Endpoint::EloProgression => {
                Fetched::EloProgression(normalize::stats::rating_points(raw))
            }
            Endpoint::ImportLogs => Fetched::ImportLogs(normalize::import::import_logs(raw)),
            Endpoint::SyncStatus => Fetched::SyncStatus(normalize::import::sync_status(raw)),
        }
    }

    /// GET the endpoint and normalize the response
    pub async fn fetch(&self, api: &dyn DashboardApi) -> Result<Fetched, ApiError> {
        let raw = api.get_json(&self.path()).await?;
        Ok(self.normalize(&raw))
    }
}

/// Fetch the current sync status
pub async fn sync_status(api: &dyn DashboardApi) -> Result<SyncStatus, ApiError> {
    let raw = api.get_json(&Endpoint::SyncStatus.path()).await?;
    Ok(normalize::import::sync_status(&raw))
}

/// Ask the backend to start an import
pub async fn trigger_import(api: &dyn DashboardApi) -> Result<ImportTrigger, ApiError> {
    let raw = api.post_json(IMPORT_START_PATH).await?;
    Ok(normalize::import::import_trigger(&raw))
}
