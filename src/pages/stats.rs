use crate::api::{ApiError, Endpoint, Fetched};
use crate::models::{GlobalStat, HeroStat, TrendPoint};
use crate::pages::{Page, PageId, Section};

/// Aggregate stats with a manual refresh
pub struct StatsPage {
    pub global: Section<GlobalStat>,
    pub heroes: Section<Vec<HeroStat>>,
    pub trend: Section<Vec<TrendPoint>>,
}

impl StatsPage {
    pub fn new() -> Self {
        Self {
            global: Section::new("global stats"),
            heroes: Section::new("hero stats"),
            trend: Section::new("trend"),
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.global.is_refreshing() || self.heroes.is_refreshing() || self.trend.is_refreshing()
    }
}

impl Default for StatsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for StatsPage {
    fn id(&self) -> PageId {
        PageId::Stats
    }

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![Endpoint::GlobalStats, Endpoint::HeroStats, Endpoint::RatingTrend]
    }

    fn begin(&mut self, endpoint: Endpoint) -> Option<u64> {
        match endpoint {
            Endpoint::GlobalStats => Some(self.global.begin()),
            Endpoint::HeroStats => Some(self.heroes.begin()),
            Endpoint::RatingTrend => Some(self.trend.begin()),
            _ => None,
        }
    }

    fn apply(&mut self, endpoint: Endpoint, ticket: u64, result: Result<Fetched, ApiError>) {
        match endpoint {
            Endpoint::GlobalStats => {
                self.global.apply(ticket, result, |f| match f {
                    Fetched::GlobalStats(v) => Some(v),
                    _ => None,
                });
            }
            Endpoint::HeroStats => {
                self.heroes.apply(ticket, result, |f| match f {
                    Fetched::HeroStats(v) => Some(v),
                    _ => None,
                });
            }
            Endpoint::RatingTrend => {
                self.trend.apply(ticket, result, |f| match f {
                    Fetched::RatingTrend(v) => Some(v),
                    _ => None,
                });
            }
            _ => {}
        }
    }
}
