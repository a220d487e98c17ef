use crate::api::{ApiError, Endpoint, Fetched};
use crate::models::{CompositionStat, GlobalStat, HeroStat, ImportLog, SyncStatus, TrendPoint};
use crate::pages::{Page, PageId, Section};

/// Points shown in the dashboard's short trend chart
pub const RECENT_TREND_POINTS: usize = 10;

/// Landing page: headline numbers, import state and the main charts
pub struct DashboardPage {
    pub global: Section<GlobalStat>,
    pub sync: Section<SyncStatus>,
    pub logs: Section<Vec<ImportLog>>,
    pub trend: Section<Vec<TrendPoint>>,
    pub heroes: Section<Vec<HeroStat>>,
    pub compositions: Section<Vec<CompositionStat>>,
}

impl DashboardPage {
    pub fn new() -> Self {
        Self {
            global: Section::new("global stats"),
            sync: Section::new("sync status"),
            logs: Section::new("import logs"),
            trend: Section::new("rating trend"),
            heroes: Section::new("hero stats"),
            compositions: Section::new("compositions"),
        }
    }
}

impl Default for DashboardPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for DashboardPage {
    fn id(&self) -> PageId {
        PageId::Dashboard
    }

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![
            Endpoint::GlobalStats,
            Endpoint::SyncStatus,
            Endpoint::ImportLogs,
            Endpoint::RatingTrend,
            Endpoint::HeroStats,
            Endpoint::Compositions,
        ]
    }

    fn begin(&mut self, endpoint: Endpoint) -> Option<u64> {
        match endpoint {
            Endpoint::GlobalStats => Some(self.global.begin()),
            Endpoint::SyncStatus => Some(self.sync.begin()),
            Endpoint::ImportLogs => Some(self.logs.begin()),
            Endpoint::RatingTrend => Some(self.trend.begin()),
            Endpoint::HeroStats => Some(self.heroes.begin()),
            Endpoint::Compositions => Some(self.compositions.begin()),
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
            Endpoint::SyncStatus => {
                self.sync.apply(ticket, result, |f| match f {
                    Fetched::SyncStatus(v) => Some(v),
                    _ => None,
                });
            }
            Endpoint::ImportLogs => {
                self.logs.apply(ticket, result, |f| match f {
                    Fetched::ImportLogs(v) => Some(v),
                    _ => None,
                });
            }
            Endpoint::RatingTrend => {
                self.trend.apply(ticket, result, |f| match f {
                    Fetched::RatingTrend(v) => Some(v),
                    _ => None,
                });
            }
            Endpoint::HeroStats => {
                self.heroes.apply(ticket, result, |f| match f {
                    Fetched::HeroStats(v) => Some(v),
                    _ => None,
                });
            }
            Endpoint::Compositions => {
                self.compositions.apply(ticket, result, |f| match f {
                    Fetched::Compositions(v) => Some(v),
                    _ => None,
                });
            }
            _ => {}
        }
    }
}
