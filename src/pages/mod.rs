//! Page state: each page owns a set of independently loaded sections.
//!
//! A refresh hands out one `FetchRequest` per section. Requests run
//! anywhere (spawned tasks in the UI, inline in tests and the snapshot
//! binary) and come back as `FetchOutcome`s that the page applies.

pub mod advanced;
pub mod dashboard;
pub mod import_action;
pub mod import_logs;
pub mod matches;
pub mod section;
pub mod stats;

use futures_util::future::join_all;

use crate::api::{ApiError, DashboardApi, Endpoint, Fetched};

pub use advanced::AdvancedPage;
pub use dashboard::DashboardPage;
pub use import_action::{ImportAction, ImportPhase, Toast, ToastKind};
pub use import_logs::ImportLogsPage;
pub use matches::MatchesPage;
pub use section::{LoadState, Section, SectionData};
pub use stats::StatsPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    Dashboard,
    Matches,
    Stats,
    Advanced,
    ImportLogs,
}

impl PageId {
    pub const ALL: [PageId; 5] = [
        PageId::Dashboard,
        PageId::Matches,
        PageId::Stats,
        PageId::Advanced,
        PageId::ImportLogs,
    ];

    pub fn title(self) -> &'static str {
        match self {
            PageId::Dashboard => "Dashboard",
            PageId::Matches => "Matches",
            PageId::Stats => "Stats",
            PageId::Advanced => "Advanced",
            PageId::ImportLogs => "Import logs",
        }
    }

    pub fn index(self) -> usize {
        PageId::ALL.iter().position(|p| *p == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        PageId::ALL.get(index).copied()
    }

    pub fn next(self) -> Self {
        PageId::ALL[(self.index() + 1) % PageId::ALL.len()]
    }

    pub fn previous(self) -> Self {
        PageId::ALL[(self.index() + PageId::ALL.len() - 1) % PageId::ALL.len()]
    }
}

/// One section load waiting to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub page: PageId,
    pub endpoint: Endpoint,
    pub ticket: u64,
}

impl FetchRequest {
    pub async fn run(self, api: &dyn DashboardApi) -> FetchOutcome {
        let result = self.endpoint.fetch(api).await;
        FetchOutcome {
            page: self.page,
            endpoint: self.endpoint,
            ticket: self.ticket,
            result,
        }
    }
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub page: PageId,
    pub endpoint: Endpoint,
    pub ticket: u64,
    pub result: Result<Fetched, ApiError>,
}

pub trait Page: Send {
    fn id(&self) -> PageId;

    /// Endpoints feeding this page's sections
    fn endpoints(&self) -> Vec<Endpoint>;

    /// Put the section fed by `endpoint` into Loading and return its ticket
    fn begin(&mut self, endpoint: Endpoint) -> Option<u64>;

    /// Apply a finished load; stale tickets are dropped by the section
    fn apply(&mut self, endpoint: Endpoint, ticket: u64, result: Result<Fetched, ApiError>);

    fn begin_refresh(&mut self) -> Vec<FetchRequest> {
        let endpoints = self.endpoints();
        self.begin_sections(&endpoints)
    }

    /// Reload only the given sections (those this page does not have are skipped)
    fn begin_sections(&mut self, endpoints: &[Endpoint]) -> Vec<FetchRequest> {
        let page = self.id();
        endpoints
            .iter()
            .filter_map(|endpoint| {
                self.begin(*endpoint).map(|ticket| FetchRequest {
                    page,
                    endpoint: *endpoint,
                    ticket,
                })
            })
            .collect()
    }

    fn apply_outcome(&mut self, outcome: FetchOutcome) {
        self.apply(outcome.endpoint, outcome.ticket, outcome.result);
    }
}

/// Run a set of requests concurrently
pub async fn run_all(requests: Vec<FetchRequest>, api: &dyn DashboardApi) -> Vec<FetchOutcome> {
    join_all(requests.into_iter().map(|request| request.run(api))).await
}

/// Refresh every section of a page and wait for all of them
pub async fn refresh_page(page: &mut dyn Page, api: &dyn DashboardApi) {
    let requests = page.begin_refresh();
    for outcome in run_all(requests, api).await {
        page.apply_outcome(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_cycle() {
        assert_eq!(PageId::Dashboard.next(), PageId::Matches);
        assert_eq!(PageId::ImportLogs.next(), PageId::Dashboard);
        assert_eq!(PageId::Dashboard.previous(), PageId::ImportLogs);
        assert_eq!(PageId::from_index(3), Some(PageId::Advanced));
        assert_eq!(PageId::from_index(5), None);
    }
}
