use crate::api::{ApiError, Endpoint, Fetched};
use crate::models::{ImportLog, SyncStatus};
use crate::pages::{Page, PageId, Section};

/// Import history and the current sync status
pub struct ImportLogsPage {
    pub sync: Section<SyncStatus>,
    pub logs: Section<Vec<ImportLog>>,
}

impl ImportLogsPage {
    pub fn new() -> Self {
        Self {
            sync: Section::new("sync status"),
            logs: Section::new("import logs"),
        }
    }
}

impl Default for ImportLogsPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for ImportLogsPage {
    fn id(&self) -> PageId {
        PageId::ImportLogs
    }

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![Endpoint::SyncStatus, Endpoint::ImportLogs]
    }

    fn begin(&mut self, endpoint: Endpoint) -> Option<u64> {
        match endpoint {
            Endpoint::SyncStatus => Some(self.sync.begin()),
            Endpoint::ImportLogs => Some(self.logs.begin()),
            _ => None,
        }
    }

    fn apply(&mut self, endpoint: Endpoint, ticket: u64, result: Result<Fetched, ApiError>) {
        match endpoint {
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
            _ => {}
        }
    }
}
