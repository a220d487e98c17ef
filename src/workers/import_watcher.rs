use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::api::endpoints::{sync_status, trigger_import};
use crate::api::DashboardApi;
use crate::models::{ImportTrigger, SyncStatus};

/// Progress of a manual import, as seen from the dashboard
#[derive(Debug, Clone, PartialEq)]
pub enum ImportEvent {
    /// The trigger request resolved
    Triggered(Result<ImportTrigger, String>),
    /// The job has not settled yet
    Progress(SyncStatus),
    /// A terminal status newer than the one seen before the trigger
    Finished(SyncStatus),
    /// Gave up waiting; the job may still be running
    TimedOut(Option<SyncStatus>),
}

/// Triggers an import, then polls the sync status until the job settles
pub struct ImportWatcher {
    api: Arc<dyn DashboardApi>,
    poll_interval: Duration,
    timeout: Duration,
}

impl ImportWatcher {
    pub fn new(api: Arc<dyn DashboardApi>, poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            api,
            poll_interval,
            timeout,
        }
    }

    /// Run one import to completion, reporting every step on `tx`
    pub async fn run<E>(&self, tx: mpsc::Sender<E>)
    where
        E: From<ImportEvent> + Send + 'static,
    {
        let api = self.api.as_ref();

        // Status before the trigger, to tell the new run from the previous one
        let baseline = match sync_status(api).await {
            Ok(status) => Some(status),
            Err(e) => {
                warn!("Could not read sync status before import: {}", e);
                None
            }
        };

        match trigger_import(api).await {
            Ok(trigger) => {
                info!(
                    "Import triggered ({} matches reported)",
                    trigger
                        .matches_imported
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "?".to_string())
                );
                if !send(&tx, ImportEvent::Triggered(Ok(trigger))).await {
                    return;
                }
            }
            Err(e) => {
                warn!("Import trigger failed: {}", e);
                send(&tx, ImportEvent::Triggered(Err(e.user_message()))).await;
                return;
            }
        }

        let deadline = Instant::now() + self.timeout;
        let mut last_seen = None;

        loop {
            match sync_status(api).await {
                Ok(status) if is_settled(&status, baseline.as_ref()) => {
                    info!("Import finished with status {}", status.status().label());
                    send(&tx, ImportEvent::Finished(status)).await;
                    return;
                }
                Ok(status) => {
                    debug!("Import still pending ({})", status.status().label());
                    last_seen = Some(status.clone());
                    if !send(&tx, ImportEvent::Progress(status)).await {
                        return;
                    }
                }
                Err(e) => warn!("Failed to poll sync status: {}", e),
            }

            if Instant::now() + self.poll_interval > deadline {
                warn!("Import did not settle within {:?}", self.timeout);
                send(&tx, ImportEvent::TimedOut(last_seen)).await;
                return;
            }
            time::sleep(self.poll_interval).await;
        }
    }
}

/// A terminal status that differs from the pre-trigger snapshot
fn is_settled(status: &SyncStatus, baseline: Option<&SyncStatus>) -> bool {
    if !status.status().is_terminal() {
        return false;
    }
    match baseline {
        Some(before) => status.last_import_time != before.last_import_time,
        None => true,
    }
}

/// Returns false once the receiver is gone
async fn send<E: From<ImportEvent>>(tx: &mpsc::Sender<E>, event: ImportEvent) -> bool {
    if tx.send(event.into()).await.is_err() {
        debug!("Import event receiver closed");
        return false;
    }
    true
}
