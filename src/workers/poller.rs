use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::pages::PageId;

/// Reload request for a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTick(pub PageId);

/// Periodic reload of one page. Dropping the handle stops the timer.
pub struct PollHandle {
    page: PageId,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Tick every `interval`, starting one interval from now
    pub fn spawn<E>(page: PageId, interval: Duration, tx: mpsc::Sender<E>) -> Self
    where
        E: From<PollTick> + Send + 'static,
    {
        info!("Polling {} every {:?}", page.title(), interval);

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // first tick completes immediately; the page was just loaded
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if tx.send(PollTick(page).into()).await.is_err() {
                    debug!("Poll receiver closed, stopping");
                    break;
                }
            }
        });

        Self { page, task }
    }

    pub fn page(&self) -> PageId {
        self.page
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        debug!("Stopping poll for {}", self.page.title());
        self.task.abort();
    }
}
