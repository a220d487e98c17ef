//! Terminal shell: page navigation, event routing and the background tasks
//! that feed the pages.

pub mod render;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::{DashboardApi, Endpoint};
use crate::config::Config;
use crate::matching::{BrokenImages, ImageResolver};
use crate::pages::import_action::TOAST_TTL;
use crate::pages::{
    AdvancedPage, DashboardPage, FetchOutcome, FetchRequest, ImportAction, ImportLogsPage,
    MatchesPage, Page, PageId, StatsPage,
};
use crate::workers::{
    spawn_probe, BrokenImage, ImageProbe, ImportEvent, ImportWatcher, PollHandle, PollTick,
};

/// Everything the main loop reacts to
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Fetched(FetchOutcome),
    Poll(PollTick),
    Import(ImportEvent),
    ImageBroken(BrokenImage),
}

impl From<PollTick> for AppEvent {
    fn from(tick: PollTick) -> Self {
        AppEvent::Poll(tick)
    }
}

impl From<ImportEvent> for AppEvent {
    fn from(event: ImportEvent) -> Self {
        AppEvent::Import(event)
    }
}

impl From<BrokenImage> for AppEvent {
    fn from(image: BrokenImage) -> Self {
        AppEvent::ImageBroken(image)
    }
}

pub struct Pages {
    pub dashboard: DashboardPage,
    pub matches: MatchesPage,
    pub stats: StatsPage,
    pub advanced: AdvancedPage,
    pub import_logs: ImportLogsPage,
}

impl Pages {
    pub fn new(config: &Config) -> Self {
        Self {
            dashboard: DashboardPage::new(),
            matches: MatchesPage::new(config.recent_match_limit, config.match_poll_interval),
            stats: StatsPage::new(),
            advanced: AdvancedPage::new(),
            import_logs: ImportLogsPage::new(),
        }
    }

    pub fn get_mut(&mut self, id: PageId) -> &mut dyn Page {
        match id {
            PageId::Dashboard => &mut self.dashboard,
            PageId::Matches => &mut self.matches,
            PageId::Stats => &mut self.stats,
            PageId::Advanced => &mut self.advanced,
            PageId::ImportLogs => &mut self.import_logs,
        }
    }
}

pub struct App {
    pub pages: Pages,
    pub active: PageId,
    pub import: ImportAction,
    pub broken: BrokenImages,
    pub resolver: ImageResolver,
    pub help_overlay: bool,
    pub should_quit: bool,
    api: Arc<dyn DashboardApi>,
    tx: mpsc::Sender<AppEvent>,
    probe: Option<Arc<ImageProbe>>,
    probed: HashSet<String>,
    poller: Option<PollHandle>,
    import_poll_interval: Duration,
    import_timeout: Duration,
}

impl App {
    pub fn new(
        config: &Config,
        api: Arc<dyn DashboardApi>,
        resolver: ImageResolver,
        probe: Option<Arc<ImageProbe>>,
        tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            pages: Pages::new(config),
            active: PageId::Dashboard,
            import: ImportAction::new(),
            broken: BrokenImages::new(),
            resolver,
            help_overlay: false,
            should_quit: false,
            api,
            tx,
            probe,
            probed: HashSet::new(),
            poller: None,
            import_poll_interval: config.import_poll_interval,
            import_timeout: config.import_timeout,
        }
    }

    /// Load the landing page
    pub fn start(&mut self) {
        self.navigate(PageId::Dashboard);
    }

    /// Whether the matches poll timer is running
    pub fn is_polling(&self) -> bool {
        self.poller.is_some()
    }

    /// Show `page` and load it. Only the matches page polls, and only while
    /// it is shown.
    pub fn navigate(&mut self, page: PageId) {
        debug!("Navigating to {}", page.title());
        self.active = page;

        // dropping the handle stops the previous timer
        self.poller = None;
        if page == PageId::Matches {
            self.poller = Some(PollHandle::spawn(
                page,
                self.pages.matches.poll_interval(),
                self.tx.clone(),
            ));
        }

        self.refresh(page);
    }

    pub fn refresh(&mut self, page: PageId) {
        let requests = self.pages.get_mut(page).begin_refresh();
        self.spawn_fetches(requests);
    }

    fn spawn_fetches(&self, requests: Vec<FetchRequest>) {
        for request in requests {
            let api = Arc::clone(&self.api);
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let outcome = request.run(api.as_ref()).await;
                if tx.send(AppEvent::Fetched(outcome)).await.is_err() {
                    debug!("App closed before {:?} finished", request.endpoint);
                }
            });
        }
    }

    /// Start a manual import unless one is already in flight
    pub fn trigger_import(&mut self) {
        if !self.import.begin() {
            info!("Import already in progress, ignoring trigger");
            return;
        }

        let watcher = ImportWatcher::new(
            Arc::clone(&self.api),
            self.import_poll_interval,
            self.import_timeout,
        );
        let tx = self.tx.clone();
        tokio::spawn(async move {
            watcher.run(tx).await;
        });
    }

    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Fetched(outcome) => {
                let endpoint = outcome.endpoint;
                self.pages.get_mut(outcome.page).apply_outcome(outcome);
                if matches!(endpoint, Endpoint::RecentMatches { .. }) {
                    self.probe_match_images();
                }
            }
            AppEvent::Poll(PollTick(page)) => {
                if page == self.active {
                    self.refresh(page);
                }
            }
            AppEvent::Import(event) => {
                if self.import.on_event(&event) {
                    self.reload_sync_sections();
                }
            }
            AppEvent::ImageBroken(BrokenImage(url)) => {
                if self.broken.mark(&url) {
                    debug!("Using placeholder for {}", url);
                }
            }
        }
    }

    /// Housekeeping between events
    pub fn on_tick(&mut self, now: Instant) {
        self.import.expire_toast(now, TOAST_TTL);
    }

    fn reload_sync_sections(&mut self) {
        let sections = [Endpoint::SyncStatus, Endpoint::ImportLogs];
        for page in [PageId::Dashboard, PageId::ImportLogs] {
            let requests = self.pages.get_mut(page).begin_sections(&sections);
            self.spawn_fetches(requests);
        }
    }

    fn probe_match_images(&mut self) {
        let Some(probe) = &self.probe else {
            return;
        };
        let Some(matches) = self.pages.matches.matches.data() else {
            return;
        };

        let mut fresh = Vec::new();
        for m in matches {
            let hero = self
                .resolver
                .resolve_hero(&m.hero_name, m.hero_image.as_deref());
            let board = self.resolver.resolve_board(m).into_iter().map(|slot| slot.image);
            for url in std::iter::once(hero).chain(board) {
                if self.probed.insert(url.clone()) {
                    fresh.push(url);
                }
            }
        }

        spawn_probe(Arc::clone(probe), fresh, self.tx.clone());
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.help_overlay {
            match key.code {
                KeyCode::Char('?') | KeyCode::Esc => self.help_overlay = false,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        if self.active == PageId::Matches && self.pages.matches.is_searching() {
            let page = &mut self.pages.matches;
            match key.code {
                KeyCode::Enter => page.commit_hero_search(),
                KeyCode::Esc => page.cancel_hero_search(),
                KeyCode::Backspace => page.pop_hero_char(),
                KeyCode::Char(c) => page.push_hero_char(c),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c @ '1'..='5') => {
                let index = c as usize - '1' as usize;
                if let Some(page) = PageId::from_index(index) {
                    self.navigate(page);
                }
            }
            KeyCode::Tab | KeyCode::Right => self.navigate(self.active.next()),
            KeyCode::BackTab | KeyCode::Left => self.navigate(self.active.previous()),
            KeyCode::Char('r') => self.refresh(self.active),
            KeyCode::Char('i') => {
                if matches!(self.active, PageId::Dashboard | PageId::ImportLogs) {
                    self.trigger_import();
                }
            }
            KeyCode::Char('f') if self.active == PageId::Matches => {
                self.pages.matches.cycle_filter();
            }
            KeyCode::Char('/') if self.active == PageId::Matches => {
                self.pages.matches.begin_hero_search();
            }
            KeyCode::Char('p') if self.active == PageId::Matches => {
                self.pages.matches.cycle_max_placement();
            }
            KeyCode::Char('j') | KeyCode::Down if self.active == PageId::Matches => {
                self.pages.matches.select_next();
            }
            KeyCode::Char('k') | KeyCode::Up if self.active == PageId::Matches => {
                self.pages.matches.select_previous();
            }
            KeyCode::Char('?') => self.help_overlay = true,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::matching::{AssetIndex, ReferenceData};
    use crate::pages::{ImportPhase, LoadState, ToastKind};
    use crossterm::event::KeyModifiers;
    use serde_json::json;
    use tokio::time;

    fn key(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn app(api: Arc<FakeApi>) -> (App, mpsc::Receiver<AppEvent>) {
        let config = Config {
            import_poll_interval: Duration::from_millis(5),
            ..Config::default()
        };
        let resolver = ImageResolver::new(
            Arc::new(ReferenceData::new()),
            AssetIndex::new(),
            &config.hero_art_cdn,
        );
        let (tx, rx) = mpsc::channel(64);
        (App::new(&config, api, resolver, None, tx), rx)
    }

    /// Feed events back into the app until `done` holds
    async fn pump(app: &mut App, rx: &mut mpsc::Receiver<AppEvent>, done: impl Fn(&App) -> bool) {
        while !done(app) {
            let event = time::timeout(Duration::from_secs(2), rx.recv())
                .await
                .expect("timed out waiting for app event")
                .expect("channel closed");
            app.handle(event);
        }
    }

    fn dashboard_api() -> Arc<FakeApi> {
        let api = Arc::new(FakeApi::new());
        api.respond("/api/v1/stats/global", json!({"total_matches": 150}));
        api.respond("/api/v1/import/logs", json!([]));
        api.respond("/api/v1/stats/rating_trend", json!([]));
        api.respond("/api/v1/stats/heroes", json!([]));
        api.respond("/api/v1/stats/minions", json!({}));
        api
    }

    #[tokio::test]
    async fn test_start_loads_dashboard() {
        let api = dashboard_api();
        api.respond("/api/v1/import/status", json!({"last_status": "SUCCESS"}));
        let (mut app, mut rx) = app(api);

        app.start();
        pump(&mut app, &mut rx, |a| {
            let d = &a.pages.dashboard;
            d.global.state() != &LoadState::Loading && d.compositions.state() != &LoadState::Loading
        })
        .await;
        assert_eq!(app.pages.dashboard.global.state(), &LoadState::Ready);
        assert!(!app.is_polling());
    }

    #[tokio::test]
    async fn test_polling_follows_matches_page() {
        let api = Arc::new(FakeApi::new());
        api.respond("/api/v1/matches/recent?limit=10", json!([{"hero_name": "A", "placement": 1}]));
        api.respond("/api/v1/stats/streaks", json!([]));
        api.respond("/api/v1/stats/distribution", json!([]));
        api.respond("/api/v1/stats/match_duration", json!({}));
        api.respond("/api/v1/stats/elo_progression", json!([]));
        let (mut app, mut rx) = app(api);

        app.handle(key('2'));
        assert_eq!(app.active, PageId::Matches);
        assert!(app.is_polling());
        pump(&mut app, &mut rx, |a| a.pages.matches.matches.state() == &LoadState::Ready).await;

        app.handle(key('f'));
        assert_eq!(app.pages.matches.filter.label(), "top 4");

        // keys typed into the hero prompt do not quit or switch pages
        app.handle(key('/'));
        for c in "q4".chars() {
            app.handle(key(c));
        }
        app.handle(AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
        assert!(!app.should_quit);
        assert_eq!(app.active, PageId::Matches);
        assert_eq!(app.pages.matches.filter.hero, "q4");
        app.handle(key('p'));
        assert_eq!(app.pages.matches.filter.label(), "top 4, hero \"q4\", place <= 1");

        app.handle(key('4'));
        assert_eq!(app.active, PageId::Advanced);
        assert!(!app.is_polling());

        // a tick raised before leaving is ignored once another page is shown
        app.handle(AppEvent::Poll(PollTick(PageId::Matches)));
        assert_eq!(app.pages.matches.matches.state(), &LoadState::Ready);
    }

    #[tokio::test]
    async fn test_import_flow_updates_sync() {
        let api = dashboard_api();
        let status = "/api/v1/import/status";
        let before = json!({"last_import_time": "2024-05-01T10:00:00", "last_status": "FAILURE"});
        // dashboard load, watcher baseline, first poll
        api.respond(status, before.clone());
        api.respond(status, before.clone());
        api.respond(status, before);
        api.respond(
            status,
            json!({"last_import_time": "2024-05-01T10:02:00", "last_status": "SUCCESS"}),
        );
        api.respond("/api/v1/import/start", json!({"matches_imported": 4}));
        let (mut app, mut rx) = app(api.clone());

        app.start();
        pump(&mut app, &mut rx, |a| a.pages.dashboard.sync.state() == &LoadState::Ready).await;

        app.handle(key('i'));
        assert_eq!(app.import.toast().map(|t| t.kind), Some(ToastKind::Loading));

        // second press while in flight does nothing
        app.handle(key('i'));

        pump(&mut app, &mut rx, |a| {
            matches!(a.import.phase(), ImportPhase::Completed(_))
                && a.pages.dashboard.sync.state() == &LoadState::Ready
        })
        .await;

        let sync = app.pages.dashboard.sync.data().unwrap();
        assert_eq!(sync.last_status.as_deref(), Some("SUCCESS"));
        assert_eq!(api.posts().len(), 1);
    }

    #[tokio::test]
    async fn test_import_key_only_on_import_pages() {
        let api = Arc::new(FakeApi::new());
        let (mut app, _rx) = app(api.clone());
        app.active = PageId::Stats;
        app.handle(key('i'));
        assert_eq!(app.import.phase(), &ImportPhase::Idle);
    }

    #[tokio::test]
    async fn test_broken_image_and_quit() {
        let (mut app, _rx) = app(Arc::new(FakeApi::new()));
        app.handle(AppEvent::ImageBroken(BrokenImage("/x.png".into())));
        assert!(app.broken.is_broken("/x.png"));

        app.handle(key('?'));
        assert!(app.help_overlay);
        app.handle(key('?'));
        assert!(!app.help_overlay);
        app.handle(key('q'));
        assert!(app.should_quit);
    }
}
