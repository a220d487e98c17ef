use std::time::Duration;

use crate::api::{ApiError, Endpoint, Fetched};
use crate::models::Match;
use crate::pages::{Page, PageId, Section};
use crate::present::tables::MatchFilter;

/// Recent matches, reloaded on a timer while the page is shown
pub struct MatchesPage {
    pub matches: Section<Vec<Match>>,
    pub filter: MatchFilter,
    pub selected: usize,
    /// Hero name being typed; `Some` while the search prompt is open
    pub hero_input: Option<String>,
    limit: u32,
    poll_interval: Duration,
}

impl MatchesPage {
    pub fn new(limit: u32, poll_interval: Duration) -> Self {
        Self {
            matches: Section::new("matches"),
            filter: MatchFilter::default(),
            selected: 0,
            hero_input: None,
            limit,
            poll_interval,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::RecentMatches { limit: self.limit }
    }

    /// Matches passing the current filter
    pub fn visible(&self) -> Vec<&Match> {
        self.matches
            .data()
            .map(|all| all.iter().filter(|m| self.filter.accepts(m)).collect())
            .unwrap_or_default()
    }

    pub fn cycle_filter(&mut self) {
        self.filter.result = self.filter.result.next();
        self.selected = 0;
    }

    pub fn cycle_max_placement(&mut self) {
        self.filter.cycle_max_placement();
        self.selected = 0;
    }

    /// Open the hero prompt, seeded with the current hero filter
    pub fn begin_hero_search(&mut self) {
        self.hero_input = Some(self.filter.hero.clone());
    }

    pub fn is_searching(&self) -> bool {
        self.hero_input.is_some()
    }

    pub fn push_hero_char(&mut self, c: char) {
        if let Some(input) = self.hero_input.as_mut() {
            input.push(c);
        }
    }

    pub fn pop_hero_char(&mut self) {
        if let Some(input) = self.hero_input.as_mut() {
            input.pop();
        }
    }

    pub fn commit_hero_search(&mut self) {
        if let Some(input) = self.hero_input.take() {
            self.filter.hero = input.trim().to_string();
            self.selected = 0;
        }
    }

    pub fn cancel_hero_search(&mut self) {
        self.hero_input = None;
    }

    pub fn select_next(&mut self) {
        let count = self.visible().len();
        if count > 0 {
            self.selected = (self.selected + 1).min(count - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let count = self.visible().len();
        self.selected = self.selected.min(count.saturating_sub(1));
    }
}

impl Page for MatchesPage {
    fn id(&self) -> PageId {
        PageId::Matches
    }

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![self.endpoint()]
    }

    fn begin(&mut self, endpoint: Endpoint) -> Option<u64> {
        match endpoint {
            Endpoint::RecentMatches { .. } => Some(self.matches.begin()),
            _ => None,
        }
    }

    fn apply(&mut self, endpoint: Endpoint, ticket: u64, result: Result<Fetched, ApiError>) {
        if let Endpoint::RecentMatches { .. } = endpoint {
            let applied = self.matches.apply(ticket, result, |f| match f {
                Fetched::RecentMatches(v) => Some(v),
                _ => None,
            });
            if applied {
                self.clamp_selection();
            }
        }
    }
}
