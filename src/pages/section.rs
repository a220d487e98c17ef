use tracing::{debug, warn};

use crate::api::{ApiError, Fetched};
use crate::models::{DurationStats, GlobalStat, SyncStatus};

/// Load state of one panel
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready,
    Empty,
    Error(String),
}

/// Data that can come back empty
pub trait SectionData {
    fn is_empty(&self) -> bool;
}

impl<T> SectionData for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl SectionData for GlobalStat {
    fn is_empty(&self) -> bool {
        self.total_matches == 0
    }
}

impl SectionData for DurationStats {
    fn is_empty(&self) -> bool {
        DurationStats::is_empty(self)
    }
}

impl SectionData for SyncStatus {
    fn is_empty(&self) -> bool {
        false
    }
}

/// One independently loaded piece of page state.
///
/// Each load takes a ticket; only the response to the latest ticket is
/// applied. A failed reload keeps the last good data next to the error.
#[derive(Debug, Clone)]
pub struct Section<T> {
    state: LoadState,
    data: Option<T>,
    ticket: u64,
    label: &'static str,
}

impl<T: SectionData> Section<T> {
    /// `label` names the panel in error messages
    pub fn new(label: &'static str) -> Self {
        Self {
            state: LoadState::Loading,
            data: None,
            ticket: 0,
            label,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Loading while still showing older data
    pub fn is_refreshing(&self) -> bool {
        self.state == LoadState::Loading && self.data.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Enter Loading and hand out the ticket the response must carry
    pub fn begin(&mut self) -> u64 {
        self.ticket += 1;
        self.state = LoadState::Loading;
        self.ticket
    }

    /// Apply a response. Returns false when the ticket is stale.
    pub fn resolve(&mut self, ticket: u64, result: Result<T, &ApiError>) -> bool {
        if ticket != self.ticket {
            debug!(
                "Dropping stale {} response (ticket {}, current {})",
                self.label, ticket, self.ticket
            );
            return false;
        }

        match result {
            Ok(value) => {
                self.state = if value.is_empty() {
                    LoadState::Empty
                } else {
                    LoadState::Ready
                };
                self.data = Some(value);
            }
            Err(e) => {
                warn!("Failed to load {}: {}", self.label, e);
                self.state = LoadState::Error(format!(
                    "Unable to load {}: {}",
                    self.label,
                    e.user_message()
                ));
            }
        }
        true
    }

    /// Apply a raw fetch outcome, pulling this section's payload out of it
    pub fn apply(
        &mut self,
        ticket: u64,
        result: Result<Fetched, ApiError>,
        extract: fn(Fetched) -> Option<T>,
    ) -> bool {
        match result {
            Ok(fetched) => match extract(fetched) {
                Some(value) => self.resolve(ticket, Ok(value)),
                None => {
                    warn!("Payload for {} has the wrong shape", self.label);
                    if ticket != self.ticket {
                        return false;
                    }
                    self.state = LoadState::Error(format!(
                        "Unable to load {}: unexpected response from server",
                        self.label
                    ));
                    true
                }
            },
            Err(e) => self.resolve(ticket, Err(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_error(status: u16) -> ApiError {
        ApiError::Http {
            url: "http://fake/x".to_string(),
            status,
        }
    }

    #[test]
    fn test_initial_state_is_loading() {
        let section: Section<Vec<u32>> = Section::new("numbers");
        assert_eq!(section.state(), &LoadState::Loading);
        assert!(section.data().is_none());
        assert!(!section.is_refreshing());
    }

    #[test]
    fn test_ready_and_empty() {
        let mut section: Section<Vec<u32>> = Section::new("numbers");
        let t = section.begin();
        assert!(section.resolve(t, Ok(vec![1, 2])));
        assert_eq!(section.state(), &LoadState::Ready);

        let t = section.begin();
        assert!(section.is_refreshing());
        section.resolve(t, Ok(vec![]));
        assert_eq!(section.state(), &LoadState::Empty);
        assert_eq!(section.data(), Some(&vec![]));
    }

    #[test]
    fn test_error_keeps_last_good_data() {
        let mut section: Section<Vec<u32>> = Section::new("matches");
        let t = section.begin();
        section.resolve(t, Ok(vec![7]));

        let t = section.begin();
        section.resolve(t, Err(&http_error(500)));
        assert_eq!(
            section.error(),
            Some("Unable to load matches: server error 500")
        );
        assert_eq!(section.data(), Some(&vec![7]));
    }

    #[test]
    fn test_initial_error_has_no_data() {
        let mut section: Section<Vec<u32>> = Section::new("matches");
        let t = section.begin();
        section.resolve(t, Err(&http_error(503)));
        assert!(section.error().is_some());
        assert!(section.data().is_none());
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut section: Section<Vec<u32>> = Section::new("numbers");
        let first = section.begin();
        let second = section.begin();

        assert!(section.resolve(second, Ok(vec![2])));
        assert!(!section.resolve(first, Ok(vec![1])));
        assert_eq!(section.data(), Some(&vec![2]));
        assert_eq!(section.state(), &LoadState::Ready);
    }

    #[test]
    fn test_wrong_payload_shape() {
        let mut section: Section<Vec<u32>> = Section::new("numbers");
        let t = section.begin();
        section.apply(t, Ok(Fetched::SyncStatus(SyncStatus::default())), |_| None);
        assert!(section.error().unwrap().contains("unexpected response"));
    }
}
