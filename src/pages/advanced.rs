use crate::api::{ApiError, Endpoint, Fetched};
use crate::models::{DurationStats, PlacementShare, RatingPoint, StreakBucket};
use crate::pages::{Page, PageId, Section};

/// Streaks, placement distribution, match length and elo history
pub struct AdvancedPage {
    pub streaks: Section<Vec<StreakBucket>>,
    pub distribution: Section<Vec<PlacementShare>>,
    pub durations: Section<DurationStats>,
    pub elo: Section<Vec<RatingPoint>>,
}

impl AdvancedPage {
    pub fn new() -> Self {
        Self {
            streaks: Section::new("streaks"),
            distribution: Section::new("placement distribution"),
            durations: Section::new("match duration"),
            elo: Section::new("elo progression"),
        }
    }
}

impl Default for AdvancedPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for AdvancedPage {
    fn id(&self) -> PageId {
        PageId::Advanced
    }

    fn endpoints(&self) -> Vec<Endpoint> {
        vec![
            Endpoint::Streaks,
            Endpoint::Distribution,
            Endpoint::MatchDuration,
            Endpoint::EloProgression,
        ]
    }

    fn begin(&mut self, endpoint: Endpoint) -> Option<u64> {
        match endpoint {
            Endpoint::Streaks => Some(self.streaks.begin()),
            Endpoint::Distribution => Some(self.distribution.begin()),
            Endpoint::MatchDuration => Some(self.durations.begin()),
            Endpoint::EloProgression => Some(self.elo.begin()),
            _ => None,
        }
    }

    fn apply(&mut self, endpoint: Endpoint, ticket: u64, result: Result<Fetched, ApiError>) {
        match endpoint {
            Endpoint::Streaks => {
                self.streaks.apply(ticket, result, |f| match f {
                    Fetched::Streaks(v) => Some(v),
                    _ => None,
                });
            }
            Endpoint::Distribution => {
                self.distribution.apply(ticket, result, |f| match f {
                    Fetched::Distribution(v) => Some(v),
                    _ => None,
                });
            }
            Endpoint::MatchDuration => {
                self.durations.apply(ticket, result, |f| match f {
                    Fetched::MatchDuration(v) => Some(v),
                    _ => None,
                });
            }
            Endpoint::EloProgression => {
                self.elo.apply(ticket, result, |f| match f {
                    Fetched::EloProgression(v) => Some(v),
                    _ => None,
                });
            }
            _ => {}
        }
    }
}
