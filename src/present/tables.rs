use crate::matching::images::{HERO_PLACEHOLDER, MINION_PLACEHOLDER};
use crate::matching::{BoardSlot, BrokenImages, ImageResolver};
use crate::models::{GameResult, HeroStat, ImportLog, ImportStatus, Match};
use crate::present::format::{
    fixed, minutes, percent_opt, percent, signed, timestamp, MISSING, NOT_AVAILABLE,
};
use crate::present::Tone;

pub fn status_tone(status: &ImportStatus) -> Tone {
    match status {
        ImportStatus::Success => Tone::Good,
        ImportStatus::Failure => Tone::Bad,
        ImportStatus::Running => Tone::Warn,
        ImportStatus::Other(_) => Tone::Neutral,
    }
}

pub fn result_tone(result: GameResult) -> Tone {
    match result {
        GameResult::Win => Tone::Good,
        GameResult::Top4 => Tone::Warn,
        GameResult::Loss => Tone::Bad,
        GameResult::Unknown => Tone::Neutral,
    }
}

pub fn delta_tone(delta: i64) -> Tone {
    match delta {
        d if d > 0 => Tone::Good,
        d if d < 0 => Tone::Bad,
        _ => Tone::Neutral,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeroRow {
    pub hero: String,
    pub avg_placement: String,
    pub pick_rate: String,
    pub win_rate: String,
    pub top4_rate: String,
}

pub fn hero_rows(heroes: &[HeroStat]) -> Vec<HeroRow> {
    heroes
        .iter()
        .map(|h| HeroRow {
            hero: h.hero_name.clone(),
            avg_placement: fixed(h.avg_placement, 2),
            pick_rate: percent_opt(h.pick_rate),
            win_rate: percent(h.win_rate),
            top4_rate: percent_opt(h.top4_rate),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportLogRow {
    pub time: String,
    pub imported: String,
    pub status: String,
    pub tone: Tone,
}

pub fn import_log_rows(logs: &[ImportLog]) -> Vec<ImportLogRow> {
    logs.iter()
        .map(|log| ImportLogRow {
            time: match log.timestamp {
                Some(_) => timestamp(log.timestamp),
                None if log.timestamp_label.is_empty() => NOT_AVAILABLE.to_string(),
                None => log.timestamp_label.clone(),
            },
            imported: log
                .matches_imported
                .map(|n| n.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            status: log.status.label().to_string(),
            tone: status_tone(&log.status),
        })
        .collect()
}

/// Which matches the matches page shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultFilter {
    #[default]
    All,
    Top4,
    Wins,
}

impl ResultFilter {
    pub fn next(self) -> Self {
        match self {
            ResultFilter::All => ResultFilter::Top4,
            ResultFilter::Top4 => ResultFilter::Wins,
            ResultFilter::Wins => ResultFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ResultFilter::All => "all",
            ResultFilter::Top4 => "top 4",
            ResultFilter::Wins => "wins",
        }
    }

    pub fn accepts(self, m: &Match) -> bool {
        match self {
            ResultFilter::All => true,
            ResultFilter::Top4 => m.game_result.is_top4(),
            ResultFilter::Wins => m.game_result == GameResult::Win,
        }
    }
}

/// Result filter plus the hero-name and placement constraints
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchFilter {
    pub result: ResultFilter,
    /// Case-insensitive part of the hero name; blank matches every hero
    pub hero: String,
    /// Keep matches finishing at this placement or better
    pub max_placement: Option<u8>,
}

impl MatchFilter {
    pub fn accepts(&self, m: &Match) -> bool {
        if !self.result.accepts(m) {
            return false;
        }

        let hero = self.hero.trim().to_lowercase();
        if !hero.is_empty() && !m.hero_name.to_lowercase().contains(&hero) {
            return false;
        }

        match self.max_placement {
            Some(max) => m.placement.rank().is_some_and(|rank| rank <= max),
            None => true,
        }
    }

    /// any, 1, 2, ... 8, any
    pub fn cycle_max_placement(&mut self) {
        self.max_placement = match self.max_placement {
            None => Some(1),
            Some(p) if p < 8 => Some(p + 1),
            Some(_) => None,
        };
    }

    /// `top 4, hero "patch", place <= 3`
    pub fn label(&self) -> String {
        let mut parts = vec![self.result.label().to_string()];
        let hero = self.hero.trim();
        if !hero.is_empty() {
            parts.push(format!("hero \"{}\"", hero));
        }
        if let Some(max) = self.max_placement {
            parts.push(format!("place <= {}", max));
        }
        parts.join(", ")
    }
}

/// A recent match with resolved art, ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCard {
    pub hero: String,
    pub hero_image: String,
    pub placement: String,
    pub result: String,
    pub result_tone: Tone,
    pub rating_delta: String,
    pub delta_tone: Tone,
    pub duration: String,
    pub rating_after: String,
    pub ended: String,
    pub board: Vec<BoardSlot>,
}

pub fn match_cards(
    matches: &[Match],
    filter: &MatchFilter,
    resolver: &ImageResolver,
    broken: &BrokenImages,
) -> Vec<MatchCard> {
    matches
        .iter()
        .filter(|m| filter.accepts(m))
        .map(|m| {
            let hero_image = resolver.resolve_hero(&m.hero_name, m.hero_image.as_deref());
            let board = resolver
                .resolve_board(m)
                .into_iter()
                .map(|mut slot| {
                    slot.image = broken.display(&slot.image, MINION_PLACEHOLDER).to_string();
                    slot
                })
                .collect();

            MatchCard {
                hero: if m.hero_name.is_empty() {
                    MISSING.to_string()
                } else {
                    m.hero_name.clone()
                },
                hero_image: broken.display(&hero_image, HERO_PLACEHOLDER).to_string(),
                placement: m.placement.label(),
                result: m.game_result.as_str().to_uppercase(),
                result_tone: result_tone(m.game_result),
                rating_delta: signed(m.rating_delta),
                delta_tone: delta_tone(m.rating_delta),
                duration: minutes(m.duration_min),
                rating_after: m
                    .rating_after
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| MISSING.to_string()),
                ended: timestamp(m.end_time),
                board,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{AssetIndex, ReferenceData};
    use crate::normalize;
    use serde_json::json;
    use std::sync::Arc;

    fn resolver() -> ImageResolver {
        ImageResolver::new(
            Arc::new(ReferenceData::new()),
            AssetIndex::new(),
            crate::config::DEFAULT_HERO_ART_CDN,
        )
    }

    #[test]
    fn test_hero_rows_scale_once() {
        let rows = hero_rows(&normalize::stats::hero_stats(&json!([
            {"hero_name": "A", "average_placement": 3.456, "pick_rate": 0.1, "win_rate": 0.25}
        ])));
        assert_eq!(rows[0].avg_placement, "3.46");
        assert_eq!(rows[0].pick_rate, "10.0%");
        assert_eq!(rows[0].win_rate, "25.0%");
        assert_eq!(rows[0].top4_rate, "-");
    }

    #[test]
    fn test_import_log_rows() {
        let rows = import_log_rows(&normalize::import::import_logs(&json!([
            {"timestamp": "2024-05-01T10:00:00", "matches_imported": 5, "status": "FAILURE"},
            {"status": "RUNNING"}
        ])));
        assert_eq!(rows[0].time, "01/05/2024 10:00");
        assert_eq!(rows[0].tone, Tone::Bad);
        assert_eq!(rows[1].time, "N/A");
        assert_eq!(rows[1].imported, "-");
        assert_eq!(rows[1].tone, Tone::Warn);
    }

    #[test]
    fn test_match_cards_and_filter() {
        let matches = normalize::matches::recent_matches(&json!([
            {"hero_name": "A", "placement": 1, "rating_delta": 40, "minions_list": "X"},
            {"hero_name": "B", "placement": 3, "rating_delta": 10},
            {"hero_name": "C", "placement": 7, "rating_delta": -35, "duration_min": 12.0}
        ]));
        let mut broken = BrokenImages::new();

        let all = match_cards(&matches, &MatchFilter::default(), &resolver(), &broken);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].rating_delta, "+40");
        assert_eq!(all[0].delta_tone, Tone::Good);
        assert_eq!(all[0].result, "WIN");
        assert_eq!(all[0].board[0].image, MINION_PLACEHOLDER);
        assert_eq!(all[2].rating_delta, "-35");
        assert_eq!(all[2].duration, "12.0 min");
        assert_eq!(all[2].hero_image, HERO_PLACEHOLDER);

        let by_result = |result| MatchFilter {
            result,
            ..MatchFilter::default()
        };
        assert_eq!(match_cards(&matches, &by_result(ResultFilter::Top4), &resolver(), &broken).len(), 2);
        assert_eq!(match_cards(&matches, &by_result(ResultFilter::Wins), &resolver(), &broken).len(), 1);

        let explicit = normalize::matches::recent_matches(&json!([
            {"hero_name": "A", "hero_image": "/img/a.png", "placement": 1}
        ]));
        broken.mark("/img/a.png");
        let cards = match_cards(&explicit, &MatchFilter::default(), &resolver(), &broken);
        assert_eq!(cards[0].hero_image, HERO_PLACEHOLDER);
    }

    #[test]
    fn test_filter_cycle() {
        assert_eq!(ResultFilter::All.next(), ResultFilter::Top4);
        assert_eq!(ResultFilter::Wins.next(), ResultFilter::All);
    }

    #[test]
    fn test_hero_and_placement_filter() {
        let matches = normalize::matches::recent_matches(&json!([
            {"hero_name": "Patches the Pirate", "placement": 2},
            {"hero_name": "Sir Finley Mrrgglton", "placement": 5},
            {"hero_name": "Patchwerk", "placement": 7},
            {"hero_name": "Patches the Pirate"}
        ]));

        let mut filter = MatchFilter {
            hero: "  PATCH ".to_string(),
            ..MatchFilter::default()
        };
        let heroes: Vec<&str> = matches
            .iter()
            .filter(|m| filter.accepts(m))
            .map(|m| m.hero_name.as_str())
            .collect();
        assert_eq!(heroes, vec!["Patches the Pirate", "Patchwerk", "Patches the Pirate"]);

        filter.max_placement = Some(4);
        let kept: Vec<&Match> = matches.iter().filter(|m| filter.accepts(m)).collect();
        // pending placements never pass a placement bound
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].placement.rank(), Some(2));
        assert_eq!(filter.label(), "all, hero \"PATCH\", place <= 4");

        filter.max_placement = Some(8);
        filter.cycle_max_placement();
        assert_eq!(filter.max_placement, None);
        filter.cycle_max_placement();
        assert_eq!(filter.max_placement, Some(1));
    }
}
