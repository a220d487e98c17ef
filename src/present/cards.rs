use crate::models::{DurationStats, GlobalStat, ImportLog, SyncStatus};
use crate::present::format::{
    fixed, minutes, percent, signed_fixed, timestamp, MISSING, NOT_AVAILABLE,
};
use crate::present::tables::status_tone;
use crate::present::Tone;

/// A labelled headline number
#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

impl StatCard {
    fn new(label: &'static str, value: String) -> Self {
        Self { label, value }
    }
}

/// Headline cards for the global stats panel
pub fn global_stat_cards(stats: &GlobalStat) -> Vec<StatCard> {
    vec![
        StatCard::new("Total matches", stats.total_matches.to_string()),
        StatCard::new("Avg placement", fixed(stats.avg_placement, 2)),
        StatCard::new("Top 4 rate", percent(stats.top4_rate)),
        StatCard::new("Win rate", percent(stats.win_rate)),
        StatCard::new("Avg duration", minutes(stats.avg_duration)),
        StatCard::new(
            "Avg rating delta",
            stats
                .avg_rating_delta
                .map(|d| signed_fixed(d, 1))
                .unwrap_or_else(|| MISSING.to_string()),
        ),
    ]
}

pub fn last_update_line(stats: &GlobalStat) -> Option<String> {
    stats
        .last_update
        .map(|t| format!("Last update: {}", timestamp(Some(t))))
}

/// Average / shortest / longest match length
pub fn duration_cards(stats: &DurationStats) -> Vec<StatCard> {
    vec![
        StatCard::new("Average", minutes(stats.avg)),
        StatCard::new("Shortest", minutes(stats.min)),
        StatCard::new("Longest", minutes(stats.max)),
    ]
}

/// Sync status panel contents
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPanel {
    pub last_import: String,
    pub status: String,
    pub tone: Tone,
    pub minutes_since: Option<String>,
}

pub fn sync_panel(sync: &SyncStatus) -> SyncPanel {
    let status = sync.status();
    SyncPanel {
        last_import: timestamp(sync.last_import_time),
        status: sync
            .last_status
            .clone()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        tone: status_tone(&status),
        minutes_since: sync
            .minutes_since
            .map(|m| format!("{} min ago", fixed(m, 1))),
    }
}

/// One-line summary of the newest import log
pub fn last_import_line(logs: &[ImportLog]) -> String {
    match logs.first() {
        Some(log) => format!(
            "Last import: {} · {} matches · {}",
            timestamp(log.timestamp),
            log.matches_imported
                .map(|n| n.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            log.status.label()
        ),
        None => "Last import: none".to_string(),
    }
}
