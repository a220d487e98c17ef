use std::collections::BTreeMap;

use serde_json::Value;

use crate::models::{
    CompositionStat, DurationStats, GameResult, GlobalStat, HeroStat, PlacementShare,
    RatingPoint, StreakBucket, TrendPoint,
};
use crate::normalize::fields::{
    pick_f64, pick_i64, pick_str, pick_timestamp, pick_u64, records,
};

pub fn global_stats(raw: &Value) -> GlobalStat {
    GlobalStat {
        total_matches: pick_u64(raw, &["total_matches", "total_games"]).unwrap_or(0),
        avg_placement: pick_f64(raw, &["avg_placement", "average_placement"]).unwrap_or(0.0),
        top4_rate: pick_f64(raw, &["top4_rate"]).unwrap_or(0.0),
        win_rate: pick_f64(raw, &["win_rate"]).unwrap_or(0.0),
        avg_duration: pick_f64(raw, &["avg_duration_min", "avg_duration"]),
        avg_rating_delta: pick_f64(raw, &["avg_rating_delta"]),
        last_update: pick_timestamp(raw, &["last_update"]),
    }
}

/// Per-hero rows. When no row carries `pick_rate` but all carry a match
/// count, pick rate is the hero's share of all counted matches.
pub fn hero_stats(raw: &Value) -> Vec<HeroStat> {
    let mut heroes: Vec<HeroStat> = records(raw)
        .into_iter()
        .filter(|r| r.is_object())
        .map(|r| HeroStat {
            hero_name: pick_str(r, &["hero_name", "hero"]).unwrap_or_default(),
            avg_placement: pick_f64(r, &["average_placement", "avg_placement"]).unwrap_or(0.0),
            pick_rate: pick_f64(r, &["pick_rate"]),
            win_rate: pick_f64(r, &["win_rate"]).unwrap_or(0.0),
            top4_rate: pick_f64(r, &["top4_rate"]),
            matches: pick_u64(r, &["matches"]),
        })
        .collect();

    let counts: Option<Vec<u64>> = heroes.iter().map(|h| h.matches).collect();
    if let Some(counts) = counts {
        let total: u64 = counts.iter().sum();
        if total > 0 {
            for hero in heroes.iter_mut().filter(|h| h.pick_rate.is_none()) {
                hero.pick_rate = hero.matches.map(|m| m as f64 / total as f64);
            }
        }
    }

    heroes
}

/// Time series points, ascending by time when every label parses
pub fn trend_points(raw: &Value) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = records(raw)
        .into_iter()
        .filter(|r| r.is_object())
        .map(|r| TrendPoint {
            label: pick_str(r, &["date", "end_time", "time"]).unwrap_or_default(),
            timestamp: pick_timestamp(r, &["date", "end_time", "time"]),
            win_rate: pick_f64(r, &["win_rate"]),
            avg_placement: pick_f64(r, &["avg_placement"]),
            rating: pick_f64(r, &["rating_after", "rating", "mmr_after"]),
        })
        .collect();

    if points.iter().all(|p| p.timestamp.is_some()) {
        points.sort_by_key(|p| p.timestamp);
    }

    points
}

/// Rating progression; `diff` falls back to the change from the previous point
pub fn rating_points(raw: &Value) -> Vec<RatingPoint> {
    let mut previous: Option<f64> = None;

    records(raw)
        .into_iter()
        .filter(|r| r.is_object())
        .map(|r| {
            let rating = pick_f64(r, &["rating", "rating_after"]).unwrap_or(0.0);
            let diff = pick_f64(r, &["diff", "delta"])
                .unwrap_or_else(|| previous.map(|p| rating - p).unwrap_or(0.0));
            previous = Some(rating);

            RatingPoint {
                label: pick_str(r, &["time", "end_time", "date"]).unwrap_or_default(),
                timestamp: pick_timestamp(r, &["time", "end_time", "date"]),
                rating,
                diff,
            }
        })
        .collect()
}

/// `{"Mech": {"games": 10, "top4_rate": 0.7}, ...}` or an array of rows
pub fn compositions(raw: &Value) -> Vec<CompositionStat> {
    match raw {
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| v.is_object())
            .map(|(name, v)| CompositionStat {
                composition: name.clone(),
                games: pick_u64(v, &["games"]).unwrap_or(0),
                top4_rate: pick_f64(v, &["top4_rate"]).unwrap_or(0.0),
            })
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|v| {
                Some(CompositionStat {
                    composition: pick_str(v, &["type", "composition"])?,
                    games: pick_u64(v, &["games"]).unwrap_or(0),
                    top4_rate: pick_f64(v, &["top4_rate"]).unwrap_or(0.0),
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Win-streak histogram.
///
/// Accepts ready-made buckets (`streak_length`, `count`) or the raw list of
/// result runs (`result`, `count`), in which case winning runs are counted
/// by length.
pub fn streaks(raw: &Value) -> Vec<StreakBucket> {
    let rows: Vec<&Value> = records(raw).into_iter().filter(|r| r.is_object()).collect();
    let mut histogram: BTreeMap<u32, u32> = BTreeMap::new();

    if rows.iter().any(|r| r.get("streak_length").is_some()) {
        for row in &rows {
            let (Some(length), Some(count)) = (
                pick_u64(row, &["streak_length"]),
                pick_u64(row, &["count"]),
            ) else {
                continue;
            };
            *histogram.entry(length as u32).or_default() += count as u32;
        }
    } else {
        for row in &rows {
            let is_win = pick_str(row, &["result"])
                .and_then(|r| GameResult::parse(&r))
                .map(|r| r == GameResult::Win)
                .unwrap_or(false);
            if !is_win {
                continue;
            }
            if let Some(length) = pick_u64(row, &["count"]).filter(|l| *l > 0) {
                *histogram.entry(length as u32).or_default() += 1;
            }
        }
    }

    histogram
        .into_iter()
        .map(|(length, count)| StreakBucket { length, count })
        .collect()
}

/// Placement shares ordered by placement; out-of-range placements are dropped
pub fn placement_distribution(raw: &Value) -> Vec<PlacementShare> {
    let mut shares: Vec<PlacementShare> = records(raw)
        .into_iter()
        .filter_map(|r| {
            let placement = pick_i64(r, &["placement"]).filter(|p| (1..=8).contains(p))?;
            Some(PlacementShare {
                placement: placement as u8,
                share: pick_f64(r, &["percentage", "share"]).unwrap_or(0.0),
            })
        })
        .collect();

    shares.sort_by_key(|s| s.placement);
    shares
}

pub fn durations(raw: &Value) -> DurationStats {
    DurationStats {
        avg: pick_f64(raw, &["avg_duration", "avg_duration_min"]),
        min: pick_f64(raw, &["min_duration", "min_duration_min"]),
        max: pick_f64(raw, &["max_duration", "max_duration_min"]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_global_stats_aliases() {
        let g = global_stats(&json!({
            "total_games": 12,
            "win_rate": 0.25,
            "top4_rate": 0.5,
            "average_placement": 4.2,
            "avg_duration_min": 16.0,
            "avg_rating_delta": null,
            "last_update": "2024-05-01T10:00:00"
        }));
        assert_eq!(g.total_matches, 12);
        assert_eq!(g.avg_placement, 4.2);
        assert_eq!(g.avg_duration, Some(16.0));
        assert_eq!(g.avg_rating_delta, None);
        assert!(g.last_update.is_some());
    }

    #[test]
    fn test_rates_are_not_rescaled() {
        let g = global_stats(&json!({"win_rate": 0.42, "top4_rate": 0.61}));
        assert_eq!(g.win_rate, 0.42);
        assert_eq!(g.top4_rate, 0.61);
    }

    #[test]
    fn test_hero_pick_rate_from_match_counts() {
        let heroes = hero_stats(&json!([
            {"hero_name": "A", "matches": 3, "win_rate": 0.3, "top4_rate": 0.6, "avg_placement": 3.0},
            {"hero_name": "B", "matches": 1, "win_rate": 0.0, "top4_rate": 0.0, "avg_placement": 7.0}
        ]));
        assert_eq!(heroes[0].pick_rate, Some(0.75));
        assert_eq!(heroes[1].pick_rate, Some(0.25));
        assert_eq!(heroes[0].avg_placement, 3.0);
    }

    #[test]
    fn test_hero_explicit_pick_rate_kept() {
        let heroes = hero_stats(&json!([
            {"hero_name": "A", "average_placement": 2.5, "pick_rate": 0.1, "win_rate": 0.2}
        ]));
        assert_eq!(heroes[0].pick_rate, Some(0.1));
        assert_eq!(heroes[0].matches, None);
    }

    #[test]
    fn test_trend_points_sorted() {
        let points = trend_points(&json!([
            {"end_time": "2024-05-02T10:00:00", "rating_after": 6100},
            {"end_time": "2024-05-01T10:00:00", "rating_after": 6000}
        ]));
        assert_eq!(points[0].rating, Some(6000.0));
        assert_eq!(points[1].rating, Some(6100.0));
    }

    #[test]
    fn test_trend_points_unparseable_keep_order() {
        let points = trend_points(&json!([
            {"date": "week 2", "win_rate": 0.2},
            {"date": "week 1", "win_rate": 0.1}
        ]));
        assert_eq!(points[0].label, "week 2");
        assert_eq!(points[0].win_rate, Some(0.2));
    }

    #[test]
    fn test_rating_points_diff_fallback() {
        let points = rating_points(&json!([
            {"time": "2024-05-01T10:00:00", "rating": 6000},
            {"time": "2024-05-01T11:00:00", "rating": 6040},
            {"time": "2024-05-01T12:00:00", "rating": 6010, "diff": -30}
        ]));
        assert_eq!(points[0].diff, 0.0);
        assert_eq!(points[1].diff, 40.0);
        assert_eq!(points[2].diff, -30.0);
    }

    #[test]
    fn test_compositions_object_and_array() {
        let from_map = compositions(&json!({
            "Mech": {"games": 10, "top4_rate": 0.7},
            "Beast": {"games": 8, "top4_rate": 0.6}
        }));
        assert_eq!(from_map.len(), 2);
        assert!(from_map.iter().any(|c| c.composition == "Mech" && c.games == 10));

        let from_rows = compositions(&json!([{"type": "Demon", "games": 5, "top4_rate": 0.4}]));
        assert_eq!(from_rows[0].composition, "Demon");
    }

    #[test]
    fn test_streak_buckets() {
        let buckets = streaks(&json!([
            {"streak_length": 2, "count": 3},
            {"streak_length": 1, "count": 5}
        ]));
        assert_eq!(buckets[0], StreakBucket { length: 1, count: 5 });
        assert_eq!(buckets[1], StreakBucket { length: 2, count: 3 });
    }

    #[test]
    fn test_streaks_from_result_runs() {
        let buckets = streaks(&json!([
            {"result": "win", "count": 2},
            {"result": "loss", "count": 3},
            {"result": "win", "count": 2},
            {"result": "win", "count": 1}
        ]));
        assert_eq!(
            buckets,
            vec![
                StreakBucket { length: 1, count: 1 },
                StreakBucket { length: 2, count: 2 }
            ]
        );
    }

    #[test]
    fn test_distribution() {
        let shares = placement_distribution(&json!([
            {"placement": 3, "percentage": 0.2},
            {"placement": 1, "percentage": 0.125},
            {"placement": null, "percentage": 0.1}
        ]));
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].placement, 1);
        assert_eq!(shares[0].share, 0.125);
    }

    #[test]
    fn test_durations() {
        let d = durations(&json!({"avg_duration_min": 15.5, "min_duration": 8, "max_duration": 30}));
        assert_eq!(d.avg, Some(15.5));
        assert_eq!(d.min, Some(8.0));
        assert!(durations(&json!({})).is_empty());
    }
}
