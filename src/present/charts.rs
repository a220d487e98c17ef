use crate::models::{
    CompositionStat, HeroStat, PlacementShare, RatingPoint, StreakBucket, TrendPoint,
};
use crate::present::format::{chart_label, fixed, percent, signed, to_percent_units};

/// A bar with its display text; `value` is in display units (percent for rates)
#[derive(Debug, Clone, PartialEq)]
pub struct BarView {
    pub label: String,
    pub value: f64,
    pub text: String,
}

/// A line series over evenly spaced x positions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineView {
    pub labels: Vec<String>,
    pub points: Vec<(f64, f64)>,
}

impl LineView {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// (min, max) of the y values, padded so a flat line is still visible
    pub fn y_bounds(&self) -> (f64, f64) {
        let (min, max) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, y)| {
                (lo.min(*y), hi.max(*y))
            });
        if !min.is_finite() {
            return (0.0, 1.0);
        }
        let pad = ((max - min) * 0.1).max(1.0);
        (min - pad, max + pad)
    }
}

/// Rating over time with per-point change
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RatingView {
    pub line: LineView,
    /// `6420 (+48)` per point
    pub tooltips: Vec<String>,
    pub rising: Vec<bool>,
}

/// Win rate (percent) and average placement over time
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrendView {
    pub win_rate: LineView,
    pub avg_placement: LineView,
}

/// Trend lines from the last `last` points (all when `None`)
pub fn trend_view(points: &[TrendPoint], last: Option<usize>) -> TrendView {
    let start = last
        .map(|n| points.len().saturating_sub(n))
        .unwrap_or(0);
    let mut view = TrendView::default();

    for (i, p) in points[start..].iter().enumerate() {
        let x = i as f64;
        let label = chart_label(p.timestamp, &p.label);
        if let Some(rate) = p.win_rate {
            view.win_rate.labels.push(label.clone());
            view.win_rate.points.push((x, to_percent_units(rate)));
        }
        if let Some(avg) = p.avg_placement {
            view.avg_placement.labels.push(label);
            view.avg_placement.points.push((x, avg));
        }
    }

    view
}

fn rating_view_from(entries: impl Iterator<Item = (String, f64, f64)>) -> RatingView {
    let mut view = RatingView::default();
    for (i, (label, rating, diff)) in entries.enumerate() {
        view.line.labels.push(label);
        view.line.points.push((i as f64, rating));
        view.tooltips.push(format!(
            "{} ({})",
            fixed(rating, 0),
            signed(diff.round() as i64)
        ));
        view.rising.push(diff >= 0.0);
    }
    view
}

/// Rating trend; the change is computed against the previous point
pub fn rating_trend_view(points: &[TrendPoint]) -> RatingView {
    let mut previous: Option<f64> = None;
    let entries: Vec<(String, f64, f64)> = points
        .iter()
        .filter_map(|p| {
            let rating = p.rating?;
            let diff = previous.map(|prev| rating - prev).unwrap_or(0.0);
            previous = Some(rating);
            Some((chart_label(p.timestamp, &p.label), rating, diff))
        })
        .collect();
    rating_view_from(entries.into_iter())
}

/// Elo progression as sent by the backend
pub fn elo_view(points: &[RatingPoint]) -> RatingView {
    rating_view_from(
        points
            .iter()
            .map(|p| (chart_label(p.timestamp, &p.label), p.rating, p.diff)),
    )
}

/// Win rate per hero, best first
pub fn hero_win_bars(heroes: &[HeroStat]) -> Vec<BarView> {
    let mut bars: Vec<BarView> = heroes
        .iter()
        .map(|h| BarView {
            label: h.hero_name.clone(),
            value: to_percent_units(h.win_rate),
            text: percent(h.win_rate),
        })
        .collect();
    bars.sort_by(|a, b| b.value.total_cmp(&a.value));
    bars
}

/// Top 4 rate per composition, most played first
pub fn composition_bars(compositions: &[CompositionStat]) -> Vec<BarView> {
    let mut sorted: Vec<&CompositionStat> = compositions.iter().collect();
    sorted.sort_by(|a, b| b.games.cmp(&a.games).then_with(|| a.composition.cmp(&b.composition)));
    sorted
        .into_iter()
        .map(|c| BarView {
            label: c.composition.clone(),
            value: to_percent_units(c.top4_rate),
            text: format!("{} ({} games)", percent(c.top4_rate), c.games),
        })
        .collect()
}

pub fn placement_bars(shares: &[PlacementShare]) -> Vec<BarView> {
    shares
        .iter()
        .map(|s| BarView {
            label: format!("#{}", s.placement),
            value: to_percent_units(s.share),
            text: percent(s.share),
        })
        .collect()
}

pub fn streak_bars(buckets: &[StreakBucket]) -> Vec<BarView> {
    buckets
        .iter()
        .map(|b| BarView {
            label: b.length.to_string(),
            value: b.count as f64,
            text: b.count.to_string(),
        })
        .collect()
}
