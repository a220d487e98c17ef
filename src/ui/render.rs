use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Clear, Dataset, GraphType,
    Paragraph, Row, Table, Tabs, Wrap,
};
use ratatui::Frame;

use crate::models::{ImportLog, SyncStatus};
use crate::pages::dashboard::RECENT_TREND_POINTS;
use crate::pages::{ImportAction, LoadState, PageId, Section, SectionData, ToastKind};
use crate::present::cards::{
    duration_cards, global_stat_cards, last_import_line, last_update_line, sync_panel, StatCard,
};
use crate::present::charts::{
    composition_bars, elo_view, hero_win_bars, placement_bars, rating_trend_view, streak_bars,
    trend_view, BarView, LineView, RatingView,
};
use crate::present::tables::{hero_rows, import_log_rows, match_cards, MatchCard};
use crate::present::Tone;
use crate::ui::App;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    render_tabs(frame, chunks[0], app.active);

    match app.active {
        PageId::Dashboard => render_dashboard(frame, chunks[1], app),
        PageId::Matches => render_matches(frame, chunks[1], app),
        PageId::Stats => render_stats(frame, chunks[1], app),
        PageId::Advanced => render_advanced(frame, chunks[1], app),
        PageId::ImportLogs => render_import_logs(frame, chunks[1], app),
    }

    let footer = Paragraph::new(footer_text(app)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[2]);

    render_toast(frame, frame.size(), &app.import);

    if app.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, active: PageId) {
    let titles: Vec<Line> = PageId::ALL
        .iter()
        .enumerate()
        .map(|(i, page)| Line::from(format!("{} {}", i + 1, page.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().title(" BG Dashboard ").borders(Borders::ALL))
        .select(active.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn footer_text(app: &App) -> String {
    let page_keys = match app.active {
        PageId::Dashboard | PageId::ImportLogs => {
            format!("i {} | r Refresh", app.import.button_label())
        }
        PageId::Matches => match &app.pages.matches.hero_input {
            Some(input) => format!("Hero: {}_ | Enter Apply | Esc Cancel", input),
            None => format!(
                "f Result | / Hero | p Max place | Filter ({}) | j/k Select | r Refresh",
                app.pages.matches.filter.label()
            ),
        },
        PageId::Stats | PageId::Advanced => "r Refresh".to_string(),
    };
    format!("1-5/Tab Pages | {} | ? Help | q Quit", page_keys)
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Good => Color::Green,
        Tone::Warn => Color::Yellow,
        Tone::Bad => Color::Red,
        Tone::Neutral => Color::Gray,
    }
}

fn tone_style(tone: Tone) -> Style {
    Style::default().fg(tone_color(tone))
}

/// Frame a section and draw its data, or its loading / empty / error state.
/// An error is shown above the last good data when there is some.
fn render_section<T, F>(frame: &mut Frame, area: Rect, title: &str, section: &Section<T>, draw: F)
where
    T: SectionData,
    F: FnOnce(&mut Frame, Rect, &T),
{
    let title = if section.is_refreshing() {
        format!(" {} (refreshing) ", title)
    } else {
        format!(" {} ", title)
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut body = inner;
    if let Some(error) = section.error() {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);
        let message = Paragraph::new(error.to_string()).style(Style::default().fg(Color::Red));
        frame.render_widget(message, rows[0]);
        body = rows[1];
    }

    match (section.state(), section.data()) {
        (LoadState::Empty, _) => render_note(frame, body, "No data available"),
        (_, Some(data)) => draw(frame, body, data),
        (LoadState::Loading, None) => render_note(frame, body, "Loading..."),
        _ => {}
    }
}

fn render_note(frame: &mut Frame, area: Rect, text: &str) {
    let note = Paragraph::new(text.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(note, area);
}

fn render_cards(frame: &mut Frame, area: Rect, cards: &[StatCard]) {
    if cards.is_empty() {
        return;
    }
    let constraints: Vec<Constraint> = cards
        .iter()
        .map(|_| Constraint::Ratio(1, cards.len() as u32))
        .collect();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (card, column) in cards.iter().zip(columns.iter()) {
        let value = Paragraph::new(Line::from(Span::styled(
            card.value.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().title(card.label).borders(Borders::ALL));
        frame.render_widget(value, *column);
    }
}

fn render_bars(frame: &mut Frame, area: Rect, bars: &[BarView], max: Option<u64>) {
    if bars.is_empty() {
        render_note(frame, area, "No data available");
        return;
    }
    let data: Vec<Bar> = bars
        .iter()
        .map(|b| {
            Bar::default()
                .label(Line::from(b.label.clone()))
                .value(b.value.max(0.0).round() as u64)
                .text_value(b.text.clone())
        })
        .collect();

    let mut chart = BarChart::default()
        .data(BarGroup::default().bars(&data))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::White));
    if let Some(max) = max {
        chart = chart.max(max);
    }
    frame.render_widget(chart, area);
}

fn render_line(frame: &mut Frame, area: Rect, name: &str, view: &LineView, color: Color) {
    if view.is_empty() {
        render_note(frame, area, "No data available");
        return;
    }
    let (lo, hi) = view.y_bounds();
    let x_max = view.points.len().saturating_sub(1).max(1) as f64;
    let first = view.labels.first().cloned().unwrap_or_default();
    let last = view.labels.last().cloned().unwrap_or_default();

    let datasets = vec![Dataset::default()
        .name(name.to_string())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&view.points)];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![Span::raw(first), Span::raw(last)]),
        )
        .y_axis(
            Axis::default()
                .bounds([lo, hi])
                .labels(vec![
                    Span::raw(format!("{:.1}", lo)),
                    Span::raw(format!("{:.1}", hi)),
                ]),
        );
    frame.render_widget(chart, area);
}

/// Rating line plus the most recent point changes underneath
fn render_rating(frame: &mut Frame, area: Rect, view: &RatingView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    render_line(frame, rows[0], "rating", &view.line, Color::Magenta);

    let recent: Vec<Span> = view
        .tooltips
        .iter()
        .zip(view.rising.iter())
        .rev()
        .take(4)
        .map(|(tip, rising)| {
            let tone = if *rising { Tone::Good } else { Tone::Bad };
            Span::styled(format!("{}  ", tip), tone_style(tone))
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(recent)), rows[1]);
}

fn sync_lines(
    sync: &SyncStatus,
    logs: Option<&Vec<ImportLog>>,
    import: &ImportAction,
) -> Vec<Line<'static>> {
    let panel = sync_panel(sync);
    let mut lines = vec![
        Line::from(format!("Last import: {}", panel.last_import)),
        Line::from(vec![
            Span::raw("Status: "),
            Span::styled(panel.status, tone_style(panel.tone)),
        ]),
    ];
    if let Some(since) = panel.minutes_since {
        lines.push(Line::from(since));
    }
    if let Some(logs) = logs {
        lines.push(Line::from(last_import_line(logs)));
    }
    lines.push(Line::from(Span::styled(
        format!("[i] {}", import.button_label()),
        Style::default().fg(Color::Cyan),
    )));
    lines
}

fn render_dashboard(frame: &mut Frame, area: Rect, app: &App) {
    let page = &app.pages.dashboard;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Min(8),
        ])
        .split(area);

    render_section(frame, rows[0], "Overview", &page.global, |f, r, stats| {
        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1)])
            .split(r);
        render_cards(f, parts[0], &global_stat_cards(stats));
        if let Some(line) = last_update_line(stats) {
            f.render_widget(Paragraph::new(line), parts[1]);
        }
    });

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[1]);

    render_section(frame, middle[0], "Sync", &page.sync, |f, r, sync| {
        let lines = sync_lines(sync, page.logs.data(), &app.import);
        f.render_widget(Paragraph::new(lines), r);
    });

    render_section(frame, middle[1], "Recent trend", &page.trend, |f, r, points| {
        let view = trend_view(points, Some(RECENT_TREND_POINTS));
        render_line(f, r, "win rate %", &view.win_rate, Color::Green);
    });

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[2]);

    render_section(frame, charts[0], "Hero win rate", &page.heroes, |f, r, heroes| {
        render_bars(f, r, &hero_win_bars(heroes), Some(100));
    });
    render_section(
        frame,
        charts[1],
        "Compositions (top 4)",
        &page.compositions,
        |f, r, compositions| render_bars(f, r, &composition_bars(compositions), Some(100)),
    );
    render_section(frame, charts[2], "Rating trend", &page.trend, |f, r, points| {
        render_rating(f, r, &rating_trend_view(points));
    });
}

fn render_matches(frame: &mut Frame, area: Rect, app: &App) {
    let page = &app.pages.matches;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let title = format!("Recent matches ({})", page.filter.label());
    let cards: Vec<MatchCard> = page
        .matches
        .data()
        .map(|all| match_cards(all, &page.filter, &app.resolver, &app.broken))
        .unwrap_or_default();

    render_section(frame, columns[0], &title, &page.matches, |f, r, _| {
        render_match_table(f, r, &cards, page.selected);
    });

    let detail = Block::default().title(" Board ").borders(Borders::ALL);
    match cards.get(page.selected) {
        Some(card) => {
            let text = Paragraph::new(match_detail_lines(card))
                .wrap(Wrap { trim: false })
                .block(detail);
            frame.render_widget(text, columns[1]);
        }
        None => frame.render_widget(detail, columns[1]),
    }
}

fn render_match_table(frame: &mut Frame, area: Rect, cards: &[MatchCard], selected: usize) {
    if cards.is_empty() {
        render_note(frame, area, "No matches for this filter");
        return;
    }
    let header = Row::new(vec!["Hero", "Place", "Result", "Delta", "Rating", "Duration", "Ended"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let row = Row::new(vec![
                Cell::from(card.hero.clone()),
                Cell::from(card.placement.clone()),
                Cell::from(card.result.clone()).style(tone_style(card.result_tone)),
                Cell::from(card.rating_delta.clone()).style(tone_style(card.delta_tone)),
                Cell::from(card.rating_after.clone()),
                Cell::from(card.duration.clone()),
                Cell::from(card.ended.clone()),
            ]);
            if i == selected {
                row.style(Style::default().bg(Color::DarkGray))
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(14),
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(9),
            Constraint::Length(16),
        ],
    )
    .header(header);
    frame.render_widget(table, area);
}

fn match_detail_lines(card: &MatchCard) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            card.hero.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            card.hero_image.clone(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    if card.board.is_empty() {
        lines.push(Line::from("No board recorded"));
        return lines;
    }

    for slot in &card.board {
        let name_style = if slot.known {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(vec![
            Span::styled(slot.name.clone(), name_style),
            Span::raw("  "),
            Span::styled(slot.image.clone(), Style::default().fg(Color::DarkGray)),
        ]));
        // Known tooltips repeat the name on their first line
        let skip = usize::from(slot.known);
        for tip in slot.tooltip.lines().skip(skip) {
            lines.push(Line::from(format!("  {}", tip)));
        }
    }
    lines
}

fn render_stats(frame: &mut Frame, area: Rect, app: &App) {
    let page = &app.pages.stats;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(8)])
        .split(area);

    render_section(frame, rows[0], "Global", &page.global, |f, r, stats| {
        render_cards(f, r, &global_stat_cards(stats));
    });

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);

    render_section(frame, bottom[0], "Heroes", &page.heroes, |f, r, heroes| {
        let header = Row::new(vec!["Hero", "Avg place", "Pick", "Win", "Top 4"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = hero_rows(heroes)
            .into_iter()
            .map(|h| Row::new(vec![h.hero, h.avg_placement, h.pick_rate, h.win_rate, h.top4_rate]))
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Min(16),
                Constraint::Length(10),
                Constraint::Length(7),
                Constraint::Length(7),
                Constraint::Length(7),
            ],
        )
        .header(header);
        f.render_widget(table, r);
    });

    render_section(frame, bottom[1], "Trend", &page.trend, |f, r, points| {
        let view = trend_view(points, None);
        let halves = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(r);
        render_line(f, halves[0], "win rate %", &view.win_rate, Color::Green);
        render_line(f, halves[1], "avg placement", &view.avg_placement, Color::Yellow);
    });
}

fn render_advanced(frame: &mut Frame, area: Rect, app: &App) {
    let page = &app.pages.advanced;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    render_section(frame, top[0], "Win streaks", &page.streaks, |f, r, buckets| {
        render_bars(f, r, &streak_bars(buckets), None);
    });
    render_section(frame, top[1], "Placements", &page.distribution, |f, r, shares| {
        render_bars(f, r, &placement_bars(shares), Some(100));
    });
    render_section(frame, bottom[0], "Match duration", &page.durations, |f, r, stats| {
        let cards = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(r);
        render_cards(f, cards[0], &duration_cards(stats));
    });
    render_section(frame, bottom[1], "Elo progression", &page.elo, |f, r, points| {
        render_rating(f, r, &elo_view(points));
    });
}

fn render_import_logs(frame: &mut Frame, area: Rect, app: &App) {
    let page = &app.pages.import_logs;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(5)])
        .split(area);

    render_section(frame, rows[0], "Sync status", &page.sync, |f, r, sync| {
        f.render_widget(Paragraph::new(sync_lines(sync, None, &app.import)), r);
    });

    render_section(frame, rows[1], "Import logs", &page.logs, |f, r, logs| {
        let header = Row::new(vec!["Time", "Imported", "Status"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = import_log_rows(logs)
            .into_iter()
            .map(|log| {
                let tone = log.tone;
                Row::new(vec![
                    Cell::from(log.time),
                    Cell::from(log.imported),
                    Cell::from(log.status).style(tone_style(tone)),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Length(18),
                Constraint::Length(10),
                Constraint::Min(10),
            ],
        )
        .header(header);
        f.render_widget(table, r);
    });
}

fn render_toast(frame: &mut Frame, area: Rect, import: &ImportAction) {
    let Some(toast) = import.toast() else {
        return;
    };
    let color = match toast.kind {
        ToastKind::Loading => Color::Cyan,
        ToastKind::Success => Color::Green,
        ToastKind::Error => Color::Red,
        ToastKind::Info => Color::Yellow,
    };

    let width = (toast.message.len() as u16 + 4).clamp(20, area.width);
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + 1,
        width,
        height: 3.min(area.height),
    };
    frame.render_widget(Clear, popup);
    let body = Paragraph::new(toast.message.clone())
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(body, popup);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Battlegrounds dashboard - Help",
        "",
        "Global:",
        "  1-5          Jump to page",
        "  Tab / ←→     Next / previous page",
        "  r            Refresh current page",
        "  ?            Toggle help",
        "  q / Esc      Quit",
        "",
        "Dashboard / Import logs:",
        "  i            Start an import",
        "",
        "Matches:",
        "  f            Cycle result filter",
        "  /            Filter by hero name (Enter applies)",
        "  p            Cycle max placement",
        "  j/k or ↑/↓   Select match",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::config::Config;
    use crate::matching::{AssetIndex, ImageResolver, ReferenceData};
    use crate::pages::Page;
    use crate::api::{Endpoint, Fetched};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    #[tokio::test]
    async fn test_draws_every_page() {
        let config = Config::default();
        let resolver = ImageResolver::new(
            Arc::new(ReferenceData::new()),
            AssetIndex::new(),
            &config.hero_art_cdn,
        );
        let (tx, _rx) = mpsc::channel(16);
        let mut app = App::new(&config, Arc::new(FakeApi::new()), resolver, None, tx);

        let ticket = app.pages.dashboard.begin(Endpoint::GlobalStats).unwrap();
        app.pages.dashboard.apply(
            Endpoint::GlobalStats,
            ticket,
            Ok(Fetched::GlobalStats(crate::normalize::stats::global_stats(
                &serde_json::json!({"total_matches": 150, "win_rate": 0.42}),
            ))),
        );

        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        for page in PageId::ALL {
            app.active = page;
            terminal.draw(|f| draw(f, &app)).unwrap();
        }

        app.active = PageId::Dashboard;
        terminal.draw(|f| draw(f, &app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("150"));
        assert!(text.contains("42.0%"));
        assert!(text.contains("Loading..."));
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_unknown_minion_shows_unavailable() {
        let resolver = ImageResolver::new(
            Arc::new(ReferenceData::new()),
            AssetIndex::new(),
            crate::config::DEFAULT_HERO_ART_CDN,
        );
        let m = crate::normalize::matches::normalize_match(&serde_json::json!({
            "hero_name": "A",
            "placement": 3,
            "minions_list": "Mystery Murloc"
        }));
        let cards = crate::present::tables::match_cards(
            &[m],
            &crate::present::tables::MatchFilter::default(),
            &resolver,
            &crate::matching::BrokenImages::new(),
        );

        let lines: Vec<String> = match_detail_lines(&cards[0]).iter().map(line_text).collect();
        assert!(lines.iter().any(|l| l.contains("Mystery Murloc")));
        assert!(lines.iter().any(|l| l.contains("Image not available")));
    }
}
