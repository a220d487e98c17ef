use std::env;
use std::sync::Arc;

use anyhow::{bail, Result};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bg_dashboard::api::{ApiClient, DashboardApi};
use bg_dashboard::config::Config;
use bg_dashboard::matching::{AssetIndex, BrokenImages, ImageResolver, ReferenceData};
use bg_dashboard::pages::dashboard::RECENT_TREND_POINTS;
use bg_dashboard::pages::{
    refresh_page, AdvancedPage, DashboardPage, ImportAction, ImportLogsPage, MatchesPage,
    PageId, Section, SectionData, StatsPage,
};
use bg_dashboard::present::cards::{
    duration_cards, global_stat_cards, last_import_line, last_update_line, sync_panel, StatCard,
};
use bg_dashboard::present::charts::{
    composition_bars, elo_view, hero_win_bars, placement_bars, rating_trend_view, streak_bars,
    trend_view, BarView,
};
use bg_dashboard::present::tables::{hero_rows, import_log_rows, match_cards, MatchFilter};
use bg_dashboard::workers::{ImportEvent, ImportWatcher};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so the snapshot itself can be piped
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bg_snapshot=info,bg_dashboard=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();
    let pages = parse_pages(&args)?;
    let run_import = args.iter().any(|a| a == "--import");
    let filter = parse_match_filter(&args)?;

    let config = Config::from_env()?;
    info!("Taking snapshot of {}", config.api_url);

    let api: Arc<dyn DashboardApi> =
        Arc::new(ApiClient::new(&config.api_url, config.request_timeout)?);
    let reference = Arc::new(ReferenceData::load_from_dir(&config.reference_data_dir));
    let resolver = ImageResolver::new(
        reference,
        AssetIndex::scan(&config.assets_dir),
        &config.hero_art_cdn,
    );

    if run_import {
        import_and_wait(&config, Arc::clone(&api)).await;
    }

    for page in pages {
        match page {
            PageId::Dashboard => {
                let mut page = DashboardPage::new();
                refresh_page(&mut page, api.as_ref()).await;
                print_dashboard(&page);
            }
            PageId::Matches => {
                let mut page = MatchesPage::new(config.recent_match_limit, config.match_poll_interval);
                page.filter = filter.clone();
                refresh_page(&mut page, api.as_ref()).await;
                print_matches(&page, &resolver);
            }
            PageId::Stats => {
                let mut page = StatsPage::new();
                refresh_page(&mut page, api.as_ref()).await;
                print_stats(&page);
            }
            PageId::Advanced => {
                let mut page = AdvancedPage::new();
                refresh_page(&mut page, api.as_ref()).await;
                print_advanced(&page);
            }
            PageId::ImportLogs => {
                let mut page = ImportLogsPage::new();
                refresh_page(&mut page, api.as_ref()).await;
                print_import_logs(&page);
            }
        }
    }

    Ok(())
}

/// Parse --page arguments; no argument means every page
fn parse_pages(args: &[String]) -> Result<Vec<PageId>> {
    let mut pages = Vec::new();
    for (i, arg) in args.iter().enumerate() {
        if arg == "--page" || arg == "-p" {
            let Some(value) = args.get(i + 1) else {
                bail!("--page needs a value");
            };
            let page = match value.as_str() {
                "dashboard" => PageId::Dashboard,
                "matches" => PageId::Matches,
                "stats" => PageId::Stats,
                "advanced" => PageId::Advanced,
                "import-logs" | "imports" => PageId::ImportLogs,
                other => bail!("Unknown page '{}'", other),
            };
            pages.push(page);
        }
    }
    if pages.is_empty() {
        pages = PageId::ALL.to_vec();
    }
    Ok(pages)
}

/// `--hero <text>` and `--max-placement <1-8>` narrow the matches page
fn parse_match_filter(args: &[String]) -> Result<MatchFilter> {
    let mut filter = MatchFilter::default();
    for (i, arg) in args.iter().enumerate() {
        match arg.as_str() {
            "--hero" => {
                let Some(value) = args.get(i + 1) else {
                    bail!("--hero needs a value");
                };
                filter.hero = value.trim().to_string();
            }
            "--max-placement" => {
                let max = args
                    .get(i + 1)
                    .and_then(|v| v.parse::<u8>().ok())
                    .filter(|p| (1..=8).contains(p));
                let Some(max) = max else {
                    bail!("--max-placement needs a placement between 1 and 8");
                };
                filter.max_placement = Some(max);
            }
            _ => {}
        }
    }
    Ok(filter)
}

async fn import_and_wait(config: &Config, api: Arc<dyn DashboardApi>) {
    let mut action = ImportAction::new();
    action.begin();

    let (tx, mut rx) = mpsc::channel::<ImportEvent>(64);
    let watcher = ImportWatcher::new(api, config.import_poll_interval, config.import_timeout);
    let task = tokio::spawn(async move { watcher.run(tx).await });

    while let Some(event) = rx.recv().await {
        action.on_event(&event);
        if let Some(toast) = action.toast() {
            info!("{}", toast.message);
        }
    }
    if let Err(e) = task.await {
        warn!("Import watcher task failed: {}", e);
    }
}

fn heading(title: &str) {
    println!();
    println!("== {} ==", title);
}

/// Print a section's state, or hand its data to `print`
fn print_section<T: SectionData>(title: &str, section: &Section<T>, print: impl FnOnce(&T)) {
    println!("-- {}", title);
    if let Some(error) = section.error() {
        println!("   ! {}", error);
    }
    match section.data() {
        Some(data) if !data.is_empty() => print(data),
        Some(_) => println!("   No data available"),
        None if section.error().is_none() => println!("   Loading..."),
        None => {}
    }
}

fn print_cards(cards: &[StatCard]) {
    for card in cards {
        println!("   {:<18} {}", card.label, card.value);
    }
}

fn print_bars(bars: &[BarView]) {
    let width = bars.iter().map(|b| b.label.len()).max().unwrap_or(0);
    for bar in bars {
        println!("   {:<width$}  {}", bar.label, bar.text, width = width);
    }
}

fn print_dashboard(page: &DashboardPage) {
    heading(PageId::Dashboard.title());
    print_section("Overview", &page.global, |stats| {
        print_cards(&global_stat_cards(stats));
        if let Some(line) = last_update_line(stats) {
            println!("   {}", line);
        }
    });
    print_section("Sync", &page.sync, |sync| {
        let panel = sync_panel(sync);
        println!("   Last import: {} ({})", panel.last_import, panel.status);
        if let Some(since) = panel.minutes_since {
            println!("   {}", since);
        }
        if let Some(logs) = page.logs.data() {
            println!("   {}", last_import_line(logs));
        }
    });
    print_section("Recent trend", &page.trend, |points| {
        let view = trend_view(points, Some(RECENT_TREND_POINTS));
        for (label, (_, rate)) in view.win_rate.labels.iter().zip(view.win_rate.points.iter()) {
            println!("   {}  {:.1}%", label, rate);
        }
    });
    print_section("Hero win rate", &page.heroes, |heroes| print_bars(&hero_win_bars(heroes)));
    print_section("Compositions", &page.compositions, |compositions| {
        print_bars(&composition_bars(compositions))
    });
    print_section("Rating trend", &page.trend, |points| {
        let view = rating_trend_view(points);
        for (label, tip) in view.line.labels.iter().zip(view.tooltips.iter()) {
            println!("   {}  {}", label, tip);
        }
    });
}

fn print_matches(page: &MatchesPage, resolver: &ImageResolver) {
    heading(PageId::Matches.title());
    let broken = BrokenImages::new();
    print_section(&format!("Recent matches ({})", page.filter.label()), &page.matches, |matches| {
        for card in match_cards(matches, &page.filter, resolver, &broken) {
            println!(
                "   #{:<8} {:<24} {:<5} {:>5}  {}  {}",
                card.placement, card.hero, card.result, card.rating_delta, card.duration, card.ended
            );
            let board: Vec<String> = card
                .board
                .iter()
                .map(|s| {
                    if s.known {
                        s.name.clone()
                    } else {
                        format!("{} ({})", s.name, s.tooltip)
                    }
                })
                .collect();
            if !board.is_empty() {
                println!("             board: {}", board.join(", "));
            }
        }
    });
}

fn print_stats(page: &StatsPage) {
    heading(PageId::Stats.title());
    print_section("Global", &page.global, |stats| print_cards(&global_stat_cards(stats)));
    print_section("Heroes", &page.heroes, |heroes| {
        for row in hero_rows(heroes) {
            println!(
                "   {:<24} avg {:>5}  pick {:>6}  win {:>6}  top4 {:>6}",
                row.hero, row.avg_placement, row.pick_rate, row.win_rate, row.top4_rate
            );
        }
    });
    print_section("Trend", &page.trend, |points| {
        let view = trend_view(points, None);
        for (label, (_, avg)) in view
            .avg_placement
            .labels
            .iter()
            .zip(view.avg_placement.points.iter())
        {
            println!("   {}  avg placement {:.2}", label, avg);
        }
    });
}

fn print_advanced(page: &AdvancedPage) {
    heading(PageId::Advanced.title());
    print_section("Win streaks", &page.streaks, |buckets| print_bars(&streak_bars(buckets)));
    print_section("Placements", &page.distribution, |shares| {
        print_bars(&placement_bars(shares))
    });
    print_section("Match duration", &page.durations, |stats| {
        print_cards(&duration_cards(stats))
    });
    print_section("Elo progression", &page.elo, |points| {
        let view = elo_view(points);
        for (label, tip) in view.line.labels.iter().zip(view.tooltips.iter()) {
            println!("   {}  {}", label, tip);
        }
    });
}

fn print_import_logs(page: &ImportLogsPage) {
    heading(PageId::ImportLogs.title());
    print_section("Sync status", &page.sync, |sync| {
        let panel = sync_panel(sync);
        println!("   Last import: {} ({})", panel.last_import, panel.status);
    });
    print_section("Import logs", &page.logs, |logs| {
        for row in import_log_rows(logs) {
            println!("   {:<18} {:>8}  {}", row.time, row.imported, row.status);
        }
    });
}
