use std::fs::OpenOptions;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bg_dashboard::api::{ApiClient, DashboardApi};
use bg_dashboard::config::Config;
use bg_dashboard::matching::{AssetIndex, ImageResolver, ReferenceData};
use bg_dashboard::ui::{render, App, AppEvent};
use bg_dashboard::workers::ImageProbe;

const LOG_FILE_VAR: &str = "BG_DASHBOARD_LOG";

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_logging()?;

    info!("Starting bg-dashboard against {}", config.api_url);

    // Reference data
    let reference = Arc::new(ReferenceData::load_from_dir(&config.reference_data_dir));
    info!(
        "Reference data loaded: {} minions, {} heroes",
        reference.minion_count(),
        reference.hero_count()
    );
    let assets = AssetIndex::scan(&config.assets_dir);
    let resolver = ImageResolver::new(reference, assets, &config.hero_art_cdn);

    // Backend client
    let api: Arc<dyn DashboardApi> =
        Arc::new(ApiClient::new(&config.api_url, config.request_timeout)?);
    let probe = if config.probe_images {
        Some(Arc::new(ImageProbe::new(
            config.assets_dir.clone(),
            config.request_timeout,
        )?))
    } else {
        None
    };

    let (tx, mut rx) = mpsc::channel(256);
    spawn_input_reader(tx.clone());

    let mut app = App::new(&config, api, resolver, probe, tx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    app.start();
    let result = run_app(&mut terminal, &mut app, &mut rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!("Dashboard exited with error: {:#}", e);
    }
    info!("Shutting down bg-dashboard");
    result
}

/// Log to the file named by BG_DASHBOARD_LOG; the terminal owns stdout
fn init_logging() -> Result<()> {
    let Ok(path) = std::env::var(LOG_FILE_VAR) else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bg_dashboard=info,warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}

/// Forward key presses from a plain thread; crossterm reads block
fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) {
    std::thread::spawn(move || loop {
        match event::poll(Duration::from_millis(200)) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.blocking_send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Failed to read terminal event: {}", e);
                    break;
                }
            },
            Ok(false) => {
                if tx.is_closed() {
                    break;
                }
            }
            Err(e) => {
                warn!("Failed to poll terminal events: {}", e);
                break;
            }
        }
    });
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mut mpsc::Receiver<AppEvent>,
) -> Result<()> {
    let mut ticker = time::interval(Duration::from_millis(250));

    loop {
        terminal.draw(|f| render::draw(f, app))?;

        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => app.handle(event),
                None => break,
            },
            _ = ticker.tick() => app.on_tick(Instant::now()),
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
