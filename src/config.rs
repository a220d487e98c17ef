use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_HERO_ART_CDN: &str =
    "https://art.hearthstonejson.com/v1/heroes/latest/256x/{id}.png";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL, without trailing slash
    pub api_url: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// `limit` passed to the recent matches endpoint
    pub recent_match_limit: u32,

    /// Interval for re-fetching the match list while the matches page is shown
    pub match_poll_interval: Duration,

    /// Interval between import status checks after a manual import
    pub import_poll_interval: Duration,

    /// Upper bound on how long a manual import is watched
    pub import_timeout: Duration,

    /// Directory holding minions_bg.json and heroes_bg.json
    pub reference_data_dir: PathBuf,

    /// Root for local image paths such as /images/heroes/foo.png
    pub assets_dir: PathBuf,

    /// Hero art URL template, `{id}` is replaced with the card id
    pub hero_art_cdn: String,

    /// Whether to check image URLs in the background
    pub probe_images: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            recent_match_limit: 10,
            match_poll_interval: Duration::from_secs(15),
            import_poll_interval: Duration::from_millis(1000),
            import_timeout: Duration::from_secs(30),
            reference_data_dir: PathBuf::from("data"),
            assets_dir: PathBuf::from("assets"),
            hero_art_cdn: DEFAULT_HERO_ART_CDN.to_string(),
            probe_images: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        Ok(Config {
            api_url: normalize_base_url(
                &env::var("API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            ),

            request_timeout: Duration::from_secs(
                env::var("REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("REQUEST_TIMEOUT_SECS must be a valid number")?,
            ),

            recent_match_limit: env::var("RECENT_MATCH_LIMIT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("RECENT_MATCH_LIMIT must be a valid number")?,

            match_poll_interval: Duration::from_secs(
                env::var("MATCH_POLL_INTERVAL")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse::<u64>()
                    .context("MATCH_POLL_INTERVAL must be a valid number")?
                    .max(1),
            ),

            import_poll_interval: Duration::from_millis(
                env::var("IMPORT_POLL_INTERVAL_MS")
                    .unwrap_or_else(|_| "1000".to_string())
                    .parse::<u64>()
                    .context("IMPORT_POLL_INTERVAL_MS must be a valid number")?
                    .max(50),
            ),

            import_timeout: Duration::from_secs(
                env::var("IMPORT_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("IMPORT_TIMEOUT_SECS must be a valid number")?,
            ),

            reference_data_dir: env::var("REFERENCE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.reference_data_dir),

            assets_dir: env::var("ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_dir),

            hero_art_cdn: env::var("HERO_ART_CDN")
                .unwrap_or_else(|_| DEFAULT_HERO_ART_CDN.to_string()),

            probe_images: env::var("PROBE_IMAGES")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .context("PROBE_IMAGES must be true or false")?,
        })
    }
}

/// Trim whitespace and trailing slashes; fall back to the local default when empty
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_URL.to_string()
    } else {
        trimmed.to_string()
    }
}
