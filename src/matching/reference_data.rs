use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::models::{HeroInfo, MinionInfo};

pub const MINIONS_FILE: &str = "minions_bg.json";
pub const HEROES_FILE: &str = "heroes_bg.json";

/// Entry of minions_bg.json / heroes_bg.json, keyed by card id in the file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct CardEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    effect: String,
    image: String,
}

/// Static minion and hero card data, looked up by case-insensitive name
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    /// lowercase name -> minion
    minions: HashMap<String, MinionInfo>,
    /// lowercase name -> hero
    heroes: HashMap<String, HeroInfo>,
    /// Heroes ordered by id, for substring matching
    hero_list: Vec<HeroInfo>,
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn load_table(path: &Path) -> Result<Vec<(String, CardEntry)>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let table: HashMap<String, CardEntry> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let mut entries: Vec<(String, CardEntry)> = table
        .into_iter()
        .filter(|(_, entry)| !entry.name.trim().is_empty())
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

impl ReferenceData {
    /// Create an empty table; every lookup misses
    pub fn new() -> Self {
        Self::default()
    }

    /// Load minions_bg.json and heroes_bg.json from `dir`.
    ///
    /// A missing or broken file only costs tooltips and art, so it is logged
    /// and replaced by an empty table.
    pub fn load_from_dir(dir: &Path) -> Self {
        let mut data = Self::new();

        match load_table(&dir.join(MINIONS_FILE)) {
            Ok(entries) => {
                for (id, entry) in entries {
                    data.add_minion(MinionInfo {
                        id,
                        name: entry.name,
                        kind: entry.kind,
                        effect: entry.effect,
                        image: entry.image,
                    });
                }
            }
            Err(e) => warn!("Minion reference data unavailable: {:#}", e),
        }

        match load_table(&dir.join(HEROES_FILE)) {
            Ok(entries) => {
                for (id, entry) in entries {
                    data.add_hero(HeroInfo {
                        id,
                        name: entry.name,
                        kind: entry.kind,
                        effect: entry.effect,
                        image: entry.image,
                    });
                }
            }
            Err(e) => warn!("Hero reference data unavailable: {:#}", e),
        }

        info!(
            "Loaded reference data: {} minions, {} heroes",
            data.minions.len(),
            data.heroes.len()
        );

        data
    }

    pub fn add_minion(&mut self, minion: MinionInfo) {
        self.minions.insert(key(&minion.name), minion);
    }

    pub fn add_hero(&mut self, hero: HeroInfo) {
        self.heroes.insert(key(&hero.name), hero.clone());
        let pos = self
            .hero_list
            .binary_search_by(|h| h.id.cmp(&hero.id))
            .unwrap_or_else(|pos| pos);
        self.hero_list.insert(pos, hero);
    }

    /// Exact, case-insensitive minion lookup
    pub fn minion(&self, name: &str) -> Option<&MinionInfo> {
        self.minions.get(&key(name))
    }

    /// Exact, case-insensitive hero lookup
    pub fn hero(&self, name: &str) -> Option<&HeroInfo> {
        self.heroes.get(&key(name))
    }

    /// Exact match first, then the first hero (by id) whose name contains
    /// `name`, then a card id match in either direction.
    ///
    /// Trackers sometimes record the raw card id (`TB_BaconShop_HERO_18`,
    /// `TB_BaconShop_HERO_18_SKIN_A`) as the hero name.
    pub fn hero_containing(&self, name: &str) -> Option<&HeroInfo> {
        let needle = key(name);
        if needle.is_empty() {
            return None;
        }

        if let Some(hero) = self.heroes.get(&needle) {
            return Some(hero);
        }

        let found = self
            .hero_list
            .iter()
            .find(|h| h.name.to_lowercase().contains(&needle))
            .or_else(|| self.hero_by_id_fragment(&needle));

        if found.is_none() {
            debug!("No hero reference for {}", name);
        }
        found
    }

    /// Longest id contained in `needle` (skin ids embed the base id), else the
    /// first id containing it
    fn hero_by_id_fragment(&self, needle: &str) -> Option<&HeroInfo> {
        self.hero_list
            .iter()
            .filter(|h| !h.id.is_empty() && needle.contains(&h.id.to_lowercase()))
            .max_by_key(|h| h.id.len())
            .or_else(|| {
                self.hero_list
                    .iter()
                    .find(|h| h.id.to_lowercase().contains(needle))
            })
    }

    pub fn minion_count(&self) -> usize {
        self.minions.len()
    }

    pub fn hero_count(&self) -> usize {
        self.heroes.len()
    }
}

/// Card text without markup: drops `<b>`-style tags and `[x]`, collapses spaces
pub fn strip_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;

    for ch in text.replace("[x]", "").chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if in_tag => {}
            '\n' => out.push(' '),
            _ => out.push(ch),
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
