use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::matching::reference_data::{strip_markup, ReferenceData};
use crate::models::Match;

pub const MINION_PLACEHOLDER: &str = "/images/minions/placeholder.png";
pub const HERO_PLACEHOLDER: &str = "/images/heroes/placeholder.png";
pub const IMAGE_UNAVAILABLE: &str = "Image not available";
pub const UNKNOWN_MINION: &str = "Unknown";

const HERO_IMAGE_DIR: &str = "/images/heroes";

/// One minion on a match's final board, ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSlot {
    pub name: String,
    pub image: String,
    pub tooltip: String,
    /// Whether the name joined against reference data
    pub known: bool,
}

/// Local image files available under the asset root, as URL paths
#[derive(Debug, Clone, Default)]
pub struct AssetIndex {
    paths: HashSet<String>,
}

impl AssetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `<assets_dir>/images/heroes/*`
    pub fn scan(assets_dir: &Path) -> Self {
        let mut index = Self::new();
        let dir = assets_dir.join("images").join("heroes");

        match std::fs::read_dir(&dir) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    if let Some(name) = entry.file_name().to_str() {
                        index.insert(&format!("{}/{}", HERO_IMAGE_DIR, name));
                    }
                }
                debug!("Indexed {} local hero images", index.paths.len());
            }
            Err(e) => warn!("Cannot read hero image directory {}: {}", dir.display(), e),
        }

        index
    }

    pub fn insert(&mut self, path: &str) {
        self.paths.insert(path.to_string());
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }
}

/// URLs that failed to load; drawing substitutes the placeholder for them
#[derive(Debug, Clone, Default)]
pub struct BrokenImages {
    urls: HashSet<String>,
}

impl BrokenImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the URL was not already known to be broken
    pub fn mark(&mut self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn is_broken(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// The URL to draw for `url`
    pub fn display<'a>(&self, url: &'a str, placeholder: &'a str) -> &'a str {
        if self.is_broken(url) {
            placeholder
        } else {
            url
        }
    }
}

/// An image entry sent by the backend is usable if non-blank and not a
/// leftover delimited list
pub fn is_usable_image(url: &str) -> bool {
    let url = url.trim();
    !url.is_empty() && !url.contains('|')
}

/// `Patches the Pirate` -> `patches_the_pirate`
pub fn hero_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
    }
    slug.trim_end_matches('_').to_string()
}

/// Joins matches against reference data to pick art and tooltips
#[derive(Debug, Clone)]
pub struct ImageResolver {
    reference: Arc<ReferenceData>,
    assets: AssetIndex,
    hero_cdn: String,
}

impl ImageResolver {
    pub fn new(reference: Arc<ReferenceData>, assets: AssetIndex, hero_cdn: &str) -> Self {
        Self {
            reference,
            assets,
            hero_cdn: hero_cdn.to_string(),
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Resolve every board slot of a match.
    ///
    /// Image per slot: the match's own image when both lists have the same
    /// length and the entry is usable, else the reference image for the
    /// name, else the placeholder.
    pub fn resolve_board(&self, m: &Match) -> Vec<BoardSlot> {
        let aligned = m.minion_images.len() == m.minions.len();

        if m.minions.is_empty() {
            // Images without names: nothing to join on
            return m
                .minion_images
                .iter()
                .map(|image| BoardSlot {
                    name: UNKNOWN_MINION.to_string(),
                    image: if is_usable_image(image) {
                        image.clone()
                    } else {
                        MINION_PLACEHOLDER.to_string()
                    },
                    tooltip: IMAGE_UNAVAILABLE.to_string(),
                    known: false,
                })
                .collect();
        }

        m.minions
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let own_image = if aligned {
                    m.minion_images.get(i).filter(|img| is_usable_image(img))
                } else {
                    None
                };
                self.slot(name, own_image.map(String::as_str))
            })
            .collect()
    }

    fn slot(&self, name: &str, own_image: Option<&str>) -> BoardSlot {
        let display_name = if name.trim().is_empty() {
            UNKNOWN_MINION.to_string()
        } else {
            name.to_string()
        };

        match self.reference.minion(name) {
            Some(info) => {
                let image = own_image
                    .map(str::to_string)
                    .or_else(|| Some(info.image.clone()).filter(|i| is_usable_image(i)))
                    .unwrap_or_else(|| MINION_PLACEHOLDER.to_string());
                BoardSlot {
                    name: display_name,
                    image,
                    tooltip: format!("{}\n{}\n{}", info.name, info.kind, strip_markup(&info.effect)),
                    known: true,
                }
            }
            None => BoardSlot {
                name: display_name,
                image: own_image
                    .map(str::to_string)
                    .unwrap_or_else(|| MINION_PLACEHOLDER.to_string()),
                tooltip: IMAGE_UNAVAILABLE.to_string(),
                known: false,
            },
        }
    }

    /// Hero art: explicit URL, then a local file named after the hero, then
    /// the CDN by reference id, then the placeholder
    pub fn resolve_hero(&self, hero_name: &str, explicit: Option<&str>) -> String {
        if let Some(url) = explicit.filter(|u| is_usable_image(u)) {
            return url.trim().to_string();
        }

        let slug = hero_slug(hero_name);
        if !slug.is_empty() {
            let local = format!("{}/{}.png", HERO_IMAGE_DIR, slug);
            if self.assets.contains(&local) {
                return local;
            }
        }

        if let Some(hero) = self.reference.hero_containing(hero_name) {
            return self
                .hero_cdn
                .replace("{id}", &urlencoding::encode(&hero.id));
        }

        HERO_PLACEHOLDER.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_HERO_ART_CDN;
    use crate::models::{GameResult, HeroInfo, MinionInfo, Placement};

    fn sample_match(minions: &[&str], images: &[&str]) -> Match {
        Match {
            hero_name: "Patches the Pirate".to_string(),
            hero_image: None,
            placement: Placement::Rank(1),
            game_result: GameResult::Win,
            rating_before: None,
            rating_after: None,
            rating_delta: 0,
            duration_min: None,
            start_time: None,
            end_time: None,
            minions: minions.iter().map(|s| s.to_string()).collect(),
            minion_images: images.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn resolver() -> ImageResolver {
        let mut reference = ReferenceData::new();
        reference.add_minion(MinionInfo {
            id: "BG_1".into(),
            name: "Alleycat".into(),
            kind: "Beast".into(),
            effect: "<b>Battlecry:</b> Summon a 1/1 Cat.".into(),
            image: "/images/minions/BG_1.png".into(),
        });
        reference.add_hero(HeroInfo {
            id: "TB_BaconShop_HERO_18".into(),
            name: "Patches the Pirate".into(),
            kind: String::new(),
            effect: String::new(),
            image: String::new(),
        });
        ImageResolver::new(Arc::new(reference), AssetIndex::new(), DEFAULT_HERO_ART_CDN)
    }

    #[test]
    fn test_unknown_minion_gets_placeholder() {
        let slots = resolver().resolve_board(&sample_match(&["Mystery Murloc"], &[]));
        assert_eq!(slots[0].image, MINION_PLACEHOLDER);
        assert_eq!(slots[0].tooltip, IMAGE_UNAVAILABLE);
        assert!(!slots[0].known);
    }

    #[test]
    fn test_aligned_images_win() {
        let slots = resolver().resolve_board(&sample_match(
            &["Alleycat", "Mystery Murloc"],
            &["/img/cat.png", "/img/murloc.png"],
        ));
        assert_eq!(slots[0].image, "/img/cat.png");
        assert_eq!(slots[0].tooltip, "Alleycat\nBeast\nBattlecry: Summon a 1/1 Cat.");
        assert_eq!(slots[1].image, "/img/murloc.png");
    }

    #[test]
    fn test_misaligned_images_fall_back_to_name_join() {
        let slots = resolver().resolve_board(&sample_match(
            &["alleycat", "Mystery Murloc"],
            &["/img/only-one.png"],
        ));
        assert_eq!(slots[0].image, "/images/minions/BG_1.png");
        assert_eq!(slots[1].image, MINION_PLACEHOLDER);
    }

    #[test]
    fn test_unusable_entry_falls_back() {
        let slots =
            resolver().resolve_board(&sample_match(&["Alleycat"], &["/a.png|/b.png"]));
        assert_eq!(slots[0].image, "/images/minions/BG_1.png");
    }

    #[test]
    fn test_hero_chain() {
        let r = resolver();
        assert_eq!(r.resolve_hero("Anyone", Some("/explicit.png")), "/explicit.png");
        assert_eq!(
            r.resolve_hero("Patches", None),
            "https://art.hearthstonejson.com/v1/heroes/latest/256x/TB_BaconShop_HERO_18.png"
        );
        assert_eq!(r.resolve_hero("Rafaam", Some("  ")), HERO_PLACEHOLDER);
    }

    #[test]
    fn test_hero_recorded_as_card_id() {
        let r = resolver();
        let expected =
            "https://art.hearthstonejson.com/v1/heroes/latest/256x/TB_BaconShop_HERO_18.png";
        assert_eq!(r.resolve_hero("TB_BaconShop_HERO_18", None), expected);
        assert_eq!(r.resolve_hero("TB_BaconShop_HERO_18_SKIN_A", None), expected);
    }

    #[test]
    fn test_hero_local_file_before_cdn() {
        let mut assets = AssetIndex::new();
        assets.insert("/images/heroes/patches_the_pirate.png");
        let r = ImageResolver::new(
            resolver().reference.clone(),
            assets,
            DEFAULT_HERO_ART_CDN,
        );
        assert_eq!(
            r.resolve_hero("Patches the Pirate", None),
            "/images/heroes/patches_the_pirate.png"
        );
    }

    #[test]
    fn test_hero_slug() {
        assert_eq!(hero_slug("Patches the Pirate"), "patches_the_pirate");
        assert_eq!(hero_slug("  A. F. Kay "), "a_f_kay");
        assert_eq!(hero_slug("N'Zoth"), "n_zoth");
    }

    #[test]
    fn test_broken_images_display() {
        let mut broken = BrokenImages::new();
        assert!(broken.mark("/img/x.png"));
        assert!(!broken.mark("/img/x.png"));
        assert_eq!(broken.display("/img/x.png", MINION_PLACEHOLDER), MINION_PLACEHOLDER);
        assert_eq!(broken.display("/img/y.png", MINION_PLACEHOLDER), "/img/y.png");
    }
}
