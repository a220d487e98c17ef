use serde_json::Value;

use crate::models::{GameResult, Match, Placement};
use crate::normalize::fields::{
    pick, pick_f64, pick_i64, pick_list, pick_str, pick_timestamp, to_list,
};

/// Recent matches arrive as `{"matches": [...]}` or as a bare array
pub fn recent_matches(raw: &Value) -> Vec<Match> {
    let items = match raw.get("matches") {
        Some(Value::Array(items)) => items.as_slice(),
        _ => raw.as_array().map(Vec::as_slice).unwrap_or(&[]),
    };

    items
        .iter()
        .filter(|item| item.is_object())
        .map(normalize_match)
        .collect()
}

/// Canonical match from any known backend shape
pub fn normalize_match(raw: &Value) -> Match {
    let placement = pick_i64(raw, &["placement"])
        .map(Placement::from_rank)
        .unwrap_or(Placement::Pending);

    let game_result = pick_str(raw, &["game_result"])
        .and_then(|r| GameResult::parse(&r))
        .unwrap_or_else(|| GameResult::from_placement(placement));

    let rating_before = pick_i64(raw, &["rating_before", "rating"]);
    let rating_after = pick_i64(raw, &["rating_after", "mmr_after"]);
    let rating_delta = pick_i64(raw, &["rating_delta"]).unwrap_or_else(|| {
        match (rating_before, rating_after) {
            (Some(before), Some(after)) => after - before,
            _ => 0,
        }
    });

    let (minions, minion_images) = board(raw);

    Match {
        hero_name: pick_str(raw, &["hero_name", "hero"]).unwrap_or_default(),
        hero_image: pick_str(raw, &["hero_image"]),
        placement,
        game_result,
        rating_before,
        rating_after,
        rating_delta,
        duration_min: pick_f64(raw, &["duration_min"]),
        start_time: pick_timestamp(raw, &["start_time"]),
        end_time: pick_timestamp(raw, &["end_time", "date"]),
        minions,
        minion_images,
    }
}

/// Board names and images.
///
/// `minions_list` and `minion_images` are strings or arrays. Older payloads
/// carry `minions` as an array of `{name, image, ...}` objects instead.
fn board(raw: &Value) -> (Vec<String>, Vec<String>) {
    let object_minions: Vec<&Value> = match pick(raw, &["minions"]) {
        Some(Value::Array(items)) => items.iter().filter(|i| i.is_object()).collect(),
        _ => Vec::new(),
    };

    let names = if pick(raw, &["minions_list"]).is_some() {
        pick_list(raw, &["minions_list"])
    } else if !object_minions.is_empty() {
        object_minions
            .iter()
            .map(|m| pick_str(m, &["name"]).unwrap_or_default())
            .collect()
    } else {
        pick(raw, &["minions"]).map(to_list).unwrap_or_default()
    };

    let images = if pick(raw, &["minion_images"]).is_some() {
        pick_list(raw, &["minion_images"])
    } else {
        // Keep blanks so slots stay aligned with the names above
        object_minions
            .iter()
            .map(|m| pick_str(m, &["image"]).unwrap_or_default())
            .collect()
    };

    (names, images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_current_backend_shape() {
        let raw = json!({
            "matches": [{
                "hero_name": "Patches the Pirate",
                "hero_image": "/images/heroes/TB_BaconShop_HERO_18.png",
                "placement": 2,
                "game_result": "top4",
                "rating_after": 6420,
                "rating_delta": 48,
                "duration_min": 17.5,
                "end_time": "2024-05-01T12:30:00",
                "minions_list": "Brann Bronzebeard, Baron Rivendare |Zapp Slywick",
                "minion_images": ["/images/minions/a.png", "/images/minions/b.png", "/images/minions/c.png"]
            }]
        });

        let matches = recent_matches(&raw);
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.hero_name, "Patches the Pirate");
        assert_eq!(m.placement, Placement::Rank(2));
        assert_eq!(m.game_result, GameResult::Top4);
        assert_eq!(m.rating_after, Some(6420));
        assert_eq!(m.rating_delta, 48);
        assert_eq!(
            m.minions,
            vec!["Brann Bronzebeard", "Baron Rivendare", "Zapp Slywick"]
        );
        assert_eq!(m.minion_images.len(), 3);
        assert!(m.end_time.is_some());
    }

    #[test]
    fn test_legacy_field_names() {
        let raw = json!([{
            "hero": "Sylvanas",
            "placement": 6,
            "rating": 6000,
            "mmr_after": 5950,
            "date": "2024-04-02T20:00:00",
            "minions": [
                {"id": "1", "name": "Alleycat", "image": "/images/minions/alleycat.png"},
                {"id": "2", "name": "Scallywag"}
            ]
        }]);

        let m = &recent_matches(&raw)[0];
        assert_eq!(m.hero_name, "Sylvanas");
        assert_eq!(m.game_result, GameResult::Loss);
        assert_eq!(m.rating_before, Some(6000));
        assert_eq!(m.rating_after, Some(5950));
        assert_eq!(m.rating_delta, -50);
        assert_eq!(m.minions, vec!["Alleycat", "Scallywag"]);
        assert_eq!(m.minion_images, vec!["/images/minions/alleycat.png", ""]);
        assert!(m.end_time.is_some());
    }

    #[test]
    fn test_pipe_delimited_images() {
        let raw = json!({
            "hero_name": "Rafaam",
            "minions_list": ["A", "B"],
            "minion_images": " /img/a.png|/img/b.png | "
        });

        let m = normalize_match(&raw);
        assert_eq!(m.minion_images, vec!["/img/a.png", "/img/b.png"]);

        let renormalized = normalize_match(&json!({
            "hero_name": "Rafaam",
            "minions_list": m.minions.clone(),
            "minion_images": m.minion_images.clone(),
        }));
        assert_eq!(renormalized.minion_images, m.minion_images);
    }

    #[test]
    fn test_missing_fields_default() {
        let m = normalize_match(&json!({}));
        assert_eq!(m.hero_name, "");
        assert_eq!(m.placement, Placement::Pending);
        assert_eq!(m.game_result, GameResult::Unknown);
        assert_eq!(m.rating_delta, 0);
        assert!(m.minions.is_empty());
        assert!(m.minion_images.is_empty());
    }

    #[test]
    fn test_non_collection_payload() {
        assert!(recent_matches(&json!({"detail": "oops"})).is_empty());
        assert!(recent_matches(&json!({"matches": []})).is_empty());
    }
}
