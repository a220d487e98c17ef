use serde::{Deserialize, Serialize};

/// Static card data for a Battlegrounds minion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinionInfo {
    /// Card id, the key in minions_bg.json
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub effect: String,
    pub image: String,
}

/// Static card data for a Battlegrounds hero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroInfo {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub effect: String,
    pub image: String,
}
