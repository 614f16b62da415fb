// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

use serde::{
    Deserialize, Deserializer,
    de::{MapAccess, Visitor},
};

use super::PokemonSummary;
use crate::fl;

/// Expanded Pokémon record shown in the details dialog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PokemonDetail {
    #[serde(flatten)]
    pub summary: PokemonSummary,
    #[serde(default)]
    pub abilities: Option<Vec<String>>,
    #[serde(default)]
    pub stats: Option<PokemonStats>,
    #[serde(default)]
    pub species: Option<PokemonSpecies>,
}

/// Base stats in the order the backend sent them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PokemonStats(Vec<PokemonStat>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonStat {
    pub name: String,
    pub value: i64,
}

impl PokemonStats {
    pub fn iter(&self) -> impl Iterator<Item = &PokemonStat> {
        self.0.iter()
    }

    /// Returns the total value of all the stats of the Pokémon
    pub fn total(&self) -> i64 {
        self.0.iter().map(|stat| stat.value).sum()
    }
}

// A JSON object would lose its order in a BTreeMap, stats are read entry by entry instead.
impl<'de> Deserialize<'de> for PokemonStats {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StatsVisitor;

        impl<'de> Visitor<'de> for StatsVisitor {
            type Value = PokemonStats;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of stat names to integer values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut stats = Vec::with_capacity(map.size_hint().unwrap_or(6));
                while let Some((name, value)) = map.next_entry::<String, i64>()? {
                    stats.push(PokemonStat { name, value });
                }
                Ok(PokemonStats(stats))
            }
        }

        deserializer.deserialize_map(StatsVisitor)
    }
}

/// Species information the backend attaches when PokéAPI answered for it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PokemonSpecies {
    pub name: String,
    pub generation: String,
    #[serde(default)]
    pub habitat: Option<String>,
    #[serde(default)]
    pub is_legendary: bool,
    #[serde(default)]
    pub is_mythical: bool,
    #[serde(default)]
    pub flavor_text: Option<String>,
}

impl PokemonSpecies {
    pub fn generation(&self) -> PokemonGeneration {
        PokemonGeneration::from_name(&self.generation)
    }

    /// Flavor text with PokéAPI's form feeds and hard line breaks collapsed into single spaces
    pub fn clean_flavor_text(&self) -> Option<String> {
        self.flavor_text.as_ref().map(|text| {
            text.chars()
                .map(|c| if c.is_control() { ' ' } else { c })
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<&str>>()
                .join(" ")
        })
    }
}

/// Pokémon generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PokemonGeneration {
    #[default]
    Unknown,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
}

impl fmt::Display for PokemonGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self {
            PokemonGeneration::Unknown => write!(f, "{}", fl!("unknown")),
            PokemonGeneration::One => write!(f, "{}", fl!("gen-i")),
            PokemonGeneration::Two => write!(f, "{}", fl!("gen-ii")),
            PokemonGeneration::Three => write!(f, "{}", fl!("gen-iii")),
            PokemonGeneration::Four => write!(f, "{}", fl!("gen-iv")),
            PokemonGeneration::Five => write!(f, "{}", fl!("gen-v")),
            PokemonGeneration::Six => write!(f, "{}", fl!("gen-vi")),
            PokemonGeneration::Seven => write!(f, "{}", fl!("gen-vii")),
            PokemonGeneration::Eight => write!(f, "{}", fl!("gen-viii")),
            PokemonGeneration::Nine => write!(f, "{}", fl!("gen-ix")),
        }
    }
}

impl PokemonGeneration {
    /// Parses a PokéAPI generation name such as `generation-iv`
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "generation-i" => PokemonGeneration::One,
            "generation-ii" => PokemonGeneration::Two,
            "generation-iii" => PokemonGeneration::Three,
            "generation-iv" => PokemonGeneration::Four,
            "generation-v" => PokemonGeneration::Five,
            "generation-vi" => PokemonGeneration::Six,
            "generation-vii" => PokemonGeneration::Seven,
            "generation-viii" => PokemonGeneration::Eight,
            "generation-ix" => PokemonGeneration::Nine,
            _ => PokemonGeneration::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIKACHU: &str = r#"{
        "id": 25,
        "name": "pikachu",
        "height": 4,
        "weight": 60,
        "types": ["electric"],
        "image": "https://img.example/25.png",
        "stats": {"hp": 35, "attack": 55, "defense": 40,
                  "special-attack": 50, "special-defense": 50, "speed": 90},
        "abilities": ["static", "lightning-rod"],
        "species": {
            "name": "pikachu",
            "generation": "generation-i",
            "habitat": "forest",
            "is_legendary": false,
            "is_mythical": false,
            "flavor_text": "When several of\nthese POKéMON gather,\u000ctheir electricity"
        }
    }"#;

    #[test]
    fn parses_a_full_detail() {
        let detail: PokemonDetail = serde_json::from_str(PIKACHU).unwrap();

        assert_eq!(detail.summary.id, 25);
        assert_eq!(detail.summary.name, "pikachu");
        assert_eq!(
            detail.abilities.as_deref(),
            Some(&[String::from("static"), String::from("lightning-rod")][..])
        );

        let species = detail.species.as_ref().unwrap();
        assert_eq!(species.generation(), PokemonGeneration::One);
        assert_eq!(
            species.clean_flavor_text().as_deref(),
            Some("When several of these POKéMON gather, their electricity")
        );
    }

    #[test]
    fn stats_keep_backend_order() {
        let detail: PokemonDetail = serde_json::from_str(PIKACHU).unwrap();
        let stats = detail.stats.unwrap();

        let names: Vec<&str> = stats.iter().map(|stat| stat.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "hp",
                "attack",
                "defense",
                "special-attack",
                "special-defense",
                "speed"
            ]
        );
        assert_eq!(stats.total(), 320);
    }

    #[test]
    fn optional_sections_may_be_absent() {
        let detail: PokemonDetail = serde_json::from_str(
            r#"{"id": 132, "name": "ditto", "height": 3, "weight": 40, "types": ["normal"], "image": null}"#,
        )
        .unwrap();

        assert_eq!(detail.abilities, None);
        assert_eq!(detail.stats, None);
        assert_eq!(detail.species, None);
    }

    #[test]
    fn non_integer_stat_is_rejected() {
        let body = r#"{"id": 1, "name": "bulbasaur", "height": 7, "weight": 69,
                       "types": ["grass"], "image": null, "stats": {"hp": "lots"}}"#;
        assert!(serde_json::from_str::<PokemonDetail>(body).is_err());
    }

    #[test]
    fn unknown_generation_names_fall_back() {
        assert_eq!(
            PokemonGeneration::from_name("GENERATION-IX"),
            PokemonGeneration::Nine
        );
        assert_eq!(
            PokemonGeneration::from_name("generation-x"),
            PokemonGeneration::Unknown
        );
    }
}
