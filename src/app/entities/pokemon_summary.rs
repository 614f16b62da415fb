// SPDX-License-Identifier: GPL-3.0-only

use serde::Deserialize;

/// Abbreviated Pokémon record, one row of the list table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PokemonSummary {
    pub id: i64,
    pub name: String,
    /// Front sprite URL, PokéAPI has a few Pokémon without one
    pub image: Option<String>,
    /// Height in decimetres
    pub height: i64,
    /// Weight in hectograms
    pub weight: i64,
    pub types: Vec<String>,
}

/// Envelope of `GET /api/pokemon`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PokemonPage {
    pub results: Vec<PokemonSummary>,
    /// Whether the backend answered from its cache layer
    #[serde(rename = "fromCache")]
    pub from_cache: bool,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

impl PokemonPage {
    /// Sprite URLs of every record on the page, in table order
    pub fn image_urls(&self) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|pokemon| pokemon.image.clone())
            .collect()
    }
}
