// SPDX-License-Identifier: GPL-3.0

mod cache_clear;
mod pokemon_detail;
mod pokemon_summary;

pub use cache_clear::CacheClearResult;
pub use pokemon_detail::PokemonDetail;
pub use pokemon_detail::PokemonGeneration;
pub use pokemon_detail::PokemonSpecies;
pub use pokemon_detail::PokemonStat;
pub use pokemon_detail::PokemonStats;
pub use pokemon_summary::PokemonPage;
pub use pokemon_summary::PokemonSummary;
