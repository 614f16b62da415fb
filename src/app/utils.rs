// SPDX-License-Identifier: GPL-3.0

mod pagination;
pub mod presentation;
mod table;

pub use pagination::PaginationAction;
pub use table::{PokemonTable, SortColumn, SortDirection};
