// SPDX-License-Identifier: GPL-3.0-only

use std::cmp::Ordering;

use super::PaginationAction;
use crate::app::entities::PokemonSummary;

/// Columns the table can be sorted by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortColumn {
    #[default]
    Id,
    Name,
    Height,
    Weight,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Records of the current page plus the sorting, search and paging the user applied on top.
///
/// A new load replaces the whole table through [`PokemonTable::replace`], nothing
/// from the previous records survives.
#[derive(Debug, Clone)]
pub struct PokemonTable {
    records: Vec<PokemonSummary>,
    /// Indices into `records` after search and sort
    visible: Vec<usize>,
    sort: (SortColumn, SortDirection),
    search: String,
    page: usize,
    page_size: usize,
}

impl PokemonTable {
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            visible: Vec::new(),
            sort: Default::default(),
            search: String::new(),
            page: 0,
            page_size: page_size.max(1),
        }
    }

    /// Drops the current records and starts over with `records`, ascending by id
    pub fn replace(&mut self, records: Vec<PokemonSummary>) {
        self.records = records;
        self.sort = Default::default();
        self.search.clear();
        self.page = 0;
        self.refresh();
    }

    /// Number of records received, ignoring the search
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records matching the search
    pub fn filtered_len(&self) -> usize {
        self.visible.len()
    }

    /// Every matching record in display order
    pub fn rows(&self) -> impl Iterator<Item = &PokemonSummary> {
        self.visible.iter().map(|&index| &self.records[index])
    }

    /// Records of the current page in display order
    pub fn page_rows(&self) -> impl Iterator<Item = &PokemonSummary> {
        self.rows().skip(self.page * self.page_size).take(self.page_size)
    }

    pub fn sort(&self) -> (SortColumn, SortDirection) {
        self.sort
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.visible.len().div_ceil(self.page_size).max(1)
    }

    /// One-based first and last row shown and the number of matching rows
    pub fn range_info(&self) -> (usize, usize, usize) {
        let total = self.visible.len();
        if total == 0 {
            return (0, 0, 0);
        }
        let start = self.page * self.page_size;
        (start + 1, (start + self.page_size).min(total), total)
    }

    /// Sorts by `column`, or flips the direction when it already is the sort column
    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort = if self.sort.0 == column {
            (column, self.sort.1.flip())
        } else {
            (column, SortDirection::Ascending)
        };
        self.refresh();
    }

    /// Keeps the rows whose name contains `query`, case-insensitive
    pub fn set_search(&mut self, query: String) {
        self.search = query;
        self.page = 0;
        self.refresh();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    pub fn paginate(&mut self, action: PaginationAction) {
        self.page = action.apply(self.page, self.page_count());
    }

    fn refresh(&mut self) {
        let query = self.search.trim().to_lowercase();
        let records = &self.records;

        self.visible = (0..records.len())
            .filter(|&index| query.is_empty() || records[index].name.to_lowercase().contains(&query))
            .collect();

        let (column, direction) = self.sort;
        self.visible.sort_by(|&a, &b| {
            let ordering = compare(&records[a], &records[b], column);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        self.page = self.page.min(self.page_count() - 1);
    }
}

/// Ties fall back to the id so the order is stable across reloads
fn compare(a: &PokemonSummary, b: &PokemonSummary, column: SortColumn) -> Ordering {
    let ordering = match column {
        SortColumn::Id => Ordering::Equal,
        SortColumn::Name => a.name.cmp(&b.name),
        SortColumn::Height => a.height.cmp(&b.height),
        SortColumn::Weight => a.weight.cmp(&b.weight),
    };
    ordering.then(a.id.cmp(&b.id))
}
