// SPDX-License-Identifier: GPL-3.0

/// Identifies an action related to Pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationAction {
    First,
    Back,
    Next,
    Last,
}

impl PaginationAction {
    /// Page index reached from `current` out of `page_count` pages
    pub fn apply(self, current: usize, page_count: usize) -> usize {
        let last = page_count.saturating_sub(1);
        match self {
            PaginationAction::First => 0,
            PaginationAction::Back => current.saturating_sub(1),
            PaginationAction::Next => (current + 1).min(last),
            PaginationAction::Last => last,
        }
    }
}
