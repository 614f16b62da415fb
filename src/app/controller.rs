// SPDX-License-Identifier: GPL-3.0-only

//! State of the main page and the rules that move it forward.
//!
//! The controller never performs a request itself. Every operation returns the
//! [`Effect`]s the application has to run, and the outcome of each effect comes
//! back through one of the `*_loaded`/`*_finished` methods.

use std::time::Duration;

use crate::api::ApiError;
use crate::app::entities::{CacheClearResult, PokemonDetail, PokemonPage, PokemonSummary};
use crate::app::utils::PokemonTable;

/// Number handed out to a request, only the latest one per operation is accepted
pub type Ticket = u64;

/// Work the application has to carry out on behalf of the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchList {
        ticket: Ticket,
        limit: u32,
        offset: u32,
    },
    FetchDetail {
        ticket: Ticket,
        id: i64,
    },
    ClearCache,
    /// Sprite URLs the dialog or the table is about to show
    FetchSprites(Vec<String>),
    /// Transient success notification
    NotifyCacheCleared,
}

/// Status region above the table
#[derive(Debug, Clone, PartialEq)]
pub enum ListStatus {
    Loading,
    Loaded {
        from_cache: bool,
        elapsed: Duration,
    },
    Failed,
}

/// Contents of the details dialog
#[derive(Debug, Clone, PartialEq)]
pub enum DetailModal {
    Loading { id: i64 },
    Loaded(Box<PokemonDetail>),
    Failed { id: i64 },
}

/// State of the cache clear button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClearCacheButton {
    #[default]
    Idle,
    /// Disabled, showing the busy label
    Busy,
}

/// Blocking notices the user has to dismiss
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// The backend answered but refused, carries its message
    CacheClearRejected(String),
    /// The request itself failed
    CacheClearFailed,
}

/// Query of the list request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: 150,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Controller {
    query: ListQuery,
    table: PokemonTable,
    status: ListStatus,
    detail: Option<DetailModal>,
    clear_cache: ClearCacheButton,
    alert: Option<Alert>,
    list_ticket: Ticket,
    detail_ticket: Ticket,
}

impl Controller {
    pub fn new(query: ListQuery, page_size: usize) -> Self {
        Self {
            query,
            table: PokemonTable::new(page_size),
            status: ListStatus::Loading,
            detail: None,
            clear_cache: ClearCacheButton::Idle,
            alert: None,
            list_ticket: 0,
            detail_ticket: 0,
        }
    }

    pub fn table(&self) -> &PokemonTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut PokemonTable {
        &mut self.table
    }

    pub fn status(&self) -> &ListStatus {
        &self.status
    }

    pub fn detail(&self) -> Option<&DetailModal> {
        self.detail.as_ref()
    }

    pub fn clear_cache_button(&self) -> ClearCacheButton {
        self.clear_cache
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn set_query(&mut self, query: ListQuery) {
        self.query = query;
    }

    /// Runs once the window exists: the first list load
    pub fn initialize(&mut self) -> Vec<Effect> {
        tracing::debug!("initializing controller");
        vec![self.load_list()]
    }

    /// Starts a list load, any list response still in flight becomes stale
    pub fn load_list(&mut self) -> Effect {
        self.list_ticket += 1;
        self.status = ListStatus::Loading;

        Effect::FetchList {
            ticket: self.list_ticket,
            limit: self.query.limit,
            offset: self.query.offset,
        }
    }

    pub fn list_loaded(
        &mut self,
        ticket: Ticket,
        result: Result<PokemonPage, ApiError>,
        elapsed: Duration,
    ) -> Vec<Effect> {
        if ticket != self.list_ticket {
            tracing::debug!("discarding stale list response {ticket}, latest is {}", self.list_ticket);
            return Vec::new();
        }

        match result {
            Ok(page) => {
                tracing::info!(
                    "loaded {} Pokémon {} in {:?}",
                    page.results.len(),
                    if page.from_cache { "from the cache" } else { "from the API" },
                    elapsed
                );
                let sprites = page.image_urls();
                self.status = ListStatus::Loaded {
                    from_cache: page.from_cache,
                    elapsed,
                };
                self.render_list(page.results);

                if sprites.is_empty() {
                    Vec::new()
                } else {
                    vec![Effect::FetchSprites(sprites)]
                }
            }
            Err(err) => {
                tracing::error!("Error loading the Pokémon list: {err}");
                self.status = ListStatus::Failed;
                Vec::new()
            }
        }
    }

    /// Replaces the table wholesale with `records`
    pub fn render_list(&mut self, records: Vec<PokemonSummary>) {
        self.table.replace(records);
    }

    /// Opens the dialog in its loading state and asks for the record
    pub fn load_detail(&mut self, id: i64) -> Effect {
        self.detail_ticket += 1;
        self.detail = Some(DetailModal::Loading { id });

        Effect::FetchDetail {
            ticket: self.detail_ticket,
            id,
        }
    }

    pub fn detail_loaded(
        &mut self,
        ticket: Ticket,
        result: Result<PokemonDetail, ApiError>,
    ) -> Vec<Effect> {
        if ticket != self.detail_ticket || self.detail.is_none() {
            tracing::debug!("discarding detail response {ticket}");
            return Vec::new();
        }

        match result {
            Ok(detail) => {
                let sprites: Vec<String> = detail.summary.image.iter().cloned().collect();
                self.detail = Some(DetailModal::Loaded(Box::new(detail)));

                if sprites.is_empty() {
                    Vec::new()
                } else {
                    vec![Effect::FetchSprites(sprites)]
                }
            }
            Err(err) => {
                let id = match &self.detail {
                    Some(DetailModal::Loading { id }) | Some(DetailModal::Failed { id }) => *id,
                    Some(DetailModal::Loaded(detail)) => detail.summary.id,
                    None => 0,
                };
                tracing::error!("Error loading the details of Pokémon {id}: {err}");
                self.detail = Some(DetailModal::Failed { id });
                Vec::new()
            }
        }
    }

    /// Closes the dialog, a response still in flight will be ignored
    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Disables the button and asks for a cache clear, unless one is already running
    pub fn clear_cache(&mut self) -> Option<Effect> {
        if self.clear_cache == ClearCacheButton::Busy {
            tracing::debug!("cache clear already running");
            return None;
        }

        self.clear_cache = ClearCacheButton::Busy;
        Some(Effect::ClearCache)
    }

    pub fn cache_cleared(&mut self, result: Result<CacheClearResult, ApiError>) -> Vec<Effect> {
        self.clear_cache = ClearCacheButton::Idle;

        match result {
            Ok(result) if result.is_success() => {
                tracing::info!(
                    "backend cache cleared, {} keys deleted",
                    result.keys_deleted.unwrap_or_default()
                );
                vec![Effect::NotifyCacheCleared, self.load_list()]
            }
            Ok(result) => {
                tracing::error!("Error clearing the cache: {}", result.message());
                self.alert = Some(Alert::CacheClearRejected(result.message().to_string()));
                Vec::new()
            }
            Err(err) => {
                tracing::error!("Error clearing the cache: {err}");
                self.alert = Some(Alert::CacheClearFailed);
                Vec::new()
            }
        }
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pokemon(id: i64, name: &str) -> PokemonSummary {
        PokemonSummary {
            id,
            name: name.to_string(),
            image: Some(format!("https://img.example/{id}.png")),
            height: 7,
            weight: 69,
            types: vec![String::from("grass")],
        }
    }

    fn page(records: Vec<PokemonSummary>, from_cache: bool) -> PokemonPage {
        PokemonPage {
            results: records,
            from_cache,
            count: None,
            next: None,
            previous: None,
        }
    }

    fn detail(id: i64, name: &str) -> PokemonDetail {
        PokemonDetail {
            summary: pokemon(id, name),
            abilities: None,
            stats: None,
            species: None,
        }
    }

    fn server_error() -> ApiError {
        ApiError::Status {
            status: 500,
            message: String::from("Internal Server Error"),
        }
    }

    fn list_ticket(effect: &Effect) -> Ticket {
        match effect {
            Effect::FetchList { ticket, .. } => *ticket,
            other => panic!("expected a list fetch, got {other:?}"),
        }
    }

    fn detail_ticket(effect: &Effect) -> Ticket {
        match effect {
            Effect::FetchDetail { ticket, .. } => *ticket,
            other => panic!("expected a detail fetch, got {other:?}"),
        }
    }

    #[test]
    fn initialize_requests_the_first_page() {
        let mut controller = Controller::new(ListQuery::default(), 25);

        let effects = controller.initialize();

        assert_eq!(
            effects,
            vec![Effect::FetchList {
                ticket: 1,
                limit: 150,
                offset: 0
            }]
        );
        assert_eq!(controller.status(), &ListStatus::Loading);
    }

    #[test]
    fn loaded_list_fills_the_table_and_the_status() {
        let mut controller = Controller::new(ListQuery::default(), 25);
        let ticket = list_ticket(&controller.load_list());
        let records: Vec<_> = (1..=30).rev().map(|id| pokemon(id, "bulbasaur")).collect();

        let effects = controller.list_loaded(
            ticket,
            Ok(page(records, true)),
            Duration::from_millis(12),
        );

        assert_eq!(controller.table().len(), 30);
        assert_eq!(controller.table().rows().next().map(|row| row.id), Some(1));
        assert_eq!(
            controller.status(),
            &ListStatus::Loaded {
                from_cache: true,
                elapsed: Duration::from_millis(12)
            }
        );
        assert!(matches!(&effects[..], [Effect::FetchSprites(urls)] if urls.len() == 30));
    }

    #[test]
    fn failed_list_marks_the_status() {
        let mut controller = Controller::new(ListQuery::default(), 25);
        let ticket = list_ticket(&controller.load_list());

        let effects = controller.list_loaded(ticket, Err(server_error()), Duration::ZERO);

        assert!(effects.is_empty());
        assert_eq!(controller.status(), &ListStatus::Failed);
    }

    #[test]
    fn stale_list_response_is_discarded() {
        let mut controller = Controller::new(ListQuery::default(), 25);
        let first = list_ticket(&controller.load_list());
        let second = list_ticket(&controller.load_list());

        controller.list_loaded(
            second,
            Ok(page(vec![pokemon(1, "bulbasaur")], false)),
            Duration::ZERO,
        );
        let effects = controller.list_loaded(
            first,
            Ok(page(vec![pokemon(4, "charmander"), pokemon(7, "squirtle")], true)),
            Duration::ZERO,
        );

        assert!(effects.is_empty());
        assert_eq!(controller.table().len(), 1);
        assert!(matches!(
            controller.status(),
            ListStatus::Loaded {
                from_cache: false,
                ..
            }
        ));
    }

    #[test]
    fn detail_load_issues_one_request_per_click() {
        let mut controller = Controller::new(ListQuery::default(), 25);

        let effect = controller.load_detail(25);

        assert_eq!(effect, Effect::FetchDetail { ticket: 1, id: 25 });
        assert_eq!(controller.detail(), Some(&DetailModal::Loading { id: 25 }));
    }

    #[test]
    fn loaded_detail_replaces_the_spinner() {
        let mut controller = Controller::new(ListQuery::default(), 25);
        let ticket = detail_ticket(&controller.load_detail(25));

        let effects = controller.detail_loaded(ticket, Ok(detail(25, "pikachu")));

        assert!(matches!(
            controller.detail(),
            Some(DetailModal::Loaded(detail)) if detail.summary.name == "pikachu"
        ));
        assert_eq!(
            effects,
            vec![Effect::FetchSprites(vec![String::from(
                "https://img.example/25.png"
            )])]
        );
    }

    #[test]
    fn failed_detail_shows_the_inline_error() {
        let mut controller = Controller::new(ListQuery::default(), 25);
        let ticket = detail_ticket(&controller.load_detail(25));

        controller.detail_loaded(ticket, Err(server_error()));

        assert_eq!(controller.detail(), Some(&DetailModal::Failed { id: 25 }));
    }

    #[test]
    fn latest_detail_click_wins() {
        let mut controller = Controller::new(ListQuery::default(), 25);
        let first = detail_ticket(&controller.load_detail(1));
        let second = detail_ticket(&controller.load_detail(4));

        controller.detail_loaded(second, Ok(detail(4, "charmander")));
        controller.detail_loaded(first, Ok(detail(1, "bulbasaur")));

        assert!(matches!(
            controller.detail(),
            Some(DetailModal::Loaded(detail)) if detail.summary.id == 4
        ));
    }

    #[test]
    fn response_after_closing_is_ignored() {
        let mut controller = Controller::new(ListQuery::default(), 25);
        let ticket = detail_ticket(&controller.load_detail(25));

        controller.close_detail();
        controller.detail_loaded(ticket, Ok(detail(25, "pikachu")));

        assert_eq!(controller.detail(), None);
    }

    #[test]
    fn second_cache_clear_click_is_ignored_while_busy() {
        let mut controller = Controller::new(ListQuery::default(), 25);

        assert_eq!(controller.clear_cache(), Some(Effect::ClearCache));
        assert_eq!(controller.clear_cache_button(), ClearCacheButton::Busy);
        assert_eq!(controller.clear_cache(), None);
    }

    #[test]
    fn successful_cache_clear_reloads_once() {
        let mut controller = Controller::new(ListQuery::default(), 25);
        controller.initialize();
        controller.clear_cache();

        let effects = controller.cache_cleared(Ok(CacheClearResult {
            status: String::from("success"),
            message: None,
            keys_deleted: Some(151),
        }));

        assert_eq!(controller.clear_cache_button(), ClearCacheButton::Idle);
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[0], Effect::NotifyCacheCleared);
        assert_eq!(list_ticket(&effects[1]), 2);
        assert_eq!(
            effects
                .iter()
                .filter(|effect| matches!(effect, Effect::FetchList { .. }))
                .count(),
            1
        );
        assert_eq!(controller.alert(), None);
    }

    #[test]
    fn rejected_cache_clear_shows_the_server_message() {
        let mut controller = Controller::new(ListQuery::default(), 25);
        controller.clear_cache();

        let effects = controller.cache_cleared(Ok(CacheClearResult {
            status: String::from("error"),
            message: Some(String::from("Redis is not available")),
            keys_deleted: None,
        }));

        assert!(effects.is_empty());
        assert_eq!(controller.clear_cache_button(), ClearCacheButton::Idle);
        assert_eq!(
            controller.alert(),
            Some(&Alert::CacheClearRejected(String::from(
                "Redis is not available"
            )))
        );

        controller.dismiss_alert();
        assert_eq!(controller.alert(), None);
    }

    #[test]
    fn failed_cache_clear_shows_a_generic_alert() {
        let mut controller = Controller::new(ListQuery::default(), 25);
        controller.clear_cache();

        let effects = controller.cache_cleared(Err(server_error()));

        assert!(effects.is_empty());
        assert_eq!(controller.clear_cache_button(), ClearCacheButton::Idle);
        assert_eq!(controller.alert(), Some(&Alert::CacheClearFailed));
    }

    #[test]
    fn cache_outage_shows_the_generic_alert() {
        let mut controller = Controller::new(ListQuery::default(), 25);
        controller.clear_cache();

        let effects = controller.cache_cleared(Err(ApiError::Status {
            status: 500,
            message: String::from("Redis is not available"),
        }));

        assert!(effects.is_empty());
        assert_eq!(controller.clear_cache_button(), ClearCacheButton::Idle);
        assert_eq!(controller.alert(), Some(&Alert::CacheClearFailed));
    }

    #[test]
    fn list_query_follows_the_configuration() {
        let mut controller = Controller::new(ListQuery::default(), 25);
        controller.set_query(ListQuery {
            limit: 20,
            offset: 40,
        });

        assert_eq!(
            controller.load_list(),
            Effect::FetchList {
                ticket: 1,
                limit: 20,
                offset: 40
            }
        );
    }
}
