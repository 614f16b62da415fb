// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashMap;
use std::time::{Duration, Instant};

use cosmic::app::context_drawer;
use cosmic::cosmic_config;
use cosmic::iced::alignment::Horizontal;
use cosmic::iced::{Alignment, Background, Border, Color, Length, Subscription, Task};
use cosmic::iced_widget::container;
use cosmic::widget::toaster::{Toast, ToastId, Toasts};
use cosmic::widget::{self, about::About, image, menu};
use cosmic::{Action, Application, ApplicationExt, Apply, Core, Element, theme};

use crate::api::{ApiError, PokeCacheApi};
use crate::config::{AppTheme, Config, PAGE_SIZES};
use crate::fl;
use crate::flags::{Flags, with_api_url_override};
use crate::image_cache::{ImageCache, download_sprites};

use app_menu::MenuAction;
use context_page::ContextPage;
use controller::{Alert, ClearCacheButton, Controller, DetailModal, Effect, ListQuery, ListStatus, Ticket};
use entities::{CacheClearResult, PokemonDetail, PokemonPage, PokemonSpecies, PokemonSummary};
use utils::presentation::{
    STAT_BAR_MAX, abilities_label, capitalize_first, capitalize_string, format_elapsed,
    format_height, format_weight, stat_bar_width, type_color,
};
use utils::{PaginationAction, SortColumn, SortDirection};

mod app_menu;
mod context_page;
mod controller;
pub mod entities;
mod utils;

const REPOSITORY: &str = "https://github.com/pokecache/pokecache-desktop";

/// Size of the sprites in the table rows
const ROW_SPRITE_SIZE: u16 = 48;
/// Size of the sprite in the details dialog
const DETAIL_SPRITE_SIZE: u16 = 150;

pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    core: Core,
    /// Display a context drawer with the designated page if defined.
    context_page: ContextPage,
    /// Contains items assigned to the About section
    about: About,
    /// Key bindings for the application's menu bar.
    key_binds: HashMap<menu::KeyBind, MenuAction>,
    /// Configuration handler, absent when the config system is unavailable
    config_handler: Option<cosmic_config::Config>,
    /// Configuration data that persists between application runs.
    config: Config,
    /// Backend URL from the environment, applied over every config update
    api_url_override: Option<String>,
    /// Client for the configured backend, or why it could not be built
    api: Result<PokeCacheApi, ApiError>,
    /// Table, status region, dialog and cache clear button state
    controller: Controller,
    /// Sprites downloaded during this session
    sprites: ImageCache,
    /// Transient notifications
    toasts: Toasts<Message>,
    /// Values being edited in the settings page
    settings_form: SettingsForm,
    theme_labels: Vec<String>,
    page_size_labels: Vec<String>,
}

/// Unsaved backend settings
#[derive(Debug, Clone, Default)]
struct SettingsForm {
    api_url: String,
    list_limit: String,
    list_offset: String,
    error: Option<String>,
}

impl SettingsForm {
    fn from_config(config: &Config) -> Self {
        Self {
            api_url: config.api_base_url.clone(),
            list_limit: config.list_limit.to_string(),
            list_offset: config.list_offset.to_string(),
            error: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    LaunchUrl(String),
    ToggleContextPage(ContextPage),
    MenuAction(MenuAction),
    UpdateConfig(Config),

    LoadList,
    ListLoaded(Ticket, Result<PokemonPage, ApiError>, Duration),
    SpritesLoaded(Vec<(String, image::Handle)>),
    SortBy(SortColumn),
    Search(String),
    Paginate(PaginationAction),

    ViewDetails(i64),
    DetailLoaded(Ticket, Result<PokemonDetail, ApiError>),
    CloseDetails,

    ClearCache,
    CacheCleared(Result<CacheClearResult, ApiError>),
    DismissAlert,
    CloseToast(ToastId),

    ThemeSelected(usize),
    PageSizeSelected(usize),
    ApiUrlInput(String),
    ListLimitInput(String),
    ListOffsetInput(String),
    ApplyBackendSettings,
}

impl Application for AppModel {
    type Executor = cosmic::executor::Default;

    type Flags = Flags;

    type Message = Message;

    const APP_ID: &'static str = "dev.pokecache.PokeCache";

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn init(core: Core, flags: Self::Flags) -> (Self, Task<Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_name(Self::APP_ID).handle())
            .version(env!("CARGO_PKG_VERSION"))
            .license(env!("CARGO_PKG_LICENSE"))
            .links([(fl!("repository"), REPOSITORY)]);

        let config = flags.config;
        let api = PokeCacheApi::new(&config.api_base_url);
        if let Err(err) = &api {
            tracing::error!("backend unusable: {err}");
        }

        let mut app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            key_binds: HashMap::new(),
            config_handler: flags.config_handler,
            api_url_override: flags.api_url_override,
            controller: Controller::new(list_query(&config), config.page_size),
            settings_form: SettingsForm::from_config(&config),
            api,
            config,
            sprites: ImageCache::default(),
            toasts: Toasts::new(Message::CloseToast),
            theme_labels: vec![fl!("dark"), fl!("light"), fl!("system")],
            page_size_labels: PAGE_SIZES.iter().map(ToString::to_string).collect(),
        };

        let effects = app.controller.initialize();
        let tasks = vec![
            app.update_title(),
            cosmic::command::set_theme(app.config.app_theme.theme()),
            app.run_effects(effects),
        ];

        (app, Task::batch(tasks))
    }

    /// Elements to pack at the start of the header bar.
    fn header_start(&self) -> Vec<Element<'_, Self::Message>> {
        let clear_cache = match self.controller.clear_cache_button() {
            ClearCacheButton::Idle => {
                menu::Item::Button(fl!("clear-cache"), None, MenuAction::ClearCache)
            }
            ClearCacheButton::Busy => {
                menu::Item::ButtonDisabled(fl!("clear-cache"), None, MenuAction::ClearCache)
            }
        };

        let menu_bar = menu::bar(vec![menu::Tree::with_children(
            menu::root(fl!("view")).apply(Element::from),
            menu::items(
                &self.key_binds,
                vec![
                    menu::Item::Button(fl!("reload"), None, MenuAction::Reload),
                    clear_cache,
                    menu::Item::Divider,
                    menu::Item::Button(fl!("settings"), None, MenuAction::Settings),
                    menu::Item::Button(fl!("about"), None, MenuAction::About),
                ],
            ),
        )]);

        vec![menu_bar.into()]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        self.context_page.display(self)
    }

    /// Blocking alerts first, then the details dialog
    fn dialog(&self) -> Option<Element<'_, Self::Message>> {
        if let Some(alert) = self.controller.alert() {
            let body = match alert {
                Alert::CacheClearRejected(message) => {
                    fl!("cache-clear-rejected", message = message.clone())
                }
                Alert::CacheClearFailed => fl!("cache-clear-failed"),
            };

            return Some(
                widget::dialog()
                    .title(fl!("error"))
                    .icon(widget::icon::from_name("dialog-error-symbolic").size(64).icon())
                    .body(body)
                    .primary_action(
                        widget::button::suggested(fl!("ok")).on_press(Message::DismissAlert),
                    )
                    .into(),
            );
        }

        let detail = self.controller.detail()?;
        let (title, content) = match detail {
            DetailModal::Loading { .. } => (fl!("loading"), self.detail_loading()),
            DetailModal::Loaded(pokemon) => {
                (capitalize_first(&pokemon.summary.name), self.pokemon_details(pokemon))
            }
            DetailModal::Failed { .. } => (fl!("error"), detail_error()),
        };

        Some(
            widget::dialog()
                .title(title)
                .control(content)
                .primary_action(
                    widget::button::standard(fl!("close")).on_press(Message::CloseDetails),
                )
                .into(),
        )
    }

    fn view(&self) -> Element<'_, Self::Message> {
        let spacing = theme::active().cosmic().spacing;

        let content = widget::column()
            .push(self.status_region())
            .push(self.toolbar())
            .push(self.table())
            .push(self.pagination())
            .spacing(spacing.space_s)
            .padding([spacing.space_none, spacing.space_s, spacing.space_s, spacing.space_s])
            .width(Length::Fill)
            .height(Length::Fill);

        widget::toaster(&self.toasts, content)
    }

    fn subscription(&self) -> Subscription<Self::Message> {
        self.core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| {
                for why in update.errors {
                    tracing::error!(?why, "app config error");
                }

                Message::UpdateConfig(update.config)
            })
    }

    fn update(&mut self, message: Self::Message) -> Task<Action<Self::Message>> {
        match message {
            Message::LaunchUrl(url) => {
                if let Err(err) = open::that_detached(&url) {
                    tracing::error!("failed to open {url:?}: {err}");
                }
            }
            Message::ToggleContextPage(context_page) => {
                if self.context_page == context_page {
                    // Close the context drawer if the toggled context page is the same.
                    self.core.window.show_context = !self.core.window.show_context;
                } else {
                    // Open the context drawer to display the requested context page.
                    self.context_page = context_page;
                    self.core.window.show_context = true;
                }

                if context_page == ContextPage::Settings {
                    self.settings_form = SettingsForm::from_config(&self.config);
                }
            }
            Message::MenuAction(action) => match action {
                MenuAction::Reload => return self.update(Message::LoadList),
                MenuAction::ClearCache => return self.update(Message::ClearCache),
                MenuAction::About => {
                    return self.update(Message::ToggleContextPage(ContextPage::About));
                }
                MenuAction::Settings => {
                    return self.update(Message::ToggleContextPage(ContextPage::Settings));
                }
            },
            Message::UpdateConfig(config) => return self.apply_config(config),

            Message::LoadList => {
                let effect = self.controller.load_list();
                return self.run_effects(vec![effect]);
            }
            Message::ListLoaded(ticket, result, elapsed) => {
                let effects = self.controller.list_loaded(ticket, result, elapsed);
                return self.run_effects(effects);
            }
            Message::SpritesLoaded(sprites) => {
                for (url, handle) in sprites {
                    self.sprites.insert(url, handle);
                }
            }
            Message::SortBy(column) => self.controller.table_mut().sort_by(column),
            Message::Search(query) => self.controller.table_mut().set_search(query),
            Message::Paginate(action) => self.controller.table_mut().paginate(action),

            Message::ViewDetails(id) => {
                let effect = self.controller.load_detail(id);
                return self.run_effects(vec![effect]);
            }
            Message::DetailLoaded(ticket, result) => {
                let effects = self.controller.detail_loaded(ticket, result);
                return self.run_effects(effects);
            }
            Message::CloseDetails => self.controller.close_detail(),

            Message::ClearCache => {
                if let Some(effect) = self.controller.clear_cache() {
                    return self.run_effects(vec![effect]);
                }
            }
            Message::CacheCleared(result) => {
                let effects = self.controller.cache_cleared(result);
                return self.run_effects(effects);
            }
            Message::DismissAlert => self.controller.dismiss_alert(),
            Message::CloseToast(id) => self.toasts.remove(id),

            Message::ThemeSelected(index) => {
                let Some(app_theme) = AppTheme::ALL.get(index).copied() else {
                    return Task::none();
                };
                match &self.config_handler {
                    Some(handler) => {
                        if let Err(err) = self.config.set_app_theme(handler, app_theme) {
                            tracing::error!("failed to save theme: {err}");
                        }
                    }
                    None => self.config.app_theme = app_theme,
                }
                return cosmic::command::set_theme(self.config.app_theme.theme());
            }
            Message::PageSizeSelected(index) => {
                let Some(page_size) = PAGE_SIZES.get(index).copied() else {
                    return Task::none();
                };
                match &self.config_handler {
                    Some(handler) => {
                        if let Err(err) = self.config.set_page_size(handler, page_size) {
                            tracing::error!("failed to save page size: {err}");
                        }
                    }
                    None => self.config.page_size = page_size,
                }
                self.controller.table_mut().set_page_size(page_size);
            }
            Message::ApiUrlInput(value) => self.settings_form.api_url = value,
            Message::ListLimitInput(value) => self.settings_form.list_limit = value,
            Message::ListOffsetInput(value) => self.settings_form.list_offset = value,
            Message::ApplyBackendSettings => return self.apply_backend_settings(),
        }
        Task::none()
    }
}

impl AppModel {
    /// Updates the header and window titles.
    pub fn update_title(&mut self) -> Task<Action<Message>> {
        let window_title = fl!("app-title");
        self.set_header_title(fl!("all-pokemon"));

        if let Some(id) = self.core.main_window_id() {
            self.set_window_title(window_title, id)
        } else {
            Task::none()
        }
    }

    /// Turns controller effects into runtime tasks
    fn run_effects(&mut self, effects: Vec<Effect>) -> Task<Action<Message>> {
        let mut tasks = Vec::with_capacity(effects.len());
        for effect in effects {
            tasks.push(self.run_effect(effect));
        }
        Task::batch(tasks)
    }

    fn run_effect(&mut self, effect: Effect) -> Task<Action<Message>> {
        match effect {
            Effect::FetchList {
                ticket,
                limit,
                offset,
            } => match &self.api {
                Ok(api) => {
                    let api = api.clone();
                    Task::perform(
                        async move {
                            let started = Instant::now();
                            let result = api.fetch_pokemon_page(limit, offset).await;
                            (result, started.elapsed())
                        },
                        move |(result, elapsed)| {
                            Action::App(Message::ListLoaded(ticket, result, elapsed))
                        },
                    )
                }
                Err(err) => Task::done(Action::App(Message::ListLoaded(
                    ticket,
                    Err(err.clone()),
                    Duration::ZERO,
                ))),
            },
            Effect::FetchDetail { ticket, id } => match &self.api {
                Ok(api) => {
                    let api = api.clone();
                    Task::perform(async move { api.fetch_pokemon(id).await }, move |result| {
                        Action::App(Message::DetailLoaded(ticket, result))
                    })
                }
                Err(err) => Task::done(Action::App(Message::DetailLoaded(ticket, Err(err.clone())))),
            },
            Effect::ClearCache => match &self.api {
                Ok(api) => {
                    let api = api.clone();
                    Task::perform(async move { api.clear_cache().await }, |result| {
                        Action::App(Message::CacheCleared(result))
                    })
                }
                Err(err) => Task::done(Action::App(Message::CacheCleared(Err(err.clone())))),
            },
            Effect::FetchSprites(urls) => {
                let missing = self.sprites.missing(urls);
                match &self.api {
                    Ok(api) if !missing.is_empty() => Task::perform(
                        download_sprites(api.http().clone(), missing),
                        |sprites| Action::App(Message::SpritesLoaded(sprites)),
                    ),
                    _ => Task::none(),
                }
            }
            Effect::NotifyCacheCleared => self
                .toasts
                .push(Toast::new(fl!("cache-cleared")))
                .map(Action::App),
        }
    }

    /// Applies a config change coming from disk or from the settings page
    fn apply_config(&mut self, config: Config) -> Task<Action<Message>> {
        let config = with_api_url_override(config, self.api_url_override.as_deref());
        if config == self.config {
            return Task::none();
        }

        let backend_changed = config.api_base_url != self.config.api_base_url
            || config.list_limit != self.config.list_limit
            || config.list_offset != self.config.list_offset;

        if config.page_size != self.controller.table().page_size() {
            self.controller.table_mut().set_page_size(config.page_size);
        }

        self.config = config;
        let mut tasks = vec![cosmic::command::set_theme(self.config.app_theme.theme())];

        if backend_changed {
            self.api = PokeCacheApi::new(&self.config.api_base_url);
            if let Err(err) = &self.api {
                tracing::error!("backend unusable: {err}");
            }
            self.controller.set_query(list_query(&self.config));
            let effect = self.controller.load_list();
            tasks.push(self.run_effects(vec![effect]));
        }

        Task::batch(tasks)
    }

    /// Validates the backend form, stores it and reloads the list
    fn apply_backend_settings(&mut self) -> Task<Action<Message>> {
        let form = &self.settings_form;
        let (Ok(list_limit), Ok(list_offset)) = (
            form.list_limit.trim().parse::<u32>(),
            form.list_offset.trim().parse::<u32>(),
        ) else {
            self.settings_form.error = Some(fl!("invalid-number"));
            return Task::none();
        };

        let api_base_url = form.api_url.trim().to_string();
        if let Err(err) = PokeCacheApi::new(&api_base_url) {
            self.settings_form.error = Some(err.to_string());
            return Task::none();
        }
        self.settings_form.error = None;

        // A backend picked in the settings page replaces the environment one.
        if self.api_url_override.take().is_some() {
            tracing::info!("backend override dropped for {api_base_url}");
        }

        let mut config = self.config.clone();
        if let Some(handler) = &self.config_handler {
            let saved = config
                .set_api_base_url(handler, api_base_url)
                .and_then(|_| config.set_list_limit(handler, list_limit))
                .and_then(|_| config.set_list_offset(handler, list_offset));
            if let Err(err) = saved {
                tracing::error!("failed to save backend settings: {err}");
            }
        } else {
            config.api_base_url = api_base_url;
            config.list_limit = list_limit;
            config.list_offset = list_offset;
        }

        self.apply_config(config)
    }

    /// Status text, request time and the error marker
    fn status_region(&self) -> Element<'_, Message> {
        let spacing = theme::active().cosmic().spacing;

        let (status, request_time, failed) = match self.controller.status() {
            ListStatus::Loading => (fl!("loading-data"), None, false),
            ListStatus::Loaded {
                from_cache,
                elapsed,
            } => {
                let status = if *from_cache {
                    fl!("loaded-from-cache")
                } else {
                    fl!("loaded-from-api")
                };
                let request_time = fl!("response-time", ms = format_elapsed(*elapsed));
                (status, Some(request_time), false)
            }
            ListStatus::Failed => (fl!("loading-error"), None, true),
        };

        let mut row = widget::row()
            .push(widget::text::body(status).width(Length::Fill))
            .spacing(spacing.space_s)
            .align_y(Alignment::Center);
        if let Some(request_time) = request_time {
            row = row.push(widget::text::caption(request_time));
        }

        let class = if failed {
            theme::Container::custom(|theme| container::Style {
                background: Some(Background::Color(theme.cosmic().destructive_color().into())),
                text_color: Some(Color::WHITE),
                ..Default::default()
            })
        } else {
            theme::Container::Card
        };

        widget::container(row)
            .padding(spacing.space_xs)
            .width(Length::Fill)
            .class(class)
            .into()
    }

    /// Search box and the cache clear trigger
    fn toolbar(&self) -> Element<'_, Message> {
        let spacing = theme::active().cosmic().spacing;

        let search = widget::search_input(fl!("search"), self.controller.table().search())
            .on_input(Message::Search)
            .on_clear(Message::Search(String::new()))
            .width(Length::Fill);

        // The busy variant has no press handler, which keeps it disabled.
        let clear_cache = match self.controller.clear_cache_button() {
            ClearCacheButton::Idle => {
                widget::button::destructive(fl!("clear-cache")).on_press(Message::ClearCache)
            }
            ClearCacheButton::Busy => widget::button::destructive(fl!("clearing-cache")),
        };

        widget::row()
            .push(search)
            .push(clear_cache)
            .spacing(spacing.space_s)
            .align_y(Alignment::Center)
            .into()
    }

    fn table(&self) -> Element<'_, Message> {
        let spacing = theme::active().cosmic().spacing;
        let condensed = self.core.is_condensed();
        let table = self.controller.table();

        if table.filtered_len() == 0 {
            let text = match self.controller.status() {
                ListStatus::Loading => fl!("loading-data"),
                _ if table.is_empty() => fl!("no-records"),
                _ => fl!("no-matches"),
            };
            return widget::text::body(text)
                .apply(widget::container)
                .width(Length::Fill)
                .height(Length::Fill)
                .align_x(Horizontal::Center)
                .into();
        }

        let rows = table.page_rows().fold(
            widget::column().spacing(spacing.space_xxs),
            |column, pokemon| column.push(self.table_row(pokemon, condensed)),
        );

        widget::column()
            .push(self.table_header(condensed))
            .push(widget::divider::horizontal::default())
            .push(widget::scrollable(rows).height(Length::Fill))
            .spacing(spacing.space_xxs)
            .height(Length::Fill)
            .into()
    }

    fn table_header(&self, condensed: bool) -> Element<'_, Message> {
        let (sort_column, sort_direction) = self.controller.table().sort();

        let sortable = |label: String, column: SortColumn, portion: u16| -> Element<'static, Message> {
            let label = if column == sort_column {
                match sort_direction {
                    SortDirection::Ascending => format!("{label} ▲"),
                    SortDirection::Descending => format!("{label} ▼"),
                }
            } else {
                label
            };

            widget::button::text(label)
                .on_press(Message::SortBy(column))
                .apply(widget::container)
                .width(Length::FillPortion(portion))
                .into()
        };
        let plain = |label: String, portion: u16| -> Element<'static, Message> {
            widget::text::heading(label)
                .apply(widget::container)
                .width(Length::FillPortion(portion))
                .into()
        };

        let mut header = widget::row()
            .push(sortable(fl!("column-id"), SortColumn::Id, 1))
            .align_y(Alignment::Center);
        if !condensed {
            header = header.push(plain(fl!("column-image"), 2));
        }
        header = header.push(sortable(fl!("column-name"), SortColumn::Name, 3));
        if !condensed {
            header = header
                .push(sortable(fl!("column-height"), SortColumn::Height, 2))
                .push(sortable(fl!("column-weight"), SortColumn::Weight, 2));
        }
        header
            .push(plain(fl!("column-types"), 3))
            .push(plain(fl!("column-actions"), 2))
            .into()
    }

    fn table_row(&self, pokemon: &PokemonSummary, condensed: bool) -> Element<'_, Message> {
        let cell = |content: Element<'static, Message>, portion: u16| -> Element<'static, Message> {
            widget::container(content)
                .width(Length::FillPortion(portion))
                .into()
        };

        let mut row = widget::row()
            .push(cell(widget::text::body(pokemon.id.to_string()).into(), 1))
            .align_y(Alignment::Center);
        if !condensed {
            row = row.push(cell(
                self.sprite(pokemon.image.as_deref(), ROW_SPRITE_SIZE),
                2,
            ));
        }
        row = row.push(cell(
            widget::text::body(capitalize_first(&pokemon.name)).into(),
            3,
        ));
        if !condensed {
            row = row
                .push(cell(widget::text::body(format_height(pokemon.height)).into(), 2))
                .push(cell(widget::text::body(format_weight(pokemon.weight)).into(), 2));
        }
        row.push(cell(type_badges(&pokemon.types), 3))
            .push(cell(
                widget::button::standard(fl!("view-details"))
                    .on_press(Message::ViewDetails(pokemon.id))
                    .into(),
                2,
            ))
            .into()
    }

    fn pagination(&self) -> Element<'_, Message> {
        let spacing = theme::active().cosmic().spacing;
        let table = self.controller.table();
        let (start, end, total) = table.range_info();
        let page = table.page();
        let last_page = table.page_count() - 1;

        let info = if table.search().trim().is_empty() {
            fl!("table-info", start = start, end = end, total = total)
        } else {
            fl!(
                "table-info-filtered",
                start = start,
                end = end,
                total = total,
                max = table.len()
            )
        };

        let nav_button = |icon: &'static str, action: PaginationAction, enabled: bool| {
            widget::button::icon(widget::icon::from_name(icon))
                .on_press_maybe(enabled.then_some(Message::Paginate(action)))
        };

        widget::row()
            .push(widget::text::caption(info).width(Length::Fill))
            .push(nav_button("go-first-symbolic", PaginationAction::First, page > 0))
            .push(nav_button("go-previous-symbolic", PaginationAction::Back, page > 0))
            .push(widget::text::body(fl!(
                "page-of",
                page = page + 1,
                pages = last_page + 1
            )))
            .push(nav_button("go-next-symbolic", PaginationAction::Next, page < last_page))
            .push(nav_button("go-last-symbolic", PaginationAction::Last, page < last_page))
            .spacing(spacing.space_xxs)
            .align_y(Alignment::Center)
            .into()
    }

    /// Downloaded sprite, or a placeholder while it is missing
    fn sprite(&self, url: Option<&str>, size: u16) -> Element<'static, Message> {
        match url.and_then(|url| self.sprites.get(url)) {
            Some(handle) => widget::image(handle.clone())
                .width(Length::Fixed(f32::from(size)))
                .height(Length::Fixed(f32::from(size)))
                .into(),
            None => widget::icon::from_name("image-missing-symbolic")
                .size(size)
                .icon()
                .into(),
        }
    }

    fn detail_loading(&self) -> Element<'_, Message> {
        let spacing = theme::active().cosmic().spacing;

        widget::row()
            .push(widget::icon::from_name("process-working-symbolic").size(24).icon())
            .push(widget::text::body(fl!("loading")))
            .spacing(spacing.space_xs)
            .align_y(Alignment::Center)
            .apply(widget::container)
            .width(Length::Fill)
            .align_x(Horizontal::Center)
            .into()
    }

    pub fn pokemon_details(&self, pokemon: &PokemonDetail) -> Element<'_, Message> {
        let spacing = theme::active().cosmic().spacing;
        let summary = &pokemon.summary;

        let portrait = widget::column()
            .push(self.sprite(summary.image.as_deref(), DETAIL_SPRITE_SIZE))
            .push(type_badges(&summary.types))
            .spacing(spacing.space_s)
            .align_x(Alignment::Center)
            .width(Length::Fill);

        let abilities = abilities_label(pokemon.abilities.as_deref())
            .unwrap_or_else(|| fl!("not-available"));

        let basic_info = widget::column()
            .push(widget::text::title4(fl!("basic-info")))
            .push(info_row(fl!("id"), summary.id.to_string()))
            .push(info_row(fl!("height"), format_height(summary.height)))
            .push(info_row(fl!("weight"), format_weight(summary.weight)))
            .push(info_row(fl!("abilities"), abilities))
            .spacing(spacing.space_xxs);

        let mut content = widget::column()
            .push(portrait)
            .push(basic_info)
            .spacing(spacing.space_m);

        if let Some(stats) = &pokemon.stats {
            let bars: Vec<Element<'_, Message>> = stats
                .iter()
                .map(|stat| {
                    widget::column()
                        .push(
                            widget::row()
                                .push(
                                    widget::text::body(capitalize_string(&stat.name))
                                        .width(Length::Fill),
                                )
                                .push(widget::text::body(stat.value.to_string())),
                        )
                        .push(cosmic::iced_widget::progress_bar(
                            0.0..=STAT_BAR_MAX,
                            stat_bar_width(stat.value),
                        ))
                        .spacing(spacing.space_xxxs)
                        .width(Length::FillPortion(1))
                        .into()
                })
                .collect();

            // Two bars per row
            let mut grid = widget::column().spacing(spacing.space_xs);
            let mut bars = bars.into_iter();
            while let Some(first) = bars.next() {
                let mut row = widget::row().push(first).spacing(spacing.space_m);
                row = match bars.next() {
                    Some(second) => row.push(second),
                    None => row.push(widget::Space::with_width(Length::FillPortion(1))),
                };
                grid = grid.push(row);
            }

            content = content.push(
                widget::column()
                    .push(widget::text::title4(fl!("stats")))
                    .push(grid)
                    .push(info_row(fl!("total"), stats.total().to_string()))
                    .spacing(spacing.space_xs),
            );
        }

        if let Some(species) = &pokemon.species {
            content = content.push(species_section(species));
        }

        widget::scrollable(content)
            .height(Length::Fixed(480.0))
            .into()
    }

    pub fn settings(&self) -> Element<'_, Message> {
        let spacing = theme::active().cosmic().spacing;

        let selected_theme = AppTheme::ALL
            .iter()
            .position(|app_theme| *app_theme == self.config.app_theme);
        let selected_page_size = PAGE_SIZES
            .iter()
            .position(|size| *size == self.config.page_size);

        let appearance = widget::settings::section()
            .title(fl!("appearance"))
            .add(widget::settings::item(
                fl!("theme"),
                widget::dropdown(&self.theme_labels, selected_theme, Message::ThemeSelected),
            ))
            .add(widget::settings::item(
                fl!("page-size"),
                widget::dropdown(
                    &self.page_size_labels,
                    selected_page_size,
                    Message::PageSizeSelected,
                ),
            ));

        let mut backend = widget::settings::section()
            .title(fl!("backend"))
            .add(widget::settings::item(
                fl!("api-url"),
                widget::text_input(crate::config::DEFAULT_API_BASE_URL, &self.settings_form.api_url)
                    .on_input(Message::ApiUrlInput)
                    .width(Length::Fixed(240.0)),
            ))
            .add(widget::settings::item(
                fl!("list-limit"),
                widget::text_input("150", &self.settings_form.list_limit)
                    .on_input(Message::ListLimitInput)
                    .width(Length::Fixed(96.0)),
            ))
            .add(widget::settings::item(
                fl!("list-offset"),
                widget::text_input("0", &self.settings_form.list_offset)
                    .on_input(Message::ListOffsetInput)
                    .width(Length::Fixed(96.0)),
            ));

        if let Some(error) = &self.settings_form.error {
            backend = backend.add(widget::text::caption(error.clone()));
        }

        backend = backend.add(
            widget::button::suggested(fl!("apply"))
                .on_press(Message::ApplyBackendSettings)
                .apply(widget::container)
                .width(Length::Fill)
                .align_x(Horizontal::Right),
        );

        widget::column()
            .push(appearance)
            .push(backend)
            .spacing(spacing.space_m)
            .into()
    }
}

fn list_query(config: &Config) -> ListQuery {
    ListQuery {
        limit: config.list_limit,
        offset: config.list_offset,
    }
}

fn info_row<'a>(label: String, value: String) -> Element<'a, Message> {
    widget::row()
        .push(widget::text::heading(label).width(Length::FillPortion(1)))
        .push(widget::text::body(value).width(Length::FillPortion(2)))
        .into()
}

fn type_badge<'a>(pokemon_type: &str) -> Element<'a, Message> {
    type_badge_labelled(pokemon_type.to_string(), pokemon_type)
}

/// One badge per type, in backend order
fn type_badges<'a>(types: &[String]) -> Element<'a, Message> {
    types
        .iter()
        .fold(widget::row().spacing(4.0), |row, pokemon_type| {
            row.push(type_badge(pokemon_type))
        })
        .into()
}

fn detail_error<'a>() -> Element<'a, Message> {
    widget::container(widget::text::body(fl!("detail-error")))
        .padding(12.0)
        .width(Length::Fill)
        .class(theme::Container::custom(|theme| container::Style {
            background: Some(Background::Color(theme.cosmic().destructive_color().into())),
            text_color: Some(Color::WHITE),
            border: Border {
                radius: 4.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }))
        .into()
}

fn species_section<'a>(species: &PokemonSpecies) -> Element<'a, Message> {
    let spacing = theme::active().cosmic().spacing;

    let habitat = species
        .habitat
        .as_deref()
        .map(capitalize_string)
        .unwrap_or_else(|| fl!("unknown"));

    let mut tags = widget::row().spacing(4.0);
    if species.is_legendary {
        tags = tags.push(type_badge_labelled(fl!("legendary"), "dragon"));
    }
    if species.is_mythical {
        tags = tags.push(type_badge_labelled(fl!("mythical"), "psychic"));
    }

    let mut section = widget::column()
        .push(widget::text::title4(fl!("species")))
        .push(info_row(fl!("generation"), species.generation().to_string()))
        .push(info_row(fl!("habitat"), habitat))
        .push(tags)
        .spacing(spacing.space_xxs);

    if let Some(flavor_text) = species.clean_flavor_text() {
        section = section.push(widget::text::body(flavor_text));
    }

    section.into()
}

/// Badge with a custom label, coloured like `color_of`
fn type_badge_labelled<'a>(label: String, color_of: &str) -> Element<'a, Message> {
    let color = type_color(color_of);

    widget::container(widget::text::caption(label))
        .padding([2.0, 8.0])
        .class(theme::Container::custom(move |_theme| container::Style {
            background: Some(Background::Color(color)),
            text_color: Some(Color::WHITE),
            border: Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }))
        .into()
}
