// SPDX-License-Identifier: GPL-3.0-only

use cosmic::{
    cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry},
    theme,
};
use serde::{Deserialize, Serialize};

/// Backend used when nothing else is configured, the default Flask port.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";

/// Page sizes offered in the settings page, the first table load uses 25.
pub const PAGE_SIZES: &[usize] = &[10, 25, 50, 100];

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq)]
#[version = 1]
pub struct Config {
    pub app_theme: AppTheme,
    /// Root of the PokéCache backend, endpoints are resolved against it
    pub api_base_url: String,
    /// `limit` query parameter of the list request
    pub list_limit: u32,
    /// `offset` query parameter of the list request
    pub list_offset: u32,
    /// Rows shown per table page
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: Default::default(),
            api_base_url: String::from(DEFAULT_API_BASE_URL),
            list_limit: 150,
            list_offset: 0,
            page_size: 25,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum AppTheme {
    Dark,
    Light,
    #[default]
    System,
}

impl AppTheme {
    pub const ALL: &'static [Self] = &[Self::Dark, Self::Light, Self::System];

    pub fn theme(&self) -> theme::Theme {
        match self {
            Self::Dark => theme::Theme::dark(),
            Self::Light => theme::Theme::light(),
            Self::System => theme::system_preference(),
        }
    }
}

impl Config {
    /// Opens the config handler of the application, if the config system is available
    pub fn config_handler(app_id: &str) -> Option<cosmic_config::Config> {
        cosmic_config::Config::new(app_id, Self::VERSION)
            .inspect_err(|err| tracing::warn!("failed to open config handler: {err}"))
            .ok()
    }

    /// Loads the stored config, falling back to the defaults on any entry that fails
    pub fn load(handler: Option<&cosmic_config::Config>) -> Self {
        match handler {
            Some(handler) => match Self::get_entry(handler) {
                Ok(config) => config,
                Err((errors, config)) => {
                    for err in errors {
                        tracing::warn!("failed to load config entry: {err}");
                    }
                    config
                }
            },
            None => Self::default(),
        }
    }
}
