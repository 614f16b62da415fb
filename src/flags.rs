// SPDX-License-Identifier: GPL-3.0-only

use cosmic::cosmic_config;

use crate::{app::AppModel, config::Config};

/// Environment variable that overrides the configured backend URL for one session
pub const API_URL_ENV: &str = "POKECACHE_API_URL";

/// Flags given to our COSMIC application to use in it's "init" function.
#[derive(Clone, Debug)]
pub struct Flags {
    pub config_handler: Option<cosmic_config::Config>,
    /// Stored config with the session override already applied
    pub config: Config,
    /// Backend URL from the environment, wins over the stored one for this session
    pub api_url_override: Option<String>,
}

pub fn flags() -> Flags {
    let config_handler = Config::config_handler(<AppModel as cosmic::Application>::APP_ID);
    let api_url_override = api_url_override(std::env::var(API_URL_ENV).ok());

    if let Some(url) = &api_url_override {
        tracing::info!("using backend from {API_URL_ENV}: {url}");
    }

    Flags {
        config: with_api_url_override(
            Config::load(config_handler.as_ref()),
            api_url_override.as_deref(),
        ),
        config_handler,
        api_url_override,
    }
}

/// Replaces the backend URL of a config read from disk with the session override
pub fn with_api_url_override(mut config: Config, api_url_override: Option<&str>) -> Config {
    if let Some(url) = api_url_override {
        config.api_base_url = url.to_string();
    }
    config
}

/// Returns the override value when it is set to something other than blanks
fn api_url_override(value: Option<String>) -> Option<String> {
    value
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_override_is_ignored() {
        assert_eq!(api_url_override(None), None);
        assert_eq!(api_url_override(Some(String::from("   "))), None);
    }

    #[test]
    fn stored_config_keeps_the_session_backend() {
        // What the config watcher hands back after the theme was saved
        let stored = Config {
            app_theme: crate::config::AppTheme::Light,
            ..Config::default()
        };

        let config = with_api_url_override(stored, Some("http://pokecache.local:8080"));

        assert_eq!(config.api_base_url, "http://pokecache.local:8080");
        assert_eq!(config.app_theme, crate::config::AppTheme::Light);
        assert_eq!(config.list_limit, 150);
    }

    #[test]
    fn stored_backend_is_used_without_override() {
        let stored = Config {
            api_base_url: String::from("http://10.0.0.2:5000"),
            ..Config::default()
        };

        let config = with_api_url_override(stored, None);

        assert_eq!(config.api_base_url, "http://10.0.0.2:5000");
    }

    #[test]
    fn override_is_trimmed() {
        assert_eq!(
            api_url_override(Some(String::from(" http://pokecache.local:8080 "))),
            Some(String::from("http://pokecache.local:8080"))
        );
    }
}
