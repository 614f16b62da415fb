// SPDX-License-Identifier: GPL-3.0-only

use tracing_subscriber::EnvFilter;

mod api;
mod app;
mod config;
mod flags;
mod i18n;
mod image_cache;

fn main() -> cosmic::iced::Result {
    // Logs go to stderr, `RUST_LOG` overrides the default filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pokecache=info")),
        )
        .init();

    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    // Settings for configuring the application window and iced runtime.
    let settings = cosmic::app::Settings::default()
        .size_limits(cosmic::iced::Limits::NONE.min_width(360.0).min_height(300.0))
        .size(cosmic::iced::Size::new(1200.0, 800.0));

    // Starts the application's event loop with the stored configuration as flags.
    cosmic::app::run::<app::AppModel>(settings, flags::flags())
}
