//! Offline-first browser client for the MALRAD clinical protocol catalog.
//!
//! Client-side rendered Leptos app compiled to WebAssembly. The catalog is a
//! single JSON document fetched at startup; navigation lives in the URL
//! fragment so the page works from static hosting.

use leptos::prelude::*;
use tracing::warn;

mod app;
mod calc;
mod catalog;
mod config;
mod error;
mod highlight;
mod labels;
mod logging;
mod platform;
mod route;
mod screen;
mod search;
mod state;

use crate::app::App;
use crate::config::AppConfig;

fn main() {
    console_error_panic_hook::set_once();

    let (config, config_error) =
        match AppConfig::from_embedded(platform::embedded_text("app-config").as_deref()) {
            Ok(config) => (config, None),
            Err(err) => (AppConfig::default(), Some(err)),
        };
    let config = config.with_query(&platform::query_string());

    logging::init(&config.log_level);
    if let Some(err) = config_error {
        warn!(%err, "ignoring embedded app config");
    }

    if config.register_service_worker {
        platform::register_service_worker(&config.service_worker_url);
    }

    leptos::mount::mount_to_body(move || view! { <App config=config /> });
}
