pub mod error;
pub mod graph;
pub mod home;
pub mod not_found;

use leptos::prelude::*;
use log::warn;

use crate::api::HttpClient;
use crate::config::AppConfig;

/// Configuration provided by [`App`](crate::App), or the defaults.
pub(crate) fn app_config() -> AppConfig {
	use_context::<AppConfig>().unwrap_or_default()
}

/// Client for the configured API, resolved against the page origin.
pub(crate) fn api_client(config: &AppConfig) -> HttpClient {
	let origin = web_sys::window()
		.and_then(|w| w.location().origin().ok())
		.unwrap_or_else(|| {
			warn!("page origin unavailable, using relative API path");
			String::new()
		});
	HttpClient::new(config.api.base_url(&origin))
}
