//! SampleGraph: explore how songs sample each other.
//!
//! The core ([`api`], [`graph`], [`search`]) fetches a song's neighbourhood, turns it into
//! a scene of boxes and arrows and lays it out top to bottom. The Leptos app on top renders
//! the landing search and the graph canvas.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

pub mod api;
pub mod config;
pub mod error;
pub mod graph;
pub mod search;

// Modules
mod components;
mod pages;

// Top-Level pages
use crate::config::{AppConfig, CONFIG_ELEMENT_ID};
use crate::pages::graph::Graph;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Read overrides from the host page's config block; defaults when absent or invalid.
fn load_config() -> AppConfig {
	let Some(text) = config_text() else {
		return AppConfig::default();
	};
	match AppConfig::from_json(&text) {
		Ok(config) => {
			info!("loaded config from #{CONFIG_ELEMENT_ID}");
			config
		}
		Err(e) => {
			warn!("failed to parse #{CONFIG_ELEMENT_ID}, using defaults: {e}");
			AppConfig::default()
		}
	}
}

fn config_text() -> Option<String> {
	let document = web_sys::window()?.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// An app router which renders the landing page, the graph page and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_context(load_config());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="SampleGraph" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<main>
				<Routes fallback=|| view! { <NotFound /> }>
					<Route path=path!("/") view=Home />
					<Route path=path!("/graph/:id") view=Graph />
				</Routes>
			</main>
		</Router>
	}
}
