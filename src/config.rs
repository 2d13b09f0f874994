//! Runtime tunables for the API client, the layout engine and the search box.
//!
//! Every section falls back to its defaults, so a host page only has to spell out the
//! values it wants to change.

use std::time::Duration;

use serde::Deserialize;

/// Element id of the optional JSON config block in the host page.
pub const CONFIG_ELEMENT_ID: &str = "samplegraph-config";

/// Top-level configuration, provided to components through context.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// Graph and search endpoint settings.
	pub api: ApiConfig,
	/// Box sizes and spacing for the hierarchical layout.
	pub layout: LayoutConfig,
	/// Search box behaviour.
	pub search: SearchConfig,
}

impl AppConfig {
	/// Parse a (possibly partial) JSON config document.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}
}

/// Where the API lives and how far the neighbourhood reaches.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
	/// Base path or absolute URL of the API. Relative paths are resolved against the page
	/// origin.
	pub base_path: String,
	/// Hop count requested from the graph endpoint.
	pub degree: u8,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			base_path: "/api".into(),
			degree: 3,
		}
	}
}

impl ApiConfig {
	/// Absolute base URL for requests issued from a page served at `origin`.
	pub fn base_url(&self, origin: &str) -> String {
		let base = self.base_path.trim_end_matches('/');
		if base.starts_with("http://") || base.starts_with("https://") {
			base.to_string()
		} else if base.starts_with('/') {
			format!("{}{}", origin.trim_end_matches('/'), base)
		} else {
			format!("{}/{}", origin.trim_end_matches('/'), base)
		}
	}
}

/// Fixed node box and spacing used by every layout run.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Width of every node box.
	pub node_width: f64,
	/// Height of every node box.
	pub node_height: f64,
	/// Vertical gap between ranks.
	pub rank_sep: f64,
	/// Horizontal gap between neighbouring nodes in a rank.
	pub node_sep: f64,
	/// Horizontal gap reserved around edge bends.
	pub edge_sep: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			node_width: 150.0,
			node_height: 100.0,
			rank_sep: 50.0,
			node_sep: 50.0,
			edge_sep: 20.0,
		}
	}
}

/// Search box tunables.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
	/// Quiet period after the last keystroke before a search is issued.
	pub debounce_ms: u64,
	/// Queries shorter than this (after trimming) clear the results instead.
	pub min_query_len: usize,
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			debounce_ms: 200,
			min_query_len: 1,
		}
	}
}

impl SearchConfig {
	/// Debounce window as a [`Duration`].
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}
}
