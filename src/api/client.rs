use log::{debug, warn};
use reqwest::RequestBuilder;

use super::types::{GraphRequest, RawGraphPayload, SearchHit, SearchResponse};
use crate::error::GraphError;

/// Anything that can produce the neighbourhood graph for a request.
#[allow(async_fn_in_trait)]
pub trait GraphSource {
	/// Fetch the neighbourhood around `request.start_id`. Single shot, no retry.
	async fn fetch_neighborhood(
		&self,
		request: GraphRequest,
	) -> Result<RawGraphPayload, GraphError>;
}

/// Anything that can answer a free-text song search.
#[allow(async_fn_in_trait)]
pub trait SearchSource {
	/// Search for songs matching `query`.
	async fn search(&self, query: &str) -> Result<Vec<SearchHit>, GraphError>;
}

/// HTTP client for the graph and search endpoints.
#[derive(Clone, Debug)]
pub struct HttpClient {
	http: reqwest::Client,
	base_url: String,
}

impl HttpClient {
	/// Client rooted at an absolute API base URL such as `https://host/api`.
	pub fn new(base_url: impl Into<String>) -> Self {
		let base_url: String = base_url.into();
		Self {
			http: reqwest::Client::new(),
			base_url: base_url.trim_end_matches('/').to_string(),
		}
	}

	/// Base URL requests are issued against.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// URL of the graph endpoint for `start_id`, without the query string.
	pub fn graph_url(&self, start_id: u32) -> String {
		format!("{}/graph/{}", self.base_url, start_id)
	}

	/// URL of the search endpoint, without the query string.
	pub fn search_url(&self) -> String {
		format!("{}/search", self.base_url)
	}

	async fn send(&self, request: RequestBuilder) -> Result<String, GraphError> {
		let response = request.send().await?;
		let status = response.status().as_u16();
		let body = response.text().await?;
		check_status(status, body)
	}
}

/// Pass a success body through; turn anything else into [`GraphError::Remote`].
pub fn check_status(status: u16, body: String) -> Result<String, GraphError> {
	if (200..300).contains(&status) {
		Ok(body)
	} else {
		warn!("api responded {status}: {body}");
		Err(GraphError::Remote {
			status,
			message: body,
		})
	}
}

/// Decode a success body of the graph endpoint.
pub fn decode_graph(body: &str) -> Result<RawGraphPayload, GraphError> {
	Ok(serde_json::from_str(body)?)
}

/// Decode a success body of the search endpoint.
pub fn decode_search(body: &str) -> Result<Vec<SearchHit>, GraphError> {
	let response: SearchResponse = serde_json::from_str(body)?;
	Ok(response.hits)
}

impl GraphSource for HttpClient {
	async fn fetch_neighborhood(
		&self,
		request: GraphRequest,
	) -> Result<RawGraphPayload, GraphError> {
		let url = self.graph_url(request.start_id);
		debug!("GET {url}?degree={}", request.degree);
		let body = self
			.send(self.http.get(&url).query(&[("degree", request.degree)]))
			.await?;
		decode_graph(&body)
	}
}

impl SearchSource for HttpClient {
	async fn search(&self, query: &str) -> Result<Vec<SearchHit>, GraphError> {
		let url = self.search_url();
		debug!("GET {url}?query={query}");
		let body = self
			.send(self.http.get(&url).query(&[("query", query)]))
			.await?;
		decode_search(&body)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn urls_follow_api_layout() {
		let client = HttpClient::new("http://localhost:8080/api/");
		assert_eq!(client.base_url(), "http://localhost:8080/api");
		assert_eq!(client.graph_url(42), "http://localhost:8080/api/graph/42");
		assert_eq!(client.search_url(), "http://localhost:8080/api/search");
	}

	#[test]
	fn non_success_status_carries_body() {
		let err = check_status(404, "not found".into()).unwrap_err();
		match err {
			GraphError::Remote { status, message } => {
				assert_eq!(status, 404);
				assert_eq!(message, "not found");
			}
			other => panic!("unexpected error {other:?}"),
		}
		assert_eq!(check_status(204, String::new()).unwrap(), "");
	}

	#[test]
	fn garbage_success_body_is_malformed() {
		assert!(matches!(
			decode_graph("<html>"),
			Err(GraphError::MalformedPayload(_))
		));
		assert!(matches!(
			decode_graph(r#"{ "graph": { "nodes": [] } }"#),
			Err(GraphError::MalformedPayload(_))
		));
	}

	#[test]
	fn search_body_decodes_hits() {
		let hits = decode_search(r#"{ "hits": [{ "id": 1, "full_title": "X" }] }"#).unwrap();
		assert_eq!(hits.len(), 1);
		assert_eq!(hits[0].id, 1);
	}
}
