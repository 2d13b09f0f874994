//! Boundary with the graph and search endpoints.

mod client;
mod types;

pub use client::{
	GraphSource, HttpClient, SearchSource, check_status, decode_graph, decode_search,
};
pub use types::{
	EntityId, GraphRequest, RawEdge, RawGraphPayload, SearchHit, SearchResponse, SongInfo,
	parse_start_id,
};
