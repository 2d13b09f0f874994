//! Wire types of the graph and search endpoints.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Identifier of a song on the upstream catalogue.
pub type EntityId = u32;

/// A validated request for the neighbourhood around one song.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphRequest {
	/// Song the traversal starts from.
	pub start_id: EntityId,
	/// Maximum hop count, at least 1.
	pub degree: u8,
}

impl GraphRequest {
	/// Validate a raw route parameter. Fails before any network call is made.
	pub fn parse(raw: &str, degree: u8) -> Result<Self, GraphError> {
		Ok(Self {
			start_id: parse_start_id(raw)?,
			degree: degree.max(1),
		})
	}
}

/// Parse a start id: an integer in `0..=u32::MAX`, surrounding whitespace allowed.
pub fn parse_start_id(raw: &str) -> Result<EntityId, GraphError> {
	raw.trim()
		.parse::<EntityId>()
		.map_err(|_| GraphError::InvalidStartId {
			input: raw.to_string(),
		})
}

/// One directed relation between two positions of [`RawGraphPayload::nodes`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "(usize, usize, String)", into = "(usize, usize, String)")]
pub struct RawEdge {
	/// Local index of the source node.
	pub source: usize,
	/// Local index of the target node.
	pub target: usize,
	/// Relation tag such as `sampled_in`.
	pub relation: String,
}

impl RawEdge {
	/// Convenience constructor.
	pub fn new(source: usize, target: usize, relation: impl Into<String>) -> Self {
		Self {
			source,
			target,
			relation: relation.into(),
		}
	}
}

impl From<(usize, usize, String)> for RawEdge {
	fn from((source, target, relation): (usize, usize, String)) -> Self {
		Self {
			source,
			target,
			relation,
		}
	}
}

impl From<RawEdge> for (usize, usize, String) {
	fn from(edge: RawEdge) -> Self {
		(edge.source, edge.target, edge.relation)
	}
}

/// Metadata for one song of the neighbourhood.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SongInfo {
	/// Song id, when echoed back.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<EntityId>,
	/// "Title by Artist", preferred for display.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub full_title: Option<String>,
	/// Bare title.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Primary artist.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub artist: Option<String>,
	/// Page on the upstream catalogue.
	#[serde(default)]
	pub url: String,
	/// Cover art URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub thumbnail: Option<String>,
	/// Hops from the start song.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub degree: Option<u8>,
}

impl SongInfo {
	/// Title shown on the node: the full title if present, else "title by artist".
	pub fn display_title(&self, id: EntityId) -> String {
		display_title(
			self.full_title.as_deref(),
			self.title.as_deref(),
			self.artist.as_deref(),
			id,
		)
	}
}

fn display_title(
	full_title: Option<&str>,
	title: Option<&str>,
	artist: Option<&str>,
	id: EntityId,
) -> String {
	match (full_title, title, artist) {
		(Some(full), _, _) if !full.is_empty() => full.to_string(),
		(_, Some(title), Some(artist)) if !artist.is_empty() => format!("{title} by {artist}"),
		(_, Some(title), _) => title.to_string(),
		_ => id.to_string(),
	}
}

#[derive(Deserialize, Serialize)]
struct Topology {
	nodes: Vec<EntityId>,
	edges: Vec<RawEdge>,
}

/// Wire shape of the graph endpoint.
#[derive(Deserialize, Serialize)]
struct GraphResponse {
	graph: Topology,
	songs: HashMap<String, SongInfo>,
}

/// Neighbourhood graph as returned by the API, flattened.
///
/// Edges refer to nodes by position in `nodes`; `entities` is keyed by the stringified id.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(from = "GraphResponse", into = "GraphResponse")]
pub struct RawGraphPayload {
	/// Song ids, unique, in traversal order.
	pub nodes: Vec<EntityId>,
	/// Relations between local indices.
	pub edges: Vec<RawEdge>,
	/// Metadata keyed by stringified song id.
	pub entities: HashMap<String, SongInfo>,
}

impl From<GraphResponse> for RawGraphPayload {
	fn from(response: GraphResponse) -> Self {
		Self {
			nodes: response.graph.nodes,
			edges: response.graph.edges,
			entities: response.songs,
		}
	}
}

impl From<RawGraphPayload> for GraphResponse {
	fn from(payload: RawGraphPayload) -> Self {
		Self {
			graph: Topology {
				nodes: payload.nodes,
				edges: payload.edges,
			},
			songs: payload.entities,
		}
	}
}

/// One entry of a search response.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[allow(missing_docs)]
pub struct SearchHit {
	pub id: EntityId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub full_title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub artist: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub thumbnail: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
}

impl SearchHit {
	/// Text of the result link.
	pub fn display_title(&self) -> String {
		display_title(
			self.full_title.as_deref(),
			self.title.as_deref(),
			self.artist.as_deref(),
			self.id,
		)
	}

	/// Route of the graph page for this hit.
	pub fn graph_path(&self) -> String {
		format!("/graph/{}", self.id)
	}
}

/// Body of the search endpoint.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SearchResponse {
	/// Matches, best first.
	pub hits: Vec<SearchHit>,
}
