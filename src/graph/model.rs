//! Scene model and the payload-to-scene builder.

use crate::api::{EntityId, RawGraphPayload};
use crate::config::LayoutConfig;
use crate::error::GraphError;

/// Point in diagram coordinates, y growing downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

#[allow(missing_docs)]
impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Axis-aligned rectangle in diagram coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

#[allow(missing_docs)]
impl Bounds {
	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	pub fn center(&self) -> Point {
		Point::new(
			(self.min_x + self.max_x) / 2.0,
			(self.min_y + self.max_y) / 2.0,
		)
	}
}

/// What a node shows: the song title, linking out to its catalogue page.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeLabel {
	/// Display title, already resolved from the song metadata.
	pub title: String,
	/// Catalogue page; empty when the API did not provide one.
	pub url: String,
	/// Cover art, unused by the canvas.
	pub thumbnail: Option<String>,
	/// Hops from the start song, used for colouring.
	pub degree: Option<u8>,
}

/// A song box on the diagram.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualNode {
	/// Stringified song id.
	pub id: String,
	/// Content of the box.
	pub label: NodeLabel,
	/// Box width.
	pub width: f64,
	/// Box height.
	pub height: f64,
	/// Top-left corner. Unset until the layout has run.
	pub position: Option<Point>,
}

impl VisualNode {
	/// Middle of the box, once positioned.
	pub fn center(&self) -> Option<Point> {
		self.position
			.map(|p| Point::new(p.x + self.width / 2.0, p.y + self.height / 2.0))
	}

	/// Whether `point` falls inside the positioned box, border included.
	pub fn contains(&self, point: Point) -> bool {
		self.position.is_some_and(|p| {
			point.x >= p.x
				&& point.x <= p.x + self.width
				&& point.y >= p.y
				&& point.y <= p.y + self.height
		})
	}
}

/// Marker drawn at the target end of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeMarker {
	/// Filled triangle.
	ArrowClosed,
}

/// A relation arrow between two song boxes.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualEdge {
	/// `edge {ordinal}`; unique within one build.
	pub id: String,
	/// Id of the sampling side.
	pub source: String,
	/// Id of the sampled side.
	pub target: String,
	/// Relation tag with underscores turned into spaces.
	pub label: String,
	/// Arrowhead at the target.
	pub marker: EdgeMarker,
}

impl VisualEdge {
	/// Edges always point from source to target.
	pub fn is_directed(&self) -> bool {
		matches!(self.marker, EdgeMarker::ArrowClosed)
	}
}

/// Renderable model of one neighbourhood graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphScene {
	/// Boxes, in payload order.
	pub nodes: Vec<VisualNode>,
	/// Arrows, in payload order.
	pub edges: Vec<VisualEdge>,
}

impl GraphScene {
	/// No songs at all.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Node by stringified song id.
	pub fn node(&self, id: &str) -> Option<&VisualNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Box around every positioned node, `None` when nothing is positioned.
	pub fn bounds(&self) -> Option<Bounds> {
		self.nodes
			.iter()
			.filter_map(|n| n.position.map(|p| (p, n.width, n.height)))
			.fold(None, |acc: Option<Bounds>, (p, w, h)| {
				let b = Bounds {
					min_x: p.x,
					min_y: p.y,
					max_x: p.x + w,
					max_y: p.y + h,
				};
				Some(match acc {
					None => b,
					Some(a) => Bounds {
						min_x: a.min_x.min(b.min_x),
						min_y: a.min_y.min(b.min_y),
						max_x: a.max_x.max(b.max_x),
						max_y: a.max_y.max(b.max_y),
					},
				})
			})
	}
}

/// Human readable form of a relation tag: `sampled_in` becomes `sampled in`.
pub fn relation_label(kind: &str) -> String {
	kind.replace('_', " ")
}

/// Id of the edge at `ordinal` in the payload.
pub fn edge_id(ordinal: usize) -> String {
	format!("edge {ordinal}")
}

/// Turn a raw payload into unpositioned nodes and edges, preserving input order.
///
/// Fails with [`GraphError::MalformedPayload`] when an edge points outside `nodes` or a
/// node has no entity entry.
pub fn build(payload: &RawGraphPayload, layout: &LayoutConfig) -> Result<GraphScene, GraphError> {
	let nodes = payload
		.nodes
		.iter()
		.map(|&id| build_node(payload, id, layout))
		.collect::<Result<Vec<_>, _>>()?;

	let edges = payload
		.edges
		.iter()
		.enumerate()
		.map(|(ordinal, edge)| -> Result<VisualEdge, GraphError> {
			Ok(VisualEdge {
				id: edge_id(ordinal),
				source: local_id(payload, edge.source, ordinal)?,
				target: local_id(payload, edge.target, ordinal)?,
				label: relation_label(&edge.relation),
				marker: EdgeMarker::ArrowClosed,
			})
		})
		.collect::<Result<Vec<_>, _>>()?;

	Ok(GraphScene { nodes, edges })
}

fn build_node(
	payload: &RawGraphPayload,
	id: EntityId,
	layout: &LayoutConfig,
) -> Result<VisualNode, GraphError> {
	let key = id.to_string();
	let song = payload
		.entities
		.get(&key)
		.ok_or_else(|| GraphError::MalformedPayload(format!("no entity entry for song {key}")))?;
	Ok(VisualNode {
		label: NodeLabel {
			title: song.display_title(id),
			url: song.url.clone(),
			thumbnail: song.thumbnail.clone(),
			degree: song.degree,
		},
		id: key,
		width: layout.node_width,
		height: layout.node_height,
		position: None,
	})
}

fn local_id(payload: &RawGraphPayload, index: usize, ordinal: usize) -> Result<String, GraphError> {
	payload
		.nodes
		.get(index)
		.map(|id| id.to_string())
		.ok_or_else(|| {
			GraphError::MalformedPayload(format!(
				"edge {ordinal} references local index {index} but only {} nodes exist",
				payload.nodes.len()
			))
		})
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use proptest::prelude::*;

	use super::*;
	use crate::api::{RawEdge, SongInfo};

	fn song(title: &str) -> SongInfo {
		SongInfo {
			full_title: Some(title.into()),
			..Default::default()
		}
	}

	fn payload(nodes: &[u32], edges: &[(usize, usize, &str)]) -> RawGraphPayload {
		RawGraphPayload {
			nodes: nodes.to_vec(),
			edges: edges
				.iter()
				.map(|&(s, t, r)| RawEdge::new(s, t, r))
				.collect(),
			entities: nodes
				.iter()
				.map(|id| (id.to_string(), song(&format!("Song {id}"))))
				.collect(),
		}
	}

	#[test]
	fn two_node_scenario() {
		let mut p = payload(&[10, 20], &[(0, 1, "sampled_in")]);
		p.entities = HashMap::from([("10".into(), song("A")), ("20".into(), song("B"))]);

		let scene = build(&p, &LayoutConfig::default()).unwrap();
		let ids: Vec<_> = scene.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["10", "20"]);
		assert_eq!(scene.nodes[0].label.title, "A");
		assert_eq!(scene.nodes[1].label.title, "B");
		assert!(scene.nodes.iter().all(|n| n.position.is_none()));

		assert_eq!(scene.edges.len(), 1);
		let edge = &scene.edges[0];
		assert_eq!(edge.id, "edge 0");
		assert_eq!((edge.source.as_str(), edge.target.as_str()), ("10", "20"));
		assert_eq!(edge.label, "sampled in");
		assert!(edge.is_directed());
	}

	#[test]
	fn relation_labels() {
		assert_eq!(relation_label("sampled_in"), "sampled in");
		assert_eq!(relation_label("contains"), "contains");
		assert_eq!(relation_label("live_version_of"), "live version of");
	}

	#[test]
	fn boxes_use_configured_size() {
		let layout = LayoutConfig {
			node_width: 200.0,
			node_height: 80.0,
			..Default::default()
		};
		let scene = build(&payload(&[1, 2, 3], &[]), &layout).unwrap();
		assert!(
			scene
				.nodes
				.iter()
				.all(|n| n.width == 200.0 && n.height == 80.0)
		);
	}

	#[test]
	fn empty_payload_builds_empty_scene() {
		let scene = build(&RawGraphPayload::default(), &LayoutConfig::default()).unwrap();
		assert!(scene.is_empty());
		assert!(scene.edges.is_empty());
		assert_eq!(scene.bounds(), None);
	}

	#[test]
	fn dangling_edge_index_fails_fast() {
		let err = build(&payload(&[1], &[(0, 3, "samples")]), &LayoutConfig::default())
			.unwrap_err();
		assert!(matches!(err, GraphError::MalformedPayload(_)));
	}

	#[test]
	fn missing_entity_fails_fast() {
		let mut p = payload(&[1, 2], &[]);
		p.entities.remove("2");
		let err = build(&p, &LayoutConfig::default()).unwrap_err();
		assert!(err.to_string().contains("song 2"));
	}

	#[test]
	fn bounds_cover_positioned_nodes() {
		let mut scene = build(&payload(&[1, 2], &[]), &LayoutConfig::default()).unwrap();
		scene.nodes[0].position = Some(Point::new(0.0, 0.0));
		scene.nodes[1].position = Some(Point::new(200.0, 150.0));
		let bounds = scene.bounds().unwrap();
		assert_eq!(bounds.width(), 350.0);
		assert_eq!(bounds.height(), 250.0);
		assert!(scene.nodes[1].contains(Point::new(250.0, 200.0)));
		assert!(!scene.nodes[0].contains(Point::new(151.0, 10.0)));
	}

	fn arb_payload() -> impl Strategy<Value = RawGraphPayload> {
		prop::collection::hash_set(any::<u32>(), 0..12).prop_flat_map(|ids| {
			let nodes: Vec<u32> = ids.into_iter().collect();
			let n = nodes.len();
			let edges = if n == 0 {
				Just(Vec::new()).boxed()
			} else {
				prop::collection::vec((0..n, 0..n, "[a-z]{1,6}(_[a-z]{1,6}){0,2}"), 0..20)
					.boxed()
			};
			edges.prop_map(move |edges| {
				let refs: Vec<_> = edges
					.iter()
					.map(|(s, t, r)| (*s, *t, r.as_str()))
					.collect();
				payload(&nodes, &refs)
			})
		})
	}

	proptest! {
		#[test]
		fn build_preserves_cardinality_and_endpoints(p in arb_payload()) {
			let scene = build(&p, &LayoutConfig::default()).unwrap();
			prop_assert_eq!(scene.nodes.len(), p.nodes.len());
			prop_assert_eq!(scene.edges.len(), p.edges.len());
			let ids: Vec<String> = p.nodes.iter().map(|id| id.to_string()).collect();
			for edge in &scene.edges {
				prop_assert!(ids.contains(&edge.source));
				prop_assert!(ids.contains(&edge.target));
				prop_assert!(!edge.label.contains('_'));
			}
		}

		#[test]
		fn build_is_deterministic(p in arb_payload()) {
			let first = build(&p, &LayoutConfig::default()).unwrap();
			let second = build(&p, &LayoutConfig::default()).unwrap();
			prop_assert_eq!(first, second);
		}
	}
}
