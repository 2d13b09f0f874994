//! Top-to-bottom hierarchical layout.
//!
//! [`LayoutGraph`] collects boxes and edges in insertion order and [`run`] hands them to the
//! dagre port in `dugong`, which ranks, orders and positions them and reports centers.
//! [`apply`] adapts those centers to the top-left positions a [`GraphScene`] carries.

use std::collections::HashMap;

use dugong::graphlib::{Graph, GraphOptions};
use dugong::{EdgeLabel, GraphLabel, NodeLabel, RankDir};
use log::debug;
use thiserror::Error;

use super::model::{GraphScene, Point};
use crate::config::LayoutConfig;

/// Failures of the layout engine.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
	/// The same node id was submitted twice.
	#[error("duplicate node {id}")]
	DuplicateNode {
		/// Offending id.
		id: String,
	},
	/// An edge endpoint was never submitted as a node.
	#[error("edge references unknown node {id}")]
	UnknownNode {
		/// Offending id.
		id: String,
	},
	/// The engine produced no position for a submitted node.
	#[error("layout produced no position for node {id}")]
	MissingPosition {
		/// Offending id.
		id: String,
	},
}

/// Directed graph of fixed-size boxes, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct LayoutGraph {
	ids: Vec<String>,
	sizes: Vec<(f64, f64)>,
	index: HashMap<String, usize>,
	edges: Vec<(usize, usize)>,
}

impl LayoutGraph {
	/// An empty graph.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a box of the given size.
	pub fn set_node(&mut self, id: &str, width: f64, height: f64) -> Result<(), LayoutError> {
		if self.index.contains_key(id) {
			return Err(LayoutError::DuplicateNode { id: id.to_string() });
		}
		self.index.insert(id.to_string(), self.ids.len());
		self.ids.push(id.to_string());
		self.sizes.push((width, height));
		Ok(())
	}

	/// Add an edge between two boxes already in the graph.
	pub fn set_edge(&mut self, source: &str, target: &str) -> Result<(), LayoutError> {
		let v = self.lookup(source)?;
		let w = self.lookup(target)?;
		self.edges.push((v, w));
		Ok(())
	}

	fn lookup(&self, id: &str) -> Result<usize, LayoutError> {
		self.index
			.get(id)
			.copied()
			.ok_or_else(|| LayoutError::UnknownNode { id: id.to_string() })
	}

	/// Number of boxes.
	pub fn node_count(&self) -> usize {
		self.ids.len()
	}

	/// Number of edges, self loops included.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	fn to_dagre(&self, config: &LayoutConfig) -> Graph<NodeLabel, EdgeLabel, GraphLabel> {
		let mut g = Graph::<NodeLabel, EdgeLabel, GraphLabel>::new(GraphOptions {
			multigraph: true,
			..Default::default()
		});
		g.set_graph(GraphLabel {
			rankdir: RankDir::TB,
			nodesep: config.node_sep,
			ranksep: config.rank_sep,
			edgesep: config.edge_sep,
			ranker: Some("longest-path".to_string()),
			..Default::default()
		});

		for (id, &(width, height)) in self.ids.iter().zip(&self.sizes) {
			g.set_node(
				id.clone(),
				NodeLabel {
					width,
					height,
					..Default::default()
				},
			);
		}
		// Self loops do not constrain placement.
		for (j, &(v, w)) in self.edges.iter().enumerate() {
			if v == w {
				continue;
			}
			g.set_edge_named(
				self.ids[v].clone(),
				self.ids[w].clone(),
				Some(format!("edge {j}")),
				Some(EdgeLabel {
					minlen: 1,
					weight: 1.0,
					..Default::default()
				}),
			);
		}
		g
	}
}

/// Lay out `graph` top to bottom and return the center of every node, keyed by id.
pub fn run(
	graph: &LayoutGraph,
	config: &LayoutConfig,
) -> Result<HashMap<String, Point>, LayoutError> {
	if graph.ids.is_empty() {
		return Ok(HashMap::new());
	}

	let mut g = graph.to_dagre(config);
	dugong::layout(&mut g);

	let centers = graph
		.ids
		.iter()
		.map(|id| {
			let center = g
				.node(id)
				.and_then(|n| Some(Point::new(n.x?, n.y?)))
				.ok_or_else(|| LayoutError::MissingPosition { id: id.clone() })?;
			Ok((id.clone(), center))
		})
		.collect::<Result<HashMap<_, _>, LayoutError>>()?;

	debug!("layout: {} nodes, {} edges", graph.node_count(), graph.edge_count());
	Ok(centers)
}

/// Position every node of `scene` by its top-left corner.
///
/// Existing positions are overwritten. An empty scene is left untouched.
pub fn apply(scene: &mut GraphScene, config: &LayoutConfig) -> Result<(), LayoutError> {
	let mut graph = LayoutGraph::new();
	for node in &scene.nodes {
		graph.set_node(&node.id, node.width, node.height)?;
	}
	for edge in &scene.edges {
		graph.set_edge(&edge.source, &edge.target)?;
	}

	let centers = run(&graph, config)?;
	for node in &mut scene.nodes {
		let center = centers
			.get(&node.id)
			.ok_or_else(|| LayoutError::MissingPosition { id: node.id.clone() })?;
		node.position = Some(Point::new(
			center.x - node.width / 2.0,
			center.y - node.height / 2.0,
		));
	}
	Ok(())
}
