use std::collections::HashSet;

use crate::graph::{GraphScene, Point};

/// Outline colours by hop distance from the start song.
pub const DEGREE_COLORS: &[&str] = &["#ff7f0e", "#1f77b4", "#2ca02c", "#9467bd", "#8c564b"];
const UNKNOWN_DEGREE_COLOR: &str = "#7f7f7f";

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 4.0;
pub const ZOOM_STEP: f64 = 1.2;
const FIT_PADDING: f64 = 40.0;
/// Pointer travel, in screen pixels, beyond which a press counts as a drag.
const CLICK_SLOP: f64 = 4.0;

pub fn degree_color(degree: Option<u8>) -> &'static str {
	degree
		.map(|d| DEGREE_COLORS[(d as usize).min(DEGREE_COLORS.len() - 1)])
		.unwrap_or(UNKNOWN_DEGREE_COLOR)
}

/// A song box in diagram coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeBox {
	pub title: String,
	pub url: Option<String>,
	pub color: &'static str,
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl NodeBox {
	pub fn center(&self) -> Point {
		Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}

	pub fn contains(&self, gx: f64, gy: f64) -> bool {
		gx >= self.x && gx <= self.x + self.width && gy >= self.y && gy <= self.y + self.height
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeLine {
	pub source: usize,
	pub target: usize,
	pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// A mouse press that may still turn out to be a click on `node`.
#[derive(Clone, Debug, Default)]
pub struct PressState {
	pub node: Option<usize>,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub highlight_t: f64,
	pub prev_node: Option<usize>,
	pub prev_neighbors: HashSet<usize>,
	delay_t: f64,
}

pub struct CanvasState {
	pub nodes: Vec<NodeBox>,
	pub edges: Vec<EdgeLine>,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub press: PressState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
}

impl CanvasState {
	/// Canvas state for the positioned nodes of `scene`, fitted to the viewport.
	pub fn new(scene: &GraphScene, width: f64, height: f64) -> Self {
		let mut nodes = Vec::with_capacity(scene.nodes.len());
		let mut ids = Vec::with_capacity(scene.nodes.len());
		for node in &scene.nodes {
			let Some(position) = node.position else {
				continue;
			};
			nodes.push(NodeBox {
				title: node.label.title.clone(),
				url: Some(node.label.url.clone()).filter(|u| !u.is_empty()),
				color: degree_color(node.label.degree),
				x: position.x,
				y: position.y,
				width: node.width,
				height: node.height,
			});
			ids.push(node.id.as_str());
		}

		let index_of = |id: &str| ids.iter().position(|&n| n == id);
		let edges = scene
			.edges
			.iter()
			.filter_map(|edge| {
				Some(EdgeLine {
					source: index_of(&edge.source)?,
					target: index_of(&edge.target)?,
					label: edge.label.clone(),
				})
			})
			.collect();

		let mut state = Self {
			nodes,
			edges,
			transform: ViewTransform::default(),
			pan: PanState::default(),
			press: PressState::default(),
			hover: HoverState::default(),
			width,
			height,
		};
		state.fit_view();
		state
	}

	/// Scale and center the diagram so every box is visible.
	pub fn fit_view(&mut self) {
		let Some((min_x, min_y, max_x, max_y)) = self.bounds() else {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
			return;
		};
		let (bw, bh) = ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0));
		let avail_w = (self.width - 2.0 * FIT_PADDING).max(1.0);
		let avail_h = (self.height - 2.0 * FIT_PADDING).max(1.0);
		let k = (avail_w / bw).min(avail_h / bh).clamp(MIN_ZOOM, 1.0);
		let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
		self.nodes.iter().fold(None, |acc, n| {
			let (x0, y0, x1, y1) = (n.x, n.y, n.x + n.width, n.y + n.height);
			Some(match acc {
				None => (x0, y0, x1, y1),
				Some((a, b, c, d)) => (a.min(x0), b.min(y0), c.max(x1), d.max(y1)),
			})
		})
	}

	/// Zoom by `factor`, keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_by(&mut self, factor: f64, sx: f64, sy: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn zoom_in(&mut self) {
		self.zoom_by(ZOOM_STEP, self.width / 2.0, self.height / 2.0);
	}

	pub fn zoom_out(&mut self) {
		self.zoom_by(1.0 / ZOOM_STEP, self.width / 2.0, self.height / 2.0);
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.nodes.iter().rposition(|n| n.contains(gx, gy))
	}

	/// Mouse down: start panning, remembering the node under the pointer for click-through.
	pub fn press(&mut self, sx: f64, sy: f64) {
		self.press = PressState {
			node: self.node_at_position(sx, sy),
			moved: false,
		};
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	/// Mouse move: pan while pressed, otherwise track hover.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if !self.pan.active {
			let hovered = self.node_at_position(sx, sy);
			self.set_hover(hovered);
			return;
		}
		let (dx, dy) = (sx - self.pan.start_x, sy - self.pan.start_y);
		if dx.hypot(dy) > CLICK_SLOP {
			self.press.moved = true;
		}
		if self.press.moved {
			self.transform.x = self.pan.transform_start_x + dx;
			self.transform.y = self.pan.transform_start_y + dy;
		}
	}

	/// Mouse up: the URL to open when the press was a click on a linked node.
	pub fn release(&mut self, sx: f64, sy: f64) -> Option<String> {
		let press = std::mem::take(&mut self.press);
		self.pan.active = false;
		if press.moved {
			return None;
		}
		let node = press.node.filter(|&n| self.node_at_position(sx, sy) == Some(n))?;
		self.nodes[node].url.clone()
	}

	pub fn leave(&mut self) {
		self.press = PressState::default();
		self.pan.active = false;
		self.set_hover(None);
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// keep the old highlight around while it fades out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for edge in &self.edges {
				if edge.source == idx {
					self.hover.neighbors.insert(edge.target);
				} else if edge.target == idx {
					self.hover.neighbors.insert(edge.source);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: usize) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// Advance the hover easing by `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 6.0)
		} else {
			(0.0, 0.0, 4.0)
		};
		let step = ((target - self.hover.highlight_t) * speed * dt).clamp(-1.0, 1.0);

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t = (self.hover.highlight_t + step).min(1.0);
			}
		} else {
			self.hover.highlight_t = (self.hover.highlight_t + step).max(0.0);
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

/// Point where the segment from the center of a `width x height` box at `center` towards
/// `toward` leaves the box.
pub fn clip_to_box(center: Point, width: f64, height: f64, toward: Point) -> Point {
	let (dx, dy) = (toward.x - center.x, toward.y - center.y);
	if dx == 0.0 && dy == 0.0 {
		return center;
	}
	let sx = if dx == 0.0 {
		f64::INFINITY
	} else {
		(width / 2.0) / dx.abs()
	};
	let sy = if dy == 0.0 {
		f64::INFINITY
	} else {
		(height / 2.0) / dy.abs()
	};
	let s = sx.min(sy).min(1.0);
	Point::new(center.x + dx * s, center.y + dy * s)
}
