//! Framework-agnostic core: payload to scene, layout and the navigation state machine.

pub mod layout;
pub mod model;
pub mod session;

pub use layout::{LayoutError, LayoutGraph};
pub use model::{
	Bounds, EdgeMarker, GraphScene, NodeLabel, Point, VisualEdge, VisualNode, build, edge_id,
	relation_label,
};
pub use session::{GraphPhase, GraphSession, RequestTracker, Ticket, load_graph, load_scene};
