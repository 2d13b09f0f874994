//! Navigation state machine for the graph page.
//!
//! A [`GraphSession`] moves `Idle -> Loading -> Ready | Failed`. Every navigation takes a
//! fresh [`Ticket`] from a [`RequestTracker`]; outcomes carrying an older ticket belong to
//! an abandoned navigation and are dropped.

use log::{debug, info, warn};

use super::layout;
use super::model::{self, GraphScene};
use crate::api::{GraphRequest, GraphSource};
use crate::config::LayoutConfig;
use crate::error::{Failure, GraphError};

/// Generation number of one request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Hands out increasing tickets and remembers the latest one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestTracker {
	latest: u64,
}

impl RequestTracker {
	/// A tracker that has handed out nothing yet.
	pub fn new() -> Self {
		Self::default()
	}

	/// Start a new generation, making every earlier ticket stale.
	pub fn begin(&mut self) -> Ticket {
		self.latest += 1;
		Ticket(self.latest)
	}

	/// Whether `ticket` belongs to the latest generation.
	pub fn is_current(&self, ticket: Ticket) -> bool {
		ticket.0 == self.latest
	}

	/// Make every ticket handed out so far stale.
	pub fn invalidate(&mut self) {
		self.latest += 1;
	}
}

/// Where the graph page currently is.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum GraphPhase {
	/// Nothing requested yet.
	#[default]
	Idle,
	/// Waiting for the neighbourhood of `start_id`.
	Loading {
		/// Song being fetched.
		start_id: u32,
	},
	/// Laid-out scene, possibly empty.
	Ready(GraphScene),
	/// Terminal failure shown on the error page.
	Failed(Failure),
}

impl GraphPhase {
	/// `Ready` and `Failed` end a navigation.
	pub fn is_terminal(&self) -> bool {
		matches!(self, Self::Ready(_) | Self::Failed(_))
	}

	/// Text shown while a neighbourhood is on its way, `None` once the navigation ended.
	pub fn loading_text(&self) -> Option<String> {
		match self {
			Self::Idle => Some("Loading…".to_string()),
			Self::Loading { start_id } => Some(format!("Loading song {start_id}…")),
			Self::Ready(_) | Self::Failed(_) => None,
		}
	}
}

/// Phase of the graph page plus the tracker guarding it against stale responses.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphSession {
	phase: GraphPhase,
	tracker: RequestTracker,
}

impl GraphSession {
	/// An `Idle` session.
	pub fn new() -> Self {
		Self::default()
	}

	/// Current phase.
	pub fn phase(&self) -> &GraphPhase {
		&self.phase
	}

	/// Start a navigation to `raw_id`.
	///
	/// Returns the ticket and request to fetch, or `None` when the id is invalid, in which
	/// case the session is already `Failed` and nothing must be fetched.
	pub fn navigate(&mut self, raw_id: &str, degree: u8) -> Option<(Ticket, GraphRequest)> {
		let ticket = self.tracker.begin();
		match GraphRequest::parse(raw_id, degree) {
			Ok(request) => {
				info!("loading graph for {} (degree {})", request.start_id, request.degree);
				self.phase = GraphPhase::Loading {
					start_id: request.start_id,
				};
				Some((ticket, request))
			}
			Err(err) => {
				warn!("rejected start id {raw_id:?}");
				self.phase = GraphPhase::Failed(err.into());
				None
			}
		}
	}

	/// Apply the outcome of the fetch started with `ticket`.
	///
	/// Returns `false`, leaving the session untouched, when a newer navigation has started
	/// since.
	pub fn complete(&mut self, ticket: Ticket, outcome: Result<GraphScene, Failure>) -> bool {
		if !self.tracker.is_current(ticket) {
			debug!("dropping stale graph response {ticket:?}");
			return false;
		}
		self.phase = match outcome {
			Ok(scene) => {
				info!(
					"graph ready: {} nodes, {} edges",
					scene.nodes.len(),
					scene.edges.len()
				);
				GraphPhase::Ready(scene)
			}
			Err(failure) => {
				warn!("graph failed: {failure}");
				GraphPhase::Failed(failure)
			}
		};
		true
	}

	/// Abandon any in-flight fetch, e.g. when the page unmounts.
	pub fn abandon(&mut self) {
		self.tracker.invalidate();
	}
}

/// Fetch, build and lay out the neighbourhood described by `request`.
pub async fn load_scene<S: GraphSource>(
	source: &S,
	request: GraphRequest,
	layout: &LayoutConfig,
) -> Result<GraphScene, GraphError> {
	let payload = source.fetch_neighborhood(request).await?;
	let mut scene = model::build(&payload, layout)?;
	layout::apply(&mut scene, layout)?;
	Ok(scene)
}

/// Validate `raw_id` and run [`load_scene`], collapsing any error into a [`Failure`].
pub async fn load_graph<S: GraphSource>(
	source: &S,
	raw_id: &str,
	degree: u8,
	layout: &LayoutConfig,
) -> Result<GraphScene, Failure> {
	let request = GraphRequest::parse(raw_id, degree)?;
	Ok(load_scene(source, request, layout).await?)
}
