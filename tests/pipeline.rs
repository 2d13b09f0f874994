//! End-to-end scenarios for the graph page core, driven by an in-memory source.

use std::cell::RefCell;
use std::collections::HashMap;

use futures::executor::block_on;
use proptest::prelude::*;
use samplegraph::api::{GraphRequest, GraphSource, RawEdge, RawGraphPayload, SongInfo};
use samplegraph::config::{AppConfig, LayoutConfig};
use samplegraph::error::{Failure, GraphError, INVALID_START_ID};
use samplegraph::graph::{GraphPhase, GraphScene, GraphSession, load_graph, load_scene};

/// Answers from a canned table and records every request it sees.
#[derive(Default)]
struct TableSource {
	graphs: HashMap<u32, RawGraphPayload>,
	requests: RefCell<Vec<GraphRequest>>,
}

impl GraphSource for TableSource {
	async fn fetch_neighborhood(
		&self,
		request: GraphRequest,
	) -> Result<RawGraphPayload, GraphError> {
		self.requests.borrow_mut().push(request);
		self.graphs
			.get(&request.start_id)
			.cloned()
			.ok_or_else(|| GraphError::Remote {
				status: 404,
				message: "not found".into(),
			})
	}
}

fn song(title: &str, url: &str, degree: u8) -> SongInfo {
	SongInfo {
		full_title: Some(title.into()),
		url: url.into(),
		degree: Some(degree),
		..Default::default()
	}
}

fn source() -> TableSource {
	let mut graphs = HashMap::new();
	graphs.insert(
		10,
		RawGraphPayload {
			nodes: vec![10, 20],
			edges: vec![RawEdge::new(0, 1, "sampled_in")],
			entities: HashMap::from([
				("10".into(), song("A", "https://example.com/10", 0)),
				("20".into(), song("B", "https://example.com/20", 1)),
			]),
		},
	);
	graphs.insert(0, RawGraphPayload::default());
	graphs.insert(
		5,
		RawGraphPayload {
			nodes: vec![5],
			edges: vec![RawEdge::new(0, 4, "samples")],
			entities: HashMap::from([("5".into(), song("E", "", 0))]),
		},
	);
	TableSource {
		graphs,
		..Default::default()
	}
}

fn visit(session: &mut GraphSession, source: &TableSource, raw_id: &str) {
	let config = AppConfig::default();
	if let Some((ticket, request)) = session.navigate(raw_id, config.api.degree) {
		let outcome = block_on(load_scene(source, request, &config.layout)).map_err(Failure::from);
		session.complete(ticket, outcome);
	}
}

#[test]
fn two_songs_render_as_two_boxes_and_one_arrow() {
	let source = source();
	let mut session = GraphSession::new();
	visit(&mut session, &source, "10");

	let GraphPhase::Ready(scene) = session.phase() else {
		panic!("expected Ready, got {:?}", session.phase());
	};
	let ids: Vec<_> = scene.nodes.iter().map(|n| n.id.as_str()).collect();
	assert_eq!(ids, ["10", "20"]);
	assert_eq!(scene.nodes[0].label.title, "A");
	assert_eq!(scene.nodes[1].label.url, "https://example.com/20");
	assert_eq!(scene.edges.len(), 1);
	assert_eq!(scene.edges[0].source, "10");
	assert_eq!(scene.edges[0].target, "20");
	assert_eq!(scene.edges[0].label, "sampled in");

	let a = scene.nodes[0].position.unwrap();
	let b = scene.nodes[1].position.unwrap();
	assert_eq!(a.x, b.x);
	assert!(a.y < b.y);
	assert_eq!(
		source.requests.borrow().as_slice(),
		[GraphRequest {
			start_id: 10,
			degree: 3
		}]
	);
}

#[test]
fn missing_song_shows_the_remote_message() {
	let source = source();
	let mut session = GraphSession::new();
	visit(&mut session, &source, "404");
	let GraphPhase::Failed(failure) = session.phase() else {
		panic!("expected Failed, got {:?}", session.phase());
	};
	assert_eq!(failure.message, "not found");
	assert_eq!(failure.to_string(), "404 not found");
}

#[test]
fn negative_id_fails_without_a_request() {
	let source = source();
	let mut session = GraphSession::new();
	visit(&mut session, &source, "-1");
	assert_eq!(
		session.phase(),
		&GraphPhase::Failed(Failure::new(INVALID_START_ID))
	);
	assert!(source.requests.borrow().is_empty());
}

#[test]
fn empty_neighbourhood_is_ready_and_empty() {
	let source = source();
	let mut session = GraphSession::new();
	visit(&mut session, &source, "0");
	assert_eq!(session.phase(), &GraphPhase::Ready(GraphScene::default()));
}

#[test]
fn dangling_edge_fails_the_whole_page() {
	let source = source();
	let failure = block_on(load_graph(&source, "5", 3, &LayoutConfig::default())).unwrap_err();
	assert_eq!(failure.status, None);
	assert!(failure.message.starts_with("malformed graph payload"));
}

#[test]
fn navigating_away_discards_the_earlier_response() {
	let source = source();
	let layout = LayoutConfig::default();
	let mut session = GraphSession::new();

	let (slow, slow_request) = session.navigate("10", 3).unwrap();
	let (fast, fast_request) = session.navigate("0", 3).unwrap();

	let fast_outcome = block_on(load_scene(&source, fast_request, &layout)).map_err(Failure::from);
	assert!(session.complete(fast, fast_outcome));
	let slow_outcome = block_on(load_scene(&source, slow_request, &layout)).map_err(Failure::from);
	assert!(!session.complete(slow, slow_outcome));

	assert_eq!(session.phase(), &GraphPhase::Ready(GraphScene::default()));
}

proptest! {
	#[test]
	fn out_of_range_ids_never_reach_the_source(id in prop_oneof![
		i64::MIN..0i64,
		(u32::MAX as i64 + 1)..i64::MAX,
	]) {
		let source = source();
		let mut session = GraphSession::new();
		visit(&mut session, &source, &id.to_string());
		prop_assert!(source.requests.borrow().is_empty());
		prop_assert_eq!(session.phase(), &GraphPhase::Failed(Failure::new(INVALID_START_ID)));
	}
}
