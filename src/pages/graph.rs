use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::{Style, Title};
use leptos_router::hooks::use_params_map;

use super::error::ErrorPage;
use super::{api_client, app_config};
use crate::components::graph_canvas::GraphCanvas;
use crate::error::Failure;
use crate::graph::{GraphPhase, GraphSession, load_scene};

/// Neighbourhood graph of the song in the `:id` route parameter.
#[component]
pub fn Graph() -> impl IntoView {
	let config = app_config();
	let params = use_params_map();
	let session = RwSignal::new(GraphSession::new());

	Effect::new(move |_| {
		let raw_id = params.with(|p| p.get("id")).unwrap_or_default();
		let Some(started) = session.try_update(|s| s.navigate(&raw_id, config.api.degree)) else {
			return;
		};
		let Some((ticket, request)) = started else {
			return;
		};

		let client = api_client(&config);
		let layout = config.layout.clone();
		spawn_local(async move {
			let outcome = load_scene(&client, request, &layout)
				.await
				.map_err(Failure::from);
			session.maybe_update(|s| s.complete(ticket, outcome));
		});
	});

	let phase = Memo::new(move |_| session.with(|s| s.phase().clone()));

	on_cleanup(move || {
		session.try_update_untracked(|s| s.abandon());
	});

	view! {
		<Title text="SampleGraph" />
		<div class="graph-page" style="width: 100%; height: 100vh;">
			{move || match phase.get() {
				GraphPhase::Ready(scene) => view! { <GraphCanvas scene=scene /> }.into_any(),
				GraphPhase::Failed(failure) => view! { <ErrorPage failure=failure /> }.into_any(),
				pending => view! { <Spinner text=pending.loading_text().unwrap_or_default() /> }
					.into_any(),
			}}
		</div>
	}
}

const SPIN_KEYFRAMES: &str = "@keyframes samplegraph-spin { to { transform: rotate(360deg); } }";

#[component]
fn Spinner(text: String) -> impl IntoView {
	view! {
		<Style>{SPIN_KEYFRAMES}</Style>
		<div
			class="spinner"
			role="status"
			style="display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 12px; height: 100%; color: #c8dcff; font-family: sans-serif;"
		>
			<div style="width: 36px; height: 36px; border: 3px solid rgba(100, 180, 255, 0.25); border-top-color: #64b4ff; border-radius: 50%; animation: samplegraph-spin 0.8s linear infinite;" />
			<span>{text}</span>
		</div>
	}
}
