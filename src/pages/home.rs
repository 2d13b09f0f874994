use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use log::{debug, warn};
use wasm_bindgen::prelude::*;

use super::{api_client, app_config};
use crate::api::{SearchHit, SearchSource};
use crate::search::{Debouncer, normalize_query};

fn clear_timer(timer: StoredValue<Option<i32>>) {
	if let Some(handle) = timer.get_value() {
		if let Some(window) = web_sys::window() {
			window.clear_timeout_with_handle(handle);
		}
		timer.set_value(None);
	}
}

/// Search box whose results link to the graph page.
#[component]
fn Search() -> impl IntoView {
	let config = app_config();
	let min_len = config.search.min_query_len;
	let debouncer = RwSignal::new(Debouncer::from_config(&config.search));
	let timer = StoredValue::new(None::<i32>);
	let hits = RwSignal::new(Vec::<SearchHit>::new());
	let error = RwSignal::new(None::<String>);
	let loading = RwSignal::new(false);

	let on_input = move |ev: leptos::ev::Event| {
		let raw = event_target_value(&ev);
		clear_timer(timer);

		let Some(query) = normalize_query(&raw, min_len).map(str::to_string) else {
			debouncer.update(|d| d.cancel());
			hits.set(Vec::new());
			error.set(None);
			loading.set(false);
			return;
		};
		let Some(ticket) = debouncer.try_update(|d| d.schedule()) else {
			return;
		};
		let delay = debouncer.with_untracked(|d| d.delay());

		let config = config.clone();
		let fire = move || {
			if !debouncer.try_update(|d| d.should_fire(ticket)).unwrap_or(false) {
				return;
			}
			timer.set_value(None);
			loading.set(true);
			let client = api_client(&config);
			spawn_local(async move {
				let result = client.search(&query).await;
				if !debouncer
					.try_with_untracked(|d| d.is_current(ticket))
					.unwrap_or(false)
				{
					debug!("dropping stale search results for {query:?}");
					return;
				}
				loading.set(false);
				match result {
					Ok(found) => {
						debug!("{} hits for {query:?}", found.len());
						error.set(None);
						hits.set(found);
					}
					Err(err) => {
						warn!("search for {query:?} failed: {err}");
						hits.set(Vec::new());
						error.set(Some(err.to_string().to_uppercase()));
					}
				}
			});
		};

		let Some(window) = web_sys::window() else {
			return;
		};
		let callback = Closure::once_into_js(fire);
		match window.set_timeout_with_callback_and_timeout_and_arguments_0(
			callback.unchecked_ref(),
			delay.as_millis().min(i32::MAX as u128) as i32,
		) {
			Ok(handle) => timer.set_value(Some(handle)),
			Err(err) => warn!("could not arm search timer: {err:?}"),
		}
	};

	view! {
		<form class="search" on:submit=|ev| ev.prevent_default()>
			<input
				type="search"
				placeholder="Search"
				autocomplete="off"
				class:is-loading=move || loading.get()
				on:input=on_input
			/>
			<div class="search-results">
				{move || match error.get() {
					Some(message) => {
						view! {
							<ul>
								<li style="list-style: none;">{message}</li>
							</ul>
						}
							.into_any()
					}
					None => {
						view! {
							<ul>
								<For
									each=move || hits.get()
									key=|hit| hit.id
									children=|hit| {
										view! {
											<li>
												<A href=hit.graph_path()>{hit.display_title()}</A>
											</li>
										}
									}
								/>
							</ul>
						}
							.into_any()
					}
				}}
			</div>
		</form>
	}
}

/// Landing page with the song search.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<section class="home">
			<h1>"SampleGraph"</h1>
			<h2 class="subtitle">"Visualize the relationship between songs by their samples."</h2>
			<Search />
		</section>
	}
}
