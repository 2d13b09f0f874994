use leptos::prelude::*;
use leptos_router::components::A;

use crate::error::Failure;

/// Terminal failure of a page: status (when known), message and a way back.
#[component]
pub fn ErrorPage(failure: Failure) -> impl IntoView {
	let Failure { status, message } = failure;
	view! {
		<section class="error-page" style="text-align: center;">
			<h1>
				{status.map(|s| view! { <span class="error-page__status">{format!("{s} ")}</span> })}
				{message}
			</h1>
			<A href="/">"Return Home"</A>
		</section>
	}
}
