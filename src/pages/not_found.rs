use leptos::prelude::*;

use super::error::ErrorPage;
use crate::error::Failure;

/// 404 - Not Found
#[component]
pub fn NotFound() -> impl IntoView {
	let failure = Failure {
		status: Some(404),
		message: "Not Found".into(),
	};
	view! { <ErrorPage failure=failure /> }
}
