use leptos::prelude::*;
use samplegraph::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}
