use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::html::Canvas;
use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::{CanvasState, ZOOM_STEP};
use crate::graph::GraphScene;

type SharedState = Rc<RefCell<Option<CanvasState>>>;
type SharedCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);
/// Longest frame step fed to the hover easing, in seconds.
const MAX_FRAME_STEP: f64 = 0.1;

/// Browser callbacks one mounted canvas registers with the window.
#[derive(Clone, Default)]
struct Callbacks {
	animate: SharedCallback,
	resize: SharedCallback,
	frame: Rc<Cell<Option<i32>>>,
}

impl Callbacks {
	fn listen_resize(&self, window: &Window, cb: Closure<dyn FnMut()>) {
		if let Err(err) = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
		{
			warn!("could not listen for resize: {err:?}");
		}
		*self.resize.borrow_mut() = Some(cb);
	}

	fn request_frame(&self, window: &Window) {
		let Some(ref cb) = *self.animate.borrow() else {
			return;
		};
		match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
			Ok(id) => self.frame.set(Some(id)),
			Err(err) => warn!("animation frame refused: {err:?}"),
		}
	}

	/// Unregister everything and drop the closures, breaking the animate self-reference.
	fn detach(&self) {
		if let Some(window) = web_sys::window() {
			if let Some(id) = self.frame.take() {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(ref cb) = *self.resize.borrow() {
				if let Err(err) =
					window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
				{
					warn!("could not remove resize listener: {err:?}");
				}
			}
		}
		self.resize.borrow_mut().take();
		self.animate.borrow_mut().take();
	}
}

fn with_state(state: &SharedState, f: impl FnOnce(&mut CanvasState)) {
	if let Some(ref mut s) = *state.borrow_mut() {
		f(s);
	}
}

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or(FALLBACK_SIZE)
}

fn local_point(canvas_ref: NodeRef<Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn open_external(url: &str) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Err(err) = window.open_with_url_and_target(url, "_blank") {
		warn!("could not open {url}: {err:?}");
	}
}

/// Pan/zoom canvas for a laid-out [`GraphScene`].
///
/// Clicking a node opens its catalogue page in a new tab; dragging the background pans.
#[component]
pub fn GraphCanvas(scene: GraphScene) -> impl IntoView {
	let canvas_ref = NodeRef::<Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let callbacks = Callbacks::default();
	let (state_init, callbacks_init) = (state.clone(), callbacks.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		callbacks_init.detach();

		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("2d context has an unexpected type");
					return;
				}
			},
			_ => {
				warn!("canvas 2d context unavailable");
				return;
			}
		};
		*state_init.borrow_mut() = Some(CanvasState::new(&scene, w, h));
		debug!("canvas ready at {w}x{h}");

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		callbacks_init.listen_resize(
			&window,
			Closure::new(move || {
				let (nw, nh) = parent_size(&canvas_resize);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				with_state(&state_resize, |s| s.resize(nw, nh));
			}),
		);

		let (state_anim, callbacks_anim) = (state_init.clone(), callbacks_init.clone());
		let mut last_frame = js_sys::Date::now();
		*callbacks_init.animate.borrow_mut() = Some(Closure::new(move || {
			callbacks_anim.frame.set(None);
			let now = js_sys::Date::now();
			let dt = ((now - last_frame) / 1000.0).clamp(0.0, MAX_FRAME_STEP);
			last_frame = now;
			with_state(&state_anim, |s| {
				s.tick(dt);
				render::render(s, &ctx);
			});
			if let Some(window) = web_sys::window() {
				callbacks_anim.request_frame(&window);
			}
		}));
		callbacks_init.request_frame(&window);
	});

	let teardown = StoredValue::new_local(callbacks);
	on_cleanup(move || {
		teardown.try_with_value(Callbacks::detach);
		debug!("canvas detached");
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			with_state(&state_md, |s| s.press(x, y));
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			with_state(&state_mm, |s| s.pointer_move(x, y));
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let mut clicked = None;
		with_state(&state_mu, |s| clicked = s.release(x, y));
		if let Some(url) = clicked {
			open_external(&url);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		with_state(&state_ml, |s| s.leave());
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			let factor = if ev.delta_y() > 0.0 {
				1.0 / ZOOM_STEP
			} else {
				ZOOM_STEP
			};
			with_state(&state_wh, |s| s.zoom_by(factor, x, y));
		}
	};

	let (state_in, state_out, state_fit) = (state.clone(), state.clone(), state);

	view! {
		<div class="graph-canvas" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="graph-canvas__surface"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div
				class="graph-canvas__controls"
				style="position: absolute; left: 12px; bottom: 12px; display: flex; gap: 4px;"
			>
				<button title="Zoom in" on:click=move |_| with_state(&state_in, |s| s.zoom_in())>
					"+"
				</button>
				<button title="Zoom out" on:click=move |_| with_state(&state_out, |s| s.zoom_out())>
					"−"
				</button>
				<button title="Fit view" on:click=move |_| with_state(&state_fit, |s| s.fit_view())>
					"Fit"
				</button>
			</div>
		</div>
	}
}
