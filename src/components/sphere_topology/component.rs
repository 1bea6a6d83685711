use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent, WheelEvent, Window};

use super::render;
use super::state::SphereTopologyState;
use super::types::{TopologyData, TrafficIntensity};

/// Canvas widget: sphere topology scene plus its animation loop.
///
/// All animation state advances inside a single requestAnimationFrame
/// callback driven by wall-clock deltas; the callback and the window resize
/// listener are torn down on unmount so no timer outlives the widget.
#[component]
pub fn SphereTopologyCanvas(
	#[prop(into)] data: Signal<TopologyData>,
	#[prop(into)] dark_mode: Signal<bool>,
	#[prop(into, default = Signal::stored(Vec::new()))] intensities: Signal<Vec<TrafficIntensity>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<SphereTopologyState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let unmounted: Rc<Cell<bool>> = Rc::new(Cell::new(false));
	let last_frame_ms: Rc<Cell<f64>> = Rc::new(Cell::new(0.0));
	let (state_init, animate_init, resize_cb_init, unmounted_init) = (
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		unmounted.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		*state_init.borrow_mut() =
			Some(SphereTopologyState::new(&data.get(), w, h, dark_mode.get_untracked()));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, unmounted_anim, last_ms) = (
			state_init.clone(),
			animate_init.clone(),
			unmounted_init.clone(),
			last_frame_ms.clone(),
		);
		last_ms.set(js_sys::Date::now());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if unmounted_anim.get() {
				return;
			}
			// Wall-clock delta keeps animation speed frame-rate independent;
			// clamp heals tab-switch pauses in one step.
			let now = js_sys::Date::now();
			let dt = ((now - last_ms.get()) / 1000.0).clamp(0.0, 0.1);
			last_ms.set(now);

			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(dt);
				}
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Control-panel wiring: theme and per-link intensity flow in as signals.
	let state_theme = state.clone();
	Effect::new(move |_| {
		let dark = dark_mode.get();
		if let Some(ref mut s) = *state_theme.borrow_mut() {
			s.set_dark_mode(dark);
		}
	});
	let state_intensity = state.clone();
	Effect::new(move |_| {
		let list = intensities.get();
		if let Some(ref mut s) = *state_intensity.borrow_mut() {
			for (i, intensity) in list.iter().enumerate() {
				s.set_intensity(i, *intensity);
			}
		}
	});

	let (animate_cleanup, resize_cleanup, unmounted_cleanup) =
		(animate.clone(), resize_cb.clone(), unmounted.clone());
	// on_cleanup wants Send + Sync; the Rc handles are not, but cleanup runs
	// on the thread that mounted the component, so SendWrapper is sound.
	let teardown = SendWrapper::new(move || {
		unmounted_cleanup.set(true);
		*animate_cleanup.borrow_mut() = None;
		if let Some(cb) = resize_cleanup.borrow_mut().take() {
			if let Some(window) = web_sys::window() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
	});
	on_cleanup(move || teardown.take()());

	let canvas_pos = move |ev: &MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		)
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let (x, y) = canvas_pos(&ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let (x, y) = canvas_pos(&ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_moved(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_left();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel_zoom(ev.delta_y());
		}
	};

	let state_ts = state.clone();
	let on_touchstart = move |_: TouchEvent| {
		if let Some(ref mut s) = *state_ts.borrow_mut() {
			s.touch_interaction();
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="sphere-topology-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:touchstart=on_touchstart
			style="display: block; cursor: grab;"
		/>
	}
}
