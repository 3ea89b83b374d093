use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::popup::{DomPopupHost, WindowNavigator};
use super::render;
use super::session::GraphHandle;
use super::state::ForceGraphState;

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>, fallback| v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback);
	(dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0))
}

fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((ev.client_x() as f64 - rect.left(), ev.client_y() as f64 - rect.top()))
}

#[component]
pub fn GraphView(
	handle: GraphHandle,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let handle_init = handle.clone();

	Effect::new(move |_| {
		let (Some(canvas), Some(container)) = (canvas_ref.get(), container_ref.get()) else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let container: Element = container.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			(
				width.unwrap_or_else(|| container.client_width() as f64),
				height.unwrap_or_else(|| container.client_height() as f64),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => ctx.unchecked_into(),
			other => {
				error!("no 2d canvas context: {other:?}");
				return;
			}
		};
		let host = match DomPopupHost::new(container) {
			Ok(host) => host,
			Err(err) => {
				error!("{err}");
				return;
			}
		};
		handle_init.session().borrow_mut().attach(
			ForceGraphState::new(w, h),
			host,
			WindowNavigator,
			w,
			h,
		);
		handle_init.reload();

		if fullscreen {
			let (handle_resize, canvas_resize) = (handle_init.clone(), canvas.clone());
			*resize_cb.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				let mut session = handle_resize.session().borrow_mut();
				session.resize(nw, nh);
				if let Some(engine) = session.engine_mut() {
					engine.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (handle_anim, animate_inner) = (handle_init.clone(), animate.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			if let Some(engine) = handle_anim.session().borrow_mut().engine_mut() {
				if engine.tick(0.016) {
					render::render(engine, &ctx);
				}
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let handle_md = handle.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer_position(canvas_ref, &ev) {
			handle_md.pointer(|s| s.pointer_down(x, y));
		}
	};

	let handle_mm = handle.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer_position(canvas_ref, &ev) {
			handle_mm.pointer(|s| s.pointer_move(x, y));
		}
	};

	let handle_mu = handle.clone();
	let on_mouseup = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer_position(canvas_ref, &ev) {
			handle_mu.pointer(|s| s.pointer_up(x, y));
		}
	};

	let handle_ml = handle.clone();
	let on_mouseleave = move |_: MouseEvent| {
		handle_ml.pointer(|s| s.pointer_leave());
	};

	let handle_wh = handle;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = pointer_position(canvas_ref, &ev) {
			handle_wh.pointer(|s| s.wheel(x, y, ev.delta_y()));
		}
	};

	view! {
		<div node_ref=container_ref class="graph-container" style="position: relative; width: 100%; height: 100%;">
			<canvas
				node_ref=canvas_ref
				class="graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
		</div>
	}
}
