use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::render;
use super::state::NodeMeshState;
use super::types::Variant;

/// Size the canvas backing store for the device pixel ratio, pin its CSS
/// size, and rescale the context so all drawing stays in CSS pixels.
fn size_canvas(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d, w: f64, h: f64) {
	let dpr = web_sys::window()
		.map(|win| win.device_pixel_ratio())
		.unwrap_or(1.0);
	canvas.set_width((w * dpr) as u32);
	canvas.set_height((h * dpr) as u32);
	let style = web_sys::HtmlElement::style(&canvas);
	let _ = style.set_property("width", &format!("{w}px"));
	let _ = style.set_property("height", &format!("{h}px"));
	let _ = ctx.scale(dpr, dpr);
}

#[component]
pub fn NodeMeshCanvas(
	#[prop(default = Variant::Light)] variant: Variant,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<NodeMeshState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let (state_init, animate_init, resize_cb_init, raf_init) = (
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		raf_id.clone(),
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

		// A missing 2d context disables the effect instead of failing the page.
		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(obj)) => match obj.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("canvas 2d context has an unexpected type; mesh disabled");
					return;
				}
			},
			_ => {
				warn!("canvas 2d context unavailable; mesh disabled");
				return;
			}
		};
		size_canvas(&canvas, &ctx, w, h);
		*state_init.borrow_mut() = Some(NodeMeshState::new(w, h, variant));

		if fullscreen {
			let (state_resize, canvas_resize, ctx_resize) =
				(state_init.clone(), canvas.clone(), ctx.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				size_canvas(&canvas_resize, &ctx_resize, nw, nh);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.rebuild(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, raf_anim) =
			(state_init.clone(), animate_init.clone(), raf_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			// Mutation strictly precedes drawing within one frame.
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick();
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Ok(id) = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref())
				{
					raf_anim.set(Some(id));
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				raf_init.set(Some(id));
			}
		}
	});

	let drop_handles = leptos::__reexports::send_wrapper::SendWrapper::new((
		animate.clone(),
		resize_cb.clone(),
		raf_id.clone(),
	));
	on_cleanup(move || {
		let (animate_drop, resize_drop, raf_drop) = &*drop_handles;
		let window = web_sys::window();
		if let (Some(win), Some(id)) = (window.as_ref(), raf_drop.take()) {
			let _ = win.cancel_animation_frame(id);
		}
		if let (Some(win), Some(cb)) = (window.as_ref(), resize_drop.borrow_mut().take()) {
			let _ = win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		animate_drop.borrow_mut().take();
	});

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_moved(x, y, js_sys::Date::now());
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_left();
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="node-mesh-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			style="display: block;"
		/>
	}
}
