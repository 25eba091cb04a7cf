use std::cell::RefCell;
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent,
	TouchEvent, WheelEvent,
};

use super::build::build_graph;
use super::config::GraphConfig;
use super::controls::GraphControls;
use super::error::{SurfaceError, describe_js};
use super::interaction::{Cursor, PointerKind, Response};
use super::render;
use super::simulation::Step;
use super::state::{ForceGraphState, Visibility};
use super::types::InputNode;
use super::viewport::SurfaceSize;

/// Canvas size used when the canvas has no parent to measure.
const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

/// A live graph bound to its canvas.
struct Engine {
	state: ForceGraphState,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	/// Pending animation frame, if any. At most one is ever scheduled.
	frame: Option<i32>,
}

impl Engine {
	fn mount(canvas: HtmlCanvasElement, tree: &InputNode, config: GraphConfig) -> Result<Self, SurfaceError> {
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.map_err(|e| SurfaceError::Context(describe_js(&e)))?
			.ok_or_else(|| SurfaceError::Context("canvas returned no context".into()))?
			.dyn_into()
			.map_err(|_| SurfaceError::Context("context is not 2d".into()))?;

		let surface = fit_canvas(&canvas);
		let data = build_graph(tree, &mut rand::thread_rng());
		let state = ForceGraphState::new(data, &ctx, surface, config);
		Ok(Self {
			state,
			canvas,
			ctx,
			frame: None,
		})
	}

	fn draw(&self) {
		render::render(&self.state, &self.ctx);
	}

	fn local_point(&self, client_x: i32, client_y: i32) -> (f64, f64) {
		let rect = self.canvas.get_bounding_client_rect();
		(client_x as f64 - rect.left(), client_y as f64 - rect.top())
	}

	fn touch_points(&self, ev: &TouchEvent) -> Vec<(f64, f64)> {
		let touches = ev.touches();
		(0..touches.length())
			.filter_map(|i| touches.get(i))
			.map(|t| self.local_point(t.client_x(), t.client_y()))
			.collect()
	}

	fn set_cursor(&self, cursor: Cursor) {
		let _ = HtmlElement::style(&self.canvas).set_property("cursor", cursor.as_css());
	}

	fn cancel_frame(&mut self) {
		if let (Some(id), Some(window)) = (self.frame.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(id);
		}
	}
}

/// Size the canvas backing store to its parent at the device pixel ratio.
fn fit_canvas(canvas: &HtmlCanvasElement) -> SurfaceSize {
	let (width, height) = canvas
		.parent_element()
		.map(|p| {
			let rect = p.get_bounding_client_rect();
			(rect.width(), rect.height())
		})
		.unwrap_or(FALLBACK_SIZE);
	let ratio = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
	let surface = SurfaceSize::new(width, height, ratio);

	canvas.set_width(surface.pixel_width());
	canvas.set_height(surface.pixel_height());
	let style = HtmlElement::style(canvas);
	let _ = style.set_property("width", &format!("{}px", surface.width));
	let _ = style.set_property("height", &format!("{}px", surface.height));
	debug!("canvas sized {}x{} at {}x", surface.width, surface.height, ratio);
	surface
}

fn open_link(href: &str) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Err(err) = window.open_with_url_and_target_and_features(href, "_blank", "noopener,noreferrer") {
		warn!("could not open {href}: {}", describe_js(&err));
	}
}

/// A DOM listener that unregisters itself when dropped.
struct Listener {
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
	fn attach(target: EventTarget, event: &'static str, handler: impl FnMut(Event) + 'static) -> Option<Self> {
		let callback = Closure::<dyn FnMut(Event)>::new(handler);
		match target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()) {
			Ok(()) => Some(Self {
				target,
				event,
				callback,
			}),
			Err(err) => {
				warn!("could not listen for {event}: {}", describe_js(&err));
				None
			}
		}
	}
}

impl Drop for Listener {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
	}
}

/// Everything a mounted canvas owns: the engine, the frame callback and the
/// listeners outside the view tree.
pub(super) struct Runtime {
	engine: RefCell<Option<Engine>>,
	animate: Option<Closure<dyn FnMut()>>,
	listeners: RefCell<Vec<Listener>>,
}

impl Runtime {
	fn new() -> Rc<Self> {
		Rc::new_cyclic(|weak: &Weak<Runtime>| {
			let weak = weak.clone();
			Self {
				engine: RefCell::new(None),
				animate: Some(Closure::new(move || {
					if let Some(runtime) = weak.upgrade() {
						runtime.frame();
					}
				})),
				listeners: RefCell::new(Vec::new()),
			}
		})
	}

	fn frame(&self) {
		let Ok(mut guard) = self.engine.try_borrow_mut() else {
			return;
		};
		let Some(engine) = guard.as_mut() else {
			return;
		};
		engine.frame = None;
		if engine.state.is_hidden() {
			return;
		}
		let step = engine.state.tick();
		engine.draw();
		match step {
			Step::Running => self.request_frame(engine),
			Step::Converged => debug!("layout at rest after {} frames", engine.state.sim.frames()),
		}
	}

	/// Schedule the next frame unless one is pending, the page is hidden or
	/// the layout is at rest.
	fn request_frame(&self, engine: &mut Engine) {
		if engine.frame.is_some() || engine.state.is_hidden() || !engine.state.is_running() {
			return;
		}
		let (Some(window), Some(callback)) = (web_sys::window(), self.animate.as_ref()) else {
			return;
		};
		match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
			Ok(id) => engine.frame = Some(id),
			Err(err) => warn!("animation frame refused: {}", describe_js(&err)),
		}
	}

	fn install(&self, engine: Engine) {
		let Ok(mut guard) = self.engine.try_borrow_mut() else {
			return;
		};
		if let Some(old) = guard.as_mut() {
			old.cancel_frame();
		}
		let engine = guard.insert(engine);
		engine.draw();
		self.request_frame(engine);
	}

	/// Run a gesture handler and carry out its [`Response`].
	fn dispatch(&self, handler: impl FnOnce(&mut Engine) -> Response) {
		let open = {
			let Ok(mut guard) = self.engine.try_borrow_mut() else {
				return;
			};
			let Some(engine) = guard.as_mut() else {
				return;
			};
			let response = handler(engine);
			if let Some(cursor) = response.cursor {
				engine.set_cursor(cursor);
			}
			if response.resume {
				self.request_frame(engine);
			}
			if response.redraw && engine.frame.is_none() {
				engine.draw();
			}
			response.open
		};
		if let Some(href) = open {
			open_link(&href);
		}
	}

	pub(super) fn zoom(&self, zoom_in: bool) {
		self.dispatch(|engine| {
			if zoom_in {
				engine.state.zoom_in();
			} else {
				engine.state.zoom_out();
			}
			Response {
				redraw: true,
				..Response::default()
			}
		});
	}

	fn on_resize(&self) {
		self.dispatch(|engine| {
			let surface = fit_canvas(&engine.canvas);
			engine.state.resize(surface);
			Response {
				redraw: true,
				..Response::default()
			}
		});
	}

	fn on_visibility(&self, hidden: bool) {
		let Ok(mut guard) = self.engine.try_borrow_mut() else {
			return;
		};
		let Some(engine) = guard.as_mut() else {
			return;
		};
		match engine.state.set_hidden(hidden) {
			Visibility::Pause => engine.cancel_frame(),
			Visibility::Resume => self.request_frame(engine),
			Visibility::Unchanged => {}
		}
	}

	/// Listeners that the view tree cannot hold: window and document events,
	/// plus touch and wheel, which must be able to `prevent_default`.
	fn listen(self: &Rc<Self>, canvas: &HtmlCanvasElement) {
		let Some(window) = web_sys::window() else {
			return;
		};
		let mut listeners = Vec::new();

		let rt = Rc::downgrade(self);
		listeners.extend(Listener::attach(window.clone().into(), "resize", move |_| {
			if let Some(rt) = rt.upgrade() {
				rt.on_resize();
			}
		}));

		// releases outside the canvas still end the gesture
		let rt = Rc::downgrade(self);
		listeners.extend(Listener::attach(window.clone().into(), "mouseup", move |ev| {
			let (Some(rt), Some(ev)) = (rt.upgrade(), ev.dyn_ref::<MouseEvent>()) else {
				return;
			};
			rt.dispatch(|e| {
				let (x, y) = e.local_point(ev.client_x(), ev.client_y());
				e.state.pointer_up(x, y, ev.time_stamp())
			});
		}));

		if let Some(document) = window.document() {
			let rt = Rc::downgrade(self);
			let doc = document.clone();
			listeners.extend(Listener::attach(document.into(), "visibilitychange", move |_| {
				if let Some(rt) = rt.upgrade() {
					rt.on_visibility(doc.hidden());
				}
			}));
		}

		let target: &EventTarget = canvas.as_ref();

		let rt = Rc::downgrade(self);
		listeners.extend(Listener::attach(target.clone(), "wheel", move |ev| {
			let (Some(rt), Some(ev)) = (rt.upgrade(), ev.dyn_ref::<WheelEvent>()) else {
				return;
			};
			ev.prevent_default();
			rt.dispatch(|e| {
				let (x, y) = e.local_point(ev.client_x(), ev.client_y());
				e.state.wheel(x, y, ev.delta_y())
			});
		}));

		let rt = Rc::downgrade(self);
		listeners.extend(Listener::attach(target.clone(), "touchstart", move |ev| {
			let (Some(rt), Some(ev)) = (rt.upgrade(), ev.dyn_ref::<TouchEvent>()) else {
				return;
			};
			ev.prevent_default();
			rt.dispatch(|e| {
				let points = e.touch_points(ev);
				e.state.touch_start(&points, ev.time_stamp())
			});
		}));

		let rt = Rc::downgrade(self);
		listeners.extend(Listener::attach(target.clone(), "touchmove", move |ev| {
			let (Some(rt), Some(ev)) = (rt.upgrade(), ev.dyn_ref::<TouchEvent>()) else {
				return;
			};
			ev.prevent_default();
			rt.dispatch(|e| {
				let points = e.touch_points(ev);
				e.state.touch_move(&points)
			});
		}));

		let rt = Rc::downgrade(self);
		listeners.extend(Listener::attach(target.clone(), "touchend", move |ev| {
			let (Some(rt), Some(ev)) = (rt.upgrade(), ev.dyn_ref::<TouchEvent>()) else {
				return;
			};
			ev.prevent_default();
			rt.dispatch(|e| e.state.touch_end(ev.touches().length() as usize, ev.time_stamp()));
		}));

		let rt = Rc::downgrade(self);
		listeners.extend(Listener::attach(target.clone(), "touchcancel", move |_| {
			if let Some(rt) = rt.upgrade() {
				rt.dispatch(|e| e.state.pointer_leave());
			}
		}));

		if let Ok(mut slot) = self.listeners.try_borrow_mut() {
			*slot = listeners;
		}
	}

	fn teardown(&self) {
		if let Ok(mut guard) = self.engine.try_borrow_mut() {
			if let Some(mut engine) = guard.take() {
				engine.cancel_frame();
			}
		}
		if let Ok(mut listeners) = self.listeners.try_borrow_mut() {
			listeners.clear();
		}
	}
}

impl Drop for Runtime {
	fn drop(&mut self) {
		self.teardown();
	}
}

#[component]
pub fn ForceGraphCanvas(
	/// Resource tree to lay out. The graph is rebuilt when it changes.
	#[prop(into)]
	tree: Signal<InputNode>,
	#[prop(optional)] config: GraphConfig,
	/// Lets sibling views zoom this canvas.
	#[prop(optional)]
	controls: Option<GraphControls>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let runtime = Runtime::new();

	let rt_mount = runtime.clone();
	Effect::new(move |_| {
		let tree = tree.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		if rt_mount.listeners.borrow().is_empty() {
			rt_mount.listen(&canvas);
		}
		match Engine::mount(canvas, &tree, config.clone()) {
			Ok(engine) => rt_mount.install(engine),
			Err(err) => error!("graph not mounted: {err}"),
		}
	});

	if let Some(controls) = controls {
		controls.attach(&runtime);
	}
	let rt_cleanup = StoredValue::new_local(runtime.clone());
	on_cleanup(move || {
		if let Some(controls) = controls {
			controls.detach();
		}
		rt_cleanup.try_with_value(|rt| rt.teardown());
	});

	let rt_md = runtime.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		rt_md.dispatch(|e| {
			let (x, y) = e.local_point(ev.client_x(), ev.client_y());
			e.state
				.pointer_down(PointerKind::Mouse, x, y, ev.time_stamp())
		});
	};

	let rt_mm = runtime.clone();
	let on_mousemove = move |ev: MouseEvent| {
		rt_mm.dispatch(|e| {
			let (x, y) = e.local_point(ev.client_x(), ev.client_y());
			e.state.pointer_move(PointerKind::Mouse, x, y)
		});
	};

	let rt_ml = runtime;
	let on_mouseleave = move |_: MouseEvent| {
		rt_ml.dispatch(|e| e.state.pointer_leave());
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			style="display: block; touch-action: none;"
		/>
	}
}
