use log::{debug, info};

use super::config::PointerProfile;
use super::state::ForceGraphState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
	Mouse,
	Touch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
	Default,
	Pointer,
	Grabbing,
}

impl Cursor {
	pub fn as_css(self) -> &'static str {
		match self {
			Cursor::Default => "default",
			Cursor::Pointer => "pointer",
			Cursor::Grabbing => "grabbing",
		}
	}
}

/// Side effects requested by a gesture handler.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Response {
	/// Paint once if no frame is already scheduled.
	pub redraw: bool,
	pub resume: bool,
	/// Link to open in a new tab.
	pub open: Option<String>,
	pub cursor: Option<Cursor>,
}

impl Response {
	fn redraw() -> Self {
		Self {
			redraw: true,
			..Self::default()
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Press {
	pub kind: PointerKind,
	pub origin: (f64, f64),
	pub last: (f64, f64),
	pub at_ms: f64,
}

impl Press {
	fn new(kind: PointerKind, x: f64, y: f64, at_ms: f64) -> Self {
		Self {
			kind,
			origin: (x, y),
			last: (x, y),
			at_ms,
		}
	}

	fn travelled(&self, x: f64, y: f64) -> f64 {
		(x - self.origin.0).hypot(y - self.origin.1)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
	#[default]
	Idle,
	/// Pressed on empty space, not yet moved far enough to pan.
	PanCandidate { press: Press },
	Panning { press: Press },
	/// Pressed on a node; becomes a drag or, on a quick release, a click.
	DragCandidate {
		node: usize,
		grab: (f64, f64),
		press: Press,
	},
	Dragging {
		node: usize,
		grab: (f64, f64),
		press: Press,
	},
	/// Two fingers down. Scale follows the finger distance around the starting midpoint.
	Pinching {
		start_distance: f64,
		start_scale: f64,
		anchor: (f64, f64),
	},
}

impl ForceGraphState {
	fn profile(&self, kind: PointerKind) -> PointerProfile {
		match kind {
			PointerKind::Mouse => self.config().interaction.mouse.clone(),
			PointerKind::Touch => self.config().interaction.touch.clone(),
		}
	}

	pub fn pointer_down(&mut self, kind: PointerKind, x: f64, y: f64, at_ms: f64) -> Response {
		let press = Press::new(kind, x, y, at_ms);
		self.gesture = match self.node_at_position(x, y) {
			Some(node) => {
				let (wx, wy) = self.viewport.screen_to_world(x, y);
				let target = &self.sim.nodes[node];
				Gesture::DragCandidate {
					node,
					grab: (target.x - wx, target.y - wy),
					press,
				}
			}
			None => Gesture::PanCandidate { press },
		};
		Response::default()
	}

	pub fn pointer_move(&mut self, kind: PointerKind, x: f64, y: f64) -> Response {
		let profile = self.profile(kind);
		match self.gesture {
			Gesture::Dragging { node, grab, mut press } => {
				press.last = (x, y);
				self.gesture = Gesture::Dragging { node, grab, press };
				self.drag_to(node, grab, x, y, &profile)
			}
			Gesture::DragCandidate { node, grab, mut press } => {
				press.last = (x, y);
				if press.travelled(x, y) > profile.drag_threshold {
					debug!("dragging node {}", self.sim.nodes[node].id);
					self.gesture = Gesture::Dragging { node, grab, press };
					self.sim.pin(Some(node));
					return self.drag_to(node, grab, x, y, &profile);
				}
				self.gesture = Gesture::DragCandidate { node, grab, press };
				self.hover_at(kind, x, y)
			}
			Gesture::PanCandidate { mut press } => {
				if press.travelled(x, y) > profile.pan_threshold {
					self.viewport.pan(x - press.last.0, y - press.last.1);
					press.last = (x, y);
					self.gesture = Gesture::Panning { press };
					return Response {
						cursor: Some(Cursor::Grabbing),
						..Response::redraw()
					};
				}
				self.hover_at(kind, x, y)
			}
			Gesture::Panning { mut press } => {
				self.viewport.pan(x - press.last.0, y - press.last.1);
				press.last = (x, y);
				self.gesture = Gesture::Panning { press };
				Response::redraw()
			}
			Gesture::Pinching { .. } => Response::default(),
			Gesture::Idle => self.hover_at(kind, x, y),
		}
	}

	fn drag_to(&mut self, node: usize, grab: (f64, f64), x: f64, y: f64, profile: &PointerProfile) -> Response {
		let (wx, wy) = self.viewport.screen_to_world(x, y);
		self.sim.place(node, wx + grab.0, wy + grab.1);
		let mut response = Response::redraw();
		if !self.sim.is_running() {
			self.sim.reheat(profile.drag_alpha);
			response.resume = true;
		}
		response
	}

	fn hover_at(&mut self, kind: PointerKind, x: f64, y: f64) -> Response {
		if kind == PointerKind::Touch {
			return Response::default();
		}
		let hit = self.node_at_position(x, y);
		let linked = hit.is_some_and(|idx| self.sim.nodes[idx].href.is_some());
		Response {
			redraw: self.set_hover(hit),
			cursor: Some(if linked { Cursor::Pointer } else { Cursor::Default }),
			..Response::default()
		}
	}

	/// Ends the current gesture. A press on a node that stayed put and was
	/// released quickly opens its link.
	pub fn pointer_up(&mut self, x: f64, y: f64, at_ms: f64) -> Response {
		let gesture = std::mem::take(&mut self.gesture);
		self.sim.pin(None);
		match gesture {
			Gesture::DragCandidate { node, press, .. } => {
				let profile = self.profile(press.kind);
				let quick = at_ms - press.at_ms < self.config().interaction.click_window_ms;
				if !quick || press.travelled(x, y) >= profile.click_slop {
					return Response::default();
				}
				let open = self.sim.nodes[node].href.clone();
				if let Some(href) = &open {
					info!("opening {href}");
				}
				Response {
					open,
					..Response::default()
				}
			}
			Gesture::Panning { .. } => Response {
				cursor: Some(Cursor::Default),
				..Response::default()
			},
			_ => Response::default(),
		}
	}

	pub fn pointer_leave(&mut self) -> Response {
		self.gesture = Gesture::Idle;
		self.sim.pin(None);
		Response {
			redraw: self.set_hover(None),
			cursor: Some(Cursor::Default),
			..Response::default()
		}
	}

	pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) -> Response {
		let factor = self.config().zoom.wheel_factor(delta_y);
		self.viewport.zoom_at(x, y, factor);
		Response::redraw()
	}

	pub fn touch_start(&mut self, touches: &[(f64, f64)], at_ms: f64) -> Response {
		match touches {
			[] => Response::default(),
			[(x, y)] => self.pointer_down(PointerKind::Touch, *x, *y, at_ms),
			[a, b, ..] => {
				self.sim.pin(None);
				self.gesture = Gesture::Pinching {
					start_distance: distance(*a, *b),
					start_scale: self.viewport.scale,
					anchor: ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0),
				};
				Response::default()
			}
		}
	}

	pub fn touch_move(&mut self, touches: &[(f64, f64)]) -> Response {
		match (touches, self.gesture) {
			(
				[a, b, ..],
				Gesture::Pinching {
					start_distance,
					start_scale,
					anchor,
				},
			) => {
				let factor = distance(*a, *b) / start_distance.max(1.0);
				self.viewport.set_scale_at(anchor.0, anchor.1, start_scale * factor);
				Response::redraw()
			}
			([(x, y)], _) => self.pointer_move(PointerKind::Touch, *x, *y),
			_ => Response::default(),
		}
	}

	/// `remaining` is how many fingers are still down after the release.
	pub fn touch_end(&mut self, remaining: usize, at_ms: f64) -> Response {
		match self.gesture {
			Gesture::Pinching { .. } if remaining < 2 => {
				self.gesture = Gesture::Idle;
				Response::default()
			}
			Gesture::PanCandidate { press }
			| Gesture::Panning { press }
			| Gesture::DragCandidate { press, .. }
			| Gesture::Dragging { press, .. }
				if remaining == 0 =>
			{
				self.pointer_up(press.last.0, press.last.1, at_ms)
			}
			_ => Response::default(),
		}
	}
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
	(a.0 - b.0).hypot(a.1 - b.1)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::simulation::Step;
	use crate::components::force_graph::state::tests::fixture;

	const BOOK: (f64, f64) = (600.0, 300.0);
	const EMPTY: (f64, f64) = (100.0, 100.0);

	fn settle(state: &mut ForceGraphState) {
		while state.tick() == Step::Running {}
	}

	#[test]
	fn quick_tap_opens_link() {
		let mut state = fixture();
		state.pointer_down(PointerKind::Mouse, BOOK.0, BOOK.1, 1000.0);
		state.pointer_move(PointerKind::Mouse, BOOK.0 + 2.0, BOOK.1 + 1.0);
		let response = state.pointer_up(BOOK.0 + 2.0, BOOK.1 + 1.0, 1120.0);
		assert_eq!(response.open.as_deref(), Some("https://doc.rust-lang.org/book/"));
		assert_eq!(state.gesture, Gesture::Idle);
	}

	#[test]
	fn slow_press_does_not_open() {
		let mut state = fixture();
		state.pointer_down(PointerKind::Mouse, BOOK.0, BOOK.1, 1000.0);
		let response = state.pointer_up(BOOK.0, BOOK.1, 1400.0);
		assert_eq!(response.open, None);
	}

	#[test]
	fn release_beyond_slop_does_not_open() {
		let mut state = fixture();
		state.pointer_down(PointerKind::Mouse, BOOK.0, BOOK.1, 0.0);
		state.pointer_move(PointerKind::Mouse, BOOK.0 + 5.0, BOOK.1);
		assert!(matches!(state.gesture, Gesture::DragCandidate { .. }));
		assert_eq!(state.pointer_up(BOOK.0 + 5.0, BOOK.1, 50.0).open, None);
	}

	#[test]
	fn node_without_link_never_opens() {
		let mut state = fixture();
		state.pointer_down(PointerKind::Mouse, 400.0, 300.0, 0.0);
		assert!(matches!(state.gesture, Gesture::DragCandidate { node: 0, .. }));
		assert_eq!(state.pointer_up(400.0, 300.0, 10.0).open, None);
	}

	#[test]
	fn drag_moves_node_and_wakes_layout() {
		let mut state = fixture();
		settle(&mut state);
		let start = (state.sim.nodes[1].x, state.sim.nodes[1].y);
		let (sx, sy) = state.viewport.world_to_screen(start.0, start.1);

		state.pointer_down(PointerKind::Mouse, sx, sy, 0.0);
		let response = state.pointer_move(PointerKind::Mouse, sx + 40.0, sy + 10.0);
		assert!(matches!(state.gesture, Gesture::Dragging { node: 1, .. }));
		assert!(response.resume && response.redraw);
		assert!(state.is_running());
		assert_eq!(state.sim.alpha(), 0.1);

		let node = &state.sim.nodes[1];
		assert!((node.x - (start.0 + 40.0)).abs() < 1e-9);
		assert!((node.y - (start.1 + 10.0)).abs() < 1e-9);

		let response = state.pointer_up(sx + 40.0, sy + 10.0, 20.0);
		assert_eq!(response.open, None);
	}

	#[test]
	fn touch_drag_moves_node_and_wakes_layout() {
		let mut state = fixture();
		settle(&mut state);
		let start = (state.sim.nodes[1].x, state.sim.nodes[1].y);
		let (sx, sy) = state.viewport.world_to_screen(start.0, start.1);

		state.touch_start(&[(sx, sy)], 0.0);
		state.touch_move(&[(sx + 5.0, sy)]);
		assert!(matches!(state.gesture, Gesture::DragCandidate { node: 1, .. }));
		assert!(!state.is_running());

		let response = state.touch_move(&[(sx + 30.0, sy + 10.0)]);
		assert!(matches!(state.gesture, Gesture::Dragging { node: 1, .. }));
		assert!(response.resume && response.redraw);
		assert_eq!(state.sim.alpha(), 0.2);

		let node = &state.sim.nodes[1];
		assert!((node.x - (start.0 + 30.0)).abs() < 1e-9);
		assert!((node.y - (start.1 + 10.0)).abs() < 1e-9);

		let response = state.touch_end(0, 20.0);
		assert_eq!(response.open, None);
		assert!(matches!(state.gesture, Gesture::Idle));
	}

	#[test]
	fn press_on_empty_space_pans() {
		let mut state = fixture();
		let before = (state.viewport.translate_x, state.viewport.translate_y);
		state.pointer_down(PointerKind::Mouse, EMPTY.0, EMPTY.1, 0.0);

		let response = state.pointer_move(PointerKind::Mouse, EMPTY.0 + 3.0, EMPTY.1);
		assert!(matches!(state.gesture, Gesture::PanCandidate { .. }));
		assert!(!response.redraw);

		let response = state.pointer_move(PointerKind::Mouse, EMPTY.0 + 20.0, EMPTY.1 - 5.0);
		assert_eq!(response.cursor, Some(Cursor::Grabbing));
		state.pointer_move(PointerKind::Mouse, EMPTY.0 + 30.0, EMPTY.1 - 5.0);
		assert_eq!(
			(state.viewport.translate_x, state.viewport.translate_y),
			(before.0 + 30.0, before.1 - 5.0)
		);

		let response = state.pointer_up(EMPTY.0 + 30.0, EMPTY.1 - 5.0, 500.0);
		assert_eq!(response.cursor, Some(Cursor::Default));
		assert_eq!(state.gesture, Gesture::Idle);
	}

	#[test]
	fn hover_sets_cursor() {
		let mut state = fixture();
		let response = state.pointer_move(PointerKind::Mouse, BOOK.0, BOOK.1);
		assert!(response.redraw);
		assert_eq!(response.cursor, Some(Cursor::Pointer));
		assert_eq!(state.hover, Some(1));

		let response = state.pointer_move(PointerKind::Mouse, 400.0, 300.0);
		assert_eq!(response.cursor, Some(Cursor::Default));
		assert_eq!(state.hover, Some(0));

		let response = state.pointer_leave();
		assert!(response.redraw);
		assert_eq!(state.hover, None);
	}

	#[test]
	fn touch_does_not_hover() {
		let mut state = fixture();
		state.touch_start(&[EMPTY], 0.0);
		state.touch_move(&[(EMPTY.0 + 1.0, EMPTY.1)]);
		state.touch_end(0, 10.0);
		state.touch_move(&[BOOK]);
		assert_eq!(state.hover, None);
	}

	#[test]
	fn touch_tap_opens_link() {
		let mut state = fixture();
		state.touch_start(&[BOOK], 0.0);
		state.touch_move(&[(BOOK.0 + 4.0, BOOK.1)]);
		let response = state.touch_end(0, 200.0);
		assert_eq!(response.open.as_deref(), Some("https://doc.rust-lang.org/book/"));
	}

	#[test]
	fn touch_pan_needs_wider_threshold() {
		let mut state = fixture();
		state.touch_start(&[EMPTY], 0.0);
		state.touch_move(&[(EMPTY.0 + 7.0, EMPTY.1)]);
		assert!(matches!(state.gesture, Gesture::PanCandidate { .. }));
		state.touch_move(&[(EMPTY.0 + 9.0, EMPTY.1)]);
		assert!(matches!(state.gesture, Gesture::Panning { .. }));
	}

	#[test]
	fn pinch_scales_around_start_midpoint() {
		let mut state = fixture();
		let a = (300.0, 200.0);
		let b = (400.0, 200.0);
		let anchor = state.viewport.screen_to_world(350.0, 200.0);

		state.touch_start(&[a, b], 0.0);
		let response = state.touch_move(&[(250.0, 200.0), (450.0, 200.0)]);
		assert!(response.redraw);
		assert!((state.viewport.scale - 2.0).abs() < 1e-12);

		let after = state.viewport.screen_to_world(350.0, 200.0);
		assert!((anchor.0 - after.0).abs() < 1e-9 && (anchor.1 - after.1).abs() < 1e-9);

		// far apart fingers still respect the zoom range
		state.touch_move(&[(0.0, 200.0), (1000.0, 200.0)]);
		assert_eq!(state.viewport.scale, 3.0);

		state.touch_end(1, 10.0);
		assert_eq!(state.gesture, Gesture::Idle);
	}

	#[test]
	fn wheel_zooms_at_cursor() {
		let mut state = fixture();
		let anchor = state.viewport.screen_to_world(120.0, 80.0);
		assert!(state.wheel(120.0, 80.0, -200.0).redraw);
		assert!(state.viewport.scale > 1.0);
		let after = state.viewport.screen_to_world(120.0, 80.0);
		assert!((anchor.0 - after.0).abs() < 1e-9 && (anchor.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn leave_abandons_drag() {
		let mut state = fixture();
		state.pointer_down(PointerKind::Mouse, BOOK.0, BOOK.1, 0.0);
		state.pointer_move(PointerKind::Mouse, BOOK.0 + 30.0, BOOK.1);
		state.pointer_leave();
		assert_eq!(state.gesture, Gesture::Idle);
		assert_eq!(state.pointer_up(BOOK.0, BOOK.1, 10.0), Response::default());
	}
}
