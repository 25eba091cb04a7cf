use log::{debug, info};

use super::config::GraphConfig;
use super::interaction::Gesture;
use super::labels::{TextMeasure, measure_labels};
use super::simulation::{Simulation, Step, frames_to_converge};
use super::types::GraphData;
use super::viewport::{SurfaceSize, Viewport, WorldRect};

/// Extra world-space reach around a node's circle that still counts as a hit.
pub const HIT_SLOP: f64 = 6.0;
/// Smallest hit radius in screen pixels, so zoomed-out nodes stay grabbable.
pub const MIN_HIT_SCREEN: f64 = 10.0;
const LABEL_GAP: f64 = 2.0;
const LABEL_HIT_HALF_HEIGHT: f64 = 10.0;

/// What the frame loop has to do after a visibility change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
	Pause,
	Resume,
	Unchanged,
}

pub struct ForceGraphState {
	pub sim: Simulation,
	pub viewport: Viewport,
	pub surface: SurfaceSize,
	pub hover: Option<usize>,
	pub gesture: Gesture,
	config: GraphConfig,
	hidden: bool,
}

impl ForceGraphState {
	pub fn new<M: TextMeasure + ?Sized>(
		data: GraphData,
		measure: &M,
		surface: SurfaceSize,
		config: GraphConfig,
	) -> Self {
		let labels = measure_labels(&data.nodes, measure);
		let sim = Simulation::new(data, labels, config.simulation.clone());
		let sc = sim.config();
		info!("graph built: {} nodes, {} links", sim.nodes.len(), sim.links.len());
		debug!(
			"layout settles within {} frames",
			frames_to_converge(sc.alpha_seed, sc.alpha_decay, sc.alpha_min)
		);

		Self {
			viewport: Viewport::centered(&surface, &config.zoom),
			sim,
			surface,
			hover: None,
			gesture: Gesture::Idle,
			config,
			hidden: false,
		}
	}

	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	pub fn is_running(&self) -> bool {
		self.sim.is_running()
	}

	pub fn is_hidden(&self) -> bool {
		self.hidden
	}

	/// One animation frame of physics. Gravity pulls toward the world origin,
	/// which the initial viewport puts at the centre of the surface.
	pub fn tick(&mut self) -> Step {
		let bounds = if self.surface.width > 0.0 && self.surface.height > 0.0 {
			self.viewport.visible_world(&self.surface)
		} else {
			// not laid out yet, nothing sensible to clamp against
			WorldRect {
				left: f64::NEG_INFINITY,
				top: f64::NEG_INFINITY,
				right: f64::INFINITY,
				bottom: f64::INFINITY,
			}
		};
		self.sim.step((0.0, 0.0), bounds)
	}

	/// Node under a screen point: the closest circle within reach, or a label box.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (px, py) = self.viewport.screen_to_world(sx, sy);
		let min_reach = MIN_HIT_SCREEN / self.viewport.scale;
		let mut found = None;
		let mut best = f64::INFINITY;

		for (idx, node) in self.sim.nodes.iter().enumerate() {
			let dist = (px - node.x).hypot(py - node.y);
			if dist < (node.size + HIT_SLOP).max(min_reach) {
				if dist < best {
					best = dist;
					found = Some(idx);
				}
				continue;
			}

			let width = self.sim.label(idx).map_or(0.0, |l| l.width);
			if width <= 0.0 {
				continue;
			}
			let left = node.x + node.size + LABEL_GAP;
			let right = left + width + LABEL_GAP;
			let in_label = (left..=right).contains(&px)
				&& (node.y - LABEL_HIT_HALF_HEIGHT..=node.y + LABEL_HIT_HALF_HEIGHT).contains(&py);
			if in_label && px - left < best {
				best = px - left;
				found = Some(idx);
			}
		}
		found
	}

	/// Returns whether the hovered node changed.
	pub fn set_hover(&mut self, node: Option<usize>) -> bool {
		if self.hover == node {
			return false;
		}
		self.hover = node;
		true
	}

	pub fn resize(&mut self, surface: SurfaceSize) {
		self.surface = surface;
	}

	pub fn zoom_in(&mut self) {
		let step = self.config.zoom.step;
		self.zoom_centered(step);
	}

	pub fn zoom_out(&mut self) {
		let step = self.config.zoom.step;
		self.zoom_centered(1.0 / step);
	}

	fn zoom_centered(&mut self, factor: f64) {
		let (cx, cy) = self.surface.center();
		self.viewport.zoom_at(cx, cy, factor);
	}

	pub fn set_hidden(&mut self, hidden: bool) -> Visibility {
		if self.hidden == hidden {
			return Visibility::Unchanged;
		}
		self.hidden = hidden;
		if hidden {
			debug!("page hidden, pausing layout");
			Visibility::Pause
		} else {
			self.sim.reheat(self.config.interaction.visibility_alpha);
			debug!("page visible, resuming layout at alpha {:.3}", self.sim.alpha());
			Visibility::Resume
		}
	}
}
