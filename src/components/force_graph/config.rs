#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
	/// Pairwise charge, negative repels.
	pub charge: f64,
	pub link_strength: f64,
	pub link_distance: f64,
	pub node_spacing: f64,
	/// Extra room added around labels by both the springs and the collision pass.
	pub label_pad: f64,
	pub damping: f64,
	pub gravity: f64,
	pub max_speed: f64,
	/// Keeps nodes this far inside the visible area.
	pub boundary_pad: f64,
	pub alpha_seed: f64,
	pub alpha_decay: f64,
	pub alpha_min: f64,
	pub charge_softening: f64,
	pub distance_epsilon: f64,
	/// Upper bound on collision sweeps per frame.
	pub collision_passes: usize,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			charge: -600.0,
			link_strength: 0.08,
			link_distance: 110.0,
			node_spacing: 52.0,
			label_pad: 16.0,
			damping: 0.85,
			gravity: 0.01,
			max_speed: 2.5,
			boundary_pad: 16.0,
			alpha_seed: 0.4,
			alpha_decay: 0.98,
			alpha_min: 0.02,
			charge_softening: 0.01,
			distance_epsilon: 0.001,
			collision_passes: 64,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ZoomConfig {
	pub min_scale: f64,
	pub max_scale: f64,
	/// Factor applied by the zoom in / out controls.
	pub step: f64,
	pub wheel_sensitivity: f64,
}

impl Default for ZoomConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.5,
			max_scale: 3.0,
			step: 1.2,
			wheel_sensitivity: 0.001,
		}
	}
}

impl ZoomConfig {
	/// Zoom factor for a wheel event; scrolling up zooms in.
	pub fn wheel_factor(&self, delta_y: f64) -> f64 {
		(-delta_y * self.wheel_sensitivity).exp()
	}
}

/// Gesture thresholds for one kind of pointer, in CSS pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerProfile {
	pub drag_threshold: f64,
	pub pan_threshold: f64,
	pub click_slop: f64,
	/// Alpha a drag reheats a resting simulation to.
	pub drag_alpha: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InteractionConfig {
	pub mouse: PointerProfile,
	pub touch: PointerProfile,
	pub click_window_ms: f64,
	/// Alpha used when the page becomes visible again.
	pub visibility_alpha: f64,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			mouse: PointerProfile {
				drag_threshold: 6.0,
				pan_threshold: 6.0,
				click_slop: 4.0,
				drag_alpha: 0.1,
			},
			touch: PointerProfile {
				drag_threshold: 6.0,
				pan_threshold: 8.0,
				click_slop: 6.0,
				drag_alpha: 0.2,
			},
			click_window_ms: 300.0,
			visibility_alpha: 0.15,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphConfig {
	pub simulation: SimulationConfig,
	pub zoom: ZoomConfig,
	pub interaction: InteractionConfig,
}
