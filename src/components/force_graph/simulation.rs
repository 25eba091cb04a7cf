use std::collections::HashMap;

use log::warn;

use super::config::SimulationConfig;
use super::labels::NodeLabel;
use super::types::{GraphData, GraphNode};
use super::viewport::WorldRect;

/// Shortfall below the minimum separation that still counts as touching.
const COLLISION_SLACK: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimLink {
	pub source: usize,
	pub target: usize,
	pub weight: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
	Running,
	Converged,
}

pub struct Simulation {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<SimLink>,
	labels: Vec<NodeLabel>,
	config: SimulationConfig,
	alpha: f64,
	pinned: Option<usize>,
	frames: u64,
}

impl Simulation {
	/// `labels` is indexed like `data.nodes`.
	pub fn new(data: GraphData, labels: Vec<NodeLabel>, config: SimulationConfig) -> Self {
		let index: HashMap<&str, usize> = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.as_str(), i))
			.collect();

		let links = data
			.links
			.iter()
			.filter_map(|link| {
				let (Some(&source), Some(&target)) =
					(index.get(link.source.as_str()), index.get(link.target.as_str()))
				else {
					warn!("dropping link {} -> {}: unknown endpoint", link.source, link.target);
					return None;
				};
				(source != target).then_some(SimLink {
					source,
					target,
					weight: link.weight,
				})
			})
			.collect();

		Self {
			nodes: data.nodes,
			links,
			labels,
			alpha: config.alpha_seed,
			config,
			pinned: None,
			frames: 0,
		}
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn frames(&self) -> u64 {
		self.frames
	}

	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	pub fn label(&self, idx: usize) -> Option<&NodeLabel> {
		self.labels.get(idx)
	}

	fn label_width(&self, idx: usize) -> f64 {
		self.labels.get(idx).map_or(0.0, |l| l.width)
	}

	pub fn is_running(&self) -> bool {
		!self.nodes.is_empty() && self.alpha >= self.config.alpha_min
	}

	/// Raise alpha to at least `alpha`, waking a resting simulation.
	pub fn reheat(&mut self, alpha: f64) {
		self.alpha = self.alpha.max(alpha);
	}

	pub fn pin(&mut self, idx: Option<usize>) {
		self.pinned = idx.filter(|&i| i < self.nodes.len());
	}

	/// Move a node directly, dropping whatever velocity it had.
	pub fn place(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.x = x;
			node.y = y;
			node.vx = 0.0;
			node.vy = 0.0;
		}
	}

	/// Advance one frame. `center` is the gravity well, `bounds` the visible world area.
	pub fn step(&mut self, center: (f64, f64), bounds: WorldRect) -> Step {
		if !self.is_running() {
			return Step::Converged;
		}

		self.apply_link_force();
		self.apply_charge_force();
		self.integrate(center, bounds.inset(self.config.boundary_pad));
		self.resolve_collisions();
		self.frames += 1;

		self.alpha *= self.config.alpha_decay;
		if self.alpha < self.config.alpha_min {
			Step::Converged
		} else {
			Step::Running
		}
	}

	fn apply_link_force(&mut self) {
		let cfg = &self.config;
		for k in 0..self.links.len() {
			let SimLink {
				source,
				target,
				weight,
			} = self.links[k];
			let label_span = (self.label_width(source) + self.label_width(target)) / 2.0;
			let (a, b) = pair_mut(&mut self.nodes, source, target);

			let (dx, dy) = (b.x - a.x, b.y - a.y);
			let dist = dx.hypot(dy).max(cfg.distance_epsilon);
			let desired = cfg.link_distance + label_span + cfg.label_pad + a.size + b.size;
			let force = (dist - desired) * cfg.link_strength * weight * self.alpha;
			let (nx, ny) = (dx / dist, dy / dist);

			a.vx += force * nx;
			a.vy += force * ny;
			b.vx -= force * nx;
			b.vy -= force * ny;
		}
	}

	fn apply_charge_force(&mut self) {
		let cfg = &self.config;
		let n = self.nodes.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let (a, b) = pair_mut(&mut self.nodes, i, j);
				let (dx, dy) = (b.x - a.x, b.y - a.y);
				let dist2 = dx * dx + dy * dy + cfg.charge_softening;
				let dist = dist2.sqrt().max(cfg.distance_epsilon);
				let force = cfg.charge * self.alpha / dist2;
				let (nx, ny) = (dx / dist, dy / dist);

				// negative charge pushes `a` away from `b`
				a.vx += force * nx;
				a.vy += force * ny;
				b.vx -= force * nx;
				b.vy -= force * ny;
			}
		}
	}

	fn integrate(&mut self, center: (f64, f64), bounds: WorldRect) {
		let cfg = &self.config;
		let pull = cfg.gravity * self.alpha;
		let max_speed = cfg.max_speed.abs();

		for (i, node) in self.nodes.iter_mut().enumerate() {
			if self.pinned == Some(i) {
				node.vx = 0.0;
				node.vy = 0.0;
				continue;
			}
			node.vx += (center.0 - node.x) * pull;
			node.vy += (center.1 - node.y) * pull;
			node.vx = (node.vx * cfg.damping).clamp(-max_speed, max_speed);
			node.vy = (node.vy * cfg.damping).clamp(-max_speed, max_speed);
			(node.x, node.y) = bounds.clamp(node.x + node.vx, node.y + node.vy);
		}
	}

	/// Push overlapping pairs apart, repeating until every pair is at least
	/// [`Simulation::min_separation`] apart or the pass budget runs out.
	fn resolve_collisions(&mut self) {
		for _ in 0..self.config.collision_passes.max(1) {
			if !self.collision_pass() {
				break;
			}
		}
	}

	fn collision_pass(&mut self) -> bool {
		let n = self.nodes.len();
		let eps = self.config.distance_epsilon;
		let pinned = self.pinned;
		let mut moved = false;
		for i in 0..n {
			for j in (i + 1)..n {
				let min_dist = self.min_separation(i, j);
				let (a, b) = pair_mut(&mut self.nodes, i, j);

				let (dx, dy) = (b.x - a.x, b.y - a.y);
				let raw = dx.hypot(dy);
				if raw >= min_dist - COLLISION_SLACK {
					continue;
				}
				// coincident nodes have no axis of their own, split them horizontally
				let (nx, ny, dist) = if raw < eps {
					(1.0, 0.0, eps)
				} else {
					(dx / raw, dy / raw, raw)
				};
				let overlap = min_dist - dist;
				let (shift_a, shift_b) = match pinned {
					Some(p) if p == i => (0.0, overlap),
					Some(p) if p == j => (overlap, 0.0),
					_ => (overlap / 2.0, overlap / 2.0),
				};
				a.x -= nx * shift_a;
				a.y -= ny * shift_a;
				b.x += nx * shift_b;
				b.y += ny * shift_b;
				moved = true;
			}
		}
		moved
	}

	/// Closest two nodes may sit, counting their radii and labels.
	pub fn min_separation(&self, i: usize, j: usize) -> f64 {
		let (a, b) = (&self.nodes[i], &self.nodes[j]);
		self.config.node_spacing
			+ (self.label_width(i) + self.label_width(j)) / 2.0
			+ self.config.label_pad
			+ a.size
			+ b.size
	}
}

/// Number of frames until `seed` decays below `floor` at rate `decay`.
pub fn frames_to_converge(seed: f64, decay: f64, floor: f64) -> u64 {
	if seed < floor {
		return 0;
	}
	((floor / seed).ln() / decay.ln()).floor() as u64 + 1
}

fn pair_mut(nodes: &mut [GraphNode], i: usize, j: usize) -> (&mut GraphNode, &mut GraphNode) {
	debug_assert_ne!(i, j);
	if i < j {
		let (lo, hi) = nodes.split_at_mut(j);
		(&mut lo[i], &mut hi[0])
	} else {
		let (lo, hi) = nodes.split_at_mut(i);
		(&mut hi[0], &mut lo[j])
	}
}
