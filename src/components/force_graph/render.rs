use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::labels::{LABEL_FONT, SUBTITLE_FONT, TOOLTIP_FONT, TextMeasure};
use super::state::ForceGraphState;
use super::viewport::{SurfaceSize, Viewport};

const EDGE_COLOR: &str = "rgba(255, 255, 255, 0.2)";
const LABEL_COLOR: &str = "rgba(255, 255, 255, 0.85)";
const TOOLTIP_BG: &str = "rgba(0, 0, 0, 0.7)";
const TOOLTIP_TITLE: &str = "#ffffff";
const TOOLTIP_SUBTITLE: &str = "#a5b4fc";
const RING_COLOR: &str = "rgba(255, 255, 255, 0.5)";

const LABEL_OFFSET: (f64, f64) = (4.0, 4.0);
const TOOLTIP_PAD_X: f64 = 6.0;
const TOOLTIP_PAD_Y: f64 = 4.0;
const TOOLTIP_LINE: f64 = 18.0;
const TOOLTIP_GAP: f64 = 8.0;
const TOOLTIP_MARGIN: f64 = 8.0;
const RING_GAP: f64 = 6.0;
const RING_WIDTH: f64 = 2.0;

/// Drawing primitives the renderer needs. Coordinates are in whatever space
/// the last [`Painter::push_view`] set up.
pub trait Painter: TextMeasure {
	/// Reset to device pixels for `surface` and clear it.
	fn begin_frame(&self, surface: &SurfaceSize);
	fn push_view(&self, viewport: &Viewport);
	fn pop_view(&self);
	fn stroke_segments(&self, segments: &[((f64, f64), (f64, f64))], color: &str, width: f64);
	fn fill_circle(&self, x: f64, y: f64, radius: f64, color: &str);
	fn stroke_circle(&self, x: f64, y: f64, radius: f64, color: &str, width: f64);
	fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64, color: &str);
	fn fill_text(&self, text: &str, x: f64, y: f64, font: &str, color: &str);
}

impl TextMeasure for CanvasRenderingContext2d {
	fn text_width(&self, font: &str, text: &str) -> f64 {
		self.set_font(font);
		self.measure_text(text).map_or(0.0, |m| m.width())
	}
}

impl Painter for CanvasRenderingContext2d {
	fn begin_frame(&self, surface: &SurfaceSize) {
		let ratio = surface.pixel_ratio;
		let _ = self.set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0);
		self.clear_rect(0.0, 0.0, surface.width, surface.height);
	}

	fn push_view(&self, viewport: &Viewport) {
		self.save();
		let _ = self.translate(viewport.translate_x, viewport.translate_y);
		let _ = self.scale(viewport.scale, viewport.scale);
	}

	fn pop_view(&self) {
		self.restore();
	}

	fn stroke_segments(&self, segments: &[((f64, f64), (f64, f64))], color: &str, width: f64) {
		self.set_stroke_style_str(color);
		self.set_line_width(width);
		self.begin_path();
		for &((x1, y1), (x2, y2)) in segments {
			self.move_to(x1, y1);
			self.line_to(x2, y2);
		}
		self.stroke();
	}

	fn fill_circle(&self, x: f64, y: f64, radius: f64, color: &str) {
		self.set_fill_style_str(color);
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, TAU);
		self.fill();
	}

	fn stroke_circle(&self, x: f64, y: f64, radius: f64, color: &str, width: f64) {
		self.set_stroke_style_str(color);
		self.set_line_width(width);
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, TAU);
		self.stroke();
	}

	fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64, color: &str) {
		self.set_fill_style_str(color);
		CanvasRenderingContext2d::fill_rect(self, x, y, width, height);
	}

	fn fill_text(&self, text: &str, x: f64, y: f64, font: &str, color: &str) {
		self.set_font(font);
		self.set_fill_style_str(color);
		let _ = CanvasRenderingContext2d::fill_text(self, text, x, y);
	}
}

/// Hover box for a node, laid out in screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
	pub title: String,
	pub subtitle: Option<String>,
	/// Highlight ring `(x, y, radius)` around a linked node.
	pub ring: Option<(f64, f64, f64)>,
}

pub fn tooltip<M: TextMeasure + ?Sized>(state: &ForceGraphState, measure: &M) -> Option<Tooltip> {
	let idx = state.hover?;
	let node = state.sim.nodes.get(idx)?;
	let viewport = &state.viewport;
	let subtitle = state.sim.label(idx).and_then(|l| l.host.clone());

	let title_width = measure.text_width(TOOLTIP_FONT, &node.label);
	let subtitle_width = subtitle
		.as_deref()
		.map_or(0.0, |s| measure.text_width(SUBTITLE_FONT, s));
	let lines = if subtitle.is_some() { 2.0 } else { 1.0 };
	let width = title_width.max(subtitle_width) + TOOLTIP_PAD_X * 2.0;
	let height = lines * TOOLTIP_LINE + TOOLTIP_PAD_Y * 2.0;

	let (ax, ay) = viewport.world_to_screen(node.x + node.size + TOOLTIP_GAP, node.y);
	let x = ax
		.min(state.surface.width - width - TOOLTIP_MARGIN)
		.max(TOOLTIP_MARGIN);
	let y = (ay - height / 2.0)
		.min(state.surface.height - height - TOOLTIP_MARGIN)
		.max(TOOLTIP_MARGIN);

	let ring = node.href.as_ref().map(|_| {
		let (cx, cy) = viewport.world_to_screen(node.x, node.y);
		(cx, cy, node.size * viewport.scale + RING_GAP)
	});

	Some(Tooltip {
		x,
		y,
		width,
		height,
		title: node.label.clone(),
		subtitle,
		ring,
	})
}

/// Paint one frame: edges, nodes, labels, then the hover tooltip on top.
pub fn render<P: Painter + ?Sized>(state: &ForceGraphState, painter: &P) {
	painter.begin_frame(&state.surface);
	painter.push_view(&state.viewport);
	draw_edges(state, painter);
	draw_nodes(state, painter);
	painter.pop_view();

	if let Some(tip) = tooltip(state, painter) {
		draw_tooltip(&tip, painter);
	}
}

fn draw_edges<P: Painter + ?Sized>(state: &ForceGraphState, painter: &P) {
	let nodes = &state.sim.nodes;
	let segments: Vec<_> = state
		.sim
		.links
		.iter()
		.map(|link| {
			let (a, b) = (&nodes[link.source], &nodes[link.target]);
			((a.x, a.y), (b.x, b.y))
		})
		.collect();
	if segments.is_empty() {
		return;
	}
	// one screen pixel regardless of zoom
	painter.stroke_segments(&segments, EDGE_COLOR, 1.0 / state.viewport.scale);
}

fn draw_nodes<P: Painter + ?Sized>(state: &ForceGraphState, painter: &P) {
	for node in &state.sim.nodes {
		painter.fill_circle(node.x, node.y, node.size, node.color);
	}
	for (idx, node) in state.sim.nodes.iter().enumerate() {
		let Some(label) = state.sim.label(idx) else {
			continue;
		};
		if label.short.is_empty() {
			continue;
		}
		painter.fill_text(
			&label.short,
			node.x + node.size + LABEL_OFFSET.0,
			node.y + LABEL_OFFSET.1,
			LABEL_FONT,
			LABEL_COLOR,
		);
	}
}

fn draw_tooltip<P: Painter + ?Sized>(tip: &Tooltip, painter: &P) {
	painter.fill_rect(tip.x, tip.y, tip.width, tip.height, TOOLTIP_BG);
	let text_x = tip.x + TOOLTIP_PAD_X;
	painter.fill_text(&tip.title, text_x, tip.y + TOOLTIP_LINE, TOOLTIP_FONT, TOOLTIP_TITLE);
	if let Some(subtitle) = &tip.subtitle {
		painter.fill_text(
			subtitle,
			text_x,
			tip.y + TOOLTIP_LINE * 2.0,
			SUBTITLE_FONT,
			TOOLTIP_SUBTITLE,
		);
	}
	if let Some((x, y, radius)) = tip.ring {
		painter.stroke_circle(x, y, radius, RING_COLOR, RING_WIDTH);
	}
}
