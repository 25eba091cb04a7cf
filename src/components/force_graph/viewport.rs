use super::config::ZoomConfig;

/// Drawing surface size in CSS pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
	pub width: f64,
	pub height: f64,
	pub pixel_ratio: f64,
}

impl SurfaceSize {
	pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
		Self {
			width: width.max(0.0),
			height: height.max(0.0),
			pixel_ratio: if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 },
		}
	}

	pub fn pixel_width(&self) -> u32 {
		(self.width * self.pixel_ratio).floor() as u32
	}

	pub fn pixel_height(&self) -> u32 {
		(self.height * self.pixel_ratio).floor() as u32
	}

	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldRect {
	pub left: f64,
	pub top: f64,
	pub right: f64,
	pub bottom: f64,
}

impl WorldRect {
	pub fn inset(&self, pad: f64) -> Self {
		Self {
			left: self.left + pad,
			top: self.top + pad,
			right: self.right - pad,
			bottom: self.bottom - pad,
		}
	}

	/// Clamp a point into the rect. When the rect is inverted the low edge wins.
	pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
		(x.min(self.right).max(self.left), y.min(self.bottom).max(self.top))
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
	pub scale: f64,
	pub translate_x: f64,
	pub translate_y: f64,
	min_scale: f64,
	max_scale: f64,
}

impl Viewport {
	/// Unit scale with the world origin at the centre of `surface`.
	pub fn centered(surface: &SurfaceSize, zoom: &ZoomConfig) -> Self {
		let (cx, cy) = surface.center();
		Self {
			scale: 1.0,
			translate_x: cx,
			translate_y: cy,
			min_scale: zoom.min_scale.min(zoom.max_scale),
			max_scale: zoom.max_scale.max(zoom.min_scale),
		}
	}

	pub fn world_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
		(
			x * self.scale + self.translate_x,
			y * self.scale + self.translate_y,
		)
	}

	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.translate_x) / self.scale,
			(sy - self.translate_y) / self.scale,
		)
	}

	/// Multiply the scale by `factor`, keeping the world point under `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		self.set_scale_at(sx, sy, self.scale * factor);
	}

	pub fn set_scale_at(&mut self, sx: f64, sy: f64, scale: f64) {
		if !scale.is_finite() {
			return;
		}
		let (wx, wy) = self.screen_to_world(sx, sy);
		self.scale = scale.clamp(self.min_scale, self.max_scale);
		self.translate_x = sx - wx * self.scale;
		self.translate_y = sy - wy * self.scale;
	}

	pub fn pan(&mut self, dx: f64, dy: f64) {
		self.translate_x += dx;
		self.translate_y += dy;
	}

	pub fn visible_world(&self, surface: &SurfaceSize) -> WorldRect {
		let (left, top) = self.screen_to_world(0.0, 0.0);
		let (right, bottom) = self.screen_to_world(surface.width, surface.height);
		WorldRect {
			left,
			top,
			right,
			bottom,
		}
	}
}
