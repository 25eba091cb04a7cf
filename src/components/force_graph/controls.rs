use std::rc::{Rc, Weak};

use leptos::prelude::*;

use super::component::Runtime;

/// Handle for driving a mounted [`ForceGraphCanvas`](super::ForceGraphCanvas)
/// from outside, e.g. zoom buttons. Does nothing until a canvas attaches.
#[derive(Clone, Copy)]
pub struct GraphControls {
	runtime: StoredValue<Weak<Runtime>, LocalStorage>,
}

impl Default for GraphControls {
	fn default() -> Self {
		Self::new()
	}
}

impl GraphControls {
	pub fn new() -> Self {
		Self {
			runtime: StoredValue::new_local(Weak::new()),
		}
	}

	pub(super) fn attach(&self, runtime: &Rc<Runtime>) {
		let _ = self.runtime.try_update_value(|w| *w = Rc::downgrade(runtime));
	}

	pub(super) fn detach(&self) {
		let _ = self.runtime.try_update_value(|w| *w = Weak::new());
	}

	pub fn zoom_in(&self) {
		if let Some(runtime) = self.runtime() {
			runtime.zoom(true);
		}
	}

	pub fn zoom_out(&self) {
		if let Some(runtime) = self.runtime() {
			runtime.zoom(false);
		}
	}

	fn runtime(&self) -> Option<Rc<Runtime>> {
		self.runtime.try_with_value(Weak::upgrade).flatten()
	}
}
