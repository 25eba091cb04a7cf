use leptos::prelude::*;
use log::error;

use crate::components::force_graph::{
	ForceGraphCanvas, GraphControls, RESOURCES_URL, fetch_tree,
};

const HINTS: [&str; 8] = [
	"Drag nodes to reposition.",
	"Drag background to pan.",
	"Scroll or pinch to zoom. You can also use the + / − controls.",
	"Hover for full labels and link host.",
	"Tap or click resource nodes to open in a new tab.",
	"Labels are shortened and spaced so they do not collide.",
	"Drawn at the screen's native pixel density.",
	"Layout pauses while the tab is hidden.",
];

/// Resource graph page: loads the tree and mounts the canvas with zoom controls.
#[component]
pub fn Graph() -> impl IntoView {
	let tree = LocalResource::new(|| fetch_tree(RESOURCES_URL));
	let controls = GraphControls::new();

	view! {
		<div class="page">
			<h1>"Resources Graph"</h1>
			<div class="graph-frame">
				<div class="graph-zoom">
					<button
						type="button"
						aria-label="Zoom in"
						title="Zoom in"
						on:click=move |_| controls.zoom_in()
					>
						"+"
					</button>
					<button
						type="button"
						aria-label="Zoom out"
						title="Zoom out"
						on:click=move |_| controls.zoom_out()
					>
						"−"
					</button>
				</div>
				{move || match tree.get() {
					None => view! { <p class="graph-status">"Loading..."</p> }.into_any(),
					Some(Err(err)) => {
						error!("could not load {RESOURCES_URL}: {err}");
						view! { <p class="graph-status graph-error">{err.to_string()}</p> }.into_any()
					}
					Some(Ok(tree)) => view! { <ForceGraphCanvas tree=tree controls=controls /> }.into_any(),
				}}
			</div>
			<ul class="graph-hints">
				{HINTS.iter().map(|hint| view! { <li>{*hint}</li> }).collect_view()}
			</ul>
		</div>
	}
}
