mod build;
mod component;
mod config;
mod controls;
mod error;
mod interaction;
mod labels;
mod loader;
mod render;
mod simulation;
mod state;
mod types;
mod viewport;

pub use component::ForceGraphCanvas;
pub use controls::GraphControls;
pub use loader::{RESOURCES_URL, fetch_tree};
