use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::error::{LoadError, describe_js};
use super::types::InputNode;

/// Where the page looks for its data, relative to the site root.
pub const RESOURCES_URL: &str = "/resources.json";

pub async fn fetch_tree(url: &str) -> Result<InputNode, LoadError> {
	let window = web_sys::window().ok_or_else(|| LoadError::Network("no window".into()))?;
	debug!("fetching {url}");

	let response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(|e| LoadError::Network(describe_js(&e)))?;
	let response: Response = response
		.dyn_into()
		.map_err(|e| LoadError::Network(describe_js(&e)))?;
	if !response.ok() {
		warn!("{url} answered {}", response.status());
		return Err(LoadError::Status(response.status()));
	}

	let body = response.text().map_err(|e| LoadError::Body(describe_js(&e)))?;
	let text = JsFuture::from(body)
		.await
		.map_err(|e| LoadError::Body(describe_js(&e)))?
		.as_string()
		.ok_or_else(|| LoadError::Body("body is not text".into()))?;

	parse_tree(&text)
}

pub fn parse_tree(text: &str) -> Result<InputNode, LoadError> {
	Ok(serde_json::from_str(text)?)
}
