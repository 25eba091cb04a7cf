use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors that can occur while fetching the resource tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
	/// The request never produced a response
	#[error("network error: {0}")]
	Network(String),

	/// The server answered with a non-success status
	#[error("request failed with status {0}")]
	Status(u16),

	/// The response body could not be read as text
	#[error("could not read response body: {0}")]
	Body(String),

	/// The body is not a valid resource tree
	#[error("invalid resource tree: {0}")]
	Parse(String),
}

impl From<serde_json::Error> for LoadError {
	fn from(err: serde_json::Error) -> Self {
		LoadError::Parse(err.to_string())
	}
}

/// Errors that can occur while attaching to the canvas.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
	#[error("2d canvas context unavailable: {0}")]
	Context(String),
}

/// Readable text for a thrown JS value.
pub fn describe_js(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_are_readable() {
		assert_eq!(LoadError::Status(404).to_string(), "request failed with status 404");
		assert_eq!(
			SurfaceError::Context("no context".into()).to_string(),
			"2d canvas context unavailable: no context"
		);
	}

	#[test]
	fn json_errors_become_parse_errors() {
		let err = serde_json::from_str::<serde_json::Value>("{").map_err(LoadError::from);
		assert!(matches!(err, Err(LoadError::Parse(_))));
	}
}
