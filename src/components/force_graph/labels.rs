use std::borrow::Cow;

use url::Url;

use super::types::GraphNode;

pub const LABEL_MAX_CHARS: usize = 22;
pub const LABEL_FONT: &str = "11px ui-sans-serif, system-ui, -apple-system";
pub const TOOLTIP_FONT: &str = "12px ui-sans-serif, system-ui, -apple-system";
pub const SUBTITLE_FONT: &str = LABEL_FONT;

const ELLIPSIS: char = '…';

/// Anything that can report the rendered width of a string in a CSS font.
pub trait TextMeasure {
	fn text_width(&self, font: &str, text: &str) -> f64;
}

/// Width estimate from the font's pixel size, for when no canvas is around.
#[derive(Clone, Copy, Debug)]
pub struct EstimatedMeasure {
	pub char_width_ratio: f64,
}

impl Default for EstimatedMeasure {
	fn default() -> Self {
		Self {
			char_width_ratio: 0.6,
		}
	}
}

impl TextMeasure for EstimatedMeasure {
	fn text_width(&self, font: &str, text: &str) -> f64 {
		let px = font
			.split_whitespace()
			.find_map(|part| part.strip_suffix("px")?.parse::<f64>().ok())
			.unwrap_or(10.0);
		text.chars().count() as f64 * px * self.char_width_ratio
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeLabel {
	pub short: String,
	pub width: f64,
	pub host: Option<String>,
}

pub fn measure_labels<M: TextMeasure + ?Sized>(nodes: &[GraphNode], measure: &M) -> Vec<NodeLabel> {
	nodes
		.iter()
		.map(|node| {
			let short = ellipsis(&node.label, LABEL_MAX_CHARS).into_owned();
			let width = measure.text_width(LABEL_FONT, &short);
			NodeLabel {
				short,
				width,
				host: node.href.as_deref().map(link_host),
			}
		})
		.collect()
}

/// Cut `text` to at most `max` characters, ending in an ellipsis when shortened.
pub fn ellipsis(text: &str, max: usize) -> Cow<'_, str> {
	if text.chars().count() <= max {
		return Cow::Borrowed(text);
	}
	let mut short: String = text.chars().take(max.saturating_sub(1)).collect();
	short.push(ELLIPSIS);
	Cow::Owned(short)
}

/// Host name shown under a linked node's tooltip; the raw href when it does not parse.
pub fn link_host(href: &str) -> String {
	Url::parse(href)
		.ok()
		.and_then(|url| url.host_str().map(str::to_string))
		.unwrap_or_else(|| href.to_string())
}
