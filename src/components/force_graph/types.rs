use serde::Deserialize;

/// A leaf entry of the resource tree.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Resource {
	pub title: String,
	pub url: String,
	#[serde(default)]
	pub platform: Option<String>,
	#[serde(default)]
	pub channel: Option<String>,
	#[serde(default)]
	pub resource_type: Option<String>,
	#[serde(default)]
	pub authors: Vec<String>,
	#[serde(default)]
	pub language: Option<String>,
}

/// A category of the resource tree, as served by `/resources.json`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct InputNode {
	pub name: String,
	#[serde(default)]
	pub children: Vec<InputNode>,
	#[serde(default)]
	pub resources: Vec<Resource>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
	Root,
	Category,
	Resource,
}

impl NodeKind {
	pub fn radius(self) -> f64 {
		match self {
			NodeKind::Root => 8.0,
			NodeKind::Category => 5.0,
			NodeKind::Resource => 4.0,
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			NodeKind::Root => "#22d3ee",
			NodeKind::Category => "#a78bfa",
			NodeKind::Resource => "#60a5fa",
		}
	}
}

#[derive(Clone, Debug)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	pub kind: NodeKind,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub size: f64,
	pub color: &'static str,
	pub href: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	pub weight: f64,
}

#[derive(Clone, Debug, Default)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn input_tree_optional_fields_default() {
		let json = r#"{
			"name": "Root",
			"children": [
				{ "name": "Cat A", "resources": [
					{ "title": "R1", "url": "https://x.test/a", "authors": ["Ada"] }
				] },
				{ "name": "Cat B" }
			]
		}"#;
		let root: InputNode = serde_json::from_str(json).unwrap();

		assert_eq!(root.children.len(), 2);
		assert!(root.resources.is_empty());
		assert!(root.children[1].children.is_empty());
		let r1 = &root.children[0].resources[0];
		assert_eq!(r1.url, "https://x.test/a");
		assert_eq!(r1.authors, vec!["Ada".to_string()]);
		assert_eq!(r1.platform, None);
	}

	#[test]
	fn kinds_are_visually_distinct() {
		let kinds = [NodeKind::Root, NodeKind::Category, NodeKind::Resource];
		for (i, a) in kinds.iter().enumerate() {
			for b in &kinds[i + 1..] {
				assert_ne!(a.color(), b.color());
				assert_ne!(a.radius(), b.radius());
			}
		}
	}
}
