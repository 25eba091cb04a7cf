use std::collections::HashSet;
use std::f64::consts::TAU;

use rand::Rng;

use super::types::{GraphData, GraphLink, GraphNode, InputNode, NodeKind};

pub const PATH_SEPARATOR: &str = "/";
/// Resources are joined with a doubled separator so they never collide with a category path.
pub const RESOURCE_SEPARATOR: &str = "//";

const SPAWN_RADIUS: f64 = 100.0;
const CATEGORY_WEIGHT: f64 = 1.0;
const RESOURCE_WEIGHT: f64 = 0.5;

/// Flatten a resource tree into nodes and weighted links.
///
/// Structure depends only on `root`; the rng only scatters initial positions.
pub fn build_graph<R: Rng + ?Sized>(root: &InputNode, rng: &mut R) -> GraphData {
	let mut builder = Builder {
		rng,
		data: GraphData::default(),
		ids: HashSet::new(),
	};
	builder.walk(root, None);
	builder.data
}

struct Builder<'a, R: Rng + ?Sized> {
	rng: &'a mut R,
	data: GraphData,
	ids: HashSet<String>,
}

impl<R: Rng + ?Sized> Builder<'_, R> {
	fn walk(&mut self, node: &InputNode, parent: Option<&str>) {
		let (id, kind) = match parent {
			Some(parent) => (
				self.unique_id(format!("{parent}{PATH_SEPARATOR}{}", node.name)),
				NodeKind::Category,
			),
			None => (self.unique_id(node.name.clone()), NodeKind::Root),
		};
		self.add_node(&id, &node.name, kind, None);
		if let Some(parent) = parent {
			self.add_link(parent, &id, CATEGORY_WEIGHT);
		}

		for child in &node.children {
			self.walk(child, Some(&id));
		}
		for resource in &node.resources {
			let rid = self.unique_id(format!("{id}{RESOURCE_SEPARATOR}{}", resource.title));
			self.add_node(&rid, &resource.title, NodeKind::Resource, Some(&resource.url));
			self.add_link(&id, &rid, RESOURCE_WEIGHT);
		}
	}

	/// Siblings sharing a name get a numbered suffix on the id (the label stays as-is).
	fn unique_id(&mut self, base: String) -> String {
		if self.ids.insert(base.clone()) {
			return base;
		}
		let mut n = 2;
		loop {
			let candidate = format!("{base} ({n})");
			if self.ids.insert(candidate.clone()) {
				return candidate;
			}
			n += 1;
		}
	}

	fn add_node(&mut self, id: &str, label: &str, kind: NodeKind, href: Option<&str>) {
		// Uniform in a disk; coincident spawn points would zero out the first forces.
		let angle = self.rng.gen_range(0.0..TAU);
		let r = SPAWN_RADIUS * self.rng.gen_range(0.0f64..1.0).sqrt();
		self.data.nodes.push(GraphNode {
			id: id.to_string(),
			label: label.to_string(),
			kind,
			x: r * angle.cos(),
			y: r * angle.sin(),
			vx: 0.0,
			vy: 0.0,
			size: kind.radius(),
			color: kind.color(),
			href: href.map(str::to_string),
		});
	}

	fn add_link(&mut self, source: &str, target: &str, weight: f64) {
		self.data.links.push(GraphLink {
			source: source.to_string(),
			target: target.to_string(),
			weight,
		});
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::components::force_graph::types::Resource;

	fn resource(title: &str, url: &str) -> Resource {
		Resource {
			title: title.to_string(),
			url: url.to_string(),
			platform: None,
			channel: None,
			resource_type: None,
			authors: Vec::new(),
			language: None,
		}
	}

	fn category(name: &str, children: Vec<InputNode>, resources: Vec<Resource>) -> InputNode {
		InputNode {
			name: name.to_string(),
			children,
			resources,
		}
	}

	fn sample_tree() -> InputNode {
		category(
			"Root",
			vec![
				category(
					"Rust",
					vec![category(
						"Async",
						vec![],
						vec![resource("Tokio", "https://tokio.rs/tokio/tutorial")],
					)],
					vec![
						resource("The Book", "https://doc.rust-lang.org/book/"),
						resource("Rustlings", "https://github.com/rust-lang/rustlings"),
					],
				),
				category("Empty", vec![], vec![]),
			],
			vec![resource("Index", "https://example.test/")],
		)
	}

	fn ids(data: &GraphData) -> Vec<String> {
		data.nodes.iter().map(|n| n.id.clone()).collect()
	}

	#[test]
	fn single_category_scenario() {
		let tree = category(
			"Root",
			vec![category("Cat A", vec![], vec![resource("R1", "https://x.test/a")])],
			vec![],
		);
		let data = build_graph(&tree, &mut StdRng::seed_from_u64(7));

		assert_eq!(ids(&data), vec!["Root", "Root/Cat A", "Root/Cat A//R1"]);
		assert_eq!(
			data.links,
			vec![
				GraphLink {
					source: "Root".into(),
					target: "Root/Cat A".into(),
					weight: 1.0,
				},
				GraphLink {
					source: "Root/Cat A".into(),
					target: "Root/Cat A//R1".into(),
					weight: 0.5,
				},
			]
		);
		assert_eq!(data.nodes[2].href.as_deref(), Some("https://x.test/a"));
		assert_eq!(data.nodes[0].kind, NodeKind::Root);
		assert_eq!(data.nodes[1].kind, NodeKind::Category);
		assert_eq!(data.nodes[2].kind, NodeKind::Resource);
	}

	#[test]
	fn structure_is_deterministic_across_builds() {
		let tree = sample_tree();
		let a = build_graph(&tree, &mut StdRng::seed_from_u64(1));
		let b = build_graph(&tree, &mut StdRng::seed_from_u64(99));

		assert_eq!(ids(&a), ids(&b));
		assert_eq!(a.links, b.links);
		// positions are the only thing the rng touches
		assert!(a.nodes.iter().zip(&b.nodes).any(|(x, y)| x.x != y.x));
	}

	#[test]
	fn counts_match_tree_shape() {
		let data = build_graph(&sample_tree(), &mut StdRng::seed_from_u64(3));
		// 1 root + 3 categories + 4 resources
		assert_eq!(data.nodes.len(), 8);
		assert_eq!(data.links.len(), 7);
	}

	#[test]
	fn links_reference_existing_nodes() {
		let data = build_graph(&sample_tree(), &mut StdRng::seed_from_u64(3));
		let ids: HashSet<&str> = data.nodes.iter().map(|n| n.id.as_str()).collect();
		for link in &data.links {
			assert!(ids.contains(link.source.as_str()), "{}", link.source);
			assert!(ids.contains(link.target.as_str()), "{}", link.target);
		}
	}

	#[test]
	fn initial_positions_lie_in_spawn_disk() {
		let data = build_graph(&sample_tree(), &mut StdRng::seed_from_u64(11));
		for node in &data.nodes {
			assert!((node.x * node.x + node.y * node.y).sqrt() <= SPAWN_RADIUS);
			assert_eq!((node.vx, node.vy), (0.0, 0.0));
		}
	}

	#[test]
	fn resource_and_category_with_same_name_do_not_collide() {
		let tree = category(
			"Root",
			vec![category("Docs", vec![], vec![])],
			vec![resource("Docs", "https://docs.test/")],
		);
		let data = build_graph(&tree, &mut StdRng::seed_from_u64(0));
		assert_eq!(ids(&data), vec!["Root", "Root/Docs", "Root//Docs"]);
	}

	#[test]
	fn duplicate_sibling_names_get_unique_ids() {
		let tree = category(
			"Root",
			vec![
				category("Dup", vec![], vec![resource("R", "https://a.test/")]),
				category("Dup", vec![], vec![resource("R", "https://b.test/")]),
			],
			vec![],
		);
		let data = build_graph(&tree, &mut StdRng::seed_from_u64(0));

		assert_eq!(
			ids(&data),
			vec!["Root", "Root/Dup", "Root/Dup//R", "Root/Dup (2)", "Root/Dup (2)//R"]
		);
		assert_eq!(data.nodes[3].label, "Dup");
		assert_eq!(data.links[3].source, "Root/Dup (2)");
		assert_eq!(data.links.len(), 4);
	}

	#[test]
	fn lone_root_has_no_links() {
		let tree = category("Alone", vec![], vec![]);
		let data = build_graph(&tree, &mut StdRng::seed_from_u64(0));
		assert_eq!(ids(&data), vec!["Alone"]);
		assert!(data.links.is_empty());
	}
}
