use std::collections::HashMap;
use std::f64::consts::PI;

use super::geometry::{self, BOUNDARY_MARGIN};
use super::types::{NodeId, Position, SubConcept, Viewport};

const LAYOUT_RADIUS: f64 = 0.3;
const JITTER_SPAN: f64 = 0.05;

/// Deterministic jitter in `[-JITTER_SPAN/2, JITTER_SPAN/2)` derived from a
/// node id, so re-running the initializer reproduces the same placement.
fn jitter(seed: u32) -> f64 {
	let x = ((seed as u64 + 1) * 9301 + 49297) % 233280;
	(x as f64 / 233280.0 - 0.5) * JITTER_SPAN
}

/// Exclusive owner of the normalized position maps, one per concept id.
/// Everything else reads positions through here; only drag updates and
/// overlap resolution mutate them.
#[derive(Clone, Debug, Default)]
pub struct LayoutManager {
	by_concept: HashMap<u32, HashMap<NodeId, Position>>,
}

impl LayoutManager {
	pub fn new() -> Self {
		Self::default()
	}

	/// Place every node id the map has not seen before on a jittered circle
	/// around the viewport center. Known ids keep their stored position
	/// unchanged, so re-running with the same node list is a no-op.
	pub fn ensure_positions(&mut self, concept_id: u32, nodes: &[SubConcept]) {
		let map = self.by_concept.entry(concept_id).or_default();
		let count = nodes.len().max(1);
		for (index, node) in nodes.iter().enumerate() {
			if map.contains_key(&node.id) {
				continue;
			}
			let angle = 2.0 * PI * index as f64 / count as f64;
			let position = Position {
				x: 0.5 + LAYOUT_RADIUS * angle.cos() + jitter(node.id),
				y: 0.5 + LAYOUT_RADIUS * angle.sin() + jitter(node.id.wrapping_add(7)),
			}
			.clamped(BOUNDARY_MARGIN);
			map.insert(node.id, position);
		}
	}

	pub fn position(&self, concept_id: u32, node: NodeId) -> Option<Position> {
		self.by_concept.get(&concept_id)?.get(&node).copied()
	}

	pub fn positions(&self, concept_id: u32) -> Option<&HashMap<NodeId, Position>> {
		self.by_concept.get(&concept_id)
	}

	/// Drag-controller write path. The caller has already clamped.
	pub fn set_position(&mut self, concept_id: u32, node: NodeId, position: Position) {
		self.by_concept
			.entry(concept_id)
			.or_default()
			.insert(node, position);
	}

	/// One repulsion pass over the concept's node set, run after drag release
	/// and after resize.
	pub fn resolve(&mut self, concept_id: u32, node_ids: &[NodeId], viewport: Viewport) {
		if let Some(map) = self.by_concept.get_mut(&concept_id) {
			geometry::resolve_overlap(node_ids, map, viewport);
		}
	}

	/// Read-only copy of the active mapping, for callers that want to
	/// persist a layout.
	pub fn snapshot(&self, concept_id: u32) -> HashMap<NodeId, Position> {
		self.by_concept.get(&concept_id).cloned().unwrap_or_default()
	}

	/// Wholesale dataset replacement destroys all stored positions.
	pub fn clear(&mut self) {
		self.by_concept.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn nodes(names: &[&str]) -> Vec<SubConcept> {
		names
			.iter()
			.enumerate()
			.map(|(i, name)| SubConcept {
				id: i as NodeId + 1,
				name: (*name).into(),
				connections: Vec::new(),
			})
			.collect()
	}

	#[test]
	fn initializer_is_idempotent() {
		let mut layout = LayoutManager::new();
		let set = nodes(&["A", "B", "C"]);
		layout.ensure_positions(1, &set);
		let first = layout.snapshot(1);
		layout.ensure_positions(1, &set);
		assert_eq!(layout.snapshot(1), first);
	}

	#[test]
	fn placement_stays_inside_clamp_bounds() {
		let mut layout = LayoutManager::new();
		let set = nodes(&["A", "B", "C", "D", "E", "F", "G", "H"]);
		layout.ensure_positions(1, &set);
		for node in &set {
			let pos = layout.position(1, node.id).unwrap();
			assert!(pos.x >= 0.15 && pos.x <= 0.85);
			assert!(pos.y >= 0.15 && pos.y <= 0.85);
		}
	}

	#[test]
	fn known_ids_survive_new_arrivals() {
		let mut layout = LayoutManager::new();
		let mut set = nodes(&["A", "B"]);
		layout.ensure_positions(1, &set);
		let kept = layout.position(1, 1).unwrap();
		set.push(SubConcept {
			id: 9,
			name: "C".into(),
			connections: Vec::new(),
		});
		layout.ensure_positions(1, &set);
		assert_eq!(layout.position(1, 1), Some(kept));
		assert!(layout.position(1, 9).is_some());
	}

	#[test]
	fn single_node_concept_gets_a_position() {
		let mut layout = LayoutManager::new();
		layout.ensure_positions(1, &nodes(&["only"]));
		assert!(layout.position(1, 1).is_some());
	}

	#[test]
	fn empty_node_list_yields_empty_map() {
		let mut layout = LayoutManager::new();
		layout.ensure_positions(1, &[]);
		assert!(layout.snapshot(1).is_empty());
	}

	#[test]
	fn concepts_do_not_share_positions() {
		let mut layout = LayoutManager::new();
		let set = nodes(&["A"]);
		layout.ensure_positions(1, &set);
		layout.set_position(1, 1, Position { x: 0.2, y: 0.2 });
		layout.ensure_positions(2, &set);
		assert_ne!(layout.position(2, 1), Some(Position { x: 0.2, y: 0.2 }));
	}

	#[test]
	fn scenario_resize_then_resolve_keeps_clamp_bounds() {
		let mut layout = LayoutManager::new();
		let set = nodes(&["A", "B"]);
		layout.ensure_positions(1, &set);
		layout.resolve(1, &[1, 2], Viewport::new(600.0, 400.0));
		// Narrower panel: resolve again with the new size.
		layout.resolve(1, &[1, 2], Viewport::new(300.0, 400.0));
		for id in [1, 2] {
			let pos = layout.position(1, id).unwrap();
			assert!(pos.x >= 0.15 && pos.x <= 0.85);
			assert!(pos.y >= 0.15 && pos.y <= 0.85);
		}
	}
}
