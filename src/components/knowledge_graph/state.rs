use std::collections::HashMap;

use log::debug;

use super::drag::DragController;
use super::layout::LayoutManager;
use super::navigator::ConceptNavigator;
use super::types::{Concept, ConceptUpdate, EdgePair, NodeId, Position, Viewport};

/// Dash-offset wrap period, matching the `[dash, gap]` pattern length.
const FLOW_PERIOD: f64 = 20.0;
/// Dash-offset advance per millisecond.
const FLOW_RATE: f64 = 0.02;

/// One directed connection resolved to pixel endpoints, ready to stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeSegment {
	pub from: (f64, f64),
	pub to: (f64, f64),
	pub highlighted: bool,
}

/// The whole engine behind one plain event interface: pointer presses,
/// moves and releases, resize, animation ticks, and dataset merges. Owns the
/// position store exclusively; the canvas pass and the DOM badges are
/// read-only projections of the same state, so the two surfaces cannot
/// drift apart.
#[derive(Clone, Debug, Default)]
pub struct GraphState {
	navigator: ConceptNavigator,
	layout: LayoutManager,
	drag: DragController,
	viewport: Viewport,
	flow_offset: f64,
}

impl GraphState {
	pub fn new() -> Self {
		Self::default()
	}

	/// Merge an incremental payload and lay out any newly arrived nodes of
	/// the active concept. Safe to call repeatedly with the same payload.
	pub fn sync(&mut self, updates: &[ConceptUpdate]) {
		self.navigator.apply_updates(updates);
		self.ensure_active_layout();
	}

	/// Wholesale replacement: drops every concept and every stored position
	/// before applying the payload as a first load.
	pub fn replace_all(&mut self, updates: &[ConceptUpdate]) {
		self.navigator.reset();
		self.layout.clear();
		self.drag.abort();
		self.sync(updates);
	}

	fn ensure_active_layout(&mut self) {
		if let Some(concept) = self.navigator.active() {
			let (id, nodes) = (concept.id, concept.sub_concepts.clone());
			self.layout.ensure_positions(id, &nodes);
		}
	}

	pub fn active_concept(&self) -> Option<&Concept> {
		self.navigator.active()
	}

	pub fn active_index(&self) -> usize {
		self.navigator.active_index()
	}

	pub fn concept_count(&self) -> usize {
		self.navigator.len()
	}

	pub fn next_concept(&mut self) {
		self.drag.abort();
		self.navigator.next();
		self.ensure_active_layout();
	}

	pub fn prev_concept(&mut self) {
		self.drag.abort();
		self.navigator.prev();
		self.ensure_active_layout();
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// New container size. Overlaps are re-resolved for the active concept
	/// only, bounding the cost of a resize storm; a zero-area size (panel
	/// collapsed) is recorded but triggers no resolution.
	pub fn on_resize(&mut self, viewport: Viewport) {
		self.viewport = viewport;
		if viewport.is_zero_area() {
			debug!("zero-area viewport, skipping overlap resolution");
			return;
		}
		self.resolve_active();
	}

	/// Advance the dash-flow clock.
	pub fn on_tick(&mut self, dt_ms: f64) {
		self.flow_offset = (self.flow_offset + dt_ms * FLOW_RATE) % FLOW_PERIOD;
	}

	pub fn flow_offset(&self) -> f64 {
		self.flow_offset
	}

	/// Pointer or primary-touch press on a node badge. Ignored while another
	/// drag is live, while the viewport has no area, or for ids with no
	/// stored position.
	pub fn press(&mut self, node: NodeId, pointer_px: (f64, f64)) {
		if self.viewport.is_zero_area() {
			return;
		}
		let Some(concept) = self.navigator.active() else {
			return;
		};
		let Some(position) = self.layout.position(concept.id, node) else {
			return;
		};
		self.drag
			.press(node, pointer_px, position.to_pixels(self.viewport));
	}

	/// Pointer move. A dragged id that no longer resolves to a node of the
	/// active concept (dataset swapped mid-drag) aborts the drag silently.
	pub fn motion(&mut self, pointer_px: (f64, f64)) {
		let Some(dragged) = self.drag.dragged() else {
			return;
		};
		let Some(concept) = self.navigator.active() else {
			self.drag.abort();
			return;
		};
		if !concept.sub_concepts.iter().any(|n| n.id == dragged) {
			debug!("dragged node {dragged} vanished from the active concept, aborting drag");
			self.drag.abort();
			return;
		}
		let concept_id = concept.id;
		if let Some((node, position)) = self.drag.motion(pointer_px, self.viewport) {
			self.layout.set_position(concept_id, node, position);
		}
	}

	/// Pointer release or pointer-left-window: back to idle, with exactly
	/// one overlap-resolution pass over the active concept.
	pub fn release(&mut self) {
		if self.drag.release().is_some() && !self.viewport.is_zero_area() {
			self.resolve_active();
		}
	}

	fn resolve_active(&mut self) {
		if let Some(concept) = self.navigator.active() {
			let id = concept.id;
			let node_ids: Vec<NodeId> = concept.sub_concepts.iter().map(|n| n.id).collect();
			self.layout.resolve(id, &node_ids, self.viewport);
		}
	}

	/// Attach an explicit id-keyed edge list to a concept, the alternate
	/// dataset shape next to name-keyed `connections`. No-op for unknown
	/// concept names.
	pub fn set_edge_pairs(&mut self, concept_name: &str, pairs: Vec<EdgePair>) {
		self.navigator.set_edges(concept_name, pairs);
	}

	pub fn set_hover(&mut self, node: Option<NodeId>) {
		self.drag.set_hover(node);
	}

	pub fn hovered(&self) -> Option<NodeId> {
		self.drag.hovered()
	}

	pub fn dragged(&self) -> Option<NodeId> {
		self.drag.dragged()
	}

	/// The active node's normalized position, for badge placement.
	pub fn node_position(&self, node: NodeId) -> Option<Position> {
		let concept = self.navigator.active()?;
		self.layout.position(concept.id, node)
	}

	/// Read-only copy of the active concept's position mapping, the only
	/// thing the engine exposes for layout persistence.
	pub fn position_snapshot(&self) -> HashMap<NodeId, Position> {
		match self.navigator.active() {
			Some(concept) => self.layout.snapshot(concept.id),
			None => HashMap::new(),
		}
	}

	/// Project the active concept's connections into pixel-space segments.
	/// The name index is rebuilt on every pass, so renames and merges never
	/// leave dangling references; unresolved targets and zero-length lines
	/// are skipped. Both dataset shapes are drawn: name-keyed `connections`
	/// and explicit `{source, target}` pairs.
	pub fn edge_segments(&self) -> Vec<EdgeSegment> {
		let Some(concept) = self.navigator.active() else {
			return Vec::new();
		};
		if self.viewport.is_zero_area() {
			return Vec::new();
		}
		let Some(positions) = self.layout.positions(concept.id) else {
			return Vec::new();
		};

		let by_name: HashMap<&str, NodeId> = concept
			.sub_concepts
			.iter()
			.map(|node| (node.name.as_str(), node.id))
			.collect();
		let focus = |id: NodeId| self.hovered() == Some(id) || self.dragged() == Some(id);

		let mut segments = Vec::new();
		let mut push = |source: NodeId, target: NodeId| {
			let (Some(&from), Some(&to)) = (positions.get(&source), positions.get(&target)) else {
				return;
			};
			let from = from.to_pixels(self.viewport);
			let to = to.to_pixels(self.viewport);
			let (dx, dy) = (to.0 - from.0, to.1 - from.1);
			if (dx * dx + dy * dy).sqrt() < 0.001 {
				return;
			}
			segments.push(EdgeSegment {
				from,
				to,
				highlighted: focus(source) || focus(target),
			});
		};

		for node in &concept.sub_concepts {
			for label in &node.connections {
				let Some(&target) = by_name.get(label.as_str()) else {
					continue;
				};
				push(node.id, target);
			}
		}
		for pair in &concept.edges {
			push(pair.source, pair.target);
		}
		segments
	}
}
