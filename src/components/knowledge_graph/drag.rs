use super::geometry::BOUNDARY_MARGIN;
use super::types::{NodeId, Position, Viewport};

/// Width below which the drag clamp widens from 15% to 20%.
const NARROW_VIEWPORT_PX: f64 = 768.0;
const NARROW_MARGIN: f64 = 0.20;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Phase {
	#[default]
	Idle,
	Dragging {
		node: NodeId,
		/// Pointer-to-anchor vector in pixels, captured at press so the
		/// badge never snaps to the pointer.
		grab: (f64, f64),
	},
}

/// Pointer/touch state machine: `Idle -> Dragging -> Idle`, at most one
/// dragged node at a time. Hover is a plain toggle tracked alongside.
#[derive(Clone, Copy, Debug, Default)]
pub struct DragController {
	phase: Phase,
	hovered: Option<NodeId>,
}

impl DragController {
	pub fn new() -> Self {
		Self::default()
	}

	/// Begin dragging `node`. A press while another drag is live is ignored.
	pub fn press(&mut self, node: NodeId, pointer_px: (f64, f64), node_px: (f64, f64)) {
		if matches!(self.phase, Phase::Dragging { .. }) {
			return;
		}
		self.phase = Phase::Dragging {
			node,
			grab: (pointer_px.0 - node_px.0, pointer_px.1 - node_px.1),
		};
	}

	/// Translate a pointer move into the dragged node's new normalized
	/// position, clamped to the margin for this viewport. `None` when idle
	/// or the viewport has no area.
	pub fn motion(&self, pointer_px: (f64, f64), viewport: Viewport) -> Option<(NodeId, Position)> {
		let Phase::Dragging { node, grab } = self.phase else {
			return None;
		};
		if viewport.is_zero_area() {
			return None;
		}
		let margin = if viewport.width < NARROW_VIEWPORT_PX {
			NARROW_MARGIN
		} else {
			BOUNDARY_MARGIN
		};
		let position = Position {
			x: (pointer_px.0 - grab.0) / viewport.width,
			y: (pointer_px.1 - grab.1) / viewport.height,
		}
		.clamped(margin);
		Some((node, position))
	}

	/// End the drag, returning the node that was dragged so the caller can
	/// run overlap resolution exactly once.
	pub fn release(&mut self) -> Option<NodeId> {
		let Phase::Dragging { node, .. } = self.phase else {
			return None;
		};
		self.phase = Phase::Idle;
		Some(node)
	}

	/// Drop the drag without a resolution pass, for stale ids after a
	/// dataset swap.
	pub fn abort(&mut self) {
		self.phase = Phase::Idle;
	}

	pub fn dragged(&self) -> Option<NodeId> {
		match self.phase {
			Phase::Dragging { node, .. } => Some(node),
			Phase::Idle => None,
		}
	}

	pub fn set_hover(&mut self, node: Option<NodeId>) {
		self.hovered = node;
	}

	pub fn hovered(&self) -> Option<NodeId> {
		self.hovered
	}
}
