use serde::Deserialize;

/// Identifier of a sub-concept node, unique within its owning concept.
pub type NodeId = u32;

/// Node location in normalized viewport coordinates, `[0,1]` on both axes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub fn clamped(self, margin: f64) -> Self {
		Self {
			x: self.x.clamp(margin, 1.0 - margin),
			y: self.y.clamp(margin, 1.0 - margin),
		}
	}

	pub fn to_pixels(self, viewport: Viewport) -> (f64, f64) {
		(self.x * viewport.width, self.y * viewport.height)
	}
}

/// Host container size in device pixels. Pixel positions are always derived
/// from normalized positions and this; never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// A collapsed panel reports zero on at least one axis; drawing and
	/// overlap resolution are skipped until a real size arrives.
	pub fn is_zero_area(self) -> bool {
		self.width <= 0.0 || self.height <= 0.0
	}
}

/// A labeled vertex in the per-concept graph. Outgoing edges are stored as
/// target names, resolved against the current node list at render time.
#[derive(Clone, Debug, PartialEq)]
pub struct SubConcept {
	pub id: NodeId,
	pub name: String,
	pub connections: Vec<String>,
}

/// An explicit directed edge keyed by node ids, the alternate dataset shape
/// next to name-keyed `connections`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgePair {
	pub source: NodeId,
	pub target: NodeId,
}

/// A top-level topic with a progress score and its sub-concept graph. An
/// empty `sub_concepts` list is valid and means "not yet learned".
#[derive(Clone, Debug, PartialEq)]
pub struct Concept {
	pub id: u32,
	pub name: String,
	pub progress: u8,
	pub sub_concepts: Vec<SubConcept>,
	pub edges: Vec<EdgePair>,
}

/// Incremental concept payload from the external producer. Producers only
/// know names, so everything here is name-keyed; ids are assigned on merge.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConceptUpdate {
	pub name: String,
	pub progress: u8,
	#[serde(default)]
	pub sub_concepts: Vec<SubConceptUpdate>,
}

/// One node of an incremental concept payload.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubConceptUpdate {
	pub name: String,
	#[serde(default)]
	pub connections: Vec<String>,
}
