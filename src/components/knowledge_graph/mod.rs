mod component;
mod drag;
mod geometry;
mod layout;
mod navigator;
mod render;
mod state;
mod types;

pub use component::KnowledgeGraphPane;
pub use state::{EdgeSegment, GraphState};
pub use types::{Concept, ConceptUpdate, EdgePair, SubConcept, SubConceptUpdate};
