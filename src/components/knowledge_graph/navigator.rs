use log::debug;

use super::types::{Concept, ConceptUpdate, SubConcept};

/// Ordered concept collection plus the active index. Navigation clamps at
/// the bounds rather than wrapping: the dataset grows at runtime, and
/// wrapping past the end would surface not-yet-populated placeholders.
#[derive(Clone, Debug, Default)]
pub struct ConceptNavigator {
	concepts: Vec<Concept>,
	active: usize,
}

impl ConceptNavigator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.concepts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.concepts.is_empty()
	}

	pub fn active_index(&self) -> usize {
		self.active
	}

	pub fn active(&self) -> Option<&Concept> {
		self.concepts.get(self.active)
	}

	pub fn next(&mut self) {
		if self.active + 1 < self.concepts.len() {
			self.active += 1;
		}
	}

	pub fn prev(&mut self) {
		self.active = self.active.saturating_sub(1);
	}

	/// Merge an incremental payload by name. Existing concepts take the
	/// incoming progress and connection lists, unseen sub-concepts are
	/// appended with fresh ids, unseen concepts are appended whole. A first
	/// load is the same merge applied to an empty collection. Applying the
	/// same payload twice produces the same dataset as applying it once.
	pub fn apply_updates(&mut self, updates: &[ConceptUpdate]) {
		let mut appended = 0usize;
		for update in updates {
			match self
				.concepts
				.iter_mut()
				.find(|concept| concept.name == update.name)
			{
				Some(concept) => {
					// Payloads are untrusted; progress is a percentage.
					concept.progress = update.progress.min(100);
					for sub in &update.sub_concepts {
						match concept
							.sub_concepts
							.iter_mut()
							.find(|existing| existing.name == sub.name)
						{
							Some(existing) => {
								existing.connections = sub.connections.clone();
							}
							None => {
								let id = concept
									.sub_concepts
									.iter()
									.map(|n| n.id)
									.max()
									.unwrap_or(0) + 1;
								concept.sub_concepts.push(SubConcept {
									id,
									name: sub.name.clone(),
									connections: sub.connections.clone(),
								});
							}
						}
					}
				}
				None => {
					let id = self.concepts.iter().map(|c| c.id).max().unwrap_or(0) + 1;
					self.concepts.push(Concept {
						id,
						name: update.name.clone(),
						progress: update.progress.min(100),
						sub_concepts: update
							.sub_concepts
							.iter()
							.enumerate()
							.map(|(i, sub)| SubConcept {
								id: i as u32 + 1,
								name: sub.name.clone(),
								connections: sub.connections.clone(),
							})
							.collect(),
						edges: Vec::new(),
					});
					appended += 1;
				}
			}
		}
		if appended > 0 {
			debug!("merged concept update: {appended} new, {} total", self.concepts.len());
		}
		if self.active >= self.concepts.len() {
			self.active = self.concepts.len().saturating_sub(1);
		}
	}

	/// Attach an id-keyed edge list to the named concept, for datasets that
	/// arrive with explicit `{source, target}` pairs instead of per-node
	/// connection names.
	pub fn set_edges(&mut self, concept_name: &str, edges: Vec<super::types::EdgePair>) {
		if let Some(concept) = self
			.concepts
			.iter_mut()
			.find(|concept| concept.name == concept_name)
		{
			concept.edges = edges;
		}
	}

	/// Drop everything ahead of a wholesale replacement.
	pub fn reset(&mut self) {
		self.concepts.clear();
		self.active = 0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::knowledge_graph::types::SubConceptUpdate;

	fn payload() -> Vec<ConceptUpdate> {
		serde_json::from_str(
			r#"[
				{
					"name": "Neural Networks",
					"progress": 72,
					"subConcepts": [
						{ "name": "Neural Networks", "connections": ["Backpropagation"] },
						{ "name": "Backpropagation", "connections": [] }
					]
				},
				{ "name": "Reinforcement Learning", "progress": 0, "subConcepts": [] }
			]"#,
		)
		.unwrap()
	}

	#[test]
	fn first_load_appends_everything() {
		let mut nav = ConceptNavigator::new();
		nav.apply_updates(&payload());
		assert_eq!(nav.len(), 2);
		let first = nav.active().unwrap();
		assert_eq!(first.name, "Neural Networks");
		assert_eq!(first.progress, 72);
		assert_eq!(first.sub_concepts.len(), 2);
		// Ids are assigned sequentially within the concept.
		assert_eq!(first.sub_concepts[0].id, 1);
		assert_eq!(first.sub_concepts[1].id, 2);
	}

	#[test]
	fn merge_is_idempotent() {
		let mut nav = ConceptNavigator::new();
		nav.apply_updates(&payload());
		let once = nav.clone();
		nav.apply_updates(&payload());
		assert_eq!(nav.len(), once.len());
		assert_eq!(nav.active(), once.active());
	}

	#[test]
	fn merge_keeps_ids_and_updates_progress() {
		let mut nav = ConceptNavigator::new();
		nav.apply_updates(&payload());
		let update = vec![ConceptUpdate {
			name: "Neural Networks".into(),
			progress: 85,
			sub_concepts: vec![
				SubConceptUpdate {
					name: "Backpropagation".into(),
					connections: vec!["Gradient Descent".into()],
				},
				SubConceptUpdate {
					name: "Gradient Descent".into(),
					connections: vec![],
				},
			],
		}];
		nav.apply_updates(&update);
		let concept = nav.active().unwrap();
		assert_eq!(concept.progress, 85);
		assert_eq!(concept.sub_concepts.len(), 3);
		// Existing node keeps its id, new connections land.
		let backprop = concept
			.sub_concepts
			.iter()
			.find(|n| n.name == "Backpropagation")
			.unwrap();
		assert_eq!(backprop.id, 2);
		assert_eq!(backprop.connections, vec!["Gradient Descent".to_string()]);
		// Appended node gets the next free id.
		let gd = concept
			.sub_concepts
			.iter()
			.find(|n| n.name == "Gradient Descent")
			.unwrap();
		assert_eq!(gd.id, 3);
	}

	#[test]
	fn out_of_range_progress_clamps_to_a_percentage() {
		let mut nav = ConceptNavigator::new();
		nav.apply_updates(&[ConceptUpdate {
			name: "Neural Networks".into(),
			progress: 255,
			sub_concepts: vec![],
		}]);
		assert_eq!(nav.active().unwrap().progress, 100);
		// Same clamp on the merge path for an existing concept.
		nav.apply_updates(&[ConceptUpdate {
			name: "Neural Networks".into(),
			progress: 200,
			sub_concepts: vec![],
		}]);
		assert_eq!(nav.active().unwrap().progress, 100);
	}

	#[test]
	fn navigation_clamps_at_both_ends() {
		let mut nav = ConceptNavigator::new();
		nav.apply_updates(&payload());
		nav.prev();
		assert_eq!(nav.active_index(), 0);
		nav.next();
		nav.next();
		nav.next();
		assert_eq!(nav.active_index(), 1);
	}

	#[test]
	fn empty_concept_is_valid() {
		let mut nav = ConceptNavigator::new();
		nav.apply_updates(&payload());
		nav.next();
		let concept = nav.active().unwrap();
		assert_eq!(concept.name, "Reinforcement Learning");
		assert!(concept.sub_concepts.is_empty());
	}

	#[test]
	fn reset_clears_dataset_and_index() {
		let mut nav = ConceptNavigator::new();
		nav.apply_updates(&payload());
		nav.next();
		nav.reset();
		assert!(nav.is_empty());
		assert_eq!(nav.active_index(), 0);
		assert!(nav.active().is_none());
	}
}
