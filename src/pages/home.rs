use leptos::prelude::*;

use crate::components::knowledge_graph::{ConceptUpdate, KnowledgeGraphPane, SubConceptUpdate};

fn concept(name: &str, progress: u8, nodes: &[(&str, &[&str])]) -> ConceptUpdate {
	ConceptUpdate {
		name: name.into(),
		progress,
		sub_concepts: nodes
			.iter()
			.map(|(node, connections)| SubConceptUpdate {
				name: (*node).into(),
				connections: connections.iter().map(|c| (*c).into()).collect(),
			})
			.collect(),
	}
}

/// Sample dataset in the shape the upload/chat pipeline produces: concepts
/// keyed by name, sub-concepts with name-keyed connections. The last concept
/// is still empty, exercising the "not yet learned" state.
fn sample_concepts() -> Vec<ConceptUpdate> {
	vec![
		concept(
			"Neural Networks",
			72,
			&[
				(
					"Neural Networks",
					&[
						"Backpropagation",
						"Activation Functions",
						"Loss Functions",
						"Gradient Descent",
						"Transfer Learning",
					],
				),
				("Backpropagation", &["Gradient Descent"]),
				("Activation Functions", &["Loss Functions"]),
				("Loss Functions", &["Transfer Learning"]),
				("Gradient Descent", &[]),
				("Transfer Learning", &[]),
			],
		),
		concept(
			"Natural Language Processing",
			45,
			&[
				(
					"Natural Language Processing",
					&["Word Embeddings", "Transformers", "Sequence Models"],
				),
				("Word Embeddings", &["Sequence Models"]),
				("Transformers", &["Attention Mechanism", "Text Classification"]),
				("Attention Mechanism", &[]),
				("Sequence Models", &["Text Classification"]),
				("Text Classification", &[]),
			],
		),
		concept(
			"Computer Vision",
			58,
			&[
				(
					"Computer Vision",
					&["Convolutional Networks", "Image Classification", "Image Segmentation"],
				),
				("Convolutional Networks", &["Image Classification", "Feature Extraction"]),
				("Image Classification", &["Object Detection"]),
				("Object Detection", &[]),
				("Image Segmentation", &[]),
				("Feature Extraction", &["Image Classification"]),
			],
		),
		concept("Reinforcement Learning", 0, &[]),
	]
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let concepts = Signal::derive(sample_concepts);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div style="height: 100vh; padding: 24px; box-sizing: border-box; background: #2e79ea;">
				<KnowledgeGraphPane data=concepts />
			</div>
		</ErrorBoundary>
	}
}
