use std::cell::Cell;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, ResizeObserver, TouchEvent, Window,
};

use super::render;
use super::state::GraphState;
use super::types::{ConceptUpdate, NodeId, Position, SubConcept, Viewport};

// JS resources acquired on mount and released together on teardown. Held
// behind a thread-local `StoredValue` handle so the cleanup hook stays
// `Send` while the contents are not.
#[derive(Default)]
struct DomHooks {
	mounted: bool,
	raf_id: Option<i32>,
	animate: Option<Closure<dyn FnMut(f64)>>,
	mouse_move: Option<Closure<dyn FnMut(MouseEvent)>>,
	touch_move: Option<Closure<dyn FnMut(TouchEvent)>>,
	release: Option<Closure<dyn FnMut()>>,
	resize: Option<Closure<dyn FnMut()>>,
	observer_cb: Option<Closure<dyn FnMut()>>,
	observer: Option<ResizeObserver>,
}

fn press_at(
	container_ref: NodeRef<leptos::html::Div>,
	state: RwSignal<GraphState>,
	node: NodeId,
	client_x: f64,
	client_y: f64,
) {
	let Some(container) = container_ref.get_untracked() else {
		return;
	};
	let rect = container.get_bounding_client_rect();
	state.update(|s| s.press(node, (client_x - rect.left(), client_y - rect.top())));
}

fn motion_at(
	container_ref: NodeRef<leptos::html::Div>,
	state: RwSignal<GraphState>,
	client_x: f64,
	client_y: f64,
) {
	let Some(container) = container_ref.get_untracked() else {
		return;
	};
	let rect = container.get_bounding_client_rect();
	state.update(|s| s.motion((client_x - rect.left(), client_y - rect.top())));
}

fn badge_style(position: Option<Position>, dragging: bool) -> String {
	let Position { x, y } = position.unwrap_or(Position { x: 0.5, y: 0.5 });
	let (scale, shadow, z_index, transition) = if dragging {
		(1.1, "0 8px 25px rgba(0, 0, 0, 0.3)", 10, "none")
	} else {
		(1.0, "0 2px 10px rgba(0, 0, 0, 0.1)", 2, "box-shadow 0.3s ease")
	};
	format!(
		"position: absolute; left: {:.4}%; top: {:.4}%; \
		 transform: translate(-50%, -50%) scale({scale}); \
		 padding: 10px 15px; border-radius: 20px; \
		 background-color: rgba(255, 255, 255, 0.95); color: #1a62d6; \
		 max-width: 200px; text-align: center; line-height: 1.2; \
		 cursor: grab; user-select: none; touch-action: none; \
		 box-shadow: {shadow}; z-index: {z_index}; transition: {transition};",
		x * 100.0,
		y * 100.0,
	)
}

/// The knowledge-graph panel: concept header with progress, the graph
/// canvas with DOM node badges layered on top, and prev/next navigation.
/// All engine state lives in one [`GraphState`] signal; the canvas pass and
/// the badges are read-only projections of it.
#[component]
pub fn KnowledgeGraphPane(#[prop(into)] data: Signal<Vec<ConceptUpdate>>) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state = RwSignal::new(GraphState::new());

	// Merge the dataset whenever the producer pushes a new payload. The
	// merge is idempotent, so re-runs with the same data are harmless.
	Effect::new(move |_| {
		let updates = data.get();
		state.update(|s| s.sync(&updates));
	});

	let measure = move || {
		let Some(container) = container_ref.get_untracked() else {
			return;
		};
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (w, h) = (
			container.client_width() as f64,
			container.client_height() as f64,
		);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		state.update(|s| s.on_resize(Viewport::new(w, h)));
	};

	let hooks = StoredValue::new_local(DomHooks::default());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if hooks.with_value(|h| h.mounted) {
			return;
		}

		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		measure();

		hooks.update_value(|h| {
			h.mounted = true;

			h.resize = Some(Closure::new(move || measure()));
			if let Some(cb) = &h.resize {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}

			// Element-level observation catches the panel regaining size after
			// being collapsed, which fires no window resize.
			h.observer_cb = Some(Closure::new(move || measure()));
			if let Some(cb) = &h.observer_cb {
				if let (Ok(observer), Some(container)) = (
					ResizeObserver::new(cb.as_ref().unchecked_ref()),
					container_ref.get_untracked(),
				) {
					observer.observe(&container);
					h.observer = Some(observer);
				}
			}

			// Drags keep tracking the pointer outside the container, so move
			// and release listeners go on the window.
			h.mouse_move = Some(Closure::new(move |ev: MouseEvent| {
				motion_at(container_ref, state, ev.client_x() as f64, ev.client_y() as f64);
			}));
			if let Some(cb) = &h.mouse_move {
				let _ = window
					.add_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref());
			}

			h.touch_move = Some(Closure::new(move |ev: TouchEvent| {
				// Only the primary touch point drives the drag.
				if let Some(touch) = ev.touches().get(0) {
					motion_at(
						container_ref,
						state,
						touch.client_x() as f64,
						touch.client_y() as f64,
					);
				}
			}));
			if let Some(cb) = &h.touch_move {
				let _ = window
					.add_event_listener_with_callback("touchmove", cb.as_ref().unchecked_ref());
			}

			h.release = Some(Closure::new(move || {
				state.update(|s| s.release());
			}));
			if let Some(cb) = &h.release {
				for event in ["mouseup", "touchend", "blur"] {
					let _ =
						window.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
				}
			}

			let last_time = Cell::new(0.0_f64);
			h.animate = Some(Closure::new(move |time: f64| {
				let dt = if last_time.get() == 0.0 {
					0.0
				} else {
					time - last_time.get()
				};
				last_time.set(time);
				// Mutate first, then paint from the same store, so the frame
				// reflects every event handled before it.
				state.update(|s| s.on_tick(dt));
				state.with_untracked(|s| render::draw(s, &ctx));
				hooks.update_value(|h| {
					if let Some(cb) = &h.animate {
						if let Ok(id) = web_sys::window()
							.unwrap()
							.request_animation_frame(cb.as_ref().unchecked_ref())
						{
							h.raf_id = Some(id);
						}
					}
				});
			}));
			if let Some(cb) = &h.animate {
				if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
					h.raf_id = Some(id);
				}
			}
		});
	});

	on_cleanup(move || {
		hooks.update_value(|h| {
			let window = web_sys::window().unwrap();
			if let Some(id) = h.raf_id.take() {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(cb) = h.mouse_move.take() {
				let _ = window
					.remove_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref());
			}
			if let Some(cb) = h.touch_move.take() {
				let _ = window
					.remove_event_listener_with_callback("touchmove", cb.as_ref().unchecked_ref());
			}
			if let Some(cb) = h.release.take() {
				for event in ["mouseup", "touchend", "blur"] {
					let _ = window
						.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
				}
			}
			if let Some(cb) = h.resize.take() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
			if let Some(observer) = h.observer.take() {
				observer.disconnect();
			}
			h.observer_cb.take();
			h.animate.take();
			h.mounted = false;
		});
	});

	let concept_name =
		move || state.with(|s| s.active_concept().map(|c| c.name.clone()).unwrap_or_default());
	let progress = move || state.with(|s| s.active_concept().map(|c| c.progress).unwrap_or(0));
	let position_label = move || {
		state.with(|s| {
			if s.concept_count() == 0 {
				"0 / 0".to_string()
			} else {
				format!("{} / {}", s.active_index() + 1, s.concept_count())
			}
		})
	};
	let at_start = move || state.with(|s| s.active_index() == 0);
	let at_end =
		move || state.with(|s| s.concept_count() == 0 || s.active_index() + 1 == s.concept_count());
	let is_empty = move || {
		state.with(|s| {
			s.active_concept()
				.map(|c| c.sub_concepts.is_empty())
				.unwrap_or(true)
		})
	};
	let badges = move || {
		state.with(|s| {
			s.active_concept()
				.map(|c| c.sub_concepts.clone())
				.unwrap_or_default()
		})
	};

	view! {
		<div class="knowledge-graph-pane" style="display: flex; flex-direction: column; height: 100%; width: 100%; color: #fff;">
			<div class="concept-header" style="padding: 16px 20px; border-radius: 12px; background: rgba(0, 0, 0, 0.07); margin-bottom: 16px;">
				<h2 style="margin: 0 0 12px; text-align: center; font-size: 1.4rem;">{concept_name}</h2>
				<div style="display: flex; align-items: center; gap: 8px;">
					<span style="opacity: 0.85;">"Understanding:"</span>
					<div style="flex: 1; height: 8px; border-radius: 4px; background: rgba(255, 255, 255, 0.3);">
						<div style=move || {
							format!(
								"width: {}%; height: 100%; border-radius: 4px; background: #ffffff; transition: width 0.6s ease-in-out;",
								progress(),
							)
						} />
					</div>
					<span style="font-weight: 500; min-width: 40px; text-align: right;">
						{move || format!("{}%", progress())}
					</span>
				</div>
			</div>

			<div
				class="graph-container"
				node_ref=container_ref
				style="flex: 1; position: relative; border-radius: 12px; background: rgba(255, 255, 255, 0.04); border: 1px solid rgba(255, 255, 255, 0.1); overflow: hidden; min-height: 300px; margin-bottom: 16px;"
			>
				<canvas
					node_ref=canvas_ref
					style="position: absolute; width: 100%; height: 100%;"
				/>
				<Show when=move || is_empty()>
					<div style="position: absolute; inset: 0; display: flex; flex-direction: column; align-items: center; justify-content: center; text-align: center; padding: 24px;">
						<h3 style="margin: 0 0 8px;">"No concept map available yet"</h3>
						<p style="margin: 0; opacity: 0.7;">
							"As learning progresses, a visual map of this concept will appear here."
						</p>
					</div>
				</Show>
				<For each=badges key=|node| node.id children=move |node: SubConcept| {
					let node_id = node.id;
					view! {
						<div
							class="graph-node"
							style=move || {
								state.with(|s| badge_style(s.node_position(node_id), s.dragged() == Some(node_id)))
							}
							on:mouseenter=move |_| state.update(|s| s.set_hover(Some(node_id)))
							on:mouseleave=move |_| state.update(|s| s.set_hover(None))
							on:mousedown=move |ev: MouseEvent| {
								ev.prevent_default();
								press_at(container_ref, state, node_id, ev.client_x() as f64, ev.client_y() as f64);
							}
							on:touchstart=move |ev: TouchEvent| {
								if let Some(touch) = ev.touches().get(0) {
									press_at(container_ref, state, node_id, touch.client_x() as f64, touch.client_y() as f64);
								}
							}
						>
							{node.name.clone()}
						</div>
					}
				} />
			</div>

			<div class="nav-controls" style="display: flex; justify-content: space-between; align-items: center; padding: 12px 16px; border-radius: 12px; background: rgba(0, 0, 0, 0.07);">
				<button
					on:click=move |_| state.update(|s| s.prev_concept())
					disabled=at_start
					style="color: white; background: none; border: none; font-size: 1.2rem; cursor: pointer;"
				>
					"\u{2190}"
				</button>
				<span style="font-weight: 500; min-width: 45px; text-align: center;">{position_label}</span>
				<button
					on:click=move |_| state.update(|s| s.next_concept())
					disabled=at_end
					style="color: white; background: none; border: none; font-size: 1.2rem; cursor: pointer;"
				>
					"\u{2192}"
				</button>
			</div>
		</div>
	}
}
