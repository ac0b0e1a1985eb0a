use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::GraphState;

/// Repaint the edge layer: background gradient, dashed flowing connections,
/// and an arrowhead at each target end. Node badges are DOM elements
/// positioned from the same state, so this pass only draws lines.
pub fn draw(state: &GraphState, ctx: &CanvasRenderingContext2d) {
	let viewport = state.viewport();
	if viewport.is_zero_area() {
		return;
	}
	let (width, height) = (viewport.width, viewport.height);
	ctx.clear_rect(0.0, 0.0, width, height);

	// Subtle radial wash behind the graph, purely cosmetic.
	let gradient = ctx
		.create_radial_gradient(
			width * 0.5,
			height * 0.5,
			0.0,
			width * 0.5,
			height * 0.5,
			width * 0.8,
		)
		.unwrap();
	gradient
		.add_color_stop(0.0, "rgba(255, 255, 255, 0.06)")
		.unwrap();
	gradient
		.add_color_stop(1.0, "rgba(255, 255, 255, 0)")
		.unwrap();
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, width, height);

	let base_line_width = (width / 300.0).clamp(1.0, 3.0);
	let dash = (width / 200.0).clamp(3.0, 5.0);
	let dash_offset = -state.flow_offset();

	for segment in state.edge_segments() {
		let (x1, y1) = segment.from;
		let (x2, y2) = segment.to;
		let (dx, dy) = (x2 - x1, y2 - y1);

		if segment.highlighted {
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.8)");
			ctx.set_line_width(base_line_width * 1.5);
		} else {
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.4)");
			ctx.set_line_width(base_line_width);
		}

		ctx.begin_path();
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(dash),
		));
		ctx.set_line_dash_offset(dash_offset);
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();

		// Arrowhead at the target end, oriented along the edge.
		let arrow_size = if segment.highlighted {
			(width / 120.0).clamp(4.0, 8.0)
		} else {
			(width / 150.0).clamp(3.0, 6.0)
		};
		let angle = dy.atan2(dx);
		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.begin_path();
		ctx.move_to(
			x2 - arrow_size * (angle - std::f64::consts::FRAC_PI_6).cos(),
			y2 - arrow_size * (angle - std::f64::consts::FRAC_PI_6).sin(),
		);
		ctx.line_to(x2, y2);
		ctx.line_to(
			x2 - arrow_size * (angle + std::f64::consts::FRAC_PI_6).cos(),
			y2 - arrow_size * (angle + std::f64::consts::FRAC_PI_6).sin(),
		);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}
