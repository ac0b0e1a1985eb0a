use std::collections::HashMap;

use super::types::{NodeId, Position, Viewport};

/// Normalized margin nodes may never cross on either axis.
pub const BOUNDARY_MARGIN: f64 = 0.15;

/// Below this width the repulsion step is widened so badges spread further
/// apart on small panels.
const NARROW_VIEWPORT_PX: f64 = 600.0;

/// Minimum pixel separation between two node centers before they count as
/// overlapping. Tracks the responsive badge width so the collision radius
/// scales with the panel.
pub fn min_separation(viewport_width: f64) -> f64 {
	160.0_f64.min(viewport_width * 0.2) * 0.8
}

/// Whether two normalized positions render closer together than the minimum
/// separation for the given viewport.
pub fn overlaps(a: Position, b: Position, viewport: Viewport) -> bool {
	let (ax, ay) = a.to_pixels(viewport);
	let (bx, by) = b.to_pixels(viewport);
	let (dx, dy) = (bx - ax, by - ay);
	(dx * dx + dy * dy).sqrt() < min_separation(viewport.width)
}

/// Single repulsion pass: every overlapping pair is pushed apart along the
/// line through their centers, harder the closer they are, both ends clamped
/// to the boundary margin. One pass does not guarantee zero overlaps remain;
/// repeated calls (each drag release, each resize) progressively de-overlap
/// a cluster.
pub fn resolve_overlap(
	node_ids: &[NodeId],
	positions: &mut HashMap<NodeId, Position>,
	viewport: Viewport,
) {
	if viewport.is_zero_area() {
		return;
	}
	let adjustment = if viewport.width < NARROW_VIEWPORT_PX {
		0.08
	} else {
		0.05
	};

	for i in 0..node_ids.len() {
		for j in (i + 1)..node_ids.len() {
			let (Some(&a), Some(&b)) = (positions.get(&node_ids[i]), positions.get(&node_ids[j]))
			else {
				continue;
			};
			if !overlaps(a, b, viewport) {
				continue;
			}

			let (dx, dy) = (b.x - a.x, b.y - a.y);
			let angle = dy.atan2(dx);
			let distance = (dx * dx + dy * dy).sqrt();
			let push = adjustment * (1.5 / (distance + 0.1));

			// The far node takes the full push, the near one half in the
			// opposite direction, so the force spreads across the pair.
			let moved_b = Position {
				x: b.x + angle.cos() * push,
				y: b.y + angle.sin() * push,
			}
			.clamped(BOUNDARY_MARGIN);
			let moved_a = Position {
				x: a.x - angle.cos() * push * 0.5,
				y: a.y - angle.sin() * push * 0.5,
			}
			.clamped(BOUNDARY_MARGIN);

			positions.insert(node_ids[j], moved_b);
			positions.insert(node_ids[i], moved_a);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn distance(a: Position, b: Position, viewport: Viewport) -> f64 {
		let (ax, ay) = a.to_pixels(viewport);
		let (bx, by) = b.to_pixels(viewport);
		((bx - ax).powi(2) + (by - ay).powi(2)).sqrt()
	}

	#[test]
	fn separation_scales_with_viewport_and_caps() {
		assert_eq!(min_separation(400.0), 400.0 * 0.2 * 0.8);
		// 20% of a wide viewport exceeds the 160px badge cap.
		assert_eq!(min_separation(2000.0), 160.0 * 0.8);
	}

	#[test]
	fn overlap_test_uses_pixel_distance() {
		let viewport = Viewport::new(600.0, 400.0);
		let a = Position { x: 0.5, y: 0.5 };
		let near = Position { x: 0.55, y: 0.5 }; // 30px apart
		let far = Position { x: 0.9, y: 0.5 }; // 240px apart
		assert!(overlaps(a, near, viewport));
		assert!(!overlaps(a, far, viewport));
	}

	#[test]
	fn one_pass_increases_pair_distance() {
		let viewport = Viewport::new(600.0, 400.0);
		let ids = [1, 2];
		let mut positions = HashMap::from([
			(1, Position { x: 0.48, y: 0.5 }),
			(2, Position { x: 0.52, y: 0.5 }),
		]);
		let before = distance(positions[&1], positions[&2], viewport);
		resolve_overlap(&ids, &mut positions, viewport);
		let after = distance(positions[&1], positions[&2], viewport);
		assert!(after > before, "expected {after} > {before}");
	}

	#[test]
	fn coincident_nodes_still_separate() {
		let viewport = Viewport::new(600.0, 400.0);
		let ids = [1, 2];
		let mut positions = HashMap::from([
			(1, Position { x: 0.5, y: 0.5 }),
			(2, Position { x: 0.5, y: 0.5 }),
		]);
		resolve_overlap(&ids, &mut positions, viewport);
		assert_ne!(positions[&1], positions[&2]);
	}

	#[test]
	fn resolution_respects_boundary_margin() {
		let viewport = Viewport::new(300.0, 400.0);
		let ids = [1, 2];
		let mut positions = HashMap::from([
			(1, Position { x: 0.16, y: 0.16 }),
			(2, Position { x: 0.17, y: 0.17 }),
		]);
		resolve_overlap(&ids, &mut positions, viewport);
		for pos in positions.values() {
			assert!(pos.x >= BOUNDARY_MARGIN && pos.x <= 1.0 - BOUNDARY_MARGIN);
			assert!(pos.y >= BOUNDARY_MARGIN && pos.y <= 1.0 - BOUNDARY_MARGIN);
		}
	}

	#[test]
	fn zero_area_viewport_is_a_no_op() {
		let ids = [1, 2];
		let mut positions = HashMap::from([
			(1, Position { x: 0.5, y: 0.5 }),
			(2, Position { x: 0.5, y: 0.5 }),
		]);
		let before = positions.clone();
		resolve_overlap(&ids, &mut positions, Viewport::new(0.0, 400.0));
		assert_eq!(positions, before);
	}

	#[test]
	fn missing_position_entries_are_skipped() {
		let ids = [1, 2, 3];
		let mut positions = HashMap::from([(1, Position { x: 0.5, y: 0.5 })]);
		resolve_overlap(&ids, &mut positions, Viewport::new(600.0, 400.0));
		assert_eq!(positions.len(), 1);
	}
}
