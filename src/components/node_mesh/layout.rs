use rand::Rng;

use super::types::{Fade, MeshNode, StructuralLink};

/// Spacing of the placement grid, in CSS pixels.
pub const GRID_STEP: f64 = 120.0;
/// Maximum random offset applied to each grid point, per axis.
pub const JITTER: f64 = 15.0;
/// Node pairs further apart than this never get a structural link.
pub const MAX_LINK_DIST: f64 = 170.0;
/// Probability that an in-range pair gets a structural link.
pub const LINK_PROBABILITY: f64 = 0.5;

/// Build the node set and structural link set for a viewport.
///
/// Nodes sit on a `GRID_STEP` lattice with bounded jitter, clamped into the
/// viewport. Links start settled at full visibility. A zero-area viewport
/// produces an empty layout.
pub fn generate(
	width: f64,
	height: f64,
	rng: &mut impl Rng,
) -> (Vec<MeshNode>, Vec<StructuralLink>) {
	if width <= 0.0 || height <= 0.0 {
		return (Vec::new(), Vec::new());
	}
	let (cols, rows) = (
		(width / GRID_STEP) as usize + 1,
		(height / GRID_STEP) as usize + 1,
	);

	let mut nodes = Vec::with_capacity(cols * rows);
	for row in 0..rows {
		for col in 0..cols {
			let x = (col as f64 * GRID_STEP + rng.gen_range(-JITTER..=JITTER)).clamp(0.0, width);
			let y = (row as f64 * GRID_STEP + rng.gen_range(-JITTER..=JITTER)).clamp(0.0, height);
			nodes.push(MeshNode {
				id: nodes.len(),
				x,
				y,
			});
		}
	}

	// i < j keeps the pair set free of self-loops and duplicates.
	let mut links = Vec::new();
	for i in 0..nodes.len() {
		for j in (i + 1)..nodes.len() {
			let (dx, dy) = (nodes[j].x - nodes[i].x, nodes[j].y - nodes[i].y);
			if (dx * dx + dy * dy).sqrt() < MAX_LINK_DIST && rng.gen_bool(LINK_PROBABILITY) {
				links.push(StructuralLink {
					a: i,
					b: j,
					fade: Fade::settled(),
				});
			}
		}
	}
	(nodes, links)
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	fn layout(seed: u64) -> (Vec<MeshNode>, Vec<StructuralLink>) {
		generate(1200.0, 800.0, &mut StdRng::seed_from_u64(seed))
	}

	#[test]
	fn node_count_tracks_viewport_grid() {
		let (nodes, _) = layout(1);
		assert_eq!(nodes.len(), 11 * 7);
	}

	#[test]
	fn nodes_stay_inside_viewport() {
		let (nodes, _) = layout(2);
		for node in &nodes {
			assert!((0.0..=1200.0).contains(&node.x));
			assert!((0.0..=800.0).contains(&node.y));
		}
	}

	#[test]
	fn no_self_loops_or_duplicate_pairs() {
		for seed in 0..8 {
			let (_, links) = layout(seed);
			let mut seen = HashSet::new();
			for link in &links {
				assert_ne!(link.a, link.b);
				let key = (link.a.min(link.b), link.a.max(link.b));
				assert!(seen.insert(key), "duplicate pair {key:?}");
			}
		}
	}

	#[test]
	fn links_respect_distance_cap() {
		let (nodes, links) = layout(3);
		assert!(!links.is_empty());
		for link in &links {
			let (dx, dy) = (
				nodes[link.b].x - nodes[link.a].x,
				nodes[link.b].y - nodes[link.a].y,
			);
			assert!((dx * dx + dy * dy).sqrt() < MAX_LINK_DIST);
		}
	}

	#[test]
	fn links_start_settled() {
		let (_, links) = layout(4);
		for link in &links {
			assert_eq!(link.fade.opacity, 1.0);
			assert_eq!(link.fade.target_opacity, 1.0);
			assert_eq!(link.fade.progress, 1.0);
			assert_eq!(link.fade.target_progress, 1.0);
		}
	}

	#[test]
	fn zero_area_viewport_is_empty() {
		let mut rng = StdRng::seed_from_u64(5);
		assert!(generate(0.0, 0.0, &mut rng).0.is_empty());
		let (nodes, links) = generate(800.0, 0.0, &mut rng);
		assert!(nodes.is_empty() && links.is_empty());
	}
}
