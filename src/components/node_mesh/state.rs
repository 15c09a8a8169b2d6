use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::layout;
use super::types::{Fade, MeshNode, PointerLink, StructuralLink, Variant};

/// Nodes inside this radius of the pointer are link candidates.
pub const POINTER_RADIUS: f64 = 150.0;
/// Upper bound on simultaneously pointer-linked nodes.
pub const MAX_POINTER_LINKS: usize = 4;
/// Minimum interval between relink evaluations.
pub const SAMPLE_INTERVAL_MS: f64 = 100.0;

/// All state of one mesh instance: layout, animated links, pointer
/// bookkeeping.
///
/// Everything runs on one logical thread. Event callbacks move link targets
/// between frames; `tick` advances the smoothed values strictly before the
/// frame is drawn, so no frame ever observes a half-applied update.
pub struct NodeMeshState {
	pub nodes: Vec<MeshNode>,
	pub links: Vec<StructuralLink>,
	pub pointer_links: Vec<PointerLink>,
	pub pointer: Option<(f64, f64)>,
	pub pointer_active: bool,
	pub variant: Variant,
	pub width: f64,
	pub height: f64,
	linked: HashSet<usize>,
	last_sample: f64,
	rng: StdRng,
}

impl NodeMeshState {
	pub fn new(width: f64, height: f64, variant: Variant) -> Self {
		let mut rng = StdRng::from_entropy();
		let (nodes, links) = layout::generate(width, height, &mut rng);
		Self {
			nodes,
			links,
			pointer_links: Vec::new(),
			pointer: None,
			pointer_active: false,
			variant,
			width,
			height,
			linked: HashSet::new(),
			last_sample: f64::NEG_INFINITY,
			rng,
		}
	}

	/// Throw the whole layout away and regenerate it for a new viewport.
	/// Pointer links and the linked set go with it.
	pub fn rebuild(&mut self, width: f64, height: f64) {
		let (nodes, links) = layout::generate(width, height, &mut self.rng);
		self.nodes = nodes;
		self.links = links;
		self.pointer_links.clear();
		self.linked.clear();
		self.pointer = None;
		self.pointer_active = false;
		self.width = width;
		self.height = height;
	}

	/// Nodes strictly inside `radius` of a point, closest first.
	pub fn nearby(&self, x: f64, y: f64, radius: f64) -> Vec<(usize, f64)> {
		let mut found: Vec<(usize, f64)> = self
			.nodes
			.iter()
			.filter_map(|node| {
				let (dx, dy) = (node.x - x, node.y - y);
				let dist = (dx * dx + dy * dy).sqrt();
				(dist < radius).then_some((node.id, dist))
			})
			.collect();
		found.sort_by(|a, b| a.1.total_cmp(&b.1));
		found
	}

	/// Indices into `links` of structural links touching `node` that are
	/// still visibly active.
	pub fn incident_active(&self, node: usize) -> Vec<usize> {
		self.links
			.iter()
			.enumerate()
			.filter_map(|(i, link)| {
				((link.a == node || link.b == node) && link.fade.active()).then_some(i)
			})
			.collect()
	}

	/// Indices into `links` of structural links touching `node` that are
	/// currently suppressed.
	pub fn incident_suppressed(&self, node: usize) -> Vec<usize> {
		self.links
			.iter()
			.enumerate()
			.filter_map(|(i, link)| {
				((link.a == node || link.b == node) && link.fade.suppressed()).then_some(i)
			})
			.collect()
	}

	pub fn is_linked(&self, node: usize) -> bool {
		self.linked.contains(&node)
	}

	pub fn has_active_link(&self, node: usize) -> bool {
		self.links
			.iter()
			.any(|link| (link.a == node || link.b == node) && link.fade.active())
	}

	pub fn has_pointer_links(&self) -> bool {
		!self.linked.is_empty()
	}

	/// Feed one pointer sample. The stored position updates immediately so
	/// pointer links track the cursor; relinking runs at most once per
	/// `SAMPLE_INTERVAL_MS`.
	pub fn pointer_moved(&mut self, x: f64, y: f64, now_ms: f64) {
		self.pointer = Some((x, y));
		self.pointer_active = true;
		if now_ms - self.last_sample < SAMPLE_INTERVAL_MS {
			return;
		}
		self.last_sample = now_ms;
		self.relink(x, y);
	}

	/// The pointer left the viewport: unlink every node.
	pub fn pointer_left(&mut self) {
		self.pointer_active = false;
		let stale: Vec<usize> = self.linked.iter().copied().collect();
		for node in stale {
			self.detach(node);
		}
	}

	fn relink(&mut self, x: f64, y: f64) {
		let desired: Vec<usize> = self
			.nearby(x, y, POINTER_RADIUS)
			.into_iter()
			.take(MAX_POINTER_LINKS)
			.map(|(id, _)| id)
			.collect();

		for &node in &desired {
			if !self.linked.contains(&node) {
				self.attach(node);
			}
		}
		let stale: Vec<usize> = self
			.linked
			.iter()
			.copied()
			.filter(|node| !desired.contains(node))
			.collect();
		for node in stale {
			self.detach(node);
		}
	}

	/// Link `node` to the pointer and suppress one of its active structural
	/// links, if it has any.
	fn attach(&mut self, node: usize) {
		self.linked.insert(node);
		// A link left over from a recent detach may still be fading out;
		// reuse it so the node never carries two pointer links.
		match self.pointer_links.iter().position(|link| link.node == node) {
			Some(i) => self.pointer_links[i].fade.show(),
			None => self.pointer_links.push(PointerLink {
				node,
				fade: Fade::appearing(),
			}),
		}
		let candidates = self.incident_active(node);
		if let Some(&pick) = candidates.choose(&mut self.rng) {
			self.links[pick].fade.hide();
		}
	}

	/// Unlink `node` from the pointer and restore one of its suppressed
	/// structural links, if any is suppressed.
	fn detach(&mut self, node: usize) {
		self.linked.remove(&node);
		if let Some(link) = self.pointer_links.iter_mut().find(|link| link.node == node) {
			link.fade.hide();
		}
		let candidates = self.incident_suppressed(node);
		if let Some(&pick) = candidates.choose(&mut self.rng) {
			self.links[pick].fade.show();
		}
	}

	/// Advance every fade one frame and drop pointer links that have fully
	/// faded. Structural links persist: at zero target they are suppressed,
	/// not dead, so restoration can still find them.
	pub fn tick(&mut self) {
		for link in &mut self.links {
			link.fade.step();
		}
		for link in &mut self.pointer_links {
			link.fade.step();
		}
		self.pointer_links.retain(|link| !link.fade.spent());
	}
}
