use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::NodeMeshState;
use super::types::EPSILON;

const STRUCTURAL_ALPHA: f64 = 0.3;
// Pointer links read brighter than the resting mesh.
const POINTER_ALPHA: f64 = 0.65;

/// Draw one frame of the mesh from the current smoothed state.
pub fn render(state: &NodeMeshState, ctx: &CanvasRenderingContext2d) {
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	let ink = state.variant.ink();
	draw_links(state, ctx, ink);
	draw_nodes(state, ctx, ink);
	draw_pointer_marker(state, ctx, ink);
}

/// Glow stroke: a wide faint pass under a narrow sharp one.
fn glow_line(
	ctx: &CanvasRenderingContext2d,
	ink: &str,
	x1: f64,
	y1: f64,
	x2: f64,
	y2: f64,
	alpha: f64,
) {
	ctx.begin_path();
	ctx.move_to(x1, y1);
	ctx.line_to(x2, y2);
	ctx.set_line_width(2.4);
	ctx.set_stroke_style_str(&format!("rgba({}, {})", ink, alpha * 0.3));
	ctx.stroke();
	ctx.set_line_width(0.9);
	ctx.set_stroke_style_str(&format!("rgba({}, {})", ink, alpha));
	ctx.stroke();
}

fn draw_links(state: &NodeMeshState, ctx: &CanvasRenderingContext2d, ink: &str) {
	for link in &state.links {
		let fade = link.fade;
		if fade.opacity <= EPSILON || fade.progress <= EPSILON {
			continue;
		}
		let (a, b) = (state.nodes[link.a], state.nodes[link.b]);
		let (x2, y2) = (
			a.x + (b.x - a.x) * fade.progress,
			a.y + (b.y - a.y) * fade.progress,
		);
		glow_line(ctx, ink, a.x, a.y, x2, y2, STRUCTURAL_ALPHA * fade.opacity);
	}

	let Some((px, py)) = state.pointer else {
		return;
	};
	for link in &state.pointer_links {
		let fade = link.fade;
		if fade.opacity <= EPSILON || fade.progress <= EPSILON {
			continue;
		}
		let node = state.nodes[link.node];
		let (x2, y2) = (
			px + (node.x - px) * fade.progress,
			py + (node.y - py) * fade.progress,
		);
		glow_line(ctx, ink, px, py, x2, y2, POINTER_ALPHA * fade.opacity);
	}
}

fn draw_nodes(state: &NodeMeshState, ctx: &CanvasRenderingContext2d, ink: &str) {
	for node in &state.nodes {
		let (radius, alpha) = if state.is_linked(node.id) {
			(2.6, 0.9)
		} else if state.has_active_link(node.id) {
			(2.0, 0.55)
		} else {
			(1.4, 0.28)
		};
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&format!("rgba({}, {})", ink, alpha));
		ctx.fill();
	}
}

fn draw_pointer_marker(state: &NodeMeshState, ctx: &CanvasRenderingContext2d, ink: &str) {
	if !state.pointer_active || !state.has_pointer_links() {
		return;
	}
	let Some((px, py)) = state.pointer else {
		return;
	};
	ctx.begin_path();
	let _ = ctx.arc(px, py, 2.0, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(&format!("rgba({}, {})", ink, 0.85));
	ctx.fill();
}
