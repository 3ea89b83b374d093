use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::engine::EdgeType;
use super::state::ForceGraphState;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(&state.style.background_color);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let t = ease_out_cubic(state.hover.highlight_t);
	let hovering = state.hover.node.is_some();

	state.graph.visit_edges(|n1, n2, _| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		if (x2 - x1).hypot(y2 - y1) < 0.001 {
			return;
		}

		let lit = state.is_highlighted(n1.index()) && state.is_highlighted(n2.index());
		let alpha = match (hovering, lit) {
			(false, _) => 0.6,
			(true, true) => 0.6 + 0.4 * t,
			(true, false) => 0.6 - 0.45 * t,
		};
		// Edges without an explicit colour take their source node's.
		let color = state
			.style
			.edge_color
			.as_deref()
			.or(n1.data.user_data.color.as_deref())
			.unwrap_or(&state.style.node_color);

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(1.0 / k);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		match state.style.edge_type {
			EdgeType::Line => ctx.line_to(x2, y2),
			EdgeType::Curve => {
				let (cx, cy) = ((x1 + x2) / 2.0 + (y2 - y1) / 4.0, (y1 + y2) / 2.0 + (x1 - x2) / 4.0);
				ctx.quadratic_curve_to(cx, cy, x2, y2);
			}
		}
		ctx.stroke();
	});
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let (k, t) = (state.transform.k, ease_out_cubic(state.hover.highlight_t));
	let hovering = state.hover.node.is_some();

	// Dimmed nodes first so highlighted ones land on top.
	for pass_lit in [false, true] {
		state.graph.visit_nodes(|node| {
			let idx = node.index();
			let lit = hovering && state.is_highlighted(idx);
			if lit != pass_lit {
				return;
			}
			let info = &node.data.user_data;
			let (x, y) = (node.x() as f64, node.y() as f64);
			let mut radius = state.node_radius(info.size);
			let alpha = if hovering && !lit { 1.0 - 0.7 * t } else { 1.0 };
			if state.hover.node == Some(idx) {
				radius *= 1.0 + 0.35 * t;
			}

			ctx.set_global_alpha(alpha);
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(info.color.as_deref().unwrap_or(&state.style.node_color));
			ctx.fill();

			if state.hover.node == Some(idx) && t > 0.01 {
				ctx.begin_path();
				let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
				ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
				ctx.set_line_width(1.5 / k);
				ctx.stroke();
			}

			let show_label = lit || radius * k >= state.style.label_threshold;
			if let (Some(label), true) = (&info.label, show_label) {
				ctx.set_fill_style_str(&state.style.label_color);
				ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
				let _ = ctx.fill_text(label, x + radius + 3.0 / k, y + 3.0 / k);
			}
		});
	}
	ctx.set_global_alpha(1.0);
}
