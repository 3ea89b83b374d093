use std::collections::HashSet;
use std::f64::consts::PI;
use std::sync::atomic::{AtomicU32, Ordering};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, info};

use super::engine::{
	DrawingProperties, EdgeType, EngineEvent, GraphEngine, GraphProperties, MouseProperties,
	NodeView, ViewportPosition,
};
use super::types::{GraphData, NodeAttribute};

static NEXT_INSTANCE: AtomicU32 = AtomicU32::new(0);

/// Extra world-space slack around a node that still counts as a hit.
pub const HIT_SLACK: f64 = 4.0;
/// Margin kept free around a graph fitted from file positions.
const FIT_PADDING: f64 = 40.0;
const WHEEL_STEP: f64 = 1.1;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: Option<String>,
	pub color: Option<String>,
	pub size: f64,
	pub attributes: Vec<NodeAttribute>,
}

#[derive(Clone, Debug)]
pub struct Style {
	pub background_color: String,
	pub label_color: String,
	pub node_color: String,
	pub edge_color: Option<String>,
	pub edge_type: EdgeType,
	pub label_threshold: f64,
	pub min_node_size: f64,
	pub max_node_size: f64,
	pub min_ratio: f64,
	pub max_ratio: f64,
}

impl Default for Style {
	fn default() -> Self {
		Self {
			background_color: "#1a1a2e".into(),
			label_color: "white".into(),
			node_color: "#1f77b4".into(),
			edge_color: None,
			edge_type: EdgeType::Line,
			label_threshold: 6.0,
			min_node_size: 3.0,
			max_node_size: 8.0,
			min_ratio: 0.1,
			max_ratio: 10.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
}

/// Force-directed engine drawing onto a 2D canvas.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub hover: HoverState,
	pub style: Style,
	pub width: f64,
	pub height: f64,
	pub layout_running: bool,
	id: u32,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	size_range: (f64, f64),
	events: Vec<EngineEvent>,
	dirty: bool,
}

fn new_simulation() -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

impl ForceGraphState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			graph: new_simulation(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			pan: PanState::default(),
			hover: HoverState::default(),
			style: Style::default(),
			width,
			height,
			layout_running: false,
			id: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
			edges: Vec::new(),
			size_range: (1.0, 1.0),
			events: Vec::new(),
			dirty: true,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			gx * self.transform.k + self.transform.x,
			gy * self.transform.k + self.transform.y,
		)
	}

	/// World-space radius for a node of raw `size`.
	pub fn node_radius(&self, size: f64) -> f64 {
		let (lo, hi) = self.size_range;
		let (min, max) = (self.style.min_node_size, self.style.max_node_size);
		if hi - lo < f64::EPSILON {
			return max;
		}
		min + (size - lo) / (hi - lo) * (max - min)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found: Option<(f64, DefaultNodeIdx)> = None;
		self.graph.visit_nodes(|node| {
			let dist = (node.x() as f64 - gx).hypot(node.y() as f64 - gy);
			let reach = self.node_radius(node.data.user_data.size) + HIT_SLACK;
			if dist < reach && found.is_none_or(|(best, _)| dist < best) {
				found = Some((dist, node.index()));
			}
		});
		found.map(|(_, idx)| idx)
	}

	fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut id = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				id = Some(node.data.user_data.id.clone());
			}
		});
		id
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		if let Some(id) = self.hover.node.and_then(|idx| self.node_id(idx)) {
			self.events.push(EngineEvent::HoverExit(vec![id]));
		}

		self.hover.node = node;
		self.hover.neighbors.clear();
		self.hover.highlight_t = 0.0;
		self.dirty = true;

		if let Some(idx) = node {
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
			if let Some(id) = self.node_id(idx) {
				self.events.push(EngineEvent::HoverEnter(vec![id]));
			}
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.neighbors.contains(&idx)
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.pan = PanState {
			active: true,
			start_x: x,
			start_y: y,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
		};
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (x - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (y - self.pan.start_y);
			self.dirty = true;
		}
		let hovered = self.node_at_position(x, y);
		self.set_hover(hovered);
	}

	pub fn pointer_up(&mut self, x: f64, y: f64) {
		self.pan.active = false;
		if let Some(id) = self.node_at_position(x, y).and_then(|idx| self.node_id(idx)) {
			self.events.push(EngineEvent::PointerRelease(vec![id]));
		}
	}

	pub fn pointer_leave(&mut self) {
		self.pan.active = false;
		self.set_hover(None);
	}

	/// Wheel zoom around `(x, y)`, bounded by the mouse ratio range.
	pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 1.0 / WHEEL_STEP } else { WHEEL_STEP };
		let scale =
			(self.transform.k * factor).clamp(self.style.min_ratio, self.style.max_ratio);
		self.recenter(x, y, scale);
	}

	/// Advance the layout and hover fade; returns whether a frame is due.
	pub fn tick(&mut self, dt: f32) -> bool {
		if self.layout_running {
			self.graph.update(dt);
			self.dirty = true;
		}
		if self.hover.node.is_some() && self.hover.highlight_t < 1.0 {
			self.hover.highlight_t = (self.hover.highlight_t + 4.0 * dt as f64).min(1.0);
			self.dirty = true;
		}
		std::mem::take(&mut self.dirty)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.dirty = true;
	}

	/// Scale factor mapping file positions into the viewport, centred on 0.
	fn fit_positions(&self, data: &GraphData) -> Option<(f64, f64, f64)> {
		let positions: Vec<(f64, f64)> =
			data.nodes.iter().map(|n| n.position).collect::<Option<_>>()?;
		if positions.is_empty() {
			return None;
		}
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for &(x, y) in &positions {
			(min_x, max_x) = (min_x.min(x), max_x.max(x));
			(min_y, max_y) = (min_y.min(y), max_y.max(y));
		}
		let span = (max_x - min_x).max(max_y - min_y);
		let room = (self.width.min(self.height) - 2.0 * FIT_PADDING).max(1.0);
		let ratio = if span > 0.0 { room / span } else { 1.0 };
		Some(((min_x + max_x) / 2.0, (min_y + max_y) / 2.0, ratio))
	}
}

impl GraphEngine for ForceGraphState {
	fn set_graph_properties(&mut self, props: GraphProperties) {
		if let Some(v) = props.min_node_size {
			self.style.min_node_size = v;
		}
		if let Some(v) = props.max_node_size {
			self.style.max_node_size = v;
		}
		self.dirty = true;
	}

	fn set_drawing_properties(&mut self, props: DrawingProperties) {
		if let Some(v) = props.background_color {
			self.style.background_color = v;
		}
		if let Some(v) = props.default_label_color {
			self.style.label_color = v;
		}
		if let Some(v) = props.default_node_color {
			self.style.node_color = v;
		}
		if let Some(v) = props.default_edge_color {
			self.style.edge_color = Some(v);
		}
		if let Some(v) = props.default_edge_type {
			self.style.edge_type = v;
		}
		if let Some(v) = props.label_threshold {
			self.style.label_threshold = v;
		}
		self.dirty = true;
	}

	fn set_mouse_properties(&mut self, props: MouseProperties) {
		if let Some(v) = props.min_ratio {
			self.style.min_ratio = v;
		}
		if let Some(v) = props.max_ratio {
			self.style.max_ratio = v;
		}
	}

	/// Replaces whatever graph is currently loaded.
	fn load_graph(&mut self, data: &GraphData) {
		self.empty_graph();
		let fit = self.fit_positions(data);
		let count = data.nodes.len().max(1) as f64;
		let mut placed = Vec::with_capacity(data.nodes.len());

		let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
		for (i, node) in data.nodes.iter().enumerate() {
			let size = node.size.unwrap_or(1.0);
			(lo, hi) = (lo.min(size), hi.max(size));

			let (x, y) = match (fit, node.position) {
				(Some((cx, cy, ratio)), Some((px, py))) => ((px - cx) * ratio, (py - cy) * ratio),
				_ => {
					let angle = (i as f64) * 2.0 * PI / count;
					(100.0 * angle.cos(), 100.0 * angle.sin())
				}
			};
			let idx = self.graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					color: node.color.clone(),
					size,
					attributes: node.attributes.clone(),
				},
			});
			placed.push((node.id.as_str(), idx));
		}
		if lo <= hi {
			self.size_range = (lo, hi);
		}

		let lookup = |id: &str| placed.iter().find(|(nid, _)| *nid == id).map(|&(_, idx)| idx);
		for link in &data.links {
			if let (Some(src), Some(tgt)) = (lookup(&link.source), lookup(&link.target)) {
				self.graph.add_edge(src, tgt, EdgeData::default());
				self.edges.push((src, tgt));
			} else {
				debug!("skipping edge {} -> {}: endpoint missing", link.source, link.target);
			}
		}

		self.layout_running = fit.is_none() && !data.nodes.is_empty();
		self.dirty = true;
		info!(
			"engine {} loaded {} nodes, {} edges (layout {})",
			self.id,
			data.nodes.len(),
			self.edges.len(),
			if self.layout_running { "simulated" } else { "from file" }
		);
	}

	fn draw(&mut self) {
		self.dirty = true;
	}

	fn empty_graph(&mut self) {
		self.graph = new_simulation();
		self.edges.clear();
		self.hover = HoverState::default();
		self.pan = PanState::default();
		self.size_range = (1.0, 1.0);
		self.layout_running = false;
		self.dirty = true;
	}

	fn viewport_position(&self) -> ViewportPosition {
		ViewportPosition {
			x: self.transform.x,
			y: self.transform.y,
			scale: self.transform.k,
		}
	}

	fn recenter(&mut self, x: f64, y: f64, scale: f64) {
		let ratio = scale / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = scale;
		self.dirty = true;
	}

	fn for_each_node(&self, filter: Option<&[String]>, visitor: &mut dyn FnMut(NodeView<'_>)) {
		self.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			if filter.is_some_and(|ids| !ids.contains(&info.id)) {
				return;
			}
			let (display_x, display_y) = self.graph_to_screen(node.x() as f64, node.y() as f64);
			visitor(NodeView {
				id: &info.id,
				label: info.label.as_deref(),
				display_x,
				display_y,
				attributes: &info.attributes,
			});
		});
	}

	fn poll_events(&mut self) -> Vec<EngineEvent> {
		std::mem::take(&mut self.events)
	}

	fn instance_id(&self) -> u32 {
		self.id
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::types::{GraphLink, GraphNode};

	fn node(id: &str, at: Option<(f64, f64)>) -> GraphNode {
		GraphNode {
			id: id.into(),
			position: at,
			attributes: vec![NodeAttribute::new("title", id)],
			..GraphNode::default()
		}
	}

	fn sample() -> GraphData {
		GraphData {
			nodes: vec![node("a", Some((0.0, 0.0))), node("b", Some((100.0, 0.0)))],
			links: vec![GraphLink {
				source: "a".into(),
				target: "b".into(),
			}],
		}
	}

	fn screen_of(state: &ForceGraphState, id: &str) -> (f64, f64) {
		let (ids, mut at) = ([id.to_string()], None);
		state.for_each_node(Some(&ids[..]), &mut |n: NodeView<'_>| {
			at = Some((n.display_x, n.display_y))
		});
		at.expect("node present")
	}

	#[test]
	fn file_positions_are_fitted_and_static() {
		let mut state = ForceGraphState::new(800.0, 600.0);
		state.load_graph(&sample());
		assert!(!state.layout_running);
		let (ax, ay) = screen_of(&state, "a");
		let (bx, _) = screen_of(&state, "b");
		assert!((ay - 300.0).abs() < 1e-3);
		assert!((bx - ax - (600.0 - 2.0 * FIT_PADDING)).abs() < 1e-2);
	}

	#[test]
	fn missing_positions_start_layout() {
		let mut state = ForceGraphState::new(800.0, 600.0);
		state.load_graph(&GraphData {
			nodes: vec![node("a", None), node("b", Some((1.0, 1.0)))],
			links: vec![],
		});
		assert!(state.layout_running);
	}

	#[test]
	fn hover_and_release_emit_events() {
		let mut state = ForceGraphState::new(800.0, 600.0);
		state.load_graph(&sample());
		let (ax, ay) = screen_of(&state, "a");
		let (bx, by) = screen_of(&state, "b");

		state.pointer_move(ax, ay);
		state.pointer_move(ax + 1.0, ay);
		state.pointer_move(bx, by);
		state.pointer_up(bx, by);
		state.pointer_leave();

		assert_eq!(
			state.poll_events(),
			vec![
				EngineEvent::HoverEnter(vec!["a".into()]),
				EngineEvent::HoverExit(vec!["a".into()]),
				EngineEvent::HoverEnter(vec!["b".into()]),
				EngineEvent::PointerRelease(vec!["b".into()]),
				EngineEvent::HoverExit(vec!["b".into()]),
			]
		);
		assert!(state.poll_events().is_empty());
	}

	#[test]
	fn recenter_keeps_anchor_point_fixed() {
		let mut state = ForceGraphState::new(800.0, 600.0);
		state.load_graph(&sample());
		let before = state.screen_to_graph(400.0, 300.0);
		state.recenter(400.0, 300.0, 2.5);
		let after = state.screen_to_graph(400.0, 300.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
		assert_eq!(state.viewport_position().scale, 2.5);
	}

	#[test]
	fn wheel_zoom_is_bounded_by_mouse_properties() {
		let mut state = ForceGraphState::new(800.0, 600.0);
		state.set_mouse_properties(MouseProperties {
			min_ratio: Some(0.5),
			max_ratio: Some(1.2),
		});
		for _ in 0..10 {
			state.wheel(10.0, 10.0, -1.0);
		}
		assert_eq!(state.viewport_position().scale, 1.2);
		for _ in 0..20 {
			state.wheel(10.0, 10.0, 1.0);
		}
		assert_eq!(state.viewport_position().scale, 0.5);
	}

	#[test]
	fn empty_graph_drops_everything() {
		let mut state = ForceGraphState::new(800.0, 600.0);
		state.load_graph(&sample());
		state.empty_graph();
		let mut seen = 0;
		state.for_each_node(None, &mut |_: NodeView<'_>| seen += 1);
		assert_eq!(seen, 0);
		assert!(state.node_at_position(400.0, 300.0).is_none());
	}

	#[test]
	fn loading_again_replaces_previous_graph() {
		let mut state = ForceGraphState::new(800.0, 600.0);
		state.load_graph(&sample());
		state.load_graph(&sample());
		let mut seen = 0;
		state.for_each_node(None, &mut |_: NodeView<'_>| seen += 1);
		assert_eq!(seen, 2);
		assert_eq!(state.edges.len(), 1);
	}

	#[test]
	fn node_size_properties_rescale_radii() {
		let mut state = ForceGraphState::new(800.0, 600.0);
		let mut data = sample();
		data.nodes[0].size = Some(1.0);
		data.nodes[1].size = Some(3.0);
		state.load_graph(&data);
		state.set_graph_properties(GraphProperties {
			min_node_size: Some(2.0),
			max_node_size: Some(10.0),
		});
		assert_eq!(state.node_radius(1.0), 2.0);
		assert_eq!(state.node_radius(2.0), 6.0);
		assert_eq!(state.node_radius(3.0), 10.0);
	}

	#[test]
	fn overlapping_nodes_resolve_to_nearest() {
		let mut state = ForceGraphState::new(800.0, 600.0);
		state.load_graph(&sample());
		// b sits 6 units right of a; both reach 12 units
		state.graph.visit_nodes_mut(|node| {
			node.data.x = if node.data.user_data.id == "b" { 6.0 } else { 0.0 };
			node.data.y = 0.0;
		});
		let (ax, ay) = screen_of(&state, "a");
		let (bx, _) = screen_of(&state, "b");
		let near_a = ax + (bx - ax) * 0.1;
		let hit = state.node_at_position(near_a, ay).and_then(|idx| state.node_id(idx));
		assert_eq!(hit.as_deref(), Some("a"));
		let near_b = ax + (bx - ax) * 0.9;
		let hit = state.node_at_position(near_b, ay).and_then(|idx| state.node_id(idx));
		assert_eq!(hit.as_deref(), Some("b"));
	}

	#[test]
	fn instance_ids_are_distinct() {
		let (a, b) = (ForceGraphState::new(1.0, 1.0), ForceGraphState::new(1.0, 1.0));
		assert_ne!(a.instance_id(), b.instance_id());
	}
}
