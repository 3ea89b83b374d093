//! The rendering-engine contract the controllers are written against.

use super::types::{GraphData, NodeAttribute};

/// Pointer interaction reported by the engine, carrying node ids.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
	HoverEnter(Vec<String>),
	HoverExit(Vec<String>),
	PointerRelease(Vec<String>),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeType {
	#[default]
	Line,
	Curve,
}

/// Sizing options. Unset fields leave the engine's current value alone.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphProperties {
	pub min_node_size: Option<f64>,
	pub max_node_size: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawingProperties {
	pub background_color: Option<String>,
	pub default_label_color: Option<String>,
	pub default_node_color: Option<String>,
	pub default_edge_color: Option<String>,
	pub default_edge_type: Option<EdgeType>,
	/// Labels are drawn only once the on-screen node radius reaches this.
	pub label_threshold: Option<f64>,
}

/// Wheel zoom bounds, as scale ratios.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MouseProperties {
	pub min_ratio: Option<f64>,
	pub max_ratio: Option<f64>,
}

/// Pan/zoom state: screen offset of the graph origin and scale factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportPosition {
	pub x: f64,
	pub y: f64,
	pub scale: f64,
}

/// Borrowed view of one node, positioned in screen space.
#[derive(Clone, Copy, Debug)]
pub struct NodeView<'a> {
	pub id: &'a str,
	pub label: Option<&'a str>,
	pub display_x: f64,
	pub display_y: f64,
	pub attributes: &'a [NodeAttribute],
}

/// Operations consumed from the graph renderer.
///
/// Pointer events are queued by the engine and handed out by
/// [`GraphEngine::poll_events`] so that handlers can query the engine again
/// while reacting to them.
pub trait GraphEngine {
	fn set_graph_properties(&mut self, props: GraphProperties);
	fn set_drawing_properties(&mut self, props: DrawingProperties);
	fn set_mouse_properties(&mut self, props: MouseProperties);
	fn load_graph(&mut self, data: &GraphData);
	fn draw(&mut self);
	fn empty_graph(&mut self);
	fn viewport_position(&self) -> ViewportPosition;
	/// Zoom to `scale`, keeping screen point `(x, y)` fixed.
	fn recenter(&mut self, x: f64, y: f64, scale: f64);
	/// Visit every node, or only those whose id is in `filter`.
	fn for_each_node(&self, filter: Option<&[String]>, visitor: &mut dyn FnMut(NodeView<'_>));
	fn poll_events(&mut self) -> Vec<EngineEvent>;
	fn instance_id(&self) -> u32;
}

#[cfg(test)]
pub(crate) mod fake {
	//! In-memory engine for controller tests.

	use super::*;

	#[derive(Default)]
	pub struct FakeEngine {
		pub nodes: Vec<(String, (f64, f64), Vec<NodeAttribute>)>,
		pub position: Option<ViewportPosition>,
		pub graph_props: Vec<GraphProperties>,
		pub drawing_props: Vec<DrawingProperties>,
		pub events: Vec<EngineEvent>,
		pub draws: usize,
	}

	impl FakeEngine {
		pub fn with_node(mut self, id: &str, at: (f64, f64), attrs: Vec<NodeAttribute>) -> Self {
			self.nodes.push((id.to_string(), at, attrs));
			self
		}
	}

	impl GraphEngine for FakeEngine {
		fn set_graph_properties(&mut self, props: GraphProperties) {
			self.graph_props.push(props);
		}

		fn set_drawing_properties(&mut self, props: DrawingProperties) {
			self.drawing_props.push(props);
		}

		fn set_mouse_properties(&mut self, _props: MouseProperties) {}

		fn load_graph(&mut self, data: &GraphData) {
			self.nodes.clear();
			for node in &data.nodes {
				let at = node.position.unwrap_or_default();
				self.nodes.push((node.id.clone(), at, node.attributes.clone()));
			}
		}

		fn draw(&mut self) {
			self.draws += 1;
		}

		fn empty_graph(&mut self) {
			self.nodes.clear();
		}

		fn viewport_position(&self) -> ViewportPosition {
			self.position.unwrap_or(ViewportPosition {
				x: 0.0,
				y: 0.0,
				scale: 1.0,
			})
		}

		fn recenter(&mut self, x: f64, y: f64, scale: f64) {
			self.position = Some(ViewportPosition { x, y, scale });
		}

		fn for_each_node(&self, filter: Option<&[String]>, visitor: &mut dyn FnMut(NodeView<'_>)) {
			for (id, (x, y), attrs) in &self.nodes {
				if filter.is_some_and(|ids| !ids.contains(id)) {
					continue;
				}
				visitor(NodeView {
					id,
					label: None,
					display_x: *x,
					display_y: *y,
					attributes: attrs,
				});
			}
		}

		fn poll_events(&mut self) -> Vec<EngineEvent> {
			std::mem::take(&mut self.events)
		}

		fn instance_id(&self) -> u32 {
			7
		}
	}
}
