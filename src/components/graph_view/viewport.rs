use log::debug;

use super::engine::{DrawingProperties, GraphEngine, GraphProperties};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
	In,
	Out,
}

/// Applies UI control input to the engine's settings and pan/zoom state.
#[derive(Clone, Debug)]
pub struct ViewportController {
	zoom_delta: f64,
}

impl ViewportController {
	pub fn new(zoom_delta: f64) -> Self {
		Self { zoom_delta }
	}

	pub fn set_graph_properties(&self, engine: &mut dyn GraphEngine, props: GraphProperties) {
		engine.set_graph_properties(props);
		engine.draw();
	}

	pub fn set_drawing_properties(&self, engine: &mut dyn GraphEngine, props: DrawingProperties) {
		engine.set_drawing_properties(props);
		engine.draw();
	}

	pub fn clear(&self, engine: &mut dyn GraphEngine) {
		engine.empty_graph();
	}

	/// Step the scale in or out around the viewport centre. Unbounded.
	pub fn zoom(&self, engine: &mut dyn GraphEngine, direction: ZoomDirection, width: f64, height: f64) {
		let scale = engine.viewport_position().scale;
		let scale = match direction {
			ZoomDirection::In => scale * self.zoom_delta,
			ZoomDirection::Out => scale / self.zoom_delta,
		};
		debug!("zoom {direction:?} to {scale}");
		engine.recenter(width / 2.0, height / 2.0, scale);
	}
}
