use std::cell::RefCell;
use std::rc::Rc;

use log::{error, info};

use super::engine::{DrawingProperties, EdgeType, GraphEngine, MouseProperties};
use super::gexf::fetch_gexf;
use super::interaction::InteractionController;
use super::popup::{DomPopupHost, Navigator, PopupHost, WindowNavigator};
use super::state::ForceGraphState;
use super::types::GraphData;
use super::viewport::{ViewportController, ZoomDirection};
use crate::config::GraphConfig;

/// Engine plus the controllers acting on it, for one graph on the page.
pub struct GraphSession<E = ForceGraphState, H = DomPopupHost, N = WindowNavigator>
where
	E: GraphEngine,
	H: PopupHost,
	N: Navigator,
{
	engine: Option<E>,
	interaction: Option<InteractionController<H, N>>,
	viewport: ViewportController,
	viewport_size: (f64, f64),
	config: GraphConfig,
}

impl<E: GraphEngine, H: PopupHost, N: Navigator> GraphSession<E, H, N> {
	pub fn new(config: GraphConfig) -> Self {
		Self {
			engine: None,
			interaction: None,
			viewport: ViewportController::new(config.zoom_delta),
			viewport_size: (0.0, 0.0),
			config,
		}
	}

	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	/// Install the engine and popup collaborators, applying the demo's
	/// drawing and mouse settings.
	pub fn attach(&mut self, mut engine: E, host: H, navigator: N, width: f64, height: f64) {
		engine.set_drawing_properties(DrawingProperties {
			default_label_color: Some("#fff".into()),
			default_edge_type: Some(EdgeType::Curve),
			..DrawingProperties::default()
		});
		engine.set_mouse_properties(MouseProperties {
			min_ratio: Some(0.5),
			max_ratio: Some(100.0),
		});
		info!("graph engine {} attached ({width}x{height})", engine.instance_id());
		self.engine = Some(engine);
		self.interaction = Some(InteractionController::new(host, navigator, &self.config));
		self.viewport_size = (width, height);
	}

	pub fn engine_mut(&mut self) -> Option<&mut E> {
		self.engine.as_mut()
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport_size = (width, height);
	}

	/// Replace the graph; a popup for the old graph is removed first.
	pub fn load(&mut self, data: &GraphData) {
		if let Some(interaction) = self.interaction.as_mut() {
			if let Err(err) = interaction.on_hover_exit() {
				error!("removing popup failed: {err}");
			}
		}
		if let Some(engine) = self.engine.as_mut() {
			engine.load_graph(data);
			engine.draw();
		}
	}

	/// Route queued engine events to the interaction controller.
	pub fn pump_events(&mut self) {
		let (Some(engine), Some(interaction)) = (self.engine.as_mut(), self.interaction.as_mut())
		else {
			return;
		};
		for event in engine.poll_events() {
			if let Err(err) = interaction.handle(&*engine, &event) {
				error!("handling {event:?} failed: {err}");
			}
		}
	}

	pub fn zoom(&mut self, direction: ZoomDirection) {
		let (width, height) = self.viewport_size;
		if let Some(engine) = self.engine.as_mut() {
			self.viewport.zoom(engine, direction, width, height);
		}
	}

	/// Drop all graph data, and the popup that may point into it.
	pub fn clear(&mut self) {
		if let Some(interaction) = self.interaction.as_mut() {
			if let Err(err) = interaction.on_hover_exit() {
				error!("removing popup failed: {err}");
			}
		}
		if let Some(engine) = self.engine.as_mut() {
			self.viewport.clear(engine);
		}
	}
}

/// Shared handle to the page's [`GraphSession`], cloned into UI callbacks.
#[derive(Clone)]
pub struct GraphHandle(Rc<RefCell<GraphSession>>);

impl Default for GraphHandle {
	fn default() -> Self {
		Self::new(GraphConfig::default())
	}
}

impl GraphHandle {
	pub fn new(config: GraphConfig) -> Self {
		Self(Rc::new(RefCell::new(GraphSession::new(config))))
	}

	pub fn session(&self) -> &RefCell<GraphSession> {
		&self.0
	}

	/// Run pointer input against the engine, then dispatch what it raised.
	pub fn pointer(&self, input: impl FnOnce(&mut ForceGraphState)) {
		let mut session = self.0.borrow_mut();
		if let Some(engine) = session.engine_mut() {
			input(engine);
		}
		session.pump_events();
	}

	pub fn zoom(&self, direction: ZoomDirection) {
		self.0.borrow_mut().zoom(direction);
	}

	pub fn clear(&self) {
		self.0.borrow_mut().clear();
	}

	/// Clear the graph and fetch the configured GEXF file again.
	pub fn reload(&self) {
		self.clear();
		let url = self.0.borrow().config().gexf_url.clone();
		let handle = self.clone();
		wasm_bindgen_futures::spawn_local(async move {
			match fetch_gexf(&url).await {
				Ok(data) => handle.0.borrow_mut().load(&data),
				Err(err) => error!("loading {url} failed: {err}"),
			}
		});
	}
}
