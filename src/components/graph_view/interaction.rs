use log::{debug, info};

use super::engine::{EngineEvent, GraphEngine, NodeView};
use super::popup::{Navigator, PopupHost};
use super::presenter::present;
use crate::config::GraphConfig;
use crate::error::{GraphError, Result};

/// Owns the single node popup and turns pointer events into popup and
/// navigation actions.
pub struct InteractionController<H: PopupHost, N: Navigator> {
	host: H,
	navigator: N,
	popup: Option<H::Handle>,
	record_url_template: String,
	popup_offset_y: f64,
}

impl<H: PopupHost, N: Navigator> InteractionController<H, N> {
	pub fn new(host: H, navigator: N, config: &GraphConfig) -> Self {
		Self {
			host,
			navigator,
			popup: None,
			record_url_template: config.record_url_template.clone(),
			popup_offset_y: config.popup_offset_y,
		}
	}

	pub fn handle(&mut self, engine: &dyn GraphEngine, event: &EngineEvent) -> Result<()> {
		match event {
			EngineEvent::HoverEnter(ids) => match ids.first() {
				Some(id) => self.on_hover_enter(engine, id),
				None => Ok(()),
			},
			EngineEvent::HoverExit(_) => self.on_hover_exit(),
			EngineEvent::PointerRelease(ids) => match ids.first() {
				Some(id) => self.on_release(id),
				None => Ok(()),
			},
		}
	}

	pub fn on_hover_enter(&mut self, engine: &dyn GraphEngine, node_id: &str) -> Result<()> {
		self.on_hover_exit()?;

		let filter = [node_id.to_owned()];
		let mut found = None;
		engine.for_each_node(Some(&filter[..]), &mut |node: NodeView<'_>| {
			let label = node.label.map(str::to_owned);
			found = Some((label, present(node.attributes), node.display_x, node.display_y));
		});
		let (label, rows, x, y) =
			found.ok_or_else(|| GraphError::UnknownNode(node_id.to_owned()))?;

		debug!(
			"hover enter {node_id} ({}): {:?}",
			label.as_deref().unwrap_or("unlabelled"),
			rows.iter().map(|r| (r.label, r.value())).collect::<Vec<_>>()
		);
		let popup = self
			.host
			.show(&rows, x, y + self.popup_offset_y, engine.instance_id())?;
		self.popup = Some(popup);
		Ok(())
	}

	pub fn on_hover_exit(&mut self) -> Result<()> {
		match self.popup.take() {
			Some(popup) => self.host.remove(popup),
			None => Ok(()),
		}
	}

	pub fn on_release(&self, node_id: &str) -> Result<()> {
		let url = self.record_url(node_id);
		info!("opening {url}");
		self.navigator.open(&url)
	}

	pub fn record_url(&self, node_id: &str) -> String {
		self.record_url_template.replace("{id}", node_id)
	}
}
