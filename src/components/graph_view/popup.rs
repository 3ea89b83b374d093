//! Browser-side collaborators of the interaction controller: the popup
//! overlay and external navigation.

use log::debug;
use web_sys::{Document, Element};

use super::presenter::{DisplayRow, Span};
use crate::error::{GraphError, Result};

/// Something that can place and remove the node summary overlay.
pub trait PopupHost {
	type Handle;

	fn show(&mut self, rows: &[DisplayRow], x: f64, y: f64, instance: u32) -> Result<Self::Handle>;
	fn remove(&mut self, popup: Self::Handle) -> Result<()>;
}

/// Opens record pages outside the app.
pub trait Navigator {
	fn open(&self, url: &str) -> Result<()>;
}

/// Appends popups as absolutely positioned children of the graph container.
pub struct DomPopupHost {
	document: Document,
	container: Element,
}

impl DomPopupHost {
	pub fn new(container: Element) -> Result<Self> {
		let document = container
			.owner_document()
			.ok_or_else(|| GraphError::Dom("graph container is detached".into()))?;
		Ok(Self {
			document,
			container,
		})
	}

	fn cell(&self, spans: &[Span]) -> Result<Element> {
		let td = self.document.create_element("td")?;
		for span in spans {
			match span {
				Span::Plain(text) => {
					td.append_child(&self.document.create_text_node(text))?;
				}
				Span::Emphasis(text) => {
					let em = self.document.create_element("em")?;
					em.set_text_content(Some(text));
					td.append_child(&em)?;
				}
			}
		}
		Ok(td)
	}
}

impl PopupHost for DomPopupHost {
	type Handle = Element;

	fn show(&mut self, rows: &[DisplayRow], x: f64, y: f64, instance: u32) -> Result<Element> {
		let popup = self.document.create_element("div")?;
		popup.set_class_name("node-info-popup");
		popup.set_id(&format!("node-info{instance}"));
		popup.set_attribute(
			"style",
			&format!(
				"display: inline-block; border-radius: 3px; padding: 5px; background: #fff; \
				 color: #000; box-shadow: 0 0 4px #666; position: absolute; \
				 left: {x}px; top: {y}px;"
			),
		)?;

		let table = self.document.create_element("table")?;
		table.set_class_name("node");
		for row in rows {
			let tr = self.document.create_element("tr")?;
			let label = self.document.create_element("td")?;
			label.set_text_content(Some(row.label));
			tr.append_child(&label)?;
			let value = self.cell(&row.spans)?;
			tr.append_child(&value)?;
			table.append_child(&tr)?;
		}
		popup.append_child(&table)?;
		self.container.append_child(&popup)?;
		debug!("popup shown at ({x}, {y}) with {} rows", rows.len());
		Ok(popup)
	}

	fn remove(&mut self, popup: Element) -> Result<()> {
		popup.remove();
		Ok(())
	}
}

/// Opens URLs in a new browsing context via `window.open`.
pub struct WindowNavigator;

impl Navigator for WindowNavigator {
	fn open(&self, url: &str) -> Result<()> {
		let window =
			web_sys::window().ok_or_else(|| GraphError::Dom("no window available".into()))?;
		window.open_with_url_and_target(url, "_blank")?;
		Ok(())
	}
}
