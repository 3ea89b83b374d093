//! Static settings for the explorer.

/// Where the graph comes from and how interactions behave.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphConfig {
	/// GEXF file fetched on start-up, relative to the page.
	pub gexf_url: String,
	/// Record page opened when a node is released; `{id}` is the node id.
	pub record_url_template: String,
	/// Vertical distance between a node and its popup, in pixels.
	pub popup_offset_y: f64,
	/// Multiplicative step of the zoom buttons.
	pub zoom_delta: f64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			gexf_url: "public/bioprojects.gexf".into(),
			record_url_template: "https://www.ncbi.nlm.nih.gov/bioproject/{id}".into(),
			popup_offset_y: 15.0,
			zoom_delta: 1.1,
		}
	}
}
