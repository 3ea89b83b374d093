//! Error type shared by the loader, the engine and the popup hosts.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures surfaced by the graph explorer.
#[derive(Error, Debug)]
pub enum GraphError {
	/// A DOM or browser API call was rejected.
	#[error("DOM error: {0}")]
	Dom(String),

	/// The GEXF file could not be fetched.
	#[error("fetch failed: {0}")]
	Fetch(#[from] gloo_net::Error),

	/// The GEXF file is not well-formed XML.
	#[error("XML error: {0}")]
	Xml(#[from] quick_xml::Error),

	/// The server answered with a non-success status.
	#[error("HTTP {status} fetching {url}")]
	HttpStatus { status: u16, url: String },

	/// The XML is well-formed but is not usable GEXF.
	#[error("malformed GEXF: {0}")]
	MalformedGexf(String),

	/// An event referenced a node the engine does not hold.
	#[error("unknown node: {0}")]
	UnknownNode(String),
}

impl From<JsValue> for GraphError {
	fn from(value: JsValue) -> Self {
		GraphError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

impl From<quick_xml::events::attributes::AttrError> for GraphError {
	fn from(err: quick_xml::events::attributes::AttrError) -> Self {
		GraphError::Xml(err.into())
	}
}

/// Result alias for [`GraphError`].
pub type Result<T, E = GraphError> = std::result::Result<T, E>;
