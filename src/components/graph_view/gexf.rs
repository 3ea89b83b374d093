//! GEXF loading: fetches a graph file and flattens it into [`GraphData`].
//!
//! Organism group nodes may nest their BioProject nodes; nesting is
//! flattened in document order. Dynamic files repeat an `attvalue` once per
//! time slice, and every repetition is kept so the last slice wins when the
//! bag is collapsed.

use std::collections::HashMap;

use gloo_net::http::Request;
use log::{debug, info};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::types::{AttrValue, GraphData, GraphLink, GraphNode, NodeAttribute};
use crate::error::{GraphError, Result};

const NUMERIC_TYPES: &[&str] = &["integer", "long", "float", "double"];

/// Fetch `url` and parse it as GEXF.
pub async fn fetch_gexf(url: &str) -> Result<GraphData> {
	info!("fetching graph from {url}");
	let response = Request::get(url).send().await?;
	if !response.ok() {
		return Err(GraphError::HttpStatus {
			status: response.status(),
			url: url.to_owned(),
		});
	}
	let text = response.text().await?;
	parse_gexf(&text)
}

#[derive(Default)]
struct Parser {
	graph: GraphData,
	/// Declared node attribute types by attribute id.
	types: HashMap<String, String>,
	/// Indices into `graph.nodes` of the currently open `<node>` elements.
	open_nodes: Vec<usize>,
	in_node_attributes: bool,
	in_edge: bool,
	saw_graph: bool,
}

/// Parse a GEXF document.
pub fn parse_gexf(text: &str) -> Result<GraphData> {
	let mut reader = Reader::from_str(text);
	reader.config_mut().trim_text(true);
	let mut parser = Parser::default();

	loop {
		match reader.read_event()? {
			Event::Start(e) => parser.open(&e, false)?,
			Event::Empty(e) => parser.open(&e, true)?,
			Event::End(e) => parser.close(e.local_name().as_ref()),
			Event::Eof => break,
			_ => {}
		}
	}

	if !parser.saw_graph {
		return Err(GraphError::MalformedGexf("no <graph> element".into()));
	}
	debug!(
		"parsed GEXF: {} nodes, {} edges",
		parser.graph.nodes.len(),
		parser.graph.links.len()
	);
	Ok(parser.graph)
}

fn attrs(e: &BytesStart<'_>) -> Result<HashMap<String, String>> {
	let mut out = HashMap::new();
	for attr in e.attributes() {
		let attr = attr?;
		let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
		out.insert(key, attr.unescape_value()?.into_owned());
	}
	Ok(out)
}

fn number(attrs: &HashMap<String, String>, key: &str) -> Option<f64> {
	attrs.get(key)?.trim().parse().ok()
}

impl Parser {
	fn current_node(&mut self) -> Option<&mut GraphNode> {
		if self.in_edge {
			return None;
		}
		let idx = *self.open_nodes.last()?;
		self.graph.nodes.get_mut(idx)
	}

	fn open(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<()> {
		match e.local_name().as_ref() {
			b"graph" => self.saw_graph = true,
			b"attributes" => {
				let a = attrs(e)?;
				self.in_node_attributes = !empty && a.get("class").is_none_or(|c| c == "node");
			}
			b"attribute" if self.in_node_attributes => {
				let mut a = attrs(e)?;
				if let (Some(id), Some(kind)) = (a.remove("id"), a.remove("type")) {
					self.types.insert(id, kind);
				}
			}
			b"node" => {
				let mut a = attrs(e)?;
				let id = a
					.remove("id")
					.ok_or_else(|| GraphError::MalformedGexf("<node> without id".into()))?;
				self.graph.nodes.push(GraphNode {
					id,
					label: a.remove("label"),
					..GraphNode::default()
				});
				if !empty {
					self.open_nodes.push(self.graph.nodes.len() - 1);
				}
			}
			b"attvalue" => {
				let mut a = attrs(e)?;
				let Some(key) = a.remove("for").or_else(|| a.remove("id")) else {
					return Ok(());
				};
				let raw = a.remove("value").unwrap_or_default();
				let numeric = self
					.types
					.get(&key)
					.is_some_and(|t| NUMERIC_TYPES.contains(&t.as_str()));
				// A number is kept only when it prints back as the file's text,
				// so digits like the trailing zero of "12.50" survive.
				let val = match raw.parse::<f64>() {
					Ok(n) if numeric && n.to_string() == raw => AttrValue::Number(n),
					_ => AttrValue::Text(raw),
				};
				if let Some(node) = self.current_node() {
					node.attributes.push(NodeAttribute::new(key, val));
				}
			}
			b"color" => {
				let a = attrs(e)?;
				let color = match (number(&a, "r"), number(&a, "g"), number(&a, "b")) {
					(Some(r), Some(g), Some(b)) => match number(&a, "a") {
						Some(alpha) => Some(format!("rgba({r}, {g}, {b}, {alpha})")),
						None => Some(format!("rgb({r}, {g}, {b})")),
					},
					_ => a.get("hex").cloned(),
				};
				if let Some(node) = self.current_node() {
					node.color = color;
				}
			}
			b"size" => {
				let size = number(&attrs(e)?, "value");
				if let Some(node) = self.current_node() {
					node.size = size;
				}
			}
			b"position" => {
				let a = attrs(e)?;
				let position = number(&a, "x").zip(number(&a, "y"));
				if let Some(node) = self.current_node() {
					node.position = position;
				}
			}
			b"edge" => {
				let mut a = attrs(e)?;
				match (a.remove("source"), a.remove("target")) {
					(Some(source), Some(target)) => {
						self.graph.links.push(GraphLink { source, target })
					}
					_ => return Err(GraphError::MalformedGexf("<edge> without endpoints".into())),
				}
				self.in_edge = !empty;
			}
			_ => {}
		}
		Ok(())
	}

	fn close(&mut self, name: &[u8]) {
		match name {
			b"node" => {
				self.open_nodes.pop();
			}
			b"attributes" => self.in_node_attributes = false,
			b"edge" => self.in_edge = false,
			_ => {}
		}
	}
}
