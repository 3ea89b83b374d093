use std::fmt;

/// A raw attribute value as delivered by the GEXF loader.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
	Text(String),
	Number(f64),
}

impl fmt::Display for AttrValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AttrValue::Text(s) => f.write_str(s),
			// f64's Display already drops a zero fraction ("5", "1234.5")
			AttrValue::Number(n) => write!(f, "{n}"),
		}
	}
}

impl From<&str> for AttrValue {
	fn from(value: &str) -> Self {
		AttrValue::Text(value.to_owned())
	}
}

impl From<f64> for AttrValue {
	fn from(value: f64) -> Self {
		AttrValue::Number(value)
	}
}

/// One `{attr, val}` pair of a node's attribute bag, in document order.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeAttribute {
	pub attr: String,
	pub val: AttrValue,
}

impl NodeAttribute {
	pub fn new(attr: impl Into<String>, val: impl Into<AttrValue>) -> Self {
		Self {
			attr: attr.into(),
			val: val.into(),
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct GraphNode {
	pub id: String,
	pub label: Option<String>,
	pub color: Option<String>,
	pub size: Option<f64>,
	pub position: Option<(f64, f64)>,
	pub attributes: Vec<NodeAttribute>,
}

#[derive(Clone, Debug)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
}

#[derive(Clone, Debug, Default)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}
