//! Ordered, last-write-wins view over a node's attribute bag.

use super::types::{AttrValue, NodeAttribute};

/// Attribute name to value mapping with stable iteration order.
///
/// Keys iterate in first-seen order. Writing an existing key replaces its
/// value in place, so a collapsed bag behaves like the object literal the
/// GEXF attribute list was originally folded into.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeMap {
	entries: Vec<(String, AttrValue)>,
}

impl AttributeMap {
	/// Fold a raw attribute list into a map, last occurrence winning.
	pub fn collapse(attributes: &[NodeAttribute]) -> Self {
		let mut map = Self::default();
		for NodeAttribute { attr, val } in attributes {
			map.insert(attr.clone(), val.clone());
		}
		map
	}

	pub fn insert(&mut self, name: String, value: AttrValue) {
		match self.entries.iter_mut().find(|(k, _)| *k == name) {
			Some(entry) => entry.1 = value,
			None => self.entries.push((name, value)),
		}
	}

	pub fn get(&self, name: &str) -> Option<&AttrValue> {
		self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
	}

	pub fn retain(&mut self, mut keep: impl FnMut(&str, &AttrValue) -> bool) {
		self.entries.retain(|(k, v)| keep(k, v));
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(k, _)| k.as_str())
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}
}
