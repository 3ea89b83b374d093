//! Turns a node's raw attribute bag into the rows shown in the hover popup.
//!
//! Only a fixed whitelist of BioProject attributes is shown, always in the
//! same order. Values equal to `"Other"` or to the node's project type are
//! considered non-informative and hidden from every row after "Project type".

use log::debug;

use super::attributes::AttributeMap;
use super::types::{AttrValue, NodeAttribute};

const TITLE: &str = "title";
const SRA_GBASES: &str = "SRA: Gbases";
const SRA_TBYTES: &str = "SRA: Tbytes";
const PROJECT_TYPE: &str = "project_type";
const METHOD: &str = "method";
const DATA_TYPE: &str = "data_type";
const TARGET_MATERIAL: &str = "target_material";
const TARGET_CAPTURE: &str = "target_capture";

const UNINFORMATIVE: &str = "Other";

/// A run of text inside a row value.
#[derive(Clone, Debug, PartialEq)]
pub enum Span {
	Plain(String),
	Emphasis(String),
}

impl Span {
	fn text(&self) -> &str {
		match self {
			Span::Plain(s) | Span::Emphasis(s) => s,
		}
	}
}

/// One label/value line of the popup table.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayRow {
	pub label: &'static str,
	pub spans: Vec<Span>,
}

impl DisplayRow {
	fn plain(label: &'static str, value: impl Into<String>) -> Self {
		Self {
			label,
			spans: vec![Span::Plain(value.into())],
		}
	}

	/// The row value as plain text, emphasis markers dropped.
	pub fn value(&self) -> String {
		self.spans.iter().map(Span::text).collect()
	}
}

/// Build the popup rows for a node's attribute list.
pub fn present(attributes: &[NodeAttribute]) -> Vec<DisplayRow> {
	let mut attrs = AttributeMap::collapse(attributes);
	debug!(
		"presenting {} attributes: {:?}",
		attrs.len(),
		attrs.keys().collect::<Vec<_>>()
	);
	let mut rows = Vec::new();

	if let Some(title) = attrs.get(TITLE) {
		rows.push(DisplayRow::plain("Title", title.to_string()));
	}

	let (gbases, tbytes) = (attrs.get(SRA_GBASES), attrs.get(SRA_TBYTES));
	if gbases.is_some() || tbytes.is_some() {
		let mut value = String::new();
		if let Some(g) = gbases {
			value.push_str(&format_number(g));
			value.push_str(" Gbase; ");
		}
		if let Some(t) = tbytes {
			value.push_str(&format_number(t));
			value.push_str(" Tbyte");
		}
		rows.push(DisplayRow::plain("SRA", value));
	}

	let reference = match attrs.get(PROJECT_TYPE) {
		Some(project_type) => {
			let project_type = project_type.to_string();
			rows.push(DisplayRow::plain("Project type", project_type.clone()));
			project_type
		}
		None => String::new(),
	};

	attrs.retain(|_, value| {
		let text = value.to_string();
		text != UNINFORMATIVE && text != reference
	});

	if let Some(method) = attrs.get(METHOD) {
		rows.push(DisplayRow::plain("Method", method.to_string()));
	}
	if let Some(data_type) = attrs.get(DATA_TYPE) {
		rows.push(DisplayRow::plain("Data type", data_type.to_string()));
	}

	let (material, capture) = (attrs.get(TARGET_MATERIAL), attrs.get(TARGET_CAPTURE));
	if material.is_some() || capture.is_some() {
		let mut spans = Vec::new();
		if let Some(m) = material {
			spans.push(Span::Emphasis("material:".into()));
			spans.push(Span::Plain(format!(" {m}; ")));
		}
		if let Some(c) = capture {
			spans.push(Span::Emphasis("capture:".into()));
			spans.push(Span::Plain(format!(" {c}")));
		}
		rows.push(DisplayRow {
			label: "Target",
			spans,
		});
	}

	rows
}

/// Render a value with `,` thousands separators.
///
/// A fractional part that reads as zero is dropped. Any other fractional
/// part is kept verbatim, except when the grouped integer text is already
/// three or more characters long, in which case it is dropped as well.
pub fn format_number(value: &AttrValue) -> String {
	let text = value.to_string();
	let mut parts = text.split('.');
	let integer = group_thousands(parts.next().unwrap_or_default());
	let rest: Vec<&str> = parts.collect();

	match rest.first() {
		Some(frac) if reads_as_zero(frac) => integer,
		_ if integer.chars().count() >= 3 => integer,
		None => integer,
		Some(_) => format!("{integer}.{}", rest.join(".")),
	}
}

/// Insert `,` at every non word-boundary position that is followed by a
/// digit run whose length is a positive multiple of three.
fn group_thousands(text: &str) -> String {
	let chars: Vec<char> = text.chars().collect();
	let mut out = String::with_capacity(text.len() + text.len() / 3);
	for (i, &c) in chars.iter().enumerate() {
		if i > 0 && is_word(chars[i - 1]) == is_word(c) {
			let run = chars[i..].iter().take_while(|c| c.is_ascii_digit()).count();
			if run > 0 && run % 3 == 0 {
				out.push(',');
			}
		}
		out.push(c);
	}
	out
}

fn is_word(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_'
}

fn reads_as_zero(text: &str) -> bool {
	let text = text.trim();
	text.is_empty() || text.parse::<f64>().is_ok_and(|n| n == 0.0)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn attrs(pairs: &[(&str, &str)]) -> Vec<NodeAttribute> {
		pairs.iter().map(|(k, v)| NodeAttribute::new(*k, *v)).collect()
	}

	fn pairs(rows: &[DisplayRow]) -> Vec<(&str, String)> {
		rows.iter().map(|r| (r.label, r.value())).collect()
	}

	#[test]
	fn unrecognised_attributes_give_no_rows() {
		assert!(present(&[]).is_empty());
		assert!(present(&attrs(&[("accno", "PRJNA1"), ("organism_name", "E. coli")])).is_empty());
	}

	#[test]
	fn title_comes_first() {
		let rows = present(&attrs(&[("method", "Sequencing"), ("title", "X")]));
		assert_eq!(pairs(&rows)[0], ("Title", "X".to_string()));
	}

	#[test]
	fn project_type_suppresses_matching_values() {
		let rows = present(&attrs(&[
			("title", "P1"),
			("project_type", "WGS"),
			("method", "WGS"),
			("data_type", "RNA"),
		]));
		assert_eq!(
			pairs(&rows),
			vec![
				("Title", "P1".to_string()),
				("Project type", "WGS".to_string()),
				("Data type", "RNA".to_string()),
			]
		);
	}

	#[test]
	fn other_is_never_shown_after_project_type() {
		let rows = present(&attrs(&[("project_type", "Other"), ("method", "Other")]));
		assert_eq!(pairs(&rows), vec![("Project type", "Other".to_string())]);

		let rows = present(&attrs(&[("data_type", "Other"), ("target_capture", "Other")]));
		assert!(rows.is_empty());
	}

	#[test]
	fn rows_before_project_type_are_not_suppressed() {
		let rows = present(&attrs(&[("title", "Other"), ("project_type", "Other")]));
		assert_eq!(
			pairs(&rows),
			vec![
				("Title", "Other".to_string()),
				("Project type", "Other".to_string()),
			]
		);
	}

	#[test]
	fn empty_values_are_suppressed_without_project_type() {
		let rows = present(&attrs(&[("method", ""), ("data_type", "DNA")]));
		assert_eq!(pairs(&rows), vec![("Data type", "DNA".to_string())]);
	}

	#[test]
	fn last_duplicate_decides() {
		let rows = present(&attrs(&[("method", "Other"), ("method", "Array")]));
		assert_eq!(pairs(&rows), vec![("Method", "Array".to_string())]);
	}

	#[test]
	fn sra_keeps_separator_after_gbases() {
		let rows = present(&[NodeAttribute::new(SRA_GBASES, 12.5)]);
		assert_eq!(pairs(&rows), vec![("SRA", "12.5 Gbase; ".to_string())]);

		let rows = present(&[NodeAttribute::new(SRA_GBASES, 1234.5)]);
		assert_eq!(pairs(&rows), vec![("SRA", "1,234 Gbase; ".to_string())]);

		let rows = present(&[
			NodeAttribute::new(SRA_TBYTES, 2.0),
			NodeAttribute::new(SRA_GBASES, 5120.0),
		]);
		assert_eq!(pairs(&rows), vec![("SRA", "5,120 Gbase; 2 Tbyte".to_string())]);

		let rows = present(&[NodeAttribute::new(SRA_TBYTES, 0.75)]);
		assert_eq!(pairs(&rows), vec![("SRA", "0.75 Tbyte".to_string())]);
	}

	#[test]
	fn target_combines_material_and_capture() {
		let rows = present(&attrs(&[("target_material", "blood")]));
		assert_eq!(pairs(&rows), vec![("Target", "material: blood; ".to_string())]);
		assert_eq!(rows[0].spans[0], Span::Emphasis("material:".into()));

		let rows = present(&attrs(&[
			("target_capture", "exome"),
			("target_material", "blood"),
		]));
		assert_eq!(
			pairs(&rows),
			vec![("Target", "material: blood; capture: exome".to_string())]
		);
	}

	#[test]
	fn target_parts_respect_suppression() {
		let rows = present(&attrs(&[
			("project_type", "Genome"),
			("target_material", "Genome"),
			("target_capture", "whole"),
		]));
		assert_eq!(
			pairs(&rows),
			vec![
				("Project type", "Genome".to_string()),
				("Target", "capture: whole".to_string()),
			]
		);
	}

	#[test]
	fn numeric_values_compare_by_text() {
		let rows = present(&[
			NodeAttribute::new("project_type", "3"),
			NodeAttribute::new("data_type", 3.0),
		]);
		assert_eq!(pairs(&rows), vec![("Project type", "3".to_string())]);
	}

	#[test]
	fn formats_integers_with_separators() {
		assert_eq!(format_number(&AttrValue::Number(0.0)), "0");
		assert_eq!(format_number(&AttrValue::Number(999.0)), "999");
		assert_eq!(format_number(&AttrValue::Number(1000.0)), "1,000");
		assert_eq!(format_number(&AttrValue::Number(1234567.0)), "1,234,567");
		assert_eq!(format_number(&AttrValue::Number(-1234.0)), "-1,234");
	}

	#[test]
	fn fraction_kept_only_for_short_integers() {
		assert_eq!(format_number(&AttrValue::Number(1.5)), "1.5");
		assert_eq!(format_number(&AttrValue::Number(12.25)), "12.25");
		assert_eq!(format_number(&AttrValue::Number(123.4)), "123");
		assert_eq!(format_number(&AttrValue::Number(1234.5)), "1,234");
	}

	#[test]
	fn text_fractions_are_preserved_verbatim() {
		assert_eq!(format_number(&AttrValue::from("1.50")), "1.50");
		assert_eq!(format_number(&AttrValue::from("7.00")), "7");
		assert_eq!(format_number(&AttrValue::from("42.")), "42");
		assert_eq!(format_number(&AttrValue::from("n/a")), "n/a");
	}
}
