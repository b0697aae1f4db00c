use super::{BYTE_ORDER_MARK, geometry_for};
use crate::DocumentError;
use crate::node::ExtractedNode;
use crate::transform::CanvasProjection;

use serde::Deserialize;

pub const EXPORT_HEADER: [&str; 8] = ["id", "name", "x", "y", "width", "height", "parent_id", "geometry"];

/// One CSV row. Numeric cells are typed on read; empty cells are absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
	id: Option<String>,
	name: Option<String>,
	x: Option<f64>,
	y: Option<f64>,
	width: Option<f64>,
	height: Option<f64>,
	parent_id: Option<String>,
	geometry: Option<String>,
	#[serde(rename = "type")]
	node_type: Option<String>,
}

impl CsvRow {
	fn is_blank(&self) -> bool {
		self.id.is_none() && self.name.is_none() && self.x.is_none() && self.y.is_none() && self.width.is_none() && self.height.is_none() && self.geometry.is_none()
	}
}

/// Reads nodes from CSV text with the header `name,x,y,width,height,geometry`.
///
/// Files written by [`export_csv`] are accepted too: rows whose `parent_id` names an earlier row are nested under it again.
pub fn parse_csv(text: &str) -> Result<Vec<ExtractedNode>, DocumentError> {
	let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
	let mut reader = ::csv::ReaderBuilder::new().trim(::csv::Trim::All).flexible(true).from_reader(text.as_bytes());

	let mut rows = Vec::new();
	for (index, record) in reader.deserialize::<CsvRow>().enumerate() {
		let row = record.map_err(|err| DocumentError::Csv(format!("row {}: {err}", index + 1)))?;
		if !row.is_blank() {
			rows.push(row);
		}
	}

	if rows.is_empty() {
		return Err(DocumentError::EmptyCsv);
	}

	let mut roots: Vec<ExtractedNode> = Vec::new();
	for row in rows {
		let parent_id = row.parent_id.clone().filter(|id| !id.is_empty());
		let node = ExtractedNode {
			id: row.id.unwrap_or_default(),
			name: row.name.unwrap_or_default(),
			x: row.x.unwrap_or_default(),
			y: row.y.unwrap_or_default(),
			width: row.width.unwrap_or_default(),
			height: row.height.unwrap_or_default(),
			node_type: row.node_type.unwrap_or_default(),
			geometry: row.geometry.filter(|geometry| !geometry.is_empty()),
			..Default::default()
		};

		let parent = match parent_id {
			Some(parent_id) => find_mut(&mut roots, &parent_id),
			None => None,
		};
		match parent {
			Some(parent) => parent.children.push(node),
			None => roots.push(node),
		}
	}

	debug!("Parsed {} root nodes from CSV", roots.len());
	Ok(roots)
}

fn find_mut<'a>(nodes: &'a mut [ExtractedNode], id: &str) -> Option<&'a mut ExtractedNode> {
	for node in nodes.iter_mut() {
		if node.id == id {
			return Some(node);
		}
		if let Some(found) = find_mut(&mut node.children, id) {
			return Some(found);
		}
	}
	None
}

/// Writes every node and its descendants as CSV rows, prefixed with a byte order mark.
pub fn export_csv(nodes: &[ExtractedNode], projection: &CanvasProjection) -> Result<String, DocumentError> {
	let mut writer = ::csv::WriterBuilder::new().terminator(::csv::Terminator::Any(b'\n')).from_writer(Vec::new());
	writer.write_record(EXPORT_HEADER)?;

	for (node, parent_id) in nodes.iter().flat_map(ExtractedNode::walk) {
		writer.write_record([
			node.id.clone(),
			node.name.clone(),
			node.x.to_string(),
			node.y.to_string(),
			node.width.to_string(),
			node.height.to_string(),
			parent_id.unwrap_or_default().to_string(),
			geometry_for(node, projection),
		])?;
	}

	let bytes = writer.into_inner().map_err(|err| DocumentError::Csv(err.to_string()))?;
	let body = String::from_utf8(bytes).map_err(|err| DocumentError::Csv(err.to_string()))?;
	Ok(format!("{BYTE_ORDER_MARK}{body}"))
}
