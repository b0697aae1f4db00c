use crate::node::ExtractedNode;
use crate::{DocumentError, GeoPolygon};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The file written by "download" and read back by "upload": a node tree plus the SVG snapshot of the selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeWithSvg {
	pub parent_node: ExtractedNode,
	#[serde(default)]
	pub svg_string: String,
}

impl NodeWithSvg {
	pub fn parse(text: &str) -> Result<Self, DocumentError> {
		Ok(serde_json::from_str(text)?)
	}

	pub fn to_pretty_json(&self) -> Result<String, DocumentError> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}

/// Adds a `polygon` WKT field to the `document` of every entry in a design-file API `nodes` response.
pub fn augment_with_polygon(response: &mut Value, polygon: &GeoPolygon) -> Result<usize, DocumentError> {
	let nodes = response
		.get_mut("nodes")
		.and_then(Value::as_object_mut)
		.ok_or_else(|| DocumentError::Json("the response has no `nodes` object".into()))?;

	let mut augmented = 0;
	for entry in nodes.values_mut() {
		if let Some(document) = entry.get_mut("document").and_then(Value::as_object_mut) {
			document.insert("polygon".into(), Value::String(polygon.to_wkt()));
			augmented += 1;
		}
	}
	Ok(augmented)
}

/// Converts the documents in a design-file API `nodes` response into exported nodes.
pub fn nodes_from_file_api(response: &Value) -> Result<Vec<ExtractedNode>, DocumentError> {
	let nodes = response
		.get("nodes")
		.and_then(Value::as_object)
		.ok_or_else(|| DocumentError::Json("the response has no `nodes` object".into()))?;

	nodes.values().filter_map(|entry| entry.get("document")).map(node_from_document).collect()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoundingBox {
	#[serde(default)]
	x: f64,
	#[serde(default)]
	y: f64,
	#[serde(default)]
	width: f64,
	#[serde(default)]
	height: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileApiNode {
	#[serde(default)]
	id: String,
	#[serde(default)]
	name: String,
	#[serde(rename = "type", default)]
	node_type: String,
	#[serde(default)]
	absolute_bounding_box: Option<BoundingBox>,
	#[serde(default)]
	rotation: Option<f64>,
	#[serde(default)]
	corner_radius: Option<f64>,
	#[serde(default)]
	polygon: Option<String>,
	#[serde(default)]
	children: Vec<Value>,
}

fn node_from_document(document: &Value) -> Result<ExtractedNode, DocumentError> {
	let node = FileApiNode::deserialize(document)?;
	let bounds = node.absolute_bounding_box.unwrap_or_default();
	let polygon = node.polygon.as_deref().map(str::parse::<GeoPolygon>).transpose()?;

	Ok(ExtractedNode {
		id: node.id,
		name: node.name,
		node_type: node.node_type,
		x: bounds.x,
		y: bounds.y,
		width: bounds.width,
		height: bounds.height,
		rotation: node.rotation,
		corner_radius: node.corner_radius,
		polygon,
		children: node.children.iter().map(node_from_document).collect::<Result<_, _>>()?,
		..Default::default()
	})
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::GeoPoint;
	use crate::transform::PixelRect;
	use pretty_assertions::assert_eq;
	use serde_json::json;

	fn polygon() -> GeoPolygon {
		GeoPolygon::from_corners([GeoPoint::new(1., 2.), GeoPoint::new(3., 2.), GeoPoint::new(3., 1.), GeoPoint::new(1., 1.)])
	}

	#[test]
	fn envelope_uses_camel_case_keys() {
		let envelope = NodeWithSvg {
			parent_node: ExtractedNode::new("1:2", "Lot", "FRAME", PixelRect::new(0., 0., 10., 10.)),
			svg_string: "<svg/>".into(),
		};
		let text = envelope.to_pretty_json().unwrap();
		assert!(text.contains("\"parentNode\""));
		assert!(text.contains("\"svgString\": \"<svg/>\""));
		assert_eq!(NodeWithSvg::parse(&text).unwrap(), envelope);
	}

	#[test]
	fn malformed_envelope_is_a_json_error() {
		assert!(matches!(NodeWithSvg::parse("{"), Err(DocumentError::Json(_))));
	}

	#[test]
	fn file_api_documents_are_augmented_and_read_back() {
		let mut response = json!({
			"name": "Site plan",
			"nodes": {
				"1:2": {
					"document": {
						"id": "1:2",
						"name": "Lot",
						"type": "FRAME",
						"absoluteBoundingBox": { "x": 10.0, "y": 20.0, "width": 100.0, "height": 50.0 },
						"children": [
							{ "id": "1:3", "name": "Building", "type": "RECTANGLE", "cornerRadius": 4.0,
							  "absoluteBoundingBox": { "x": 15.0, "y": 25.0, "width": 10.0, "height": 10.0 } }
						]
					}
				}
			}
		});

		assert_eq!(augment_with_polygon(&mut response, &polygon()).unwrap(), 1);
		assert_eq!(response["nodes"]["1:2"]["document"]["polygon"], polygon().to_wkt());

		let nodes = nodes_from_file_api(&response).unwrap();
		assert_eq!(nodes.len(), 1);
		assert_eq!(nodes[0].rect(), PixelRect::new(10., 20., 100., 50.));
		assert_eq!(nodes[0].polygon, Some(polygon()));
		assert_eq!(nodes[0].children[0].corner_radius, Some(4.));
	}

	#[test]
	fn response_without_nodes_is_rejected() {
		assert!(nodes_from_file_api(&json!({ "err": "Not found" })).is_err());
		assert!(augment_with_polygon(&mut json!([]), &polygon()).is_err());
	}
}
