use crate::transform::PixelRect;
use crate::{COORDINATES_LAYER_NAME, DocumentError, GeoPoint, GeoPolygon};

use serde::{Deserialize, Deserializer, Serialize};

/// A layer as exported from the design canvas, mirroring the canvas layer hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedNode {
	#[serde(default, deserialize_with = "string_or_number")]
	pub id: String,
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub x: f64,
	#[serde(default)]
	pub y: f64,
	#[serde(default)]
	pub width: f64,
	#[serde(default)]
	pub height: f64,
	#[serde(rename = "type", default)]
	pub node_type: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub rotation: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub corner_radius: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub depth: Option<u32>,
	/// WKT polygon computed for this node by an earlier export.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub geometry: Option<String>,
	/// The committed geographic footprint, stored on the record itself.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub polygon: Option<GeoPolygon>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub children: Vec<ExtractedNode>,
}

impl ExtractedNode {
	pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: impl Into<String>, rect: PixelRect) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			node_type: node_type.into(),
			x: rect.x,
			y: rect.y,
			width: rect.width,
			height: rect.height,
			rotation: rect.rotation,
			corner_radius: rect.corner_radius,
			..Default::default()
		}
	}

	pub fn rect(&self) -> PixelRect {
		PixelRect {
			x: self.x,
			y: self.y,
			width: self.width,
			height: self.height,
			rotation: self.rotation,
			corner_radius: self.corner_radius,
		}
	}

	pub fn is_coordinates_layer(&self) -> bool {
		self.name == COORDINATES_LAYER_NAME
	}

	/// Reads the corner coordinates stored in the names of this layer's four children and closes the ring.
	pub fn coordinates_from_layer(&self) -> Result<Vec<GeoPoint>, DocumentError> {
		if self.children.len() != 4 {
			return Err(DocumentError::InvalidRing {
				expected: 4,
				found: self.children.len(),
			});
		}

		let mut coordinates = self.children.iter().map(|child| parse_coordinate_label(&child.name).map(|(_, point)| point)).collect::<Result<Vec<_>, _>>()?;

		if let Some(first) = coordinates.first().copied() {
			coordinates.push(first);
		}
		Ok(coordinates)
	}

	/// Depth-first walk yielding every node together with the id of its parent.
	pub fn walk(&self) -> Vec<(&ExtractedNode, Option<&str>)> {
		fn visit<'a>(node: &'a ExtractedNode, parent: Option<&'a str>, out: &mut Vec<(&'a ExtractedNode, Option<&'a str>)>) {
			out.push((node, parent));
			for child in &node.children {
				visit(child, Some(node.id.as_str()), out);
			}
		}

		let mut out = Vec::new();
		visit(self, None, &mut out);
		out
	}
}

/// Finds the layer named [`COORDINATES_LAYER_NAME`], searching children of non-matching nodes.
///
/// When several match, the one found last in document order wins. A match is not searched further for nested matches.
pub fn find_coordinates_layer(nodes: &[ExtractedNode]) -> Option<&ExtractedNode> {
	let mut found = None;
	for node in nodes {
		if node.is_coordinates_layer() {
			found = Some(node);
		} else if let Some(child) = find_coordinates_layer(&node.children) {
			found = Some(child);
		}
	}
	found
}

/// Parses a child layer name of the form `label: lon, lat`.
pub fn parse_coordinate_label(name: &str) -> Result<(String, GeoPoint), DocumentError> {
	let (label, lon_lat) = name.split_once(':').ok_or_else(|| DocumentError::parse(name, "expected `label: lon, lat`"))?;
	let (lon, lat) = lon_lat.split_once(',').ok_or_else(|| DocumentError::parse(name, "expected a comma between longitude and latitude"))?;

	let number = |value: &str| value.trim().parse::<f64>().map_err(|err| DocumentError::parse(name, format!("`{}` is not a number: {err}", value.trim())));
	Ok((label.trim().to_string(), GeoPoint::new(number(lon)?, number(lat)?)))
}

pub fn format_coordinate_label(label: &str, point: GeoPoint) -> String {
	format!("{label}: {}, {}", point.x, point.y)
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Id {
		Text(String),
		Integer(i64),
		Float(f64),
	}

	Ok(match Option::<Id>::deserialize(deserializer)? {
		Some(Id::Text(text)) => text,
		Some(Id::Integer(integer)) => integer.to_string(),
		Some(Id::Float(float)) => float.to_string(),
		None => String::new(),
	})
}

#[cfg(test)]
mod test {
	use super::*;
	use pretty_assertions::assert_eq;

	fn named(name: &str, children: Vec<ExtractedNode>) -> ExtractedNode {
		ExtractedNode {
			name: name.to_string(),
			children,
			..Default::default()
		}
	}

	fn coordinates_layer(offset: f64) -> ExtractedNode {
		named(
			COORDINATES_LAYER_NAME,
			vec![
				named(&format_coordinate_label("Top Left", GeoPoint::new(offset, 1.)), vec![]),
				named(&format_coordinate_label("Top Right", GeoPoint::new(offset + 1., 1.)), vec![]),
				named(&format_coordinate_label("Bottom Right", GeoPoint::new(offset + 1., 0.)), vec![]),
				named(&format_coordinate_label("Bottom Left", GeoPoint::new(offset, 0.)), vec![]),
			],
		)
	}

	#[test]
	fn label_round_trip() {
		let label = format_coordinate_label("Top Left", GeoPoint::new(126.978, 37.5665));
		assert_eq!(label, "Top Left: 126.978, 37.5665");
		assert_eq!(parse_coordinate_label(&label).unwrap(), ("Top Left".to_string(), GeoPoint::new(126.978, 37.5665)));
	}

	#[test]
	fn malformed_labels_fail() {
		for name in ["Top Left", "Top Left: 1", "Top Left: x, 2"] {
			assert!(parse_coordinate_label(name).is_err(), "{name} should fail");
		}
	}

	#[test]
	fn finds_nested_layer_and_last_match_wins() {
		let tree = vec![named("Frame", vec![coordinates_layer(0.)]), named("Other", vec![named("Inner", vec![coordinates_layer(5.)])])];
		let layer = find_coordinates_layer(&tree).unwrap();
		let coordinates = layer.coordinates_from_layer().unwrap();
		assert_eq!(coordinates.len(), 5);
		assert_eq!(coordinates[0], GeoPoint::new(5., 1.));
		assert_eq!(coordinates[4], coordinates[0]);

		assert!(find_coordinates_layer(&[named("Frame", vec![])]).is_none());
	}

	#[test]
	fn layer_needs_four_corners() {
		let mut layer = coordinates_layer(0.);
		layer.children.pop();
		assert_eq!(layer.coordinates_from_layer(), Err(DocumentError::InvalidRing { expected: 4, found: 3 }));
	}

	#[test]
	fn numeric_ids_deserialize() {
		let node: ExtractedNode = serde_json::from_str(r#"{"id": 12, "name": "Box", "x": 1, "y": 2, "width": 3, "height": 4, "type": "RECTANGLE", "cornerRadius": 2}"#).unwrap();
		assert_eq!(node.id, "12");
		assert_eq!(node.corner_radius, Some(2.));
		assert_eq!(node.rect(), PixelRect { corner_radius: Some(2.), ..PixelRect::new(1., 2., 3., 4.) });

		let node: ExtractedNode = serde_json::from_str(r#"{"id": "1:2"}"#).unwrap();
		assert_eq!(node.id, "1:2");
	}

	#[test]
	fn walk_reports_parents() {
		let mut root = named("Root", vec![named("A", vec![named("B", vec![])])]);
		root.id = "1".into();
		root.children[0].id = "2".into();

		let walked = root.walk().into_iter().map(|(node, parent)| (node.name.as_str(), parent)).collect::<Vec<_>>();
		assert_eq!(walked, vec![("Root", None), ("A", Some("1")), ("B", Some("2"))]);
	}
}
