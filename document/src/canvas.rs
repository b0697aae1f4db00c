//! Typed description of the nodes the host creates on the design canvas.
//!
//! The host receives these as tagged JSON objects, so every design-node type the plugin can recreate has its own variant and
//! constructor. Anything else is rejected with [`DocumentError::UnsupportedNodeType`].

use crate::node::{ExtractedNode, format_coordinate_label};
use crate::polygon::Corner;
use crate::transform::PixelRect;
use crate::{COORDINATES_LAYER_NAME, DocumentError, GeoPolygon};

use serde::{Deserialize, Serialize};

/// Placement shared by every canvas node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeFrame {
	pub name: String,
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
	#[serde(default)]
	pub rotation: f64,
}

impl NodeFrame {
	fn from_extracted(node: &ExtractedNode) -> Self {
		Self {
			name: node.name.clone(),
			x: node.x,
			y: node.y,
			width: node.width,
			height: node.height,
			rotation: node.rotation.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BooleanOperation {
	#[default]
	Union,
	Intersect,
	Subtract,
	Exclude,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum CanvasNode {
	Rectangle {
		#[serde(flatten)]
		frame: NodeFrame,
		corner_radius: f64,
	},
	Polygon {
		#[serde(flatten)]
		frame: NodeFrame,
		point_count: u32,
	},
	Text {
		#[serde(flatten)]
		frame: NodeFrame,
		characters: String,
	},
	Frame {
		#[serde(flatten)]
		frame: NodeFrame,
		children: Vec<CanvasNode>,
	},
	Group {
		#[serde(flatten)]
		frame: NodeFrame,
		children: Vec<CanvasNode>,
	},
	Vector {
		#[serde(flatten)]
		frame: NodeFrame,
		/// Footprint carried along as WKT so the host can annotate the vector.
		geometry: Option<String>,
	},
	#[serde(rename = "BOOLEAN_OPERATION")]
	BooleanOp {
		#[serde(flatten)]
		frame: NodeFrame,
		operation: BooleanOperation,
		children: Vec<CanvasNode>,
	},
	Instance {
		#[serde(flatten)]
		frame: NodeFrame,
		main_component_id: Option<String>,
	},
	Line {
		#[serde(flatten)]
		frame: NodeFrame,
	},
	Star {
		#[serde(flatten)]
		frame: NodeFrame,
		point_count: u32,
		inner_radius: f64,
	},
	Component {
		#[serde(flatten)]
		frame: NodeFrame,
		children: Vec<CanvasNode>,
	},
	Slice {
		#[serde(flatten)]
		frame: NodeFrame,
	},
	Connector {
		#[serde(flatten)]
		frame: NodeFrame,
	},
}

const DEFAULT_POLYGON_POINT_COUNT: u32 = 3;
const DEFAULT_STAR_POINT_COUNT: u32 = 5;
const DEFAULT_STAR_INNER_RADIUS: f64 = 0.382;

impl CanvasNode {
	/// Converts an exported node (and its children) into the node the host should create.
	pub fn from_extracted(node: &ExtractedNode) -> Result<Self, DocumentError> {
		match node.node_type.to_ascii_uppercase().as_str() {
			"RECTANGLE" => Ok(rectangle(node)),
			"POLYGON" | "REGULAR_POLYGON" => Ok(polygon(node)),
			"TEXT" => Ok(text(node)),
			"FRAME" => frame(node),
			"GROUP" => group(node),
			"VECTOR" => Ok(vector(node)),
			"BOOLEAN_OPERATION" => boolean_operation(node),
			"INSTANCE" => Ok(instance(node)),
			"LINE" => Ok(line(node)),
			"STAR" => Ok(star(node)),
			"COMPONENT" => component(node),
			"SLICE" => Ok(slice(node)),
			"CONNECTOR" => Ok(connector(node)),
			_ => Err(DocumentError::UnsupportedNodeType(node.node_type.clone())),
		}
	}

	pub fn frame(&self) -> &NodeFrame {
		match self {
			CanvasNode::Rectangle { frame, .. }
			| CanvasNode::Polygon { frame, .. }
			| CanvasNode::Text { frame, .. }
			| CanvasNode::Frame { frame, .. }
			| CanvasNode::Group { frame, .. }
			| CanvasNode::Vector { frame, .. }
			| CanvasNode::BooleanOp { frame, .. }
			| CanvasNode::Instance { frame, .. }
			| CanvasNode::Line { frame }
			| CanvasNode::Star { frame, .. }
			| CanvasNode::Component { frame, .. }
			| CanvasNode::Slice { frame }
			| CanvasNode::Connector { frame } => frame,
		}
	}

	pub fn name(&self) -> &str {
		&self.frame().name
	}

	pub fn children(&self) -> &[CanvasNode] {
		match self {
			CanvasNode::Frame { children, .. } | CanvasNode::Group { children, .. } | CanvasNode::BooleanOp { children, .. } | CanvasNode::Component { children, .. } => children,
			_ => &[],
		}
	}
}

fn children_of(node: &ExtractedNode) -> Result<Vec<CanvasNode>, DocumentError> {
	node.children.iter().map(CanvasNode::from_extracted).collect()
}

fn rectangle(node: &ExtractedNode) -> CanvasNode {
	CanvasNode::Rectangle {
		frame: NodeFrame::from_extracted(node),
		corner_radius: node.corner_radius.unwrap_or_default(),
	}
}

fn polygon(node: &ExtractedNode) -> CanvasNode {
	CanvasNode::Polygon {
		frame: NodeFrame::from_extracted(node),
		point_count: DEFAULT_POLYGON_POINT_COUNT,
	}
}

fn text(node: &ExtractedNode) -> CanvasNode {
	CanvasNode::Text {
		frame: NodeFrame::from_extracted(node),
		characters: node.name.clone(),
	}
}

fn frame(node: &ExtractedNode) -> Result<CanvasNode, DocumentError> {
	Ok(CanvasNode::Frame {
		frame: NodeFrame::from_extracted(node),
		children: children_of(node)?,
	})
}

fn group(node: &ExtractedNode) -> Result<CanvasNode, DocumentError> {
	Ok(CanvasNode::Group {
		frame: NodeFrame::from_extracted(node),
		children: children_of(node)?,
	})
}

fn vector(node: &ExtractedNode) -> CanvasNode {
	CanvasNode::Vector {
		frame: NodeFrame::from_extracted(node),
		geometry: node.polygon.map(|polygon| polygon.to_wkt()).or_else(|| node.geometry.clone()),
	}
}

fn boolean_operation(node: &ExtractedNode) -> Result<CanvasNode, DocumentError> {
	Ok(CanvasNode::BooleanOp {
		frame: NodeFrame::from_extracted(node),
		operation: BooleanOperation::default(),
		children: children_of(node)?,
	})
}

fn instance(node: &ExtractedNode) -> CanvasNode {
	CanvasNode::Instance {
		frame: NodeFrame::from_extracted(node),
		main_component_id: None,
	}
}

fn line(node: &ExtractedNode) -> CanvasNode {
	CanvasNode::Line { frame: NodeFrame::from_extracted(node) }
}

fn star(node: &ExtractedNode) -> CanvasNode {
	CanvasNode::Star {
		frame: NodeFrame::from_extracted(node),
		point_count: DEFAULT_STAR_POINT_COUNT,
		inner_radius: DEFAULT_STAR_INNER_RADIUS,
	}
}

fn component(node: &ExtractedNode) -> Result<CanvasNode, DocumentError> {
	Ok(CanvasNode::Component {
		frame: NodeFrame::from_extracted(node),
		children: children_of(node)?,
	})
}

fn slice(node: &ExtractedNode) -> CanvasNode {
	CanvasNode::Slice { frame: NodeFrame::from_extracted(node) }
}

fn connector(node: &ExtractedNode) -> CanvasNode {
	CanvasNode::Connector { frame: NodeFrame::from_extracted(node) }
}

/// Builds the layer that records committed corners as `label: lon, lat` child names next to the annotated shape.
///
/// The names are what older exports read back, so they must stay in this exact format.
pub fn coordinates_layer(polygon: &GeoPolygon, anchor: PixelRect) -> ExtractedNode {
	let children = Corner::ALL
		.iter()
		.map(|corner| ExtractedNode {
			name: format_coordinate_label(corner.label(), polygon.corner(*corner)),
			node_type: "TEXT".into(),
			x: anchor.x,
			y: anchor.y + anchor.height,
			..Default::default()
		})
		.collect();

	ExtractedNode {
		name: COORDINATES_LAYER_NAME.into(),
		node_type: "FRAME".into(),
		x: anchor.x,
		y: anchor.y,
		width: anchor.width,
		height: anchor.height,
		polygon: Some(*polygon),
		children,
		..Default::default()
	}
}
