//! File formats used to move nodes and their geographic footprints in and out of the plugin.

pub mod csv;
pub mod json;

use crate::GeoPolygon;
use crate::node::ExtractedNode;
use crate::transform::CanvasProjection;

/// UTF-8 byte order mark prepended to exported CSV so spreadsheet tools detect the encoding.
pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// The footprint written for `node` on export: the stored polygon, else the imported geometry, else its projected rectangle.
pub fn geometry_for(node: &ExtractedNode, projection: &CanvasProjection) -> String {
	node.polygon
		.map(|polygon| polygon.to_wkt())
		.or_else(|| node.geometry.clone().filter(|geometry| !geometry.trim().is_empty()))
		.unwrap_or_else(|| projection.rect_to_polygon(&node.rect()).to_wkt())
}

/// Stores `polygon` on the node record so later imports can rebuild it without recomputing from pixels.
pub fn attach_polygon(node: &mut ExtractedNode, polygon: GeoPolygon) {
	node.geometry = Some(polygon.to_wkt());
	node.polygon = Some(polygon);
}
