use crate::node::{ExtractedNode, find_coordinates_layer};
use crate::transform::CanvasProjection;
use crate::{DocumentError, GeoPoint, GeoPolygon, wkt};

/// Where the geometry of a built polygon came from, in order of precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonSource {
	/// Corner labels written to the canvas by a previous round-trip.
	CoordinatesLayer,
	/// The `polygon` field stored on the node record.
	PersistedPolygon,
	/// The `geometry` WKT string from an imported file.
	GeometryString,
	/// Freshly projected from the node's pixel rectangle.
	Rectangle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuiltPolygon {
	pub polygon: GeoPolygon,
	pub source: PolygonSource,
}

/// Turns delivered or imported nodes into the single polygon that is edited on the map.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolygonBuilder {
	pub projection: CanvasProjection,
}

impl PolygonBuilder {
	pub fn new(center: GeoPoint) -> Self {
		Self {
			projection: CanvasProjection::new(center),
		}
	}

	pub fn with_projection(projection: CanvasProjection) -> Self {
		Self { projection }
	}

	/// Builds one polygon from `nodes`, or `None` when there are no nodes.
	///
	/// A previously committed round-trip through the canvas is authoritative over a freshly recomputed rectangle.
	pub fn build(&self, nodes: &[ExtractedNode]) -> Result<Option<BuiltPolygon>, DocumentError> {
		let Some(first) = nodes.first() else { return Ok(None) };

		let built = if let Some(layer) = find_coordinates_layer(nodes) {
			BuiltPolygon {
				polygon: GeoPolygon::try_from_ring(&layer.coordinates_from_layer()?)?,
				source: PolygonSource::CoordinatesLayer,
			}
		} else if let Some(polygon) = first.polygon {
			BuiltPolygon {
				polygon,
				source: PolygonSource::PersistedPolygon,
			}
		} else if let Some(geometry) = first.geometry.as_deref().filter(|geometry| !geometry.trim().is_empty()) {
			BuiltPolygon {
				polygon: GeoPolygon::try_from_ring(&wkt::parse_geometry(geometry)?)?,
				source: PolygonSource::GeometryString,
			}
		} else {
			BuiltPolygon {
				polygon: self.projection.rect_to_polygon(&first.rect()),
				source: PolygonSource::Rectangle,
			}
		};

		debug!("Built polygon from {:?}: {}", built.source, built.polygon);
		Ok(Some(built))
	}
}

/// Builds the polygon for `nodes` around `center` with the default canvas scale.
pub fn create_polygon(nodes: &[ExtractedNode], center: GeoPoint) -> Result<Option<GeoPolygon>, DocumentError> {
	Ok(PolygonBuilder::new(center).build(nodes)?.map(|built| built.polygon))
}
