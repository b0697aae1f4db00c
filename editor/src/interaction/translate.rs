use geoframe_document::{GeoPoint, GeoPolygon};

/// Moves the whole ring with the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslateGesture {
	original: GeoPolygon,
	start: GeoPoint,
}

impl TranslateGesture {
	pub fn begin(polygon: &GeoPolygon, pointer: GeoPoint) -> Self {
		Self { original: *polygon, start: pointer }
	}

	pub fn original(&self) -> &GeoPolygon {
		&self.original
	}

	/// The original ring offset by the distance the pointer travelled since the press.
	pub fn update(&self, pointer: GeoPoint) -> GeoPolygon {
		self.original.translated(pointer - self.start)
	}
}
