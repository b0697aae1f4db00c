use geoframe_document::GeoPolygon;

/// The polygon being edited plus the uncommitted result of a modify gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditableFeature {
	geometry: GeoPolygon,
	modify_geometry: Option<GeoPolygon>,
}

impl EditableFeature {
	pub fn new(geometry: GeoPolygon) -> Self {
		Self { geometry, modify_geometry: None }
	}

	/// The committed geometry.
	pub fn geometry(&self) -> &GeoPolygon {
		&self.geometry
	}

	/// What the map should draw: the in-progress modification if there is one.
	pub fn display_geometry(&self) -> &GeoPolygon {
		self.modify_geometry.as_ref().unwrap_or(&self.geometry)
	}

	pub fn set_geometry(&mut self, geometry: GeoPolygon) {
		self.geometry = geometry;
		self.modify_geometry = None;
	}

	pub fn modify_geometry(&self) -> Option<&GeoPolygon> {
		self.modify_geometry.as_ref()
	}

	pub fn set_modify_geometry(&mut self, geometry: GeoPolygon) {
		self.modify_geometry = Some(geometry);
	}

	/// Promotes the in-progress modification to the committed geometry. Returns whether there was one.
	pub fn commit_modify_geometry(&mut self) -> bool {
		match self.modify_geometry.take() {
			Some(geometry) => {
				self.geometry = geometry;
				true
			}
			None => false,
		}
	}

	pub fn discard_modify_geometry(&mut self) {
		self.modify_geometry = None;
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use geoframe_document::GeoPoint;
	use glam::DVec2;

	#[test]
	fn modification_is_only_visible_until_committed() {
		let square = GeoPolygon::from_corners([GeoPoint::new(-1., 1.), GeoPoint::new(1., 1.), GeoPoint::new(1., -1.), GeoPoint::new(-1., -1.)]);
		let moved = square.translated(DVec2::X);
		let mut feature = EditableFeature::new(square);

		feature.set_modify_geometry(moved);
		assert_eq!(feature.geometry(), &square);
		assert_eq!(feature.display_geometry(), &moved);

		assert!(feature.commit_modify_geometry());
		assert_eq!(feature.geometry(), &moved);
		assert_eq!(feature.modify_geometry(), None);
		assert!(!feature.commit_modify_geometry());
	}
}
